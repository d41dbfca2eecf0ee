//! lightarbiter: arbitration and blink planning for a shared RGB notification LED.

pub mod arbitration;
pub mod config;
pub mod control;
pub mod error;
pub mod led;
pub mod module;
pub mod request;
pub mod service;

pub use error::LightsError;
