//! Lights module: open-by-name registry over one shared [`LightService`].
//!
//! The module is initialized exactly once; every device opened from it
//! shares the same service, and therefore the same lock and arbitration
//! state.

use std::sync::{Arc, OnceLock};

use crate::control::ControlPointWriter;
use crate::error::{EINVAL, LightsError, Result};
use crate::request::{LightId, LightRequest};
use crate::service::LightService;

pub struct LightsModule<W> {
    service: OnceLock<Arc<LightService<W>>>,
}

impl<W> Default for LightsModule<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W> LightsModule<W> {
    /// An uninitialized module. `const` so it can live in a `static`.
    pub const fn new() -> Self {
        LightsModule {
            service: OnceLock::new(),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.service.get().is_some()
    }
}

impl<W: ControlPointWriter> LightsModule<W> {
    /// One-time setup over `writer`.
    pub fn initialize(&self, writer: W) -> Result<()> {
        self.initialize_with(LightService::new(writer))
    }

    /// One-time setup with a preconfigured service.
    pub fn initialize_with(&self, service: LightService<W>) -> Result<()> {
        self.service
            .set(Arc::new(service))
            .map_err(|_| LightsError::AlreadyInitialized)
    }

    /// Open the light called `name`.
    ///
    /// Unknown names fail before the module state is consulted.
    pub fn open(&self, name: &str) -> Result<LightDevice<W>> {
        let id: LightId = name.parse()?;
        let service = self.service.get().ok_or(LightsError::NotInitialized)?;
        log::debug!("opened light {id}");
        Ok(LightDevice {
            id,
            service: Arc::clone(service),
        })
    }

    /// The shared service, once initialized.
    pub fn service(&self) -> Option<&Arc<LightService<W>>> {
        self.service.get()
    }
}

/// Handle for one named light.
pub struct LightDevice<W> {
    id: LightId,
    service: Arc<LightService<W>>,
}

impl<W: ControlPointWriter> LightDevice<W> {
    pub fn id(&self) -> LightId {
        self.id
    }

    /// Apply a request, reporting failures as [`LightsError`].
    pub fn try_set_light(&self, request: &LightRequest) -> Result<()> {
        self.service.update(self.id, request)
    }

    /// Apply a request, errno style: `0` on success, `-errno` of the first
    /// failed write, or `-EINVAL` when no request is given.
    pub fn set_light(&self, request: Option<&LightRequest>) -> i32 {
        let Some(request) = request else {
            return -EINVAL;
        };
        match self.try_set_light(request) {
            Ok(()) => 0,
            Err(e) => {
                log::debug!("set_light({}) failed: {e}", self.id);
                e.status_code()
            }
        }
    }

    /// Release the handle. The shared service lives on.
    pub fn close(self) {
        log::debug!("closed light {}", self.id);
    }
}
