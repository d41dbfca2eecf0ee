//! Color parsing and formatting.
//!
//! Colors are packed `0xAARRGGBB`; the alpha byte is carried along but never
//! displayed.

/// Parse a color string into a packed `0xAARRGGBB` value.
///
/// Accepts:
/// - Hex: `"#FF0000"`, `"FF0000"`, `"#ff0000"` (alpha 0)
/// - Packed: `"0xFFFF0000"` (kept verbatim, alpha included)
/// - Named: `"red"`, `"green"`, `"blue"`, `"white"`, `"orange"`, `"yellow"`, `"purple"`, `"cyan"`
pub fn parse_color(s: &str) -> crate::error::Result<u32> {
    let s = s.trim();

    match s.to_lowercase().as_str() {
        "red" => return Ok(0x00FF_0000),
        "green" => return Ok(0x0000_FF00),
        "blue" => return Ok(0x0000_00FF),
        "white" => return Ok(0x00FF_FFFF),
        "orange" => return Ok(0x00FF_8000),
        "yellow" => return Ok(0x00FF_FF00),
        "purple" => return Ok(0x0080_00FF),
        "cyan" => return Ok(0x0000_FFFF),
        "off" | "black" => return Ok(0x0000_0000),
        _ => {}
    }

    if let Some(packed) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        if packed.is_empty() || packed.len() > 8 {
            return Err(crate::LightsError::Color(format!(
                "Invalid packed color: {s} (use 0xAARRGGBB)"
            )));
        }
        return u32::from_str_radix(packed, 16)
            .map_err(|_| crate::LightsError::Color(format!("Invalid packed color: {s}")));
    }

    let hex = s.strip_prefix('#').unwrap_or(s);
    if hex.len() != 6 {
        return Err(crate::LightsError::Color(format!(
            "Invalid color: {s} (use #RRGGBB, 0xAARRGGBB or a color name)"
        )));
    }
    u32::from_str_radix(hex, 16)
        .map_err(|_| crate::LightsError::Color(format!("Invalid hex color: {s}")))
}

/// Format a packed color as `#RRGGBB`.
pub fn format_color(val: u32) -> String {
    let r = (val >> 16) & 0xFF;
    let g = (val >> 8) & 0xFF;
    let b = val & 0xFF;
    format!("#{r:02X}{g:02X}{b:02X}")
}

/// Perceived brightness of a color, 0-255: `(77*R + 150*G + 29*B) >> 8`.
pub fn luminance(color: u32) -> u32 {
    let r = (color >> 16) & 0xFF;
    let g = (color >> 8) & 0xFF;
    let b = color & 0xFF;
    (77 * r + 150 * g + 29 * b) >> 8
}
