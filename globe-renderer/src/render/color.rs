use glam::Vec3;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("Expected #rrggbb, got {0:?}")]
    Format(String),
    #[error("Invalid hex digits in {0:?}")]
    Digits(String),
}

/// Parses `#rrggbb` into linear 0..1 channels.
pub fn parse_hex_color(value: &str) -> Result<Vec3, ColorParseError> {
    let hex = value
        .strip_prefix('#')
        .filter(|hex| hex.len() == 6 && hex.is_ascii())
        .ok_or_else(|| ColorParseError::Format(value.to_owned()))?;
    // from_str_radix alone would take a leading sign
    if !hex.bytes().all(|byte| byte.is_ascii_hexdigit()) {
        return Err(ColorParseError::Digits(value.to_owned()));
    }

    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16)
            .map(|byte| byte as f32 / 255.0)
            .map_err(|_| ColorParseError::Digits(value.to_owned()))
    };

    Ok(Vec3::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Maps emission magnitude onto a low-to-high color ramp, normalized by the
/// largest magnitude in the dataset.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ColorEncoder {
    low: Vec3,
    high: Vec3,
    max_magnitude: f64,
}

impl ColorEncoder {
    pub fn new(low: Vec3, high: Vec3, max_magnitude: f64) -> Self {
        Self {
            low,
            high,
            max_magnitude,
        }
    }

    pub fn max_magnitude(&self) -> f64 {
        self.max_magnitude
    }

    /// Fraction of the ramp for `magnitude`, clamped to [0, 1].
    pub fn ramp_position(&self, magnitude: f64) -> f32 {
        if !(self.max_magnitude > 0.0) || !magnitude.is_finite() {
            return 0.0;
        }
        (magnitude / self.max_magnitude).clamp(0.0, 1.0) as f32
    }

    pub fn encode(&self, magnitude: f64) -> Vec3 {
        self.low.lerp(self.high, self.ramp_position(magnitude))
    }
}
