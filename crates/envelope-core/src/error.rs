use thiserror::Error;

/// Errors raised by the opt-in input checks and JSON decoding.
/// The envelope builder itself never fails.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("sample {index}: {field} is not a finite number")]
    NonFinite { index: usize, field: &'static str },
    #[error("sample {index}: latitude {lat} outside [-90, 90]")]
    LatitudeOutOfRange { index: usize, lat: f64 },
    #[error("sample {index}: longitude {lon} outside [-180, 180]")]
    LongitudeOutOfRange { index: usize, lon: f64 },
    #[error("sample {index}: negative radius {radius}")]
    NegativeRadius { index: usize, radius: f64 },
    #[error("invalid JSON input: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EnvelopeError>;
