use thiserror::Error;

#[derive(Debug, Error)]
pub enum QrGenError {
    #[error("Please enter data for the QR code")]
    EmptyInput,

    #[error("QR code generation failed: {0}")]
    EncodeFailed(String),

    #[error("Failed to encode PNG: {0}")]
    PngEncode(String),

    #[error("Image too large: {width}x{height} exceeds maximum {max_dimension}x{max_dimension}")]
    DimensionsTooLarge {
        width: u32,
        height: u32,
        max_dimension: u32,
    },

    #[error("Dimension overflow: ({modules} + 2 x {border}) x {box_size} overflows")]
    DimensionOverflow {
        modules: u32,
        border: u32,
        box_size: u32,
    },
}

impl QrGenError {
    /// HTTP-style status for API responses.
    pub fn status(&self) -> u16 {
        match self {
            Self::EmptyInput => 400,
            _ => 500,
        }
    }
}

pub type Result<T> = std::result::Result<T, QrGenError>;
