use thiserror::Error;

/// Errors raised when a subdivision request or drawing setting is malformed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FractalError {
    #[error("invalid depth {0:?}: expected a non-negative integer")]
    InvalidDepth(String),
    #[error("depth {depth} exceeds the supported maximum of {max}")]
    DepthTooLarge { depth: u32, max: u32 },
    #[error("edge length must be finite and positive, got {0}")]
    InvalidLength(f64),
    #[error("origin ({x}, {y}) is not a finite point")]
    InvalidOrigin { x: f64, y: f64 },
    #[error("invalid colour {0:?}: expected #rrggbb or three 0-255 components")]
    InvalidColor(String),
    #[error("unknown emission mode {0:?}: expected unique or replayed")]
    InvalidEmission(String),
}
