use thiserror::Error;

#[derive(Error, Debug)]
pub enum KaosError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid length: input must contain at least one byte")]
    InvalidLength,

    #[error("Allocation failure: could not reserve {0} bytes for the output buffer")]
    AllocationFailure(usize),

    #[error("Key file already exists: {}", .0.display())]
    KeyFileExists(std::path::PathBuf),

    #[error("Malformed key material: expected {expected} bytes, found {actual}")]
    MalformedKeyMaterial { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, KaosError>;
