use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepackError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("region not found: {0}")]
    RegionNotFound(String),
    #[error("no bitmap loaded for page {0:?}")]
    MissingPageImage(String),
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
    #[error("Nothing to pack")]
    Empty,
}

pub type Result<T> = std::result::Result<T, RepackError>;
