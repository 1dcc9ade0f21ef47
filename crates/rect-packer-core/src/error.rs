use thiserror::Error;

#[derive(Debug, Error)]
pub enum PackerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "image")]
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Invalid max dimensions: {width}x{height} (both must be at least 1)")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("Image '{name}' has invalid size {width}x{height}")]
    InvalidImageSize { name: String, width: u32, height: u32 },
    #[error("Image '{0}' is already registered")]
    DuplicateImage(String),
    #[error("No image named '{0}'")]
    UnknownImage(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("No images to pack")]
    Empty,
    #[error("Image '{name}' ({width}x{height}) does not fit in the atlas")]
    DoesNotFit { name: String, width: u32, height: u32 },
    #[error("Packed size {width}x{height} cannot be rounded up to a power of two")]
    SizeOverflow { width: u32, height: u32 },
    #[error("Packer has no valid packing result")]
    NotPacked,
}

pub type Result<T> = std::result::Result<T, PackerError>;
