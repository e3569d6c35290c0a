#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Archive path cannot be converted to utf8")]
    PathNotUtf8,
    #[error("Path contains an interior nul byte: {0}")]
    InteriorNul(#[from] std::ffi::NulError),
    #[error("Failed to open CHM archive: {0}")]
    Open(String),
    #[error("Object not found in archive: {0}")]
    ObjectNotFound(String),
    #[error("Object of {0} bytes cannot be loaded into memory")]
    ObjectTooLarge(u64),
    #[error("Failed to enumerate archive objects")]
    Enumeration,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

pub(crate) fn path_does_not_exist(message: String) -> Error {
    Error::Io(std::io::Error::new(std::io::ErrorKind::NotFound, message))
}
