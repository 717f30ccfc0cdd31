use thiserror::Error;

/// Failures of the media storage backend.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Reading or writing a stored object failed.
    #[error("Media storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The URL does not point into this storage, so there is nothing to delete.
    ///
    /// Usually a robot image that references an external host.
    #[error("URL '{0}' is not managed by this media storage")]
    ForeignUrl(String),
}
