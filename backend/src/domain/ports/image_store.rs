//! Port for recipe image blob storage.

use super::macros::define_port_error;

define_port_error! {
    /// Errors raised by image storage adapters.
    pub enum ImageStoreError {
        /// The backing store rejected the write or delete.
        Io { message: String } => "image store operation failed: {message}",
    }
}

/// Content-addressed-ish blob storage for recipe images.
///
/// Implementations generate the stored name themselves and return the
/// relative path callers persist on the recipe. Operations are synchronous;
/// callers run them off the async executor where latency matters.
pub trait ImageStore: Send + Sync {
    /// Persist `bytes` under a fresh name with the given extension,
    /// returning the relative storage path.
    fn save(&self, extension: &str, bytes: &[u8]) -> Result<String, ImageStoreError>;

    /// Remove a previously stored image. Removing a path that no longer
    /// exists is not an error.
    fn remove(&self, path: &str) -> Result<(), ImageStoreError>;
}
