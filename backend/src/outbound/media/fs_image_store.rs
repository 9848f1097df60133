//! Filesystem image store rooted in a capability-scoped directory.
//!
//! All paths are resolved relative to the media root through
//! `cap_std::fs::Dir`, so a crafted stored path cannot escape it.

use std::path::Path;

use cap_std::{ambient_authority, fs::Dir};
use uuid::Uuid;

use crate::domain::ports::{ImageStore, ImageStoreError};

const RECIPE_SUBDIR: &str = "recipe";

/// `ImageStore` adapter writing under a media root directory.
pub struct FsImageStore {
    root: Dir,
}

impl FsImageStore {
    /// Open (creating if needed) the media root and its recipe subtree.
    pub fn open(media_root: impl AsRef<Path>) -> Result<Self, ImageStoreError> {
        let media_root = media_root.as_ref();
        Dir::create_ambient_dir_all(media_root, ambient_authority())
            .map_err(|error| ImageStoreError::io(error.to_string()))?;
        let root = Dir::open_ambient_dir(media_root, ambient_authority())
            .map_err(|error| ImageStoreError::io(error.to_string()))?;
        match root.create_dir(RECIPE_SUBDIR) {
            Ok(()) => {}
            Err(error) if error.kind() == std::io::ErrorKind::AlreadyExists => {}
            Err(error) => return Err(ImageStoreError::io(error.to_string())),
        }
        Ok(Self { root })
    }
}

impl ImageStore for FsImageStore {
    fn save(&self, extension: &str, bytes: &[u8]) -> Result<String, ImageStoreError> {
        let relative = format!("{RECIPE_SUBDIR}/{}.{extension}", Uuid::new_v4());
        self.root
            .write(&relative, bytes)
            .map_err(|error| ImageStoreError::io(error.to_string()))?;
        Ok(relative)
    }

    fn remove(&self, path: &str) -> Result<(), ImageStoreError> {
        match self.root.remove_file(path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(ImageStoreError::io(error.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_writes_under_recipe_subdir() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FsImageStore::open(dir.path()).expect("open");

        let path = store.save("png", b"bytes").expect("save");
        assert!(path.starts_with("recipe/"));
        assert!(path.ends_with(".png"));
        assert!(dir.path().join(&path).exists());
    }

    #[test]
    fn remove_is_idempotent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FsImageStore::open(dir.path()).expect("open");

        let path = store.save("jpg", b"bytes").expect("save");
        store.remove(&path).expect("remove");
        assert!(!dir.path().join(&path).exists());
        store.remove(&path).expect("second remove is a no-op");
    }

    #[test]
    fn open_twice_reuses_the_root() {
        let dir = tempfile::tempdir().expect("tempdir");
        FsImageStore::open(dir.path()).expect("first open");
        FsImageStore::open(dir.path()).expect("second open");
    }
}
