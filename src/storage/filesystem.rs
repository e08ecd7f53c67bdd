use async_trait::async_trait;
use object_store::local::LocalFileSystem;
use object_store::ObjectStore;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::storage::{BucketResolver, StorageError, StorageResult};

/// Filesystem-based buckets
///
/// Each bucket is a directory under `root`. Writes create it; reads never do.
#[derive(Debug, Clone)]
pub struct FilesystemBuckets {
    root: PathBuf,
}

impl FilesystemBuckets {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn bucket_path(&self, bucket: &str) -> PathBuf {
        self.root.join(bucket)
    }
}

#[async_trait]
impl BucketResolver for FilesystemBuckets {
    fn store_for(&self, bucket: &str) -> StorageResult<Arc<dyn ObjectStore>> {
        let dir = self.bucket_path(bucket);
        if !dir.is_dir() {
            return Err(StorageError::UnknownBucket(bucket.to_string()));
        }
        let store = LocalFileSystem::new_with_prefix(&dir)?;
        Ok(Arc::new(store))
    }

    fn prepare_bucket(&self, bucket: &str) -> StorageResult<()> {
        std::fs::create_dir_all(self.bucket_path(bucket))?;
        Ok(())
    }

    // LocalFileSystem rejects PUT attributes
    fn supports_attributes(&self) -> bool {
        false
    }
}
