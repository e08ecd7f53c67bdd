use async_trait::async_trait;
use bytes::Bytes;
use object_store::path::Path as ObjectPath;
use object_store::{Attribute, Attributes, ObjectStore, PutOptions, PutPayload, PutResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::config::ConfigError;

pub mod filesystem;
pub mod memory;
pub mod s3;

pub use filesystem::FilesystemBuckets;
pub use memory::MemoryBuckets;
pub use s3::S3Buckets;

/// Error type for storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("unknown bucket: {0}")]
    UnknownBucket(String),

    #[error("invalid object key: {0}")]
    InvalidKey(#[from] object_store::path::Error),

    #[error("object key {0:?} does not map to an object path verbatim")]
    UnalignedKey(String),

    #[error("object store error: {0}")]
    ObjectStore(#[from] object_store::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// A bucket plus object key in blob storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlobLocation {
    pub bucket: String,
    pub key: String,
}

impl BlobLocation {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Object path for the key. Keys that the store would normalize into a
    /// different object (leading or trailing `/`) are rejected.
    pub fn object_path(&self) -> StorageResult<ObjectPath> {
        let path = ObjectPath::parse(&self.key)?;
        if path.as_ref() != self.key {
            return Err(StorageError::UnalignedKey(self.key.clone()));
        }
        Ok(path)
    }
}

impl fmt::Display for BlobLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s3://{}/{}", self.bucket, self.key)
    }
}

/// Resolves bucket names to object stores and performs whole-object GET/PUT.
///
/// Implementations only decide where a bucket lives; the read and write paths
/// are shared by every backend.
#[async_trait]
pub trait BucketResolver: Send + Sync + fmt::Debug {
    /// Object store serving `bucket`.
    fn store_for(&self, bucket: &str) -> StorageResult<Arc<dyn ObjectStore>>;

    /// Whether PUT may carry object attributes such as content type.
    /// Defaults to true; backends without attribute support opt out.
    fn supports_attributes(&self) -> bool {
        true
    }

    /// Make `bucket` ready to receive objects. Called only on the write path.
    fn prepare_bucket(&self, _bucket: &str) -> StorageResult<()> {
        Ok(())
    }

    /// Read the whole object at `location`.
    async fn get_bytes(&self, location: &BlobLocation) -> StorageResult<Bytes> {
        let store = self.store_for(&location.bucket)?;
        let result = store.get(&location.object_path()?).await?;
        Ok(result.bytes().await?)
    }

    /// Write `body` as the whole object at `location`.
    async fn put_bytes(
        &self,
        location: &BlobLocation,
        body: Vec<u8>,
        content_type: &'static str,
    ) -> StorageResult<PutResult> {
        self.prepare_bucket(&location.bucket)?;
        let store = self.store_for(&location.bucket)?;
        let mut opts = PutOptions::default();
        if self.supports_attributes() {
            opts.attributes = Attributes::from_iter([(Attribute::ContentType, content_type)]);
        }
        let result = store
            .put_opts(&location.object_path()?, PutPayload::from(body), opts)
            .await?;
        Ok(result)
    }
}

/// Configuration for storage backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_backend")]
    pub backend: String,
    #[serde(default)]
    pub options: HashMap<String, serde_json::Value>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            options: HashMap::new(),
        }
    }
}

fn default_backend() -> String {
    "s3".to_string()
}

impl StorageConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.backend.as_str() {
            "s3" => Ok(()),
            "filesystem" => self.option_str("path").map(|_| ()),
            other => Err(ConfigError::UnknownBackend(other.to_string())),
        }
    }

    fn option_str(&self, name: &'static str) -> Result<&str, ConfigError> {
        self.options
            .get(name)
            .and_then(|v| v.as_str())
            .ok_or(ConfigError::MissingStorageOption(name))
    }

    fn optional_str(&self, name: &str) -> Option<String> {
        self.options
            .get(name)
            .and_then(|v| v.as_str())
            .map(str::to_string)
    }
}

/// Create a bucket resolver from configuration. No storage calls are made
/// here; stores are opened per bucket on first use.
pub fn create_bucket_resolver(config: &StorageConfig) -> Result<Box<dyn BucketResolver>, ConfigError> {
    config.validate()?;
    match config.backend.as_str() {
        "filesystem" => {
            let root = config.option_str("path")?;
            Ok(Box::new(FilesystemBuckets::new(root)))
        }
        "s3" => {
            let allow_http = config
                .options
                .get("allow_http")
                .and_then(|v| v.as_bool())
                .unwrap_or(false);
            Ok(Box::new(S3Buckets {
                region: config.optional_str("region"),
                endpoint: config.optional_str("endpoint"),
                allow_http,
            }))
        }
        other => Err(ConfigError::UnknownBackend(other.to_string())),
    }
}
