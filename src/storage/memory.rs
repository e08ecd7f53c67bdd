use async_trait::async_trait;
use object_store::memory::InMemory;
use object_store::ObjectStore;
use std::collections::HashMap;
use std::sync::Arc;

use crate::storage::{BucketResolver, StorageError, StorageResult};

/// In-process buckets. The set of buckets is fixed at construction, so a
/// request for any other bucket fails the way a missing remote bucket would.
#[derive(Debug, Default, Clone)]
pub struct MemoryBuckets {
    buckets: HashMap<String, Arc<InMemory>>,
}

impl MemoryBuckets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bucket(mut self, name: impl Into<String>) -> Self {
        self.buckets.insert(name.into(), Arc::new(InMemory::new()));
        self
    }

    /// Direct handle on a bucket, for seeding and inspecting objects.
    pub fn bucket(&self, name: &str) -> Option<Arc<InMemory>> {
        self.buckets.get(name).cloned()
    }
}

#[async_trait]
impl BucketResolver for MemoryBuckets {
    fn store_for(&self, bucket: &str) -> StorageResult<Arc<dyn ObjectStore>> {
        match self.buckets.get(bucket) {
            Some(store) => Ok(store.clone() as Arc<dyn ObjectStore>),
            None => Err(StorageError::UnknownBucket(bucket.to_string())),
        }
    }
}
