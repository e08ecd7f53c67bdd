use async_trait::async_trait;
use object_store::aws::AmazonS3Builder;
use object_store::ObjectStore;
use std::sync::Arc;

use crate::storage::{BucketResolver, StorageResult};

/// Amazon S3 (or any S3-compatible endpoint). Credentials and region default
/// to the ambient `AWS_*` environment of the task.
#[derive(Debug, Clone, Default)]
pub struct S3Buckets {
    pub region: Option<String>,
    pub endpoint: Option<String>,
    pub allow_http: bool,
}

#[async_trait]
impl BucketResolver for S3Buckets {
    fn store_for(&self, bucket: &str) -> StorageResult<Arc<dyn ObjectStore>> {
        let mut builder = AmazonS3Builder::from_env()
            .with_bucket_name(bucket)
            .with_allow_http(self.allow_http);
        if let Some(region) = &self.region {
            builder = builder.with_region(region);
        }
        if let Some(endpoint) = &self.endpoint {
            builder = builder.with_endpoint(endpoint);
        }
        Ok(Arc::new(builder.build()?))
    }
}
