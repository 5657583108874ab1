use async_trait::async_trait;

use super::api::{ByteStream, StorageApi};
use super::client::StorageClient;
use super::resources::acl::ObjectAccessControl;
use super::resources::bucket::{self, Bucket, Buckets, BucketsListRequest, NewBucket};
use super::resources::object::{self, Object, Objects, ObjectsListRequest, PartialObject};
use super::StorageResult;
use crate::gcp::auth::token::TokenGenerator;

const NO_QUERY: [(&str, &str); 0] = [];

/// [`StorageApi`] implementation over the storage JSON API v1.
pub struct StorageService<T> {
    client: StorageClient<T>,
}

impl<T: TokenGenerator> StorageService<T> {
    pub async fn new(token_generator: T) -> StorageResult<Self> {
        Ok(Self {
            client: StorageClient::new(token_generator).await?,
        })
    }
}

#[async_trait]
impl<T: TokenGenerator> StorageApi for StorageService<T> {
    async fn get_bucket(&self, name: &str) -> StorageResult<Bucket> {
        self.client
            .get_as_json(&bucket::bucket_url(name), &NO_QUERY)
            .await
    }

    async fn insert_bucket(&self, project: &str, bucket: &NewBucket) -> StorageResult<Bucket> {
        self.client
            .post_as_json(&bucket::buckets_url(project), bucket)
            .await
    }

    async fn list_buckets(
        &self,
        project: &str,
        request: &BucketsListRequest,
    ) -> StorageResult<Buckets> {
        self.client
            .get_as_json(&bucket::buckets_url(project), request)
            .await
    }

    async fn delete_bucket(&self, name: &str) -> StorageResult<()> {
        self.client.delete(&bucket::bucket_url(name)).await
    }

    async fn upload_object(
        &self,
        object: &Object,
        source: ByteStream,
    ) -> StorageResult<PartialObject> {
        self.client
            .post_media(&object.upload_url("media"), source)
            .await
    }

    async fn get_object(&self, object: &Object, fields: &str) -> StorageResult<PartialObject> {
        self.client
            .get_as_json(&object.url(), &[("fields", fields)])
            .await
    }

    async fn list_objects(
        &self,
        bucket: &str,
        request: &ObjectsListRequest,
    ) -> StorageResult<Objects> {
        self.client
            .get_as_json(&object::objects_url(bucket), request)
            .await
    }

    async fn delete_object(&self, object: &Object) -> StorageResult<()> {
        self.client.delete(&object.url()).await
    }

    async fn insert_object_acl(
        &self,
        object: &Object,
        acl: &ObjectAccessControl,
    ) -> StorageResult<ObjectAccessControl> {
        self.client.post_as_json(&object.acls_url(), acl).await
    }

    async fn get_object_acl(
        &self,
        object: &Object,
        entity: &str,
    ) -> StorageResult<ObjectAccessControl> {
        self.client
            .get_as_json(&object.acl_url(entity), &NO_QUERY)
            .await
    }
}
