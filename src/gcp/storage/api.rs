use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, StreamExt, TryStreamExt};

use super::resources::acl::ObjectAccessControl;
use super::resources::bucket::{Bucket, Buckets, BucketsListRequest, NewBucket};
use super::resources::object::{Object, Objects, ObjectsListRequest, PartialObject};
use super::StorageResult;

/// Byte source for object uploads, typically a framed read over a local
/// file. The underlying handle travels with the stream and is released
/// when the stream is dropped.
pub type ByteStream =
    Pin<Box<dyn Stream<Item = std::io::Result<Bytes>> + Send + Sync + 'static>>;

/// One method per storage JSON API call used by the demo. Listings are
/// page-level, see [`all_buckets`] and [`all_objects`] for the lazy
/// page-following streams.
#[async_trait]
pub trait StorageApi {
    async fn get_bucket(&self, name: &str) -> StorageResult<Bucket>;

    async fn insert_bucket(&self, project: &str, bucket: &NewBucket) -> StorageResult<Bucket>;

    async fn list_buckets(
        &self,
        project: &str,
        request: &BucketsListRequest,
    ) -> StorageResult<Buckets>;

    async fn delete_bucket(&self, name: &str) -> StorageResult<()>;

    async fn upload_object(&self, object: &Object, source: ByteStream)
        -> StorageResult<PartialObject>;

    async fn get_object(&self, object: &Object, fields: &str) -> StorageResult<PartialObject>;

    async fn list_objects(
        &self,
        bucket: &str,
        request: &ObjectsListRequest,
    ) -> StorageResult<Objects>;

    async fn delete_object(&self, object: &Object) -> StorageResult<()>;

    async fn insert_object_acl(
        &self,
        object: &Object,
        acl: &ObjectAccessControl,
    ) -> StorageResult<ObjectAccessControl>;

    async fn get_object_acl(
        &self,
        object: &Object,
        entity: &str,
    ) -> StorageResult<ObjectAccessControl>;
}

/// Lazy buckets.list stream, one page per remote call until no
/// continuation token remains.
pub fn all_buckets<'a, S>(
    storage: &'a S,
    project: &str,
    request: &BucketsListRequest,
) -> impl Stream<Item = StorageResult<Bucket>> + 'a
where
    S: StorageApi + Sync + ?Sized,
{
    let request = request.to_owned();
    let project = project.to_owned();
    futures::stream::try_unfold((Some(request), project), move |(state, project)| async move {
        match state {
            None => Ok(None),
            Some(state) => {
                let page = storage.list_buckets(&project, &state).await?;
                let items = futures::stream::iter(page.items).map(Ok);
                let next = page.next_page_token.map(|page_token| BucketsListRequest {
                    page_token: Some(page_token),
                    ..state
                });
                Ok(Some((items, (next, project))))
            }
        }
    })
    .try_flatten()
}

/// Lazy objects.list stream over one bucket, same pagination contract as
/// [`all_buckets`].
pub fn all_objects<'a, S>(
    storage: &'a S,
    bucket: &str,
    request: &ObjectsListRequest,
) -> impl Stream<Item = StorageResult<PartialObject>> + 'a
where
    S: StorageApi + Sync + ?Sized,
{
    let request = request.to_owned();
    let bucket = bucket.to_owned();
    futures::stream::try_unfold((Some(request), bucket), move |(state, bucket)| async move {
        match state {
            None => Ok(None),
            Some(state) => {
                let page = storage.list_objects(&bucket, &state).await?;
                let items = futures::stream::iter(page.items).map(Ok);
                let next = page.next_page_token.map(|page_token| ObjectsListRequest {
                    page_token: Some(page_token),
                    ..state
                });
                Ok(Some((items, (next, bucket))))
            }
        }
    })
    .try_flatten()
}
