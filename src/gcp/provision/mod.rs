use std::path::PathBuf;

use futures::{Stream, TryStreamExt};
use tokio_util::codec::{BytesCodec, FramedRead};

use crate::gcp::storage::{
    self, all_buckets, all_objects, Bucket, BucketsListRequest, ByteStream, NewBucket, Object,
    ObjectAccessControl, ObjectsListRequest, PartialObject, StorageApi,
};

/// Everything the demo needs, built once at startup and passed by
/// reference into the provisioning and cleanup phases.
#[derive(Debug, Clone)]
pub struct ProvisionConfig {
    pub project: String,
    pub bucket: String,
    pub object: String,
    pub source: PathBuf,
    /// Entity granted read access on the uploaded object, `None` skips
    /// the grant and read-back steps.
    pub reader_entity: Option<String>,
}

impl ProvisionConfig {
    /// Name validation only, no remote call involved.
    pub fn validate(&self) -> ProvisionResult<()> {
        self.object_ref().map(|_| ())
    }

    fn object(&self) -> storage::StorageResult<Object> {
        Object::new(&self.bucket, &self.object)
    }

    fn object_ref(&self) -> ProvisionResult<Object> {
        self.object().map_err(ProvisionError::InvalidObject)
    }
}

#[derive(Debug)]
pub enum ProvisionError {
    InvalidObject(storage::Error),
    BucketCreation {
        bucket: String,
        error: storage::Error,
    },
    BucketListing {
        project: String,
        error: storage::Error,
    },
    SourceFile {
        path: PathBuf,
        error: std::io::Error,
    },
    ObjectUpload {
        object: String,
        error: storage::Error,
    },
    ObjectListing {
        bucket: String,
        error: storage::Error,
    },
    AclGrant {
        object: String,
        entity: String,
        error: storage::Error,
    },
    AclFetch {
        object: String,
        entity: String,
        error: storage::Error,
    },
    ObjectInfo {
        object: String,
        error: storage::Error,
    },
}

impl std::fmt::Display for ProvisionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for ProvisionError {}

pub type ProvisionResult<T> = std::result::Result<T, ProvisionError>;

#[derive(Debug)]
pub enum BucketStatus {
    Created(Bucket),
    AlreadyExists,
}

/// Create-and-populate phase: ensures the bucket, uploads the source
/// file and inspects the resulting remote state, strictly in order.
pub struct Provisioner<'a, S> {
    storage: &'a S,
    config: &'a ProvisionConfig,
}

impl<'a, S> Provisioner<'a, S>
where
    S: StorageApi + Sync,
{
    pub fn new(storage: &'a S, config: &'a ProvisionConfig) -> Self {
        Self { storage, config }
    }

    /// A reachable bucket is reused, anything else falls through to
    /// buckets.insert which reports the real failure cause.
    pub async fn ensure_bucket(&self) -> ProvisionResult<BucketStatus> {
        let bucket = &self.config.bucket;
        if self.storage.get_bucket(bucket).await.is_ok() {
            return Ok(BucketStatus::AlreadyExists);
        }

        self.storage
            .insert_bucket(&self.config.project, &NewBucket::new(bucket))
            .await
            .map(BucketStatus::Created)
            .map_err(|error| ProvisionError::BucketCreation {
                bucket: bucket.to_owned(),
                error,
            })
    }

    pub fn bucket_names(&self) -> impl Stream<Item = ProvisionResult<String>> + '_ {
        let project = self.config.project.clone();
        let request = BucketsListRequest {
            fields: Some("items(id,name),nextPageToken".to_owned()),
            ..Default::default()
        };
        all_buckets(self.storage, &project, &request)
            .map_ok(|bucket| bucket.id.or(bucket.name).unwrap_or_default())
            .map_err(move |error| ProvisionError::BucketListing {
                project: project.clone(),
                error,
            })
    }

    pub async fn upload_source(&self) -> ProvisionResult<PartialObject> {
        let object = self.config.object_ref()?;
        let path = &self.config.source;
        let file = tokio::fs::File::open(path)
            .await
            .map_err(|error| ProvisionError::SourceFile {
                path: path.to_owned(),
                error,
            })?;
        let source: ByteStream =
            Box::pin(FramedRead::new(file, BytesCodec::new()).map_ok(bytes::BytesMut::freeze));
        self.storage
            .upload_object(&object, source)
            .await
            .map_err(|error| ProvisionError::ObjectUpload {
                object: object.gs_url(),
                error,
            })
    }

    pub fn object_names(&self) -> impl Stream<Item = ProvisionResult<String>> + '_ {
        let bucket = self.config.bucket.clone();
        let request = ObjectsListRequest {
            fields: Some("items(name),nextPageToken".to_owned()),
            ..Default::default()
        };
        all_objects(self.storage, &bucket, &request)
            .map_ok(|object| object.name.unwrap_or_default())
            .map_err(move |error| ProvisionError::ObjectListing {
                bucket: bucket.clone(),
                error,
            })
    }

    pub async fn grant_reader(&self) -> ProvisionResult<Option<ObjectAccessControl>> {
        let entity = match &self.config.reader_entity {
            None => return Ok(None),
            Some(entity) => entity,
        };
        let object = self.config.object_ref()?;
        self.storage
            .insert_object_acl(&object, &ObjectAccessControl::reader(entity))
            .await
            .map(Some)
            .map_err(|error| ProvisionError::AclGrant {
                object: object.gs_url(),
                entity: entity.to_owned(),
                error,
            })
    }

    pub async fn fetch_grant(&self) -> ProvisionResult<Option<ObjectAccessControl>> {
        let entity = match &self.config.reader_entity {
            None => return Ok(None),
            Some(entity) => entity,
        };
        let object = self.config.object_ref()?;
        self.storage
            .get_object_acl(&object, entity)
            .await
            .map(Some)
            .map_err(|error| ProvisionError::AclFetch {
                object: object.gs_url(),
                entity: entity.to_owned(),
                error,
            })
    }

    pub async fn media_link(&self) -> ProvisionResult<PartialObject> {
        let object = self.config.object_ref()?;
        self.storage
            .get_object(&object, "name,mediaLink")
            .await
            .map_err(|error| ProvisionError::ObjectInfo {
                object: object.gs_url(),
                error,
            })
    }
}

#[derive(Debug)]
pub enum CleanupOutcome {
    Deleted,
    Failed(storage::Error),
}

impl CleanupOutcome {
    pub fn is_deleted(&self) -> bool {
        matches!(self, CleanupOutcome::Deleted)
    }
}

#[derive(Debug)]
pub struct CleanupReport {
    pub object: CleanupOutcome,
    pub bucket: CleanupOutcome,
}

impl CleanupReport {
    /// Only the bucket deletion decides the overall cleanup outcome, a
    /// failed object deletion is reported but never escalated.
    pub fn succeeded(&self) -> bool {
        self.bucket.is_deleted()
    }
}

/// Guaranteed-cleanup phase: deletes the demo object then the bucket,
/// best effort, each attempted exactly once per invocation. Safe to run
/// when some or all of the resources were never created.
pub struct Restorer<'a, S> {
    storage: &'a S,
    config: &'a ProvisionConfig,
}

impl<'a, S> Restorer<'a, S>
where
    S: StorageApi + Sync,
{
    pub fn new(storage: &'a S, config: &'a ProvisionConfig) -> Self {
        Self { storage, config }
    }

    pub async fn restore(&self) -> CleanupReport {
        let config = self.config;
        let object = match config.object() {
            Ok(object) => match self.storage.delete_object(&object).await {
                Ok(()) => CleanupOutcome::Deleted,
                Err(error) => CleanupOutcome::Failed(error),
            },
            Err(error) => CleanupOutcome::Failed(error),
        };
        match &object {
            CleanupOutcome::Deleted => println!(
                "Successfully deleted {}/{} during cleanup.",
                config.bucket, config.object
            ),
            // an undeleted object usually makes the bucket deletion fail too
            CleanupOutcome::Failed(error) => {
                println!("Could not delete object during cleanup: {}", error)
            }
        }

        let bucket = match self.storage.delete_bucket(&config.bucket).await {
            Ok(()) => CleanupOutcome::Deleted,
            Err(error) => CleanupOutcome::Failed(error),
        };
        match &bucket {
            CleanupOutcome::Deleted => println!(
                "Successfully deleted bucket {} during cleanup.",
                config.bucket
            ),
            CleanupOutcome::Failed(error) => {
                println!("Could not delete bucket during cleanup: {}", error)
            }
        }

        let report = CleanupReport { object, bucket };
        if !report.succeeded() {
            eprintln!("WARNING: Final cleanup attempt failed. Original state could not be restored.")
        }
        report
    }
}

#[derive(Debug)]
pub struct RunReport {
    pub provision: ProvisionResult<()>,
    pub cleanup: CleanupReport,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.provision.is_ok() && self.cleanup.succeeded()
    }
}

async fn provision_all<S>(provisioner: &Provisioner<'_, S>) -> ProvisionResult<()>
where
    S: StorageApi + Sync,
{
    let config = provisioner.config;

    match provisioner.ensure_bucket().await? {
        BucketStatus::Created(bucket) => println!(
            "Created bucket {} at {}",
            config.bucket,
            bucket.self_link.unwrap_or_default()
        ),
        BucketStatus::AlreadyExists => println!(
            "Bucket {} already exists - skipping bucket creation",
            config.bucket
        ),
    }

    println!("Buckets:");
    let buckets = provisioner.bucket_names();
    futures::pin_mut!(buckets);
    while let Some(id) = buckets.try_next().await? {
        println!("{}", id);
    }

    let uploaded = provisioner.upload_source().await?;
    println!(
        "Created object {} at {}",
        uploaded.name.unwrap_or_default(),
        uploaded.self_link.unwrap_or_default()
    );

    println!("Objects in bucket {}:", config.bucket);
    let objects = provisioner.object_names();
    futures::pin_mut!(objects);
    while let Some(name) = objects.try_next().await? {
        println!("{}", name);
    }

    if let Some(granted) = provisioner.grant_reader().await? {
        println!(
            "Result of inserting ACL for {}/{}: {:?}",
            config.bucket, config.object, granted
        );
        if let Some(acl) = provisioner.fetch_grant().await? {
            println!(
                "Users in group {} can access {}/{} as {}.",
                acl.entity.unwrap_or_default(),
                config.bucket,
                config.object,
                acl.role.map(|role| role.to_string()).unwrap_or_default()
            );
        }
    }

    let info = provisioner.media_link().await?;
    println!(
        "The media download link for {}/{} is {}.",
        config.bucket,
        info.name.unwrap_or_default(),
        info.media_link.unwrap_or_default()
    );

    Ok(())
}

/// Top-level driver: runs the provisioning sequence and then the
/// cleanup, on the failure path as well as at the natural end of a
/// successful run.
///
/// Example
/// ```no_run
/// use gcs_provision::{
///     provision::{self, ProvisionConfig},
///     storage::{credentials::authorizeduser, StorageService},
/// };
///
/// #[tokio::main]
/// async fn main() {
///     let config = ProvisionConfig {
///         project: "my-project".to_owned(),
///         bucket: "my-demo-bucket".to_owned(),
///         object: "english-dictionary".to_owned(),
///         source: "/usr/share/dict/words".into(),
///         reader_entity: Some("allUsers".to_owned()),
///     };
///
///     let token_generator = authorizeduser::default().await.unwrap();
///     let storage = StorageService::new(token_generator).await.unwrap();
///
///     let report = provision::run(&storage, &config).await;
///     assert!(report.is_success());
/// }
/// ```
pub async fn run<S>(storage: &S, config: &ProvisionConfig) -> RunReport
where
    S: StorageApi + Sync,
{
    let provisioner = Provisioner::new(storage, config);
    let provision = provision_all(&provisioner).await;
    if let Err(error) = &provision {
        eprintln!("Provisioning failed: {}", error);
    }

    let cleanup = Restorer::new(storage, config).restore().await;
    RunReport { provision, cleanup }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ProvisionConfig {
        ProvisionConfig {
            project: "p1".to_owned(),
            bucket: "b1".to_owned(),
            object: "english-dictionary".to_owned(),
            source: PathBuf::from("/usr/share/dict/words"),
            reader_entity: Some("allUsers".to_owned()),
        }
    }

    #[test]
    fn test_config_validation() {
        assert!(config().validate().is_ok());

        let invalid = ProvisionConfig {
            object: ".".to_owned(),
            ..config()
        };
        assert!(matches!(
            invalid.validate().unwrap_err(),
            ProvisionError::InvalidObject(storage::Error::GcsInvalidObjectName)
        ));
    }

    #[test]
    fn test_source_file_error_names_the_path() {
        let error = ProvisionError::SourceFile {
            path: PathBuf::from("/no/such/words.txt"),
            error: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        let message = format!("{}", error);
        assert!(
            message.contains("/no/such/words.txt"),
            "path missing in {}",
            message
        );
    }

    #[test]
    fn test_cleanup_report_ignores_object_failure() {
        let report = CleanupReport {
            object: CleanupOutcome::Failed(storage::Error::GcsResourceNotFound {
                url: "url".to_owned(),
            }),
            bucket: CleanupOutcome::Deleted,
        };
        assert!(report.succeeded());
    }

    #[test]
    fn test_cleanup_report_escalates_bucket_failure() {
        let report = CleanupReport {
            object: CleanupOutcome::Deleted,
            bucket: CleanupOutcome::Failed(storage::Error::GcsResourceNotFound {
                url: "url".to_owned(),
            }),
        };
        assert!(!report.succeeded());
    }

    #[test]
    fn test_run_report_success_needs_both_phases() {
        let ok = RunReport {
            provision: Ok(()),
            cleanup: CleanupReport {
                object: CleanupOutcome::Deleted,
                bucket: CleanupOutcome::Deleted,
            },
        };
        assert!(ok.is_success());

        let failed_provision = RunReport {
            provision: Err(ProvisionError::InvalidObject(
                storage::Error::GcsInvalidObjectName,
            )),
            cleanup: CleanupReport {
                object: CleanupOutcome::Deleted,
                bucket: CleanupOutcome::Deleted,
            },
        };
        assert!(!failed_provision.is_success());
    }
}
