mod api;
mod client;
mod resources;
mod service;

pub use api::{all_buckets, all_objects, ByteStream, StorageApi};
pub use resources::acl::{ObjectAccessControl, Role};
pub use resources::bucket::{Bucket, Buckets, BucketsListRequest, NewBucket};
pub use resources::object::{Object, Objects, ObjectsListRequest, PartialObject, Projection};
pub use service::StorageService;

pub mod credentials {

    pub use crate::gcp::auth::DEVSTORAGE_FULL_CONTROL_SCOPE;

    pub mod serviceaccount {

        use crate::gcp::auth::token::ServiceAccountCredentials;

        pub async fn default(
            scope: &str,
        ) -> super::super::StorageResult<ServiceAccountCredentials> {
            ServiceAccountCredentials::default()
                .await
                .map(|x| x.with_scope(scope))
                .map_err(super::super::Error::GcsTokenError)
        }

        pub fn from_str(
            str: &str,
            scope: &str,
        ) -> super::super::StorageResult<ServiceAccountCredentials> {
            ServiceAccountCredentials::from(str)
                .map(|x| x.with_scope(scope))
                .map_err(super::super::Error::GcsTokenError)
        }

        pub async fn from_file<T>(
            file_path: T,
            scope: &str,
        ) -> super::super::StorageResult<ServiceAccountCredentials>
        where
            T: AsRef<std::path::Path>,
        {
            ServiceAccountCredentials::from_file(file_path)
                .await
                .map(|x| x.with_scope(scope))
                .map_err(super::super::Error::GcsTokenError)
        }
    }

    pub mod authorizeduser {

        use crate::gcp::auth::token::AuthorizedUserCredentials;

        pub async fn default() -> super::super::StorageResult<AuthorizedUserCredentials> {
            AuthorizedUserCredentials::default()
                .await
                .map_err(super::super::Error::GcsTokenError)
        }

        pub fn from_str(str: &str) -> super::super::StorageResult<AuthorizedUserCredentials> {
            AuthorizedUserCredentials::from(str).map_err(super::super::Error::GcsTokenError)
        }

        pub async fn from_file<T>(
            file_path: T,
        ) -> super::super::StorageResult<AuthorizedUserCredentials>
        where
            T: AsRef<std::path::Path>,
        {
            AuthorizedUserCredentials::from_file(file_path)
                .await
                .map_err(super::super::Error::GcsTokenError)
        }
    }

    pub mod metadata {

        use crate::gcp::auth::token::GoogleMetadataServerCredentials;

        pub fn default() -> super::super::StorageResult<GoogleMetadataServerCredentials> {
            GoogleMetadataServerCredentials::new().map_err(super::super::Error::GcsTokenError)
        }

        pub fn with_scope(
            scope: &str,
        ) -> super::super::StorageResult<GoogleMetadataServerCredentials> {
            GoogleMetadataServerCredentials::new()
                .map(|x| x.with_scope(scope))
                .map_err(super::super::Error::GcsTokenError)
        }
    }
}

#[derive(Debug)]
pub enum Error {
    GcsTokenError(super::auth::Error),
    GcsHttpError(reqwest::Error),
    GcsUnexpectedResponse {
        url: String,
        value: String,
    },
    GcsUnexpectedJson {
        url: String,
        expected_type: String,
        json: serde_json::Value,
    },
    GcsInvalidObjectName,
    GcsResourceNotFound {
        url: String,
    },
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}
impl std::error::Error for Error {}

impl Error {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::GcsResourceNotFound { .. })
    }

    fn gcs_unexpected_response_error<T, U>(url: T, value: U) -> Self
    where
        T: AsRef<str>,
        U: AsRef<str>,
    {
        Self::GcsUnexpectedResponse {
            url: url.as_ref().to_owned(),
            value: value.as_ref().to_owned(),
        }
    }

    fn gcs_unexpected_json<T>(url: &str, json: serde_json::Value) -> Self {
        let expected_type = std::any::type_name::<T>().to_owned();
        Self::GcsUnexpectedJson {
            url: url.to_owned(),
            expected_type,
            json,
        }
    }
}

pub type StorageResult<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use crate::storage::Error;

    #[test]
    fn test_error_display() {
        let e = Error::gcs_unexpected_response_error("url", "value");
        let actual = format!("{}", e);

        assert_eq!(
            "GcsUnexpectedResponse { url: \"url\", value: \"value\" }",
            actual
        );
    }

    #[test]
    fn test_error_is_not_found() {
        let e = Error::GcsResourceNotFound {
            url: "url".to_owned(),
        };
        assert!(e.is_not_found());
        assert!(!Error::GcsInvalidObjectName.is_not_found());
    }
}
