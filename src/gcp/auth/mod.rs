pub mod token;

/// Scope required by the demo: bucket deletion and ACL writes both need
/// full control over the storage resources.
pub const DEVSTORAGE_FULL_CONTROL_SCOPE: &str =
    "https://www.googleapis.com/auth/devstorage.full_control";

#[derive(Debug)]
pub enum Error {
    DeserializationError {
        expected_type: String,
        error: serde_json::Error,
    },
    EnvVarError {
        key: String,
        error: std::env::VarError,
    },
    IoError {
        path: std::path::PathBuf,
        error: std::io::Error,
    },
    HttpError(reqwest::Error),
    JwtError(jsonwebtoken::errors::Error),
    MissingScope,
    UnexpectedApiResponse {
        expected_type: String,
        json: serde_json::Value,
    },
}

impl Error {
    pub fn unexpected_api_response<T>(json: serde_json::Value) -> Error {
        let expected_type = std::any::type_name::<T>().to_owned();
        Error::UnexpectedApiResponse {
            expected_type,
            json,
        }
    }

    pub fn io_error<T>(path: T, error: std::io::Error) -> Error
    where
        T: AsRef<std::path::Path>,
    {
        Error::IoError {
            path: path.as_ref().to_path_buf(),
            error,
        }
    }

    pub fn env_var_error(key: &str, error: std::env::VarError) -> Error {
        Error::EnvVarError {
            key: key.to_owned(),
            error,
        }
    }

    pub fn deserialization_error<T>(error: serde_json::Error) -> Error {
        let expected_type = std::any::type_name::<T>().to_owned();
        Error::DeserializationError {
            expected_type,
            error,
        }
    }
}

pub type TokenResult<T> = std::result::Result<T, Error>;
