pub mod auth;
pub mod provision;
pub mod storage;

const USER_AGENT: &str = concat!("gcs-provision/", env!("CARGO_PKG_VERSION"));

pub struct Client {
    pub(self) client: reqwest::Client,
}

#[derive(Debug, serde::Deserialize)]
#[serde(untagged)]
enum DeserializedResponse<T> {
    Success(T),
    Error(serde_json::Value),
}

impl<T> DeserializedResponse<T> {
    pub fn into_result(self) -> Result<T, serde_json::Value> {
        match self {
            DeserializedResponse::Success(x) => Ok(x),
            DeserializedResponse::Error(e) => Err(e),
        }
    }
}

impl Default for Client {
    fn default() -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client }
    }
}
