use super::{Error, StorageResult};
use crate::gcp::{
    auth::token::{AccessToken, Token, TokenGenerator},
    Client, DeserializedResponse,
};
use futures::TryStream;
use reqwest::RequestBuilder;
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::RwLock;

pub(super) struct StorageClient<T> {
    client: Client,
    token_generator: T,
    token: RwLock<Token>,
}

impl<T: TokenGenerator> StorageClient<T> {
    pub async fn new(token_generator: T) -> StorageResult<Self> {
        let client = Client::default();
        let token = token_generator
            .get(&client)
            .await
            .map_err(Error::GcsTokenError)?;
        Ok(Self {
            client,
            token_generator,
            token: RwLock::new(token),
        })
    }

    async fn cached_token(&self) -> Option<AccessToken> {
        let t = self.token.read().await;

        if t.is_valid() {
            Some(t.access_token())
        } else {
            None
        }
    }

    async fn refresh_token(&self) -> StorageResult<AccessToken> {
        if let Some(token) = self.cached_token().await {
            Ok(token)
        } else {
            let t = self
                .token_generator
                .get(&self.client)
                .await
                .map_err(Error::GcsTokenError)?;
            let access_token = t.access_token();
            *self.token.write().await = t;
            Ok(access_token)
        }
    }

    async fn with_auth(&self, request_builder: RequestBuilder) -> StorageResult<RequestBuilder> {
        Ok(request_builder.bearer_auth(self.refresh_token().await?))
    }

    async fn success_response(
        url: &str,
        response: reqwest::Response,
    ) -> StorageResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::GcsResourceNotFound {
                url: url.to_owned(),
            });
        }

        let err = response.text().await.map_err(Error::GcsHttpError)?;
        Err(Error::gcs_unexpected_response_error(url, err))
    }

    async fn read_json<R>(url: &str, response: reqwest::Response) -> StorageResult<R>
    where
        R: DeserializeOwned,
    {
        let r: DeserializedResponse<R> = response.json().await.map_err(Error::GcsHttpError)?;
        r.into_result()
            .map_err(|err| Error::gcs_unexpected_json::<R>(url, err))
    }

    pub async fn get_as_json<R, Q>(&self, url: &str, query: &Q) -> StorageResult<R>
    where
        R: DeserializeOwned,
        Q: Serialize,
    {
        let request = self
            .with_auth(self.client.client.get(url).query(query))
            .await?;
        let response = request.send().await.map_err(Error::GcsHttpError)?;
        let response = Self::success_response(url, response).await?;
        Self::read_json(url, response).await
    }

    pub async fn post_as_json<B, R>(&self, url: &str, body: &B) -> StorageResult<R>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let request = self.with_auth(self.client.client.post(url).json(body)).await?;
        let response = request.send().await.map_err(Error::GcsHttpError)?;
        let response = Self::success_response(url, response).await?;
        Self::read_json(url, response).await
    }

    pub async fn post_media<S, R>(&self, url: &str, body: S) -> StorageResult<R>
    where
        S: TryStream + Send + Sync + 'static,
        S::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
        bytes::Bytes: From<S::Ok>,
        R: DeserializeOwned,
    {
        let request = self.with_auth(self.client.client.post(url)).await?;
        let response = request
            .body(reqwest::Body::wrap_stream(body))
            .send()
            .await
            .map_err(Error::GcsHttpError)?;
        let response = Self::success_response(url, response).await?;
        Self::read_json(url, response).await
    }

    pub async fn delete(&self, url: &str) -> StorageResult<()> {
        let request = self.with_auth(self.client.client.delete(url)).await?;
        let response = request.send().await.map_err(Error::GcsHttpError)?;
        Self::success_response(url, response).await?;
        Ok(())
    }
}
