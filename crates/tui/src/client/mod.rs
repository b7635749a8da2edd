use api_types::{
    auth::{Login, LoginResponse},
    record::{Record, RecordId, RecordNew},
    section::{SectionPage, SectionQuery},
};
use ledger::SyncError;
use reqwest::{RequestBuilder, Response, Url, header::AUTHORIZATION};
use serde::{Deserialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::debug;

use crate::error::{AppError, Result};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
    #[error("not found")]
    NotFound,
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("server error: {0}")]
    Server(String),
    #[error("server unreachable: {0}")]
    Transport(#[from] reqwest::Error),
}

impl From<ClientError> for SyncError {
    fn from(value: ClientError) -> Self {
        match value {
            ClientError::Unauthorized => SyncError::LoginRequired,
            other => SyncError::Request(other.to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    http: reqwest::Client,
}

impl Client {
    pub fn new(base_url: &str) -> Result<Self> {
        let mut base_url =
            Url::parse(base_url).map_err(|err| AppError::BaseUrl(err.to_string()))?;
        // Endpoints are joined relative to the base path.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            base_url,
            http: reqwest::Client::new(),
        })
    }

    /// `GET /accounts/section`: one page of the section feed.
    pub async fn sections(
        &self,
        token: &str,
        query: &SectionQuery,
    ) -> std::result::Result<SectionPage, ClientError> {
        let request = self
            .http
            .get(self.endpoint("accounts/section")?)
            .header(AUTHORIZATION, token)
            .query(query);
        json(send(request).await?).await
    }

    /// `POST /accounts`: creates a record, returning it with its id.
    pub async fn record_create(
        &self,
        token: &str,
        payload: &RecordNew,
    ) -> std::result::Result<Record, ClientError> {
        let request = self
            .http
            .post(self.endpoint("accounts")?)
            .header(AUTHORIZATION, token)
            .json(payload);
        json(send(request).await?).await
    }

    /// `POST /accounts/{id}/inactive`: soft delete. The body is ignored.
    pub async fn record_inactive(
        &self,
        token: &str,
        id: RecordId,
    ) -> std::result::Result<(), ClientError> {
        let request = self
            .http
            .post(self.endpoint(&format!("accounts/{id}/inactive"))?)
            .header(AUTHORIZATION, token);
        send(request).await?;
        Ok(())
    }

    /// `POST /authentication/login` with a form-encoded password.
    pub async fn login(&self, password: &str) -> std::result::Result<LoginResponse, ClientError> {
        let request = self
            .http
            .post(self.endpoint("authentication/login")?)
            .form(&Login {
                password: password.to_string(),
            });
        json(send(request).await?).await
    }

    fn endpoint(&self, path: &str) -> std::result::Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|err| ClientError::Server(format!("invalid endpoint {path}: {err}")))
    }
}

/// Sends `request`, mapping non-2xx statuses to [`ClientError`].
async fn send(request: RequestBuilder) -> std::result::Result<Response, ClientError> {
    let res = request.send().await?;
    let status = res.status();
    debug!(url = %res.url(), %status, "backend response");
    if status.is_success() {
        return Ok(res);
    }

    let body = res
        .json::<ErrorResponse>()
        .await
        .map(|err| err.error)
        .unwrap_or_else(|_| "unknown error".to_string());

    let err = match status.as_u16() {
        401 => ClientError::Unauthorized,
        403 => ClientError::Forbidden,
        404 => ClientError::NotFound,
        409 => ClientError::Conflict(body),
        422 => ClientError::Validation(body),
        _ => ClientError::Server(body),
    };
    Err(err)
}

async fn json<T: DeserializeOwned>(res: Response) -> std::result::Result<T, ClientError> {
    res.json::<T>().await.map_err(ClientError::Transport)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_means_login_required() {
        assert_eq!(
            SyncError::from(ClientError::Unauthorized),
            SyncError::LoginRequired
        );
        assert_eq!(
            SyncError::from(ClientError::NotFound),
            SyncError::Request("not found".to_string())
        );
    }

    #[test]
    fn rejects_invalid_base_url() {
        assert!(Client::new("not a url").is_err());
    }

    #[test]
    fn endpoints_keep_the_base_path() {
        let client = Client::new("http://127.0.0.1:3000/api").unwrap();
        assert_eq!(
            client.endpoint("accounts/section").unwrap().as_str(),
            "http://127.0.0.1:3000/api/accounts/section"
        );
    }
}
