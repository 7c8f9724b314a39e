//! The upload relay: multipart in, contents API commit out.

use std::{fmt::Display, sync::Arc};

use axum::{
    body::Bytes,
    extract::{multipart::MultipartRejection, Extension, Multipart},
    Json,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{DateTime, Local, TimeZone};
use reqwest::{
    header::{AUTHORIZATION, CONTENT_TYPE},
    Client,
};

use crate::{
    config::Config,
    error::RelayError,
    models::{ContentsResponse, RelayResponse, UploadRequest},
};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";
// MWeb only ever sends JPEGs.
const FILE_EXTENSION: &str = ".jpg";


/// Everything a request handler needs: the loaded config and a pooled client.
pub struct RelayState {
    pub config: Config,
    client: Client,
}

impl RelayState {
    pub fn new(config: Config) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            config,
        })
    }

    /// Commits `upload` through the contents API and returns the file's public URL.
    pub async fn put_to_contents_api(&self, upload: &UploadRequest) -> Result<String, RelayError> {
        let body = serde_json::to_vec(upload).map_err(RelayError::Encode)?;

        let response = self.client
            .put(self.config.contents_url(&upload.path))
            .header(AUTHORIZATION, format!("token {}", self.config.token))
            .header(CONTENT_TYPE, "application/json;charset=utf-8")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(RelayError::UpstreamStatus { status, detail })
        }

        let raw = response.bytes().await?;
        let contents: ContentsResponse = serde_json::from_slice(&raw)
            .map_err(RelayError::Decode)?;

        contents.download_url().ok_or(RelayError::MissingDownloadUrl)
    }
}


pub fn timestamp<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    now.format(TIMESTAMP_FORMAT).to_string()
}

pub fn staged_path(timestamp: &str) -> String {
    format!("{}{}", timestamp, FILE_EXTENSION)
}

pub fn encode_content(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

pub fn build_upload_request<Tz: TimeZone>(
    config: &Config,
    bytes: &[u8],
    now: &DateTime<Tz>,
) -> UploadRequest
where
    Tz::Offset: Display,
{
    let timestamp = timestamp(now);
    UploadRequest {
        branch: config.branch.clone(),
        message: format!("upload file {}", timestamp),
        content: encode_content(bytes),
        path: staged_path(&timestamp),
    }
}


async fn read_field(
    multipart: Result<Multipart, MultipartRejection>,
    name: &str,
) -> Result<Bytes, RelayError> {
    let mut multipart = multipart.map_err(|err| RelayError::Form(err.to_string()))?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| RelayError::Form(err.to_string()))?
    {
        if field.name() == Some(name) {
            return field.bytes()
                .await
                .map_err(|err| RelayError::Form(err.to_string()))
        }
    }

    Err(RelayError::MissingField(name.to_string()))
}


pub async fn handle_upload(
    Extension(state): Extension<Arc<RelayState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<RelayResponse>, RelayError> {
    // any method on the configured route; failures still answer 200 with status "false"

    let bytes = read_field(multipart, &state.config.param_name).await?;
    let upload = build_upload_request(&state.config, &bytes, &Local::now());
    tracing::info!(path = %upload.path, size = bytes.len(), "Relaying upload");

    let download_url = state.put_to_contents_api(&upload).await?;
    tracing::info!(%download_url, "Upload committed");

    Ok(Json(RelayResponse::success(download_url)))
}
