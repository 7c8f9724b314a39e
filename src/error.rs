//! Error types for startup configuration and the upload relay

use std::{io, path::PathBuf};

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use reqwest::StatusCode;
use thiserror::Error;

use crate::models::RelayResponse;

/// Errors raised while loading the configuration file. All of them abort startup.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to open config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to decode config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("route `{0}` must start with '/'")]
    InvalidRoute(String),

    #[error("timeoutSecs must be greater than zero")]
    ZeroTimeout,
}

/// Errors raised while relaying a single upload
#[derive(Error, Debug)]
pub enum RelayError {
    /// Request body is not a readable multipart form
    #[error("multipart form could not be read: {0}")]
    Form(String),

    /// Form has no part with the configured name
    #[error("multipart form has no `{0}` field")]
    MissingField(String),

    #[error("failed to encode upload request: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("request to contents API failed: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("contents API answered {status}: {detail}")]
    UpstreamStatus { status: StatusCode, detail: String },

    #[error("contents API reply is not the expected JSON: {0}")]
    Decode(#[source] serde_json::Error),

    /// Upstream reply has no `content.download_url`
    #[error("contents API reply has no download url")]
    MissingDownloadUrl,
}

impl RelayError {
    /// Message shown to the uploading client. The cause stays in the server log.
    pub fn info(&self) -> &'static str {
        match self {
            Self::Form(_) | Self::MissingField(_) => "ParseForm error",
            _ => "putToGithub error",
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        match self {
            Self::Form(_) | Self::MissingField(_) => tracing::warn!("Rejected upload: {}", self),
            _ => tracing::error!("Upload relay failed: {}", self),
        }

        Json(RelayResponse::failure(self.info())).into_response()
    }
}
