use serde::{Serialize, Deserialize};

/// Body of the `PUT /repos/{repo}/contents/{path}` call.
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadRequest {
    pub branch: String,
    pub message: String,
    pub content: String,
    pub path: String,
}

/// Envelope returned to the uploading client. The HTTP status is always 200,
/// the outcome lives in `status`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RelayResponse {
    pub status: String,
    pub download_url: String,
    pub info: String,
}

impl RelayResponse {
    pub const SUCCESS: &str = "success";
    pub const FAILURE: &str = "false";

    pub fn success(download_url: String) -> Self {
        Self {
            status: Self::SUCCESS.to_string(),
            download_url,
            info: "success".to_string(),
        }
    }

    pub fn failure(info: &str) -> Self {
        Self {
            status: Self::FAILURE.to_string(),
            download_url: String::new(),
            info: info.to_string(),
        }
    }
}

/// The part of the contents API reply we care about.
#[derive(Debug, Deserialize)]
pub struct ContentsResponse {
    pub content: Option<ContentInfo>,
}

#[derive(Debug, Deserialize)]
pub struct ContentInfo {
    pub download_url: Option<String>,
}

impl ContentsResponse {
    pub fn download_url(self) -> Option<String> {
        self.content
            .and_then(|content| content.download_url)
            .filter(|url| !url.is_empty())
    }
}
