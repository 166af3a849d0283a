use gloo_file::Blob;
use gloo_net::http::Request;
use thiserror::Error;
use web_sys::{AbortSignal, File, FormData};

use crate::config::delete_url;
use crate::{ApiResponse, FileEntry, FilesResponse, StatsSnapshot};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Network(String),
    #[error("server responded with status {0}")]
    Status(u16),
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl From<gloo_net::Error> for ClientError {
    fn from(err: gloo_net::Error) -> Self {
        Self::Network(err.to_string())
    }
}

/// Sends one file as multipart field `file`. Any HTTP response, success or
/// not, is returned as its status code.
pub async fn upload_file(url: &str, file: &File) -> Result<u16, ClientError> {
    let form_data =
        FormData::new().map_err(|e| ClientError::Network(format!("Failed to create FormData: {:?}", e)))?;
    form_data
        .append_with_blob_and_filename("file", file, &file.name())
        .map_err(|e| ClientError::Network(format!("Failed to append file to FormData: {:?}", e)))?;

    let response = Request::post(url).body(form_data)?.send().await?;
    Ok(response.status())
}

pub async fn fetch_stats(url: &str, signal: Option<&AbortSignal>) -> Result<StatsSnapshot, ClientError> {
    let response = Request::get(url).abort_signal(signal).send().await?;
    if !response.ok() {
        return Err(ClientError::Status(response.status()));
    }
    response
        .json::<StatsSnapshot>()
        .await
        .map_err(|e| ClientError::Decode(e.to_string()))
}

pub async fn fetch_files(url: &str) -> Result<Vec<FileEntry>, ClientError> {
    let response = Request::get(url).send().await?;
    if !response.ok() {
        return Err(ClientError::Status(response.status()));
    }
    response
        .json::<FilesResponse>()
        .await
        .map(|body| body.files)
        .map_err(|e| ClientError::Decode(e.to_string()))
}

/// Downloads a file into a `Blob`, keeping the served content type so the
/// browser can render it.
pub async fn fetch_blob(url: &str) -> Result<Blob, ClientError> {
    let response = Request::get(url).send().await?;
    if !response.ok() {
        return Err(ClientError::Status(response.status()));
    }
    let mime_type = response.headers().get("content-type");
    let bytes = response
        .binary()
        .await
        .map_err(|e| ClientError::Decode(e.to_string()))?;
    Ok(Blob::new_with_options(bytes.as_slice(), mime_type.as_deref()))
}

pub async fn delete_file(stored_name: &str) -> Result<ApiResponse, ClientError> {
    let response = Request::post(&delete_url(stored_name)).send().await?;
    if !response.ok() {
        return Err(ClientError::Status(response.status()));
    }
    response
        .json::<ApiResponse>()
        .await
        .map_err(|e| ClientError::Decode(e.to_string()))
}
