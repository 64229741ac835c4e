use serde::Deserialize;

use crate::error::GatewayError;

/// Arguments of the `uploadObject` tool.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    #[serde(default)]
    pub bucket_name: String,
    #[serde(default)]
    pub key: String,
    /// Raw text, base64 data or a local file path, depending on `content_format`.
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub content_type: Option<String>,
    /// One of `text` (default), `base64` or `path`.
    #[serde(default)]
    pub content_format: Option<String>,
}

impl UploadRequest {
    pub fn new(
        bucket_name: impl Into<String>,
        key: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            bucket_name: bucket_name.into(),
            key: key.into(),
            content: Some(content.into()),
            content_type: None,
            content_format: None,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_format(mut self, content_format: impl Into<String>) -> Self {
        self.content_format = Some(content_format.into());
        self
    }

    /// Checks run in order, the first failure wins.
    pub fn validate(&self) -> Result<(), GatewayError> {
        require_bucket_name(&self.bucket_name)?;
        require_key(&self.key)?;
        if self.content.is_none() {
            return Err(GatewayError::invalid("content required"));
        }
        Ok(())
    }
}

/// Arguments of the `downloadObject` tool.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DownloadRequest {
    #[serde(default)]
    pub bucket_name: String,
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub destination_path: Option<String>,
    /// `text` or `file`; absent means auto-detect.
    #[serde(default)]
    pub response_type: Option<String>,
}

impl DownloadRequest {
    pub fn new(bucket_name: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket_name: bucket_name.into(),
            key: key.into(),
            destination_path: None,
            response_type: None,
        }
    }

    pub fn with_destination(mut self, destination_path: impl Into<String>) -> Self {
        self.destination_path = Some(destination_path.into());
        self
    }

    pub fn with_response_type(mut self, response_type: impl Into<String>) -> Self {
        self.response_type = Some(response_type.into());
        self
    }

    pub fn validate(&self) -> Result<(), GatewayError> {
        require_bucket_name(&self.bucket_name)?;
        require_key(&self.key)
    }

    /// Destination path, if one was given and is not blank.
    pub fn destination(&self) -> Option<&str> {
        non_blank(self.destination_path.as_deref())
    }

    /// Response mode hint, if one was given and is not blank.
    pub fn response_hint(&self) -> Option<&str> {
        non_blank(self.response_type.as_deref())
    }
}

pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

pub(crate) fn require_bucket_name(bucket_name: &str) -> Result<(), GatewayError> {
    if bucket_name.trim().is_empty() {
        return Err(GatewayError::invalid("container name required"));
    }
    Ok(())
}

pub(crate) fn require_key(key: &str) -> Result<(), GatewayError> {
    if key.trim().is_empty() {
        return Err(GatewayError::invalid("key required"));
    }
    Ok(())
}
