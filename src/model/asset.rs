//! Asset library records

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::numeric::AssetId;
use crate::format::Percent;

/// A file stored in the organization's asset library.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: AssetId,

    /// Display name, also used as the download file name
    pub name: String,

    pub content_type: String,

    /// Size in bytes as reported by the backend
    pub size: u64,

    /// Binary payload. Listings leave it empty; `fetch_asset` fills it.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data: Vec<u8>,

    /// Visibility only changes which listing returns the asset, not its id.
    pub is_public: bool,

    #[serde(default)]
    pub tags: BTreeSet<String>,

    /// Principal of the uploader
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploaded_by: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploaded_at: Option<DateTime<Utc>>,
}

impl Asset {
    /// Human readable visibility label
    pub fn visibility(&self) -> &'static str {
        if self.is_public {
            "Public"
        } else {
            "Private"
        }
    }

    /// Copy of this record without its payload, as a listing would return it.
    pub fn without_payload(&self) -> Asset {
        Asset {
            data: Vec::new(),
            ..self.clone()
        }
    }
}

/// A file chosen for upload
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            data,
        }
    }

    /// Read a file from disk, guessing its content type from the extension.
    pub async fn from_path(path: &std::path::Path) -> crate::error::Result<Self> {
        let data = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .ok_or_else(|| {
                crate::error::Error::InvalidInput(format!(
                    "path {} has no file name",
                    path.display()
                ))
            })?;
        let content_type = content_type_for(&name).to_string();
        Ok(Self {
            name,
            content_type,
            data,
        })
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// Best-effort content type from a file name's extension.
pub fn content_type_for(name: &str) -> &'static str {
    let ext = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        "pdf" => "application/pdf",
        "json" => "application/json",
        "txt" | "log" => "text/plain",
        "md" => "text/markdown",
        "csv" => "text/csv",
        "html" | "htm" => "text/html",
        "zip" => "application/zip",
        "mp4" => "video/mp4",
        "mp3" => "audio/mpeg",
        _ => "application/octet-stream",
    }
}

/// Storage quota report for the organization's asset space.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageStats {
    pub total_assets: u64,
    pub storage_used: u64,
    pub storage_available: u64,
    pub storage_limit: u64,
    pub average_file_size: u64,
}

impl StorageStats {
    /// Share of the configured limit in use. A zero limit reads as 0%.
    pub fn utilization(&self) -> Percent {
        Percent::ratio(u128::from(self.storage_used), u128::from(self.storage_limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utilization_half_used() {
        let stats = StorageStats {
            storage_used: 512,
            storage_limit: 1024,
            ..Default::default()
        };
        assert_eq!(stats.utilization().value(), 50);
    }

    #[test]
    fn test_utilization_zero_limit_is_zero() {
        let stats = StorageStats {
            storage_used: 512,
            storage_limit: 0,
            ..Default::default()
        };
        assert_eq!(stats.utilization().value(), 0);
    }

    #[test]
    fn test_utilization_over_limit_is_clamped() {
        let stats = StorageStats {
            storage_used: 3000,
            storage_limit: 1024,
            ..Default::default()
        };
        assert_eq!(stats.utilization().value(), 100);
    }

    #[test]
    fn test_asset_deserializes_backend_shape() {
        let asset: Asset = serde_json::from_value(serde_json::json!({
            "id": "17",
            "name": "logo.png",
            "contentType": "image/png",
            "size": 2048,
            "isPublic": true,
            "tags": ["brand", "logo", "brand"]
        }))
        .unwrap();

        assert_eq!(asset.id, AssetId(17));
        assert_eq!(asset.tags.len(), 2);
        assert!(asset.data.is_empty());
        assert_eq!(asset.visibility(), "Public");
    }

    #[test]
    fn test_content_type_guess() {
        assert_eq!(content_type_for("Report.PDF"), "application/pdf");
        assert_eq!(content_type_for("noext"), "application/octet-stream");
    }
}
