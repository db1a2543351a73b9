//! File documents and the listing view model.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Document,
    Image,
    Video,
    Audio,
    #[serde(other)]
    Other,
}

impl FileType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::Image => "image",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Other => "other",
        }
    }
}

/// A document in the files collection. Unknown attributes are ignored.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    #[serde(rename = "$id")]
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub file_type: FileType,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub extension: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub account_id: String,
    #[serde(default)]
    pub users: Vec<String>,
    #[serde(default)]
    pub bucket_file_id: String,
    #[serde(rename = "$createdAt", default)]
    pub created_at: String,
    #[serde(rename = "$updatedAt", default)]
    pub updated_at: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FilesPage {
    pub title: String,
    /// Matching documents at the provider, before any limit.
    pub total: u64,
    /// Sum of `size` over the returned files.
    pub total_size_bytes: u64,
    pub files: Vec<FileRecord>,
}
