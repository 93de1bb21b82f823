// src/core/models/content.rs
use crate::models::common::{CapsuleId, ContentId, ContentKind, TextFormat, Timestamp};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ContentMetadata {
    /// Playback length in seconds, for video/audio.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    /// SHA-256 of the stored file, for duplicate detection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_hash: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TextContentData {
    pub text: String,
    #[serde(default)]
    pub format: TextFormat,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MediaContentData {
    pub url: String,
    pub file_name: String,
    pub file_size: u64,
    pub mime_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ContentMetadata>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DocumentContentData {
    pub url: String,
    pub file_name: String,
    pub file_size: u64,
    pub mime_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ContentMetadata>,
}

/// Type-tagged content payload. The variant must agree with the owning
/// [`Content::kind`]; a text entry never carries a file size, a media entry
/// always does.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum ContentData {
    Text(TextContentData),
    Image(MediaContentData),
    Video(MediaContentData),
    Audio(MediaContentData),
    Document(DocumentContentData),
}

impl ContentData {
    pub fn kind(&self) -> ContentKind {
        match self {
            ContentData::Text(_) => ContentKind::Text,
            ContentData::Image(_) => ContentKind::Image,
            ContentData::Video(_) => ContentKind::Video,
            ContentData::Audio(_) => ContentKind::Audio,
            ContentData::Document(_) => ContentKind::Document,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, ContentData::Text(_))
    }

    pub fn is_media(&self) -> bool {
        matches!(
            self,
            ContentData::Image(_) | ContentData::Video(_) | ContentData::Audio(_)
        )
    }

    pub fn is_document(&self) -> bool {
        matches!(self, ContentData::Document(_))
    }

    /// File size of the stored payload, if this variant carries one.
    pub fn file_size(&self) -> Option<u64> {
        match self {
            ContentData::Text(_) => None,
            ContentData::Image(m) | ContentData::Video(m) | ContentData::Audio(m) => {
                Some(m.file_size)
            }
            ContentData::Document(d) => Some(d.file_size),
        }
    }

    /// Checksum previously recorded for the stored file, if any.
    pub fn file_hash(&self) -> Option<&str> {
        let metadata = match self {
            ContentData::Text(_) => return None,
            ContentData::Image(m) | ContentData::Video(m) | ContentData::Audio(m) => &m.metadata,
            ContentData::Document(d) => &d.metadata,
        };
        metadata.as_ref().and_then(|m| m.file_hash.as_deref())
    }

    /// Records the checksum of the stored file in the payload's metadata,
    /// creating the metadata block if absent. Returns false for text
    /// payloads, which carry no file.
    pub fn set_file_hash(&mut self, hash: String) -> bool {
        let metadata = match self {
            ContentData::Text(_) => return false,
            ContentData::Image(m) | ContentData::Video(m) | ContentData::Audio(m) => {
                &mut m.metadata
            }
            ContentData::Document(d) => &mut d.metadata,
        };
        metadata.get_or_insert_with(ContentMetadata::default).file_hash = Some(hash);
        true
    }

    /// MIME type of the stored payload, if this variant carries one.
    pub fn mime_type(&self) -> Option<&str> {
        match self {
            ContentData::Text(_) => None,
            ContentData::Image(m) | ContentData::Video(m) | ContentData::Audio(m) => {
                Some(m.mime_type.as_str())
            }
            ContentData::Document(d) => Some(d.mime_type.as_str()),
        }
    }
}

/// A content item document as stored in the `content` collection.
///
/// The payload is the flattened tagged union, so the document's `type` field
/// and its shape can never disagree; inputs that declare a `type` separately
/// are checked against the payload before a `Content` is built.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    pub id: ContentId,
    pub capsule_id: CapsuleId,
    /// Display order within the capsule, unique per capsule by convention.
    pub order: u32,
    #[serde(flatten)]
    pub data: ContentData,
    #[serde(default)]
    pub is_processed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    pub created_at: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
}

impl Content {
    pub fn kind(&self) -> ContentKind {
        self.data.kind()
    }
}
