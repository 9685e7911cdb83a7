use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One monitored channel: display name plus the public @username handle.
#[derive(Debug, Deserialize, Clone)]
pub struct ChannelConfig {
    pub name: String,
    pub username: String,
}

/// A message as delivered by the messaging source. Not persisted.
#[derive(Debug, Clone, Deserialize)]
pub struct RawMessage {
    pub id: i64,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub media: Option<MediaAttachment>,
}

impl RawMessage {
    /// Messages carrying neither text nor media are dropped before normalization.
    pub fn is_empty(&self) -> bool {
        self.text.as_deref().map_or(true, |t| t.is_empty()) && self.media.is_none()
    }
}

/// Attachment descriptor from the source. Drives URL resolution only.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MediaAttachment {
    Photo { id: i64 },
    Document { id: i64, mime_type: String },
    Sticker { id: i64 },
    Other,
}

impl MediaAttachment {
    /// Source file id usable for URL resolution. Documents only count when
    /// their MIME type is an image type; `Other` never yields an id.
    pub fn file_id(&self) -> Option<i64> {
        match self {
            MediaAttachment::Photo { id } => Some(*id),
            MediaAttachment::Document { id, mime_type } if mime_type.contains("image") => Some(*id),
            MediaAttachment::Document { .. } => None,
            MediaAttachment::Sticker { id } => Some(*id),
            MediaAttachment::Other => None,
        }
    }

    /// Label persisted as `tipo_medio`.
    pub fn kind_label(&self) -> &'static str {
        match self {
            MediaAttachment::Photo { .. } => "foto",
            MediaAttachment::Document { .. } => "documento",
            MediaAttachment::Sticker { .. } => "sticker",
            MediaAttachment::Other => "otro",
        }
    }
}

/// The persisted unit. One JSON array of these per channel, newest first.
///
/// `id` is the sole identity key within a dataset; content drift under the
/// same id never updates a stored record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub fecha: String,
    pub hora_utc: String,
    pub mensaje: String,
    pub timestamp: i64,
    /// Equal to `timestamp`; kept for dataset-file compatibility.
    pub timestamp_local: i64,
    pub media_url: Option<String>,
    pub tipo_medio: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn photo_and_sticker_yield_file_ids() {
        assert_eq!(MediaAttachment::Photo { id: 42 }.file_id(), Some(42));
        assert_eq!(MediaAttachment::Sticker { id: 7 }.file_id(), Some(7));
    }

    #[test]
    fn only_image_documents_yield_file_ids() {
        let img = MediaAttachment::Document {
            id: 1,
            mime_type: "image/png".into(),
        };
        let pdf = MediaAttachment::Document {
            id: 2,
            mime_type: "application/pdf".into(),
        };
        assert_eq!(img.file_id(), Some(1));
        assert_eq!(pdf.file_id(), None);
        assert_eq!(MediaAttachment::Other.file_id(), None);
    }

    #[test]
    fn kind_labels_cover_all_variants() {
        assert_eq!(MediaAttachment::Photo { id: 1 }.kind_label(), "foto");
        assert_eq!(
            MediaAttachment::Document {
                id: 1,
                mime_type: "application/pdf".into()
            }
            .kind_label(),
            "documento"
        );
        assert_eq!(MediaAttachment::Sticker { id: 1 }.kind_label(), "sticker");
        assert_eq!(MediaAttachment::Other.kind_label(), "otro");
    }

    #[test]
    fn empty_message_detection() {
        let empty = RawMessage {
            id: 1,
            date: Utc::now(),
            text: None,
            media: None,
        };
        let media_only = RawMessage {
            media: Some(MediaAttachment::Photo { id: 9 }),
            ..empty.clone()
        };
        assert!(empty.is_empty());
        assert!(!media_only.is_empty());
    }
}
