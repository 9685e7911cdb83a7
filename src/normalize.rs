use chrono_tz::Tz;

use crate::media::MediaResolver;
use crate::timefmt;
use crate::types::{ChannelConfig, Post, RawMessage};

/// Text stored when a message carries media but no caption.
pub const MEDIA_PLACEHOLDER: &str = "[Contenido multimedia]";

/// Maps raw messages into the persisted record shape.
pub struct Normalizer {
    resolver: MediaResolver,
    tz: Tz,
}

impl Normalizer {
    pub fn new(resolver: MediaResolver, tz: Tz) -> Self {
        Self { resolver, tz }
    }

    pub async fn normalize(&self, raw: &RawMessage, channel: &ChannelConfig) -> Post {
        let local = timefmt::normalize(raw.date, self.tz);

        let mensaje = match raw.text.as_deref() {
            Some(text) if !text.is_empty() => text.to_string(),
            _ => MEDIA_PLACEHOLDER.to_string(),
        };

        let media_url = self
            .resolver
            .resolve(raw.media.as_ref(), &channel.name)
            .await;
        let tipo_medio = raw.media.as_ref().map(|m| m.kind_label().to_string());

        Post {
            id: raw.id,
            fecha: local.machine,
            hora_utc: timefmt::utc_stamp(raw.date),
            mensaje,
            timestamp: raw.date.timestamp(),
            // Zone conversion never moves the instant; both epochs match.
            timestamp_local: raw.date.timestamp(),
            media_url,
            tipo_medio,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    use crate::types::MediaAttachment;

    fn normalizer(tz: Tz) -> Normalizer {
        // Unreachable API base and no token: resolution stays offline.
        let resolver = MediaResolver::new("http://127.0.0.1:1".into(), None).unwrap();
        Normalizer::new(resolver, tz)
    }

    fn channel() -> ChannelConfig {
        ChannelConfig {
            name: "habana".into(),
            username: "habananoticias".into(),
        }
    }

    #[tokio::test]
    async fn text_message_maps_verbatim() {
        let raw = RawMessage {
            id: 3,
            date: Utc.with_ymd_and_hms(2026, 1, 15, 3, 30, 0).unwrap(),
            text: Some("Corte eléctrico en el municipio".into()),
            media: None,
        };
        let post = normalizer(chrono_tz::America::Havana)
            .normalize(&raw, &channel())
            .await;

        assert_eq!(post.id, 3);
        assert_eq!(post.mensaje, "Corte eléctrico en el municipio");
        assert_eq!(post.fecha, "2026-01-14 22:30");
        assert_eq!(post.hora_utc, "2026-01-15 03:30");
        assert_eq!(post.timestamp, raw.date.timestamp());
        assert_eq!(post.media_url, None);
        assert_eq!(post.tipo_medio, None);
    }

    #[tokio::test]
    async fn local_timestamp_equals_source_epoch() {
        // Only the rendered strings move with the zone; the epoch does not.
        let raw = RawMessage {
            id: 6,
            date: Utc.with_ymd_and_hms(2026, 1, 15, 3, 30, 0).unwrap(),
            text: Some("hola".into()),
            media: None,
        };
        let post = normalizer(chrono_tz::America::Havana)
            .normalize(&raw, &channel())
            .await;

        assert_eq!(post.timestamp_local, post.timestamp);
        assert_eq!(post.timestamp_local, raw.date.timestamp());
        assert_eq!(post.fecha, "2026-01-14 22:30");
    }

    #[tokio::test]
    async fn captionless_media_gets_placeholder() {
        let raw = RawMessage {
            id: 4,
            date: Utc.with_ymd_and_hms(2026, 8, 28, 18, 5, 0).unwrap(),
            text: None,
            media: Some(MediaAttachment::Photo { id: 77 }),
        };
        let post = normalizer(chrono_tz::UTC).normalize(&raw, &channel()).await;

        assert_eq!(post.mensaje, MEDIA_PLACEHOLDER);
        assert_eq!(post.tipo_medio.as_deref(), Some("foto"));
        // No token configured, so the public fallback URL is used.
        assert_eq!(post.media_url.as_deref(), Some("https://cdn4.telesco.pe/file/77.jpg"));
    }

    #[tokio::test]
    async fn unresolvable_media_still_keeps_its_kind() {
        let raw = RawMessage {
            id: 5,
            date: Utc.with_ymd_and_hms(2026, 8, 28, 18, 5, 0).unwrap(),
            text: Some("parte oficial".into()),
            media: Some(MediaAttachment::Document {
                id: 8,
                mime_type: "application/pdf".into(),
            }),
        };
        let post = normalizer(chrono_tz::UTC).normalize(&raw, &channel()).await;

        assert_eq!(post.mensaje, "parte oficial");
        assert_eq!(post.media_url, None);
        assert_eq!(post.tipo_medio.as_deref(), Some("documento"));
    }
}
