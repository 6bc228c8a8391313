// arcflow-core import/export envelope
// Copyright (C) 2021-2026  Daniel Lambert. Licensed under GPL-3.0-or-later, see /COPYING file for details
//! Schema version 1 wire format (§4.5, §6): lower-camel-case JSON, durations as
//! total-seconds on write, accepting either total-seconds or an ISO-8601 `PT#M#S`
//! duration string on read.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shared::Id;

/// The current and only supported schema version.
pub const SCHEMA_VERSION: u32 = 1;

/// Top-level export/import document (§4.5).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    /// Schema version this document was written under.
    pub schema_version: u32,
    /// When this export was produced.
    pub exported_at_utc: DateTime<Utc>,
    /// Playlists contained in this envelope.
    pub playlists: Vec<PlaylistDto>,
    /// Playlist that was selected at export time, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_playlist_id: Option<Id>,
}

/// Wire representation of a [`crate::types::Playlist`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistDto {
    /// Identity.
    pub id: Id,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Creation timestamp.
    pub created_at_utc: DateTime<Utc>,
    /// Last-modified timestamp.
    pub updated_at_utc: DateTime<Utc>,
    /// Videos owned by this playlist, ordered by `position`.
    pub videos: Vec<VideoDto>,
}

/// Wire representation of a [`crate::types::VideoItem`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoDto {
    /// Identity.
    pub id: Id,
    /// The upstream `YouTube` video id.
    pub you_tube_id: String,
    /// Display title.
    pub title: String,
    /// Thumbnail URL, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    /// Duration, if known. Written as total-seconds; read as either total-seconds or
    /// an ISO-8601 `PT#M#S` duration string.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "duration_secs_or_iso8601"
    )]
    pub duration: Option<Duration>,
    /// Contiguous 0-based position within the owning playlist (need not be contiguous
    /// on import per §4.5 step 3, but is always contiguous on export).
    pub position: u32,
    /// When the video was added to its playlist.
    pub added_at_utc: DateTime<Utc>,
}

mod duration_secs_or_iso8601 {
    use std::time::Duration;

    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    // `value`'s shape is dictated by serde's `with` calling convention for an
    // `Option<Duration>` field, not by our own API design.
    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(value: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => s.serialize_some(&d.as_secs()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Seconds(u64),
            Iso8601(String),
        }

        let raw = Option::<Raw>::deserialize(d)?;
        match raw {
            None => Ok(None),
            Some(Raw::Seconds(secs)) => Ok(Some(Duration::from_secs(secs))),
            Some(Raw::Iso8601(text)) => parse_iso8601_duration(&text)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid ISO-8601 duration: {text}"))),
        }
    }

    /// Parses a restricted `PT#H#M#S` duration string (whole seconds only).
    fn parse_iso8601_duration(text: &str) -> Option<Duration> {
        let rest = text.strip_prefix("PT")?;
        let mut total_secs: u64 = 0;
        let mut number = String::new();
        for ch in rest.chars() {
            match ch {
                '0'..='9' => number.push(ch),
                'H' => {
                    total_secs += number.parse::<u64>().ok()? * 3600;
                    number.clear();
                }
                'M' => {
                    total_secs += number.parse::<u64>().ok()? * 60;
                    number.clear();
                }
                'S' => {
                    total_secs += number.parse::<u64>().ok()?;
                    number.clear();
                }
                _ => return None,
            }
        }
        if !number.is_empty() {
            return None;
        }
        Some(Duration::from_secs(total_secs))
    }

    #[cfg(test)]
    mod tests {
        use super::parse_iso8601_duration;
        use std::time::Duration;

        #[test]
        fn parses_hours_minutes_seconds() {
            assert_eq!(
                parse_iso8601_duration("PT1H2M3S"),
                Some(Duration::from_secs(3723))
            );
        }

        #[test]
        fn parses_seconds_only() {
            assert_eq!(parse_iso8601_duration("PT45S"), Some(Duration::from_secs(45)));
        }

        #[test]
        fn rejects_malformed_input() {
            assert_eq!(parse_iso8601_duration("45S"), None);
            assert_eq!(parse_iso8601_duration("PTxS"), None);
        }
    }
}
