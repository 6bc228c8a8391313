// arcflow-core error taxonomy
// Copyright (C) 2021-2026  Daniel Lambert. Licensed under GPL-3.0-or-later, see /COPYING file for details
//! Closed error unions for effect failures, import failures, and export failures.
//!
//! Mirrors the hand-rolled `Display`/`std::error::Error` style used by the rest of the
//! workspace (no `thiserror`): every enum here implements both manually so that
//! `OperationError`/`ImportError`/`ExportError` stay exhaustively matched, closed unions.

use std::sync::Arc;

use crate::types::{PlaylistId, VideoId};
use shared::Id;

/// Category of an effect failure, used to pick a [`Severity`] and a user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Input failed validation before reaching a collaborator.
    Validation,
    /// The referenced entity does not exist.
    NotFound,
    /// A retryable, likely-transient failure (timeout, contention).
    Transient,
    /// A collaborator reported a failure outside the core's control.
    External,
    /// An unanticipated failure; treated as a bug-adjacent signal.
    Unexpected,
}

/// Severity used to render a [`crate::types::Notification`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Informational, no action required.
    Info,
    /// Recoverable condition the user may want to address.
    Warning,
    /// A failure that likely interrupted the user's intent.
    Error,
}

impl ErrorCategory {
    /// Maps a category to the severity used for its notification (§7).
    #[must_use]
    pub fn severity(self) -> Severity {
        match self {
            Self::Validation | Self::NotFound | Self::Transient => Severity::Warning,
            Self::External | Self::Unexpected => Severity::Error,
        }
    }
}

/// Correlation and locating context carried by an [`OperationError`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ErrorContext {
    /// Correlation id linking the error to the notification it produced.
    pub correlation_id: Option<Id>,
    /// Name of the operation that failed (e.g. `"create_playlist"`).
    pub operation: Option<&'static str>,
    /// Playlist the failing operation concerned, if any.
    pub playlist_id: Option<PlaylistId>,
    /// Video the failing operation concerned, if any.
    pub video_id: Option<VideoId>,
    /// Index the failing operation concerned, if any (e.g. an out-of-range `SelectVideo`).
    pub index: Option<usize>,
}

impl ErrorContext {
    /// An empty context tagged with only an operation name.
    #[must_use]
    pub fn for_operation(operation: &'static str) -> Self {
        Self {
            operation: Some(operation),
            ..Self::default()
        }
    }
}

/// A failed effect, categorized for display and severity mapping (§7).
#[derive(Debug, Clone, PartialEq)]
pub struct OperationError {
    /// What kind of failure this was.
    pub category: ErrorCategory,
    /// Human-readable message.
    pub message: String,
    /// Correlation/locating context.
    pub context: ErrorContext,
}

impl OperationError {
    /// Constructs an error in the given category.
    #[must_use]
    pub fn new(category: ErrorCategory, message: impl Into<String>, context: ErrorContext) -> Self {
        Self {
            category,
            message: message.into(),
            context,
        }
    }
}

impl std::fmt::Display for OperationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.category, self.message)
    }
}

impl std::error::Error for OperationError {}

shared::wrapper_enum! {
    /// Failure modes for the import pipeline (§4.5).
    #[derive(Debug, Clone)]
    pub enum ImportError {
        /// The input text was not valid JSON, or did not match the envelope shape.
        ParseError(Arc<serde_json::Error>),
        { impl None for }
        /// `schemaVersion` in the envelope is newer than this core supports: the version found.
        UnsupportedSchema(u32),
        /// A field failed validation (§4.5 step 3): dotted field path, human-readable reason.
        ValidationError(String, String),
        /// Two entities in the same envelope shared an id.
        IdCollision,
        /// Import succeeded but writing it to durable storage failed.
        PersistenceFailed(String)
    }
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ParseError(e) => write!(f, "import parse error: {e}"),
            Self::UnsupportedSchema(found) => {
                write!(f, "import schema version {found} is not supported")
            }
            Self::ValidationError(field, message) => {
                write!(f, "import validation failed on `{field}`: {message}")
            }
            Self::IdCollision => write!(f, "import contains duplicate ids"),
            Self::PersistenceFailed(e) => write!(f, "import persistence failed: {e}"),
        }
    }
}
impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ParseError(e) => Some(e.as_ref()),
            Self::UnsupportedSchema(_) | Self::ValidationError(_, _) | Self::IdCollision | Self::PersistenceFailed(_) => None,
        }
    }
}

shared::wrapper_enum! {
    /// Failure modes for the export pipeline (§4.5).
    #[derive(Debug, Clone)]
    pub enum ExportError {
        /// Mapping or encoding the catalog to JSON failed.
        SerializationFailed(Arc<serde_json::Error>),
        { impl None for }
        /// There was no loaded catalog to export.
        NoPlaylistsLoaded,
        /// The download collaborator failed to save the file.
        InteropFailed(String)
    }
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SerializationFailed(e) => write!(f, "export serialization failed: {e}"),
            Self::NoPlaylistsLoaded => write!(f, "export failed: no loaded playlists"),
            Self::InteropFailed(e) => write!(f, "export interop failed: {e}"),
        }
    }
}
impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::SerializationFailed(e) => Some(e.as_ref()),
            Self::NoPlaylistsLoaded | Self::InteropFailed(_) => None,
        }
    }
}

/// Failure categories reported by a [`crate::effects::PlaylistService`] collaborator.
#[derive(Debug)]
pub enum ServiceError {
    /// Caller-supplied data was invalid.
    Validation(String),
    /// The entity did not exist.
    NotFound(String),
    /// Likely transient; a retry may succeed.
    Transient(String),
    /// An external dependency failed.
    External(String),
    /// Anything else.
    Unexpected(String),
}

impl ServiceError {
    /// Category for this failure, used to build an [`OperationError`].
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation(_) => ErrorCategory::Validation,
            Self::NotFound(_) => ErrorCategory::NotFound,
            Self::Transient(_) => ErrorCategory::Transient,
            Self::External(_) => ErrorCategory::External,
            Self::Unexpected(_) => ErrorCategory::Unexpected,
        }
    }
    /// Message for this failure.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Validation(m)
            | Self::NotFound(m)
            | Self::Transient(m)
            | Self::External(m)
            | Self::Unexpected(m) => m,
        }
    }
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.category(), self.message())
    }
}
impl std::error::Error for ServiceError {}
