// arcflow-core import/export serializer
// Copyright (C) 2021-2026  Daniel Lambert. Licensed under GPL-3.0-or-later, see /COPYING file for details
//! Textual JSON (de)serialization of the envelope (§4.5).

use std::sync::Arc;

use crate::error::{ExportError, ImportError};
use crate::import_export::envelope::Envelope;

/// Serializes `envelope` to a pretty-printed JSON document.
///
/// # Errors
/// Returns [`ExportError::SerializationFailed`] if `envelope` cannot be rendered to JSON.
pub fn serialize(envelope: &Envelope) -> Result<String, ExportError> {
    serde_json::to_string_pretty(envelope).map_err(|e| ExportError::from(Arc::new(e)))
}

/// Parses `text` into an [`Envelope`] (§4.5 step 1). Unknown fields are ignored by
/// `serde`'s default struct handling.
///
/// # Errors
/// Returns [`ImportError::ParseError`] if `text` is not valid JSON or does not match the
/// envelope shape.
pub fn deserialize(text: &str) -> Result<Envelope, ImportError> {
    serde_json::from_str(text).map_err(|e| ImportError::from(Arc::new(e)))
}
