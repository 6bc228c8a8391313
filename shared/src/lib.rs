// arcflow/shared value types shared across the state-management core
// Copyright (C) 2021-2026  Daniel Lambert. Licensed under GPL-3.0-or-later, see /COPYING file for details
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.
//
//! Small, dependency-light value types shared by every crate in the workspace.

// teach me
#![deny(clippy::pedantic)]
// no unsafe
#![forbid(unsafe_code)]
// no unwrap
#![deny(clippy::unwrap_used)]
// no panic
#![deny(clippy::panic)]
// docs!
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

#[macro_export]
/// Constructs an enum whose variants each wrap a single inner error type,
/// deriving the mechanical `From<Inner>` impl for each wrapping variant.
macro_rules! wrapper_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$item_meta:meta])*
                $variant:ident $( ( $inner:ty ) )?
            ),+ $(,)?
            $(
                { impl None for }
                $(
                    $(#[$item_simple_meta:meta])*
                    $simple_variant:ident $( ( $($simple_ty:ty),+ ) )?
                ),+ $(,)?
            )?
        }
    ) => {
        $(#[$meta])*
        $vis enum $name {
            $(
                $(#[$item_meta])*
                $variant $( ( $inner ) )?
            ),+
            $(
                ,
                $(
                    $(#[$item_simple_meta])*
                    $simple_variant $( ( $($simple_ty),+ ) )?
                ),+
            )?
        }
        $(
            $( impl From<$inner> for $name {
                fn from(other: $inner) -> Self {
                    $name::$variant(other)
                }
            } )?
        )+
    };
}

/// Timestamp used throughout the core (ISO-8601, UTC).
pub type Time = chrono::DateTime<chrono::offset::Utc>;
/// Difference between two [`Time`] values.
pub type TimeDifference = chrono::Duration;

/// Current timestamp.
#[must_use]
pub fn time_now() -> Time {
    chrono::Utc::now()
}

/// Timestamp constructed from seconds-since-epoch (useful for tests).
#[must_use]
pub fn time_from_secs(secs: i64) -> Time {
    // out-of-range timestamps only occur with deliberately bogus test input
    chrono::DateTime::from_timestamp(secs, 0).unwrap_or(chrono::DateTime::<chrono::offset::Utc>::MIN_UTC)
}

/// A universally-unique identity for a domain entity (playlist, video, notification).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Id(uuid::Uuid);

impl Id {
    /// Generates a fresh, random identity.
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for Id {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Un-instantiable type, for APIs that statically cannot fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Never {}

impl std::fmt::Display for Never {
    fn fmt(&self, _: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {}
    }
}
