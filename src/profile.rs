//! Presence profile record and its on-disk format
//!
//! Profiles are stored one per file as key=value lines grouped under
//! bracketed section headers. Parsing is lenient: blank lines, unknown
//! sections, unknown keys and key=value lines outside any section are
//! skipped without error.

use serde::Serialize;

use crate::error::StoreError;

/// A named bundle of presence-display fields.
///
/// Optional text fields hold the empty string when unset; they are
/// converted to real absence at the service boundary, never broadcast as
/// empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Profile {
    pub client_id: String,
    pub details: String,
    pub state: String,
    pub large_image: String,
    pub large_image_tooltip: String,
    pub small_image: String,
    pub small_image_tooltip: String,

    /// Epoch seconds recorded at last save. Informational only: activation
    /// recomputes the start time from user input instead of replaying this.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_timestamp: Option<i64>,
}

/// Key → field accessors for the text fields, matched case-sensitively.
const TEXT_KEYS: &[(&str, fn(&mut Profile) -> &mut String)] = &[
    ("ClientID", |p| &mut p.client_id),
    ("Details", |p| &mut p.details),
    ("State", |p| &mut p.state),
    ("LargeImage", |p| &mut p.large_image),
    ("LargeImageTooltip", |p| &mut p.large_image_tooltip),
    ("SmallImage", |p| &mut p.small_image),
    ("SmallImageTooltip", |p| &mut p.small_image_tooltip),
];

const KEY_START_TIMESTAMP: &str = "StartTimestamp";

impl Profile {
    /// Parse the grouped key=value format.
    ///
    /// Values are everything after the first `=`, trimmed of surrounding
    /// whitespace. Keys missing from the file leave their field at the
    /// empty-string default.
    pub fn parse(text: &str) -> Self {
        let mut profile = Profile::default();
        let mut in_section = false;

        for line in text.lines() {
            let line = line.trim();
            if line.starts_with('[') && line.ends_with(']') {
                in_section = true;
                continue;
            }
            if !in_section {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();

            if key == KEY_START_TIMESTAMP {
                profile.start_timestamp = value.parse().ok();
                continue;
            }
            if let Some((_, field)) = TEXT_KEYS.iter().find(|(k, _)| *k == key) {
                *field(&mut profile) = value.to_string();
            }
        }

        profile
    }

    /// Render to the on-disk format, sections in fixed order.
    pub fn render(&self) -> String {
        let start = self
            .start_timestamp
            .map(|t| t.to_string())
            .unwrap_or_default();

        format!(
            "[Identifiers]\n\
             ClientID={}\n\
             \n\
             [State]\n\
             Details={}\n\
             State={}\n\
             StartTimestamp={}\n\
             \n\
             [Images]\n\
             LargeImage={}\n\
             LargeImageTooltip={}\n\
             SmallImage={}\n\
             SmallImageTooltip={}\n",
            self.client_id,
            self.details,
            self.state,
            start,
            self.large_image,
            self.large_image_tooltip,
            self.small_image,
            self.small_image_tooltip,
        )
    }

    /// Required-field invariant, enforced before a profile is persisted
    /// or activated.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.client_id.trim().is_empty() {
            return Err(StoreError::InvalidProfile("ClientID is required"));
        }
        if self.large_image.trim().is_empty() {
            return Err(StoreError::InvalidProfile("LargeImage is required"));
        }
        Ok(())
    }
}
