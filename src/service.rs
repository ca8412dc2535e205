//! Boundary to the external presence-broadcast service.

use anyhow::Result;

use crate::profile::Profile;

/// A single outbound presence state.
///
/// `update` calls replace the entire displayed state, so this carries
/// every field each time. Optional fields are `None` when absent; the
/// service must never receive empty strings for them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresenceUpdate {
    pub details: Option<String>,
    pub state: Option<String>,

    /// Activity start, epoch seconds. No end timestamp is ever sent.
    pub start: Option<i64>,

    pub large_image: String,
    pub large_image_tooltip: Option<String>,
    pub small_image: Option<String>,
    pub small_image_tooltip: Option<String>,
}

impl PresenceUpdate {
    /// Build the outbound payload from a stored profile, converting empty
    /// or whitespace-only optional fields to absent.
    pub fn from_profile(profile: &Profile, start: Option<i64>) -> Self {
        Self {
            details: optional(&profile.details),
            state: optional(&profile.state),
            start,
            large_image: profile.large_image.trim().to_string(),
            large_image_tooltip: optional(&profile.large_image_tooltip),
            small_image: optional(&profile.small_image),
            small_image_tooltip: optional(&profile.small_image_tooltip),
        }
    }
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Connect/update/clear/close surface of the external broadcast client.
///
/// The connection handle is owned by the caller between `connect` and
/// `close`; it is not designed for concurrent use.
pub trait PresenceService {
    /// Live connection to the service, keyed by the client id it was
    /// opened with.
    type Conn;

    fn connect(&mut self, client_id: &str) -> Result<Self::Conn>;
    fn update(&mut self, conn: &mut Self::Conn, update: &PresenceUpdate) -> Result<()>;
    fn clear(&mut self, conn: &mut Self::Conn) -> Result<()>;
    fn close(&mut self, conn: Self::Conn) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_profile_converts_empty_to_absent() {
        let profile = Profile {
            client_id: "42".to_string(),
            large_image: "logo".to_string(),
            ..Profile::default()
        };
        let update = PresenceUpdate::from_profile(&profile, None);
        assert_eq!(update.details, None);
        assert_eq!(update.state, None);
        assert_eq!(update.large_image_tooltip, None);
        assert_eq!(update.small_image, None);
        assert_eq!(update.small_image_tooltip, None);
        assert_eq!(update.start, None);
    }

    #[test]
    fn test_from_profile_whitespace_only_is_absent() {
        let profile = Profile {
            client_id: "42".to_string(),
            details: "   ".to_string(),
            large_image: " logo ".to_string(),
            ..Profile::default()
        };
        let update = PresenceUpdate::from_profile(&profile, None);
        assert_eq!(update.details, None);
        assert_eq!(update.large_image, "logo");
    }

    #[test]
    fn test_from_profile_passes_populated_fields_through() {
        let profile = Profile {
            client_id: "42".to_string(),
            details: "Editing".to_string(),
            state: "Focused".to_string(),
            large_image: "logo".to_string(),
            large_image_tooltip: "Big".to_string(),
            small_image: "icon".to_string(),
            small_image_tooltip: "Small".to_string(),
            start_timestamp: Some(1),
        };
        let update = PresenceUpdate::from_profile(&profile, Some(992_800));
        assert_eq!(update.details.as_deref(), Some("Editing"));
        assert_eq!(update.state.as_deref(), Some("Focused"));
        assert_eq!(update.large_image, "logo");
        assert_eq!(update.large_image_tooltip.as_deref(), Some("Big"));
        assert_eq!(update.small_image.as_deref(), Some("icon"));
        assert_eq!(update.small_image_tooltip.as_deref(), Some("Small"));
        // the stored timestamp is never replayed; the caller supplies it
        assert_eq!(update.start, Some(992_800));
    }
}
