//! Host-reported foreground state and color scheme values.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Foreground/background state reported by the host OS.
///
/// Parsed from the host's next-state string. Strings the crate does not know
/// parse to [`AppStatus::Unknown`] and are filtered like it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppStatus {
    /// App is in the foreground and receiving events.
    Active,
    /// App is in the background.
    Background,
    /// Transitional state (e.g. incoming call overlay, app switcher).
    Inactive,
    /// Nothing observed yet, or the host reported an unknown state.
    #[default]
    Unknown,
    /// The process is running an app extension rather than the app itself.
    Extension,
}

impl AppStatus {
    /// Returns the host's string for this state.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Background => "background",
            Self::Inactive => "inactive",
            Self::Unknown => "unknown",
            Self::Extension => "extension",
        }
    }

    /// Whether a transition into this state is forwarded to the store.
    ///
    /// `Unknown` and `Extension` are host noise and never dispatched.
    #[must_use]
    pub const fn is_dispatchable(self) -> bool {
        !matches!(self, Self::Unknown | Self::Extension)
    }

    /// Parses a host string, mapping anything unrecognized to `Unknown`.
    #[must_use]
    pub fn from_native(value: &str) -> Self {
        value.parse().unwrap_or_else(|()| {
            tracing::debug!(value = %value, "unrecognized app state, treating as unknown");
            Self::Unknown
        })
    }
}

impl FromStr for AppStatus {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "background" => Ok(Self::Background),
            "inactive" => Ok(Self::Inactive),
            "unknown" => Ok(Self::Unknown),
            "extension" => Ok(Self::Extension),
            _ => Err(()),
        }
    }
}

impl fmt::Display for AppStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Answer of the host's current color-scheme query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    /// OS reports a dark appearance.
    Dark,
    /// OS reports a light appearance.
    Light,
    /// OS has no preference or returned something else.
    #[default]
    Unspecified,
}

impl ColorScheme {
    /// Parses the host answer; anything but `"dark"`/`"light"` is `Unspecified`.
    #[must_use]
    pub fn from_native(value: &str) -> Self {
        match value {
            "dark" => Self::Dark,
            "light" => Self::Light,
            _ => Self::Unspecified,
        }
    }

    /// True only when the OS explicitly reports dark.
    #[must_use]
    pub const fn is_dark(self) -> bool {
        matches!(self, Self::Dark)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_app_states() {
        assert_eq!(AppStatus::from_native("active"), AppStatus::Active);
        assert_eq!(AppStatus::from_native("background"), AppStatus::Background);
        assert_eq!(AppStatus::from_native("inactive"), AppStatus::Inactive);
        assert_eq!(AppStatus::from_native("extension"), AppStatus::Extension);
    }

    #[test]
    fn unrecognized_app_state_is_unknown_and_filtered() {
        let status = AppStatus::from_native("suspended-ish");
        assert_eq!(status, AppStatus::Unknown);
        assert!(!status.is_dispatchable());
        assert!(!AppStatus::Extension.is_dispatchable());
        assert!(AppStatus::Inactive.is_dispatchable());
    }

    #[test]
    fn only_explicit_dark_is_dark() {
        assert!(ColorScheme::from_native("dark").is_dark());
        assert!(!ColorScheme::from_native("light").is_dark());
        assert!(!ColorScheme::from_native("no-preference").is_dark());
        assert_eq!(ColorScheme::from_native(""), ColorScheme::Unspecified);
    }

    #[test]
    fn app_status_serializes_as_host_string() {
        let json = serde_json::to_string(&AppStatus::Background).unwrap();
        assert_eq!(json, "\"background\"");
    }
}
