//! Actions dispatched into the application store.
//!
//! This module defines the [`Action`] type: plain tagged data values that the
//! lifecycle layer constructs and forwards. The crate never interprets their
//! effects; reducers and background tasks downstream of the store do.
//!
//! # Wire Shape
//!
//! Actions serialize with a `type` tag and a `payload` object, so a debug
//! inspector or a JS-side store sees the same shape:
//!
//! ```json
//! {"type": "config:mobileAppState", "payload": {"nextAppState": "active"}}
//! ```
//!
//! # Example
//!
//! ```rust
//! use native_lifecycle::app::Action;
//! use native_lifecycle::domain::AppStatus;
//!
//! let actions = vec![
//!     Action::mobile_app_state_changed(AppStatus::Active),
//!     Action::set_system_dark_mode(true),
//! ];
//! assert_eq!(actions[0].type_name(), "config:mobileAppState");
//! ```

use crate::domain::AppStatus;
use serde::{Deserialize, Serialize};

/// Typed, immutable intents forwarded to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum Action {
    /// The app moved between foreground and background.
    ///
    /// Never produced for `unknown` or `extension` states.
    #[serde(rename = "config:mobileAppState", rename_all = "camelCase")]
    MobileAppState {
        /// State the host reported.
        next_app_state: AppStatus,
    },

    /// The effective system dark-mode flag, re-read from the host.
    #[serde(rename = "config:setSystemDarkMode")]
    SetSystemDarkMode {
        /// True if the OS reports a dark color scheme.
        dark: bool,
    },

    /// One-time signal that installation checks are done.
    ///
    /// Mobile has no installer step, so bring-up sends it unconditionally.
    #[serde(rename = "config:installerRan")]
    InstallerRan,

    /// A URL was opened into the app (deep link).
    #[serde(rename = "deeplinks:link")]
    Link {
        /// URL exactly as the host delivered it.
        link: String,
    },
}

impl Action {
    /// Builds a [`Action::MobileAppState`].
    #[must_use]
    pub const fn mobile_app_state_changed(next_app_state: AppStatus) -> Self {
        Self::MobileAppState { next_app_state }
    }

    /// Builds a [`Action::SetSystemDarkMode`].
    #[must_use]
    pub const fn set_system_dark_mode(dark: bool) -> Self {
        Self::SetSystemDarkMode { dark }
    }

    /// Builds a [`Action::InstallerRan`].
    #[must_use]
    pub const fn installer_ran() -> Self {
        Self::InstallerRan
    }

    /// Builds a [`Action::Link`].
    #[must_use]
    pub fn link_received(url: impl Into<String>) -> Self {
        Self::Link { link: url.into() }
    }

    /// Returns the action's wire tag.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::MobileAppState { .. } => "config:mobileAppState",
            Self::SetSystemDarkMode { .. } => "config:setSystemDarkMode",
            Self::InstallerRan => "config:installerRan",
            Self::Link { .. } => "deeplinks:link",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn app_state_action_uses_camel_case_payload() {
        let value = serde_json::to_value(Action::mobile_app_state_changed(AppStatus::Active)).unwrap();
        assert_eq!(
            value,
            json!({"type": "config:mobileAppState", "payload": {"nextAppState": "active"}})
        );
    }

    #[test]
    fn installer_ran_has_no_payload() {
        let value = serde_json::to_value(Action::installer_ran()).unwrap();
        assert_eq!(value, json!({"type": "config:installerRan"}));
    }

    #[test]
    fn type_name_matches_serialized_tag() {
        let actions = [
            Action::mobile_app_state_changed(AppStatus::Background),
            Action::set_system_dark_mode(false),
            Action::installer_ran(),
            Action::link_received("keybase://user/alice"),
        ];
        for action in actions {
            let value = serde_json::to_value(&action).unwrap();
            assert_eq!(value["type"], action.type_name());
        }
    }

    #[test]
    fn link_keeps_url_verbatim() {
        let action = Action::link_received("keybase://user/alice?x=1#frag");
        assert_eq!(
            action,
            Action::Link {
                link: "keybase://user/alice?x=1#frag".to_string()
            }
        );
    }
}
