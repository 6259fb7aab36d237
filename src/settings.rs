//! Player preferences and commentary configuration
//!
//! Persisted in LocalStorage. Only preferences live here; scores are never saved.

use serde::{Deserialize, Serialize};

use crate::theme::{self, TrackTheme};

/// Default text-generation endpoint
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
/// Default text-generation model
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// How to reach the commentary service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentaryConfig {
    /// API base URL (no trailing `/models/...`)
    pub endpoint: String,
    pub model: String,
    /// Missing key disables the service; fallback lines are shown instead
    pub api_key: Option<String>,
    /// Token cap for live one-liners
    pub max_output_tokens: u32,
    /// Sampling temperature for live one-liners
    pub temperature: f32,
}

impl Default for CommentaryConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: option_env!("GEMINI_API_KEY").map(str::to_string),
            max_output_tokens: 30,
            temperature: 0.9,
        }
    }
}

impl CommentaryConfig {
    /// Key, if present and non-blank
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Theme id selected on the last run
    pub last_theme: String,
    /// Issue commentary requests at all
    pub commentary_enabled: bool,
    /// Skip the player glow
    pub reduced_motion: bool,
    pub commentary: CommentaryConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            last_theme: theme::default_theme().id.to_string(),
            commentary_enabled: true,
            reduced_motion: false,
            commentary: CommentaryConfig::default(),
        }
    }
}

impl Settings {
    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "turbo_racer_settings";

    /// Theme to preselect in the menu
    pub fn theme(&self) -> &'static TrackTheme {
        theme::resolve(&self.last_theme)
    }

    pub fn remember_theme(&mut self, theme: &TrackTheme) {
        self.last_theme = theme.id.to_string();
    }

    /// Parse stored JSON; anything unreadable yields defaults
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring unreadable settings: {}", e);
                Self::default()
            }
        }
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                log::info!("Loaded settings from LocalStorage");
                return Self::from_json(&json);
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::THEMES;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.theme().id, "CYBERPUNK");
        assert!(settings.commentary_enabled);
        assert!(!settings.reduced_motion);
        assert_eq!(settings.commentary.model, DEFAULT_MODEL);
        assert_eq!(settings.commentary.max_output_tokens, 30);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings = Settings::from_json(r#"{"last_theme":"ARCTIC","reduced_motion":true}"#);
        assert_eq!(settings.theme().name, "Frozen Tundra");
        assert!(settings.reduced_motion);
        assert!(settings.commentary_enabled);
        assert_eq!(settings.commentary.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_garbage_json_yields_defaults() {
        assert_eq!(Settings::from_json("not json"), Settings::default());
    }

    #[test]
    fn test_unknown_theme_resolves_to_default() {
        let settings = Settings {
            last_theme: "VOLCANO".into(),
            ..Settings::default()
        };
        assert_eq!(settings.theme().id, THEMES[0].id);
    }

    #[test]
    fn test_round_trip_and_remember() {
        let mut settings = Settings::default();
        settings.remember_theme(&THEMES[1]);
        settings.commentary.api_key = Some("abc".into());
        let json = serde_json::to_string(&settings).unwrap();
        assert_eq!(Settings::from_json(&json), settings);
    }

    #[test]
    fn test_blank_credential_is_missing() {
        let mut config = CommentaryConfig::default();
        config.api_key = Some("   ".into());
        assert_eq!(config.credential(), None);
        config.api_key = Some("key".into());
        assert_eq!(config.credential(), Some("key"));
    }
}
