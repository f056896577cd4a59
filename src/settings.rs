use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::events::{EventBus, LabEvent};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub name: String,
    pub email: String,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: "Student User".into(),
            email: "student@university.edu".into(),
        }
    }
}

/// Notification and audio toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Preferences {
    pub experiment_reminders: bool,
    pub error_alerts: bool,
    pub voice_guidance: bool,
    pub sound_effects: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            experiment_reminders: true,
            error_alerts: true,
            voice_guidance: false,
            sound_effects: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub profile: Profile,
    pub preferences: Preferences,
}

/// Partial update of [`Preferences`]; absent fields are left alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesPatch {
    pub experiment_reminders: Option<bool>,
    pub error_alerts: Option<bool>,
    pub voice_guidance: Option<bool>,
    pub sound_effects: Option<bool>,
}

impl PreferencesPatch {
    fn apply(&self, p: &mut Preferences) {
        if let Some(v) = self.experiment_reminders {
            p.experiment_reminders = v;
        }
        if let Some(v) = self.error_alerts {
            p.error_alerts = v;
        }
        if let Some(v) = self.voice_guidance {
            p.voice_guidance = v;
        }
        if let Some(v) = self.sound_effects {
            p.sound_effects = v;
        }
    }
}

/// In-memory settings, reset on restart.
pub struct SettingsStore {
    settings: RwLock<Settings>,
    events: EventBus,
}

impl SettingsStore {
    pub fn new(initial: Settings, events: EventBus) -> Self {
        Self {
            settings: RwLock::new(initial),
            events,
        }
    }

    pub fn get(&self) -> Settings {
        self.settings
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Apply `patch` and return the resulting settings.
    pub fn update(&self, patch: PreferencesPatch) -> Settings {
        let updated = {
            let mut settings = self
                .settings
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            patch.apply(&mut settings.preferences);
            settings.clone()
        };
        debug!(preferences = ?updated.preferences, "settings updated");
        self.events.publish(LabEvent::SettingsChanged(updated.clone()));
        updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_settings_page() {
        let p = Preferences::default();
        assert!(p.experiment_reminders && p.error_alerts && p.sound_effects);
        assert!(!p.voice_guidance);
    }

    #[tokio::test]
    async fn patch_changes_only_given_fields() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();
        let store = SettingsStore::new(Settings::default(), bus);
        let patch: PreferencesPatch = serde_json::from_str(r#"{"voiceGuidance": true}"#).unwrap();
        let s = store.update(patch);
        assert!(s.preferences.voice_guidance);
        assert!(s.preferences.sound_effects);
        assert_eq!(store.get(), s);
        assert_eq!(rx.recv().await.unwrap(), LabEvent::SettingsChanged(s));
    }
}
