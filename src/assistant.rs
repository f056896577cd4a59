use serde::Serialize;
use tracing::info;

use crate::catalog::{EXPERIMENTS, Experiment};
use crate::chat::ConversationEngine;
use crate::config::Config;
use crate::diagnosis::DiagnosisSelector;
use crate::events::EventBus;
use crate::recognition::RecognitionSimulator;
use crate::responses::ResponseCatalog;
use crate::settings::{Settings, SettingsStore};
use crate::timer::AnalysisTimer;

/// Session activity shown on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub available_experiments: usize,
    pub instruments_recognized: usize,
    pub questions_answered: usize,
    pub errors_diagnosed: usize,
}

/// One instance of every feature, wired to a shared [`EventBus`].
pub struct LabAssistant {
    pub chat: ConversationEngine,
    pub diagnosis: DiagnosisSelector,
    pub recognition: RecognitionSimulator,
    pub settings: SettingsStore,
    events: EventBus,
    upload_limit: usize,
}

impl LabAssistant {
    pub fn new(config: &Config) -> Self {
        let events = EventBus::new(config.event_capacity);
        let latency = config.latency;
        info!(?latency, "building lab assistant");
        Self {
            chat: ConversationEngine::new(
                ResponseCatalog::builtin(),
                AnalysisTimer::from_millis(latency.chat_ms),
                events.clone(),
            ),
            diagnosis: DiagnosisSelector::new(
                AnalysisTimer::from_millis(latency.diagnosis_ms),
                config.diagnosis.seed,
                events.clone(),
            ),
            recognition: RecognitionSimulator::new(
                AnalysisTimer::from_millis(latency.recognition_ms),
                events.clone(),
            ),
            settings: SettingsStore::new(
                Settings {
                    profile: config.profile.clone(),
                    ..Settings::default()
                },
                events.clone(),
            ),
            events,
            upload_limit: config.upload_limit,
        }
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Largest image the HTTP upload route accepts.
    pub fn upload_limit(&self) -> usize {
        self.upload_limit
    }

    pub fn experiments(&self) -> &'static [Experiment] {
        &EXPERIMENTS
    }

    pub fn stats(&self) -> Stats {
        Stats {
            available_experiments: EXPERIMENTS.len(),
            instruments_recognized: self.recognition.completed(),
            questions_answered: self.chat.replies(),
            errors_diagnosed: self.diagnosis.completed(),
        }
    }

    /// Cancel everything pending; later operations resolve as cancelled.
    pub fn shutdown(&self) {
        info!("shutting down lab assistant");
        self.chat.shutdown();
        self.diagnosis.shutdown();
        self.recognition.shutdown();
    }
}

impl Default for LabAssistant {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}
