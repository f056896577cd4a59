//! Core of the LAB-BUDDY lab assistant.
//!
//! Every "AI" feature here is simulated: a fixed delay followed by a canned
//! answer. The crate exposes [`ConversationEngine`], [`DiagnosisSelector`],
//! [`RecognitionSimulator`] and the experiment [`catalog`], bundled by
//! [`LabAssistant`] and served over HTTP by [`server`].

pub mod args;
mod assistant;
mod busy;
pub mod catalog;
mod chat;
pub mod config;
mod conversation;
mod diagnosis;
mod error;
mod events;
pub mod logger;
mod message;
mod recognition;
mod responses;
pub mod server;
mod settings;
mod shutdown;
mod timer;

pub use assistant::{LabAssistant, Stats};
pub use busy::{BusyFlag, BusyGuard};
pub use catalog::{Difficulty, Experiment, ExperimentQuery};
pub use chat::ConversationEngine;
pub use config::{Config, Latency};
pub use conversation::Conversation;
pub use diagnosis::{
    CANNED_DIAGNOSES, Cause, DiagnosisResult, DiagnosisSelector, DiagnosisStatus, QUICK_TIPS,
    QuickTip,
};
pub use error::Rejection;
pub use events::{EventBus, Feature, LabEvent};
pub use message::{Message, Role};
pub use recognition::{
    ImagePayload, RECENT_RECOGNITIONS, RecentRecognition, RecognitionResult, RecognitionSimulator,
    canned_result,
};
pub use responses::{GREETING, ResponseCatalog, SUGGESTED_QUESTIONS, Topic};
pub use settings::{Preferences, PreferencesPatch, Profile, Settings, SettingsStore};
pub use shutdown::shutdown_signal;
pub use timer::{AnalysisTimer, CancelScope};
