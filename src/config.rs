//! Runtime configuration loaded from an optional TOML file.
//!
//! Every field has a default, so an empty file (or no file) yields the
//! stock latencies and profile.
//!
//! ```toml
//! event_capacity = 64
//! upload_limit = 67108864
//!
//! [latency]
//! chat_ms = 1500
//! recognition_ms = 2000
//! diagnosis_ms = 2500
//!
//! [diagnosis]
//! seed = 42
//!
//! [profile]
//! name = "Student User"
//! email = "student@university.edu"
//! ```

use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use crate::settings::Profile;

/// Simulated processing delays, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Latency {
    pub chat_ms: u64,
    pub recognition_ms: u64,
    pub diagnosis_ms: u64,
}

impl Default for Latency {
    fn default() -> Self {
        Self {
            chat_ms: 1500,
            recognition_ms: 2000,
            diagnosis_ms: 2500,
        }
    }
}

impl Latency {
    /// No delay at all; handy for tests.
    pub fn instant() -> Self {
        Self {
            chat_ms: 0,
            recognition_ms: 0,
            diagnosis_ms: 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DiagnosisConfig {
    /// Seed for the outcome picker; entropy when absent.
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub latency: Latency,
    pub diagnosis: DiagnosisConfig,
    pub profile: Profile,
    /// Events buffered per slow subscriber.
    pub event_capacity: usize,
    /// Largest image accepted by the upload route, in bytes.
    pub upload_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            latency: Latency::default(),
            diagnosis: DiagnosisConfig::default(),
            profile: Profile::default(),
            event_capacity: 64,
            upload_limit: 64 * 1024 * 1024,
        }
    }
}

impl Config {
    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

/// Load a [`Config`] from a TOML file.
pub async fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Config> {
    let path = path.as_ref();
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading config {}", path.display()))?;
    Config::from_toml(&text).with_context(|| format!("parsing config {}", path.display()))
}
