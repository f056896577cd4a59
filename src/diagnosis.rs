use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use once_cell::sync::Lazy;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::busy::BusyFlag;
use crate::error::Rejection;
use crate::events::{EventBus, Feature, LabEvent};
use crate::timer::{AnalysisTimer, CancelScope, lock};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosisStatus {
    Success,
    Warning,
    Error,
}

/// What the diagnosis blames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cause {
    Instrument,
    User,
    Both,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosisResult {
    pub status: DiagnosisStatus,
    pub title: String,
    pub description: String,
    pub cause: Cause,
    /// Recommended actions, in the order they should be tried.
    pub suggestions: Vec<String>,
}

/// A static troubleshooting hint shown next to the diagnosis form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuickTip {
    pub icon: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

pub static QUICK_TIPS: [QuickTip; 3] = [
    QuickTip {
        icon: "🔌",
        title: "Check Connections",
        description: "Loose cables are the #1 cause of issues",
    },
    QuickTip {
        icon: "⚙️",
        title: "Verify Settings",
        description: "Wrong range settings give incorrect readings",
    },
    QuickTip {
        icon: "🔋",
        title: "Power Cycle",
        description: "Restart the instrument if behavior is erratic",
    },
];

fn record(
    status: DiagnosisStatus,
    title: &str,
    description: &str,
    cause: Cause,
    suggestions: &[&str],
) -> DiagnosisResult {
    DiagnosisResult {
        status,
        title: title.into(),
        description: description.into(),
        cause,
        suggestions: suggestions.iter().map(|s| s.to_string()).collect(),
    }
}

/// The three outcomes a diagnosis can produce.
pub static CANNED_DIAGNOSES: Lazy<[DiagnosisResult; 3]> = Lazy::new(|| {
    [
        record(
            DiagnosisStatus::Warning,
            "Incorrect Probe Compensation",
            "The oscilloscope probe appears to be under-compensated or over-compensated, causing inaccurate waveform readings.",
            Cause::User,
            &[
                "Connect probe to the PROBE COMP output on the oscilloscope",
                "Adjust the compensation screw on the probe while observing the square wave",
                "The top of the square wave should be flat - not rounded or have overshoot",
                "Re-measure your signal after proper compensation",
            ],
        ),
        record(
            DiagnosisStatus::Error,
            "Faulty Instrument Detected",
            "The readings suggest a potential hardware malfunction in the measurement device.",
            Cause::Instrument,
            &[
                "Try using a different channel on the instrument",
                "Test with a known good signal source",
                "Report the issue to lab staff for inspection",
                "Use an alternative instrument if available",
            ],
        ),
        record(
            DiagnosisStatus::Success,
            "Setup Verified",
            "Your equipment setup appears to be correct. The readings are within expected parameters.",
            Cause::User,
            &[
                "Proceed with your experiment",
                "Document your current settings for reference",
                "Take multiple readings for statistical accuracy",
            ],
        ),
    ]
});

/// Simulated error diagnosis.
///
/// The symptom text only gates the request; the outcome is drawn uniformly
/// from [`CANNED_DIAGNOSES`] after the configured latency.
pub struct DiagnosisSelector {
    rng: Mutex<StdRng>,
    timer: AnalysisTimer,
    busy: BusyFlag,
    cancel: CancelScope,
    last: Mutex<Option<DiagnosisResult>>,
    completed: AtomicUsize,
    events: EventBus,
}

impl DiagnosisSelector {
    /// Create a selector; `seed` makes the sequence of outcomes reproducible.
    pub fn new(timer: AnalysisTimer, seed: Option<u64>, events: EventBus) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng: Mutex::new(rng),
            timer,
            busy: BusyFlag::new(),
            cancel: CancelScope::new(),
            last: Mutex::new(None),
            completed: AtomicUsize::new(0),
            events,
        }
    }

    /// Diagnose the described symptoms.
    pub async fn diagnose(&self, symptoms: &str) -> Result<DiagnosisResult, Rejection> {
        if symptoms.trim().is_empty() {
            debug!("ignoring empty symptom description");
            return Err(Rejection::EmptyInput);
        }
        let Some(_guard) = self.busy.try_acquire() else {
            debug!("diagnosis pending, ignoring request");
            return Err(Rejection::Busy);
        };
        let token = self.cancel.token();
        if token.is_cancelled() {
            debug!("diagnosis shut down, ignoring request");
            return Err(Rejection::Cancelled);
        }
        self.events.publish(LabEvent::AnalysisStarted(Feature::Diagnosis));

        if let Err(rejection) = self.timer.schedule(&token).await {
            self.events
                .publish(LabEvent::AnalysisCancelled(Feature::Diagnosis));
            return Err(rejection);
        }

        let result = self.pick();
        info!(title = %result.title, status = ?result.status, "diagnosis complete");
        *lock(&self.last) = Some(result.clone());
        self.completed.fetch_add(1, Ordering::Relaxed);
        self.events.publish(LabEvent::DiagnosisReady(result.clone()));
        Ok(result)
    }

    fn pick(&self) -> DiagnosisResult {
        let records: &[DiagnosisResult] = &*CANNED_DIAGNOSES;
        let mut rng = lock(&self.rng);
        records
            .choose(&mut *rng)
            .cloned()
            .unwrap_or_else(|| records[0].clone())
    }

    /// Most recent result, if any diagnosis has completed.
    pub fn last_result(&self) -> Option<DiagnosisResult> {
        lock(&self.last).clone()
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    pub fn shutdown(&self) {
        self.cancel.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canned_records_cover_every_status() {
        let statuses: Vec<_> = CANNED_DIAGNOSES.iter().map(|d| d.status).collect();
        assert!(statuses.contains(&DiagnosisStatus::Success));
        assert!(statuses.contains(&DiagnosisStatus::Warning));
        assert!(statuses.contains(&DiagnosisStatus::Error));
    }

    #[test]
    fn same_seed_same_outcomes() {
        let a = DiagnosisSelector::new(AnalysisTimer::from_millis(0), Some(7), EventBus::default());
        let b = DiagnosisSelector::new(AnalysisTimer::from_millis(0), Some(7), EventBus::default());
        let xs: Vec<_> = (0..10).map(|_| a.pick().title).collect();
        let ys: Vec<_> = (0..10).map(|_| b.pick().title).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn result_serializes_lowercase_enums() {
        let v = serde_json::to_value(&CANNED_DIAGNOSES[1]).unwrap();
        assert_eq!(v["status"], "error");
        assert_eq!(v["cause"], "instrument");
    }
}
