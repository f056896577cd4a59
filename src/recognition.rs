use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::busy::BusyFlag;
use crate::error::Rejection;
use crate::events::{EventBus, Feature, LabEvent};
use crate::timer::{AnalysisTimer, CancelScope, lock};

/// Outcome of a simulated instrument recognition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionResult {
    pub instrument_name: String,
    /// Always within `0..=100`.
    pub confidence_percent: u8,
    pub description: String,
    pub tips: Vec<String>,
}

/// An uploaded picture. The bytes are kept opaque and never decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

impl ImagePayload {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            content_type: None,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// An entry of the static "recently recognized" list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentRecognition {
    pub instrument: &'static str,
    pub time: &'static str,
    pub confidence_percent: u8,
}

pub static RECENT_RECOGNITIONS: [RecentRecognition; 3] = [
    RecentRecognition {
        instrument: "Digital Oscilloscope",
        time: "2 hours ago",
        confidence_percent: 96,
    },
    RecentRecognition {
        instrument: "Function Generator",
        time: "Yesterday",
        confidence_percent: 92,
    },
    RecentRecognition {
        instrument: "DC Power Supply",
        time: "2 days ago",
        confidence_percent: 98,
    },
];

/// The result every analysis produces, whatever the image shows.
pub fn canned_result() -> RecognitionResult {
    RecognitionResult {
        instrument_name: "Digital Oscilloscope".into(),
        confidence_percent: 94,
        description: "A digital storage oscilloscope (DSO) used for viewing and analyzing electronic signal waveforms. This appears to be a 4-channel model with bandwidth of 100MHz.".into(),
        tips: [
            "Set the VOLT/DIV knob to match your expected signal amplitude",
            "Adjust TIME/DIV for proper waveform display",
            "Use the trigger settings to stabilize your waveform",
            "Connect the probe ground clip to your circuit ground",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect(),
    }
}

#[derive(Debug, Default)]
struct Slot {
    image: Option<ImagePayload>,
    result: Option<RecognitionResult>,
}

/// Simulated instrument recognizer.
///
/// Holds at most one uploaded image and the result of analysing it.
/// Clearing the image cancels a pending analysis, which then never
/// produces a result.
pub struct RecognitionSimulator {
    slot: Mutex<Slot>,
    timer: AnalysisTimer,
    busy: BusyFlag,
    cancel: CancelScope,
    completed: AtomicUsize,
    events: EventBus,
}

impl RecognitionSimulator {
    pub fn new(timer: AnalysisTimer, events: EventBus) -> Self {
        Self {
            slot: Mutex::new(Slot::default()),
            timer,
            busy: BusyFlag::new(),
            cancel: CancelScope::new(),
            completed: AtomicUsize::new(0),
            events,
        }
    }

    /// Store `image`, discarding the previous image and its result.
    ///
    /// Refused while an analysis is pending and after shutdown.
    pub fn load(&self, image: ImagePayload) -> Result<(), Rejection> {
        if image.is_empty() {
            debug!("ignoring empty image");
            return Err(Rejection::EmptyInput);
        }
        if self.cancel.is_closed() {
            debug!("recognizer shut down, ignoring upload");
            return Err(Rejection::Cancelled);
        }
        // hold the flag while swapping so no analysis starts on a half-loaded slot
        let Some(_guard) = self.busy.try_acquire() else {
            debug!("recognition pending, ignoring upload");
            return Err(Rejection::Busy);
        };
        debug!(bytes = image.bytes.len(), content_type = ?image.content_type, "image loaded");
        let mut slot = lock(&self.slot);
        slot.image = Some(image);
        slot.result = None;
        Ok(())
    }

    /// Drop the image and result, cancelling any pending analysis.
    pub fn clear(&self) {
        self.cancel.reset();
        *lock(&self.slot) = Slot::default();
        self.events.publish(LabEvent::ImageCleared);
    }

    /// Analyse the loaded image.
    pub async fn analyze(&self) -> Result<RecognitionResult, Rejection> {
        let Some(_guard) = self.busy.try_acquire() else {
            debug!("recognition pending, ignoring request");
            return Err(Rejection::Busy);
        };
        if lock(&self.slot).image.is_none() {
            debug!("no image to analyze");
            return Err(Rejection::EmptyInput);
        }
        let token = self.cancel.token();
        if token.is_cancelled() {
            debug!("recognizer shut down, ignoring request");
            return Err(Rejection::Cancelled);
        }
        self.events.publish(LabEvent::AnalysisStarted(Feature::Recognition));

        if let Err(rejection) = self.timer.schedule(&token).await {
            debug!("recognition cancelled");
            self.events.publish(LabEvent::AnalysisCancelled(Feature::Recognition));
            return Err(rejection);
        }

        let result = canned_result();
        {
            let mut slot = lock(&self.slot);
            if slot.image.is_none() {
                return Err(Rejection::Cancelled);
            }
            slot.result = Some(result.clone());
        }
        self.completed.fetch_add(1, Ordering::Relaxed);
        info!(
            instrument = %result.instrument_name,
            confidence = result.confidence_percent,
            "instrument recognized"
        );
        self.events.publish(LabEvent::RecognitionReady(result.clone()));
        Ok(result)
    }

    /// Load `image` and analyse it.
    pub async fn recognize(&self, image: ImagePayload) -> Result<RecognitionResult, Rejection> {
        self.load(image)?;
        self.analyze().await
    }

    pub fn has_image(&self) -> bool {
        lock(&self.slot).image.is_some()
    }

    pub fn result(&self) -> Option<RecognitionResult> {
        lock(&self.slot).result.clone()
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

    fn simulator(ms: u64) -> RecognitionSimulator {
        RecognitionSimulator::new(AnalysisTimer::from_millis(ms), EventBus::default())
    }

    #[tokio::test]
    async fn analyze_without_image_is_ignored() {
        let r = simulator(0);
        assert_eq!(r.analyze().await, Err(Rejection::EmptyInput));
        assert!(!r.is_busy());
    }

    #[test]
    fn empty_upload_is_ignored() {
        let r = simulator(0);
        assert_eq!(r.load(ImagePayload::new(Vec::new())), Err(Rejection::EmptyInput));
        assert!(!r.has_image());
    }

    #[tokio::test(start_paused = true)]
    async fn new_upload_discards_previous_result() {
        let r = simulator(2000);
        r.recognize(ImagePayload::new(vec![1, 2, 3])).await.unwrap();
        assert!(r.result().is_some());
        r.load(ImagePayload::new(vec![4]).with_content_type("image/png"))
            .unwrap();
        assert!(r.result().is_none());
        assert!(r.has_image());
        assert_eq!(r.completed(), 1);
    }
}
