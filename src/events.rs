use serde::Serialize;
use tokio::sync::broadcast;
use tracing::trace;

use crate::diagnosis::DiagnosisResult;
use crate::message::Message;
use crate::recognition::RecognitionResult;
use crate::settings::Settings;

/// Which simulated feature an event concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Feature {
    Chat,
    Diagnosis,
    Recognition,
}

/// State change announced to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum LabEvent {
    MessageAppended(Message),
    AnalysisStarted(Feature),
    AnalysisCancelled(Feature),
    DiagnosisReady(DiagnosisResult),
    RecognitionReady(RecognitionResult),
    ImageCleared,
    SettingsChanged(Settings),
}

/// Fan-out channel for [`LabEvent`]s.
///
/// Publishing never fails: events sent while nobody listens are dropped.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<LabEvent>,
}

impl EventBus {
    /// Create a bus buffering up to `capacity` events per slow subscriber.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LabEvent> {
        self.tx.subscribe()
    }

    pub fn publish(&self, event: LabEvent) {
        if self.tx.send(event).is_err() {
            trace!("event dropped, no subscribers");
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_published_events() {
        let bus = EventBus::new(4);
        let mut rx = bus.subscribe();
        bus.publish(LabEvent::AnalysisStarted(Feature::Diagnosis));
        assert_eq!(
            rx.recv().await.unwrap(),
            LabEvent::AnalysisStarted(Feature::Diagnosis)
        );
    }

    #[test]
    fn publishing_without_subscribers_is_harmless() {
        let bus = EventBus::default();
        bus.publish(LabEvent::ImageCleared);
    }

    #[test]
    fn events_serialize_with_type_tag() {
        let v = serde_json::to_value(LabEvent::AnalysisCancelled(Feature::Recognition)).unwrap();
        assert_eq!(v["type"], "analysisCancelled");
        assert_eq!(v["data"], "recognition");
        let v = serde_json::to_value(LabEvent::ImageCleared).unwrap();
        assert_eq!(v["type"], "imageCleared");
    }
}
