use std::sync::Arc;

use lab_buddy::{
    AnalysisTimer, ConversationEngine, EventBus, GREETING, LabEvent, Rejection, ResponseCatalog,
    Role,
};
use tracing_test::traced_test;

fn engine(bus: &EventBus) -> ConversationEngine {
    ConversationEngine::new(
        ResponseCatalog::builtin(),
        AnalysisTimer::from_millis(1500),
        bus.clone(),
    )
}

#[tokio::test(start_paused = true)]
async fn history_starts_with_greeting() {
    let e = engine(&EventBus::default());
    let h = e.history();
    assert_eq!(h.len(), 1);
    assert_eq!(h[0].role, Role::Assistant);
    assert_eq!(h[0].content, GREETING);
    assert_eq!(e.suggestions().len(), 4);
}

#[tokio::test(start_paused = true)]
async fn replies_are_chosen_by_keyword() {
    let e = engine(&EventBus::default());
    let scope = e.send("How do I set up an OSCILLOSCOPE?").await.unwrap();
    assert!(scope.content.contains("Set the coupling to AC mode"));

    let meter = e.send("what's the multimeter procedure").await.unwrap();
    assert!(meter.content.contains("digital multimeter"));

    let other = e.send("Explain Ohm's Law experiment step by step").await.unwrap();
    assert!(other.content.starts_with("That's a great question!"));

    assert_eq!(e.history().len(), 7);
    assert_eq!(e.replies(), 3);
}

#[tokio::test(start_paused = true)]
async fn empty_input_leaves_history_untouched() {
    let e = engine(&EventBus::default());
    assert_eq!(e.send("").await, Err(Rejection::EmptyInput));
    assert_eq!(e.send(" \n\t").await, Err(Rejection::EmptyInput));
    assert_eq!(e.history().len(), 1);
}

#[tokio::test(start_paused = true)]
#[traced_test]
async fn second_send_while_pending_is_ignored() {
    let bus = EventBus::default();
    let e = Arc::new(engine(&bus));
    let mut rx = bus.subscribe();

    let first = {
        let e = e.clone();
        tokio::spawn(async move { e.send("oscilloscope trigger").await })
    };
    match rx.recv().await.unwrap() {
        LabEvent::MessageAppended(m) => assert_eq!(m.role, Role::User),
        other => panic!("unexpected event {other:?}"),
    }
    assert!(e.is_busy());
    assert_eq!(e.send("multimeter").await, Err(Rejection::Busy));
    assert!(logs_contain("chat reply pending"));

    let reply = first.await.unwrap().unwrap();
    assert!(reply.content.contains("oscilloscope"));
    let h = e.history();
    assert_eq!(h.len(), 3);
    assert_eq!(h[1].content, "oscilloscope trigger");
    assert!(!e.is_busy());
}

#[tokio::test(start_paused = true)]
async fn events_announce_user_then_assistant() {
    let bus = EventBus::default();
    let e = engine(&bus);
    let mut rx = bus.subscribe();
    let reply = e.send("hello").await.unwrap();

    let first = rx.recv().await.unwrap();
    let second = rx.recv().await.unwrap();
    assert!(matches!(first, LabEvent::MessageAppended(ref m) if m.content == "hello"));
    assert_eq!(second, LabEvent::MessageAppended(reply));
}

#[tokio::test(start_paused = true)]
async fn sends_after_shutdown_leave_history_untouched() {
    let bus = EventBus::default();
    let e = engine(&bus);
    let mut rx = bus.subscribe();
    e.shutdown();
    for _ in 0..3 {
        assert_eq!(e.send("oscilloscope").await, Err(Rejection::Cancelled));
    }
    assert_eq!(e.history().len(), 1);
    assert_eq!(e.replies(), 0);
    assert!(rx.try_recv().is_err());
    assert!(!e.is_busy());
}
