//! Contract lock for the serialized event and snapshot shapes.
//!
//! Host bridges forward [`SessionEvent`]s and [`SessionSnapshot`]s to
//! frontends as JSON; these tests pin the wire shapes so a rename or enum
//! reshuffle cannot silently break a host.

use bloom_voice::{CaptureErrorKind, SessionEvent, SessionId, SessionSnapshot, SessionState, Turn};

#[test]
fn state_changed_json_shape() {
    let event = SessionEvent::StateChanged {
        from: SessionState::Idle,
        to: SessionState::Listening,
    };
    let json = serde_json::to_value(&event).expect("serialize event");
    assert_eq!(json["type"], "state_changed");
    assert_eq!(json["from"], "idle");
    assert_eq!(json["to"], "listening");
}

#[test]
fn turn_recorded_json_shape() {
    let event = SessionEvent::TurnRecorded {
        turn: Turn::user("I feel anxious"),
    };
    let json = serde_json::to_value(&event).expect("serialize event");
    assert_eq!(json["type"], "turn_recorded");
    assert_eq!(json["turn"]["role"], "user");
    assert_eq!(json["turn"]["text"], "I feel anxious");
}

#[test]
fn capture_fault_json_shape() {
    let event = SessionEvent::CaptureFault {
        kind: CaptureErrorKind::PermissionDenied,
    };
    let json = serde_json::to_value(&event).expect("serialize event");
    assert_eq!(json["type"], "capture_fault");
    assert_eq!(json["kind"], "permission_denied");
}

#[test]
fn ended_json_shape() {
    let json = serde_json::to_value(&SessionEvent::Ended).expect("serialize event");
    assert_eq!(json["type"], "ended");
}

#[test]
fn events_round_trip_through_json() {
    let events = vec![
        SessionEvent::StateChanged {
            from: SessionState::Thinking,
            to: SessionState::Speaking,
        },
        SessionEvent::TurnRecorded {
            turn: Turn::agent("Tell me more"),
        },
        SessionEvent::CaptureFault {
            kind: CaptureErrorKind::Device,
        },
        SessionEvent::Ended,
    ];
    for event in events {
        let json = serde_json::to_string(&event).expect("serialize");
        let back: SessionEvent = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, event);
    }
}

#[test]
fn session_states_serialize_as_snake_case() {
    let pairs = [
        (SessionState::Idle, "\"idle\""),
        (SessionState::Listening, "\"listening\""),
        (SessionState::Thinking, "\"thinking\""),
        (SessionState::Speaking, "\"speaking\""),
    ];
    for (state, wire) in pairs {
        assert_eq!(serde_json::to_string(&state).expect("serialize"), wire);
    }
}

#[test]
fn snapshot_json_shape() {
    let snapshot = SessionSnapshot {
        id: SessionId::new(),
        state: SessionState::Thinking,
        turns: vec![Turn::agent("Hello"), Turn::user("hi")],
        latest_user_text: Some("hi".to_owned()),
        latest_agent_text: Some("Hello".to_owned()),
    };
    let json = serde_json::to_value(&snapshot).expect("serialize snapshot");

    assert!(json["id"].is_string());
    assert_eq!(json["state"], "thinking");
    assert_eq!(json["turns"][0]["role"], "agent");
    assert_eq!(json["turns"][1]["text"], "hi");
    assert_eq!(json["latest_user_text"], "hi");
    assert_eq!(json["latest_agent_text"], "Hello");

    let back: SessionSnapshot = serde_json::from_value(json).expect("deserialize snapshot");
    assert_eq!(back, snapshot);
}
