use super::*;

fn fps30() -> Fps {
    Fps::whole(30).unwrap()
}

#[test]
fn first_registration_fires_immediately() {
    let mut reg = TimeEventRegistry::new();
    assert_eq!(reg.register("intro", FrameIndex(12)), FrameIndex(12));
    let e = reg.get("intro").unwrap();
    assert_eq!(e.initial_frame, FrameIndex(12));
    assert_eq!(e.offset, 0);
    assert_eq!(reg.len(), 1);
}

#[test]
fn registration_is_idempotent_within_a_pass() {
    let mut reg = TimeEventRegistry::new();
    let a = reg.register("x", FrameIndex(4));
    let rev = reg.revision();
    let b = reg.register("x", FrameIndex(4));
    assert_eq!(a, b);
    assert_eq!(reg.revision(), rev);
}

#[test]
fn external_target_survives_registration() {
    let mut reg = TimeEventRegistry::new();
    reg.set_target("x", FrameIndex(42));
    assert_eq!(reg.register("x", FrameIndex(10)), FrameIndex(42));
    let e = reg.get("x").unwrap();
    assert_eq!(e.initial_frame, FrameIndex(10));
    assert_eq!(e.offset, 32);
}

#[test]
fn preserved_timing_keeps_target_when_registration_moves() {
    let mut reg = TimeEventRegistry::new();
    reg.register("x", FrameIndex(10));
    assert!(reg.set_offset("x", 20, true));
    assert_eq!(reg.get("x").unwrap().target_frame, FrameIndex(30));

    // Something earlier in the scene got longer: the event is reached later.
    assert_eq!(reg.register("x", FrameIndex(15)), FrameIndex(30));
    assert_eq!(reg.get("x").unwrap().offset, 15);
}

#[test]
fn unpreserved_timing_keeps_offset_when_registration_moves() {
    let mut reg = TimeEventRegistry::new();
    reg.register("x", FrameIndex(10));
    assert!(reg.set_offset("x", 20, false));
    assert!(!reg.preserve_timing());
    assert_eq!(reg.register("x", FrameIndex(15)), FrameIndex(35));
}

#[test]
fn set_offset_ignores_unknown_and_unchanged_events() {
    let mut reg = TimeEventRegistry::new();
    assert!(!reg.set_offset("missing", 3, true));
    reg.register("x", FrameIndex(0));
    assert!(!reg.set_offset("x", 0, true));
}

#[test]
fn saved_events_round_trip_through_json() {
    let mut reg = TimeEventRegistry::new();
    reg.register("b", FrameIndex(30));
    reg.set_target("a", FrameIndex(45));
    let json = reg.to_json(fps30()).unwrap();

    let mut other = TimeEventRegistry::new();
    other.load_json(&json, fps30()).unwrap();
    let names: Vec<_> = other.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b"]);
    assert_eq!(other.get("a").unwrap().target_frame, FrameIndex(45));
    assert_eq!(other.get("b").unwrap().target_frame, FrameIndex(30));
}

#[test]
fn load_keeps_runtime_bookkeeping_of_known_events() {
    let mut reg = TimeEventRegistry::new();
    reg.register("x", FrameIndex(10));
    reg.register("gone", FrameIndex(2));
    reg.load(
        &[SavedTimeEvent {
            name: "x".to_owned(),
            target_time: 2.0,
        }],
        fps30(),
    );
    let e = reg.get("x").unwrap();
    assert_eq!(e.initial_frame, FrameIndex(10));
    assert_eq!(e.target_frame, FrameIndex(60));
    assert!(reg.get("gone").is_none());
}

#[test]
fn malformed_json_is_a_serde_error() {
    let mut reg = TimeEventRegistry::new();
    let err = reg.load_json("{not json", fps30()).unwrap_err();
    assert!(err.to_string().contains("serialization error:"));
}
