use std::cell::Cell;
use std::rc::Rc;

use super::*;
use crate::testing::{Harness, counting};

#[test]
fn wait_for_consumes_exact_frame_counts() {
    for (seconds, expected) in [(0.0, 0), (0.5, 15), (1.0, 30), (2.333, 70)] {
        let mut h = Harness::new(30);
        let mut wait = wait_for(seconds);
        assert_eq!(h.steps_to_finish(&mut wait), expected, "seconds={seconds}");
    }
}

#[test]
fn wait_for_counts_from_its_first_resume() {
    let mut h = Harness::at_frame(10, 37);
    let mut wait = wait_for(1.0);
    assert_eq!(h.steps_to_finish(&mut wait), 10);
    assert_eq!(h.frame(), 48);
}

#[test]
fn negative_wait_does_not_block() {
    let mut h = Harness::new(30);
    let mut wait = wait_for(-2.0);
    assert_eq!(h.steps_to_finish(&mut wait), 0);
}

#[test]
fn wait_for_then_runs_the_action_after_the_wait() {
    let mut h = Harness::new(10);
    let counter = Rc::new(Cell::new(0));
    let mut wait = wait_for_then(0.5, Action::task(counting("after", 3, counter.clone())));
    assert_eq!(wait.name(), "wait_for");
    for _ in 0..5 {
        h.tick(&mut wait).unwrap();
    }
    assert_eq!(counter.get(), 0);
    assert_eq!(h.steps_to_finish(&mut wait), 3);
    assert_eq!(counter.get(), 3);
}

#[test]
fn delay_runs_a_callable_once_the_time_passed() {
    let mut h = Harness::new(10);
    let fired_at = Rc::new(Cell::new(None));
    let slot = fired_at.clone();
    let mut task = delay(
        0.3,
        Action::call(move || slot.set(Some(()))),
    );
    assert_eq!(task.name(), "delay");
    assert_eq!(task.seconds(), 0.3);
    assert_eq!(h.steps_to_finish(&mut task), 3);
    assert!(fired_at.get().is_some());
}

#[test]
fn wait_until_blocks_until_the_scheduled_frame() {
    let mut h = Harness::at_frame(30, 10);
    h.project.events_mut().set_target("x", FrameIndex(42));
    let mut wait = wait_until("x");
    assert_eq!(wait.event(), "x");
    assert_eq!(h.steps_to_finish(&mut wait), 32);
    assert_eq!(h.frame(), 43);
}

#[test]
fn wait_until_a_past_event_does_not_block() {
    let mut h = Harness::at_frame(30, 10);
    h.project.events_mut().set_target("x", FrameIndex(5));
    let mut wait = wait_until("x");
    assert_eq!(h.steps_to_finish(&mut wait), 0);
}

#[test]
fn unscheduled_event_fires_at_registration() {
    let mut h = Harness::at_frame(30, 7);
    let mut wait = wait_until("fresh");
    assert_eq!(h.steps_to_finish(&mut wait), 0);
    let e = h.project.events().get("fresh").unwrap();
    assert_eq!(e.target_frame, FrameIndex(7));
}

#[test]
fn wait_until_then_runs_after_the_event() {
    let mut h = Harness::new(30);
    h.project.events_mut().set_target("go", FrameIndex(4));
    let counter = Rc::new(Cell::new(0));
    let mut wait = wait_until_then("go", Action::task(counting("after", 2, counter.clone())));
    assert_eq!(h.steps_to_finish(&mut wait), 6);
    assert_eq!(counter.get(), 2);
}
