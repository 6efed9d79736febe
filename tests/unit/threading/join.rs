use std::cell::Cell;
use std::rc::Rc;

use super::*;
use crate::FlowError;
use crate::testing::{Harness, counting, finishing};
use crate::threading::task::{TaskExt, from_fn};
use crate::threading::thread::Thread;

#[test]
fn all_waits_for_the_slowest_member() {
    let mut h = Harness::new(30);
    let a = Rc::new(Cell::new(0));
    let b = Rc::new(Cell::new(0));
    let mut join = all([
        counting("a", 3, a.clone()).boxed(),
        counting("b", 5, b.clone()).boxed(),
    ]);
    assert_eq!(join.name(), "all");

    for _ in 0..3 {
        assert_eq!(h.tick(&mut join).unwrap(), Step::Yield);
    }
    assert_eq!(a.get(), 3);
    assert_eq!(b.get(), 3);

    assert_eq!(h.steps_to_finish(&mut join), 2);
    assert_eq!(a.get(), 3);
    assert_eq!(b.get(), 5);
}

#[test]
fn all_completes_in_exactly_the_longest_duration() {
    let mut h = Harness::new(30);
    let a = Rc::new(Cell::new(0));
    let b = Rc::new(Cell::new(0));
    let mut join = all([
        counting("a", 3, a.clone()).boxed(),
        counting("b", 5, b.clone()).boxed(),
    ]);
    assert_eq!(h.steps_to_finish(&mut join), 5);
}

#[test]
fn all_of_nothing_finishes_on_the_first_resume() {
    let mut h = Harness::new(30);
    let mut join = all(Vec::new());
    assert!(join.is_empty());
    assert_eq!(h.tick(&mut join).unwrap(), Step::Done);
}

#[test]
fn all_detects_simultaneous_finishers_in_one_pass() {
    let mut h = Harness::new(30);
    let a = Rc::new(Cell::new(0));
    let b = Rc::new(Cell::new(0));
    let mut join = all([
        counting("a", 4, a.clone()).boxed(),
        counting("b", 4, b.clone()).boxed(),
    ]);
    assert_eq!(h.steps_to_finish(&mut join), 4);
}

#[test]
fn any_abandons_the_slower_member() {
    let mut h = Harness::new(30);
    let a = Rc::new(Cell::new(0));
    let b = Rc::new(Cell::new(0));
    let mut join = any([
        finishing("a", 2, a.clone()).boxed(),
        finishing("b", 10, b.clone()).boxed(),
    ]);
    assert_eq!(join.name(), "any");
    assert_eq!(h.resumes_to_finish(&mut join), 2);
    assert_eq!(a.get(), 2);
    assert_eq!(b.get(), 2);

    // Abandoned: further resumes of the finished group leave `b` alone.
    h.tick(&mut join).unwrap();
    assert_eq!(b.get(), 2);
}

#[test]
fn any_outcome_does_not_depend_on_argument_order() {
    let race = |winner_first: bool| {
        let mut h = Harness::new(30);
        let a = Rc::new(Cell::new(0));
        let b = Rc::new(Cell::new(0));
        let winner = finishing("a", 2, a.clone()).boxed();
        let loser = finishing("b", 10, b.clone()).boxed();
        let mut join = if winner_first {
            any([winner, loser])
        } else {
            any([loser, winner])
        };
        (h.resumes_to_finish(&mut join), a.get(), b.get())
    };
    assert_eq!(race(true), (2, 2, 2));
    assert_eq!(race(false), race(true));
}

#[test]
fn any_advances_every_member_in_the_finishing_pass() {
    let mut h = Harness::new(30);
    let a = Rc::new(Cell::new(0));
    let b = Rc::new(Cell::new(0));
    let c = Rc::new(Cell::new(0));
    let mut join = any([
        counting("a", 5, a.clone()).boxed(),
        finishing("b", 1, b.clone()).boxed(),
        counting("c", 5, c.clone()).boxed(),
    ]);
    assert_eq!(h.tick(&mut join).unwrap(), Step::Done);
    assert_eq!((a.get(), b.get(), c.get()), (1, 1, 1));
}

#[test]
fn any_of_nothing_finishes_immediately() {
    let mut h = Harness::new(30);
    let mut join = any(Vec::new());
    assert_eq!(join.mode(), JoinMode::Any);
    assert_eq!(h.steps_to_finish(&mut join), 0);
}

#[test]
fn member_error_aborts_the_group() {
    let mut h = Harness::new(30);
    let b = Rc::new(Cell::new(0));
    let mut ticks = 0;
    let failing = from_fn("failing", move |_cx| {
        ticks += 1;
        if ticks == 2 {
            return Err(FlowError::runtime("member failed"));
        }
        Ok(Step::Yield)
    });
    let mut join = all([failing.boxed(), counting("b", 10, b.clone()).boxed()]);
    assert_eq!(h.tick(&mut join).unwrap(), Step::Yield);
    assert!(h.tick(&mut join).is_err());
    // `b` was not advanced in the failing pass.
    assert_eq!(b.get(), 1);
}

#[test]
fn join_waits_for_spawned_threads() {
    let mut h = Harness::new(30);
    let short = Rc::new(Cell::new(0));
    let long = Rc::new(Cell::new(0));
    let joined_at = Rc::new(Cell::new(None));

    let (s, l, at) = (short.clone(), long.clone(), joined_at.clone());
    let mut waiting: Option<JoinThreads> = None;
    let body = from_fn("parent", move |cx| {
        let join_task = waiting.get_or_insert_with(|| {
            let a = cx.spawn(counting("short", 2, s.clone()));
            let b = cx.spawn(counting("long", 4, l.clone()));
            join([a, b])
        });
        if join_task.resume(cx)?.is_done() {
            at.set(Some(cx.frame().0));
            return Ok(Step::Done);
        }
        Ok(Step::Yield)
    });

    let mut thread = Thread::new(body.boxed());
    for _ in 0..10 {
        h.step_thread(&mut thread).unwrap();
    }
    assert_eq!(short.get(), 2);
    assert_eq!(long.get(), 4);
    // The long child yields on frames 0..=3 and ends on frame 4; the parent sees that at 5.
    assert_eq!(joined_at.get(), Some(5));
}

#[test]
fn join_any_resolves_on_first_ended_thread() {
    let mut h = Harness::new(30);
    let short = Rc::new(Cell::new(0));
    let long = Rc::new(Cell::new(0));
    let joined_at = Rc::new(Cell::new(None));

    let (s, l, at) = (short.clone(), long.clone(), joined_at.clone());
    let mut waiting: Option<JoinThreads> = None;
    let body = from_fn("parent", move |cx| {
        let join_task = waiting.get_or_insert_with(|| {
            let a = cx.spawn(counting("short", 1, s.clone()));
            let b = cx.spawn(counting("long", 6, l.clone()));
            join_any([a, b])
        });
        if join_task.resume(cx)?.is_done() {
            at.set(Some(cx.frame().0));
            return Ok(Step::Done);
        }
        Ok(Step::Yield)
    });

    let mut thread = Thread::new(body.boxed());
    for _ in 0..10 {
        h.step_thread(&mut thread).unwrap();
    }
    assert_eq!(joined_at.get(), Some(2));
    // The long child was abandoned together with its parent.
    assert_eq!(long.get(), 2);
}
