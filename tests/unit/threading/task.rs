use std::cell::Cell;
use std::rc::Rc;

use super::*;
use crate::testing::{Harness, counting};

#[test]
fn fn_task_runs_one_body_call_per_resume() {
    let mut h = Harness::new(30);
    let calls = Rc::new(Cell::new(0u64));
    let mut task = counting("count", 3, calls.clone());

    assert_eq!(h.tick(&mut task).unwrap(), Step::Yield);
    assert_eq!(calls.get(), 1);
    assert_eq!(h.steps_to_finish(&mut task), 2);
    assert_eq!(calls.get(), 3);
}

#[test]
fn named_overrides_display_name_only() {
    let mut h = Harness::new(30);
    let calls = Rc::new(Cell::new(0u64));
    let mut task = counting("count", 1, calls.clone()).named("renamed");
    assert_eq!(task.name(), "renamed");
    assert_eq!(h.steps_to_finish(&mut task), 1);
}

#[test]
fn boxed_task_delegates() {
    let mut h = Harness::new(30);
    let calls = Rc::new(Cell::new(0u64));
    let mut task: BoxTask = counting("count", 2, calls.clone()).boxed();
    assert_eq!(task.name(), "count");
    assert_eq!(h.steps_to_finish(&mut task), 2);
}

#[test]
fn fused_never_resumes_past_the_end() {
    let mut h = Harness::new(30);
    let resumes = Rc::new(Cell::new(0u64));
    let seen = resumes.clone();
    let mut fused = Fused::new(
        from_fn("once", move |_cx| {
            seen.set(seen.get() + 1);
            Ok(Step::Done)
        })
        .boxed(),
    );
    h.with_ctx(|cx| {
        assert_eq!(fused.resume(cx).unwrap(), Step::Done);
        assert_eq!(fused.resume(cx).unwrap(), Step::Done);
    });
    assert!(fused.is_done());
    assert_eq!(resumes.get(), 1);
}
