use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::*;
use crate::flow::chain::chain;
use crate::flow::scheduling::wait_for;
use crate::testing::Harness;
use crate::threading::action::Action;
use crate::threading::join::any;
use crate::threading::task::TaskExt;

/// Frames at which the callback fired while driving the runner for `frames` frames.
fn fire_frames(
    h: &mut Harness,
    runner: &mut EveryRunner,
    frames: u64,
    mut before: impl FnMut(u64),
) -> Vec<(u64, u64)> {
    let mut out = Vec::new();
    for _ in 0..frames {
        let frame = h.frame();
        before(frame);
        assert_eq!(h.tick(runner).unwrap(), Step::Yield);
        let (changed, tick) = {
            let state = runner.state.borrow();
            (state.changed, state.tick)
        };
        // The first firing is cleared by the same resume, so frame 0 is special-cased.
        if changed || frame == 0 {
            out.push((tick, frame));
        }
    }
    out
}

#[test]
fn fires_immediately_then_every_interval() {
    let mut h = Harness::new(10);
    let ticks = Rc::new(RefCell::new(Vec::new()));
    let seen = ticks.clone();
    let (timer, mut runner) = every(0.5, move |t| seen.borrow_mut().push(t));
    assert_eq!(runner.name(), "every");

    let fired = fire_frames(&mut h, &mut runner, 16, |_| {});
    assert_eq!(*ticks.borrow(), vec![0, 1, 2, 3]);
    assert_eq!(fired, vec![(0, 0), (1, 5), (2, 10), (3, 15)]);
    assert_eq!(timer.tick(), 3);
}

#[test]
fn interval_change_keeps_the_tick_counter() {
    let mut h = Harness::new(10);
    let ticks = Rc::new(RefCell::new(Vec::new()));
    let seen = ticks.clone();
    let (timer, mut runner) = every(0.5, move |t| seen.borrow_mut().push(t));

    let fired = fire_frames(&mut h, &mut runner, 21, |frame| {
        if frame == 12 {
            timer.set_interval(1.0);
        }
    });
    assert_eq!(timer.interval(), 1.0);
    assert_eq!(fired, vec![(0, 0), (1, 5), (2, 10), (3, 20)]);
}

#[test]
fn callback_swap_keeps_the_tick_counter() {
    let mut h = Harness::new(10);
    let first = Rc::new(Cell::new(0));
    let second = Rc::new(RefCell::new(Vec::new()));
    let f = first.clone();
    let (timer, mut runner) = every(0.2, move |_| f.set(f.get() + 1));

    for _ in 0..3 {
        h.tick(&mut runner).unwrap();
    }
    let s = second.clone();
    timer.set_callback(move |t| s.borrow_mut().push(t));
    for _ in 0..4 {
        h.tick(&mut runner).unwrap();
    }
    // Fired at frames 0 and 2 with the first callback, 4 and 6 with the second.
    assert_eq!(first.get(), 2);
    assert_eq!(*second.borrow(), vec![2, 3]);
}

#[test]
fn sync_waits_for_the_next_firing() {
    let mut h = Harness::new(10);
    let (timer, runner) = every(0.5, |_| {});
    let mut race = any([
        runner.boxed(),
        chain([Action::task(wait_for(0.7)), Action::task(timer.sync())]).boxed(),
    ]);
    // The wait ends at frame 7, the timer fires next at frame 10.
    assert_eq!(h.steps_to_finish(&mut race), 10);
    assert_eq!(timer.tick(), 2);
}
