#![forbid(unsafe_code)]

//! End-to-end navigation scenarios through the shared handle.
//!
//! Run:
//!   cargo test -p spotlight-tour --test tour_scenarios

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use spotlight_core::{Rect, Spot};
use spotlight_tour::{
    SpotlightTour, SpotlightTourProvider, StepHookError, TourEvent, TourState, TourStatus,
    TourStep,
};

fn steps(n: usize) -> Vec<TourStep> {
    (0..n)
        .map(|i| TourStep::new(format!("step-{i}")).title(format!("Step {i}")))
        .collect()
}

fn tour_with_stops(n: usize) -> (SpotlightTour, Rc<RefCell<Vec<TourState>>>) {
    let stops = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&stops);
    let tour = SpotlightTourProvider::new()
        .steps(steps(n))
        .on_stop(move |state| sink.borrow_mut().push(state))
        .build();
    (tour, stops)
}

#[test]
fn three_step_walkthrough() {
    let (tour, stops) = tour_with_stops(3);
    assert_eq!(tour.current(), -1);
    assert_eq!(tour.status(), TourStatus::Idle);

    tour.start();
    assert_eq!(tour.current(), 0);
    tour.next();
    assert_eq!(tour.current(), 1);
    tour.previous();
    assert_eq!(tour.current(), 0);
    tour.next();
    tour.next();
    assert_eq!(tour.current(), 2);
    tour.next();

    assert_eq!(tour.status(), TourStatus::Idle);
    assert_eq!(tour.current(), -1);
    assert_eq!(
        *stops.borrow(),
        vec![TourState {
            index: 2,
            is_last: true
        }]
    );
}

#[test]
fn next_on_last_matches_stop() {
    let (via_next, next_stops) = tour_with_stops(3);
    via_next.start();
    via_next.go_to(2);
    via_next.next();

    let (via_stop, stop_stops) = tour_with_stops(3);
    via_stop.start();
    via_stop.go_to(2);
    via_stop.stop();

    assert_eq!(via_next.status(), via_stop.status());
    assert_eq!(via_next.current(), via_stop.current());
    assert_eq!(*next_stops.borrow(), *stop_stops.borrow());
}

#[test]
fn stop_mid_tour_reports_not_last() {
    let (tour, stops) = tour_with_stops(3);
    tour.start();
    tour.next();
    tour.stop();
    tour.stop();
    assert_eq!(
        *stops.borrow(),
        vec![TourState {
            index: 1,
            is_last: false
        }]
    );
}

#[test]
fn go_to_out_of_range_changes_nothing() {
    let (tour, _) = tour_with_stops(3);
    tour.start();
    tour.next();
    for index in [-1, 3, 42, isize::MIN, isize::MAX] {
        tour.go_to(index);
        assert_eq!(tour.current(), 1, "go_to({index})");
        assert_eq!(tour.status(), TourStatus::Running);
    }
}

#[test]
fn pause_and_resume() {
    let (tour, _) = tour_with_stops(3);
    tour.start();
    tour.pause();
    assert_eq!(tour.status(), TourStatus::Paused);
    tour.next();
    tour.previous();
    assert_eq!(tour.current(), 0);
    tour.resume();
    assert_eq!(tour.status(), TourStatus::Running);
    tour.pause();
    tour.go_to(2);
    assert_eq!(tour.status(), TourStatus::Running);
    assert_eq!(tour.current(), 2);
}

#[test]
fn empty_tour_never_starts() {
    let (tour, stops) = tour_with_stops(0);
    tour.start();
    tour.next();
    tour.go_to(0);
    tour.stop();
    assert_eq!(tour.status(), TourStatus::Idle);
    assert_eq!(tour.current(), -1);
    assert!(stops.borrow().is_empty());
}

#[test]
fn clones_share_state() {
    let (tour, _) = tour_with_stops(3);
    let other = tour.clone();
    tour.start();
    other.next();
    assert_eq!(tour.current(), 1);
    assert_eq!(other.current(), 1);
}

#[test]
fn bridge_reports_transitions() {
    let (tour, _) = tour_with_stops(2);
    let kinds = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&kinds);
    let _sub = tour.subscribe(move |event| {
        if !matches!(event, TourEvent::SpotChanged(_)) {
            sink.borrow_mut().push(event.clone());
        }
    });

    tour.start();
    tour.next();
    tour.next();
    assert_eq!(
        *kinds.borrow(),
        vec![
            TourEvent::Started { index: 0 },
            TourEvent::StepChanged { from: 0, to: 1 },
            TourEvent::Stopped(TourState {
                index: 1,
                is_last: true
            }),
        ]
    );
}

#[test]
fn listener_can_drive_the_tour() {
    let (tour, _) = tour_with_stops(3);
    let handle = tour.clone();
    let _sub = tour.subscribe(move |event| {
        if let TourEvent::Started { .. } = event {
            handle.go_to(2);
        }
    });
    tour.start();
    assert_eq!(tour.current(), 2);
}

#[test]
fn on_stop_can_restart() {
    let restarts = Rc::new(Cell::new(0));
    let slot: Rc<RefCell<Option<SpotlightTour>>> = Rc::new(RefCell::new(None));
    let (counter, weak_slot) = (Rc::clone(&restarts), Rc::clone(&slot));
    let tour = SpotlightTourProvider::new()
        .steps(steps(1))
        .on_stop(move |_| {
            if counter.get() == 0 {
                counter.set(1);
                if let Some(tour) = weak_slot.borrow().as_ref() {
                    tour.start();
                }
            }
        })
        .build();
    *slot.borrow_mut() = Some(tour.clone());

    tour.start();
    tour.next();
    assert_eq!(restarts.get(), 1);
    assert_eq!(tour.status(), TourStatus::Running);
    *slot.borrow_mut() = None;
}

type EventLog = Rc<RefCell<Vec<TourEvent>>>;

fn record(tour: &SpotlightTour) -> (EventLog, spotlight_tour::Subscription) {
    let log: EventLog = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    let sub = tour.subscribe(move |event| sink.borrow_mut().push(event.clone()));
    (log, sub)
}

fn kinds(log: &EventLog) -> Vec<&'static str> {
    log.borrow().iter().map(TourEvent::kind).collect()
}

fn last_spot(log: &EventLog) -> Option<Option<Spot>> {
    log.borrow().iter().rev().find_map(|event| match event {
        TourEvent::SpotChanged(spot) => Some(spot.clone()),
        _ => None,
    })
}

#[test]
fn jump_from_listener_ends_on_current_spot() {
    let (tour, _) = tour_with_stops(3);
    let first = tour.attach(0);
    first.layout(Rect::new(0.0, 0.0, 10.0, 10.0));
    let third = tour.attach(2);
    third.layout(Rect::new(200.0, 200.0, 10.0, 10.0));

    let handle = tour.clone();
    let _driver = tour.subscribe(move |event| {
        if let TourEvent::Started { .. } = event {
            handle.go_to(2);
        }
    });
    let (log, _recorder) = record(&tour);

    tour.start();
    assert_eq!(tour.current(), 2);
    assert_eq!(
        kinds(&log),
        vec!["started", "spot_changed", "step_changed", "spot_changed"]
    );
    let current = tour.spot();
    assert_eq!(current.as_ref().map(|spot| spot.target.x), Some(200.0));
    assert_eq!(last_spot(&log), Some(current));
}

#[test]
fn restart_from_on_stop_is_delivered_after_the_stop() {
    let restarted = Rc::new(Cell::new(false));
    let slot: Rc<RefCell<Option<SpotlightTour>>> = Rc::new(RefCell::new(None));
    let (flag, handle_slot) = (Rc::clone(&restarted), Rc::clone(&slot));
    let tour = SpotlightTourProvider::new()
        .steps(steps(1))
        .on_stop(move |_| {
            if !flag.replace(true)
                && let Some(tour) = handle_slot.borrow().as_ref()
            {
                tour.start();
            }
        })
        .build();
    *slot.borrow_mut() = Some(tour.clone());
    let element = tour.attach(0);
    element.layout(Rect::new(5.0, 5.0, 20.0, 20.0));
    let (log, _recorder) = record(&tour);

    tour.start();
    tour.next();
    assert_eq!(tour.status(), TourStatus::Running);
    assert_eq!(
        kinds(&log),
        vec![
            "started",
            "spot_changed",
            "stopped",
            "spot_changed",
            "started",
            "spot_changed",
        ]
    );
    assert!(matches!(log.borrow().last(), Some(TourEvent::SpotChanged(Some(_)))));
    assert_eq!(last_spot(&log), Some(tour.spot()));
    *slot.borrow_mut() = None;
}

#[test]
fn set_steps_applies_on_next_run() {
    let (tour, _) = tour_with_stops(3);
    tour.start();
    tour.set_steps(steps(5));
    assert_eq!(tour.step_count(), 3, "running tour keeps its list");
    tour.go_to(4);
    assert_eq!(tour.current(), 0);

    tour.stop();
    tour.start();
    assert_eq!(tour.step_count(), 5);
    tour.go_to(4);
    assert_eq!(tour.current(), 4);
}

#[test]
fn set_steps_while_idle_applies_immediately() {
    let (tour, _) = tour_with_stops(3);
    tour.set_steps(steps(1));
    assert_eq!(tour.step_count(), 1);
}

#[test]
fn failing_before_hook_blocks_transition() {
    let ready = Rc::new(Cell::new(false));
    let gate = Rc::clone(&ready);
    let tour = SpotlightTourProvider::new()
        .step(TourStep::new("a"))
        .step(TourStep::new("b").before(move || {
            if gate.get() {
                Ok(())
            } else {
                Err(StepHookError::new("list not loaded"))
            }
        }))
        .build();

    tour.start();
    tour.next();
    assert_eq!(tour.current(), 0);
    ready.set(true);
    tour.next();
    assert_eq!(tour.current(), 1);
}

#[test]
fn before_hook_runs_on_start_and_jump_only() {
    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    let tour = SpotlightTourProvider::new()
        .step(TourStep::new("a").before(move || {
            counter.set(counter.get() + 1);
            Ok(())
        }))
        .step(TourStep::new("b"))
        .build();

    tour.start();
    tour.pause();
    tour.resume();
    tour.next();
    tour.go_to(0);
    assert_eq!(calls.get(), 2);
}

#[test]
fn before_hook_reentry_supersedes_plan() {
    let slot: Rc<RefCell<Option<SpotlightTour>>> = Rc::new(RefCell::new(None));
    let hook_slot = Rc::clone(&slot);
    let tour = SpotlightTourProvider::new()
        .step(TourStep::new("a"))
        .step(TourStep::new("b").before(move || {
            if let Some(tour) = hook_slot.borrow().as_ref() {
                tour.stop();
            }
            Ok(())
        }))
        .build();
    *slot.borrow_mut() = Some(tour.clone());

    tour.start();
    tour.next();
    assert_eq!(tour.status(), TourStatus::Idle);
    assert_eq!(tour.current(), -1);
    *slot.borrow_mut() = None;
}

#[test]
fn standard_render_reflects_position() {
    let (tour, _) = tour_with_stops(2);
    assert!(tour.render().is_none());
    tour.start();
    let first = tour.render().expect("view");
    assert_eq!(first.title, "Step 0");
    assert_eq!(first.progress, "1 of 2");
    assert!(!first.controls.previous);
    assert_eq!(first.next_label, "Next");

    tour.next();
    let last = tour.render().expect("view");
    assert!(last.controls.previous);
    assert_eq!(last.next_label, "Done");
}

#[test]
fn render_hook_gets_live_handle() {
    let tour = SpotlightTourProvider::new()
        .step(TourStep::new("custom").render(|props| {
            let mut view = spotlight_tour::StepView::standard(props);
            view.body = format!("status={}", props.tour.status());
            view
        }))
        .build();
    tour.start();
    assert_eq!(tour.render().expect("view").body, "status=running");
}
