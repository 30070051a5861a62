#![forbid(unsafe_code)]

//! Property tests for tour navigation invariants.
//!
//! Validates:
//! - `current` stays in `[0, len)` while active and is `-1` exactly when idle.
//! - Out-of-range `go_to` never changes `current` or `status`.
//! - Every stop emits exactly one notification with a correct `is_last`.

use std::cell::RefCell;
use std::rc::Rc;

use proptest::prelude::*;

use spotlight_tour::{SpotlightTourProvider, TourState, TourStatus, TourStep};

#[derive(Debug, Clone, Copy)]
enum Action {
    Start,
    Next,
    Previous,
    GoTo(isize),
    Pause,
    Resume,
    Stop,
    Backdrop,
}

fn action_strategy() -> impl Strategy<Value = Action> {
    prop_oneof![
        2 => Just(Action::Start),
        4 => Just(Action::Next),
        3 => Just(Action::Previous),
        3 => (-3isize..12).prop_map(Action::GoTo),
        1 => Just(Action::Pause),
        1 => Just(Action::Resume),
        1 => Just(Action::Stop),
        2 => Just(Action::Backdrop),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn current_and_status_stay_consistent(
        len in 0usize..6,
        actions in prop::collection::vec(action_strategy(), 1..80)
    ) {
        let stops = Rc::new(RefCell::new(Vec::<TourState>::new()));
        let sink = Rc::clone(&stops);
        let tour = SpotlightTourProvider::new()
            .steps((0..len).map(|i| TourStep::new(format!("s{i}"))).collect())
            .on_stop(move |state| sink.borrow_mut().push(state))
            .build();

        for action in actions {
            let before_current = tour.current();
            let before_status = tour.status();
            let before_stops = stops.borrow().len();

            match action {
                Action::Start => tour.start(),
                Action::Next => tour.next(),
                Action::Previous => tour.previous(),
                Action::GoTo(index) => tour.go_to(index),
                Action::Pause => tour.pause(),
                Action::Resume => tour.resume(),
                Action::Stop => tour.stop(),
                Action::Backdrop => tour.press_backdrop(),
            }

            let current = tour.current();
            let status = tour.status();
            if status == TourStatus::Idle {
                prop_assert_eq!(current, -1);
            } else {
                prop_assert!(current >= 0 && (current as usize) < len);
            }

            let rejected_jump = matches!(
                action,
                Action::GoTo(index) if index < 0 || index as usize >= len
            );
            if rejected_jump {
                prop_assert_eq!(current, before_current);
                prop_assert_eq!(status, before_status);
            }

            let emitted = stops.borrow().len() - before_stops;
            let stopped = before_status != TourStatus::Idle && status == TourStatus::Idle;
            prop_assert_eq!(emitted, usize::from(stopped));
            if stopped {
                let state = *stops.borrow().last().expect("stop state");
                prop_assert_eq!(state.index as isize, before_current);
                prop_assert_eq!(state.is_last, state.index + 1 == len);
            }
        }
    }
}
