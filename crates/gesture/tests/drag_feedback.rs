//! Integration tests: tracker offsets rendered through the presenter.

use gesture::{
    AnimationPresenter, GestureConfig, GestureTracker, PointerSample, ReleaseOutcome,
    SwipeDirection, TrackerEvent,
};
use std::time::Duration;

const WIDTH: f32 = 390.0;

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

#[test]
fn test_feedback_follows_drag_and_exit() {
    init_tracing();
    let presenter = AnimationPresenter::default();
    let mut tracker = GestureTracker::new(GestureConfig::default(), WIDTH);

    tracker.pointer_down(PointerSample::new(50.0, 400.0, Duration::ZERO));

    // Slow drag to the left, one sample per frame
    let mut last_reject = 0.0;
    let mut t = 0;
    for step in 1..=30 {
        t = step * 16;
        let x = 50.0 - step as f32 * 4.0;
        if let Some(offset) = tracker.pointer_move(PointerSample::new(x, 401.0, Duration::from_millis(t))) {
            let visual = presenter.visual(offset, WIDTH);
            assert!(visual.rotation_degrees <= 0.0);
            assert_eq!(visual.accept_badge_opacity, 0.0);
            assert!(visual.reject_badge_opacity >= last_reject);
            last_reject = visual.reject_badge_opacity;
        }
    }
    assert!(last_reject > 0.9, "120px of 390 should nearly saturate the reject badge");

    // Hold still for a moment so the release is not a fling
    let release = PointerSample::new(-70.0, 401.0, Duration::from_millis(t + 400));
    assert_eq!(tracker.pointer_up(release), ReleaseOutcome::Commit(SwipeDirection::Left));

    let mut committed = None;
    let mut frame = t + 400;
    while committed.is_none() {
        frame += 16;
        let event = tracker.tick(Duration::from_millis(frame));
        let visual = presenter.visual(tracker.offset(), WIDTH);
        assert!(visual.rotation_degrees >= -10.0);
        if let Some(TrackerEvent::Committed { direction, .. }) = event {
            committed = Some(direction);
        }
        assert!(frame < t + 2000);
    }
    assert_eq!(committed, Some(SwipeDirection::Left));
}

#[test]
fn test_scroll_never_moves_the_card() {
    init_tracing();
    let presenter = AnimationPresenter::default();
    let mut tracker = GestureTracker::new(GestureConfig::default(), WIDTH);

    tracker.pointer_down(PointerSample::new(200.0, 100.0, Duration::ZERO));
    for step in 1..=20 {
        let sample = PointerSample::new(200.0 + step as f32, 100.0 + step as f32 * 12.0, Duration::from_millis(step * 16));
        assert_eq!(tracker.pointer_move(sample), None);
    }

    let visual = presenter.visual(tracker.offset(), WIDTH);
    assert_eq!(visual.offset, 0.0);
    assert_eq!(visual.tint, presenter.palette.neutral);
}
