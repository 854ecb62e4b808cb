// Host-side tests for surface sizing and resize debouncing.

mod common;

use ambient_bg::core::*;
use common::*;

#[test]
fn dpr_is_capped_and_backing_size_is_integral() {
    let cfg = SurfaceConfig::new(800.0, 600.0, 3.0, 2.0);
    assert_eq!(cfg.dpr, 2.0);
    assert_eq!((cfg.physical_width, cfg.physical_height), (1600, 1200));

    let cfg = SurfaceConfig::new(333.3, 200.7, 1.5, 2.0);
    assert_eq!((cfg.physical_width, cfg.physical_height), (499, 301));
}

#[test]
fn degenerate_inputs_still_give_a_one_pixel_surface() {
    let cfg = SurfaceConfig::new(0.0, -10.0, f64::NAN, 2.0);
    assert_eq!(cfg.dpr, 1.0);
    assert_eq!((cfg.physical_width, cfg.physical_height), (1, 1));

    let cfg = SurfaceConfig::new(f64::INFINITY, 100.0, 0.0, 2.0);
    assert_eq!(cfg.physical_width, 1);
    assert_eq!(cfg.physical_height, 100);
}

#[test]
fn pointer_conversion_uses_capped_dpr() {
    let cfg = SurfaceConfig::new(800.0, 600.0, 4.0, 2.0);
    let p = cfg.to_device(glam::Vec2::new(10.0, 20.0));
    assert_eq!(p, glam::Vec2::new(20.0, 40.0));
}

#[test]
fn resize_burst_collapses_into_one_resync() {
    let timers = FakeTimers::default();
    let initial = surface(800.0, 600.0, 1.0);
    let mut mgr = SurfaceManager::new(initial, 2.0, 120, Box::new(timers.clone()));

    for i in 0..10 {
        mgr.on_resize(800.0 + i as f64 * 10.0, 600.0, 1.0);
    }
    assert_eq!(timers.0.borrow().armed, 10);
    assert_eq!(timers.0.borrow().cleared, 9);
    assert_eq!(timers.0.borrow().last_delay, Some(120));
    assert!(mgr.has_pending_resize());

    let next = mgr.on_debounce_elapsed().expect("size changed");
    assert_eq!(next.physical_width, 890);
    assert_eq!(mgr.resync_count(), 1);
    assert!(!mgr.has_pending_resize());

    // timer firing again with nothing pending does nothing
    assert!(mgr.on_debounce_elapsed().is_none());
    assert_eq!(mgr.resync_count(), 1);
}

#[test]
fn unchanged_physical_size_reports_no_change() {
    let timers = FakeTimers::default();
    let mut mgr = SurfaceManager::new(surface(800.0, 600.0, 1.0), 2.0, 120, Box::new(timers));
    mgr.on_resize(800.4, 600.2, 1.0);
    assert!(mgr.on_debounce_elapsed().is_none());
    assert_eq!(mgr.resync_count(), 1);
}

#[test]
fn teardown_cancels_pending_timer_and_is_idempotent() {
    let timers = FakeTimers::default();
    let initial = surface(800.0, 600.0, 1.0);
    let mut mgr = SurfaceManager::new(initial, 2.0, 120, Box::new(timers.clone()));
    mgr.on_resize(1000.0, 600.0, 1.0);
    assert!(timers.is_armed());

    mgr.teardown();
    mgr.teardown();
    assert!(!timers.is_armed());
    assert_eq!(timers.0.borrow().cleared, 1);

    // late events are ignored
    mgr.on_resize(1200.0, 600.0, 1.0);
    assert_eq!(timers.0.borrow().armed, 1);
    assert!(mgr.on_debounce_elapsed().is_none());
    assert_eq!(mgr.config().physical_width, 800);
}
