//! Animation Instance Tests
//!
//! Tests for:
//! - Loop modes (one-shot clamp, loop wrap, ping-pong reflection)
//! - Work-area clipping of the time cursor
//! - Total-time bookkeeping used by state-machine exit times

mod common;

use std::sync::Arc;

use vexel::animation::{LinearAnimation, LinearAnimationInstance, LoopMode};

fn make_animation(loop_mode: LoopMode, fps: u32, duration: u32) -> Arc<LinearAnimation> {
    Arc::new(LinearAnimation {
        name: "test".to_string(),
        fps,
        duration,
        speed: 1.0,
        loop_mode,
        work_start: 0,
        work_end: 0,
        enable_work_area: false,
        keyed_objects: Vec::new(),
    })
}

// ============================================================================
// One-shot
// ============================================================================

#[test]
fn one_shot_clamps_at_end() {
    // 60 frames at 60 fps: one second long.
    let mut instance = LinearAnimationInstance::new(make_animation(LoopMode::OneShot, 60, 60));
    let keep_going = instance.advance(2.5);
    assert!(common::approx(instance.time(), 1.0));
    assert!(!keep_going, "clamped one-shot cannot make progress");
    assert!(instance.did_loop());
}

#[test]
fn one_shot_landing_exactly_on_end_is_not_a_loop() {
    let mut instance = LinearAnimationInstance::new(make_animation(LoopMode::OneShot, 60, 60));
    let keep_going = instance.advance(1.0);
    assert!(common::approx(instance.time(), 1.0));
    assert!(keep_going);
    assert!(!instance.did_loop());
}

#[test]
fn one_shot_never_wraps() {
    let mut instance = LinearAnimationInstance::new(make_animation(LoopMode::OneShot, 60, 60));
    instance.advance(10.0);
    instance.advance(10.0);
    assert!(common::approx(instance.time(), 1.0));
}

// ============================================================================
// Loop
// ============================================================================

#[test]
fn loop_wraps_past_end() {
    let mut instance = LinearAnimationInstance::new(make_animation(LoopMode::Loop, 60, 60));
    let keep_going = instance.advance(1.25);
    assert!(common::approx(instance.time(), 0.25), "time {}", instance.time());
    assert!(keep_going);
    assert!(instance.did_loop());
}

#[test]
fn loop_at_exact_duration_reads_as_start() {
    let mut instance = LinearAnimationInstance::new(make_animation(LoopMode::Loop, 60, 60));
    instance.advance(1.0);
    assert!(common::approx(instance.time(), 0.0), "time {}", instance.time());
    assert!(instance.did_loop());
}

#[test]
fn loop_handles_many_laps_in_one_advance() {
    let mut instance = LinearAnimationInstance::new(make_animation(LoopMode::Loop, 60, 60));
    instance.advance(5.5);
    assert!(common::approx(instance.time(), 0.5), "time {}", instance.time());
    assert!(instance.did_loop());
}

// ============================================================================
// Ping-pong
// ============================================================================

#[test]
fn ping_pong_reflects_at_end() {
    let mut instance = LinearAnimationInstance::new(make_animation(LoopMode::PingPong, 60, 60));
    instance.advance(1.25);
    assert!(common::approx(instance.time(), 0.75), "time {}", instance.time());
    assert!(common::approx(instance.direction(), -1.0));
    assert!(instance.did_loop());
}

#[test]
fn ping_pong_three_durations_restores_direction() {
    let mut instance = LinearAnimationInstance::new(make_animation(LoopMode::PingPong, 60, 60));
    let start_direction = instance.direction();
    instance.advance(3.0);
    assert!(common::approx(instance.direction(), start_direction));
    assert!(common::approx(instance.time(), 1.0), "time {}", instance.time());
}

#[test]
fn ping_pong_round_trip_returns_home() {
    let mut instance = LinearAnimationInstance::new(make_animation(LoopMode::PingPong, 60, 60));
    instance.advance(2.0);
    assert!(common::approx(instance.time(), 0.0), "time {}", instance.time());
    // The cursor sits on the boundary still pointed backwards; the next
    // advance reflects it immediately.
    assert!(common::approx(instance.direction(), -1.0));
}

// ============================================================================
// Work area
// ============================================================================

#[test]
fn work_area_clips_cursor_range() {
    let animation = Arc::new(LinearAnimation {
        name: "work".to_string(),
        fps: 60,
        duration: 120,
        speed: 1.0,
        loop_mode: LoopMode::Loop,
        work_start: 30,
        work_end: 90,
        enable_work_area: true,
        keyed_objects: Vec::new(),
    });
    assert!(common::approx(animation.start_seconds(), 0.5));
    assert!(common::approx(animation.end_seconds(), 1.5));

    let mut instance = LinearAnimationInstance::new(Arc::clone(&animation));
    assert!(common::approx(instance.time(), 0.5), "cursor starts at work start");

    instance.advance(1.25);
    assert!(
        instance.time() >= 0.5 && instance.time() <= 1.5,
        "cursor {} escaped the work area",
        instance.time()
    );
    assert!(common::approx(instance.time(), 0.75));
}

#[test]
fn negative_speed_starts_at_end() {
    let animation = Arc::new(LinearAnimation {
        name: "reverse".to_string(),
        fps: 60,
        duration: 60,
        speed: -1.0,
        loop_mode: LoopMode::OneShot,
        work_start: 0,
        work_end: 0,
        enable_work_area: false,
        keyed_objects: Vec::new(),
    });
    let mut instance = LinearAnimationInstance::new(animation);
    assert!(common::approx(instance.time(), 1.0));

    // Negative speed runs the cursor backwards and clamps at the start.
    let keep_going = instance.advance(2.0);
    assert!(common::approx(instance.time(), 0.0));
    assert!(!keep_going);
}

// ============================================================================
// Bookkeeping
// ============================================================================

#[test]
fn total_time_accumulates_across_loops() {
    let mut instance = LinearAnimationInstance::new(make_animation(LoopMode::Loop, 60, 60));
    instance.advance(0.75);
    instance.advance(0.75);
    // The cursor wrapped but the animation has played 1.5 seconds in total;
    // exit-time accounting relies on this.
    assert!(common::approx(instance.time(), 0.5));
}

#[test]
fn set_time_resets_loop_state() {
    let mut instance = LinearAnimationInstance::new(make_animation(LoopMode::PingPong, 60, 60));
    instance.advance(1.25);
    assert!(common::approx(instance.direction(), -1.0));

    instance.set_time(0.25);
    assert!(common::approx(instance.time(), 0.25));
    assert!(common::approx(instance.direction(), 1.0));
    assert!(!instance.did_loop());
}

#[test]
fn zero_advance_is_stationary() {
    let mut instance = LinearAnimationInstance::new(make_animation(LoopMode::Loop, 60, 60));
    instance.advance(0.4);
    let before = instance.time();
    instance.advance(0.0);
    assert!(common::approx(instance.time(), before));
    assert!(!instance.did_loop());
}
