//! Audio Lifecycle Tests
//!
//! Tests for:
//! - In-band audio assets decoded into sources at import
//! - Audio events playing on the shared engine with per-instance ownership
//! - Completion draining and stop-on-drop semantics

mod common;

use std::sync::Arc;

use common::FileWriter;
use glam::Vec2;
use vexel::audio::{AudioEngine, AudioSource};
use vexel::core::registry::{properties as p, types as t};
use vexel::file::File;

/// Artboard with a full-surface shape, an audio event wired to asset 7 and
/// a listener playing it on pointer down.
fn audio_file() -> Vec<u8> {
    let mut w = FileWriter::new();
    w.object(t::BACKBOARD).end();
    w.object(t::ARTBOARD)
        .p_str(p::NAME, "Noisy")
        .p_float(p::ARTBOARD_WIDTH, 100.0)
        .p_float(p::ARTBOARD_HEIGHT, 100.0)
        .end();
    // id 1: hit target covering the artboard
    w.object(t::SHAPE)
        .p_uint(p::PARENT_ID, 0)
        .p_float(p::NODE_X, 50.0)
        .p_float(p::NODE_Y, 50.0)
        .p_float(p::SHAPE_WIDTH, 100.0)
        .p_float(p::SHAPE_HEIGHT, 100.0)
        .end();
    // id 2: the audio event
    w.object(t::AUDIO_EVENT)
        .p_str(p::NAME, "Blip")
        .p_uint(p::PARENT_ID, 0)
        .p_uint(p::AUDIO_EVENT_ASSET_ID, 7)
        .end();
    w.object(t::STATE_MACHINE).p_str(p::ANIMATION_NAME, "sm").end();
    w.object(t::STATE_MACHINE_LAYER)
        .p_str(p::STATE_MACHINE_COMPONENT_NAME, "L0")
        .end();
    w.object(t::ENTRY_STATE).end();
    w.object(t::ANY_STATE).end();
    w.object(t::EXIT_STATE).end();
    w.object(t::STATE_MACHINE_LISTENER)
        .p_uint(p::LISTENER_TARGET_ID, 1)
        .p_uint(p::LISTENER_TYPE, 2)
        .end();
    w.object(t::LISTENER_FIRE_EVENT)
        .p_uint(p::LISTENER_EVENT_ID, 2)
        .end();
    // File-level asset with in-band bytes.
    w.object(t::AUDIO_ASSET)
        .p_str(p::ASSET_NAME, "blip.wav")
        .p_uint(p::FILE_ASSET_ID, 7)
        .end();
    w.object(t::FILE_ASSET_CONTENTS)
        .p_bytes(p::FILE_ASSET_BYTES, &[1, 2, 3, 4])
        .end();
    w.finish()
}

fn tap(machine: &mut vexel::StateMachineInstance, artboard: &mut vexel::Artboard) {
    machine.pointer_down(artboard, Vec2::new(50.0, 50.0));
    machine.pointer_up(artboard, Vec2::new(50.0, 50.0));
    machine.advance(artboard, 0.0);
}

#[test]
fn in_band_audio_assets_decode() {
    let file = File::import(&audio_file(), common::factory()).unwrap();
    assert_eq!(file.asset_count(), 1);
    let asset = file.asset(0).unwrap();
    assert_eq!(asset.name, "blip.wav");
    assert_eq!(asset.asset_id, 7);
    assert!(asset.decoded().is_some(), "audio bytes should decode");
}

#[test]
fn audio_events_own_their_sounds_per_instance() {
    let file = File::import(&audio_file(), common::factory()).unwrap();
    let engine = AudioEngine::new();

    let mut a = file.instance_default().unwrap();
    a.set_audio_engine(Arc::clone(&engine));
    let mut a_machine = a.default_state_machine().unwrap();
    a_machine.advance(&mut a, 0.0);

    let mut b = file.instance_default().unwrap();
    b.set_audio_engine(Arc::clone(&engine));
    let mut b_machine = b.default_state_machine().unwrap();
    b_machine.advance(&mut b, 0.0);

    // Two plays from A, one from B, one more from A.
    tap(&mut a_machine, &mut a);
    tap(&mut a_machine, &mut a);
    tap(&mut b_machine, &mut b);
    tap(&mut a_machine, &mut a);
    assert_eq!(engine.playing_sound_count(), 4);

    // Dropping an artboard stops the sounds it started.
    drop(a);
    assert_eq!(engine.playing_sound_count(), 1);
    drop(b);
    assert_eq!(engine.playing_sound_count(), 0);
}

#[test]
fn fired_audio_events_are_also_reported() {
    let file = File::import(&audio_file(), common::factory()).unwrap();
    let engine = AudioEngine::new();
    let mut artboard = file.instance_default().unwrap();
    artboard.set_audio_engine(Arc::clone(&engine));
    let mut machine = artboard.default_state_machine().unwrap();

    machine.advance(&mut artboard, 0.0);
    machine.pointer_down(&mut artboard, Vec2::new(50.0, 50.0));
    assert_eq!(machine.reported_event_count(), 1);
    assert_eq!(machine.reported_event_at(0).unwrap().name, "Blip");
    assert_eq!(engine.playing_sound_count(), 1);
}

#[test]
fn completions_drain_under_the_lock() {
    let engine = AudioEngine::new();
    let source = Arc::new(AudioSource {
        name: "tone".to_string(),
        bytes: Arc::from([0u8; 16].as_slice()),
    });

    let key_a = engine.play(Arc::clone(&source), 1);
    let _key_b = engine.play(Arc::clone(&source), 1);
    assert_eq!(engine.playing_sound_count(), 2);

    // Completion may arrive from the mixer's thread.
    let engine_for_thread = Arc::clone(&engine);
    let handle = std::thread::spawn(move || {
        engine_for_thread.sound_completed(key_a);
    });
    handle.join().unwrap();

    assert_eq!(engine.playing_sound_count(), 1);
}

#[test]
fn missing_asset_leaves_event_silent() {
    let mut w = FileWriter::new();
    w.object(t::BACKBOARD).end();
    w.object(t::ARTBOARD)
        .p_str(p::NAME, "Quiet")
        .p_float(p::ARTBOARD_WIDTH, 10.0)
        .p_float(p::ARTBOARD_HEIGHT, 10.0)
        .end();
    w.object(t::AUDIO_EVENT)
        .p_str(p::NAME, "Nope")
        .p_uint(p::PARENT_ID, 0)
        .p_uint(p::AUDIO_EVENT_ASSET_ID, 42) // no such asset
        .end();

    let file = File::import(&w.finish(), common::factory()).unwrap();
    let engine = AudioEngine::new();
    let mut artboard = file.instance_default().unwrap();
    artboard.set_audio_engine(Arc::clone(&engine));
    artboard.advance(0.0);
    assert_eq!(engine.playing_sound_count(), 0);
}
