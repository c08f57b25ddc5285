//! State Machine Tests
//!
//! Tests for:
//! - Transition selection with bool / number / trigger conditions
//! - Any-state competition and exit-time deferral
//! - Transition mixing, fire events and timeline callbacks
//! - Pointer listeners (toggle, trigger, align, fire-event, hover)
//! - 1D and direct blend states

mod common;

use common::FileWriter;
use glam::Vec2;
use vexel::core::PropertyValue;
use vexel::core::registry::{properties as p, types as t};
use vexel::file::File;
use vexel::machine::TransitionFlags;

/// Backboard + artboard "Main" with one 40x40 shape (id 1) centred at
/// (150, 258).
fn base_artboard() -> FileWriter {
    let mut w = FileWriter::new();
    w.object(t::BACKBOARD).end();
    w.object(t::ARTBOARD)
        .p_str(p::NAME, "Main")
        .p_float(p::ARTBOARD_WIDTH, 400.0)
        .p_float(p::ARTBOARD_HEIGHT, 300.0)
        .end();
    w.object(t::SHAPE)
        .p_str(p::NAME, "Button")
        .p_uint(p::PARENT_ID, 0)
        .p_float(p::NODE_X, 150.0)
        .p_float(p::NODE_Y, 258.0)
        .p_float(p::SHAPE_WIDTH, 40.0)
        .p_float(p::SHAPE_HEIGHT, 40.0)
        .end();
    w
}

/// One-keyframe animation holding the shape's x at `value`.
fn write_const_x_animation(w: &mut FileWriter, name: &str, value: f32) {
    w.object(t::LINEAR_ANIMATION)
        .p_str(p::ANIMATION_NAME, name)
        .p_uint(p::ANIMATION_FPS, 60)
        .p_uint(p::ANIMATION_DURATION, 60)
        .p_uint(p::ANIMATION_LOOP, 1)
        .end();
    w.object(t::KEYED_OBJECT).p_uint(p::KEYED_OBJECT_ID, 1).end();
    w.object(t::KEYED_PROPERTY)
        .p_uint(p::KEYED_PROPERTY_KEY, u64::from(p::NODE_X))
        .end();
    w.object(t::KEYFRAME_DOUBLE)
        .p_uint(p::KEYFRAME_FRAME, 0)
        .p_float(p::KEYFRAME_VALUE_DOUBLE, value)
        .end();
}

/// Opens a machine definition; the caller appends inputs, a layer with the
/// three special states (entry 0, any 1, exit 2), custom states from index
/// 3, transitions and listeners, in stream order.
fn write_machine_prelude(w: &mut FileWriter, name: &str) {
    w.object(t::STATE_MACHINE).p_str(p::ANIMATION_NAME, name).end();
}

const ENTRY: usize = 0;
const STATE_A: usize = 3;
const STATE_B: usize = 4;

/// entry --instant--> state 3.
fn write_entry_edge(w: &mut FileWriter) {
    w.object(t::STATE_TRANSITION)
        .p_uint(p::TRANSITION_STATE_TO, STATE_A as u64)
        .p_uint(p::TRANSITION_DURATION, 0)
        .end();
}

// ============================================================================
// Transition selection
// ============================================================================

#[test]
fn entry_transitions_to_first_state_immediately() {
    let mut w = base_artboard();
    write_const_x_animation(&mut w, "a", 0.0);
    write_machine_prelude(&mut w, "machine");
    w.object(t::STATE_MACHINE_LAYER)
        .p_str(p::STATE_MACHINE_COMPONENT_NAME, "L0")
        .end();
    w.object(t::ENTRY_STATE).end();
    write_entry_edge(&mut w);
    w.object(t::ANY_STATE).end();
    w.object(t::EXIT_STATE).end();
    w.object(t::ANIMATION_STATE).p_uint(p::ANIMATION_STATE_ID, 0).end();

    let file = File::import(&w.finish(), common::factory()).unwrap();
    let mut artboard = file.instance_default().unwrap();
    let mut machine = artboard.default_state_machine().unwrap();

    assert_eq!(machine.current_state_index(0), Some(ENTRY));
    machine.advance(&mut artboard, 0.0);
    assert_eq!(machine.current_state_index(0), Some(STATE_A));
}

#[test]
fn bool_condition_gates_transition() {
    let mut w = base_artboard();
    write_const_x_animation(&mut w, "a", 0.0);
    write_const_x_animation(&mut w, "b", 10.0);
    write_machine_prelude(&mut w, "machine");
    w.object(t::STATE_MACHINE_BOOL)
        .p_str(p::STATE_MACHINE_COMPONENT_NAME, "On")
        .p_bool(p::INPUT_VALUE_BOOL, false)
        .end();
    w.object(t::STATE_MACHINE_LAYER)
        .p_str(p::STATE_MACHINE_COMPONENT_NAME, "L0")
        .end();
    w.object(t::ENTRY_STATE).end();
    write_entry_edge(&mut w);
    w.object(t::ANY_STATE).end();
    w.object(t::EXIT_STATE).end();
    w.object(t::ANIMATION_STATE).p_uint(p::ANIMATION_STATE_ID, 0).end();
    w.object(t::STATE_TRANSITION)
        .p_uint(p::TRANSITION_STATE_TO, STATE_B as u64)
        .p_uint(p::TRANSITION_DURATION, 0)
        .end();
    w.object(t::TRANSITION_BOOL_CONDITION)
        .p_uint(p::CONDITION_INPUT_ID, 0)
        .p_uint(p::CONDITION_OP, 0) // equal: passes while true
        .end();
    w.object(t::ANIMATION_STATE).p_uint(p::ANIMATION_STATE_ID, 1).end();

    let file = File::import(&w.finish(), common::factory()).unwrap();
    let mut artboard = file.instance_default().unwrap();
    let mut machine = artboard.default_state_machine().unwrap();

    machine.advance(&mut artboard, 0.0);
    assert_eq!(machine.current_state_index(0), Some(STATE_A));
    machine.advance(&mut artboard, 0.1);
    assert_eq!(machine.current_state_index(0), Some(STATE_A), "gate closed");

    machine.set_bool("On", true);
    machine.advance(&mut artboard, 0.1);
    assert_eq!(machine.current_state_index(0), Some(STATE_B));
}

#[test]
fn trigger_condition_consumed_on_fire() {
    let mut w = base_artboard();
    write_const_x_animation(&mut w, "a", 0.0);
    write_const_x_animation(&mut w, "b", 10.0);
    write_machine_prelude(&mut w, "machine");
    w.object(t::STATE_MACHINE_TRIGGER)
        .p_str(p::STATE_MACHINE_COMPONENT_NAME, "Go")
        .end();
    w.object(t::STATE_MACHINE_LAYER)
        .p_str(p::STATE_MACHINE_COMPONENT_NAME, "L0")
        .end();
    w.object(t::ENTRY_STATE).end();
    write_entry_edge(&mut w);
    w.object(t::ANY_STATE).end();
    w.object(t::EXIT_STATE).end();
    w.object(t::ANIMATION_STATE).p_uint(p::ANIMATION_STATE_ID, 0).end();
    w.object(t::STATE_TRANSITION)
        .p_uint(p::TRANSITION_STATE_TO, STATE_B as u64)
        .p_uint(p::TRANSITION_DURATION, 0)
        .end();
    w.object(t::TRANSITION_TRIGGER_CONDITION)
        .p_uint(p::CONDITION_INPUT_ID, 0)
        .end();
    w.object(t::ANIMATION_STATE).p_uint(p::ANIMATION_STATE_ID, 1).end();

    let file = File::import(&w.finish(), common::factory()).unwrap();
    let mut artboard = file.instance_default().unwrap();
    let mut machine = artboard.default_state_machine().unwrap();

    machine.advance(&mut artboard, 0.0);
    machine.advance(&mut artboard, 0.1);
    assert_eq!(machine.current_state_index(0), Some(STATE_A), "no trigger yet");

    machine.fire_trigger("Go");
    assert_eq!(machine.did_fire("Go"), Some(true));
    machine.advance(&mut artboard, 0.1);
    assert_eq!(machine.current_state_index(0), Some(STATE_B));
    assert_eq!(machine.did_fire("Go"), Some(false), "trigger resets after advance");
}

#[test]
fn number_conditions_compare_against_literal() {
    let mut w = base_artboard();
    write_const_x_animation(&mut w, "a", 0.0);
    write_const_x_animation(&mut w, "b", 10.0);
    write_machine_prelude(&mut w, "machine");
    w.object(t::STATE_MACHINE_NUMBER)
        .p_str(p::STATE_MACHINE_COMPONENT_NAME, "Speed")
        .p_float(p::INPUT_VALUE_NUMBER, 0.0)
        .end();
    w.object(t::STATE_MACHINE_LAYER)
        .p_str(p::STATE_MACHINE_COMPONENT_NAME, "L0")
        .end();
    w.object(t::ENTRY_STATE).end();
    write_entry_edge(&mut w);
    w.object(t::ANY_STATE).end();
    w.object(t::EXIT_STATE).end();
    w.object(t::ANIMATION_STATE).p_uint(p::ANIMATION_STATE_ID, 0).end();
    w.object(t::STATE_TRANSITION)
        .p_uint(p::TRANSITION_STATE_TO, STATE_B as u64)
        .p_uint(p::TRANSITION_DURATION, 0)
        .end();
    w.object(t::TRANSITION_NUMBER_CONDITION)
        .p_uint(p::CONDITION_INPUT_ID, 0)
        .p_uint(p::CONDITION_OP, 5) // greater
        .p_float(p::CONDITION_VALUE, 50.0)
        .end();
    w.object(t::ANIMATION_STATE).p_uint(p::ANIMATION_STATE_ID, 1).end();

    let file = File::import(&w.finish(), common::factory()).unwrap();
    let mut artboard = file.instance_default().unwrap();
    let mut machine = artboard.default_state_machine().unwrap();

    machine.advance(&mut artboard, 0.0);
    machine.set_number("Speed", 10.0);
    machine.advance(&mut artboard, 0.1);
    assert_eq!(machine.current_state_index(0), Some(STATE_A));

    machine.set_number("Speed", 60.0);
    machine.advance(&mut artboard, 0.1);
    assert_eq!(machine.current_state_index(0), Some(STATE_B));
}

#[test]
fn any_state_transitions_compete() {
    let mut w = base_artboard();
    write_const_x_animation(&mut w, "a", 0.0);
    write_const_x_animation(&mut w, "b", 10.0);
    write_machine_prelude(&mut w, "machine");
    w.object(t::STATE_MACHINE_BOOL)
        .p_str(p::STATE_MACHINE_COMPONENT_NAME, "Panic")
        .end();
    w.object(t::STATE_MACHINE_LAYER)
        .p_str(p::STATE_MACHINE_COMPONENT_NAME, "L0")
        .end();
    w.object(t::ENTRY_STATE).end();
    write_entry_edge(&mut w);
    w.object(t::ANY_STATE).end();
    // The any-state edge reaches state B from wherever the layer is.
    w.object(t::STATE_TRANSITION)
        .p_uint(p::TRANSITION_STATE_TO, STATE_B as u64)
        .p_uint(p::TRANSITION_DURATION, 0)
        .end();
    w.object(t::TRANSITION_BOOL_CONDITION)
        .p_uint(p::CONDITION_INPUT_ID, 0)
        .p_uint(p::CONDITION_OP, 0)
        .end();
    w.object(t::EXIT_STATE).end();
    w.object(t::ANIMATION_STATE).p_uint(p::ANIMATION_STATE_ID, 0).end();
    w.object(t::ANIMATION_STATE).p_uint(p::ANIMATION_STATE_ID, 1).end();

    let file = File::import(&w.finish(), common::factory()).unwrap();
    let mut artboard = file.instance_default().unwrap();
    let mut machine = artboard.default_state_machine().unwrap();

    machine.advance(&mut artboard, 0.0);
    assert_eq!(machine.current_state_index(0), Some(STATE_A));

    machine.set_bool("Panic", true);
    machine.advance(&mut artboard, 0.1);
    assert_eq!(machine.current_state_index(0), Some(STATE_B));
}

// ============================================================================
// Exit time
// ============================================================================

fn exit_time_machine(exit_flags: TransitionFlags, exit_time: u64) -> Vec<u8> {
    let mut w = base_artboard();
    // One-second one-shot animation.
    w.object(t::LINEAR_ANIMATION)
        .p_str(p::ANIMATION_NAME, "a")
        .p_uint(p::ANIMATION_FPS, 60)
        .p_uint(p::ANIMATION_DURATION, 60)
        .p_uint(p::ANIMATION_LOOP, 0)
        .end();
    write_const_x_animation(&mut w, "b", 10.0);
    write_machine_prelude(&mut w, "machine");
    w.object(t::STATE_MACHINE_LAYER)
        .p_str(p::STATE_MACHINE_COMPONENT_NAME, "L0")
        .end();
    w.object(t::ENTRY_STATE).end();
    write_entry_edge(&mut w);
    w.object(t::ANY_STATE).end();
    w.object(t::EXIT_STATE).end();
    w.object(t::ANIMATION_STATE).p_uint(p::ANIMATION_STATE_ID, 0).end();
    w.object(t::STATE_TRANSITION)
        .p_uint(p::TRANSITION_STATE_TO, STATE_B as u64)
        .p_uint(p::TRANSITION_DURATION, 0)
        .p_uint(
            p::TRANSITION_FLAGS,
            u64::from((TransitionFlags::ENABLE_EXIT_TIME | exit_flags).bits()),
        )
        .p_uint(p::TRANSITION_EXIT_TIME, exit_time)
        .end();
    w.object(t::ANIMATION_STATE).p_uint(p::ANIMATION_STATE_ID, 1).end();
    w.finish()
}

#[test]
fn exit_time_defers_until_reached() {
    let bytes = exit_time_machine(TransitionFlags::empty(), 500); // 500 ms
    let file = File::import(&bytes, common::factory()).unwrap();
    let mut artboard = file.instance_default().unwrap();
    let mut machine = artboard.default_state_machine().unwrap();

    machine.advance(&mut artboard, 0.0);
    assert_eq!(machine.current_state_index(0), Some(STATE_A));

    machine.advance(&mut artboard, 0.3);
    assert_eq!(machine.current_state_index(0), Some(STATE_A), "0.3s < exit");

    machine.advance(&mut artboard, 0.3);
    assert_eq!(machine.current_state_index(0), Some(STATE_B), "0.6s >= exit");
}

#[test]
fn exit_time_as_percentage_of_duration() {
    let bytes = exit_time_machine(TransitionFlags::EXIT_TIME_IS_PERCENTAGE, 50); // 50%
    let file = File::import(&bytes, common::factory()).unwrap();
    let mut artboard = file.instance_default().unwrap();
    let mut machine = artboard.default_state_machine().unwrap();

    machine.advance(&mut artboard, 0.0);
    machine.advance(&mut artboard, 0.3);
    assert_eq!(machine.current_state_index(0), Some(STATE_A));
    machine.advance(&mut artboard, 0.3);
    assert_eq!(machine.current_state_index(0), Some(STATE_B));
}

// ============================================================================
// Transition mixing
// ============================================================================

#[test]
fn transition_mix_ramps_to_one() {
    let mut w = base_artboard();
    write_const_x_animation(&mut w, "a", 0.0);
    write_const_x_animation(&mut w, "b", 10.0);
    write_machine_prelude(&mut w, "machine");
    w.object(t::STATE_MACHINE_BOOL)
        .p_str(p::STATE_MACHINE_COMPONENT_NAME, "Go")
        .end();
    w.object(t::STATE_MACHINE_LAYER)
        .p_str(p::STATE_MACHINE_COMPONENT_NAME, "L0")
        .end();
    w.object(t::ENTRY_STATE).end();
    write_entry_edge(&mut w);
    w.object(t::ANY_STATE).end();
    w.object(t::EXIT_STATE).end();
    w.object(t::ANIMATION_STATE).p_uint(p::ANIMATION_STATE_ID, 0).end();
    w.object(t::STATE_TRANSITION)
        .p_uint(p::TRANSITION_STATE_TO, STATE_B as u64)
        .p_uint(p::TRANSITION_DURATION, 1000) // one second of blending
        .end();
    w.object(t::TRANSITION_BOOL_CONDITION)
        .p_uint(p::CONDITION_INPUT_ID, 0)
        .p_uint(p::CONDITION_OP, 0)
        .end();
    w.object(t::ANIMATION_STATE).p_uint(p::ANIMATION_STATE_ID, 1).end();

    let file = File::import(&w.finish(), common::factory()).unwrap();
    let mut artboard = file.instance_default().unwrap();
    let mut machine = artboard.default_state_machine().unwrap();

    machine.advance(&mut artboard, 0.0);
    machine.set_bool("Go", true);
    machine.advance(&mut artboard, 0.0);
    assert_eq!(machine.current_state_index(0), Some(STATE_B));
    let mix = machine.layer_mix(0).unwrap();
    assert!((0.0..1.0).contains(&mix), "fresh transition mix {mix}");

    machine.advance(&mut artboard, 0.25);
    let mix = machine.layer_mix(0).unwrap();
    assert!(mix > 0.2 && mix < 0.35, "quarter-way mix {mix}");

    machine.advance(&mut artboard, 2.0);
    assert!(common::approx(machine.layer_mix(0).unwrap(), 1.0));
}

// ============================================================================
// Events
// ============================================================================

#[test]
fn timeline_callback_reports_event_with_delay() {
    let mut w = base_artboard();
    // id 2: the event object.
    w.object(t::EVENT)
        .p_str(p::NAME, "Half")
        .p_uint(p::PARENT_ID, 0)
        .end();
    // One-second one-shot animation with a callback keyframe at 0.5s.
    w.object(t::LINEAR_ANIMATION)
        .p_str(p::ANIMATION_NAME, "timeline")
        .p_uint(p::ANIMATION_FPS, 60)
        .p_uint(p::ANIMATION_DURATION, 60)
        .p_uint(p::ANIMATION_LOOP, 0)
        .end();
    w.object(t::KEYED_OBJECT).p_uint(p::KEYED_OBJECT_ID, 2).end();
    w.object(t::KEYED_PROPERTY)
        .p_uint(p::KEYED_PROPERTY_KEY, u64::from(p::EVENT_TRIGGER))
        .end();
    w.object(t::KEYFRAME_CALLBACK).p_uint(p::KEYFRAME_FRAME, 30).end();
    write_machine_prelude(&mut w, "machine");
    w.object(t::STATE_MACHINE_LAYER)
        .p_str(p::STATE_MACHINE_COMPONENT_NAME, "L0")
        .end();
    w.object(t::ENTRY_STATE).end();
    write_entry_edge(&mut w);
    w.object(t::ANY_STATE).end();
    w.object(t::EXIT_STATE).end();
    w.object(t::ANIMATION_STATE).p_uint(p::ANIMATION_STATE_ID, 0).end();

    let file = File::import(&w.finish(), common::factory()).unwrap();
    let mut artboard = file.instance_default().unwrap();
    let mut machine = artboard.default_state_machine().unwrap();

    machine.advance(&mut artboard, 0.0);
    machine.advance(&mut artboard, 0.4);
    assert_eq!(machine.reported_event_count(), 0, "keyframe not crossed yet");

    machine.advance(&mut artboard, 0.2);
    assert_eq!(machine.reported_event_count(), 1);
    let event = machine.reported_event_at(0).unwrap();
    assert_eq!(event.name, "Half");
    assert!(
        (event.seconds_delay - 0.1).abs() < 1e-4,
        "delay {}",
        event.seconds_delay
    );

    machine.advance(&mut artboard, 0.2);
    assert_eq!(machine.reported_event_count(), 0, "queue drains each advance");
}

#[test]
fn transition_and_state_fire_events() {
    let mut w = base_artboard();
    // ids 2..=5: event objects.
    for name in ["AEnd", "TStart", "TEnd", "BStart"] {
        w.object(t::EVENT).p_str(p::NAME, name).p_uint(p::PARENT_ID, 0).end();
    }
    write_const_x_animation(&mut w, "a", 0.0);
    write_const_x_animation(&mut w, "b", 10.0);
    write_machine_prelude(&mut w, "machine");
    w.object(t::STATE_MACHINE_BOOL)
        .p_str(p::STATE_MACHINE_COMPONENT_NAME, "Go")
        .end();
    w.object(t::STATE_MACHINE_LAYER)
        .p_str(p::STATE_MACHINE_COMPONENT_NAME, "L0")
        .end();
    w.object(t::ENTRY_STATE).end();
    write_entry_edge(&mut w);
    w.object(t::ANY_STATE).end();
    w.object(t::EXIT_STATE).end();
    // State A fires AEnd when it is left.
    w.object(t::ANIMATION_STATE).p_uint(p::ANIMATION_STATE_ID, 0).end();
    w.object(t::STATE_MACHINE_FIRE_EVENT)
        .p_uint(p::FIRE_EVENT_ID, 2)
        .p_uint(p::FIRE_EVENT_OCCURS, 1) // at end
        .end();
    w.object(t::STATE_TRANSITION)
        .p_uint(p::TRANSITION_STATE_TO, STATE_B as u64)
        .p_uint(p::TRANSITION_DURATION, 0)
        .end();
    w.object(t::STATE_MACHINE_FIRE_EVENT)
        .p_uint(p::FIRE_EVENT_ID, 3)
        .p_uint(p::FIRE_EVENT_OCCURS, 0) // at start
        .end();
    w.object(t::STATE_MACHINE_FIRE_EVENT)
        .p_uint(p::FIRE_EVENT_ID, 4)
        .p_uint(p::FIRE_EVENT_OCCURS, 1) // at end
        .end();
    w.object(t::TRANSITION_BOOL_CONDITION)
        .p_uint(p::CONDITION_INPUT_ID, 0)
        .p_uint(p::CONDITION_OP, 0)
        .end();
    // State B fires BStart when entered.
    w.object(t::ANIMATION_STATE).p_uint(p::ANIMATION_STATE_ID, 1).end();
    w.object(t::STATE_MACHINE_FIRE_EVENT)
        .p_uint(p::FIRE_EVENT_ID, 5)
        .p_uint(p::FIRE_EVENT_OCCURS, 0)
        .end();

    let file = File::import(&w.finish(), common::factory()).unwrap();
    let mut artboard = file.instance_default().unwrap();
    let mut machine = artboard.default_state_machine().unwrap();

    machine.advance(&mut artboard, 0.0);
    assert_eq!(machine.reported_event_count(), 0);

    machine.set_bool("Go", true);
    machine.advance(&mut artboard, 0.1);
    let names: Vec<&str> = (0..machine.reported_event_count())
        .map(|i| machine.reported_event_at(i).unwrap().name.as_str())
        .collect();
    assert!(names.contains(&"AEnd"), "events {names:?}");
    assert!(names.contains(&"TStart"), "events {names:?}");
    assert!(names.contains(&"TEnd"), "instant transition ends same frame");
    assert!(names.contains(&"BStart"), "events {names:?}");

    machine.advance(&mut artboard, 0.1);
    assert_eq!(machine.reported_event_count(), 0);
}

// ============================================================================
// Listeners
// ============================================================================

fn listener_machine(listener_type: u64, action: impl FnOnce(&mut FileWriter)) -> Vec<u8> {
    let mut w = base_artboard();
    write_const_x_animation(&mut w, "a", 150.0);
    write_machine_prelude(&mut w, "machine");
    w.object(t::STATE_MACHINE_BOOL)
        .p_str(p::STATE_MACHINE_COMPONENT_NAME, "On")
        .p_bool(p::INPUT_VALUE_BOOL, true)
        .end();
    w.object(t::STATE_MACHINE_TRIGGER)
        .p_str(p::STATE_MACHINE_COMPONENT_NAME, "Light")
        .end();
    w.object(t::STATE_MACHINE_NUMBER)
        .p_str(p::STATE_MACHINE_COMPONENT_NAME, "Level")
        .end();
    w.object(t::STATE_MACHINE_LAYER)
        .p_str(p::STATE_MACHINE_COMPONENT_NAME, "L0")
        .end();
    w.object(t::ENTRY_STATE).end();
    write_entry_edge(&mut w);
    w.object(t::ANY_STATE).end();
    w.object(t::EXIT_STATE).end();
    w.object(t::ANIMATION_STATE).p_uint(p::ANIMATION_STATE_ID, 0).end();
    w.object(t::STATE_MACHINE_LISTENER)
        .p_str(p::STATE_MACHINE_COMPONENT_NAME, "tap")
        .p_uint(p::LISTENER_TARGET_ID, 1)
        .p_uint(p::LISTENER_TYPE, listener_type)
        .end();
    action(&mut w);
    w.finish()
}

#[test]
fn pointer_down_toggles_bool() {
    // Listener type 2 = down; bool-change value 2 toggles.
    let bytes = listener_machine(2, |w| {
        w.object(t::LISTENER_BOOL_CHANGE)
            .p_uint(p::LISTENER_INPUT_ID, 0)
            .p_uint(p::LISTENER_BOOL_VALUE, 2)
            .end();
    });
    let file = File::import(&bytes, common::factory()).unwrap();
    let mut artboard = file.instance_default().unwrap();
    let mut machine = artboard.default_state_machine().unwrap();

    machine.advance(&mut artboard, 0.0);
    assert_eq!(machine.bool_value("On"), Some(true));

    machine.pointer_down(&mut artboard, Vec2::new(150.0, 258.0));
    machine.pointer_up(&mut artboard, Vec2::new(150.0, 258.0));
    machine.advance(&mut artboard, 0.0);
    assert_eq!(machine.bool_value("On"), Some(false));

    machine.pointer_down(&mut artboard, Vec2::new(150.0, 258.0));
    machine.pointer_up(&mut artboard, Vec2::new(150.0, 258.0));
    machine.advance(&mut artboard, 0.0);
    assert_eq!(machine.bool_value("On"), Some(true));
}

#[test]
fn pointer_down_outside_target_is_ignored() {
    let bytes = listener_machine(2, |w| {
        w.object(t::LISTENER_BOOL_CHANGE)
            .p_uint(p::LISTENER_INPUT_ID, 0)
            .p_uint(p::LISTENER_BOOL_VALUE, 2)
            .end();
    });
    let file = File::import(&bytes, common::factory()).unwrap();
    let mut artboard = file.instance_default().unwrap();
    let mut machine = artboard.default_state_machine().unwrap();

    machine.advance(&mut artboard, 0.0);
    machine.pointer_down(&mut artboard, Vec2::new(10.0, 10.0));
    assert_eq!(machine.bool_value("On"), Some(true));
}

#[test]
fn pointer_down_fires_trigger() {
    let bytes = listener_machine(2, |w| {
        w.object(t::LISTENER_TRIGGER_CHANGE)
            .p_uint(p::LISTENER_INPUT_ID, 1)
            .end();
    });
    let file = File::import(&bytes, common::factory()).unwrap();
    let mut artboard = file.instance_default().unwrap();
    let mut machine = artboard.default_state_machine().unwrap();

    machine.advance(&mut artboard, 0.0);
    assert_eq!(machine.did_fire("Light"), Some(false));
    machine.pointer_down(&mut artboard, Vec2::new(150.0, 258.0));
    assert_eq!(machine.did_fire("Light"), Some(true));
}

#[test]
fn align_target_moves_node_to_pointer() {
    let bytes = listener_machine(4, |w| {
        w.object(t::LISTENER_ALIGN_TARGET)
            .p_uint(p::LISTENER_ALIGN_TARGET_ID, 1)
            .end();
    });
    let file = File::import(&bytes, common::factory()).unwrap();
    let mut artboard = file.instance_default().unwrap();
    let mut machine = artboard.default_state_machine().unwrap();

    machine.advance(&mut artboard, 0.0);
    machine.pointer_move(&mut artboard, Vec2::new(160.0, 250.0));
    assert_eq!(
        artboard.get_property(1, p::NODE_X),
        Some(PropertyValue::Float(160.0))
    );
    assert_eq!(
        artboard.get_property(1, p::NODE_Y),
        Some(PropertyValue::Float(250.0))
    );
}

#[test]
fn listener_fire_event_reports_immediately() {
    let mut w = base_artboard();
    w.object(t::EVENT)
        .p_str(p::NAME, "Tapped")
        .p_uint(p::PARENT_ID, 0)
        .end(); // id 2
    write_const_x_animation(&mut w, "a", 150.0);
    write_machine_prelude(&mut w, "machine");
    w.object(t::STATE_MACHINE_LAYER)
        .p_str(p::STATE_MACHINE_COMPONENT_NAME, "L0")
        .end();
    w.object(t::ENTRY_STATE).end();
    write_entry_edge(&mut w);
    w.object(t::ANY_STATE).end();
    w.object(t::EXIT_STATE).end();
    w.object(t::ANIMATION_STATE).p_uint(p::ANIMATION_STATE_ID, 0).end();
    w.object(t::STATE_MACHINE_LISTENER)
        .p_uint(p::LISTENER_TARGET_ID, 1)
        .p_uint(p::LISTENER_TYPE, 2)
        .end();
    w.object(t::LISTENER_FIRE_EVENT)
        .p_uint(p::LISTENER_EVENT_ID, 2)
        .end();

    let file = File::import(&w.finish(), common::factory()).unwrap();
    let mut artboard = file.instance_default().unwrap();
    let mut machine = artboard.default_state_machine().unwrap();

    machine.advance(&mut artboard, 0.0);
    machine.pointer_down(&mut artboard, Vec2::new(150.0, 258.0));
    assert_eq!(machine.reported_event_count(), 1);
    assert_eq!(machine.reported_event_at(0).unwrap().name, "Tapped");
    assert!(common::approx(
        machine.reported_event_at(0).unwrap().seconds_delay,
        0.0
    ));
}

#[test]
fn enter_and_exit_listeners_track_hover() {
    let mut w = base_artboard();
    write_const_x_animation(&mut w, "a", 150.0);
    write_machine_prelude(&mut w, "machine");
    w.object(t::STATE_MACHINE_BOOL)
        .p_str(p::STATE_MACHINE_COMPONENT_NAME, "Hover")
        .end();
    w.object(t::STATE_MACHINE_LAYER)
        .p_str(p::STATE_MACHINE_COMPONENT_NAME, "L0")
        .end();
    w.object(t::ENTRY_STATE).end();
    write_entry_edge(&mut w);
    w.object(t::ANY_STATE).end();
    w.object(t::EXIT_STATE).end();
    w.object(t::ANIMATION_STATE).p_uint(p::ANIMATION_STATE_ID, 0).end();
    // Enter listener sets Hover true, exit listener sets it false.
    w.object(t::STATE_MACHINE_LISTENER)
        .p_uint(p::LISTENER_TARGET_ID, 1)
        .p_uint(p::LISTENER_TYPE, 0) // enter
        .end();
    w.object(t::LISTENER_BOOL_CHANGE)
        .p_uint(p::LISTENER_INPUT_ID, 0)
        .p_uint(p::LISTENER_BOOL_VALUE, 1)
        .end();
    w.object(t::STATE_MACHINE_LISTENER)
        .p_uint(p::LISTENER_TARGET_ID, 1)
        .p_uint(p::LISTENER_TYPE, 1) // exit
        .end();
    w.object(t::LISTENER_BOOL_CHANGE)
        .p_uint(p::LISTENER_INPUT_ID, 0)
        .p_uint(p::LISTENER_BOOL_VALUE, 0)
        .end();

    let file = File::import(&w.finish(), common::factory()).unwrap();
    let mut artboard = file.instance_default().unwrap();
    let mut machine = artboard.default_state_machine().unwrap();

    machine.advance(&mut artboard, 0.0);
    assert_eq!(machine.bool_value("Hover"), Some(false));

    machine.pointer_move(&mut artboard, Vec2::new(150.0, 258.0));
    assert_eq!(machine.bool_value("Hover"), Some(true));

    // Moving within the shape keeps the hover state.
    machine.pointer_move(&mut artboard, Vec2::new(155.0, 260.0));
    assert_eq!(machine.bool_value("Hover"), Some(true));

    machine.pointer_move(&mut artboard, Vec2::new(10.0, 10.0));
    assert_eq!(machine.bool_value("Hover"), Some(false));
}

// ============================================================================
// Blend states
// ============================================================================

#[test]
fn blend_1d_weights_bracket_the_input() {
    let mut w = base_artboard();
    write_const_x_animation(&mut w, "low", 0.0);
    write_const_x_animation(&mut w, "high", 10.0);
    write_machine_prelude(&mut w, "machine");
    w.object(t::STATE_MACHINE_NUMBER)
        .p_str(p::STATE_MACHINE_COMPONENT_NAME, "Blend")
        .end();
    w.object(t::STATE_MACHINE_LAYER)
        .p_str(p::STATE_MACHINE_COMPONENT_NAME, "L0")
        .end();
    w.object(t::ENTRY_STATE).end();
    write_entry_edge(&mut w);
    w.object(t::ANY_STATE).end();
    w.object(t::EXIT_STATE).end();
    w.object(t::BLEND_STATE_1D)
        .p_uint(p::BLEND_STATE_INPUT_ID, 0)
        .end();
    w.object(t::BLEND_ANIMATION_1D)
        .p_uint(p::BLEND_ANIMATION_ID, 0)
        .p_float(p::BLEND_ANIMATION_VALUE, 0.0)
        .end();
    w.object(t::BLEND_ANIMATION_1D)
        .p_uint(p::BLEND_ANIMATION_ID, 1)
        .p_float(p::BLEND_ANIMATION_VALUE, 100.0)
        .end();

    let file = File::import(&w.finish(), common::factory()).unwrap();
    let mut artboard = file.instance_default().unwrap();
    let mut machine = artboard.default_state_machine().unwrap();

    // Neutralize the decoded x so the blend result is easy to read.
    artboard.set_property(1, p::NODE_X, PropertyValue::Float(0.0));
    machine.advance(&mut artboard, 0.0);
    assert_eq!(machine.current_state_index(0), Some(STATE_A));

    machine.set_number("Blend", 30.0);
    machine.advance(&mut artboard, 0.016);
    let Some(PropertyValue::Float(x)) = artboard.get_property(1, p::NODE_X) else {
        panic!("x missing");
    };
    assert!((x - 3.0).abs() < 1e-3, "blended x {x}");

    // At the lower bracket edge only the matching entry contributes.
    machine.set_number("Blend", 0.0);
    machine.advance(&mut artboard, 0.016);
    let Some(PropertyValue::Float(x)) = artboard.get_property(1, p::NODE_X) else {
        panic!("x missing");
    };
    assert!(x.abs() < 1e-3, "lower edge x {x}");
}

#[test]
fn blend_direct_reads_per_entry_inputs() {
    let mut w = base_artboard();
    write_const_x_animation(&mut w, "slide", 10.0);
    write_machine_prelude(&mut w, "machine");
    w.object(t::STATE_MACHINE_NUMBER)
        .p_str(p::STATE_MACHINE_COMPONENT_NAME, "W")
        .end();
    w.object(t::STATE_MACHINE_LAYER)
        .p_str(p::STATE_MACHINE_COMPONENT_NAME, "L0")
        .end();
    w.object(t::ENTRY_STATE).end();
    write_entry_edge(&mut w);
    w.object(t::ANY_STATE).end();
    w.object(t::EXIT_STATE).end();
    w.object(t::BLEND_STATE_DIRECT).end();
    w.object(t::BLEND_ANIMATION_DIRECT)
        .p_uint(p::BLEND_ANIMATION_ID, 0)
        .p_uint(p::BLEND_ANIMATION_DIRECT_INPUT_ID, 0)
        .end();

    let file = File::import(&w.finish(), common::factory()).unwrap();
    let mut artboard = file.instance_default().unwrap();
    let mut machine = artboard.default_state_machine().unwrap();

    artboard.set_property(1, p::NODE_X, PropertyValue::Float(0.0));
    machine.advance(&mut artboard, 0.0);

    machine.set_number("W", 0.8);
    machine.advance(&mut artboard, 0.016);
    let Some(PropertyValue::Float(x)) = artboard.get_property(1, p::NODE_X) else {
        panic!("x missing");
    };
    assert!((x - 8.0).abs() < 1e-3, "weighted x {x}");
}
