//! State machine playback.
//!
//! A [`StateMachineInstance`] owns every piece of mutable machine state:
//! input values, per-layer current/previous state instances, transition mix
//! bookkeeping, listener hover tracking and the reported-event queue. The
//! definition stays shared and immutable.
//!
//! The instance borrows the artboard for the duration of an advance or a
//! pointer event; it never stores a reference to it.

use std::sync::Arc;

use glam::Vec2;

use crate::animation::{KeyedCallbackReporter, LinearAnimationInstance};
use crate::animation::linear::LoopMode;
use crate::artboard::Artboard;
use crate::core::registry::{is_type_of, types};
use crate::event::ReportedEvent;
use crate::machine::{
    BlendAnimation1D, BlendAnimationDirect, ConditionKind, ConditionOp, FireOccurrence, Layer,
    LayerState, Listener, ListenerAction, ListenerType, StateKind, StateMachine, StateTransition,
};

/// Hard cap on chained transitions within one advance.
const MAX_STATE_CHANGES: usize = 100;

/// Current value of one input instance.
#[derive(Debug, Clone, PartialEq)]
pub enum InputValue {
    Bool(bool),
    Number(f32),
    Trigger { fired: bool },
}

/// An event queued during layer evaluation, resolved against the artboard
/// at the end of the advance.
#[derive(Debug, Clone, Copy)]
struct PendingEvent {
    event_id: u32,
    delay: f32,
}

struct CallbackCollector {
    pending: Vec<PendingEvent>,
}

impl KeyedCallbackReporter for CallbackCollector {
    fn report_keyed_callback(&mut self, object_id: u32, _property_key: u16, elapsed_seconds: f32) {
        self.pending.push(PendingEvent {
            event_id: object_id,
            delay: elapsed_seconds,
        });
    }
}

// ============================================================================
// State instances
// ============================================================================

#[derive(Debug, Clone)]
struct BlendEntry {
    instance: Option<LinearAnimationInstance>,
    /// Blend axis position (1-D) or fixed weight (direct).
    value: f32,
    input_id: Option<u32>,
    mix: f32,
}

/// The runtime face of one layer state.
#[derive(Debug, Clone)]
enum StateInstance {
    /// Entry, exit, any and placeholder states do nothing while current.
    Idle { state: usize },
    Animation {
        state: usize,
        animation: LinearAnimationInstance,
        frozen: bool,
    },
    Blend1D {
        state: usize,
        input_id: Option<u32>,
        entries: Vec<BlendEntry>,
    },
    BlendDirect {
        state: usize,
        entries: Vec<BlendEntry>,
    },
}

impl StateInstance {
    fn build(state_index: usize, def: &LayerState, artboard: &Artboard) -> StateInstance {
        match &def.kind {
            StateKind::Animation { animation_id } => {
                match artboard.animation_arc(*animation_id as usize) {
                    Some(animation) => StateInstance::Animation {
                        state: state_index,
                        animation: LinearAnimationInstance::new(animation),
                        frozen: false,
                    },
                    None => StateInstance::Idle { state: state_index },
                }
            }
            StateKind::Blend1D {
                input_id,
                animations,
            } => StateInstance::Blend1D {
                state: state_index,
                input_id: *input_id,
                entries: animations
                    .iter()
                    .map(|entry: &BlendAnimation1D| BlendEntry {
                        instance: artboard
                            .animation_arc(entry.animation_id as usize)
                            .map(LinearAnimationInstance::new),
                        value: entry.value,
                        input_id: None,
                        mix: 0.0,
                    })
                    .collect(),
            },
            StateKind::BlendDirect { animations } => StateInstance::BlendDirect {
                state: state_index,
                entries: animations
                    .iter()
                    .map(|entry: &BlendAnimationDirect| BlendEntry {
                        instance: artboard
                            .animation_arc(entry.animation_id as usize)
                            .map(LinearAnimationInstance::new),
                        value: entry.mix_value,
                        input_id: entry.input_id,
                        mix: 0.0,
                    })
                    .collect(),
            },
            _ => StateInstance::Idle { state: state_index },
        }
    }

    fn state_index(&self) -> usize {
        match self {
            StateInstance::Idle { state }
            | StateInstance::Animation { state, .. }
            | StateInstance::Blend1D { state, .. }
            | StateInstance::BlendDirect { state, .. } => *state,
        }
    }

    fn animation(&self) -> Option<&LinearAnimationInstance> {
        match self {
            StateInstance::Animation { animation, .. } => Some(animation),
            _ => None,
        }
    }

    fn advance(
        &mut self,
        elapsed: f32,
        inputs: &[Option<InputValue>],
        reporter: &mut CallbackCollector,
    ) -> bool {
        match self {
            StateInstance::Idle { .. } => false,
            StateInstance::Animation {
                animation, frozen, ..
            } => {
                if *frozen {
                    false
                } else {
                    animation.advance_reporting(elapsed, reporter)
                }
            }
            StateInstance::Blend1D {
                input_id, entries, ..
            } => {
                let value = input_id
                    .and_then(|id| match inputs.get(id as usize) {
                        Some(Some(InputValue::Number(v))) => Some(*v),
                        _ => None,
                    })
                    .unwrap_or(0.0);
                update_blend_1d_mixes(entries, value);
                let mut keep_going = false;
                for entry in entries.iter_mut() {
                    if let Some(instance) = &mut entry.instance {
                        keep_going |= instance.advance_reporting(elapsed, reporter);
                    }
                }
                keep_going
            }
            StateInstance::BlendDirect { entries, .. } => {
                let mut keep_going = false;
                for entry in entries.iter_mut() {
                    entry.mix = match entry.input_id {
                        Some(id) => match inputs.get(id as usize) {
                            Some(Some(InputValue::Number(v))) => v.clamp(0.0, 1.0),
                            _ => entry.value.clamp(0.0, 1.0),
                        },
                        None => entry.value.clamp(0.0, 1.0),
                    };
                    if let Some(instance) = &mut entry.instance {
                        keep_going |= instance.advance_reporting(elapsed, reporter);
                    }
                }
                keep_going
            }
        }
    }

    fn apply(&self, artboard: &mut Artboard, mix: f32) {
        match self {
            StateInstance::Idle { .. } => {}
            StateInstance::Animation { animation, .. } => animation.apply(artboard, mix),
            StateInstance::Blend1D { entries, .. } | StateInstance::BlendDirect { entries, .. } => {
                for entry in entries {
                    let weight = mix * entry.mix;
                    if weight <= 0.0 {
                        continue;
                    }
                    if let Some(instance) = &entry.instance {
                        instance.apply(artboard, weight);
                    }
                }
            }
        }
    }
}

/// Weights the two entries bracketing `value` and zeroes the rest.
fn update_blend_1d_mixes(entries: &mut [BlendEntry], value: f32) {
    if entries.is_empty() {
        return;
    }
    let index = entries.partition_point(|entry| entry.value < value);
    let to = if index < entries.len() { Some(index) } else { None };
    let from = if index > 0 { Some(index - 1) } else { None };

    let (mix, mix_from) = match (from, to) {
        (Some(f), Some(t)) if entries[t].value != entries[f].value => {
            let m = (value - entries[f].value) / (entries[t].value - entries[f].value);
            (m, 1.0 - m)
        }
        _ => (1.0, 1.0),
    };

    for (i, entry) in entries.iter_mut().enumerate() {
        entry.mix = if Some(i) == to {
            mix
        } else if Some(i) == from {
            mix_from
        } else {
            0.0
        };
    }
}

// ============================================================================
// Layers
// ============================================================================

#[derive(Debug, Clone)]
struct LayerInstance {
    layer_index: usize,
    current: StateInstance,
    from: Option<StateInstance>,
    /// (source state, transition index) of the transition being mixed.
    transition: Option<(usize, usize)>,
    /// A transition whose conditions passed but whose exit time has not;
    /// re-checked without re-evaluating conditions so triggers are only
    /// consumed when it actually fires.
    pending_exit: Option<(usize, usize)>,
    mix: f32,
    mix_seconds: f32,
    interpolator_id: Option<u32>,
    hold_from: bool,
}

impl LayerInstance {
    fn new(layer_index: usize, layer: &Layer) -> Self {
        Self {
            layer_index,
            current: StateInstance::Idle { state: layer.entry },
            from: None,
            transition: None,
            pending_exit: None,
            mix: 1.0,
            mix_seconds: 0.0,
            interpolator_id: None,
            hold_from: false,
        }
    }

    fn is_transitioning(&self) -> bool {
        self.from.is_some()
    }
}

// ============================================================================
// The machine instance
// ============================================================================

/// A running state machine bound to one artboard instance.
#[derive(Debug, Clone)]
pub struct StateMachineInstance {
    machine: Arc<StateMachine>,
    inputs: Vec<Option<InputValue>>,
    layers: Vec<LayerInstance>,
    /// Per-listener hover bookkeeping for enter/exit semantics.
    hovered: Vec<bool>,
    reported: Vec<ReportedEvent>,
    need_advance: bool,
}

impl StateMachineInstance {
    #[must_use]
    pub fn new(machine: Arc<StateMachine>) -> Self {
        let inputs = machine
            .inputs
            .iter()
            .map(|input| {
                input.as_ref().map(|def| match &def.kind {
                    crate::machine::InputKind::Bool { default } => InputValue::Bool(*default),
                    crate::machine::InputKind::Number { default } => InputValue::Number(*default),
                    crate::machine::InputKind::Trigger => InputValue::Trigger { fired: false },
                })
            })
            .collect();
        let layers = machine
            .layers
            .iter()
            .enumerate()
            .map(|(index, layer)| LayerInstance::new(index, layer))
            .collect();
        let hovered = vec![false; machine.listeners.len()];
        Self {
            machine,
            inputs,
            layers,
            hovered,
            reported: Vec::new(),
            need_advance: true,
        }
    }

    #[inline]
    #[must_use]
    pub fn machine(&self) -> &Arc<StateMachine> {
        &self.machine
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.machine.name
    }

    // ------------------------------------------------------------------
    // Inputs
    // ------------------------------------------------------------------

    #[must_use]
    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    /// Value of the input at `index`; `None` for out-of-range or null
    /// slots.
    #[must_use]
    pub fn input_value(&self, index: usize) -> Option<&InputValue> {
        self.inputs.get(index).and_then(Option::as_ref)
    }

    fn input_index(&self, name: &str) -> Option<usize> {
        self.machine.input_named(name).map(|(index, _)| index)
    }

    pub fn set_bool(&mut self, name: &str, value: bool) -> bool {
        match self.input_index(name) {
            Some(index) => self.set_bool_at(index, value),
            None => false,
        }
    }

    pub(crate) fn set_bool_at(&mut self, index: usize, value: bool) -> bool {
        if let Some(Some(InputValue::Bool(current))) = self.inputs.get_mut(index) {
            if *current != value {
                *current = value;
                self.need_advance = true;
            }
            return true;
        }
        false
    }

    #[must_use]
    pub fn bool_value(&self, name: &str) -> Option<bool> {
        match self.input_value(self.input_index(name)?) {
            Some(InputValue::Bool(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn set_number(&mut self, name: &str, value: f32) -> bool {
        match self.input_index(name) {
            Some(index) => self.set_number_at(index, value),
            None => false,
        }
    }

    pub(crate) fn set_number_at(&mut self, index: usize, value: f32) -> bool {
        if let Some(Some(InputValue::Number(current))) = self.inputs.get_mut(index) {
            if *current != value {
                *current = value;
                self.need_advance = true;
            }
            return true;
        }
        false
    }

    #[must_use]
    pub fn number_value(&self, name: &str) -> Option<f32> {
        match self.input_value(self.input_index(name)?) {
            Some(InputValue::Number(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn fire_trigger(&mut self, name: &str) -> bool {
        match self.input_index(name) {
            Some(index) => self.fire_trigger_at(index),
            None => false,
        }
    }

    pub(crate) fn fire_trigger_at(&mut self, index: usize) -> bool {
        if let Some(Some(InputValue::Trigger { fired })) = self.inputs.get_mut(index) {
            if !*fired {
                *fired = true;
                self.need_advance = true;
            }
            return true;
        }
        false
    }

    /// Whether the named trigger fired since the last advance.
    #[must_use]
    pub fn did_fire(&self, name: &str) -> Option<bool> {
        match self.input_value(self.input_index(name)?) {
            Some(InputValue::Trigger { fired }) => Some(*fired),
            _ => None,
        }
    }

    // ------------------------------------------------------------------
    // Layer introspection
    // ------------------------------------------------------------------

    /// Index of the state the layer is currently in.
    #[must_use]
    pub fn current_state_index(&self, layer_index: usize) -> Option<usize> {
        self.layers
            .get(layer_index)
            .map(|layer| layer.current.state_index())
    }

    /// Blend-in weight of the layer's active transition, 1 when settled.
    #[must_use]
    pub fn layer_mix(&self, layer_index: usize) -> Option<f32> {
        self.layers.get(layer_index).map(|layer| layer.mix)
    }

    // ------------------------------------------------------------------
    // Reported events
    // ------------------------------------------------------------------

    #[must_use]
    pub fn reported_event_count(&self) -> usize {
        self.reported.len()
    }

    #[must_use]
    pub fn reported_event_at(&self, index: usize) -> Option<&ReportedEvent> {
        self.reported.get(index)
    }

    pub(crate) fn drain_reported_events(&mut self) -> Vec<ReportedEvent> {
        std::mem::take(&mut self.reported)
    }

    // ------------------------------------------------------------------
    // Advance
    // ------------------------------------------------------------------

    /// Advances the machine and the artboard by `elapsed_seconds`.
    ///
    /// Layer evaluation and property writes happen first, then the
    /// artboard's dependency update and nested-artboard advance, then
    /// events reported by nested machines bubble up. Returns whether
    /// another frame of work is pending.
    pub fn advance(&mut self, artboard: &mut Artboard, elapsed_seconds: f32) -> bool {
        let mut keep_going = self.advance_machine(artboard, elapsed_seconds);
        artboard.advance(elapsed_seconds);
        for event in artboard.take_nested_reported_events() {
            self.reported.push(event);
        }
        keep_going |= self
            .layers
            .iter()
            .any(LayerInstance::is_transitioning);
        keep_going
    }

    /// Machine-only advance; used directly by nested state machines whose
    /// host advances the inner artboard itself.
    pub(crate) fn advance_machine(&mut self, artboard: &mut Artboard, elapsed_seconds: f32) -> bool {
        self.reported.clear();

        let machine = Arc::clone(&self.machine);
        let mut keep_going = false;
        let mut events = Vec::new();
        let mut callbacks = CallbackCollector {
            pending: Vec::new(),
        };

        for layer in &mut self.layers {
            keep_going |= advance_layer(
                &machine,
                layer,
                &self.inputs,
                artboard,
                elapsed_seconds,
                &mut events,
                &mut callbacks,
            );
        }

        for pending in events.into_iter().chain(callbacks.pending) {
            Self::resolve_event(&mut self.reported, artboard, pending);
        }

        // Triggers stay observable for the advance that saw them and reset
        // afterwards.
        for input in self.inputs.iter_mut().flatten() {
            if let InputValue::Trigger { fired } = input {
                *fired = false;
            }
        }

        keep_going |= self.need_advance;
        self.need_advance = false;
        keep_going
    }

    fn resolve_event(
        reported: &mut Vec<ReportedEvent>,
        artboard: &mut Artboard,
        pending: PendingEvent,
    ) {
        let Some(type_key) = artboard.object_type_key(pending.event_id) else {
            return;
        };
        if !is_type_of(type_key, types::EVENT) {
            return;
        }
        let Some(name) = artboard.component_name(pending.event_id) else {
            return;
        };
        reported.push(ReportedEvent {
            event_id: pending.event_id,
            name,
            seconds_delay: pending.delay,
        });
        artboard.play_audio_event(pending.event_id);
    }

    /// True while any layer is mid-transition, any animation can progress,
    /// any listener is tracking a pointer, or an input changed since the
    /// last advance.
    #[must_use]
    pub fn keep_going(&self) -> bool {
        self.need_advance
            || self.hovered.iter().any(|hovered| *hovered)
            || self.layers.iter().any(LayerInstance::is_transitioning)
    }

    // ------------------------------------------------------------------
    // Pointer events
    // ------------------------------------------------------------------

    pub fn pointer_down(&mut self, artboard: &mut Artboard, position: Vec2) {
        self.process_pointer(artboard, position, ListenerType::Down);
    }

    pub fn pointer_up(&mut self, artboard: &mut Artboard, position: Vec2) {
        self.process_pointer(artboard, position, ListenerType::Up);
    }

    pub fn pointer_move(&mut self, artboard: &mut Artboard, position: Vec2) {
        self.process_pointer(artboard, position, ListenerType::Move);
    }

    pub(crate) fn process_pointer(
        &mut self,
        artboard: &mut Artboard,
        position: Vec2,
        kind: ListenerType,
    ) {
        self.need_advance = true;
        let machine = Arc::clone(&self.machine);
        let mut pending = Vec::new();

        for (index, listener) in machine.listeners.iter().enumerate() {
            let hit = artboard.hit_test_component(listener.target_id, position);
            let was_hovered = self.hovered[index];
            self.hovered[index] = hit;

            let matched = match listener.listener_type {
                ListenerType::Down => kind == ListenerType::Down && hit,
                ListenerType::Up => kind == ListenerType::Up && hit,
                ListenerType::Move => kind == ListenerType::Move && hit,
                ListenerType::Enter => hit && !was_hovered,
                ListenerType::Exit => !hit && was_hovered,
            };
            if matched {
                self.perform_actions(artboard, listener, position, &mut pending);
            }
        }

        for event in pending {
            Self::resolve_event(&mut self.reported, artboard, event);
        }

        // Route the pointer into nested artboards for their own machines.
        artboard.forward_pointer(kind, position);
    }

    fn perform_actions(
        &mut self,
        artboard: &mut Artboard,
        listener: &Listener,
        position: Vec2,
        pending: &mut Vec<PendingEvent>,
    ) {
        for action in &listener.actions {
            match action {
                ListenerAction::BoolChange { input_id, value } => {
                    let index = *input_id as usize;
                    match value {
                        0 => {
                            self.set_bool_at(index, false);
                        }
                        1 => {
                            self.set_bool_at(index, true);
                        }
                        _ => {
                            if let Some(Some(InputValue::Bool(current))) = self.inputs.get(index) {
                                let toggled = !*current;
                                self.set_bool_at(index, toggled);
                            }
                        }
                    }
                }
                ListenerAction::NumberChange { input_id, value } => {
                    self.set_number_at(*input_id as usize, *value);
                }
                ListenerAction::TriggerChange { input_id } => {
                    self.fire_trigger_at(*input_id as usize);
                }
                ListenerAction::AlignTarget { target_id } => {
                    artboard.align_node_to(*target_id, position);
                }
                ListenerAction::FireEvent { event_id } => {
                    pending.push(PendingEvent {
                        event_id: *event_id,
                        delay: 0.0,
                    });
                }
            }
        }
    }
}

// ============================================================================
// Layer evaluation
// ============================================================================

#[allow(clippy::too_many_arguments)]
fn advance_layer(
    machine: &StateMachine,
    layer: &mut LayerInstance,
    inputs: &[Option<InputValue>],
    artboard: &mut Artboard,
    elapsed: f32,
    events: &mut Vec<PendingEvent>,
    callbacks: &mut CallbackCollector,
) -> bool {
    let layer_def = &machine.layers[layer.layer_index];
    let mut keep_going = layer.current.advance(elapsed, inputs, callbacks);
    if layer.from.is_some() && layer.mix < 1.0 && !layer.hold_from {
        if let Some(from) = &mut layer.from {
            keep_going |= from.advance(elapsed, inputs, callbacks);
        }
    }

    // First evaluation consumes triggers; chained re-evaluations within the
    // same advance ignore them.
    for iteration in 0..MAX_STATE_CHANGES {
        if !try_change_state(layer_def, layer, inputs, artboard, events, iteration != 0) {
            break;
        }
        keep_going = true;
        if iteration + 1 == MAX_STATE_CHANGES {
            log::warn!(
                "state machine layer '{}' exceeded {MAX_STATE_CHANGES} state changes in one advance",
                layer_def.name
            );
        }
    }

    // Blend the transition in.
    if layer.from.is_some() {
        layer.mix = if layer.mix_seconds <= 0.0 {
            1.0
        } else {
            (layer.mix + elapsed / layer.mix_seconds).min(1.0)
        };
        if layer.mix >= 1.0 {
            finish_transition(layer_def, layer, events);
        }
    }

    // Apply with the (possibly eased) mix.
    let mix = match layer.interpolator_id.and_then(|id| artboard.interpolator(id)) {
        Some(interpolator) if layer.from.is_some() => {
            interpolator.transform(layer.mix).clamp(0.0, 1.0)
        }
        _ => layer.mix,
    };
    if let Some(from) = &layer.from {
        from.apply(artboard, 1.0 - mix);
    }
    layer.current.apply(artboard, mix);

    keep_going | layer.from.is_some()
}

/// Drops the `from` state once the mix completes, firing the transition's
/// at-end events.
fn finish_transition(layer_def: &Layer, layer: &mut LayerInstance, events: &mut Vec<PendingEvent>) {
    if let Some((source, index)) = layer.transition.take() {
        if let Some(transition) = layer_def
            .states
            .get(source)
            .and_then(|state| state.transitions.get(index))
        {
            push_fire_events(&transition.events, FireOccurrence::AtEnd, events);
        }
    }
    layer.from = None;
    layer.hold_from = false;
    layer.interpolator_id = None;
    layer.mix = 1.0;
}

fn push_fire_events(
    fire_events: &[crate::machine::FireEvent],
    occurs: FireOccurrence,
    events: &mut Vec<PendingEvent>,
) {
    for event in fire_events {
        if event.occurs == occurs {
            events.push(PendingEvent {
                event_id: event.event_id,
                delay: 0.0,
            });
        }
    }
}

fn conditions_pass(
    transition: &StateTransition,
    inputs: &[Option<InputValue>],
    ignore_triggers: bool,
) -> bool {
    for condition in &transition.conditions {
        let Some(Some(input)) = inputs.get(condition.input_id as usize) else {
            return false;
        };
        let pass = match (&condition.kind, input) {
            (ConditionKind::Trigger, InputValue::Trigger { fired }) => !ignore_triggers && *fired,
            (ConditionKind::Bool { op }, InputValue::Bool(value)) => match op {
                ConditionOp::Equal => *value,
                ConditionOp::NotEqual => !*value,
                _ => false,
            },
            (ConditionKind::Number { op, value }, InputValue::Number(current)) => {
                op.compare(*current, *value)
            }
            _ => false,
        };
        if !pass {
            return false;
        }
    }
    true
}

/// Exit-time constraint of a transition against the current state. Exit
/// times below one work-area duration are lifted into the loop the
/// animation was in, except for one-shots which never wrap.
fn exit_time_satisfied(transition: &StateTransition, current: &StateInstance) -> bool {
    if !transition.enable_exit_time() {
        return true;
    }
    let Some(animation_instance) = current.animation() else {
        // Non-animation states satisfy exit times immediately.
        return true;
    };
    let animation = animation_instance.animation();
    let duration = animation.duration_seconds();
    if duration <= 0.0 {
        return true;
    }
    let mut exit = transition.exit_seconds(animation.start_seconds(), duration, false);
    if exit <= duration && animation.loop_mode != LoopMode::OneShot {
        exit += (animation_instance.last_total_time() / duration).floor() * duration;
    }
    animation_instance.total_time() >= exit
}

fn try_change_state(
    layer_def: &Layer,
    layer: &mut LayerInstance,
    inputs: &[Option<InputValue>],
    artboard: &mut Artboard,
    events: &mut Vec<PendingEvent>,
    ignore_triggers: bool,
) -> bool {
    // A transition already cleared its conditions and is waiting on exit
    // time only; its triggers must not be consumed again.
    if let Some((source, index)) = layer.pending_exit {
        if let Some(transition) = layer_def
            .states
            .get(source)
            .and_then(|state| state.transitions.get(index))
        {
            if exit_time_satisfied(transition, &layer.current) {
                layer.pending_exit = None;
                fire_transition(layer_def, layer, source, index, artboard, events);
                return true;
            }
        } else {
            layer.pending_exit = None;
        }
    }

    let current_index = layer.current.state_index();
    let mut candidates = [Some(layer_def.any), Some(current_index)];
    if layer_def.any == current_index {
        candidates[1] = None;
    }

    for source in candidates.into_iter().flatten() {
        let Some(state) = layer_def.states.get(source) else {
            continue;
        };
        for (index, transition) in state.transitions.iter().enumerate() {
            if transition.is_disabled() {
                continue;
            }
            // Transitions never target the state the layer is already in.
            if transition.state_to as usize == current_index {
                continue;
            }
            if !conditions_pass(transition, inputs, ignore_triggers) {
                continue;
            }
            if !exit_time_satisfied(transition, &layer.current) {
                layer.pending_exit = Some((source, index));
                continue;
            }
            layer.pending_exit = None;
            fire_transition(layer_def, layer, source, index, artboard, events);
            return true;
        }
    }
    false
}

fn fire_transition(
    layer_def: &Layer,
    layer: &mut LayerInstance,
    source: usize,
    index: usize,
    artboard: &mut Artboard,
    events: &mut Vec<PendingEvent>,
) {
    let transition = &layer_def.states[source].transitions[index];
    let target_index = transition.state_to as usize;
    let Some(target_def) = layer_def.states.get(target_index) else {
        return;
    };

    // A transition interrupted mid-mix completes first so its at-end
    // events are not lost.
    if layer.from.is_some() {
        finish_transition(layer_def, layer, events);
    }

    let current_index = layer.current.state_index();
    if let Some(current_def) = layer_def.states.get(current_index) {
        push_fire_events(&current_def.events, FireOccurrence::AtEnd, events);
    }
    push_fire_events(&transition.events, FireOccurrence::AtStart, events);

    let source_duration = layer
        .current
        .animation()
        .map_or(0.0, |instance| instance.animation().duration_seconds());
    let source_start = layer
        .current
        .animation()
        .map_or(0.0, |instance| instance.animation().start_seconds());

    let new_instance = StateInstance::build(target_index, target_def, artboard);
    let mut old = std::mem::replace(&mut layer.current, new_instance);

    // pauseOnExit pins the source animation at its exit instant.
    layer.hold_from = false;
    if transition.pause_on_exit() && transition.enable_exit_time() {
        if let StateInstance::Animation {
            animation, frozen, ..
        } = &mut old
        {
            animation.set_time(transition.exit_seconds(source_start, source_duration, true));
            *frozen = true;
            layer.hold_from = true;
        }
    }

    push_fire_events(&target_def.events, FireOccurrence::AtStart, events);

    layer.mix_seconds = transition.mix_seconds(source_duration);
    layer.mix = if layer.mix_seconds <= 0.0 { 1.0 } else { 0.0 };
    layer.interpolator_id = transition.interpolator_id;
    layer.transition = Some((source, index));
    layer.from = Some(old);

    // Zero-length transitions complete on the same advance.
    if layer.mix >= 1.0 {
        finish_transition(layer_def, layer, events);
    }
}
