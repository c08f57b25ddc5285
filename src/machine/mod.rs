//! State machines.
//!
//! Definitions in this module are immutable after import and shared between
//! artboard instances through `Arc`; every piece of mutable playback state
//! lives in [`StateMachineInstance`](instance::StateMachineInstance).
//!
//! A machine owns inputs (bool / number / trigger), layers and pointer
//! listeners. Each layer holds a state set with exactly one entry, any and
//! exit state plus animation and blend states, connected by transitions
//! with conditions, exit times and fire events.

pub mod instance;

use bitflags::bitflags;

use crate::core::registry::{PropertyValue, properties, types};

pub use instance::{InputValue, StateMachineInstance};

// ============================================================================
// Inputs
// ============================================================================

/// Kind and default value of a state machine input.
#[derive(Debug, Clone, PartialEq)]
pub enum InputKind {
    Bool { default: bool },
    Number { default: f32 },
    Trigger,
}

/// An input definition. Unknown input types occupy `None` slots in the
/// machine's input list so indices in conditions stay aligned.
#[derive(Debug, Clone)]
pub struct InputDef {
    pub name: String,
    pub kind: InputKind,
}

impl InputDef {
    #[must_use]
    pub fn new(type_key: u16) -> Self {
        let kind = match type_key {
            types::STATE_MACHINE_NUMBER => InputKind::Number { default: 0.0 },
            types::STATE_MACHINE_TRIGGER => InputKind::Trigger,
            _ => InputKind::Bool { default: false },
        };
        Self {
            name: String::new(),
            kind,
        }
    }

    pub(crate) fn set(&mut self, key: u16, value: &PropertyValue) -> bool {
        match (key, value, &mut self.kind) {
            (properties::STATE_MACHINE_COMPONENT_NAME, PropertyValue::Str(v), _) => {
                self.name = v.clone();
            }
            (properties::INPUT_VALUE_BOOL, PropertyValue::Bool(v), InputKind::Bool { default }) => {
                *default = *v;
            }
            (
                properties::INPUT_VALUE_NUMBER,
                PropertyValue::Float(v),
                InputKind::Number { default },
            ) => {
                *default = *v;
            }
            _ => return false,
        }
        true
    }
}

// ============================================================================
// Transitions
// ============================================================================

bitflags! {
    /// Behaviour switches on a transition.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
    pub struct TransitionFlags: u32 {
        const DISABLED = 1 << 0;
        const DURATION_IS_PERCENTAGE = 1 << 1;
        const EXIT_TIME_IS_PERCENTAGE = 1 << 2;
        const ENABLE_EXIT_TIME = 1 << 3;
        const PAUSE_ON_EXIT = 1 << 4;
    }
}

/// Comparison operator of a value condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConditionOp {
    #[default]
    Equal,
    NotEqual,
    LessEqual,
    Less,
    GreaterEqual,
    Greater,
}

impl ConditionOp {
    #[must_use]
    pub fn from_u32(value: u32) -> ConditionOp {
        match value {
            1 => ConditionOp::NotEqual,
            2 => ConditionOp::LessEqual,
            3 => ConditionOp::Less,
            4 => ConditionOp::GreaterEqual,
            5 => ConditionOp::Greater,
            _ => ConditionOp::Equal,
        }
    }

    #[must_use]
    pub fn compare(self, left: f32, right: f32) -> bool {
        match self {
            ConditionOp::Equal => left == right,
            ConditionOp::NotEqual => left != right,
            ConditionOp::LessEqual => left <= right,
            ConditionOp::Less => left < right,
            ConditionOp::GreaterEqual => left >= right,
            ConditionOp::Greater => left > right,
        }
    }
}

/// What a condition checks against its referenced input.
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionKind {
    /// Passes when the bool input is true (`Equal`) or false (`NotEqual`).
    Bool { op: ConditionOp },
    Number { op: ConditionOp, value: f32 },
    /// Passes when the trigger fired this advance.
    Trigger,
}

#[derive(Debug, Clone)]
pub struct Condition {
    pub input_id: u32,
    pub kind: ConditionKind,
}

impl Condition {
    #[must_use]
    pub fn new(type_key: u16) -> Self {
        let kind = match type_key {
            types::TRANSITION_NUMBER_CONDITION => ConditionKind::Number {
                op: ConditionOp::default(),
                value: 0.0,
            },
            types::TRANSITION_BOOL_CONDITION => ConditionKind::Bool {
                op: ConditionOp::default(),
            },
            _ => ConditionKind::Trigger,
        };
        Self { input_id: 0, kind }
    }

    pub(crate) fn set(&mut self, key: u16, value: &PropertyValue) -> bool {
        match (key, value) {
            (properties::CONDITION_INPUT_ID, PropertyValue::Uint(v)) => {
                self.input_id = *v as u32;
            }
            (properties::CONDITION_OP, PropertyValue::Uint(v)) => match &mut self.kind {
                ConditionKind::Bool { op } | ConditionKind::Number { op, .. } => {
                    *op = ConditionOp::from_u32(*v as u32);
                }
                ConditionKind::Trigger => return false,
            },
            (properties::CONDITION_VALUE, PropertyValue::Float(v)) => match &mut self.kind {
                ConditionKind::Number { value, .. } => *value = *v,
                _ => return false,
            },
            _ => return false,
        }
        true
    }
}

/// When a fire event attached to a state or transition goes off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FireOccurrence {
    #[default]
    AtStart,
    AtEnd,
}

/// An event fired by entering/leaving a state or taking a transition.
#[derive(Debug, Clone, Default)]
pub struct FireEvent {
    pub event_id: u32,
    pub occurs: FireOccurrence,
}

impl FireEvent {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set(&mut self, key: u16, value: &PropertyValue) -> bool {
        match (key, value) {
            (properties::FIRE_EVENT_ID, PropertyValue::Uint(v)) => self.event_id = *v as u32,
            (properties::FIRE_EVENT_OCCURS, PropertyValue::Uint(v)) => {
                self.occurs = if *v == 1 {
                    FireOccurrence::AtEnd
                } else {
                    FireOccurrence::AtStart
                };
            }
            _ => return false,
        }
        true
    }
}

/// A directed edge between two states of a layer.
#[derive(Debug, Clone)]
pub struct StateTransition {
    /// Index of the target state within the layer.
    pub state_to: u32,
    pub flags: TransitionFlags,
    /// Milliseconds, or percent of the source animation when the
    /// percentage flag is set.
    pub duration: f32,
    /// Same units as `duration`.
    pub exit_time: f32,
    pub interpolator_id: Option<u32>,
    pub conditions: Vec<Condition>,
    pub events: Vec<FireEvent>,
    /// Blend-state transitions may pin which blended animation drives the
    /// exit time; resolved as an index into the source blend state.
    pub exit_blend_animation_id: Option<u32>,
}

impl StateTransition {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state_to: 0,
            flags: TransitionFlags::default(),
            duration: 0.0,
            exit_time: 0.0,
            interpolator_id: None,
            conditions: Vec::new(),
            events: Vec::new(),
            exit_blend_animation_id: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.flags.contains(TransitionFlags::DISABLED)
    }

    #[inline]
    #[must_use]
    pub fn enable_exit_time(&self) -> bool {
        self.flags.contains(TransitionFlags::ENABLE_EXIT_TIME)
    }

    #[inline]
    #[must_use]
    pub fn pause_on_exit(&self) -> bool {
        self.flags.contains(TransitionFlags::PAUSE_ON_EXIT)
    }

    /// Mix duration in seconds given the source animation's work-area
    /// duration (used by the percentage interpretation).
    #[must_use]
    pub fn mix_seconds(&self, source_duration_seconds: f32) -> f32 {
        if self.duration == 0.0 {
            0.0
        } else if self.flags.contains(TransitionFlags::DURATION_IS_PERCENTAGE) {
            self.duration / 100.0 * source_duration_seconds
        } else {
            self.duration / 1000.0
        }
    }

    /// Exit instant in seconds; `source_duration_seconds` is zero for
    /// non-animation sources, making percentage exits immediately satisfied.
    #[must_use]
    pub fn exit_seconds(&self, source_start_seconds: f32, source_duration_seconds: f32, absolute: bool) -> f32 {
        if self.flags.contains(TransitionFlags::EXIT_TIME_IS_PERCENTAGE) {
            let start = if absolute { source_start_seconds } else { 0.0 };
            start + self.exit_time / 100.0 * source_duration_seconds
        } else {
            self.exit_time / 1000.0
        }
    }

    pub(crate) fn set(&mut self, key: u16, value: &PropertyValue) -> bool {
        match (key, value) {
            (properties::STATE_MACHINE_COMPONENT_NAME, PropertyValue::Str(_)) => {}
            (properties::TRANSITION_STATE_TO, PropertyValue::Uint(v)) => {
                self.state_to = *v as u32;
            }
            (properties::TRANSITION_FLAGS, PropertyValue::Uint(v)) => {
                self.flags = TransitionFlags::from_bits_truncate(*v as u32);
            }
            (properties::TRANSITION_DURATION, PropertyValue::Uint(v)) => {
                self.duration = *v as f32;
            }
            (properties::TRANSITION_EXIT_TIME, PropertyValue::Uint(v)) => {
                self.exit_time = *v as f32;
            }
            (properties::TRANSITION_INTERPOLATOR_ID, PropertyValue::Uint(v)) => {
                self.interpolator_id = Some(*v as u32);
            }
            (properties::TRANSITION_EXIT_BLEND_ANIMATION_ID, PropertyValue::Uint(v)) => {
                self.exit_blend_animation_id = Some(*v as u32);
            }
            _ => return false,
        }
        true
    }
}

impl Default for StateTransition {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// States
// ============================================================================

/// One blended entry of a 1-D blend state.
#[derive(Debug, Clone, Default)]
pub struct BlendAnimation1D {
    pub animation_id: u32,
    /// Position of this entry on the blend axis.
    pub value: f32,
}

/// One entry of a direct blend state.
#[derive(Debug, Clone, Default)]
pub struct BlendAnimationDirect {
    pub animation_id: u32,
    /// Number input supplying the weight, when bound.
    pub input_id: Option<u32>,
    /// Fixed weight in [0, 1] when no input is bound.
    pub mix_value: f32,
}

/// Definition side of a blend animation entry, before the owning state is
/// known.
#[derive(Debug, Clone)]
pub enum BlendAnimationDef {
    OneD(BlendAnimation1D),
    Direct(BlendAnimationDirect),
}

impl BlendAnimationDef {
    #[must_use]
    pub fn new(type_key: u16) -> Self {
        if type_key == types::BLEND_ANIMATION_DIRECT {
            BlendAnimationDef::Direct(BlendAnimationDirect {
                mix_value: 1.0,
                ..BlendAnimationDirect::default()
            })
        } else {
            BlendAnimationDef::OneD(BlendAnimation1D::default())
        }
    }

    pub(crate) fn set(&mut self, key: u16, value: &PropertyValue) -> bool {
        match (key, value, self) {
            (properties::BLEND_ANIMATION_ID, PropertyValue::Uint(v), def) => match def {
                BlendAnimationDef::OneD(entry) => entry.animation_id = *v as u32,
                BlendAnimationDef::Direct(entry) => entry.animation_id = *v as u32,
            },
            (
                properties::BLEND_ANIMATION_VALUE,
                PropertyValue::Float(v),
                BlendAnimationDef::OneD(entry),
            ) => {
                entry.value = *v;
            }
            (
                properties::BLEND_ANIMATION_DIRECT_INPUT_ID,
                PropertyValue::Uint(v),
                BlendAnimationDef::Direct(entry),
            ) => {
                entry.input_id = Some(*v as u32);
            }
            (
                properties::BLEND_ANIMATION_DIRECT_MIX,
                PropertyValue::Float(v),
                BlendAnimationDef::Direct(entry),
            ) => {
                entry.mix_value = *v;
            }
            _ => return false,
        }
        true
    }
}

/// What a layer state does while current.
#[derive(Debug, Clone)]
pub enum StateKind {
    Entry,
    Exit,
    Any,
    /// Unknown state type retained as an inert transition endpoint.
    Placeholder,
    Animation {
        animation_id: u32,
    },
    Blend1D {
        input_id: Option<u32>,
        /// Sorted by `value` ascending at import.
        animations: Vec<BlendAnimation1D>,
    },
    BlendDirect {
        animations: Vec<BlendAnimationDirect>,
    },
}

/// A state within a layer: behaviour, outgoing transitions and fire events.
#[derive(Debug, Clone)]
pub struct LayerState {
    pub kind: StateKind,
    pub transitions: Vec<StateTransition>,
    pub events: Vec<FireEvent>,
}

impl LayerState {
    #[must_use]
    pub fn new(type_key: u16) -> Self {
        let kind = match type_key {
            types::ENTRY_STATE => StateKind::Entry,
            types::EXIT_STATE => StateKind::Exit,
            types::ANY_STATE => StateKind::Any,
            types::ANIMATION_STATE => StateKind::Animation { animation_id: 0 },
            types::BLEND_STATE_1D => StateKind::Blend1D {
                input_id: None,
                animations: Vec::new(),
            },
            types::BLEND_STATE_DIRECT => StateKind::BlendDirect {
                animations: Vec::new(),
            },
            _ => StateKind::Placeholder,
        };
        Self {
            kind,
            transitions: Vec::new(),
            events: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_animation(&self) -> bool {
        matches!(self.kind, StateKind::Animation { .. })
    }

    pub(crate) fn set(&mut self, key: u16, value: &PropertyValue) -> bool {
        match (key, value) {
            (properties::STATE_MACHINE_COMPONENT_NAME, PropertyValue::Str(_)) => true,
            (properties::ANIMATION_STATE_ID, PropertyValue::Uint(v)) => {
                if let StateKind::Animation { animation_id } = &mut self.kind {
                    *animation_id = *v as u32;
                    true
                } else {
                    false
                }
            }
            (properties::BLEND_STATE_INPUT_ID, PropertyValue::Uint(v)) => {
                if let StateKind::Blend1D { input_id, .. } = &mut self.kind {
                    *input_id = Some(*v as u32);
                    true
                } else {
                    false
                }
            }
            _ => false,
        }
    }
}

// ============================================================================
// Listeners
// ============================================================================

/// Pointer event kind a listener reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListenerType {
    Enter,
    Exit,
    #[default]
    Down,
    Up,
    Move,
}

impl ListenerType {
    #[must_use]
    pub fn from_u32(value: u32) -> ListenerType {
        match value {
            0 => ListenerType::Enter,
            1 => ListenerType::Exit,
            3 => ListenerType::Up,
            4 => ListenerType::Move,
            _ => ListenerType::Down,
        }
    }
}

/// An action executed when a listener matches.
#[derive(Debug, Clone)]
pub enum ListenerAction {
    /// 0 sets false, 1 sets true, anything else toggles.
    BoolChange { input_id: u32, value: u32 },
    NumberChange { input_id: u32, value: f32 },
    TriggerChange { input_id: u32 },
    /// Moves the target node to the pointer position in its parent frame.
    AlignTarget { target_id: u32 },
    FireEvent { event_id: u32 },
}

impl ListenerAction {
    #[must_use]
    pub fn new(type_key: u16) -> Self {
        match type_key {
            types::LISTENER_NUMBER_CHANGE => ListenerAction::NumberChange {
                input_id: 0,
                value: 0.0,
            },
            types::LISTENER_TRIGGER_CHANGE => ListenerAction::TriggerChange { input_id: 0 },
            types::LISTENER_ALIGN_TARGET => ListenerAction::AlignTarget { target_id: 0 },
            types::LISTENER_FIRE_EVENT => ListenerAction::FireEvent { event_id: 0 },
            _ => ListenerAction::BoolChange {
                input_id: 0,
                value: 0,
            },
        }
    }

    pub(crate) fn set(&mut self, key: u16, value: &PropertyValue) -> bool {
        match (key, value, self) {
            (
                properties::LISTENER_INPUT_ID,
                PropertyValue::Uint(v),
                ListenerAction::BoolChange { input_id, .. }
                | ListenerAction::NumberChange { input_id, .. }
                | ListenerAction::TriggerChange { input_id },
            ) => {
                *input_id = *v as u32;
            }
            (
                properties::LISTENER_BOOL_VALUE,
                PropertyValue::Uint(v),
                ListenerAction::BoolChange { value, .. },
            ) => {
                *value = *v as u32;
            }
            (
                properties::LISTENER_NUMBER_VALUE,
                PropertyValue::Float(v),
                ListenerAction::NumberChange { value, .. },
            ) => {
                *value = *v;
            }
            (
                properties::LISTENER_ALIGN_TARGET_ID,
                PropertyValue::Uint(v),
                ListenerAction::AlignTarget { target_id },
            ) => {
                *target_id = *v as u32;
            }
            (
                properties::LISTENER_EVENT_ID,
                PropertyValue::Uint(v),
                ListenerAction::FireEvent { event_id },
            ) => {
                *event_id = *v as u32;
            }
            _ => return false,
        }
        true
    }
}

/// Maps pointer events on a target drawable to input changes and events.
#[derive(Debug, Clone, Default)]
pub struct Listener {
    pub name: String,
    /// Local id of the target component; its drawable subtree is hit-tested.
    pub target_id: u32,
    pub listener_type: ListenerType,
    pub actions: Vec<ListenerAction>,
}

impl Listener {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set(&mut self, key: u16, value: &PropertyValue) -> bool {
        match (key, value) {
            (properties::STATE_MACHINE_COMPONENT_NAME, PropertyValue::Str(v)) => {
                self.name = v.clone();
            }
            (properties::LISTENER_TARGET_ID, PropertyValue::Uint(v)) => {
                self.target_id = *v as u32;
            }
            (properties::LISTENER_TYPE, PropertyValue::Uint(v)) => {
                self.listener_type = ListenerType::from_u32(*v as u32);
            }
            _ => return false,
        }
        true
    }
}

// ============================================================================
// Layers and the machine
// ============================================================================

/// A parallel band of states within a machine.
#[derive(Debug, Clone, Default)]
pub struct Layer {
    pub name: String,
    pub states: Vec<LayerState>,
    pub(crate) entry: usize,
    pub(crate) any: usize,
    pub(crate) exit: usize,
}

impl Layer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn entry_index(&self) -> usize {
        self.entry
    }

    #[inline]
    #[must_use]
    pub fn any_index(&self) -> usize {
        self.any
    }

    #[inline]
    #[must_use]
    pub fn exit_index(&self) -> usize {
        self.exit
    }

    pub(crate) fn set(&mut self, key: u16, value: &PropertyValue) -> bool {
        match (key, value) {
            (properties::STATE_MACHINE_COMPONENT_NAME, PropertyValue::Str(v)) => {
                self.name = v.clone();
                true
            }
            _ => false,
        }
    }

    /// Locates the entry/any/exit states. Each must appear exactly once.
    pub(crate) fn locate_special_states(&mut self) -> bool {
        let mut entry = None;
        let mut any = None;
        let mut exit = None;
        for (index, state) in self.states.iter().enumerate() {
            let slot = match state.kind {
                StateKind::Entry => &mut entry,
                StateKind::Any => &mut any,
                StateKind::Exit => &mut exit,
                _ => continue,
            };
            if slot.is_some() {
                return false;
            }
            *slot = Some(index);
        }
        match (entry, any, exit) {
            (Some(entry), Some(any), Some(exit)) => {
                self.entry = entry;
                self.any = any;
                self.exit = exit;
                true
            }
            _ => false,
        }
    }
}

/// A state machine definition: inputs, layers and listeners.
#[derive(Debug, Clone, Default)]
pub struct StateMachine {
    pub name: String,
    pub inputs: Vec<Option<InputDef>>,
    pub layers: Vec<Layer>,
    pub listeners: Vec<Listener>,
}

impl StateMachine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn input_named(&self, name: &str) -> Option<(usize, &InputDef)> {
        self.inputs
            .iter()
            .enumerate()
            .find_map(|(index, input)| match input {
                Some(input) if input.name == name => Some((index, input)),
                _ => None,
            })
    }

    pub(crate) fn set(&mut self, key: u16, value: &PropertyValue) -> bool {
        match (key, value) {
            (properties::ANIMATION_NAME, PropertyValue::Str(v)) => {
                self.name = v.clone();
                true
            }
            _ => false,
        }
    }
}
