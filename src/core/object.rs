//! The heterogeneous object model.
//!
//! Every schema type the decoder can materialize is one variant of
//! [`CoreObject`]. Objects that participate in the artboard's dependency
//! graph embed [`Component`] base data by composition; stream-routed
//! objects (animation data, state machine parts, assets) are moved out of
//! the variant and into their containers by the import stack.

use crate::animation::interpolator::{CubicInterpolator, InterpolatorKind};
use crate::animation::keyed::{KeyedObject, KeyedProperty};
use crate::animation::keyframe::{KeyFrame, KeyFrameValue};
use crate::animation::linear::LinearAnimation;
use crate::artboard::ArtboardObject;
use crate::assets::{FileAsset, FileAssetContents};
use crate::core::component::{Component, SetOutcome};
use crate::core::registry::{PropertyValue, types};
use crate::event::{AudioEvent, Event};
use crate::machine::{
    BlendAnimationDef, Condition, ConditionKind, FireEvent, InputDef, InputKind, Layer, LayerState,
    Listener, ListenerAction, StateKind, StateMachine, StateTransition,
};
use crate::nested::{
    NestedArtboard, NestedBool, NestedNumber, NestedRemapAnimation, NestedSimpleAnimation,
    NestedStateMachine, NestedTrigger,
};
use crate::node::{Node, Shape};

/// One decoded object. The tag is the schema type; `type_key` recovers the
/// exact 16-bit key for variants covering several concrete types.
#[derive(Debug, Clone)]
pub enum CoreObject {
    // Artboard-table components
    Artboard(ArtboardObject),
    Node(Node),
    Shape(Shape),
    NestedArtboard(NestedArtboard),
    NestedSimpleAnimation(NestedSimpleAnimation),
    NestedRemapAnimation(NestedRemapAnimation),
    NestedStateMachine(NestedStateMachine),
    NestedBool(NestedBool),
    NestedNumber(NestedNumber),
    NestedTrigger(NestedTrigger),
    CubicInterpolator(CubicInterpolator),
    Event(Event),
    AudioEvent(AudioEvent),

    // Stream-routed objects, handed to their containers during import
    Backboard,
    LinearAnimation(LinearAnimation),
    KeyedObject(KeyedObject),
    KeyedProperty(KeyedProperty),
    KeyFrame(KeyFrame),
    StateMachine(StateMachine),
    Layer(Layer),
    LayerState(LayerState),
    Transition {
        type_key: u16,
        transition: StateTransition,
    },
    Condition(Condition),
    Input(InputDef),
    BlendAnimation(BlendAnimationDef),
    Listener(Listener),
    ListenerAction(ListenerAction),
    FireEvent(FireEvent),
    FileAsset(FileAsset),
    FileAssetContents(FileAssetContents),
}

impl CoreObject {
    /// Constructs a default-initialized object for a known type key.
    #[must_use]
    pub fn make(type_key: u16) -> Option<CoreObject> {
        use types as t;
        Some(match type_key {
            t::ARTBOARD => CoreObject::Artboard(ArtboardObject::new()),
            t::NODE => CoreObject::Node(Node::new()),
            t::SHAPE => CoreObject::Shape(Shape::new()),
            t::NESTED_ARTBOARD => CoreObject::NestedArtboard(NestedArtboard::new()),
            t::NESTED_SIMPLE_ANIMATION => {
                CoreObject::NestedSimpleAnimation(NestedSimpleAnimation::new())
            }
            t::NESTED_REMAP_ANIMATION => {
                CoreObject::NestedRemapAnimation(NestedRemapAnimation::new())
            }
            t::NESTED_STATE_MACHINE => CoreObject::NestedStateMachine(NestedStateMachine::new()),
            t::NESTED_BOOL => CoreObject::NestedBool(NestedBool::new()),
            t::NESTED_NUMBER => CoreObject::NestedNumber(NestedNumber::new()),
            t::NESTED_TRIGGER => CoreObject::NestedTrigger(NestedTrigger::new()),
            t::CUBIC_EASE_INTERPOLATOR => {
                CoreObject::CubicInterpolator(CubicInterpolator::new(InterpolatorKind::Ease))
            }
            t::CUBIC_VALUE_INTERPOLATOR => {
                CoreObject::CubicInterpolator(CubicInterpolator::new(InterpolatorKind::Value))
            }
            t::EVENT => CoreObject::Event(Event::new()),
            t::AUDIO_EVENT => CoreObject::AudioEvent(AudioEvent::new()),

            t::BACKBOARD => CoreObject::Backboard,
            t::LINEAR_ANIMATION => CoreObject::LinearAnimation(LinearAnimation::new()),
            t::KEYED_OBJECT => CoreObject::KeyedObject(KeyedObject::new()),
            t::KEYED_PROPERTY => CoreObject::KeyedProperty(KeyedProperty::new()),
            t::KEYFRAME_DOUBLE | t::KEYFRAME_COLOR | t::KEYFRAME_ID | t::KEYFRAME_BOOL
            | t::KEYFRAME_CALLBACK => CoreObject::KeyFrame(KeyFrame::new(type_key)),
            t::STATE_MACHINE => CoreObject::StateMachine(StateMachine::new()),
            t::STATE_MACHINE_LAYER => CoreObject::Layer(Layer::new()),
            t::ENTRY_STATE | t::EXIT_STATE | t::ANY_STATE | t::ANIMATION_STATE
            | t::BLEND_STATE_1D | t::BLEND_STATE_DIRECT => {
                CoreObject::LayerState(LayerState::new(type_key))
            }
            t::STATE_TRANSITION | t::BLEND_STATE_TRANSITION => CoreObject::Transition {
                type_key,
                transition: StateTransition::new(),
            },
            t::TRANSITION_BOOL_CONDITION | t::TRANSITION_NUMBER_CONDITION
            | t::TRANSITION_TRIGGER_CONDITION => CoreObject::Condition(Condition::new(type_key)),
            t::STATE_MACHINE_BOOL | t::STATE_MACHINE_NUMBER | t::STATE_MACHINE_TRIGGER => {
                CoreObject::Input(InputDef::new(type_key))
            }
            t::BLEND_ANIMATION_1D | t::BLEND_ANIMATION_DIRECT => {
                CoreObject::BlendAnimation(BlendAnimationDef::new(type_key))
            }
            t::STATE_MACHINE_LISTENER => CoreObject::Listener(Listener::new()),
            t::LISTENER_BOOL_CHANGE | t::LISTENER_NUMBER_CHANGE | t::LISTENER_TRIGGER_CHANGE
            | t::LISTENER_ALIGN_TARGET | t::LISTENER_FIRE_EVENT => {
                CoreObject::ListenerAction(ListenerAction::new(type_key))
            }
            t::STATE_MACHINE_FIRE_EVENT => CoreObject::FireEvent(FireEvent::new()),
            t::IMAGE_ASSET | t::FONT_ASSET | t::AUDIO_ASSET => {
                CoreObject::FileAsset(FileAsset::new(type_key))
            }
            t::FILE_ASSET_CONTENTS => CoreObject::FileAssetContents(FileAssetContents::new()),
            _ => return None,
        })
    }

    /// The concrete 16-bit type key of this object.
    #[must_use]
    pub fn type_key(&self) -> u16 {
        use types as t;
        match self {
            CoreObject::Artboard(_) => t::ARTBOARD,
            CoreObject::Node(_) => t::NODE,
            CoreObject::Shape(_) => t::SHAPE,
            CoreObject::NestedArtboard(_) => t::NESTED_ARTBOARD,
            CoreObject::NestedSimpleAnimation(_) => t::NESTED_SIMPLE_ANIMATION,
            CoreObject::NestedRemapAnimation(_) => t::NESTED_REMAP_ANIMATION,
            CoreObject::NestedStateMachine(_) => t::NESTED_STATE_MACHINE,
            CoreObject::NestedBool(_) => t::NESTED_BOOL,
            CoreObject::NestedNumber(_) => t::NESTED_NUMBER,
            CoreObject::NestedTrigger(_) => t::NESTED_TRIGGER,
            CoreObject::CubicInterpolator(interpolator) => match interpolator.kind {
                InterpolatorKind::Ease => t::CUBIC_EASE_INTERPOLATOR,
                InterpolatorKind::Value => t::CUBIC_VALUE_INTERPOLATOR,
            },
            CoreObject::Event(_) => t::EVENT,
            CoreObject::AudioEvent(_) => t::AUDIO_EVENT,
            CoreObject::Backboard => t::BACKBOARD,
            CoreObject::LinearAnimation(_) => t::LINEAR_ANIMATION,
            CoreObject::KeyedObject(_) => t::KEYED_OBJECT,
            CoreObject::KeyedProperty(_) => t::KEYED_PROPERTY,
            CoreObject::KeyFrame(frame) => match frame.value {
                KeyFrameValue::Float(_) => t::KEYFRAME_DOUBLE,
                KeyFrameValue::Color(_) => t::KEYFRAME_COLOR,
                KeyFrameValue::Id(_) => t::KEYFRAME_ID,
                KeyFrameValue::Bool(_) => t::KEYFRAME_BOOL,
                KeyFrameValue::Callback => t::KEYFRAME_CALLBACK,
            },
            CoreObject::StateMachine(_) => t::STATE_MACHINE,
            CoreObject::Layer(_) => t::STATE_MACHINE_LAYER,
            CoreObject::LayerState(state) => match state.kind {
                StateKind::Entry => t::ENTRY_STATE,
                StateKind::Exit => t::EXIT_STATE,
                StateKind::Any => t::ANY_STATE,
                StateKind::Placeholder => t::LAYER_STATE,
                StateKind::Animation { .. } => t::ANIMATION_STATE,
                StateKind::Blend1D { .. } => t::BLEND_STATE_1D,
                StateKind::BlendDirect { .. } => t::BLEND_STATE_DIRECT,
            },
            CoreObject::Transition { type_key, .. } => *type_key,
            CoreObject::Condition(condition) => match condition.kind {
                ConditionKind::Bool { .. } => t::TRANSITION_BOOL_CONDITION,
                ConditionKind::Number { .. } => t::TRANSITION_NUMBER_CONDITION,
                ConditionKind::Trigger => t::TRANSITION_TRIGGER_CONDITION,
            },
            CoreObject::Input(input) => match input.kind {
                InputKind::Bool { .. } => t::STATE_MACHINE_BOOL,
                InputKind::Number { .. } => t::STATE_MACHINE_NUMBER,
                InputKind::Trigger => t::STATE_MACHINE_TRIGGER,
            },
            CoreObject::BlendAnimation(def) => match def {
                BlendAnimationDef::OneD(_) => t::BLEND_ANIMATION_1D,
                BlendAnimationDef::Direct(_) => t::BLEND_ANIMATION_DIRECT,
            },
            CoreObject::Listener(_) => t::STATE_MACHINE_LISTENER,
            CoreObject::ListenerAction(action) => match action {
                ListenerAction::BoolChange { .. } => t::LISTENER_BOOL_CHANGE,
                ListenerAction::NumberChange { .. } => t::LISTENER_NUMBER_CHANGE,
                ListenerAction::TriggerChange { .. } => t::LISTENER_TRIGGER_CHANGE,
                ListenerAction::AlignTarget { .. } => t::LISTENER_ALIGN_TARGET,
                ListenerAction::FireEvent { .. } => t::LISTENER_FIRE_EVENT,
            },
            CoreObject::FireEvent(_) => t::STATE_MACHINE_FIRE_EVENT,
            CoreObject::FileAsset(asset) => asset.type_key,
            CoreObject::FileAssetContents(_) => t::FILE_ASSET_CONTENTS,
        }
    }

    /// Shorthand for [`is_type_of`](crate::core::registry::is_type_of) on
    /// this object's type key.
    #[must_use]
    pub fn is_type_of(&self, ancestor: u16) -> bool {
        crate::core::registry::is_type_of(self.type_key(), ancestor)
    }

    /// Graph-participation base data, for objects that have it.
    #[must_use]
    pub fn component(&self) -> Option<&Component> {
        match self {
            CoreObject::Artboard(object) => Some(&object.component),
            CoreObject::Node(node) => Some(&node.component),
            CoreObject::Shape(shape) => Some(&shape.node.component),
            CoreObject::NestedArtboard(nested) => Some(&nested.node.component),
            CoreObject::NestedSimpleAnimation(def) => Some(&def.component),
            CoreObject::NestedRemapAnimation(def) => Some(&def.component),
            CoreObject::NestedStateMachine(def) => Some(&def.component),
            CoreObject::NestedBool(input) => Some(&input.component),
            CoreObject::NestedNumber(input) => Some(&input.component),
            CoreObject::NestedTrigger(input) => Some(&input.component),
            CoreObject::CubicInterpolator(interpolator) => Some(&interpolator.component),
            CoreObject::Event(event) => Some(&event.component),
            CoreObject::AudioEvent(event) => Some(&event.event.component),
            _ => None,
        }
    }

    #[must_use]
    pub fn component_mut(&mut self) -> Option<&mut Component> {
        match self {
            CoreObject::Artboard(object) => Some(&mut object.component),
            CoreObject::Node(node) => Some(&mut node.component),
            CoreObject::Shape(shape) => Some(&mut shape.node.component),
            CoreObject::NestedArtboard(nested) => Some(&mut nested.node.component),
            CoreObject::NestedSimpleAnimation(def) => Some(&mut def.component),
            CoreObject::NestedRemapAnimation(def) => Some(&mut def.component),
            CoreObject::NestedStateMachine(def) => Some(&mut def.component),
            CoreObject::NestedBool(input) => Some(&mut input.component),
            CoreObject::NestedNumber(input) => Some(&mut input.component),
            CoreObject::NestedTrigger(input) => Some(&mut input.component),
            CoreObject::CubicInterpolator(interpolator) => Some(&mut interpolator.component),
            CoreObject::Event(event) => Some(&mut event.component),
            CoreObject::AudioEvent(event) => Some(&mut event.event.component),
            _ => None,
        }
    }

    /// Applies a decoded property value, dispatching through the object's
    /// deserializer chain (own keys first, then the embedded bases).
    pub fn set(&mut self, key: u16, value: &PropertyValue) -> SetOutcome {
        fn from_bool(applied: bool) -> SetOutcome {
            if applied {
                SetOutcome::changed(crate::core::component::Dirt::empty(), false)
            } else {
                SetOutcome::Unknown
            }
        }
        match self {
            CoreObject::Artboard(object) => object.set(key, value),
            CoreObject::Node(node) => node.set(key, value),
            CoreObject::Shape(shape) => shape.set(key, value),
            CoreObject::NestedArtboard(nested) => nested.set(key, value),
            CoreObject::NestedSimpleAnimation(def) => def.set(key, value),
            CoreObject::NestedRemapAnimation(def) => def.set(key, value),
            CoreObject::NestedStateMachine(def) => def.set(key, value),
            CoreObject::NestedBool(input) => input.set(key, value),
            CoreObject::NestedNumber(input) => input.set(key, value),
            CoreObject::NestedTrigger(input) => input.set(key, value),
            CoreObject::CubicInterpolator(interpolator) => interpolator.set(key, value),
            CoreObject::Event(event) => event.set(key, value),
            CoreObject::AudioEvent(event) => event.set(key, value),
            CoreObject::Backboard => SetOutcome::Unknown,
            CoreObject::LinearAnimation(animation) => from_bool(animation.set(key, value)),
            CoreObject::KeyedObject(keyed) => from_bool(match (key, value) {
                (
                    crate::core::registry::properties::KEYED_OBJECT_ID,
                    PropertyValue::Uint(v),
                ) => {
                    keyed.object_id = *v as u32;
                    true
                }
                _ => false,
            }),
            CoreObject::KeyedProperty(keyed) => from_bool(match (key, value) {
                (
                    crate::core::registry::properties::KEYED_PROPERTY_KEY,
                    PropertyValue::Uint(v),
                ) => {
                    keyed.property_key = *v as u16;
                    true
                }
                _ => false,
            }),
            CoreObject::KeyFrame(frame) => from_bool(frame.set(key, value)),
            CoreObject::StateMachine(machine) => from_bool(machine.set(key, value)),
            CoreObject::Layer(layer) => from_bool(layer.set(key, value)),
            CoreObject::LayerState(state) => from_bool(state.set(key, value)),
            CoreObject::Transition { transition, .. } => from_bool(transition.set(key, value)),
            CoreObject::Condition(condition) => from_bool(condition.set(key, value)),
            CoreObject::Input(input) => from_bool(input.set(key, value)),
            CoreObject::BlendAnimation(def) => from_bool(def.set(key, value)),
            CoreObject::Listener(listener) => from_bool(listener.set(key, value)),
            CoreObject::ListenerAction(action) => from_bool(action.set(key, value)),
            CoreObject::FireEvent(event) => from_bool(event.set(key, value)),
            CoreObject::FileAsset(asset) => from_bool(asset.set(key, value)),
            CoreObject::FileAssetContents(contents) => from_bool(contents.set(key, value)),
        }
    }

    /// Reads a property value back; implemented for the table components
    /// that animations and hosts query.
    #[must_use]
    pub fn get(&self, key: u16) -> Option<PropertyValue> {
        match self {
            CoreObject::Artboard(object) => object.get(key),
            CoreObject::Node(node) => node.get(key),
            CoreObject::Shape(shape) => shape.get(key),
            CoreObject::NestedArtboard(nested) => nested.get(key),
            CoreObject::NestedSimpleAnimation(def) => def.get(key),
            CoreObject::NestedRemapAnimation(def) => def.get(key),
            CoreObject::NestedStateMachine(def) => def.get(key),
            CoreObject::NestedBool(input) => input.get(key),
            CoreObject::NestedNumber(input) => input.get(key),
            CoreObject::NestedTrigger(input) => input.get(key),
            CoreObject::CubicInterpolator(interpolator) => interpolator.get(key),
            CoreObject::Event(event) => event.get(key),
            CoreObject::AudioEvent(event) => event.get(key),
            _ => None,
        }
    }
}
