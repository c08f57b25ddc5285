//! Streaming import stack.
//!
//! Decoding is context-sensitive: a keyframe belongs to the keyed property
//! most recently opened, which belongs to a keyed object, which belongs to
//! a linear animation, which belongs to an artboard. The stack keeps one
//! scope per open container; a new object either attaches to a scope as a
//! leaf or opens a scope of its own, closing any scopes that cannot
//! contain it. Closing a scope attaches the finished container to its
//! parent and runs its resolution fixups.

use std::sync::Arc;

use crate::animation::keyed::{KeyedObject, KeyedProperty};
use crate::animation::linear::LinearAnimation;
use crate::artboard::Artboard;
use crate::assets::{FileAsset, FileAssetLoader};
use crate::core::object::CoreObject;
use crate::core::registry::{is_type_of, types};
use crate::errors::{Result, VexelError};
use crate::machine::{Layer, LayerState, Listener, StateKind, StateMachine, StateTransition};
use crate::render::Factory;

/// One open container during streaming decode.
enum Scope {
    Artboard(Artboard),
    FileAsset {
        asset: FileAsset,
        contents: Option<Vec<u8>>,
    },
    LinearAnimation(LinearAnimation),
    KeyedObject(KeyedObject),
    KeyedProperty {
        fps: f32,
        property: KeyedProperty,
    },
    StateMachine(StateMachine),
    Layer(Layer),
    LayerState(LayerState),
    Transition {
        type_key: u16,
        transition: StateTransition,
    },
    Listener(Listener),
}

impl Scope {
    fn kind(&self) -> ScopeKind {
        match self {
            Scope::Artboard(_) => ScopeKind::Artboard,
            Scope::FileAsset { .. } => ScopeKind::FileAsset,
            Scope::LinearAnimation(_) => ScopeKind::LinearAnimation,
            Scope::KeyedObject(_) => ScopeKind::KeyedObject,
            Scope::KeyedProperty { .. } => ScopeKind::KeyedProperty,
            Scope::StateMachine(_) => ScopeKind::StateMachine,
            Scope::Layer(_) => ScopeKind::Layer,
            Scope::LayerState(_) => ScopeKind::LayerState,
            Scope::Transition { .. } => ScopeKind::Transition,
            Scope::Listener(_) => ScopeKind::Listener,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScopeKind {
    Artboard,
    FileAsset,
    LinearAnimation,
    KeyedObject,
    KeyedProperty,
    StateMachine,
    Layer,
    LayerState,
    Transition,
    Listener,
}

/// Everything the stack hands off at file level.
pub(crate) struct ImportContext<'a> {
    pub artboards: Vec<Artboard>,
    pub assets: Vec<FileAsset>,
    pub backboard_seen: bool,
    pub factory: Arc<dyn Factory>,
    pub loader: Option<&'a dyn FileAssetLoader>,
}

pub(crate) struct ImportStack<'a> {
    stack: Vec<Scope>,
    pub context: ImportContext<'a>,
}

fn malformed(message: &str) -> VexelError {
    VexelError::malformed(message)
}

impl<'a> ImportStack<'a> {
    pub(crate) fn new(factory: Arc<dyn Factory>, loader: Option<&'a dyn FileAssetLoader>) -> Self {
        Self {
            stack: Vec::new(),
            context: ImportContext {
                artboards: Vec::new(),
                assets: Vec::new(),
                backboard_seen: false,
                factory,
                loader,
            },
        }
    }

    /// Routes a freshly decoded object into the stack.
    pub(crate) fn import_object(&mut self, object: CoreObject) -> Result<()> {
        let type_key = object.type_key();
        match object {
            CoreObject::Backboard => {
                self.close_all()?;
                self.context.backboard_seen = true;
                Ok(())
            }
            CoreObject::Artboard(root) => {
                if !self.context.backboard_seen {
                    return Err(malformed("artboard before backboard"));
                }
                self.close_all()?;
                let mut artboard = Artboard::new();
                artboard.objects.push(Some(CoreObject::Artboard(root)));
                artboard.factory = Some(Arc::clone(&self.context.factory));
                self.stack.push(Scope::Artboard(artboard));
                Ok(())
            }
            CoreObject::LinearAnimation(animation) => {
                self.close_to(ScopeKind::Artboard, "linear animation outside artboard")?;
                self.stack.push(Scope::LinearAnimation(animation));
                Ok(())
            }
            CoreObject::KeyedObject(keyed) => {
                self.close_to(ScopeKind::LinearAnimation, "keyed object outside animation")?;
                self.stack.push(Scope::KeyedObject(keyed));
                Ok(())
            }
            CoreObject::KeyedProperty(property) => {
                self.close_to(ScopeKind::KeyedObject, "keyed property outside keyed object")?;
                let fps = self
                    .find_scope(ScopeKind::LinearAnimation)
                    .map_or(60.0, |scope| match scope {
                        Scope::LinearAnimation(animation) => animation.fps.max(1) as f32,
                        _ => 60.0,
                    });
                self.stack.push(Scope::KeyedProperty { fps, property });
                Ok(())
            }
            CoreObject::KeyFrame(mut frame) => {
                self.close_to(ScopeKind::KeyedProperty, "keyframe outside keyed property")?;
                match self.stack.last_mut() {
                    Some(Scope::KeyedProperty { fps, property }) => {
                        frame.compute_seconds(*fps);
                        property.keyframes.push(frame);
                        Ok(())
                    }
                    _ => Err(malformed("keyframe outside keyed property")),
                }
            }
            CoreObject::StateMachine(machine) => {
                self.close_to(ScopeKind::Artboard, "state machine outside artboard")?;
                self.stack.push(Scope::StateMachine(machine));
                Ok(())
            }
            CoreObject::Input(input) => {
                self.close_to(ScopeKind::StateMachine, "input outside state machine")?;
                match self.stack.last_mut() {
                    Some(Scope::StateMachine(machine)) => {
                        machine.inputs.push(Some(input));
                        Ok(())
                    }
                    _ => Err(malformed("input outside state machine")),
                }
            }
            CoreObject::Layer(layer) => {
                self.close_to(ScopeKind::StateMachine, "layer outside state machine")?;
                self.stack.push(Scope::Layer(layer));
                Ok(())
            }
            CoreObject::LayerState(state) => {
                self.close_to(ScopeKind::Layer, "state outside layer")?;
                self.stack.push(Scope::LayerState(state));
                Ok(())
            }
            CoreObject::Transition {
                type_key,
                transition,
            } => {
                self.close_to(ScopeKind::LayerState, "transition outside state")?;
                self.stack.push(Scope::Transition {
                    type_key,
                    transition,
                });
                Ok(())
            }
            CoreObject::Condition(condition) => {
                self.close_to(ScopeKind::Transition, "condition outside transition")?;
                match self.stack.last_mut() {
                    Some(Scope::Transition { transition, .. }) => {
                        transition.conditions.push(condition);
                        Ok(())
                    }
                    _ => Err(malformed("condition outside transition")),
                }
            }
            CoreObject::BlendAnimation(def) => {
                self.close_to(ScopeKind::LayerState, "blend animation outside state")?;
                match self.stack.last_mut() {
                    Some(Scope::LayerState(state)) => match (&mut state.kind, def) {
                        (
                            StateKind::Blend1D { animations, .. },
                            crate::machine::BlendAnimationDef::OneD(entry),
                        ) => {
                            animations.push(entry);
                            Ok(())
                        }
                        (
                            StateKind::BlendDirect { animations },
                            crate::machine::BlendAnimationDef::Direct(entry),
                        ) => {
                            animations.push(entry);
                            Ok(())
                        }
                        _ => Err(malformed("blend animation on a non-blend state")),
                    },
                    _ => Err(malformed("blend animation outside state")),
                }
            }
            CoreObject::FireEvent(event) => {
                // Fire events attach to the innermost open layer component:
                // a transition when one is open, the state otherwise.
                for scope in self.stack.iter_mut().rev() {
                    match scope {
                        Scope::Transition { transition, .. } => {
                            transition.events.push(event);
                            return Ok(());
                        }
                        Scope::LayerState(state) => {
                            state.events.push(event);
                            return Ok(());
                        }
                        _ => {}
                    }
                }
                Err(malformed("fire event outside state or transition"))
            }
            CoreObject::Listener(listener) => {
                self.close_to(ScopeKind::StateMachine, "listener outside state machine")?;
                self.stack.push(Scope::Listener(listener));
                Ok(())
            }
            CoreObject::ListenerAction(action) => {
                self.close_to(ScopeKind::Listener, "listener action outside listener")?;
                match self.stack.last_mut() {
                    Some(Scope::Listener(listener)) => {
                        listener.actions.push(action);
                        Ok(())
                    }
                    _ => Err(malformed("listener action outside listener")),
                }
            }
            CoreObject::FileAsset(asset) => {
                self.close_all()?;
                if !self.context.backboard_seen {
                    return Err(malformed("file asset before backboard"));
                }
                self.stack.push(Scope::FileAsset {
                    asset,
                    contents: None,
                });
                Ok(())
            }
            CoreObject::FileAssetContents(contents) => match self.stack.last_mut() {
                Some(Scope::FileAsset {
                    contents: slot, ..
                }) => {
                    *slot = Some(contents.bytes);
                    Ok(())
                }
                _ => Err(malformed("asset contents outside file asset")),
            },
            // Everything else is an artboard-table component.
            other => {
                if other.component().is_none() && !is_type_of(type_key, types::COMPONENT) {
                    return Err(malformed("object cannot live in an artboard"));
                }
                match self.find_scope_mut(ScopeKind::Artboard) {
                    Some(Scope::Artboard(artboard)) => {
                        artboard.objects.push(Some(other));
                        Ok(())
                    }
                    _ => Err(malformed("component outside artboard")),
                }
            }
        }
    }

    /// An unknown object type keeps index parity where it matters.
    pub(crate) fn read_null_object(&mut self) {
        match self.stack.last_mut() {
            Some(Scope::Artboard(artboard)) => artboard.objects.push(None),
            Some(Scope::StateMachine(machine)) => machine.inputs.push(None),
            Some(Scope::Layer(layer)) => {
                // An unknown state type still has to be a valid transition
                // endpoint.
                layer.states.push(LayerState::new(types::LAYER_STATE));
            }
            _ => {}
        }
    }

    /// Closes every open scope; called at end of stream.
    pub(crate) fn resolve(&mut self) -> Result<()> {
        self.close_all()
    }

    fn find_scope(&self, kind: ScopeKind) -> Option<&Scope> {
        self.stack.iter().rev().find(|scope| scope.kind() == kind)
    }

    fn find_scope_mut(&mut self, kind: ScopeKind) -> Option<&mut Scope> {
        self.stack
            .iter_mut()
            .rev()
            .find(|scope| scope.kind() == kind)
    }

    /// Pops scopes until `kind` is on top.
    fn close_to(&mut self, kind: ScopeKind, error: &str) -> Result<()> {
        while let Some(top) = self.stack.last() {
            if top.kind() == kind {
                return Ok(());
            }
            self.close_top()?;
        }
        Err(malformed(error))
    }

    fn close_all(&mut self) -> Result<()> {
        while !self.stack.is_empty() {
            self.close_top()?;
        }
        Ok(())
    }

    /// Pops the top scope and attaches it to its parent.
    fn close_top(&mut self) -> Result<()> {
        let Some(scope) = self.stack.pop() else {
            return Ok(());
        };
        match scope {
            Scope::Artboard(artboard) => {
                self.context.artboards.push(artboard);
                Ok(())
            }
            Scope::FileAsset {
                mut asset,
                contents,
            } => {
                let handled = match self.context.loader {
                    Some(loader) => loader.load_contents(
                        &mut asset,
                        contents.as_deref(),
                        self.context.factory.as_ref(),
                    ),
                    None => false,
                };
                if !handled {
                    if let Some(bytes) = &contents {
                        asset.decode_default(bytes, self.context.factory.as_ref());
                    }
                }
                self.context.assets.push(asset);
                Ok(())
            }
            Scope::LinearAnimation(animation) => match self.stack.last_mut() {
                Some(Scope::Artboard(artboard)) => {
                    artboard.animations.push(Arc::new(animation));
                    Ok(())
                }
                _ => Err(malformed("linear animation outside artboard")),
            },
            Scope::KeyedObject(keyed) => match self.stack.last_mut() {
                Some(Scope::LinearAnimation(animation)) => {
                    animation.keyed_objects.push(keyed);
                    Ok(())
                }
                _ => Err(malformed("keyed object outside animation")),
            },
            Scope::KeyedProperty { property, .. } => {
                if property.keyframes.is_empty() {
                    log::warn!(
                        "dropping keyed property {} with no keyframes",
                        property.property_key
                    );
                    return Ok(());
                }
                if !property
                    .keyframes
                    .windows(2)
                    .all(|pair| pair[0].seconds < pair[1].seconds)
                {
                    return Err(malformed("keyframes not strictly ordered by time"));
                }
                match self.stack.last_mut() {
                    Some(Scope::KeyedObject(keyed)) => {
                        keyed.keyed_properties.push(property);
                        Ok(())
                    }
                    _ => Err(malformed("keyed property outside keyed object")),
                }
            }
            Scope::StateMachine(mut machine) => {
                let animation_count = match self.find_scope(ScopeKind::Artboard) {
                    Some(Scope::Artboard(artboard)) => artboard.animations.len(),
                    _ => return Err(malformed("state machine outside artboard")),
                };
                resolve_state_machine(&mut machine, animation_count)?;
                match self.find_scope_mut(ScopeKind::Artboard) {
                    Some(Scope::Artboard(artboard)) => {
                        artboard.machines.push(Arc::new(machine));
                        Ok(())
                    }
                    _ => Err(malformed("state machine outside artboard")),
                }
            }
            Scope::Layer(layer) => match self.stack.last_mut() {
                Some(Scope::StateMachine(machine)) => {
                    machine.layers.push(layer);
                    Ok(())
                }
                _ => Err(malformed("layer outside state machine")),
            },
            Scope::LayerState(mut state) => {
                if let StateKind::Blend1D { animations, .. } = &mut state.kind {
                    animations.sort_by(|a, b| a.value.total_cmp(&b.value));
                }
                match self.stack.last_mut() {
                    Some(Scope::Layer(layer)) => {
                        layer.states.push(state);
                        Ok(())
                    }
                    _ => Err(malformed("state outside layer")),
                }
            }
            Scope::Transition { transition, .. } => match self.stack.last_mut() {
                Some(Scope::LayerState(state)) => {
                    state.transitions.push(transition);
                    Ok(())
                }
                _ => Err(malformed("transition outside state")),
            },
            Scope::Listener(listener) => match self.stack.last_mut() {
                Some(Scope::StateMachine(machine)) => {
                    machine.listeners.push(listener);
                    Ok(())
                }
                _ => Err(malformed("listener outside state machine")),
            },
        }
    }
}

/// Per-machine fixups once all layers, states and transitions are known.
fn resolve_state_machine(machine: &mut StateMachine, animation_count: usize) -> Result<()> {
    for layer in &mut machine.layers {
        if !layer.locate_special_states() {
            return Err(malformed(
                "layer must contain exactly one entry, any and exit state",
            ));
        }
        let state_count = layer.states.len();
        for state in &mut layer.states {
            if let StateKind::Animation { animation_id } = &state.kind {
                if *animation_id as usize >= animation_count {
                    log::warn!("animation state references missing animation {animation_id}");
                }
            }
            let blend_len = match &state.kind {
                StateKind::Blend1D { animations, .. } => animations.len(),
                StateKind::BlendDirect { animations } => animations.len(),
                _ => 0,
            };
            for transition in &mut state.transitions {
                if transition.state_to as usize >= state_count {
                    return Err(malformed("transition targets a missing state"));
                }
                if let Some(exit_id) = transition.exit_blend_animation_id {
                    if exit_id as usize >= blend_len {
                        transition.exit_blend_animation_id = None;
                    }
                }
            }
        }
    }
    Ok(())
}
