//! Artboards.
//!
//! An [`Artboard`] owns the object table decoded from the file, the shared
//! animation and state-machine definitions, the ordered draw list and the
//! topologically sorted dependency order. The same type serves as the
//! immutable source (owned by the [`File`](crate::file::File)) and as the
//! per-player instance; [`Artboard::is_instance`] tells them apart.
//! Instances are clones: every object is copied and keeps its local id, so
//! animations targeting "object id N" still resolve; definitions stay
//! shared through `Arc`.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use glam::{Affine2, Vec2};

use crate::animation::{CubicInterpolator, LinearAnimation, LinearAnimationInstance};
use crate::audio::AudioEngine;
use crate::core::component::{Component, Dirt, SetOutcome};
use crate::core::dependency::DependencySorter;
use crate::core::object::CoreObject;
use crate::core::registry::{PropertyValue, is_type_of, properties, types};
use crate::errors::Status;
use crate::event::ReportedEvent;
use crate::machine::instance::StateMachineInstance;
use crate::machine::{ListenerType, StateMachine};
use crate::math::{Aabb, lerp, lerp_color};
use crate::nested::NestedAnimationRuntime;
use crate::render::{Factory, PaintStyle, Renderer};

/// Re-entrant update passes are bounded; exceeding the cap indicates a
/// cyclic dirty propagation and defers the rest to the next frame.
const MAX_UPDATE_STEPS: usize = 100;

static NEXT_ARTBOARD_ID: AtomicU32 = AtomicU32::new(1);

/// Properties of the artboard itself; always object 0 of the table.
#[derive(Debug, Clone)]
pub struct ArtboardObject {
    pub component: Component,
    pub width: f32,
    pub height: f32,
    pub x: f32,
    pub y: f32,
    pub origin_x: f32,
    pub origin_y: f32,
    pub clip: bool,
    pub default_state_machine_id: Option<u32>,
    /// Opacity pushed down by a nesting host.
    pub opacity: f32,
    /// Frame-origin translation; disabled when nested.
    pub(crate) frame_origin: bool,
    pub(crate) world_transform: Affine2,
}

impl ArtboardObject {
    #[must_use]
    pub fn new() -> Self {
        Self {
            component: Component::new(),
            width: 0.0,
            height: 0.0,
            x: 0.0,
            y: 0.0,
            origin_x: 0.0,
            origin_y: 0.0,
            clip: false,
            default_state_machine_id: None,
            opacity: 1.0,
            frame_origin: true,
            world_transform: Affine2::IDENTITY,
        }
    }

    pub(crate) fn set(&mut self, key: u16, value: &PropertyValue) -> SetOutcome {
        match (key, value) {
            (properties::ARTBOARD_WIDTH, PropertyValue::Float(v)) => {
                Self::float_field(&mut self.width, *v, Dirt::PATH)
            }
            (properties::ARTBOARD_HEIGHT, PropertyValue::Float(v)) => {
                Self::float_field(&mut self.height, *v, Dirt::PATH)
            }
            (properties::ARTBOARD_X, PropertyValue::Float(v)) => {
                Self::float_field(&mut self.x, *v, Dirt::empty())
            }
            (properties::ARTBOARD_Y, PropertyValue::Float(v)) => {
                Self::float_field(&mut self.y, *v, Dirt::empty())
            }
            (properties::ARTBOARD_ORIGIN_X, PropertyValue::Float(v)) => {
                Self::float_field(&mut self.origin_x, *v, Dirt::PATH | Dirt::WORLD_TRANSFORM)
            }
            (properties::ARTBOARD_ORIGIN_Y, PropertyValue::Float(v)) => {
                Self::float_field(&mut self.origin_y, *v, Dirt::PATH | Dirt::WORLD_TRANSFORM)
            }
            (properties::ARTBOARD_CLIP, PropertyValue::Bool(v)) => {
                if self.clip == *v {
                    return SetOutcome::Unchanged;
                }
                self.clip = *v;
                SetOutcome::changed(Dirt::PATH, false)
            }
            (properties::ARTBOARD_DEFAULT_STATE_MACHINE_ID, PropertyValue::Uint(v)) => {
                self.default_state_machine_id = Some(*v as u32);
                SetOutcome::changed(Dirt::empty(), false)
            }
            (properties::NODE_OPACITY, PropertyValue::Float(v)) => {
                if self.opacity == *v {
                    return SetOutcome::Unchanged;
                }
                self.opacity = *v;
                SetOutcome::changed(Dirt::RENDER_OPACITY, true)
            }
            _ => self.component.set(key, value),
        }
    }

    fn float_field(slot: &mut f32, value: f32, dirt: Dirt) -> SetOutcome {
        if *slot == value {
            return SetOutcome::Unchanged;
        }
        *slot = value;
        SetOutcome::changed(dirt, !dirt.is_empty())
    }

    pub(crate) fn get(&self, key: u16) -> Option<PropertyValue> {
        match key {
            properties::ARTBOARD_WIDTH => Some(PropertyValue::Float(self.width)),
            properties::ARTBOARD_HEIGHT => Some(PropertyValue::Float(self.height)),
            properties::ARTBOARD_X => Some(PropertyValue::Float(self.x)),
            properties::ARTBOARD_Y => Some(PropertyValue::Float(self.y)),
            properties::ARTBOARD_ORIGIN_X => Some(PropertyValue::Float(self.origin_x)),
            properties::ARTBOARD_ORIGIN_Y => Some(PropertyValue::Float(self.origin_y)),
            properties::ARTBOARD_CLIP => Some(PropertyValue::Bool(self.clip)),
            properties::ARTBOARD_DEFAULT_STATE_MACHINE_ID => self
                .default_state_machine_id
                .map(|id| PropertyValue::Uint(u64::from(id))),
            properties::NODE_OPACITY => Some(PropertyValue::Float(self.opacity)),
            _ => self.component.get(key),
        }
    }
}

impl Default for ArtboardObject {
    fn default() -> Self {
        Self::new()
    }
}

/// A root-level scene unit and, when instanced, the runtime unit the host
/// drives.
pub struct Artboard {
    pub(crate) objects: Vec<Option<CoreObject>>,
    pub(crate) animations: Vec<Arc<LinearAnimation>>,
    pub(crate) machines: Vec<Arc<StateMachine>>,
    pub(crate) drawables: Vec<u32>,
    pub(crate) nested_artboards: Vec<u32>,
    pub(crate) dependency_order: Vec<u32>,
    dirt: Dirt,
    dirt_depth: usize,
    is_instance: bool,
    runtime_id: u32,
    pub(crate) factory: Option<Arc<dyn Factory>>,
    pub(crate) audio: Option<Arc<AudioEngine>>,
}

impl std::fmt::Debug for Artboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Artboard")
            .field("name", &self.name())
            .field("objects", &self.objects.len())
            .field("animations", &self.animations.len())
            .field("machines", &self.machines.len())
            .field("is_instance", &self.is_instance)
            .finish()
    }
}

impl Clone for Artboard {
    fn clone(&self) -> Self {
        Self {
            objects: self.objects.clone(),
            animations: self.animations.clone(),
            machines: self.machines.clone(),
            drawables: self.drawables.clone(),
            nested_artboards: self.nested_artboards.clone(),
            dependency_order: self.dependency_order.clone(),
            dirt: self.dirt,
            dirt_depth: self.dirt_depth,
            is_instance: self.is_instance,
            runtime_id: NEXT_ARTBOARD_ID.fetch_add(1, Ordering::Relaxed),
            factory: self.factory.clone(),
            audio: self.audio.clone(),
        }
    }
}

impl Drop for Artboard {
    fn drop(&mut self) {
        if let Some(engine) = &self.audio {
            engine.stop_owned(self.runtime_id);
        }
    }
}

impl Artboard {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            objects: Vec::new(),
            animations: Vec::new(),
            machines: Vec::new(),
            drawables: Vec::new(),
            nested_artboards: Vec::new(),
            dependency_order: Vec::new(),
            dirt: Dirt::COMPONENTS,
            dirt_depth: 0,
            is_instance: false,
            runtime_id: NEXT_ARTBOARD_ID.fetch_add(1, Ordering::Relaxed),
            factory: None,
            audio: None,
        }
    }

    // ------------------------------------------------------------------
    // Object table
    // ------------------------------------------------------------------

    #[inline]
    #[must_use]
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Resolves a local id to its object; `None` for out-of-range ids and
    /// null slots left by unknown object types.
    #[must_use]
    pub fn object(&self, id: u32) -> Option<&CoreObject> {
        self.objects.get(id as usize).and_then(Option::as_ref)
    }

    #[must_use]
    pub(crate) fn object_mut(&mut self, id: u32) -> Option<&mut CoreObject> {
        self.objects.get_mut(id as usize).and_then(Option::as_mut)
    }

    #[must_use]
    pub fn object_type_key(&self, id: u32) -> Option<u16> {
        self.object(id).map(CoreObject::type_key)
    }

    #[must_use]
    pub(crate) fn component(&self, id: u32) -> Option<&Component> {
        self.object(id).and_then(CoreObject::component)
    }

    #[must_use]
    pub(crate) fn component_mut(&mut self, id: u32) -> Option<&mut Component> {
        self.object_mut(id).and_then(CoreObject::component_mut)
    }

    /// Name of the component with local id `id`.
    #[must_use]
    pub fn component_name(&self, id: u32) -> Option<String> {
        self.component(id).map(|component| component.name.clone())
    }

    fn root(&self) -> Option<&ArtboardObject> {
        match self.object(0) {
            Some(CoreObject::Artboard(root)) => Some(root),
            _ => None,
        }
    }

    fn root_mut(&mut self) -> Option<&mut ArtboardObject> {
        match self.object_mut(0) {
            Some(CoreObject::Artboard(root)) => Some(root),
            _ => None,
        }
    }

    #[must_use]
    pub fn name(&self) -> String {
        self.component_name(0).unwrap_or_default()
    }

    #[must_use]
    pub fn width(&self) -> f32 {
        self.root().map_or(0.0, |root| root.width)
    }

    #[must_use]
    pub fn height(&self) -> f32 {
        self.root().map_or(0.0, |root| root.height)
    }

    /// Artboard bounds in pointer/draw space.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        let Some(root) = self.root() else {
            return Aabb::from_ltwh(0.0, 0.0, 0.0, 0.0);
        };
        if root.frame_origin {
            Aabb::from_ltwh(0.0, 0.0, root.width, root.height)
        } else {
            Aabb::from_ltwh(
                -root.width * root.origin_x,
                -root.height * root.origin_y,
                root.width,
                root.height,
            )
        }
    }

    #[inline]
    #[must_use]
    pub fn is_instance(&self) -> bool {
        self.is_instance
    }

    /// Clone used by [`File`](crate::file::File) instancing: objects are
    /// copied with their ids intact, definitions stay shared.
    pub(crate) fn clone_for_instance(&self) -> Artboard {
        let mut instance = self.clone();
        instance.is_instance = true;
        instance
    }

    /// A fresh runtime instance of this artboard. Instancing goes through
    /// the owning file so nested artboard references resolve.
    #[must_use]
    pub fn instance(&self, file: &crate::file::File) -> Option<Artboard> {
        file.instance_of(self)
    }

    #[inline]
    #[must_use]
    pub(crate) fn runtime_id(&self) -> u32 {
        self.runtime_id
    }

    /// Attaches the shared audio engine used by audio events.
    pub fn set_audio_engine(&mut self, engine: Arc<AudioEngine>) {
        for &id in &self.nested_artboards.clone() {
            if let Some(CoreObject::NestedArtboard(nested)) = self.object_mut(id) {
                if let Some(inner) = nested.inner.as_deref_mut() {
                    inner.set_audio_engine(Arc::clone(&engine));
                }
            }
        }
        self.audio = Some(engine);
    }

    #[must_use]
    pub fn audio_engine(&self) -> Option<&Arc<AudioEngine>> {
        self.audio.as_ref()
    }

    // ------------------------------------------------------------------
    // Animations and state machines
    // ------------------------------------------------------------------

    #[must_use]
    pub fn animation_count(&self) -> usize {
        self.animations.len()
    }

    #[must_use]
    pub(crate) fn animation_arc(&self, index: usize) -> Option<Arc<LinearAnimation>> {
        self.animations.get(index).cloned()
    }

    #[must_use]
    pub fn animation_name_at(&self, index: usize) -> Option<&str> {
        self.animations.get(index).map(|a| a.name.as_str())
    }

    /// New playback cursor over the animation at `index`.
    #[must_use]
    pub fn animation_at(&self, index: usize) -> Option<LinearAnimationInstance> {
        self.animation_arc(index).map(LinearAnimationInstance::new)
    }

    #[must_use]
    pub fn animation_named(&self, name: &str) -> Option<LinearAnimationInstance> {
        self.animations
            .iter()
            .find(|animation| animation.name == name)
            .cloned()
            .map(LinearAnimationInstance::new)
    }

    #[must_use]
    pub fn state_machine_count(&self) -> usize {
        self.machines.len()
    }

    #[must_use]
    pub fn state_machine_name_at(&self, index: usize) -> Option<&str> {
        self.machines.get(index).map(|m| m.name.as_str())
    }

    /// New instance of the state machine at `index`.
    #[must_use]
    pub fn state_machine_at(&self, index: usize) -> Option<StateMachineInstance> {
        self.machines
            .get(index)
            .cloned()
            .map(StateMachineInstance::new)
    }

    #[must_use]
    pub fn state_machine_named(&self, name: &str) -> Option<StateMachineInstance> {
        self.machines
            .iter()
            .find(|machine| machine.name == name)
            .cloned()
            .map(StateMachineInstance::new)
    }

    /// The machine referenced by the artboard's default id, falling back to
    /// the first machine.
    #[must_use]
    pub fn default_state_machine(&self) -> Option<StateMachineInstance> {
        let index = self
            .root()
            .and_then(|root| root.default_state_machine_id)
            .map_or(0, |id| id as usize);
        self.state_machine_at(index)
            .or_else(|| self.state_machine_at(0))
    }

    #[must_use]
    pub(crate) fn interpolator(&self, id: u32) -> Option<&CubicInterpolator> {
        match self.object(id) {
            Some(CoreObject::CubicInterpolator(interpolator)) => Some(interpolator),
            _ => None,
        }
    }

    // ------------------------------------------------------------------
    // Property writes
    // ------------------------------------------------------------------

    /// Applies a property value to an object, propagating dirt. Returns
    /// whether the key was accepted.
    pub fn set_property(&mut self, id: u32, key: u16, value: PropertyValue) -> bool {
        let Some(object) = self.object_mut(id) else {
            return false;
        };
        match object.set(key, &value) {
            SetOutcome::Unknown => false,
            SetOutcome::Unchanged => true,
            SetOutcome::Changed { dirt, recurse } => {
                if !dirt.is_empty() {
                    self.add_dirt(id, dirt, recurse);
                } else {
                    // Still a change; make sure an update pass runs.
                    self.dirt |= Dirt::COMPONENTS;
                }
                true
            }
        }
    }

    #[must_use]
    pub fn get_property(&self, id: u32, key: u16) -> Option<PropertyValue> {
        self.object(id)?.get(key)
    }

    fn get_f32(&self, id: u32, key: u16) -> Option<f32> {
        match self.get_property(id, key) {
            Some(PropertyValue::Float(value)) => Some(value),
            _ => None,
        }
    }

    pub(crate) fn write_keyed_f32(&mut self, id: u32, key: u16, value: f32, mix: f32) {
        let value = if mix < 1.0 {
            match self.get_f32(id, key) {
                Some(current) => lerp(current, value, mix),
                None => value,
            }
        } else {
            value
        };
        self.set_property(id, key, PropertyValue::Float(value));
    }

    pub(crate) fn write_keyed_color(&mut self, id: u32, key: u16, value: u32, mix: f32) {
        let value = if mix < 1.0 {
            match self.get_property(id, key) {
                Some(PropertyValue::Color(current)) => lerp_color(current, value, mix),
                _ => value,
            }
        } else {
            value
        };
        self.set_property(id, key, PropertyValue::Color(value));
    }

    pub(crate) fn write_keyed_uint(&mut self, id: u32, key: u16, value: u64) {
        self.set_property(id, key, PropertyValue::Uint(value));
    }

    pub(crate) fn write_keyed_bool(&mut self, id: u32, key: u16, value: bool) {
        self.set_property(id, key, PropertyValue::Bool(value));
    }

    // ------------------------------------------------------------------
    // Dirt
    // ------------------------------------------------------------------

    /// Ors `value` into the component's dirt, notifying the artboard and
    /// optionally recursing into dependents.
    pub(crate) fn add_dirt(&mut self, id: u32, value: Dirt, recurse: bool) -> bool {
        let Some(component) = self.component_mut(id) else {
            return false;
        };
        if component.dirt.contains(value) {
            return false;
        }
        component.dirt |= value;
        let order = component.graph_order;
        let dependents = component.dependents.clone();

        self.dirt |= Dirt::COMPONENTS;
        if order < self.dirt_depth {
            self.dirt_depth = order;
        }

        if recurse {
            for dependent in dependents {
                self.add_dirt(dependent, value, true);
            }
        }
        true
    }

    /// Runs the re-entrant update loop over the dependency order.
    ///
    /// Every component dirty at loop start is updated exactly once, unless
    /// an update dirties a strictly earlier component, in which case the
    /// pass restarts. Bounded by [`MAX_UPDATE_STEPS`].
    pub(crate) fn update_components(&mut self) -> bool {
        if !self.dirt.contains(Dirt::COMPONENTS) {
            return false;
        }
        let count = self.dependency_order.len();
        let mut step = 0;
        while self.dirt.contains(Dirt::COMPONENTS) && step < MAX_UPDATE_STEPS {
            self.dirt.remove(Dirt::COMPONENTS);
            for index in 0..count {
                let id = self.dependency_order[index];
                self.dirt_depth = index;
                let Some(component) = self.component(id) else {
                    continue;
                };
                let dirt = component.dirt;
                if dirt.is_empty() || dirt.contains(Dirt::COLLAPSED) {
                    continue;
                }
                if let Some(component) = self.component_mut(id) {
                    component.dirt = Dirt::empty();
                }
                self.update_object(id, dirt);

                // Something earlier in the graph was dirtied; restart.
                if self.dirt_depth < index {
                    break;
                }
            }
            step += 1;
        }
        if step == MAX_UPDATE_STEPS && self.dirt.contains(Dirt::COMPONENTS) {
            log::warn!(
                "artboard '{}' exceeded {MAX_UPDATE_STEPS} update passes; deferring to next frame",
                self.name()
            );
        }
        true
    }

    /// World transform and child opacity the component at `id` offers its
    /// children.
    fn parent_context(&self, id: u32) -> (Affine2, f32) {
        match self.object(id) {
            Some(CoreObject::Artboard(root)) => (root.world_transform, root.opacity),
            Some(CoreObject::Node(node)) => (node.world_transform, node.render_opacity),
            Some(CoreObject::Shape(shape)) => (shape.node.world_transform, shape.node.render_opacity),
            Some(CoreObject::NestedArtboard(nested)) => {
                (nested.node.world_transform, nested.node.render_opacity)
            }
            _ => (Affine2::IDENTITY, 1.0),
        }
    }

    fn update_object(&mut self, id: u32, dirt: Dirt) {
        if id == 0 {
            if let Some(root) = self.root_mut() {
                if dirt.intersects(Dirt::PATH | Dirt::WORLD_TRANSFORM) {
                    root.world_transform = if root.frame_origin {
                        Affine2::from_translation(Vec2::new(
                            root.width * root.origin_x,
                            root.height * root.origin_y,
                        ))
                    } else {
                        Affine2::IDENTITY
                    };
                }
            }
            return;
        }

        let parent_id = self
            .component(id)
            .and_then(|component| component.parent_id)
            .unwrap_or(0);
        let (parent_world, parent_opacity) = self.parent_context(parent_id);

        let Some(object) = self.object_mut(id) else {
            return;
        };
        match object {
            CoreObject::Node(node) => {
                update_node(node, dirt, &parent_world, parent_opacity);
            }
            CoreObject::Shape(shape) => {
                update_node(&mut shape.node, dirt, &parent_world, parent_opacity);
            }
            CoreObject::NestedArtboard(nested) => {
                update_node(&mut nested.node, dirt, &parent_world, parent_opacity);
                if dirt.contains(Dirt::RENDER_OPACITY) {
                    let opacity = nested.node.render_opacity;
                    if let Some(inner) = nested.inner.as_deref_mut() {
                        inner.set_property(
                            0,
                            properties::NODE_OPACITY,
                            PropertyValue::Float(opacity),
                        );
                        inner.update_components();
                    }
                }
            }
            _ => {}
        }
    }

    // ------------------------------------------------------------------
    // Finalization
    // ------------------------------------------------------------------

    /// Three-pass finalize sweep run after decode and after instancing:
    /// parent resolution, reference checks, dependency build + sort.
    pub(crate) fn initialize(&mut self) -> Status {
        // Hierarchy and graph state are rebuilt from scratch so the sweep
        // is idempotent across instancing.
        for object in self.objects.iter_mut().flatten() {
            if let Some(component) = object.component_mut() {
                component.children.clear();
                component.dependents.clear();
                component.graph_order = 0;
            }
        }

        // Pass 1: resolve parents; objects can be looked up by id but must
        // not assume their parent's parent has resolved. A missing parent
        // is tolerated (the object was an unknown type); a parent that is
        // not a container is not.
        let mut status = Status::Ok;
        for id in 1..self.objects.len() as u32 {
            let Some(object) = self.object(id) else {
                continue;
            };
            let Some(component) = object.component() else {
                continue;
            };
            let parent_id = component.parent_id.unwrap_or(0);
            match self.object(parent_id) {
                Some(parent)
                    if is_type_of(parent.type_key(), types::CONTAINER_COMPONENT)
                        && parent_id != id =>
                {
                    if let Some(parent) = self.component_mut(parent_id) {
                        parent.children.push(id);
                    }
                }
                Some(_) => return Status::InvalidObject,
                None => {
                    log::warn!("component {id} references missing parent {parent_id}");
                    status = Status::MissingObject;
                }
            }
            if let Some(CoreObject::CubicInterpolator(interpolator)) = self.object_mut(id) {
                interpolator.initialize();
            }
        }

        // Pass 2: checks that need all single-object references resolved.
        if let Status::InvalidObject = self.on_added_clean() {
            return Status::InvalidObject;
        }

        // Pass 3: dependencies, draw list, nested list, topological sort.
        self.drawables.clear();
        self.nested_artboards.clear();
        for id in 1..self.objects.len() as u32 {
            let Some(object) = self.object(id) else {
                continue;
            };
            let type_key = object.type_key();
            if is_type_of(type_key, types::NODE) {
                let parent_id = self
                    .component(id)
                    .and_then(|component| component.parent_id)
                    .unwrap_or(0);
                if self.component(parent_id).is_some() {
                    if let Some(parent) = self.component_mut(parent_id) {
                        parent.dependents.push(id);
                    }
                }
            }
            if is_type_of(type_key, types::DRAWABLE) {
                self.drawables.push(id);
            }
            if type_key == types::NESTED_ARTBOARD {
                self.nested_artboards.push(id);
            }
        }

        let mut order = Vec::new();
        let mut sorter = DependencySorter::new();
        if !sorter.sort(self, 0, &mut order) {
            return Status::InvalidObject;
        }
        for (rank, &id) in order.iter().enumerate() {
            if let Some(component) = self.component_mut(id) {
                component.graph_order = rank;
            }
        }
        self.dependency_order = order;

        // Everything recomputes on the first advance.
        for object in self.objects.iter_mut().flatten() {
            if let Some(component) = object.component_mut() {
                component.dirt |= Dirt::FILTHY;
            }
        }
        self.dirt |= Dirt::COMPONENTS;
        self.dirt_depth = 0;
        status
    }

    /// Pass 2 of [`initialize`](Self::initialize): per-type reference
    /// checks and nested-artboard runtime wiring.
    fn on_added_clean(&mut self) -> Status {
        for &id in &self.nested_artboards.clone() {
            self.wire_nested_runtime(id);
        }

        // Nested animation components must hang off a nested artboard.
        for id in 1..self.objects.len() as u32 {
            let Some(object) = self.object(id) else {
                continue;
            };
            let type_key = object.type_key();
            if is_type_of(type_key, types::NESTED_ANIMATION) {
                let parent_id = self
                    .component(id)
                    .and_then(|component| component.parent_id)
                    .unwrap_or(0);
                if self.object_type_key(parent_id) != Some(types::NESTED_ARTBOARD) {
                    return Status::InvalidObject;
                }
            }
            if is_type_of(type_key, types::NESTED_INPUT) {
                let parent_id = self
                    .component(id)
                    .and_then(|component| component.parent_id)
                    .unwrap_or(0);
                if self.object_type_key(parent_id) != Some(types::NESTED_STATE_MACHINE) {
                    return Status::InvalidObject;
                }
            }
        }
        Status::Ok
    }

    /// Builds the per-instance runtime of one nested artboard: animation
    /// cursors and machine instances for its nested-animation children.
    fn wire_nested_runtime(&mut self, id: u32) {
        let Some(component) = self.component(id) else {
            return;
        };
        let children: Vec<u32> = component.children.to_vec();

        // Collect what to build before borrowing the nest mutably.
        enum Plan {
            Simple(u32, u32),
            Remap(u32, u32),
            Machine(u32, u32),
        }
        let mut plans = Vec::new();
        for child in children {
            match self.object(child) {
                Some(CoreObject::NestedSimpleAnimation(def)) => {
                    plans.push(Plan::Simple(child, def.animation_id));
                }
                Some(CoreObject::NestedRemapAnimation(def)) => {
                    plans.push(Plan::Remap(child, def.animation_id));
                }
                Some(CoreObject::NestedStateMachine(def)) => {
                    plans.push(Plan::Machine(child, def.animation_id));
                }
                _ => {}
            }
        }

        let Some(CoreObject::NestedArtboard(nested)) = self.object_mut(id) else {
            return;
        };
        let Some(inner) = nested.inner.as_deref_mut() else {
            return;
        };
        // Nested instances draw from their own origin and inherit host
        // opacity.
        if let Some(root) = inner.root_mut() {
            root.frame_origin = false;
        }

        nested.runtime.clear();
        for plan in plans {
            match plan {
                Plan::Simple(def_id, animation_id) => {
                    if let Some(animation) = inner.animation_arc(animation_id as usize) {
                        nested.runtime.push(NestedAnimationRuntime::Simple {
                            def_id,
                            instance: LinearAnimationInstance::new(animation),
                        });
                    }
                }
                Plan::Remap(def_id, animation_id) => {
                    if let Some(animation) = inner.animation_arc(animation_id as usize) {
                        nested.runtime.push(NestedAnimationRuntime::Remap {
                            def_id,
                            instance: LinearAnimationInstance::new(animation),
                        });
                    }
                }
                Plan::Machine(def_id, machine_index) => {
                    if let Some(instance) = inner.state_machine_at(machine_index as usize) {
                        nested.runtime.push(NestedAnimationRuntime::Machine {
                            def_id,
                            instance,
                        });
                    }
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Advance
    // ------------------------------------------------------------------

    /// Updates dirty components along the dependency order and advances
    /// nested artboards. Returns whether anything was recomputed.
    pub fn advance(&mut self, elapsed_seconds: f32) -> bool {
        let mut did_update = self.update_components();
        for id in self.nested_artboards.clone() {
            did_update |= self.advance_nested(id, elapsed_seconds);
        }
        if let Some(engine) = &self.audio {
            engine.update();
        }
        did_update
    }

    fn advance_nested(&mut self, id: u32, elapsed_seconds: f32) -> bool {
        if self
            .component(id)
            .is_none_or(Component::is_collapsed)
        {
            return false;
        }

        // Phase 1: read nested-animation parameters and pending input
        // writes from the definition components.
        #[derive(Clone, Copy)]
        enum Params {
            Simple { speed: f32, is_playing: bool, mix: f32 },
            Remap { mix: f32, time: f32 },
        }
        enum InputApply {
            Bool(u32, bool),
            Number(u32, f32),
            Trigger(u32),
        }
        let children: Vec<u32> = self
            .component(id)
            .map(|component| component.children.to_vec())
            .unwrap_or_default();
        let mut params: Vec<(u32, Params)> = Vec::new();
        let mut input_applies: Vec<(u32, InputApply)> = Vec::new();
        for child in &children {
            match self.object(*child) {
                Some(CoreObject::NestedSimpleAnimation(def)) => params.push((
                    *child,
                    Params::Simple {
                        speed: def.speed,
                        is_playing: def.is_playing,
                        mix: def.mix,
                    },
                )),
                Some(CoreObject::NestedRemapAnimation(def)) => params.push((
                    *child,
                    Params::Remap {
                        mix: def.mix,
                        time: def.time,
                    },
                )),
                Some(CoreObject::NestedStateMachine(_)) => {
                    let machine_children: Vec<u32> = self
                        .component(*child)
                        .map(|component| component.children.to_vec())
                        .unwrap_or_default();
                    for input_object in machine_children {
                        match self.object_mut(input_object) {
                            Some(CoreObject::NestedBool(input)) => {
                                if input.value_dirty {
                                    input.value_dirty = false;
                                    input_applies.push((
                                        *child,
                                        InputApply::Bool(input.input_id, input.nested_value),
                                    ));
                                }
                            }
                            Some(CoreObject::NestedNumber(input)) => {
                                if input.value_dirty {
                                    input.value_dirty = false;
                                    input_applies.push((
                                        *child,
                                        InputApply::Number(input.input_id, input.nested_value),
                                    ));
                                }
                            }
                            Some(CoreObject::NestedTrigger(input)) => {
                                if input.pending_fire {
                                    input.pending_fire = false;
                                    input_applies
                                        .push((*child, InputApply::Trigger(input.input_id)));
                                }
                            }
                            _ => {}
                        }
                    }
                }
                _ => {}
            }
        }

        // Phase 2: drive the runtime against the inner instance.
        let Some(CoreObject::NestedArtboard(nested)) = self.object_mut(id) else {
            return false;
        };
        let Some(inner) = nested.inner.as_deref_mut() else {
            return false;
        };
        let mut keep_going = false;
        for runtime in &mut nested.runtime {
            let def_id = runtime.def_id();
            match runtime {
                NestedAnimationRuntime::Simple { instance, .. } => {
                    let Some((
                        _,
                        Params::Simple {
                            speed,
                            is_playing,
                            mix,
                        },
                    )) = params.iter().find(|(d, _)| *d == def_id)
                    else {
                        continue;
                    };
                    if *is_playing {
                        keep_going |= instance.advance(elapsed_seconds * *speed);
                    }
                    if *mix > 0.0 {
                        instance.apply(inner, *mix);
                    }
                }
                NestedAnimationRuntime::Remap { instance, .. } => {
                    let Some((_, Params::Remap { mix, time })) =
                        params.iter().find(|(d, _)| *d == def_id)
                    else {
                        continue;
                    };
                    let animation = Arc::clone(instance.animation());
                    instance.set_time(
                        animation.global_to_local_seconds(animation.duration_seconds() * *time),
                    );
                    if *mix > 0.0 {
                        instance.apply(inner, *mix);
                    }
                }
                NestedAnimationRuntime::Machine { instance, .. } => {
                    for (machine_def, apply) in &input_applies {
                        if *machine_def != def_id {
                            continue;
                        }
                        match apply {
                            InputApply::Bool(index, value) => {
                                instance.set_bool_at(*index as usize, *value);
                            }
                            InputApply::Number(index, value) => {
                                instance.set_number_at(*index as usize, *value);
                            }
                            InputApply::Trigger(index) => {
                                instance.fire_trigger_at(*index as usize);
                            }
                        }
                    }
                    keep_going |= instance.advance_machine(inner, elapsed_seconds);
                }
            }
        }
        keep_going |= inner.advance(elapsed_seconds);
        keep_going
    }

    /// Events queued by nested state machines this frame, recursively.
    pub(crate) fn take_nested_reported_events(&mut self) -> Vec<ReportedEvent> {
        let mut events = Vec::new();
        for id in self.nested_artboards.clone() {
            let Some(CoreObject::NestedArtboard(nested)) = self.object_mut(id) else {
                continue;
            };
            for runtime in &mut nested.runtime {
                if let NestedAnimationRuntime::Machine { instance, .. } = runtime {
                    events.extend(instance.drain_reported_events());
                }
            }
            if let Some(inner) = nested.inner.as_deref_mut() {
                events.extend(inner.take_nested_reported_events());
            }
        }
        events
    }

    // ------------------------------------------------------------------
    // Pointer support
    // ------------------------------------------------------------------

    /// Whether any drawable in the subtree of `target_id` contains `point`.
    #[must_use]
    pub(crate) fn hit_test_component(&self, target_id: u32, point: Vec2) -> bool {
        let mut stack = vec![target_id];
        while let Some(id) = stack.pop() {
            match self.object(id) {
                Some(CoreObject::Shape(shape)) => {
                    if !shape.drawable.is_hidden() && shape.world_bounds().contains(point) {
                        return true;
                    }
                }
                // The artboard itself is a valid listener target.
                Some(CoreObject::Artboard(_)) => {
                    if self.bounds().contains(point) {
                        return true;
                    }
                }
                _ => {}
            }
            if let Some(component) = self.component(id) {
                stack.extend(component.children.iter().copied());
            }
        }
        false
    }

    /// Routes a pointer event into every nested artboard, in inner-local
    /// coordinates.
    pub(crate) fn forward_pointer(&mut self, kind: ListenerType, position: Vec2) {
        for id in self.nested_artboards.clone() {
            let Some(CoreObject::NestedArtboard(nested)) = self.object_mut(id) else {
                continue;
            };
            let world = nested.node.world_transform;
            let Some(inner) = nested.inner.as_deref_mut() else {
                continue;
            };
            let offset = match inner.root() {
                Some(root) => Affine2::from_translation(Vec2::new(
                    -root.origin_x * root.width,
                    -root.origin_y * root.height,
                )),
                None => Affine2::IDENTITY,
            };
            let local = (world * offset).inverse().transform_point2(position);
            for runtime in &mut nested.runtime {
                if let NestedAnimationRuntime::Machine { instance, .. } = runtime {
                    instance.process_pointer(inner, local, kind);
                }
            }
        }
    }

    /// Moves a node so it lands on `position` (artboard space), expressed
    /// in its parent's frame.
    pub(crate) fn align_node_to(&mut self, target_id: u32, position: Vec2) {
        let Some(component) = self.component(target_id) else {
            return;
        };
        let parent_id = component.parent_id.unwrap_or(0);
        let (parent_world, _) = self.parent_context(parent_id);
        let local = parent_world.inverse().transform_point2(position);
        self.set_property(target_id, properties::NODE_X, PropertyValue::Float(local.x));
        self.set_property(target_id, properties::NODE_Y, PropertyValue::Float(local.y));
    }

    /// Plays the audio source of an audio event, if `id` is one.
    pub(crate) fn play_audio_event(&mut self, id: u32) {
        let runtime_id = self.runtime_id;
        let Some(engine) = self.audio.clone() else {
            return;
        };
        if let Some(CoreObject::AudioEvent(event)) = self.object(id) {
            if let Some(source) = &event.source {
                engine.play(Arc::clone(source), runtime_id);
            }
        }
    }

    // ------------------------------------------------------------------
    // Nested input access
    // ------------------------------------------------------------------

    /// Locates `(nest id, machine runtime def id, input index)` for a
    /// nested input exposed by the directly nested artboard named `nest`,
    /// resolving the final component by the inner machine's input name.
    fn locate_nested_input(&self, name: &str, nest: &str) -> Option<(u32, u32, usize)> {
        let nest_id = self.nested_artboards.iter().copied().find(|&id| {
            self.component(id)
                .is_some_and(|component| component.name == nest)
        })?;
        let Some(CoreObject::NestedArtboard(nested)) = self.object(nest_id) else {
            return None;
        };
        for runtime in &nested.runtime {
            if let NestedAnimationRuntime::Machine { def_id, instance } = runtime {
                let machine_children = self.component(*def_id)?.children.clone();
                for child in machine_children {
                    let input_id = match self.object(child) {
                        Some(CoreObject::NestedBool(input)) => input.input_id,
                        Some(CoreObject::NestedNumber(input)) => input.input_id,
                        Some(CoreObject::NestedTrigger(input)) => input.input_id,
                        _ => continue,
                    };
                    let matches = instance
                        .machine()
                        .inputs
                        .get(input_id as usize)
                        .and_then(Option::as_ref)
                        .is_some_and(|input| input.name == name);
                    if matches {
                        return Some((nest_id, *def_id, input_id as usize));
                    }
                }
            }
        }
        None
    }

    fn with_nested_machine<R>(
        &mut self,
        path: &str,
        f: &mut dyn FnMut(&mut Artboard, u32, u32, usize) -> Option<R>,
        name: &str,
    ) -> Option<R> {
        let (head, rest) = match path.split_once('/') {
            Some((head, rest)) => (head, Some(rest.to_string())),
            None => (path, None),
        };
        let nest_id = self.nested_artboards.iter().copied().find(|&id| {
            self.component(id)
                .is_some_and(|component| component.name == head)
        })?;
        if let Some(rest) = rest {
            let Some(CoreObject::NestedArtboard(nested)) = self.object_mut(nest_id) else {
                return None;
            };
            let inner = nested.inner.as_deref_mut()?;
            return inner.with_nested_machine(&rest, f, name);
        }
        let (_, def_id, input_index) = self.locate_nested_input(name, head)?;
        f(self, nest_id, def_id, input_index)
    }

    /// Reads a nested boolean input through a slash-separated artboard
    /// path.
    #[must_use]
    pub fn nested_bool(&self, name: &str, path: &str) -> Option<bool> {
        let instance = self.nested_machine_for(name, path)?;
        match instance.0.input_value(instance.1) {
            Some(crate::machine::InputValue::Bool(value)) => Some(*value),
            _ => None,
        }
    }

    /// Reads a nested number input through a slash-separated artboard path.
    #[must_use]
    pub fn nested_number(&self, name: &str, path: &str) -> Option<f32> {
        let instance = self.nested_machine_for(name, path)?;
        match instance.0.input_value(instance.1) {
            Some(crate::machine::InputValue::Number(value)) => Some(*value),
            _ => None,
        }
    }

    fn nested_machine_for(&self, name: &str, path: &str) -> Option<(&StateMachineInstance, usize)> {
        let (head, rest) = match path.split_once('/') {
            Some((head, rest)) => (head, Some(rest)),
            None => (path, None),
        };
        let nest_id = self.nested_artboards.iter().copied().find(|&id| {
            self.component(id)
                .is_some_and(|component| component.name == head)
        })?;
        let Some(CoreObject::NestedArtboard(nested)) = self.object(nest_id) else {
            return None;
        };
        if let Some(rest) = rest {
            return nested.inner()?.nested_machine_for(name, rest);
        }
        let (_, def_id, input_index) = self.locate_nested_input(name, head)?;
        for runtime in &nested.runtime {
            if let NestedAnimationRuntime::Machine { def_id: d, instance } = runtime {
                if *d == def_id {
                    return Some((instance, input_index));
                }
            }
        }
        None
    }

    /// Writes a nested boolean input; the change is coherent immediately
    /// through every access style.
    pub fn set_nested_bool(&mut self, name: &str, path: &str, value: bool) -> bool {
        let name = name.to_string();
        self.with_nested_machine(
            path,
            &mut |artboard, nest_id, def_id, input_index| {
                // Mirror into the nested-input definition component.
                let machine_children = artboard
                    .component(def_id)
                    .map(|component| component.children.to_vec())
                    .unwrap_or_default();
                for child in machine_children {
                    if let Some(CoreObject::NestedBool(input)) = artboard.object_mut(child) {
                        if input.input_id as usize == input_index {
                            input.nested_value = value;
                            input.value_dirty = false;
                        }
                    }
                }
                let Some(CoreObject::NestedArtboard(nested)) = artboard.object_mut(nest_id) else {
                    return None;
                };
                for runtime in &mut nested.runtime {
                    if let NestedAnimationRuntime::Machine { def_id: d, instance } = runtime {
                        if *d == def_id {
                            return Some(instance.set_bool_at(input_index, value));
                        }
                    }
                }
                None
            },
            &name,
        )
        .unwrap_or(false)
    }

    /// Writes a nested number input.
    pub fn set_nested_number(&mut self, name: &str, path: &str, value: f32) -> bool {
        let name = name.to_string();
        self.with_nested_machine(
            path,
            &mut |artboard, nest_id, def_id, input_index| {
                let machine_children = artboard
                    .component(def_id)
                    .map(|component| component.children.to_vec())
                    .unwrap_or_default();
                for child in machine_children {
                    if let Some(CoreObject::NestedNumber(input)) = artboard.object_mut(child) {
                        if input.input_id as usize == input_index {
                            input.nested_value = value;
                            input.value_dirty = false;
                        }
                    }
                }
                let Some(CoreObject::NestedArtboard(nested)) = artboard.object_mut(nest_id) else {
                    return None;
                };
                for runtime in &mut nested.runtime {
                    if let NestedAnimationRuntime::Machine { def_id: d, instance } = runtime {
                        if *d == def_id {
                            return Some(instance.set_number_at(input_index, value));
                        }
                    }
                }
                None
            },
            &name,
        )
        .unwrap_or(false)
    }

    /// Fires a nested trigger input.
    pub fn fire_nested_trigger(&mut self, name: &str, path: &str) -> bool {
        let name = name.to_string();
        self.with_nested_machine(
            path,
            &mut |artboard, nest_id, def_id, input_index| {
                let Some(CoreObject::NestedArtboard(nested)) = artboard.object_mut(nest_id) else {
                    return None;
                };
                for runtime in &mut nested.runtime {
                    if let NestedAnimationRuntime::Machine { def_id: d, instance } = runtime {
                        if *d == def_id {
                            return Some(instance.fire_trigger_at(input_index));
                        }
                    }
                }
                None
            },
            &name,
        )
        .unwrap_or(false)
    }

    // ------------------------------------------------------------------
    // Draw
    // ------------------------------------------------------------------

    /// Walks the ordered drawable list and issues commands to the external
    /// renderer.
    pub fn draw(&self, renderer: &mut dyn Renderer) {
        let Some(factory) = self.factory.clone() else {
            return;
        };
        let Some(root) = self.root() else {
            return;
        };
        renderer.save();
        if root.clip {
            let clip = factory.make_rect_path(self.bounds());
            renderer.clip_path(clip.as_ref());
        }
        for &id in &self.drawables {
            match self.object(id) {
                Some(CoreObject::Shape(shape)) => {
                    if shape.drawable.is_hidden() || shape.node.render_opacity <= 0.0 {
                        continue;
                    }
                    renderer.save();
                    renderer.transform(&shape.node.world_transform);
                    let mut paint = factory.make_paint();
                    paint.style(PaintStyle::Fill);
                    paint.color(modulate_alpha(shape.fill_color, shape.node.render_opacity));
                    paint.blend_mode(shape.drawable.blend_mode);
                    let path = factory.make_rect_path(shape.local_bounds());
                    renderer.draw_path(path.as_ref(), paint.as_ref());
                    renderer.restore();
                }
                Some(CoreObject::NestedArtboard(nested)) => {
                    if nested.drawable.is_hidden() {
                        continue;
                    }
                    if let Some(inner) = nested.inner() {
                        renderer.save();
                        renderer.transform(&nested.node.world_transform);
                        inner.draw(renderer);
                        renderer.restore();
                    }
                }
                _ => {}
            }
        }
        renderer.restore();
    }
}

/// Recomputes a node's world transform and render opacity from its parent
/// context.
fn update_node(
    node: &mut crate::node::Node,
    dirt: Dirt,
    parent_world: &Affine2,
    parent_opacity: f32,
) {
    if dirt.intersects(Dirt::TRANSFORM | Dirt::WORLD_TRANSFORM) {
        node.world_transform = *parent_world * node.local_transform();
    }
    if dirt.contains(Dirt::RENDER_OPACITY) {
        node.render_opacity = node.opacity * parent_opacity;
    }
}

fn modulate_alpha(color: u32, opacity: f32) -> u32 {
    let alpha = ((color >> 24) & 0xff) as f32 * opacity.clamp(0.0, 1.0);
    (color & 0x00ff_ffff) | ((alpha.round() as u32) << 24)
}
