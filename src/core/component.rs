//! Component base data shared by every object participating in the
//! dependency graph.
//!
//! Mirrors the hot data split of the scene node: only what the per-frame
//! loops touch lives here (hierarchy, dirt, graph order); type-specific
//! state lives in the owning object variant.

use bitflags::bitflags;
use smallvec::SmallVec;

use crate::core::registry::{PropertyValue, properties};

bitflags! {
    /// Per-component bitmask of pending recomputations.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
    pub struct Dirt: u16 {
        /// Some component in the artboard's subtree needs an update pass.
        const COMPONENTS = 1 << 0;
        /// Local transform needs rebuilding from x/y/rotation/scale.
        const TRANSFORM = 1 << 1;
        /// World transform needs recomputing from the parent chain.
        const WORLD_TRANSFORM = 1 << 2;
        /// Geometry-derived paths (artboard clip/background) need rebuilding.
        const PATH = 1 << 3;
        /// Render opacity needs re-propagating down the subtree.
        const RENDER_OPACITY = 1 << 4;
        /// The ordered draw list needs rebuilding.
        const DRAW_ORDER = 1 << 5;
        /// Component is collapsed; updates are skipped entirely.
        const COLLAPSED = 1 << 6;

        /// Everything a freshly instanced component must recompute.
        const FILTHY = Self::TRANSFORM.bits()
            | Self::WORLD_TRANSFORM.bits()
            | Self::PATH.bits()
            | Self::RENDER_OPACITY.bits()
            | Self::DRAW_ORDER.bits();
    }
}

/// Outcome of applying a property value to an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOutcome {
    /// The object does not own this property key.
    Unknown,
    /// The value equalled the stored one; nothing changed.
    Unchanged,
    /// The value was stored; `dirt` must be or-ed into the owning
    /// component, recursing into dependents when `recurse` is set.
    Changed { dirt: Dirt, recurse: bool },
}

impl SetOutcome {
    pub(crate) fn changed(dirt: Dirt, recurse: bool) -> Self {
        SetOutcome::Changed { dirt, recurse }
    }
}

/// Base data embedded in every graph-participating object.
#[derive(Debug, Clone, Default)]
pub struct Component {
    /// Editor-assigned name, used for lookups by the host.
    pub name: String,
    /// Local id of the parent object; absent only for the artboard itself.
    pub parent_id: Option<u32>,

    // Hierarchy and graph bookkeeping, rebuilt during finalization.
    pub(crate) children: SmallVec<[u32; 4]>,
    pub(crate) dependents: SmallVec<[u32; 4]>,
    pub(crate) graph_order: usize,
    pub(crate) dirt: Dirt,
}

impl Component {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn is_collapsed(&self) -> bool {
        self.dirt.contains(Dirt::COLLAPSED)
    }

    /// Handles the property keys common to all components.
    pub(crate) fn set(&mut self, key: u16, value: &PropertyValue) -> SetOutcome {
        match key {
            properties::NAME => {
                if let PropertyValue::Str(name) = value {
                    if self.name == *name {
                        return SetOutcome::Unchanged;
                    }
                    self.name = name.clone();
                    return SetOutcome::changed(Dirt::empty(), false);
                }
                SetOutcome::Unknown
            }
            properties::PARENT_ID => {
                if let PropertyValue::Uint(id) = value {
                    self.parent_id = Some(*id as u32);
                    return SetOutcome::changed(Dirt::empty(), false);
                }
                SetOutcome::Unknown
            }
            _ => SetOutcome::Unknown,
        }
    }

    pub(crate) fn get(&self, key: u16) -> Option<PropertyValue> {
        match key {
            properties::NAME => Some(PropertyValue::Str(self.name.clone())),
            properties::PARENT_ID => self.parent_id.map(|id| PropertyValue::Uint(u64::from(id))),
            _ => None,
        }
    }
}
