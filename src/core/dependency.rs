//! Topological ordering of the component dependency graph.
//!
//! Each component records the set of components depending on it
//! (its dependents). The sorter runs a depth-first visit pushing each
//! component to the front of the order after all its dependents, which
//! yields a topological order: for any edge `a -> b`, `a` sorts before `b`.

use rustc_hash::FxHashSet;

use crate::artboard::Artboard;

pub(crate) struct DependencySorter {
    permanent: FxHashSet<u32>,
    temporary: FxHashSet<u32>,
}

impl DependencySorter {
    pub(crate) fn new() -> Self {
        Self {
            permanent: FxHashSet::default(),
            temporary: FxHashSet::default(),
        }
    }

    /// Sorts the graph reachable from `root`. Returns `false` when a cycle
    /// is detected; `order` is left partially filled in that case and must
    /// be discarded by the caller.
    pub(crate) fn sort(&mut self, artboard: &Artboard, root: u32, order: &mut Vec<u32>) -> bool {
        order.clear();
        self.visit(artboard, root, order)
    }

    fn visit(&mut self, artboard: &Artboard, id: u32, order: &mut Vec<u32>) -> bool {
        if self.permanent.contains(&id) {
            return true;
        }
        if self.temporary.contains(&id) {
            log::warn!("dependency cycle through component {id}");
            return false;
        }
        self.temporary.insert(id);

        let dependents = match artboard.component(id) {
            Some(component) => component.dependents.clone(),
            None => return true,
        };
        for dependent in dependents {
            if !self.visit(artboard, dependent, order) {
                return false;
            }
        }

        self.permanent.insert(id);
        order.insert(0, id);
        true
    }
}
