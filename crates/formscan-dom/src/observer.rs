//! Mutation Observers
//!
//! Observers collect child-list mutations as records. Records are
//! delivered in batches: whatever accumulated since the previous
//! `take_records` call.

use crate::{DomTree, NodeId};

/// Handle returned by `Document::observe`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(pub(crate) u32);

/// Mutation observer options
#[derive(Debug, Clone, Copy, Default)]
pub struct MutationObserverInit {
    pub child_list: bool,
    pub subtree: bool,
}

impl MutationObserverInit {
    /// `childList` + `subtree`, the usual "watch everything below" setup
    pub fn subtree_child_list() -> Self {
        Self {
            child_list: true,
            subtree: true,
        }
    }
}

/// Child-list mutation record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRecord {
    /// Parent whose children changed
    pub target: NodeId,
    pub added_nodes: Vec<NodeId>,
    pub removed_nodes: Vec<NodeId>,
}

impl MutationRecord {
    pub fn child_list(target: NodeId, added_nodes: Vec<NodeId>, removed_nodes: Vec<NodeId>) -> Self {
        Self {
            target,
            added_nodes,
            removed_nodes,
        }
    }
}

/// Mutation observer
#[derive(Debug)]
pub struct MutationObserver {
    id: ObserverId,
    observations: Vec<(NodeId, MutationObserverInit)>,
    pending_records: Vec<MutationRecord>,
}

impl MutationObserver {
    pub(crate) fn new(id: ObserverId) -> Self {
        Self {
            id,
            observations: Vec::new(),
            pending_records: Vec::new(),
        }
    }

    pub fn id(&self) -> ObserverId {
        self.id
    }

    /// Observe a target; observing the same target again replaces its options
    pub fn observe(&mut self, target: NodeId, options: MutationObserverInit) {
        match self.observations.iter_mut().find(|(node, _)| *node == target) {
            Some(entry) => entry.1 = options,
            None => self.observations.push((target, options)),
        }
    }

    /// Stop observing and drop pending records
    pub fn disconnect(&mut self) {
        self.observations.clear();
        self.pending_records.clear();
    }

    /// Drain the pending batch
    pub fn take_records(&mut self) -> Vec<MutationRecord> {
        std::mem::take(&mut self.pending_records)
    }

    /// Check if observing node
    pub fn is_observing(&self, node: NodeId) -> bool {
        self.observations.iter().any(|(target, _)| *target == node)
    }

    /// Has pending records
    pub fn has_pending(&self) -> bool {
        !self.pending_records.is_empty()
    }

    /// Queue the record if any observation covers it
    pub(crate) fn record(&mut self, tree: &DomTree, mutation: &MutationRecord) {
        let interested = self.observations.iter().any(|(target, options)| {
            options.child_list
                && (*target == mutation.target
                    || (options.subtree && tree.contains(*target, mutation.target)))
        });
        if interested {
            self.pending_records.push(mutation.clone());
        }
    }
}
