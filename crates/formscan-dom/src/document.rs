//! Document - High-level document API
//!
//! All structural changes that observers should see go through the
//! `Document` methods rather than `DomTree` directly.

use crate::{
    DomResult, DomTree, MutationObserver, MutationObserverInit, MutationRecord, NodeId,
    ObserverId,
};

/// HTML Document
#[derive(Debug)]
pub struct Document {
    /// The DOM tree
    tree: DomTree,
    /// Document URL
    url: String,
    /// Cached reference to <html> element
    html_element: NodeId,
    /// Cached reference to <head> element
    head_element: NodeId,
    /// Cached reference to <body> element
    body_element: NodeId,
    observers: Vec<MutationObserver>,
    next_observer_id: u32,
}

impl Document {
    /// Create a new document with html/head/body
    pub fn new(url: &str) -> Self {
        let mut tree = DomTree::new();
        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");

        // Fresh detached elements under the document node never violate
        // hierarchy rules
        let root = tree.root();
        for (parent, child) in [(root, html), (html, head), (html, body)] {
            tree.append_child(parent, child)
                .expect("fresh element under a container node");
        }

        Self {
            tree,
            url: url.to_string(),
            html_element: html,
            head_element: head,
            body_element: body,
            observers: Vec::new(),
            next_observer_id: 1,
        }
    }

    /// Create an empty document (no structure)
    pub fn empty(url: &str) -> Self {
        Self {
            tree: DomTree::new(),
            url: url.to_string(),
            html_element: NodeId::NONE,
            head_element: NodeId::NONE,
            body_element: NodeId::NONE,
            observers: Vec::new(),
            next_observer_id: 1,
        }
    }

    /// Locate html/head/body after the tree has been built externally
    pub fn finalize(&mut self) {
        let tree = &self.tree;
        let find = |parent: NodeId, tag: &str| {
            tree.children(parent)
                .find(|&id| tree.tag_name(id) == Some(tag))
                .unwrap_or(NodeId::NONE)
        };
        let html = find(tree.root(), "html");
        let (head, body) = if html.is_valid() {
            (find(html, "head"), find(html, "body"))
        } else {
            (NodeId::NONE, NodeId::NONE)
        };
        self.html_element = html;
        self.head_element = head;
        self.body_element = body;
    }

    /// Get document URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get <html> element
    pub fn document_element(&self) -> NodeId {
        self.html_element
    }

    /// Get <head> element
    pub fn head(&self) -> NodeId {
        self.head_element
    }

    /// Get <body> element
    pub fn body(&self) -> NodeId {
        self.body_element
    }

    /// Get element by ID (first match in document order)
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.tree
            .descendants(self.tree.root())
            .find(|&node| self.tree.get_attribute(node, "id") == Some(id))
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the DOM tree mutably; changes made here are not observed
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.tree.create_element(tag)
    }

    /// Create a detached element with attributes
    pub fn create_element_with_attrs(&mut self, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        self.tree.create_element_with_attrs(tag, attrs)
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.tree.create_text(content)
    }

    /// appendChild
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.insert_before(parent, child, None)
    }

    /// insertBefore; moving an attached node reports a removal first
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> DomResult<NodeId> {
        let old_parent = self.tree.parent(child);
        self.tree.insert_before(parent, child, reference)?;
        if let Some(old_parent) = old_parent {
            self.notify(MutationRecord::child_list(old_parent, Vec::new(), vec![child]));
        }
        self.notify(MutationRecord::child_list(parent, vec![child], Vec::new()));
        Ok(child)
    }

    /// removeChild
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.tree.remove_child(parent, child)?;
        self.notify(MutationRecord::child_list(parent, Vec::new(), vec![child]));
        Ok(child)
    }

    /// `Element.remove()`; a no-op for detached nodes
    pub fn remove(&mut self, node: NodeId) -> DomResult<()> {
        if let Some(parent) = self.tree.parent(node) {
            self.remove_child(parent, node)?;
        }
        Ok(())
    }

    /// Register a new observer on `target`
    pub fn observe(&mut self, target: NodeId, options: MutationObserverInit) -> ObserverId {
        let id = ObserverId(self.next_observer_id);
        self.next_observer_id += 1;
        let mut observer = MutationObserver::new(id);
        observer.observe(target, options);
        self.observers.push(observer);
        tracing::trace!("Observer {:?} watching {}", id, target);
        id
    }

    /// Unsubscribe an observer, discarding pending records
    pub fn disconnect(&mut self, id: ObserverId) -> bool {
        match self.observers.iter().position(|o| o.id() == id) {
            Some(pos) => {
                self.observers.remove(pos).disconnect();
                true
            }
            None => false,
        }
    }

    /// Drain the batch queued for an observer
    pub fn take_records(&mut self, id: ObserverId) -> Vec<MutationRecord> {
        self.observers
            .iter_mut()
            .find(|o| o.id() == id)
            .map(MutationObserver::take_records)
            .unwrap_or_default()
    }

    /// Check if an observer has records waiting
    pub fn has_pending(&self, id: ObserverId) -> bool {
        self.observers.iter().any(|o| o.id() == id && o.has_pending())
    }

    fn notify(&mut self, record: MutationRecord) {
        for observer in &mut self.observers {
            observer.record(&self.tree, &record);
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}
