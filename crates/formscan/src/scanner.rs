//! Live scanner
//!
//! Keeps the list of relevant forms in a document current. After a full
//! scan at start, only the smallest subtree holding everything a mutation
//! batch touched is rescanned. Forms that come out unchanged keep their
//! `Rc`, so hosts can compare by pointer.
//!
//! Batches are processed whole, one at a time, through `&mut self`, so the
//! cached forms can never be observed half-updated.

use std::collections::HashSet;
use std::rc::Rc;

use formscan_dom::{Document, DomTree, MutationObserverInit, MutationRecord, NodeId, ObserverId};

use crate::config::ScannerConfig;
use crate::forms;
use crate::inputs;
use crate::types::{Form, FormType, InputType};

/// Running form scanner over one document.
///
/// `on_change` receives the filtered form list after the initial scan and
/// after every batch that changed it. A batch that leaves the list equal
/// to the last report stays silent. Dropping the scanner does not
/// unsubscribe; call [`Scanner::stop`].
pub struct Scanner<F>
where
    F: FnMut(&[Rc<Form>]),
{
    config: ScannerConfig,
    /// Body, or the document node; rescans never reach above it
    root: NodeId,
    forms: Vec<Rc<Form>>,
    observer: Option<ObserverId>,
    on_change: F,
}

impl<F> Scanner<F>
where
    F: FnMut(&[Rc<Form>]),
{
    /// Scan the whole document body, report, and subscribe to its mutations.
    pub fn start(doc: &mut Document, config: ScannerConfig, on_change: F) -> Self {
        let root = scan_root(doc);
        let found = forms::scan(doc.tree(), root);
        let observer = doc.observe(root, MutationObserverInit::subtree_child_list());
        tracing::debug!("Scanner started on {} ({})", root, doc.url());

        let mut scanner = Self {
            config,
            root,
            forms: Vec::new(),
            observer: Some(observer),
            on_change,
        };
        scanner.forms = scanner.relevant(found.into_iter().map(Rc::new).collect());
        (scanner.on_change)(&scanner.forms);
        scanner
    }

    /// Last reported forms
    pub fn forms(&self) -> &[Rc<Form>] {
        &self.forms
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// Whether the scanner is still subscribed
    pub fn is_running(&self) -> bool {
        self.observer.is_some()
    }

    /// Drain and process the pending mutation batch. Returns whether the
    /// callback fired.
    pub fn poll(&mut self, doc: &mut Document) -> bool {
        let Some(observer) = self.observer else {
            return false;
        };
        let batch = doc.take_records(observer);
        if batch.is_empty() {
            return false;
        }
        self.handle_batch(doc.tree(), &batch)
    }

    /// Unsubscribe from the document. Pending records are discarded.
    pub fn stop(&mut self, doc: &mut Document) {
        if let Some(observer) = self.observer.take() {
            doc.disconnect(observer);
            tracing::debug!("Scanner stopped");
        }
    }

    /// Apply one mutation batch. Returns whether the callback fired.
    pub fn handle_batch(&mut self, tree: &DomTree, batch: &[MutationRecord]) -> bool {
        let mut queue: Vec<NodeId> = Vec::new();
        // Tracked roots that must not be carried over as-is
        let mut stale: HashSet<NodeId> = HashSet::new();

        for record in batch {
            for &node in &record.added_nodes {
                self.queue_added(tree, node, &mut queue, &mut stale);
            }
            for &node in &record.removed_nodes {
                self.queue_removed(tree, record.target, node, &mut queue, &mut stale);
            }
        }

        // A queued root inside another queued root is covered by that rescan,
        // and nodes removed again within the batch have nothing left to scan
        let queue: Vec<NodeId> = queue
            .iter()
            .copied()
            .filter(|&root| {
                tree.is_connected(root)
                    && !queue.iter().any(|&other| other != root && tree.contains(other, root))
            })
            .collect();

        let mut next: Vec<Rc<Form>> = self
            .forms
            .iter()
            .filter(|form| !stale.contains(&form.root) && tree.is_connected(form.root))
            .cloned()
            .collect();

        if queue.is_empty() && next.len() == self.forms.len() {
            return false;
        }

        if let Some(scope) = self.rescan_scope(tree, &queue) {
            tracing::debug!(
                "Mutations observed, rescanning {} for {} queued roots",
                scope,
                queue.len()
            );
            // Everything below the scope is rediscovered by the rescan
            next.retain(|form| !tree.contains(scope, form.root));
            for form in forms::scan(tree, scope) {
                next.retain(|kept| {
                    !tree.contains(kept.root, form.root) && !tree.contains(form.root, kept.root)
                });
                let form = self
                    .forms
                    .iter()
                    .find(|old| old.as_ref() == &form)
                    .cloned()
                    .unwrap_or_else(|| Rc::new(form));
                next.push(form);
            }
        }

        self.update(next)
    }

    /// Smallest element strictly containing every queued root, capped at
    /// the scan root. Scanning a root itself would miss the root as an
    /// input and stop grouping right above it.
    fn rescan_scope(&self, tree: &DomTree, queue: &[NodeId]) -> Option<NodeId> {
        let &first = queue.first()?;
        let mut scope = tree.parent(first).unwrap_or(self.root);
        if first == self.root || !tree.contains(self.root, scope) {
            return Some(self.root);
        }
        for &root in queue {
            while scope != self.root && (scope == root || !tree.contains(scope, root)) {
                scope = tree.parent(scope).unwrap_or(self.root);
            }
        }
        Some(scope)
    }

    fn queue_added(
        &self,
        tree: &DomTree,
        node: NodeId,
        queue: &mut Vec<NodeId>,
        stale: &mut HashSet<NodeId>,
    ) {
        if !tree.is_element(node) || !inputs::has_candidates(tree, node) {
            return;
        }

        // Earlier queued roots below this node are covered by scanning it
        queue.retain(|&queued| queued == node || !tree.contains(node, queued));
        let mut covered = queue.iter().any(|&queued| tree.contains(queued, node));

        for form in &self.forms {
            if tree.contains(form.root, node) {
                push_unique(queue, form.root);
                stale.insert(form.root);
                covered = true;
            } else if tree.contains(node, form.root) {
                // Rediscovered by the scan of `node`
                stale.insert(form.root);
            }
        }

        if !covered {
            queue.push(node);
        }
    }

    fn queue_removed(
        &self,
        tree: &DomTree,
        former_parent: NodeId,
        node: NodeId,
        queue: &mut Vec<NodeId>,
        stale: &mut HashSet<NodeId>,
    ) {
        if !tree.is_element(node) {
            return;
        }

        for form in &self.forms {
            if tree.contains(node, form.root) {
                // The form went away with the removed subtree
                stale.insert(form.root);
            } else if tree.contains(form.root, former_parent) {
                push_unique(queue, form.root);
                stale.insert(form.root);
            }
        }
    }

    /// Log a scan result and keep the form types the host cares about
    fn relevant(&self, found: Vec<Rc<Form>>) -> Vec<Rc<Form>> {
        log_forms(&found);
        found
            .into_iter()
            .filter(|form| self.config.is_relevant(form.form_type))
            .collect()
    }

    fn update(&mut self, found: Vec<Rc<Form>>) -> bool {
        let forms = self.relevant(found);
        if forms == self.forms {
            tracing::trace!("Rescan left {} forms unchanged", forms.len());
            return false;
        }
        self.forms = forms;
        (self.on_change)(&self.forms);
        true
    }
}

fn push_unique(queue: &mut Vec<NodeId>, node: NodeId) {
    if !queue.contains(&node) {
        queue.push(node);
    }
}

/// The body, or the document node for documents without one
fn scan_root(doc: &Document) -> NodeId {
    let body = doc.body();
    if body.is_valid() { body } else { doc.tree().root() }
}

fn log_forms(forms: &[Rc<Form>]) {
    for form in forms {
        match form.form_type {
            FormType::Unknown | FormType::Hidden => {
                tracing::debug!("{} form {}", form.form_type, form.root);
            }
            _ => {
                tracing::debug!("{} form {} with {} inputs", form.form_type, form.root, form.inputs.len());
                for input in &form.inputs {
                    if input.input_type != InputType::Hidden {
                        tracing::trace!("  {} {}", input.input_type, input.element);
                    }
                }
            }
        }
    }
}
