//! In-memory document model the dashboard controller renders into.
//!
//! Elements live in an arena owned by [`Document`] and are addressed by
//! [`NodeId`]. Content is always inserted as text; there is no raw-markup
//! path, so server- or user-supplied strings can never become structure.
//!
//! The model is deliberately small: ids, class lists, data attributes, a
//! form `value`, text content, children and a scroll offset. That is all the
//! controller reads or writes.

mod element;
pub mod page;

use std::fmt;

pub use element::Element;

/// Handle to an element inside a [`Document`].
///
/// Slots freed by removal are reused; the generation makes a handle to a
/// removed element stay stale after its slot is taken by a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.index)
    }
}

/// Arena-backed element tree with a single `body` root.
#[derive(Debug, Clone)]
pub struct Document {
    slots: Vec<Slot>,
    free: Vec<usize>,
    root: NodeId,
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

#[derive(Debug, Clone)]
struct Node {
    element: Element,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    scroll_top: usize,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document containing only the `body` root.
    pub fn new() -> Self {
        let body = Node {
            element: Element::new("body"),
            parent: None,
            children: Vec::new(),
            scroll_top: 0,
        };
        Self {
            slots: vec![Slot {
                generation: 0,
                node: Some(body),
            }],
            free: Vec::new(),
            root: NodeId {
                index: 0,
                generation: 0,
            },
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Add a detached element to the arena, reusing a freed slot if any.
    pub fn create(&mut self, element: Element) -> NodeId {
        let node = Node {
            element,
            parent: None,
            children: Vec::new(),
            scroll_top: 0,
        };
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index];
            slot.node = Some(node);
            return NodeId {
                index,
                generation: slot.generation,
            };
        }
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        NodeId {
            index: self.slots.len() - 1,
            generation: 0,
        }
    }

    /// Number of arena slots, live or free.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Create an element and append it as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, element: Element) -> NodeId {
        let id = self.create(element);
        self.append_child(parent, id);
        id
    }

    /// Attach an existing (detached) node as the last child of `parent`.
    ///
    /// Does nothing if either handle is stale or the child already has a parent.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if !self.contains(parent) || parent == child {
            return;
        }
        let Some(node) = self.node_mut(child) else {
            return;
        };
        if node.parent.is_some() {
            return;
        }
        node.parent = Some(parent);
        if let Some(p) = self.node_mut(parent) {
            p.children.push(child);
        }
    }

    /// Remove a node and its whole subtree from the document.
    ///
    /// Returns `false` when the handle was already removed.
    pub fn remove(&mut self, id: NodeId) -> bool {
        if id == self.root || !self.contains(id) {
            return false;
        }
        if let Some(parent) = self.node(id).and_then(|n| n.parent)
            && let Some(p) = self.node_mut(parent)
        {
            p.children.retain(|c| *c != id);
        }
        self.drop_subtree(id);
        true
    }

    /// Remove every child of `id`, leaving the element itself in place.
    pub fn clear_children(&mut self, id: NodeId) {
        let children = self.children(id).to_vec();
        for child in children {
            self.drop_subtree(child);
        }
        if let Some(node) = self.node_mut(id) {
            node.children.clear();
            node.scroll_top = 0;
        }
    }

    fn drop_subtree(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(slot) = self.slots.get_mut(current.index)
                && slot.generation == current.generation
                && let Some(node) = slot.node.take()
            {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(current.index);
                stack.extend(node.children);
            }
        }
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        self.node(id).map(|n| &n.element)
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        self.node_mut(id).map(|n| &mut n.element)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    /// Find the first attached element with the given id, in document order.
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .find(|n| self.element(*n).and_then(|e| e.id()) == Some(id))
    }

    /// All attached elements carrying `class`, in document order.
    pub fn query_class(&self, class: &str) -> Vec<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .filter(|n| self.element(*n).is_some_and(|e| e.has_class(class)))
            .collect()
    }

    /// Pre-order list of `id`'s descendants (excluding `id` itself).
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        out
    }

    /// Concatenated text of an element and its descendants.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        if let Some(e) = self.element(id) {
            out.push_str(e.text());
        }
        for child in self.descendants(id) {
            if let Some(e) = self.element(child) {
                if !out.is_empty() && !e.text().is_empty() {
                    out.push(' ');
                }
                out.push_str(e.text());
            }
        }
        out
    }

    /// Current form value of an input-like element (empty if unknown).
    pub fn value(&self, id: NodeId) -> &str {
        self.element(id).map(|e| e.value()).unwrap_or("")
    }

    pub fn set_value(&mut self, id: NodeId, value: impl Into<String>) {
        if let Some(e) = self.element_mut(id) {
            e.set_value(value);
        }
    }

    /// Replace all children of `id` with a single new element.
    pub fn replace_children(&mut self, id: NodeId, element: Element) -> NodeId {
        self.clear_children(id);
        self.append(id, element)
    }

    pub fn scroll_top(&self, id: NodeId) -> usize {
        self.node(id).map(|n| n.scroll_top).unwrap_or(0)
    }

    /// Scrollable extent of a container, measured in child elements.
    pub fn scroll_height(&self, id: NodeId) -> usize {
        self.children(id).len()
    }

    pub fn scroll_to_bottom(&mut self, id: NodeId) {
        let height = self.scroll_height(id);
        if let Some(node) = self.node_mut(id) {
            node.scroll_top = height;
        }
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }
}
