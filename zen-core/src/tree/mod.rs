//! Abbreviation tree
//!
//! The tree is an arena: nodes live in a `Vec` and refer to each other through
//! [`NodeId`] handles. A node owns the ids in its `children` list; `parent` is a
//! back-reference only. Splicing moves ids between child lists, cloning copies a
//! whole subtree into fresh slots. Detached nodes stay in the arena until the
//! tree is dropped at the end of the expansion.
//!
//! Reference resources are parsed into the same arena as a separate detached
//! root and their children are then spliced into the main tree.

mod attributes;
mod query;

pub use attributes::{optimize_attributes, Attribute};

use crate::element::Resource;
use crate::error::ExpandError;
use std::collections::HashMap;

/// Largest count accepted by a `*N` multiplier
pub const MAX_REPEAT_COUNT: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Pasted text waiting to be distributed over a node
#[derive(Debug, Clone, PartialEq)]
pub enum Paste {
    /// One entry per clone of an implicitly repeated node, picked by `counter`
    Lines(Vec<String>),
    Text(String),
}

impl Paste {
    pub fn for_counter(&self, counter: usize) -> Option<&str> {
        match self {
            Paste::Lines(lines) => lines.get(counter.saturating_sub(1)).map(String::as_str),
            Paste::Text(text) => Some(text.as_str()),
        }
    }
}

/// Side data attached to a node by the transform passes
#[derive(Debug, Clone, Default)]
pub struct NodeData {
    /// Vocabulary entry matched for this node
    pub resource: Option<Resource>,
    pub paste: Option<Paste>,
    /// Pasted text replaces the content instead of being inserted into it
    pub paste_overwrites: bool,
    /// Resolve the tag name from the parent even when one is set
    pub force_name_resolving: bool,
    pub name_resolved: bool,
    pub custom: HashMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct AbbreviationNode {
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Term text owned by this node, empty for groups
    pub abbreviation: String,
    pub name: String,
    pub attributes: Vec<Attribute>,
    /// Text from `{...}`
    pub text: String,
    pub repeat_count: usize,
    pub has_implicit_repeat: bool,
    pub counter: usize,
    pub max_count: usize,
    pub data: NodeData,
    pub start: String,
    pub content: String,
    pub end: String,
    pub padding: String,
}

impl Default for AbbreviationNode {
    fn default() -> Self {
        AbbreviationNode {
            parent: None,
            children: Vec::new(),
            abbreviation: String::new(),
            name: String::new(),
            attributes: Vec::new(),
            text: String::new(),
            repeat_count: 1,
            has_implicit_repeat: false,
            counter: 1,
            max_count: 1,
            data: NodeData::default(),
            start: String::new(),
            content: String::new(),
            end: String::new(),
            padding: String::new(),
        }
    }
}

impl AbbreviationNode {
    /// `*` with digits sets the count, a bare `*` defers it to the pasted content.
    /// `position` is reported when the count exceeds [`MAX_REPEAT_COUNT`].
    pub fn set_repeat(&mut self, count: Option<&str>, position: usize) -> Result<(), ExpandError> {
        match count {
            Some(digits) => {
                let parsed = digits.parse::<usize>().ok().filter(|n| *n <= MAX_REPEAT_COUNT);
                let Some(n) = parsed else {
                    return Err(ExpandError::RepeatLimit {
                        count: digits.to_string(),
                        position,
                    });
                };
                self.repeat_count = n.max(1);
            }
            None => self.has_implicit_repeat = true,
        }
        Ok(())
    }

    pub fn is_repeating(&self) -> bool {
        self.repeat_count > 1 || self.has_implicit_repeat
    }

    pub fn is_group(&self) -> bool {
        self.abbreviation.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.abbreviation.is_empty() && self.children.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct AbbreviationTree {
    nodes: Vec<AbbreviationNode>,
    root: NodeId,
}

impl AbbreviationTree {
    pub fn new() -> Self {
        AbbreviationTree {
            nodes: vec![AbbreviationNode::default()],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &AbbreviationNode {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut AbbreviationNode {
        &mut self.nodes[id.0]
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Allocate a detached node
    pub fn create_node(&mut self) -> NodeId {
        self.nodes.push(AbbreviationNode::default());
        NodeId(self.nodes.len() - 1)
    }

    /// Create an empty node and append it to `parent`
    pub fn add_new_child(&mut self, parent: NodeId) -> NodeId {
        let child = self.create_node();
        self.insert_child(parent, child, None);
        child
    }

    /// Attach `child` to `parent` at `position` (appends when `None`),
    /// detaching it from its previous parent first
    pub fn insert_child(&mut self, parent: NodeId, child: NodeId, position: Option<usize>) {
        self.detach(child);
        let siblings = &mut self.nodes[parent.0].children;
        let at = position.unwrap_or(siblings.len()).min(siblings.len());
        siblings.insert(at, child);
        self.nodes[child.0].parent = Some(parent);
    }

    /// Remove `id` from its parent's child list
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent.take() {
            self.nodes[parent.0].children.retain(|c| *c != id);
        }
    }

    /// Put `replacement` where `id` used to be
    pub fn replace(&mut self, id: NodeId, replacement: &[NodeId]) {
        let Some(parent) = self.nodes[id.0].parent else {
            return;
        };
        let position = self.index(id);
        self.detach(id);
        for (offset, new_id) in replacement.iter().enumerate() {
            self.insert_child(parent, *new_id, Some(position + offset));
        }
    }

    /// Move every child of `from` to the end of `to`
    pub fn move_children(&mut self, from: NodeId, to: NodeId) {
        let children = self.nodes[from.0].children.clone();
        for child in children {
            self.insert_child(to, child, None);
        }
    }

    /// Deep copy of `id` and its descendants, detached
    pub fn clone_subtree(&mut self, id: NodeId) -> NodeId {
        let mut copy = self.nodes[id.0].clone();
        copy.parent = None;
        copy.children = Vec::new();
        self.nodes.push(copy);
        let new_id = NodeId(self.nodes.len() - 1);
        let children = self.nodes[id.0].children.clone();
        for child in children {
            let child_copy = self.clone_subtree(child);
            self.nodes[new_id.0].children.push(child_copy);
            self.nodes[child_copy.0].parent = Some(new_id);
        }
        new_id
    }

    /// Position of `id` among its siblings
    pub fn index(&self, id: NodeId) -> usize {
        self.parent(id)
            .and_then(|p| self.children(p).iter().position(|c| *c == id))
            .unwrap_or(0)
    }

    /// Descendants of `id` in document order matching `predicate`
    pub fn find_all(&self, id: NodeId, predicate: impl Fn(&Self, NodeId) -> bool) -> Vec<NodeId> {
        let mut found = Vec::new();
        self.collect(id, &predicate, &mut found);
        found
    }

    fn collect(
        &self,
        id: NodeId,
        predicate: &impl Fn(&Self, NodeId) -> bool,
        found: &mut Vec<NodeId>,
    ) {
        for child in self.children(id) {
            if predicate(self, *child) {
                found.push(*child);
            }
            self.collect(*child, predicate, found);
        }
    }

    /// Follow the last child down to a leaf. `None` when `id` has no children.
    pub fn deepest_child(&self, id: NodeId) -> Option<NodeId> {
        let mut current = *self.children(id).last()?;
        while let Some(last) = self.children(current).last() {
            current = *last;
        }
        Some(current)
    }

    /// Set `counter` on `id` and all its descendants
    pub fn set_counter(&mut self, id: NodeId, counter: usize) {
        self.nodes[id.0].counter = counter;
        for child in self.nodes[id.0].children.clone() {
            self.set_counter(child, counter);
        }
    }

    /// Set `max_count` on `id` and all its descendants
    pub fn set_max_count(&mut self, id: NodeId, max_count: usize) {
        self.nodes[id.0].max_count = max_count;
        for child in self.nodes[id.0].children.clone() {
            self.set_max_count(child, max_count);
        }
    }

    /// Set or overwrite a node's own attribute
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        let attrs = &mut self.nodes[id.0].attributes;
        match attrs.iter_mut().find(|a| a.name.eq_ignore_ascii_case(name)) {
            Some(attr) => attr.value = value.to_string(),
            None => attrs.push(Attribute::new(name, value)),
        }
    }
}

impl Default for AbbreviationTree {
    fn default() -> Self {
        Self::new()
    }
}
