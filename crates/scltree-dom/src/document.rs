//! Arena-backed element tree.
//!
//! Every element lives in one `Vec` owned by the [`Document`]; links between
//! elements are [`NodeId`] indices. Ownership flows strictly parent to child
//! through the `children` lists, while `parent` is a plain index used only
//! for upward queries.

use std::fmt;

use serde::{Deserialize, Serialize};

use scltree_types::TreeView;

/// Index of an element inside its [`Document`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) const fn first() -> Self {
        NodeId(0)
    }

    /// Position of the element in the arena (document order of creation).
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One element of a document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
    /// Tag name as written, prefix included.
    pub tag: String,
    /// Attributes in source order. Names are unique.
    pub attributes: Vec<(String, String)>,
    /// Direct text, `None` when absent or whitespace only.
    pub text: Option<String>,
    /// Parent element, `None` for the document element.
    pub parent: Option<NodeId>,
    /// Children in document order.
    pub children: Vec<NodeId>,
}

impl Element {
    fn new(tag: impl Into<String>, parent: Option<NodeId>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            text: None,
            parent,
            children: Vec::new(),
        }
    }
}

/// An owned element tree with a single document element.
#[derive(Clone, Debug, Default)]
pub struct Document {
    nodes: Vec<Element>,
}

impl Document {
    /// Create a document containing only its document element.
    pub fn new(root_tag: impl Into<String>) -> Self {
        Self {
            nodes: vec![Element::new(root_tag, None)],
        }
    }

    /// An empty document (no root). Useful to exercise invalid-input paths.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the document has no elements.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The element behind a handle.
    ///
    /// Panics if `id` belongs to another document and is out of range.
    pub fn get(&self, id: NodeId) -> &Element {
        &self.nodes[id.index()]
    }

    /// All node handles in creation order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len() as u32).map(NodeId)
    }

    // ---------------------------------------------------------------
    // Construction
    // ---------------------------------------------------------------

    /// Append a new child element under `parent` and return its handle.
    pub fn add_element(&mut self, parent: NodeId, tag: impl Into<String>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Element::new(tag, Some(parent)));
        self.nodes[parent.index()].children.push(id);
        id
    }

    /// Set an attribute, replacing any existing value for the same name.
    pub fn set_attribute(&mut self, node: NodeId, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        let attrs = &mut self.nodes[node.index()].attributes;
        match attrs.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => attrs.push((name, value)),
        }
    }

    /// Replace the direct text of an element.
    pub fn set_text(&mut self, node: NodeId, text: impl Into<String>) {
        self.nodes[node.index()].text = Some(text.into());
    }

    pub(crate) fn append_text(&mut self, node: NodeId, text: &str) {
        self.nodes[node.index()]
            .text
            .get_or_insert_with(String::new)
            .push_str(text);
    }

    /// Drop whitespace-only direct text once an element is closed.
    pub(crate) fn finish_text(&mut self, node: NodeId) {
        let slot = &mut self.nodes[node.index()].text;
        if slot.as_deref().is_some_and(|t| t.trim().is_empty()) {
            *slot = None;
        }
    }

    // ---------------------------------------------------------------
    // Addressing
    // ---------------------------------------------------------------

    /// Human-readable location of an element, e.g. `/SCL/IED[2]/Private`.
    ///
    /// A position suffix (1-based) is added only when the parent has more
    /// than one child with the same tag.
    pub fn path(&self, node: NodeId) -> String {
        let mut segments = Vec::new();
        let mut current = Some(node);
        while let Some(id) = current {
            let element = self.get(id);
            let segment = match element.parent {
                Some(parent) => {
                    let same_tag: Vec<NodeId> = self
                        .get(parent)
                        .children
                        .iter()
                        .copied()
                        .filter(|c| self.get(*c).tag == element.tag)
                        .collect();
                    if same_tag.len() > 1 {
                        let pos = same_tag.iter().position(|c| *c == id).unwrap_or(0) + 1;
                        format!("{}[{}]", element.tag, pos)
                    } else {
                        element.tag.clone()
                    }
                }
                None => element.tag.clone(),
            };
            segments.push(segment);
            current = element.parent;
        }
        segments.reverse();
        format!("/{}", segments.join("/"))
    }
}

impl TreeView for Document {
    type NodeId = NodeId;

    fn root(&self) -> Option<NodeId> {
        (!self.nodes.is_empty()).then_some(NodeId::first())
    }

    fn tag(&self, node: NodeId) -> &str {
        &self.get(node).tag
    }

    fn attributes(&self, node: NodeId) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.get(node)
            .attributes
            .iter()
            .map(|(n, v)| (n.as_str(), v.as_str()))
    }

    fn children(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.get(node).children.iter().copied()
    }

    fn text(&self, node: NodeId) -> Option<&str> {
        self.get(node).text.as_deref()
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.get(node).parent
    }

    fn child_count(&self, node: NodeId) -> usize {
        self.get(node).children.len()
    }
}
