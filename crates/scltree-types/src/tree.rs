use std::fmt;
use std::hash::Hash;

/// Read-only view over an element tree built by someone else.
///
/// The engine never parses, owns, or mutates documents. It only needs to ask
/// a node for its tag, attributes, ordered children, and direct text.
/// Implementations must satisfy these invariants:
/// - `children` yields a node's children in document order, every time.
/// - Attribute names are unique per node.
/// - `text` is the node's own immediate text, never descendant text.
/// - `parent` is a non-owning upward relation; the engine uses it only for
///   ancestor queries, never to drive traversal.
pub trait TreeView {
    /// Opaque, stable handle to a node of this tree.
    type NodeId: Copy + Eq + Ord + Hash + fmt::Debug + Send + Sync;

    /// The document element, or `None` for an empty/malformed document.
    fn root(&self) -> Option<Self::NodeId>;

    /// Tag name exactly as written (including any namespace prefix).
    fn tag(&self, node: Self::NodeId) -> &str;

    /// Attributes as `(name, value)` pairs in the order the source produced
    /// them. Callers must not rely on that order.
    fn attributes(&self, node: Self::NodeId) -> impl Iterator<Item = (&str, &str)> + '_;

    /// Children in document order.
    fn children(&self, node: Self::NodeId) -> impl Iterator<Item = Self::NodeId> + '_;

    /// Direct text of the node, untrimmed.
    fn text(&self, node: Self::NodeId) -> Option<&str>;

    /// Parent of the node (`None` for the root).
    fn parent(&self, node: Self::NodeId) -> Option<Self::NodeId>;

    /// Look up a single attribute value.
    fn attribute(&self, node: Self::NodeId, name: &str) -> Option<&str> {
        self.attributes(node)
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v)
    }

    /// Number of children.
    fn child_count(&self, node: Self::NodeId) -> usize {
        self.children(node).count()
    }

    /// Returns `true` if the node has no children.
    fn is_leaf(&self, node: Self::NodeId) -> bool {
        self.children(node).next().is_none()
    }

    /// Native deep equality between `a` in this tree and `b` in `other`.
    ///
    /// Tags and texts must match verbatim, attribute sets must match, and
    /// children must match pairwise in order. No reordering is tolerated.
    fn is_equal_node<O: TreeView + ?Sized>(&self, a: Self::NodeId, other: &O, b: O::NodeId) -> bool {
        if self.tag(a) != other.tag(b) || self.text(a) != other.text(b) {
            return false;
        }

        let attrs: Vec<(&str, &str)> = self.attributes(a).collect();
        if attrs.len() != other.attributes(b).count()
            || !attrs
                .iter()
                .all(|(name, value)| other.attribute(b, name) == Some(*value))
        {
            return false;
        }

        let left: Vec<Self::NodeId> = self.children(a).collect();
        let right: Vec<O::NodeId> = other.children(b).collect();
        left.len() == right.len()
            && left
                .iter()
                .zip(&right)
                .all(|(&x, &y)| self.is_equal_node(x, other, y))
    }
}

/// Tag name without its namespace prefix (`scl:Private` -> `Private`).
pub fn local_name(tag: &str) -> &str {
    tag.rsplit_once(':').map_or(tag, |(_, local)| local)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Node {
        tag: &'static str,
        attrs: Vec<(&'static str, &'static str)>,
        text: Option<&'static str>,
        children: Vec<usize>,
        parent: Option<usize>,
    }

    #[derive(Default)]
    struct Flat {
        nodes: Vec<Node>,
    }

    impl Flat {
        fn push(
            &mut self,
            parent: Option<usize>,
            tag: &'static str,
            attrs: Vec<(&'static str, &'static str)>,
            text: Option<&'static str>,
        ) -> usize {
            let id = self.nodes.len();
            self.nodes.push(Node {
                tag,
                attrs,
                text,
                children: vec![],
                parent,
            });
            if let Some(p) = parent {
                self.nodes[p].children.push(id);
            }
            id
        }
    }

    impl TreeView for Flat {
        type NodeId = usize;

        fn root(&self) -> Option<usize> {
            (!self.nodes.is_empty()).then_some(0)
        }
        fn tag(&self, node: usize) -> &str {
            self.nodes[node].tag
        }
        fn attributes(&self, node: usize) -> impl Iterator<Item = (&str, &str)> + '_ {
            self.nodes[node].attrs.iter().map(|(n, v)| (*n, *v))
        }
        fn children(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
            self.nodes[node].children.iter().copied()
        }
        fn text(&self, node: usize) -> Option<&str> {
            self.nodes[node].text
        }
        fn parent(&self, node: usize) -> Option<usize> {
            self.nodes[node].parent
        }
    }

    fn two_lines(first: &'static str, second: &'static str) -> Flat {
        let mut t = Flat::default();
        let root = t.push(None, "Root", vec![], None);
        t.push(Some(root), "Line", vec![("id", first)], None);
        t.push(Some(root), "Line", vec![("id", second)], None);
        t
    }

    #[test]
    fn local_name_strips_prefix() {
        assert_eq!(local_name("scl:Private"), "Private");
        assert_eq!(local_name("Private"), "Private");
        assert_eq!(local_name("a:b:c"), "c");
    }

    #[test]
    fn provided_helpers() {
        let t = two_lines("1", "2");
        assert_eq!(t.child_count(0), 2);
        assert!(!t.is_leaf(0));
        assert!(t.is_leaf(1));
        assert_eq!(t.attribute(2, "id"), Some("2"));
        assert_eq!(t.attribute(2, "missing"), None);
    }

    #[test]
    fn native_equality_ignores_attribute_order() {
        let mut a = Flat::default();
        a.push(None, "X", vec![("a", "1"), ("b", "2")], None);
        let mut b = Flat::default();
        b.push(None, "X", vec![("b", "2"), ("a", "1")], None);
        assert!(a.is_equal_node(0, &b, 0));
    }

    #[test]
    fn native_equality_rejects_reordered_children() {
        let a = two_lines("1", "2");
        let b = two_lines("2", "1");
        assert!(a.is_equal_node(0, &a, 0));
        assert!(!a.is_equal_node(0, &b, 0));
    }

    #[test]
    fn native_equality_compares_text_verbatim() {
        let mut a = Flat::default();
        a.push(None, "P", vec![], Some("x"));
        let mut b = Flat::default();
        b.push(None, "P", vec![], Some(" x "));
        assert!(!a.is_equal_node(0, &b, 0));
    }
}
