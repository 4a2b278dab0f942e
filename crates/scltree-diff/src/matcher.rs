//! Order-insensitive structural equality with Private opacity.
//!
//! Two rules decide whether a node of one tree equals a node of another:
//!
//! 1. If either node is a `Private` element or sits inside one, the trees'
//!    native equality applies ([`TreeView::is_equal_node`]): attributes as a
//!    set, text verbatim, children pairwise in document order.
//! 2. Otherwise the nodes must share a tag and an attribute set. Leaves then
//!    compare their trimmed text; inner nodes need a one-to-one pairing of
//!    children under this same relation, regardless of order.

use scltree_types::{local_name, TreeView};

/// Default local name of the vendor-opaque extension element.
pub const PRIVATE_TAG: &str = "Private";

/// Returns `true` if `node` or any of its ancestors is a Private element.
pub fn is_in_private<T: TreeView + ?Sized>(tree: &T, node: T::NodeId, private_tag: &str) -> bool {
    let mut current = Some(node);
    while let Some(id) = current {
        if local_name(tree.tag(id)) == private_tag {
            return true;
        }
        current = tree.parent(id);
    }
    false
}

/// Compares nodes of a source tree `A` against nodes of a target tree `B`.
pub struct StructuralMatcher<'a, A: TreeView + ?Sized, B: TreeView + ?Sized> {
    source: &'a A,
    target: &'a B,
    private_tag: &'a str,
}

impl<'a, A: TreeView + ?Sized, B: TreeView + ?Sized> StructuralMatcher<'a, A, B> {
    /// Matcher using the default `Private` tag.
    pub fn new(source: &'a A, target: &'a B) -> Self {
        Self {
            source,
            target,
            private_tag: PRIVATE_TAG,
        }
    }

    /// Treat elements with this local name as opaque instead of `Private`.
    pub fn with_private_tag(mut self, private_tag: &'a str) -> Self {
        self.private_tag = private_tag;
        self
    }

    /// Local tag name treated as opaque.
    pub fn private_tag(&self) -> &str {
        self.private_tag
    }

    /// Whether `a` (in the source tree) structurally equals `b` (in the target).
    pub fn is_structurally_equal(&self, a: A::NodeId, b: B::NodeId) -> bool {
        if self.is_private_pair(a, b) {
            return self.source.is_equal_node(a, self.target, b);
        }

        if self.source.tag(a) != self.target.tag(b) || !self.same_attributes(a, b) {
            return false;
        }

        let left: Vec<A::NodeId> = self.source.children(a).collect();
        let right: Vec<B::NodeId> = self.target.children(b).collect();
        if left.is_empty() && right.is_empty() {
            return trimmed(self.source.text(a)) == trimmed(self.target.text(b));
        }
        if left.len() != right.len() {
            return false;
        }

        // Greedy: each left child claims the first unclaimed equal right child.
        let mut claimed = vec![false; right.len()];
        for child in left {
            let found = right
                .iter()
                .enumerate()
                .find(|(i, other)| !claimed[*i] && self.is_structurally_equal(child, **other));
            match found {
                Some((i, _)) => claimed[i] = true,
                None => return false,
            }
        }
        true
    }

    /// Whether `a` and `b` denote the same logical element.
    ///
    /// Ordinary elements only need equal tags. Private elements also need
    /// parents that are the same identity, recursively up to the roots.
    pub fn is_same_identity(&self, a: A::NodeId, b: B::NodeId) -> bool {
        let tag = self.source.tag(a);
        if tag != self.target.tag(b) {
            return false;
        }
        if local_name(tag) != self.private_tag {
            return true;
        }
        match (self.source.parent(a), self.target.parent(b)) {
            (Some(pa), Some(pb)) => self.is_same_identity(pa, pb),
            (None, None) => true,
            _ => false,
        }
    }

    /// Whether either node is subject to native equality.
    pub fn is_private_pair(&self, a: A::NodeId, b: B::NodeId) -> bool {
        is_in_private(self.source, a, self.private_tag) || is_in_private(self.target, b, self.private_tag)
    }

    fn same_attributes(&self, a: A::NodeId, b: B::NodeId) -> bool {
        if self.source.attributes(a).count() != self.target.attributes(b).count() {
            return false;
        }
        self.source
            .attributes(a)
            .all(|(name, value)| self.target.attribute(b, name) == Some(value))
    }
}

fn trimmed(text: Option<&str>) -> &str {
    text.map(str::trim).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use scltree_dom::Document;

    fn doc(xml: &str) -> Document {
        Document::parse_str(xml).unwrap()
    }

    fn roots_equal(a: &str, b: &str) -> bool {
        let (a, b) = (doc(a), doc(b));
        StructuralMatcher::new(&a, &b).is_structurally_equal(a.root().unwrap(), b.root().unwrap())
    }

    #[test]
    fn sibling_order_is_ignored() {
        assert!(roots_equal(
            r#"<Root><Line id="1"/><Line id="2"/></Root>"#,
            r#"<Root><Line id="2"/><Line id="1"/></Root>"#,
        ));
    }

    #[test]
    fn attribute_order_is_ignored() {
        assert!(roots_equal(r#"<LN a="1" b="2"/>"#, r#"<LN b="2" a="1"/>"#));
    }

    #[test]
    fn differing_tag_or_attributes_are_unequal() {
        assert!(!roots_equal(r#"<LN a="1"/>"#, r#"<LD a="1"/>"#));
        assert!(!roots_equal(r#"<LN a="1"/>"#, r#"<LN a="2"/>"#));
        assert!(!roots_equal(r#"<LN a="1"/>"#, r#"<LN a="1" b="2"/>"#));
    }

    #[test]
    fn leaf_text_is_trimmed() {
        assert!(roots_equal("<Val> on </Val>", "<Val>on</Val>"));
        assert!(!roots_equal("<Val>on</Val>", "<Val>off</Val>"));
    }

    #[test]
    fn child_multiset_must_match() {
        assert!(!roots_equal(
            r#"<R><A/><A/><B/></R>"#,
            r#"<R><A/><B/><B/></R>"#,
        ));
        assert!(!roots_equal(r#"<R><A/></R>"#, r#"<R><A/><A/></R>"#));
    }

    #[test]
    fn private_children_must_keep_order() {
        assert!(!roots_equal(
            r#"<SCL><Private><X a="1"/><X a="2"/></Private></SCL>"#,
            r#"<SCL><Private><X a="2"/><X a="1"/></Private></SCL>"#,
        ));
        assert!(roots_equal(
            r#"<SCL><Private t="v"><X a="1"/></Private></SCL>"#,
            r#"<SCL><Private t="v"><X a="1"/></Private></SCL>"#,
        ));
    }

    #[test]
    fn private_text_is_compared_verbatim() {
        assert!(!roots_equal("<Private> x </Private>", "<Private>x</Private>"));
    }

    #[test]
    fn prefixed_private_is_recognized() {
        let d = doc(r#"<SCL><sxy:Private><X/></sxy:Private></SCL>"#);
        let root = d.root().unwrap();
        let private = d.children(root).next().unwrap();
        let inner = d.children(private).next().unwrap();
        assert!(!is_in_private(&d, root, PRIVATE_TAG));
        assert!(is_in_private(&d, private, PRIVATE_TAG));
        assert!(is_in_private(&d, inner, PRIVATE_TAG));
    }

    #[test]
    fn custom_private_tag() {
        let a = doc(r#"<R><Ext><X/><Y/></Ext></R>"#);
        let b = doc(r#"<R><Ext><Y/><X/></Ext></R>"#);
        let (ra, rb) = (a.root().unwrap(), b.root().unwrap());
        assert!(StructuralMatcher::new(&a, &b).is_structurally_equal(ra, rb));
        assert!(!StructuralMatcher::new(&a, &b)
            .with_private_tag("Ext")
            .is_structurally_equal(ra, rb));
    }

    #[test]
    fn identity_of_ordinary_nodes_is_the_tag() {
        let a = doc(r#"<R><Line id="1"/></R>"#);
        let b = doc(r#"<Q><Line id="9"/></Q>"#);
        let la = a.children(a.root().unwrap()).next().unwrap();
        let lb = b.children(b.root().unwrap()).next().unwrap();
        let m = StructuralMatcher::new(&a, &b);
        assert!(m.is_same_identity(la, lb));
        assert!(!m.is_same_identity(a.root().unwrap(), b.root().unwrap()));
    }

    #[test]
    fn identity_of_private_nodes_follows_parents() {
        let a = doc(r#"<SCL><IED><Private/></IED></SCL>"#);
        let b = doc(r#"<SCL><Substation><Private/></Substation></SCL>"#);
        let c = doc(r#"<SCL><IED><Private t="other"/></IED></SCL>"#);
        let private_of = |d: &Document| {
            let parent = d.children(d.root().unwrap()).next().unwrap();
            d.children(parent).next().unwrap()
        };

        assert!(!StructuralMatcher::new(&a, &b).is_same_identity(private_of(&a), private_of(&b)));
        assert!(StructuralMatcher::new(&a, &c).is_same_identity(private_of(&a), private_of(&c)));
    }

    #[test]
    fn private_roots_share_identity() {
        let a = doc("<Private/>");
        let b = doc(r#"<Private x="1"/>"#);
        assert!(StructuralMatcher::new(&a, &b).is_same_identity(a.root().unwrap(), b.root().unwrap()));
    }
}
