use scltree_types::TreeView;

/// Separator between `name=value` pairs.
pub const ATTR_SEPARATOR: char = ',';

/// Characters escaped with a backslash inside a tag, name, value or text.
const ESCAPED: [char; 4] = ['\\', ATTR_SEPARATOR, '=', ':'];

/// Canonical string of a node's own content: `tag:attrs:text`.
///
/// `attrs` lists every attribute as `name=value`, sorted by name and joined
/// with [`ATTR_SEPARATOR`]; `text` is the direct text trimmed of surrounding
/// whitespace, empty when absent. Separator characters occurring inside any
/// field are backslash-escaped, so distinct nodes never render alike. The
/// result does not depend on the order in which the tree reports attributes.
pub fn canonical_form<T: TreeView + ?Sized>(tree: &T, node: T::NodeId) -> String {
    let mut attrs: Vec<(&str, &str)> = tree.attributes(node).collect();
    attrs.sort_unstable_by(|a, b| a.0.cmp(b.0));

    let tag = tree.tag(node);
    let text = tree.text(node).map(str::trim).unwrap_or("");

    let mut out = String::with_capacity(
        tag.len() + text.len() + 2 + attrs.iter().map(|(n, v)| n.len() + v.len() + 2).sum::<usize>(),
    );
    push_escaped(&mut out, tag);
    out.push(':');
    for (i, (name, value)) in attrs.iter().enumerate() {
        if i > 0 {
            out.push(ATTR_SEPARATOR);
        }
        push_escaped(&mut out, name);
        out.push('=');
        push_escaped(&mut out, value);
    }
    out.push(':');
    push_escaped(&mut out, text);
    out
}

fn push_escaped(out: &mut String, field: &str) {
    for c in field.chars() {
        if ESCAPED.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scltree_dom::Document;

    fn first_child(doc: &Document) -> scltree_dom::NodeId {
        doc.children(doc.root().unwrap()).next().unwrap()
    }

    #[test]
    fn renders_tag_sorted_attributes_and_text() {
        let doc = Document::parse_str(r#"<Val b="2" a="1"> 42 </Val>"#).unwrap();
        assert_eq!(canonical_form(&doc, doc.root().unwrap()), "Val:a=1,b=2:42");
    }

    #[test]
    fn absent_text_and_attributes_render_empty() {
        let doc = Document::parse_str("<Root><Empty/></Root>").unwrap();
        assert_eq!(canonical_form(&doc, first_child(&doc)), "Empty::");
    }

    #[test]
    fn descendants_do_not_contribute() {
        let doc = Document::parse_str(r#"<Root id="r"><Child x="1"/></Root>"#).unwrap();
        assert_eq!(canonical_form(&doc, doc.root().unwrap()), "Root:id=r:");
    }

    #[test]
    fn separators_inside_fields_are_escaped() {
        let doc = Document::parse_str(r#"<p:LN a="1,b=2" c="x\y">t:u</p:LN>"#).unwrap();
        assert_eq!(
            canonical_form(&doc, doc.root().unwrap()),
            r"p\:LN:a=1\,b\=2,c=x\\y:t\:u"
        );
    }

    #[test]
    fn field_boundaries_cannot_be_forged() {
        let joined = Document::parse_str(r#"<A a="1,b=2"/>"#).unwrap();
        let split = Document::parse_str(r#"<A a="1" b="2"/>"#).unwrap();
        assert_ne!(
            canonical_form(&joined, joined.root().unwrap()),
            canonical_form(&split, split.root().unwrap())
        );

        let in_value = Document::parse_str(r#"<A a="1:z"/>"#).unwrap();
        let in_text = Document::parse_str(r#"<A a="1">z:</A>"#).unwrap();
        assert_ne!(
            canonical_form(&in_value, in_value.root().unwrap()),
            canonical_form(&in_text, in_text.root().unwrap())
        );
    }
}
