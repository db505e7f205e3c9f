//! Document → markup.
//!
//! Text and attribute values are stored decoded, so they are escaped on the
//! way out. Text inside `<script>` and `<style>` is written as is.

use super::{Attribute, Document, Element, NodeId, NodeKind};

pub(super) fn write_node(doc: &Document, id: NodeId, out: &mut String) {
    let node = doc.node(id);
    match &node.kind {
        NodeKind::Root => write_children(doc, id, out),
        NodeKind::Text(text) => {
            let raw = node
                .parent()
                .and_then(|parent| doc.element(parent))
                .is_some_and(Element::is_raw_text);
            if raw {
                out.push_str(text);
            } else {
                escape_into(text, false, out);
            }
        }
        NodeKind::Comment(body) => {
            out.push_str("<!--");
            out.push_str(body);
            out.push_str("-->");
        }
        NodeKind::Declaration(body) => {
            out.push('<');
            out.push_str(body);
            out.push('>');
        }
        NodeKind::Element(element) => write_element(doc, id, element, out),
    }
}

fn write_children(doc: &Document, id: NodeId, out: &mut String) {
    for &child in doc.children(id) {
        write_node(doc, child, out);
    }
}

fn write_element(doc: &Document, id: NodeId, element: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&element.name);
    for attr in &element.attributes {
        out.push(' ');
        write_attribute(attr, out);
    }

    if element.self_closing {
        if !element.attributes.is_empty() {
            out.push(' ');
        }
        out.push_str("/>");
        return;
    }
    out.push('>');

    if element.is_void() {
        return;
    }

    write_children(doc, id, out);
    out.push_str("</");
    out.push_str(&element.name);
    out.push('>');
}

fn write_attribute(attr: &Attribute, out: &mut String) {
    out.push_str(&attr.name);
    if attr.value.is_empty() {
        return;
    }
    out.push_str("=\"");
    escape_into(&attr.value, true, out);
    out.push('"');
}

fn escape_into(text: &str, attribute: bool, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' if attribute => out.push_str("&quot;"),
            '<' if !attribute => out.push_str("&lt;"),
            '>' if !attribute => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}
