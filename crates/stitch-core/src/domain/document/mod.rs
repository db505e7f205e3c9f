//! Arena-backed HTML document tree.
//!
//! Nodes live in one `Vec` and are addressed by [`NodeId`]. Each node keeps
//! its parent and an ordered list of children, so the processing passes can
//! splice imported content in place without aliasing references.
//!
//! Detached nodes (replaced imports, for instance) stay in the arena until
//! the document is dropped; they are simply unreachable from the root.

mod parse;
mod serialize;

use std::fmt;

use crate::domain::error::DomainError;

/// Index of a node inside a [`Document`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A single attribute with its decoded value. Boolean attributes such as
/// `<input disabled>` have an empty value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Element payload: lowercased tag name and attributes. Parsed attributes
/// come in name order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<Attribute>,
    pub self_closing: bool,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            self_closing: false,
        }
    }

    /// Case-insensitive tag name comparison.
    pub fn is(&self, tag: &str) -> bool {
        self.name.eq_ignore_ascii_case(tag)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .map(|a| a.value.as_str())
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes
            .iter()
            .any(|a| a.name.eq_ignore_ascii_case(name))
    }

    /// Set an attribute value in place, appending the attribute if missing.
    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self
            .attributes
            .iter_mut()
            .find(|a| a.name.eq_ignore_ascii_case(name))
        {
            Some(attr) => attr.value = value,
            None => self.attributes.push(Attribute::new(name, value)),
        }
    }

    pub(crate) fn is_void(&self) -> bool {
        VOID_ELEMENTS.iter().any(|tag| self.is(tag))
    }

    pub(crate) fn is_raw_text(&self) -> bool {
        RAW_TEXT_ELEMENTS.iter().any(|tag| self.is(tag))
    }
}

/// Elements that never have children or an end tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Elements whose content is not markup.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Root,
    Element(Element),
    Text(String),
    Comment(String),
    /// `<!DOCTYPE ...>`, stored without the surrounding angle brackets.
    Declaration(String),
}

#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn as_element(&self) -> Option<&Element> {
        match &self.kind {
            NodeKind::Element(el) => Some(el),
            _ => None,
        }
    }
}

/// A parsed template document. The root node is always `NodeId(0)`.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Document {
    /// Create an empty document containing only the root.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeKind::Root)],
        }
    }

    /// Parse markup into a document.
    pub fn parse(source: &str) -> Result<Self, DomainError> {
        parse::parse(source)
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        self.nodes.get(id.index()).and_then(Node::as_element)
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match self.nodes.get_mut(id.index()).map(|n| &mut n.kind) {
            Some(NodeKind::Element(el)) => Some(el),
            _ => None,
        }
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.index()].children
    }

    /// Allocate a detached node.
    pub fn create(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(Node::new(kind));
        id
    }

    /// Allocate a node and append it as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = self.create(kind);
        self.nodes[id.index()].parent = Some(parent);
        self.nodes[parent.index()].children.push(id);
        id
    }

    /// `true` if the node is reachable from the root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut current = id;
        loop {
            if current == self.root() {
                return true;
            }
            match self.nodes[current.index()].parent {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// All attached elements matching `predicate`, in document order.
    pub fn select(&self, predicate: impl Fn(&Element) -> bool) -> Vec<NodeId> {
        self.collect(&predicate, true, &[])
    }

    /// Like [`Document::select`], but does not look inside matched elements.
    pub fn select_outermost(&self, predicate: impl Fn(&Element) -> bool) -> Vec<NodeId> {
        self.collect(&predicate, false, &[])
    }

    /// Like [`Document::select`], skipping the subtrees rooted at `excluded`.
    pub fn select_except(
        &self,
        excluded: &[NodeId],
        predicate: impl Fn(&Element) -> bool,
    ) -> Vec<NodeId> {
        self.collect(&predicate, true, excluded)
    }

    fn collect(
        &self,
        predicate: &dyn Fn(&Element) -> bool,
        descend_into_matches: bool,
        excluded: &[NodeId],
    ) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack: Vec<NodeId> = self.children(self.root()).iter().rev().copied().collect();

        while let Some(id) = stack.pop() {
            if excluded.contains(&id) {
                continue;
            }
            let matched = self.element(id).is_some_and(predicate);
            if matched {
                found.push(id);
            }
            if !matched || descend_into_matches {
                stack.extend(self.children(id).iter().rev().copied());
            }
        }

        found
    }

    /// Move every node of `other` into this arena.
    ///
    /// Returns the ids of `other`'s top-level nodes, detached and ready to be
    /// spliced with [`Document::replace_with`].
    pub fn adopt(&mut self, other: Document) -> Vec<NodeId> {
        let offset = self.nodes.len();
        let shift = |id: NodeId| NodeId::new(id.index() + offset);

        let top_level: Vec<NodeId> = other.children(other.root()).iter().map(|&id| shift(id)).collect();

        for node in other.nodes {
            self.nodes.push(Node {
                kind: node.kind,
                parent: node.parent.map(shift),
                children: node.children.into_iter().map(shift).collect(),
            });
        }

        for &id in &top_level {
            self.nodes[id.index()].parent = None;
        }

        top_level
    }

    /// Replace `target` with `replacements`, in order, at `target`'s position.
    ///
    /// `target` ends up detached. Replacing the root or a detached node is a
    /// no-op and returns `false`.
    pub fn replace_with(&mut self, target: NodeId, replacements: Vec<NodeId>) -> bool {
        let Some(parent) = self.nodes[target.index()].parent else {
            return false;
        };
        let Some(position) = self.nodes[parent.index()]
            .children
            .iter()
            .position(|&c| c == target)
        else {
            return false;
        };

        for &id in &replacements {
            self.nodes[id.index()].parent = Some(parent);
        }
        self.nodes[parent.index()]
            .children
            .splice(position..=position, replacements);
        self.nodes[target.index()].parent = None;
        true
    }

    /// Serialize the children of the root.
    pub fn inner_html(&self) -> String {
        let mut out = String::new();
        for &child in self.children(self.root()) {
            serialize::write_node(self, child, &mut out);
        }
        out
    }

    /// Serialize a single node and its subtree.
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        serialize::write_node(self, id, &mut out);
        out
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inner_html())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_links_parent_and_child() {
        let mut doc = Document::new();
        let div = doc.append(doc.root(), NodeKind::Element(Element::new("div")));
        let text = doc.append(div, NodeKind::Text("hi".into()));

        assert_eq!(doc.node(text).parent(), Some(div));
        assert_eq!(doc.children(div), &[text]);
        assert!(doc.is_attached(text));
    }

    #[test]
    fn replace_with_splices_in_order() {
        let mut doc = Document::parse("<p>a</p><import src=\"x\"></import><p>c</p>").unwrap();
        let import = doc.select(|el| el.is("import"))[0];

        let other = Document::parse("<b>1</b><i>2</i>").unwrap();
        let adopted = doc.adopt(other);
        assert!(doc.replace_with(import, adopted));

        assert_eq!(doc.inner_html(), "<p>a</p><b>1</b><i>2</i><p>c</p>");
        assert!(!doc.is_attached(import));
    }

    #[test]
    fn replace_with_on_root_is_noop() {
        let mut doc = Document::parse("<p></p>").unwrap();
        let root = doc.root();
        assert!(!doc.replace_with(root, Vec::new()));
        assert_eq!(doc.inner_html(), "<p></p>");
    }

    #[test]
    fn select_outermost_skips_nested_matches() {
        let doc = Document::parse("<import src=a><import src=b></import></import>").unwrap();
        assert_eq!(doc.select(|el| el.is("import")).len(), 2);
        assert_eq!(doc.select_outermost(|el| el.is("import")).len(), 1);
    }

    #[test]
    fn select_returns_document_order() {
        let doc = Document::parse("<div><img src=1><span><img src=2></span></div><img src=3>").unwrap();
        let srcs: Vec<_> = doc
            .select(|el| el.is("img"))
            .into_iter()
            .map(|id| doc.element(id).unwrap().attribute("src").unwrap().to_string())
            .collect();
        assert_eq!(srcs, ["1", "2", "3"]);
    }

    #[test]
    fn set_attribute_replaces_in_place() {
        let mut doc = Document::parse("<link rel=stylesheet href=a.css media=all>").unwrap();
        let link = doc.select(|el| el.is("link"))[0];
        let element = doc.element_mut(link).unwrap();
        element.set_attribute("HREF", "/a.css");
        element.set_attribute("title", "x");
        assert_eq!(
            doc.inner_html(),
            "<link href=\"/a.css\" media=\"all\" rel=\"stylesheet\" title=\"x\">"
        );
    }

    #[test]
    fn select_except_skips_excluded_subtrees() {
        let mut doc = Document::parse("<img src=1><import src=p></import><img src=3>").unwrap();
        let import = doc.select(|el| el.is("import"))[0];
        let adopted = doc.adopt(Document::parse("<div><img src=2></div>").unwrap());
        doc.replace_with(import, adopted.clone());

        assert_eq!(doc.select(|el| el.is("img")).len(), 3);
        let outside: Vec<_> = doc
            .select_except(&adopted, |el| el.is("img"))
            .into_iter()
            .map(|id| doc.element(id).unwrap().attribute("src").unwrap().to_string())
            .collect();
        assert_eq!(outside, ["1", "3"]);
    }
}
