//! Markup → document, built from the html5gum tokenizer.
//!
//! The tokenizer decodes character references and lowercases names; the
//! tree builder here is deliberately small: void and self-closing elements
//! are leaves, an end tag closes everything opened after its match, stray end
//! tags are dropped and whatever is still open at end of input is closed.
//! Input that ends inside a tag, comment or doctype is rejected.

use html5gum::{Error as TokenError, State, Token, Tokenizer};

use super::{Attribute, Document, Element, NodeId, NodeKind};
use crate::domain::error::DomainError;

pub(super) fn parse(source: &str) -> Result<Document, DomainError> {
    let mut builder = TreeBuilder::new();
    let mut tokenizer = Tokenizer::new(source);

    while let Some(token) = tokenizer.next() {
        let token = token.map_err(|_| DomainError::MalformedMarkup {
            offset: 0,
            reason: "markup could not be read".into(),
        })?;

        match token {
            Token::StartTag(tag) => {
                let mut element = Element::new(lossy(&tag.name));
                element.self_closing = tag.self_closing;
                element.attributes = tag
                    .attributes
                    .iter()
                    .map(|(name, value)| Attribute::new(lossy(name), lossy(value)))
                    .collect();

                let leaf = element.self_closing || element.is_void();
                if !leaf {
                    match element.name.as_str() {
                        "script" | "style" => tokenizer.set_state(State::ScriptData),
                        "textarea" | "title" => tokenizer.set_state(State::RcData),
                        _ => {}
                    }
                }
                builder.open(element, leaf);
            }
            Token::EndTag(tag) => builder.close(&lossy(&tag.name)),
            Token::String(text) => builder.text(&lossy(&text)),
            Token::Comment(body) => builder.leaf(NodeKind::Comment(lossy(&body))),
            Token::Doctype(doctype) => {
                let mut declaration = format!("!DOCTYPE {}", lossy(&doctype.name));
                match (&doctype.public_identifier, &doctype.system_identifier) {
                    (Some(public), Some(system)) => declaration.push_str(&format!(
                        " PUBLIC \"{}\" \"{}\"",
                        lossy(public),
                        lossy(system)
                    )),
                    (Some(public), None) => {
                        declaration.push_str(&format!(" PUBLIC \"{}\"", lossy(public)));
                    }
                    (None, Some(system)) => {
                        declaration.push_str(&format!(" SYSTEM \"{}\"", lossy(system)));
                    }
                    (None, None) => {}
                }
                builder.leaf(NodeKind::Declaration(declaration));
            }
            Token::Error(error) => {
                if let Some(reason) = fatal(&error) {
                    return Err(DomainError::MalformedMarkup {
                        offset: source.len(),
                        reason: reason.into(),
                    });
                }
            }
        }
    }

    Ok(builder.finish())
}

/// Tokenizer errors that mean the template was cut short. Everything else
/// (missing whitespace, odd characters) is recovered from.
fn fatal(error: &TokenError) -> Option<&'static str> {
    match error {
        TokenError::EofInTag => Some("unterminated tag"),
        TokenError::EofInComment => Some("unterminated comment"),
        TokenError::EofInDoctype => Some("unterminated doctype"),
        _ => None,
    }
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

struct TreeBuilder {
    doc: Document,
    open: Vec<NodeId>,
}

impl TreeBuilder {
    fn new() -> Self {
        let doc = Document::new();
        let root = doc.root();
        Self {
            doc,
            open: vec![root],
        }
    }

    fn current(&self) -> NodeId {
        self.open.last().copied().unwrap_or_else(|| self.doc.root())
    }

    fn open(&mut self, element: Element, leaf: bool) {
        let id = self.doc.append(self.current(), NodeKind::Element(element));
        if !leaf {
            self.open.push(id);
        }
    }

    fn leaf(&mut self, kind: NodeKind) {
        self.doc.append(self.current(), kind);
    }

    /// Pop up to and including the innermost open element named `name`.
    fn close(&mut self, name: &str) {
        let matched = self
            .open
            .iter()
            .skip(1)
            .rposition(|&id| self.doc.element(id).is_some_and(|el| el.is(name)));
        if let Some(index) = matched {
            self.open.truncate(index + 1);
        }
    }

    /// Append text, merging with a preceding text node.
    fn text(&mut self, text: &str) {
        let parent = self.current();
        if let Some(&last) = self.doc.children(parent).last() {
            if let NodeKind::Text(existing) = &mut self.doc.node_mut(last).kind {
                existing.push_str(text);
                return;
            }
        }
        self.doc.append(parent, NodeKind::Text(text.to_string()));
    }

    fn finish(self) -> Document {
        self.doc
    }
}
