//! HTML document access for grading
//!
//! Thin wrapper over kuchiki's DOM: grading rules only need tag names,
//! whole class tokens, attributes, and direct children, so the full node
//! API stays out of the rule code.

use kuchiki::iter::NodeIterator;
use kuchiki::traits::TendrilSink;
use kuchiki::{NodeData, NodeRef};
use thiserror::Error;

/// Input that cannot become an element tree
#[derive(Debug, Error)]
pub enum ParseError {
    /// Empty or whitespace-only input
    #[error("input is empty - nothing to grade")]
    EmptyInput,
}

/// A parsed HTML document. Immutable for the duration of grading.
pub struct Document {
    root: NodeRef,
}

impl Document {
    /// Parse markup into a document tree. Fails only for empty input;
    /// kuchiki recovers from malformed markup on its own.
    pub fn parse(html: &str) -> Result<Self, ParseError> {
        if html.trim().is_empty() {
            return Err(ParseError::EmptyInput);
        }
        let root = kuchiki::parse_html().one(html);
        Ok(Self { root })
    }

    /// All element nodes in document order
    pub fn elements(&self) -> Vec<Element> {
        self.root
            .inclusive_descendants()
            .elements()
            .map(|e| Element {
                node: e.as_node().clone(),
            })
            .collect()
    }

    /// Elements that have at least one class token satisfying the predicate
    pub fn elements_with_class<F>(&self, predicate: F) -> Vec<Element>
    where
        F: Fn(&str) -> bool,
    {
        self.elements()
            .into_iter()
            .filter(|el| el.classes().iter().any(|t| predicate(t)))
            .collect()
    }
}

/// One element node
#[derive(Clone)]
pub struct Element {
    node: NodeRef,
}

impl Element {
    /// Tag name (html5ever normalizes HTML names to lowercase)
    pub fn tag(&self) -> String {
        match self.node.data() {
            NodeData::Element(el) => el.name.local.to_string(),
            _ => String::new(),
        }
    }

    /// Attribute value, if present
    pub fn attr(&self, name: &str) -> Option<String> {
        match self.node.data() {
            NodeData::Element(el) => el.attributes.borrow().get(name).map(|v| v.to_string()),
            _ => None,
        }
    }

    /// Class attribute split into whole tokens. Duplicates are kept.
    pub fn classes(&self) -> Vec<String> {
        self.attr("class")
            .map(|c| c.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Whole-token class membership test
    pub fn has_class(&self, token: &str) -> bool {
        self.classes().iter().any(|t| t == token)
    }

    /// Direct child elements only (no recursion)
    pub fn child_elements(&self) -> Vec<Element> {
        self.node
            .children()
            .elements()
            .map(|e| Element {
                node: e.as_node().clone(),
            })
            .collect()
    }

    /// Reconstructed opening tag, used as report evidence. Attributes come
    /// out in name order, which keeps reports deterministic.
    pub fn opening_tag(&self) -> String {
        match self.node.data() {
            NodeData::Element(el) => {
                let mut out = format!("<{}", el.name.local);
                let attrs = el.attributes.borrow();
                for (name, attr) in attrs.map.iter() {
                    out.push_str(&format!(" {}=\"{}\"", name.local, attr.value));
                }
                out.push('>');
                out
            }
            _ => String::new(),
        }
    }
}
