// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Minimal HTML tree. Every text node and attribute value is escaped when the
//! tree is serialized; only `Node::Trusted` bypasses escaping and it accepts
//! `&'static str` so user data can never reach it.

const VOID_ELEMENTS: [&str; 4] = ["br", "hr", "img", "meta"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    Trusted(&'static str),
}

impl From<Element> for Node {
    fn from(value: Element) -> Self {
        Self::Element(value)
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: &'static str,
    attrs: Vec<(&'static str, String)>,
    children: Vec<Node>,
}

pub fn el(tag: &'static str) -> Element {
    Element {
        tag,
        attrs: Vec::new(),
        children: Vec::new(),
    }
}

impl Element {
    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, value.into()));
        self
    }

    pub fn class(self, value: &'static str) -> Self {
        self.attr("class", value)
    }

    pub fn style(self, value: &'static str) -> Self {
        self.attr("style", value)
    }

    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn children<I, N>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        self.children.extend(nodes.into_iter().map(Into::into));
        self
    }

    pub fn text(self, value: impl Into<String>) -> Self {
        self.child(Node::Text(value.into()))
    }

    pub fn trusted(self, value: &'static str) -> Self {
        self.child(Node::Trusted(value))
    }

    fn write(&self, out: &mut String) {
        out.push('<');
        out.push_str(self.tag);
        for (name, value) in &self.attrs {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape_attr(value));
            out.push('"');
        }
        out.push('>');
        if VOID_ELEMENTS.contains(&self.tag) {
            return;
        }
        for child in &self.children {
            child.write(out);
        }
        out.push_str("</");
        out.push_str(self.tag);
        out.push('>');
    }
}

impl Node {
    fn write(&self, out: &mut String) {
        match self {
            Self::Element(element) => element.write(out),
            Self::Text(text) => out.push_str(&escape_text(text)),
            Self::Trusted(raw) => out.push_str(raw),
        }
    }
}

/// Serializes `root` as a standalone document with a doctype.
pub fn render_document(root: &Element) -> String {
    let mut out = String::from("<!DOCTYPE html>\n");
    root.write(&mut out);
    out.push('\n');
    out
}

pub fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

pub fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{el, escape_attr, escape_text, render_document};

    #[test]
    fn text_is_escaped() {
        let page = el("p").text("<script>alert('x')</script> & co");
        let html = render_document(&el("html").child(page));
        assert!(html.contains("&lt;script&gt;alert('x')&lt;/script&gt; &amp; co"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn attributes_are_escaped() {
        let html = render_document(&el("div").attr("title", "a\"b' <c>"));
        assert!(html.contains(r#"title="a&quot;b&#39; &lt;c&gt;""#));
    }

    #[test]
    fn void_elements_have_no_closing_tag() {
        let html = render_document(&el("head").child(el("meta").attr("charset", "utf-8")));
        assert!(html.contains(r#"<head><meta charset="utf-8"></head>"#));
        assert!(!html.contains("</meta>"));
    }

    #[test]
    fn trusted_content_is_written_verbatim() {
        let html = render_document(&el("style").trusted("td > p { color: red; }"));
        assert!(html.contains("<style>td > p { color: red; }</style>"));
    }

    #[test]
    fn non_ascii_passes_through() {
        assert_eq!(escape_text("Cotización – Pérez"), "Cotización – Pérez");
        assert_eq!(escape_attr("Gómez"), "Gómez");
    }

    #[test]
    fn document_starts_with_doctype() {
        assert!(render_document(&el("html")).starts_with("<!DOCTYPE html>\n<html></html>"));
    }
}
