use core::fmt;

use super::{DOM, DOMNode, NodeKey, NodeKind};

use serde_json::{Map, Value, json};

fn sorted_attrs(node: &DOMNode) -> Vec<(&str, &str)> {
    let mut pairs: Vec<(&str, &str)> = node
        .attrs
        .iter()
        .map(|(name, value)| (name.as_str(), value.as_str()))
        .collect();
    pairs.sort_by(|left, right| left.0.cmp(right.0));
    pairs
}

fn flush_text(children: &mut Vec<Value>, text_buf: &mut String) {
    if !text_buf.trim().is_empty() {
        children.push(json!({ "type": "text", "text": text_buf.clone() }));
    }
    text_buf.clear();
}

/// Adjacent text nodes are merged so the snapshot does not depend on how
/// text was split across updates.
fn coalesce_children(dom: &DOM, key: NodeKey) -> Vec<Value> {
    let mut children: Vec<Value> = Vec::new();
    let mut text_buf = String::new();
    for child in dom.children(key) {
        let Some(node) = dom.node(child) else {
            continue;
        };
        if let NodeKind::Text { text } = &node.kind {
            text_buf.push_str(text);
            continue;
        }
        flush_text(&mut children, &mut text_buf);
        let value = node_to_json(dom, child);
        if !value.is_null() {
            children.push(value);
        }
    }
    flush_text(&mut children, &mut text_buf);
    children
}

fn node_to_json(dom: &DOM, key: NodeKey) -> Value {
    let Some(node) = dom.node(key) else {
        return Value::Null;
    };
    match &node.kind {
        NodeKind::Document => json!({ "type": "document", "children": coalesce_children(dom, key) }),
        NodeKind::Element { tag } => {
            let mut attrs_obj = Map::new();
            for (name, value) in sorted_attrs(node) {
                attrs_obj.insert(name.to_owned(), Value::String(value.to_owned()));
            }
            json!({
                "type": "element",
                "tag": tag,
                "attrs": Value::Object(attrs_obj),
                "children": coalesce_children(dom, key),
            })
        }
        NodeKind::Text { text } => {
            if text.trim().is_empty() {
                Value::Null
            } else {
                json!({ "type": "text", "text": text })
            }
        }
    }
}

fn escape_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out
}

fn write_indent(formatter: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
    for _ in 0..depth {
        formatter.write_str("  ")?;
    }
    Ok(())
}

fn fmt_node(
    dom: &DOM,
    key: NodeKey,
    formatter: &mut fmt::Formatter<'_>,
    depth: usize,
) -> fmt::Result {
    let Some(node) = dom.node(key) else {
        return Ok(());
    };
    match &node.kind {
        NodeKind::Document => {
            write_indent(formatter, depth)?;
            writeln!(formatter, "#document")?;
        }
        NodeKind::Element { tag } => {
            write_indent(formatter, depth)?;
            write!(formatter, "<{tag}")?;
            for (name, value) in sorted_attrs(node) {
                write!(formatter, " {name}=\"{}\"", escape_text(value))?;
            }
            writeln!(formatter, ">")?;
        }
        NodeKind::Text { text } => {
            // Whitespace-only text is noise in the printed tree.
            if text.chars().all(char::is_whitespace) {
                return Ok(());
            }
            write_indent(formatter, depth)?;
            writeln!(formatter, "\"{}\"", escape_text(text))?;
            return Ok(());
        }
    }
    for child in dom.children(key) {
        fmt_node(dom, child, formatter, depth + 1)?;
    }
    if let NodeKind::Element { tag } = &node.kind {
        write_indent(formatter, depth)?;
        writeln!(formatter, "</{tag}>")?;
    }
    Ok(())
}

impl fmt::Debug for DOM {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(formatter, "DOM")?;
        fmt_node(self, NodeKey::ROOT, formatter, 0)
    }
}

impl DOM {
    /// Build a deterministic JSON representation of the subtree at `key`.
    /// Schema:
    /// - Document: { "type":"document", "children":[ ... ] }
    /// - Element: { "type":"element", "tag": "div", "attrs": {..}, "children":[ ... ] }
    /// - Text: { "type":"text", "text":"..." }
    pub fn subtree_to_json(&self, key: NodeKey) -> Value {
        node_to_json(self, key)
    }

    pub fn to_json_value(&self) -> Value {
        node_to_json(self, NodeKey::ROOT)
    }

    /// Pretty JSON string for snapshots and test comparisons.
    pub fn to_json_string(&self) -> String {
        serde_json::to_string_pretty(&self.to_json_value()).unwrap_or_else(|_| String::from("{}"))
    }
}
