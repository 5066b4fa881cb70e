use std::fmt::Write;

use super::SvgNode;

/// Escapes the five XML special characters.
#[must_use]
pub fn escape_xml(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Serializes a scene graph into standalone SVG markup.
#[must_use]
pub fn to_markup(node: &SvgNode) -> String {
    let mut out = String::with_capacity(4096);
    write_node(&mut out, node);
    out
}

fn write_node(out: &mut String, node: &SvgNode) {
    let _ = write!(out, "<{}", node.tag);
    for (name, value) in &node.attrs {
        let _ = write!(out, " {name}=\"{}\"", escape_xml(value));
    }

    if node.children.is_empty() && node.text.is_none() {
        out.push_str("/>");
        return;
    }

    out.push('>');
    if let Some(text) = &node.text {
        out.push_str(&escape_xml(text));
    }
    for child in &node.children {
        write_node(out, child);
    }
    let _ = write!(out, "</{}>", node.tag);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markup_escapes_text_and_attributes() {
        let node = SvgNode::new("text")
            .attr("data-label", "a\"b")
            .text("<script>alert('x')</script>");
        assert_eq!(
            to_markup(&node),
            "<text data-label=\"a&quot;b\">&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;</text>"
        );
    }

    #[test]
    fn empty_nodes_self_close() {
        assert_eq!(to_markup(&SvgNode::new("g")), "<g/>");
    }
}
