//! A framework-neutral element tree produced by the renderers.

/// Escape text for HTML content and attribute values.
fn escape(s: &str, out: &mut String) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
}

/// Elements that never have content.
const VOID: &[&str] = &["br", "hr", "img", "input"];

/// A node of rendered output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Markup {
    /// An element.
    Element(Element),
    /// A text run.
    Text(String),
    /// Nothing; used for hidden nodes.
    Empty,
}

impl Markup {
    /// A text node.
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// The element, if this is one.
    pub fn element(&self) -> Option<&Element> {
        match self {
            Self::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Serialize to HTML. Attribute order is preserved, so output is stable.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    /// Append HTML to `out`.
    fn write_html(&self, out: &mut String) {
        match self {
            Self::Text(s) => escape(s, out),
            Self::Empty => {}
            Self::Element(e) => {
                out.push('<');
                out.push_str(&e.tag);
                for (k, v) in &e.attrs {
                    out.push(' ');
                    out.push_str(k);
                    out.push_str("=\"");
                    escape(v, out);
                    out.push('"');
                }
                out.push('>');
                if VOID.contains(&e.tag.as_str()) {
                    return;
                }
                for c in &e.children {
                    c.write_html(out);
                }
                out.push_str("</");
                out.push_str(&e.tag);
                out.push('>');
            }
        }
    }

    /// Depth-first search for elements carrying attribute `key` with `value`.
    pub fn find_all<'a>(&'a self, key: &str, value: &str) -> Vec<&'a Element> {
        let mut found = Vec::new();
        self.collect(key, value, &mut found);
        found
    }

    /// Recursive helper for [`Self::find_all`].
    fn collect<'a>(&'a self, key: &str, value: &str, found: &mut Vec<&'a Element>) {
        if let Self::Element(e) = self {
            if e.attr_value(key) == Some(value) {
                found.push(e);
            }
            for c in &e.children {
                c.collect(key, value, found);
            }
        }
    }

    /// All text content, concatenated.
    pub fn text_content(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Empty => String::new(),
            Self::Element(e) => e.children.iter().map(Self::text_content).collect(),
        }
    }
}

impl From<Element> for Markup {
    fn from(e: Element) -> Self {
        Self::Element(e)
    }
}

/// An element with ordered attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Tag name.
    pub tag: String,
    /// Attributes in insertion order.
    pub attrs: Vec<(String, String)>,
    /// Child nodes.
    pub children: Vec<Markup>,
}

impl Element {
    /// An empty element.
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Add an attribute. Setting an existing attribute replaces its value.
    pub fn attr(mut self, key: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| k == key) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((key.into(), value)),
        }
        self
    }

    /// Add a valueless attribute such as `readonly`.
    pub fn flag(self, key: &str, on: bool) -> Self {
        if on { self.attr(key, key) } else { self }
    }

    /// Shorthand for the `class` attribute.
    pub fn class(self, class: &str) -> Self {
        self.attr("class", class)
    }

    /// Shorthand for the `style` attribute.
    pub fn style(self, style: impl Into<String>) -> Self {
        self.attr("style", style)
    }

    /// Append a child.
    pub fn child(mut self, child: impl Into<Markup>) -> Self {
        let child = child.into();
        if child != Markup::Empty {
            self.children.push(child);
        }
        self
    }

    /// Append several children.
    pub fn children(mut self, children: impl IntoIterator<Item = Markup>) -> Self {
        self.children
            .extend(children.into_iter().filter(|c| *c != Markup::Empty));
        self
    }

    /// Append a text child.
    pub fn text(self, s: impl Into<String>) -> Self {
        self.child(Markup::Text(s.into()))
    }

    /// Look up an attribute value.
    pub fn attr_value(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html() {
        let m: Markup = Element::new("div")
            .class("a")
            .attr("data-x", "1 < 2")
            .child(Element::new("input").attr("value", "q\"t").flag("readonly", true))
            .text("fish & chips")
            .into();
        assert_eq!(
            m.to_html(),
            "<div class=\"a\" data-x=\"1 &lt; 2\"><input value=\"q&quot;t\" \
             readonly=\"readonly\">fish &amp; chips</div>"
        );
        assert_eq!(m.text_content(), "fish & chips");
    }

    #[test]
    fn find() {
        let m: Markup = Element::new("div")
            .child(Element::new("span").attr("data-id", "x"))
            .child(Element::new("p").child(Element::new("b").attr("data-id", "x")))
            .child(Markup::Empty)
            .into();
        assert_eq!(m.find_all("data-id", "x").len(), 2);
        assert_eq!(m.element().map(|e| e.children.len()), Some(2));
    }
}
