use serde::Serialize;

use crate::model::Attributes;

/// A single node of a parsed Zenithal document.
///
/// Consumers are expected to match exhaustively; the set of node kinds is
/// closed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    Element(Element),
    Text(Text),
    Comment(Comment),
    ProcessingInstruction(ProcessingInstruction),
    XmlDeclaration(XmlDeclaration),
}

impl Node {
    #[must_use]
    pub fn as_element(&self) -> Option<&Element> {
        if let Node::Element(element) = self {
            Some(element)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&Text> {
        if let Node::Text(text) = self {
            Some(text)
        } else {
            None
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl From<Text> for Node {
    fn from(text: Text) -> Self {
        Node::Text(text)
    }
}

impl From<Comment> for Node {
    fn from(comment: Comment) -> Self {
        Node::Comment(comment)
    }
}

impl From<ProcessingInstruction> for Node {
    fn from(instruction: ProcessingInstruction) -> Self {
        Node::ProcessingInstruction(instruction)
    }
}

impl From<XmlDeclaration> for Node {
    fn from(declaration: XmlDeclaration) -> Self {
        Node::XmlDeclaration(declaration)
    }
}

/// An ordered sequence of sibling nodes.
///
/// Appending one `Nodes` to another splices its members in place (see
/// [`Nodes::append_all`]); a `Nodes` is never nested inside another.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Nodes(Vec<Node>);

impl Nodes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, node: impl Into<Node>) {
        self.0.push(node.into());
    }

    /// Splice every node of `other` onto the end of `self`.
    pub fn append_all(&mut self, other: Nodes) {
        let mut other = other.0;
        self.0.append(&mut other);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.0.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Node> {
        self.0.iter_mut()
    }

    #[must_use]
    pub fn first(&self) -> Option<&Node> {
        self.0.first()
    }

    #[must_use]
    pub fn last(&self) -> Option<&Node> {
        self.0.last()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Node> {
        self.0.get(index)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Node] {
        &self.0
    }

    pub(crate) fn as_mut_vec(&mut self) -> &mut Vec<Node> {
        &mut self.0
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<Node> {
        self.0
    }

    /// Every text node in this sequence and below it, in document order.
    #[must_use]
    pub fn texts(&self) -> Vec<&Text> {
        let mut texts = Vec::new();
        collect_texts(self, &mut texts);
        texts
    }

    /// The concatenation of every text node in this sequence and below it.
    #[must_use]
    pub fn text_content(&self) -> String {
        self.texts().iter().map(|text| text.value.as_str()).collect()
    }
}

fn collect_texts<'a>(nodes: &'a Nodes, texts: &mut Vec<&'a Text>) {
    for node in nodes {
        match node {
            Node::Text(text) => texts.push(text),
            Node::Element(element) => collect_texts(&element.children, texts),
            Node::Comment(_) | Node::ProcessingInstruction(_) | Node::XmlDeclaration(_) => {}
        }
    }
}

impl From<Vec<Node>> for Nodes {
    fn from(nodes: Vec<Node>) -> Self {
        Self(nodes)
    }
}

impl From<Node> for Nodes {
    fn from(node: Node) -> Self {
        Self(vec![node])
    }
}

impl From<Element> for Nodes {
    fn from(element: Element) -> Self {
        Self(vec![Node::Element(element)])
    }
}

impl From<Text> for Nodes {
    fn from(text: Text) -> Self {
        Self(vec![Node::Text(text)])
    }
}

impl From<Comment> for Nodes {
    fn from(comment: Comment) -> Self {
        Self(vec![Node::Comment(comment)])
    }
}

impl FromIterator<Node> for Nodes {
    fn from_iter<I: IntoIterator<Item = Node>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<Node> for Nodes {
    fn extend<I: IntoIterator<Item = Node>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl IntoIterator for Nodes {
    type Item = Node;
    type IntoIter = std::vec::IntoIter<Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Nodes {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// An `Element` is a named node with attributes and children.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Element {
    pub name: String,
    pub attributes: Attributes,
    pub children: Nodes,
}

impl Element {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Attributes::new(),
            children: Nodes::new(),
        }
    }

    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name, value);
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child);
        self
    }

    #[must_use]
    pub fn with_children(mut self, children: Nodes) -> Self {
        self.children.append_all(children);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    #[must_use]
    pub fn children(&self) -> &Nodes {
        &self.children
    }

    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name)
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name, value);
    }

    /// Every text node below this element, in document order.
    #[must_use]
    pub fn texts(&self) -> Vec<&Text> {
        self.children.texts()
    }

    /// The text content of this element.
    ///
    /// With `compress`, carriage returns are dropped, every whitespace run
    /// becomes a single space and the result is trimmed.
    #[must_use]
    pub fn inner_text(&self, compress: bool) -> String {
        let text = self.children.text_content();
        if compress {
            text.replace('\r', "")
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
        } else {
            text
        }
    }
}

/// A run of character data.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Text {
    pub value: String,
}

impl Text {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// A comment. The stored text always carries exactly one space of padding on
/// each side of the trimmed content.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Comment {
    pub text: String,
}

impl Comment {
    #[must_use]
    pub fn new(content: &str) -> Self {
        Self {
            text: format!(" {} ", content.trim()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProcessingInstruction {
    pub target: String,
    pub content: String,
}

impl ProcessingInstruction {
    #[must_use]
    pub fn new(target: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            content: content.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct XmlDeclaration {
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standalone: Option<String>,
}

impl XmlDeclaration {
    pub const DEFAULT_VERSION: &'static str = "1.0";

    #[must_use]
    pub fn new(version: Option<&str>, encoding: Option<&str>, standalone: Option<&str>) -> Self {
        Self {
            version: version.unwrap_or(Self::DEFAULT_VERSION).to_string(),
            encoding: encoding.map(ToString::to_string),
            standalone: standalone.map(ToString::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_append_all_splices() {
        let mut nodes = Nodes::from(Node::Text(Text::new("a")));
        let other: Nodes = vec![Text::new("b").into(), Element::new("c").into()].into();
        nodes.append_all(other);
        nodes.append_all(Nodes::new());
        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes.get(2), Some(&Node::Element(Element::new("c"))));
    }

    #[test]
    fn test_comment_is_padded() {
        assert_eq!(Comment::new("  note \n").text, " note ");
        assert_eq!(Comment::new("").text, "  ");
    }

    #[test]
    fn test_inner_text_descends_into_elements() {
        let element = Element::new("p")
            .with_child(Text::new("Hello\r\n   "))
            .with_child(Element::new("em").with_child(Text::new("big")))
            .with_child(Text::new("  world "));
        assert_eq!(element.inner_text(false), "Hello\r\n   big  world ");
        assert_eq!(element.inner_text(true), "Hello big world");
        assert_eq!(element.texts().len(), 3);
    }

    #[test]
    fn test_xml_declaration_default_version() {
        let declaration = XmlDeclaration::new(None, Some("UTF-8"), None);
        assert_eq!(declaration.version, "1.0");
        assert_eq!(declaration.encoding.as_deref(), Some("UTF-8"));
        assert_eq!(declaration.standalone, None);
    }

    #[test]
    fn test_serialized_shape() -> Result<(), serde_json::Error> {
        let node = Node::Element(
            Element::new("a")
                .with_attribute("href", "x")
                .with_child(Text::new("t")),
        );
        assert_eq!(
            serde_json::to_value(&node)?,
            serde_json::json!({
                "type": "element",
                "name": "a",
                "attributes": {"href": "x"},
                "children": [{"type": "text", "value": "t"}]
            })
        );
        Ok(())
    }
}
