//! Indentation trimming for `*`-marked content blocks.
//!
//! Literal blocks are usually written indented along with the surrounding
//! markup:
//!
//! ```text
//! \pre*<
//!     fn main() {
//!         run();
//!     }
//! >
//! ```
//!
//! Trimming removes the surrounding blank space of the block and the
//! indentation that every indented line has in common, so the content above
//! becomes `"fn main() {\n    run();\n}"`.
use crate::model::{Node, Nodes};

impl Nodes {
    /// Dedent this block in place.
    ///
    /// 1. right-trim the last node if it is text,
    /// 2. find the shortest run of spaces following a newline across every
    ///    text node (descending into elements),
    /// 3. remove that many spaces after each newline in every text node,
    /// 4. left-trim the first node if it is text.
    pub fn trim_indents(&mut self) {
        if let Some(Node::Text(text)) = self.as_mut_vec().last_mut() {
            let trimmed = text.value.trim_end_matches(is_strippable).len();
            text.value.truncate(trimmed);
        }

        let mut texts = Vec::new();
        collect_text_values(self.as_mut_vec(), &mut texts);
        let indent = texts
            .iter()
            .flat_map(|value| indent_runs(value))
            .min()
            .unwrap_or(0);
        if indent > 0 {
            for value in &mut texts {
                let dedented = dedent(value, indent);
                **value = dedented;
            }
        }

        if let Some(Node::Text(text)) = self.as_mut_vec().first_mut() {
            let trimmed = text.value.trim_start_matches(is_strippable).to_string();
            text.value = trimmed;
        }
    }
}

fn is_strippable(c: char) -> bool {
    matches!(c, '\0' | '\t' | '\n' | '\x0B' | '\x0C' | '\r' | ' ')
}

fn collect_text_values<'a>(nodes: &'a mut [Node], values: &mut Vec<&'a mut String>) {
    for node in nodes {
        match node {
            Node::Text(text) => values.push(&mut text.value),
            Node::Element(element) => {
                collect_text_values(element.children.as_mut_vec(), values);
            }
            Node::Comment(_) | Node::ProcessingInstruction(_) | Node::XmlDeclaration(_) => {}
        }
    }
}

fn leading_spaces(line: &str) -> usize {
    line.bytes().take_while(|&b| b == b' ').count()
}

/// Lengths of the non-empty space runs that directly follow a newline.
fn indent_runs(value: &str) -> impl Iterator<Item = usize> + '_ {
    value
        .split('\n')
        .skip(1)
        .map(leading_spaces)
        .filter(|&run| run > 0)
}

fn dedent(value: &str, indent: usize) -> String {
    let mut lines = value.split('\n');
    let mut result = String::with_capacity(value.len());
    if let Some(first) = lines.next() {
        result.push_str(first);
    }
    for line in lines {
        result.push('\n');
        let cut = leading_spaces(line).min(indent);
        result.push_str(line.get(cut..).unwrap_or(line));
    }
    result
}
