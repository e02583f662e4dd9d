use crate::{
    Attributes, Element, Node, Nodes, ProcessingInstruction, XmlDeclaration,
    error::Reason,
    extension::SubParser,
    grammar::{
        Context, Grammar,
        combinators::{Alternative, CharQuery, Combinators, PResult},
        cursor::Mark,
        lexical::{
            ATTRIBUTE_END, ATTRIBUTE_EQUAL, ATTRIBUTE_SEPARATOR, ATTRIBUTE_START, CONTENT_END,
            CONTENT_START, ELEMENT_START, ESCAPE_START, IDENTIFIER_CONTINUE, IDENTIFIER_START,
            MACRO_START, MARK, Marks, SPACE, STRING_DELIMITER, SYSTEM_INSTRUCTION_NAME, SpecialKind,
        },
        text::escape,
    },
};

/// Everything before the content blocks: `\name*~|a="1"|`.
#[derive(Debug)]
struct Tag {
    name: String,
    marks: Marks,
    attributes: Attributes,
    is_macro: bool,
}

impl Grammar<'_, '_> {
    /// An element, instruction or macro invocation.
    ///
    /// Yields as many nodes as the construct stands for: none for a `zml`
    /// instruction, one per block for a `+` element, and whatever a macro
    /// expands to.
    pub(crate) fn element(&mut self, ctx: Context) -> PResult<Nodes> {
        let start = self.scanner.mark();
        let tag = self.tag()?;

        let mut plugin = if tag.is_macro {
            self.registry.plugin(&tag.name).map(|factory| {
                tracing::trace!(name = %tag.name, "delegating content to plugin");
                factory.create(&tag.attributes)
            })
        } else {
            None
        };
        let inner = Context {
            verbal: ctx.verbal || tag.marks.verbal,
            ..ctx
        };
        let mut blocks = self.children_list(inner, &mut plugin)?;
        if tag.name == SYSTEM_INSTRUCTION_NAME {
            self.spaces()?;
        }
        if tag.marks.trim {
            blocks.iter_mut().for_each(Nodes::trim_indents);
        }

        if tag.is_macro {
            self.expand_macro(start, tag, blocks)
        } else if tag.marks.instruction {
            self.instruction(start, tag, blocks)
        } else {
            self.normal_element(start, tag, blocks)
        }
    }

    fn tag(&mut self) -> PResult<Tag> {
        let introducer = self.char_any(&[
            CharQuery::Literal(ELEMENT_START),
            CharQuery::Literal(MACRO_START),
        ])?;
        let name = self.identifier()?;
        let marks = self.many(0, None, |grammar| grammar.char(MARK))?;
        let attributes = self.maybe(Self::attributes)?.unwrap_or_default();
        Ok(Tag {
            name,
            marks: marks.into_iter().collect(),
            attributes,
            is_macro: introducer == MACRO_START,
        })
    }

    pub(crate) fn identifier(&mut self) -> PResult<String> {
        let first = self.char(IDENTIFIER_START)?;
        let rest = self.many(0, None, |grammar| grammar.char(IDENTIFIER_CONTINUE))?;
        Ok(std::iter::once(first).chain(rest).collect())
    }

    pub(crate) fn spaces(&mut self) -> PResult<()> {
        self.many(0, None, |grammar| grammar.char(SPACE))?;
        Ok(())
    }

    /// `|name="value", shorthand|`
    ///
    /// A repeated name keeps its first position and takes the last value.
    fn attributes(&mut self) -> PResult<Attributes> {
        self.char(ATTRIBUTE_START)?;
        let (name, value) = self.attribute()?;
        let rest = self.many(0, None, |grammar| {
            grammar.char(ATTRIBUTE_SEPARATOR)?;
            grammar.attribute()
        })?;
        self.char(ATTRIBUTE_END)?;

        let mut attributes = Attributes::new();
        attributes.insert(name, value);
        for (name, value) in rest {
            attributes.insert(name, value);
        }
        Ok(attributes)
    }

    fn attribute(&mut self) -> PResult<(String, String)> {
        self.spaces()?;
        let name = self.identifier()?;
        self.spaces()?;
        let value = self.maybe(|grammar| {
            grammar.char(ATTRIBUTE_EQUAL)?;
            grammar.spaces()?;
            grammar.string()
        })?;
        self.spaces()?;
        let value = value.unwrap_or_else(|| name.clone());
        Ok((name, value))
    }

    fn string(&mut self) -> PResult<String> {
        let escaped = |grammar: &mut Self| escape(grammar);
        let plain = |grammar: &mut Self| grammar.char_except(&[STRING_DELIMITER, ESCAPE_START]);
        let alternatives: [Alternative<'_, Self, char>; 2] = [&escaped, &plain];

        self.char(STRING_DELIMITER)?;
        let chars = self.many(0, None, |grammar| grammar.choose(&alternatives))?;
        self.char(STRING_DELIMITER)?;
        Ok(chars.into_iter().collect())
    }

    /// Either `>` alone, standing for one empty block, or one or more
    /// `<...>` blocks.
    fn children_list(
        &mut self,
        ctx: Context,
        plugin: &mut Option<Box<dyn SubParser>>,
    ) -> PResult<Vec<Nodes>> {
        if self.maybe(|grammar| grammar.char(CONTENT_END))?.is_some() {
            return Ok(vec![Nodes::new()]);
        }
        self.many(1, None, |grammar| {
            let open = grammar.scanner.mark();
            grammar.char(CONTENT_START)?;
            let children = grammar.nested(open, |grammar| match plugin.as_mut() {
                Some(plugin) => plugin.parse(grammar.scanner),
                None => grammar.nodes(ctx),
            })?;
            grammar.char(CONTENT_END)?;
            Ok(children)
        })
    }

    fn normal_element(&mut self, start: Mark, tag: Tag, blocks: Vec<Nodes>) -> PResult<Nodes> {
        if !tag.marks.multiple && blocks.len() > 1 {
            return Err(self
                .scanner
                .abort_at(start, Reason::MultipleElementBlocks(tag.name)));
        }
        Ok(blocks
            .into_iter()
            .map(|children| Element {
                name: tag.name.clone(),
                attributes: tag.attributes.clone(),
                children,
            })
            .map(Node::Element)
            .collect())
    }

    /// `\target?|...|<...>`
    ///
    /// `zml` reconfigures the grammar, `xml` is the XML declaration and any
    /// other target becomes a processing instruction whose content is the
    /// attributes followed by the block text.
    fn instruction(&mut self, start: Mark, tag: Tag, blocks: Vec<Nodes>) -> PResult<Nodes> {
        if blocks.len() > 1 {
            return Err(self
                .scanner
                .abort_at(start, Reason::MultipleInstructionBlocks(tag.name)));
        }
        let Tag {
            name, attributes, ..
        } = tag;

        if name == SYSTEM_INSTRUCTION_NAME {
            if let Some(version) = attributes.get("version") {
                self.state.set_version(version);
            }
            for kind in SpecialKind::ALL {
                if let Some(element) = attributes.get(kind.attribute_name()) {
                    self.state.set_special_name(kind, element);
                }
            }
            tracing::debug!(
                version = ?self.state.version(),
                brace = ?self.state.special_name(SpecialKind::Brace),
                bracket = ?self.state.special_name(SpecialKind::Bracket),
                slash = ?self.state.special_name(SpecialKind::Slash),
                "grammar reconfigured by system instruction"
            );
            return Ok(Nodes::new());
        }

        if name == "xml" {
            let declaration = XmlDeclaration::new(
                attributes.get("version"),
                attributes.get("encoding"),
                attributes.get("standalone"),
            );
            return Ok(Nodes::from(Node::from(declaration)));
        }

        let mut contents: Vec<String> = attributes
            .iter()
            .map(|(key, value)| format!("{key}=\"{value}\""))
            .collect();
        let text = blocks
            .first()
            .map(Nodes::text_content)
            .unwrap_or_default();
        if !text.is_empty() {
            contents.push(text);
        }
        let instruction = ProcessingInstruction::new(name, contents.join(" "));
        Ok(Nodes::from(Node::from(instruction)))
    }

    /// Splice in the expansion of `&name`.
    ///
    /// The macro registered under the name wins. Without one, a plugin of
    /// that name splices its first block unchanged.
    fn expand_macro(&mut self, start: Mark, tag: Tag, blocks: Vec<Nodes>) -> PResult<Nodes> {
        let registry = self.registry;
        let Tag {
            name, attributes, ..
        } = tag;

        if let Some(expander) = registry.expander(&name) {
            tracing::trace!(%name, blocks = blocks.len(), "expanding macro");
            return expander
                .expand(&attributes, blocks)
                .map_err(|source| self.scanner.abort(Reason::Expansion { name, source }));
        }
        if registry.plugin(&name).is_some() {
            return Ok(blocks.into_iter().next().unwrap_or_default());
        }
        Err(self.scanner.abort_at(start, Reason::NoSuchMacro(name)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{
        Attributes, Comment, Element, ExpandError, MAX_NESTING_DEPTH, Node, Nodes, Options,
        ParseError, Parser, ProcessingInstruction, Text, XmlDeclaration,
        error::Reason,
        grammar::test_utils::parse_nodes,
    };

    fn parse(input: &str) -> Result<Nodes, ParseError> {
        parse_nodes(input, &Options::default())
    }

    fn only_element(nodes: &Nodes) -> &Element {
        match nodes.as_slice() {
            [Node::Element(element)] => element,
            other => panic!("expected a single element, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_element() -> Result<(), ParseError> {
        let nodes = parse(r"\br>")?;
        assert_eq!(nodes, Nodes::from(Element::new("br")));
        Ok(())
    }

    #[test]
    fn test_attribute_order_and_values() -> Result<(), ParseError> {
        let nodes = parse(r#"\a|k1="v1",k2="v2"|<x>"#)?;
        let element = only_element(&nodes);
        let attributes: Vec<_> = element
            .attributes()
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
            .collect();
        assert_eq!(attributes, vec![("k1", "v1"), ("k2", "v2")]);
        assert_eq!(element.children(), &Nodes::from(Text::new("x")));
        Ok(())
    }

    #[test]
    fn test_attribute_spacing_shorthand_and_escapes() -> Result<(), ParseError> {
        let nodes = parse("\\a| b = \"say `\"hi`\"\" ,\n checked |>")?;
        let element = only_element(&nodes);
        assert_eq!(element.attribute("b"), Some("say \"hi\""));
        assert_eq!(element.attribute("checked"), Some("checked"));
        Ok(())
    }

    #[test]
    fn test_repeated_attribute_keeps_position_takes_last_value() -> Result<(), ParseError> {
        let nodes = parse(r#"\a|x="1",y="2",x="3"|>"#)?;
        let element = only_element(&nodes);
        let keys: Vec<_> = element.attributes().keys().collect();
        assert_eq!(keys, vec!["x", "y"]);
        assert_eq!(element.attribute("x"), Some("3"));
        Ok(())
    }

    #[test]
    fn test_unterminated_attributes_report_their_line() {
        let error = parse("\\p<ok>\n\\a|x=\"1\"\n<body>").unwrap_err();
        assert_eq!(error.line(), 3);
    }

    #[test]
    fn test_nested_elements() -> Result<(), ParseError> {
        let nodes = parse(r"\p<Hello \em<big> world>")?;
        let expected = Nodes::from(
            Element::new("p")
                .with_child(Text::new("Hello "))
                .with_child(Element::new("em").with_child(Text::new("big")))
                .with_child(Text::new(" world")),
        );
        assert_eq!(nodes, expected);
        Ok(())
    }

    #[test]
    fn test_multiple_blocks() -> Result<(), ParseError> {
        let nodes = parse(r"\repeat+<A><B><C>")?;
        let expected: Nodes = ["A", "B", "C"]
            .into_iter()
            .map(|value| Node::from(Element::new("repeat").with_child(Text::new(value))))
            .collect();
        assert_eq!(nodes, expected);
        Ok(())
    }

    #[test]
    fn test_multiple_blocks_share_attributes() -> Result<(), ParseError> {
        let nodes = parse(r#"\li+|class="x"|<a><b>"#)?;
        assert_eq!(nodes.len(), 2);
        for node in &nodes {
            let class = node.as_element().and_then(|element| element.attribute("class"));
            assert_eq!(class, Some("x"));
        }
        Ok(())
    }

    #[test]
    fn test_several_blocks_without_multiple_mark_fail() {
        let error = parse("text\n\\p<a><b>").unwrap_err();
        assert_eq!(error.reason, Reason::MultipleElementBlocks("p".to_string()));
        assert_eq!((error.line(), error.column()), (2, 1));
    }

    #[test]
    fn test_trim_mark_dedents_each_block() -> Result<(), ParseError> {
        let source = "\\pre*<\n    fn main() {\n        \\b<run>();\n    }\n  >";
        let nodes = parse(source)?;
        let expected = Nodes::from(
            Element::new("pre")
                .with_child(Text::new("fn main() {\n    "))
                .with_child(Element::new("b").with_child(Text::new("run")))
                .with_child(Text::new("();\n}")),
        );
        assert_eq!(nodes, expected);
        Ok(())
    }

    #[test]
    fn test_verbal_mark() -> Result<(), ParseError> {
        let nodes = parse(r"\c~<\x<y`>>")?;
        assert_eq!(
            nodes,
            Nodes::from(Element::new("c").with_child(Text::new(r"\x<y>")))
        );
        Ok(())
    }

    #[test]
    fn test_processing_instruction() -> Result<(), ParseError> {
        let nodes = parse(r#"\xml-stylesheet?|href="a.xsl",type="text/xsl"|>"#)?;
        assert_eq!(
            nodes,
            Nodes::from(Node::from(ProcessingInstruction::new(
                "xml-stylesheet",
                r#"href="a.xsl" type="text/xsl""#
            )))
        );
        let nodes = parse(r#"\php?|a="1"|<echo 1;>"#)?;
        assert_eq!(
            nodes,
            Nodes::from(Node::from(ProcessingInstruction::new(
                "php",
                r#"a="1" echo 1;"#
            )))
        );
        Ok(())
    }

    #[test]
    fn test_instruction_with_several_blocks_fails() {
        let error = parse(r"\pi?<a><b>").unwrap_err();
        assert_eq!(
            error.reason,
            Reason::MultipleInstructionBlocks("pi".to_string())
        );
    }

    #[test]
    fn test_xml_declaration() -> Result<(), ParseError> {
        let nodes = parse(r#"\xml?|encoding="UTF-8"|>"#)?;
        assert_eq!(
            nodes,
            Nodes::from(Node::from(XmlDeclaration::new(None, Some("UTF-8"), None)))
        );
        Ok(())
    }

    #[test]
    fn test_system_instruction_configures_and_absorbs_whitespace() -> Result<(), ParseError> {
        let source = "\\zml?|version=\"1.1\",brace=\"x\",slash=\"i\"|>\n\n{a}/b/\n";
        let parser = Parser::new();
        let document = parser.parse(source)?;
        assert_eq!(document.version.as_deref(), Some("1.1"));
        let expected: Nodes = vec![
            Node::from(Element::new("x").with_child(Text::new("a"))),
            Node::from(Element::new("i").with_child(Text::new("b"))),
            Node::from(Text::new("\n")),
        ]
        .into();
        assert_eq!(document.root, expected);
        Ok(())
    }

    #[test]
    fn test_system_instruction_does_not_leak_between_parses() -> Result<(), ParseError> {
        let parser = Parser::new();
        parser.parse("\\zml?|brace=\"x\"|>{a}")?;
        let document = parser.parse("{a}")?;
        assert_eq!(document.root, Nodes::from(Text::new("{a}")));
        assert_eq!(document.version, None);
        Ok(())
    }

    #[test]
    fn test_comments_between_elements() -> Result<(), ParseError> {
        let nodes = parse("\\a>#<c>#\\b>")?;
        let expected: Nodes = vec![
            Node::from(Element::new("a")),
            Node::from(Comment::new("c")),
            Node::from(Element::new("b")),
        ]
        .into();
        assert_eq!(nodes, expected);
        Ok(())
    }

    fn plus(attributes: &Attributes, _: Vec<Nodes>) -> Result<Nodes, ExpandError> {
        let operand = |name: &str| {
            attributes
                .get(name)
                .and_then(|value| value.parse::<i64>().ok())
                .ok_or_else(|| ExpandError::new(format!("attribute '{name}' is not a number")))
        };
        let sum = operand("a")? + operand("b")?;
        Ok(Element::new("sum").with_child(Text::new(sum.to_string())).into())
    }

    #[test]
    fn test_macro_expansion_is_spliced() -> Result<(), ParseError> {
        let mut parser = Parser::new();
        parser.register_macro("plus", plus);
        let document = parser.parse(r#"\p<1 &plus|a="2",b="3"|> end>"#)?;
        let expected = Nodes::from(
            Element::new("p")
                .with_child(Text::new("1 "))
                .with_child(Element::new("sum").with_child(Text::new("5")))
                .with_child(Text::new(" end")),
        );
        assert_eq!(document.root, expected);
        Ok(())
    }

    #[test]
    fn test_macro_receives_every_block() -> Result<(), ParseError> {
        let mut parser = Parser::new();
        parser.register_macro(
            "swap",
            |_: &Attributes, mut blocks: Vec<Nodes>| -> Result<Nodes, ExpandError> {
                blocks.reverse();
                let mut nodes = Nodes::new();
                for block in blocks {
                    nodes.append_all(block);
                }
                Ok(nodes)
            },
        );
        let document = parser.parse(r"&swap<a><\b>><c>")?;
        let expected: Nodes = vec![
            Node::from(Text::new("c")),
            Node::from(Element::new("b")),
            Node::from(Text::new("a")),
        ]
        .into();
        assert_eq!(document.root, expected);
        let document = parser.parse(r"&swap>")?;
        assert_eq!(document.root, Nodes::new());
        Ok(())
    }

    #[test]
    fn test_failing_macro() {
        let mut parser = Parser::new();
        parser.register_macro("plus", plus);
        let error = parser.parse(r#"&plus|a="x",b="1"|>"#).unwrap_err();
        assert_eq!(
            error.to_string(),
            "[line 1, column 20] macro 'plus' failed: attribute 'a' is not a number"
        );
    }

    fn nested_elements(depth: usize) -> String {
        format!("{}{}", "\\a<".repeat(depth), ">".repeat(depth))
    }

    #[test]
    fn test_nesting_up_to_the_limit() -> Result<(), ParseError> {
        let nodes = parse(&nested_elements(MAX_NESTING_DEPTH))?;
        let mut element = only_element(&nodes);
        let mut depth = 1;
        while let [Node::Element(child)] = element.children().as_slice() {
            element = child;
            depth += 1;
        }
        assert_eq!(depth, MAX_NESTING_DEPTH);
        Ok(())
    }

    #[test]
    fn test_nesting_past_the_limit_fails_at_the_opening_delimiter() {
        let error = parse(&nested_elements(MAX_NESTING_DEPTH + 1)).unwrap_err();
        assert_eq!(error.reason, Reason::NestingTooDeep(MAX_NESTING_DEPTH));
        assert_eq!(error.offset, 3 * (MAX_NESTING_DEPTH + 1) - 1);
    }

    #[test]
    fn test_deep_unclosed_input_fails_without_exhausting_the_stack() {
        let error = parse(&"\\a<".repeat(2000)).unwrap_err();
        assert_eq!(error.reason, Reason::NestingTooDeep(MAX_NESTING_DEPTH));
        assert_eq!(error.column(), 3 * (MAX_NESTING_DEPTH + 1));
    }

    #[test]
    fn test_unknown_macro_is_fatal() {
        let error = parse("ok\n  &nothing<x>").unwrap_err();
        assert_eq!(error.reason, Reason::NoSuchMacro("nothing".to_string()));
        assert_eq!((error.line(), error.column()), (2, 3));
    }
}
