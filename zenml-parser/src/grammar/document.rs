use crate::{
    Element, Node, Nodes,
    error::{Expected, Reason},
    grammar::{
        Context, Grammar,
        combinators::{Alternative, Combinators, PResult},
        lexical::SpecialKind,
    },
};

impl Grammar<'_, '_> {
    /// `document := nodes EOF`
    ///
    /// The end-of-input check is skipped when `exact` is off.
    pub(crate) fn document(&mut self, exact: bool) -> PResult<Nodes> {
        let nodes = self.nodes(Context::default())?;
        if exact {
            self.eof()?;
        }
        Ok(nodes)
    }

    /// Parse sibling nodes until nothing more applies.
    ///
    /// This never fails on a construct that does not start here; it stops
    /// and leaves the closing delimiter to the caller. Fatal failures of
    /// nested constructs propagate.
    pub(crate) fn nodes(&mut self, ctx: Context) -> PResult<Nodes> {
        if ctx.verbal {
            let texts = self.many(0, None, |grammar| grammar.text(ctx))?;
            return Ok(texts.into_iter().map(Node::from).collect());
        }

        let element = |grammar: &mut Self| grammar.element(ctx);
        let special = |grammar: &mut Self| grammar.special_element(ctx);
        let comment = |grammar: &mut Self| grammar.comment().map(Nodes::from);
        let text = |grammar: &mut Self| grammar.text(ctx).map(Nodes::from);
        let alternatives: [Alternative<'_, Self, Nodes>; 4] = [&element, &special, &comment, &text];

        let parsed = self.many(0, None, |grammar| grammar.choose(&alternatives))?;
        let mut nodes = Nodes::new();
        for part in parsed {
            nodes.append_all(part);
        }
        Ok(nodes)
    }

    /// A `{...}`, `[...]` or `/.../` shorthand for an element whose name is
    /// configured per kind.
    pub(crate) fn special_element(&mut self, ctx: Context) -> PResult<Nodes> {
        let kind = match self.scanner.peek().and_then(SpecialKind::from_start) {
            Some(SpecialKind::Slash) if ctx.in_slash => None,
            kind => kind,
        };
        let Some(kind) = kind else {
            return Err(self.scanner.fail(Expected::Class("special element")));
        };
        let Some(name) = self.state.special_name(kind).map(str::to_owned) else {
            return Err(self
                .scanner
                .failure(Reason::UnsetSpecialElement(kind), false));
        };

        let open = self.scanner.mark();
        self.char(kind.start())?;
        let inner = Context {
            verbal: false,
            in_slash: kind == SpecialKind::Slash,
        };
        let children = self.nested(open, |grammar| grammar.nodes(inner))?;
        self.char(kind.end())?;
        Ok(Element::new(name).with_children(children).into())
    }
}
