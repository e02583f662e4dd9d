use crate::{
    Options,
    grammar::lexical::{
        COMMENT_DELIMITER, CONTENT_END, CONTENT_START, ELEMENT_START, ESCAPE_START, MACRO_START,
        SpecialKind,
    },
};

/// Characters that end a plain text run in verbal content.
const VERBAL_STOPS: &[char] = &[ESCAPE_START, CONTENT_END];

/// Characters that end a plain text run in non-verbal content, followed by
/// the delimiters of the enabled special elements.
macro_rules! markup_stops {
    ($($delimiter:expr),*) => {
        &[
            ESCAPE_START,
            CONTENT_END,
            ELEMENT_START,
            MACRO_START,
            CONTENT_START,
            COMMENT_DELIMITER,
            $($delimiter),*
        ]
    };
}

/// The mutable state of one parse.
///
/// It starts from the parser options and is changed by `zml` system
/// instructions as they are read.
#[derive(Debug, Clone)]
pub(crate) struct GrammarState {
    version: Option<String>,
    brace_name: Option<String>,
    bracket_name: Option<String>,
    slash_name: Option<String>,
    /// Characters that end a plain text run in non-verbal content. Depends on
    /// which special elements are enabled, so it is reselected when one is
    /// named.
    text_stops: &'static [char],
}

impl GrammarState {
    pub(crate) fn new(options: &Options) -> Self {
        let mut state = Self {
            version: options.version.clone(),
            brace_name: options.brace_name.clone(),
            bracket_name: options.bracket_name.clone(),
            slash_name: options.slash_name.clone(),
            text_stops: VERBAL_STOPS,
        };
        state.rebuild_text_stops();
        state
    }

    pub(crate) fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub(crate) fn set_version(&mut self, version: impl Into<String>) {
        self.version = Some(version.into());
    }

    pub(crate) fn into_version(self) -> Option<String> {
        self.version
    }

    pub(crate) fn special_name(&self, kind: SpecialKind) -> Option<&str> {
        match kind {
            SpecialKind::Brace => self.brace_name.as_deref(),
            SpecialKind::Bracket => self.bracket_name.as_deref(),
            SpecialKind::Slash => self.slash_name.as_deref(),
        }
    }

    pub(crate) fn set_special_name(&mut self, kind: SpecialKind, name: impl Into<String>) {
        let slot = match kind {
            SpecialKind::Brace => &mut self.brace_name,
            SpecialKind::Bracket => &mut self.bracket_name,
            SpecialKind::Slash => &mut self.slash_name,
        };
        *slot = Some(name.into());
        self.rebuild_text_stops();
    }

    pub(crate) fn text_stops(&self, verbal: bool) -> &'static [char] {
        if verbal {
            VERBAL_STOPS
        } else {
            self.text_stops
        }
    }

    fn rebuild_text_stops(&mut self) {
        let enabled = (
            self.brace_name.is_some(),
            self.bracket_name.is_some(),
            self.slash_name.is_some(),
        );
        let stops: &'static [char] = match enabled {
            (false, false, false) => markup_stops!(),
            (true, false, false) => markup_stops!('{', '}'),
            (false, true, false) => markup_stops!('[', ']'),
            (true, true, false) => markup_stops!('{', '}', '[', ']'),
            (false, false, true) => markup_stops!('/'),
            (true, false, true) => markup_stops!('{', '}', '/'),
            (false, true, true) => markup_stops!('[', ']', '/'),
            (true, true, true) => markup_stops!('{', '}', '[', ']', '/'),
        };
        self.text_stops = stops;
    }
}
