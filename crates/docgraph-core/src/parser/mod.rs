//! Tokenizer and structural parser for type signatures
//!
//! Raw signature text arrives as a sequence of [`SignatureSpan`]s per type
//! field. Parsing runs in stages:
//! 1. the tokenizer lexes every span into category-tagged tokens
//! 2. the grammar adapts the stream (separator reclassification and language
//!    fixups)
//! 3. the structural parser consumes slots (prefix, name, nested block,
//!    suffix, argument block) and assembles a [`TypeNode`] tree
//!
//! The structural parser also emits [`UnresolvedMark`]s: tree paths plus
//! lookup keys for every node that still needs an id, consumed later by the
//! resolver.

use crate::diag::Warning;
use crate::grammar::{LanguageGrammar, Token, TokenCategory};
use crate::model::{Parameter, PathStep, SignatureSpan, TypeNode};

mod error;

pub use error::SignatureError;

/// Split signature text into language grammar tokens.
///
/// Boundary characters cut the preceding run and become tokens themselves.
/// Whitespace normalizes to a single space and consecutive whitespace
/// collapses into one token. Non-boundary runs are classified by exact lexeme
/// lookup, defaulting to a name.
pub fn tokenize_text(grammar: &dyn LanguageGrammar, text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut run_start = 0;
    for (at, c) in text.char_indices() {
        if grammar.token_boundaries().contains(&c) {
            if at > run_start {
                push_text_token(grammar, &mut tokens, &text[run_start..at]);
            }
            let end = at + c.len_utf8();
            push_text_token(grammar, &mut tokens, &text[at..end]);
            run_start = end;
        }
    }
    if run_start < text.len() {
        push_text_token(grammar, &mut tokens, &text[run_start..]);
    }
    tokens
}

fn push_text_token(grammar: &dyn LanguageGrammar, tokens: &mut Vec<Token>, text: &str) {
    let token = make_text_token(grammar, text);
    if token.is_whitespace() && tokens.last().is_some_and(Token::is_whitespace) {
        return;
    }
    tokens.push(token);
}

fn make_text_token(grammar: &dyn LanguageGrammar, text: &str) -> Token {
    if text.chars().all(char::is_whitespace) {
        return Token::new(TokenCategory::Whitespace, " ");
    }
    for (category, lexemes) in grammar.tokens() {
        if lexemes.contains(&text) {
            return Token::new(*category, text);
        }
    }
    Token::new(TokenCategory::Name, text)
}

/// Tokenize a sequence of signature spans, preserving order.
///
/// A hyperlink span yields exactly one name token carrying its id and kind;
/// an empty-text span yields no token and records a warning.
pub fn tokenize_spans(
    grammar: &dyn LanguageGrammar,
    spans: &[SignatureSpan],
    diag: &mut Vec<Warning>,
) -> Vec<Token> {
    let mut tokens = Vec::new();
    for span in spans {
        match span {
            SignatureSpan::Text(text) => tokens.extend(tokenize_text(grammar, text)),
            SignatureSpan::Link { text, refid, kind } => {
                if text.is_empty() {
                    diag.push(Warning::EmptyLinkSpan {
                        refid: refid.clone(),
                    });
                } else {
                    tokens.push(Token {
                        category: TokenCategory::Name,
                        text: text.clone(),
                        refid: Some(refid.clone()),
                        kind: kind.clone(),
                    });
                }
            }
        }
    }
    tokens
}

/// A reference that could not be resolved while parsing.
///
/// Carries the path to the node inside the produced type tree plus the lookup
/// keys copied from it, so the node can be backfilled once the referenced
/// element is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedMark {
    /// Steps from the root of the parsed type tree to the node.
    pub steps: Vec<PathStep>,
    /// Name to look up.
    pub name: String,
    /// Namespace the reference appears in.
    pub namespace: Option<String>,
    /// Language of the reference.
    pub language: String,
}

/// Result of structurally parsing one type signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedType {
    /// Root of the type tree.
    pub node: TypeNode,
    /// References inside the tree that still need resolution.
    pub unresolved: Vec<UnresolvedMark>,
}

/// Structural parser for one language.
///
/// Holds the grammar and the warning sink; the parse itself is stateless.
pub struct TypeParser<'a> {
    grammar: &'static dyn LanguageGrammar,
    diag: &'a mut Vec<Warning>,
}

impl<'a> TypeParser<'a> {
    /// Create a parser for one grammar, collecting warnings into `diag`.
    pub fn new(grammar: &'static dyn LanguageGrammar, diag: &'a mut Vec<Warning>) -> Self {
        Self { grammar, diag }
    }

    /// Parse a type from signature spans, leniently.
    ///
    /// `side_spans` carries the side-channel subscript field some languages
    /// deliver nested types through. Returns `None` for empty or
    /// whitespace-only input. Malformed input degrades to an opaque fallback
    /// node, never an error.
    pub fn parse(
        &mut self,
        spans: &[SignatureSpan],
        side_spans: &[SignatureSpan],
        namespace: Option<&str>,
    ) -> Option<ParsedType> {
        let tokens = self.adapted_tokens(spans, side_spans);
        self.from_tokens(tokens, namespace)
    }

    /// Parse a type from signature spans, strictly.
    ///
    /// Like [`TypeParser::parse`], but an unterminated nested or argument
    /// block is reported as an error instead of falling back.
    pub fn parse_strict(
        &mut self,
        spans: &[SignatureSpan],
        side_spans: &[SignatureSpan],
        namespace: Option<&str>,
    ) -> Result<Option<ParsedType>, SignatureError> {
        let tokens = self.adapted_tokens(spans, side_spans);
        if tokens.is_empty() || tokens.iter().all(Token::is_whitespace) {
            return Ok(None);
        }
        self.structure_from_tokens(tokens, namespace)
    }

    /// Parse a type from an already adapted token stream, leniently.
    pub fn from_tokens(&mut self, tokens: Vec<Token>, namespace: Option<&str>) -> Option<ParsedType> {
        if tokens.is_empty() || tokens.iter().all(Token::is_whitespace) {
            return None;
        }
        let original_text: String = tokens.iter().map(|t| t.text.as_str()).collect();
        match self.structure_from_tokens(tokens, namespace) {
            Ok(parsed) => parsed,
            Err(err) => {
                self.diag.push(Warning::MalformedSignature {
                    text: original_text.clone(),
                    reason: err.to_string(),
                });
                Some(ParsedType {
                    node: self.fallback_node(original_text),
                    unresolved: Vec::new(),
                })
            }
        }
    }

    fn adapted_tokens(&mut self, spans: &[SignatureSpan], side_spans: &[SignatureSpan]) -> Vec<Token> {
        let tokens = tokenize_spans(self.grammar, spans, self.diag);
        let side_tokens = tokenize_spans(self.grammar, side_spans, self.diag);
        self.grammar.adapt_tokens(tokens, side_tokens, self.diag)
    }

    /// An opaque node holding the verbatim signature text.
    fn fallback_node(&self, text: String) -> TypeNode {
        TypeNode {
            name: text,
            ..TypeNode::new(self.grammar.tag())
        }
    }

    fn structure_from_tokens(
        &mut self,
        tokens: Vec<Token>,
        namespace: Option<&str>,
    ) -> Result<Option<ParsedType>, SignatureError> {
        if tokens.is_empty() || tokens.iter().all(Token::is_whitespace) {
            return Ok(None);
        }
        let original_text: String = tokens.iter().map(|t| t.text.as_str()).collect();

        let (mut prefixes, rest) = select_tokens(tokens, self.grammar.allowed_prefixes());
        drop_leading_whitespace(&mut prefixes);

        let (mut names, rest) = select_tokens(rest, Some(self.grammar.allowed_names()));
        drop_leading_whitespace(&mut names);
        let rest = return_trailing_whitespace(&mut names, rest);

        let (nested, rest) = self.nested_types(rest, namespace)?;

        let (mut suffixes, rest) = select_tokens(rest, self.grammar.allowed_suffixes());
        let rest = return_trailing_whitespace(&mut suffixes, rest);

        let (args, rest) = self.arg_types(rest, namespace)?;

        if names.is_empty() {
            self.diag.push(Warning::UnparsedSignature {
                text: original_text.clone(),
            });
            return Ok(Some(ParsedType {
                node: self.fallback_node(original_text),
                unresolved: Vec::new(),
            }));
        }

        if rest.iter().any(|t| !t.is_whitespace()) {
            self.diag.push(Warning::TrailingTokens {
                text: rest.iter().map(|t| t.text.as_str()).collect(),
                name: names.iter().map(|t| t.text.as_str()).collect(),
            });
            suffixes.extend(rest);
        }

        let name_text: String = names.iter().map(|t| t.text.as_str()).collect();
        let name = self.grammar.cleanup_name(&name_text);
        let prefix: String = prefixes.iter().map(|t| t.text.as_str()).collect();
        let suffix: String = suffixes.iter().map(|t| t.text.as_str()).collect();
        let id = self.grammar.unique_id(names[0].refid.as_deref());
        let kind = names[0].kind.clone();

        let (nested_nodes, nested_marks) = match nested {
            Some(parts) => {
                let (nodes, marks) = split_parts(parts, PathStep::Nested);
                (Some(nodes), marks)
            }
            None => (None, Vec::new()),
        };

        let tag = self.grammar.tag();
        let mut unresolved = Vec::new();
        let node = match args {
            Some(parts) => {
                // Callable shape: the matched slots describe the return type,
                // the block describes the parameters.
                let (arg_nodes, arg_marks) = split_args(parts);
                let returns = TypeNode {
                    id,
                    name,
                    kind,
                    prefix,
                    suffix,
                    nested: nested_nodes,
                    ..TypeNode::new(tag)
                };
                unresolved.extend(prefixed(nested_marks, PathStep::Returns));
                unresolved.extend(arg_marks);
                if let Some(mark) = self.self_mark(&returns, None, vec![PathStep::Returns]) {
                    unresolved.push(mark);
                }
                TypeNode {
                    kind: Some("closure".to_string()),
                    args: Some(arg_nodes),
                    returns: Some(Box::new(returns)),
                    namespace: namespace.map(str::to_string),
                    ..TypeNode::new(tag)
                }
            }
            None => {
                let node = TypeNode {
                    id,
                    name,
                    kind,
                    prefix,
                    suffix,
                    nested: nested_nodes,
                    namespace: namespace.map(str::to_string),
                    ..TypeNode::new(tag)
                };
                unresolved.extend(nested_marks);
                if let Some(mark) = self.self_mark(&node, namespace, Vec::new()) {
                    unresolved.push(mark);
                }
                node
            }
        };

        Ok(Some(ParsedType { node, unresolved }))
    }

    /// Mark a node for resolution if it is named, unreferenced, and not a
    /// language builtin.
    fn self_mark(
        &self,
        node: &TypeNode,
        namespace: Option<&str>,
        steps: Vec<PathStep>,
    ) -> Option<UnresolvedMark> {
        if node.name.is_empty() || node.id.is_some() || self.grammar.is_builtin_type(&node.name) {
            return None;
        }
        Some(UnresolvedMark {
            steps,
            name: node.name.clone(),
            namespace: namespace.map(str::to_string),
            language: self.grammar.tag().to_string(),
        })
    }

    /// Parse a nested-type block from the front of the stream, if present.
    #[allow(clippy::type_complexity)]
    fn nested_types(
        &mut self,
        tokens: Vec<Token>,
        namespace: Option<&str>,
    ) -> Result<(Option<Vec<ParsedType>>, Vec<Token>), SignatureError> {
        let (groups, rest) = select_block(
            tokens,
            TokenCategory::NestedStart,
            TokenCategory::NestedEnd,
            TokenCategory::NestedSeparator,
        )?;
        let Some(groups) = groups else {
            return Ok((None, rest));
        };
        let mut parts = Vec::new();
        for group in groups {
            if let Some(parsed) = self.from_tokens(group, namespace) {
                parts.push(parsed);
            }
        }
        Ok((Some(parts), rest))
    }

    /// Parse an argument block from the front of the stream, if present.
    #[allow(clippy::type_complexity)]
    fn arg_types(
        &mut self,
        tokens: Vec<Token>,
        namespace: Option<&str>,
    ) -> Result<(Option<Vec<(Parameter, Vec<UnresolvedMark>)>>, Vec<Token>), SignatureError> {
        let (groups, rest) = select_block(
            tokens,
            TokenCategory::ArgsStart,
            TokenCategory::ArgsEnd,
            TokenCategory::ArgsSeparator,
        )?;
        let Some(groups) = groups else {
            return Ok((None, rest));
        };
        let mut parts = Vec::new();
        for group in groups {
            if let Some(arg) = self.arg_from_tokens(group, namespace) {
                parts.push(arg);
            }
        }
        Ok((Some(parts), rest))
    }

    /// Parse one argument: a type followed by trailing argument-name tokens.
    fn arg_from_tokens(
        &mut self,
        mut tokens: Vec<Token>,
        namespace: Option<&str>,
    ) -> Option<(Parameter, Vec<UnresolvedMark>)> {
        if tokens.is_empty() || tokens.iter().all(Token::is_whitespace) {
            return None;
        }

        let mut name_tokens = Vec::new();
        while tokens
            .last()
            .is_some_and(|t| t.category == TokenCategory::ArgName)
        {
            name_tokens.push(tokens.pop().expect("just checked"));
        }
        name_tokens.reverse();
        let name: String = name_tokens.iter().map(|t| t.text.as_str()).collect();

        let (node, marks) = match self.from_tokens(tokens, namespace) {
            Some(parsed) => (Some(parsed.node), parsed.unresolved),
            None => (None, Vec::new()),
        };
        Some((
            Parameter {
                name,
                node,
                ..Parameter::default()
            },
            marks,
        ))
    }
}

/// Pick tokens from the front of the stream while they match the categories.
fn select_tokens(
    mut tokens: Vec<Token>,
    categories: Option<&[TokenCategory]>,
) -> (Vec<Token>, Vec<Token>) {
    match categories {
        Some(categories) if !categories.is_empty() => {
            let split = tokens
                .iter()
                .position(|t| !categories.contains(&t.category))
                .unwrap_or(tokens.len());
            let rest = tokens.split_off(split);
            (tokens, rest)
        }
        _ => (Vec::new(), tokens),
    }
}

fn drop_leading_whitespace(tokens: &mut Vec<Token>) {
    while tokens.first().is_some_and(Token::is_whitespace) {
        tokens.remove(0);
    }
}

/// Move trailing whitespace of a selected run back to the front of the
/// remaining stream.
fn return_trailing_whitespace(selected: &mut Vec<Token>, rest: Vec<Token>) -> Vec<Token> {
    let mut returned = Vec::new();
    while selected.last().is_some_and(Token::is_whitespace) {
        returned.push(selected.pop().expect("just checked"));
    }
    returned.extend(rest);
    returned
}

/// Cut a bracketed block from the front of the stream into separator-split
/// groups.
///
/// Returns `None` groups if the stream does not start with the block (after
/// optional whitespace), an empty group list for an empty block, and an error
/// if the block never closes.
#[allow(clippy::type_complexity)]
fn select_block(
    tokens: Vec<Token>,
    start: TokenCategory,
    end: TokenCategory,
    separator: TokenCategory,
) -> Result<(Option<Vec<Vec<Token>>>, Vec<Token>), SignatureError> {
    let entry_text: String = tokens.iter().map(|t| t.text.as_str()).collect();

    let mut opened_at = None;
    for (i, token) in tokens.iter().enumerate() {
        if token.is_whitespace() {
            continue;
        }
        if token.category == start {
            opened_at = Some(i);
        }
        break;
    }
    let Some(opened_at) = opened_at else {
        return Ok((None, tokens));
    };

    let mut work = tokens;
    work.drain(..=opened_at);

    let mut groups = Vec::new();
    loop {
        let mut level = 0u32;
        let mut cut = None;
        for (i, token) in work.iter().enumerate() {
            if token.category == start {
                level += 1;
            } else if level > 0 && token.category == end {
                level -= 1;
            } else if level == 0 && (token.category == separator || token.category == end) {
                cut = Some((i, token.category == end));
                break;
            }
        }
        let Some((at, closed)) = cut else {
            return Err(SignatureError::UnterminatedBlock { text: entry_text });
        };
        let mut rest = work.split_off(at);
        rest.remove(0);
        groups.push(work);
        work = rest;
        if closed {
            return Ok((Some(groups), work));
        }
        if work.is_empty() {
            return Err(SignatureError::UnterminatedBlock { text: entry_text });
        }
    }
}

/// Unzip parsed block entries, prefixing each entry's marks with its position.
fn split_parts(
    parts: Vec<ParsedType>,
    step: fn(usize) -> PathStep,
) -> (Vec<TypeNode>, Vec<UnresolvedMark>) {
    let mut nodes = Vec::new();
    let mut marks = Vec::new();
    for (i, part) in parts.into_iter().enumerate() {
        nodes.push(part.node);
        marks.extend(prefixed(part.unresolved, step(i)));
    }
    (nodes, marks)
}

fn split_args(
    parts: Vec<(Parameter, Vec<UnresolvedMark>)>,
) -> (Vec<Parameter>, Vec<UnresolvedMark>) {
    let mut nodes = Vec::new();
    let mut marks = Vec::new();
    for (i, (parameter, part_marks)) in parts.into_iter().enumerate() {
        nodes.push(parameter);
        marks.extend(prefixed(part_marks, PathStep::Arg(i)));
    }
    (nodes, marks)
}

fn prefixed(marks: Vec<UnresolvedMark>, step: PathStep) -> Vec<UnresolvedMark> {
    marks
        .into_iter()
        .map(|mut mark| {
            mark.steps.insert(0, step);
            mark
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::for_tag;
    use crate::model::SignatureSpan;

    fn parse_cpp(text: &str) -> (Option<ParsedType>, Vec<Warning>) {
        let mut diag = Vec::new();
        let parsed = TypeParser::new(for_tag("cpp").unwrap(), &mut diag).parse(
            &[SignatureSpan::text(text)],
            &[],
            None,
        );
        (parsed, diag)
    }

    #[test]
    fn tokenize_cpp_reference_type() {
        let tokens = tokenize_text(for_tag("cpp").unwrap(), "const MyType<OtherType>&");
        let expected = [
            (TokenCategory::Qualifier, "const"),
            (TokenCategory::Whitespace, " "),
            (TokenCategory::Name, "MyType"),
            (TokenCategory::NestedStart, "<"),
            (TokenCategory::Name, "OtherType"),
            (TokenCategory::NestedEnd, ">"),
            (TokenCategory::Operator, "&"),
        ];
        assert_eq!(tokens.len(), expected.len());
        for (token, (category, text)) in tokens.iter().zip(expected) {
            assert_eq!((token.category, token.text.as_str()), (category, text));
        }
    }

    #[test]
    fn tokenize_is_lossless_without_consecutive_whitespace() {
        let input = "const std::vector<MyType *> &";
        let tokens = tokenize_text(for_tag("cpp").unwrap(), input);
        let rebuilt: String = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(rebuilt, input);
    }

    #[test]
    fn tokenize_collapses_whitespace_runs() {
        let tokens = tokenize_text(for_tag("cpp").unwrap(), "long \t int");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[1].text, " ");
    }

    #[test]
    fn tokenize_empty_input() {
        assert!(tokenize_text(for_tag("cpp").unwrap(), "").is_empty());
    }

    #[test]
    fn link_span_yields_one_name_token() {
        let mut diag = Vec::new();
        let tokens = tokenize_spans(
            for_tag("cpp").unwrap(),
            &[
                SignatureSpan::text("const "),
                SignatureSpan::link("MyType", "classMyType", Some("compound")),
                SignatureSpan::text(" &"),
            ],
            &mut diag,
        );
        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[2].category, TokenCategory::Name);
        assert_eq!(tokens[2].refid.as_deref(), Some("classMyType"));
        assert_eq!(tokens[2].kind.as_deref(), Some("compound"));
        assert!(diag.is_empty());
    }

    #[test]
    fn empty_link_span_yields_warning() {
        let mut diag = Vec::new();
        let tokens = tokenize_spans(
            for_tag("cpp").unwrap(),
            &[SignatureSpan::link("", "classMyType", None)],
            &mut diag,
        );
        assert!(tokens.is_empty());
        assert_eq!(
            diag,
            vec![Warning::EmptyLinkSpan {
                refid: "classMyType".to_string(),
            }]
        );
    }

    #[test]
    fn parse_qualified_nested_type() {
        let (parsed, diag) = parse_cpp("const MyType<OtherType> &");
        let parsed = parsed.unwrap();
        assert_eq!(parsed.node.prefix, "const ");
        assert_eq!(parsed.node.name, "MyType");
        assert_eq!(parsed.node.suffix, " &");
        let nested = parsed.node.nested.as_ref().unwrap();
        assert_eq!(nested.len(), 1);
        assert_eq!(nested[0].name, "OtherType");
        assert!(diag.is_empty());

        // Both names are unknown, so both are marked.
        assert_eq!(parsed.unresolved.len(), 2);
        assert_eq!(parsed.unresolved[0].steps, vec![PathStep::Nested(0)]);
        assert_eq!(parsed.unresolved[0].name, "OtherType");
        assert_eq!(parsed.unresolved[1].steps, Vec::<PathStep>::new());
        assert_eq!(parsed.unresolved[1].name, "MyType");
    }

    #[test]
    fn builtin_types_are_not_marked() {
        let (parsed, _) = parse_cpp("const int &");
        assert!(parsed.unwrap().unresolved.is_empty());
    }

    #[test]
    fn linked_names_are_not_marked() {
        let mut diag = Vec::new();
        let parsed = TypeParser::new(for_tag("cpp").unwrap(), &mut diag)
            .parse(
                &[SignatureSpan::link("MyType", "classMyType", None)],
                &[],
                None,
            )
            .unwrap();
        assert_eq!(parsed.node.id.as_deref(), Some("cpp-classMyType"));
        assert!(parsed.unresolved.is_empty());
    }

    #[test]
    fn empty_and_whitespace_input_yield_none() {
        assert!(parse_cpp("").0.is_none());
        assert!(parse_cpp("   ").0.is_none());
    }

    #[test]
    fn empty_nested_block_is_distinguishable_from_absent() {
        let (parsed, _) = parse_cpp("MyType<>");
        assert_eq!(parsed.unwrap().node.nested, Some(Vec::new()));

        let (parsed, _) = parse_cpp("MyType");
        assert_eq!(parsed.unwrap().node.nested, None);
    }

    #[test]
    fn callable_type_assembles_returns_and_args() {
        let (parsed, _) = parse_cpp("void(int, MyType)");
        let parsed = parsed.unwrap();
        assert_eq!(parsed.node.name, "");
        assert_eq!(parsed.node.kind.as_deref(), Some("closure"));
        let returns = parsed.node.returns.as_ref().unwrap();
        assert_eq!(returns.name, "void");
        let args = parsed.node.args.as_ref().unwrap();
        assert_eq!(args.len(), 2);
        assert_eq!(args[1].node.as_ref().unwrap().name, "MyType");

        // Only the unknown argument type is marked, via its argument path.
        assert_eq!(parsed.unresolved.len(), 1);
        assert_eq!(parsed.unresolved[0].steps, vec![PathStep::Arg(1)]);
    }

    #[test]
    fn arg_names_end_up_on_parameters() {
        let (parsed, _) = parse_cpp("void(int count, MyType value)");
        let args = parsed.unwrap().node.args.unwrap();
        assert_eq!(args[0].name, "count");
        assert_eq!(args[0].node.as_ref().unwrap().name, "int");
        assert_eq!(args[1].name, "value");
        assert_eq!(args[1].node.as_ref().unwrap().name, "MyType");
    }

    #[test]
    fn unterminated_block_falls_back_to_opaque_node() {
        let (parsed, diag) = parse_cpp("MyType<Other");
        let parsed = parsed.unwrap();
        assert_eq!(parsed.node.name, "MyType<Other");
        assert_eq!(parsed.node.nested, None);
        assert!(parsed.node.id.is_none());
        assert!(parsed.unresolved.is_empty());
        assert!(matches!(diag[0], Warning::MalformedSignature { .. }));
    }

    #[test]
    fn unterminated_block_is_an_error_when_strict() {
        let mut diag = Vec::new();
        let result = TypeParser::new(for_tag("cpp").unwrap(), &mut diag).parse_strict(
            &[SignatureSpan::text("MyType<Other")],
            &[],
            None,
        );
        assert!(matches!(
            result,
            Err(SignatureError::UnterminatedBlock { .. })
        ));
    }

    #[test]
    fn no_name_falls_back_with_warning() {
        let (parsed, diag) = parse_cpp("**");
        assert_eq!(parsed.unwrap().node.name, "**");
        assert_eq!(
            diag,
            vec![Warning::UnparsedSignature {
                text: "**".to_string(),
            }]
        );
    }

    #[test]
    fn trailing_tokens_are_kept_in_suffix() {
        let mut diag = Vec::new();
        // A nested-end without a start never enters a block, so it trails.
        let tokens = vec![
            Token::new(TokenCategory::Name, "MyType"),
            Token::new(TokenCategory::NestedEnd, ">"),
        ];
        let parsed = TypeParser::new(for_tag("cpp").unwrap(), &mut diag)
            .from_tokens(tokens, None)
            .unwrap();
        assert_eq!(parsed.node.suffix, ">");
        assert!(matches!(diag[0], Warning::TrailingTokens { .. }));
    }

    #[test]
    fn namespace_is_attached_to_the_top_node_only() {
        let mut diag = Vec::new();
        let parsed = TypeParser::new(for_tag("cpp").unwrap(), &mut diag)
            .parse(&[SignatureSpan::text("MyType")], &[], Some("ns"))
            .unwrap();
        assert_eq!(parsed.node.namespace.as_deref(), Some("ns"));
        assert_eq!(parsed.unresolved[0].namespace.as_deref(), Some("ns"));
    }

    #[test]
    fn python_side_channel_rebuilds_generics() {
        let mut diag = Vec::new();
        let parsed = TypeParser::new(for_tag("python").unwrap(), &mut diag)
            .parse(
                &[SignatureSpan::text("List[]")],
                &[SignatureSpan::text("str")],
                None,
            )
            .unwrap();
        assert_eq!(parsed.node.name, "List");
        let nested = parsed.node.nested.unwrap();
        assert_eq!(nested.len(), 1);
        assert_eq!(nested[0].name, "str");
    }

    #[test]
    fn segment_count_follows_depth_zero_separators() {
        let (parsed, _) = parse_cpp("Map<Key, std::pair<A, B>>");
        let nested = parsed.unwrap().node.nested.unwrap();
        assert_eq!(nested.len(), 2);
        assert_eq!(nested[1].name, "std::pair");
        assert_eq!(nested[1].nested.as_ref().unwrap().len(), 2);
    }
}
