//! Language grammars for type-signature parsing
//!
//! One stateless descriptor per documented language:
//! - lexeme tables and token-boundary characters for the tokenizer
//! - allowed token categories per signature slot (prefix, name, suffix)
//! - name normalization, qualification, and namespace splitting
//! - post-lex token adaptation (separator reclassification and language
//!   specific fixups)
//!
//! Grammars are unit types implementing [`LanguageGrammar`] and are looked up
//! through [`for_tag`].

use crate::diag::Warning;

mod cpp;
mod java;
mod objc;
mod python;

pub use cpp::CppGrammar;
pub use java::JavaGrammar;
pub use objc::ObjectiveCGrammar;
pub use python::PythonGrammar;

/// Category of a token in a language grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenCategory {
    /// Unidentified token.
    Unknown,
    /// Whitespace between other tokens.
    Whitespace,
    /// Type qualifier.
    Qualifier,
    /// Operator applied to the type.
    Operator,
    /// Name of a type.
    Name,
    /// Start of a list of nested types.
    NestedStart,
    /// Separator between nested types.
    NestedSeparator,
    /// End of a list of nested types.
    NestedEnd,
    /// Type wildcard.
    Wildcard,
    /// Bounds limiting a wildcard.
    WildcardBounds,
    /// Token that must be dropped before structural parsing.
    Invalid,
    /// Separator between namespaces.
    NamespaceSeparator,
    /// Start of a list of argument types.
    ArgsStart,
    /// Separator between argument types.
    ArgsSeparator,
    /// End of a list of argument types.
    ArgsEnd,
    /// Name of an argument.
    ArgName,
    /// Generic separator, used when the same lexeme separates both nested
    /// types and arguments. Reclassified by [`adapt_separators`].
    Separator,
    /// Type name built into the language.
    BuiltInName,
    /// Block definition marker.
    Block,
    /// Annotation marker.
    Annotation,
}

/// A single token in a type signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Category in the language grammar.
    pub category: TokenCategory,
    /// Literal text of the token.
    pub text: String,
    /// Identifier of the element the token references, if known in advance.
    pub refid: Option<String>,
    /// Kind of the referenced element, if known in advance.
    pub kind: Option<String>,
}

impl Token {
    /// Create a plain token without reference information.
    pub fn new(category: TokenCategory, text: impl Into<String>) -> Self {
        Self {
            category,
            text: text.into(),
            refid: None,
            kind: None,
        }
    }

    /// True for whitespace tokens.
    pub fn is_whitespace(&self) -> bool {
        self.category == TokenCategory::Whitespace
    }
}

/// A block type extracted from a member's definition text.
///
/// The type fields are raw signature text, to be parsed like any other type
/// field of the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockDefinition {
    /// Name of the block type.
    pub name: String,
    /// Return type text.
    pub returns: String,
    /// Parameter type texts, in declaration order.
    pub args: Vec<String>,
}

/// Short and fully qualified names plus namespace for one element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementNames {
    /// Local name without namespace.
    pub short: String,
    /// Fully qualified name.
    pub full: String,
    /// Namespace part, if any.
    pub namespace: Option<String>,
}

/// Stateless description of one documented language.
///
/// Default implementations cover the common behavior; each language overrides
/// only the points where it deviates.
pub trait LanguageGrammar: Sync {
    /// Canonical tag identifying the language.
    fn tag(&self) -> &'static str;

    /// Lexeme table: the allowed lexemes for each token category, in lookup
    /// order.
    fn tokens(&self) -> &'static [(TokenCategory, &'static [&'static str])];

    /// Characters that end the preceding token and form a token themselves.
    fn token_boundaries(&self) -> &'static [char];

    /// True when one lexeme serves as both nested and argument separator.
    fn separators_overlap(&self) -> bool {
        false
    }

    /// Token categories allowed in a type prefix, or `None` to not collect a
    /// prefix at all.
    fn allowed_prefixes(&self) -> Option<&'static [TokenCategory]>;

    /// Token categories allowed in a type suffix, or `None` to not collect a
    /// suffix at all.
    fn allowed_suffixes(&self) -> Option<&'static [TokenCategory]>;

    /// Token categories allowed in a type name.
    fn allowed_names(&self) -> &'static [TokenCategory];

    /// Character opening a list of nested types.
    fn nesting_boundary(&self) -> Option<char>;

    /// Lexeme separating namespaces from names.
    fn namespace_separator(&self) -> Option<&'static str>;

    /// File extensions of source files, used to recognize file-scoped parents.
    fn file_extensions(&self) -> &'static [&'static str] {
        &[]
    }

    /// True if the type is built into the language and needs no resolution.
    fn is_builtin_type(&self, _name: &str) -> bool {
        false
    }

    /// Normalize a name that the extraction layer mangled.
    fn cleanup_name(&self, name: &str) -> String {
        name.to_string()
    }

    /// Local name of a possibly qualified name.
    fn short_name(&self, name: &str) -> String {
        self.namespace_and_name(name, None).1
    }

    /// Qualify a name with its parent, unless it already is or the parent is a
    /// source file.
    fn full_name(&self, name: &str, parent: &str, _kind: Option<&str>) -> String {
        qualify_name(self, name, parent)
    }

    /// Split a fully qualified name into namespace and short name.
    ///
    /// The name is cut at the nesting boundary first, so namespace separators
    /// inside nested type arguments are not mistaken for qualification.
    fn namespace_and_name(&self, full_name: &str, _kind: Option<&str>) -> (Option<String>, String) {
        split_namespace(self, full_name)
    }

    /// Compute short name, full name, and namespace for a raw element name.
    fn names(&self, raw_name: &str, parent_name: &str, kind: Option<&str>) -> ElementNames {
        let name = self.cleanup_name(raw_name);
        let full = self.full_name(&name, parent_name, kind);
        let (namespace, short) = self.namespace_and_name(&full, kind);
        ElementNames {
            short,
            full,
            namespace,
        }
    }

    /// True if a member must be dropped from its parent.
    fn is_member_excluded(&self, _kind: &str, _name: &str) -> bool {
        false
    }

    /// Recognize a member that redefines a block type in its definition text.
    ///
    /// Languages without block types never match.
    fn block_definition(&self, _kind: &str, _definition: &str) -> Option<BlockDefinition> {
        None
    }

    /// Turn a raw identifier into a globally unique, language-prefixed id.
    fn unique_id(&self, raw: Option<&str>) -> Option<String> {
        let raw = raw?;
        if raw.is_empty() {
            return None;
        }
        // Double underscores break anchor generation downstream.
        Some(format!("{}-{}", self.tag(), raw.replace("__", "-")))
    }

    /// Apply language specific token fixups after lexing.
    ///
    /// `side_tokens` carries the side-channel subscript run used by grammars
    /// that receive nested types through a separate record field.
    fn adapt_tokens(
        &self,
        mut tokens: Vec<Token>,
        _side_tokens: Vec<Token>,
        diag: &mut Vec<Warning>,
    ) -> Vec<Token> {
        if self.separators_overlap() {
            adapt_separators(&mut tokens, diag);
        }
        tokens
    }
}

/// Shared qualification logic behind [`LanguageGrammar::full_name`].
///
/// Free-standing so grammars with kind-specific overrides can still reach the
/// default behavior.
pub(crate) fn qualify_name<G: LanguageGrammar + ?Sized>(
    grammar: &G,
    name: &str,
    parent: &str,
) -> String {
    let Some(separator) = grammar.namespace_separator() else {
        return name.to_string();
    };
    if parent.is_empty() || name.starts_with(&format!("{parent}{separator}")) {
        return name.to_string();
    }
    if grammar
        .file_extensions()
        .iter()
        .any(|ext| parent.ends_with(ext))
    {
        return name.to_string();
    }
    format!("{parent}{separator}{name}")
}

/// Shared splitting logic behind [`LanguageGrammar::namespace_and_name`].
pub(crate) fn split_namespace<G: LanguageGrammar + ?Sized>(
    grammar: &G,
    full_name: &str,
) -> (Option<String>, String) {
    let Some(separator) = grammar.namespace_separator() else {
        return (None, full_name.to_string());
    };
    let (head, nested) = match grammar.nesting_boundary().and_then(|b| full_name.find(b)) {
        Some(at) => full_name.split_at(at),
        None => (full_name, ""),
    };
    match head.rfind(separator) {
        Some(at) => {
            let namespace = &head[..at];
            let name = &head[at + separator.len()..];
            (
                (!namespace.is_empty()).then(|| namespace.to_string()),
                format!("{name}{nested}"),
            )
        }
        None => (None, format!("{head}{nested}")),
    }
}

/// Look up the grammar for a canonical language tag.
pub fn for_tag(tag: &str) -> Option<&'static dyn LanguageGrammar> {
    match tag {
        "cpp" => Some(&CppGrammar),
        "java" => Some(&JavaGrammar),
        "objc" => Some(&ObjectiveCGrammar),
        "python" => Some(&PythonGrammar),
        _ => None,
    }
}

/// Normalize a language name to its canonical tag.
///
/// Alternate display spellings map to the registered tags, everything else is
/// only lowercased.
pub fn canonical_tag(name: &str) -> String {
    let name = name.to_lowercase();
    match name.as_str() {
        "c++" => "cpp".to_string(),
        "objective-c" => "objc".to_string(),
        _ => name,
    }
}

/// Reclassify generic separator tokens as nested or argument separators.
///
/// Walks the stream keeping a log of bracket events. Each separator is
/// attributed to the nearest unclosed bracket by scanning the log backwards
/// and cancelling matched close/open pairs. A separator outside any bracket
/// becomes [`TokenCategory::Unknown`] and a warning is recorded.
pub fn adapt_separators(tokens: &mut [Token], diag: &mut Vec<Warning>) {
    let mut scope_log = Vec::new();
    for i in 0..tokens.len() {
        match tokens[i].category {
            TokenCategory::NestedStart
            | TokenCategory::NestedEnd
            | TokenCategory::ArgsStart
            | TokenCategory::ArgsEnd => scope_log.push(tokens[i].category),
            TokenCategory::Separator
            | TokenCategory::NestedSeparator
            | TokenCategory::ArgsSeparator => match separator_category(&scope_log) {
                Some(category) => tokens[i].category = category,
                None => {
                    diag.push(Warning::StraySeparator {
                        index: i,
                        context: tokens.iter().map(|t| t.text.as_str()).collect(),
                    });
                    tokens[i].category = TokenCategory::Unknown;
                }
            },
            _ => {}
        }
    }
}

fn separator_category(scope_log: &[TokenCategory]) -> Option<TokenCategory> {
    let mut nested_ends = 0;
    let mut args_ends = 0;
    for category in scope_log.iter().rev() {
        match category {
            TokenCategory::NestedEnd => nested_ends += 1,
            TokenCategory::ArgsEnd => args_ends += 1,
            TokenCategory::NestedStart => {
                if nested_ends == 0 {
                    return Some(TokenCategory::NestedSeparator);
                }
                nested_ends -= 1;
            }
            TokenCategory::ArgsStart => {
                if args_ends == 0 {
                    return Some(TokenCategory::ArgsSeparator);
                }
                args_ends -= 1;
            }
            _ => {}
        }
    }
    None
}

/// One slot of a token search pattern.
pub(crate) struct PatternSlot {
    pub categories: &'static [TokenCategory],
    pub optional: bool,
}

impl PatternSlot {
    pub(crate) const fn required(categories: &'static [TokenCategory]) -> Self {
        Self {
            categories,
            optional: false,
        }
    }

    pub(crate) const fn optional(categories: &'static [TokenCategory]) -> Self {
        Self {
            categories,
            optional: true,
        }
    }
}

/// Find and rewrite every run of tokens matching a category pattern.
///
/// Matches are attempted at every start position, so they may overlap, and a
/// rewrite is visible to later match attempts. A pattern that runs off the end
/// of the stream does not match, even when the remaining slots are optional.
pub(crate) fn scan_tokens(
    tokens: &mut [Token],
    pattern: &[PatternSlot],
    mut apply: impl FnMut(&mut [Token]),
) {
    for start in 0..tokens.len() {
        let mut index = start;
        let mut matched = true;
        for slot in pattern {
            if index >= tokens.len() {
                matched = false;
                break;
            }
            if slot.categories.contains(&tokens[index].category) {
                index += 1;
            } else if slot.optional {
                continue;
            } else {
                matched = false;
                break;
            }
        }
        if matched {
            apply(&mut tokens[start..index]);
        }
    }
}
