//! Java grammar

use crate::diag::Warning;

use super::{scan_tokens, LanguageGrammar, PatternSlot, Token, TokenCategory};

const BUILT_IN_TYPES: &[&str] = &[
    "void", "long", "int", "boolean", "byte", "char", "short", "float", "double", "String",
];
const COMMON_GENERIC_NAMES: &[&str] = &["T", "?", "T ", "? "];

static TOKENS: &[(TokenCategory, &[&str])] = &[
    (TokenCategory::NestedStart, &["<"]),
    (TokenCategory::NestedEnd, &[">"]),
    (TokenCategory::NestedSeparator, &[","]),
    (
        TokenCategory::Qualifier,
        &["final", "synchronized", "transient"],
    ),
    (TokenCategory::WildcardBounds, &["extends", "super"]),
    (TokenCategory::Invalid, &["private"]),
];

static ALLOWED_PREFIXES: &[TokenCategory] = &[
    TokenCategory::Whitespace,
    TokenCategory::Operator,
    TokenCategory::Qualifier,
    TokenCategory::Wildcard,
    TokenCategory::WildcardBounds,
    TokenCategory::Unknown,
    TokenCategory::Annotation,
];

static ALLOWED_SUFFIXES: &[TokenCategory] = &[TokenCategory::Whitespace];

static ALLOWED_NAMES: &[TokenCategory] = &[TokenCategory::Whitespace, TokenCategory::Name];

static NAME_ONLY: &[TokenCategory] = &[TokenCategory::Name];
static WHITESPACE_ONLY: &[TokenCategory] = &[TokenCategory::Whitespace];
static BOUNDS_ONLY: &[TokenCategory] = &[TokenCategory::WildcardBounds];

static WILDCARD_PATTERN: &[PatternSlot] = &[
    PatternSlot::required(NAME_ONLY),
    PatternSlot::required(WHITESPACE_ONLY),
    PatternSlot::required(BOUNDS_ONLY),
];

/// Grammar for Java type signatures.
pub struct JavaGrammar;

impl LanguageGrammar for JavaGrammar {
    fn tag(&self) -> &'static str {
        "java"
    }

    fn tokens(&self) -> &'static [(TokenCategory, &'static [&'static str])] {
        TOKENS
    }

    fn token_boundaries(&self) -> &'static [char] {
        &['<', '>', ',', ' ', '\t', '\n', '\r', '\x0b', '\x0c']
    }

    fn allowed_prefixes(&self) -> Option<&'static [TokenCategory]> {
        Some(ALLOWED_PREFIXES)
    }

    fn allowed_suffixes(&self) -> Option<&'static [TokenCategory]> {
        Some(ALLOWED_SUFFIXES)
    }

    fn allowed_names(&self) -> &'static [TokenCategory] {
        ALLOWED_NAMES
    }

    fn nesting_boundary(&self) -> Option<char> {
        Some('<')
    }

    fn namespace_separator(&self) -> Option<&'static str> {
        Some(".")
    }

    fn is_builtin_type(&self, name: &str) -> bool {
        BUILT_IN_TYPES.contains(&name)
            || COMMON_GENERIC_NAMES.contains(&name)
            || name.starts_with("java.")
            || name.starts_with("android.")
            || name.starts_with("native ")
    }

    fn cleanup_name(&self, name: &str) -> String {
        name.replace("::", ".").trim().to_string()
    }

    fn adapt_tokens(
        &self,
        mut tokens: Vec<Token>,
        _side_tokens: Vec<Token>,
        _diag: &mut Vec<Warning>,
    ) -> Vec<Token> {
        tokens.retain(|t| t.category != TokenCategory::Invalid);
        mark_separate_wildcard_bounds(&mut tokens);
        detect_wildcards(&mut tokens);
        detect_annotations(&mut tokens);
        tokens
    }
}

/// Demote a leading bounds block to unclassified prefix text.
///
/// Separate wildcard bounds (`<T extends Base> T`) are not supported as
/// structure; everything before the first depth-0 name stays literal.
fn mark_separate_wildcard_bounds(tokens: &mut [Token]) {
    let mut nested = 0;
    for token in tokens {
        if nested == 0 && token.category == TokenCategory::Name {
            break;
        } else if token.category == TokenCategory::NestedStart {
            nested += 1;
            token.category = TokenCategory::Unknown;
        } else if token.category == TokenCategory::NestedEnd {
            nested -= 1;
            token.category = TokenCategory::Unknown;
        } else if nested > 0 {
            token.category = TokenCategory::Unknown;
        }
    }
}

fn detect_wildcards(tokens: &mut [Token]) {
    scan_tokens(tokens, WILDCARD_PATTERN, |window| {
        window[0].category = TokenCategory::Wildcard;
    });
}

fn detect_annotations(tokens: &mut [Token]) {
    for token in tokens {
        if token.category != TokenCategory::Name || token.text.is_empty() {
            continue;
        }
        if token.text.starts_with("__AT__") && token.text.ends_with("__") {
            token.category = TokenCategory::Annotation;
            token.text = format!("@{}", &token.text[6..token.text.len() - 2]);
        } else if token.text.starts_with('@') {
            token.category = TokenCategory::Annotation;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tok(category: TokenCategory, text: &str) -> Token {
        Token::new(category, text)
    }

    fn adapt(tokens: Vec<Token>) -> Vec<Token> {
        let mut diag = Vec::new();
        JavaGrammar.adapt_tokens(tokens, Vec::new(), &mut diag)
    }

    #[test]
    fn builtin_types() {
        assert!(JavaGrammar.is_builtin_type("String"));
        assert!(JavaGrammar.is_builtin_type("T"));
        assert!(JavaGrammar.is_builtin_type("java.util.List"));
        assert!(JavaGrammar.is_builtin_type("android.os.Bundle"));
        assert!(!JavaGrammar.is_builtin_type("com.example.Widget"));
    }

    #[test]
    fn cleanup_maps_scope_operator_to_dot() {
        assert_eq!(
            JavaGrammar.cleanup_name("com::example::Widget "),
            "com.example.Widget"
        );
    }

    #[test]
    fn leading_bounds_block_is_demoted() {
        // <T extends Base> T
        let tokens = adapt(vec![
            tok(TokenCategory::NestedStart, "<"),
            tok(TokenCategory::Name, "T"),
            tok(TokenCategory::Whitespace, " "),
            tok(TokenCategory::WildcardBounds, "extends"),
            tok(TokenCategory::Whitespace, " "),
            tok(TokenCategory::Name, "Base"),
            tok(TokenCategory::NestedEnd, ">"),
            tok(TokenCategory::Whitespace, " "),
            tok(TokenCategory::Name, "T"),
        ]);
        for token in &tokens[..7] {
            assert_ne!(token.category, TokenCategory::NestedStart);
            assert_ne!(token.category, TokenCategory::NestedEnd);
            assert_ne!(token.category, TokenCategory::Name);
        }
        assert_eq!(tokens[8].category, TokenCategory::Name);
    }

    #[test]
    fn wildcard_bound_names_are_retagged() {
        // List<? extends Base>
        let tokens = adapt(vec![
            tok(TokenCategory::Name, "List"),
            tok(TokenCategory::NestedStart, "<"),
            tok(TokenCategory::Name, "?"),
            tok(TokenCategory::Whitespace, " "),
            tok(TokenCategory::WildcardBounds, "extends"),
            tok(TokenCategory::Whitespace, " "),
            tok(TokenCategory::Name, "Base"),
            tok(TokenCategory::NestedEnd, ">"),
        ]);
        assert_eq!(tokens[2].category, TokenCategory::Wildcard);
        assert_eq!(tokens[6].category, TokenCategory::Name);
    }

    #[test]
    fn mangled_annotations_are_normalized() {
        let tokens = adapt(vec![
            tok(TokenCategory::Name, "__AT__Nullable__"),
            tok(TokenCategory::Whitespace, " "),
            tok(TokenCategory::Name, "@NonNull"),
            tok(TokenCategory::Whitespace, " "),
            tok(TokenCategory::Name, "String"),
        ]);
        assert_eq!(tokens[0].category, TokenCategory::Annotation);
        assert_eq!(tokens[0].text, "@Nullable");
        assert_eq!(tokens[2].category, TokenCategory::Annotation);
        assert_eq!(tokens[2].text, "@NonNull");
        assert_eq!(tokens[4].category, TokenCategory::Name);
    }

    #[test]
    fn private_is_filtered() {
        let tokens = adapt(vec![
            tok(TokenCategory::Invalid, "private"),
            tok(TokenCategory::Whitespace, " "),
            tok(TokenCategory::Name, "Widget"),
        ]);
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].text, "Widget");
    }
}
