//! Python grammar

use crate::diag::Warning;

use super::{LanguageGrammar, Token, TokenCategory};

static TOKENS: &[(TokenCategory, &[&str])] = &[
    (TokenCategory::NestedStart, &["["]),
    (TokenCategory::NestedEnd, &["]"]),
    (TokenCategory::NestedSeparator, &[","]),
];

static ALLOWED_NAMES: &[TokenCategory] = &[TokenCategory::Whitespace, TokenCategory::Name];

/// Grammar for Python type hints.
pub struct PythonGrammar;

impl LanguageGrammar for PythonGrammar {
    fn tag(&self) -> &'static str {
        "python"
    }

    fn tokens(&self) -> &'static [(TokenCategory, &'static [&'static str])] {
        TOKENS
    }

    fn token_boundaries(&self) -> &'static [char] {
        &['[', ']', ',', ' ', '\t', '\n', '\r', '\x0b', '\x0c']
    }

    fn allowed_prefixes(&self) -> Option<&'static [TokenCategory]> {
        None
    }

    fn allowed_suffixes(&self) -> Option<&'static [TokenCategory]> {
        None
    }

    fn allowed_names(&self) -> &'static [TokenCategory] {
        ALLOWED_NAMES
    }

    fn nesting_boundary(&self) -> Option<char> {
        Some('[')
    }

    fn namespace_separator(&self) -> Option<&'static str> {
        Some(".")
    }

    fn cleanup_name(&self, name: &str) -> String {
        name.replace("::", ".").replace('"', "").trim().to_string()
    }

    fn adapt_tokens(
        &self,
        mut tokens: Vec<Token>,
        side_tokens: Vec<Token>,
        _diag: &mut Vec<Warning>,
    ) -> Vec<Token> {
        if tokens.is_empty() {
            return tokens;
        }

        // Nested type hints arrive through a separate subscript field, and the
        // closing bracket can end up in the primary stream. Splice the side
        // run back in front of it.
        if !side_tokens.is_empty() {
            if tokens.last().is_some_and(Token::is_whitespace) {
                tokens.pop();
            }
            if tokens
                .last()
                .is_some_and(|t| t.category == TokenCategory::NestedEnd)
            {
                let close = tokens.pop().expect("just checked");
                tokens.extend(side_tokens);
                tokens.push(close);
            } else {
                tokens.extend(side_tokens);
            }
        }

        tokens.retain(|t| t.text != "def");
        tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tok(category: TokenCategory, text: &str) -> Token {
        Token::new(category, text)
    }

    fn adapt(tokens: Vec<Token>, side: Vec<Token>) -> Vec<Token> {
        let mut diag = Vec::new();
        PythonGrammar.adapt_tokens(tokens, side, &mut diag)
    }

    #[test]
    fn cleanup_unmangles_names() {
        assert_eq!(PythonGrammar.cleanup_name("pkg::mod::Class"), "pkg.mod.Class");
        assert_eq!(PythonGrammar.cleanup_name(" \"Widget\" "), "Widget");
    }

    #[test]
    fn side_tokens_splice_before_final_close() {
        // `List[]` with the subscript `str` delivered separately.
        let tokens = adapt(
            vec![
                tok(TokenCategory::Name, "List"),
                tok(TokenCategory::NestedStart, "["),
                tok(TokenCategory::NestedEnd, "]"),
                tok(TokenCategory::Whitespace, " "),
            ],
            vec![tok(TokenCategory::Name, "str")],
        );
        assert_eq!(
            tokens,
            vec![
                tok(TokenCategory::Name, "List"),
                tok(TokenCategory::NestedStart, "["),
                tok(TokenCategory::Name, "str"),
                tok(TokenCategory::NestedEnd, "]"),
            ]
        );
    }

    #[test]
    fn side_tokens_append_without_final_close() {
        let tokens = adapt(
            vec![tok(TokenCategory::Name, "List")],
            vec![
                tok(TokenCategory::NestedStart, "["),
                tok(TokenCategory::Name, "str"),
                tok(TokenCategory::NestedEnd, "]"),
            ],
        );
        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[0].text, "List");
        assert_eq!(tokens[3].category, TokenCategory::NestedEnd);
    }

    #[test]
    fn stray_def_is_filtered() {
        let tokens = adapt(
            vec![
                tok(TokenCategory::Name, "def"),
                tok(TokenCategory::Whitespace, " "),
                tok(TokenCategory::Name, "int"),
            ],
            Vec::new(),
        );
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].text, "int");
    }
}
