//! Objective-C grammar

use std::sync::OnceLock;

use regex::Regex;

use crate::diag::Warning;

use super::{
    adapt_separators, qualify_name, scan_tokens, split_namespace, BlockDefinition, LanguageGrammar,
    PatternSlot, Token, TokenCategory,
};

const BUILT_IN_TYPES: &[&str] = &[
    "char",
    "unsigned char",
    "signed char",
    "int",
    "short",
    "long",
    "float",
    "double",
    "void",
    "bool",
    "BOOL",
    "id",
    "instancetype",
    "short int",
    "signed short",
    "signed short int",
    "unsigned short",
    "unsigned short int",
    "signed int",
    "unsigned int",
    "long int",
    "signed long",
    "signed long int",
    "unsigned long",
    "unsigned long int",
    "long long",
    "long long int",
    "signed long long",
    "signed long long int",
    "unsigned long long",
    "unsigned long long int",
    "long double",
];

const NAMESPACE_LESS_KINDS: &[&str] = &["enum", "enumvalue", "interface", "protocol"];

static TOKENS: &[(TokenCategory, &[&str])] = &[
    (TokenCategory::NestedStart, &["<"]),
    (TokenCategory::NestedEnd, &[">"]),
    (TokenCategory::ArgsStart, &["("]),
    (TokenCategory::ArgsEnd, &[")"]),
    (TokenCategory::Separator, &[","]),
    (TokenCategory::Operator, &["*"]),
    (
        TokenCategory::Qualifier,
        &[
            "nullable",
            "const",
            "__weak",
            "__strong",
            "__nonnull",
            "_Nullable",
            "_Nonnull",
            "__autoreleasing",
        ],
    ),
    (
        TokenCategory::BuiltInName,
        &[
            "char",
            "unsigned",
            "signed",
            "int",
            "short",
            "long",
            "float",
            "double",
            "void",
            "bool",
            "BOOL",
            "id",
            "instancetype",
        ],
    ),
    (TokenCategory::Block, &["^"]),
];

static ALLOWED_PREFIXES: &[TokenCategory] =
    &[TokenCategory::Whitespace, TokenCategory::Qualifier];

static ALLOWED_SUFFIXES: &[TokenCategory] = &[
    TokenCategory::Whitespace,
    TokenCategory::Operator,
    TokenCategory::Qualifier,
    TokenCategory::ArgName,
];

static ALLOWED_NAMES: &[TokenCategory] = &[
    TokenCategory::Whitespace,
    TokenCategory::Name,
    TokenCategory::BuiltInName,
];

static ARGS_START_ONLY: &[TokenCategory] = &[TokenCategory::ArgsStart];
static ARGS_END_ONLY: &[TokenCategory] = &[TokenCategory::ArgsEnd];
static BLOCK_ONLY: &[TokenCategory] = &[TokenCategory::Block];
static NAME_ONLY: &[TokenCategory] = &[TokenCategory::Name];
static WHITESPACE_ONLY: &[TokenCategory] = &[TokenCategory::Whitespace];
static ARGS_CLOSE: &[TokenCategory] = &[TokenCategory::ArgsEnd, TokenCategory::ArgsSeparator];

static ARG_NAME_LEAD: &[TokenCategory] = &[
    TokenCategory::NestedEnd,
    TokenCategory::Whitespace,
    TokenCategory::Name,
    TokenCategory::BuiltInName,
];

static LONE_BLOCK_PATTERN: &[PatternSlot] = &[
    PatternSlot::required(ARGS_START_ONLY),
    PatternSlot::optional(WHITESPACE_ONLY),
    PatternSlot::required(BLOCK_ONLY),
    PatternSlot::optional(WHITESPACE_ONLY),
    PatternSlot::required(ARGS_END_ONLY),
];

static ARG_NAME_PATTERN: &[PatternSlot] = &[
    PatternSlot::required(ARG_NAME_LEAD),
    PatternSlot::required(ALLOWED_SUFFIXES),
    PatternSlot::optional(ALLOWED_SUFFIXES),
    PatternSlot::optional(ALLOWED_SUFFIXES),
    PatternSlot::optional(ALLOWED_SUFFIXES),
    PatternSlot::optional(ALLOWED_SUFFIXES),
    PatternSlot::optional(ALLOWED_SUFFIXES),
    PatternSlot::optional(ALLOWED_SUFFIXES),
    PatternSlot::required(NAME_ONLY),
    PatternSlot::optional(WHITESPACE_ONLY),
    PatternSlot::required(ARGS_CLOSE),
];

/// Grammar for Objective-C type signatures.
pub struct ObjectiveCGrammar;

impl LanguageGrammar for ObjectiveCGrammar {
    fn tag(&self) -> &'static str {
        "objc"
    }

    fn tokens(&self) -> &'static [(TokenCategory, &'static [&'static str])] {
        TOKENS
    }

    fn token_boundaries(&self) -> &'static [char] {
        &[
            '<', '>', '(', ')', ',', '*', '^', ' ', '\t', '\n', '\r', '\x0b', '\x0c',
        ]
    }

    fn separators_overlap(&self) -> bool {
        true
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

    fn file_extensions(&self) -> &'static [&'static str] {
        &[".h", ".m", ".mm"]
    }

    fn is_builtin_type(&self, name: &str) -> bool {
        BUILT_IN_TYPES.contains(&name) || name.starts_with("NS")
    }

    fn cleanup_name(&self, name: &str) -> String {
        // Doxygen appends -p to protocol names.
        name.strip_suffix("-p").unwrap_or(name).to_string()
    }

    fn full_name(&self, name: &str, parent: &str, kind: Option<&str>) -> String {
        if kind.is_some_and(|k| NAMESPACE_LESS_KINDS.contains(&k)) {
            return name.to_string();
        }
        qualify_name(self, name, parent)
    }

    fn namespace_and_name(&self, full_name: &str, kind: Option<&str>) -> (Option<String>, String) {
        if kind.is_some_and(|k| NAMESPACE_LESS_KINDS.contains(&k)) {
            return (None, full_name.to_string());
        }
        split_namespace(self, full_name)
    }

    fn is_member_excluded(&self, kind: &str, name: &str) -> bool {
        kind == "function" && name == "NS_ENUM"
    }

    /// Variables and typedefs carrying a `^` in their definition redefine a
    /// block type. The extraction layer reports them as plain members, so the
    /// name, return type, and parameters are recovered from the definition
    /// text.
    fn block_definition(&self, kind: &str, definition: &str) -> Option<BlockDefinition> {
        if !matches!(kind, "variable" | "typedef") || !definition.contains('^') {
            return None;
        }

        static BLOCK: OnceLock<Regex> = OnceLock::new();
        let block = BLOCK.get_or_init(|| {
            Regex::new(r"typedef (.+)\(\^(.+)\)\s*\((.*)\)").expect("valid pattern")
        });
        let captures = block.captures(definition)?;

        let args = captures[3].trim();
        Some(BlockDefinition {
            name: captures[2].trim().to_string(),
            returns: captures[1].to_string(),
            args: if args.is_empty() {
                Vec::new()
            } else {
                args.split(',').map(|arg| arg.trim().to_string()).collect()
            },
        })
    }

    fn adapt_tokens(
        &self,
        mut tokens: Vec<Token>,
        _side_tokens: Vec<Token>,
        diag: &mut Vec<Warning>,
    ) -> Vec<Token> {
        adapt_separators(&mut tokens, diag);

        // A lone `(^)` marks a block without adding structure.
        scan_tokens(&mut tokens, LONE_BLOCK_PATTERN, |window| {
            for token in window {
                token.category = TokenCategory::Invalid;
            }
        });

        scan_tokens(&mut tokens, ARG_NAME_PATTERN, |window| {
            let n = window.len();
            if window[n - 2].category == TokenCategory::Name {
                window[n - 2].category = TokenCategory::ArgName;
            } else if window[n - 3].category == TokenCategory::Name {
                window[n - 3].category = TokenCategory::ArgName;
            }
        });

        tokens.retain(|t| t.category != TokenCategory::Invalid);
        tokens
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
        ObjectiveCGrammar.adapt_tokens(tokens, Vec::new(), &mut diag)
    }

    #[test]
    fn builtin_types() {
        assert!(ObjectiveCGrammar.is_builtin_type("instancetype"));
        assert!(ObjectiveCGrammar.is_builtin_type("NSString"));
        assert!(!ObjectiveCGrammar.is_builtin_type("MyWidget"));
    }

    #[test]
    fn cleanup_strips_protocol_suffix() {
        assert_eq!(ObjectiveCGrammar.cleanup_name("Convertible-p"), "Convertible");
        assert_eq!(ObjectiveCGrammar.cleanup_name("Widget"), "Widget");
    }

    #[test]
    fn interfaces_have_no_namespace() {
        let names = ObjectiveCGrammar.names("Widget", "Parent", Some("interface"));
        assert_eq!(names.full, "Widget");
        assert_eq!(names.namespace, None);

        let names = ObjectiveCGrammar.names("update", "Widget", Some("method"));
        assert_eq!(names.full, "Widget.update");
        assert_eq!(names.namespace.as_deref(), Some("Widget"));
    }

    #[test]
    fn header_file_parent_is_not_prepended() {
        let names = ObjectiveCGrammar.names("WidgetCreate", "Widget.h", Some("function"));
        assert_eq!(names.full, "WidgetCreate");
        assert_eq!(names.namespace, None);
    }

    #[test]
    fn lone_block_marker_is_discarded() {
        // void (^)(int)
        let tokens = adapt(vec![
            tok(TokenCategory::BuiltInName, "void"),
            tok(TokenCategory::Whitespace, " "),
            tok(TokenCategory::ArgsStart, "("),
            tok(TokenCategory::Block, "^"),
            tok(TokenCategory::ArgsEnd, ")"),
            tok(TokenCategory::ArgsStart, "("),
            tok(TokenCategory::BuiltInName, "int"),
            tok(TokenCategory::ArgsEnd, ")"),
        ]);
        assert_eq!(
            tokens,
            vec![
                tok(TokenCategory::BuiltInName, "void"),
                tok(TokenCategory::Whitespace, " "),
                tok(TokenCategory::ArgsStart, "("),
                tok(TokenCategory::BuiltInName, "int"),
                tok(TokenCategory::ArgsEnd, ")"),
            ]
        );
    }

    #[test]
    fn block_typedef_is_recognized_in_definitions() {
        let block = ObjectiveCGrammar
            .block_definition("typedef", "typedef void (^Handler)(int)")
            .unwrap();
        assert_eq!(block.name, "Handler");
        assert_eq!(block.returns.trim(), "void");
        assert_eq!(block.args, vec!["int".to_string()]);

        let block = ObjectiveCGrammar
            .block_definition(
                "variable",
                "typedef NSString *(^Transform)(NSString *input, BOOL flag)",
            )
            .unwrap();
        assert_eq!(block.name, "Transform");
        assert_eq!(block.returns.trim(), "NSString *");
        assert_eq!(block.args.len(), 2);
        assert_eq!(block.args[0], "NSString *input");
    }

    #[test]
    fn block_detection_requires_matching_kind_and_marker() {
        let grammar = ObjectiveCGrammar;
        assert!(grammar
            .block_definition("function", "typedef void (^Handler)(int)")
            .is_none());
        assert!(grammar
            .block_definition("typedef", "typedef int Counter")
            .is_none());
        // A caret alone is not enough without the typedef shape.
        assert!(grammar.block_definition("variable", "int ^x").is_none());

        let empty_args = grammar
            .block_definition("typedef", "typedef void (^Done)()")
            .unwrap();
        assert!(empty_args.args.is_empty());
    }

    #[test]
    fn trailing_arg_names_are_retagged() {
        // (NSString *name)
        let tokens = adapt(vec![
            tok(TokenCategory::ArgsStart, "("),
            tok(TokenCategory::Name, "NSString"),
            tok(TokenCategory::Whitespace, " "),
            tok(TokenCategory::Operator, "*"),
            tok(TokenCategory::Name, "name"),
            tok(TokenCategory::ArgsEnd, ")"),
        ]);
        assert_eq!(tokens[4].category, TokenCategory::ArgName);
        assert_eq!(tokens[1].category, TokenCategory::Name);
    }
}
