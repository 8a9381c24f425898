//! C++ grammar

use crate::diag::Warning;

use super::{
    adapt_separators, scan_tokens, LanguageGrammar, PatternSlot, Token, TokenCategory,
};

const BUILT_IN_TYPES: &[&str] = &[
    "void",
    "bool",
    "signed char",
    "unsigned char",
    "char",
    "wchar_t",
    "char16_t",
    "char32_t",
    "char8_t",
    "float",
    "double",
    "long double",
    "short",
    "short int",
    "signed short",
    "signed short int",
    "unsigned short",
    "unsigned short int",
    "int",
    "signed",
    "signed int",
    "unsigned",
    "unsigned int",
    "long",
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
];

static TOKENS: &[(TokenCategory, &[&str])] = &[
    (TokenCategory::NestedStart, &["<"]),
    (TokenCategory::NestedEnd, &[">"]),
    (TokenCategory::ArgsStart, &["("]),
    (TokenCategory::ArgsEnd, &[")"]),
    (TokenCategory::Separator, &[","]),
    (TokenCategory::Operator, &["*", "&", "..."]),
    (
        TokenCategory::Qualifier,
        &["const", "volatile", "mutable", "enum", "class"],
    ),
    (
        TokenCategory::BuiltInName,
        &[
            "void", "bool", "signed", "unsigned", "char", "wchar_t", "char16_t", "char32_t",
            "char8_t", "float", "double", "long", "short", "int",
        ],
    ),
    // constexpr must not end up in a return type.
    (TokenCategory::Invalid, &["constexpr"]),
];

static ALLOWED_PREFIXES: &[TokenCategory] = &[
    TokenCategory::Whitespace,
    TokenCategory::Operator,
    TokenCategory::Qualifier,
    TokenCategory::Invalid,
];

static ALLOWED_SUFFIXES: &[TokenCategory] = &[
    TokenCategory::Whitespace,
    TokenCategory::Operator,
    TokenCategory::Qualifier,
    TokenCategory::Name,
    TokenCategory::NamespaceSeparator,
    TokenCategory::Invalid,
];

static ALLOWED_NAMES: &[TokenCategory] = &[
    TokenCategory::Whitespace,
    TokenCategory::Name,
    TokenCategory::NamespaceSeparator,
    TokenCategory::BuiltInName,
];

// Slot categories for the trailing argument-name window.
static ARG_NAME_LEAD: &[TokenCategory] = &[
    TokenCategory::NestedEnd,
    TokenCategory::Whitespace,
    TokenCategory::Name,
    TokenCategory::NamespaceSeparator,
    TokenCategory::BuiltInName,
];
static SUFFIXES_WITHOUT_NAME: &[TokenCategory] = &[
    TokenCategory::Whitespace,
    TokenCategory::Operator,
    TokenCategory::Qualifier,
    TokenCategory::Invalid,
];
static NAME_ONLY: &[TokenCategory] = &[TokenCategory::Name];
static WHITESPACE_ONLY: &[TokenCategory] = &[TokenCategory::Whitespace];
static ARGS_CLOSE: &[TokenCategory] = &[TokenCategory::ArgsEnd, TokenCategory::ArgsSeparator];

static ARG_NAME_PATTERN: &[PatternSlot] = &[
    PatternSlot::required(ARG_NAME_LEAD),
    PatternSlot::required(SUFFIXES_WITHOUT_NAME),
    PatternSlot::optional(SUFFIXES_WITHOUT_NAME),
    PatternSlot::optional(SUFFIXES_WITHOUT_NAME),
    PatternSlot::optional(SUFFIXES_WITHOUT_NAME),
    PatternSlot::optional(SUFFIXES_WITHOUT_NAME),
    PatternSlot::optional(SUFFIXES_WITHOUT_NAME),
    PatternSlot::optional(SUFFIXES_WITHOUT_NAME),
    PatternSlot::required(NAME_ONLY),
    PatternSlot::optional(WHITESPACE_ONLY),
    PatternSlot::required(ARGS_CLOSE),
];

/// Grammar for C++ type signatures.
pub struct CppGrammar;

impl LanguageGrammar for CppGrammar {
    fn tag(&self) -> &'static str {
        "cpp"
    }

    fn tokens(&self) -> &'static [(TokenCategory, &'static [&'static str])] {
        TOKENS
    }

    fn token_boundaries(&self) -> &'static [char] {
        &[
            '<', '>', '(', ')', ',', '*', '&', ':', ' ', '\t', '\n', '\r', '\x0b', '\x0c',
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
        Some("::")
    }

    fn file_extensions(&self) -> &'static [&'static str] {
        &[".h", ".hpp", ".c", ".cpp"]
    }

    fn is_builtin_type(&self, name: &str) -> bool {
        BUILT_IN_TYPES.contains(&name) || name.starts_with("std::")
    }

    fn is_member_excluded(&self, kind: &str, _name: &str) -> bool {
        kind == "friend"
    }

    fn adapt_tokens(
        &self,
        mut tokens: Vec<Token>,
        _side_tokens: Vec<Token>,
        diag: &mut Vec<Warning>,
    ) -> Vec<Token> {
        adapt_separators(&mut tokens, diag);
        tokens.retain(|t| t.category != TokenCategory::Invalid);

        scan_tokens(&mut tokens, ARG_NAME_PATTERN, |window| {
            let n = window.len();
            if window[n - 2].category == TokenCategory::Name {
                window[n - 2].category = TokenCategory::ArgName;
            } else if window[n - 3].category == TokenCategory::Name {
                window[n - 3].category = TokenCategory::ArgName;
            }
        });

        // Typedefs for function types can leave a trailing `(*` or `(* name`.
        if tokens.len() > 2
            && tokens[tokens.len() - 2].category == TokenCategory::ArgsStart
            && tokens[tokens.len() - 1].category == TokenCategory::Operator
        {
            tokens.truncate(tokens.len() - 2);
        }
        if tokens.len() > 3
            && tokens[tokens.len() - 3].category == TokenCategory::ArgsStart
            && tokens[tokens.len() - 2].category == TokenCategory::Operator
        {
            tokens.truncate(tokens.len() - 3);
        }

        tokens
    }
}
