//! Symbol store and lookup
//!
//! All documented elements accumulate in one append-only arena. Lookup runs
//! over two indexes:
//! - a unique-id index, one element per id
//! - a short-name multimap, many elements per local name
//!
//! [`SymbolStore::find`] layers name, kind, language, and parameter-signature
//! filters over the short-name candidates, then disambiguates leftover
//! overload sets.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use crate::model::{DocumentedElement, ElementId};

/// Separators recognized when splitting qualified names, in preference order.
const NAMESPACE_SEPARATORS: [&str; 2] = ["::", "."];

/// Error when an element cannot be added to the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The element carries no unique id.
    #[error("element has no id")]
    MissingId,
    /// The element carries no name.
    #[error("element has no name")]
    MissingName,
    /// Another element with the same id is already stored.
    #[error("id `{id}` is already in use")]
    DuplicateId {
        /// The contested id.
        id: String,
    },
}

/// More than one element matches a query.
///
/// Carries all candidate handles so the caller can narrow the query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} elements match the query", candidates.len())]
pub struct AmbiguousMatch {
    /// Handles of all matching elements.
    pub candidates: Vec<ElementId>,
}

/// Search query for [`SymbolStore::find`].
///
/// The name may carry a parameter signature `Base(T1, T2)` to disambiguate
/// between overloads. When `target_id` is set, every other field is ignored.
#[derive(Debug, Clone, Default)]
pub struct Query<'a> {
    name: Option<&'a str>,
    namespace: Option<&'a str>,
    kind: Option<&'a str>,
    language: Option<&'a str>,
    target_id: Option<&'a str>,
    allow_overloads: bool,
}

impl<'a> Query<'a> {
    /// Query by element name.
    pub fn for_name(name: &'a str) -> Self {
        Self {
            name: Some(name),
            ..Self::default()
        }
    }

    /// Query by unique id.
    pub fn for_id(target_id: &'a str) -> Self {
        Self {
            target_id: Some(target_id),
            ..Self::default()
        }
    }

    /// Namespace to start searching from.
    #[must_use]
    pub fn namespace(mut self, namespace: &'a str) -> Self {
        self.namespace = Some(namespace);
        self
    }

    /// Required element kind.
    #[must_use]
    pub fn kind(mut self, kind: &'a str) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Required element language.
    #[must_use]
    pub fn language(mut self, language: &'a str) -> Self {
        self.language = Some(language);
        self
    }

    /// Prefer an id lookup when an id is known.
    #[must_use]
    pub fn target_id(mut self, target_id: &'a str) -> Self {
        self.target_id = Some(target_id);
        self
    }

    /// Return the first element of a consistent overload set instead of
    /// failing.
    #[must_use]
    pub fn allow_overloads(mut self, allow: bool) -> Self {
        self.allow_overloads = allow;
        self
    }
}

/// Append-only arena of documented elements with id and name indexes.
#[derive(Debug, Default)]
pub struct SymbolStore {
    elements: Vec<DocumentedElement>,
    id_index: HashMap<String, ElementId>,
    name_index: HashMap<String, Vec<ElementId>>,
}

impl SymbolStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an element and index it by id and short name.
    pub fn append(&mut self, element: DocumentedElement) -> Result<ElementId, StoreError> {
        let id = match &element.id {
            Some(id) if !id.is_empty() => id.clone(),
            _ => return Err(StoreError::MissingId),
        };
        if element.name.is_empty() {
            return Err(StoreError::MissingName);
        }
        if self.id_index.contains_key(&id) {
            return Err(StoreError::DuplicateId { id });
        }

        let handle = ElementId(self.elements.len());
        self.id_index.insert(id, handle);
        self.name_index
            .entry(element.name.clone())
            .or_default()
            .push(handle);
        self.elements.push(element);
        Ok(handle)
    }

    /// The element behind a handle.
    pub fn get(&self, id: ElementId) -> Option<&DocumentedElement> {
        self.elements.get(id.0)
    }

    /// The element behind a handle, mutably.
    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut DocumentedElement> {
        self.elements.get_mut(id.0)
    }

    /// Iterate over all elements with their handles.
    pub fn iter(&self) -> impl Iterator<Item = (ElementId, &DocumentedElement)> {
        self.elements
            .iter()
            .enumerate()
            .map(|(i, e)| (ElementId(i), e))
    }

    /// Number of stored elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// True if no element has been stored.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Find the element matching a query.
    ///
    /// Returns `Ok(None)` when nothing matches and [`AmbiguousMatch`] when
    /// several elements match and cannot be disambiguated.
    pub fn find(&self, query: &Query<'_>) -> Result<Option<ElementId>, AmbiguousMatch> {
        if let Some(target_id) = query.target_id {
            return Ok(self.id_index.get(target_id).copied());
        }
        let Some(raw_name) = query.name else {
            return Ok(None);
        };

        let signature = SignatureSpec::parse(raw_name);
        let name = match &signature.arg_types {
            Some(_) => signature.name.as_str(),
            None => raw_name,
        };

        let short_name = short_name(name);
        let Some(candidates) = self.name_index.get(short_name) else {
            return Ok(None);
        };

        let name_filter = NameFilter::new(name, query.namespace);
        let matches: Vec<ElementId> = candidates
            .iter()
            .copied()
            .filter(|&id| {
                let element = &self.elements[id.0];
                name_filter.matches(&element.full_name)
                    && query.kind.map_or(true, |kind| element.kind == kind)
                    && query
                        .language
                        .map_or(true, |language| element.language == language)
                    && signature.params_match(element)
            })
            .collect();

        if matches.len() == 1 {
            return Ok(Some(matches[0]));
        }
        if matches.is_empty() {
            return Ok(None);
        }

        if query.namespace.is_some() {
            let exact: Vec<ElementId> = matches
                .iter()
                .copied()
                .filter(|&id| name_filter.matches_exact(&self.elements[id.0].full_name))
                .collect();
            if exact.len() == 1 {
                return Ok(Some(exact[0]));
            }

            let bare: Vec<ElementId> = matches
                .iter()
                .copied()
                .filter(|&id| self.elements[id.0].full_name == name)
                .collect();
            if bare.len() == 1 {
                return Ok(Some(bare[0]));
            }
        }

        if query.allow_overloads {
            let first = &self.elements[matches[0].0];
            if matches.iter().all(|&id| {
                let element = &self.elements[id.0];
                element.full_name == first.full_name
                    && element.kind == first.kind
                    && element.language == first.language
            }) {
                return Ok(Some(matches[0]));
            }
        }

        Err(AmbiguousMatch { candidates: matches })
    }
}

/// Local name of a possibly qualified name: the last segment after the first
/// recognized separator.
fn short_name(name: &str) -> &str {
    for separator in NAMESPACE_SEPARATORS {
        if name.contains(separator) {
            return name
                .rsplit_once(separator)
                .map_or(name, |(_, short)| short);
        }
    }
    name
}

/// Split a qualified name into trimmed, non-empty segments.
///
/// The first recognized separator present in the name wins; a name without
/// separators is a single verbatim segment.
fn split_segments(name: &str) -> Vec<String> {
    for separator in NAMESPACE_SEPARATORS {
        if name.contains(separator) {
            return name
                .split(separator)
                .filter(|part| !part.trim().is_empty())
                .map(|part| part.trim().to_string())
                .collect();
        }
    }
    vec![name.to_string()]
}

/// Filter on the (qualified) name of an element.
struct NameFilter<'a> {
    name: &'a str,
    namespace: Option<&'a str>,
    name_parts: Vec<String>,
    namespace_parts: Vec<String>,
}

impl<'a> NameFilter<'a> {
    fn new(name: &'a str, namespace: Option<&'a str>) -> Self {
        let (name_parts, namespace_parts) = match namespace {
            Some(namespace) => (split_segments(name), split_segments(namespace)),
            None => (Vec::new(), Vec::new()),
        };
        Self {
            name,
            namespace,
            name_parts,
            namespace_parts,
        }
    }

    /// Match a fully qualified name against the query name, searching upward
    /// from the namespace hint.
    fn matches(&self, full_name: &str) -> bool {
        if self.namespace.is_none() {
            return full_name == self.name;
        }
        if !full_name.ends_with(self.name) {
            return false;
        }

        let full_parts = split_segments(full_name);
        if full_parts.len() < self.name_parts.len() {
            return false;
        }
        let split = full_parts.len() - self.name_parts.len();
        if full_parts[split..] != self.name_parts[..] {
            return false;
        }
        let remaining = &full_parts[..split];
        if remaining.is_empty() {
            return true;
        }
        self.namespace_parts.len() >= remaining.len()
            && self.namespace_parts[..remaining.len()] == *remaining
    }

    /// Match only the exact reconstruction: namespace segments directly
    /// followed by name segments.
    fn matches_exact(&self, full_name: &str) -> bool {
        if self.namespace.is_none() || !full_name.ends_with(self.name) {
            return false;
        }
        let full_parts = split_segments(full_name);
        full_parts.len() == self.namespace_parts.len() + self.name_parts.len()
            && full_parts[..self.namespace_parts.len()] == self.namespace_parts[..]
            && full_parts[self.namespace_parts.len()..] == self.name_parts[..]
    }
}

/// Parsed `Base(T1, T2, ...)` query name.
struct SignatureSpec {
    name: String,
    arg_types: Option<Vec<String>>,
}

impl SignatureSpec {
    fn parse(spec: &str) -> Self {
        let args_start = spec.find('(');
        let args_end = spec.rfind(')');
        match (args_start, args_end) {
            (Some(start), Some(end)) if start < end => Self {
                name: normalize(&spec[..start]),
                arg_types: Some(split_args(&spec[start + 1..end])),
            },
            // No valid argument specification, match on the whole name.
            _ => Self {
                name: spec.to_string(),
                arg_types: None,
            },
        }
    }

    /// Compare the expected parameter types against an element's parameters.
    fn params_match(&self, element: &DocumentedElement) -> bool {
        let Some(arg_types) = &self.arg_types else {
            return true;
        };
        if arg_types.is_empty() {
            return element.params.is_empty();
        }
        if arg_types.len() != element.params.len() {
            return false;
        }
        arg_types
            .iter()
            .zip(&element.params)
            .all(|(expected, param)| {
                param
                    .node
                    .as_ref()
                    .is_some_and(|node| normalize(&node.to_string()) == *expected)
            })
    }
}

/// Split an argument list at top-level commas, balance-aware across all
/// bracket styles.
fn split_args(spec: &str) -> Vec<String> {
    if spec.trim().is_empty() {
        return Vec::new();
    }
    if !spec.contains(',') {
        return vec![normalize(spec)];
    }

    let mut args = Vec::new();
    let mut depth = 0i32;
    let mut segment_start = 0;
    for (at, c) in spec.char_indices() {
        match c {
            '(' | '{' | '[' | '<' => depth += 1,
            ')' | '}' | ']' | '>' => depth -= 1,
            ',' if depth == 0 => {
                args.push(normalize(&spec[segment_start..at]));
                segment_start = at + 1;
            }
            _ => {}
        }
    }
    let tail = &spec[segment_start..];
    if !tail.trim().is_empty() {
        args.push(normalize(tail));
    }
    args
}

/// Collapse whitespace runs, then remove whitespace touching non-word
/// characters.
fn normalize(name: &str) -> String {
    static WS_RUN: OnceLock<Regex> = OnceLock::new();
    static WORD_NONWORD: OnceLock<Regex> = OnceLock::new();
    static NONWORD_WORD: OnceLock<Regex> = OnceLock::new();
    static NONWORD_NONWORD: OnceLock<Regex> = OnceLock::new();

    let ws_run = WS_RUN.get_or_init(|| Regex::new(r"\s+").expect("valid pattern"));
    let word_nonword =
        WORD_NONWORD.get_or_init(|| Regex::new(r"(\w)\s(\W)").expect("valid pattern"));
    let nonword_word =
        NONWORD_WORD.get_or_init(|| Regex::new(r"(\W)\s(\w)").expect("valid pattern"));
    let nonword_nonword =
        NONWORD_NONWORD.get_or_init(|| Regex::new(r"(\W)\s(\W)").expect("valid pattern"));

    let name = ws_run.replace_all(name.trim(), " ");
    let name = word_nonword.replace_all(&name, "${1}${2}");
    let name = nonword_word.replace_all(&name, "${1}${2}");
    nonword_nonword.replace_all(&name, "${1}${2}").into_owned()
}
