//! Batch resolution of queued cross-references
//!
//! The parser marks type nodes it cannot identify; the ingest layer turns
//! those marks into queue entries against stored elements. [`Resolver::resolve`]
//! drains the queues in two passes: typed references first, then inner-type
//! placements. Entries that still cannot be resolved stay queued so a later
//! run, after more input arrived, can pick them up.

use crate::diag::Warning;
use crate::grammar;
use crate::model::{ElementId, PathStep, TypeSlot};
use crate::store::{Query, SymbolStore};

/// A type reference inside a stored element that still needs an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedRef {
    /// Element owning the type tree.
    pub element: ElementId,
    /// Which type-bearing field the tree lives in.
    pub slot: TypeSlot,
    /// Path from the root of that tree to the node.
    pub steps: Vec<PathStep>,
    /// Name to look up.
    pub name: String,
    /// Namespace the reference appears in.
    pub namespace: Option<String>,
    /// Language of the reference.
    pub language: String,
}

/// A reference from a compound to an inner type that is stored separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedInnerRef {
    /// Element that should list the inner type as a member.
    pub parent: ElementId,
    /// Unique id of the inner type, when the input reported one.
    pub id: Option<String>,
    /// Name of the inner type.
    pub name: String,
    /// Namespace to search from.
    pub namespace: Option<String>,
    /// Language of the reference.
    pub language: String,
    /// Visibility to copy onto the inner type once found.
    pub visibility: String,
}

/// Counts for one [`Resolver::resolve`] run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveReport {
    /// Queue sizes at the start of the run.
    pub total: usize,
    /// Entries resolved during the run.
    pub resolved: usize,
    /// Entries still queued after the run.
    pub unresolved: usize,
}

/// Queues of unresolved references, drained against a symbol store.
#[derive(Debug, Default)]
pub struct Resolver {
    type_refs: Vec<QueuedRef>,
    inner_refs: Vec<QueuedInnerRef>,
}

impl Resolver {
    /// Create a resolver with empty queues.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a typed reference for the next resolution run.
    pub fn queue_ref(&mut self, queued: QueuedRef) {
        self.type_refs.push(queued);
    }

    /// Queue an inner-type placement for the next resolution run.
    pub fn queue_inner_ref(&mut self, queued: QueuedInnerRef) {
        self.inner_refs.push(queued);
    }

    /// Number of entries waiting in both queues.
    pub fn pending(&self) -> usize {
        self.type_refs.len() + self.inner_refs.len()
    }

    /// Resolve queued references against the store.
    ///
    /// Never fails; an ambiguous or missing target leaves the entry queued.
    pub fn resolve(&mut self, store: &mut SymbolStore, diag: &mut Vec<Warning>) -> ResolveReport {
        let total = self.pending();
        let mut resolved = 0;

        for queued in std::mem::take(&mut self.type_refs) {
            match lookup(store, &queued.name, queued.namespace.as_deref(), &queued.language, diag) {
                Some(target) => {
                    backfill(store, &queued, target);
                    resolved += 1;
                }
                None => self.type_refs.push(queued),
            }
        }

        for queued in std::mem::take(&mut self.inner_refs) {
            match lookup_inner(store, &queued, diag) {
                Some(child) => {
                    if !queued.visibility.is_empty() {
                        if let Some(element) = store.get_mut(child) {
                            element.visibility = queued.visibility.clone();
                        }
                    }
                    if let Some(parent) = store.get_mut(queued.parent) {
                        parent.members.push(child);
                    }
                    resolved += 1;
                }
                None => self.inner_refs.push(queued),
            }
        }

        ResolveReport {
            total,
            resolved,
            unresolved: self.pending(),
        }
    }
}

/// Copy the id and kind of the found element into the queued node.
fn backfill(store: &mut SymbolStore, queued: &QueuedRef, target: ElementId) {
    let Some((id, kind)) = store
        .get(target)
        .map(|e| (e.id.clone(), Some(e.kind.clone())))
    else {
        return;
    };
    if let Some(element) = store.get_mut(queued.element) {
        if let Some(node) = element.type_node_mut(queued.slot, &queued.steps) {
            node.id = id;
            node.kind = kind;
        }
    }
}

/// Scoped lookup with a partial-match fallback.
///
/// An ambiguous store answer counts as not found. The fallback accepts a
/// single element whose full name ends in the queued name behind a namespace
/// separator; several such elements record a warning and resolve nothing.
fn lookup(
    store: &SymbolStore,
    name: &str,
    namespace: Option<&str>,
    language: &str,
    diag: &mut Vec<Warning>,
) -> Option<ElementId> {
    let mut query = Query::for_name(name).language(language);
    if let Some(namespace) = namespace {
        query = query.namespace(namespace);
    }
    if let Ok(Some(found)) = store.find(&query) {
        return Some(found);
    }

    let separator = grammar::for_tag(language)
        .and_then(grammar::LanguageGrammar::namespace_separator)
        .unwrap_or("::");
    let suffix = format!("{separator}{name}");
    let mut matches = store.iter().filter_map(|(id, element)| {
        (element.language == language
            && (element.full_name == name || element.full_name.ends_with(&suffix)))
        .then_some(id)
    });
    let first = matches.next()?;
    if matches.next().is_some() {
        diag.push(Warning::MultiplePartialMatches {
            name: name.to_string(),
        });
        return None;
    }
    Some(first)
}

fn lookup_inner(
    store: &SymbolStore,
    queued: &QueuedInnerRef,
    diag: &mut Vec<Warning>,
) -> Option<ElementId> {
    if let Some(id) = queued.id.as_deref() {
        if let Ok(Some(found)) = store.find(&Query::for_id(id)) {
            return Some(found);
        }
    }
    lookup(
        store,
        &queued.name,
        queued.namespace.as_deref(),
        &queued.language,
        diag,
    )
}
