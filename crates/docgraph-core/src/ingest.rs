//! Record ingestion driver
//!
//! Input arrives as [`ElementRecord`] values, one per documented element, with
//! type signatures as raw span sequences. [`Ingestor::ingest`] converts a
//! record tree into stored [`DocumentedElement`]s, parses every type field,
//! and queues whatever could not be resolved on the spot. Call
//! [`Ingestor::resolve_references`] once all input is in.

use crate::diag::Warning;
use crate::grammar;
use crate::model::{
    DocumentedElement, ElementId, Parameter, ReturnValue, SignatureSpan, ThrowsClause, TypeNode,
    TypeSlot,
};
use crate::parser::{ParsedType, TypeParser, UnresolvedMark};
use crate::resolver::{QueuedInnerRef, QueuedRef, ResolveReport, Resolver};
use crate::store::SymbolStore;

/// Extracted documentation for one element, as delivered by the extraction
/// layer.
#[derive(Debug, Clone, Default)]
pub struct ElementRecord {
    /// Language the element was extracted from.
    pub language: String,
    /// Raw identifier, unique within the extraction run.
    pub id: Option<String>,
    /// Kind of language element.
    pub kind: String,
    /// Name as written in the extract, possibly qualified or mangled.
    pub name: String,
    /// Protection or visibility level.
    pub visibility: String,
    /// Return type signature.
    pub returns: Vec<SignatureSpan>,
    /// Side-channel subscript run for the return type.
    pub returns_array: Vec<SignatureSpan>,
    /// Documentation of the return value.
    pub returns_description: String,
    /// Parameters, in declaration order.
    pub params: Vec<ParameterRecord>,
    /// Exceptions the element may throw.
    pub throws: Vec<ThrowsRecord>,
    /// Child member records.
    pub members: Vec<ElementRecord>,
    /// References to inner types stored as separate records.
    pub inner_types: Vec<InnerTypeRecord>,
    /// Full definition as written in source code.
    pub definition: String,
    /// Argument string as written in source code.
    pub args: String,
    /// Initial value assignment.
    pub initializer: String,
    /// Brief description text.
    pub brief: String,
    /// Detailed description text.
    pub description: String,
    /// True if the element is declared static.
    pub is_static: bool,
    /// True if the element is declared const.
    pub is_const: bool,
}

/// One extracted parameter.
#[derive(Debug, Clone, Default)]
pub struct ParameterRecord {
    /// Type signature of the parameter.
    pub spans: Vec<SignatureSpan>,
    /// Side-channel subscript run for the type.
    pub array: Vec<SignatureSpan>,
    /// Parameter name.
    pub name: String,
    /// Default value text.
    pub default_value: String,
    /// Documentation text.
    pub description: String,
}

/// One extracted throws clause.
#[derive(Debug, Clone, Default)]
pub struct ThrowsRecord {
    /// Name of the thrown type.
    pub name: String,
    /// Raw identifier of the thrown type, if the extract linked it.
    pub refid: Option<String>,
    /// Kind of the thrown type, if reported.
    pub kind: Option<String>,
    /// Documentation of when the exception is thrown.
    pub description: String,
}

/// One extracted inner-type reference.
#[derive(Debug, Clone, Default)]
pub struct InnerTypeRecord {
    /// Raw identifier of the inner type, if the extract linked it.
    pub refid: Option<String>,
    /// Name of the inner type.
    pub name: String,
    /// Visibility of the inner type within its parent.
    pub visibility: String,
}

/// Converts element records into the symbol store.
///
/// Owns the store, the resolver queues, and the warning sink.
#[derive(Debug, Default)]
pub struct Ingestor {
    store: SymbolStore,
    resolver: Resolver,
    force_language: Option<String>,
    warnings: Vec<Warning>,
}

impl Ingestor {
    /// Create an ingestor that reads the language from each record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an ingestor that treats every record as the given language,
    /// ignoring per-record tags.
    pub fn with_language(language: &str) -> Self {
        Self {
            force_language: Some(grammar::canonical_tag(language)),
            ..Self::default()
        }
    }

    /// Convert one record tree and store every element in it.
    ///
    /// Returns the handle of the root element, or `None` when the record was
    /// skipped. Skips record a [`Warning`], never an error.
    pub fn ingest(&mut self, record: &ElementRecord) -> Option<ElementId> {
        let tag = match &self.force_language {
            Some(tag) => tag.clone(),
            None => grammar::canonical_tag(&record.language),
        };
        let Some(language) = grammar::for_tag(&tag) else {
            self.warnings.push(Warning::UnknownLanguage {
                tag: record.language.clone(),
            });
            return None;
        };
        self.convert(language, record, "")
    }

    /// Resolve all queued references against the store.
    pub fn resolve_references(&mut self) -> ResolveReport {
        self.resolver.resolve(&mut self.store, &mut self.warnings)
    }

    /// Number of references still waiting for resolution.
    pub fn pending(&self) -> usize {
        self.resolver.pending()
    }

    /// The accumulated symbol store.
    pub fn store(&self) -> &SymbolStore {
        &self.store
    }

    /// The accumulated symbol store, mutably.
    pub fn store_mut(&mut self) -> &mut SymbolStore {
        &mut self.store
    }

    /// Warnings collected so far.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Drain the collected warnings.
    pub fn take_warnings(&mut self) -> Vec<Warning> {
        std::mem::take(&mut self.warnings)
    }

    fn convert(
        &mut self,
        language: &'static dyn grammar::LanguageGrammar,
        record: &ElementRecord,
        parent_full_name: &str,
    ) -> Option<ElementId> {
        if language.is_member_excluded(&record.kind, &record.name) {
            return None;
        }

        let names = language.names(&record.name, parent_full_name, Some(&record.kind));
        let namespace = names.namespace.as_deref();

        // Some members redefine a block type in their definition text; the
        // name, kind, return type, and parameters come from there instead of
        // the record's own fields.
        let block = language.block_definition(&record.kind, &record.definition);
        let (kind, short_name) = match &block {
            Some(block) => ("block".to_string(), block.name.clone()),
            None => (record.kind.clone(), names.short.clone()),
        };

        let returns = match &block {
            Some(block) => self.parse_type(
                language,
                &[SignatureSpan::text(block.returns.as_str())],
                &[],
                namespace,
            ),
            None => self.parse_type(language, &record.returns, &record.returns_array, namespace),
        };
        let mut params: Vec<(Parameter, Vec<UnresolvedMark>)> = record
            .params
            .iter()
            .map(|param| {
                let parsed = self.parse_type(language, &param.spans, &param.array, namespace);
                let (node, marks) = match parsed {
                    Some(parsed) => (Some(parsed.node), parsed.unresolved),
                    None => (None, Vec::new()),
                };
                (
                    Parameter {
                        name: param.name.clone(),
                        node,
                        default_value: param.default_value.clone(),
                        description: param.description.clone(),
                    },
                    marks,
                )
            })
            .collect();
        if let Some(block) = &block {
            for arg in &block.args {
                let parsed = self.parse_type(
                    language,
                    &[SignatureSpan::text(arg.as_str())],
                    &[],
                    namespace,
                );
                let (node, marks) = match parsed {
                    Some(parsed) => (Some(parsed.node), parsed.unresolved),
                    None => (None, Vec::new()),
                };
                params.push((
                    Parameter {
                        node,
                        ..Parameter::default()
                    },
                    marks,
                ));
            }
        }
        let throws: Vec<(ThrowsClause, bool)> = record
            .throws
            .iter()
            .map(|t| {
                let id = language.unique_id(t.refid.as_deref());
                let needs_resolution = id.is_none();
                let clause = ThrowsClause {
                    node: TypeNode {
                        id,
                        name: language.cleanup_name(&t.name),
                        kind: t.kind.clone(),
                        namespace: namespace.map(str::to_string),
                        ..TypeNode::new(language.tag())
                    },
                    description: t.description.clone(),
                };
                (clause, needs_resolution)
            })
            .collect();

        // Members first, so their records already exist when the parent is
        // appended.
        let member_handles: Vec<ElementId> = record
            .members
            .iter()
            .filter_map(|member| self.convert(language, member, &names.full))
            .collect();

        let element = DocumentedElement {
            id: language.unique_id(record.id.as_deref()),
            name: short_name,
            full_name: names.full.clone(),
            kind,
            namespace: names.namespace.clone(),
            visibility: record.visibility.clone(),
            members: member_handles,
            params: params.iter().map(|(p, _)| p.clone()).collect(),
            throws: throws.iter().map(|(t, _)| t.clone()).collect(),
            returns: returns.as_ref().map(|parsed| ReturnValue {
                node: parsed.node.clone(),
                description: record.returns_description.clone(),
            }),
            definition: record.definition.clone(),
            args: record.args.clone(),
            initializer: record.initializer.clone(),
            brief: record.brief.clone(),
            description: record.description.clone(),
            is_static: record.is_static,
            is_const: record.is_const,
            ..DocumentedElement::new(language.tag())
        };

        let handle = match self.store.append(element) {
            Ok(handle) => handle,
            Err(source) => {
                self.warnings.push(Warning::UnregistrableElement {
                    name: names.full,
                    source,
                });
                return None;
            }
        };

        if let Some(parsed) = returns {
            self.queue_marks(handle, TypeSlot::Return, parsed.unresolved);
        }
        for (i, (_, marks)) in params.into_iter().enumerate() {
            self.queue_marks(handle, TypeSlot::Param(i), marks);
        }
        for (i, (clause, needs_resolution)) in throws.into_iter().enumerate() {
            if needs_resolution && !clause.node.name.is_empty() {
                self.resolver.queue_ref(QueuedRef {
                    element: handle,
                    slot: TypeSlot::Throws(i),
                    steps: Vec::new(),
                    name: clause.node.name,
                    namespace: namespace.map(str::to_string),
                    language: language.tag().to_string(),
                });
            }
        }
        for inner in &record.inner_types {
            // Only public and protected inner types surface in their parent.
            if !matches!(inner.visibility.as_str(), "" | "public" | "protected") {
                continue;
            }
            self.resolver.queue_inner_ref(QueuedInnerRef {
                parent: handle,
                id: language.unique_id(inner.refid.as_deref()),
                name: language.cleanup_name(&inner.name),
                namespace: Some(names.full.clone()),
                language: language.tag().to_string(),
                visibility: inner.visibility.clone(),
            });
        }

        Some(handle)
    }

    fn parse_type(
        &mut self,
        language: &'static dyn grammar::LanguageGrammar,
        spans: &[SignatureSpan],
        side_spans: &[SignatureSpan],
        namespace: Option<&str>,
    ) -> Option<ParsedType> {
        TypeParser::new(language, &mut self.warnings).parse(spans, side_spans, namespace)
    }

    fn queue_marks(&mut self, element: ElementId, slot: TypeSlot, marks: Vec<UnresolvedMark>) {
        for mark in marks {
            self.resolver.queue_ref(QueuedRef {
                element,
                slot,
                steps: mark.steps,
                name: mark.name,
                namespace: mark.namespace,
                language: mark.language,
            });
        }
    }
}
