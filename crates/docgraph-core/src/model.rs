//! Model types for the documented-element graph
//!
//! Everything that survives a parse call lives here: type trees, parameters,
//! and the documented elements that accumulate in the symbol store.

use std::fmt;

use crate::grammar;

/// A run of raw signature text, either literal or a known hyperlink.
///
/// Hyperlink spans arrive from the extraction layer with the target id already
/// attached; the tokenizer turns each one into exactly one name token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureSpan {
    /// Literal signature text to be tokenized by grammar rules.
    Text(String),
    /// A sub-run known in advance to reference another documented element.
    Link {
        /// Display text of the link.
        text: String,
        /// Raw identifier of the referenced element (not yet language-prefixed).
        refid: String,
        /// Kind hint for the referenced element, if reported.
        kind: Option<String>,
    },
}

impl SignatureSpan {
    /// Convenience constructor for a literal text span.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Convenience constructor for a hyperlink span.
    pub fn link(text: impl Into<String>, refid: impl Into<String>, kind: Option<&str>) -> Self {
        Self::Link {
            text: text.into(),
            refid: refid.into(),
            kind: kind.map(str::to_string),
        }
    }
}

/// Parsed structural representation of one type-signature occurrence.
///
/// `nested` and `args` are tri-state: `None` means the block was absent,
/// `Some(vec![])` means it was present but empty. The two are observably
/// different downstream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeNode {
    /// Unique identifier of the referenced element, once resolved.
    pub id: Option<String>,
    /// Base name of the type. Empty for callable nodes.
    pub name: String,
    /// Language tag of the signature this node was parsed from.
    pub language: String,
    /// Namespace the type is referenced from.
    pub namespace: Option<String>,
    /// Kind of the referenced element, if known.
    pub kind: Option<String>,
    /// Qualifiers and operators preceding the name.
    pub prefix: String,
    /// Qualifiers and operators following the name.
    pub suffix: String,
    /// Nested type arguments (generics, subscripts).
    pub nested: Option<Vec<TypeNode>>,
    /// Parameters for callable nodes.
    pub args: Option<Vec<Parameter>>,
    /// Return type for callable nodes.
    pub returns: Option<Box<TypeNode>>,
}

/// One navigation step inside a [`TypeNode`] tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathStep {
    /// Descend into the i-th nested type argument.
    Nested(usize),
    /// Descend into the type of the i-th parameter.
    Arg(usize),
    /// Descend into the return type of a callable node.
    Returns,
}

impl TypeNode {
    /// Create a node carrying only a language tag.
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            ..Self::default()
        }
    }

    /// Follow a path of steps down the tree.
    pub fn descend(&self, steps: &[PathStep]) -> Option<&TypeNode> {
        let mut node = self;
        for step in steps {
            node = match *step {
                PathStep::Nested(i) => node.nested.as_ref()?.get(i)?,
                PathStep::Arg(i) => node.args.as_ref()?.get(i)?.node.as_ref()?,
                PathStep::Returns => node.returns.as_deref()?,
            };
        }
        Some(node)
    }

    /// Follow a path of steps down the tree, mutably.
    pub fn descend_mut(&mut self, steps: &[PathStep]) -> Option<&mut TypeNode> {
        let mut node = self;
        for step in steps {
            node = match *step {
                PathStep::Nested(i) => node.nested.as_mut()?.get_mut(i)?,
                PathStep::Arg(i) => node.args.as_mut()?.get_mut(i)?.node.as_mut()?,
                PathStep::Returns => node.returns.as_deref_mut()?,
            };
        }
        Some(node)
    }

    fn nesting_brackets(&self) -> (char, char) {
        let open = grammar::for_tag(&self.language)
            .and_then(grammar::LanguageGrammar::nesting_boundary)
            .unwrap_or('<');
        let close = match open {
            '[' => ']',
            '(' => ')',
            '{' => '}',
            _ => '>',
        };
        (open, close)
    }
}

impl fmt::Display for TypeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(returns) = &self.returns {
            write!(f, "{returns}(")?;
            for (i, arg) in self.args.iter().flatten().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                if let Some(node) = &arg.node {
                    write!(f, "{node}")?;
                }
            }
            return write!(f, ")");
        }

        write!(f, "{}{}", self.prefix, self.name)?;
        if let Some(nested) = &self.nested {
            let (open, close) = self.nesting_brackets();
            write!(f, "{open}")?;
            for (i, entry) in nested.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{entry}")?;
            }
            write!(f, "{close}")?;
        }
        write!(f, "{}", self.suffix)
    }
}

/// One parameter of a callable element or callable type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parameter {
    /// Name used for the parameter, empty if unnamed.
    pub name: String,
    /// Type of the parameter, if one could be parsed.
    pub node: Option<TypeNode>,
    /// Default value text.
    pub default_value: String,
    /// Documentation text for the parameter.
    pub description: String,
}

/// Value returned from a callable element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReturnValue {
    /// Type of the return value.
    pub node: TypeNode,
    /// Documentation text for the return value.
    pub description: String,
}

/// One exception a callable element may throw.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThrowsClause {
    /// Type of the exception.
    pub node: TypeNode,
    /// Documentation of when the exception is thrown.
    pub description: String,
}

/// Handle to a [`DocumentedElement`] inside the symbol store arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub(crate) usize);

impl ElementId {
    /// Raw arena index, mainly useful for diagnostics.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A documented element: compound, member, or enum value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentedElement {
    /// Globally unique, language-prefixed identifier.
    pub id: Option<String>,
    /// Short name of the element.
    pub name: String,
    /// Fully qualified name.
    pub full_name: String,
    /// Canonical language tag.
    pub language: String,
    /// Kind of language element (class, function, enumvalue, ...).
    pub kind: String,
    /// Declaring namespace, if any.
    pub namespace: Option<String>,
    /// Protection or visibility level.
    pub visibility: String,
    /// Members of this element, as handles into the symbol store.
    pub members: Vec<ElementId>,
    /// Parameters of a callable element.
    pub params: Vec<Parameter>,
    /// Exceptions a callable element may throw.
    pub throws: Vec<ThrowsClause>,
    /// Return value of a callable element.
    pub returns: Option<ReturnValue>,
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

impl DocumentedElement {
    /// Create an element carrying only a language tag.
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            ..Self::default()
        }
    }

    /// The type node stored in a slot, if present.
    pub fn type_node(&self, slot: TypeSlot, steps: &[PathStep]) -> Option<&TypeNode> {
        let root = match slot {
            TypeSlot::Return => &self.returns.as_ref()?.node,
            TypeSlot::Param(i) => self.params.get(i)?.node.as_ref()?,
            TypeSlot::Throws(i) => &self.throws.get(i)?.node,
        };
        root.descend(steps)
    }

    /// The type node stored in a slot, mutably.
    pub fn type_node_mut(&mut self, slot: TypeSlot, steps: &[PathStep]) -> Option<&mut TypeNode> {
        let root = match slot {
            TypeSlot::Return => &mut self.returns.as_mut()?.node,
            TypeSlot::Param(i) => self.params.get_mut(i)?.node.as_mut()?,
            TypeSlot::Throws(i) => &mut self.throws.get_mut(i)?.node,
        };
        root.descend_mut(steps)
    }
}

/// Which type-bearing field of an element a node path starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeSlot {
    /// The return type.
    Return,
    /// The type of the i-th parameter.
    Param(usize),
    /// The type of the i-th throws clause.
    Throws(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(language: &str, name: &str) -> TypeNode {
        TypeNode {
            name: name.to_string(),
            ..TypeNode::new(language)
        }
    }

    #[test]
    fn display_plain_type() {
        let node = TypeNode {
            prefix: "const ".to_string(),
            suffix: " &".to_string(),
            ..named("cpp", "MyType")
        };
        assert_eq!(node.to_string(), "const MyType &");
    }

    #[test]
    fn display_nested_type_uses_language_brackets() {
        let mut node = named("cpp", "std::vector");
        node.nested = Some(vec![named("cpp", "int")]);
        assert_eq!(node.to_string(), "std::vector<int>");

        let mut node = named("python", "List");
        node.nested = Some(vec![named("python", "str")]);
        assert_eq!(node.to_string(), "List[str]");
    }

    #[test]
    fn display_empty_nested_block() {
        let mut node = named("cpp", "Box");
        node.nested = Some(Vec::new());
        assert_eq!(node.to_string(), "Box<>");
    }

    #[test]
    fn display_callable_type() {
        let node = TypeNode {
            kind: Some("closure".to_string()),
            returns: Some(Box::new(named("cpp", "void"))),
            args: Some(vec![
                Parameter {
                    node: Some(named("cpp", "int")),
                    ..Parameter::default()
                },
                Parameter {
                    node: Some(named("cpp", "double")),
                    ..Parameter::default()
                },
            ]),
            ..TypeNode::new("cpp")
        };
        assert_eq!(node.to_string(), "void(int, double)");
    }

    #[test]
    fn descend_follows_nested_and_args() {
        let mut inner = named("cpp", "Inner");
        inner.nested = Some(vec![named("cpp", "Leaf")]);
        let mut node = named("cpp", "Outer");
        node.nested = Some(vec![inner]);

        let leaf = node
            .descend(&[PathStep::Nested(0), PathStep::Nested(0)])
            .unwrap();
        assert_eq!(leaf.name, "Leaf");
        assert!(node.descend(&[PathStep::Returns]).is_none());
    }

    #[test]
    fn type_node_mut_reaches_slots() {
        let mut element = DocumentedElement::new("cpp");
        element.params.push(Parameter {
            node: Some(named("cpp", "Arg")),
            ..Parameter::default()
        });
        let node = element
            .type_node_mut(TypeSlot::Param(0), &[])
            .expect("param node");
        node.id = Some("cpp-arg".to_string());
        assert_eq!(
            element.params[0].node.as_ref().unwrap().id.as_deref(),
            Some("cpp-arg")
        );
    }
}
