//! The query-side aggregate: the operations and fragment definitions of one
//! executable document.

use crate::ast;
use crate::collections::IndexMap;
use trellis_parser::Name;
use trellis_parser::Node;
use trellis_parser::ParseError;

/// A failure converting a parsed document into an [`ExecutableDocument`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("an executable document must not contain {describe}")]
    TypeSystemDefinition { describe: &'static str },

    #[error("the operation `{name}` is defined multiple times in the document")]
    OperationNameCollision { name: Name },

    #[error("the fragment `{name}` is defined multiple times in the document")]
    FragmentNameCollision { name: Name },
}

/// Operations and fragments of an executable document.
///
/// Fragment definitions only appear at document top level; spreads anywhere
/// in a selection set resolve against [`fragments`][Self::fragments].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutableDocument {
    pub operations: Vec<Node<ast::OperationDefinition>>,
    pub fragments: IndexMap<Name, Node<ast::FragmentDefinition>>,
}

impl ExecutableDocument {
    /// Parses query-document source text.
    pub fn parse(source: &str) -> Result<Self, DocumentError> {
        Self::from_document(&ast::Document::parse(source)?)
    }

    pub fn from_document(document: &ast::Document) -> Result<Self, DocumentError> {
        let mut executable = Self::default();
        for definition in &document.definitions {
            match definition {
                ast::Definition::OperationDefinition(operation) => {
                    if let Some(name) = &operation.name {
                        let duplicate = executable
                            .operations
                            .iter()
                            .any(|op| op.name.as_ref() == Some(name));
                        if duplicate {
                            return Err(DocumentError::OperationNameCollision {
                                name: name.clone(),
                            });
                        }
                    }
                    executable.operations.push(operation.clone());
                }
                ast::Definition::FragmentDefinition(fragment) => {
                    if executable.fragments.contains_key(fragment.name.as_str()) {
                        return Err(DocumentError::FragmentNameCollision {
                            name: fragment.name.clone(),
                        });
                    }
                    executable
                        .fragments
                        .insert(fragment.name.clone(), fragment.clone());
                }
                other => {
                    return Err(DocumentError::TypeSystemDefinition {
                        describe: other.describe(),
                    });
                }
            }
        }
        Ok(executable)
    }

    /// The operation a request selects: by name when one is given, otherwise
    /// the document's only operation. `None` when the name is unknown or the
    /// choice is ambiguous.
    pub fn get_operation(
        &self,
        name_request: Option<&str>,
    ) -> Option<&Node<ast::OperationDefinition>> {
        if let Some(name) = name_request {
            self.operations
                .iter()
                .find(|operation| operation.name.as_deref() == Some(name))
        } else if self.operations.len() == 1 {
            self.operations.first()
        } else {
            None
        }
    }

    /// Resolves a fragment spread to its definition.
    pub fn fragment(&self, name: &str) -> Option<&Node<ast::FragmentDefinition>> {
        self.fragments.get(name)
    }
}
