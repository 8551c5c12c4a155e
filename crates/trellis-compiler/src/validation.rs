//! Request validation: walks a parsed executable document against a built
//! [`Schema`], rejecting undefined fields, arguments, types, directives and
//! fragments, and enforcing fragment/interface/union shape compatibility.
//!
//! Validation is read-only and side-effect-free; repeated calls against the
//! same schema and document are idempotent. The first error encountered is
//! returned.

use crate::ast;
use crate::ast::DirectiveList;
use crate::ast::DirectiveLocation;
use crate::ast::Selection;
use crate::executable::DocumentError;
use crate::executable::ExecutableDocument;
use crate::schema::ExtendedType;
use crate::schema::FieldDefinition;
use crate::schema::InterfaceType;
use crate::schema::ObjectType;
use crate::schema::Schema;
use crate::schema::UnionType;
use std::sync::OnceLock;
use trellis_parser::Name;
use trellis_parser::Node;

/// A validation failure. Carries enough structure for an embedder to render
/// a GraphQL-style error response.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("the document defines no operation to execute")]
    MissingOperation,

    #[error("`{operation_type}` root operation type is not defined")]
    UndefinedRootOperation { operation_type: &'static str },

    #[error("type `{type_name}` does not have a field `{field_name}`")]
    UndefinedField { type_name: Name, field_name: Name },

    #[error("missing required arguments on `{coordinate}`: {names:?}")]
    MissingRequiredArguments { coordinate: String, names: Vec<Name> },

    #[error("the directive `@{name}` is not defined")]
    UndefinedDirective { name: Name },

    #[error("the directive `@{name}` is not allowed on {location}")]
    DirectiveNotAllowed {
        name: Name,
        location: DirectiveLocation,
    },

    #[error("fragment `{name}` is not defined")]
    UndefinedFragment { name: Name },

    #[error(
        "fragment `{name}` is declared on `{declared_type}` \
         and cannot be spread on `{selected_type}`"
    )]
    FragmentTypeMismatch {
        name: Name,
        declared_type: Name,
        selected_type: Name,
    },

    #[error("type `{name}` is not defined in the schema")]
    UndefinedType { name: Name },

    #[error("the selection set on union field `{field_name}` of `{union_name}` must not be empty")]
    EmptyUnionSelection { field_name: Name, union_name: Name },
}

/// A failure anywhere between query parsing and validation.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Parses query source text and validates it against the schema.
pub fn validate(schema: &Schema, source: &str) -> Result<ExecutableDocument, RequestError> {
    let document = ExecutableDocument::parse(source)?;
    validate_request(schema, &document)?;
    Ok(document)
}

/// Validates every operation of an already-parsed document.
pub fn validate_request(
    schema: &Schema,
    document: &ExecutableDocument,
) -> Result<(), ValidationError> {
    if document.operations.is_empty() {
        return Err(ValidationError::MissingOperation);
    }
    for operation in &document.operations {
        tracing::trace!(
            operation_type = operation.operation_type.name(),
            name = operation.name.as_deref(),
            "validating operation"
        );
        validate_operation(schema, document, operation)?;
    }
    Ok(())
}

/// The composite type a selection set is validated against.
#[derive(Clone, Copy)]
enum CompositeType<'a> {
    Object(&'a Node<ObjectType>),
    Interface(&'a Node<InterfaceType>),
    Union(&'a Node<UnionType>),
}

impl<'a> CompositeType<'a> {
    fn from_extended(ty: &'a ExtendedType) -> Option<Self> {
        match ty {
            ExtendedType::Object(object) => Some(CompositeType::Object(object)),
            ExtendedType::Interface(interface) => Some(CompositeType::Interface(interface)),
            ExtendedType::Union(union_) => Some(CompositeType::Union(union_)),
            _ => None,
        }
    }

    fn from_name(schema: &'a Schema, name: &str) -> Option<Self> {
        Self::from_extended(schema.types.get(name)?)
    }

    fn name(&self) -> &'a Name {
        match self {
            CompositeType::Object(object) => &object.name,
            CompositeType::Interface(interface) => &interface.name,
            CompositeType::Union(union_) => &union_.name,
        }
    }

    /// Resolves a field selected on this composite. Interface lookups fan
    /// out across implementing types, union lookups across member types.
    fn field(&self, schema: &'a Schema, name: &str) -> Option<&'a Node<FieldDefinition>> {
        match self {
            CompositeType::Object(object) => object.fields.get(name),
            CompositeType::Interface(interface) => interface.fields.get(name).or_else(|| {
                schema
                    .implementers_of(interface.name.as_str())
                    .find_map(|object| object.fields.get(name))
            }),
            CompositeType::Union(union_) => union_.members.iter().find_map(|member| {
                schema
                    .get_object(member.as_str())
                    .and_then(|object| object.fields.get(name))
            }),
        }
    }

    /// Whether a fragment with the given type condition may be spread here:
    /// the condition names this type, an implementing type (interfaces) or a
    /// member type (unions).
    fn condition_applies(&self, schema: &Schema, condition: &Name) -> bool {
        if condition == self.name() {
            return true;
        }
        match self {
            CompositeType::Object(_) => false,
            CompositeType::Interface(interface) => schema
                .implementers_of(interface.name.as_str())
                .any(|object| object.name == *condition),
            CompositeType::Union(union_) => union_.has_member(condition.as_str()),
        }
    }
}

fn validate_operation(
    schema: &Schema,
    document: &ExecutableDocument,
    operation: &ast::OperationDefinition,
) -> Result<(), ValidationError> {
    let operation_type = operation.operation_type;
    let Some(root_name) = schema.root_operation(operation_type) else {
        return Err(ValidationError::UndefinedRootOperation {
            operation_type: operation_type.name(),
        });
    };
    let Some(root) = schema.get_object(root_name.as_str()) else {
        return Err(ValidationError::UndefinedType {
            name: root_name.clone(),
        });
    };

    check_directives(schema, &operation.directives, operation_location(operation_type))?;

    let composite = CompositeType::Object(root);
    for selection in &operation.selection_set {
        validate_selection(schema, document, composite, selection)?;
    }
    Ok(())
}

fn validate_selection(
    schema: &Schema,
    document: &ExecutableDocument,
    composite: CompositeType<'_>,
    selection: &Selection,
) -> Result<(), ValidationError> {
    match selection {
        Selection::Field(field) => {
            check_directives(schema, &field.directives, DirectiveLocation::Field)?;
            validate_field(schema, document, composite, field)
        }
        Selection::FragmentSpread(spread) => {
            check_directives(schema, &spread.directives, DirectiveLocation::FragmentSpread)?;
            let Some(fragment) = document.fragment(&spread.fragment_name) else {
                return Err(ValidationError::UndefinedFragment {
                    name: spread.fragment_name.clone(),
                });
            };
            if !composite.condition_applies(schema, &fragment.type_condition) {
                return Err(ValidationError::FragmentTypeMismatch {
                    name: fragment.name.clone(),
                    declared_type: fragment.type_condition.clone(),
                    selected_type: composite.name().clone(),
                });
            }
            let Some(target) = CompositeType::from_name(schema, &fragment.type_condition) else {
                return Err(ValidationError::UndefinedType {
                    name: fragment.type_condition.clone(),
                });
            };
            for selection in &fragment.selection_set {
                validate_selection(schema, document, target, selection)?;
            }
            Ok(())
        }
        Selection::InlineFragment(inline) => {
            check_directives(schema, &inline.directives, DirectiveLocation::InlineFragment)?;
            let Some(target) = CompositeType::from_name(schema, &inline.type_condition) else {
                return Err(ValidationError::UndefinedType {
                    name: inline.type_condition.clone(),
                });
            };
            for selection in &inline.selection_set {
                validate_selection(schema, document, target, selection)?;
            }
            Ok(())
        }
    }
}

fn validate_field(
    schema: &Schema,
    document: &ExecutableDocument,
    composite: CompositeType<'_>,
    field: &ast::Field,
) -> Result<(), ValidationError> {
    if field.name == "__typename" {
        return Ok(());
    }

    let definition = match meta_field_definition(schema, composite, &field.name) {
        Some(definition) => definition,
        None => {
            composite
                .field(schema, &field.name)
                .ok_or_else(|| ValidationError::UndefinedField {
                    type_name: composite.name().clone(),
                    field_name: field.name.clone(),
                })?
        }
    };

    check_required_arguments(
        definition.required_arguments(),
        format!("{}.{}", composite.name(), field.name),
        &field.arguments,
    )?;

    let inner = definition.ty.inner_named_type();
    let Some(target) = schema
        .types
        .get(inner.as_str())
        .and_then(CompositeType::from_extended)
    else {
        // Scalar, enum or input leaf: recursion terminates.
        return Ok(());
    };

    if let CompositeType::Union(union_) = target {
        if field.selection_set.is_empty() {
            return Err(ValidationError::EmptyUnionSelection {
                field_name: field.name.clone(),
                union_name: union_.name.clone(),
            });
        }
    }

    for selection in &field.selection_set {
        validate_selection(schema, document, target, selection)?;
    }
    Ok(())
}

fn check_required_arguments<'a>(
    required: impl Iterator<Item = &'a Node<ast::InputValueDefinition>>,
    coordinate: String,
    provided: &[Node<ast::Argument>],
) -> Result<(), ValidationError> {
    let names: Vec<Name> = required
        .filter(|argument| provided.iter().all(|given| given.name != argument.name))
        .map(|argument| argument.name.clone())
        .collect();
    if names.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::MissingRequiredArguments { coordinate, names })
    }
}

/// Checks every applied directive: it must be declared, legal at this
/// location, and given its required arguments.
fn check_directives(
    schema: &Schema,
    directives: &DirectiveList,
    location: DirectiveLocation,
) -> Result<(), ValidationError> {
    for directive in directives {
        let Some(definition) = schema.directive_definitions.get(directive.name.as_str()) else {
            return Err(ValidationError::UndefinedDirective {
                name: directive.name.clone(),
            });
        };
        if !definition.is_allowed_location(location) {
            return Err(ValidationError::DirectiveNotAllowed {
                name: directive.name.clone(),
                location,
            });
        }
        check_required_arguments(
            definition.required_arguments(),
            format!("@{}", directive.name),
            &directive.arguments,
        )?;
    }
    Ok(())
}

fn operation_location(operation_type: ast::OperationType) -> DirectiveLocation {
    match operation_type {
        ast::OperationType::Query => DirectiveLocation::Query,
        ast::OperationType::Mutation => DirectiveLocation::Mutation,
        ast::OperationType::Subscription => DirectiveLocation::Subscription,
    }
}

/// The `__schema` and `__type` meta-fields, available on the root query
/// type. Their response shapes are the seeded introspection types.
fn meta_field_definition<'a>(
    schema: &'a Schema,
    composite: CompositeType<'_>,
    name: &str,
) -> Option<&'a Node<FieldDefinition>> {
    if schema.schema_definition.query.as_ref() != Some(composite.name()) {
        return None;
    }
    match name {
        "__schema" => {
            static DEF: OnceLock<Node<FieldDefinition>> = OnceLock::new();
            Some(DEF.get_or_init(|| {
                Node::new(FieldDefinition {
                    description: None,
                    name: meta_name("__schema"),
                    arguments: Vec::new(),
                    ty: ast::Type::NonNullNamed(meta_name("__Schema")),
                    directives: DirectiveList::new(),
                })
            }))
        }
        "__type" => {
            static DEF: OnceLock<Node<FieldDefinition>> = OnceLock::new();
            Some(DEF.get_or_init(|| {
                Node::new(FieldDefinition {
                    description: None,
                    name: meta_name("__type"),
                    arguments: vec![Node::new(ast::InputValueDefinition {
                        description: None,
                        name: meta_name("name"),
                        ty: ast::Type::NonNullNamed(meta_name("String")),
                        default_value: None,
                        directives: DirectiveList::new(),
                    })],
                    ty: ast::Type::Named(meta_name("__Type")),
                    directives: DirectiveList::new(),
                })
            }))
        }
        _ => None,
    }
}

fn meta_name(name: &str) -> Name {
    Name::new(name).expect("meta-field names are valid")
}
