//! Building a [`Schema`] from AST documents: extension folding, built-in
//! seeding, index construction and directive-location checks.

use super::*;
use std::sync::OnceLock;
use trellis_parser::ParseError;

/// A terminal schema build failure. The builder reports the first error
/// encountered and does not attempt partial recovery.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("a schema document must not contain {describe}")]
    ExecutableDefinition { describe: &'static str },

    #[error("must not have multiple `schema` definitions")]
    SchemaDefinitionCollision,

    #[error("duplicate definitions for the `{operation_type}` root operation type")]
    DuplicateRootOperation { operation_type: &'static str },

    #[error("the directive `@{name}` is defined multiple times in the schema")]
    DirectiveDefinitionCollision { name: Name },

    #[error("the type `{name}` is defined multiple times in the schema")]
    TypeDefinitionCollision { name: Name },

    #[error("built-in scalar definitions must be omitted")]
    BuiltInScalarRedefinition { name: Name },

    #[error("type extension for undefined type `{name}`")]
    UndefinedExtendTarget { name: Name },

    #[error("adding {describe_ext} to `{name}`, but it is {describe_def}")]
    ExtensionKindMismatch {
        name: Name,
        describe_ext: &'static str,
        describe_def: &'static str,
    },

    #[error("the directive `@{name}` is not defined")]
    UndefinedDirective { name: Name },

    #[error("the directive `@{name}` is not allowed on {location}")]
    DirectiveNotAllowedAtLocation {
        name: Name,
        location: DirectiveLocation,
    },
}

/// Accumulates raw AST definitions from one or more source files, then
/// [`build`][Self::build]s the merged, indexed [`Schema`].
///
/// A new builder starts out with the built-in directives, the five built-in
/// scalars and the introspection type set already added.
pub struct SchemaBuilder {
    definitions: Vec<ast::Definition>,
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self {
            definitions: built_in_definitions().definitions.clone(),
        }
    }

    /// Parses SDL source text and adds its definitions.
    pub fn add_source(&mut self, source: &str) -> Result<(), BuildError> {
        let document = ast::Document::parse(source)?;
        self.add_document(&document);
        Ok(())
    }

    /// Adds an already-parsed document's definitions.
    pub fn add_document(&mut self, document: &ast::Document) {
        self.definitions.extend_from_slice(&document.definitions);
    }

    /// Merges every definition added so far: folds `extend` blocks into
    /// their base declarations, resolves root operation types and checks
    /// that each directive usage is legal at its location.
    pub fn build(self) -> Result<Schema, BuildError> {
        let mut schema = Schema {
            schema_definition: SchemaDefinition::default(),
            directive_definitions: IndexMap::default(),
            types: IndexMap::default(),
        };
        let mut schema_definition_seen = false;
        let mut extensions = Vec::new();

        for definition in &self.definitions {
            match definition {
                ast::Definition::OperationDefinition(_) | ast::Definition::FragmentDefinition(_) => {
                    return Err(BuildError::ExecutableDefinition {
                        describe: definition.describe(),
                    });
                }
                ast::Definition::SchemaDefinition(def) => {
                    if schema_definition_seen {
                        return Err(BuildError::SchemaDefinitionCollision);
                    }
                    schema_definition_seen = true;
                    schema.schema_definition.description = def.description.clone();
                    schema.schema_definition.directives = def.directives.clone();
                    set_root_operations(
                        &mut schema.schema_definition,
                        &def.root_operations,
                        true,
                    )?;
                }
                ast::Definition::DirectiveDefinition(def) => {
                    if schema.directive_definitions.contains_key(def.name.as_str()) {
                        return Err(BuildError::DirectiveDefinitionCollision {
                            name: def.name.clone(),
                        });
                    }
                    schema
                        .directive_definitions
                        .insert(def.name.clone(), def.clone());
                }
                ast::Definition::ScalarTypeDefinition(def) => {
                    insert_type(&mut schema.types, ScalarType::from_ast(def))?;
                }
                ast::Definition::ObjectTypeDefinition(def) => {
                    insert_type(&mut schema.types, ObjectType::from_ast(def))?;
                }
                ast::Definition::InterfaceTypeDefinition(def) => {
                    insert_type(&mut schema.types, InterfaceType::from_ast(def))?;
                }
                ast::Definition::UnionTypeDefinition(def) => {
                    insert_type(&mut schema.types, UnionType::from_ast(def))?;
                }
                ast::Definition::EnumTypeDefinition(def) => {
                    insert_type(&mut schema.types, EnumType::from_ast(def))?;
                }
                ast::Definition::InputObjectTypeDefinition(def) => {
                    insert_type(&mut schema.types, InputObjectType::from_ast(def))?;
                }
                extension => extensions.push(extension.clone()),
            }
        }

        for extension in &extensions {
            fold_extension(&mut schema, extension)?;
        }

        if !schema_definition_seen {
            // Implicit schema definition: conventional root type names, when
            // the matching object types exist.
            let if_has_object_type = |ty: ast::OperationType| {
                let name = ty.default_type_name();
                schema
                    .types
                    .get(name)?
                    .is_object()
                    .then(|| Name::new(name).expect("default root type names are valid"))
            };
            schema.schema_definition.query = if_has_object_type(ast::OperationType::Query);
            schema.schema_definition.mutation = if_has_object_type(ast::OperationType::Mutation);
            schema.schema_definition.subscription =
                if_has_object_type(ast::OperationType::Subscription);
        }

        check_schema_directives(&schema)?;

        tracing::debug!(
            types = schema.types.len(),
            directives = schema.directive_definitions.len(),
            "built schema"
        );
        Ok(schema)
    }
}

fn built_in_definitions() -> &'static ast::Document {
    static BUILT_IN_TYPES: OnceLock<ast::Document> = OnceLock::new();
    BUILT_IN_TYPES.get_or_init(|| {
        ast::Document::parse(include_str!("built_in_types.graphql"))
            .expect("built-in type definitions parse")
    })
}

fn insert_type(
    types: &mut IndexMap<NamedType, ExtendedType>,
    ty: ExtendedType,
) -> Result<(), BuildError> {
    let name = ty.name().clone();
    if let Some(previous) = types.get(name.as_str()) {
        if previous.is_built_in_scalar() {
            return Err(BuildError::BuiltInScalarRedefinition { name });
        }
        return Err(BuildError::TypeDefinitionCollision { name });
    }
    types.insert(name, ty);
    Ok(())
}

fn set_root_operations(
    schema_definition: &mut SchemaDefinition,
    root_operations: &[(ast::OperationType, NamedType)],
    duplicate_is_error: bool,
) -> Result<(), BuildError> {
    for (operation_type, object_type_name) in root_operations {
        let slot = match operation_type {
            ast::OperationType::Query => &mut schema_definition.query,
            ast::OperationType::Mutation => &mut schema_definition.mutation,
            ast::OperationType::Subscription => &mut schema_definition.subscription,
        };
        if slot.is_some() {
            if duplicate_is_error {
                return Err(BuildError::DuplicateRootOperation {
                    operation_type: operation_type.name(),
                });
            }
            continue;
        }
        *slot = Some(object_type_name.clone());
    }
    Ok(())
}

/// Folds one `extend` block into its base declaration.
///
/// Field, enum-value and union-member collisions are last-write-wins: the
/// extension's entry replaces the base one.
fn fold_extension(schema: &mut Schema, extension: &ast::Definition) -> Result<(), BuildError> {
    let mismatch = |name: &Name, target: &ExtendedType| BuildError::ExtensionKindMismatch {
        name: name.clone(),
        describe_ext: extension.describe(),
        describe_def: target.describe(),
    };

    match extension {
        ast::Definition::SchemaExtension(ext) => {
            schema
                .schema_definition
                .directives
                .0
                .extend(ext.directives.iter().cloned());
            set_root_operations(&mut schema.schema_definition, &ext.root_operations, false)?;
            Ok(())
        }
        ast::Definition::ScalarTypeExtension(ext) => {
            match lookup_extend_target(schema, &ext.name)? {
                ExtendedType::Scalar(ty) => {
                    let ty = ty.make_mut();
                    ty.directives.0.extend(ext.directives.iter().cloned());
                    Ok(())
                }
                other => Err(mismatch(&ext.name, other)),
            }
        }
        ast::Definition::ObjectTypeExtension(ext) => {
            match lookup_extend_target(schema, &ext.name)? {
                ExtendedType::Object(ty) => {
                    let ty = ty.make_mut();
                    ty.directives.0.extend(ext.directives.iter().cloned());
                    ty.implements_interfaces
                        .extend(ext.implements_interfaces.iter().cloned());
                    for field in &ext.fields {
                        ty.fields.insert(field.name.clone(), field.clone());
                    }
                    Ok(())
                }
                other => Err(mismatch(&ext.name, other)),
            }
        }
        ast::Definition::InterfaceTypeExtension(ext) => {
            match lookup_extend_target(schema, &ext.name)? {
                ExtendedType::Interface(ty) => {
                    let ty = ty.make_mut();
                    ty.directives.0.extend(ext.directives.iter().cloned());
                    ty.implements_interfaces
                        .extend(ext.implements_interfaces.iter().cloned());
                    for field in &ext.fields {
                        ty.fields.insert(field.name.clone(), field.clone());
                    }
                    Ok(())
                }
                other => Err(mismatch(&ext.name, other)),
            }
        }
        ast::Definition::UnionTypeExtension(ext) => {
            match lookup_extend_target(schema, &ext.name)? {
                ExtendedType::Union(ty) => {
                    let ty = ty.make_mut();
                    ty.directives.0.extend(ext.directives.iter().cloned());
                    ty.members.extend(ext.members.iter().cloned());
                    Ok(())
                }
                other => Err(mismatch(&ext.name, other)),
            }
        }
        ast::Definition::EnumTypeExtension(ext) => {
            match lookup_extend_target(schema, &ext.name)? {
                ExtendedType::Enum(ty) => {
                    let ty = ty.make_mut();
                    ty.directives.0.extend(ext.directives.iter().cloned());
                    for value in &ext.values {
                        ty.values.insert(value.value.clone(), value.clone());
                    }
                    Ok(())
                }
                other => Err(mismatch(&ext.name, other)),
            }
        }
        ast::Definition::InputObjectTypeExtension(ext) => {
            match lookup_extend_target(schema, &ext.name)? {
                ExtendedType::InputObject(ty) => {
                    let ty = ty.make_mut();
                    ty.directives.0.extend(ext.directives.iter().cloned());
                    for field in &ext.fields {
                        ty.fields.insert(field.name.clone(), field.clone());
                    }
                    Ok(())
                }
                other => Err(mismatch(&ext.name, other)),
            }
        }
        _ => unreachable!("only extensions are deferred to the fold pass"),
    }
}

fn lookup_extend_target<'a>(
    schema: &'a mut Schema,
    name: &Name,
) -> Result<&'a mut ExtendedType, BuildError> {
    schema
        .types
        .get_mut(name.as_str())
        .ok_or_else(|| BuildError::UndefinedExtendTarget { name: name.clone() })
}

impl ScalarType {
    fn from_ast(definition: &Node<ast::ScalarTypeDefinition>) -> ExtendedType {
        ExtendedType::Scalar(Node::new(Self {
            description: definition.description.clone(),
            name: definition.name.clone(),
            directives: definition.directives.clone(),
        }))
    }
}

impl ObjectType {
    fn from_ast(definition: &Node<ast::ObjectTypeDefinition>) -> ExtendedType {
        ExtendedType::Object(Node::new(Self {
            description: definition.description.clone(),
            name: definition.name.clone(),
            implements_interfaces: definition.implements_interfaces.iter().cloned().collect(),
            directives: definition.directives.clone(),
            fields: field_map(&definition.fields),
        }))
    }
}

impl InterfaceType {
    fn from_ast(definition: &Node<ast::InterfaceTypeDefinition>) -> ExtendedType {
        ExtendedType::Interface(Node::new(Self {
            description: definition.description.clone(),
            name: definition.name.clone(),
            implements_interfaces: definition.implements_interfaces.iter().cloned().collect(),
            directives: definition.directives.clone(),
            fields: field_map(&definition.fields),
        }))
    }
}

impl UnionType {
    fn from_ast(definition: &Node<ast::UnionTypeDefinition>) -> ExtendedType {
        ExtendedType::Union(Node::new(Self {
            description: definition.description.clone(),
            name: definition.name.clone(),
            directives: definition.directives.clone(),
            members: definition.members.iter().cloned().collect(),
        }))
    }
}

impl EnumType {
    fn from_ast(definition: &Node<ast::EnumTypeDefinition>) -> ExtendedType {
        ExtendedType::Enum(Node::new(Self {
            description: definition.description.clone(),
            name: definition.name.clone(),
            directives: definition.directives.clone(),
            values: definition
                .values
                .iter()
                .map(|value| (value.value.clone(), value.clone()))
                .collect(),
        }))
    }
}

impl InputObjectType {
    fn from_ast(definition: &Node<ast::InputObjectTypeDefinition>) -> ExtendedType {
        ExtendedType::InputObject(Node::new(Self {
            description: definition.description.clone(),
            name: definition.name.clone(),
            directives: definition.directives.clone(),
            fields: definition
                .fields
                .iter()
                .map(|field| (field.name.clone(), field.clone()))
                .collect(),
        }))
    }
}

fn field_map(fields: &[Node<FieldDefinition>]) -> IndexMap<Name, Node<FieldDefinition>> {
    fields
        .iter()
        .map(|field| (field.name.clone(), field.clone()))
        .collect()
}

/// Checks that every directive applied to a type-system construct is defined
/// and legal at that construct's location.
fn check_schema_directives(schema: &Schema) -> Result<(), BuildError> {
    let check = |directives: &DirectiveList, location: DirectiveLocation| {
        for directive in directives {
            let Some(definition) = schema.directive_definitions.get(directive.name.as_str())
            else {
                return Err(BuildError::UndefinedDirective {
                    name: directive.name.clone(),
                });
            };
            if !definition.is_allowed_location(location) {
                return Err(BuildError::DirectiveNotAllowedAtLocation {
                    name: directive.name.clone(),
                    location,
                });
            }
        }
        Ok(())
    };
    let check_input_values =
        |values: &[Node<InputValueDefinition>], location: DirectiveLocation| {
            values
                .iter()
                .try_for_each(|value| check(&value.directives, location))
        };

    check(
        &schema.schema_definition.directives,
        DirectiveLocation::Schema,
    )?;

    for definition in schema.directive_definitions.values() {
        check_input_values(&definition.arguments, DirectiveLocation::ArgumentDefinition)?;
    }

    for ty in schema.types.values() {
        check(ty.directives(), ty.directive_location())?;
        match ty {
            ExtendedType::Object(object) => {
                for field in object.fields.values() {
                    check(&field.directives, DirectiveLocation::FieldDefinition)?;
                    check_input_values(&field.arguments, DirectiveLocation::ArgumentDefinition)?;
                }
            }
            ExtendedType::Interface(interface) => {
                for field in interface.fields.values() {
                    check(&field.directives, DirectiveLocation::FieldDefinition)?;
                    check_input_values(&field.arguments, DirectiveLocation::ArgumentDefinition)?;
                }
            }
            ExtendedType::Enum(enum_) => {
                for value in enum_.values.values() {
                    check(&value.directives, DirectiveLocation::EnumValue)?;
                }
            }
            ExtendedType::InputObject(input) => {
                for field in input.fields.values() {
                    check(&field.directives, DirectiveLocation::InputFieldDefinition)?;
                }
            }
            ExtendedType::Scalar(_) | ExtendedType::Union(_) => {}
        }
    }
    Ok(())
}
