//! High-level representation of a GraphQL schema: every type extension
//! folded into its base definition, built-ins seeded, and name indexes built.
//!
//! A [`Schema`] is produced by a [`SchemaBuilder`] and treated as immutable
//! afterwards; validation and planning only read from it, so sharing one
//! across concurrent requests is safe.

use crate::ast;
use crate::ast::OperationType;
use crate::collections::HashMap;
use crate::collections::HashSet;
use crate::collections::IndexMap;
use crate::collections::IndexSet;
use trellis_parser::Name;
use trellis_parser::Node;

mod from_ast;

pub use self::from_ast::BuildError;
pub use self::from_ast::SchemaBuilder;
pub use crate::ast::Directive;
pub use crate::ast::DirectiveDefinition;
pub use crate::ast::DirectiveList;
pub use crate::ast::DirectiveLocation;
pub use crate::ast::EnumValueDefinition;
pub use crate::ast::FieldDefinition;
pub use crate::ast::InputValueDefinition;
pub use crate::ast::NamedType;
pub use crate::ast::Type;
pub use crate::ast::Value;

#[derive(Debug, Clone)]
pub struct Schema {
    /// The `schema` definition with its extensions folded in, naming the
    /// root operation types.
    pub schema_definition: SchemaDefinition,

    /// Built-in and explicit directive definitions, keyed by name.
    pub directive_definitions: IndexMap<Name, Node<DirectiveDefinition>>,

    /// Built-in scalars, introspection types and explicit types, keyed by
    /// name, with extensions folded in.
    pub types: IndexMap<NamedType, ExtendedType>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaDefinition {
    pub description: Option<String>,
    pub directives: DirectiveList,

    /// Name of the object type for the `query` root operation.
    pub query: Option<Name>,

    /// Name of the object type for the `mutation` root operation.
    pub mutation: Option<Name>,

    /// Name of the object type for the `subscription` root operation.
    pub subscription: Option<Name>,
}

/// The definition of a named type, with all extension content folded in.
///
/// The kind is explicit so consumers dispatch by pattern matching; every
/// recursion site over the type universe is exhaustively checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtendedType {
    Scalar(Node<ScalarType>),
    Object(Node<ObjectType>),
    Interface(Node<InterfaceType>),
    Union(Node<UnionType>),
    Enum(Node<EnumType>),
    InputObject(Node<InputObjectType>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalarType {
    pub description: Option<String>,
    pub name: Name,
    pub directives: DirectiveList,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectType {
    pub description: Option<String>,
    pub name: Name,
    pub implements_interfaces: IndexSet<Name>,
    pub directives: DirectiveList,
    pub fields: IndexMap<Name, Node<FieldDefinition>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceType {
    pub description: Option<String>,
    pub name: Name,
    pub implements_interfaces: IndexSet<Name>,
    pub directives: DirectiveList,
    pub fields: IndexMap<Name, Node<FieldDefinition>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnionType {
    pub description: Option<String>,
    pub name: Name,
    pub directives: DirectiveList,
    pub members: IndexSet<Name>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumType {
    pub description: Option<String>,
    pub name: Name,
    pub directives: DirectiveList,
    pub values: IndexMap<Name, Node<EnumValueDefinition>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputObjectType {
    pub description: Option<String>,
    pub name: Name,
    pub directives: DirectiveList,
    pub fields: IndexMap<Name, Node<InputValueDefinition>>,
}

impl Schema {
    /// Returns an (almost) empty schema: built-in directives, built-in
    /// scalars and introspection types, ready to be filled.
    pub fn new() -> Self {
        SchemaBuilder::new()
            .build()
            .expect("built-in definitions are valid")
    }

    /// Returns a new builder, initialized with built-in directives, built-in
    /// scalars and introspection types.
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::new()
    }

    /// Parse a single SDL source into a schema.
    ///
    /// Use [`builder()`][Self::builder] to combine multiple source files.
    pub fn parse(source: &str) -> Result<Self, BuildError> {
        let mut builder = SchemaBuilder::new();
        builder.add_source(source)?;
        builder.build()
    }

    /// The name of the root operation type for the given operation kind.
    pub fn root_operation(&self, operation_type: OperationType) -> Option<&Name> {
        match operation_type {
            OperationType::Query => &self.schema_definition.query,
            OperationType::Mutation => &self.schema_definition.mutation,
            OperationType::Subscription => &self.schema_definition.subscription,
        }
        .as_ref()
    }

    /// Returns the type with the given name, if it is a scalar type.
    pub fn get_scalar(&self, name: &str) -> Option<&Node<ScalarType>> {
        if let Some(ExtendedType::Scalar(ty)) = self.types.get(name) {
            Some(ty)
        } else {
            None
        }
    }

    /// Returns the type with the given name, if it is an object type.
    pub fn get_object(&self, name: &str) -> Option<&Node<ObjectType>> {
        if let Some(ExtendedType::Object(ty)) = self.types.get(name) {
            Some(ty)
        } else {
            None
        }
    }

    /// Returns the type with the given name, if it is an interface type.
    pub fn get_interface(&self, name: &str) -> Option<&Node<InterfaceType>> {
        if let Some(ExtendedType::Interface(ty)) = self.types.get(name) {
            Some(ty)
        } else {
            None
        }
    }

    /// Returns the type with the given name, if it is a union type.
    pub fn get_union(&self, name: &str) -> Option<&Node<UnionType>> {
        if let Some(ExtendedType::Union(ty)) = self.types.get(name) {
            Some(ty)
        } else {
            None
        }
    }

    /// Returns the type with the given name, if it is an enum type.
    pub fn get_enum(&self, name: &str) -> Option<&Node<EnumType>> {
        if let Some(ExtendedType::Enum(ty)) = self.types.get(name) {
            Some(ty)
        } else {
            None
        }
    }

    /// Returns the type with the given name, if it is an input object type.
    pub fn get_input_object(&self, name: &str) -> Option<&Node<InputObjectType>> {
        if let Some(ExtendedType::InputObject(ty)) = self.types.get(name) {
            Some(ty)
        } else {
            None
        }
    }

    /// Returns the definition of a field of an object or interface type.
    pub fn type_field(&self, type_name: &str, field_name: &str) -> Option<&Node<FieldDefinition>> {
        self.types.get(type_name)?.field(field_name)
    }

    /// The object types that declare `implements` for the given interface.
    ///
    /// Derived by scanning all object types; use
    /// [`implementers_map`][Self::implementers_map] to precompute the
    /// relation for every interface at once.
    pub fn implementers_of<'a>(
        &'a self,
        interface: &'a str,
    ) -> impl Iterator<Item = &'a Node<ObjectType>> + 'a {
        self.types.values().filter_map(move |ty| {
            if let ExtendedType::Object(object) = ty {
                object
                    .implements_interfaces
                    .contains(interface)
                    .then_some(object)
            } else {
                None
            }
        })
    }

    /// For each interface name, the names of the object types implementing
    /// it.
    pub fn implementers_map(&self) -> HashMap<Name, HashSet<Name>> {
        let mut map: HashMap<Name, HashSet<Name>> = HashMap::default();
        for ty in self.types.values() {
            if let ExtendedType::Object(object) = ty {
                for interface in &object.implements_interfaces {
                    map.entry(interface.clone())
                        .or_default()
                        .insert(object.name.clone());
                }
            }
        }
        map
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtendedType {
    pub fn name(&self) -> &Name {
        match self {
            ExtendedType::Scalar(ty) => &ty.name,
            ExtendedType::Object(ty) => &ty.name,
            ExtendedType::Interface(ty) => &ty.name,
            ExtendedType::Union(ty) => &ty.name,
            ExtendedType::Enum(ty) => &ty.name,
            ExtendedType::InputObject(ty) => &ty.name,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            ExtendedType::Scalar(ty) => ty.description.as_deref(),
            ExtendedType::Object(ty) => ty.description.as_deref(),
            ExtendedType::Interface(ty) => ty.description.as_deref(),
            ExtendedType::Union(ty) => ty.description.as_deref(),
            ExtendedType::Enum(ty) => ty.description.as_deref(),
            ExtendedType::InputObject(ty) => ty.description.as_deref(),
        }
    }

    pub fn directives(&self) -> &DirectiveList {
        match self {
            ExtendedType::Scalar(ty) => &ty.directives,
            ExtendedType::Object(ty) => &ty.directives,
            ExtendedType::Interface(ty) => &ty.directives,
            ExtendedType::Union(ty) => &ty.directives,
            ExtendedType::Enum(ty) => &ty.directives,
            ExtendedType::InputObject(ty) => &ty.directives,
        }
    }

    /// Looks up an explicit field definition on a field-bearing kind.
    /// Returns `None` for scalars, enums, unions and input objects.
    pub fn field(&self, name: &str) -> Option<&Node<FieldDefinition>> {
        match self {
            ExtendedType::Object(ty) => ty.fields.get(name),
            ExtendedType::Interface(ty) => ty.fields.get(name),
            _ => None,
        }
    }

    pub fn is_object(&self) -> bool {
        matches!(self, ExtendedType::Object(_))
    }

    pub fn is_interface(&self) -> bool {
        matches!(self, ExtendedType::Interface(_))
    }

    pub fn is_union(&self) -> bool {
        matches!(self, ExtendedType::Union(_))
    }

    /// Whether selection sets can be applied to this type.
    pub fn is_composite(&self) -> bool {
        matches!(
            self,
            ExtendedType::Object(_) | ExtendedType::Interface(_) | ExtendedType::Union(_)
        )
    }

    /// Whether this is one of the scalars every schema defines implicitly.
    pub fn is_built_in_scalar(&self) -> bool {
        matches!(self, ExtendedType::Scalar(ty) if is_built_in_scalar_name(&ty.name))
    }

    /// The directive location matching this type kind.
    pub fn directive_location(&self) -> DirectiveLocation {
        match self {
            ExtendedType::Scalar(_) => DirectiveLocation::Scalar,
            ExtendedType::Object(_) => DirectiveLocation::Object,
            ExtendedType::Interface(_) => DirectiveLocation::Interface,
            ExtendedType::Union(_) => DirectiveLocation::Union,
            ExtendedType::Enum(_) => DirectiveLocation::Enum,
            ExtendedType::InputObject(_) => DirectiveLocation::InputObject,
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            ExtendedType::Scalar(_) => "a scalar type",
            ExtendedType::Object(_) => "an object type",
            ExtendedType::Interface(_) => "an interface type",
            ExtendedType::Union(_) => "a union type",
            ExtendedType::Enum(_) => "an enum type",
            ExtendedType::InputObject(_) => "an input object type",
        }
    }
}

impl ObjectType {
    pub fn implements(&self, interface: &str) -> bool {
        self.implements_interfaces.contains(interface)
    }
}

impl UnionType {
    pub fn has_member(&self, name: &str) -> bool {
        self.members.contains(name)
    }
}

pub(crate) fn is_built_in_scalar_name(name: &str) -> bool {
    matches!(name, "Int" | "Float" | "String" | "Boolean" | "ID")
}
