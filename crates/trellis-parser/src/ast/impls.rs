use super::*;
use crate::ParseError;
use crate::Parser;

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a document with the default parser configuration.
    pub fn parse(source: &str) -> Result<Self, ParseError> {
        Parser::new(source)?.parse_document()
    }
}

impl Definition {
    /// The name of the definition or extension, if it has one (operations
    /// may not; schema definitions never do).
    pub fn name(&self) -> Option<&Name> {
        match self {
            Definition::OperationDefinition(def) => def.name.as_ref(),
            Definition::FragmentDefinition(def) => Some(&def.name),
            Definition::DirectiveDefinition(def) => Some(&def.name),
            Definition::SchemaDefinition(_) | Definition::SchemaExtension(_) => None,
            Definition::ScalarTypeDefinition(def) => Some(&def.name),
            Definition::ObjectTypeDefinition(def) => Some(&def.name),
            Definition::InterfaceTypeDefinition(def) => Some(&def.name),
            Definition::UnionTypeDefinition(def) => Some(&def.name),
            Definition::EnumTypeDefinition(def) => Some(&def.name),
            Definition::InputObjectTypeDefinition(def) => Some(&def.name),
            Definition::ObjectTypeExtension(ext) => Some(&ext.name),
            Definition::InterfaceTypeExtension(ext) => Some(&ext.name),
            Definition::UnionTypeExtension(ext) => Some(&ext.name),
            Definition::EnumTypeExtension(ext) => Some(&ext.name),
            Definition::InputObjectTypeExtension(ext) => Some(&ext.name),
            Definition::ScalarTypeExtension(ext) => Some(&ext.name),
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            Definition::OperationDefinition(_) => "an operation definition",
            Definition::FragmentDefinition(_) => "a fragment definition",
            Definition::DirectiveDefinition(_) => "a directive definition",
            Definition::SchemaDefinition(_) => "a schema definition",
            Definition::ScalarTypeDefinition(_) => "a scalar type definition",
            Definition::ObjectTypeDefinition(_) => "an object type definition",
            Definition::InterfaceTypeDefinition(_) => "an interface type definition",
            Definition::UnionTypeDefinition(_) => "a union type definition",
            Definition::EnumTypeDefinition(_) => "an enum type definition",
            Definition::InputObjectTypeDefinition(_) => "an input object type definition",
            Definition::SchemaExtension(_) => "a schema extension",
            Definition::ObjectTypeExtension(_) => "an object type extension",
            Definition::InterfaceTypeExtension(_) => "an interface type extension",
            Definition::UnionTypeExtension(_) => "a union type extension",
            Definition::EnumTypeExtension(_) => "an enum type extension",
            Definition::InputObjectTypeExtension(_) => "an input object type extension",
            Definition::ScalarTypeExtension(_) => "a scalar type extension",
        }
    }

    pub fn is_executable(&self) -> bool {
        matches!(
            self,
            Definition::OperationDefinition(_) | Definition::FragmentDefinition(_)
        )
    }

    pub fn is_extension(&self) -> bool {
        matches!(
            self,
            Definition::SchemaExtension(_)
                | Definition::ObjectTypeExtension(_)
                | Definition::InterfaceTypeExtension(_)
                | Definition::UnionTypeExtension(_)
                | Definition::EnumTypeExtension(_)
                | Definition::InputObjectTypeExtension(_)
                | Definition::ScalarTypeExtension(_)
        )
    }
}

impl Type {
    /// Returns the innermost named type, unwrapping any list and non-null
    /// wrappers.
    pub fn inner_named_type(&self) -> &NamedType {
        match self {
            Type::Named(name) | Type::NonNullNamed(name) => name,
            Type::List(inner) | Type::NonNullList(inner) => inner.inner_named_type(),
        }
    }

    /// Whether this type rejects `null` at its outermost level.
    pub fn is_non_null(&self) -> bool {
        matches!(self, Type::NonNullNamed(_) | Type::NonNullList(_))
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Type::List(_) | Type::NonNullList(_))
    }

    pub fn new_named(name: &str) -> Result<Self, crate::InvalidNameError> {
        Ok(Type::Named(Name::new(name)?))
    }

    /// Wraps into a list type, preserving this type as the element.
    pub fn list(self) -> Self {
        Type::List(Box::new(self))
    }

    /// Returns the non-null version of this type.
    pub fn non_null(self) -> Self {
        match self {
            Type::Named(name) => Type::NonNullNamed(name),
            Type::List(inner) => Type::NonNullList(inner),
            ty @ (Type::NonNullNamed(_) | Type::NonNullList(_)) => ty,
        }
    }
}

impl FieldDefinition {
    pub fn argument_by_name(&self, name: &str) -> Option<&Node<InputValueDefinition>> {
        self.arguments.iter().find(|argument| argument.name == name)
    }

    /// The arguments a caller must provide: non-null type, no default.
    pub fn required_arguments(&self) -> impl Iterator<Item = &Node<InputValueDefinition>> {
        self.arguments.iter().filter(|argument| argument.is_required())
    }
}

impl InputValueDefinition {
    pub fn is_required(&self) -> bool {
        self.ty.is_non_null() && self.default_value.is_none()
    }
}

impl Directive {
    pub fn argument_by_name(&self, name: &str) -> Option<&Node<Value>> {
        self.arguments
            .iter()
            .find(|argument| argument.name == name)
            .map(|argument| &argument.value)
    }
}

impl DirectiveList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node<Directive>> {
        self.0.iter()
    }

    /// Returns the first directive with the given name, if any.
    pub fn get(&self, name: &str) -> Option<&Node<Directive>> {
        self.0.iter().find(|directive| directive.name == name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

impl<'a> IntoIterator for &'a DirectiveList {
    type Item = &'a Node<Directive>;
    type IntoIter = std::slice::Iter<'a, Node<Directive>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<Node<Directive>> for DirectiveList {
    fn from_iter<T: IntoIterator<Item = Node<Directive>>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl DirectiveDefinition {
    pub fn argument_by_name(&self, name: &str) -> Option<&Node<InputValueDefinition>> {
        self.arguments.iter().find(|argument| argument.name == name)
    }

    pub fn required_arguments(&self) -> impl Iterator<Item = &Node<InputValueDefinition>> {
        self.arguments.iter().filter(|argument| argument.is_required())
    }

    pub fn is_allowed_location(&self, location: DirectiveLocation) -> bool {
        self.locations.contains(&location)
    }

    /// Whether any of the declared locations is a type-system position.
    pub fn is_schema_directive(&self) -> bool {
        self.locations
            .iter()
            .any(|location| location.is_schema_location())
    }

    /// Whether any of the declared locations is an executable-document
    /// position.
    pub fn is_executable_directive(&self) -> bool {
        self.locations
            .iter()
            .any(|location| location.is_executable_location())
    }
}

impl DirectiveLocation {
    /// The name of this location in SDL, e.g. `FIELD_DEFINITION`.
    pub fn name(self) -> &'static str {
        match self {
            DirectiveLocation::Query => "QUERY",
            DirectiveLocation::Mutation => "MUTATION",
            DirectiveLocation::Subscription => "SUBSCRIPTION",
            DirectiveLocation::Field => "FIELD",
            DirectiveLocation::FragmentDefinition => "FRAGMENT_DEFINITION",
            DirectiveLocation::FragmentSpread => "FRAGMENT_SPREAD",
            DirectiveLocation::InlineFragment => "INLINE_FRAGMENT",
            DirectiveLocation::VariableDefinition => "VARIABLE_DEFINITION",
            DirectiveLocation::Schema => "SCHEMA",
            DirectiveLocation::Scalar => "SCALAR",
            DirectiveLocation::Object => "OBJECT",
            DirectiveLocation::FieldDefinition => "FIELD_DEFINITION",
            DirectiveLocation::ArgumentDefinition => "ARGUMENT_DEFINITION",
            DirectiveLocation::Interface => "INTERFACE",
            DirectiveLocation::Union => "UNION",
            DirectiveLocation::Enum => "ENUM",
            DirectiveLocation::EnumValue => "ENUM_VALUE",
            DirectiveLocation::InputObject => "INPUT_OBJECT",
            DirectiveLocation::InputFieldDefinition => "INPUT_FIELD_DEFINITION",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "QUERY" => DirectiveLocation::Query,
            "MUTATION" => DirectiveLocation::Mutation,
            "SUBSCRIPTION" => DirectiveLocation::Subscription,
            "FIELD" => DirectiveLocation::Field,
            "FRAGMENT_DEFINITION" => DirectiveLocation::FragmentDefinition,
            "FRAGMENT_SPREAD" => DirectiveLocation::FragmentSpread,
            "INLINE_FRAGMENT" => DirectiveLocation::InlineFragment,
            "VARIABLE_DEFINITION" => DirectiveLocation::VariableDefinition,
            "SCHEMA" => DirectiveLocation::Schema,
            "SCALAR" => DirectiveLocation::Scalar,
            "OBJECT" => DirectiveLocation::Object,
            "FIELD_DEFINITION" => DirectiveLocation::FieldDefinition,
            "ARGUMENT_DEFINITION" => DirectiveLocation::ArgumentDefinition,
            "INTERFACE" => DirectiveLocation::Interface,
            "UNION" => DirectiveLocation::Union,
            "ENUM" => DirectiveLocation::Enum,
            "ENUM_VALUE" => DirectiveLocation::EnumValue,
            "INPUT_OBJECT" => DirectiveLocation::InputObject,
            "INPUT_FIELD_DEFINITION" => DirectiveLocation::InputFieldDefinition,
            _ => return None,
        })
    }

    /// Whether this location sits on a type-system construct.
    pub fn is_schema_location(self) -> bool {
        matches!(
            self,
            DirectiveLocation::Schema
                | DirectiveLocation::Scalar
                | DirectiveLocation::Object
                | DirectiveLocation::FieldDefinition
                | DirectiveLocation::ArgumentDefinition
                | DirectiveLocation::Interface
                | DirectiveLocation::Union
                | DirectiveLocation::Enum
                | DirectiveLocation::EnumValue
                | DirectiveLocation::InputObject
                | DirectiveLocation::InputFieldDefinition
        )
    }

    /// Whether this location sits on an executable-document construct.
    pub fn is_executable_location(self) -> bool {
        !self.is_schema_location()
    }
}

impl OperationType {
    pub fn name(self) -> &'static str {
        match self {
            OperationType::Query => "query",
            OperationType::Mutation => "mutation",
            OperationType::Subscription => "subscription",
        }
    }

    /// The conventional root type name used when no `schema` definition names
    /// one explicitly.
    pub fn default_type_name(self) -> &'static str {
        match self {
            OperationType::Query => "Query",
            OperationType::Mutation => "Mutation",
            OperationType::Subscription => "Subscription",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "query" => OperationType::Query,
            "mutation" => OperationType::Mutation,
            "subscription" => OperationType::Subscription,
            _ => return None,
        })
    }
}

impl Selection {
    pub fn directives(&self) -> &DirectiveList {
        match self {
            Selection::Field(field) => &field.directives,
            Selection::FragmentSpread(spread) => &spread.directives,
            Selection::InlineFragment(inline) => &inline.directives,
        }
    }

    pub fn as_field(&self) -> Option<&Node<Field>> {
        if let Selection::Field(field) = self {
            Some(field)
        } else {
            None
        }
    }
}

impl Value {
    pub fn describe(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Enum(_) => "an enum value",
            Value::Variable(_) => "a variable reference",
            Value::String(_) => "a string",
            Value::Float(_) => "a float",
            Value::Int(_) => "an integer",
            Value::Boolean(_) => "a boolean",
            Value::List(_) => "a list",
            Value::Object(_) => "an object",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        if let Value::Boolean(value) = self {
            Some(*value)
        } else {
            None
        }
    }

    pub fn as_variable(&self) -> Option<&Name> {
        if let Value::Variable(name) = self {
            Some(name)
        } else {
            None
        }
    }
}
