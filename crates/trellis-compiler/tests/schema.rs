use trellis_compiler::schema::BuildError;
use trellis_compiler::schema::DirectiveLocation;
use trellis_compiler::schema::ExtendedType;
use trellis_compiler::Schema;
use unindent::unindent;

#[test]
fn empty_schema_has_built_ins() {
    let schema = Schema::new();

    for scalar in ["Int", "Float", "String", "Boolean", "ID"] {
        assert!(schema.get_scalar(scalar).is_some(), "missing scalar {scalar}");
    }
    for introspection_type in [
        "__Schema",
        "__Type",
        "__Field",
        "__InputValue",
        "__EnumValue",
        "__Directive",
        "__TypeKind",
        "__DirectiveLocation",
    ] {
        assert!(
            schema.types.contains_key(introspection_type),
            "missing introspection type {introspection_type}"
        );
    }
    for directive in ["skip", "include", "deprecated", "specifiedBy"] {
        assert!(
            schema.directive_definitions.contains_key(directive),
            "missing built-in directive {directive}"
        );
    }

    // The introspection field shapes are fixed.
    let ty = schema.get_object("__Type").unwrap();
    assert_eq!(ty.fields["kind"].ty.to_string(), "__TypeKind!");
    assert_eq!(ty.fields["fields"].ty.to_string(), "[__Field!]");
    let skip = &schema.directive_definitions["skip"];
    assert_eq!(skip.locations.len(), 3);
    assert!(skip.is_allowed_location(DirectiveLocation::Field));
    assert!(!skip.is_allowed_location(DirectiveLocation::FieldDefinition));
}

#[test]
fn root_operations_default_to_conventional_names() {
    let schema = Schema::parse("type Query { ok: Boolean }").unwrap();
    assert_eq!(
        schema
            .root_operation(trellis_compiler::ast::OperationType::Query)
            .unwrap(),
        "Query"
    );
    assert!(schema
        .root_operation(trellis_compiler::ast::OperationType::Mutation)
        .is_none());
}

#[test]
fn explicit_schema_definition_names_root_types() {
    let schema = Schema::parse(&unindent(
        r#"
        schema {
          query: RootQuery
        }
        type RootQuery { ok: Boolean }
        "#,
    ))
    .unwrap();
    assert_eq!(
        schema
            .root_operation(trellis_compiler::ast::OperationType::Query)
            .unwrap(),
        "RootQuery"
    );
}

#[test]
fn extension_fields_merge_into_base_type() {
    // Which file contributes which field must not matter.
    for source in [
        "type User { id: ID! }\nextend type User { email: String! }",
        "extend type User { email: String! }\ntype User { id: ID! }",
    ] {
        let schema = Schema::parse(source).unwrap();
        let user = schema.get_object("User").unwrap();
        assert!(user.fields.contains_key("id"), "in {source:?}");
        assert!(user.fields.contains_key("email"), "in {source:?}");
        assert!(user.fields["email"].ty.is_non_null());
    }
}

#[test]
fn merging_without_extensions_is_a_no_op() {
    let source = "type User { id: ID! name: String }";
    let schema = Schema::parse(source).unwrap();
    let user = schema.get_object("User").unwrap();
    assert_eq!(
        user.fields.keys().map(|k| k.as_str()).collect::<Vec<_>>(),
        ["id", "name"]
    );
}

#[test]
fn disjoint_extensions_union_their_fields() {
    let schema = Schema::parse(&unindent(
        r#"
        type User { id: ID! }
        extend type User { email: String }
        extend type User { age: Int }
        "#,
    ))
    .unwrap();
    let user = schema.get_object("User").unwrap();
    assert_eq!(user.fields.len(), 3);
}

#[test]
fn extension_field_collision_is_last_write_wins() {
    let schema = Schema::parse(&unindent(
        r#"
        type User { name: String }
        extend type User { name: String! }
        "#,
    ))
    .unwrap();
    let user = schema.get_object("User").unwrap();
    assert!(user.fields["name"].ty.is_non_null());
}

#[test]
fn extending_an_undefined_type_fails() {
    let error = Schema::parse("extend type Ghost { id: ID }").unwrap_err();
    assert!(matches!(
        error,
        BuildError::UndefinedExtendTarget { name } if name == "Ghost"
    ));
}

#[test]
fn extension_kind_must_match_definition_kind() {
    let error = Schema::parse("scalar Odd\nextend type Odd { id: ID }").unwrap_err();
    assert!(matches!(error, BuildError::ExtensionKindMismatch { .. }));
}

#[test]
fn duplicate_type_definitions_fail() {
    let error = Schema::parse("type User { id: ID }\ntype User { id: ID }").unwrap_err();
    assert!(matches!(
        error,
        BuildError::TypeDefinitionCollision { name } if name == "User"
    ));
}

#[test]
fn built_in_scalars_must_not_be_redefined() {
    let error = Schema::parse("scalar Int").unwrap_err();
    assert!(matches!(error, BuildError::BuiltInScalarRedefinition { .. }));
}

#[test]
fn schema_extension_adds_missing_root_operations() {
    let schema = Schema::parse(&unindent(
        r#"
        schema { query: Query }
        extend schema { mutation: Mutation }
        type Query { ok: Boolean }
        type Mutation { rename: Boolean }
        "#,
    ))
    .unwrap();
    assert_eq!(
        schema
            .root_operation(trellis_compiler::ast::OperationType::Mutation)
            .unwrap(),
        "Mutation"
    );
}

#[test]
fn undefined_directive_in_sdl_fails() {
    let error = Schema::parse("type Query @ghost { ok: Boolean }").unwrap_err();
    assert!(matches!(
        error,
        BuildError::UndefinedDirective { name } if name == "ghost"
    ));
}

#[test]
fn directive_must_be_legal_at_its_location() {
    // @deprecated is a FIELD_DEFINITION-position directive, not OBJECT.
    let error = Schema::parse("type Query @deprecated { ok: Boolean }").unwrap_err();
    assert!(matches!(
        error,
        BuildError::DirectiveNotAllowedAtLocation {
            name,
            location: DirectiveLocation::Object,
        } if name == "deprecated"
    ));

    // In its declared position it is accepted.
    Schema::parse("type Query { ok: Boolean @deprecated }").unwrap();
}

#[test]
fn custom_directives_check_against_declared_locations() {
    let source = unindent(
        r#"
        directive @auth(role: String!) on OBJECT | FIELD_DEFINITION
        type Query @auth(role: "admin") {
          ok: Boolean @auth(role: "admin")
        }
        "#,
    );
    Schema::parse(&source).unwrap();

    let error = Schema::parse(&unindent(
        r#"
        directive @auth(role: String!) on OBJECT
        enum Role @auth(role: "admin") { ADMIN }
        "#,
    ))
    .unwrap_err();
    assert!(matches!(
        error,
        BuildError::DirectiveNotAllowedAtLocation {
            location: DirectiveLocation::Enum,
            ..
        }
    ));
}

#[test]
fn union_members_and_implementers_are_indexed() {
    let schema = Schema::parse(&unindent(
        r#"
        interface Actor { id: ID! }
        type User implements Actor { id: ID! name: String }
        type Bot implements Actor { id: ID! }
        type Post { title: String }
        union SearchResult = Post | User
        "#,
    ))
    .unwrap();

    let union_ = schema.get_union("SearchResult").unwrap();
    assert!(union_.has_member("Post"));
    assert!(union_.has_member("User"));
    assert!(!union_.has_member("Bot"));

    let implementers: Vec<_> = schema
        .implementers_of("Actor")
        .map(|object| object.name.as_str())
        .collect();
    assert_eq!(implementers, ["User", "Bot"]);

    let map = schema.implementers_map();
    assert_eq!(map["Actor"].len(), 2);

    // Unknown names are misses, not panics.
    assert!(schema.types.get("Ghost").is_none());
    assert!(schema.get_object("Ghost").is_none());
    assert!(schema.implementers_of("Ghost").next().is_none());
}

#[test]
fn type_field_resolves_through_object_and_interface() {
    let schema = Schema::parse(&unindent(
        r#"
        interface Actor { id: ID! }
        type User implements Actor { id: ID! name: String }
        type Query { me: User }
        "#,
    ))
    .unwrap();
    assert!(schema.type_field("User", "name").is_some());
    assert!(schema.type_field("Actor", "id").is_some());
    assert!(schema.type_field("User", "ghost").is_none());

    match schema.types.get("User").unwrap() {
        ExtendedType::Object(user) => assert_eq!(user.name, "User"),
        other => panic!("User must index as an object type, got {other:?}"),
    }
}

#[test]
fn executable_definitions_are_rejected_in_sdl() {
    let error = Schema::parse("type Query { ok: Boolean }\nquery Probe { ok }").unwrap_err();
    assert!(matches!(error, BuildError::ExecutableDefinition { .. }));
}
