use trellis_compiler::validation::validate;
use trellis_compiler::validation::RequestError;
use trellis_compiler::validation::ValidationError;
use trellis_compiler::Name;
use trellis_compiler::Schema;
use unindent::unindent;

fn blog_schema() -> Schema {
    Schema::parse(&unindent(
        r#"
        type Query {
          users: [User]
          user(id: ID!): User
          search: [SearchResult]
          actors: [Actor]
        }
        interface Actor {
          id: ID!
        }
        type User implements Actor {
          id: ID!
          name: String
          role: Role
        }
        type Post {
          title: String
          author: User
        }
        union SearchResult = Post | User
        enum Role {
          ADMIN
          MEMBER
        }
        "#,
    ))
    .unwrap()
}

fn validation_error(schema: &Schema, query: &str) -> ValidationError {
    match validate(schema, query).unwrap_err() {
        RequestError::Validation(error) => error,
        other => panic!("expected a validation error, got {other}"),
    }
}

#[test]
fn valid_query_passes() {
    let schema = blog_schema();
    validate(&schema, "{ users { id name } }").unwrap();
}

#[test]
fn undefined_field_is_rejected() {
    let schema = blog_schema();
    let error = validation_error(&schema, "{ users { id posts } }");
    assert_eq!(
        error,
        ValidationError::UndefinedField {
            type_name: "User".try_into().unwrap(),
            field_name: "posts".try_into().unwrap(),
        }
    );
    assert!(error.to_string().contains("posts"));
}

#[test]
fn missing_required_argument_is_rejected() {
    let schema = blog_schema();
    let error = validation_error(&schema, "{ user { id } }");
    let ValidationError::MissingRequiredArguments { coordinate, names } = error else {
        panic!("expected MissingRequiredArguments, got {error}");
    };
    assert_eq!(coordinate, "Query.user");
    assert_eq!(names, [Name::new("id").unwrap()]);
}

#[test]
fn provided_required_argument_passes() {
    let schema = blog_schema();
    validate(&schema, r#"{ user(id: "u1") { id } }"#).unwrap();
}

#[test]
fn document_without_operations_is_rejected() {
    let schema = blog_schema();
    let error = validation_error(&schema, "fragment userFields on User { id }");
    assert_eq!(error, ValidationError::MissingOperation);
}

#[test]
fn operation_without_root_type_is_rejected() {
    let schema = blog_schema();
    let error = validation_error(&schema, "mutation { renameUser }");
    assert_eq!(
        error,
        ValidationError::UndefinedRootOperation {
            operation_type: "mutation",
        }
    );
}

#[test]
fn union_selections_validate_against_every_member() {
    let schema = blog_schema();
    validate(
        &schema,
        &unindent(
            r#"
            {
              search {
                ... on Post { title }
                ... on User { name }
              }
            }
            "#,
        ),
    )
    .unwrap();
}

#[test]
fn empty_union_selection_is_rejected() {
    let schema = blog_schema();
    let error = validation_error(&schema, "{ search }");
    let ValidationError::EmptyUnionSelection {
        field_name,
        union_name,
    } = error
    else {
        panic!("expected EmptyUnionSelection, got {error}");
    };
    assert_eq!(field_name, "search");
    assert_eq!(union_name, "SearchResult");
}

#[test]
fn undefined_type_condition_is_rejected() {
    let schema = blog_schema();
    let error = validation_error(&schema, "{ search { ... on Comment { id } } }");
    assert_eq!(
        error,
        ValidationError::UndefinedType {
            name: "Comment".try_into().unwrap(),
        }
    );
}

#[test]
fn fragment_spread_resolves_and_checks_type() {
    let schema = blog_schema();
    validate(
        &schema,
        &unindent(
            r#"
            { users { ...userFields } }
            fragment userFields on User { id name }
            "#,
        ),
    )
    .unwrap();

    let error = validation_error(&schema, "{ users { ...ghostFields } }");
    assert_eq!(
        error,
        ValidationError::UndefinedFragment {
            name: "ghostFields".try_into().unwrap(),
        }
    );

    let error = validation_error(
        &schema,
        &unindent(
            r#"
            { users { ...postFields } }
            fragment postFields on Post { title }
            "#,
        ),
    );
    let ValidationError::FragmentTypeMismatch {
        declared_type,
        selected_type,
        ..
    } = error
    else {
        panic!("expected FragmentTypeMismatch, got {error}");
    };
    assert_eq!(declared_type, "Post");
    assert_eq!(selected_type, "User");
}

#[test]
fn fragment_on_member_type_spreads_into_union() {
    let schema = blog_schema();
    validate(
        &schema,
        &unindent(
            r#"
            { search { ...postFields } }
            fragment postFields on Post { title }
            "#,
        ),
    )
    .unwrap();
}

#[test]
fn interface_fields_fan_out_to_implementers() {
    let schema = blog_schema();
    // `id` is declared on the interface itself, `name` only on User.
    validate(&schema, "{ actors { id name } }").unwrap();
    validate(&schema, "{ actors { ... on User { role } } }").unwrap();

    let error = validation_error(&schema, "{ actors { karma } }");
    assert!(matches!(error, ValidationError::UndefinedField { .. }));
}

#[test]
fn undefined_directive_in_query_is_rejected() {
    let schema = blog_schema();
    let error = validation_error(&schema, "{ users { id @ghost } }");
    assert_eq!(
        error,
        ValidationError::UndefinedDirective {
            name: "ghost".try_into().unwrap(),
        }
    );
}

#[test]
fn schema_position_directives_are_not_allowed_on_fields() {
    let schema = blog_schema();
    let error = validation_error(&schema, "{ users { id @deprecated } }");
    let ValidationError::DirectiveNotAllowed { name, .. } = error else {
        panic!("expected DirectiveNotAllowed, got {error}");
    };
    assert_eq!(name, "deprecated");
}

#[test]
fn directive_arguments_are_required_too() {
    let schema = blog_schema();
    let error = validation_error(&schema, "{ users { id @include } }");
    let ValidationError::MissingRequiredArguments { coordinate, names } = error else {
        panic!("expected MissingRequiredArguments, got {error}");
    };
    assert_eq!(coordinate, "@include");
    assert_eq!(names, [Name::new("if").unwrap()]);

    validate(&schema, "{ users { id @include(if: $flag) } }").unwrap();
    validate(&schema, "{ users { id @skip(if: false) } }").unwrap();
}

#[test]
fn typename_is_available_on_composites() {
    let schema = blog_schema();
    validate(
        &schema,
        "{ users { __typename } search { __typename ... on Post { title } } }",
    )
    .unwrap();
}

#[test]
fn introspection_meta_fields_validate_on_the_root() {
    let schema = blog_schema();
    validate(
        &schema,
        &unindent(
            r#"
            {
              __schema {
                queryType { name }
                types { kind name }
              }
              __type(name: "User") { name }
            }
            "#,
        ),
    )
    .unwrap();

    // The `name` argument of `__type` is required.
    let error = validation_error(&schema, "{ __type { name } }");
    assert!(matches!(
        error,
        ValidationError::MissingRequiredArguments { .. }
    ));

    // Meta-fields other than __typename do not exist below the root.
    let error = validation_error(&schema, "{ users { __schema { types { name } } } }");
    assert!(matches!(error, ValidationError::UndefinedField { .. }));
}

#[test]
fn validation_is_idempotent() {
    let schema = blog_schema();
    let query = "{ users { id name } }";
    validate(&schema, query).unwrap();
    validate(&schema, query).unwrap();
}

#[test]
fn every_validated_field_exists_in_the_schema() {
    // Walking the same paths validation walked must find a definition for
    // every selected field.
    let schema = blog_schema();
    validate(&schema, "{ users { id name role } user(id: \"u1\") { id } }").unwrap();

    let query_type = schema.get_object("Query").unwrap();
    for field in ["users", "user", "search", "actors"] {
        assert!(query_type.fields.contains_key(field));
    }
    let user = schema.get_object("User").unwrap();
    for field in ["id", "name", "role"] {
        assert!(user.fields.contains_key(field));
    }
}
