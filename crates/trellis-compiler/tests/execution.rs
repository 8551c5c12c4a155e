use pretty_assertions::assert_eq;
use serde_json_bytes::json;
use trellis_compiler::execution::plan_execution;
use trellis_compiler::execution::plan_operation;
use trellis_compiler::execution::JsonMap;
use trellis_compiler::execution::PlanError;
use trellis_compiler::execution::PlanNode;
use trellis_compiler::validation::validate;
use trellis_compiler::ExecutableDocument;
use trellis_compiler::Schema;
use unindent::unindent;

fn blog_schema() -> Schema {
    Schema::parse(&unindent(
        r#"
        type Query {
          users: [User]
          search: [SearchResult]
        }
        type User {
          id: ID!
          name: String
        }
        type Post {
          title: String
        }
        union SearchResult = Post | User
        "#,
    ))
    .unwrap()
}

fn plan(schema: &Schema, query: &str) -> Vec<PlanNode> {
    let document = validate(schema, query).unwrap();
    plan_operation(&document.operations[0], &document.fragments).unwrap()
}

fn names(nodes: &[PlanNode]) -> Vec<&str> {
    nodes
        .iter()
        .map(|node| node.name.as_deref().unwrap_or("<fragment>"))
        .collect()
}

fn variables(value: serde_json_bytes::Value) -> JsonMap {
    match value {
        serde_json_bytes::Value::Object(map) => map,
        _ => unreachable!("tests pass JSON objects"),
    }
}

#[test]
fn simple_query_plans_one_node_per_field() {
    let schema = blog_schema();
    let plan = plan(&schema, "{ users { id name } }");

    assert_eq!(plan.len(), 1);
    let users = &plan[0];
    assert_eq!(users.name.as_deref(), Some("users"));
    assert_eq!(names(&users.children), ["id", "name"]);
    assert!(!users.has_fragment());
    assert!(users.child("id").is_some());
    assert!(users.child("posts").is_none());
}

#[test]
fn field_arguments_are_carried_on_the_node() {
    let schema = Schema::parse("type Query { user(id: ID!): User } type User { id: ID! }").unwrap();
    let plan = plan(&schema, r#"{ user(id: "u7") { id } }"#);
    let user = &plan[0];
    assert_eq!(user.arguments.len(), 1);
    assert_eq!(user.arguments[0].name, "id");
    assert_eq!(user.arguments[0].value.to_string(), r#""u7""#);
}

#[test]
fn spreads_flatten_to_the_same_shape_as_inline_fragments() {
    let schema = blog_schema();
    let spread = plan(
        &schema,
        &unindent(
            r#"
            { users { ...userFields } }
            fragment userFields on User { id name }
            "#,
        ),
    );
    let inline = plan(&schema, "{ users { ... on User { id name } } }");

    // Identical shape, up to the node's type tag coming from the fragment.
    assert_eq!(spread, inline);

    let branch = &spread[0].children[0];
    assert!(branch.name.is_none());
    assert_eq!(branch.type_condition.as_deref(), Some("User"));
    assert_eq!(names(&branch.children), ["id", "name"]);
}

#[test]
fn nested_fragments_flatten_recursively() {
    let schema = blog_schema();
    let plan = plan(
        &schema,
        &unindent(
            r#"
            { search { ...resultFields } }
            fragment resultFields on SearchResult {
              ... on Post { title }
              ... on User { ...userFields }
            }
            fragment userFields on User { id name }
            "#,
        ),
    );

    let search = &plan[0];
    assert!(search.has_fragment());
    let result_branch = &search.children[0];
    assert_eq!(result_branch.type_condition.as_deref(), Some("SearchResult"));
    let post_branch = &result_branch.children[0];
    assert_eq!(post_branch.type_condition.as_deref(), Some("Post"));
    assert_eq!(names(&post_branch.children), ["title"]);
    let user_branch = &result_branch.children[1];
    let nested = &user_branch.children[0];
    assert_eq!(nested.type_condition.as_deref(), Some("User"));
    assert_eq!(names(&nested.children), ["id", "name"]);
}

#[test]
fn fragment_type_reports_the_first_conditioned_descendant() {
    let schema = blog_schema();
    let plan = plan(
        &schema,
        "{ search { ... on Post { title } ... on User { name } } }",
    );
    let search = &plan[0];
    assert!(search.has_fragment());
    assert_eq!(search.fragment_type().unwrap(), "Post");

    let plain = plan_execution(
        &validate(&schema, "{ users { id } }").unwrap().operations[0].selection_set,
        &Default::default(),
    )
    .unwrap();
    assert!(plain[0].fragment_type().is_none());
}

#[test]
fn planning_an_unresolved_spread_is_a_programming_error() {
    let document = ExecutableDocument::parse("{ users { ...ghost } }").unwrap();
    let error = plan_operation(&document.operations[0], &document.fragments).unwrap_err();
    assert!(matches!(
        error,
        PlanError::UndefinedFragment { name } if name == "ghost"
    ));
}

#[test]
fn directives_survive_planning_and_gate_inclusion() {
    let schema = blog_schema();
    let plan = plan(
        &schema,
        "{ users { id name @include(if: $withNames) } }",
    );
    let name_node = plan[0].child("name").unwrap();

    assert!(name_node.should_include(&variables(json!({ "withNames": true }))));
    assert!(!name_node.should_include(&variables(json!({ "withNames": false }))));
    // Missing variable: @include fails open.
    assert!(name_node.should_include(&JsonMap::new()));

    let id_node = plan[0].child("id").unwrap();
    assert!(id_node.should_include(&JsonMap::new()));
}

#[test]
fn spread_directives_land_on_the_flattened_node() {
    let schema = blog_schema();
    let plan = plan(
        &schema,
        &unindent(
            r#"
            { users { ...userFields @skip(if: $brief) } }
            fragment userFields on User { id }
            "#,
        ),
    );
    let branch = &plan[0].children[0];
    assert!(branch.is_fragment());
    assert!(branch.directives.has("skip"));
    assert!(!branch.should_include(&variables(json!({ "brief": true }))));
    assert!(branch.should_include(&variables(json!({ "brief": false }))));
    // Missing variable: @skip fails closed.
    assert!(!branch.should_include(&JsonMap::new()));
}
