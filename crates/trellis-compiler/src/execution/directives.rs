//! Evaluation of the built-in `@include` and `@skip` directives against
//! runtime variable bindings.
//!
//! Evaluation is pure: no I/O, no mutation, same inputs same answer.

use crate::ast::DirectiveList;
use crate::ast::Value;
use crate::execution::JsonMap;

/// Whether a node is included in the response: `@include` must hold and
/// `@skip` must not.
pub fn should_include(directives: &DirectiveList, variables: &JsonMap) -> bool {
    is_included(directives, variables) && !is_skipped(directives, variables)
}

/// `@include` evaluation. Absent directive includes by default. A referenced
/// variable that is missing from `variables` resolves to inclusion
/// (fail-open). Anything malformed — an argument count other than one, a
/// non-boolean value — excludes.
fn is_included(directives: &DirectiveList, variables: &JsonMap) -> bool {
    let Some(directive) = directives.get("include") else {
        return true;
    };
    let [argument] = directive.arguments.as_slice() else {
        return false;
    };
    match argument.value.as_ref() {
        Value::Boolean(value) => *value,
        Value::Variable(name) => match variables.get(name.as_str()) {
            None => true,
            Some(value) => value.as_bool().unwrap_or(false),
        },
        _ => false,
    }
}

/// `@skip` evaluation, mirroring [`is_included`] with inverted defaults:
/// absent directive does not skip, while a missing referenced variable
/// resolves to skipping (fail-closed). Malformed input skips.
fn is_skipped(directives: &DirectiveList, variables: &JsonMap) -> bool {
    let Some(directive) = directives.get("skip") else {
        return false;
    };
    let [argument] = directive.arguments.as_slice() else {
        return true;
    };
    match argument.value.as_ref() {
        Value::Boolean(value) => *value,
        Value::Variable(name) => match variables.get(name.as_str()) {
            None => true,
            Some(value) => value.as_bool().unwrap_or(true),
        },
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast;
    use crate::ast::DirectiveList;
    use serde_json_bytes::json;
    use trellis_parser::Name;
    use trellis_parser::Node;

    fn directive_list(source: &str) -> DirectiveList {
        // Parse a probe field carrying the directives under test.
        let document = ast::Document::parse(&format!("{{ probe {source} }}")).unwrap();
        let ast::Definition::OperationDefinition(op) = &document.definitions[0] else {
            unreachable!();
        };
        let ast::Selection::Field(field) = &op.selection_set[0] else {
            unreachable!();
        };
        field.directives.clone()
    }

    fn variables(value: serde_json_bytes::Value) -> JsonMap {
        match value {
            serde_json_bytes::Value::Object(map) => map,
            _ => unreachable!("tests pass JSON objects"),
        }
    }

    #[test]
    fn no_directives_includes() {
        assert!(should_include(&DirectiveList::new(), &JsonMap::new()));
    }

    #[test]
    fn include_literals() {
        assert!(should_include(
            &directive_list("@include(if: true)"),
            &JsonMap::new()
        ));
        assert!(!should_include(
            &directive_list("@include(if: false)"),
            &JsonMap::new()
        ));
        // Only a literal `true` includes.
        assert!(!should_include(
            &directive_list("@include(if: YES)"),
            &JsonMap::new()
        ));
    }

    #[test]
    fn include_variables_fail_open() {
        let directives = directive_list("@include(if: $flag)");
        assert!(!should_include(
            &directives,
            &variables(json!({ "flag": false }))
        ));
        assert!(should_include(
            &directives,
            &variables(json!({ "flag": true }))
        ));
        // A missing variable resolves to inclusion.
        assert!(should_include(&directives, &JsonMap::new()));
    }

    #[test]
    fn skip_variables_fail_closed() {
        let directives = directive_list("@skip(if: $flag)");
        assert!(should_include(
            &directives,
            &variables(json!({ "flag": false }))
        ));
        assert!(!should_include(
            &directives,
            &variables(json!({ "flag": true }))
        ));
        // A missing variable resolves to skipping.
        assert!(!should_include(&directives, &JsonMap::new()));
    }

    #[test]
    fn malformed_argument_lists_exclude() {
        assert!(!should_include(&directive_list("@include"), &JsonMap::new()));
        assert!(!should_include(
            &directive_list("@include(if: true, also: true)"),
            &JsonMap::new()
        ));
        assert!(!should_include(&directive_list("@skip"), &JsonMap::new()));
    }

    #[test]
    fn skip_wins_over_include() {
        let directives = directive_list("@include(if: true) @skip(if: true)");
        assert!(!should_include(&directives, &JsonMap::new()));
    }

    #[test]
    fn unrelated_directives_are_ignored() {
        let mut directives = directive_list("@include(if: true)");
        directives.0.push(Node::new(ast::Directive {
            name: Name::new("traced").unwrap(),
            arguments: Vec::new(),
        }));
        assert!(should_include(&directives, &JsonMap::new()));
    }
}
