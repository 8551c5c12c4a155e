//! Executable-document grammar: operations, variables, selection sets and
//! fragment definitions.

use super::*;

impl Parser {
    /// `query Name($var: Type = default) @dir { ... }`, with every part
    /// after the operation keyword optional except the selection set.
    pub(crate) fn parse_operation_definition(
        &mut self,
    ) -> Result<ast::OperationDefinition, ParseError> {
        let token = self.current().clone();
        let keyword = self.expect_name()?;
        let operation_type = ast::OperationType::from_name(&keyword)
            .ok_or_else(|| ParseError::unexpected("an operation type", &token))?;

        let name = if self.at(TokenKind::Name) {
            Some(self.expect_name()?)
        } else {
            None
        };
        let variables = if self.at(TokenKind::LParen) {
            self.parse_variable_definitions()?
        } else {
            Vec::new()
        };
        let directives = self.parse_directives()?;
        let selection_set = self.parse_selection_set()?;
        Ok(ast::OperationDefinition {
            operation_type,
            name,
            variables,
            directives,
            selection_set,
        })
    }

    /// The `{ ... }` shorthand for an anonymous query.
    pub(crate) fn parse_shorthand_operation(
        &mut self,
    ) -> Result<ast::OperationDefinition, ParseError> {
        let selection_set = self.parse_selection_set()?;
        Ok(ast::OperationDefinition {
            operation_type: ast::OperationType::Query,
            name: None,
            variables: Vec::new(),
            directives: DirectiveList::new(),
            selection_set,
        })
    }

    fn parse_variable_definitions(
        &mut self,
    ) -> Result<Vec<Node<ast::VariableDefinition>>, ParseError> {
        self.expect(TokenKind::LParen)?;
        let mut variables = Vec::new();
        while !self.eat(TokenKind::RParen) {
            self.expect(TokenKind::Dollar)?;
            let name = self.expect_name()?;
            self.expect(TokenKind::Colon)?;
            let ty = self.parse_type()?;
            let default_value = self.parse_default_value()?;
            let directives = self.parse_directives()?;
            variables.push(Node::new(ast::VariableDefinition {
                name,
                ty,
                default_value,
                directives,
            }));
        }
        Ok(variables)
    }

    pub(crate) fn parse_selection_set(&mut self) -> Result<Vec<ast::Selection>, ParseError> {
        self.expect(TokenKind::LCurly)?;
        let mut selections = Vec::new();
        while !self.eat(TokenKind::RCurly) {
            selections.push(self.parse_selection()?);
        }
        Ok(selections)
    }

    /// Dispatches on the leading token: a name opens a field, `...` opens an
    /// inline fragment (when followed by `on`) or a fragment spread.
    fn parse_selection(&mut self) -> Result<ast::Selection, ParseError> {
        if self.eat(TokenKind::Spread) {
            if self.at_keyword("on") {
                self.advance();
                let type_condition = self.expect_name()?;
                let directives = self.parse_directives()?;
                let selection_set = self.parse_selection_set()?;
                return Ok(ast::Selection::InlineFragment(Node::new(
                    ast::InlineFragment {
                        type_condition,
                        directives,
                        selection_set,
                    },
                )));
            }
            let fragment_name = self.expect_name()?;
            let directives = self.parse_directives()?;
            return Ok(ast::Selection::FragmentSpread(Node::new(
                ast::FragmentSpread {
                    fragment_name,
                    directives,
                },
            )));
        }

        let name = self.expect_name()?;
        let arguments = if self.at(TokenKind::LParen) {
            self.parse_arguments()?
        } else {
            Vec::new()
        };
        let directives = self.parse_directives()?;
        let selection_set = if self.at(TokenKind::LCurly) {
            self.parse_selection_set()?
        } else {
            Vec::new()
        };
        Ok(ast::Selection::Field(Node::new(ast::Field {
            name,
            arguments,
            directives,
            selection_set,
        })))
    }

    /// `fragment Name on Type { ... }`; only valid at document top level.
    pub(crate) fn parse_fragment_definition(
        &mut self,
    ) -> Result<ast::FragmentDefinition, ParseError> {
        self.expect_keyword("fragment")?;
        let token = self.current().clone();
        let name = self.expect_name()?;
        if name == "on" {
            return Err(ParseError::unexpected("a fragment name", &token));
        }
        self.expect_keyword("on")?;
        let type_condition = self.expect_name()?;
        let directives = self.parse_directives()?;
        let selection_set = self.parse_selection_set()?;
        Ok(ast::FragmentDefinition {
            name,
            type_condition,
            directives,
            selection_set,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::ast;
    use crate::ast::Definition;
    use crate::ast::Selection;
    use crate::ParseError;
    use unindent::unindent;

    fn parse(source: &str) -> ast::Document {
        ast::Document::parse(&unindent(source)).unwrap()
    }

    #[test]
    fn operation_with_variables_and_directives() {
        let document = parse(
            r#"
            query Profile($id: ID!, $full: Boolean = false, $prefs: Preferences = { theme: "dark" }) {
              user(id: $id) {
                id
                details @include(if: $full) {
                  bio
                }
              }
            }
            "#,
        );
        let [Definition::OperationDefinition(op)] = document.definitions.as_slice() else {
            panic!("expected a single operation");
        };
        assert_eq!(op.operation_type, ast::OperationType::Query);
        assert_eq!(op.name.as_ref().unwrap(), "Profile");
        assert_eq!(op.variables.len(), 3);
        assert_eq!(op.variables[1].ty.to_string(), "Boolean");
        assert_eq!(
            op.variables[2].default_value.as_ref().unwrap().to_string(),
            r#"{theme:"dark"}"#
        );

        let Selection::Field(user) = &op.selection_set[0] else {
            panic!("expected a field");
        };
        assert_eq!(user.name, "user");
        assert_eq!(user.arguments[0].value.to_string(), "$id");
        let Selection::Field(details) = &user.selection_set[1] else {
            panic!("expected a field");
        };
        assert!(details.directives.has("include"));
    }

    #[test]
    fn anonymous_query_shorthand() {
        let document = parse("{ users { id name } }");
        let [Definition::OperationDefinition(op)] = document.definitions.as_slice() else {
            panic!("expected a single operation");
        };
        assert_eq!(op.operation_type, ast::OperationType::Query);
        assert!(op.name.is_none());
    }

    #[test]
    fn fragment_spreads_and_inline_fragments() {
        let document = parse(
            r#"
            query Search {
              search {
                ...postFields @skip(if: true)
                ... on User {
                  name
                }
              }
            }
            fragment postFields on Post {
              title
            }
            "#,
        );
        let Definition::OperationDefinition(op) = &document.definitions[0] else {
            panic!("expected an operation");
        };
        let Selection::Field(search) = &op.selection_set[0] else {
            panic!("expected a field");
        };
        let Selection::FragmentSpread(spread) = &search.selection_set[0] else {
            panic!("expected a fragment spread");
        };
        assert_eq!(spread.fragment_name, "postFields");
        assert!(spread.directives.has("skip"));
        let Selection::InlineFragment(inline) = &search.selection_set[1] else {
            panic!("expected an inline fragment");
        };
        assert_eq!(inline.type_condition, "User");

        let Definition::FragmentDefinition(fragment) = &document.definitions[1] else {
            panic!("expected a fragment definition");
        };
        assert_eq!(fragment.name, "postFields");
        assert_eq!(fragment.type_condition, "Post");
    }

    #[test]
    fn mutation_operation() {
        let document = parse(
            r#"
            mutation Rename($name: String!) {
              renameUser(name: $name) {
                id
              }
            }
            "#,
        );
        let Definition::OperationDefinition(op) = &document.definitions[0] else {
            panic!("expected an operation");
        };
        assert_eq!(op.operation_type, ast::OperationType::Mutation);
    }

    #[test]
    fn missing_selection_set_is_an_error() {
        let error = ast::Document::parse("query Profile").unwrap_err();
        assert!(matches!(error, ParseError::UnexpectedToken { .. }));
    }

    #[test]
    fn spread_must_name_a_fragment_or_type_condition() {
        let error = ast::Document::parse("{ ... }").unwrap_err();
        assert!(matches!(error, ParseError::UnexpectedToken { .. }));
    }
}
