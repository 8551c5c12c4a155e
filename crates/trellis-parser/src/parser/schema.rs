//! SDL grammar: type system definitions and extensions.

use super::*;

impl Parser {
    pub(crate) fn parse_schema_definition(
        &mut self,
        description: Option<String>,
    ) -> Result<ast::SchemaDefinition, ParseError> {
        self.expect_keyword("schema")?;
        let directives = self.parse_directives()?;
        let root_operations = self.parse_root_operations()?;
        Ok(ast::SchemaDefinition {
            description,
            directives,
            root_operations,
        })
    }

    fn parse_root_operations(
        &mut self,
    ) -> Result<Vec<(ast::OperationType, ast::NamedType)>, ParseError> {
        self.expect(TokenKind::LCurly)?;
        let mut root_operations = Vec::new();
        while !self.eat(TokenKind::RCurly) {
            let token = self.current().clone();
            let keyword = self.expect_name()?;
            let operation_type = ast::OperationType::from_name(&keyword)
                .ok_or_else(|| ParseError::unexpected("an operation type", &token))?;
            self.expect(TokenKind::Colon)?;
            let named_type = self.expect_name()?;
            root_operations.push((operation_type, named_type));
        }
        Ok(root_operations)
    }

    pub(crate) fn parse_scalar_type(
        &mut self,
        description: Option<String>,
    ) -> Result<ast::ScalarTypeDefinition, ParseError> {
        self.expect_keyword("scalar")?;
        let name = self.expect_name()?;
        let directives = self.parse_directives()?;
        Ok(ast::ScalarTypeDefinition {
            description,
            name,
            directives,
        })
    }

    pub(crate) fn parse_object_type(
        &mut self,
        description: Option<String>,
    ) -> Result<ast::ObjectTypeDefinition, ParseError> {
        self.expect_keyword("type")?;
        let name = self.expect_name()?;
        let implements_interfaces = self.parse_implements_interfaces()?;
        let directives = self.parse_directives()?;
        let fields = self.parse_optional_fields()?;
        Ok(ast::ObjectTypeDefinition {
            description,
            name,
            implements_interfaces,
            directives,
            fields,
        })
    }

    pub(crate) fn parse_interface_type(
        &mut self,
        description: Option<String>,
    ) -> Result<ast::InterfaceTypeDefinition, ParseError> {
        self.expect_keyword("interface")?;
        let name = self.expect_name()?;
        let implements_interfaces = self.parse_implements_interfaces()?;
        let directives = self.parse_directives()?;
        let fields = self.parse_optional_fields()?;
        Ok(ast::InterfaceTypeDefinition {
            description,
            name,
            implements_interfaces,
            directives,
            fields,
        })
    }

    pub(crate) fn parse_union_type(
        &mut self,
        description: Option<String>,
    ) -> Result<ast::UnionTypeDefinition, ParseError> {
        self.expect_keyword("union")?;
        let name = self.expect_name()?;
        let directives = self.parse_directives()?;
        let members = if self.eat(TokenKind::Eq) {
            self.parse_union_members()?
        } else {
            Vec::new()
        };
        Ok(ast::UnionTypeDefinition {
            description,
            name,
            directives,
            members,
        })
    }

    fn parse_union_members(&mut self) -> Result<Vec<ast::NamedType>, ParseError> {
        // An optional leading `|` is allowed, as in directive locations.
        self.eat(TokenKind::Pipe);
        let mut members = vec![self.expect_name()?];
        while self.eat(TokenKind::Pipe) {
            members.push(self.expect_name()?);
        }
        Ok(members)
    }

    pub(crate) fn parse_enum_type(
        &mut self,
        description: Option<String>,
    ) -> Result<ast::EnumTypeDefinition, ParseError> {
        self.expect_keyword("enum")?;
        let name = self.expect_name()?;
        let directives = self.parse_directives()?;
        let values = if self.at(TokenKind::LCurly) {
            self.parse_enum_values()?
        } else {
            Vec::new()
        };
        Ok(ast::EnumTypeDefinition {
            description,
            name,
            directives,
            values,
        })
    }

    fn parse_enum_values(&mut self) -> Result<Vec<Node<ast::EnumValueDefinition>>, ParseError> {
        self.expect(TokenKind::LCurly)?;
        let mut values = Vec::new();
        while !self.eat(TokenKind::RCurly) {
            let description = self.parse_description();
            let value = self.expect_name()?;
            let directives = self.parse_directives()?;
            values.push(Node::new(ast::EnumValueDefinition {
                description,
                value,
                directives,
            }));
        }
        Ok(values)
    }

    pub(crate) fn parse_input_object_type(
        &mut self,
        description: Option<String>,
    ) -> Result<ast::InputObjectTypeDefinition, ParseError> {
        self.expect_keyword("input")?;
        let name = self.expect_name()?;
        let directives = self.parse_directives()?;
        let fields = if self.at(TokenKind::LCurly) {
            self.parse_input_fields()?
        } else {
            Vec::new()
        };
        Ok(ast::InputObjectTypeDefinition {
            description,
            name,
            directives,
            fields,
        })
    }

    fn parse_input_fields(&mut self) -> Result<Vec<Node<ast::InputValueDefinition>>, ParseError> {
        self.expect(TokenKind::LCurly)?;
        let mut fields = Vec::new();
        while !self.eat(TokenKind::RCurly) {
            fields.push(Node::new(self.parse_input_value_definition()?));
        }
        Ok(fields)
    }

    pub(crate) fn parse_directive_definition(
        &mut self,
        description: Option<String>,
    ) -> Result<ast::DirectiveDefinition, ParseError> {
        self.expect_keyword("directive")?;
        self.expect(TokenKind::At)?;
        let name = self.expect_name()?;
        let arguments = if self.at(TokenKind::LParen) {
            self.parse_arguments_definition()?
        } else {
            Vec::new()
        };
        let repeatable = if self.at_keyword("repeatable") {
            self.advance();
            true
        } else {
            false
        };
        self.expect_keyword("on")?;
        let locations = self.parse_directive_locations()?;
        Ok(ast::DirectiveDefinition {
            description,
            name,
            arguments,
            repeatable,
            locations,
        })
    }

    fn parse_directive_locations(&mut self) -> Result<Vec<ast::DirectiveLocation>, ParseError> {
        self.eat(TokenKind::Pipe);
        let mut locations = vec![self.parse_directive_location()?];
        while self.eat(TokenKind::Pipe) {
            locations.push(self.parse_directive_location()?);
        }
        Ok(locations)
    }

    fn parse_directive_location(&mut self) -> Result<ast::DirectiveLocation, ParseError> {
        let token = self.current().clone();
        let name = self.expect_name()?;
        ast::DirectiveLocation::from_name(&name)
            .ok_or_else(|| ParseError::unexpected("a directive location", &token))
    }

    fn parse_implements_interfaces(&mut self) -> Result<Vec<ast::NamedType>, ParseError> {
        if !self.at_keyword("implements") {
            return Ok(Vec::new());
        }
        self.advance();
        self.eat(TokenKind::Amp);
        let mut interfaces = vec![self.expect_name()?];
        while self.eat(TokenKind::Amp) {
            interfaces.push(self.expect_name()?);
        }
        Ok(interfaces)
    }

    /// A `{ ... }` fields block, or nothing: SDL allows field-less type
    /// declarations.
    fn parse_optional_fields(&mut self) -> Result<Vec<Node<ast::FieldDefinition>>, ParseError> {
        if !self.at(TokenKind::LCurly) {
            return Ok(Vec::new());
        }
        self.advance();
        let mut fields = Vec::new();
        while !self.eat(TokenKind::RCurly) {
            fields.push(Node::new(self.parse_field_definition()?));
        }
        Ok(fields)
    }

    fn parse_field_definition(&mut self) -> Result<ast::FieldDefinition, ParseError> {
        let description = self.parse_description();
        let name = self.expect_name()?;
        let arguments = if self.at(TokenKind::LParen) {
            self.parse_arguments_definition()?
        } else {
            Vec::new()
        };
        self.expect(TokenKind::Colon)?;
        let ty = self.parse_type()?;
        let directives = self.parse_directives()?;
        Ok(ast::FieldDefinition {
            description,
            name,
            arguments,
            ty,
            directives,
        })
    }

    fn parse_arguments_definition(
        &mut self,
    ) -> Result<Vec<Node<ast::InputValueDefinition>>, ParseError> {
        self.expect(TokenKind::LParen)?;
        let mut arguments = Vec::new();
        while !self.eat(TokenKind::RParen) {
            arguments.push(Node::new(self.parse_input_value_definition()?));
        }
        Ok(arguments)
    }

    fn parse_input_value_definition(&mut self) -> Result<ast::InputValueDefinition, ParseError> {
        let description = self.parse_description();
        let name = self.expect_name()?;
        self.expect(TokenKind::Colon)?;
        let ty = self.parse_type()?;
        let default_value = self.parse_default_value()?;
        let directives = self.parse_directives()?;
        Ok(ast::InputValueDefinition {
            description,
            name,
            ty,
            default_value,
            directives,
        })
    }

    pub(crate) fn parse_extension(&mut self) -> Result<ast::Definition, ParseError> {
        self.expect_keyword("extend")?;
        let token = self.current().clone();
        match token.data() {
            "schema" => {
                self.advance();
                let directives = self.parse_directives()?;
                let root_operations = if self.at(TokenKind::LCurly) {
                    self.parse_root_operations()?
                } else {
                    Vec::new()
                };
                Ok(ast::Definition::SchemaExtension(Node::new(
                    ast::SchemaExtension {
                        directives,
                        root_operations,
                    },
                )))
            }
            "scalar" => {
                self.advance();
                let name = self.expect_name()?;
                let directives = self.parse_directives()?;
                Ok(ast::Definition::ScalarTypeExtension(Node::new(
                    ast::ScalarTypeExtension { name, directives },
                )))
            }
            "type" => {
                self.advance();
                let name = self.expect_name()?;
                let implements_interfaces = self.parse_implements_interfaces()?;
                let directives = self.parse_directives()?;
                let fields = self.parse_optional_fields()?;
                Ok(ast::Definition::ObjectTypeExtension(Node::new(
                    ast::ObjectTypeExtension {
                        name,
                        implements_interfaces,
                        directives,
                        fields,
                    },
                )))
            }
            "interface" => {
                self.advance();
                let name = self.expect_name()?;
                let implements_interfaces = self.parse_implements_interfaces()?;
                let directives = self.parse_directives()?;
                let fields = self.parse_optional_fields()?;
                Ok(ast::Definition::InterfaceTypeExtension(Node::new(
                    ast::InterfaceTypeExtension {
                        name,
                        implements_interfaces,
                        directives,
                        fields,
                    },
                )))
            }
            "union" => {
                self.advance();
                let name = self.expect_name()?;
                let directives = self.parse_directives()?;
                let members = if self.eat(TokenKind::Eq) {
                    self.parse_union_members()?
                } else {
                    Vec::new()
                };
                Ok(ast::Definition::UnionTypeExtension(Node::new(
                    ast::UnionTypeExtension {
                        name,
                        directives,
                        members,
                    },
                )))
            }
            "enum" => {
                self.advance();
                let name = self.expect_name()?;
                let directives = self.parse_directives()?;
                let values = if self.at(TokenKind::LCurly) {
                    self.parse_enum_values()?
                } else {
                    Vec::new()
                };
                Ok(ast::Definition::EnumTypeExtension(Node::new(
                    ast::EnumTypeExtension {
                        name,
                        directives,
                        values,
                    },
                )))
            }
            "input" => {
                self.advance();
                let name = self.expect_name()?;
                let directives = self.parse_directives()?;
                let fields = if self.at(TokenKind::LCurly) {
                    self.parse_input_fields()?
                } else {
                    Vec::new()
                };
                Ok(ast::Definition::InputObjectTypeExtension(Node::new(
                    ast::InputObjectTypeExtension {
                        name,
                        directives,
                        fields,
                    },
                )))
            }
            _ => Err(ParseError::unexpected("an extendable definition", &token)),
        }
    }
}
