//! Recursive-descent parsers for schema (SDL) and query documents.
//!
//! Both grammars consume the same token stream and share the productions for
//! names, types, directives, arguments and literal values. The token stream
//! is EOF-terminated, so the parser never bounds-checks.

mod query;
mod schema;

use crate::ast;
use crate::ast::DirectiveList;
use crate::Lexer;
use crate::Name;
use crate::Node;
use crate::ParseError;
use crate::Token;
use crate::TokenKind;

/// Parses a token stream into an [`ast::Document`].
///
/// ```rust
/// use trellis_parser::Parser;
///
/// let document = Parser::new("type Query { hello: String }")
///     .and_then(|parser| parser.parse_document())
///     .unwrap();
/// assert_eq!(document.definitions.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    /// Lexes the source text. Returns the first lexical error, if any.
    pub fn new(source: &str) -> Result<Self, ParseError> {
        Ok(Self {
            tokens: Lexer::new(source).lex()?,
            position: 0,
        })
    }

    /// Parses a full document: any sequence of type system definitions,
    /// extensions, operations and fragment definitions.
    pub fn parse_document(mut self) -> Result<ast::Document, ParseError> {
        let mut definitions = Vec::new();
        while !self.at(TokenKind::Eof) {
            definitions.push(self.parse_definition()?);
        }
        Ok(ast::Document { definitions })
    }

    fn parse_definition(&mut self) -> Result<ast::Definition, ParseError> {
        let description = self.parse_description();

        if self.at(TokenKind::LCurly) {
            // Anonymous query shorthand: `{ field ... }`
            return Ok(ast::Definition::OperationDefinition(Node::new(
                self.parse_shorthand_operation()?,
            )));
        }

        let token = self.current().clone();
        if token.kind() != TokenKind::Name {
            return Err(ParseError::unexpected("a definition", &token));
        }

        if description.is_some() && !is_described_definition(token.data()) {
            return Err(ParseError::unexpected(
                "a type system definition after a description",
                &token,
            ));
        }

        match token.data() {
            "query" | "mutation" | "subscription" => Ok(ast::Definition::OperationDefinition(
                Node::new(self.parse_operation_definition()?),
            )),
            "fragment" => Ok(ast::Definition::FragmentDefinition(Node::new(
                self.parse_fragment_definition()?,
            ))),
            "schema" => Ok(ast::Definition::SchemaDefinition(Node::new(
                self.parse_schema_definition(description)?,
            ))),
            "scalar" => Ok(ast::Definition::ScalarTypeDefinition(Node::new(
                self.parse_scalar_type(description)?,
            ))),
            "type" => Ok(ast::Definition::ObjectTypeDefinition(Node::new(
                self.parse_object_type(description)?,
            ))),
            "interface" => Ok(ast::Definition::InterfaceTypeDefinition(Node::new(
                self.parse_interface_type(description)?,
            ))),
            "union" => Ok(ast::Definition::UnionTypeDefinition(Node::new(
                self.parse_union_type(description)?,
            ))),
            "enum" => Ok(ast::Definition::EnumTypeDefinition(Node::new(
                self.parse_enum_type(description)?,
            ))),
            "input" => Ok(ast::Definition::InputObjectTypeDefinition(Node::new(
                self.parse_input_object_type(description)?,
            ))),
            "directive" => Ok(ast::Definition::DirectiveDefinition(Node::new(
                self.parse_directive_definition(description)?,
            ))),
            "extend" => self.parse_extension(),
            _ => Err(ParseError::unexpected("a definition", &token)),
        }
    }

    // Token stream plumbing

    pub(crate) fn current(&self) -> &Token {
        // The lexer always terminates the stream with an EOF token, and
        // `advance` never moves past it.
        &self.tokens[self.position]
    }

    pub(crate) fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if token.kind() != TokenKind::Eof {
            self.position += 1;
        }
        token
    }

    pub(crate) fn at(&self, kind: TokenKind) -> bool {
        self.current().kind() == kind
    }

    pub(crate) fn at_keyword(&self, keyword: &str) -> bool {
        self.at(TokenKind::Name) && self.current().data() == keyword
    }

    pub(crate) fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        if self.at(kind) {
            Ok(self.advance())
        } else {
            Err(ParseError::expected_kind(kind, self.current()))
        }
    }

    pub(crate) fn expect_name(&mut self) -> Result<Name, ParseError> {
        let token = self.expect(TokenKind::Name)?;
        Ok(Name::new_unchecked(token.data()))
    }

    pub(crate) fn expect_keyword(&mut self, keyword: &str) -> Result<(), ParseError> {
        if self.at_keyword(keyword) {
            self.advance();
            Ok(())
        } else {
            Err(ParseError::unexpected(
                format!("`{keyword}`"),
                self.current(),
            ))
        }
    }

    pub(crate) fn expect_eof(&mut self) -> Result<(), ParseError> {
        if self.at(TokenKind::Eof) {
            Ok(())
        } else {
            Err(ParseError::unexpected("end of document", self.current()))
        }
    }

    // Shared productions

    /// An optional description string preceding a type system definition.
    pub(crate) fn parse_description(&mut self) -> Option<String> {
        if self.at(TokenKind::StringValue) {
            let token = self.advance();
            Some(unquote_string(token.data()))
        } else {
            None
        }
    }

    /// `Type`, `Type!`, `[Type]`, `[[Type!]!]!`, arbitrarily nested.
    pub(crate) fn parse_type(&mut self) -> Result<ast::Type, ParseError> {
        let ty = if self.eat(TokenKind::LBracket) {
            let inner = self.parse_type()?;
            self.expect(TokenKind::RBracket)?;
            ast::Type::List(Box::new(inner))
        } else {
            ast::Type::Named(self.expect_name()?)
        };
        if self.eat(TokenKind::Bang) {
            Ok(ty.non_null())
        } else {
            Ok(ty)
        }
    }

    pub(crate) fn parse_directives(&mut self) -> Result<DirectiveList, ParseError> {
        let mut directives = Vec::new();
        while self.eat(TokenKind::At) {
            let name = self.expect_name()?;
            let arguments = if self.at(TokenKind::LParen) {
                self.parse_arguments()?
            } else {
                Vec::new()
            };
            directives.push(Node::new(ast::Directive { name, arguments }));
        }
        Ok(DirectiveList(directives))
    }

    /// A parenthesized argument list: `(name: value, ...)`.
    pub(crate) fn parse_arguments(&mut self) -> Result<Vec<Node<ast::Argument>>, ParseError> {
        self.expect(TokenKind::LParen)?;
        let mut arguments = Vec::new();
        while !self.eat(TokenKind::RParen) {
            let name = self.expect_name()?;
            self.expect(TokenKind::Colon)?;
            let value = self.parse_value()?;
            arguments.push(Node::new(ast::Argument {
                name,
                value: Node::new(value),
            }));
        }
        Ok(arguments)
    }

    /// The embedded literal-value grammar: objects with identifier keys,
    /// lists, strings, numbers, booleans, `null`, enum identifiers and
    /// `$variable` references. Separating commas are ignored tokens, so
    /// trailing or missing separators are tolerated.
    pub(crate) fn parse_value(&mut self) -> Result<ast::Value, ParseError> {
        match self.current().kind() {
            TokenKind::LCurly => {
                self.advance();
                let mut entries = Vec::new();
                while !self.eat(TokenKind::RCurly) {
                    let key = self.expect_name()?;
                    self.expect(TokenKind::Colon)?;
                    let value = self.parse_value()?;
                    entries.push((key, Node::new(value)));
                }
                Ok(ast::Value::Object(entries))
            }
            TokenKind::LBracket => {
                self.advance();
                let mut items = Vec::new();
                while !self.eat(TokenKind::RBracket) {
                    items.push(Node::new(self.parse_value()?));
                }
                Ok(ast::Value::List(items))
            }
            TokenKind::Int => Ok(ast::Value::Int(self.advance().data().to_owned())),
            TokenKind::Float => Ok(ast::Value::Float(self.advance().data().to_owned())),
            TokenKind::StringValue => {
                let token = self.advance();
                Ok(ast::Value::String(unquote_string(token.data())))
            }
            TokenKind::Name => {
                let token = self.advance();
                match token.data() {
                    "true" => Ok(ast::Value::Boolean(true)),
                    "false" => Ok(ast::Value::Boolean(false)),
                    "null" => Ok(ast::Value::Null),
                    name => Ok(ast::Value::Enum(Name::new_unchecked(name))),
                }
            }
            TokenKind::Dollar => {
                self.advance();
                Ok(ast::Value::Variable(self.expect_name()?))
            }
            _ => Err(ParseError::unexpected("a value", self.current())),
        }
    }

    /// `= value`, used for variable defaults and input value defaults.
    pub(crate) fn parse_default_value(&mut self) -> Result<Option<Node<ast::Value>>, ParseError> {
        if self.eat(TokenKind::Eq) {
            Ok(Some(Node::new(self.parse_value()?)))
        } else {
            Ok(None)
        }
    }
}

/// Whether the keyword begins a definition that may carry a description.
fn is_described_definition(keyword: &str) -> bool {
    matches!(
        keyword,
        "schema" | "scalar" | "type" | "interface" | "union" | "enum" | "input" | "directive"
    )
}

/// Strips the quotes from a string token and resolves escape sequences.
/// Block strings keep their content verbatim.
pub(crate) fn unquote_string(data: &str) -> String {
    if let Some(inner) = data
        .strip_prefix("\"\"\"")
        .and_then(|rest| rest.strip_suffix("\"\"\""))
    {
        return inner.to_owned();
    }
    let inner = data
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(data);

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some('/') => out.push('/'),
            Some('b') => out.push('\u{0008}'),
            Some('f') => out.push('\u{000C}'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('u') => {
                let code: String = chars.by_ref().take(4).collect();
                match u32::from_str_radix(&code, 16).ok().and_then(char::from_u32) {
                    Some(c) => out.push(c),
                    None => {
                        out.push_str("\\u");
                        out.push_str(&code);
                    }
                }
            }
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

impl ast::Value {
    /// Parses a standalone literal value.
    pub fn parse(source: &str) -> Result<Self, ParseError> {
        let mut parser = Parser::new(source)?;
        let value = parser.parse_value()?;
        parser.expect_eof()?;
        Ok(value)
    }
}

impl ast::Type {
    /// Parses a standalone type reference such as `[[Int!]!]!`.
    pub fn parse(source: &str) -> Result<Self, ParseError> {
        let mut parser = Parser::new(source)?;
        let ty = parser.parse_type()?;
        parser.expect_eof()?;
        Ok(ty)
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::Type;
    use crate::ast::Value;
    use crate::ParseError;
    use expect_test::expect;

    fn canonical(source: &str) -> String {
        Value::parse(source).unwrap().to_string()
    }

    #[test]
    fn values_serialize_canonically() {
        expect![[r#"{theme:"dark",notifications:true}"#]]
            .assert_eq(&canonical(r#"{ theme: "dark", notifications: true }"#));
        expect![[r#"{ids:[1,2,3],mode:DARK,ratio:0.5,comment:null}"#]]
            .assert_eq(&canonical(r#"{ ids: [1, 2, 3] mode: DARK ratio: 0.5 comment: null }"#));
        expect![[r#"[$a,"b \"c\""]"#]].assert_eq(&canonical(r#"[$a, "b \"c\""]"#));
    }

    #[test]
    fn canonical_form_is_a_fixed_point() {
        for source in [
            r#"{theme:"dark",notifications:true}"#,
            "[1,2,[3]]",
            "null",
            "-4.25",
        ] {
            assert_eq!(canonical(source), source);
        }
    }

    #[test]
    fn permissive_separators_in_literals() {
        // Commas are ignored tokens: trailing and missing separators parse.
        assert_eq!(canonical("[1, 2, 3,]"), "[1,2,3]");
        assert_eq!(canonical("{a: 1 b: 2,}"), "{a:1,b:2}");
    }

    #[test]
    fn object_key_requires_colon() {
        assert!(matches!(
            Value::parse("{a 1}"),
            Err(ParseError::UnexpectedToken { .. })
        ));
    }

    #[test]
    fn nullability_nesting_mirrors_bangs() {
        let ty = Type::parse("[[Int!]!]!").unwrap();
        let Type::NonNullList(level1) = ty else {
            panic!("outer level must be a non-null list");
        };
        let Type::NonNullList(level2) = *level1 else {
            panic!("middle level must be a non-null list");
        };
        let Type::NonNullNamed(name) = *level2 else {
            panic!("inner level must be non-null Int");
        };
        assert_eq!(name, "Int");

        let ty = Type::parse("[Int]").unwrap();
        assert!(!ty.is_non_null());
        assert!(ty.is_list());
        assert_eq!(ty.inner_named_type(), "Int");
    }

    #[test]
    fn type_display_round_trips() {
        for source in ["Int", "Int!", "[Int]", "[Int!]!", "[[Int!]!]!"] {
            assert_eq!(Type::parse(source).unwrap().to_string(), source);
        }
    }
}
