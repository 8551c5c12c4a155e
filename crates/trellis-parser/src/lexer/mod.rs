mod cursor;
mod token;

use self::cursor::Cursor;
use crate::ParseError;

pub use self::token::Token;
pub use self::token::TokenKind;

/// Tokenizes GraphQL source text, for both schema (SDL) and query documents.
///
/// The lexer is a single-pass scanner with one character of lookahead (two
/// for the `...` spread operator). Ignored tokens — whitespace, commas and
/// comments — are consumed silently. The stream is always terminated by an
/// [`TokenKind::Eof`] token, so a parser consuming it never needs bounds
/// checks.
///
/// ```rust
/// use trellis_parser::Lexer;
///
/// let query = "
/// {
///     animal
///     ...snackSelection
///     ... on Pet {
///         playmates {
///             count
///         }
///     }
/// }
/// ";
/// let tokens = Lexer::new(query).lex().unwrap();
/// assert!(!tokens.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    cursor: Cursor<'a>,
    finished: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            cursor: Cursor::new(input),
            finished: false,
        }
    }

    /// Lex the full source text, consuming the lexer.
    ///
    /// Returns the token stream, terminated by an EOF token, or the first
    /// error encountered.
    pub fn lex(self) -> Result<Vec<Token>, ParseError> {
        self.collect()
    }

    fn next_token(&mut self) -> Result<Option<Token>, ParseError> {
        loop {
            let index = self.cursor.offset();
            let line = self.cursor.line();
            let column = self.cursor.column();

            let Some(first) = self.cursor.bump() else {
                return Ok(None);
            };

            let punctuation = |kind| {
                Ok(Some(Token::new(
                    kind,
                    first.to_string(),
                    index,
                    line,
                    column,
                )))
            };

            return match first {
                c if is_whitespace(c) => continue,
                ',' => continue,
                '#' => {
                    self.comment();
                    continue;
                }
                '"' => self.string_value(index, line, column).map(Some),
                '.' => self.spread_operator(index, line, column).map(Some),
                c if is_ident_char(c) => Ok(Some(self.ident(c, index, line, column))),
                c @ '-' => self.number(c, index, line, column).map(Some),
                c if is_digit_char(c) => self.number(c, index, line, column).map(Some),
                '!' => punctuation(TokenKind::Bang),
                '$' => punctuation(TokenKind::Dollar),
                '&' => punctuation(TokenKind::Amp),
                '(' => punctuation(TokenKind::LParen),
                ')' => punctuation(TokenKind::RParen),
                ':' => punctuation(TokenKind::Colon),
                '=' => punctuation(TokenKind::Eq),
                '@' => punctuation(TokenKind::At),
                '[' => punctuation(TokenKind::LBracket),
                ']' => punctuation(TokenKind::RBracket),
                '{' => punctuation(TokenKind::LCurly),
                '|' => punctuation(TokenKind::Pipe),
                '}' => punctuation(TokenKind::RCurly),
                c => Err(ParseError::UnrecognizedCharacter {
                    found: c,
                    line,
                    column,
                }),
            };
        }
    }

    fn comment(&mut self) {
        while let Some(c) = self.cursor.first() {
            if is_line_terminator(c) {
                break;
            }
            self.cursor.bump();
        }
    }

    /// Lexes a string value. The opening `"` has already been consumed; the
    /// raw token data keeps its quotes.
    fn string_value(
        &mut self,
        index: usize,
        line: usize,
        column: usize,
    ) -> Result<Token, ParseError> {
        let mut buf = String::from('"');

        if self.cursor.eat('"') {
            buf.push('"');
            // Either an empty string or the opening of a block string.
            if self.cursor.eat('"') {
                buf.push('"');
                return self.block_string_value(buf, index, line, column);
            }
            return Ok(Token::new(TokenKind::StringValue, buf, index, line, column));
        }

        let mut was_backslash = false;
        while let Some(c) = self.cursor.bump() {
            buf.push(c);
            if c == '"' && !was_backslash {
                return Ok(Token::new(TokenKind::StringValue, buf, index, line, column));
            }
            was_backslash = c == '\\' && !was_backslash;
        }

        Err(ParseError::UnterminatedString { line, column })
    }

    /// Lexes a `"""block string"""`. The opening quotes have already been
    /// consumed.
    fn block_string_value(
        &mut self,
        mut buf: String,
        index: usize,
        line: usize,
        column: usize,
    ) -> Result<Token, ParseError> {
        while let Some(c) = self.cursor.bump() {
            buf.push(c);
            if c == '"' && self.cursor.first() == Some('"') && self.cursor.second() == Some('"') {
                buf.push(self.cursor.bump().unwrap());
                buf.push(self.cursor.bump().unwrap());
                return Ok(Token::new(TokenKind::StringValue, buf, index, line, column));
            }
        }

        Err(ParseError::UnterminatedString { line, column })
    }

    /// Lexes the `...` spread operator. One or two dots is an error, caught
    /// here by explicit lookahead rather than deferred to the parser.
    fn spread_operator(
        &mut self,
        index: usize,
        line: usize,
        column: usize,
    ) -> Result<Token, ParseError> {
        let mut buf = String::from('.');
        for _ in 0..2 {
            if self.cursor.eat('.') {
                buf.push('.');
            } else {
                return Err(ParseError::UnterminatedSpread {
                    data: buf,
                    line,
                    column,
                });
            }
        }
        Ok(Token::new(TokenKind::Spread, buf, index, line, column))
    }

    fn ident(&mut self, first: char, index: usize, line: usize, column: usize) -> Token {
        let mut buf = String::new();
        buf.push(first);
        while let Some(c) = self.cursor.first() {
            if is_ident_char(c) || is_digit_char(c) {
                buf.push(c);
                self.cursor.bump();
            } else {
                break;
            }
        }
        Token::new(TokenKind::Name, buf, index, line, column)
    }

    /// Lexes an integer or float. Floats require digits on both sides of a
    /// single dot; a second dot is a hard error.
    fn number(
        &mut self,
        first: char,
        index: usize,
        line: usize,
        column: usize,
    ) -> Result<Token, ParseError> {
        let mut buf = String::new();
        buf.push(first);

        let mut has_digit = is_digit_char(first);
        let mut has_fractional = false;
        let mut has_exponent = false;

        let invalid = |buf: String| ParseError::InvalidNumber {
            data: buf,
            line,
            column,
        };

        while let Some(c) = self.cursor.first() {
            match c {
                '.' => {
                    if !has_digit || has_fractional || has_exponent {
                        buf.push(c);
                        return Err(invalid(buf));
                    }
                    buf.push(c);
                    self.cursor.bump();
                    if !self.cursor.first().is_some_and(is_digit_char) {
                        return Err(invalid(buf));
                    }
                    has_fractional = true;
                }
                'e' | 'E' => {
                    if !has_digit || has_exponent {
                        buf.push(c);
                        return Err(invalid(buf));
                    }
                    buf.push(c);
                    self.cursor.bump();
                    if let Some(sign @ ('+' | '-')) = self.cursor.first() {
                        buf.push(sign);
                        self.cursor.bump();
                    }
                    if !self.cursor.first().is_some_and(is_digit_char) {
                        return Err(invalid(buf));
                    }
                    has_exponent = true;
                }
                c if is_digit_char(c) => {
                    buf.push(c);
                    self.cursor.bump();
                    has_digit = true;
                }
                _ => break,
            }
        }

        if !has_digit {
            return Err(invalid(buf));
        }

        let kind = if has_fractional || has_exponent {
            TokenKind::Float
        } else {
            TokenKind::Int
        };
        Ok(Token::new(kind, buf, index, line, column))
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.next_token() {
            Ok(Some(token)) => Some(Ok(token)),
            Ok(None) => {
                self.finished = true;
                Some(Ok(Token::new(
                    TokenKind::Eof,
                    String::from("EOF"),
                    self.cursor.offset(),
                    self.cursor.line(),
                    self.cursor.column(),
                )))
            }
            Err(error) => {
                self.finished = true;
                Some(Err(error))
            }
        }
    }
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n' | '\u{FEFF}')
}

fn is_ident_char(c: char) -> bool {
    matches!(c, 'a'..='z' | 'A'..='Z' | '_')
}

fn is_digit_char(c: char) -> bool {
    c.is_ascii_digit()
}

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r')
}
