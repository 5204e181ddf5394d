//! Formula tokenizer
//!
//! Turns formula text into a flat token sequence. The tokenizer knows nothing
//! about the grammar: `A1`, `SUM` and `my_fn` all come out as identifiers.

use crate::error::{FormulaError, FormulaResult};
use crate::token::{Token, TokenKind};

/// Tokenize formula text (without the leading `=`)
///
/// The returned sequence always ends with an [`TokenKind::EndOfInput`] token whose
/// position is just past the last character.
///
/// # Example
/// ```rust
/// use cellcalc_formula::{tokenize, TokenKind};
///
/// let tokens = tokenize("A1 <= 10").unwrap();
/// let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
/// assert_eq!(
///     kinds,
///     vec![
///         TokenKind::Identifier,
///         TokenKind::LessThanOrEqual,
///         TokenKind::Number,
///         TokenKind::EndOfInput,
///     ]
/// );
/// ```
pub fn tokenize(input: &str) -> FormulaResult<Vec<Token>> {
    Lexer::new(input).tokenize()
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
}

impl Lexer {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    fn tokenize(mut self) -> FormulaResult<Vec<Token>> {
        let mut tokens = Vec::new();

        while let Some(c) = self.peek_char() {
            if c.is_whitespace() {
                self.pos += 1;
                continue;
            }

            let token = if c.is_ascii_digit() {
                self.scan_number()
            } else if c.is_alphabetic() || c == '_' {
                self.scan_identifier()
            } else if c == '"' {
                self.scan_string()?
            } else {
                self.scan_operator(c)?
            };
            tokens.push(token);
        }

        tokens.push(Token::new(TokenKind::EndOfInput, "", self.pos));
        Ok(tokens)
    }

    // === Helper methods ===

    fn peek_char(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_char_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn take_while<F: Fn(char) -> bool>(&mut self, pred: F) -> String {
        let start = self.pos;
        while self.peek_char().map_or(false, &pred) {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }

    // === Token scanning ===

    fn scan_number(&mut self) -> Token {
        // Digits and dots in a single run; the parser rejects malformed literals.
        let start = self.pos;
        let text = self.take_while(|c| c.is_ascii_digit() || c == '.');
        Token::new(TokenKind::Number, text, start)
    }

    fn scan_identifier(&mut self) -> Token {
        let start = self.pos;
        let text = self.take_while(|c| c.is_alphanumeric() || c == '_');
        Token::new(TokenKind::Identifier, text, start)
    }

    fn scan_string(&mut self) -> FormulaResult<Token> {
        let start = self.pos;
        self.pos += 1; // Skip opening quote

        let mut s = String::new();
        while let Some(c) = self.peek_char() {
            if c == '"' {
                if self.peek_char_at(1) == Some('"') {
                    s.push('"');
                    self.pos += 2;
                } else {
                    self.pos += 1;
                    return Ok(Token::new(TokenKind::String, s, start));
                }
            } else {
                s.push(c);
                self.pos += 1;
            }
        }

        Err(FormulaError::syntax(start, "unterminated string literal"))
    }

    fn scan_operator(&mut self, c: char) -> FormulaResult<Token> {
        let start = self.pos;

        let (kind, len) = match c {
            '+' => (TokenKind::Plus, 1),
            '-' => (TokenKind::Minus, 1),
            '*' => (TokenKind::Multiply, 1),
            '/' => (TokenKind::Divide, 1),
            '^' => (TokenKind::Power, 1),
            '(' => (TokenKind::LParen, 1),
            ')' => (TokenKind::RParen, 1),
            ',' => (TokenKind::Comma, 1),
            ':' => (TokenKind::Colon, 1),
            '&' => (TokenKind::Ampersand, 1),
            '=' => (TokenKind::Equal, 1),
            '<' => match self.peek_char_at(1) {
                Some('>') => (TokenKind::NotEqual, 2),
                Some('=') => (TokenKind::LessThanOrEqual, 2),
                _ => (TokenKind::LessThan, 1),
            },
            '>' => match self.peek_char_at(1) {
                Some('=') => (TokenKind::GreaterThanOrEqual, 2),
                _ => (TokenKind::GreaterThan, 1),
            },
            other => {
                return Err(FormulaError::syntax(
                    start,
                    format!("unexpected character '{}' at position {}", other, start),
                ))
            }
        };

        self.pos += len;
        let text: String = self.chars[start..self.pos].iter().collect();
        Ok(Token::new(kind, text, start))
    }
}
