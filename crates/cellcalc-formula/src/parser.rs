//! Formula parser
//!
//! A recursive descent parser over the token stream with one function per
//! precedence level.

use crate::ast::{BinaryOperator, FormulaExpr, UnaryOperator};
use crate::error::{FormulaError, FormulaResult};
use crate::lexer::tokenize;
use crate::token::{Token, TokenKind};

/// Parse a formula string into an AST
///
/// A leading `=` is optional and stripped before tokenizing.
///
/// # Example
/// ```rust
/// use cellcalc_formula::parse_formula;
///
/// let ast = parse_formula("=1+2").unwrap();
/// let ast = parse_formula("SUM(A1:A10)").unwrap();
/// let ast = parse_formula("=IF(A1>0,\"Yes\",\"No\")").unwrap();
/// assert!(parse_formula("=SUM(1,)").is_err());
/// ```
pub fn parse_formula(formula: &str) -> FormulaResult<FormulaExpr> {
    let formula = formula.trim();
    let formula = formula.strip_prefix('=').unwrap_or(formula);
    let tokens = tokenize(formula)?;
    parse(&tokens)
}

/// Parse a token sequence into an AST
///
/// Fails if the tokens do not form exactly one complete expression.
pub fn parse(tokens: &[Token]) -> FormulaResult<FormulaExpr> {
    let mut parser = Parser::new(tokens);
    let expr = parser.parse_expression()?;

    // Make sure we consumed all input
    let current = parser.current();
    if current.kind != TokenKind::EndOfInput {
        return Err(FormulaError::syntax(
            current.position,
            format!("unexpected {} after expression", describe(current)),
        ));
    }

    Ok(expr)
}

fn describe(token: &Token) -> String {
    match token.kind {
        TokenKind::Number | TokenKind::Identifier => {
            format!("{} '{}'", token.kind, token.text)
        }
        TokenKind::String => format!("string \"{}\"", token.text),
        _ => token.kind.to_string(),
    }
}

static END_OF_INPUT: Token = Token {
    kind: TokenKind::EndOfInput,
    text: String::new(),
    position: 0,
};

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    // === Helper methods ===

    fn current(&self) -> &'a Token {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .unwrap_or(&END_OF_INPUT)
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current().kind == kind
    }

    fn consume(&mut self) -> &'a Token {
        let token = self.current();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, expected: TokenKind) -> FormulaResult<&'a Token> {
        if self.check(expected) {
            Ok(self.consume())
        } else {
            let current = self.current();
            Err(FormulaError::syntax(
                current.position,
                format!("expected {} but found {}", expected, describe(current)),
            ))
        }
    }

    // === Expression parsing with precedence ===
    // Precedence (lowest to highest):
    // 1. Comparison: =, <>, <, <=, >, >=
    // 2. Concatenation: &
    // 3. Addition/Subtraction: +, -
    // 4. Multiplication/Division: *, /
    // 5. Exponentiation: ^ (left-associative: 2^3^2 is (2^3)^2)
    // 6. Unary: -, +
    // 7. Primary: literals, references, ranges, function calls, parentheses

    fn parse_expression(&mut self) -> FormulaResult<FormulaExpr> {
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> FormulaResult<FormulaExpr> {
        let mut left = self.parse_concatenation()?;

        loop {
            let op = match self.current().kind {
                TokenKind::Equal => BinaryOperator::Equal,
                TokenKind::NotEqual => BinaryOperator::NotEqual,
                TokenKind::LessThan => BinaryOperator::LessThan,
                TokenKind::LessThanOrEqual => BinaryOperator::LessEqual,
                TokenKind::GreaterThan => BinaryOperator::GreaterThan,
                TokenKind::GreaterThanOrEqual => BinaryOperator::GreaterEqual,
                _ => break,
            };

            self.consume();
            let right = self.parse_concatenation()?;
            left = FormulaExpr::binary(op, left, right);
        }

        Ok(left)
    }

    fn parse_concatenation(&mut self) -> FormulaResult<FormulaExpr> {
        let mut left = self.parse_additive()?;

        while self.check(TokenKind::Ampersand) {
            self.consume();
            let right = self.parse_additive()?;
            left = FormulaExpr::binary(BinaryOperator::Concat, left, right);
        }

        Ok(left)
    }

    fn parse_additive(&mut self) -> FormulaResult<FormulaExpr> {
        let mut left = self.parse_multiplicative()?;

        loop {
            let op = match self.current().kind {
                TokenKind::Plus => BinaryOperator::Add,
                TokenKind::Minus => BinaryOperator::Subtract,
                _ => break,
            };

            self.consume();
            let right = self.parse_multiplicative()?;
            left = FormulaExpr::binary(op, left, right);
        }

        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> FormulaResult<FormulaExpr> {
        let mut left = self.parse_power()?;

        loop {
            let op = match self.current().kind {
                TokenKind::Multiply => BinaryOperator::Multiply,
                TokenKind::Divide => BinaryOperator::Divide,
                _ => break,
            };

            self.consume();
            let right = self.parse_power()?;
            left = FormulaExpr::binary(op, left, right);
        }

        Ok(left)
    }

    fn parse_power(&mut self) -> FormulaResult<FormulaExpr> {
        let mut left = self.parse_unary()?;

        while self.check(TokenKind::Power) {
            self.consume();
            let right = self.parse_unary()?;
            left = FormulaExpr::binary(BinaryOperator::Power, left, right);
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> FormulaResult<FormulaExpr> {
        let op = match self.current().kind {
            TokenKind::Minus => UnaryOperator::Negate,
            TokenKind::Plus => UnaryOperator::Plus,
            _ => return self.parse_primary(),
        };

        self.consume();
        let operand = self.parse_unary()?;
        Ok(FormulaExpr::unary(op, operand))
    }

    fn parse_primary(&mut self) -> FormulaResult<FormulaExpr> {
        let token = self.current();

        match token.kind {
            TokenKind::Number => {
                self.consume();
                let n: f64 = token.text.parse().map_err(|_| {
                    FormulaError::syntax(
                        token.position,
                        format!("invalid number '{}'", token.text),
                    )
                })?;
                Ok(FormulaExpr::Number(n))
            }

            TokenKind::String => {
                self.consume();
                Ok(FormulaExpr::Text(token.text.clone()))
            }

            TokenKind::Identifier => {
                self.consume();
                match self.current().kind {
                    TokenKind::LParen => self.parse_function_call(&token.text),
                    TokenKind::Colon => {
                        self.consume();
                        let end = self.expect(TokenKind::Identifier)?;
                        Ok(FormulaExpr::Range {
                            start: token.text.clone(),
                            end: end.text.clone(),
                        })
                    }
                    _ => Ok(FormulaExpr::CellRef(token.text.clone())),
                }
            }

            TokenKind::LParen => {
                self.consume();
                let expr = self.parse_expression()?;
                self.expect(TokenKind::RParen)?;
                Ok(expr)
            }

            _ => Err(FormulaError::syntax(
                token.position,
                format!("unexpected {}", describe(token)),
            )),
        }
    }

    fn parse_function_call(&mut self, name: &str) -> FormulaResult<FormulaExpr> {
        self.expect(TokenKind::LParen)?;

        let mut args = Vec::new();

        if !self.check(TokenKind::RParen) {
            args.push(self.parse_expression()?);

            while self.check(TokenKind::Comma) {
                self.consume();
                args.push(self.parse_expression()?);
            }
        }

        self.expect(TokenKind::RParen)?;

        Ok(FormulaExpr::Function {
            name: name.to_uppercase(),
            args,
        })
    }
}
