//
// Copyright (c) 2026 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! Plural-Forms rule parser and evaluator
//!
//! A catalog's header entry carries a line such as
//! `Plural-Forms: nplurals=3; plural=(n==1 ? 0 : n%10>=2 && n%10<=4 ? 1 : 2);`.
//! The `plural` part is a C expression over the count `n`; this module turns
//! it into a [`PluralRule`] that maps a count to a plural form index.
//!
//! Operator precedence (lowest to highest):
//! 1. Ternary: `? :`
//! 2. Logical OR: `||`
//! 3. Logical AND: `&&`
//! 4. Equality: `==` `!=`
//! 5. Relational: `<` `<=` `>` `>=`
//! 6. Additive: `+` `-`
//! 7. Multiplicative: `*` `/` `%`
//! 8. Unary: `!`
//! 9. Primary: `n`, integer literals, `( expr )`

use std::fmt;
use std::iter::Peekable;
use std::str::CharIndices;

/// Limit on nesting of parentheses, negations and ternaries
const MAX_DEPTH: usize = 64;

/// Error produced while parsing a plural rule
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PluralError {
    #[error("unexpected character '{ch}' at offset {pos}")]
    UnexpectedChar { ch: char, pos: usize },
    #[error("unexpected end of expression")]
    UnexpectedEof,
    #[error("expected {expected} at offset {pos}")]
    Expected { expected: &'static str, pos: usize },
    #[error("trailing input at offset {0}")]
    TrailingInput(usize),
    #[error("division by zero at offset {0}")]
    DivisionByZero(usize),
    #[error("integer literal too large at offset {0}")]
    NumberOverflow(usize),
    #[error("expression nested too deeply")]
    TooDeep,
    #[error("missing nplurals")]
    MissingNplurals,
    #[error("invalid nplurals: {0:?}")]
    InvalidNplurals(String),
    #[error("missing plural expression")]
    MissingPlural,
}

/// Binary operators of the plural expression language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Or,
    And,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl BinaryOp {
    fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Or => "||",
            BinaryOp::And => "&&",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
        }
    }

    /// Apply a non-short-circuiting operator to evaluated operands.
    ///
    /// Arithmetic wraps like C `unsigned long`; a zero divisor yields 0.
    fn apply(self, l: u64, r: u64) -> u64 {
        match self {
            BinaryOp::Eq => u64::from(l == r),
            BinaryOp::Ne => u64::from(l != r),
            BinaryOp::Lt => u64::from(l < r),
            BinaryOp::Le => u64::from(l <= r),
            BinaryOp::Gt => u64::from(l > r),
            BinaryOp::Ge => u64::from(l >= r),
            BinaryOp::Add => l.wrapping_add(r),
            BinaryOp::Sub => l.wrapping_sub(r),
            BinaryOp::Mul => l.wrapping_mul(r),
            BinaryOp::Div => l.checked_div(r).unwrap_or(0),
            BinaryOp::Mod => l.checked_rem(r).unwrap_or(0),
            BinaryOp::And => u64::from(l != 0 && r != 0),
            BinaryOp::Or => u64::from(l != 0 || r != 0),
        }
    }
}

/// Abstract syntax tree of a plural expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// The count `n`
    N,
    Literal(u64),
    /// Logical negation `!e`
    Not(Box<Expr>),
    Binary(Box<Expr>, BinaryOp, Box<Expr>),
    /// `cond ? if_true : if_false`
    Ternary(Box<Expr>, Box<Expr>, Box<Expr>),
}

impl Expr {
    /// Parse a bare expression such as `n != 1`.
    pub fn parse(input: &str) -> Result<Self, PluralError> {
        let mut parser = Parser::new(input)?;
        let expr = parser.parse_ternary()?;
        match parser.current {
            Token::Eof => Ok(expr),
            _ => Err(PluralError::TrailingInput(parser.current_pos)),
        }
    }

    /// Evaluate for a count. `&&`, `||` and `?:` only evaluate the operands
    /// they need.
    pub fn evaluate(&self, n: u64) -> u64 {
        match self {
            Expr::N => n,
            Expr::Literal(v) => *v,
            Expr::Not(e) => u64::from(e.evaluate(n) == 0),
            Expr::Ternary(cond, if_true, if_false) => {
                if cond.evaluate(n) != 0 {
                    if_true.evaluate(n)
                } else {
                    if_false.evaluate(n)
                }
            }
            Expr::Binary(l, BinaryOp::And, r) => {
                u64::from(l.evaluate(n) != 0 && r.evaluate(n) != 0)
            }
            Expr::Binary(l, BinaryOp::Or, r) => {
                u64::from(l.evaluate(n) != 0 || r.evaluate(n) != 0)
            }
            Expr::Binary(l, op, r) => op.apply(l.evaluate(n), r.evaluate(n)),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::N => f.write_str("n"),
            Expr::Literal(v) => write!(f, "{v}"),
            Expr::Not(e) => write!(f, "!{e}"),
            Expr::Binary(l, op, r) => write!(f, "({l} {} {r})", op.symbol()),
            Expr::Ternary(c, t, e) => write!(f, "({c} ? {t} : {e})"),
        }
    }
}

/// A parsed `Plural-Forms` rule: form count plus the selecting expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluralRule {
    num_plurals: usize,
    expr: Expr,
}

impl PluralRule {
    pub fn new(num_plurals: usize, expr: Expr) -> Self {
        PluralRule { num_plurals, expr }
    }

    /// Parse a `Plural-Forms` header value, e.g. `nplurals=2; plural=(n != 1);`
    ///
    /// Parts may appear in any order; unknown parts are ignored.
    pub fn parse(header_value: &str) -> Result<Self, PluralError> {
        let mut num_plurals = None;
        let mut expr = None;

        for part in header_value.split(';') {
            let Some((key, value)) = part.split_once('=') else {
                continue;
            };
            match key.trim() {
                "nplurals" => {
                    let value = value.trim();
                    num_plurals = match value.parse::<usize>() {
                        Ok(count) if count > 0 => Some(count),
                        _ => return Err(PluralError::InvalidNplurals(value.to_string())),
                    };
                }
                "plural" => expr = Some(Expr::parse(value)?),
                _ => {}
            }
        }

        let num_plurals = num_plurals.ok_or(PluralError::MissingNplurals)?;
        let expr = expr.ok_or(PluralError::MissingPlural)?;
        Ok(PluralRule { num_plurals, expr })
    }

    /// Number of plural forms declared by the catalog
    pub fn num_plurals(&self) -> usize {
        self.num_plurals
    }

    pub fn expression(&self) -> &Expr {
        &self.expr
    }

    /// Plural form index for count `n`.
    ///
    /// The raw expression value is returned; callers holding a fixed list of
    /// forms clamp it themselves.
    pub fn evaluate(&self, n: u64) -> usize {
        usize::try_from(self.expr.evaluate(n)).unwrap_or(usize::MAX)
    }
}

impl Default for PluralRule {
    /// Germanic rule: `nplurals=2; plural=n != 1;`
    fn default() -> Self {
        PluralRule {
            num_plurals: 2,
            expr: Expr::Binary(Box::new(Expr::N), BinaryOp::Ne, Box::new(Expr::Literal(1))),
        }
    }
}

impl fmt::Display for PluralRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "nplurals={}; plural={};", self.num_plurals, self.expr)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    N,
    Number(u64),
    LParen,
    RParen,
    Question,
    Colon,
    Not,
    Op(BinaryOp),
    Eof,
}

struct Lexer<'a> {
    chars: Peekable<CharIndices<'a>>,
    len: usize,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Lexer {
            chars: input.char_indices().peekable(),
            len: input.len(),
        }
    }

    /// Next token and the byte offset where it starts
    fn next_token(&mut self) -> Result<(Token, usize), PluralError> {
        while self.chars.next_if(|&(_, c)| c.is_whitespace()).is_some() {}

        let Some((pos, c)) = self.chars.next() else {
            return Ok((Token::Eof, self.len));
        };

        let token = match c {
            'n' => Token::N,
            '0'..='9' => self.read_number(pos, c)?,
            '(' => Token::LParen,
            ')' => Token::RParen,
            '?' => Token::Question,
            ':' => Token::Colon,
            '+' => Token::Op(BinaryOp::Add),
            '-' => Token::Op(BinaryOp::Sub),
            '*' => Token::Op(BinaryOp::Mul),
            '/' => Token::Op(BinaryOp::Div),
            '%' => Token::Op(BinaryOp::Mod),
            '=' => self.pair('=', BinaryOp::Eq, pos, "'=' after '='")?,
            '&' => self.pair('&', BinaryOp::And, pos, "'&' after '&'")?,
            '|' => self.pair('|', BinaryOp::Or, pos, "'|' after '|'")?,
            '!' => self.followed_by_eq(Token::Op(BinaryOp::Ne), Token::Not),
            '<' => self.followed_by_eq(Token::Op(BinaryOp::Le), Token::Op(BinaryOp::Lt)),
            '>' => self.followed_by_eq(Token::Op(BinaryOp::Ge), Token::Op(BinaryOp::Gt)),
            _ => return Err(PluralError::UnexpectedChar { ch: c, pos }),
        };
        Ok((token, pos))
    }

    /// Two-character operator whose second character is mandatory
    fn pair(
        &mut self,
        second: char,
        op: BinaryOp,
        pos: usize,
        expected: &'static str,
    ) -> Result<Token, PluralError> {
        match self.chars.next_if(|&(_, c)| c == second) {
            Some(_) => Ok(Token::Op(op)),
            None => Err(PluralError::Expected { expected, pos }),
        }
    }

    fn followed_by_eq(&mut self, with_eq: Token, alone: Token) -> Token {
        if self.chars.next_if(|&(_, c)| c == '=').is_some() {
            with_eq
        } else {
            alone
        }
    }

    fn read_number(&mut self, pos: usize, first: char) -> Result<Token, PluralError> {
        let mut value = u64::from(first as u8 - b'0');
        while let Some((_, c)) = self.chars.next_if(|&(_, c)| c.is_ascii_digit()) {
            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add(u64::from(c as u8 - b'0')))
                .ok_or(PluralError::NumberOverflow(pos))?;
        }
        Ok(Token::Number(value))
    }
}

/// Recursive-descent parser, one function per precedence level
struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    current_pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Result<Self, PluralError> {
        let mut lexer = Lexer::new(input);
        let (current, current_pos) = lexer.next_token()?;
        Ok(Parser {
            lexer,
            current,
            current_pos,
            depth: 0,
        })
    }

    fn advance(&mut self) -> Result<(), PluralError> {
        (self.current, self.current_pos) = self.lexer.next_token()?;
        Ok(())
    }

    fn expect(&mut self, expected: Token, what: &'static str) -> Result<(), PluralError> {
        if self.current == expected {
            self.advance()
        } else if self.current == Token::Eof {
            Err(PluralError::UnexpectedEof)
        } else {
            Err(PluralError::Expected {
                expected: what,
                pos: self.current_pos,
            })
        }
    }

    fn descend(&mut self) -> Result<(), PluralError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(PluralError::TooDeep);
        }
        Ok(())
    }

    fn parse_ternary(&mut self) -> Result<Expr, PluralError> {
        let cond = self.parse_binary(0)?;
        if self.current != Token::Question {
            return Ok(cond);
        }

        self.descend()?;
        self.advance()?;
        let if_true = self.parse_ternary()?;
        self.expect(Token::Colon, "':'")?;
        let if_false = self.parse_ternary()?;
        self.depth -= 1;

        Ok(Expr::Ternary(
            Box::new(cond),
            Box::new(if_true),
            Box::new(if_false),
        ))
    }

    /// Left-associative binary levels, from `||` (level 0) down to
    /// `* / %` (level 6).
    fn parse_binary(&mut self, level: usize) -> Result<Expr, PluralError> {
        const LEVELS: &[&[BinaryOp]] = &[
            &[BinaryOp::Or],
            &[BinaryOp::And],
            &[BinaryOp::Eq, BinaryOp::Ne],
            &[BinaryOp::Lt, BinaryOp::Le, BinaryOp::Gt, BinaryOp::Ge],
            &[BinaryOp::Add, BinaryOp::Sub],
            &[BinaryOp::Mul, BinaryOp::Div, BinaryOp::Mod],
        ];

        let Some(ops) = LEVELS.get(level) else {
            return self.parse_unary();
        };

        let mut left = self.parse_binary(level + 1)?;
        while let Token::Op(op) = self.current {
            if !ops.contains(&op) {
                break;
            }

            let op_pos = self.current_pos;
            self.advance()?;
            let right = self.parse_binary(level + 1)?;
            if matches!(op, BinaryOp::Div | BinaryOp::Mod) && right == Expr::Literal(0) {
                return Err(PluralError::DivisionByZero(op_pos));
            }
            left = Expr::Binary(Box::new(left), op, Box::new(right));
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, PluralError> {
        if self.current != Token::Not {
            return self.parse_primary();
        }

        self.descend()?;
        self.advance()?;
        let operand = self.parse_unary()?;
        self.depth -= 1;
        Ok(Expr::Not(Box::new(operand)))
    }

    fn parse_primary(&mut self) -> Result<Expr, PluralError> {
        match self.current {
            Token::N => {
                self.advance()?;
                Ok(Expr::N)
            }
            Token::Number(v) => {
                self.advance()?;
                Ok(Expr::Literal(v))
            }
            Token::LParen => {
                self.descend()?;
                self.advance()?;
                let expr = self.parse_ternary()?;
                self.expect(Token::RParen, "')'")?;
                self.depth -= 1;
                Ok(expr)
            }
            Token::Eof => Err(PluralError::UnexpectedEof),
            _ => Err(PluralError::Expected {
                expected: "n, number, or '('",
                pos: self.current_pos,
            }),
        }
    }
}
