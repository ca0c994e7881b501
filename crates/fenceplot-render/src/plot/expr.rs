//! Expressions in the notation function-plot style payloads use (`sin(x)`, `x^2 - 2x + 1`,
//! `x^2 + y^2 - 4`).
//!
//! Parsed with precedence climbing, highest to lowest:
//! - function calls: `sin(x)`
//! - power: `^` (right associative)
//! - unary minus
//! - multiplication/division: `*`, `/`, and juxtaposition (`2x`, `(x+1)(x-1)`)
//! - addition/subtraction: `+`, `-`

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Var {
    X,
    Y,
    T,
}

impl Var {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "x" => Some(Self::X),
            "y" => Some(Self::Y),
            "t" => Some(Self::T),
            _ => None,
        }
    }
}

/// Values for the free variables of an expression.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bindings {
    pub x: f64,
    pub y: f64,
    pub t: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinOp {
    fn precedence(self) -> u8 {
        match self {
            Self::Add | Self::Sub => 1,
            Self::Mul | Self::Div => 2,
            Self::Pow => 4,
        }
    }

    fn is_right_assoc(self) -> bool {
        self == Self::Pow
    }
}

const UNARY_PREC: u8 = 3;

/// Deepest nesting of parentheses, signs, calls and `^` chains accepted by [`Expr::parse`].
/// Keeps parsing, evaluation and drop of the tree well inside the stack.
pub const MAX_NESTING: usize = 256;

/// Longest accepted expression, in tokens. Bounds the depth of left-leaning chains such as
/// `x + x + ... + x`, which do not nest but still build a deep tree.
pub const MAX_TOKENS: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Func {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Sqrt,
    Cbrt,
    Abs,
    Exp,
    Ln,
    Log10,
    Log2,
    Floor,
    Ceil,
    Sign,
    Min,
    Max,
}

impl Func {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "sin" => Self::Sin,
            "cos" => Self::Cos,
            "tan" => Self::Tan,
            "asin" => Self::Asin,
            "acos" => Self::Acos,
            "atan" => Self::Atan,
            "sinh" => Self::Sinh,
            "cosh" => Self::Cosh,
            "tanh" => Self::Tanh,
            "sqrt" => Self::Sqrt,
            "cbrt" => Self::Cbrt,
            "abs" => Self::Abs,
            "exp" => Self::Exp,
            // math.js convention: `log` is the natural logarithm.
            "log" | "ln" => Self::Ln,
            "log10" => Self::Log10,
            "log2" => Self::Log2,
            "floor" => Self::Floor,
            "ceil" => Self::Ceil,
            "sign" => Self::Sign,
            "min" => Self::Min,
            "max" => Self::Max,
            _ => return None,
        })
    }

    fn arity(self) -> usize {
        match self {
            Self::Min | Self::Max => 2,
            _ => 1,
        }
    }

    fn apply(self, args: &[f64]) -> f64 {
        let a = args.first().copied().unwrap_or(f64::NAN);
        match self {
            Self::Sin => a.sin(),
            Self::Cos => a.cos(),
            Self::Tan => a.tan(),
            Self::Asin => a.asin(),
            Self::Acos => a.acos(),
            Self::Atan => a.atan(),
            Self::Sinh => a.sinh(),
            Self::Cosh => a.cosh(),
            Self::Tanh => a.tanh(),
            Self::Sqrt => a.sqrt(),
            Self::Cbrt => a.cbrt(),
            Self::Abs => a.abs(),
            Self::Exp => a.exp(),
            Self::Ln => a.ln(),
            Self::Log10 => a.log10(),
            Self::Log2 => a.log2(),
            Self::Floor => a.floor(),
            Self::Ceil => a.ceil(),
            Self::Sign => {
                if a == 0.0 || a.is_nan() {
                    a
                } else {
                    a.signum()
                }
            }
            Self::Min => a.min(args.get(1).copied().unwrap_or(f64::NAN)),
            Self::Max => a.max(args.get(1).copied().unwrap_or(f64::NAN)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Num(f64),
    Var(Var),
    Neg(Box<Expr>),
    Binary(BinOp, Box<Expr>, Box<Expr>),
    Call(Func, Vec<Expr>),
}

impl Expr {
    /// Parses `input`, accepting only the free variables listed in `vars`.
    pub fn parse(input: &str, vars: &[Var]) -> Result<Self, ExprError> {
        let tokens = tokenize(input)?;
        let mut parser = Parser {
            tokens,
            pos: 0,
            vars,
            depth: 0,
        };
        let expr = parser.parse_expr(0)?;
        match parser.peek() {
            Token::End => Ok(expr),
            other => Err(ExprError::new(format!("unexpected {other}"))),
        }
    }

    pub fn eval(&self, env: &Bindings) -> f64 {
        match self {
            Self::Num(n) => *n,
            Self::Var(Var::X) => env.x,
            Self::Var(Var::Y) => env.y,
            Self::Var(Var::T) => env.t,
            Self::Neg(e) => -e.eval(env),
            Self::Binary(op, l, r) => {
                let (l, r) = (l.eval(env), r.eval(env));
                match op {
                    BinOp::Add => l + r,
                    BinOp::Sub => l - r,
                    BinOp::Mul => l * r,
                    BinOp::Div => l / r,
                    BinOp::Pow => l.powf(r),
                }
            }
            Self::Call(f, args) => {
                let values: Vec<f64> = args.iter().map(|a| a.eval(env)).collect();
                f.apply(&values)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExprError {
    pub message: String,
}

impl ExprError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ExprError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ExprError {}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Num(f64),
    Ident(String),
    Op(BinOp),
    Minus,
    LParen,
    RParen,
    Comma,
    End,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Num(n) => write!(f, "number {n}"),
            Self::Ident(s) => write!(f, "`{s}`"),
            Self::Op(op) => write!(f, "operator {op:?}"),
            Self::Minus => f.write_str("`-`"),
            Self::LParen => f.write_str("`(`"),
            Self::RParen => f.write_str("`)`"),
            Self::Comma => f.write_str("`,`"),
            Self::End => f.write_str("end of expression"),
        }
    }
}

fn tokenize(input: &str) -> Result<Vec<Token>, ExprError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&ch) = chars.peek() {
        if tokens.len() >= MAX_TOKENS {
            return Err(ExprError::new(format!(
                "expression is longer than {MAX_TOKENS} tokens"
            )));
        }
        match ch {
            c if c.is_whitespace() => {
                chars.next();
            }
            '0'..='9' | '.' => {
                let mut num = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_ascii_digit() || c == '.' {
                        num.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                // Scientific notation: `1e-3`, `2.5E4`.
                if matches!(chars.peek(), Some('e' | 'E')) {
                    let mut lookahead = chars.clone();
                    lookahead.next();
                    let signed = matches!(lookahead.peek(), Some('+' | '-'));
                    if signed {
                        lookahead.next();
                    }
                    if lookahead.peek().is_some_and(|c| c.is_ascii_digit()) {
                        num.push('e');
                        chars.next();
                        if signed {
                            if let Some(sign) = chars.next() {
                                num.push(sign);
                            }
                        }
                        while let Some(&c) = chars.peek() {
                            if !c.is_ascii_digit() {
                                break;
                            }
                            num.push(c);
                            chars.next();
                        }
                    }
                }
                let n: f64 = num
                    .parse()
                    .map_err(|_| ExprError::new(format!("invalid number `{num}`")))?;
                tokens.push(Token::Num(n));
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut ident = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_ascii_alphanumeric() || c == '_' {
                        ident.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(ident));
            }
            '+' => {
                chars.next();
                tokens.push(Token::Op(BinOp::Add));
            }
            '-' => {
                chars.next();
                tokens.push(Token::Minus);
            }
            '*' => {
                chars.next();
                if chars.peek() == Some(&'*') {
                    chars.next();
                    tokens.push(Token::Op(BinOp::Pow));
                } else {
                    tokens.push(Token::Op(BinOp::Mul));
                }
            }
            '/' => {
                chars.next();
                tokens.push(Token::Op(BinOp::Div));
            }
            '^' => {
                chars.next();
                tokens.push(Token::Op(BinOp::Pow));
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            ',' => {
                chars.next();
                tokens.push(Token::Comma);
            }
            other => {
                return Err(ExprError::new(format!("unexpected character '{other}'")));
            }
        }
    }

    tokens.push(Token::End);
    Ok(tokens)
}

struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    vars: &'a [Var],
    depth: usize,
}

impl Parser<'_> {
    fn peek(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&Token::End)
    }

    fn advance(&mut self) -> Token {
        let tok = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn parse_expr(&mut self, min_prec: u8) -> Result<Expr, ExprError> {
        if self.depth >= MAX_NESTING {
            return Err(ExprError::new(format!(
                "expression nests deeper than {MAX_NESTING} levels"
            )));
        }
        self.depth += 1;
        let expr = self.parse_binary(min_prec);
        self.depth -= 1;
        expr
    }

    fn parse_binary(&mut self, min_prec: u8) -> Result<Expr, ExprError> {
        let mut left = self.parse_atom()?;

        loop {
            let (op, implicit) = match self.peek() {
                Token::Op(op) => (*op, false),
                Token::Minus => (BinOp::Sub, false),
                Token::Num(_) | Token::Ident(_) | Token::LParen => (BinOp::Mul, true),
                _ => break,
            };

            let prec = op.precedence();
            if prec < min_prec {
                break;
            }
            if !implicit {
                self.advance();
            }

            let next_min_prec = if op.is_right_assoc() { prec } else { prec + 1 };
            let right = self.parse_expr(next_min_prec)?;
            left = Expr::Binary(op, Box::new(left), Box::new(right));
        }

        Ok(left)
    }

    fn parse_atom(&mut self) -> Result<Expr, ExprError> {
        match self.advance() {
            Token::Num(n) => Ok(Expr::Num(n)),
            Token::Ident(name) => {
                if matches!(self.peek(), Token::LParen) {
                    self.advance();
                    let func = Func::from_name(&name)
                        .ok_or_else(|| ExprError::new(format!("unknown function `{name}`")))?;
                    let args = self.parse_args()?;
                    if args.len() != func.arity() {
                        return Err(ExprError::new(format!(
                            "`{name}` takes {} argument(s), got {}",
                            func.arity(),
                            args.len()
                        )));
                    }
                    Ok(Expr::Call(func, args))
                } else {
                    self.resolve_name(&name)
                }
            }
            Token::LParen => {
                let expr = self.parse_expr(0)?;
                self.expect_rparen()?;
                Ok(expr)
            }
            Token::Minus => {
                let operand = self.parse_expr(UNARY_PREC)?;
                Ok(Expr::Neg(Box::new(operand)))
            }
            Token::Op(BinOp::Add) => self.parse_expr(UNARY_PREC),
            other => Err(ExprError::new(format!("unexpected {other}"))),
        }
    }

    fn parse_args(&mut self) -> Result<Vec<Expr>, ExprError> {
        let mut args = Vec::new();
        if matches!(self.peek(), Token::RParen) {
            self.advance();
            return Ok(args);
        }
        loop {
            args.push(self.parse_expr(0)?);
            if matches!(self.peek(), Token::Comma) {
                self.advance();
            } else {
                break;
            }
        }
        self.expect_rparen()?;
        Ok(args)
    }

    fn expect_rparen(&mut self) -> Result<(), ExprError> {
        match self.advance() {
            Token::RParen => Ok(()),
            other => Err(ExprError::new(format!("expected `)`, found {other}"))),
        }
    }

    fn resolve_name(&self, name: &str) -> Result<Expr, ExprError> {
        match name {
            "pi" | "PI" => return Ok(Expr::Num(std::f64::consts::PI)),
            "e" | "E" => return Ok(Expr::Num(std::f64::consts::E)),
            _ => {}
        }
        match Var::from_name(name) {
            Some(var) if self.vars.contains(&var) => Ok(Expr::Var(var)),
            _ => Err(ExprError::new(format!("unknown variable `{name}`"))),
        }
    }
}
