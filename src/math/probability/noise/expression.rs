// src/math/probability/noise/expression.rs

//! # Expression Noise Compiler
//!
//! Turns a user supplied arithmetic expression over `x`, `y`, `w`, `h` into a
//! callable noise function. The grammar is deliberately closed: numbers, the four
//! variables, a handful of constants, arithmetic operators and a fixed set of pure
//! math functions. There is no assignment, no loop construct and no way to reach
//! anything outside of the evaluated numbers.
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/' | '%') unary)*
//! unary   := ('-' | '+') unary | power
//! power   := primary (('^' | '**') unary)?
//! primary := NUMBER | IDENT | IDENT '(' args ')' | '(' expr ')'
//! ```

use thiserror::Error;

/// Maximum depth of the syntax tree accepted by the parser. Operator chains like
/// `x + x + x` count one level per operator, since they nest to the left.
pub const MAX_DEPTH: usize = 256;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExpressionError {
    #[error("Expression is empty")]
    Empty,

    #[error("Unexpected character '{ch}' at position {pos}")]
    UnexpectedChar { ch: char, pos: usize },

    #[error("Invalid number literal '{literal}' at position {pos}")]
    InvalidNumber { literal: String, pos: usize },

    #[error("Unexpected {found} at position {pos}, expected {expected}")]
    UnexpectedToken {
        found: String,
        expected: &'static str,
        pos: usize,
    },

    #[error("Unexpected end of expression, expected {expected}")]
    UnexpectedEnd { expected: &'static str },

    #[error("Unknown identifier '{name}' at position {pos}")]
    UnknownIdentifier { name: String, pos: usize },

    #[error("Function '{name}' expects {expected} argument(s), got {actual}")]
    ArityMismatch {
        name: &'static str,
        expected: &'static str,
        actual: usize,
    },

    #[error("Expression nesting exceeds {0} levels")]
    TooDeep(usize),

    #[error("Expression evaluates to a non-finite value ({value}) for x = y = w = h = 1")]
    NonFinite { value: f64 },
}

// ===================================================================================
// AST
// ===================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variable {
    X,
    Y,
    W,
    H,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Plus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Atan2,
    Sinh,
    Cosh,
    Tanh,
    Sqrt,
    Cbrt,
    Abs,
    Sign,
    Floor,
    Ceil,
    Round,
    Trunc,
    Fract,
    Exp,
    Ln,
    Log2,
    Log10,
    Pow,
    Min,
    Max,
    Hypot,
    Clamp,
}

/// Arity of a function: exact count or "at least one".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Arity {
    Exact(usize),
    AtLeastOne,
}

impl Function {
    fn lookup(name: &str) -> Option<Self> {
        let f = match name {
            "sin" => Function::Sin,
            "cos" => Function::Cos,
            "tan" => Function::Tan,
            "asin" => Function::Asin,
            "acos" => Function::Acos,
            "atan" => Function::Atan,
            "atan2" => Function::Atan2,
            "sinh" => Function::Sinh,
            "cosh" => Function::Cosh,
            "tanh" => Function::Tanh,
            "sqrt" => Function::Sqrt,
            "cbrt" => Function::Cbrt,
            "abs" => Function::Abs,
            "sign" => Function::Sign,
            "floor" => Function::Floor,
            "ceil" => Function::Ceil,
            "round" => Function::Round,
            "trunc" => Function::Trunc,
            "fract" => Function::Fract,
            "exp" => Function::Exp,
            // `log` ist wie in gängigen Rechnern/JS der natürliche Logarithmus
            "ln" | "log" => Function::Ln,
            "log2" => Function::Log2,
            "log10" => Function::Log10,
            "pow" => Function::Pow,
            "min" => Function::Min,
            "max" => Function::Max,
            "hypot" => Function::Hypot,
            "clamp" => Function::Clamp,
            _ => return None,
        };
        Some(f)
    }

    fn name(self) -> &'static str {
        match self {
            Function::Sin => "sin",
            Function::Cos => "cos",
            Function::Tan => "tan",
            Function::Asin => "asin",
            Function::Acos => "acos",
            Function::Atan => "atan",
            Function::Atan2 => "atan2",
            Function::Sinh => "sinh",
            Function::Cosh => "cosh",
            Function::Tanh => "tanh",
            Function::Sqrt => "sqrt",
            Function::Cbrt => "cbrt",
            Function::Abs => "abs",
            Function::Sign => "sign",
            Function::Floor => "floor",
            Function::Ceil => "ceil",
            Function::Round => "round",
            Function::Trunc => "trunc",
            Function::Fract => "fract",
            Function::Exp => "exp",
            Function::Ln => "ln",
            Function::Log2 => "log2",
            Function::Log10 => "log10",
            Function::Pow => "pow",
            Function::Min => "min",
            Function::Max => "max",
            Function::Hypot => "hypot",
            Function::Clamp => "clamp",
        }
    }

    fn arity(self) -> Arity {
        match self {
            Function::Atan2 | Function::Pow | Function::Hypot => Arity::Exact(2),
            Function::Clamp => Arity::Exact(3),
            Function::Min | Function::Max => Arity::AtLeastOne,
            _ => Arity::Exact(1),
        }
    }

    fn check_arity(self, actual: usize) -> Result<(), ExpressionError> {
        let ok = match self.arity() {
            Arity::Exact(n) => actual == n,
            Arity::AtLeastOne => actual >= 1,
        };
        if ok {
            return Ok(());
        }
        let expected = match self.arity() {
            Arity::Exact(1) => "1",
            Arity::Exact(2) => "2",
            Arity::Exact(3) => "3",
            Arity::Exact(_) | Arity::AtLeastOne => "at least 1",
        };
        Err(ExpressionError::ArityMismatch {
            name: self.name(),
            expected,
            actual,
        })
    }

    fn apply(self, args: &[f64]) -> f64 {
        let a = args.first().copied().unwrap_or(f64::NAN);
        let b = args.get(1).copied().unwrap_or(f64::NAN);
        match self {
            Function::Sin => a.sin(),
            Function::Cos => a.cos(),
            Function::Tan => a.tan(),
            Function::Asin => a.asin(),
            Function::Acos => a.acos(),
            Function::Atan => a.atan(),
            Function::Atan2 => a.atan2(b),
            Function::Sinh => a.sinh(),
            Function::Cosh => a.cosh(),
            Function::Tanh => a.tanh(),
            Function::Sqrt => a.sqrt(),
            Function::Cbrt => a.cbrt(),
            Function::Abs => a.abs(),
            Function::Sign => {
                if a > 0.0 {
                    1.0
                } else if a < 0.0 {
                    -1.0
                } else {
                    a
                }
            }
            Function::Floor => a.floor(),
            Function::Ceil => a.ceil(),
            // Halbe Werte runden Richtung +∞ (round(-2.5) == -2)
            Function::Round => (a + 0.5).floor(),
            Function::Trunc => a.trunc(),
            Function::Fract => a - a.floor(),
            Function::Exp => a.exp(),
            Function::Ln => a.ln(),
            Function::Log2 => a.log2(),
            Function::Log10 => a.log10(),
            Function::Pow => a.powf(b),
            Function::Min => args.iter().copied().fold(f64::INFINITY, f64::min),
            Function::Max => args.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            Function::Hypot => a.hypot(b),
            Function::Clamp => {
                let hi = args.get(2).copied().unwrap_or(f64::NAN);
                a.max(b).min(hi)
            }
        }
    }
}

/// Abstract syntax tree of a parsed expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Var(Variable),
    Unary(UnaryOp, Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    Call(Function, Vec<Expr>),
}

impl Expr {
    pub fn eval(&self, x: f64, y: f64, w: f64, h: f64) -> f64 {
        match self {
            Expr::Number(n) => *n,
            Expr::Var(v) => match v {
                Variable::X => x,
                Variable::Y => y,
                Variable::W => w,
                Variable::H => h,
            },
            Expr::Unary(op, inner) => {
                let v = inner.eval(x, y, w, h);
                match op {
                    UnaryOp::Neg => -v,
                    UnaryOp::Plus => v,
                }
            }
            Expr::Binary(op, lhs, rhs) => {
                let a = lhs.eval(x, y, w, h);
                let b = rhs.eval(x, y, w, h);
                match op {
                    BinaryOp::Add => a + b,
                    BinaryOp::Sub => a - b,
                    BinaryOp::Mul => a * b,
                    BinaryOp::Div => a / b,
                    BinaryOp::Rem => a % b,
                    BinaryOp::Pow => a.powf(b),
                }
            }
            Expr::Call(f, args) => {
                let values: Vec<f64> = args.iter().map(|a| a.eval(x, y, w, h)).collect();
                f.apply(&values)
            }
        }
    }
}

// ===================================================================================
// Lexer
// ===================================================================================

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,
    LParen,
    RParen,
    Comma,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Number(n) => format!("number {n}"),
            Token::Ident(name) => format!("identifier '{name}'"),
            Token::Plus => "'+'".to_string(),
            Token::Minus => "'-'".to_string(),
            Token::Star => "'*'".to_string(),
            Token::Slash => "'/'".to_string(),
            Token::Percent => "'%'".to_string(),
            Token::Caret => "'^'".to_string(),
            Token::LParen => "'('".to_string(),
            Token::RParen => "')'".to_string(),
            Token::Comma => "','".to_string(),
        }
    }
}

fn tokenize(source: &str) -> Result<Vec<(Token, usize)>, ExpressionError> {
    let chars: Vec<char> = source.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let start = i;
        match c {
            c if c.is_whitespace() => {
                i += 1;
                continue;
            }
            '0'..='9' | '.' => {
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                // Exponent: 1e-3, 2.5E+4
                if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
                    let mut j = i + 1;
                    if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
                        j += 1;
                    }
                    if j < chars.len() && chars[j].is_ascii_digit() {
                        i = j;
                        while i < chars.len() && chars[i].is_ascii_digit() {
                            i += 1;
                        }
                    }
                }
                let literal: String = chars[start..i].iter().collect();
                let value = literal
                    .parse::<f64>()
                    .map_err(|_| ExpressionError::InvalidNumber {
                        literal: literal.clone(),
                        pos: start,
                    })?;
                tokens.push((Token::Number(value), start));
                continue;
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                while i < chars.len()
                    && (chars[i].is_ascii_alphanumeric() || chars[i] == '_' || chars[i] == '.')
                {
                    i += 1;
                }
                let name: String = chars[start..i].iter().collect();
                tokens.push((Token::Ident(name), start));
                continue;
            }
            '+' => tokens.push((Token::Plus, start)),
            '-' => tokens.push((Token::Minus, start)),
            '*' => {
                if chars.get(i + 1) == Some(&'*') {
                    i += 1;
                    tokens.push((Token::Caret, start));
                } else {
                    tokens.push((Token::Star, start));
                }
            }
            '/' => tokens.push((Token::Slash, start)),
            '%' => tokens.push((Token::Percent, start)),
            '^' => tokens.push((Token::Caret, start)),
            '(' => tokens.push((Token::LParen, start)),
            ')' => tokens.push((Token::RParen, start)),
            ',' => tokens.push((Token::Comma, start)),
            other => return Err(ExpressionError::UnexpectedChar { ch: other, pos: start }),
        }
        i += 1;
    }

    Ok(tokens)
}

// ===================================================================================
// Parser
// ===================================================================================

struct Parser {
    tokens: Vec<(Token, usize)>,
    cursor: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.cursor).map(|(t, _)| t)
    }

    fn next(&mut self) -> Option<(Token, usize)> {
        let item = self.tokens.get(self.cursor).cloned();
        if item.is_some() {
            self.cursor += 1;
        }
        item
    }

    fn expect(&mut self, wanted: Token, expected: &'static str) -> Result<(), ExpressionError> {
        match self.next() {
            Some((t, _)) if t == wanted => Ok(()),
            Some((t, pos)) => Err(ExpressionError::UnexpectedToken {
                found: t.describe(),
                expected,
                pos,
            }),
            None => Err(ExpressionError::UnexpectedEnd { expected }),
        }
    }

    fn enter(&mut self) -> Result<(), ExpressionError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(ExpressionError::TooDeep(MAX_DEPTH));
        }
        Ok(())
    }

    fn parse_expr(&mut self) -> Result<Expr, ExpressionError> {
        self.enter()?;
        let mut chained = 0;
        let mut lhs = self.parse_term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => break,
            };
            self.cursor += 1;
            self.enter()?;
            chained += 1;
            let rhs = self.parse_term()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        self.depth -= chained + 1;
        Ok(lhs)
    }

    fn parse_term(&mut self) -> Result<Expr, ExpressionError> {
        let mut chained = 0;
        let mut lhs = self.parse_unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                Some(Token::Percent) => BinaryOp::Rem,
                _ => break,
            };
            self.cursor += 1;
            self.enter()?;
            chained += 1;
            let rhs = self.parse_unary()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        self.depth -= chained;
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Expr, ExpressionError> {
        let op = match self.peek() {
            Some(Token::Minus) => UnaryOp::Neg,
            Some(Token::Plus) => UnaryOp::Plus,
            _ => return self.parse_power(),
        };
        self.cursor += 1;
        self.enter()?;
        let inner = self.parse_unary()?;
        self.depth -= 1;
        Ok(Expr::Unary(op, Box::new(inner)))
    }

    fn parse_power(&mut self) -> Result<Expr, ExpressionError> {
        let base = self.parse_primary()?;
        if let Some(Token::Caret) = self.peek() {
            self.cursor += 1;
            self.enter()?;
            // rechtsassoziativ: 2^3^2 == 2^(3^2)
            let exponent = self.parse_unary()?;
            self.depth -= 1;
            return Ok(Expr::Binary(BinaryOp::Pow, Box::new(base), Box::new(exponent)));
        }
        Ok(base)
    }

    fn parse_primary(&mut self) -> Result<Expr, ExpressionError> {
        const EXPECTED: &str = "a number, variable, function call or '('";
        match self.next() {
            Some((Token::Number(n), _)) => Ok(Expr::Number(n)),
            Some((Token::LParen, _)) => {
                let inner = self.parse_expr()?;
                self.expect(Token::RParen, "')'")?;
                Ok(inner)
            }
            Some((Token::Ident(name), pos)) => self.parse_identifier(name, pos),
            Some((t, pos)) => Err(ExpressionError::UnexpectedToken {
                found: t.describe(),
                expected: EXPECTED,
                pos,
            }),
            None => Err(ExpressionError::UnexpectedEnd { expected: EXPECTED }),
        }
    }

    fn parse_identifier(&mut self, raw: String, pos: usize) -> Result<Expr, ExpressionError> {
        let name = raw.strip_prefix("Math.").unwrap_or(&raw);

        if let Some(Token::LParen) = self.peek() {
            let function = Function::lookup(name).ok_or_else(|| {
                ExpressionError::UnknownIdentifier {
                    name: raw.clone(),
                    pos,
                }
            })?;
            self.cursor += 1;
            let args = self.parse_arguments()?;
            function.check_arity(args.len())?;
            return Ok(Expr::Call(function, args));
        }

        let expr = match name {
            "x" => Expr::Var(Variable::X),
            "y" => Expr::Var(Variable::Y),
            "w" => Expr::Var(Variable::W),
            "h" => Expr::Var(Variable::H),
            "PI" | "pi" => Expr::Number(std::f64::consts::PI),
            "TAU" | "tau" => Expr::Number(std::f64::consts::TAU),
            "E" | "e" => Expr::Number(std::f64::consts::E),
            _ => return Err(ExpressionError::UnknownIdentifier { name: raw, pos }),
        };
        Ok(expr)
    }

    fn parse_arguments(&mut self) -> Result<Vec<Expr>, ExpressionError> {
        let mut args = Vec::new();
        if let Some(Token::RParen) = self.peek() {
            self.cursor += 1;
            return Ok(args);
        }
        loop {
            args.push(self.parse_expr()?);
            match self.next() {
                Some((Token::Comma, _)) => continue,
                Some((Token::RParen, _)) => break,
                Some((t, pos)) => {
                    return Err(ExpressionError::UnexpectedToken {
                        found: t.describe(),
                        expected: "',' or ')'",
                        pos,
                    });
                }
                None => return Err(ExpressionError::UnexpectedEnd { expected: "')'" }),
            }
        }
        Ok(args)
    }
}

/// Parses `source` into an AST without validating it numerically.
pub fn parse(source: &str) -> Result<Expr, ExpressionError> {
    let tokens = tokenize(source)?;
    if tokens.is_empty() {
        return Err(ExpressionError::Empty);
    }
    let mut parser = Parser {
        tokens,
        cursor: 0,
        depth: 0,
    };
    let expr = parser.parse_expr()?;
    if let Some((t, pos)) = parser.next() {
        return Err(ExpressionError::UnexpectedToken {
            found: t.describe(),
            expected: "an operator or end of expression",
            pos,
        });
    }
    Ok(expr)
}

/// A parsed and validated user expression, ready to be evaluated per cell.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledExpression {
    source: String,
    ast: Expr,
}

impl CompiledExpression {
    /// Parses once and validates by evaluating at `x = y = w = h = 1`.
    pub fn compile(source: &str) -> Result<Self, ExpressionError> {
        let ast = parse(source)?;
        let sample = ast.eval(1.0, 1.0, 1.0, 1.0);
        if !sample.is_finite() {
            return Err(ExpressionError::NonFinite { value: sample });
        }
        Ok(Self {
            source: source.to_string(),
            ast,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn ast(&self) -> &Expr {
        &self.ast
    }

    /// Evaluates the expression. Non-finite results collapse to 0.
    pub fn evaluate(&self, x: f64, y: f64, w: f64, h: f64) -> f64 {
        let v = self.ast.eval(x, y, w, h);
        if v.is_finite() { v } else { 0.0 }
    }
}
