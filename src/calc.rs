//! Constant folding for CSS `calc()` expressions.
//!
//! Expressions reduce to a linear combination of dimensions (`px`, `%`,
//! unitless, or opaque functions such as `var(--gap)`). When a single unit
//! remains the result is a bare literal, otherwise it is re-wrapped in
//! `calc(...)`.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static NUMBER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?(%|[a-zA-Z]+)?").unwrap()
});
static FUNCTION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9-]*\(").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    #[error("unexpected token `{token}` at offset {offset}")]
    UnexpectedToken { token: String, offset: usize },
    #[error("unexpected end of expression")]
    UnexpectedEnd,
    #[error("incompatible units: {0}")]
    IncompatibleUnits(String),
    #[error("division by zero")]
    DivisionByZero,
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64, String),
    Opaque(String),
    Op(char),
    Open,
    Close,
}

fn tokenize(input: &str) -> Result<Vec<(usize, Token)>, CalcError> {
    let mut tokens = Vec::new();
    let mut pos = 0;
    while pos < input.len() {
        let rest = &input[pos..];
        let Some(ch) = rest.chars().next() else {
            break;
        };
        if ch.is_whitespace() {
            pos += ch.len_utf8();
            continue;
        }
        if let Some(m) = NUMBER_RE.captures(rest) {
            let whole = m.get(0).map_or("", |g| g.as_str());
            let unit = m.get(1).map_or("", |g| g.as_str());
            let digits = &whole[..whole.len() - unit.len()];
            let value = digits.parse::<f64>().map_err(|_| CalcError::UnexpectedToken {
                token: whole.to_string(),
                offset: pos,
            })?;
            tokens.push((pos, Token::Number(value, unit.to_ascii_lowercase())));
            pos += whole.len();
            continue;
        }
        if let Some(m) = FUNCTION_RE.find(rest) {
            let name = &m.as_str()[..m.as_str().len() - 1];
            if name.eq_ignore_ascii_case("calc") {
                tokens.push((pos, Token::Open));
                pos += m.end();
            } else {
                let len = balanced_len(rest, m.end()).ok_or(CalcError::UnexpectedEnd)?;
                tokens.push((pos, Token::Opaque(rest[..len].to_string())));
                pos += len;
            }
            continue;
        }
        let token = match ch {
            '+' | '-' | '*' | '/' => Token::Op(ch),
            '(' => Token::Open,
            ')' => Token::Close,
            _ => {
                return Err(CalcError::UnexpectedToken {
                    token: ch.to_string(),
                    offset: pos,
                });
            }
        };
        tokens.push((pos, token));
        pos += ch.len_utf8();
    }
    Ok(tokens)
}

/// Length of `text` up to and including the `)` closing the group opened
/// just before `start`.
fn balanced_len(text: &str, start: usize) -> Option<usize> {
    let mut depth = 1usize;
    for (idx, ch) in text[start..].char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(start + idx + 1);
                }
            }
            _ => {}
        }
    }
    None
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Dimension {
    Unit(String),
    Opaque(String),
}

impl Dimension {
    fn is_unitless(&self) -> bool {
        matches!(self, Self::Unit(unit) if unit.is_empty())
    }
}

#[derive(Debug, Clone, Default)]
struct Linear {
    terms: Vec<(Dimension, f64)>,
}

impl Linear {
    fn term(dimension: Dimension, value: f64) -> Self {
        Self {
            terms: vec![(dimension, value)],
        }
    }

    fn scalar(&self) -> Option<f64> {
        let mut total = 0.0;
        for (dimension, value) in &self.terms {
            if !dimension.is_unitless() {
                return None;
            }
            total += value;
        }
        Some(total)
    }

    fn scale(mut self, factor: f64) -> Self {
        for (_, value) in &mut self.terms {
            *value *= factor;
        }
        self
    }

    fn add(mut self, other: Linear) -> Result<Self, CalcError> {
        for (dimension, value) in other.terms {
            if let Some(slot) = self.terms.iter_mut().find(|(d, _)| *d == dimension) {
                slot.1 += value;
                continue;
            }
            let mixes_unitless = self.terms.iter().any(|(d, _)| match (d, &dimension) {
                (Dimension::Unit(a), Dimension::Unit(b)) => a.is_empty() != b.is_empty(),
                _ => false,
            });
            if mixes_unitless {
                return Err(CalcError::IncompatibleUnits(
                    "cannot add a unitless number to a dimension".to_string(),
                ));
            }
            self.terms.push((dimension, value));
        }
        Ok(self)
    }

    fn mul(self, other: Linear) -> Result<Self, CalcError> {
        if let Some(factor) = other.scalar() {
            Ok(self.scale(factor))
        } else if let Some(factor) = self.scalar() {
            Ok(other.scale(factor))
        } else {
            Err(CalcError::IncompatibleUnits(
                "cannot multiply two dimensions".to_string(),
            ))
        }
    }

    fn div(self, other: Linear) -> Result<Self, CalcError> {
        let Some(divisor) = other.scalar() else {
            return Err(CalcError::IncompatibleUnits(
                "cannot divide by a dimension".to_string(),
            ));
        };
        if divisor == 0.0 {
            return Err(CalcError::DivisionByZero);
        }
        Ok(self.scale(1.0 / divisor))
    }
}

struct Parser {
    tokens: Vec<(usize, Token)>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(_, token)| token)
    }

    fn advance(&mut self) -> Option<(usize, Token)> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn expr(&mut self) -> Result<Linear, CalcError> {
        let mut acc = self.term()?;
        while let Some(Token::Op(op @ ('+' | '-'))) = self.peek().cloned() {
            self.pos += 1;
            let rhs = self.term()?;
            acc = if op == '+' { acc.add(rhs)? } else { acc.add(rhs.scale(-1.0))? };
        }
        Ok(acc)
    }

    fn term(&mut self) -> Result<Linear, CalcError> {
        let mut acc = self.factor()?;
        while let Some(Token::Op(op @ ('*' | '/'))) = self.peek().cloned() {
            self.pos += 1;
            let rhs = self.factor()?;
            acc = if op == '*' { acc.mul(rhs)? } else { acc.div(rhs)? };
        }
        Ok(acc)
    }

    fn factor(&mut self) -> Result<Linear, CalcError> {
        let (offset, token) = self.advance().ok_or(CalcError::UnexpectedEnd)?;
        match token {
            Token::Number(value, unit) => Ok(Linear::term(Dimension::Unit(unit), value)),
            Token::Opaque(text) => Ok(Linear::term(Dimension::Opaque(text), 1.0)),
            Token::Op('-') => Ok(self.factor()?.scale(-1.0)),
            Token::Op('+') => self.factor(),
            Token::Open => {
                let inner = self.expr()?;
                match self.advance() {
                    Some((_, Token::Close)) => Ok(inner),
                    Some((offset, token)) => Err(unexpected(&token, offset)),
                    None => Err(CalcError::UnexpectedEnd),
                }
            }
            other => Err(unexpected(&other, offset)),
        }
    }
}

fn unexpected(token: &Token, offset: usize) -> CalcError {
    let token = match token {
        Token::Number(value, unit) => format!("{value}{unit}"),
        Token::Opaque(text) => text.clone(),
        Token::Op(op) => op.to_string(),
        Token::Open => "(".to_string(),
        Token::Close => ")".to_string(),
    };
    CalcError::UnexpectedToken { token, offset }
}

fn round_to(value: f64, precision: u32) -> f64 {
    // Beyond f64's significant digits the scale factor only adds overflow.
    let factor = 10f64.powi(precision.min(f64::DIGITS) as i32);
    let rounded = (value * factor).round() / factor;
    if rounded == 0.0 { 0.0 } else { rounded }
}

fn format_term(dimension: &Dimension, value: f64) -> String {
    match dimension {
        Dimension::Unit(unit) => format!("{value}{unit}"),
        Dimension::Opaque(text) if value == 1.0 => text.clone(),
        Dimension::Opaque(text) => format!("{value} * {text}"),
    }
}

/// Reduces a `calc(...)` string (or a bare expression) to its simplest form,
/// rounding numbers to `precision` decimal places.
pub fn reduce(input: &str, precision: u32) -> Result<String, CalcError> {
    let tokens = tokenize(input)?;
    let mut parser = Parser { tokens, pos: 0 };
    let linear = parser.expr()?;
    if let Some((offset, token)) = parser.advance() {
        return Err(unexpected(&token, offset));
    }

    let terms: Vec<(Dimension, f64)> = linear
        .terms
        .into_iter()
        .map(|(dimension, value)| (dimension, round_to(value, precision)))
        .collect();
    let mut visible: Vec<&(Dimension, f64)> = terms.iter().filter(|(_, v)| *v != 0.0).collect();
    if visible.is_empty() {
        return Ok(match terms.first() {
            Some((Dimension::Unit(unit), _)) => format!("0{unit}"),
            _ => "0".to_string(),
        });
    }
    if let [(dimension @ Dimension::Unit(_), value)] = visible.as_slice() {
        return Ok(format_term(dimension, *value));
    }

    let (first_dimension, first_value) = visible.remove(0);
    let mut out = String::from("calc(");
    match first_dimension {
        // A bare `-var(..)` is not a valid calc operand.
        Dimension::Opaque(text) if *first_value < 0.0 => {
            out.push_str(&format!("{first_value} * {text}"));
        }
        _ => out.push_str(&format_term(first_dimension, *first_value)),
    }
    for (dimension, value) in visible {
        let sign = if *value < 0.0 { '-' } else { '+' };
        out.push_str(&format!(" {sign} {}", format_term(dimension, value.abs())));
    }
    out.push(')');
    Ok(out)
}
