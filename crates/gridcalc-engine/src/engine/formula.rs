//! Formula tokenizing, validation and canonical form.
//!
//! A formula is an infix arithmetic expression over numbers and variables:
//!
//! - `(` and `)`
//! - the operators `+ - * /`
//! - variables: a letter or underscore followed by letters, digits or underscores
//! - decimal literals with optional exponent (`3`, `2.5`, `.5`, `5.`, `1e-3`)
//!
//! Whitespace between tokens is ignored. Parsing normalizes every variable
//! and re-renders every literal through [`canonical_number`], so two formulas
//! compare equal exactly when their canonical token sequences match.

use regex::Regex;
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::OnceLock;

use super::error::FormulaFormatError;
use super::format::canonical_number;

/// One of the four arithmetic operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
}

impl Operator {
    fn from_char(c: char) -> Option<Operator> {
        match c {
            '+' => Some(Operator::Add),
            '-' => Some(Operator::Sub),
            '*' => Some(Operator::Mul),
            '/' => Some(Operator::Div),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Sub => '-',
            Operator::Mul => '*',
            Operator::Div => '/',
        }
    }

    /// `+` and `-`.
    pub fn is_additive(self) -> bool {
        matches!(self, Operator::Add | Operator::Sub)
    }

    /// `*` and `/`.
    pub fn is_multiplicative(self) -> bool {
        matches!(self, Operator::Mul | Operator::Div)
    }
}

/// A canonical formula token.
#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    LParen,
    RParen,
    Op(Operator),
    /// Always finite.
    Number(f64),
    /// Already normalized and validated.
    Variable(String),
}

impl Token {
    /// Numbers, variables and `)` can end an operand.
    fn closes_operand(&self) -> bool {
        matches!(self, Token::Number(_) | Token::Variable(_) | Token::RParen)
    }

    /// Numbers, variables and `(` can start an operand.
    fn opens_operand(&self) -> bool {
        matches!(self, Token::Number(_) | Token::Variable(_) | Token::LParen)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::LParen => f.write_str("("),
            Token::RParen => f.write_str(")"),
            Token::Op(op) => write!(f, "{}", op.symbol()),
            Token::Number(n) => f.write_str(&canonical_number(*n)),
            Token::Variable(name) => f.write_str(name),
        }
    }
}

/// A validated, immutable arithmetic formula.
#[derive(Clone, Debug)]
pub struct Formula {
    pub(crate) tokens: Vec<Token>,
    variables: Vec<String>,
    canonical: String,
}

impl Formula {
    /// Parse with the identity normalizer and an accept-all validity check.
    pub fn parse(raw: &str) -> Result<Formula, FormulaFormatError> {
        Self::parse_with(raw, |name| name.to_string(), |_| true)
    }

    /// Parse `raw`, passing every variable through `normalize` and then `is_valid`.
    pub fn parse_with<N, V>(raw: &str, normalize: N, is_valid: V) -> Result<Formula, FormulaFormatError>
    where
        N: Fn(&str) -> String,
        V: Fn(&str) -> bool,
    {
        let raw_tokens = tokenize(raw)?;

        let (Some(first), Some(last)) = (raw_tokens.first(), raw_tokens.last()) else {
            return Err(FormulaFormatError::Empty);
        };
        if !first.opens_operand() {
            return Err(FormulaFormatError::InvalidStart(first.to_string()));
        }
        if !last.closes_operand() {
            return Err(FormulaFormatError::InvalidEnd(last.to_string()));
        }

        let mut open = 0usize;
        let mut close = 0usize;
        let mut tokens = Vec::with_capacity(raw_tokens.len());
        let mut variables = Vec::new();
        let mut seen = HashSet::new();

        for (position, token) in raw_tokens.iter().enumerate() {
            match token {
                Token::LParen => open += 1,
                Token::RParen => {
                    close += 1;
                    if close > open {
                        return Err(FormulaFormatError::UnmatchedClose { position });
                    }
                }
                _ => {}
            }

            if let Some(next) = raw_tokens.get(position + 1) {
                if token.closes_operand() {
                    if !matches!(next, Token::Op(_) | Token::RParen) {
                        return Err(FormulaFormatError::ExpectedOperator {
                            token: token.to_string(),
                            next: next.to_string(),
                        });
                    }
                } else if !next.opens_operand() {
                    return Err(FormulaFormatError::ExpectedOperand {
                        token: token.to_string(),
                        next: next.to_string(),
                    });
                }
            }

            match token {
                Token::Variable(name) => {
                    let normalized = normalize(name);
                    if !is_variable_name(&normalized) || !is_valid(&normalized) {
                        return Err(FormulaFormatError::InvalidVariable(name.clone()));
                    }
                    if seen.insert(normalized.clone()) {
                        variables.push(normalized.clone());
                    }
                    tokens.push(Token::Variable(normalized));
                }
                other => tokens.push(other.clone()),
            }
        }

        if open != close {
            return Err(FormulaFormatError::UnbalancedParens { open, close });
        }

        let canonical = tokens.iter().map(Token::to_string).collect();
        Ok(Formula {
            tokens,
            variables,
            canonical,
        })
    }

    /// Distinct normalized variables, in order of first occurrence.
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// The canonical text: tokens concatenated without separators.
    pub fn as_str(&self) -> &str {
        &self.canonical
    }
}

impl PartialEq for Formula {
    fn eq(&self, other: &Self) -> bool {
        self.tokens == other.tokens
    }
}

// Number tokens are always finite, so token equality is reflexive.
impl Eq for Formula {}

impl Hash for Formula {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical.hash(state);
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

impl FromStr for Formula {
    type Err = FormulaFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Formula::parse(s)
    }
}

/// Whether `name` matches the variable grammar (`[A-Za-z_][A-Za-z0-9_]*`).
pub fn is_variable_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn token_re() -> &'static Regex {
    static TOKEN_RE: OnceLock<Regex> = OnceLock::new();
    TOKEN_RE.get_or_init(|| {
        Regex::new(
            r"^(?:(?P<paren>[()])|(?P<op>[-+*/])|(?P<var>[A-Za-z_][A-Za-z0-9_]*)|(?P<num>(?:[0-9]+\.[0-9]*|\.[0-9]+|[0-9]+)(?:[eE][+-]?[0-9]+)?))",
        )
        .expect("formula token regex must compile")
    })
}

/// Split `raw` into unvalidated tokens. Variables are not yet normalized.
fn tokenize(raw: &str) -> Result<Vec<Token>, FormulaFormatError> {
    let re = token_re();
    let mut tokens = Vec::new();
    let mut rest = raw.trim_start();

    while !rest.is_empty() {
        let Some(caps) = re.captures(rest) else {
            let bad: String = rest.chars().take_while(|c| !c.is_whitespace()).collect();
            return Err(FormulaFormatError::InvalidToken(bad));
        };
        // Group 0 always exists for a successful match.
        let matched = caps.get(0).map_or("", |m| m.as_str());

        let token = if let Some(paren) = caps.name("paren") {
            if paren.as_str() == "(" {
                Token::LParen
            } else {
                Token::RParen
            }
        } else if let Some(op) = caps.name("op") {
            match op.as_str().chars().next().and_then(Operator::from_char) {
                Some(op) => Token::Op(op),
                None => return Err(FormulaFormatError::InvalidToken(op.as_str().to_string())),
            }
        } else if let Some(var) = caps.name("var") {
            Token::Variable(var.as_str().to_string())
        } else {
            let text = matched;
            match text.parse::<f64>() {
                Ok(n) if n.is_finite() => Token::Number(n),
                _ => return Err(FormulaFormatError::NumberOutOfRange(text.to_string())),
            }
        };

        tokens.push(token);
        rest = rest[matched.len()..].trim_start();
    }

    Ok(tokens)
}
