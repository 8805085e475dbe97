//! Rule expressions
//!
//! Textual conditions over neighbor counts, e.g. `count['#'] >= 2` or
//! `count['~'] == 1 && count['.'] < 4`. An expression is compiled once into a
//! small tagged tree and evaluated many times against per-cell count tables.
//!
//! The grammar is deliberately flat: one comparison, or exactly two joined by
//! `&&` or `||`. `&&` is searched for first, so an expression containing both
//! operators splits at the first `&&` — there is no operator precedence
//! beyond that.

use thiserror::Error;

use crate::neighborhood::NeighborCounts;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleParseError {
    #[error("no count['…'] reference in \"{0}\"")]
    MissingCountReference(String),
    #[error("unterminated symbol reference in \"{0}\"")]
    UnterminatedSymbol(String),
    #[error("no comparison operator in \"{0}\"")]
    MissingOperator(String),
    #[error("unknown comparison operator \"{0}\"")]
    UnknownOperator(String),
    #[error("right-hand side is not a number in \"{0}\"")]
    InvalidValue(String),
}

/// Comparison operators accepted on the right-hand side of a count lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ge,
    Le,
    Gt,
    Lt,
    Ne,
}

impl CompareOp {
    fn from_text(text: &str) -> Option<Self> {
        match text {
            "==" => Some(Self::Eq),
            ">=" => Some(Self::Ge),
            "<=" => Some(Self::Le),
            ">" => Some(Self::Gt),
            "<" => Some(Self::Lt),
            "!=" => Some(Self::Ne),
            _ => None,
        }
    }

    fn apply(self, count: usize, value: usize) -> bool {
        match self {
            Self::Eq => count == value,
            Self::Ge => count >= value,
            Self::Le => count <= value,
            Self::Gt => count > value,
            Self::Lt => count < value,
            Self::Ne => count != value,
        }
    }
}

/// One `count['<symbol>'] <op> <value>` comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    pub symbol: char,
    pub op: CompareOp,
    pub value: usize,
}

impl Comparison {
    /// Evaluate against a count table; symbols absent from the table count
    /// as zero.
    pub fn evaluate(&self, counts: &NeighborCounts) -> bool {
        let count = counts.get(&self.symbol).copied().unwrap_or(0);
        self.op.apply(count, self.value)
    }
}

/// A compiled rule expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleExpr {
    /// Empty rule text or the literal `true`.
    Always,
    /// The literal `false`; also what loaders substitute for rules that
    /// failed to parse.
    Never,
    Single(Comparison),
    And(Comparison, Comparison),
    Or(Comparison, Comparison),
}

impl RuleExpr {
    /// Compile rule text. Malformed text is a typed error here; callers that
    /// want the lenient behavior substitute [`RuleExpr::Never`].
    pub fn parse(text: &str) -> Result<Self, RuleParseError> {
        let trimmed = text.trim();
        if trimmed.is_empty() || trimmed == "true" {
            return Ok(Self::Always);
        }
        if trimmed == "false" {
            return Ok(Self::Never);
        }
        // && is searched for first: it wins as the split token when both
        // operators appear.
        if let Some(pos) = trimmed.find("&&") {
            let left = parse_comparison(&trimmed[..pos])?;
            let right = parse_comparison(&trimmed[pos + 2..])?;
            return Ok(Self::And(left, right));
        }
        if let Some(pos) = trimmed.find("||") {
            let left = parse_comparison(&trimmed[..pos])?;
            let right = parse_comparison(&trimmed[pos + 2..])?;
            return Ok(Self::Or(left, right));
        }
        Ok(Self::Single(parse_comparison(trimmed)?))
    }

    pub fn evaluate(&self, counts: &NeighborCounts) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Single(cmp) => cmp.evaluate(counts),
            Self::And(left, right) => left.evaluate(counts) && right.evaluate(counts),
            Self::Or(left, right) => left.evaluate(counts) || right.evaluate(counts),
        }
    }
}

/// Parse a single `count['<symbol>'] <op> <value>` comparison.
fn parse_comparison(text: &str) -> Result<Comparison, RuleParseError> {
    let trimmed = text.trim();
    let err_text = || trimmed.to_string();

    let start = trimmed
        .find("count['")
        .ok_or_else(|| RuleParseError::MissingCountReference(err_text()))?;
    let after_open = &trimmed[start + "count['".len()..];
    let symbol = after_open
        .chars()
        .next()
        .ok_or_else(|| RuleParseError::UnterminatedSymbol(err_text()))?;
    let close = after_open
        .find("']")
        .ok_or_else(|| RuleParseError::UnterminatedSymbol(err_text()))?;

    // whitespace inside the right-hand side is irrelevant
    let rest: String = after_open[close + 2..]
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    let digit_pos = rest
        .find(|c: char| c.is_ascii_digit())
        .ok_or_else(|| RuleParseError::MissingOperator(err_text()))?;
    let (op_text, value_text) = rest.split_at(digit_pos);
    if op_text.is_empty() {
        return Err(RuleParseError::MissingOperator(err_text()));
    }
    let op = CompareOp::from_text(op_text)
        .ok_or_else(|| RuleParseError::UnknownOperator(op_text.to_string()))?;
    let value = value_text
        .parse::<usize>()
        .map_err(|_| RuleParseError::InvalidValue(value_text.to_string()))?;

    Ok(Comparison { symbol, op, value })
}
