//! Automaton rule sets
//!
//! Maps tile symbols to their survival/birth/death expressions. A rule set
//! is immutable once built; a config reload constructs a whole new set and
//! the owner swaps it in, so no tick ever observes a half-updated table.
//!
//! The loader consumes the line-oriented rule format: a line holding a single
//! tile symbol opens a block, and `survival=` / `birth=` / `death=` lines
//! fill it. `//` starts a comment. Rules that fail to compile are logged and
//! replaced with an always-false expression.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::{info, warn};

use crate::config::ConfigError;
use crate::rule_expr::RuleExpr;

/// The three optional transition rules for one tile symbol.
///
/// A missing survival rule means the tile never dies of isolation, a missing
/// birth rule means it is never spontaneously born, and a missing death rule
/// means it never dies outright.
#[derive(Debug, Clone, Default)]
pub struct RuleEntry {
    pub survival: Option<RuleExpr>,
    pub birth: Option<RuleExpr>,
    pub death: Option<RuleExpr>,
}

impl RuleEntry {
    fn is_empty(&self) -> bool {
        self.survival.is_none() && self.birth.is_none() && self.death.is_none()
    }
}

/// Immutable symbol → rules table, iterated in symbol order.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    entries: BTreeMap<char, RuleEntry>,
}

impl RuleSet {
    pub fn from_entries(entries: impl IntoIterator<Item = (char, RuleEntry)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Parse rule-config text. Never fails: anomalies are logged and the
    /// affected rule degrades.
    pub fn parse(text: &str) -> Self {
        let mut entries = BTreeMap::new();
        let mut current: Option<(char, RuleEntry)> = None;

        for (line_number, raw_line) in text.lines().enumerate() {
            let line = match raw_line.find("//") {
                Some(pos) => &raw_line[..pos],
                None => raw_line,
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if line.chars().count() == 1 {
                // a bare symbol opens the next block
                if let Some((symbol, entry)) = current.take() {
                    entries.insert(symbol, entry);
                }
                current = Some((line.chars().next().unwrap(), RuleEntry::default()));
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let (key, value) = (key.trim(), value.trim());

            let Some((symbol, entry)) = current.as_mut() else {
                warn!(line = line_number + 1, key, "rule line before any tile symbol");
                continue;
            };
            match key {
                "survival" => entry.survival = Some(compile_rule(*symbol, key, value)),
                "birth" => entry.birth = Some(compile_rule(*symbol, key, value)),
                "death" => entry.death = Some(compile_rule(*symbol, key, value)),
                _ => warn!(line = line_number + 1, key, "unknown rule key"),
            }
        }
        if let Some((symbol, entry)) = current {
            entries.insert(symbol, entry);
        }

        Self { entries }
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let rules = Self::parse(&text);
        rules.log_summary();
        Ok(rules)
    }

    /// Per-symbol summary of which rules are present, logged after a load.
    pub fn log_summary(&self) {
        info!(symbols = self.entries.len(), "loaded automaton rule set");
        for (symbol, entry) in &self.entries {
            info!(
                symbol = %symbol,
                survival = entry.survival.is_some(),
                birth = entry.birth.is_some(),
                death = entry.death.is_some(),
                "automaton rules"
            );
        }
    }

    pub fn rule(&self, symbol: char) -> Option<&RuleEntry> {
        self.entries.get(&symbol)
    }

    /// Iterate entries in symbol order.
    pub fn entries(&self) -> impl Iterator<Item = (char, &RuleEntry)> {
        self.entries.iter().map(|(symbol, entry)| (*symbol, entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether any entry carries at least one rule.
    pub fn has_rules(&self) -> bool {
        self.entries.values().any(|entry| !entry.is_empty())
    }
}

/// Compile one rule expression, degrading to always-false on parse errors.
fn compile_rule(symbol: char, kind: &str, text: &str) -> RuleExpr {
    match RuleExpr::parse(text) {
        Ok(expr) => expr,
        Err(err) => {
            warn!(symbol = %symbol, kind, rule = text, %err, "rule failed to compile, treating as never");
            RuleExpr::Never
        }
    }
}
