//! Splits a filter clause into fields, operator and values.
//!
//! The operator set is configurable, so the splitting pattern is assembled from
//! the operator table once and cached by the codec:
//!
//! ```text
//! tokens  : ==  @=  @=*  !@=*
//! sorted  : !@=*  @=*  ==  @=          (longest first, ties keep table order)
//! pattern : (!@=\*)+|(@=\*)+|(==)+|(@=)+
//! ```
//!
//! The regex engine tries alternatives left to right at the leftmost position,
//! so `title@=*rust` splits on `@=*` rather than on its prefix `@=`.

use regex::Regex;
use std::cmp::Reverse;

use crate::error::{CodecError, Result};
use crate::operators::OperatorTable;

const METACHARACTERS: [char; 14] = [
    '.', '*', '+', '?', '^', '$', '{', '}', '(', ')', '|', '[', ']', '\\',
];

/// Prefix every regex metacharacter in `token` with a backslash.
pub fn escape_token(token: &str) -> String {
    let mut escaped = String::with_capacity(token.len() * 2);
    for ch in token.chars() {
        if METACHARACTERS.contains(&ch) {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// The three parts of a clause, borrowed from the clause itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClauseParts<'a> {
    pub fields: &'a str,
    pub operator: &'a str,
    pub values: &'a str,
}

/// Compiled alternation over every operator token of a table.
#[derive(Debug, Clone)]
pub struct OperatorMatcher {
    /// `None` for an empty table; such a matcher never matches.
    regex: Option<Regex>,
    tokens: Vec<String>,
}

impl OperatorMatcher {
    pub fn build(table: &OperatorTable) -> Result<Self> {
        if let Some((name, _)) = table.iter().find(|(_, token)| token.is_empty()) {
            return Err(CodecError::invalid_operator_table(format!(
                "operator '{name}' has an empty token"
            )));
        }

        let mut tokens: Vec<String> = table.iter().map(|(_, token)| token.to_string()).collect();
        tokens.sort_by_key(|token| Reverse(token.chars().count()));

        if tokens.is_empty() {
            tracing::debug!("Operator table is empty; every clause will fail to parse");
            return Ok(Self::never_matching());
        }

        let pattern = tokens
            .iter()
            .map(|token| format!("({})+", escape_token(token)))
            .collect::<Vec<_>>()
            .join("|");
        let regex = Regex::new(&pattern)?;
        tracing::debug!(operators = tokens.len(), %pattern, "Built operator matcher");

        Ok(Self {
            regex: Some(regex),
            tokens,
        })
    }

    /// Matcher that rejects every clause.
    pub(crate) fn never_matching() -> Self {
        Self {
            regex: None,
            tokens: Vec::new(),
        }
    }

    pub fn pattern(&self) -> Option<&str> {
        self.regex.as_ref().map(Regex::as_str)
    }

    /// Tokens in the order they are tried.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Split `clause` around its single operator.
    ///
    /// Fails unless exactly one operator run occurs in the clause.
    pub fn split<'c>(&self, clause: &'c str) -> Result<ClauseParts<'c>> {
        let Some(regex) = &self.regex else {
            return Err(CodecError::clause_parse(clause, 0));
        };

        let mut found = regex.captures_iter(clause);
        let Some(captures) = found.next() else {
            return Err(CodecError::clause_parse(clause, 0));
        };
        let extra = found.count();
        if extra > 0 {
            return Err(CodecError::clause_parse(clause, extra + 1));
        }
        let Some(whole) = captures.get(0) else {
            return Err(CodecError::clause_parse(clause, 0));
        };

        // A repeated run such as `====` reports the single token it repeats.
        let operator = captures
            .iter()
            .skip(1)
            .flatten()
            .next()
            .map_or(whole.as_str(), |m| m.as_str());

        Ok(ClauseParts {
            fields: &clause[..whole.start()],
            operator,
            values: &clause[whole.end()..],
        })
    }
}
