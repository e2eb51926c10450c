//! Parsing of user-supplied problem references and dates.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{ErrorCode, LcrError, LcrResult};
use crate::types::Difficulty;

/// `(E) 1. Two Sum`, `215. Kth Largest`, `7.`
static DOTTED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:\((e|m|h|easy|medium|hard)\)\s*)?(\d+)\.\s*(.*)$").unwrap()
});

/// Bare identifier: `42`
static NUMBER_ONLY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)$").unwrap());

/// A problem reference as typed on the command line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemInput {
    pub problem_id: String,
    pub title: Option<String>,
    pub difficulty: Option<Difficulty>,
}

impl ProblemInput {
    /// Input that carries only an identifier.
    pub fn id(problem_id: impl Into<String>) -> Self {
        Self {
            problem_id: problem_id.into(),
            title: None,
            difficulty: None,
        }
    }

    /// Parse `"42"`, `"215. Kth Largest"` or `"(E) 1. Two Sum"`.
    pub fn parse(input: &str) -> LcrResult<Self> {
        let input = input.trim();

        if let Some(caps) = DOTTED.captures(input) {
            let difficulty = caps.get(1).and_then(|m| Difficulty::from_label(m.as_str()));
            let title = caps
                .get(3)
                .map(|m| m.as_str().trim())
                .filter(|t| !t.is_empty())
                .map(str::to_string);
            return Ok(Self {
                problem_id: caps[2].to_string(),
                title,
                difficulty,
            });
        }

        if NUMBER_ONLY.is_match(input) {
            return Ok(Self::id(input));
        }

        Err(LcrError::validation_with_suggestion(
            ErrorCode::ValInvalidProblemInput,
            format!("Invalid problem input '{}'", input),
            "Use '42', '42. Title' or '(E) 42. Title'",
        ))
    }
}

impl std::str::FromStr for ProblemInput {
    type Err = LcrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(input: &str) -> LcrResult<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|e| {
        LcrError::validation_with_suggestion(
            ErrorCode::ValInvalidDate,
            format!("Invalid date '{}': {}", input, e),
            "Dates use the YYYY-MM-DD format",
        )
    })
}
