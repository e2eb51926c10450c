//! Problem records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{Display, EnumString};

/// Difficulty tag of a problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
pub enum Difficulty {
    #[strum(serialize = "E")]
    #[serde(rename = "E")]
    Easy,
    #[strum(serialize = "M")]
    #[serde(rename = "M")]
    Medium,
    #[strum(serialize = "H")]
    #[serde(rename = "H")]
    Hard,
}

impl Difficulty {
    /// Parse a difficulty from a short (`E`) or long (`Easy`) label.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "e" | "easy" => Some(Difficulty::Easy),
            "m" | "medium" => Some(Difficulty::Medium),
            "h" | "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

/// A practice problem being tracked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    /// Unique identifier (e.g. "42").
    pub problem_id: String,
    /// Display title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Optional difficulty tag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Problem {
    /// Create a new problem record.
    pub fn new(problem_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            problem_id: problem_id.into(),
            title: None,
            difficulty: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Builder method to set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Builder method to set the difficulty.
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    /// Merge richer registration input into this record.
    ///
    /// Present values overwrite, absent values never clear what is stored.
    /// Returns true if anything changed.
    pub fn merge(&mut self, title: Option<&str>, difficulty: Option<Difficulty>, now: DateTime<Utc>) -> bool {
        let mut changed = false;
        if let Some(title) = title {
            if self.title.as_deref() != Some(title) {
                self.title = Some(title.to_string());
                changed = true;
            }
        }
        if let Some(difficulty) = difficulty {
            if self.difficulty != Some(difficulty) {
                self.difficulty = Some(difficulty);
                changed = true;
            }
        }
        if changed {
            self.updated_at = now;
        }
        changed
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.title {
            Some(title) => write!(f, "Problem {}: {}", self.problem_id, title),
            None => write!(f, "Problem {}", self.problem_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_difficulty_labels() {
        assert_eq!(Difficulty::from_label("E"), Some(Difficulty::Easy));
        assert_eq!(Difficulty::from_label("Medium"), Some(Difficulty::Medium));
        assert_eq!(Difficulty::from_label("hard"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_label("extreme"), None);
        assert_eq!(Difficulty::Hard.to_string(), "H");
        assert_eq!(Difficulty::from_str("M").unwrap(), Difficulty::Medium);
    }

    #[test]
    fn test_merge_never_clears() {
        let now = Utc::now();
        let mut problem = Problem::new("1", now).with_title("Two Sum");

        assert!(!problem.merge(None, None, now));
        assert_eq!(problem.title.as_deref(), Some("Two Sum"));

        assert!(problem.merge(Some("Two Sum II"), Some(Difficulty::Easy), now));
        assert_eq!(problem.title.as_deref(), Some("Two Sum II"));
        assert_eq!(problem.difficulty, Some(Difficulty::Easy));
    }

    #[test]
    fn test_display() {
        let now = Utc::now();
        assert_eq!(Problem::new("42", now).to_string(), "Problem 42");
        assert_eq!(
            Problem::new("42", now).with_title("Trapping Rain Water").to_string(),
            "Problem 42: Trapping Rain Water"
        );
    }
}
