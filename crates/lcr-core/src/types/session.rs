//! Timer sessions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A timed problem-solving session.
///
/// At most one session per problem may be active (no `ended_at`) at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub problem_id: String,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
    /// Duration in seconds, derived on end.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<i64>,
}

impl Session {
    /// Start a new session.
    pub fn start(problem_id: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            problem_id: problem_id.into(),
            started_at: at,
            ended_at: None,
            duration_secs: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.ended_at.is_none()
    }

    /// End the session and compute its duration. Ending twice is a no-op.
    pub fn end(&mut self, at: DateTime<Utc>) {
        if !self.is_active() {
            return;
        }
        self.ended_at = Some(at);
        self.duration_secs = Some((at - self.started_at).num_seconds().max(0));
    }

    /// Elapsed seconds: stored duration, or time since start while active.
    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> i64 {
        match self.duration_secs {
            Some(secs) => secs,
            None => (now - self.started_at).num_seconds().max(0),
        }
    }

    /// Human-readable form of [`Session::elapsed_secs`].
    pub fn format_elapsed(&self, now: DateTime<Utc>) -> String {
        format_secs(self.elapsed_secs(now))
    }

    /// Human-readable duration such as "1h 23m" or "45m 30s".
    pub fn format_duration(&self) -> String {
        format_secs(self.duration_secs.unwrap_or(0))
    }
}

fn format_secs(total: i64) -> String {
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    let mut parts = Vec::new();
    if hours > 0 {
        parts.push(format!("{}h", hours));
    }
    if minutes > 0 {
        parts.push(format!("{}m", minutes));
    }
    if seconds > 0 || parts.is_empty() {
        parts.push(format!("{}s", seconds));
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_end_computes_duration() {
        let start = Utc::now();
        let mut session = Session::start("1", start);
        assert!(session.is_active());

        session.end(start + Duration::seconds(5000));
        assert!(!session.is_active());
        assert_eq!(session.duration_secs, Some(5000));
        assert_eq!(session.format_duration(), "1h 23m 20s");

        // second end keeps the first result
        session.end(start + Duration::seconds(9000));
        assert_eq!(session.duration_secs, Some(5000));
    }

    #[test]
    fn test_elapsed_while_running() {
        let start = Utc::now();
        let mut session = Session::start("1", start);
        assert_eq!(session.elapsed_secs(start + Duration::seconds(90)), 90);
        assert_eq!(session.format_elapsed(start + Duration::seconds(90)), "1m 30s");
        // clock behind the start never goes negative
        assert_eq!(session.elapsed_secs(start - Duration::seconds(10)), 0);

        session.end(start + Duration::seconds(60));
        assert_eq!(session.elapsed_secs(start + Duration::seconds(600)), 60);
    }

    #[test]
    fn test_format_secs() {
        assert_eq!(format_secs(0), "0s");
        assert_eq!(format_secs(2730), "45m 30s");
        assert_eq!(format_secs(3600), "1h");
    }
}
