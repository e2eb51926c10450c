//! Human-readable and JSON rendering of tracker results.

use chrono::NaiveDate;
use lcr_core::{
    CascadeOutcome, CascadeStats, CheckinSummary, DueReview, History, PlanSummary, Problem, Review, Session,
    TimerSummary,
};
use serde::Serialize;

/// Print `value` as pretty JSON, or the text produced by `text`.
pub fn emit<T: Serialize>(value: &T, json: bool, text: impl FnOnce() -> String) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", text());
    }
    Ok(())
}

/// Date formatting per `display.date_format`.
#[derive(Debug, Clone)]
pub struct Formatter {
    date_format: String,
}

impl Formatter {
    pub fn new(date_format: impl Into<String>) -> Self {
        Self {
            date_format: date_format.into(),
        }
    }

    pub fn date(&self, date: NaiveDate) -> String {
        date.format(&self.date_format).to_string()
    }

    fn label(problem: &Problem) -> String {
        let mut label = problem.problem_id.clone();
        if let Some(difficulty) = problem.difficulty {
            label = format!("({}) {}", difficulty, label);
        }
        if let Some(title) = &problem.title {
            label = format!("{}. {}", label, title);
        }
        label
    }

    pub fn plan(&self, summary: &PlanSummary) -> String {
        let mut lines = vec![format!("Planned reviews for {}", Self::label(&summary.problem))];
        for review in &summary.created {
            lines.push(format!("  #{:<3} {}", review.iteration, self.date(review.scheduled_date)));
        }
        if summary.created.is_empty() {
            lines.push("  no new reviews".to_string());
        }
        if !summary.skipped.is_empty() {
            lines.push(format!(
                "Skipped {} date(s) already scheduled",
                summary.skipped.len()
            ));
        }
        lines.join("\n")
    }

    pub fn checkin(&self, summary: &CheckinSummary) -> String {
        if summary.orphan {
            return format!(
                "Logged completion of {} (no pending review)",
                Self::label(&summary.problem)
            );
        }

        let mut lines = vec![format!(
            "Completed review #{} of {}",
            summary.review.iteration,
            Self::label(&summary.problem)
        )];
        if summary.delay_days > 0 {
            lines.push(format!("  {} day(s) late", summary.delay_days));
            if summary.shifted > 0 {
                lines.push(format!("  moved {} future review(s)", summary.shifted));
            }
        } else {
            lines.push("  on time".to_string());
        }
        match &summary.next_review {
            Some(next) => lines.push(format!(
                "  next review #{} on {}",
                next.iteration,
                self.date(next.scheduled_date)
            )),
            None => lines.push("  chain complete".to_string()),
        }
        lines.join("\n")
    }

    pub fn preview(&self, problem_id: &str, outcome: &CascadeOutcome) -> String {
        if outcome.is_noop() {
            return format!("Checking in {} now shifts nothing", problem_id);
        }
        let mut lines = vec![format!(
            "Checking in {} now shifts {} review(s) by {} day(s)",
            problem_id,
            outcome.changes.len(),
            outcome.shift_days
        )];
        for change in &outcome.changes {
            lines.push(format!(
                "  #{:<3} {} -> {}",
                change.iteration,
                self.date(change.old_date),
                self.date(change.new_date)
            ));
        }
        lines.join("\n")
    }

    pub fn due(&self, as_of: NaiveDate, due: &[DueReview]) -> String {
        if due.is_empty() {
            return format!("No reviews due as of {}", self.date(as_of));
        }
        let mut lines = vec![format!("{:<12} {:<5} {:<8} {}", "date", "#", "overdue", "problem")];
        for entry in due {
            lines.push(format!(
                "{:<12} {:<5} {:<8} {}",
                self.date(entry.review.scheduled_date),
                entry.review.iteration,
                entry.overdue_days,
                Self::label(&entry.problem)
            ));
        }
        lines.join("\n")
    }

    pub fn history(&self, history: &History) -> String {
        let mut lines = vec!["Completed:".to_string()];
        lines.extend(history.completed.iter().map(|r| self.completed_line(r)));
        if history.completed.is_empty() {
            lines.push("  none".to_string());
        }
        lines.push("Upcoming:".to_string());
        lines.extend(
            history
                .upcoming
                .iter()
                .map(|r| format!("  {}  {} #{}", self.date(r.scheduled_date), r.problem_id, r.iteration)),
        );
        if history.upcoming.is_empty() {
            lines.push("  none".to_string());
        }
        if !history.sessions.is_empty() {
            lines.push("Timer sessions:".to_string());
            for timed in &history.sessions {
                let state = if timed.session.is_active() { " (running)" } else { "" };
                lines.push(format!(
                    "  {}  {}{}",
                    self.date(timed.session.started_at.date_naive()),
                    timed.elapsed,
                    state
                ));
            }
        }
        lines.join("\n")
    }

    fn completed_line(&self, review: &Review) -> String {
        let actual = review.actual_date().unwrap_or(review.scheduled_date);
        let suffix = match (review.orphan, review.delay_days()) {
            (true, _) => " (unscheduled)".to_string(),
            (false, 0) => String::new(),
            (false, days) => format!(" ({} day(s) late)", days),
        };
        format!("  {}  {} #{}{}", self.date(actual), review.problem_id, review.iteration, suffix)
    }

    pub fn timer_started(&self, session: &Session) -> String {
        format!(
            "Timer started for {} at {}",
            session.problem_id,
            session.started_at.format("%Y-%m-%d %H:%M:%S UTC")
        )
    }

    pub fn timer_ended(&self, summary: &TimerSummary) -> String {
        format!(
            "Timer stopped for {} after {}\n{}",
            summary.session.problem_id,
            summary.session.format_duration(),
            self.checkin(&summary.checkin)
        )
    }

    pub fn stats(&self, problem_id: &str, stats: &CascadeStats) -> String {
        [
            format!("Review chain of {}", problem_id),
            format!(
                "  reviews:   {} ({} completed, {} pending)",
                stats.total_reviews, stats.completed_reviews, stats.pending_reviews
            ),
            format!(
                "  delay:     {} day(s) total, {:.1} average, {} max",
                stats.total_delay_days, stats.average_delay_days, stats.max_delay_days
            ),
            format!("  late:      {} review(s)", stats.reviews_with_delay),
        ]
        .join("\n")
    }
}
