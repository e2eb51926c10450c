//! The `Tracker` facade.
//!
//! Binds the scheduling engine to a [`Store`], a [`Clock`] and an RNG. Each
//! mutating operation builds one [`ChangeSet`] and commits it atomically.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::clock::{Clock, SystemClock};
use crate::config::LcrConfig;
use crate::error::{ErrorCode, LcrError, LcrResult};
use crate::input::ProblemInput;
use crate::scheduling::{
    active_chain_for, CascadeOutcome, CascadeStats, ChainModel, Checkin, CheckinProcessor, DelayCascade,
    PlanRequest, ReviewPlanner,
};
use crate::store::{ChangeSet, Store};
use crate::types::{ChainId, Problem, Review, Session};

/// Result of planning reviews for a problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSummary {
    pub problem: Problem,
    pub chain_id: ChainId,
    /// New reviews ordered by iteration.
    pub created: Vec<Review>,
    /// Dates skipped because a review was already pending on them.
    pub skipped: Vec<NaiveDate>,
}

/// Result of a check-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckinSummary {
    pub problem: Problem,
    /// The completed review.
    pub review: Review,
    pub delay_days: i64,
    /// Number of later reviews pushed back.
    pub shifted: usize,
    pub orphan: bool,
    /// Next pending review in the chain after this check-in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_review: Option<Review>,
}

/// A review due on or before the query date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DueReview {
    pub review: Review,
    pub problem: Problem,
    pub overdue_days: i64,
}

/// Inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> LcrResult<Self> {
        if start > end {
            return Err(LcrError::validation_code(
                ErrorCode::ValInvalidDate,
                format!("date range start {} is after end {}", start, end),
            ));
        }
        Ok(Self { start, end })
    }

    /// `days` before and after `center`.
    pub fn around(center: NaiveDate, days: u32) -> LcrResult<Self> {
        let span = Duration::days(i64::from(days));
        match (center.checked_sub_signed(span), center.checked_add_signed(span)) {
            (Some(start), Some(end)) => Ok(Self { start, end }),
            _ => Err(LcrError::validation_with_suggestion(
                ErrorCode::ValInvalidDate,
                format!("a window of {} day(s) around {} leaves the calendar range", days, center),
                "Use a smaller number of days",
            )),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// A timer session with its elapsed time at query time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedSession {
    pub session: Session,
    pub elapsed_secs: i64,
    /// Human-readable form of `elapsed_secs`.
    pub elapsed: String,
}

/// Completed and upcoming reviews within a range.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct History {
    /// Newest completion first.
    pub completed: Vec<Review>,
    /// Soonest first.
    pub upcoming: Vec<Review>,
    /// Timer sessions of the filtered problem started in the range, plus a
    /// running one. Newest first; empty without a problem filter.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sessions: Vec<TimedSession>,
}

/// Result of ending a timer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerSummary {
    pub session: Session,
    pub checkin: CheckinSummary,
}

/// Review tracker over a store.
pub struct Tracker<S: Store> {
    store: S,
    config: LcrConfig,
    planner: ReviewPlanner,
    clock: Box<dyn Clock>,
    rng: StdRng,
}

impl<S: Store> Tracker<S> {
    /// Create a tracker using the system clock and an entropy-seeded RNG.
    pub fn new(store: S, config: LcrConfig) -> LcrResult<Self> {
        config.validate()?;
        let planner = config.planner()?;
        Ok(Self {
            store,
            config,
            planner,
            clock: Box::new(SystemClock),
            rng: StdRng::from_entropy(),
        })
    }

    /// Replace the clock.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.set_clock(clock);
        self
    }

    /// Seed the interval RNG for reproducible schedules.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn set_clock(&mut self, clock: impl Clock + 'static) {
        self.clock = Box::new(clock);
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &LcrConfig {
        &self.config
    }

    /// Current reference date.
    pub fn today(&self) -> NaiveDate {
        self.clock.now().date_naive()
    }

    /// Insert a problem or merge new title and difficulty into it.
    pub fn register(&mut self, input: &ProblemInput) -> LcrResult<Problem> {
        let now = self.clock.now();
        let (problem, changed) = self.merged_problem(input, now)?;
        if changed {
            self.store.commit(&ChangeSet::new().upsert_problem(problem.clone()))?;
            tracing::info!(problem_id = %problem.problem_id, "registered problem");
        }
        Ok(problem)
    }

    /// Plan reviews for a problem, registering it if needed.
    ///
    /// With `explicit_date` exactly one review is planned on that date;
    /// otherwise `count` (or the configured default) reviews are generated
    /// from today.
    pub fn plan(
        &mut self,
        input: &ProblemInput,
        count: Option<u32>,
        explicit_date: Option<NaiveDate>,
    ) -> LcrResult<PlanSummary> {
        let now = self.clock.now();
        let (problem, _) = self.merged_problem(input, now)?;
        let mut chain = self
            .active_chain(&problem.problem_id)?
            .unwrap_or_else(ChainModel::empty);

        let request = PlanRequest {
            problem_id: &problem.problem_id,
            count,
            explicit_date,
            reference_date: now.date_naive(),
            now,
        };
        let plan = self.planner.plan(&request, &mut chain, &mut self.rng)?;

        self.store.commit(
            &ChangeSet::new()
                .upsert_problem(problem.clone())
                .insert_reviews(plan.created.iter().cloned()),
        )?;

        Ok(PlanSummary {
            problem,
            chain_id: plan.chain_id,
            created: plan.created,
            skipped: plan.skipped,
        })
    }

    /// Complete the problem's earliest pending review now.
    ///
    /// With nothing pending an orphan completion is logged instead.
    pub fn checkin(&mut self, problem_id: &str) -> LcrResult<CheckinSummary> {
        let now = self.clock.now();
        let problem = self.require_problem(problem_id, "checkin")?;
        let (checkin, next_review) = self.run_checkin(problem_id, now)?;

        self.store.commit(&Self::checkin_changes(&checkin))?;
        Ok(Self::summarize(problem, checkin, next_review))
    }

    /// Cascade that checking in now would cause, without changing anything.
    pub fn preview_checkin(&self, problem_id: &str) -> LcrResult<CascadeOutcome> {
        let now = self.clock.now();
        self.require_problem(problem_id, "preview")?;
        let Some(chain) = self.active_chain(problem_id)? else {
            return Ok(CascadeOutcome::default());
        };
        let Some(mut target) = chain.earliest_pending().cloned() else {
            return Ok(CascadeOutcome::default());
        };
        target.complete(now)?;
        DelayCascade::preview(&chain, &target)
    }

    /// Pending reviews scheduled on or before `as_of`.
    pub fn due_reviews(&self, as_of: NaiveDate) -> LcrResult<Vec<DueReview>> {
        let reviews = self.store.due_reviews(as_of)?;
        let mut problems: HashMap<String, Problem> = HashMap::new();
        let mut due = Vec::with_capacity(reviews.len());

        for review in reviews {
            if !problems.contains_key(&review.problem_id) {
                let problem = self.require_problem(&review.problem_id, "due_reviews")?;
                problems.insert(review.problem_id.clone(), problem);
            }
            let problem = problems[&review.problem_id].clone();
            due.push(DueReview {
                overdue_days: review.overdue_days(as_of),
                review,
                problem,
            });
        }
        Ok(due)
    }

    /// Completed and upcoming reviews within `range`, optionally for one problem.
    ///
    /// With a problem filter the problem's timer sessions are included, a
    /// running one with its time so far.
    pub fn history(&self, filter: Option<&str>, range: DateRange) -> LcrResult<History> {
        let now = self.clock.now();
        let matches = |r: &Review| filter.map_or(true, |id| r.problem_id == id);
        let sessions = match filter {
            Some(problem_id) => self
                .store
                .sessions_for_problem(problem_id)?
                .into_iter()
                .filter(|s| s.is_active() || range.contains(s.started_at.date_naive()))
                .map(|session| TimedSession {
                    elapsed_secs: session.elapsed_secs(now),
                    elapsed: session.format_elapsed(now),
                    session,
                })
                .collect(),
            None => Vec::new(),
        };
        Ok(History {
            completed: self
                .store
                .completed_between(range.start, range.end)?
                .into_iter()
                .filter(matches)
                .collect(),
            upcoming: self
                .store
                .pending_between(range.start, range.end)?
                .into_iter()
                .filter(matches)
                .collect(),
            sessions,
        })
    }

    /// Start a timer, registering the problem if needed.
    pub fn start_timer(&mut self, input: &ProblemInput) -> LcrResult<Session> {
        let now = self.clock.now();
        let (problem, _) = self.merged_problem(input, now)?;

        if let Some(active) = self.store.active_session(&problem.problem_id)? {
            return Err(LcrError::DuplicateSession {
                problem_id: problem.problem_id,
                started_at: active.started_at,
            });
        }

        let session = Session::start(problem.problem_id.as_str(), now);
        self.store.commit(
            &ChangeSet::new()
                .upsert_problem(problem)
                .upsert_session(session.clone()),
        )?;
        tracing::info!(problem_id = %session.problem_id, "timer started");
        Ok(session)
    }

    /// Stop the running timer and check the problem in, as one unit.
    pub fn end_timer(&mut self, problem_id: &str) -> LcrResult<TimerSummary> {
        let now = self.clock.now();
        let problem = self.require_problem(problem_id, "end_timer")?;
        let mut session = self
            .store
            .active_session(problem_id)?
            .ok_or_else(|| LcrError::session_not_found(problem_id))?;
        session.end(now);

        let (checkin, next_review) = self.run_checkin(problem_id, now)?;
        self.store
            .commit(&Self::checkin_changes(&checkin).upsert_session(session.clone()))?;

        tracing::info!(
            problem_id,
            duration = %session.format_duration(),
            "timer ended"
        );
        Ok(TimerSummary {
            session,
            checkin: Self::summarize(problem, checkin, next_review),
        })
    }

    /// Delay statistics of the problem's active chain.
    pub fn chain_stats(&self, problem_id: &str) -> LcrResult<CascadeStats> {
        self.require_problem(problem_id, "stats")?;
        Ok(self
            .active_chain(problem_id)?
            .map(|chain| DelayCascade::statistics(&chain))
            .unwrap_or_default())
    }

    /// Delete a problem with all its reviews and sessions.
    pub fn remove(&mut self, problem_id: &str) -> LcrResult<()> {
        if !self.store.delete_problem(problem_id)? {
            return Err(LcrError::problem_not_found(problem_id, "remove"));
        }
        tracing::info!(problem_id, "removed problem");
        Ok(())
    }

    fn require_problem(&self, problem_id: &str, operation: &str) -> LcrResult<Problem> {
        self.store
            .get_problem(problem_id)?
            .ok_or_else(|| LcrError::problem_not_found(problem_id, operation))
    }

    /// Stored problem merged with `input`, or a new one. Not persisted.
    fn merged_problem(&self, input: &ProblemInput, now: DateTime<Utc>) -> LcrResult<(Problem, bool)> {
        match self.store.get_problem(&input.problem_id)? {
            Some(mut problem) => {
                let changed = problem.merge(input.title.as_deref(), input.difficulty, now);
                Ok((problem, changed))
            }
            None => {
                let mut problem = Problem::new(input.problem_id.as_str(), now);
                problem.title = input.title.clone();
                problem.difficulty = input.difficulty;
                Ok((problem, true))
            }
        }
    }

    fn active_chain(&self, problem_id: &str) -> LcrResult<Option<ChainModel>> {
        let reviews = self.store.reviews_for_problem(problem_id)?;
        let Some(chain_id) = active_chain_for(problem_id, &reviews) else {
            return Ok(None);
        };
        let members = reviews.into_iter().filter(|r| r.chain_id == chain_id).collect();
        ChainModel::new(chain_id, members).map(Some)
    }

    fn run_checkin(&self, problem_id: &str, now: DateTime<Utc>) -> LcrResult<(Checkin, Option<Review>)> {
        let mut chain = self.active_chain(problem_id)?;
        let checkin = CheckinProcessor::checkin(problem_id, chain.as_mut(), now)?;
        let next_review = match (&chain, checkin.orphan) {
            (Some(chain), false) => chain.earliest_pending().cloned(),
            _ => None,
        };
        Ok((checkin, next_review))
    }

    fn checkin_changes(checkin: &Checkin) -> ChangeSet {
        if checkin.orphan {
            ChangeSet::new().insert_reviews(vec![checkin.review.clone()])
        } else {
            ChangeSet::new().update_reviews(checkin.touched().cloned())
        }
    }

    fn summarize(problem: Problem, checkin: Checkin, next_review: Option<Review>) -> CheckinSummary {
        CheckinSummary {
            problem,
            delay_days: checkin.shift_days,
            shifted: checkin.shifted.len(),
            orphan: checkin.orphan,
            review: checkin.review,
            next_review,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{FixedClock, MockClock};
    use crate::store::{ProblemStore, ReviewStore, SessionStore, SqliteStore};
    use crate::types::Difficulty;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn noon(day: NaiveDate) -> FixedClock {
        FixedClock::new(Utc.from_utc_datetime(&day.and_hms_opt(12, 0, 0).unwrap()))
    }

    fn tracker() -> Tracker<SqliteStore> {
        let config = LcrConfig::builder().randomization(0.0).build();
        Tracker::new(SqliteStore::in_memory().unwrap(), config)
            .unwrap()
            .with_clock(noon(date(2025, 1, 1)))
            .with_seed(42)
    }

    fn dates(reviews: &[Review]) -> Vec<NaiveDate> {
        reviews.iter().map(|r| r.scheduled_date).collect()
    }

    #[test]
    fn test_plan_from_reference_date() {
        let mut tracker = tracker();
        let summary = tracker.plan(&ProblemInput::id("42"), Some(4), None).unwrap();

        assert_eq!(
            dates(&summary.created),
            vec![date(2025, 1, 2), date(2025, 1, 8), date(2025, 1, 19), date(2025, 2, 5)]
        );
        assert_eq!(summary.created.iter().map(|r| r.iteration).collect::<Vec<_>>(), vec![1, 2, 3, 4]);
        assert_eq!(tracker.store().reviews_in_chain(&summary.chain_id).unwrap().len(), 4);
    }

    #[test]
    fn test_plan_registers_and_merges_problem() {
        let mut tracker = tracker();
        tracker.plan(&ProblemInput::parse("(M) 42. Trapping").unwrap(), Some(1), None).unwrap();
        let summary = tracker
            .plan(&ProblemInput::id("42"), None, Some(date(2025, 3, 1)))
            .unwrap();

        assert_eq!(summary.problem.title.as_deref(), Some("Trapping"));
        assert_eq!(summary.problem.difficulty, Some(Difficulty::Medium));
        assert_eq!(summary.created[0].iteration, 2);
    }

    #[test]
    fn test_repeated_explicit_date_is_deduplicated() {
        let mut tracker = tracker();
        let input = ProblemInput::id("9");
        for _ in 0..3 {
            tracker.plan(&input, None, Some(date(2025, 3, 1))).unwrap();
        }
        let reviews = tracker.store().reviews_for_problem("9").unwrap();
        assert_eq!(reviews.len(), 1);
    }

    #[test]
    fn test_late_checkin_cascades_and_persists() {
        let mut tracker = tracker();
        let plan = tracker.plan(&ProblemInput::id("42"), Some(4), None).unwrap();

        // #1 due 01-02, completed 01-04
        tracker.set_clock(noon(date(2025, 1, 4)));
        let summary = tracker.checkin("42").unwrap();
        assert!(!summary.orphan);
        assert_eq!(summary.review.iteration, 1);
        assert_eq!(summary.delay_days, 2);
        assert_eq!(summary.shifted, 3);
        assert_eq!(summary.next_review.as_ref().map(|r| r.scheduled_date), Some(date(2025, 1, 10)));

        let stored = tracker.store().reviews_in_chain(&plan.chain_id).unwrap();
        assert!(stored[0].is_completed());
        assert_eq!(stored[0].scheduled_date, date(2025, 1, 2));
        assert_eq!(
            dates(&stored[1..]),
            vec![date(2025, 1, 10), date(2025, 1, 21), date(2025, 2, 7)]
        );
    }

    #[test]
    fn test_checkin_without_pending_is_orphan() {
        let mut tracker = tracker();
        tracker.plan(&ProblemInput::id("1"), Some(1), None).unwrap();
        tracker.checkin("1").unwrap();

        let summary = tracker.checkin("1").unwrap();
        assert!(summary.orphan);
        assert_eq!(summary.delay_days, 0);
        assert!(summary.next_review.is_none());

        let reviews = tracker.store().reviews_for_problem("1").unwrap();
        assert_eq!(reviews.len(), 2);
        assert!(reviews.iter().all(|r| r.is_completed()));
        assert!(tracker.due_reviews(date(2026, 1, 1)).unwrap().is_empty());
    }

    #[test]
    fn test_checkin_unknown_problem() {
        let mut tracker = tracker();
        let err = tracker.checkin("404").unwrap_err();
        assert_eq!(err.code(), ErrorCode::NfProblem);
    }

    #[test]
    fn test_due_reviews_scenario() {
        let mut tracker = tracker();
        tracker.plan(&ProblemInput::id("42"), Some(3), None).unwrap();
        tracker.set_clock(noon(date(2025, 1, 2)));
        tracker.checkin("42").unwrap();

        let due = tracker.due_reviews(date(2025, 1, 10)).unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].review.scheduled_date, date(2025, 1, 8));
        assert_eq!(due[0].overdue_days, 2);
        assert_eq!(due[0].problem.problem_id, "42");
    }

    #[test]
    fn test_preview_does_not_persist() {
        let mut tracker = tracker();
        let plan = tracker.plan(&ProblemInput::id("42"), Some(3), None).unwrap();
        tracker.set_clock(noon(date(2025, 1, 5)));

        let outcome = tracker.preview_checkin("42").unwrap();
        assert_eq!(outcome.shift_days, 3);
        assert_eq!(outcome.changes.len(), 2);

        let stored = tracker.store().reviews_in_chain(&plan.chain_id).unwrap();
        assert!(stored.iter().all(|r| r.is_pending()));
        assert_eq!(stored[1].scheduled_date, date(2025, 1, 8));
    }

    #[test]
    fn test_history_window_and_filter() {
        let mut tracker = tracker();
        tracker.plan(&ProblemInput::id("1"), Some(2), None).unwrap();
        tracker.plan(&ProblemInput::id("2"), Some(2), None).unwrap();
        tracker.set_clock(noon(date(2025, 1, 2)));
        tracker.checkin("1").unwrap();

        let range = DateRange::around(date(2025, 1, 2), 7).unwrap();
        let history = tracker.history(None, range).unwrap();
        assert_eq!(history.completed.len(), 1);
        assert_eq!(history.upcoming.len(), 3);

        let history = tracker.history(Some("2"), range).unwrap();
        assert!(history.completed.is_empty());
        assert_eq!(history.upcoming.len(), 2);
        assert!(history.sessions.is_empty());
    }

    #[test]
    fn test_history_shows_running_timer_elapsed() {
        let mut tracker = tracker();
        tracker.set_clock(FixedClock::new(Utc.with_ymd_and_hms(2025, 1, 2, 9, 0, 0).unwrap()));
        tracker.start_timer(&ProblemInput::id("42")).unwrap();
        tracker.set_clock(FixedClock::new(Utc.with_ymd_and_hms(2025, 1, 2, 9, 20, 5).unwrap()));

        let range = DateRange::around(date(2025, 1, 2), 7).unwrap();
        let history = tracker.history(Some("42"), range).unwrap();
        assert_eq!(history.sessions.len(), 1);
        assert!(history.sessions[0].session.is_active());
        assert_eq!(history.sessions[0].elapsed_secs, 1205);
        assert_eq!(history.sessions[0].elapsed, "20m 5s");

        tracker.set_clock(FixedClock::new(Utc.with_ymd_and_hms(2025, 1, 2, 9, 30, 0).unwrap()));
        tracker.end_timer("42").unwrap();
        let history = tracker.history(Some("42"), range).unwrap();
        assert_eq!(history.sessions[0].elapsed_secs, 1800);

        assert!(tracker.history(None, range).unwrap().sessions.is_empty());
    }

    #[test]
    fn test_date_range_around_out_of_calendar() {
        let err = DateRange::around(date(2025, 1, 1), u32::MAX).unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValInvalidDate);
        assert!(DateRange::around(NaiveDate::MAX, 1).is_err());

        let range = DateRange::around(date(2025, 1, 10), 3).unwrap();
        assert_eq!(range.start, date(2025, 1, 7));
        assert_eq!(range.end, date(2025, 1, 13));
    }

    #[test]
    fn test_date_range_validation() {
        assert!(DateRange::new(date(2025, 1, 2), date(2025, 1, 1)).is_err());
        let range = DateRange::new(date(2025, 1, 1), date(2025, 1, 1)).unwrap();
        assert!(range.contains(date(2025, 1, 1)));
        assert!(!range.contains(date(2025, 1, 2)));
    }

    #[test]
    fn test_timer_end_checks_in_atomically() {
        let mut tracker = tracker();
        tracker.plan(&ProblemInput::id("42"), Some(2), None).unwrap();

        tracker.set_clock(FixedClock::new(Utc.with_ymd_and_hms(2025, 1, 2, 9, 0, 0).unwrap()));
        tracker.start_timer(&ProblemInput::id("42")).unwrap();
        let err = tracker.start_timer(&ProblemInput::id("42")).unwrap_err();
        assert_eq!(err.code(), ErrorCode::SesDuplicate);

        tracker.set_clock(FixedClock::new(Utc.with_ymd_and_hms(2025, 1, 2, 9, 45, 0).unwrap()));
        let summary = tracker.end_timer("42").unwrap();
        assert_eq!(summary.session.duration_secs, Some(2700));
        assert_eq!(summary.checkin.review.iteration, 1);
        assert_eq!(summary.checkin.delay_days, 0);

        assert!(tracker.store().active_session("42").unwrap().is_none());
        let err = tracker.end_timer("42").unwrap_err();
        assert_eq!(err.code(), ErrorCode::NfSession);
    }

    #[test]
    fn test_start_timer_registers_problem() {
        let mut tracker = tracker();
        let session = tracker.start_timer(&ProblemInput::parse("3. Longest").unwrap()).unwrap();
        assert!(session.is_active());
        assert!(tracker.store().get_problem("3").unwrap().is_some());
    }

    #[test]
    fn test_chain_stats_and_remove() {
        let mut tracker = tracker();
        tracker.plan(&ProblemInput::id("42"), Some(4), None).unwrap();
        tracker.set_clock(noon(date(2025, 1, 5)));
        tracker.checkin("42").unwrap();

        let stats = tracker.chain_stats("42").unwrap();
        assert_eq!(stats.completed_reviews, 1);
        assert_eq!(stats.pending_reviews, 3);
        assert_eq!(stats.max_delay_days, 3);

        tracker.remove("42").unwrap();
        assert_eq!(tracker.chain_stats("42").unwrap_err().code(), ErrorCode::NfProblem);
        assert_eq!(tracker.remove("42").unwrap_err().code(), ErrorCode::NfProblem);
    }

    #[test]
    fn test_time_comes_only_from_clock() {
        let mut clock = MockClock::new();
        clock
            .expect_now()
            .times(1)
            .return_const(Utc.with_ymd_and_hms(2030, 6, 1, 8, 0, 0).unwrap());

        let config = LcrConfig::builder().randomization(0.0).build();
        let mut tracker = Tracker::new(SqliteStore::in_memory().unwrap(), config)
            .unwrap()
            .with_clock(clock);

        let summary = tracker.plan(&ProblemInput::id("7"), Some(1), None).unwrap();
        assert_eq!(summary.created[0].scheduled_date, date(2030, 6, 2));
        assert_eq!(summary.problem.created_at, Utc.with_ymd_and_hms(2030, 6, 1, 8, 0, 0).unwrap());
    }
}
