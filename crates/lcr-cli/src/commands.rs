//! Command handlers.

use anyhow::Context;
use lcr_core::{parse_date, DateRange, ProblemInput, Store, Tracker};

use crate::cli::Commands;
use crate::output::{emit, Formatter};

/// Problem identifier from any accepted reference form.
fn problem_id(reference: &str) -> anyhow::Result<String> {
    Ok(ProblemInput::parse(reference)?.problem_id)
}

pub fn dispatch<S: Store>(command: Commands, tracker: &mut Tracker<S>, json: bool) -> anyhow::Result<()> {
    let fmt = Formatter::new(tracker.config().display.date_format.clone());

    match command {
        Commands::Add {
            input,
            times,
            date,
            title,
        } => {
            let mut input = ProblemInput::parse(&input)?;
            if title.is_some() {
                input.title = title;
            }
            let explicit_date = date.as_deref().map(parse_date).transpose()?;
            let summary = tracker
                .plan(&input, times, explicit_date)
                .with_context(|| format!("failed to plan reviews for {}", input.problem_id))?;
            emit(&summary, json, || fmt.plan(&summary))
        }
        Commands::Checkin { problem } => {
            let summary = tracker.checkin(&problem_id(&problem)?)?;
            emit(&summary, json, || fmt.checkin(&summary))
        }
        Commands::Preview { problem } => {
            let id = problem_id(&problem)?;
            let outcome = tracker.preview_checkin(&id)?;
            emit(&outcome, json, || fmt.preview(&id, &outcome))
        }
        Commands::List { as_of } => {
            let as_of = match as_of {
                Some(raw) => parse_date(&raw)?,
                None => tracker.today(),
            };
            let due = tracker.due_reviews(as_of)?;
            emit(&due, json, || fmt.due(as_of, &due))
        }
        Commands::Review { days, problem } => {
            let filter = problem.as_deref().map(problem_id).transpose()?;
            let range = DateRange::around(tracker.today(), days)?;
            let history = tracker.history(filter.as_deref(), range)?;
            emit(&history, json, || fmt.history(&history))
        }
        Commands::Start { problem } => {
            let session = tracker.start_timer(&ProblemInput::parse(&problem)?)?;
            emit(&session, json, || fmt.timer_started(&session))
        }
        Commands::End { problem } => {
            let summary = tracker.end_timer(&problem_id(&problem)?)?;
            emit(&summary, json, || fmt.timer_ended(&summary))
        }
        Commands::Stats { problem } => {
            let id = problem_id(&problem)?;
            let stats = tracker.chain_stats(&id)?;
            emit(&stats, json, || fmt.stats(&id, &stats))
        }
        Commands::Remove { problem } => {
            let id = problem_id(&problem)?;
            tracker.remove(&id)?;
            emit(&serde_json::json!({ "removed": id }), json, || format!("Removed problem {}", id))
        }
    }
}
