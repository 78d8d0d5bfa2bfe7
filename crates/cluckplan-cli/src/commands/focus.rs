//! Focus session commands for CLI.

use std::io::Write;
use std::time::Duration;

use chrono::{DateTime, Utc};
use clap::Subcommand;
use cluckplan_core::stats::format_clock;
use cluckplan_core::{Clock, Config, CountdownEvent, FocusCountdown, SystemClock};

use super::{open_store, print_json, CmdResult};

#[derive(Subcommand)]
pub enum FocusAction {
    /// Plan a focus session
    Add {
        /// Session title
        title: String,
        /// Planned length in minutes
        #[arg(long, default_value = "25")]
        minutes: u64,
        /// Start time (RFC 3339, default: now)
        #[arg(long)]
        start: Option<DateTime<Utc>>,
    },
    /// List focus sessions
    List {
        /// Only sessions starting today
        #[arg(long)]
        today: bool,
    },
    /// Mark a session active
    Start {
        /// Session ID
        id: String,
    },
    /// Complete a session with the time actually spent
    Complete {
        /// Session ID
        id: String,
        /// Seconds actually focused (default: the planned duration)
        #[arg(long)]
        actual_secs: Option<u64>,
    },
    /// Delete a session
    Delete {
        /// Session ID
        id: String,
    },
    /// Start a session and count it down in the terminal
    Run {
        /// Session ID
        id: String,
    },
}

pub fn run(action: FocusAction) -> CmdResult {
    let config = Config::load_or_default();
    let mut store = open_store(&config)?;

    match action {
        FocusAction::Add {
            title,
            minutes,
            start,
        } => {
            let start = start.unwrap_or_else(|| SystemClock.now());
            let session = store.add_focus_session(title, minutes.saturating_mul(60), start);
            print_json(&store, &session)?;
        }
        FocusAction::List { today } => {
            let sessions: Vec<_> = if today {
                store.todays_sessions()
            } else {
                store.focus_sessions().iter().collect()
            };
            print_json(&store, &sessions)?;
        }
        FocusAction::Start { id } => {
            store.start_focus_session(&id)?;
            print_json(&store, &store.focus_session(&id))?;
        }
        FocusAction::Complete { id, actual_secs } => {
            let planned = store
                .focus_session(&id)
                .map(|s| s.duration_secs)
                .unwrap_or_default();
            let feathers = store.complete_focus_session(&id, actual_secs.unwrap_or(planned))?;
            print_json(
                &store,
                &serde_json::json!({
                    "session": store.focus_session(&id),
                    "feathers": feathers,
                }),
            )?;
        }
        FocusAction::Delete { id } => {
            let session = store.delete_focus_session(&id)?;
            print_json(&store, &session)?;
        }
        FocusAction::Run { id } => {
            store.start_focus_session(&id)?;
            let session = store
                .focus_session(&id)
                .cloned()
                .ok_or_else(|| format!("focus session not found: {id}"))?;

            let mut countdown = FocusCountdown::new();
            countdown.start(&session);
            let second = Duration::from_secs(1);
            let completed = loop {
                eprint!("\r{} {}", session.title, format_clock(countdown.remaining_secs()));
                let _ = std::io::stderr().flush();
                std::thread::sleep(second);
                if let Some(event) = countdown.advance(second) {
                    break event;
                }
            };
            eprintln!();

            let CountdownEvent::Completed {
                session_id,
                actual_secs,
            } = completed;
            let feathers = store.complete_focus_session(&session_id, actual_secs)?;
            print_json(
                &store,
                &serde_json::json!({
                    "session": store.focus_session(&session_id),
                    "feathers": feathers,
                }),
            )?;
        }
    }
    Ok(())
}
