use clap::Subcommand;
use cluckplan_core::stats::format_duration;
use cluckplan_core::Config;

use super::{open_store, print_json, CmdResult};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Cumulative, daily and weekly statistics
    Show,
    /// Achievement progress
    Achievements,
    /// Wipe tasks, sessions, statistics and game progress
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },
}

pub fn run(action: StatsAction) -> CmdResult {
    let config = Config::load_or_default();
    let mut store = open_store(&config)?;

    match action {
        StatsAction::Show => {
            let stats = store.statistics();
            print_json(
                &store,
                &serde_json::json!({
                    "statistics": stats,
                    "total_focus": format_duration(stats.total_focus_secs),
                    "today_focus": format_duration(stats.daily.focus_secs),
                    "week_focus": format_duration(stats.weekly.focus_secs),
                }),
            )?;
        }
        StatsAction::Achievements => {
            let achievements: Vec<_> = store
                .achievements()
                .into_iter()
                .map(|a| {
                    serde_json::json!({
                        "achievement": a.achievement,
                        "title": a.achievement.title(),
                        "unlocked": a.unlocked,
                    })
                })
                .collect();
            print_json(&store, &achievements)?;
        }
        StatsAction::Reset { yes } => {
            if !yes {
                return Err("refusing to reset without --yes".into());
            }
            store.reset_progress();
            print_json(&store, store.statistics())?;
        }
    }
    Ok(())
}
