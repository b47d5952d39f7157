pub mod activity;
pub mod config;
pub mod goal;
pub mod storage;
pub mod summary;
pub mod system;

use chrono::NaiveDate;

use crate::cli::core::CommandError;
use crate::cli::registry::{CommandEntry, CommandRegistry};
use crate::ledger::common::calendar_date;

const ROOT_COMMAND_ORDER: &[&str] = &[
    "activity", "goal", "summary", "factors", "backups", "restore", "config", "help", "version",
    "exit",
];

pub(crate) fn all_entries() -> Vec<CommandEntry> {
    let mut commands = Vec::new();
    commands.extend(activity::definitions());
    commands.extend(goal::definitions());
    commands.extend(summary::definitions());
    commands.extend(storage::definitions());
    commands.extend(config::definitions());
    commands.extend(system::definitions());
    commands
}

pub(crate) fn register_all(registry: &mut CommandRegistry) {
    let mut entries = all_entries();
    entries.sort_by_key(|entry| {
        ROOT_COMMAND_ORDER
            .iter()
            .position(|name| entry.name.eq_ignore_ascii_case(name))
            .unwrap_or(ROOT_COMMAND_ORDER.len())
    });
    for entry in entries {
        registry.register(entry);
    }
}

/// Parses `YYYY-MM-DD` (or an RFC 3339 timestamp), plus `today` and `yesterday`.
pub(crate) fn parse_date(raw: &str, today: NaiveDate) -> Result<NaiveDate, CommandError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "today" => Ok(today),
        "yesterday" => today
            .pred_opt()
            .ok_or_else(|| CommandError::InvalidArguments("date out of range".into())),
        _ => calendar_date::parse(raw).ok_or_else(|| {
            CommandError::InvalidArguments(format!("invalid date `{raw}` (expected YYYY-MM-DD)"))
        }),
    }
}
