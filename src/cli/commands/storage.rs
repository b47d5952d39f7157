use crate::cli::core::{require_args, CommandError, CommandResult, ShellContext};
use crate::cli::io as cli_io;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::storage::{ACTIVITIES_KEY, GOALS_KEY};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "backups",
            "List saved snapshots of the activity or goal list",
            "backups <activities|goals>",
            cmd_backups,
        )
        .with_subcommands(&["activities", "goals"]),
        CommandEntry::new(
            "restore",
            "Restore a snapshot by its index from `backups`",
            "restore <activities|goals> <index>",
            cmd_restore,
        )
        .with_subcommands(&["activities", "goals"]),
    ]
}

fn store_key(raw: &str) -> Result<&'static str, CommandError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "activities" => Ok(ACTIVITIES_KEY),
        "goals" => Ok(GOALS_KEY),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown list `{other}`; expected `activities` or `goals`"
        ))),
    }
}

fn cmd_backups(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let args = require_args(args, 1, "backups <activities|goals>")?;
    let key = store_key(args[0])?;
    let backups = context.storage.list_backups(key)?;
    if backups.is_empty() {
        cli_io::print_info(format!("No backups for {}.", args[0]));
        return Ok(());
    }
    let rows: Vec<Vec<String>> = backups
        .iter()
        .enumerate()
        .map(|(idx, info)| {
            vec![
                (idx + 1).to_string(),
                info.created_at
                    .map(|stamp| stamp.format("%Y-%m-%d %H:%M:%S UTC").to_string())
                    .unwrap_or_else(|| "unknown".into()),
                format!("{} B", info.size_bytes),
                info.name.clone(),
            ]
        })
        .collect();
    output::table(&["#", "Created", "Size", "File"], &rows);
    Ok(())
}

fn cmd_restore(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let args = require_args(args, 2, "restore <activities|goals> <index>")?;
    let key = store_key(args[0])?;
    let index: usize = args[1]
        .trim()
        .parse()
        .ok()
        .filter(|index| *index >= 1)
        .ok_or_else(|| {
            CommandError::InvalidArguments(format!("invalid backup index `{}`", args[1]))
        })?;

    let backups = context.storage.list_backups(key)?;
    let backup = backups.get(index - 1).ok_or_else(|| {
        CommandError::Message(format!(
            "no backup #{index} for {} ({} available)",
            args[0],
            backups.len()
        ))
    })?;

    if !context.confirm(&format!("Replace current {} with {}?", args[0], backup.name))? {
        cli_io::print_info("Restore cancelled.");
        return Ok(());
    }

    context.storage.restore(backup)?;
    context.manager.reload()?;
    cli_io::print_success(format!("Restored {} from {}.", args[0], backup.name));
    Ok(())
}
