use chrono::Duration;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::formatters::{AmountFormatter, DateFormatter};
use crate::cli::io as cli_io;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::core::services::SummaryService;
use crate::ledger::ActivityType;

/// Days shown in the trailing daily breakdown, today included.
const DAILY_WINDOW_DAYS: i64 = 7;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "summary",
            "Show total footprint, per-type totals, and goal status",
            "summary",
            cmd_summary,
        ),
        CommandEntry::new(
            "factors",
            "List emission factors, optionally for one activity type",
            "factors [type]",
            cmd_factors,
        )
        .with_subcommands(&["transport", "energy", "food", "shopping"]),
    ]
}

fn cmd_summary(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let formatters = context.formatters();
    let summary = context.manager.summary();

    output::section("Footprint");
    output::pairs(&[
        ("Total", formatters.format_emission(summary.total_emission)),
        (
            "Energy used",
            formatters.format_amount(summary.energy_kwh, ActivityType::Energy),
        ),
        (
            "Distance",
            formatters.format_amount(summary.transport_km, ActivityType::Transport),
        ),
        ("Activities", summary.activity_count.to_string()),
    ]);

    if !summary.by_type.is_empty() {
        output::section("By type");
        let rows: Vec<(&str, String)> = summary
            .by_type
            .iter()
            .map(|(activity_type, kg)| (activity_type.as_str(), formatters.format_emission(*kg)))
            .collect();
        output::pairs(&rows);
    }

    let today = context.manager.today();
    let from = today - Duration::days(DAILY_WINDOW_DAYS - 1);
    let daily = SummaryService::daily_window(context.manager.ledger(), from, today);
    if !daily.is_empty() {
        output::section("Last 7 days");
        let rows: Vec<(String, String)> = daily
            .iter()
            .map(|(date, kg)| (formatters.format_date(*date), formatters.format_emission(*kg)))
            .collect();
        let borrowed: Vec<(&str, String)> = rows
            .iter()
            .map(|(label, value)| (label.as_str(), value.clone()))
            .collect();
        output::pairs(&borrowed);
    }

    let goals = context.manager.goal_overview();
    output::section("Goals");
    output::pairs(&[
        ("In progress", goals.in_progress.to_string()),
        ("Completed", goals.completed.to_string()),
        ("Failed", goals.failed.to_string()),
    ]);
    Ok(())
}

fn cmd_factors(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.len() > 1 {
        return Err(CommandError::InvalidArguments("usage: factors [type]".into()));
    }
    let filter = args.first().map(|raw| raw.parse::<ActivityType>()).transpose()?;
    let rows: Vec<Vec<String>> = context
        .manager
        .factors()
        .iter()
        .filter(|(_, factor)| filter.map_or(true, |wanted| factor.activity_type == wanted))
        .map(|(detail, factor)| {
            vec![
                detail.to_string(),
                factor.activity_type.to_string(),
                format!(
                    "{:.3} kg CO2 / {}",
                    factor.kg_per_unit,
                    factor.activity_type.unit()
                ),
            ]
        })
        .collect();

    if rows.is_empty() {
        cli_io::print_info("No emission factors match.");
        return Ok(());
    }
    output::table(&["Detail", "Type", "Factor"], &rows);
    Ok(())
}
