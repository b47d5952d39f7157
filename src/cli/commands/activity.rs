use crate::cli::core::{parse_number, require_args, CommandError, CommandResult, ShellContext};
use crate::cli::formatters::AmountFormatter;
use crate::cli::io as cli_io;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::ledger::{Activity, ActivityType};

use super::parse_date;

const ADD_USAGE: &str = "activity add <type> <detail> <amount> [date]";
const LIST_USAGE: &str = "activity list [type]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "activity",
        "Log an activity or list logged activities",
        "activity add <type> <detail> <amount> [date] | activity list [type]",
        cmd_activity,
    )
    .with_subcommands(&["add", "list"])]
}

fn cmd_activity(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.split_first() {
        Some((sub, rest)) if sub.eq_ignore_ascii_case("add") => add_activity(context, rest),
        Some((sub, rest)) if sub.eq_ignore_ascii_case("list") => list_activities(context, rest),
        None => list_activities(context, &[]),
        Some((other, _)) => Err(CommandError::InvalidArguments(format!(
            "unknown subcommand `{other}`; expected `add` or `list`"
        ))),
    }
}

fn add_activity(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let args = require_args(args, 3, ADD_USAGE)?;
    if args.len() > 4 {
        return Err(CommandError::InvalidArguments(format!("usage: {ADD_USAGE}")));
    }
    let activity_type: ActivityType = args[0].parse()?;
    let detail = args[1];
    let amount = parse_number(args[2], "amount")?;
    let today = context.manager.today();
    let date = match args.get(3) {
        Some(raw) => parse_date(raw, today)?,
        None => today,
    };

    let recorded = context
        .manager
        .add_activity(activity_type, detail, amount, date)?;
    context.report_persisted(&recorded);
    let formatters = context.formatters();
    cli_io::print_success(format!(
        "Logged {} {} ({}): {}",
        formatters.format_amount(recorded.entry.amount, recorded.entry.activity_type),
        recorded.entry.detail,
        recorded.entry.activity_type,
        formatters.format_emission(recorded.entry.emission)
    ));
    Ok(())
}

fn list_activities(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.len() > 1 {
        return Err(CommandError::InvalidArguments(format!("usage: {LIST_USAGE}")));
    }
    let filter = args.first().map(|raw| raw.parse::<ActivityType>()).transpose()?;
    let ledger = context.manager.ledger();
    let activities: Vec<&Activity> = match filter {
        Some(activity_type) => ledger.activities_of(activity_type).collect(),
        None => ledger.activities().iter().collect(),
    };

    if activities.is_empty() {
        cli_io::print_info("No activities logged.");
        return Ok(());
    }

    let formatters = context.formatters();
    let rows: Vec<Vec<String>> = activities
        .iter()
        .map(|activity| formatters.activity_row(activity))
        .collect();
    output::table(&["ID", "Date", "Type", "Detail", "Amount", "Emission"], &rows);
    let total: f64 = activities.iter().map(|activity| activity.emission).sum();
    cli_io::print_info(format!(
        "{} activities, {}",
        activities.len(),
        formatters.format_emission(total)
    ));
    Ok(())
}
