use crate::cli::core::{parse_number, require_args, CommandError, CommandResult, ShellContext};
use crate::cli::formatters::DateFormatter;
use crate::cli::io as cli_io;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::ledger::{GoalId, GoalStatus};

use super::parse_date;

const ADD_USAGE: &str = "goal add <target> <deadline> <description...>";
const PROGRESS_USAGE: &str = "goal progress <id> <current>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "goal",
        "Create goals, record progress, and settle deadlines",
        "goal add <target> <deadline> <description...> | goal list | goal progress <id> <current> | goal evaluate",
        cmd_goal,
    )
    .with_subcommands(&["add", "list", "progress", "evaluate"])]
}

fn cmd_goal(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((sub, rest)) = args.split_first() else {
        return list_goals(context);
    };
    match sub.to_ascii_lowercase().as_str() {
        "add" => add_goal(context, rest),
        "list" => list_goals(context),
        "progress" => update_progress(context, rest),
        "evaluate" => evaluate_goals(context),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown subcommand `{other}`; expected add, list, progress or evaluate"
        ))),
    }
}

fn add_goal(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let args = require_args(args, 3, ADD_USAGE)?;
    let target = parse_number(args[0], "target")?;
    let deadline = parse_date(args[1], context.manager.today())?;
    let description = args[2..].join(" ");

    let recorded = context.manager.add_goal(target, &description, deadline)?;
    context.report_persisted(&recorded);
    cli_io::print_success(format!(
        "Goal {} created: {} (target {:.2}, due {}).",
        recorded.entry.id,
        recorded.entry.description,
        recorded.entry.target,
        context.formatters().format_date(recorded.entry.deadline)
    ));
    Ok(())
}

fn list_goals(context: &mut ShellContext) -> CommandResult {
    let goals = context.manager.goals().goals();
    if goals.is_empty() {
        cli_io::print_info("No goals yet. Use `goal add` to create one.");
        return Ok(());
    }
    let formatters = context.formatters();
    let rows: Vec<Vec<String>> = goals.iter().map(|goal| formatters.goal_row(goal)).collect();
    output::table(
        &["ID", "Description", "Progress", "Done", "Deadline", "Status"],
        &rows,
    );
    Ok(())
}

fn update_progress(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let args = require_args(args, 2, PROGRESS_USAGE)?;
    let id = args[0]
        .trim()
        .parse::<u64>()
        .map(GoalId)
        .map_err(|_| CommandError::InvalidArguments(format!("invalid goal id `{}`", args[0])))?;
    let current = parse_number(args[1], "current")?;

    let recorded = context.manager.update_goal_progress(id, current)?;
    context.report_persisted(&recorded);
    let goal = &recorded.entry;
    if goal.status == GoalStatus::Completed {
        cli_io::print_success(format!("Goal {} completed: {}", goal.id, goal.description));
    } else {
        cli_io::print_success(format!(
            "Goal {} at {:.2} / {:.2} ({:.0}%).",
            goal.id,
            goal.current,
            goal.target,
            goal.progress_ratio() * 100.0
        ));
    }
    Ok(())
}

fn evaluate_goals(context: &mut ShellContext) -> CommandResult {
    let recorded = context.manager.evaluate_goals();
    context.report_persisted(&recorded);
    let overview = context.manager.goal_overview();
    cli_io::print_info(format!(
        "{} goal(s) updated: {} in progress, {} completed, {} failed.",
        recorded.entry, overview.in_progress, overview.completed, overview.failed
    ));
    Ok(())
}
