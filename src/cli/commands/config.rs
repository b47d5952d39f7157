use crate::cli::core::{require_args, CommandError, CommandResult, ShellContext};
use crate::cli::io as cli_io;
use crate::cli::output;
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "Show or change preferences",
        "config show | config set <key> <value>",
        cmd_config,
    )
    .with_subcommands(&["show", "set"])]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.split_first() {
        None => show_config(context),
        Some((sub, _)) if sub.eq_ignore_ascii_case("show") => show_config(context),
        Some((sub, rest)) if sub.eq_ignore_ascii_case("set") => set_config(context, rest),
        Some((other, _)) => Err(CommandError::InvalidArguments(format!(
            "unknown subcommand `{other}`; expected `show` or `set`"
        ))),
    }
}

fn show_config(context: &mut ShellContext) -> CommandResult {
    let config = &context.config;
    output::section("Configuration");
    output::pairs(&[
        ("File", context.config_manager.path().display().to_string()),
        ("seed_sample_data", config.seed_sample_data.to_string()),
        ("backup_retention", config.backup_retention.to_string()),
        ("plain_output", config.plain_output.to_string()),
        ("custom_factors", config.custom_factors.len().to_string()),
    ]);
    Ok(())
}

fn set_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let args = require_args(args, 2, "config set <key> <value>")?;
    let key = args[0].to_ascii_lowercase();
    context.config.set_value(&key, args[1])?;
    context.persist_config()?;
    cli_io::apply_config(&context.config);
    cli_io::print_success(format!("Configuration updated: {key} = {}", args[1]));
    if matches!(key.as_str(), "seed_sample_data" | "backup_retention") {
        cli_io::print_hint("Takes effect the next time the shell starts.");
    }
    Ok(())
}
