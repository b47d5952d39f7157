use crate::cli::output;
use crate::cli::registry::{CommandEntry, CommandRegistry};

pub fn print_overview(registry: &CommandRegistry) {
    output::section("Available commands");
    let rows: Vec<(&str, String)> = registry
        .list()
        .into_iter()
        .map(|entry| (entry.name, entry.description.to_string()))
        .collect();
    output::pairs(&rows);
    output::hint("Use `help <command>` for details.");
}

pub fn print_command(entry: &CommandEntry) {
    output::section(format!("Help: {}", entry.name));
    let mut rows = vec![
        ("description", entry.description.to_string()),
        ("usage", entry.usage.to_string()),
    ];
    if !entry.subcommands.is_empty() {
        rows.push(("subcommands", entry.subcommands.join(", ")));
    }
    output::pairs(&rows);
}
