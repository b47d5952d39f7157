use std::io::{self, BufRead, StdinLock};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::Validator,
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};

use crate::cli::core::{CliError, CliMode, CommandError, LoopControl, ShellContext};
use crate::cli::io as cli_io;

const SCRIPT_ENV: &str = "ECO_CORE_CLI_SCRIPT";

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };
    let mut context = ShellContext::new(mode)?;

    match mode {
        CliMode::Interactive => {
            let mut reader = EditorReader::new(&context)?;
            cli_io::print_info("Type `help` to list commands, `exit` to leave.");
            drive(&mut context, &mut reader)
        }
        CliMode::Script => {
            let stdin = io::stdin();
            let mut reader = ScriptReader {
                lines: stdin.lock(),
            };
            drive(&mut context, &mut reader)
        }
    }
}

/// One read from the active input source.
enum Input {
    Line(String),
    Interrupted,
    Closed,
}

trait LineReader {
    fn read(&mut self, prompt: &str) -> Result<Input, CliError>;

    fn remember(&mut self, _line: &str) {}
}

struct EditorReader {
    editor: Editor<CommandHelper, DefaultHistory>,
}

impl EditorReader {
    fn new(context: &ShellContext) -> Result<Self, CliError> {
        let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
        editor.set_helper(Some(CommandHelper::new(
            context.registry.completion_table(),
        )));
        editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);
        Ok(Self { editor })
    }
}

impl LineReader for EditorReader {
    fn read(&mut self, prompt: &str) -> Result<Input, CliError> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(Input::Line(line)),
            Err(ReadlineError::Interrupted) => Ok(Input::Interrupted),
            Err(ReadlineError::Eof) => {
                cli_io::print_info("Exiting shell.");
                Ok(Input::Closed)
            }
            Err(err) => Err(err.into()),
        }
    }

    fn remember(&mut self, line: &str) {
        if let Err(err) = self.editor.add_history_entry(line) {
            tracing::debug!(error = %err, "history entry dropped");
        }
    }
}

struct ScriptReader<'a> {
    lines: StdinLock<'a>,
}

impl LineReader for ScriptReader<'_> {
    fn read(&mut self, _prompt: &str) -> Result<Input, CliError> {
        let mut line = String::new();
        if self.lines.read_line(&mut line)? == 0 {
            return Ok(Input::Closed);
        }
        Ok(Input::Line(line))
    }
}

/// Reads and dispatches lines until the source closes or a command ends the session.
/// Blank lines and `#` comments are skipped.
fn drive(context: &mut ShellContext, reader: &mut dyn LineReader) -> Result<(), CliError> {
    while context.running {
        let line = match reader.read(&context.prompt())? {
            Input::Line(line) => line,
            Input::Interrupted if context.confirm_exit()? => break,
            Input::Interrupted => continue,
            Input::Closed => break,
        };
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        reader.remember(trimmed);

        match handle_line(context, trimmed) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => context.report_error(err)?,
        }
    }
    Ok(())
}

/// A tokenized shell line: the command as typed, its lookup key, and the arguments.
#[derive(Debug, PartialEq)]
pub(crate) struct CommandLine {
    pub raw: String,
    pub name: String,
    pub args: Vec<String>,
}

impl CommandLine {
    /// Splits `input` with shell quoting rules. `Ok(None)` for a line with no words.
    pub(crate) fn parse(input: &str) -> Result<Option<Self>, shell_words::ParseError> {
        let mut words = shell_words::split(input)?.into_iter();
        Ok(words.next().map(|raw| Self {
            name: raw.to_lowercase(),
            raw,
            args: words.collect(),
        }))
    }
}

pub(crate) fn handle_line(
    context: &mut ShellContext,
    line: &str,
) -> Result<LoopControl, CommandError> {
    let command = match CommandLine::parse(line) {
        Ok(Some(command)) => command,
        Ok(None) => return Ok(LoopControl::Continue),
        Err(err) => {
            cli_io::print_warning(format!("Could not read that line: {err}"));
            return Ok(LoopControl::Continue);
        }
    };
    let args: Vec<&str> = command.args.iter().map(String::as_str).collect();

    context.last_command = Some(line.trim().to_string());
    tracing::debug!(command = %command.name, args = args.len(), "dispatching command");

    let outcome = context.dispatch(&command.name, &command.raw, &args);
    if matches!(outcome, Ok(LoopControl::Exit)) {
        context.running = false;
    }
    outcome
}

/// Completes command names in the first word and subcommands in the second.
struct CommandHelper {
    commands: Vec<(String, Vec<String>)>,
}

impl CommandHelper {
    fn new(table: Vec<(&'static str, &'static [&'static str])>) -> Self {
        let mut commands: Vec<(String, Vec<String>)> = table
            .into_iter()
            .map(|(name, subs)| {
                (
                    name.to_ascii_lowercase(),
                    subs.iter().map(|sub| sub.to_string()).collect(),
                )
            })
            .collect();
        commands.sort();
        commands.dedup_by(|a, b| a.0 == b.0);
        Self { commands }
    }

    fn candidates(&self, words: &[&str], needle: &str) -> Vec<Pair> {
        let pool: Vec<&String> = match words {
            [] => self.commands.iter().map(|(name, _)| name).collect(),
            [command] => self
                .commands
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(command))
                .map(|(_, subs)| subs.iter().collect())
                .unwrap_or_default(),
            _ => Vec::new(),
        };
        pool.into_iter()
            .filter(|word| word.starts_with(needle))
            .map(|word| Pair {
                display: word.clone(),
                replacement: word.clone(),
            })
            .collect()
    }
}

impl Helper for CommandHelper {}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let prefix = &line[..pos];
        let start = prefix
            .rfind(char::is_whitespace)
            .map(|idx| idx + 1)
            .unwrap_or(0);
        let completed: Vec<&str> = prefix[..start].split_whitespace().collect();
        let needle = prefix[start..].to_ascii_lowercase();
        Ok((start, self.candidates(&completed, &needle)))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;
}

impl Highlighter for CommandHelper {}

impl Validator for CommandHelper {}
