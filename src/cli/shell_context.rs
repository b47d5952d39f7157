use std::path::PathBuf;

use crate::{
    config::{Config, ConfigManager},
    core::{
        utils::{ensure_dir, PathResolver},
        FootprintManager, Recorded, SystemClock,
    },
    errors::{CliError, EcoError},
    storage::JsonFileStore,
};

use super::{
    commands,
    core::{CommandError, CommandResult, LoopControl},
    formatters::CliFormatters,
    io as cli_io,
    registry::{CommandEntry, CommandRegistry},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

/// Everything a command handler can reach: the footprint state, its store, and the config.
pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub manager: FootprintManager,
    /// Same directory the manager writes to; used for backup listing and restore.
    pub storage: JsonFileStore,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_base_dir(mode, PathResolver::base_dir())
    }

    pub fn with_base_dir(mode: CliMode, base: PathBuf) -> Result<Self, CliError> {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        ensure_dir(&base)?;
        let config_manager = ConfigManager::with_base_dir(base.clone())?;
        let config = config_manager.load()?;
        cli_io::apply_config(&config);

        let storage = JsonFileStore::with_retention(
            PathResolver::store_dir_in(&base),
            PathResolver::backup_dir_in(&base),
            config.backup_retention,
        )?;
        let factors = config.factor_table()?;
        let manager = if config.seed_sample_data {
            FootprintManager::open_seeded(Box::new(storage.clone()), factors, Box::new(SystemClock))?
        } else {
            FootprintManager::open(Box::new(storage.clone()), factors, Box::new(SystemClock))?
        };
        tracing::debug!(home = %base.display(), ?mode, "shell context ready");

        Ok(Self {
            mode,
            registry,
            manager,
            storage,
            config_manager,
            config,
            last_command: None,
            running: true,
        })
    }

    pub fn prompt(&self) -> String {
        format!("eco [{} activities]> ", self.manager.ledger().len())
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub fn formatters(&self) -> CliFormatters {
        CliFormatters::new(self.manager.today())
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{input}`. Type `help` to see available commands."
        ));
        if let Some(best) = self.registry.suggest(input) {
            cli_io::print_info(format!("Suggestion: `{best}`?"));
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Ok(cli_io::confirm_action("Exit shell?")?)
    }

    /// Asks before a destructive action; scripts always proceed.
    pub(crate) fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Ok(cli_io::confirm_action(prompt)?)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                cli_io::print_error(message);
                cli_io::print_hint("Use `help <command>` for usage details.");
            }
            CommandError::Core(EcoError::MissingFactor(detail)) => {
                cli_io::print_error(format!("No emission factor for `{detail}`."));
                cli_io::print_hint("Use `factors` to list known details.");
            }
            CommandError::Core(err) if err.is_validation() => {
                cli_io::print_error(err);
                cli_io::print_hint("Use `help <command>` for usage details.");
            }
            other => cli_io::print_error(other),
        }
        Ok(())
    }

    /// Warns when a mutation stayed in memory because the store rejected the write.
    pub(crate) fn report_persisted<T>(&self, recorded: &Recorded<T>) {
        if let Some(err) = recorded.persist_error() {
            cli_io::print_warning(format!("Change kept in memory but not saved: {err}"));
        }
    }

    pub(crate) fn persist_config(&self) -> CommandResult {
        self.config_manager.save(&self.config)?;
        Ok(())
    }
}
