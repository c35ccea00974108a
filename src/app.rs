use crate::cli::{Cli, OutputMode};
use crate::config::{self, PruneConfig};
use crate::error::Result;

pub struct AppContext {
    pub config: PruneConfig,
    pub output_mode: OutputMode,
    pub quiet: bool,
}

impl AppContext {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        Self::from_cli_with(cli, |key| std::env::var(key).ok())
    }

    /// Same as [`AppContext::from_cli`] with an explicit environment lookup.
    pub fn from_cli_with(cli: &Cli, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = cli.to_config()?;
        config.apply_overrides_from(&lookup)?;

        let robot = cli.robot || config::env_bool(&lookup, config::ENV_ROBOT)?.unwrap_or(false);
        let output_mode = if robot {
            OutputMode::Robot
        } else {
            cli.output_mode()
        };

        Ok(Self {
            config,
            output_mode,
            quiet: cli.quiet,
        })
    }
}
