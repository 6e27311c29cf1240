//! Command line interface of `binder`.
//!
//! ```bash
//! # Bind the `db-credentials` secret into every container of a deployment
//! binder bind --name db --secret db-credentials --file deployment.yaml
//!
//! # Bind into a single container, reading the manifest from a pipe
//! kubectl get cronjob nightly -o yaml | binder bind -n db -s db-credentials -C report
//!
//! # Show what the engine sees in a manifest
//! binder inspect --file deployment.yaml
//! ```

mod bind;
pub mod error;
mod inspect;
mod internal;

use std::{io::Write, path::PathBuf};

use binder_base::{CLI_PROGRAM_NAME, PROJECT_VERSION};
use clap::{CommandFactory, Parser, Subcommand};
use snafu::ResultExt;

pub use self::error::Error;
use self::{bind::BindCommand, inspect::InspectCommand};
use crate::config::Config;

#[derive(Parser)]
#[command(
    name = CLI_PROGRAM_NAME,
    author,
    version = PROJECT_VERSION,
    about = "Binder: inject service binding credentials into Kubernetes workloads.",
    long_about = "Binder reads Kubernetes manifests, locates the pod template of each resource \
                  through a configurable mapping and mounts a Secret into its containers \
                  following the Service Binding specification. Any resource embedding a pod \
                  template is supported, including custom resources.",
    color = clap::ColorChoice::Always
)]
pub struct Cli {
    #[clap(subcommand)]
    commands: Option<Commands>,

    #[clap(
        long = "config",
        short = 'c',
        env = "BINDER_CONFIG_FILE_PATH",
        help = "Specify a configuration file. Defaults to ~/.config/binder/config.yaml or \
                BINDER_CONFIG_FILE_PATH env var."
    )]
    config_file: Option<PathBuf>,

    #[clap(
        long = "log-level",
        env = "BINDER_LOG_LEVEL",
        help = "Set the logging level (e.g., info, debug, trace)."
    )]
    log_level: Option<tracing::Level>,
}

#[derive(Clone, Subcommand)]
pub enum Commands {
    #[command(about = "Display version information")]
    Version,

    #[command(about = "Generate shell completion script for the specified shell (bash, zsh, fish)")]
    Completions { shell: clap_complete::Shell },

    #[command(about = "Output the default configuration in YAML format")]
    DefaultConfig,

    #[command(
        alias = "b",
        about = "Inject a service binding into every resource of a manifest and print the result"
    )]
    Bind(BindCommand),

    #[command(alias = "i", about = "Print the pod template located in every resource of a manifest")]
    Inspect(InspectCommand),
}

impl Default for Cli {
    fn default() -> Self { Self::parse() }
}

impl Cli {
    /// Loads the configuration file given on the command line, or the first
    /// one found in the default locations. Without any, the default
    /// configuration is used.
    fn load_config(&self) -> Result<Config, Error> {
        let mut config = match self.config_file.clone().or_else(Config::search_config_file_path) {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        if let Some(log_level) = self.log_level {
            config.log.level = log_level;
        }

        Ok(config)
    }

    pub fn run(self) -> Result<i32, Error> {
        match self.commands {
            Some(Commands::Version) => {
                let version = Self::command().render_long_version();
                std::io::stdout().write_all(version.as_bytes()).context(error::WriteStdoutSnafu)?;
                return Ok(0);
            }
            Some(Commands::Completions { shell }) => {
                let mut app = Self::command();
                let bin_name = app.get_name().to_string();
                clap_complete::generate(shell, &mut app, bin_name, &mut std::io::stdout());
                return Ok(0);
            }
            Some(Commands::DefaultConfig) => {
                let config = Config::default().to_yaml()?;
                std::io::stdout().write_all(config.as_bytes()).context(error::WriteStdoutSnafu)?;
                return Ok(0);
            }
            _ => {}
        }

        let config = self.load_config()?;
        config.log.registry();

        match self.commands {
            Some(Commands::Bind(cmd)) => cmd.run(&config)?,
            Some(Commands::Inspect(cmd)) => cmd.run(&config)?,
            _ => {
                let help = Self::command().render_long_help().ansi().to_string();
                std::io::stderr().write_all(help.as_bytes()).context(error::WriteStdoutSnafu)?;
                return Ok(-1);
            }
        }

        Ok(0)
    }
}
