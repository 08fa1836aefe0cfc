// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI flag table (spec §6), mapped 1:1 onto a `clap` derive struct the way
//! the originating workspace's own CLI crate parses its flags.

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "rollforward",
    version,
    disable_help_flag = true,
    about = "Fetches and runs host configuration steps from a remote index"
)]
pub struct Cli {
    /// Usage.
    #[arg(short = '?', long = "help", action = clap::ArgAction::Help)]
    pub help: Option<bool>,

    /// Increase verbosity (repeatable).
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Verbosity 0 (errors only).
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,

    /// Skip all command() side effects; still log what would run.
    #[arg(short = 's', long = "safe_mode")]
    pub safe_mode: bool,

    /// Imply --safe_mode and --no_step_labels; run only validate_config
    /// blocks; exit code = error count.
    #[arg(long = "validate")]
    pub validate: bool,

    /// Override base_url.
    #[arg(short = 'u', long = "url", value_name = "URL")]
    pub url: Option<String>,

    /// Skip step matching ^\d*-?S$. Repeatable.
    #[arg(short = 'k', long = "skip_step", value_name = "S")]
    pub skip_step: Vec<String>,

    /// Only run matching steps. Repeatable. Auto-includes setup,
    /// os-detection, modifiers, complete.
    #[arg(short = 'o', long = "only", value_name = "S")]
    pub only: Vec<String>,

    /// Allow step S to run even if marked dangerous. Repeatable.
    #[arg(short = 'f', long = "force", value_name = "S")]
    pub force: Vec<String>,

    /// Treat H as the host root device.
    #[arg(short = 'h', long = "hostname", value_name = "H")]
    pub hostname: Option<String>,

    /// Directory for local config and TLS material (default /etc/<agent>).
    #[arg(long = "configdir", value_name = "PATH")]
    pub configdir: Option<PathBuf>,

    /// Config file within configdir (or absolute).
    #[arg(long = "configfile", value_name = "FILE")]
    pub configfile: Option<PathBuf>,

    /// Suppress per-step header lines.
    #[arg(long = "no_step_labels")]
    pub no_step_labels: bool,

    /// Print documentation for step(s) matching S; repeatable.
    #[arg(short = 'H', long = "step_help", value_name = "S")]
    pub step_help: Vec<String>,

    /// Positional comment words, joined for logging only.
    #[arg(trailing_var_arg = true)]
    pub comment: Vec<String>,
}

impl Cli {
    /// Resolves `--verbose`/`--quiet` into the engine's single verbosity
    /// level: `--quiet` wins outright, otherwise `1 + verbose_count`.
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            1 + self.verbose
        }
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
