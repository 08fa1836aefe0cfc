// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! rollforward - host configuration agent

mod cli;
mod driver;
mod lock;
mod steps;

use clap::Parser;
use cli::Cli;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(&cli))))
        .with_target(false)
        .init();

    let registry = steps::build_registry();

    if !cli.step_help.is_empty() {
        print_step_help(&registry, &cli.step_help);
        std::process::exit(0);
    }

    match driver::run(&cli, &registry) {
        Ok(error_count) => std::process::exit(error_count.min(u8::MAX as u32) as i32),
        Err(err) => {
            tracing::error!(%err, "fatal initialization failure");
            std::process::exit(1);
        }
    }
}

fn default_filter(cli: &Cli) -> &'static str {
    match cli.verbosity() {
        0 => "error",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// `--step_help S`: prints documentation for matching step(s) instead of
/// running (spec §4.6 `StepHelp` control signal, §6). Extracts each
/// matching step's POD-style header and renders it to text.
fn print_step_help(registry: &agent_runtime::StepRegistry, patterns: &[String]) {
    for pattern in patterns {
        let matches = registry.matching(pattern);
        if matches.is_empty() {
            println!("No step matches {pattern:?}.");
            continue;
        }
        for (filename, step) in matches {
            match step.doc() {
                Some(doc) => println!("{}", doc.render()),
                None => println!("{filename} carries no documentation header."),
            }
        }
    }
}
