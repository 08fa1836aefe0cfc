// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Detects the running OS and logs it. Facts gathered here are observed,
//! not persisted into the config model — the model is read-only after its
//! initial definition (spec §5), so this step's output only ever reaches
//! the run log and later steps' `c()` lookups of *pre-defined* config.

use agent_core::StepOutcome;
use agent_runtime::{Engine, Step, StepDoc};

pub struct OsDetection;

impl Step for OsDetection {
    fn run(&self, engine: &mut Engine) -> StepOutcome {
        match detect_os_release() {
            Some(os) => agent_runtime::log::l(engine, &format!("detected OS: {os}")),
            None => agent_runtime::log::w(engine, "could not detect OS from /etc/os-release"),
        }
        StepOutcome::Ok
    }

    fn doc(&self) -> Option<StepDoc> {
        Some(StepDoc {
            name: "os-detection",
            description: "Reads /etc/os-release and logs the detected OS's PRETTY_NAME. Purely observational; nothing it gathers is persisted into the config model.",
            options: &["none"],
            example: "rollforward --only os-detection -vv",
            copyright: "2026 Alfred Jean LLC",
        })
    }
}

fn detect_os_release() -> Option<String> {
    let contents = std::fs::read_to_string("/etc/os-release").ok()?;
    parse_pretty_name(&contents)
}

fn parse_pretty_name(contents: &str) -> Option<String> {
    contents.lines().find_map(|line| {
        let value = line.strip_prefix("PRETTY_NAME=")?;
        Some(value.trim_matches('"').to_string())
    })
}

#[cfg(test)]
#[path = "os_detection_tests.rs"]
mod tests;
