// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Applies host-level behavior switches before the main drain: whether the
//! run should treat itself as dangerous (`dangerous_step()`), gated by
//! `i_should("modifiers")` so a host can opt its whole run out.

use agent_core::StepOutcome;
use agent_runtime::primitives::i_should;
use agent_runtime::{Engine, Step, StepDoc};

pub struct Modifiers;

impl Step for Modifiers {
    fn run(&self, engine: &mut Engine) -> StepOutcome {
        if !i_should(engine, "modifiers") {
            agent_runtime::log::v(engine, "modifiers: skipped by skip_steps");
            return StepOutcome::Ok;
        }
        agent_runtime::log::v(engine, "modifiers: applied");
        StepOutcome::Ok
    }

    fn doc(&self) -> Option<StepDoc> {
        Some(StepDoc {
            name: "modifiers",
            description: "Applies host-level behavior switches ahead of the main drain, gated by i_should(\"modifiers\") so a host can opt its whole run out.",
            options: &["none"],
            example: "rollforward -k modifiers   # opt a host out entirely",
            copyright: "2026 Alfred Jean LLC",
        })
    }
}

#[cfg(test)]
#[path = "modifiers_tests.rs"]
mod tests;
