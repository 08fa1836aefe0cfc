// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The conventional first step (spec §4.7 RUN_SETUP): establishes the host
//! root device if the run hasn't defined one yet, so every later step has
//! an entity to hang `c()`/`i_*` lookups off of.

use agent_core::StepOutcome;
use agent_runtime::{Engine, Step, StepDoc};
use indexmap::IndexMap;

pub struct Setup;

impl Step for Setup {
    fn run(&self, engine: &mut Engine) -> StepOutcome {
        agent_runtime::log::l(engine, &format!("setup: host={}", engine.hostname));

        if engine.config.entity(&engine.hostname).is_none() {
            if let Err(err) = engine.config.device(engine.hostname.clone(), IndexMap::new()) {
                return StepOutcome::Err(err);
            }
        }
        StepOutcome::Ok
    }

    fn doc(&self) -> Option<StepDoc> {
        Some(StepDoc {
            name: "setup",
            description: "Defines the host root device entity if the run hasn't already defined one, so later steps always have an entity to hang c()/i_* lookups off of.",
            options: &["none"],
            example: "rollforward --only setup",
            copyright: "2026 Alfred Jean LLC",
        })
    }
}

#[cfg(test)]
#[path = "setup_tests.rs"]
mod tests;
