// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The terminal step (spec §5 Cancellation: "the driver pops and re-queues
//! only the final remaining step... at priority 0 so that cleanup hooks
//! still run"). This step has no side effects of its own beyond logging —
//! it exists as the hook other config can layer cleanup onto via
//! `queue_step("complete")`.

use agent_core::StepOutcome;
use agent_runtime::{Engine, Step, StepDoc};

pub struct Complete;

impl Step for Complete {
    fn run(&self, engine: &mut Engine) -> StepOutcome {
        agent_runtime::log::l(engine, "run complete");
        StepOutcome::Ok
    }

    fn doc(&self) -> Option<StepDoc> {
        Some(StepDoc {
            name: "complete",
            description: "The terminal step. Re-queued at priority 0 on cancellation so cleanup hooks still run; has no side effects of its own beyond logging.",
            options: &["none"],
            example: "queue_step(\"complete\")",
            copyright: "2026 Alfred Jean LLC",
        })
    }
}

#[cfg(test)]
#[path = "complete_tests.rs"]
mod tests;
