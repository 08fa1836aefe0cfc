// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! The step runtime: the `Engine` context every primitive reads and
//! mutates (spec §4.6, §9 Design Notes — "process-wide mutable globals
//! bundled into an explicit Engine context"), the step loader/registry
//! (§4.5), and `command()`'s subprocess execution (§4.6).

pub mod command;
pub mod engine;
pub mod log;
pub mod primitives;
pub mod step;

pub use command::{run_command, CommandOptions};
pub use engine::Engine;
pub use step::{Step, StepDoc, StepLoader, StepRegistry};
