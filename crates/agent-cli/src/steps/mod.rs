// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Compiled-in step bodies (Design Notes approach (b)): the four steps
//! `--only` always includes (`setup`, `os-detection`, `modifiers`,
//! `complete`) plus a registry builder wiring them to their index
//! filenames.

mod complete;
mod modifiers;
mod os_detection;
mod setup;

use agent_runtime::StepRegistry;
use std::sync::Arc;

pub fn build_registry() -> StepRegistry {
    let mut registry = StepRegistry::new();
    registry.register("000-setup", Arc::new(setup::Setup));
    registry.register("010-os-detection", Arc::new(os_detection::OsDetection));
    registry.register("020-modifiers", Arc::new(modifiers::Modifiers));
    registry.register("999-complete", Arc::new(complete::Complete));
    registry
}
