// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! The configuration model (spec §4.3): multi-inheritance `device`/`class`
//! entities, path-style lookup (`c()`), the `i_*` inheritance predicates,
//! and the per-step schema validator (spec §4.4).

mod cache;
mod lookup;
mod model;
mod network;
mod validator;

pub use cache::LookupCache;
pub use lookup::{i_has, i_iterate, i_isa, lookup_all, lookup_one, Hit};
pub use model::ConfigModel;
pub use network::NetworkTable;
pub use validator::{validate, Schema, ValidationError};
