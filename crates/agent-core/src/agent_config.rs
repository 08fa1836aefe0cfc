// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The agent's own local configuration file: a flat `key = value` map
//! (spec §3, §6) holding `base_url` and TLS material paths. Parsed once at
//! startup, rewritten only after all steps have completed (spec §3
//! Invariants), and round-trips identically up to key ordering (spec §8).

use crate::error::AgentError;
use std::collections::BTreeMap;
use std::path::Path;

/// Well-known keys plus an overflow bucket for anything else found in the
/// file, so round-tripping never drops an operator-set value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentConfig {
    pub base_url: Option<String>,
    pub client_certificate: Option<String>,
    pub client_certificate_key: Option<String>,
    pub ca_certificate: Option<String>,
    /// Any other `key = value` pairs, in file order.
    pub extra: BTreeMap<String, String>,
}

const WELL_KNOWN: &[&str] = &[
    "base_url",
    "client_certificate",
    "client_certificate_key",
    "ca_certificate",
];

impl AgentConfig {
    /// Parse `# comments` and blank lines are ignored; each remaining line
    /// must be `key = value`.
    pub fn parse(contents: &str) -> Result<Self, AgentError> {
        let mut cfg = AgentConfig::default();
        for (lineno, raw) in contents.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                return Err(AgentError::Config(format!(
                    "malformed config line {}: {raw:?}",
                    lineno + 1
                )));
            };
            let key = key.trim().to_string();
            let value = value.trim().to_string();
            cfg.set(&key, value);
        }
        Ok(cfg)
    }

    pub fn load(path: &Path) -> Result<Self, AgentError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AgentConfig::default()),
            Err(e) => Err(AgentError::LocalFile(format!(
                "reading {}: {e}",
                path.display()
            ))),
        }
    }

    pub fn set(&mut self, key: &str, value: String) {
        match key {
            "base_url" => self.base_url = Some(value),
            "client_certificate" => self.client_certificate = Some(value),
            "client_certificate_key" => self.client_certificate_key = Some(value),
            "ca_certificate" => self.ca_certificate = Some(value),
            other => {
                self.extra.insert(other.to_string(), value);
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        match key {
            "base_url" => self.base_url.as_deref(),
            "client_certificate" => self.client_certificate.as_deref(),
            "client_certificate_key" => self.client_certificate_key.as_deref(),
            "ca_certificate" => self.ca_certificate.as_deref(),
            other => self.extra.get(other).map(String::as_str),
        }
    }

    /// Render back to `key = value` lines, well-known keys first (in a
    /// fixed order) then `extra` in sorted order. Ordering is not required
    /// to match the source file byte-for-byte (spec §8 only requires
    /// identity "up to key ordering"), but is itself deterministic.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for key in WELL_KNOWN {
            if let Some(value) = self.get(key) {
                out.push_str(&format!("{key} = {value}\n"));
            }
        }
        for (key, value) in &self.extra {
            out.push_str(&format!("{key} = {value}\n"));
        }
        out
    }

    /// Write-temp + rename (spec §3 Invariants: partial writes must not
    /// corrupt the file).
    pub fn write_atomically(&self, path: &Path) -> Result<(), AgentError> {
        let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
        tmp_name.push(format!(".tmp.{}", std::process::id()));
        let tmp = path.with_file_name(tmp_name);
        std::fs::write(&tmp, self.render())
            .map_err(|e| AgentError::LocalFile(format!("writing {}: {e}", tmp.display())))?;
        std::fs::rename(&tmp, path)
            .map_err(|e| AgentError::LocalFile(format!("renaming {}: {e}", tmp.display())))?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "agent_config_tests.rs"]
mod tests;
