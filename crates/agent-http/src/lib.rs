// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! The HTTP client (spec §4.1): fetches step/module source and directory
//! indexes over HTTP/HTTPS, with optional mutual TLS, and atomic-rename
//! semantics for anything written to disk.

mod listing;
mod tls;

pub use listing::parse_index;
pub use tls::TlsConfig;

use agent_core::{AgentError, StepIndexEntry};
use std::io::Write as _;
use std::path::Path;

/// Thin wrapper over a `reqwest::blocking::Client` configured for the
/// agent's TLS trust material (spec §4.1: "TLS trust material is resolved
/// relative to the configured `configdir`").
pub struct HttpClient {
    client: reqwest::blocking::Client,
}

impl HttpClient {
    pub fn new(tls: &TlsConfig) -> Result<Self, AgentError> {
        let mut builder = reqwest::blocking::Client::builder();
        if let Some(identity) = tls.identity()? {
            builder = builder.identity(identity);
        }
        if let Some(ca) = tls.ca_certificate()? {
            builder = builder.add_root_certificate(ca);
        }
        let client = builder
            .build()
            .map_err(|e| AgentError::Http(format!("building HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// GETs `url` and returns the body bytes.
    pub fn fetch(&self, url: &str) -> Result<Vec<u8>, AgentError> {
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| AgentError::Http(format!("GET {url}: {e}")))?;
        if !resp.status().is_success() {
            return Err(AgentError::Http(format!(
                "GET {url}: HTTP {}",
                resp.status()
            )));
        }
        resp.bytes()
            .map(|b| b.to_vec())
            .map_err(|e| AgentError::Http(format!("reading body of {url}: {e}")))
    }

    /// GETs `url` and streams the body to `dest` atomically: write to
    /// `<dest>.<pid>`, fsync/close, then rename to `dest` on success.
    ///
    /// A zero-byte body over a non-empty existing destination is refused
    /// (spec §4.1's guard against silent truncation); the temp file is
    /// removed and the original destination is left untouched in every
    /// failure path.
    pub fn fetch_to(&self, url: &str, dest: &Path) -> Result<(), AgentError> {
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| AgentError::Http(format!("GET {url}: {e}")))?;
        if !resp.status().is_success() {
            return Err(AgentError::Http(format!(
                "GET {url}: HTTP {}",
                resp.status()
            )));
        }
        let body = resp
            .bytes()
            .map_err(|e| AgentError::Http(format!("reading body of {url}: {e}")))?;
        write_atomic(dest, &body)
    }

    /// GETs a directory URL and parses one of the three supported listing
    /// formats (spec §4.1).
    pub fn index(&self, url: &str) -> Result<Vec<StepIndexEntry>, AgentError> {
        let body = self.fetch(url)?;
        let text = String::from_utf8_lossy(&body);
        parse_index(&text)
    }
}

/// Write `body` to `dest` atomically: write to `<dest>.<pid>`, fsync,
/// rename. Refuses to overwrite a non-empty `dest` with an empty body
/// (spec §4.1), leaving `dest` untouched and the temp file removed on any
/// failure path.
fn write_atomic(dest: &Path, body: &[u8]) -> Result<(), AgentError> {
    let existing_nonempty = dest.metadata().map(|m| m.len() > 0).unwrap_or(false);
    if body.is_empty() && existing_nonempty {
        return Err(AgentError::Http(
            "Not overwriting existing file with nothing".to_string(),
        ));
    }

    let mut tmp_name = dest.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(format!(".{}", std::process::id()));
    let tmp = dest.with_file_name(tmp_name);
    let write_result = (|| -> std::io::Result<()> {
        let mut f = std::fs::File::create(&tmp)?;
        f.write_all(body)?;
        f.sync_all()?;
        Ok(())
    })();
    if let Err(e) = write_result {
        let _ = std::fs::remove_file(&tmp);
        return Err(AgentError::Http(format!("writing {}: {e}", tmp.display())));
    }
    if let Err(e) = std::fs::rename(&tmp, dest) {
        let _ = std::fs::remove_file(&tmp);
        return Err(AgentError::Http(format!("renaming {}: {e}", tmp.display())));
    }
    Ok(())
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
