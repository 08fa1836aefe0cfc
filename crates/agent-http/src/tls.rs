// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! TLS trust material resolution (spec §4.1): client certificate/key and CA
//! certificate paths, resolved relative to the agent's `configdir`, with
//! optional per-host overrides.

use agent_core::AgentError;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default)]
pub struct TlsConfig {
    pub configdir: PathBuf,
    pub client_certificate: Option<String>,
    pub client_certificate_key: Option<String>,
    pub ca_certificate: Option<String>,
}

impl TlsConfig {
    fn resolve(&self, path: &str) -> PathBuf {
        let p = Path::new(path);
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.configdir.join(p)
        }
    }

    /// Builds a `reqwest::Identity` (client cert + key, PEM-bundled) for
    /// mutual TLS, if both paths are configured.
    pub fn identity(&self) -> Result<Option<reqwest::Identity>, AgentError> {
        let (Some(cert), Some(key)) = (&self.client_certificate, &self.client_certificate_key)
        else {
            return Ok(None);
        };
        let cert_path = self.resolve(cert);
        let key_path = self.resolve(key);
        let mut pem = std::fs::read(&cert_path).map_err(|e| {
            AgentError::LocalFile(format!("reading client cert {}: {e}", cert_path.display()))
        })?;
        let mut key_bytes = std::fs::read(&key_path).map_err(|e| {
            AgentError::LocalFile(format!("reading client key {}: {e}", key_path.display()))
        })?;
        pem.append(&mut key_bytes);
        reqwest::Identity::from_pem(&pem)
            .map(Some)
            .map_err(|e| AgentError::Config(format!("invalid client identity: {e}")))
    }

    pub fn ca_certificate(&self) -> Result<Option<reqwest::Certificate>, AgentError> {
        let Some(ca) = &self.ca_certificate else {
            return Ok(None);
        };
        let path = self.resolve(ca);
        let pem = std::fs::read(&path).map_err(|e| {
            AgentError::LocalFile(format!("reading CA cert {}: {e}", path.display()))
        })?;
        reqwest::Certificate::from_pem(&pem)
            .map(Some)
            .map_err(|e| AgentError::Config(format!("invalid CA certificate: {e}")))
    }
}

#[cfg(test)]
#[path = "tls_tests.rs"]
mod tests;
