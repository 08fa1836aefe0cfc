// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Directory-listing parsers for the three formats spec §4.1 requires:
//! the agent's own "Rolloutd File Listing" table, and the two common HTML
//! directory-index styles (Apache, which prefixes each anchor with an
//! `<img>` icon tag, and Nginx, which emits bare anchors). Apache and
//! Nginx share one anchor-extraction code path since, once the `<img>` tag
//! is skipped over, both boil down to `<a href="name">name</a>` lines.

use agent_core::{AgentError, StepIndexEntry};
use std::collections::BTreeMap;

const NATIVE_MARKER: &str = "Rolloutd File Listing";

pub fn parse_index(body: &str) -> Result<Vec<StepIndexEntry>, AgentError> {
    if body.contains(NATIVE_MARKER) {
        return parse_native(body);
    }
    if body.to_ascii_lowercase().contains("<a href") {
        return Ok(parse_anchors(body));
    }
    Err(AgentError::Config(
        "directory listing matched none of the supported formats".to_string(),
    ))
}

/// Native format: a marker line, then a tab-separated header row naming at
/// least `filename`, `type`, `size`, `mtime`, `checksum`, then one
/// tab-separated row per entry. Unknown header columns are preserved
/// verbatim in `extra` (spec §9 Open Question).
fn parse_native(body: &str) -> Result<Vec<StepIndexEntry>, AgentError> {
    let mut lines = body.lines().skip_while(|l| !l.contains(NATIVE_MARKER));
    lines.next(); // consume the marker line itself

    let header_line = lines
        .by_ref()
        .find(|l| !l.trim().is_empty())
        .ok_or_else(|| AgentError::Config("native listing missing header row".to_string()))?;
    let headers: Vec<&str> = header_line.split('\t').map(str::trim).collect();
    if !headers.contains(&"filename") {
        return Err(AgentError::Config(
            "native listing header missing 'filename' column".to_string(),
        ));
    }

    let mut entries = Vec::new();
    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        let cols: Vec<&str> = line.split('\t').collect();
        let mut row: BTreeMap<&str, &str> = BTreeMap::new();
        for (i, h) in headers.iter().enumerate() {
            row.insert(h, cols.get(i).copied().unwrap_or(""));
        }
        let Some(filename) = row.get("filename").copied() else {
            continue;
        };
        if filename == "../" || filename.contains('?') {
            continue;
        }
        let is_dir = row.get("type").is_some_and(|t| *t == "dir")
            || filename.ends_with('/');
        let size = row.get("size").and_then(|s| s.parse().ok()).unwrap_or(0);
        let mtime = row.get("mtime").copied().unwrap_or("").to_string();
        let checksum = row.get("checksum").copied().unwrap_or("").to_string();
        let mut extra = BTreeMap::new();
        for (k, v) in &row {
            if !matches!(*k, "filename" | "type" | "size" | "mtime" | "checksum") {
                extra.insert(k.to_string(), v.to_string());
            }
        }
        entries.push(StepIndexEntry {
            filename: filename.to_string(),
            is_dir,
            size,
            mtime,
            checksum,
            extra,
        });
    }
    Ok(entries)
}

/// Extracts `<a href="name">` anchors, covering both Apache (which emits an
/// `<img ...>` icon before each anchor) and Nginx (which does not) listing
/// pages. `size`/`mtime`/`checksum` default to zero/empty per spec §4.1.
fn parse_anchors(body: &str) -> Vec<StepIndexEntry> {
    let mut entries = Vec::new();
    let lower = body.to_ascii_lowercase();
    let mut search_from = 0usize;
    while let Some(rel) = lower[search_from..].find("<a href=") {
        let start = search_from + rel;
        let after = &body[start + "<a href=".len()..];
        let quote = after.chars().next();
        let (name, consumed) = match quote {
            Some(q) if q == '"' || q == '\'' => {
                let rest = &after[1..];
                match rest.find(q) {
                    Some(end) => (&rest[..end], 1 + end + 1),
                    None => break,
                }
            }
            _ => {
                // unquoted href, terminated by '>'
                match after.find('>') {
                    Some(end) => (&after[..end], end + 1),
                    None => break,
                }
            }
        };
        search_from = start + "<a href=".len() + consumed;

        if name != "../" && !name.contains('?') && !name.is_empty() {
            entries.push(StepIndexEntry {
                filename: name.to_string(),
                is_dir: name.ends_with('/'),
                size: 0,
                mtime: String::new(),
                checksum: String::new(),
                extra: BTreeMap::new(),
            });
        }
    }
    entries
}

#[cfg(test)]
#[path = "listing_tests.rs"]
mod tests;
