//! Child window derivation from a parent's resolved boundaries.
//!
//! A child boundary is one of the parent's boundaries plus a signed offset.
//! There is no calendar search here: a configuration whose end lands at or
//! before its start is rejected rather than shifted across midnight.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use std::fmt;
use std::str::FromStr;

use super::Window;
use crate::constants::{REF_END, REF_START};

/// Which parent boundary a child boundary is measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reference {
    ParentStart,
    ParentEnd,
}

impl Reference {
    fn anchor(self, parent_start: DateTime<Utc>, parent_end: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            Reference::ParentStart => parent_start,
            Reference::ParentEnd => parent_end,
        }
    }
}

impl FromStr for Reference {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            REF_START => Ok(Reference::ParentStart),
            REF_END => Ok(Reference::ParentEnd),
            other => anyhow::bail!("Invalid reference '{other}': expected 'start' or 'end'"),
        }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reference::ParentStart => f.write_str("parent start"),
            Reference::ParentEnd => f.write_str("parent end"),
        }
    }
}

/// Configuration of a child window.
#[derive(Debug, Clone, PartialEq)]
pub struct ChildConfig {
    /// Identifier of the parent interval; opaque to the calculation.
    pub parent: String,
    pub start_ref: Reference,
    pub end_ref: Reference,
    pub start_offset: Duration,
    pub end_offset: Duration,
}

impl ChildConfig {
    /// A child that mirrors its parent: start from start, end from end, no
    /// offsets.
    pub fn new(parent: impl Into<String>) -> Self {
        Self {
            parent: parent.into(),
            start_ref: Reference::ParentStart,
            end_ref: Reference::ParentEnd,
            start_offset: Duration::zero(),
            end_offset: Duration::zero(),
        }
    }

    pub fn with_start(mut self, reference: Reference, offset: Duration) -> Self {
        self.start_ref = reference;
        self.start_offset = offset;
        self
    }

    pub fn with_end(mut self, reference: Reference, offset: Duration) -> Self {
        self.end_ref = reference;
        self.end_offset = offset;
        self
    }
}

/// Derive a child window from the parent's boundaries.
pub fn compute_child_window(
    parent_start: DateTime<Utc>,
    parent_end: DateTime<Utc>,
    config: &ChildConfig,
) -> Result<Window> {
    let start = config
        .start_ref
        .anchor(parent_start, parent_end)
        .checked_add_signed(config.start_offset)
        .with_context(|| format!("Start offset from {} is out of range", config.start_ref))?;
    let end = config
        .end_ref
        .anchor(parent_start, parent_end)
        .checked_add_signed(config.end_offset)
        .with_context(|| format!("End offset from {} is out of range", config.end_ref))?;

    if end <= start {
        anyhow::bail!(
            "Child window ends ({end}) at or before it starts ({start}); \
             check references ({} {:+}s, {} {:+}s)",
            config.start_ref,
            config.start_offset.num_seconds(),
            config.end_ref,
            config.end_offset.num_seconds()
        );
    }

    Ok(Window { start, end })
}
