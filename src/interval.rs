//! Interval state: configuration plus the most recently computed window.
//!
//! [`Interval::update`] is the single entry point a host calls whenever it
//! wants the state refreshed: at startup, at each `next_transition_utc`, and
//! whenever a parent interval has been recalculated. The call dispatches on
//! the configured [`IntervalMode`], schedules the next transition, and
//! replaces the whole [`ComputedWindow`] in one assignment. A failed call
//! leaves the previous result in place.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::parent::ParentWindow;
use crate::time_spec::SolarEventSource;
use crate::window::{
    ChildConfig, RootConfig, Window, compute_child_window, compute_root_window, next_transition,
};

/// How an interval's boundaries are determined.
#[derive(Debug, Clone, PartialEq)]
pub enum IntervalMode {
    /// Boundaries resolved from clock times or solar events.
    Root(RootConfig),
    /// Boundaries derived from another interval's window.
    Child(ChildConfig),
}

impl IntervalMode {
    pub fn is_child(&self) -> bool {
        matches!(self, IntervalMode::Child(_))
    }
}

/// Immutable configuration of one interval.
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalConfig {
    pub name: String,
    pub mode: IntervalMode,
}

impl IntervalConfig {
    pub fn root(name: impl Into<String>, config: RootConfig) -> Self {
        Self {
            name: name.into(),
            mode: IntervalMode::Root(config),
        }
    }

    pub fn child(name: impl Into<String>, config: ChildConfig) -> Self {
        Self {
            name: name.into(),
            mode: IntervalMode::Child(config),
        }
    }
}

/// Inputs supplied by the host for one update.
#[derive(Clone, Copy)]
pub struct UpdateContext<'a> {
    pub now: DateTime<Utc>,
    /// Zone used by root intervals without a timezone override.
    pub default_timezone: Tz,
    /// Needed only when a root boundary is `sunrise` or `sunset`.
    pub solar: Option<&'a dyn SolarEventSource>,
    /// The parent's published window; needed only by child intervals.
    pub parent: Option<&'a ParentWindow>,
}

impl<'a> UpdateContext<'a> {
    pub fn new(now: DateTime<Utc>, default_timezone: Tz) -> Self {
        Self {
            now,
            default_timezone,
            solar: None,
            parent: None,
        }
    }

    pub fn with_solar(mut self, solar: &'a dyn SolarEventSource) -> Self {
        self.solar = Some(solar);
        self
    }

    pub fn with_parent(mut self, parent: &'a ParentWindow) -> Self {
        self.parent = Some(parent);
        self
    }
}

/// The result of a successful update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComputedWindow {
    pub window: Window,
    pub next_transition_utc: DateTime<Utc>,
    pub timezone_name: Option<String>,
}

/// One interval: configuration and its last computed window.
#[derive(Debug, Clone)]
pub struct Interval {
    config: IntervalConfig,
    computed: Option<ComputedWindow>,
}

impl Interval {
    pub fn new(config: IntervalConfig) -> Self {
        Self {
            config,
            computed: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn is_child(&self) -> bool {
        self.config.mode.is_child()
    }

    /// Identifier of the parent interval, for child intervals.
    pub fn parent_reference(&self) -> Option<&str> {
        match &self.config.mode {
            IntervalMode::Child(child) => Some(&child.parent),
            IntervalMode::Root(_) => None,
        }
    }

    pub fn computed(&self) -> Option<&ComputedWindow> {
        self.computed.as_ref()
    }

    pub fn resolved_start_utc(&self) -> Option<DateTime<Utc>> {
        self.computed.as_ref().map(|c| c.window.start)
    }

    pub fn resolved_end_utc(&self) -> Option<DateTime<Utc>> {
        self.computed.as_ref().map(|c| c.window.end)
    }

    pub fn next_transition_utc(&self) -> Option<DateTime<Utc>> {
        self.computed.as_ref().map(|c| c.next_transition_utc)
    }

    pub fn resolved_timezone_name(&self) -> Option<&str> {
        self.computed.as_ref()?.timezone_name.as_deref()
    }

    /// Whether the interval is active at `now`: `[start, end)`, and never
    /// before the first successful update.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.computed
            .as_ref()
            .is_some_and(|c| c.window.contains(now))
    }

    /// The window this interval publishes for its children.
    pub fn published_window(&self) -> Option<ParentWindow> {
        self.computed.as_ref().map(|c| ParentWindow {
            start_utc: c.window.start,
            end_utc: c.window.end,
            timezone_name: c.timezone_name.clone(),
        })
    }

    /// Recalculate the window and next transition for `ctx.now`.
    ///
    /// On success the computed state is replaced and returned. On failure the
    /// previous computed state is kept and the error describes the cause.
    pub fn update(&mut self, ctx: &UpdateContext<'_>) -> Result<&ComputedWindow> {
        let computed = self
            .calculate(ctx)
            .with_context(|| format!("Failed to update '{}'", self.config.name))?;

        log_debug!(
            "{}: {} to {}, next transition {}",
            self.config.name,
            computed.window.start,
            computed.window.end,
            computed.next_transition_utc
        );

        Ok(&*self.computed.insert(computed))
    }

    fn calculate(&self, ctx: &UpdateContext<'_>) -> Result<ComputedWindow> {
        let (window, timezone_name) = match &self.config.mode {
            IntervalMode::Root(root) => {
                let (tz, name) = root.resolve_timezone(ctx.default_timezone);
                let window = compute_root_window(ctx.now, tz, root, ctx.solar)?;
                (window, Some(name))
            }
            IntervalMode::Child(child) => {
                let parent = ctx.parent.ok_or_else(|| {
                    anyhow::anyhow!("Parent '{}' has no published window yet", child.parent)
                })?;
                let window = compute_child_window(parent.start_utc, parent.end_utc, child)?;
                (window, parent.timezone_name.clone())
            }
        };

        Ok(ComputedWindow {
            next_transition_utc: next_transition(ctx.now, &window),
            window,
            timezone_name,
        })
    }
}
