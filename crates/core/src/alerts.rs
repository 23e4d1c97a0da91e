//! Project risk classification for the dashboard alert feed.
//!
//! Each open project gets at most one [`AlertKind`], chosen by a fixed
//! precedence: overdue, then critical health, then at-risk, then stale.

use std::cmp::Ordering;

use serde::Serialize;

use crate::types::{Date, Timestamp};
use crate::vocab::{HEALTH_RED, PROJECT_STATUS_CANCELLED, PROJECT_STATUS_COMPLETED};

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

/// A project due within this many days is a candidate for [`AlertKind::AtRisk`].
pub const AT_RISK_WINDOW_DAYS: i64 = 15;

/// Completion below which a project close to its deadline is at risk.
pub const AT_RISK_COMPLETION_PCT: i32 = 80;

/// A project still at 0% after this many days is [`AlertKind::Stale`].
pub const STALE_AFTER_DAYS: i64 = 30;

/// Projects at or above this completion count as nearly done in KPIs.
pub const NEARLY_DONE_PCT: i32 = 90;

/// Window used by the report attention list.
pub const ATTENTION_WINDOW_DAYS: i64 = 30;

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    Overdue,
    HealthCritical,
    AtRisk,
    Stale,
}

impl AlertKind {
    /// Precedence rank, lower sorts first.
    pub fn rank(&self) -> u8 {
        match self {
            Self::Overdue => 1,
            Self::HealthCritical => 2,
            Self::AtRisk => 3,
            Self::Stale => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Overdue => "overdue",
            Self::HealthCritical => "health_critical",
            Self::AtRisk => "at_risk",
            Self::Stale => "stale",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::Overdue => "Target end date has passed",
            Self::HealthCritical => "Project health is red",
            Self::AtRisk => "Deadline is close and completion is below target",
            Self::Stale => "No progress recorded since creation",
        }
    }
}

/// The project fields the classifier looks at.
#[derive(Debug, Clone)]
pub struct RiskInput<'a> {
    pub status_code: &'a str,
    pub health: &'a str,
    pub completion_pct: i32,
    pub target_end_date: Option<Date>,
    pub created_at: Timestamp,
}

/// Whole days from `today` to `target`; negative once the date has passed.
pub fn days_remaining(target: Option<Date>, today: Date) -> Option<i64> {
    target.map(|t| (t - today).num_days())
}

/// Classify one project. Completed and cancelled projects never alert.
pub fn classify(input: &RiskInput<'_>, today: Date) -> Option<AlertKind> {
    if matches!(
        input.status_code,
        PROJECT_STATUS_COMPLETED | PROJECT_STATUS_CANCELLED
    ) {
        return None;
    }

    let remaining = days_remaining(input.target_end_date, today);

    if matches!(remaining, Some(d) if d < 0) {
        return Some(AlertKind::Overdue);
    }
    if input.health == HEALTH_RED {
        return Some(AlertKind::HealthCritical);
    }
    if matches!(remaining, Some(d) if d <= AT_RISK_WINDOW_DAYS)
        && input.completion_pct < AT_RISK_COMPLETION_PCT
    {
        return Some(AlertKind::AtRisk);
    }
    let age = (today - input.created_at.date_naive()).num_days();
    if input.completion_pct == 0 && age > STALE_AFTER_DAYS {
        return Some(AlertKind::Stale);
    }
    None
}

/// Alert ordering: precedence rank, then days remaining ascending with
/// undated projects last.
pub fn compare_alerts(a: (AlertKind, Option<i64>), b: (AlertKind, Option<i64>)) -> Ordering {
    a.0.rank().cmp(&b.0.rank()).then_with(|| match (a.1, b.1) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    })
}

/// Sort any alert rows in place by [`compare_alerts`].
pub fn sort_alerts<T, F>(items: &mut [T], key: F)
where
    F: Fn(&T) -> (AlertKind, Option<i64>),
{
    items.sort_by(|a, b| compare_alerts(key(a), key(b)));
}
