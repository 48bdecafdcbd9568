//! Core domain types for quitlog.
//!
//! This module defines the plain data the tracker is built from:
//! - Questionnaire answers (sex, plan, prior durations)
//! - Time segments of the smoking/abstaining timeline
//! - The persisted user record

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Price of one cigarette: a 5000-unit pack of 20, truncated.
pub const CIGARETTE_PRICE: i64 = 5000 / 20;

// ============================================================================
// Questionnaire Types
// ============================================================================

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
}

/// What the user intends to do when the profile is created
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Plan {
    /// Quit from this moment on
    StartAbstention,
    /// Not ready yet; keep counting the cost
    KeepSmoking,
    /// Already quit some time ago
    AlreadyAbstaining,
}

/// Answers collected by the questionnaire.
///
/// Consumed once to seed the timeline and never stored.
#[derive(Clone, Debug, PartialEq)]
pub struct InputProfile {
    pub sex: Sex,
    pub birth_day: NaiveDateTime,
    pub plan: Plan,
    pub cigarettes_per_day: u32,
    pub smoking_duration: Duration,
    pub non_smoking_duration: Duration,
}

// ============================================================================
// Timeline Types
// ============================================================================

/// One stretch of time spent either smoking or abstaining.
///
/// `end_time` is `None` only for the most recent segment.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeSegment {
    pub smoking: bool,
    pub start_time: NaiveDateTime,
    #[serde(default)]
    pub end_time: Option<NaiveDateTime>,
    /// Money withdrawn from savings during this (abstaining) segment
    #[serde(default)]
    pub spent: i64,
}

impl TimeSegment {
    pub fn open(smoking: bool, start_time: NaiveDateTime) -> Self {
        Self {
            smoking,
            start_time,
            end_time: None,
            spent: 0,
        }
    }

    pub fn is_open(&self) -> bool {
        self.end_time.is_none()
    }

    /// Length of the segment, measured up to `now` while it is still open
    pub fn duration_until(&self, now: NaiveDateTime) -> Duration {
        self.end_time.unwrap_or(now) - self.start_time
    }
}

/// Everything needed to rebuild a profile: the static attributes plus
/// the full timeline.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct UserRecord {
    pub sex: Sex,
    pub birth_day: NaiveDateTime,
    pub cigarettes_per_day: u32,
    pub segments: Vec<TimeSegment>,
}
