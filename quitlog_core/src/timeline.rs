//! Append-only smoking/abstaining timeline.
//!
//! The segment list is private so the only ways to grow it are
//! [`Timeline::transition`] and the validating constructors. That keeps
//! three rules structural rather than conventional:
//! - exactly one open segment, always the last one
//! - segments are chronological and never overlap
//! - neighbouring segments alternate between smoking and abstaining

use crate::{Error, Result, TimeSegment};
use chrono::NaiveDateTime;
use serde::Serialize;

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Timeline {
    segments: Vec<TimeSegment>,
}

impl Timeline {
    /// A timeline with a single open segment
    pub fn start(smoking: bool, at: NaiveDateTime) -> Self {
        Self {
            segments: vec![TimeSegment::open(smoking, at)],
        }
    }

    /// Adopt previously stored segments.
    ///
    /// If the stored timeline has no open segment (it was saved right
    /// after the last one was closed) a segment of the opposite state is
    /// opened at `now`.
    pub fn from_segments(segments: Vec<TimeSegment>, now: NaiveDateTime) -> Result<Self> {
        validate(&segments)?;

        let mut timeline = Self { segments };
        let last = timeline.last().clone();
        if let Some(end) = last.end_time {
            if now < end {
                return Err(Error::Record(format!(
                    "last segment ends at {} which is after the current time {}",
                    end, now
                )));
            }
            tracing::info!(
                "Stored timeline has no open segment, opening {} segment at {}",
                state_name(!last.smoking),
                now
            );
            timeline.segments.push(TimeSegment::open(!last.smoking, now));
        }

        Ok(timeline)
    }

    pub fn segments(&self) -> &[TimeSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The open segment
    pub fn last(&self) -> &TimeSegment {
        // Constructors never produce an empty timeline.
        &self.segments[self.segments.len() - 1]
    }

    fn last_mut(&mut self) -> &mut TimeSegment {
        let idx = self.segments.len() - 1;
        &mut self.segments[idx]
    }

    /// Close the open segment at `now` and open one with the given state.
    ///
    /// Fails without touching the timeline if the user is already in
    /// that state.
    pub fn transition(&mut self, smoking: bool, now: NaiveDateTime) -> Result<()> {
        if self.last().smoking == smoking {
            return Err(Error::Transition { smoking });
        }

        self.last_mut().end_time = Some(now);
        self.segments.push(TimeSegment::open(smoking, now));
        tracing::debug!(
            "Timeline transitioned to {} at {} ({} segments)",
            state_name(smoking),
            now,
            self.segments.len()
        );
        Ok(())
    }

    /// Record money spent out of savings.
    ///
    /// Only allowed while abstaining, and only while the segment total
    /// still fits in an `i64`; returns `false` without mutating otherwise.
    pub fn spend(&mut self, amount: i64) -> bool {
        if self.last().smoking {
            return false;
        }

        let Some(total) = self.last().spent.checked_add(amount) else {
            tracing::warn!(
                "Refusing spend of {}: segment total {} would overflow",
                amount,
                self.last().spent
            );
            return false;
        };
        self.last_mut().spent = total;
        tracing::debug!("Spent {} (segment total {})", amount, self.last().spent);
        true
    }

    pub fn into_segments(self) -> Vec<TimeSegment> {
        self.segments
    }
}

fn state_name(smoking: bool) -> &'static str {
    if smoking {
        "smoking"
    } else {
        "abstaining"
    }
}

fn validate(segments: &[TimeSegment]) -> Result<()> {
    if segments.is_empty() {
        return Err(Error::Record("timeline has no segments".into()));
    }

    let last_idx = segments.len() - 1;
    for (idx, segment) in segments.iter().enumerate() {
        match segment.end_time {
            Some(end) if end < segment.start_time => {
                return Err(Error::Record(format!(
                    "segment {} ends before it starts",
                    idx
                )));
            }
            None if idx != last_idx => {
                return Err(Error::Record(format!(
                    "segment {} is open but is not the last segment",
                    idx
                )));
            }
            _ => {}
        }

        if segment.spent < 0 {
            return Err(Error::Record(format!("segment {} has negative spend", idx)));
        }
        if segment.smoking && segment.spent != 0 {
            return Err(Error::Record(format!(
                "segment {} records spending while smoking",
                idx
            )));
        }
    }

    for (idx, pair) in segments.windows(2).enumerate() {
        let (prev, next) = (&pair[0], &pair[1]);
        if prev.smoking == next.smoking {
            return Err(Error::Record(format!(
                "segments {} and {} are both {}",
                idx,
                idx + 1,
                state_name(prev.smoking)
            )));
        }
        // prev is closed here; only the last segment may be open
        if let Some(end) = prev.end_time {
            if next.start_time < end {
                return Err(Error::Record(format!(
                    "segment {} starts before segment {} ends",
                    idx + 1,
                    idx
                )));
            }
        }
    }

    Ok(())
}
