//! The user profile and its smoking/abstaining state machine.
//!
//! A profile is static attributes plus a [`Timeline`]. Everything that
//! depends on "now" (age, elapsed time, savings) is derived on demand
//! from the injected [`Clock`] and never stored.

use crate::input::age_on;
use crate::{
    Clock, Error, InputProfile, Plan, Result, Sex, TimeSegment, Timeline, UserRecord,
    CIGARETTE_PRICE,
};
use chrono::{Duration, NaiveDateTime};

const MILLIS_PER_DAY: f64 = 86_400_000.0;

pub struct UserData<C: Clock> {
    clock: C,
    sex: Sex,
    birth_day: NaiveDateTime,
    cigarettes_per_day: u32,
    cigarette_price: i64,
    timeline: Timeline,
}

impl<C: Clock> UserData<C> {
    /// Build a fresh profile from questionnaire answers.
    ///
    /// `AlreadyAbstaining` seeds only the abstaining segment; the prior
    /// smoking duration is not turned into a closed smoking segment.
    /// A prior duration reaching past the representable calendar is an
    /// [`Error::Input`].
    pub fn from_input(clock: C, input: &InputProfile) -> Result<Self> {
        let now = clock.now();
        let backdate = |duration: Duration| {
            now.checked_sub_signed(duration).ok_or_else(|| {
                Error::Input(format!("a duration of {} days is too long", duration.num_days()))
            })
        };
        let timeline = match input.plan {
            Plan::StartAbstention => Timeline::start(false, now),
            Plan::KeepSmoking => Timeline::start(true, backdate(input.smoking_duration)?),
            Plan::AlreadyAbstaining => {
                Timeline::start(false, backdate(input.non_smoking_duration)?)
            }
        };

        tracing::debug!(
            "Created profile with plan {:?}, timeline starts {} at {}",
            input.plan,
            if timeline.last().smoking {
                "smoking"
            } else {
                "abstaining"
            },
            timeline.last().start_time
        );

        Ok(Self {
            clock,
            sex: input.sex,
            birth_day: input.birth_day,
            cigarettes_per_day: input.cigarettes_per_day,
            cigarette_price: CIGARETTE_PRICE,
            timeline,
        })
    }

    /// Rebuild a profile from a stored record.
    ///
    /// The stored segments are adopted as-is after validation. A record
    /// whose last segment is already closed gets a new open segment of
    /// the opposite state starting now.
    pub fn from_record(clock: C, record: UserRecord) -> Result<Self> {
        let timeline = Timeline::from_segments(record.segments, clock.now())?;
        tracing::debug!("Loaded profile with {} segments", timeline.len());

        Ok(Self {
            clock,
            sex: record.sex,
            birth_day: record.birth_day,
            cigarettes_per_day: record.cigarettes_per_day,
            cigarette_price: CIGARETTE_PRICE,
            timeline,
        })
    }

    /// Override the per-cigarette price used for savings.
    pub fn with_cigarette_price(mut self, price: i64) -> Self {
        self.cigarette_price = price;
        self
    }

    pub fn sex(&self) -> Sex {
        self.sex
    }

    pub fn birth_day(&self) -> NaiveDateTime {
        self.birth_day
    }

    pub fn cigarettes_per_day(&self) -> u32 {
        self.cigarettes_per_day
    }

    pub fn cigarette_price(&self) -> i64 {
        self.cigarette_price
    }

    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    pub fn segments(&self) -> &[TimeSegment] {
        self.timeline.segments()
    }

    pub fn last_segment(&self) -> &TimeSegment {
        self.timeline.last()
    }

    pub fn is_smoking(&self) -> bool {
        self.last_segment().smoking
    }

    /// Whole calendar years since the birthday
    pub fn age(&self) -> i32 {
        age_on(self.birth_day.date(), self.clock.now().date())
    }

    fn elapsed(&self) -> Duration {
        self.clock.now() - self.last_segment().start_time
    }

    /// Time since the current smoking stretch began; zero while abstaining
    pub fn smoking_duration(&self) -> Duration {
        if self.is_smoking() {
            self.elapsed()
        } else {
            Duration::zero()
        }
    }

    /// Time since the current abstention began; zero while smoking
    pub fn non_smoking_duration(&self) -> Duration {
        if self.is_smoking() {
            Duration::zero()
        } else {
            self.elapsed()
        }
    }

    /// Money saved (positive) or burnt (negative) in the current segment.
    ///
    /// Computed over fractional days and truncated toward zero before the
    /// segment's spending is subtracted. Saturates at the `i64` bounds.
    pub fn saving(&self) -> i64 {
        let daily = self
            .cigarette_price
            .saturating_mul(i64::from(self.cigarettes_per_day)) as f64;
        let amount = if self.is_smoking() {
            -daily * fractional_days(self.smoking_duration())
        } else {
            daily * fractional_days(self.non_smoking_duration())
        };

        (amount as i64).saturating_sub(self.last_segment().spent)
    }

    /// Stop smoking now.
    pub fn start_abstention(&mut self) -> Result<()> {
        let now = self.clock.now();
        self.timeline.transition(false, now)
    }

    /// Give up the abstention and go back to smoking now.
    pub fn relapse(&mut self) -> Result<()> {
        let now = self.clock.now();
        self.timeline.transition(true, now)
    }

    /// Withdraw `amount` from savings. Returns `false` while smoking.
    pub fn spend(&mut self, amount: i64) -> bool {
        self.timeline.spend(amount)
    }

    /// Snapshot for persistence
    pub fn to_record(&self) -> UserRecord {
        UserRecord {
            sex: self.sex,
            birth_day: self.birth_day,
            cigarettes_per_day: self.cigarettes_per_day,
            segments: self.timeline.segments().to_vec(),
        }
    }
}

fn fractional_days(duration: Duration) -> f64 {
    duration.num_milliseconds() as f64 / MILLIS_PER_DAY
}
