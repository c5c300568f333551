//! Venue wall-clock rules: bar boundaries, the daily reset, the post-open
//! blackout window.
//!
//! Every input is a zone-aware timestamp and is converted to the venue zone
//! before any calendar comparison, so callers cannot mix naive and aware times.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

#[derive(Debug, Clone, PartialEq)]
pub struct SessionClock {
    pub venue_tz: Tz,
    pub reset_time: NaiveTime,
    pub session_open: NaiveTime,
    pub blackout_minutes: u32,
}

/// Whole minutes elapsed from `period_start` to `now`. Negative when `now`
/// precedes the anchor.
pub fn elapsed_minutes<A: TimeZone, B: TimeZone>(
    now: &DateTime<A>,
    period_start: &DateTime<B>,
) -> i64 {
    (now.with_timezone(&Utc) - period_start.with_timezone(&Utc)).num_minutes()
}

/// True once at least one full period has elapsed since `period_start`.
pub fn is_bar_boundary<A: TimeZone, B: TimeZone>(
    now: &DateTime<A>,
    period_start: &DateTime<B>,
    duration_minutes: u32,
) -> bool {
    if duration_minutes == 0 {
        return false;
    }
    elapsed_minutes(now, period_start) >= i64::from(duration_minutes)
}

impl SessionClock {
    pub fn new(
        venue_tz: Tz,
        reset_time: NaiveTime,
        session_open: NaiveTime,
        blackout_minutes: u32,
    ) -> Self {
        SessionClock {
            venue_tz,
            reset_time,
            session_open,
            blackout_minutes,
        }
    }

    pub fn to_venue<T: TimeZone>(&self, now: &DateTime<T>) -> DateTime<Tz> {
        now.with_timezone(&self.venue_tz)
    }

    pub fn local_date<T: TimeZone>(&self, now: &DateTime<T>) -> NaiveDate {
        self.to_venue(now).date_naive()
    }

    /// The reset time on `date` in the venue zone. A reset time skipped by a
    /// DST gap resolves to the first valid instant after it.
    pub fn reset_instant(&self, date: NaiveDate) -> Option<DateTime<Tz>> {
        let local = date.and_time(self.reset_time);
        self.venue_tz
            .from_local_datetime(&local)
            .earliest()
            .or_else(|| {
                (1..=120)
                    .map(|m| local + Duration::minutes(m))
                    .find_map(|t| self.venue_tz.from_local_datetime(&t).earliest())
            })
    }

    /// True the first time on a new venue-local day that the clock is at or
    /// past the reset time. After the caller records today's date it stays
    /// false until the next day.
    pub fn is_daily_reset_due<T: TimeZone>(
        &self,
        now: &DateTime<T>,
        last_reset_date: Option<NaiveDate>,
    ) -> bool {
        let local = self.to_venue(now);
        if last_reset_date == Some(local.date_naive()) {
            return false;
        }
        local.time() >= self.reset_time
    }

    /// Inside `[session_open, session_open + blackout_minutes)` venue time.
    pub fn is_blackout<T: TimeZone>(&self, now: &DateTime<T>) -> bool {
        if self.blackout_minutes == 0 {
            return false;
        }
        let time = self.to_venue(now).time();
        let end = self.session_open + Duration::minutes(i64::from(self.blackout_minutes));
        if end > self.session_open {
            time >= self.session_open && time < end
        } else {
            // window wraps past midnight
            time >= self.session_open || time < end
        }
    }
}
