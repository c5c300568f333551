//! Wall-clock source port.

use chrono::DateTime;
use chrono_tz::Tz;

pub trait ClockPort {
    fn now(&self) -> DateTime<Tz>;
}
