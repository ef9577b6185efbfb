use chrono::{DateTime, Utc};
use core::fmt;

use crate::*;

/// Time left until the next daily attempt grant at UTC midnight.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Countdown {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl Countdown {
    /// Only ticks once the player is out of attempts, `None` otherwise.
    pub fn until_replenish(attempts: Attempts, now: DateTime<Utc>) -> Option<Self> {
        if attempts > 0 {
            return None;
        }
        Some(Self::until_next_midnight(now))
    }

    pub fn until_next_midnight(now: DateTime<Utc>) -> Self {
        let next_midnight = now
            .date_naive()
            .succ_opt()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|midnight| midnight.and_utc());

        let remaining = next_midnight
            .map(|midnight| midnight.signed_duration_since(now).num_seconds())
            .unwrap_or(0)
            .max(0);
        Self::from_secs(u32::try_from(remaining).unwrap_or(u32::MAX))
    }

    pub const fn from_secs(total: u32) -> Self {
        Self {
            hours: total / 3600,
            minutes: (total % 3600) / 60,
            seconds: total % 60,
        }
    }

    pub const fn total_secs(&self) -> u32 {
        self.hours * 3600 + self.minutes * 60 + self.seconds
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use chrono::TimeZone;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, h, m, s).unwrap()
    }

    #[test]
    fn hidden_while_attempts_remain() {
        assert_eq!(Countdown::until_replenish(1, at(23, 0, 0)), None);
    }

    #[test]
    fn counts_down_to_midnight_utc() {
        let countdown = Countdown::until_replenish(0, at(22, 15, 30)).unwrap();
        assert_eq!(
            countdown,
            Countdown {
                hours: 1,
                minutes: 44,
                seconds: 30
            }
        );
        assert_eq!(countdown.to_string(), "01:44:30");
    }

    #[test]
    fn exactly_midnight_waits_a_full_day() {
        let countdown = Countdown::until_next_midnight(at(0, 0, 0));
        assert_eq!(countdown.total_secs(), 24 * 3600);
        assert_eq!(countdown.to_string(), "24:00:00");
    }

    #[test]
    fn last_second_of_day() {
        assert_eq!(Countdown::until_next_midnight(at(23, 59, 59)).to_string(), "00:00:01");
    }

    #[test]
    fn crosses_month_boundary() {
        let now = Utc.with_ymd_and_hms(2024, 2, 29, 12, 0, 0).unwrap();
        assert_eq!(Countdown::until_next_midnight(now).hours, 12);
    }
}
