//! age.rs
//!
//! How long an account has existed, as calendar years, months and days.
//!
//! Chrono has no year/month/day difference. We count whole months from the
//! creation date (chrono clamps to the end of shorter months, so Jan 31 plus
//! one month is Feb 28/29) and express the remainder in days.

use std::fmt;

use chrono::{Datelike, Months, NaiveDate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountAge {
    pub years: u32,
    pub months: u32,
    pub days: u32,
}

impl AccountAge {
    /// Age on `today` of an account created on `created`.
    /// A creation date in the future yields zero.
    pub fn between(created: NaiveDate, today: NaiveDate) -> Self {
        if created >= today {
            return Self {
                years: 0,
                months: 0,
                days: 0,
            };
        }

        let after = |months: u32| created.checked_add_months(Months::new(months));

        let span = (today.year() - created.year()) * 12 + today.month() as i32
            - created.month() as i32;
        let mut whole_months = span.max(0) as u32;
        // Overshoots by at most one month when today's day is before the creation day.
        while whole_months > 0 && after(whole_months).is_none_or(|d| d > today) {
            whole_months -= 1;
        }

        let anchor = after(whole_months).unwrap_or(created);
        let days = (today - anchor).num_days().max(0) as u32;

        Self {
            years: whole_months / 12,
            months: whole_months % 12,
            days,
        }
    }
}

impl fmt::Display for AccountAge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}, {} {}, {} {}",
            self.years,
            unit(self.years, "year"),
            self.months,
            unit(self.months, "month"),
            self.days,
            unit(self.days, "day")
        )
    }
}

fn unit(n: u32, singular: &str) -> String {
    if n == 1 {
        singular.to_string()
    } else {
        format!("{singular}s")
    }
}
