//! Rebalance date generation.

use chrono::{Datelike, NaiveDate};

use crate::domain::config::CalendarRule;

/// Generate the ordered sequence of rebalance dates for `rule` between
/// `initial_date` and `end_date`, both inclusive.
///
/// Identical inputs always yield an identical sequence; the result is
/// strictly increasing and duplicate-free.
pub fn generate(rule: CalendarRule, initial_date: NaiveDate, end_date: NaiveDate) -> Vec<NaiveDate> {
    match rule {
        CalendarRule::Quarterly => quarterly(initial_date, end_date),
    }
}

/// Quarter ends always fall on fixed month/day pairs.
fn quarter_end(year: i32, quarter: u32) -> NaiveDate {
    let (month, day) = match quarter {
        1 => (3, 31),
        2 => (6, 30),
        3 => (9, 30),
        _ => (12, 31),
    };
    NaiveDate::from_ymd_opt(year, month, day).expect("quarter ends are valid calendar dates")
}

/// Every quarter-end on or after `start`, up to and including `end`.
/// `start` itself is emitted when it is a quarter-end.
fn quarterly(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let mut year = start.year();
    let mut quarter = start.month0() / 3 + 1;

    loop {
        let date = quarter_end(year, quarter);
        if date > end {
            break;
        }
        dates.push(date);
        if quarter == 4 {
            quarter = 1;
            year += 1;
        } else {
            quarter += 1;
        }
    }

    dates
}
