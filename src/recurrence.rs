// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Pure date arithmetic for recurring rules. No store access, no clock:
//! callers pass every date in.

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};

use crate::error::{LedgerError, Result};
use crate::models::Frequency;

pub fn weekday_from_name(s: &str) -> Result<Weekday> {
    match s.to_ascii_uppercase().as_str() {
        "SUNDAY" => Ok(Weekday::Sun),
        "MONDAY" => Ok(Weekday::Mon),
        "TUESDAY" => Ok(Weekday::Tue),
        "WEDNESDAY" => Ok(Weekday::Wed),
        "THURSDAY" => Ok(Weekday::Thu),
        "FRIDAY" => Ok(Weekday::Fri),
        "SATURDAY" => Ok(Weekday::Sat),
        _ => Err(LedgerError::InvalidDayOfWeek),
    }
}

pub fn weekday_name(w: Weekday) -> &'static str {
    match w {
        Weekday::Sun => "SUNDAY",
        Weekday::Mon => "MONDAY",
        Weekday::Tue => "TUESDAY",
        Weekday::Wed => "WEDNESDAY",
        Weekday::Thu => "THURSDAY",
        Weekday::Fri => "FRIDAY",
        Weekday::Sat => "SATURDAY",
    }
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        4 | 6 | 9 | 11 => 30,
        2 => {
            if NaiveDate::from_ymd_opt(year, 2, 29).is_some() {
                29
            } else {
                28
            }
        }
        _ => 31,
    }
}

/// Adds `months`, then pins the day to `day_of_month` clamped to the length
/// of the resulting month (day 31 in February lands on the 28th/29th).
fn step_months(date: NaiveDate, months: u32, day_of_month: Option<u32>) -> NaiveDate {
    let shifted = date + Months::new(months);
    let day = day_of_month.unwrap_or(date.day());
    let max = days_in_month(shifted.year(), shifted.month());
    shifted.with_day(day.min(max)).unwrap_or(shifted)
}

/// First run of a freshly created rule. The start date itself never
/// qualifies: a WEEKLY rule starting on its target weekday jumps a full
/// `interval` weeks ahead.
pub fn initial_next_run(
    start: NaiveDate,
    frequency: Frequency,
    interval: i64,
    day_of_month: Option<u32>,
    day_of_week: Option<Weekday>,
) -> NaiveDate {
    let interval = interval.max(1) as u32;
    match frequency {
        Frequency::Daily => start + Days::new(interval as u64),
        Frequency::Weekly => {
            let target = day_of_week.unwrap_or(Weekday::Sun);
            let days_ahead = (target.num_days_from_sunday() as i64
                - start.weekday().num_days_from_sunday() as i64)
                .rem_euclid(7);
            if days_ahead == 0 {
                start + Days::new(7 * interval as u64)
            } else {
                start + Days::new(days_ahead as u64)
            }
        }
        Frequency::Monthly => step_months(start, interval, day_of_month),
        Frequency::Yearly => start + Months::new(12 * interval),
    }
}

/// Advances an existing schedule by one step from the previous next-run
/// date. WEEKLY adds whole weeks; no weekday search is re-run.
pub fn next_run(
    previous: NaiveDate,
    frequency: Frequency,
    interval: i64,
    day_of_month: Option<u32>,
) -> NaiveDate {
    let interval = interval.max(1) as u32;
    match frequency {
        Frequency::Daily => previous + Days::new(interval as u64),
        Frequency::Weekly => previous + Days::new(7 * interval as u64),
        Frequency::Monthly => step_months(previous, interval, day_of_month),
        Frequency::Yearly => previous + Months::new(12 * interval),
    }
}

fn ordinal_suffix(n: u32) -> &'static str {
    if (11..=13).contains(&(n % 100)) {
        return "th";
    }
    match n % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

/// "Every 2 weeks on Friday", "Every month on the 31st".
pub fn frequency_description(
    frequency: Frequency,
    interval: i64,
    day_of_month: Option<u32>,
    day_of_week: Option<Weekday>,
) -> String {
    let mut desc = if interval == 1 {
        String::from("Every ")
    } else {
        format!("Every {} ", interval)
    };
    match frequency {
        Frequency::Daily => desc.push_str(if interval == 1 { "day" } else { "days" }),
        Frequency::Weekly => {
            desc.push_str(if interval == 1 { "week" } else { "weeks" });
            if let Some(dow) = day_of_week {
                desc.push_str(" on ");
                desc.push_str(&capitalize(weekday_name(dow)));
            }
        }
        Frequency::Monthly => {
            desc.push_str(if interval == 1 { "month" } else { "months" });
            if let Some(dom) = day_of_month {
                desc.push_str(&format!(" on the {}{}", dom, ordinal_suffix(dom)));
            }
        }
        Frequency::Yearly => desc.push_str(if interval == 1 { "year" } else { "years" }),
    }
    desc
}

pub fn status_description(
    active: bool,
    end_date: Option<NaiveDate>,
    today: NaiveDate,
) -> &'static str {
    if !active {
        return "Inactive";
    }
    match end_date {
        Some(end) if today > end => "Expired",
        _ => "Active",
    }
}
