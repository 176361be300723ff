//! Display values derived from a record: unit price, sale countdowns and
//! price / discount / rating labels.

use crate::models::SearchRecord;
use chrono::{DateTime, Datelike, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

const SECONDS_PER_HOUR: i64 = 60 * 60;
const SECONDS_PER_DAY: i64 = 24 * SECONDS_PER_HOUR;

/// Discount at or above which the call to action switches to half-price wording
pub const HALF_PRICE_RATE: u32 = 50;

/// Price per page in yen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitPrice(pub u32);

impl fmt::Display for UnitPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}円/P", self.0)
    }
}

/// `round(current_price / page_count)`, absent when the page count is zero
pub fn unit_price(record: &SearchRecord) -> Option<UnitPrice> {
    unit_price_of(record.current_price, record.page_count)
}

pub fn unit_price_of(price: u32, page_count: u32) -> Option<UnitPrice> {
    if page_count == 0 {
        return None;
    }
    let per_page = (f64::from(price) / f64::from(page_count)).round();
    Some(UnitPrice(per_page as u32))
}

/// Coarse time left in a sale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeRemaining {
    /// At least one whole day left
    Days(i64),
    /// Less than a day left, in whole hours
    Hours(i64),
    Expired,
}

impl TimeRemaining {
    pub fn is_expired(&self) -> bool {
        matches!(self, TimeRemaining::Expired)
    }
}

impl fmt::Display for TimeRemaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeRemaining::Days(days) => write!(f, "残り{days}日"),
            TimeRemaining::Hours(hours) => write!(f, "残り{hours}時間"),
            TimeRemaining::Expired => f.write_str("終了"),
        }
    }
}

/// Time left until `end`, never negative
pub fn time_remaining(end: DateTime<Utc>, now: DateTime<Utc>) -> TimeRemaining {
    let left = end.signed_duration_since(now);
    if left <= Duration::zero() {
        return TimeRemaining::Expired;
    }

    let days = left.num_days();
    if days >= 1 {
        TimeRemaining::Days(days)
    } else {
        TimeRemaining::Hours(left.num_hours())
    }
}

/// Time left in the record's sale, if it has an end date
pub fn sale_time_remaining(record: &SearchRecord, now: DateTime<Utc>) -> Option<TimeRemaining> {
    record.sale_end.map(|end| time_remaining(end, now))
}

/// Day / hour / minute / second breakdown for sale banners
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Countdown {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub expired: bool,
}

impl Countdown {
    pub fn until(end: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let total = end.signed_duration_since(now).num_seconds();
        if total <= 0 {
            return Self {
                expired: true,
                ..Self::default()
            };
        }

        Self {
            days: total / SECONDS_PER_DAY,
            hours: (total % SECONDS_PER_DAY) / SECONDS_PER_HOUR,
            minutes: (total % SECONDS_PER_HOUR) / 60,
            seconds: total % 60,
            expired: false,
        }
    }

    /// `<d>日<h>時間` with days left, otherwise `<h>時間<m>分`
    pub fn compact_label(&self) -> String {
        if self.expired {
            "終了".to_string()
        } else if self.days > 0 {
            format!("{}日{}時間", self.days, self.hours)
        } else {
            format!("{}時間{}分", self.hours, self.minutes)
        }
    }
}

/// `"<n>%OFF"`; nothing to show without a positive discount
pub fn discount_label(discount_rate: Option<u32>) -> Option<String> {
    discount_rate
        .filter(|&rate| rate > 0)
        .map(|rate| format!("{rate}%OFF"))
}

/// Purchase button wording
pub fn call_to_action(discount_rate: Option<u32>) -> String {
    match discount_rate {
        Some(rate) if rate >= HALF_PRICE_RATE => "半額以下で手に入れる".to_string(),
        Some(rate) if rate > 0 => format!("{rate}%OFFで手に入れる"),
        _ => "詳細を見る".to_string(),
    }
}

/// `¥1,200`
pub fn format_price(price: u32) -> String {
    format!("¥{}", group_thousands(price))
}

/// Decimal digits grouped by three with commas
pub fn group_thousands(value: u32) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// One decimal place, `"0.0"` when unrated
pub fn format_rating(rating: Option<f64>) -> String {
    format!("{:.1}", rating.unwrap_or(0.0))
}

/// `YYYY年M月D日` in storefront local time
pub fn format_date(instant: DateTime<Utc>) -> String {
    let local = instant.with_timezone(&chrono_tz::Asia::Tokyo);
    format!("{}年{}月{}日", local.year(), local.month(), local.day())
}
