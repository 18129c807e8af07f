use chrono::{DateTime, Local, TimeZone};
use snus_core::TimeWindow;

use crate::error::Result;

const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M";

pub fn parse_window(value: &str) -> Result<TimeWindow> {
    Ok(value.parse::<TimeWindow>()?)
}

pub fn format_timestamp(timestamp: i64) -> String {
    format_timestamp_in(timestamp, &Local)
}

pub fn format_timestamp_in<Tz>(timestamp: i64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    DateTime::from_timestamp_millis(timestamp)
        .map(|value| value.with_timezone(tz).format(DISPLAY_FORMAT).to_string())
        .unwrap_or_else(|| format!("@{}", timestamp))
}
