//! # Timetable helpers: countdowns and attendance
//!
//! Pure functions over [`ClassSchedule`] rows. Nothing here schedules or
//! alarms; callers recompute on their own tick (the home screen refreshed every
//! minute).
//!
//! - [`Countdown::until`]: time left until a class that happens every day at a
//!   fixed `"HH:MM"`, wrapping to tomorrow once today's start has passed.
//! - [`todays_classes`]: today's classes joined with their subject, each with a
//!   countdown.
//! - [`AttendanceLevel`] / [`average_attendance`]: the thresholds the
//!   attendance cards are coloured by.

use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

use crate::error::{Result, StoreError};
use crate::models::ClassSchedule;
use crate::stores::SubjectsState;

/// Short names of the timetable days, indexed by [`ClassSchedule::day`].
pub const WEEK_DAYS: [&str; 6] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

pub fn day_name(day: u8) -> Option<&'static str> {
    WEEK_DAYS.get(usize::from(day)).copied()
}

/// Timetable index of a date: Monday = 0 through Sunday = 6.
pub fn day_index(date: NaiveDate) -> u8 {
    // num_days_from_monday is 0..=6
    date.weekday().num_days_from_monday() as u8
}

/// Parse a class start time written as `HH:MM`.
pub fn parse_class_time(time: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(time.trim(), "%H:%M")
        .map_err(|_| StoreError::InvalidTime(time.to_string()))
}

/// Whole hours and minutes until a class starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Countdown {
    pub hours: u32,
    pub minutes: u32,
}

impl Countdown {
    /// Time from `now` until the next start at `class_time`.
    ///
    /// The class starts today at `class_time` with zero seconds; if that
    /// moment is already behind `now`, tomorrow's start is used instead.
    /// Partial minutes are dropped.
    pub fn until(class_time: NaiveTime, now: NaiveDateTime) -> Self {
        let mut start = now.date().and_time(class_time);
        if start < now {
            start += TimeDelta::days(1);
        }
        let minutes = (start - now).num_minutes().max(0);
        Self {
            hours: (minutes / 60) as u32,
            minutes: (minutes % 60) as u32,
        }
    }

    /// Parse `time` and compute the countdown in one go.
    pub fn until_str(time: &str, now: NaiveDateTime) -> Result<Self> {
        Ok(Self::until(parse_class_time(time)?, now))
    }

    /// Less than a minute to go.
    pub fn is_now(&self) -> bool {
        self.hours == 0 && self.minutes == 0
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hours > 0 {
            write!(f, "{}h {}m", self.hours, self.minutes)
        } else if self.minutes > 0 {
            write!(f, "{}m", self.minutes)
        } else {
            f.write_str("Now")
        }
    }
}

/// A class happening today, ready for display.
#[derive(Clone, Debug, PartialEq)]
pub struct TodayClass {
    pub class_id: u32,
    pub subject_name: String,
    pub time: String,
    pub room: String,
    /// `None` when the stored time is not valid `HH:MM`.
    pub countdown: Option<Countdown>,
}

/// Classes scheduled on `now`'s weekday, in timetable order.
pub fn todays_classes(state: &SubjectsState, now: NaiveDateTime) -> Vec<TodayClass> {
    let today = day_index(now.date());
    state
        .classes()
        .iter()
        .filter(|c| c.day == today)
        .map(|c| {
            let subject = state.get_subject(&c.subject_id);
            let subject_name = subject
                .map(|s| s.name.as_str())
                .filter(|name| !name.is_empty())
                .unwrap_or("Unknown Subject");
            let room = subject
                .map(|s| s.room.as_str())
                .filter(|room| !room.is_empty())
                .unwrap_or("No Room");
            TodayClass {
                class_id: c.id,
                subject_name: subject_name.to_string(),
                time: c.time.clone(),
                room: room.to_string(),
                countdown: Countdown::until_str(&c.time, now).ok(),
            }
        })
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttendanceLevel {
    Good,
    Warning,
    Low,
}

impl AttendanceLevel {
    pub fn of(attendance: u8) -> Self {
        match attendance {
            85.. => AttendanceLevel::Good,
            75..=84 => AttendanceLevel::Warning,
            _ => AttendanceLevel::Low,
        }
    }
}

/// Mean attendance across classes, rounded to the nearest percent.
pub fn average_attendance(classes: &[ClassSchedule]) -> Option<u32> {
    if classes.is_empty() {
        return None;
    }
    let total: u32 = classes.iter().map(|c| u32::from(c.attendance)).sum();
    Some((f64::from(total) / classes.len() as f64).round() as u32)
}
