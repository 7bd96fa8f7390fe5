//! # Aggregation
//!
//! Read-only views derived from an [`AppDocument`]. Nothing here is cached: every
//! call recomputes from the document it is given, and nothing here mutates it.
//! Days that have no slot array simply count as zero.
//!
//! - [`weekly_metrics`]: content (posts + promos) and reels over a window.
//! - [`monthly_calendar`]: per-day tallies for a month, flagged against the daily goal.
//! - [`kpis`]: month-to-date completion rate and total scheduled items.
//! - [`type_breakdown`]: all-time totals per type, for the content mix chart.
//! - [`weekly_trend`]: totals per week, for the activity trend chart.
//! - [`week_grid`]: the scheduler's day columns, padded to the configured slots.

use crate::config::{Goals, SlotPolicy};
use crate::datekey::{days_in_month, DateKey};
use crate::model::{AppDocument, CardType, Slot};
use chrono::{Datelike, NaiveDate};

/// Card counts per type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TypeTally {
    pub post: usize,
    pub promo: usize,
    pub reel: usize,
}

impl TypeTally {
    pub fn add(&mut self, kind: CardType) {
        match kind {
            CardType::Post => self.post += 1,
            CardType::Promo => self.promo += 1,
            CardType::Reel => self.reel += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.post + self.promo + self.reel
    }

    /// Posts plus promos.
    pub fn content(&self) -> usize {
        self.post + self.promo
    }

    fn of_slots<'a>(slots: impl IntoIterator<Item = &'a Slot>) -> Self {
        let mut tally = Self::default();
        for card in slots.into_iter().flatten() {
            tally.add(card.kind);
        }
        tally
    }

    fn of_day(doc: &AppDocument, date: &DateKey) -> Self {
        doc.schedule
            .day(date)
            .map(Self::of_slots)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WeeklyMetrics {
    pub content_count: usize,
    pub reel_count: usize,
}

impl WeeklyMetrics {
    pub fn content_percent(&self, goals: &Goals) -> f64 {
        percent(self.content_count, goals.content)
    }

    pub fn reel_percent(&self, goals: &Goals) -> f64 {
        percent(self.reel_count, goals.reels)
    }
}

/// `min(100, 100 * count / goal)`. A zero goal is always met.
pub fn percent(count: usize, goal: usize) -> f64 {
    if goal == 0 {
        return 100.0;
    }
    (100.0 * count as f64 / goal as f64).min(100.0)
}

/// Sums card types over `window` days starting at `start` (inclusive).
pub fn weekly_metrics(doc: &AppDocument, start: DateKey, window: usize) -> WeeklyMetrics {
    let tally = window_tally(doc, start, window);
    WeeklyMetrics {
        content_count: tally.content(),
        reel_count: tally.reel,
    }
}

fn window_tally(doc: &AppDocument, start: DateKey, window: usize) -> TypeTally {
    let mut tally = TypeTally::default();
    for date in start.days(window) {
        let day = TypeTally::of_day(doc, &date);
        tally.post += day.post;
        tally.promo += day.promo;
        tally.reel += day.reel;
    }
    tally
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarDay {
    pub date: DateKey,
    pub tally: TypeTally,
    pub success: bool,
}

impl CalendarDay {
    pub fn day(&self) -> u32 {
        self.date.day()
    }

    pub fn count(&self) -> usize {
        self.tally.total()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthCalendar {
    pub year: i32,
    pub month: u32,
    /// Weekday of the 1st, Sunday = 0; blank cells before it in a Sunday-first grid.
    pub leading_blanks: u32,
    pub days: Vec<CalendarDay>,
}

impl MonthCalendar {
    pub fn title(&self) -> String {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .map(|d| d.format("%B %Y").to_string())
            .unwrap_or_default()
    }
}

/// One entry per day of the month. An invalid month yields no days.
pub fn monthly_calendar(doc: &AppDocument, year: i32, month: u32, daily_goal: usize) -> MonthCalendar {
    let mut calendar = MonthCalendar {
        year,
        month,
        leading_blanks: 0,
        days: Vec::new(),
    };
    let (Some(first), Some(length)) = (DateKey::from_ymd(year, month, 1), days_in_month(year, month))
    else {
        return calendar;
    };

    calendar.leading_blanks = first.date().weekday().num_days_from_sunday();
    calendar.days = first
        .days(length as usize)
        .map(|date| {
            let tally = TypeTally::of_day(doc, &date);
            CalendarDay {
                date,
                tally,
                success: tally.total() >= daily_goal,
            }
        })
        .collect();
    calendar
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Kpis {
    /// Cards placed anywhere in the month.
    pub total_scheduled: usize,
    /// Days of the month strictly before today.
    pub passed_days: usize,
    /// Passed days that met the daily goal.
    pub goal_days: usize,
}

impl Kpis {
    /// Rounded percentage; 100 before any day has passed.
    pub fn completion_rate(&self) -> u32 {
        if self.passed_days == 0 {
            return 100;
        }
        (100.0 * self.goal_days as f64 / self.passed_days as f64).round() as u32
    }
}

/// Month-to-date figures for the month containing `today`.
pub fn kpis(doc: &AppDocument, today: DateKey, daily_goal: usize) -> Kpis {
    let calendar = monthly_calendar(doc, today.year(), today.month(), daily_goal);
    let passed: Vec<&CalendarDay> = calendar.days.iter().filter(|d| d.date < today).collect();

    Kpis {
        total_scheduled: calendar.days.iter().map(CalendarDay::count).sum(),
        passed_days: passed.len(),
        goal_days: passed.iter().filter(|d| d.success).count(),
    }
}

/// All-time totals per type.
pub fn type_breakdown(doc: &AppDocument) -> TypeTally {
    let mut tally = TypeTally::default();
    for (_, card) in doc.schedule.cards() {
        tally.add(card.kind);
    }
    tally
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrendPoint {
    pub start: DateKey,
    pub total: usize,
}

/// Totals for `weeks` consecutive 7-day windows, oldest first; the last window
/// starts at `start`.
pub fn weekly_trend(doc: &AppDocument, start: DateKey, weeks: usize) -> Vec<TrendPoint> {
    (0..weeks)
        .rev()
        .filter_map(|back| start.shift(-7 * back as i64))
        .map(|week_start| TrendPoint {
            start: week_start,
            total: window_tally(doc, week_start, 7).total(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayColumn {
    pub date: DateKey,
    /// Never shorter than the configured slots per day.
    pub slots: Vec<Slot>,
    pub occupied: usize,
    /// Every configured slot is taken.
    pub complete: bool,
    pub goal_reached: bool,
}

/// Columns for `days` days from `start`. Missing days show as empty columns; the
/// document is not touched.
pub fn week_grid(
    doc: &AppDocument,
    start: DateKey,
    days: usize,
    policy: &SlotPolicy,
    goals: &Goals,
) -> Vec<DayColumn> {
    start
        .days(days)
        .map(|date| {
            let mut slots = doc
                .schedule
                .day(&date)
                .map(<[Slot]>::to_vec)
                .unwrap_or_default();
            if slots.len() < policy.min_slots {
                slots.resize(policy.min_slots, None);
            }
            let occupied = slots.iter().filter(|s| s.is_some()).count();
            DayColumn {
                date,
                slots,
                occupied,
                complete: occupied >= policy.min_slots,
                goal_reached: occupied >= goals.daily,
            }
        })
        .collect()
}
