//! Terminal rendering for API results.
//!
//! Every `render_*` function returns a `String` so output can be tested without
//! capturing stdout; the handlers print it.

use chrono::{DateTime, Utc};
use colored::{ColoredString, Colorize};
use slotboard::api::{CmdMessage, DayColumn, Kpis, MonthCalendar, TrendPoint, TypeTally, WeeklyMetrics};
use slotboard::commands::{card_title, MessageLevel};
use slotboard::config::{BoardConfig, Goals, CONFIG_KEYS};
use slotboard::model::{Card, CardStatus, CardType, Position};
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 80;
const TIME_WIDTH: usize = 14;
const BAR_WIDTH: usize = 24;
const EMPTY_SLOT: &str = "·";

pub fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => eprintln!("{}", message.content.red()),
        }
    }
}

fn type_colored(kind: CardType, text: &str) -> ColoredString {
    match kind {
        CardType::Post => text.blue(),
        CardType::Promo => text.magenta(),
        CardType::Reel => text.cyan(),
    }
}

/// `<icon> <Type> <short id> <title>` fitted into `width` columns, with its
/// display width.
fn card_summary(card: &Card, width: usize) -> (String, usize) {
    let head = format!("{} {:<5} {} ", card.kind.icon(), card.kind.label(), card.id.short());
    let available = width.saturating_sub(head.width());
    let title = truncate_to_width(card_title(card), available);
    let shown = head.width() + title.width();
    let title = if card.description.trim().is_empty() {
        title.dimmed()
    } else if card.is_posted() {
        title.strikethrough()
    } else {
        title.normal()
    };
    (format!("{}{}", type_colored(card.kind, &head), title), shown)
}

pub fn render_pool(cards: &[Card], now: DateTime<Utc>) -> String {
    if cards.is_empty() {
        return format!("{}\n", "The pool is empty.".dimmed());
    }

    let body_width = LINE_WIDTH - TIME_WIDTH - 2;
    let mut output = String::new();
    for card in cards {
        let (summary, shown) = card_summary(card, body_width);
        output.push_str(&format!(
            "  {}{}{}\n",
            summary,
            " ".repeat(body_width.saturating_sub(shown)),
            format_time_ago(card.created_at, now).dimmed()
        ));
    }
    output
}

pub fn render_card_detail(card: &Card, position: &Position) -> String {
    let status = match position {
        Position::Pool => "unscheduled".dimmed(),
        Position::Slot(_) => match card.effective_status() {
            CardStatus::Scheduled => "scheduled".yellow(),
            CardStatus::Posted => "posted".green(),
        },
    };
    let mut output = String::new();
    output.push_str(&format!(
        "{} {}\n",
        type_colored(card.kind, &format!("{} {}", card.kind.icon(), card.kind.label())),
        card_title(card).bold()
    ));
    output.push_str(&format!("  id:       {}\n", card.id));
    output.push_str(&format!("  where:    {}\n", position));
    output.push_str(&format!("  status:   {}\n", status));
    output.push_str(&format!(
        "  created:  {}\n",
        card.created_at.format("%Y-%m-%d %H:%M UTC")
    ));
    output
}

/// Day columns stacked vertically, one line per slot, then the weekly progress.
pub fn render_week(columns: &[DayColumn], metrics: &WeeklyMetrics, goals: &Goals) -> String {
    let mut output = String::new();
    for column in columns {
        let slots_total = column.slots.len();
        let count = format!("{}/{}", column.occupied, slots_total);
        let count = if column.goal_reached {
            count.green()
        } else {
            count.normal()
        };
        let marker = if column.complete { " full" } else { "" };
        output.push_str(&format!(
            "{} {}  {}{}\n",
            column.date.weekday_name().bold(),
            column.date.to_string().bold(),
            count,
            marker.dimmed()
        ));

        for (index, slot) in column.slots.iter().enumerate() {
            let line = match slot {
                Some(card) => card_summary(card, LINE_WIDTH - 6).0,
                None => EMPTY_SLOT.dimmed().to_string(),
            };
            output.push_str(&format!("  {:>2}. {}\n", index + 1, line));
        }
        output.push('\n');
    }
    output.push_str(&render_progress(metrics, goals));
    output
}

pub fn render_progress(metrics: &WeeklyMetrics, goals: &Goals) -> String {
    let mut output = String::new();
    output.push_str(&progress_line(
        "Content",
        metrics.content_count,
        goals.content,
        metrics.content_percent(goals),
    ));
    output.push_str(&progress_line(
        "Reels",
        metrics.reel_count,
        goals.reels,
        metrics.reel_percent(goals),
    ));
    output
}

fn progress_line(label: &str, count: usize, goal: usize, percent: f64) -> String {
    let filled = ((percent / 100.0) * BAR_WIDTH as f64).round() as usize;
    let bar = format!(
        "{}{}",
        "█".repeat(filled),
        "░".repeat(BAR_WIDTH.saturating_sub(filled))
    );
    let bar = if percent >= 100.0 { bar.green() } else { bar.normal() };
    format!(
        "{:<8} {} {:>3}/{:<3} {:>3.0}%\n",
        label, bar, count, goal, percent
    )
}

/// Sunday-first month grid; each cell shows the day and its card count.
pub fn render_calendar(calendar: &MonthCalendar) -> String {
    let mut output = String::new();
    output.push_str(&format!("{}\n", calendar.title().bold()));
    output.push_str(" Sun  Mon  Tue  Wed  Thu  Fri  Sat\n");

    let mut column = calendar.leading_blanks as usize;
    output.push_str(&"     ".repeat(column));
    for day in &calendar.days {
        let cell = if day.count() == 0 {
            format!("{:>3}  ", day.day()).dimmed().to_string()
        } else {
            let text = format!("{:>2}:{}", day.day(), day.count().min(9));
            if day.success {
                format!("{} ", text.green())
            } else {
                format!("{} ", text.yellow())
            }
        };
        output.push_str(&cell);
        column += 1;
        if column == 7 {
            output.push('\n');
            column = 0;
        }
    }
    if column != 0 {
        output.push('\n');
    }
    output
}

pub fn render_stats(
    metrics: &WeeklyMetrics,
    goals: &Goals,
    kpis: &Kpis,
    breakdown: &TypeTally,
    trend: &[TrendPoint],
) -> String {
    let mut output = String::new();

    output.push_str(&format!("{}\n", "This week".bold()));
    output.push_str(&render_progress(metrics, goals));

    output.push_str(&format!("\n{}\n", "This month".bold()));
    output.push_str(&format!(
        "  Completion rate   {}%  ({} of {} days at {}+)\n",
        kpis.completion_rate(),
        kpis.goal_days,
        kpis.passed_days,
        goals.daily
    ));
    output.push_str(&format!("  Scheduled items   {}\n", kpis.total_scheduled));

    output.push_str(&format!("\n{}\n", "Content mix".bold()));
    let total = breakdown.total();
    for (kind, count) in [
        (CardType::Post, breakdown.post),
        (CardType::Promo, breakdown.promo),
        (CardType::Reel, breakdown.reel),
    ] {
        let share = if total == 0 {
            0.0
        } else {
            100.0 * count as f64 / total as f64
        };
        output.push_str(&format!(
            "  {} {:<6} {:>4}  {:>3.0}%\n",
            kind.icon(),
            type_colored(kind, kind.label()),
            count,
            share
        ));
    }

    output.push_str(&format!("\n{}\n", "Weekly trend".bold()));
    let peak = trend.iter().map(|p| p.total).max().unwrap_or(0).max(1);
    for point in trend {
        let width = (point.total * BAR_WIDTH).div_ceil(peak);
        output.push_str(&format!(
            "  {}  {:<width$} {}\n",
            point.start,
            "▇".repeat(width),
            point.total,
            width = BAR_WIDTH
        ));
    }
    output
}

pub fn render_config(config: &BoardConfig) -> String {
    CONFIG_KEYS
        .iter()
        .filter_map(|key| config.get(key).map(|value| format!("{} = {}\n", key, value)))
        .collect()
}

pub fn render_notes(notes: &str) -> String {
    if notes.trim().is_empty() {
        format!("{}\n", "No notes.".dimmed())
    } else {
        format!("{}\n", notes.trim_end())
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }
    result
}

fn format_time_ago(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let duration = now.signed_duration_since(timestamp);
    let time_str = Formatter::new().convert(duration.to_std().unwrap_or_default());
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}
