//! # CLI Dispatch
//!
//! - `run()`: parses arguments and dispatches (called by `main.rs`)
//! - `init_context()`: resolves the data directory, starts logging, opens the board
//! - `handle_*()`: per-command handlers that call the API and print the result
//!
//! Every handler that can leave a deferred save behind (descriptions, notes) is
//! followed by a flush in `run()`, so a one-shot invocation never loses an edit.

use super::render::{
    print_messages, render_calendar, render_card_detail, render_config, render_notes,
    render_pool, render_stats, render_week,
};
use super::setup::{
    print_grouped_help, print_help_for_command, subcommand_name, CardCommands, Cli, Commands,
    DataCommands, MiscCommands, ViewCommands,
};
use chrono::{Datelike, Utc};
use clap::Parser;
use directories::ProjectDirs;
use log::{debug, warn};
use slotboard::api::{BoardApi, ConfigAction, MessageLevel};
use slotboard::commands::BoardPaths;
use slotboard::datekey::{parse_month, DateKey};
use slotboard::error::{BoardError, Result};
use slotboard::logging;
use slotboard::model::{CardId, CardLocation, CardType, Position};
use slotboard::store::fs::FileStore;
use slotboard::store::Gateway;
use std::path::PathBuf;

const DATA_DIR_ENV: &str = "SLOTBOARD_HOME";
const TREND_WEEKS: usize = 6;

struct AppContext {
    api: BoardApi<FileStore, FileStore>,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.help {
        match &cli.command {
            Some(command) => print_help_for_command(subcommand_name(command)),
            None => print_grouped_help(),
        }
        return Ok(());
    }

    if let Some(Commands::Misc(MiscCommands::Help { command })) = &cli.command {
        return handle_help(command.as_deref());
    }

    let paths = BoardPaths::new(resolve_data_dir(&cli)?);
    if let Err(e) = logging::init_logging(logging::level_for_verbosity(cli.verbose), &paths.log_dir()) {
        eprintln!("Warning: file logging disabled: {}", e);
    }
    debug!(
        "event=cli_start module=cli data_dir={}",
        paths.data_dir.display()
    );

    // Config edits don't need the board, and shouldn't touch the remote.
    if let Some(Commands::Misc(MiscCommands::Config { key, value })) = &cli.command {
        return handle_config(&paths, key.clone(), value.clone());
    }

    let mut ctx = init_context(&cli, &paths)?;

    let outcome = match cli.command {
        Some(Commands::Card(cmd)) => match cmd {
            CardCommands::Add { kind, description } => {
                handle_add(&mut ctx, kind, description.join(" "))
            }
            CardCommands::Rm { id } => handle_rm(&mut ctx, &id),
            CardCommands::Describe { id, text } => handle_describe(&mut ctx, &id, text.join(" ")),
            CardCommands::Toggle { id } => handle_toggle(&mut ctx, &id),
            CardCommands::Move { id, destination } => handle_move(&mut ctx, &id, &destination),
            CardCommands::Show { id } => handle_show(&ctx, &id),
        },
        Some(Commands::View(cmd)) => match cmd {
            ViewCommands::Pool => handle_pool(&ctx),
            ViewCommands::Week { from, days } => handle_week(&ctx, from, days),
            ViewCommands::Calendar { month } => handle_calendar(&ctx, month),
            ViewCommands::Stats { today } => handle_stats(&ctx, today),
        },
        Some(Commands::Data(cmd)) => match cmd {
            DataCommands::Notes { text } => handle_notes(&mut ctx, text.join(" ")),
            DataCommands::Export { path } => handle_export(&ctx, path),
            DataCommands::Import { path } => handle_import(&mut ctx, path),
        },
        Some(Commands::Misc(_)) => Ok(()),
        None => handle_week(&ctx, None, None),
    };

    if let Some(report) = ctx.api.flush() {
        if !report.is_clean() {
            warn!("event=flush module=cli status=partial");
        }
    }
    outcome
}

/// `--data-dir`, then `$SLOTBOARD_HOME`, then the platform data directory.
fn resolve_data_dir(cli: &Cli) -> Result<PathBuf> {
    if let Some(dir) = &cli.data_dir {
        return Ok(dir.clone());
    }
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    ProjectDirs::from("com", "slotboard", "slotboard")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| BoardError::Config("Could not determine a data directory".to_string()))
}

fn init_context(cli: &Cli, paths: &BoardPaths) -> Result<AppContext> {
    let config = paths.load_config()?;

    let remote = cli
        .remote
        .clone()
        .or_else(|| config.remote_path.clone())
        .map(FileStore::new);
    let cache = FileStore::in_dir(paths.cache_dir());

    let api = BoardApi::open(Gateway::new(remote, cache), config);
    Ok(AppContext { api })
}

fn resolve(ctx: &AppContext, input: &str) -> Result<CardId> {
    ctx.api.resolve_id(input)
}

fn handle_add(ctx: &mut AppContext, kind: CardType, description: String) -> Result<()> {
    let result = ctx.api.create_card(kind);
    print_messages(&result.messages);

    let description = description.trim();
    if !description.is_empty() {
        if let Some(card) = result.affected_cards.first() {
            ctx.api
                .update_description(&card.id, description, CardLocation::Pool);
        }
    }
    Ok(())
}

fn card_location(ctx: &AppContext, id: &CardId) -> CardLocation {
    ctx.api
        .document()
        .find(id)
        .map(|(_, position)| position.location())
        .unwrap_or(CardLocation::Pool)
}

fn handle_rm(ctx: &mut AppContext, input: &str) -> Result<()> {
    let id = resolve(ctx, input)?;
    let result = ctx.api.delete_anywhere(&id);
    print_messages(&result.messages);
    Ok(())
}

fn handle_describe(ctx: &mut AppContext, input: &str, text: String) -> Result<()> {
    let id = resolve(ctx, input)?;
    let location = card_location(ctx, &id);
    let result = ctx.api.update_description(&id, text.trim(), location);
    print_messages(&result.messages);
    if result.changed {
        println!("Description updated.");
    }
    Ok(())
}

fn handle_toggle(ctx: &mut AppContext, input: &str) -> Result<()> {
    let id = resolve(ctx, input)?;
    let result = ctx.api.toggle_status(&id);
    print_messages(&result.messages);
    Ok(())
}

/// Where a `move` should put the card.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Destination {
    Pool,
    FirstOpen(DateKey),
    /// Zero-based slot.
    Slot(DateKey, usize),
}

/// `pool`, `YYYY-MM-DD` or `YYYY-MM-DD:N` with `N` counted from 1.
fn parse_destination(input: &str) -> Result<Destination> {
    let input = input.trim();
    if input.eq_ignore_ascii_case("pool") {
        return Ok(Destination::Pool);
    }

    match input.split_once(':') {
        None => Ok(Destination::FirstOpen(input.parse()?)),
        Some((date, slot)) => {
            let date: DateKey = date.parse()?;
            match slot.trim().parse::<usize>() {
                Ok(n) if n >= 1 => Ok(Destination::Slot(date, n - 1)),
                _ => Err(BoardError::Api(format!(
                    "Invalid slot `{}` (slots are numbered from 1)",
                    slot
                ))),
            }
        }
    }
}

fn handle_move(ctx: &mut AppContext, input: &str, destination: &str) -> Result<()> {
    let id = resolve(ctx, input)?;
    let result = match parse_destination(destination)? {
        Destination::Pool => ctx.api.move_card(&id, &Position::Pool),
        Destination::FirstOpen(date) => ctx.api.move_to_first_open(&id, date),
        Destination::Slot(date, index) => ctx.api.move_card(&id, &Position::slot(date, index)),
    };
    print_messages(&result.messages);
    Ok(())
}

fn handle_show(ctx: &AppContext, input: &str) -> Result<()> {
    let id = resolve(ctx, input)?;
    let result = ctx.api.find_card(&id);
    match &result.found {
        Some((card, position)) => print!("{}", render_card_detail(card, position)),
        None => print_messages(&result.messages),
    }
    Ok(())
}

fn handle_pool(ctx: &AppContext) -> Result<()> {
    print!("{}", render_pool(&ctx.api.document().pool, Utc::now()));
    Ok(())
}

fn parse_day_or_today(input: Option<String>) -> Result<DateKey> {
    match input {
        Some(s) => s.parse(),
        None => Ok(DateKey::today()),
    }
}

fn handle_week(ctx: &AppContext, from: Option<String>, days: Option<usize>) -> Result<()> {
    let start = parse_day_or_today(from)?;
    let days = days.unwrap_or(ctx.api.config().window_days).max(1);

    let columns = ctx.api.week_grid(start, days);
    let metrics = ctx.api.weekly_metrics(start);
    print!(
        "{}",
        render_week(&columns, &metrics, &ctx.api.config().goals())
    );
    Ok(())
}

fn handle_calendar(ctx: &AppContext, month: Option<String>) -> Result<()> {
    let (year, month) = match month {
        Some(s) => parse_month(&s)?,
        None => {
            let today = DateKey::today().date();
            (today.year(), today.month())
        }
    };
    print!("{}", render_calendar(&ctx.api.monthly_calendar(year, month)));
    Ok(())
}

fn handle_stats(ctx: &AppContext, today: Option<String>) -> Result<()> {
    let today = parse_day_or_today(today)?;
    print!(
        "{}",
        render_stats(
            &ctx.api.weekly_metrics(today),
            &ctx.api.config().goals(),
            &ctx.api.kpis(today),
            &ctx.api.type_breakdown(),
            &ctx.api.weekly_trend(today, TREND_WEEKS),
        )
    );
    Ok(())
}

fn handle_notes(ctx: &mut AppContext, text: String) -> Result<()> {
    if text.trim().is_empty() {
        print!("{}", render_notes(&ctx.api.document().notes));
        return Ok(());
    }
    let result = ctx.api.set_notes(&text);
    print_messages(&result.messages);
    if result.changed {
        println!("Notes saved.");
    }
    Ok(())
}

fn handle_export(ctx: &AppContext, path: Option<PathBuf>) -> Result<()> {
    let target = path.unwrap_or_else(|| PathBuf::from("."));
    let (result, _) = ctx.api.export(&target)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_import(ctx: &mut AppContext, path: PathBuf) -> Result<()> {
    let result = ctx.api.import(&path)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_config(paths: &BoardPaths, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(key), None) => ConfigAction::ShowKey(key),
        (Some(key), Some(value)) => ConfigAction::Set(key, value),
    };
    let show_all = matches!(action, ConfigAction::ShowAll);

    let result = slotboard::commands::config::run(paths, action)?;
    if show_all {
        if let Some(config) = &result.config {
            print!("{}", render_config(config));
        }
    }
    print_messages(&result.messages);
    if result
        .messages
        .iter()
        .any(|m| m.level == MessageLevel::Error)
    {
        return Err(BoardError::Config("configuration not changed".to_string()));
    }
    Ok(())
}

fn handle_help(command: Option<&str>) -> Result<()> {
    match command {
        Some(name) => print_help_for_command(name),
        None => print_grouped_help(),
    }
    Ok(())
}
