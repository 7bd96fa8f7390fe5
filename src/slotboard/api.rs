//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer and the single entry
//! point for board operations, whatever UI sits on top.
//!
//! ## Role and Responsibilities
//!
//! `BoardApi` owns the in-memory [`AppDocument`] for the session and:
//! - **Dispatches** to the command functions in `commands/*.rs`
//! - **Normalizes inputs**, e.g. looking up where a card currently sits before a move
//! - **Persists** through the [`Gateway`] after every command that changed something
//! - **Defers** saves for free-text edits (descriptions, notes) via [`SaveScheduler`]
//!
//! ## What the API Does NOT Do
//!
//! - **Business logic**: that belongs in `commands/*.rs` and `metrics.rs`
//! - **Presentation**: it returns data structures, never strings for a terminal
//!
//! ## Saves
//!
//! Structural edits (create, delete, move, toggle, import) save immediately and
//! cancel any pending deferred save, since the immediate save already carries the
//! latest text. Text edits only schedule a save; the client calls
//! [`BoardApi::poll_pending_save`] from its loop and [`BoardApi::flush`] before it
//! exits. A failed save never surfaces as an error: the document in memory stays
//! authoritative for the session and the failure is logged.
//!
//! ## Generic Over DocumentStore
//!
//! `BoardApi<R, C>` is generic over the remote and cache backends:
//! - Production: `BoardApi<FileStore, FileStore>`
//! - Testing: `BoardApi<InMemoryStore, InMemoryStore>`

use crate::commands;
use crate::config::BoardConfig;
use crate::datekey::DateKey;
use crate::debounce::SaveScheduler;
use crate::error::{BoardError, Result};
use crate::metrics;
use crate::model::{AppDocument, Card, CardId, CardLocation, CardType, Position};
use crate::store::{DocumentStore, Gateway, LoadOrigin, SaveReport};
use chrono::Utc;
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

pub use crate::commands::config::ConfigAction;
pub use crate::commands::{CmdMessage, CmdResult, MessageLevel};
pub use crate::metrics::{
    CalendarDay, DayColumn, Kpis, MonthCalendar, TrendPoint, TypeTally, WeeklyMetrics,
};

/// The main API facade for board operations.
pub struct BoardApi<R: DocumentStore, C: DocumentStore> {
    doc: AppDocument,
    gateway: Gateway<R, C>,
    config: BoardConfig,
    pending: SaveScheduler,
    load_origin: LoadOrigin,
}

impl<R: DocumentStore, C: DocumentStore> BoardApi<R, C> {
    /// Loads the board through `gateway`. Never fails; see [`Gateway::load`].
    pub fn open(mut gateway: Gateway<R, C>, config: BoardConfig) -> Self {
        let (doc, load_origin) = gateway.load();
        info!(
            "event=open module=api origin={:?} pool={} days={}",
            load_origin,
            doc.pool.len(),
            doc.schedule.len()
        );
        Self {
            doc,
            gateway,
            pending: SaveScheduler::new(config.save_delay()),
            config,
            load_origin,
        }
    }

    pub fn create_card(&mut self, kind: CardType) -> CmdResult {
        let result = commands::create::run(&mut self.doc, kind);
        self.persist(result)
    }

    pub fn delete_card(&mut self, id: &CardId, location: CardLocation) -> CmdResult {
        let result = commands::delete::run(&mut self.doc, id, location);
        self.persist(result)
    }

    /// Deletes the card wherever it currently is.
    pub fn delete_anywhere(&mut self, id: &CardId) -> CmdResult {
        match self.doc.find(id) {
            Some((_, position)) => self.delete_card(id, position.location()),
            None => CmdResult::noop(format!("No card {}", id.short())),
        }
    }

    /// Sets the description; the save is deferred.
    pub fn update_description(&mut self, id: &CardId, text: &str, location: CardLocation) -> CmdResult {
        self.update_description_at(id, text, location, Instant::now())
    }

    pub fn update_description_at(
        &mut self,
        id: &CardId,
        text: &str,
        location: CardLocation,
        now: Instant,
    ) -> CmdResult {
        let result = commands::describe::run(&mut self.doc, id, text, location);
        self.defer(result, now)
    }

    pub fn toggle_status(&mut self, id: &CardId) -> CmdResult {
        let result = commands::status::toggle(&mut self.doc, id);
        self.persist(result)
    }

    /// Moves the card with `id` from wherever it is now to `destination`.
    pub fn move_card(&mut self, id: &CardId, destination: &Position) -> CmdResult {
        let Some((card, source)) = self.doc.find(id).map(|(c, p)| (c.clone(), p)) else {
            return CmdResult::noop(format!("No card {} to move", id.short()));
        };
        self.drop_card(card, &source, destination)
    }

    /// Drop primitive: places `payload` at `destination`, removing every other copy
    /// of its id first. `source` is where the client believes the card came from.
    pub fn drop_card(&mut self, payload: Card, source: &Position, destination: &Position) -> CmdResult {
        let policy = self.config.slot_policy();
        let result = commands::move_card::run(&mut self.doc, payload, source, destination, &policy);
        self.persist(result)
    }

    /// Moves the card into the first empty slot of `date`.
    pub fn move_to_first_open(&mut self, id: &CardId, date: DateKey) -> CmdResult {
        let policy = self.config.slot_policy();
        match commands::move_card::first_open(&self.doc, &date, &policy) {
            Some(index) => self.move_card(id, &Position::slot(date, index)),
            None => CmdResult::noop(format!("No open slot on {}", date)),
        }
    }

    /// Replaces the free-text notes; the save is deferred.
    pub fn set_notes(&mut self, text: &str) -> CmdResult {
        self.set_notes_at(text, Instant::now())
    }

    pub fn set_notes_at(&mut self, text: &str, now: Instant) -> CmdResult {
        let result = commands::notes::set(&mut self.doc, text);
        self.defer(result, now)
    }

    pub fn find_card(&self, id: &CardId) -> CmdResult {
        commands::find::run(&self.doc, id)
    }

    /// Resolves a full id or a unique id prefix.
    pub fn resolve_id(&self, input: &str) -> Result<CardId> {
        commands::find::resolve_prefix(&self.doc, input)
            .ok_or_else(|| BoardError::Api(format!("No unique card matches `{}`", input.trim())))
    }

    /// Writes an export bundle to `target` (a file, or a directory to put a
    /// timestamped file in).
    pub fn export(&self, target: &Path) -> Result<(CmdResult, PathBuf)> {
        let bundle = commands::export::bundle(&self.doc, Utc::now());
        let path = commands::export::write_bundle(&bundle, target)?;
        info!("event=export module=api path={}", path.display());

        let mut result = CmdResult::default();
        result.add_message(CmdMessage::success(format!(
            "Exported board to {}",
            path.display()
        )));
        Ok((result, path))
    }

    /// Replaces the board with the contents of an export (or plain document) file.
    pub fn import(&mut self, path: &Path) -> Result<CmdResult> {
        let content = fs::read_to_string(path).map_err(BoardError::Io)?;
        let incoming = commands::import::parse(&content)?;
        info!("event=import module=api path={}", path.display());
        let result = commands::import::run(&mut self.doc, incoming);
        Ok(self.persist(result))
    }

    /// Performs the deferred save if its delay has passed.
    pub fn poll_pending_save(&mut self) -> Option<SaveReport> {
        self.poll_pending_save_at(Instant::now())
    }

    pub fn poll_pending_save_at(&mut self, now: Instant) -> Option<SaveReport> {
        if self.pending.due(now) {
            Some(self.save_now())
        } else {
            None
        }
    }

    /// Performs the deferred save right away, if there is one.
    pub fn flush(&mut self) -> Option<SaveReport> {
        if self.pending.take() {
            Some(self.save_now())
        } else {
            None
        }
    }

    pub fn has_pending_save(&self) -> bool {
        self.pending.is_pending()
    }

    // --- Aggregations ---

    pub fn weekly_metrics(&self, start: DateKey) -> WeeklyMetrics {
        metrics::weekly_metrics(&self.doc, start, self.config.window_days)
    }

    pub fn monthly_calendar(&self, year: i32, month: u32) -> MonthCalendar {
        metrics::monthly_calendar(&self.doc, year, month, self.config.daily_goal)
    }

    pub fn kpis(&self, today: DateKey) -> Kpis {
        metrics::kpis(&self.doc, today, self.config.daily_goal)
    }

    pub fn type_breakdown(&self) -> TypeTally {
        metrics::type_breakdown(&self.doc)
    }

    pub fn weekly_trend(&self, start: DateKey, weeks: usize) -> Vec<TrendPoint> {
        metrics::weekly_trend(&self.doc, start, weeks)
    }

    pub fn week_grid(&self, start: DateKey, days: usize) -> Vec<DayColumn> {
        metrics::week_grid(
            &self.doc,
            start,
            days,
            &self.config.slot_policy(),
            &self.config.goals(),
        )
    }

    // --- Accessors ---

    pub fn document(&self) -> &AppDocument {
        &self.doc
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn load_origin(&self) -> LoadOrigin {
        self.load_origin
    }

    pub fn gateway(&self) -> &Gateway<R, C> {
        &self.gateway
    }

    fn persist(&mut self, result: CmdResult) -> CmdResult {
        if result.changed {
            self.pending.cancel();
            self.save_now();
        }
        result
    }

    fn defer(&mut self, result: CmdResult, now: Instant) -> CmdResult {
        if result.changed {
            self.pending.schedule(now);
        }
        result
    }

    fn save_now(&mut self) -> SaveReport {
        let report = self.gateway.save(&self.doc);
        if !report.is_clean() {
            warn!(
                "event=save module=api status=partial cache={} remote={:?}",
                report.cache_written, report.remote_written
            );
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::BoardFixture;
    use crate::store::memory::InMemoryStore;
    use std::time::Duration;

    type TestApi = BoardApi<InMemoryStore, InMemoryStore>;

    fn day(s: &str) -> DateKey {
        s.parse().unwrap()
    }

    fn open_with(doc: AppDocument) -> TestApi {
        let gateway = Gateway::new(
            Some(InMemoryStore::with_document(doc)),
            InMemoryStore::new(),
        );
        BoardApi::open(gateway, BoardConfig::default())
    }

    fn cache_saves(api: &TestApi) -> usize {
        api.gateway().cache().save_count()
    }

    #[test]
    fn open_reports_origin() {
        let api = open_with(BoardFixture::new().with_pool_card(CardType::Post, "x").build());
        assert_eq!(api.load_origin(), LoadOrigin::Remote);
        assert_eq!(api.document().pool.len(), 1);
    }

    #[test]
    fn structural_edits_save_immediately() {
        let mut api = open_with(AppDocument::new());
        let result = api.create_card(CardType::Reel);
        let id = result.affected_cards[0].id.clone();
        assert_eq!(cache_saves(&api), 1);

        api.move_card(&id, &Position::slot(day("2024-06-03"), 2));
        assert_eq!(cache_saves(&api), 2);
        let remote = api.gateway().remote().unwrap().document().unwrap();
        assert_eq!(remote, api.document());
    }

    #[test]
    fn noops_do_not_save() {
        let mut api = open_with(AppDocument::new());
        api.delete_card(&CardId::from("ghost"), CardLocation::Pool);
        api.toggle_status(&CardId::from("ghost"));
        api.move_card(&CardId::from("ghost"), &Position::Pool);
        assert_eq!(cache_saves(&api), 0);
    }

    #[test]
    fn description_save_is_debounced() {
        let mut api = open_with(BoardFixture::new().with_pool_card(CardType::Post, "").build());
        let id = api.document().pool[0].id.clone();
        let start = Instant::now();

        api.update_description_at(&id, "S", CardLocation::Pool, start);
        api.update_description_at(&id, "Su", CardLocation::Pool, start + Duration::from_millis(300));
        api.update_description_at(&id, "Sun", CardLocation::Pool, start + Duration::from_millis(600));
        assert_eq!(cache_saves(&api), 0);

        assert!(api.poll_pending_save_at(start + Duration::from_millis(1500)).is_none());
        assert!(api.poll_pending_save_at(start + Duration::from_millis(1600)).is_some());
        assert_eq!(cache_saves(&api), 1);
        assert_eq!(
            api.gateway().cache().document().unwrap().pool[0].description,
            "Sun"
        );
    }

    #[test]
    fn structural_save_cancels_pending_text_save() {
        let mut api = open_with(AppDocument::new());
        let start = Instant::now();
        api.set_notes_at("remember the launch", start);
        assert!(api.has_pending_save());

        api.create_card(CardType::Promo);
        assert!(!api.has_pending_save());
        assert_eq!(cache_saves(&api), 1);
        assert_eq!(
            api.gateway().cache().document().unwrap().notes,
            "remember the launch"
        );
        assert!(api.poll_pending_save_at(start + Duration::from_secs(5)).is_none());
    }

    #[test]
    fn flush_writes_pending_save() {
        let mut api = open_with(AppDocument::new());
        assert!(api.flush().is_none());
        api.set_notes("draft");
        let report = api.flush().unwrap();
        assert!(report.is_clean());
        assert!(api.flush().is_none());
    }

    #[test]
    fn save_failure_keeps_session_document() {
        let gateway = Gateway::new(Some(InMemoryStore::new().offline()), InMemoryStore::new());
        let mut api = BoardApi::open(gateway, BoardConfig::default());
        assert_eq!(api.load_origin(), LoadOrigin::Empty);

        api.create_card(CardType::Post);
        assert_eq!(api.document().pool.len(), 1);
        assert_eq!(cache_saves(&api), 1);
    }

    #[test]
    fn move_to_first_open_skips_taken_slots() {
        let mut api = open_with(
            BoardFixture::new()
                .with_full_day("2024-06-03", 2)
                .with_pool_card(CardType::Reel, "clip")
                .build(),
        );
        let id = api.document().pool[0].id.clone();

        api.move_to_first_open(&id, day("2024-06-03"));
        let found = api.find_card(&id).found.unwrap();
        assert_eq!(found.1, Position::slot(day("2024-06-03"), 2));
    }

    #[test]
    fn move_to_first_open_on_full_day_is_noop() {
        let mut api = open_with(
            BoardFixture::new()
                .with_full_day("2024-06-03", 6)
                .with_pool_card(CardType::Reel, "clip")
                .build(),
        );
        let id = api.document().pool[0].id.clone();
        let result = api.move_to_first_open(&id, day("2024-06-03"));
        assert!(!result.changed);
        assert_eq!(api.document().pool.len(), 1);
    }

    #[test]
    fn resolve_id_uses_prefixes() {
        let api = open_with(BoardFixture::new().with_pool_card(CardType::Post, "a").build());
        let id = api.document().pool[0].id.clone();
        assert_eq!(api.resolve_id(&id.as_str()[..6]).unwrap(), id);
        assert!(api.resolve_id("not-a-card").is_err());
    }

    #[test]
    fn export_then_import_restores_board() {
        let dir = tempfile::tempdir().unwrap();
        let original = BoardFixture::new()
            .with_scheduled("2024-06-03", 1, CardType::Promo)
            .with_notes("n")
            .build();
        let api = open_with(original.clone());
        let (_, path) = api.export(dir.path()).unwrap();

        let mut other = open_with(AppDocument::new());
        let result = other.import(&path).unwrap();
        assert!(result.changed);
        assert_eq!(other.document(), &original);
        assert_eq!(cache_saves(&other), 1);
    }

    #[test]
    fn aggregations_use_config_goals() {
        let api = open_with(BoardFixture::new().with_full_day("2024-06-03", 5).build());
        let grid = api.week_grid(day("2024-06-03"), 7);
        assert!(grid[0].goal_reached);
        assert_eq!(api.weekly_metrics(day("2024-06-03")).content_count, 5);
        assert!(api.monthly_calendar(2024, 6).days[2].success);
        assert_eq!(api.type_breakdown().post, 5);
    }
}
