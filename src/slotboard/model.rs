use crate::datekey::DateKey;
use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Opaque card identifier. New ids are hyphenless UUIDs, but ids read from a
/// stored document are kept verbatim whatever their shape.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(String);

impl CardId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First eight characters, enough to tell cards apart on screen.
    pub fn short(&self) -> &str {
        match self.0.char_indices().nth(8) {
            Some((end, _)) => &self.0[..end],
            None => &self.0,
        }
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CardId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for CardId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardType {
    Post,
    Promo,
    Reel,
}

impl CardType {
    pub const ALL: [CardType; 3] = [CardType::Post, CardType::Promo, CardType::Reel];

    pub fn label(&self) -> &'static str {
        match self {
            CardType::Post => "Post",
            CardType::Promo => "Promo",
            CardType::Reel => "Reel",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            CardType::Post => "📷",
            CardType::Promo => "📢",
            CardType::Reel => "🎬",
        }
    }

    /// Posts and promos count toward the content goal, reels have their own.
    pub fn is_content(&self) -> bool {
        matches!(self, CardType::Post | CardType::Promo)
    }
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label().to_lowercase())
    }
}

impl FromStr for CardType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "post" => Ok(CardType::Post),
            "promo" => Ok(CardType::Promo),
            "reel" => Ok(CardType::Reel),
            other => Err(format!(
                "unknown card type `{}` (expected post, promo or reel)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardStatus {
    Scheduled,
    Posted,
}

impl CardStatus {
    pub fn toggled(self) -> Self {
        match self {
            CardStatus::Scheduled => CardStatus::Posted,
            CardStatus::Posted => CardStatus::Scheduled,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: CardId,
    #[serde(rename = "type")]
    pub kind: CardType,
    #[serde(default)]
    pub description: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    // Only placed cards carry a status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<CardStatus>,
}

impl Card {
    pub fn new(kind: CardType) -> Self {
        Self {
            id: CardId::generate(),
            kind,
            description: String::new(),
            created_at: Utc::now(),
            status: None,
        }
    }

    /// Status as displayed: a placed card without one is treated as scheduled.
    pub fn effective_status(&self) -> CardStatus {
        self.status.unwrap_or(CardStatus::Scheduled)
    }

    pub fn is_posted(&self) -> bool {
        self.status == Some(CardStatus::Posted)
    }
}

pub type Slot = Option<Card>;

/// A concrete slot in the schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotRef {
    pub date: DateKey,
    pub index: usize,
}

impl SlotRef {
    pub fn new(date: DateKey, index: usize) -> Self {
        Self { date, index }
    }
}

impl fmt::Display for SlotRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.date, self.index + 1)
    }
}

/// Where a card sits, or where it should go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    Pool,
    Slot(SlotRef),
}

impl Position {
    pub fn slot(date: DateKey, index: usize) -> Self {
        Position::Slot(SlotRef::new(date, index))
    }

    pub fn location(&self) -> CardLocation {
        match self {
            Position::Pool => CardLocation::Pool,
            Position::Slot(_) => CardLocation::Schedule,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::Pool => write!(f, "pool"),
            Position::Slot(slot) => write!(f, "{}", slot),
        }
    }
}

/// Coarse location used by delete and describe, which search a whole area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardLocation {
    Pool,
    Schedule,
}

/// Date-key → slot array. Days are kept in calendar order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Schedule(BTreeMap<DateKey, Vec<Slot>>);

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn day(&self, date: &DateKey) -> Option<&[Slot]> {
        self.0.get(date).map(Vec::as_slice)
    }

    pub fn day_mut(&mut self, date: &DateKey) -> Option<&mut Vec<Slot>> {
        self.0.get_mut(date)
    }

    /// The day's slot array, created with `min_slots` empty slots if absent.
    pub fn day_or_insert(&mut self, date: DateKey, min_slots: usize) -> &mut Vec<Slot> {
        self.0.entry(date).or_insert_with(|| vec![None; min_slots])
    }

    pub fn insert_day(&mut self, date: DateKey, slots: Vec<Slot>) {
        self.0.insert(date, slots);
    }

    pub fn days(&self) -> impl Iterator<Item = (&DateKey, &Vec<Slot>)> {
        self.0.iter()
    }

    pub fn days_mut(&mut self) -> impl Iterator<Item = (&DateKey, &mut Vec<Slot>)> {
        self.0.iter_mut()
    }

    /// Every placed card with its slot, in date then slot order.
    pub fn cards(&self) -> impl Iterator<Item = (SlotRef, &Card)> {
        self.0.iter().flat_map(|(date, slots)| {
            slots
                .iter()
                .enumerate()
                .filter_map(move |(index, slot)| {
                    slot.as_ref().map(|card| (SlotRef::new(*date, index), card))
                })
        })
    }

    /// Occupied slots on `date`; zero for a day with no array.
    pub fn occupied(&self, date: &DateKey) -> usize {
        self.day(date)
            .map(|slots| slots.iter().filter(|s| s.is_some()).count())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    fn from_raw(raw: BTreeMap<String, Value>) -> Self {
        let mut days = BTreeMap::new();
        for (key, value) in raw {
            let date = match key.parse::<DateKey>() {
                Ok(date) => date,
                Err(_) => {
                    warn!("event=decode_schedule module=model status=skipped reason=bad_key key={key}");
                    continue;
                }
            };
            match value {
                Value::Array(items) => {
                    let slots = items
                        .into_iter()
                        .map(|item| decode_card(item, &key))
                        .collect();
                    days.insert(date, slots);
                }
                _ => {
                    warn!("event=decode_schedule module=model status=skipped reason=not_array key={key}");
                }
            }
        }
        Self(days)
    }
}

impl<'de> Deserialize<'de> for Schedule {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<BTreeMap<String, Value>>::deserialize(deserializer)?;
        Ok(Self::from_raw(raw.unwrap_or_default()))
    }
}

fn lenient_pool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Card>, D::Error> {
    let raw = Option::<Vec<Value>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|item| decode_card(item, "pool"))
        .collect())
}

/// Decodes one stored card. `null` is an empty slot; anything else that is not a
/// card is skipped with a warning, since the next save drops it for good.
fn decode_card(item: Value, location: &str) -> Option<Card> {
    if item.is_null() {
        return None;
    }
    match serde_json::from_value::<Card>(item) {
        Ok(card) => Some(card),
        Err(err) => {
            warn!("event=decode_card module=model status=skipped location={location} error={err}");
            None
        }
    }
}

fn nullable_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// The whole persisted board: pool, schedule and the free-text notes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppDocument {
    #[serde(default, deserialize_with = "lenient_pool")]
    pub pool: Vec<Card>,
    #[serde(default)]
    pub schedule: Schedule,
    #[serde(default, deserialize_with = "nullable_string")]
    pub notes: String,
}

impl AppDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when there is nothing worth keeping. Days whose slots are all empty
    /// don't count as content.
    pub fn is_empty(&self) -> bool {
        self.pool.is_empty() && self.schedule.cards().next().is_none() && self.notes.is_empty()
    }

    /// Looks in the pool first, then every day in date order.
    pub fn find(&self, id: &CardId) -> Option<(&Card, Position)> {
        if let Some(card) = self.pool.iter().find(|c| &c.id == id) {
            return Some((card, Position::Pool));
        }
        self.schedule
            .cards()
            .find(|(_, card)| &card.id == id)
            .map(|(slot, card)| (card, Position::Slot(slot)))
    }

    /// Removes every copy of `id`, from the pool and from every slot. Returns the
    /// first copy found, if any.
    pub fn remove_everywhere(&mut self, id: &CardId) -> Option<Card> {
        let mut removed = None;
        let mut kept = Vec::with_capacity(self.pool.len());
        for card in self.pool.drain(..) {
            if &card.id == id {
                removed.get_or_insert(card);
            } else {
                kept.push(card);
            }
        }
        self.pool = kept;

        for (_, slots) in self.schedule.days_mut() {
            for slot in slots.iter_mut() {
                if slot.as_ref().is_some_and(|c| &c.id == id) {
                    if let Some(card) = slot.take() {
                        removed.get_or_insert(card);
                    }
                }
            }
        }
        removed
    }

    /// How many times `id` appears across pool and schedule.
    pub fn occurrences(&self, id: &CardId) -> usize {
        self.pool.iter().filter(|c| &c.id == id).count()
            + self.schedule.cards().filter(|(_, c)| &c.id == id).count()
    }
}

/// Pool and schedule as nested in an export file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardData {
    #[serde(default, deserialize_with = "lenient_pool")]
    pub pool: Vec<Card>,
    #[serde(default)]
    pub schedule: Schedule,
}

/// Downloadable snapshot: `{ appData, permanentNotes, timestamp }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportBundle {
    pub app_data: BoardData,
    #[serde(default, deserialize_with = "nullable_string")]
    pub permanent_notes: String,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl ExportBundle {
    pub fn from_document(doc: &AppDocument, timestamp: DateTime<Utc>) -> Self {
        Self {
            app_data: BoardData {
                pool: doc.pool.clone(),
                schedule: doc.schedule.clone(),
            },
            permanent_notes: doc.notes.clone(),
            timestamp,
        }
    }

    pub fn into_document(self) -> AppDocument {
        AppDocument {
            pool: self.app_data.pool,
            schedule: self.app_data.schedule,
            notes: self.permanent_notes,
        }
    }
}
