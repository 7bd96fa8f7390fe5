use super::DocumentStore;
use crate::error::{BoardError, Result};
use crate::model::AppDocument;

/// In-memory storage for testing and development.
/// Does NOT persist data.
#[derive(Default)]
pub struct InMemoryStore {
    doc: Option<AppDocument>,
    offline: bool,
    saves: usize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(doc: AppDocument) -> Self {
        Self {
            doc: Some(doc),
            ..Self::default()
        }
    }

    /// While offline every call fails, like a remote that can't be reached.
    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    pub fn offline(mut self) -> Self {
        self.offline = true;
        self
    }

    /// Stored document, read directly (ignores the offline switch).
    pub fn document(&self) -> Option<&AppDocument> {
        self.doc.as_ref()
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.saves
    }

    fn check_online(&self) -> Result<()> {
        if self.offline {
            return Err(BoardError::Store("store is offline".to_string()));
        }
        Ok(())
    }
}

impl DocumentStore for InMemoryStore {
    fn load(&self) -> Result<Option<AppDocument>> {
        self.check_online()?;
        Ok(self.doc.clone())
    }

    fn save(&mut self, doc: &AppDocument) -> Result<()> {
        self.check_online()?;
        self.doc = Some(doc.clone());
        self.saves += 1;
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use crate::datekey::DateKey;
    use crate::model::{AppDocument, Card, CardStatus, CardType};

    /// Builds documents for tests without going through the commands.
    pub struct BoardFixture {
        pub doc: AppDocument,
        slots_per_day: usize,
    }

    impl Default for BoardFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl BoardFixture {
        pub fn new() -> Self {
            Self {
                doc: AppDocument::new(),
                slots_per_day: 6,
            }
        }

        pub fn with_slots_per_day(mut self, slots: usize) -> Self {
            self.slots_per_day = slots;
            self
        }

        pub fn with_pool_card(mut self, kind: CardType, description: &str) -> Self {
            let mut card = Card::new(kind);
            card.description = description.to_string();
            self.doc.pool.push(card);
            self
        }

        /// Places a new card of `kind` at `index` on `date` (`YYYY-MM-DD`).
        pub fn with_scheduled(mut self, date: &str, index: usize, kind: CardType) -> Self {
            let date: DateKey = date.parse().expect("fixture date");
            let mut card = Card::new(kind);
            card.status = Some(CardStatus::Scheduled);
            let slots = self.doc.schedule.day_or_insert(date, self.slots_per_day);
            if slots.len() <= index {
                slots.resize(index + 1, None);
            }
            slots[index] = Some(card);
            self
        }

        /// Fills the first `count` slots of `date` with posts.
        pub fn with_full_day(mut self, date: &str, count: usize) -> Self {
            for index in 0..count {
                self = self.with_scheduled(date, index, CardType::Post);
            }
            self
        }

        pub fn with_notes(mut self, notes: &str) -> Self {
            self.doc.notes = notes.to_string();
            self
        }

        pub fn build(self) -> AppDocument {
            self.doc
        }
    }
}
