use crate::commands::{CmdMessage, CmdResult};
use crate::model::{AppDocument, CardId, CardLocation};

/// Removes the card from the pool, or empties every slot holding it.
/// Unknown ids are a no-op.
pub fn run(doc: &mut AppDocument, id: &CardId, location: CardLocation) -> CmdResult {
    let mut removed = Vec::new();

    match location {
        CardLocation::Pool => {
            let mut kept = Vec::with_capacity(doc.pool.len());
            for card in doc.pool.drain(..) {
                if &card.id == id {
                    removed.push(card);
                } else {
                    kept.push(card);
                }
            }
            doc.pool = kept;
        }
        CardLocation::Schedule => {
            for (_, slots) in doc.schedule.days_mut() {
                for slot in slots.iter_mut() {
                    if slot.as_ref().is_some_and(|c| &c.id == id) {
                        removed.extend(slot.take());
                    }
                }
            }
        }
    }

    if removed.is_empty() {
        return CmdResult::noop(format!("No card {} to delete", id.short()));
    }

    let mut result = CmdResult::default().mark_changed();
    result.add_message(CmdMessage::success(format!("Card deleted ({})", id.short())));
    result.with_affected_cards(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datekey::DateKey;
    use crate::model::{Card, CardType};
    use crate::store::memory::fixtures::BoardFixture;

    #[test]
    fn deletes_from_pool() {
        let mut doc = BoardFixture::new()
            .with_pool_card(CardType::Post, "a")
            .with_pool_card(CardType::Reel, "b")
            .build();
        let id = doc.pool[0].id.clone();

        let result = run(&mut doc, &id, CardLocation::Pool);
        assert!(result.changed);
        assert_eq!(doc.pool.len(), 1);
        assert_eq!(doc.pool[0].description, "b");
    }

    #[test]
    fn nulls_slot_and_keeps_array_length() {
        let mut doc = BoardFixture::new()
            .with_scheduled("2024-06-03", 2, CardType::Promo)
            .build();
        let date: DateKey = "2024-06-03".parse().unwrap();
        let id = doc.schedule.day(&date).unwrap()[2].as_ref().unwrap().id.clone();

        run(&mut doc, &id, CardLocation::Schedule);
        let slots = doc.schedule.day(&date).unwrap();
        assert_eq!(slots.len(), 6);
        assert!(slots.iter().all(Option::is_none));
    }

    #[test]
    fn clears_drifted_duplicates_across_days() {
        let mut doc = AppDocument::new();
        let card = Card::new(CardType::Post);
        for day in ["2024-06-03", "2024-06-09"] {
            doc.schedule.day_or_insert(day.parse().unwrap(), 6)[0] = Some(card.clone());
        }

        run(&mut doc, &card.id, CardLocation::Schedule);
        assert_eq!(doc.occurrences(&card.id), 0);
    }

    #[test]
    fn location_limits_the_search() {
        let mut doc = BoardFixture::new()
            .with_pool_card(CardType::Post, "pooled")
            .build();
        let id = doc.pool[0].id.clone();

        let result = run(&mut doc, &id, CardLocation::Schedule);
        assert!(!result.changed);
        assert_eq!(doc.pool.len(), 1);
    }

    #[test]
    fn unknown_id_is_a_noop() {
        let mut doc = BoardFixture::new()
            .with_pool_card(CardType::Post, "a")
            .build();
        let before = doc.clone();

        let result = run(&mut doc, &CardId::from("ghost"), CardLocation::Pool);
        assert!(!result.changed);
        assert_eq!(doc, before);
    }
}
