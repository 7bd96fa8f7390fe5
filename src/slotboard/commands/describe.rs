use crate::commands::CmdResult;
use crate::model::{AppDocument, CardId, CardLocation};

/// Overwrites the description of the first card with `id` in `location`.
pub fn run(doc: &mut AppDocument, id: &CardId, text: &str, location: CardLocation) -> CmdResult {
    let card = match location {
        CardLocation::Pool => doc.pool.iter_mut().find(|c| &c.id == id),
        CardLocation::Schedule => doc
            .schedule
            .days_mut()
            .flat_map(|(_, slots)| slots.iter_mut())
            .filter_map(Option::as_mut)
            .find(|c| &c.id == id),
    };

    match card {
        Some(card) => {
            card.description = text.to_string();
            CmdResult::default()
                .mark_changed()
                .with_affected_cards(vec![card.clone()])
        }
        None => CmdResult::noop(format!("No card {} to describe", id.short())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datekey::DateKey;
    use crate::model::CardType;
    use crate::store::memory::fixtures::BoardFixture;

    #[test]
    fn updates_pool_card() {
        let mut doc = BoardFixture::new()
            .with_pool_card(CardType::Post, "")
            .build();
        let id = doc.pool[0].id.clone();

        let result = run(&mut doc, &id, "Summer launch", CardLocation::Pool);
        assert!(result.changed);
        assert_eq!(doc.pool[0].description, "Summer launch");
    }

    #[test]
    fn updates_scheduled_card() {
        let mut doc = BoardFixture::new()
            .with_scheduled("2024-06-03", 4, CardType::Reel)
            .build();
        let date: DateKey = "2024-06-03".parse().unwrap();
        let id = doc.schedule.day(&date).unwrap()[4].as_ref().unwrap().id.clone();

        run(&mut doc, &id, "Behind the scenes", CardLocation::Schedule);
        let card = doc.schedule.day(&date).unwrap()[4].as_ref().unwrap();
        assert_eq!(card.description, "Behind the scenes");
    }

    #[test]
    fn empty_text_is_allowed() {
        let mut doc = BoardFixture::new()
            .with_pool_card(CardType::Promo, "old")
            .build();
        let id = doc.pool[0].id.clone();
        run(&mut doc, &id, "", CardLocation::Pool);
        assert_eq!(doc.pool[0].description, "");
    }

    #[test]
    fn wrong_location_is_a_noop() {
        let mut doc = BoardFixture::new()
            .with_pool_card(CardType::Post, "keep")
            .build();
        let id = doc.pool[0].id.clone();

        let result = run(&mut doc, &id, "changed", CardLocation::Schedule);
        assert!(!result.changed);
        assert_eq!(doc.pool[0].description, "keep");
    }
}
