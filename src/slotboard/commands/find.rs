use crate::commands::CmdResult;
use crate::model::{AppDocument, CardId};

/// Looks a card up by id: pool first, then the schedule in date order.
pub fn run(doc: &AppDocument, id: &CardId) -> CmdResult {
    match doc.find(id) {
        Some((card, position)) => CmdResult::default().with_found(card.clone(), position),
        None => CmdResult::noop(format!("No card {}", id.short())),
    }
}

/// Expands a full id or a unique id prefix. Ambiguous and unknown input gives `None`.
pub fn resolve_prefix(doc: &AppDocument, input: &str) -> Option<CardId> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    let exact = CardId::from(input);
    if doc.find(&exact).is_some() {
        return Some(exact);
    }

    let mut matches = doc
        .pool
        .iter()
        .map(|c| &c.id)
        .chain(doc.schedule.cards().map(|(_, c)| &c.id))
        .filter(|id| id.as_str().starts_with(input));

    let first = matches.next()?.clone();
    if matches.any(|other| other != &first) {
        return None;
    }
    Some(first)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Card, CardType, Position};

    fn doc_with_ids(pool: &[&str], scheduled: &[&str]) -> AppDocument {
        let mut doc = AppDocument::new();
        for id in pool {
            let mut card = Card::new(CardType::Post);
            card.id = CardId::from(*id);
            doc.pool.push(card);
        }
        let slots = doc.schedule.day_or_insert("2024-06-03".parse().unwrap(), 6);
        for (index, id) in scheduled.iter().enumerate() {
            let mut card = Card::new(CardType::Reel);
            card.id = CardId::from(*id);
            slots[index] = Some(card);
        }
        doc
    }

    #[test]
    fn finds_pool_and_scheduled_cards() {
        let doc = doc_with_ids(&["p1"], &["s1", "s2"]);

        let found = run(&doc, &CardId::from("p1")).found.unwrap();
        assert_eq!(found.1, Position::Pool);

        let found = run(&doc, &CardId::from("s2")).found.unwrap();
        assert_eq!(
            found.1,
            Position::slot("2024-06-03".parse().unwrap(), 1)
        );
    }

    #[test]
    fn missing_card_is_not_found() {
        let doc = doc_with_ids(&["p1"], &[]);
        let result = run(&doc, &CardId::from("nope"));
        assert!(result.found.is_none());
        assert_eq!(result.messages.len(), 1);
    }

    #[test]
    fn resolves_unique_prefixes() {
        let doc = doc_with_ids(&["abc123", "abd999"], &["zzz000"]);
        assert_eq!(resolve_prefix(&doc, "abc"), Some(CardId::from("abc123")));
        assert_eq!(resolve_prefix(&doc, "zz"), Some(CardId::from("zzz000")));
        assert_eq!(resolve_prefix(&doc, "ab"), None);
        assert_eq!(resolve_prefix(&doc, "q"), None);
        assert_eq!(resolve_prefix(&doc, ""), None);
    }

    #[test]
    fn exact_id_wins_over_longer_matches() {
        let doc = doc_with_ids(&["ab", "abc"], &[]);
        assert_eq!(resolve_prefix(&doc, "ab"), Some(CardId::from("ab")));
    }
}
