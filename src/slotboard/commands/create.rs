use crate::commands::{CmdMessage, CmdResult};
use crate::model::{AppDocument, Card, CardType};

/// Adds a fresh, untitled card of `kind` to the end of the pool.
pub fn run(doc: &mut AppDocument, kind: CardType) -> CmdResult {
    let card = Card::new(kind);
    doc.pool.push(card.clone());

    let mut result = CmdResult::default().mark_changed();
    result.add_message(CmdMessage::success(format!(
        "{} created ({})",
        kind.label(),
        card.id.short()
    )));
    result.with_affected_cards(vec![card])
}
