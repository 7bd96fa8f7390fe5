use crate::commands::{card_title, CmdMessage, CmdResult};
use crate::model::{AppDocument, CardId, CardStatus};

/// Flips a scheduled card between scheduled and posted. Pool cards have no
/// status and are left alone.
pub fn toggle(doc: &mut AppDocument, id: &CardId) -> CmdResult {
    let card = doc
        .schedule
        .days_mut()
        .flat_map(|(_, slots)| slots.iter_mut())
        .filter_map(Option::as_mut)
        .find(|c| &c.id == id);

    let Some(card) = card else {
        return CmdResult::noop(format!("No scheduled card {}", id.short()));
    };

    let next = card.effective_status().toggled();
    card.status = Some(next);

    let verb = match next {
        CardStatus::Posted => "posted",
        CardStatus::Scheduled => "scheduled",
    };
    let mut result = CmdResult::default().mark_changed();
    result.add_message(CmdMessage::success(format!(
        "Marked {}: {}",
        verb,
        card_title(card)
    )));
    result.with_affected_cards(vec![card.clone()])
}
