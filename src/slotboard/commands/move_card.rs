//! The drag-and-drop primitive.
//!
//! A move always starts by removing the card id from *everywhere*: the pool and
//! every slot of every day. The stated source is not trusted, because the stored
//! document may have drifted (another tab or device saving over us). Only then is
//! the card placed at its destination, so a move can never leave two copies behind.
//!
//! Placement overwrites the destination slot positionally. If another card sat
//! there it is dropped from the board; clients that want a swap issue two moves.

use crate::commands::{card_title, CmdMessage, CmdResult};
use crate::config::SlotPolicy;
use crate::datekey::DateKey;
use crate::model::{AppDocument, Card, CardStatus, Position};
use log::debug;

/// Most empty slots a single move may add past the end of a day. Indexes inside
/// the current array are always accepted.
pub const MAX_SLOT_GAP: usize = 64;

/// Moves `payload` from `source` to `destination`.
///
/// `payload` is the card as the client saw it when the drag started. If the card
/// has since disappeared from the document the payload is still placed.
pub fn run(
    doc: &mut AppDocument,
    payload: Card,
    source: &Position,
    destination: &Position,
    policy: &SlotPolicy,
) -> CmdResult {
    if let Position::Slot(slot) = destination {
        let limit = day_len(doc, &slot.date, policy) + MAX_SLOT_GAP;
        if slot.index >= limit {
            return CmdResult::noop(format!(
                "Slot {} is out of range (max {})",
                slot.index + 1,
                limit
            ));
        }
    }

    let existing = doc.remove_everywhere(&payload.id);
    debug!(
        "event=move module=commands id={} from={} to={} known={}",
        payload.id,
        source,
        destination,
        existing.is_some()
    );
    let mut card = payload;

    match destination {
        Position::Pool => {
            card.status = None;
            doc.pool.push(card.clone());
        }
        Position::Slot(slot) => {
            if matches!(source, Position::Pool) || card.status.is_none() {
                card.status = Some(CardStatus::Scheduled);
            }

            let slots = doc.schedule.day_or_insert(slot.date, policy.min_slots);
            if slot.index >= slots.len() {
                slots.resize(slot.index + 1, None);
            }
            slots[slot.index] = Some(card.clone());

            if policy.growing && slots.last().is_some_and(Option::is_some) {
                slots.push(None);
            }
        }
    }

    let mut result = CmdResult::default().mark_changed();
    result.add_message(CmdMessage::success(format!(
        "Moved to {}: {}",
        destination,
        card_title(&card)
    )));
    result.with_affected_cards(vec![card])
}

fn day_len(doc: &AppDocument, date: &DateKey, policy: &SlotPolicy) -> usize {
    doc.schedule
        .day(date)
        .map_or(policy.min_slots, |slots| slots.len())
}

/// First empty slot of `date`. A day without an array yet opens at slot 0; a full
/// fixed day has none.
pub fn first_open(doc: &AppDocument, date: &DateKey, policy: &SlotPolicy) -> Option<usize> {
    match doc.schedule.day(date) {
        None if policy.min_slots > 0 => Some(0),
        None => None,
        Some(slots) => slots.iter().position(Option::is_none),
    }
}
