use crate::commands::{CmdMessage, CmdResult};
use crate::error::{BoardError, Result};
use crate::model::{AppDocument, ExportBundle};
use serde_json::Value;

/// Parses either an export bundle or a bare board document.
pub fn parse(json: &str) -> Result<AppDocument> {
    let value: Value = serde_json::from_str(json).map_err(BoardError::Serialization)?;
    if !value.is_object() {
        return Err(BoardError::Api(
            "import file does not hold a board document".to_string(),
        ));
    }

    if value.get("appData").is_some() {
        let bundle: ExportBundle =
            serde_json::from_value(value).map_err(BoardError::Serialization)?;
        return Ok(bundle.into_document());
    }
    serde_json::from_value(value).map_err(BoardError::Serialization)
}

/// Replaces pool, schedule and notes with `incoming`.
pub fn run(doc: &mut AppDocument, incoming: AppDocument) -> CmdResult {
    let placed = incoming.schedule.cards().count();
    let pooled = incoming.pool.len();
    *doc = incoming;

    let mut result = CmdResult::default().mark_changed();
    result.add_message(CmdMessage::success(format!(
        "Imported {} scheduled and {} pooled cards",
        placed, pooled
    )));
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CardType;
    use crate::store::memory::fixtures::BoardFixture;
    use chrono::Utc;

    #[test]
    fn parses_export_bundle() {
        let doc = BoardFixture::new()
            .with_scheduled("2024-06-03", 1, CardType::Post)
            .with_notes("n")
            .build();
        let json = serde_json::to_string(&ExportBundle::from_document(&doc, Utc::now())).unwrap();
        assert_eq!(parse(&json).unwrap(), doc);
    }

    #[test]
    fn parses_plain_document() {
        let doc = BoardFixture::new()
            .with_pool_card(CardType::Reel, "r")
            .build();
        let json = serde_json::to_string(&doc).unwrap();
        assert_eq!(parse(&json).unwrap(), doc);
    }

    #[test]
    fn rejects_non_documents() {
        assert!(parse("[]").is_err());
        assert!(parse("nonsense").is_err());
    }

    #[test]
    fn replaces_everything() {
        let mut doc = BoardFixture::new()
            .with_pool_card(CardType::Post, "old")
            .with_notes("old notes")
            .build();
        let incoming = BoardFixture::new()
            .with_scheduled("2024-06-03", 0, CardType::Promo)
            .build();

        let result = run(&mut doc, incoming.clone());
        assert!(result.changed);
        assert_eq!(doc, incoming);
    }
}
