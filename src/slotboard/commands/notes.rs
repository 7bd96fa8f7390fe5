use crate::commands::CmdResult;
use crate::model::AppDocument;

/// Replaces the board notes.
pub fn set(doc: &mut AppDocument, text: &str) -> CmdResult {
    if doc.notes == text {
        return CmdResult::default();
    }
    doc.notes = text.to_string();
    CmdResult::default().mark_changed()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_notes() {
        let mut doc = AppDocument::new();
        assert!(set(&mut doc, "ideas: summer sale").changed);
        assert_eq!(doc.notes, "ideas: summer sale");
    }

    #[test]
    fn same_text_is_not_a_change() {
        let mut doc = AppDocument::new();
        set(&mut doc, "x");
        assert!(!set(&mut doc, "x").changed);
    }
}
