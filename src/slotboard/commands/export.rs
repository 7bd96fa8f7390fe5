use crate::error::{BoardError, Result};
use crate::model::{AppDocument, ExportBundle};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};

/// Snapshot of the board in the export format.
pub fn bundle(doc: &AppDocument, now: DateTime<Utc>) -> ExportBundle {
    ExportBundle::from_document(doc, now)
}

/// `slotboard-export-YYYY-MM-DD_HH-MM-SS.json`
pub fn default_filename(now: DateTime<Utc>) -> String {
    format!("slotboard-export-{}.json", now.format("%Y-%m-%d_%H-%M-%S"))
}

/// Writes `bundle` to `target`. A directory target gets the default file name.
pub fn write_bundle(bundle: &ExportBundle, target: &Path) -> Result<PathBuf> {
    let path = if target.is_dir() {
        target.join(default_filename(bundle.timestamp))
    } else {
        target.to_path_buf()
    };
    let content = serde_json::to_string_pretty(bundle).map_err(BoardError::Serialization)?;
    fs::write(&path, content).map_err(BoardError::Io)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CardType;
    use crate::store::memory::fixtures::BoardFixture;
    use chrono::TimeZone;

    #[test]
    fn filename_carries_timestamp() {
        let now = Utc.with_ymd_and_hms(2024, 6, 3, 14, 5, 9).unwrap();
        assert_eq!(
            default_filename(now),
            "slotboard-export-2024-06-03_14-05-09.json"
        );
    }

    #[test]
    fn writes_bundle_into_directory() {
        let dir = tempfile::tempdir().unwrap();
        let doc = BoardFixture::new()
            .with_pool_card(CardType::Post, "a")
            .with_scheduled("2024-06-03", 0, CardType::Reel)
            .with_notes("keep")
            .build();
        let now = Utc.with_ymd_and_hms(2024, 6, 3, 8, 0, 0).unwrap();

        let path = write_bundle(&bundle(&doc, now), dir.path()).unwrap();
        assert_eq!(path, dir.path().join(default_filename(now)));

        let written: ExportBundle =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written.timestamp, now);
        assert_eq!(written.into_document(), doc);
    }
}
