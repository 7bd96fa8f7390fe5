use slotboard::api::BoardApi;
use slotboard::config::BoardConfig;
use slotboard::model::{AppDocument, Card, CardType, Position};
use slotboard::store::fs::FileStore;
use slotboard::store::{DocumentStore, Gateway, LoadOrigin};
use std::fs;
use tempfile::TempDir;

fn doc_with_pool(descriptions: &[&str]) -> AppDocument {
    let mut doc = AppDocument::new();
    for description in descriptions {
        let mut card = Card::new(CardType::Post);
        card.description = description.to_string();
        doc.pool.push(card);
    }
    doc
}

#[test]
fn cache_is_migrated_into_empty_remote() {
    let dir = TempDir::new().unwrap();
    let remote_path = dir.path().join("remote").join("board.json");
    let mut cache = FileStore::in_dir(dir.path().join("cache"));
    let local = doc_with_pool(&["from this machine"]);
    cache.save(&local).unwrap();

    let mut gateway = Gateway::new(Some(FileStore::new(&remote_path)), cache);
    let (doc, origin) = gateway.load();
    assert_eq!(origin, LoadOrigin::Migrated);
    assert_eq!(doc, local);

    let remote = FileStore::new(&remote_path).load().unwrap().unwrap();
    assert_eq!(remote, local);

    // the second load finds the remote populated
    let (_, origin) = gateway.load();
    assert_eq!(origin, LoadOrigin::Remote);
}

#[test]
fn remote_wins_over_cache() {
    let dir = TempDir::new().unwrap();
    let mut remote = FileStore::new(dir.path().join("shared.json"));
    let mut cache = FileStore::in_dir(dir.path().join("cache"));
    remote.save(&doc_with_pool(&["shared"])).unwrap();
    cache.save(&doc_with_pool(&["stale"])).unwrap();

    let (doc, origin) = Gateway::new(Some(remote), cache).load();
    assert_eq!(origin, LoadOrigin::Remote);
    assert_eq!(doc.pool[0].description, "shared");
}

#[test]
fn unreadable_remote_falls_back_to_cache() {
    let dir = TempDir::new().unwrap();
    let remote_path = dir.path().join("shared.json");
    fs::write(&remote_path, "{ not json").unwrap();
    let mut cache = FileStore::in_dir(dir.path().join("cache"));
    cache.save(&doc_with_pool(&["offline copy"])).unwrap();

    let (doc, origin) = Gateway::new(Some(FileStore::new(&remote_path)), cache).load();
    assert_eq!(origin, LoadOrigin::Cache);
    assert_eq!(doc.pool[0].description, "offline copy");
    // no migration over a remote we could not read
    assert_eq!(fs::read_to_string(&remote_path).unwrap(), "{ not json");
}

#[test]
fn malformed_cache_gives_empty_board() {
    let dir = TempDir::new().unwrap();
    let cache_dir = dir.path().join("cache");
    fs::create_dir_all(&cache_dir).unwrap();
    fs::write(cache_dir.join("board.json"), "[1, 2, 3]").unwrap();

    let gateway: Gateway<FileStore, FileStore> = Gateway::new(None, FileStore::in_dir(&cache_dir));
    let api = BoardApi::open(gateway, BoardConfig::default());
    assert_eq!(api.load_origin(), LoadOrigin::Empty);
    assert!(api.document().is_empty());
}

#[test]
fn lenient_decoding_keeps_good_entries() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("board.json");
    fs::write(
        &path,
        r#"{
            "pool": [{"id": "a1", "type": "promo", "description": "ok"}],
            "schedule": {
                "2024-06-03": [{"id": "b2", "type": "reel", "description": ""}, null, 42],
                "not-a-date": [null],
                "2024-06-04": "nope"
            }
        }"#,
    )
    .unwrap();

    let doc = FileStore::new(&path).load().unwrap().unwrap();
    assert_eq!(doc.pool.len(), 1);
    assert_eq!(doc.notes, "");
    assert_eq!(doc.schedule.len(), 1);
    let day = doc.schedule.day(&"2024-06-03".parse().unwrap()).unwrap();
    assert_eq!(day.len(), 3);
    assert!(day[0].is_some());
    assert!(day[2].is_none());
}

#[test]
fn session_survives_unwritable_remote() {
    let dir = TempDir::new().unwrap();
    // a directory where the remote file should be makes every remote write fail
    let remote_path = dir.path().join("blocked");
    fs::create_dir_all(remote_path.join("board.json")).unwrap();
    let remote = FileStore::in_dir(&remote_path);
    let cache = FileStore::in_dir(dir.path().join("cache"));

    let mut api = BoardApi::open(Gateway::new(Some(remote), cache), BoardConfig::default());
    let id = api.create_card(CardType::Reel).affected_cards[0].id.clone();
    let result = api.move_card(&id, &Position::slot("2024-06-03".parse().unwrap(), 0));
    assert!(result.changed);

    let cached = FileStore::in_dir(dir.path().join("cache")).load().unwrap().unwrap();
    assert_eq!(&cached, api.document());
}
