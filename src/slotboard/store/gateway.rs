use super::DocumentStore;
use crate::model::AppDocument;
use log::{debug, info, warn};

/// Where the document handed out by [`Gateway::load`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOrigin {
    /// The remote held a document; it wins.
    Remote,
    /// The remote was empty, the cache was copied into it.
    Migrated,
    /// Read from the cache (no remote, remote unreachable, or migration failed).
    Cache,
    /// Nothing usable anywhere; a fresh document.
    Empty,
}

/// Outcome of a save. Never an error: callers only log it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveReport {
    pub cache_written: bool,
    /// `None` when no remote is configured.
    pub remote_written: Option<bool>,
}

impl SaveReport {
    pub fn is_clean(&self) -> bool {
        self.cache_written && self.remote_written != Some(false)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RemoteState {
    Absent,
    Empty,
    Unreachable,
}

/// Remote document store plus local cache.
pub struct Gateway<R: DocumentStore, C: DocumentStore> {
    remote: Option<R>,
    cache: C,
}

impl<R: DocumentStore, C: DocumentStore> Gateway<R, C> {
    pub fn new(remote: Option<R>, cache: C) -> Self {
        Self { remote, cache }
    }

    pub fn remote(&self) -> Option<&R> {
        self.remote.as_ref()
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Loads the board. A non-empty remote document is authoritative; otherwise the
    /// cache is used and, when the remote answered but was empty, copied into it.
    pub fn load(&mut self) -> (AppDocument, LoadOrigin) {
        let remote_state = match &self.remote {
            None => RemoteState::Absent,
            Some(remote) => match remote.load() {
                Ok(Some(doc)) if !doc.is_empty() => {
                    info!(
                        "event=load module=store status=ok origin=remote store={}",
                        remote.describe()
                    );
                    return (doc, LoadOrigin::Remote);
                }
                Ok(_) => RemoteState::Empty,
                Err(err) => {
                    warn!(
                        "event=load module=store status=error origin=remote store={} error={}",
                        remote.describe(),
                        err
                    );
                    RemoteState::Unreachable
                }
            },
        };

        let cached = match self.cache.load() {
            Ok(Some(doc)) => doc,
            Ok(None) => {
                debug!("event=load module=store status=empty origin=cache");
                return (AppDocument::new(), LoadOrigin::Empty);
            }
            Err(err) => {
                warn!(
                    "event=load module=store status=error origin=cache store={} error={}",
                    self.cache.describe(),
                    err
                );
                return (AppDocument::new(), LoadOrigin::Empty);
            }
        };

        if remote_state != RemoteState::Empty || cached.is_empty() {
            info!("event=load module=store status=ok origin=cache");
            return (cached, LoadOrigin::Cache);
        }

        let origin = match self.remote.as_mut() {
            Some(remote) => match remote.save(&cached) {
                Ok(()) => {
                    info!(
                        "event=migrate module=store status=ok store={}",
                        remote.describe()
                    );
                    LoadOrigin::Migrated
                }
                Err(err) => {
                    warn!(
                        "event=migrate module=store status=error store={} error={}",
                        remote.describe(),
                        err
                    );
                    LoadOrigin::Cache
                }
            },
            None => LoadOrigin::Cache,
        };
        (cached, origin)
    }

    /// Writes the cache unconditionally and the remote if there is one.
    pub fn save(&mut self, doc: &AppDocument) -> SaveReport {
        let cache_written = match self.cache.save(doc) {
            Ok(()) => true,
            Err(err) => {
                warn!(
                    "event=save module=store status=error target=cache store={} error={}",
                    self.cache.describe(),
                    err
                );
                false
            }
        };

        let remote_written = self.remote.as_mut().map(|remote| match remote.save(doc) {
            Ok(()) => true,
            Err(err) => {
                warn!(
                    "event=save module=store status=error target=remote store={} error={}",
                    remote.describe(),
                    err
                );
                false
            }
        });

        debug!(
            "event=save module=store status=done cache={} remote={:?}",
            cache_written, remote_written
        );
        SaveReport {
            cache_written,
            remote_written,
        }
    }
}
