//! Local cache + remote progress sync
//!
//! Reads merge the remote record over the local one. Writes go to the local
//! cache first, then to the remote. Every failure is logged and ignored;
//! progress is never worth stopping a game for.

use serde_json::Value;

use super::endpoint::{ProgressEndpoint, StoreRequest};
use super::{KeyValueStore, PROGRESS_KEY, StoreError};
use crate::spelling::ProgressBook;

/// The remote side of the sync
pub trait ProgressRemote {
    fn fetch(&mut self) -> Result<Value, StoreError>;
    fn push(&mut self, value: &Value) -> Result<(), StoreError>;
}

/// An in-process endpoint works as a remote (native tools and tests)
impl<S: KeyValueStore> ProgressRemote for ProgressEndpoint<S> {
    fn fetch(&mut self) -> Result<Value, StoreError> {
        let response = self.handle(StoreRequest::get());
        if response.is_success() {
            Ok(response.body)
        } else {
            Err(StoreError::Unavailable(response.body.to_string()))
        }
    }

    fn push(&mut self, value: &Value) -> Result<(), StoreError> {
        let response = self.handle(StoreRequest::put(value.to_string()));
        if response.is_success() {
            Ok(())
        } else {
            Err(StoreError::Unavailable(response.body.to_string()))
        }
    }
}

/// What a save managed to write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncStatus {
    pub local: bool,
    pub remote: bool,
}

#[derive(Debug)]
pub struct ProgressSync<L, R> {
    local: L,
    remote: Option<R>,
}

impl<L: KeyValueStore, R: ProgressRemote> ProgressSync<L, R> {
    pub fn new(local: L, remote: Option<R>) -> Self {
        Self { local, remote }
    }

    pub fn local(&self) -> &L {
        &self.local
    }

    pub fn remote_mut(&mut self) -> Option<&mut R> {
        self.remote.as_mut()
    }

    fn load_local(&self) -> ProgressBook {
        match self.local.get(PROGRESS_KEY) {
            Ok(Some(json)) => ProgressBook::from_json(&json).unwrap_or_else(|e| {
                log::warn!("Local progress unreadable, starting fresh: {}", e);
                ProgressBook::new()
            }),
            Ok(None) => ProgressBook::new(),
            Err(e) => {
                log::warn!("Local progress unavailable: {}", e);
                ProgressBook::new()
            }
        }
    }

    /// Local progress with the remote merged over it
    pub fn load(&mut self) -> ProgressBook {
        let mut book = self.load_local();

        if let Some(remote) = self.remote.as_mut() {
            match remote.fetch().and_then(|v| Ok(ProgressBook::from_value(v)?)) {
                Ok(remote_book) => {
                    log::info!(
                        "Merged {} remote progress entries over {} local",
                        remote_book.len(),
                        book.len()
                    );
                    book.merge_over(remote_book);
                    // Refresh the cache so the next offline start sees the merge
                    if let Err(e) = self.local.put(PROGRESS_KEY, &book.to_json()) {
                        log::warn!("Could not refresh local progress cache: {}", e);
                    }
                }
                Err(e) => log::warn!("Remote progress unavailable, using local: {}", e),
            }
        }

        book
    }

    /// Best-effort write to both sides
    pub fn save(&mut self, book: &ProgressBook) -> SyncStatus {
        let local = match self.local.put(PROGRESS_KEY, &book.to_json()) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Local progress save failed: {}", e);
                false
            }
        };

        let remote = match self.remote.as_mut() {
            Some(remote) => match remote.push(&book.to_value()) {
                Ok(()) => true,
                Err(e) => {
                    log::warn!("Remote progress sync failed: {}", e);
                    false
                }
            },
            None => false,
        };

        SyncStatus { local, remote }
    }
}
