//! The single shared coordinate pair.
//!
//! [`CoordinateOwner`] is the only writer; panels hold a
//! [`CoordinateReader`] subscribed to the same channel, so every reader sees
//! the same pair.

use tokio::sync::watch;

use crate::model::Coordinates;

#[derive(Debug)]
pub struct CoordinateOwner {
    tx: watch::Sender<Option<Coordinates>>,
}

impl Default for CoordinateOwner {
    fn default() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }
}

impl CoordinateOwner {
    /// Replaces the pair. Readers are notified even if the value is unchanged.
    pub fn set(&self, coords: Coordinates) {
        self.tx.send_replace(Some(coords));
        tracing::debug!(%coords, "coordinates replaced");
    }

    pub fn get(&self) -> Option<Coordinates> {
        *self.tx.borrow()
    }

    pub fn reader(&self) -> CoordinateReader {
        CoordinateReader { rx: self.tx.subscribe() }
    }
}

#[derive(Debug, Clone)]
pub struct CoordinateReader {
    rx: watch::Receiver<Option<Coordinates>>,
}

impl CoordinateReader {
    pub fn current(&self) -> Option<Coordinates> {
        *self.rx.borrow()
    }

    /// Returns the pair if it was replaced since the last call and marks it seen.
    pub fn take_change(&mut self) -> Option<Coordinates> {
        match self.rx.has_changed() {
            Ok(true) => *self.rx.borrow_and_update(),
            _ => None,
        }
    }
}
