// Keyed debounce timers.
// Each key owns at most one pending timer; rescheduling a key aborts the old one.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

/// Registry of pending debounced messages keyed by input field.
///
/// A timer only sends a message once its quiet period elapses. Each scheduled
/// message carries the key's generation; rescheduling or cancelling bumps it,
/// so a message that was already sent but not yet received is rejected by
/// [`Debouncer::take_fired`]. Work started after a message is accepted is
/// not affected.
#[derive(Debug)]
pub struct Debouncer<K> {
    delay: Duration,
    pending: HashMap<K, JoinHandle<()>>,
    generations: HashMap<K, u64>,
}

impl<K: Eq + Hash + Copy> Debouncer<K> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: HashMap::new(),
            generations: HashMap::new(),
        }
    }

    fn bump(&mut self, key: K) -> u64 {
        let generation = self.generations.entry(key).or_insert(0);
        *generation += 1;
        *generation
    }

    /// Send the message built by `message` on `tx` after the quiet period,
    /// replacing any pending timer for `key`. Returns the new generation.
    pub fn schedule<M, F>(&mut self, key: K, tx: &UnboundedSender<M>, message: F) -> u64
    where
        M: Send + 'static,
        F: FnOnce(u64) -> M,
    {
        self.cancel(key);
        let generation = self.bump(key);
        let message = message(generation);

        let tx = tx.clone();
        let delay = self.delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(message);
        });
        self.pending.insert(key, handle);
        generation
    }

    /// Abort the pending timer for `key`. Returns true if one was still waiting.
    pub fn cancel(&mut self, key: K) -> bool {
        self.bump(key);
        match self.pending.remove(&key) {
            Some(handle) => {
                let was_pending = !handle.is_finished();
                handle.abort();
                was_pending
            }
            None => false,
        }
    }

    /// Whether a timer for `key` has not fired yet.
    pub fn is_pending(&self, key: K) -> bool {
        self.pending
            .get(&key)
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Accept a fired message. Returns false if `generation` was superseded.
    pub fn take_fired(&mut self, key: K, generation: u64) -> bool {
        if self.generations.get(&key) != Some(&generation) {
            return false;
        }
        self.pending.remove(&key);
        true
    }
}

impl<K> Debouncer<K> {
    pub fn cancel_all(&mut self) {
        for (_, handle) in self.pending.drain() {
            handle.abort();
        }
        for generation in self.generations.values_mut() {
            *generation += 1;
        }
    }
}

impl<K> Drop for Debouncer<K> {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
