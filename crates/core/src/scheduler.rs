//! Scheduler module - deferred engine work
//!
//! The engine never nests timers. Work that has to happen later (the lock
//! check, the end of the line-clear animation, the end of the resume
//! countdown) is queued here with a due time and the piece generation it was
//! scheduled for. When the generation has moved on the entry is stale and is
//! dropped instead of fired.

use arrayvec::ArrayVec;

/// Kinds of deferred work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Deferred {
    /// Re-check whether a resting piece can still fall, lock it otherwise
    LockCheck,
    /// Collapse the flashing rows and spawn the next piece
    FinishLineClear,
    /// Countdown is over, play continues
    ResumeCountdown,
}

/// A queued piece of deferred work
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry {
    pub kind: Deferred,
    /// Clock value at which the entry fires
    pub due_ms: u64,
    /// Generation captured at scheduling time
    pub generation: u32,
}

/// Pending deferred work, at most one entry per kind.
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    entries: ArrayVec<Entry, 3>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `kind` to fire `delay_ms` after `now_ms`.
    /// Replaces a pending entry of the same kind.
    pub fn schedule(&mut self, kind: Deferred, now_ms: u64, delay_ms: u32, generation: u32) {
        self.cancel(kind);
        self.entries.push(Entry {
            kind,
            due_ms: now_ms + delay_ms as u64,
            generation,
        });
    }

    /// Drop a pending entry. Returns whether one existed.
    pub fn cancel(&mut self, kind: Deferred) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.kind != kind);
        self.entries.len() != before
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_pending(&self, kind: Deferred) -> bool {
        self.entries.iter().any(|e| e.kind == kind)
    }

    pub fn get(&self, kind: Deferred) -> Option<&Entry> {
        self.entries.iter().find(|e| e.kind == kind)
    }

    /// Milliseconds until `kind` fires, zero if already due
    pub fn remaining_ms(&self, kind: Deferred, now_ms: u64) -> Option<u64> {
        self.get(kind).map(|e| e.due_ms.saturating_sub(now_ms))
    }

    /// Remove and return the earliest entry that is due at `now_ms`.
    ///
    /// While `paused`, nothing is returned and due entries stay queued until
    /// the pause ends. Only the resume countdown may fire while paused, since
    /// it is what ends the pause.
    /// Entries whose generation differs from `generation` are discarded.
    pub fn pop_due(&mut self, now_ms: u64, generation: u32, paused: bool) -> Option<Entry> {
        self.entries.retain(|e| e.generation == generation);

        let (pos, _) = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due_ms <= now_ms)
            .filter(|(_, e)| !paused || e.kind == Deferred::ResumeCountdown)
            .min_by_key(|(_, e)| e.due_ms)?;
        Some(self.entries.remove(pos))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
