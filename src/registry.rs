//! The style registry: an append-only, at-most-once cache from fingerprint to
//! generated stylesheet.
//!
//! Entries are never updated or removed. The registry is an ordinary value
//! owned by whoever drives the instances, so a test can start from an empty
//! one. [`StyleRegistry`] is the single-threaded store; [`SharedStyleRegistry`]
//! is a cloneable handle over a concurrent map for hosts that attach
//! instances from several threads.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::fingerprint::Fingerprint;

/// A registered stylesheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleEntry {
    pub css: String,
    /// Whether the host accepted the stylesheet. `false` means the instances
    /// sharing this fingerprint render unstyled.
    pub attached: bool,
}

/// Outcome of [`StyleStore::ensure_with`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// An entry already existed; nothing was synthesized
    Existing,
    /// The synthesizer ran and its output was stored
    Inserted,
}

pub trait StyleStore {
    fn has(&self, fingerprint: &Fingerprint) -> bool;

    /// Insert `css` under `fingerprint` unless an entry exists. Returns whether
    /// it inserted; a second put for the same fingerprint is a no-op.
    fn put(&mut self, fingerprint: Fingerprint, css: String) -> bool;

    /// Check-and-insert as one step: `synth` runs only when `fingerprint` is absent.
    fn ensure_with<F>(&mut self, fingerprint: &Fingerprint, synth: F) -> Registration
    where
        F: FnOnce() -> String;

    fn css(&self, fingerprint: &Fingerprint) -> Option<String>;

    fn mark_attached(&mut self, fingerprint: &Fingerprint);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every entry in insertion order
    fn snapshot(&self) -> Vec<(Fingerprint, StyleEntry)>;

    /// All registered CSS in insertion order, one stylesheet per line
    fn stylesheet(&self) -> String {
        self.snapshot()
            .into_iter()
            .map(|(_, entry)| entry.css)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Default)]
pub struct StyleRegistry {
    entries: HashMap<Fingerprint, StyleEntry>,
    order: Vec<Fingerprint>,
}

impl StyleRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StyleStore for StyleRegistry {
    fn has(&self, fingerprint: &Fingerprint) -> bool {
        self.entries.contains_key(fingerprint)
    }

    fn put(&mut self, fingerprint: Fingerprint, css: String) -> bool {
        if self.entries.contains_key(&fingerprint) {
            return false;
        }
        tracing::debug!(fingerprint = %fingerprint, "registering stylesheet");
        self.order.push(fingerprint.clone());
        self.entries.insert(
            fingerprint,
            StyleEntry {
                css,
                attached: false,
            },
        );
        true
    }

    fn ensure_with<F>(&mut self, fingerprint: &Fingerprint, synth: F) -> Registration
    where
        F: FnOnce() -> String,
    {
        if self.has(fingerprint) {
            return Registration::Existing;
        }
        self.put(fingerprint.clone(), synth());
        Registration::Inserted
    }

    fn css(&self, fingerprint: &Fingerprint) -> Option<String> {
        self.entries.get(fingerprint).map(|e| e.css.clone())
    }

    fn mark_attached(&mut self, fingerprint: &Fingerprint) {
        if let Some(entry) = self.entries.get_mut(fingerprint) {
            entry.attached = true;
        }
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn snapshot(&self) -> Vec<(Fingerprint, StyleEntry)> {
        self.order
            .iter()
            .filter_map(|fp| self.entries.get(fp).map(|e| (fp.clone(), e.clone())))
            .collect()
    }
}

#[derive(Debug)]
struct SharedEntry {
    seq: usize,
    entry: StyleEntry,
}

/// Cloneable, thread-safe registry handle. Every clone sees the same entries.
#[derive(Debug, Clone, Default)]
pub struct SharedStyleRegistry {
    entries: Arc<DashMap<Fingerprint, SharedEntry>>,
    next_seq: Arc<AtomicUsize>,
}

impl SharedStyleRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StyleStore for SharedStyleRegistry {
    fn has(&self, fingerprint: &Fingerprint) -> bool {
        self.entries.contains_key(fingerprint)
    }

    fn put(&mut self, fingerprint: Fingerprint, css: String) -> bool {
        self.ensure_with(&fingerprint, || css) == Registration::Inserted
    }

    fn ensure_with<F>(&mut self, fingerprint: &Fingerprint, synth: F) -> Registration
    where
        F: FnOnce() -> String,
    {
        // The vacant entry holds the shard lock until the insert lands
        match self.entries.entry(fingerprint.clone()) {
            Entry::Occupied(_) => Registration::Existing,
            Entry::Vacant(vacant) => {
                tracing::debug!(fingerprint = %fingerprint, "registering stylesheet");
                let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
                vacant.insert(SharedEntry {
                    seq,
                    entry: StyleEntry {
                        css: synth(),
                        attached: false,
                    },
                });
                Registration::Inserted
            }
        }
    }

    fn css(&self, fingerprint: &Fingerprint) -> Option<String> {
        self.entries.get(fingerprint).map(|e| e.entry.css.clone())
    }

    fn mark_attached(&mut self, fingerprint: &Fingerprint) {
        if let Some(mut shared) = self.entries.get_mut(fingerprint) {
            shared.entry.attached = true;
        }
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn snapshot(&self) -> Vec<(Fingerprint, StyleEntry)> {
        let mut all: Vec<(usize, Fingerprint, StyleEntry)> = self
            .entries
            .iter()
            .map(|r| (r.value().seq, r.key().clone(), r.value().entry.clone()))
            .collect();
        all.sort_by_key(|(seq, _, _)| *seq);
        all.into_iter().map(|(_, fp, e)| (fp, e)).collect()
    }
}
