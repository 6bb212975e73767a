use crate::record::Metadata;
use crate::util::lock;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Stable numeric id for the calling thread.
///
/// Assigned on first use; small and monotonically increasing, which keeps
/// log headers readable compared to the opaque `std::thread::ThreadId`.
pub(crate) fn current_thread_id() -> u64 {
    static NEXT_THREAD_ID: AtomicU64 = AtomicU64::new(1);
    thread_local! {
        static THREAD_ID: u64 = NEXT_THREAD_ID.fetch_add(1, Ordering::Relaxed);
    }
    THREAD_ID.with(|id| *id)
}

#[derive(Default)]
struct ThreadEntry {
    indent: usize,
    // One stack per key; the top value shadows outer scopes and pops restore
    // the outer value.
    metadata: HashMap<String, Vec<Value>>,
}

impl ThreadEntry {
    fn is_empty(&self) -> bool {
        self.indent == 0 && self.metadata.is_empty()
    }
}

/// Indentation depth and metadata stacks, partitioned by calling thread.
///
/// Entries are created on the first indent or metadata push from a thread and
/// removed as soon as both are back to empty, so short-lived threads do not
/// accumulate state.
#[derive(Default)]
pub(crate) struct ThreadStates {
    entries: Mutex<HashMap<u64, ThreadEntry>>,
}

impl ThreadStates {
    fn with_entry<R>(&self, f: impl FnOnce(&mut ThreadEntry) -> R) -> R {
        let mut entries = lock(&self.entries);
        let key = current_thread_id();
        let entry = entries.entry(key).or_default();
        let out = f(entry);
        if entry.is_empty() {
            entries.remove(&key);
        }
        out
    }

    pub(crate) fn indent(&self) {
        self.with_entry(|entry| entry.indent += 1);
    }

    pub(crate) fn deindent(&self) {
        self.with_entry(|entry| entry.indent = entry.indent.saturating_sub(1));
    }

    pub(crate) fn indent_depth(&self) -> usize {
        lock(&self.entries)
            .get(&current_thread_id())
            .map_or(0, |entry| entry.indent)
    }

    pub(crate) fn push_metadata(&self, key: &str, value: Value) {
        self.with_entry(|entry| {
            entry.metadata.entry(key.to_string()).or_default().push(value);
        });
    }

    /// Pops one shadow level for the key; the key disappears only when its
    /// stack is exhausted.
    pub(crate) fn pop_metadata(&self, key: &str) {
        self.with_entry(|entry| {
            if let Some(stack) = entry.metadata.get_mut(key) {
                stack.pop();
                if stack.is_empty() {
                    entry.metadata.remove(key);
                }
            }
        });
    }

    pub(crate) fn clear_metadata(&self) {
        self.with_entry(|entry| entry.metadata.clear());
    }

    /// The calling thread's visible metadata: the top value of every stack.
    pub(crate) fn metadata_snapshot(&self) -> Metadata {
        lock(&self.entries)
            .get(&current_thread_id())
            .map_or_else(Metadata::new, |entry| {
                entry
                    .metadata
                    .iter()
                    .filter_map(|(k, stack)| stack.last().map(|v| (k.clone(), v.clone())))
                    .collect()
            })
    }

    /// Drops all per-thread state, for [`crate::LogRegistry::reset`].
    pub(crate) fn clear(&self) {
        lock(&self.entries).clear();
    }
}
