/// What `push` does with snapshots ahead of the pointer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HistoryPolicy {
    /// Snapshots past the pointer survive a push; the new snapshot goes after them and
    /// the pointer jumps to it.
    #[default]
    AppendOnly,
    /// Snapshots past the pointer are dropped before the push, so redo after
    /// undo-then-draw is a no-op.
    DiscardFuture,
}

/// Linear snapshot history with a pointer at the current state.
///
/// Never empty: it is created with the initial snapshot and `0 <= pointer < len` holds
/// after every call.
#[derive(Debug)]
pub struct History<T> {
    entries: Vec<T>,
    pointer: usize,
    policy: HistoryPolicy,
}

impl<T> History<T> {
    pub fn new(initial: T, policy: HistoryPolicy) -> Self {
        Self {
            entries: vec![initial],
            pointer: 0,
            policy,
        }
    }

    pub fn push(&mut self, entry: T) {
        if self.policy == HistoryPolicy::DiscardFuture {
            self.entries.truncate(self.pointer + 1);
        }
        self.entries.push(entry);
        self.pointer = self.entries.len() - 1;
    }

    /// Steps back and returns the entry to restore, or `None` at the oldest entry.
    pub fn undo(&mut self) -> Option<&T> {
        if self.pointer == 0 {
            return None;
        }
        self.pointer -= 1;
        self.entries.get(self.pointer)
    }

    /// Steps forward and returns the entry to restore, or `None` at the newest entry.
    pub fn redo(&mut self) -> Option<&T> {
        if self.pointer + 1 >= self.entries.len() {
            return None;
        }
        self.pointer += 1;
        self.entries.get(self.pointer)
    }

    pub fn can_undo(&self) -> bool {
        self.pointer > 0
    }

    pub fn can_redo(&self) -> bool {
        self.pointer + 1 < self.entries.len()
    }

    pub fn current(&self) -> &T {
        &self.entries[self.pointer]
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn pointer(&self) -> usize {
        self.pointer
    }
}
