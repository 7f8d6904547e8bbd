use std::collections::VecDeque;

/// Default number of snapshots kept for undo.
pub const DEFAULT_HISTORY: usize = 64;

/// Two-stack snapshot history. The undo side is bounded; the oldest
/// snapshot is dropped once `capacity` is exceeded.
#[derive(Debug, Clone)]
pub struct UndoStack<T> {
    undo: VecDeque<T>,
    redo: Vec<T>,
    capacity: usize,
}

impl<T> UndoStack<T> {
    /// Create a stack holding at most `capacity` snapshots.
    pub fn new(capacity: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    /// Record the state that existed before a mutation. Clears redo.
    pub fn push(&mut self, previous: T) {
        self.undo.push_back(previous);
        if self.undo.len() > self.capacity {
            self.undo.pop_front();
        }
        self.redo.clear();
    }

    /// Swap `current` with the most recent snapshot. Returns `false` when
    /// there is nothing to undo.
    pub fn undo(&mut self, current: &mut T) -> bool {
        match self.undo.pop_back() {
            Some(previous) => {
                self.redo.push(std::mem::replace(current, previous));
                true
            }
            None => false,
        }
    }

    /// Swap `current` with the most recently undone snapshot.
    pub fn redo(&mut self, current: &mut T) -> bool {
        match self.redo.pop() {
            Some(next) => {
                self.undo.push_back(std::mem::replace(current, next));
                true
            }
            None => false,
        }
    }

    /// Whether there is anything to undo.
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    /// Whether there is anything to redo.
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Drop all history.
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

impl<T> Default for UndoStack<T> {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undo_then_redo_round_trips() {
        let mut stack = UndoStack::default();
        let mut value = 1;
        stack.push(value);
        value = 2;

        assert!(stack.undo(&mut value));
        assert_eq!(value, 1);
        assert!(stack.redo(&mut value));
        assert_eq!(value, 2);
        assert!(!stack.redo(&mut value));
    }

    #[test]
    fn push_clears_redo() {
        let mut stack = UndoStack::default();
        let mut value = 1;
        stack.push(value);
        value = 2;
        stack.undo(&mut value);
        stack.push(value);
        assert!(!stack.can_redo());
    }

    #[test]
    fn capacity_drops_oldest() {
        let mut stack = UndoStack::new(2);
        let mut value = 0;
        for next in 1..=3 {
            stack.push(value);
            value = next;
        }
        assert!(stack.undo(&mut value));
        assert!(stack.undo(&mut value));
        assert_eq!(value, 1);
        assert!(!stack.undo(&mut value));
    }
}
