//! Speculative cursor over a lazily pulled, append-only buffer
//!
//! A [`Cursor`] wraps any iterator and remembers every item it has pulled, so
//! that grammar rules can look ahead and back off without re-reading the
//! source. Cursors are cheap to [`fork`](Cursor::fork): a fork shares the
//! parent's buffer but owns its own position. A rule that accepts a production
//! calls [`commit`](Cursor::commit) to write the fork's position back into the
//! parent; a rule that declines simply drops the fork.
//!
//! # Positions
//!
//! A cursor's position is the index of its *current* item, i.e. the item most
//! recently returned by [`advance`](Cursor::advance). A freshly created cursor
//! has not started yet and has no current item.
//!
//! ```text
//! buffer:   [a] [b] [c] [d] ...      (shared by every fork)
//! parent:        ^                   current = b
//! fork(0):  ^                        re-reads b on its first advance
//! fork(1):       ^                   reads c on its first advance
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Index of a cursor that has not returned any item yet.
const BEFORE_START: isize = -1;

/// Cursor failure conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorError {
    /// The underlying source has no more items
    Exhausted,
    /// `current()` was called before the first `advance()`
    NotStarted,
}

impl fmt::Display for CursorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CursorError::Exhausted => write!(f, "cursor source is exhausted"),
            CursorError::NotStarted => write!(f, "cursor iteration has not started"),
        }
    }
}

impl std::error::Error for CursorError {}

/// Items pulled so far, plus the source they came from.
struct Buffer<I: Iterator> {
    source: I,
    items: Vec<I::Item>,
}

impl<I: Iterator> Buffer<I>
where
    I::Item: Clone,
{
    /// Returns the item at `index`, pulling from the source until it is buffered.
    fn fetch(&mut self, index: usize) -> Option<I::Item> {
        while self.items.len() <= index {
            let item = self.source.next()?;
            self.items.push(item);
        }
        Some(self.items[index].clone())
    }
}

/// Forkable, position-tracking view over a shared item buffer.
///
/// The `'p` lifetime ties a fork to its parent: the fork holds a borrow of the
/// parent's position cell and nothing else, so dropping a fork can never
/// change anything the parent can observe.
pub struct Cursor<'p, I: Iterator> {
    buffer: Rc<RefCell<Buffer<I>>>,
    index: Cell<isize>,
    parent: Option<&'p Cell<isize>>,
}

impl<I: Iterator> Cursor<'static, I>
where
    I::Item: Clone,
{
    /// Create a root cursor over `source`. Nothing is pulled until the first advance.
    pub fn new(source: I) -> Self {
        Self {
            buffer: Rc::new(RefCell::new(Buffer {
                source,
                items: Vec::new(),
            })),
            index: Cell::new(BEFORE_START),
            parent: None,
        }
    }
}

impl<'p, I: Iterator> Cursor<'p, I>
where
    I::Item: Clone,
{
    /// Move to the next item, pulling it from the source if no fork has yet.
    pub fn advance(&self) -> Result<I::Item, CursorError> {
        let next = self.index.get() + 1;
        let item = self
            .buffer
            .borrow_mut()
            .fetch(next as usize)
            .ok_or(CursorError::Exhausted)?;
        self.index.set(next);
        Ok(item)
    }

    /// The item at this cursor's position.
    pub fn current(&self) -> Result<I::Item, CursorError> {
        let index = self.position().ok_or(CursorError::NotStarted)?;
        self.get(index).ok_or(CursorError::NotStarted)
    }

    /// Move back by `n` items. Rewinding past the first item leaves the
    /// cursor in its not-started state.
    pub fn rewind(&self, n: usize) {
        let index = self.index.get() - n as isize;
        self.index.set(index.max(BEFORE_START));
    }

    /// Fork a child positioned at `position - 1 + offset`.
    ///
    /// `fork(0)` re-reads the current item on its first advance, `fork(1)`
    /// continues with the item after it. The child never starts beyond what
    /// has already been buffered.
    pub fn fork(&self, offset: usize) -> Cursor<'_, I> {
        let buffered = self.buffer.borrow().items.len() as isize;
        let index = (self.index.get() - 1 + offset as isize).clamp(BEFORE_START, buffered - 1);
        Cursor {
            buffer: Rc::clone(&self.buffer),
            index: Cell::new(index),
            parent: Some(&self.index),
        }
    }

    /// Write this cursor's position into its parent. No-op on a root cursor.
    pub fn commit(&self) {
        if let Some(parent) = self.parent {
            parent.set(self.index.get());
        }
    }

    /// Index of the current item, or `None` before the first advance.
    pub fn position(&self) -> Option<usize> {
        usize::try_from(self.index.get()).ok()
    }

    /// An already buffered item. Never pulls from the source.
    pub fn get(&self, index: usize) -> Option<I::Item> {
        self.buffer.borrow().items.get(index).cloned()
    }

    /// Number of items pulled from the source so far, across all forks.
    pub fn buffered_len(&self) -> usize {
        self.buffer.borrow().items.len()
    }
}

impl<I: Iterator> fmt::Debug for Cursor<'_, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("index", &self.index.get())
            .field("buffered", &self.buffer.borrow().items.len())
            .field("is_fork", &self.parent.is_some())
            .finish()
    }
}
