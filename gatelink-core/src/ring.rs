//! Fixed-capacity circular byte queue
//!
//! One slot is always left unused so that `in == out` means empty and
//! `in + 1 == out` means full, without a separate counter. A buffer of `N`
//! slots therefore holds at most `N - 1` bytes.
//!
//! The buffer itself has no synchronization. A [`crate::Transport`] keeps
//! it inside its exclusive section so that the task side and the interrupt
//! side never touch the indices at the same time.

/// Circular FIFO of `N` byte slots
#[derive(Debug, Clone)]
pub struct RingBuffer<const N: usize> {
    slots: [u8; N],
    /// Write index
    head: usize,
    /// Read index
    tail: usize,
}

impl<const N: usize> Default for RingBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> RingBuffer<N> {
    /// Create an empty buffer
    pub const fn new() -> Self {
        assert!(N >= 2, "ring buffer needs at least two slots");
        Self {
            slots: [0u8; N],
            head: 0,
            tail: 0,
        }
    }

    /// Maximum number of bytes held at once (`N - 1`)
    pub const fn capacity(&self) -> usize {
        N - 1
    }

    const fn next(index: usize) -> usize {
        (index + 1) % N
    }

    /// Append a byte, handing it back if the buffer is full
    pub fn push(&mut self, byte: u8) -> Result<(), u8> {
        if self.is_full() {
            return Err(byte);
        }
        self.slots[self.head] = byte;
        self.head = Self::next(self.head);
        Ok(())
    }

    /// Remove the oldest byte
    pub fn pop(&mut self) -> Option<u8> {
        if self.is_empty() {
            return None;
        }
        let byte = self.slots[self.tail];
        self.tail = Self::next(self.tail);
        Some(byte)
    }

    /// Number of queued bytes
    pub fn len(&self) -> usize {
        (self.head + N - self.tail) % N
    }

    pub fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    pub fn is_full(&self) -> bool {
        Self::next(self.head) == self.tail
    }
}
