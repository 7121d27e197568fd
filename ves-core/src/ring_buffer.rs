//! Bounded Ring Buffer
//!
//! Fixed-capacity FIFO connecting producer threads to the delivery agent.
//! A single mutex guards both cursors and the slot array; a condition variable
//! signals "became non-empty". Writes never block. Reads block until an item
//! arrives or the buffer is closed and drained.
//!
//! One slot is always left empty so that `next_read == next_write` means
//! empty and `(next_write + 1) % capacity == next_read` means full. A buffer of
//! capacity `N` therefore holds at most `N - 1` items.

use parking_lot::{Condvar, Mutex};
use std::time::{Duration, Instant};
use tracing::debug;

/// Default number of slots (one of which stays empty)
pub const DEFAULT_RING_CAPACITY: usize = 100;

/// Error creating a ring buffer
#[derive(Debug, thiserror::Error)]
pub enum RingBufferError {
    #[error("Ring buffer capacity must be greater than zero")]
    ZeroCapacity,
}

/// Rejected write. The item is handed back to the caller.
#[derive(Debug, thiserror::Error)]
pub enum WriteError<T> {
    #[error("Ring buffer is full")]
    Full(T),

    #[error("Ring buffer is closed")]
    Closed(T),
}

impl<T> WriteError<T> {
    pub fn into_inner(self) -> T {
        match self {
            WriteError::Full(item) | WriteError::Closed(item) => item,
        }
    }
}

struct RingState<T> {
    slots: Vec<Option<T>>,
    next_write: usize,
    next_read: usize,
    closed: bool,
}

impl<T> RingState<T> {
    fn occupancy(&self) -> usize {
        let capacity = self.slots.len();
        (self.next_write + capacity - self.next_read) % capacity
    }

    fn pop(&mut self) -> Option<T> {
        if self.next_read == self.next_write {
            return None;
        }
        let item = self.slots[self.next_read].take();
        self.next_read = (self.next_read + 1) % self.slots.len();
        item
    }
}

/// Bounded multi-producer FIFO with a blocking read
pub struct RingBuffer<T> {
    state: Mutex<RingState<T>>,
    not_empty: Condvar,
    capacity: usize,
}

impl<T> RingBuffer<T> {
    /// Create a ring buffer with `capacity` slots
    pub fn new(capacity: usize) -> Result<Self, RingBufferError> {
        if capacity == 0 {
            return Err(RingBufferError::ZeroCapacity);
        }

        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);

        debug!(capacity, "Ring buffer initialized");

        Ok(Self {
            state: Mutex::new(RingState {
                slots,
                next_write: 0,
                next_read: 0,
                closed: false,
            }),
            not_empty: Condvar::new(),
            capacity,
        })
    }

    /// Append an item without blocking.
    ///
    /// Fails with [`WriteError::Full`] once `capacity - 1` items are queued and
    /// with [`WriteError::Closed`] after [`RingBuffer::close`].
    pub fn write(&self, item: T) -> Result<(), WriteError<T>> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(WriteError::Closed(item));
        }

        let occupancy = state.occupancy();
        if occupancy >= self.capacity - 1 {
            debug!(occupancy, capacity = self.capacity, "Ring buffer full");
            return Err(WriteError::Full(item));
        }

        let slot = state.next_write;
        state.slots[slot] = Some(item);
        state.next_write = (slot + 1) % self.capacity;
        drop(state);

        self.not_empty.notify_one();
        Ok(())
    }

    /// Remove the oldest item, blocking while the buffer is empty.
    ///
    /// Returns `None` only once the buffer is closed and drained.
    pub fn read(&self) -> Option<T> {
        let mut state = self.state.lock();
        loop {
            if let Some(item) = state.pop() {
                return Some(item);
            }
            if state.closed {
                return None;
            }
            self.not_empty.wait(&mut state);
        }
    }

    /// Like [`RingBuffer::read`], giving up after `timeout`
    pub fn read_timeout(&self, timeout: Duration) -> Option<T> {
        let deadline = Instant::now() + timeout;
        let mut state = self.state.lock();
        loop {
            if let Some(item) = state.pop() {
                return Some(item);
            }
            if state.closed {
                return None;
            }
            if self.not_empty.wait_until(&mut state, deadline).timed_out() {
                return state.pop();
            }
        }
    }

    /// Remove the oldest item if there is one
    pub fn try_read(&self) -> Option<T> {
        self.state.lock().pop()
    }

    /// Whether the buffer is empty. Stale as soon as it returns.
    pub fn is_empty(&self) -> bool {
        let state = self.state.lock();
        state.next_read == state.next_write
    }

    /// Number of queued items. Stale as soon as it returns.
    pub fn len(&self) -> usize {
        self.state.lock().occupancy()
    }

    /// Number of slots, including the one that always stays empty
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Refuse further writes and wake every blocked reader
    pub fn close(&self) {
        self.state.lock().closed = true;
        self.not_empty.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(matches!(
            RingBuffer::<u32>::new(0),
            Err(RingBufferError::ZeroCapacity)
        ));
    }

    #[test]
    fn test_fifo_order() {
        let ring = RingBuffer::new(10).unwrap();
        for i in 0..8 {
            ring.write(i).unwrap();
        }
        for i in 0..8 {
            assert_eq!(ring.read(), Some(i));
        }
        assert!(ring.is_empty());
    }

    #[test]
    fn test_full_drops_capacity_th_write() {
        let capacity = 5;
        let ring = RingBuffer::new(capacity).unwrap();
        for i in 0..capacity - 1 {
            assert!(ring.write(i).is_ok());
        }
        assert_eq!(ring.len(), capacity - 1);

        match ring.write(99) {
            Err(WriteError::Full(item)) => assert_eq!(item, 99),
            other => panic!("expected full, got {:?}", other),
        }

        // Draining one slot makes room again
        assert_eq!(ring.read(), Some(0));
        assert!(ring.write(99).is_ok());
    }

    #[test]
    fn test_wraparound_keeps_order() {
        let ring = RingBuffer::new(4).unwrap();
        let mut next = 0;
        let mut expected = 0;
        for _ in 0..10 {
            ring.write(next).unwrap();
            next += 1;
            ring.write(next).unwrap();
            next += 1;
            assert_eq!(ring.read(), Some(expected));
            assert_eq!(ring.read(), Some(expected + 1));
            expected += 2;
        }
    }

    #[test]
    fn test_capacity_one_holds_nothing() {
        let ring = RingBuffer::new(1).unwrap();
        assert!(matches!(ring.write(1), Err(WriteError::Full(1))));
        assert!(ring.is_empty());
    }

    #[test]
    fn test_read_blocks_until_write() {
        let ring = Arc::new(RingBuffer::new(4).unwrap());
        let reader_ring = Arc::clone(&ring);

        let reader = thread::spawn(move || {
            let value = reader_ring.read();
            (value, Instant::now())
        });

        thread::sleep(Duration::from_millis(100));
        assert!(!reader.is_finished());

        let written_at = Instant::now();
        ring.write(7).unwrap();

        let (value, read_at) = reader.join().unwrap();
        assert_eq!(value, Some(7));
        assert!(read_at.duration_since(written_at) < Duration::from_secs(1));
    }

    #[test]
    fn test_read_timeout_on_empty() {
        let ring: RingBuffer<u32> = RingBuffer::new(4).unwrap();
        let start = Instant::now();
        assert_eq!(ring.read_timeout(Duration::from_millis(50)), None);
        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[test]
    fn test_close_drains_then_ends() {
        let ring = RingBuffer::new(4).unwrap();
        ring.write(1).unwrap();
        ring.write(2).unwrap();
        ring.close();

        assert!(ring.is_closed());
        assert!(matches!(ring.write(3), Err(WriteError::Closed(3))));
        assert_eq!(ring.read(), Some(1));
        assert_eq!(ring.read(), Some(2));
        assert_eq!(ring.read(), None);
    }

    #[test]
    fn test_close_wakes_blocked_reader() {
        let ring: Arc<RingBuffer<u32>> = Arc::new(RingBuffer::new(4).unwrap());
        let reader_ring = Arc::clone(&ring);
        let reader = thread::spawn(move || reader_ring.read());

        thread::sleep(Duration::from_millis(50));
        ring.close();
        assert_eq!(reader.join().unwrap(), None);
    }

    #[test]
    fn test_concurrent_producers() {
        let ring = Arc::new(RingBuffer::new(1001).unwrap());
        let producers: Vec<_> = (0..4)
            .map(|p| {
                let ring = Arc::clone(&ring);
                thread::spawn(move || {
                    for i in 0..250 {
                        ring.write(p * 1000 + i).unwrap();
                    }
                })
            })
            .collect();
        for producer in producers {
            producer.join().unwrap();
        }

        assert_eq!(ring.len(), 1000);
        let mut last_seen = [None; 4];
        while let Some(item) = ring.try_read() {
            let producer = (item / 1000) as usize;
            let seq = item % 1000;
            if let Some(prev) = last_seen[producer] {
                assert!(seq > prev, "per-producer order violated");
            }
            last_seen[producer] = Some(seq);
        }
    }
}
