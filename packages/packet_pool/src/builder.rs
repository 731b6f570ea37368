use std::num::NonZero;

use crate::{DEFAULT_CAPACITY, PacketPool};

/// Builder for creating an instance of [`PacketPool`].
///
/// You only need to use this builder if you want a capacity other than
/// [`DEFAULT_CAPACITY`]. The default configuration used by
/// [`PacketPool::new()`][1] is sufficient for most use cases.
///
/// # Examples
///
/// ```
/// use new_zealand::nz;
/// use packet_pool::PacketPool;
///
/// let pool = PacketPool::builder().capacity(nz!(64)).build();
///
/// assert_eq!(pool.capacity(), 64);
/// ```
///
/// [1]: PacketPool::new
#[derive(Debug)]
#[must_use]
pub struct PacketPoolBuilder {
    capacity: NonZero<usize>,
}

impl PacketPoolBuilder {
    pub(crate) fn new() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }

    /// Sets the number of packets the pool will own for its entire lifetime.
    ///
    /// All packets are allocated up front by [`build()`][Self::build]; the
    /// pool never grows or shrinks afterwards. Size this to the maximum
    /// number of packets that can be checked out concurrently.
    pub fn capacity(mut self, capacity: NonZero<usize>) -> Self {
        self.capacity = capacity;
        self
    }

    /// Builds the packet pool with the specified configuration.
    ///
    /// This performs the pool's one-time bulk allocation: every packet the
    /// pool will ever own is created and zero-initialized here.
    ///
    /// # Examples
    ///
    /// ```
    /// use new_zealand::nz;
    /// use packet_pool::PacketPool;
    ///
    /// let pool = PacketPool::builder().capacity(nz!(4)).build();
    ///
    /// assert_eq!(pool.available(), 4);
    /// ```
    #[must_use]
    pub fn build(self) -> PacketPool {
        PacketPool::new_inner(self.capacity)
    }
}
