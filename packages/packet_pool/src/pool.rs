use std::fmt;
use std::iter;
use std::num::NonZero;

use new_zealand::nz;

use crate::{Error, Packet, PacketPoolBuilder, Result};

/// The number of packets a pool created via [`PacketPool::new()`] owns.
pub const DEFAULT_CAPACITY: NonZero<usize> = nz!(1000);

/// A fixed-capacity pool of reusable [`Packet`] buffers.
///
/// The pool pre-allocates all of its packets up front and afterwards hands
/// them out and takes them back without ever touching the allocator again.
/// This is for hot paths that repeatedly need same-sized scratch buffers and
/// cannot afford a heap allocation per use.
///
/// # Ownership model
///
/// [`allocate()`][Self::allocate] moves a `Box<Packet>` out of the pool,
/// transferring exclusive ownership to the caller;
/// [`release()`][Self::release] moves it back in. Because the handle is moved
/// rather than borrowed, double-release and use-after-release are compile
/// errors rather than runtime hazards. The one misuse the compiler cannot
/// catch is releasing a packet into a pool it did not come from - the pool
/// detects this when it would exceed capacity and panics.
///
/// Packets come back in LIFO order: the most recently released packet is the
/// next one allocated. This keeps the hot set cache-warm.
///
/// # Fail fast or degrade gracefully
///
/// A pool is sized to the known maximum concurrent demand, so running dry is
/// normally a caller-side bug. [`allocate()`][Self::allocate] therefore
/// panics on exhaustion. Callers that instead want to degrade gracefully -
/// shed load, apply backpressure - use
/// [`try_allocate()`][Self::try_allocate], which reports exhaustion as
/// [`Error::Exhausted`].
///
/// # Thread safety
///
/// All operations take `&mut self`; to share a pool across threads, wrap it
/// in a `Mutex`. There is no finer-grained concurrent protocol.
///
/// # Examples
///
/// ```
/// use new_zealand::nz;
/// use packet_pool::PacketPool;
///
/// let mut pool = PacketPool::builder().capacity(nz!(4)).build();
/// assert_eq!(pool.available(), 4);
///
/// let mut packet = pool.allocate();
/// packet.data_mut()[0] = 42;
/// packet.set_len(1);
/// assert_eq!(pool.available(), 3);
///
/// pool.release(packet);
/// assert_eq!(pool.available(), 4);
/// ```
pub struct PacketPool {
    /// Packets currently owned by the pool, used strictly as a stack: the
    /// most recently released packet is the next one allocated. Packets on
    /// the stack always have a length of zero.
    free: Vec<Box<Packet>>,

    /// The fixed number of packets this pool owns for its entire lifetime.
    /// The free stack never holds more than this many.
    capacity: NonZero<usize>,

    stats: PoolStats,
}

impl PacketPool {
    pub(crate) fn new_inner(capacity: NonZero<usize>) -> Self {
        // The heavyweight one-time cost: every packet the pool will ever own
        // is allocated and zeroed here.
        let free = iter::repeat_with(Packet::new_boxed)
            .take(capacity.get())
            .collect::<Vec<_>>();

        Self {
            free,
            capacity,
            stats: PoolStats::default(),
        }
    }

    /// Creates a pool of [`DEFAULT_CAPACITY`] packets.
    ///
    /// This performs the pool's one-time bulk allocation, so it is a
    /// heavyweight call; construct pools at startup, not in the hot path.
    ///
    /// # Examples
    ///
    /// ```
    /// use packet_pool::{DEFAULT_CAPACITY, PacketPool};
    ///
    /// let pool = PacketPool::new();
    ///
    /// assert_eq!(pool.capacity(), DEFAULT_CAPACITY.get());
    /// assert_eq!(pool.available(), pool.capacity());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Starts building a new [`PacketPool`].
    ///
    /// Use this when you want a capacity other than the default.
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
    pub fn builder() -> PacketPoolBuilder {
        PacketPoolBuilder::new()
    }

    /// The fixed number of packets this pool owns.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// The number of packets currently in the pool, available for allocation.
    #[must_use]
    pub fn available(&self) -> usize {
        self.free.len()
    }

    /// The number of packets currently checked out by callers.
    #[must_use]
    pub fn in_use(&self) -> usize {
        self.capacity
            .get()
            .checked_sub(self.free.len())
            .expect("the free stack can never hold more packets than the pool capacity")
    }

    /// Whether every packet is currently checked out.
    ///
    /// In this state [`allocate()`][Self::allocate] panics and
    /// [`try_allocate()`][Self::try_allocate] returns an error.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.free.is_empty()
    }

    /// Takes a packet out of the pool, transferring exclusive ownership to
    /// the caller.
    ///
    /// The packet's length is always zero. Its data bytes are whatever the
    /// previous user left behind - the pool zeroes packets once, at
    /// construction, never per allocation.
    ///
    /// # Examples
    ///
    /// ```
    /// use new_zealand::nz;
    /// use packet_pool::PacketPool;
    ///
    /// let mut pool = PacketPool::builder().capacity(nz!(2)).build();
    ///
    /// let packet = pool.allocate();
    ///
    /// assert_eq!(packet.len(), 0);
    /// assert_eq!(pool.in_use(), 1);
    /// # pool.release(packet);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if the pool is exhausted ("packet freelist underflow"). The
    /// pool is sized to the maximum concurrent demand, so exhaustion means
    /// the allocate/release pairing went wrong somewhere - a bug to fix, not
    /// a condition to recover from. See
    /// [`try_allocate()`][Self::try_allocate] for the recoverable variant.
    #[must_use]
    pub fn allocate(&mut self) -> Box<Packet> {
        assert!(
            !self.free.is_empty(),
            "packet freelist underflow: all {} packets are already checked out",
            self.capacity
        );

        self.allocate_inner()
            .expect("guarded by the non-empty assertion above")
    }

    /// Takes a packet out of the pool, reporting exhaustion as an error
    /// instead of panicking.
    ///
    /// Otherwise identical to [`allocate()`][Self::allocate].
    ///
    /// # Examples
    ///
    /// ```
    /// use new_zealand::nz;
    /// use packet_pool::{Error, PacketPool};
    ///
    /// let mut pool = PacketPool::builder().capacity(nz!(1)).build();
    ///
    /// let packet = pool.try_allocate().unwrap();
    ///
    /// // The pool is now dry - further requests are refused, not fatal.
    /// assert!(matches!(
    ///     pool.try_allocate(),
    ///     Err(Error::Exhausted { capacity: 1 })
    /// ));
    /// # pool.release(packet);
    /// ```
    pub fn try_allocate(&mut self) -> Result<Box<Packet>> {
        self.allocate_inner().ok_or(Error::Exhausted {
            capacity: self.capacity.get(),
        })
    }

    fn allocate_inner(&mut self) -> Option<Box<Packet>> {
        #[cfg(debug_assertions)]
        self.integrity_check();

        let packet = self.free.pop()?;

        self.stats.allocations = self
            .stats
            .allocations
            .checked_add(1)
            .expect("a u64 allocation counter cannot plausibly overflow");

        Some(packet)
    }

    /// Returns a packet to the pool.
    ///
    /// The packet's length is reset to zero; its data bytes are left as-is.
    /// Stale payload persists until the next user overwrites it, which is
    /// acceptable because consumers read through the length-gated
    /// [`payload()`][Packet::payload] view.
    ///
    /// Because this consumes the `Box`, the caller provably cannot touch the
    /// packet afterwards, and releasing the same packet twice does not
    /// compile.
    ///
    /// # Panics
    ///
    /// Panics if the pool already holds all of its packets ("packet freelist
    /// overflow"). Since packets cannot be released twice, reaching this
    /// means a packet from a *different* pool was released here.
    pub fn release(&mut self, mut packet: Box<Packet>) {
        #[cfg(debug_assertions)]
        self.integrity_check();

        assert!(
            self.free.len() < self.capacity.get(),
            "packet freelist overflow: releasing into a pool that already holds all {} of its packets",
            self.capacity
        );

        self.stats.releases = self
            .stats
            .releases
            .checked_add(1)
            .expect("a u64 release counter cannot plausibly overflow");

        self.stats.released_bytes = self
            .stats
            .released_bytes
            .checked_add(
                u64::try_from(packet.len())
                    .expect("packet length is bounded by PAYLOAD_SIZE, which fits in u64"),
            )
            .expect("a u64 byte counter cannot plausibly overflow");

        packet.reset();
        self.free.push(packet);
    }

    /// Cumulative usage counters for this pool.
    ///
    /// # Examples
    ///
    /// ```
    /// use new_zealand::nz;
    /// use packet_pool::PacketPool;
    ///
    /// let mut pool = PacketPool::builder().capacity(nz!(1)).build();
    ///
    /// let mut packet = pool.allocate();
    /// packet.set_len(5);
    /// pool.release(packet);
    ///
    /// let stats = pool.stats();
    /// assert_eq!(stats.allocations, 1);
    /// assert_eq!(stats.releases, 1);
    /// assert_eq!(stats.released_bytes, 5);
    /// ```
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        self.stats
    }

    #[cfg_attr(test, mutants::skip)] // This is essentially test logic, mutation is meaningless.
    #[cfg(debug_assertions)]
    fn integrity_check(&self) {
        assert!(
            self.free.len() <= self.capacity.get(),
            "free stack holds {} packets but the pool capacity is only {}",
            self.free.len(),
            self.capacity
        );

        for (index, packet) in self.free.iter().enumerate() {
            assert!(
                packet.is_empty(),
                "pooled packet {index} has a non-zero length of {}",
                packet.len()
            );
        }
    }
}

impl Default for PacketPool {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PacketPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PacketPool")
            .field("capacity", &self.capacity)
            .field("available", &self.free.len())
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

/// Cumulative usage counters for a [`PacketPool`].
///
/// Counters only ever increase over the pool's lifetime; they are not
/// affected by packets currently being checked out or returned.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[non_exhaustive]
pub struct PoolStats {
    /// Number of packets handed out over the pool's lifetime.
    pub allocations: u64,

    /// Number of packets returned over the pool's lifetime.
    pub releases: u64,

    /// Total valid payload bytes carried by packets at the moment they were
    /// released.
    pub released_bytes: u64,
}

#[cfg(test)]
#[allow(
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects,
    reason = "test code operates on small values known to be in bounds"
)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::thread;

    use new_zealand::nz;

    use super::*;

    #[test]
    fn smoke_test() {
        let mut pool = PacketPool::new();

        assert_eq!(pool.capacity(), DEFAULT_CAPACITY.get());
        assert_eq!(pool.available(), DEFAULT_CAPACITY.get());

        let mut packet = pool.allocate();
        assert_eq!(packet.len(), 0);
        assert_eq!(pool.available(), DEFAULT_CAPACITY.get() - 1);

        packet.set_len(1);
        packet.data_mut()[0] = 42;

        assert_eq!(packet.len(), 1);
        assert_eq!(packet.data()[0], 42);

        pool.release(packet);
        assert_eq!(pool.available(), DEFAULT_CAPACITY.get());
    }

    #[test]
    fn all_packets_start_zeroed() {
        let mut pool = PacketPool::builder().capacity(nz!(4)).build();

        let packets = (0..4).map(|_| pool.allocate()).collect::<Vec<_>>();

        for packet in &packets {
            assert_eq!(packet.len(), 0);
            assert!(packet.data().iter().all(|&byte| byte == 0));
        }

        for packet in packets {
            pool.release(packet);
        }
    }

    #[test]
    fn release_resets_length_but_not_data() {
        let mut pool = PacketPool::builder().capacity(nz!(2)).build();

        let mut packet = pool.allocate();
        packet.data_mut()[0] = 42;
        packet.set_len(1);
        pool.release(packet);

        // LIFO: the packet we just released comes straight back.
        let packet = pool.allocate();

        assert_eq!(packet.len(), 0);
        assert_eq!(packet.data()[0], 42);

        pool.release(packet);
    }

    #[test]
    fn lifo_returns_most_recently_released_first() {
        let mut pool = PacketPool::builder().capacity(nz!(2)).build();

        let mut first = pool.allocate();
        let mut second = pool.allocate();

        first.data_mut()[0] = 1;
        second.data_mut()[0] = 2;

        pool.release(first);
        pool.release(second);

        assert_eq!(pool.allocate().data()[0], 2);
        assert_eq!(pool.allocate().data()[0], 1);
    }

    #[test]
    fn counts_track_checkouts() {
        let mut pool = PacketPool::builder().capacity(nz!(2)).build();

        assert_eq!(pool.available(), 2);
        assert_eq!(pool.in_use(), 0);
        assert!(!pool.is_exhausted());

        let first = pool.allocate();
        let second = pool.allocate();

        assert_eq!(pool.available(), 0);
        assert_eq!(pool.in_use(), 2);
        assert!(pool.is_exhausted());

        pool.release(first);
        pool.release(second);

        assert_eq!(pool.available(), 2);
        assert_eq!(pool.in_use(), 0);
    }

    #[test]
    fn capacity_invariant_holds_across_churn() {
        let mut pool = PacketPool::builder().capacity(nz!(3)).build();
        let mut checked_out = Vec::new();

        // A fixed mixed sequence of allocates (true) and releases (false).
        let script = [
            true, true, false, true, true, false, false, true, false, false,
        ];

        for allocate in script {
            if allocate {
                checked_out.push(pool.allocate());
            } else {
                pool.release(checked_out.pop().expect("script never over-releases"));
            }

            assert!(pool.available() <= pool.capacity());
            assert_eq!(pool.available() + pool.in_use(), pool.capacity());
        }

        assert!(checked_out.is_empty());
        assert_eq!(pool.available(), pool.capacity());
    }

    #[test]
    #[should_panic]
    fn allocate_from_exhausted_pool_panics() {
        let mut pool = PacketPool::builder().capacity(nz!(1)).build();

        let _held = pool.allocate();
        _ = pool.allocate();
    }

    #[test]
    fn try_allocate_reports_exhaustion() {
        let mut pool = PacketPool::builder().capacity(nz!(1)).build();

        let packet = pool.try_allocate().expect("pool starts full");

        assert!(matches!(
            pool.try_allocate(),
            Err(Error::Exhausted { capacity: 1 })
        ));

        // Releasing makes the pool whole again.
        pool.release(packet);
        assert!(pool.try_allocate().is_ok());
    }

    #[test]
    #[should_panic]
    fn releasing_foreign_packet_into_full_pool_panics() {
        let mut pool = PacketPool::builder().capacity(nz!(1)).build();
        let mut other_pool = PacketPool::builder().capacity(nz!(1)).build();

        let foreign = other_pool.allocate();

        // `pool` already holds all of its own packets.
        pool.release(foreign);
    }

    #[test]
    fn stats_accumulate() {
        let mut pool = PacketPool::builder().capacity(nz!(2)).build();

        assert_eq!(pool.stats(), PoolStats::default());

        let mut first = pool.allocate();
        let mut second = pool.allocate();

        first.set_len(10);
        second.set_len(32);

        pool.release(first);
        pool.release(second);

        let stats = pool.stats();
        assert_eq!(stats.allocations, 2);
        assert_eq!(stats.releases, 2);
        assert_eq!(stats.released_bytes, 42);
    }

    #[test]
    fn multithreaded_via_mutex() {
        let pool = Arc::new(Mutex::new(
            PacketPool::builder().capacity(nz!(2)).build(),
        ));

        let packet = pool.lock().unwrap().allocate();

        let pool_clone = Arc::clone(&pool);
        thread::spawn(move || {
            let mut pool = pool_clone.lock().unwrap();

            let other = pool.allocate();
            assert!(pool.is_exhausted());
            pool.release(other);
        })
        .join()
        .unwrap();

        let mut pool = pool.lock().unwrap();
        pool.release(packet);
        assert_eq!(pool.available(), 2);
    }
}
