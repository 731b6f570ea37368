use std::fmt;

/// The maximum number of payload bytes any [`Packet`] can carry.
pub const PAYLOAD_SIZE: usize = 10 * 1024;

/// A reusable fixed-capacity buffer owned by a [`PacketPool`][crate::PacketPool].
///
/// A packet is a passive record: a count of valid bytes plus a backing array
/// of [`PAYLOAD_SIZE`] bytes. It has no behavior of its own beyond guarded
/// field access - the interesting lifecycle logic lives in the pool.
///
/// Packets cannot be created directly; every packet in existence was created
/// by some pool, lives on the heap for that pool's entire lifetime and shuttles
/// between the pool and its callers via
/// [`allocate()`][crate::PacketPool::allocate] and
/// [`release()`][crate::PacketPool::release]. Whoever holds the `Box<Packet>`
/// holds exclusive ownership and may mutate freely.
///
/// Bytes of the backing array at positions `len()..` are stale leftovers from
/// the previous use of the packet. Consumers that respect the
/// [`payload()`][Self::payload] view never observe them.
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
/// assert_eq!(packet.len(), 0);
///
/// packet.data_mut()[0] = 42;
/// packet.set_len(1);
///
/// assert_eq!(packet.payload(), &[42]);
///
/// pool.release(packet);
/// ```
pub struct Packet {
    /// Number of valid bytes in `data`. Kept within `0..=PAYLOAD_SIZE` by
    /// `set_len()`, which is the only mutation point.
    length: u16,

    /// The backing array. Bytes at `length..` are stale.
    data: [u8; PAYLOAD_SIZE],
}

impl Packet {
    /// Creates a zero-initialized packet on the heap.
    ///
    /// Only called in bulk during pool construction - this is the one-time
    /// cost that takes allocation out of the hot path.
    pub(crate) fn new_boxed() -> Box<Self> {
        Box::new(Self {
            length: 0,
            data: [0; PAYLOAD_SIZE],
        })
    }

    /// The number of valid bytes currently stored in the packet.
    ///
    /// Freshly allocated packets always report zero - the count is reset
    /// every time a packet returns to its pool.
    #[must_use]
    pub fn len(&self) -> usize {
        usize::from(self.length)
    }

    /// Whether the packet currently holds no valid bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Sets the number of valid bytes stored in the packet.
    ///
    /// Callers typically write through [`data_mut()`][Self::data_mut] first
    /// and then record how much of the array is now meaningful.
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
    /// packet.data_mut()[..5].copy_from_slice(b"hello");
    /// packet.set_len(5);
    ///
    /// assert_eq!(packet.payload(), b"hello");
    /// # pool.release(packet);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `len` exceeds [`PAYLOAD_SIZE`].
    pub fn set_len(&mut self, len: usize) {
        assert!(
            len <= PAYLOAD_SIZE,
            "packet length {len} exceeds the payload capacity of {PAYLOAD_SIZE}"
        );

        self.length = u16::try_from(len).expect("guarded by the PAYLOAD_SIZE bound above");
    }

    /// The entire backing array, including stale bytes beyond
    /// [`len()`][Self::len].
    #[must_use]
    pub fn data(&self) -> &[u8; PAYLOAD_SIZE] {
        &self.data
    }

    /// The entire backing array, for writing.
    ///
    /// Writing data does not adjust the valid-byte count - follow up with
    /// [`set_len()`][Self::set_len] to expose what you wrote.
    #[must_use]
    pub fn data_mut(&mut self) -> &mut [u8; PAYLOAD_SIZE] {
        &mut self.data
    }

    /// The valid prefix of the backing array.
    ///
    /// This is the view consumers should read - it can never expose stale
    /// bytes left behind by a previous user of the packet.
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        self.data
            .get(..self.len())
            .expect("length never exceeds PAYLOAD_SIZE, so the prefix is always in bounds")
    }

    /// The valid prefix of the backing array, for writing in place.
    #[must_use]
    pub fn payload_mut(&mut self) -> &mut [u8] {
        let len = self.len();

        self.data
            .get_mut(..len)
            .expect("length never exceeds PAYLOAD_SIZE, so the prefix is always in bounds")
    }

    /// Clears the valid-byte count without touching the backing array.
    ///
    /// Called on every release. Stale payload bytes intentionally persist
    /// until the next user overwrites them.
    pub(crate) fn reset(&mut self) {
        self.length = 0;
    }
}

impl fmt::Debug for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Packet")
            .field("length", &self.length)
            .field("data", &format_args!("[u8; {PAYLOAD_SIZE}]"))
            .finish()
    }
}

#[cfg(test)]
#[allow(
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects,
    reason = "test code operates on small values known to be in bounds"
)]
mod tests {
    use new_zealand::nz;

    use super::*;
    use crate::PacketPool;

    #[test]
    fn starts_zeroed() {
        let mut pool = PacketPool::builder().capacity(nz!(1)).build();

        let packet = pool.allocate();

        assert_eq!(packet.len(), 0);
        assert!(packet.is_empty());
        assert!(packet.data().iter().all(|&byte| byte == 0));

        pool.release(packet);
    }

    #[test]
    fn payload_tracks_len() {
        let mut pool = PacketPool::builder().capacity(nz!(1)).build();

        let mut packet = pool.allocate();

        assert!(packet.payload().is_empty());

        packet.data_mut()[..3].copy_from_slice(&[1, 2, 3]);
        packet.set_len(3);

        assert_eq!(packet.len(), 3);
        assert_eq!(packet.payload(), &[1, 2, 3]);

        packet.payload_mut()[1] = 9;
        assert_eq!(packet.payload(), &[1, 9, 3]);

        pool.release(packet);
    }

    #[test]
    fn set_len_accepts_full_capacity() {
        let mut pool = PacketPool::builder().capacity(nz!(1)).build();

        let mut packet = pool.allocate();
        packet.set_len(PAYLOAD_SIZE);

        assert_eq!(packet.payload().len(), PAYLOAD_SIZE);

        pool.release(packet);
    }

    #[test]
    #[should_panic]
    fn set_len_rejects_oversized() {
        let mut pool = PacketPool::builder().capacity(nz!(1)).build();

        let mut packet = pool.allocate();
        packet.set_len(PAYLOAD_SIZE + 1);
    }

    #[test]
    fn debug_does_not_dump_payload() {
        let mut pool = PacketPool::builder().capacity(nz!(1)).build();

        let packet = pool.allocate();
        let rendered = format!("{packet:?}");

        assert!(rendered.contains("length"));
        // The 10 KiB backing array must be summarized, not printed byte by byte.
        assert!(rendered.len() < 100);

        pool.release(packet);
    }
}
