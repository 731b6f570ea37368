//! A fixed-capacity pool of reusable packet buffers.
//!
//! This crate provides [`PacketPool`], a freelist of pre-allocated fixed-size
//! buffers ([`Packet`]) for hot paths that repeatedly need same-sized scratch
//! space and cannot afford a heap allocation per use. All packets are created
//! and zeroed once, when the pool is built; afterwards the steady-state
//! allocate/release cycle never touches the allocator.
//!
//! # Key features
//!
//! - **One-time allocation**: `capacity` buffers are allocated at pool
//!   construction and reused for the pool's entire lifetime
//! - **Move-based ownership**: allocation hands the caller an owned
//!   `Box<Packet>`, so use-after-release and double-release do not compile
//! - **LIFO reuse**: the most recently released packet is allocated next,
//!   keeping the hot set cache-warm
//! - **Fail-fast by default**: exhaustion and over-release are treated as
//!   caller bugs and panic; a recoverable
//!   [`try_allocate()`](PacketPool::try_allocate) is available for callers
//!   that prefer to shed load
//! - **Cheap bookkeeping**: [`stats()`](PacketPool::stats) exposes cumulative
//!   allocation/release counters
//!
//! # Examples
//!
//! ```rust
//! use new_zealand::nz;
//! use packet_pool::PacketPool;
//!
//! let mut pool = PacketPool::builder().capacity(nz!(16)).build();
//!
//! // Take a buffer, fill it, hand it back.
//! let mut packet = pool.allocate();
//! packet.data_mut()[..5].copy_from_slice(b"hello");
//! packet.set_len(5);
//!
//! assert_eq!(packet.payload(), b"hello");
//!
//! pool.release(packet);
//! assert_eq!(pool.available(), 16);
//! ```
//!
//! Packet contents are only zeroed once, at pool construction. A recycled
//! packet reports a length of zero but still carries the previous user's
//! bytes beyond that:
//!
//! ```rust
//! use new_zealand::nz;
//! use packet_pool::PacketPool;
//!
//! let mut pool = PacketPool::builder().capacity(nz!(1)).build();
//!
//! let mut packet = pool.allocate();
//! packet.data_mut()[0] = 42;
//! packet.set_len(1);
//! pool.release(packet);
//!
//! let packet = pool.allocate();
//! assert_eq!(packet.len(), 0); // reset on release
//! assert_eq!(packet.data()[0], 42); // stale bytes persist
//! # pool.release(packet);
//! ```

mod builder;
mod error;
mod packet;
mod pool;

pub use builder::*;
pub use error::*;
pub use packet::*;
pub use pool::*;
