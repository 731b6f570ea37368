//! The canonical lifecycle of a pooled packet:
//!
//! * Building a pool (the one-time bulk allocation).
//! * Allocating a packet.
//! * Mutating it as its exclusive owner.
//! * Releasing it back to the pool.
#![allow(
    clippy::indexing_slicing,
    reason = "demo code operates on indices known to be in bounds"
)]

use packet_pool::PacketPool;

fn main() {
    // Every packet the pool will ever own is allocated and zeroed here.
    let mut pool = PacketPool::new();
    println!(
        "Pool ready: {} of {} packets available",
        pool.available(),
        pool.capacity()
    );

    let mut packet = pool.allocate();
    println!("Allocated packet of size: {}", packet.len());

    // While we hold the Box, the packet is ours alone to mutate.
    packet.set_len(1);
    packet.data_mut()[0] = 42;
    println!(
        "Can mutate packet: length = {}, data[0] = {}",
        packet.len(),
        packet.data()[0]
    );

    // `release` consumes the Box - the packet is gone from our hands and the
    // compiler will not let us touch it again.
    pool.release(packet);
    println!(
        "Released packet (ownership ends): {} of {} packets available",
        pool.available(),
        pool.capacity()
    );

    println!("Lifetime stats: {:?}", pool.stats());
}
