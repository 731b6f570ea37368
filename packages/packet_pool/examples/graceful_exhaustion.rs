//! Draining a pool with `try_allocate()` instead of panicking.
//!
//! `allocate()` treats exhaustion as a fatal caller bug. Callers that would
//! rather shed load use the recoverable variant shown here.

use new_zealand::nz;
use packet_pool::PacketPool;

fn main() {
    let mut pool = PacketPool::builder().capacity(nz!(4)).build();

    let mut checked_out = Vec::new();

    loop {
        match pool.try_allocate() {
            Ok(packet) => {
                println!("Took a packet, {} still available", pool.available());
                checked_out.push(packet);
            }
            Err(error) => {
                println!("Pool is dry: {error}");
                break;
            }
        }
    }

    for packet in checked_out {
        pool.release(packet);
    }

    println!(
        "All packets home: {} of {} available",
        pool.available(),
        pool.capacity()
    );
}
