//! Fixed-capacity containers that keep their entire state inside a
//! byte-addressable non-volatile memory region, so contents survive process
//! restarts and power cycles.
//!
//! Two containers are provided: a circular FIFO queue and an append/truncate
//! vector. Both are "mounted" over a byte region: the first mount finds no
//! valid signature and initializes the region empty; every later mount
//! reattaches to whatever state the previous mount left behind.
//!
//! The following implementation notes may be useful:
//! - All container state is index/offset bookkeeping inside the region. The
//!   containers never allocate and never hold pointers beyond the region.
//! - Element types are `bytemuck::Pod`: fixed size, no pointers, relocatable
//!   byte-for-byte. That is what makes overlaying slots on raw bytes sound.
//! - Every mutation is an in-place write to the region, with no buffering
//!   and no multi-field atomic commit. Persistence is best-effort; a power
//!   loss mid-operation can leave the header and slots inconsistent.
//! - A mounted handle holds the unique `&mut` borrow of its byte range, so
//!   overlapping mounts are rejected by the borrow checker.
//! - Assumes little endian, which pins the on-media format.
//!
//! ```
//! use nvfix::PersistentQueue;
//!
//! let mut nvm = [0u8; 64];
//! let mut queue = PersistentQueue::<u32>::mount(&mut nvm, 0, 4).unwrap();
//! assert!(queue.push(7));
//! drop(queue);
//!
//! // Remount over the same bytes: the element is still there.
//! let queue = PersistentQueue::<u32>::mount(&mut nvm, 0, 4).unwrap();
//! assert_eq!(queue.front(), Some(7));
//! ```
#![cfg_attr(not(test), no_std)]
#[macro_use]
extern crate alloc;

#[cfg(not(target_endian = "little"))]
compile_error!("on-media format assumes little-endian");

pub mod disk;
mod layout;
pub mod region;

mod queue;
mod vector;

pub use queue::PersistentQueue;
pub use region::Overrun;
pub use vector::PersistentVec;
