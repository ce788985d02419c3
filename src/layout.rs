//! On-media layout: header codecs and the mount step shared by both
//! containers.
//!
//! All header fields are explicit-width `u32` in `#[repr(C)]` structs with
//! no padding, read and written through bytemuck rather than overlaid on the
//! backing bytes. Byte order is the target's; lib.rs restricts builds to
//! little-endian so the format is fixed.

use core::mem::size_of;

use bytemuck::{bytes_of, pod_read_unaligned, Pod, Zeroable};

/// Marks a region as previously initialized by this format. Any other bit
/// pattern at the start of a region means "uninitialized or foreign data".
///
/// The value is part of the on-media format and must never change.
pub(crate) const SIGNATURE: u32 = 0xa2be_def9;

/// A container's fixed-layout metadata, stored at the start of its region.
pub(crate) trait Header: Pod {
	const SIZE: usize = size_of::<Self>();

	/// Header of a freshly initialized, empty container.
	fn fresh() -> Self;
}

/// `end = (begin + size) mod capacity` at every observable point. `size` is
/// tracked explicitly so `begin == end` is unambiguous between empty and
/// full.
#[repr(C)]
#[derive(Pod, Zeroable, Clone, Copy, Debug, PartialEq)]
pub(crate) struct QueueHeader {
	pub signature: u32,
	/// Index of the oldest element.
	pub begin: u32,
	/// Index of the next insertion slot.
	pub end: u32,
	pub size: u32,
}

impl Header for QueueHeader {
	fn fresh() -> Self {
		Self { signature: SIGNATURE, begin: 0, end: 0, size: 0 }
	}
}

/// Occupied slots are exactly `[0, size)`; no begin/end needed.
#[repr(C)]
#[derive(Pod, Zeroable, Clone, Copy, Debug, PartialEq)]
pub(crate) struct VecHeader {
	pub signature: u32,
	pub size: u32,
}

impl Header for VecHeader {
	fn fresh() -> Self {
		Self { signature: SIGNATURE, size: 0 }
	}
}

/// The mount step, applied identically by both containers.
///
/// Inspects the signature word at the start of `bytes`. A mismatch (never
/// initialized, foreign data, or corruption - the three are
/// indistinguishable) gets a fresh header written in place; this is the only
/// initialization path. A match aliases the stored header with no mutation,
/// which is how state survives a restart. Idempotent: attaching twice with
/// unchanged bytes in between yields the same header both times.
pub(crate) fn attach<H: Header>(bytes: &mut [u8]) -> H {
	let signature: u32 = pod_read_unaligned(&bytes[..size_of::<u32>()]);
	if signature == SIGNATURE {
		pod_read_unaligned(&bytes[..H::SIZE])
	} else {
		let header = H::fresh();
		store(bytes, &header);
		header
	}
}

pub(crate) fn load<H: Header>(bytes: &[u8]) -> H {
	pod_read_unaligned(&bytes[..H::SIZE])
}

pub(crate) fn store<H: Header>(bytes: &mut [u8], header: &H) {
	bytes[..H::SIZE].copy_from_slice(bytes_of(header));
}
