//! Circular FIFO queue persisted in a non-volatile byte region.

use core::marker::PhantomData;
use core::mem::size_of;

use bytemuck::{bytes_of, pod_read_unaligned, Pod};

use crate::layout::{self, Header as _, QueueHeader};
use crate::region::{Overrun, Region};

/**
 * A fixed-capacity FIFO queue whose state lives entirely in the mounted
 * byte region.
 *
 * The handle exclusively borrows its region for its lifetime; mount it
 * again after dropping to reattach (e.g. simulating a restart). Wraparound
 * uses a modulo-capacity advance, so any capacity is supported, not just
 * powers of two.
 */
#[derive(Debug)]
pub struct PersistentQueue<'a, T> {
	bytes: &'a mut [u8],
	capacity: usize,
	_elem: PhantomData<T>,
}

impl<'a, T: Pod> PersistentQueue<'a, T> {
	/// Exact byte footprint of a queue with the given capacity: header
	/// fields plus `capacity` element slots. Callers use this to reserve
	/// non-overlapping regions.
	pub const fn storage_size(capacity: usize) -> usize {
		size_of::<QueueHeader>() + capacity * size_of::<T>()
	}

	/// Mounts a queue over `nvm[offset..offset + storage_size(capacity)]`.
	///
	/// If those bytes carry a valid signature the existing state is reused
	/// unmodified; otherwise they are initialized to an empty queue. Errs
	/// when `nvm` is too short for the region, or when `capacity` exceeds
	/// `u32::MAX` (the width of the on-media index fields).
	///
	/// The same `capacity` must be supplied on every remount of a given
	/// offset: capacity is not stored in the region, and a mismatch
	/// silently shifts how slots and indices are interpreted.
	pub fn mount(
		nvm: &'a mut [u8],
		offset: usize,
		capacity: usize,
	) -> Result<Self, Overrun> {
		if capacity > u32::MAX as usize {
			return Err(Overrun {
				capacity: u32::MAX as usize,
				requested: capacity,
			});
		}
		let requested = offset + Self::storage_size(capacity);
		if nvm.len() < requested {
			return Err(Overrun { capacity: nvm.len(), requested });
		}

		let bytes = &mut nvm[offset..requested];
		layout::attach::<QueueHeader>(bytes);
		Ok(Self { bytes, capacity, _elem: PhantomData })
	}

	/// Number of elements currently in the queue.
	pub fn len(&self) -> usize {
		self.header().size as usize
	}

	pub fn capacity(&self) -> usize {
		self.capacity
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// With capacity 0, trivially true at the same time as `is_empty`.
	pub fn is_full(&self) -> bool {
		self.len() == self.capacity
	}

	/// The oldest element, or `None` on an empty queue.
	pub fn front(&self) -> Option<T> {
		let header = self.header();
		if header.size == 0 {
			return None;
		}

		let bytes = self.slot(header.begin).read(self.bytes)?;
		Some(pod_read_unaligned(bytes))
	}

	/// Pushes at the back. Returns false on a full queue, leaving all state
	/// unchanged.
	pub fn push(&mut self, value: T) -> bool {
		let mut header = self.header();
		if header.size as usize == self.capacity {
			return false;
		}

		self.slot(header.end)
			.write(self.bytes, bytes_of(&value))
			.expect("mount sized the region");
		header.end = self.increment(header.end);
		header.size += 1;
		self.store_header(&header);
		true
	}

	/// Pops the front element. Returns false on an empty queue. The popped
	/// slot's bytes are left in place; they are logically inaccessible.
	pub fn pop(&mut self) -> bool {
		let mut header = self.header();
		if header.size == 0 {
			return false;
		}

		header.begin = self.increment(header.begin);
		header.size -= 1;
		self.store_header(&header);
		true
	}

	fn header(&self) -> QueueHeader {
		layout::load(self.bytes)
	}

	fn store_header(&mut self, header: &QueueHeader) {
		layout::store(self.bytes, header);
	}

	fn slot(&self, index: u32) -> Region {
		let pos = QueueHeader::SIZE + index as usize * size_of::<T>();
		Region::new(pos, size_of::<T>())
	}

	fn increment(&self, index: u32) -> u32 {
		let next = index + 1;
		if next as usize == self.capacity {
			0
		} else {
			next
		}
	}
}
