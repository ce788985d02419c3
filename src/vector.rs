//! Append/truncate vector persisted in a non-volatile byte region.

use core::marker::PhantomData;
use core::mem::size_of;

use bytemuck::{bytes_of, pod_read_unaligned, Pod};

use crate::layout::{self, Header as _, VecHeader};
use crate::region::{Overrun, Region};

/**
 * A fixed-capacity vector whose state lives entirely in the mounted byte
 * region.
 *
 * Elements occupy slots `[0, len)`; mutation happens only at the tail
 * (append/truncate), so this is a stack-shaped container, not a general
 * dynamic array. The handle exclusively borrows its region for its
 * lifetime.
 */
#[derive(Debug)]
pub struct PersistentVec<'a, T> {
	bytes: &'a mut [u8],
	capacity: usize,
	_elem: PhantomData<T>,
}

impl<'a, T: Pod> PersistentVec<'a, T> {
	/// Exact byte footprint of a vector with the given capacity: header
	/// fields plus `capacity` element slots.
	pub const fn storage_size(capacity: usize) -> usize {
		size_of::<VecHeader>() + capacity * size_of::<T>()
	}

	/// Mounts a vector over `nvm[offset..offset + storage_size(capacity)]`,
	/// reusing existing state on a signature match and initializing empty
	/// otherwise. Errs when `nvm` is too short for the region, or when
	/// `capacity` exceeds `u32::MAX` (the width of the on-media size
	/// field).
	///
	/// As with the queue, the caller must supply the same `capacity` on
	/// every remount of a given offset.
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
		layout::attach::<VecHeader>(bytes);
		Ok(Self { bytes, capacity, _elem: PhantomData })
	}

	pub fn len(&self) -> usize {
		self.header().size as usize
	}

	pub fn capacity(&self) -> usize {
		self.capacity
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn is_full(&self) -> bool {
		self.len() == self.capacity
	}

	/// The element at `index`, or `None` when `index >= len`.
	pub fn get(&self, index: usize) -> Option<T> {
		let header = self.header();
		if index >= header.size as usize {
			return None;
		}

		let bytes = self.slot(index as u32).read(self.bytes)?;
		Some(pod_read_unaligned(bytes))
	}

	/// The last element, or `None` on an empty vector.
	pub fn last(&self) -> Option<T> {
		self.len().checked_sub(1).and_then(|i| self.get(i))
	}

	/// Appends at the tail. Returns false on a full vector, leaving all
	/// state unchanged.
	pub fn push_back(&mut self, value: T) -> bool {
		let mut header = self.header();
		if header.size as usize == self.capacity {
			return false;
		}

		self.slot(header.size)
			.write(self.bytes, bytes_of(&value))
			.expect("mount sized the region");
		header.size += 1;
		self.store_header(&header);
		true
	}

	/// Removes the last element. Returns false on an empty vector. The
	/// vacated slot's bytes are left untouched; they are logically
	/// inaccessible.
	pub fn pop_back(&mut self) -> bool {
		let mut header = self.header();
		if header.size == 0 {
			return false;
		}

		header.size -= 1;
		self.store_header(&header);
		true
	}

	/// Iterates over the occupied slots, oldest first.
	pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
		(0..self.len()).filter_map(move |i| self.get(i))
	}

	fn header(&self) -> VecHeader {
		layout::load(self.bytes)
	}

	fn store_header(&mut self, header: &VecHeader) {
		layout::store(self.bytes, header);
	}

	fn slot(&self, index: u32) -> Region {
		let pos = VecHeader::SIZE + index as usize * size_of::<T>();
		Region::new(pos, size_of::<T>())
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use pretty_assertions::assert_eq;
	use proptest::prelude::*;
	use rand::Rng;

	#[test]
	fn fresh_mount_is_empty() {
		let mut nvm = vec![0u8; PersistentVec::<i64>::storage_size(4)];
		let v = PersistentVec::<i64>::mount(&mut nvm, 0, 4).unwrap();

		assert_eq!(v.len(), 0);
		assert!(v.is_empty());
		assert!(!v.is_full());
		assert_eq!(v.get(0), None);
		assert_eq!(v.last(), None);
	}

	#[test]
	fn capacity_zero_is_degenerate() {
		let mut nvm = vec![0u8; PersistentVec::<u8>::storage_size(0)];
		let mut v = PersistentVec::<u8>::mount(&mut nvm, 0, 0).unwrap();

		assert!(v.is_empty());
		assert!(v.is_full());
		assert!(!v.push_back(1));
		assert!(!v.pop_back());
	}

	#[test]
	fn region_too_small_is_overrun() {
		let mut nvm = [0u8; 4];
		let err = PersistentVec::<u8>::mount(&mut nvm, 0, 2).unwrap_err();
		assert_eq!(err, Overrun { capacity: 4, requested: 10 });
	}

	#[cfg(target_pointer_width = "64")]
	#[test]
	fn capacity_beyond_size_width_is_rejected() {
		let mut nvm = [0u8; 8];
		let err = PersistentVec::<u8>::mount(
			&mut nvm,
			0,
			u32::MAX as usize + 1,
		)
		.unwrap_err();
		assert_eq!(
			err,
			Overrun {
				capacity: u32::MAX as usize,
				requested: u32::MAX as usize + 1
			}
		);
	}

	#[test]
	fn push_back_fills_in_order() {
		let mut nvm = vec![0u8; PersistentVec::<u32>::storage_size(3)];
		let mut v = PersistentVec::<u32>::mount(&mut nvm, 0, 3).unwrap();

		assert!(v.push_back(10));
		assert!(v.push_back(20));
		assert!(v.push_back(30));
		assert!(v.is_full());

		assert!(!v.push_back(40));
		assert_eq!(v.len(), 3);

		assert_eq!(v.get(0), Some(10));
		assert_eq!(v.get(1), Some(20));
		assert_eq!(v.get(2), Some(30));
		assert_eq!(v.get(3), None);
		assert_eq!(v.last(), Some(30));
	}

	#[test]
	fn pop_back_truncates_tail_only() {
		let mut nvm = vec![0u8; PersistentVec::<u32>::storage_size(3)];
		let mut v = PersistentVec::<u32>::mount(&mut nvm, 0, 3).unwrap();

		assert!(v.push_back(1));
		assert!(v.push_back(2));

		assert!(v.pop_back());
		assert_eq!(v.len(), 1);
		assert_eq!(v.get(0), Some(1));
		assert_eq!(v.get(1), None);

		assert!(v.pop_back());
		assert!(!v.pop_back());
		assert!(v.is_empty());
	}

	#[test]
	fn storage_size_is_exact() {
		assert_eq!(PersistentVec::<u64>::storage_size(0), 8);
		assert_eq!(PersistentVec::<u64>::storage_size(5), 8 + 5 * 8);
		assert_eq!(PersistentVec::<u8>::storage_size(3), 8 + 3);
		// the queue's header carries two extra index fields
		assert_eq!(crate::PersistentQueue::<u64>::storage_size(0), 16);
	}

	#[test]
	fn remount_reattaches_to_prior_state() {
		let mut nvm = vec![0u8; PersistentVec::<u16>::storage_size(4) + 2];

		{
			let mut v = PersistentVec::<u16>::mount(&mut nvm, 2, 4).unwrap();
			assert!(v.push_back(7));
			assert!(v.push_back(8));
		}

		let v = PersistentVec::<u16>::mount(&mut nvm, 2, 4).unwrap();
		assert_eq!(v.len(), 2);
		assert_eq!(v.iter().collect::<Vec<_>>(), vec![7, 8]);
	}

	#[test]
	fn garbage_bytes_mount_empty() {
		let mut rng = rand::thread_rng();
		let mut nvm = vec![0u8; PersistentVec::<u32>::storage_size(6)];
		rng.fill(nvm.as_mut_slice());
		// the signature's low byte is never 0x00
		nvm[0] = 0x00;

		let v = PersistentVec::<u32>::mount(&mut nvm, 0, 6).unwrap();
		assert!(v.is_empty());
	}

	proptest! {
		#[test]
		fn indices_observe_push_order(
			values in prop::collection::vec(any::<i64>(), 0..=12)
		) {
			let mut nvm = vec![0u8; PersistentVec::<i64>::storage_size(12)];
			let mut v =
				PersistentVec::<i64>::mount(&mut nvm, 0, 12).unwrap();

			for &x in &values {
				prop_assert!(v.push_back(x));
			}
			for (i, &x) in values.iter().enumerate() {
				prop_assert_eq!(v.get(i), Some(x));
			}
			prop_assert_eq!(v.get(values.len()), None);

			if v.pop_back() {
				prop_assert_eq!(v.len(), values.len() - 1);
				for (i, &x) in values[..values.len() - 1].iter().enumerate() {
					prop_assert_eq!(v.get(i), Some(x));
				}
			} else {
				prop_assert!(values.is_empty());
			}
		}
	}
}
