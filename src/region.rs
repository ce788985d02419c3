//! Byte ranges within a backing slice, with checked reads and writes.

/// A contiguous byte range: `pos` is an offset into some backing slice,
/// `len` is the number of bytes covered.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Region {
	pub pos: usize,
	pub len: usize,
}

/// A requested range did not fit within the backing bytes.
#[derive(Debug, PartialEq)]
pub struct Overrun {
	/// How many bytes the backing slice actually holds.
	pub capacity: usize,
	/// How many bytes would have been needed.
	pub requested: usize,
}

impl Region {
	pub fn new(pos: usize, len: usize) -> Self {
		Self { pos, len }
	}

	pub fn end(&self) -> usize {
		self.pos + self.len
	}

	pub fn read<'a>(&self, bytes: &'a [u8]) -> Option<&'a [u8]> {
		bytes.get(self.pos..self.end())
	}

	/// Copies `src` into this region of `dest`. Errs when `src` is not
	/// exactly `len` bytes or the region does not fit within `dest`.
	pub fn write(&self, dest: &mut [u8], src: &[u8]) -> Result<(), Overrun> {
		if src.len() != self.len {
			return Err(Overrun { capacity: self.len, requested: src.len() });
		}
		if self.end() > dest.len() {
			return Err(Overrun { capacity: dest.len(), requested: self.end() });
		}

		dest[self.pos..self.end()].copy_from_slice(src);
		Ok(())
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use pretty_assertions::assert_eq;

	#[test]
	fn empty_region_empty_slice() {
		let r = Region::new(0, 0);
		assert_eq!(r.read(&[]), Some([].as_slice()));
	}

	#[test]
	fn non_empty_region_non_empty_slice() {
		let r = Region::new(1, 2);
		assert_eq!(r.read(&[1, 3, 3, 7]), Some([3, 3].as_slice()));
	}

	#[test]
	fn read_past_end_is_none() {
		let r = Region::new(2, 4);
		assert_eq!(r.read(&[0, 0, 0, 0]), None);
	}

	#[test]
	fn write_past_end_is_overrun() {
		let r = Region::new(6, 4);
		let mut dest = [0u8; 8];
		assert_eq!(
			r.write(&mut dest, &[1, 2, 3, 4]),
			Err(Overrun { capacity: 8, requested: 10 })
		);
		assert_eq!(dest, [0u8; 8]);
	}

	#[test]
	fn write_wrong_length_is_reported() {
		let r = Region::new(0, 4);
		let mut dest = [0u8; 8];
		assert_eq!(
			r.write(&mut dest, &[1, 2]),
			Err(Overrun { capacity: 4, requested: 2 })
		);
		assert_eq!(dest, [0u8; 8]);
	}

	#[test]
	fn write_then_read() {
		let r = Region::new(2, 3);
		let mut dest = [0u8; 8];
		r.write(&mut dest, &[7, 8, 9]).unwrap();
		assert_eq!(r.read(&dest), Some([7, 8, 9].as_slice()));
	}
}
