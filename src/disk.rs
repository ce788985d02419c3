//! File-backed media image, standing in for an EEPROM page or similar
//! non-volatile device.
//!
//! The containers themselves never perform I/O; they mount over plain byte
//! slices. This module supplies those bytes the way EEPROM libraries do:
//! load the device contents into a RAM image, mutate the image in place,
//! and write the whole image back with an explicit [`Image::commit`].
//! Nothing reaches the medium until commit is called.

use alloc::boxed::Box;

use fs::OFlags;
use rustix::fd::AsFd;
use rustix::{fd, fs, io};

type O = OFlags;

#[derive(Debug, PartialEq)]
pub enum CommitErr {
	Os(rustix::io::Errno),
	/// The kernel wrote fewer bytes than the image holds.
	Partial { bytes_expected: usize, bytes_written: usize },
}

#[derive(Debug)]
pub struct Image {
	fd: fd::OwnedFd,
	bytes: Box<[u8]>,
}

impl Image {
	/// Opens (creating if needed) the backing file and loads up to `size`
	/// bytes of it into the image. Bytes past the end of the file start
	/// zeroed, so a fresh file yields an all-zero image - which no
	/// container signature matches, so mounts over it initialize empty.
	pub fn open(path: &str, size: usize) -> io::Result<Self> {
		let flags = O::CREATE | O::RDWR;
		let mode = fs::Mode::RUSR | fs::Mode::WUSR;
		let fd = fs::open(path, flags, mode)?;

		let mut bytes = vec![0u8; size].into_boxed_slice();
		io::pread(fd.as_fd(), &mut bytes, 0)?;
		Ok(Self { fd, bytes })
	}

	pub fn size(&self) -> usize {
		self.bytes.len()
	}

	/// Writes the whole image back to the file and syncs it. A power loss
	/// before this call loses every mutation since the previous commit.
	pub fn commit(&self) -> Result<(), CommitErr> {
		let fd = self.fd.as_fd();
		let bytes_written =
			io::pwrite(fd, &self.bytes, 0).map_err(CommitErr::Os)?;
		let bytes_expected = self.bytes.len();
		if bytes_written != bytes_expected {
			return Err(CommitErr::Partial { bytes_expected, bytes_written });
		}
		fs::fdatasync(fd).map_err(CommitErr::Os)
	}
}

impl AsRef<[u8]> for Image {
	fn as_ref(&self) -> &[u8] {
		&self.bytes
	}
}

impl AsMut<[u8]> for Image {
	/// The byte region containers mount over. Mounting several containers
	/// on one image means splitting this slice (`split_at_mut`) at
	/// `storage_size` boundaries.
	fn as_mut(&mut self) -> &mut [u8] {
		&mut self.bytes
	}
}
