// Copyright 2019-2024 Parity Technologies (UK) Ltd.
// This file is part of subdecode.
//
// subdecode is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// subdecode is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with subdecode.  If not, see <http://www.gnu.org/licenses/>.

//! A read-only view over SCALE encoded bytes with a single forward-moving offset.

use crate::Error;
use codec::{Decode, MaxEncodedLen};

/// Byte buffer plus a read position.
///
/// One cursor is created per top-level decode and handed by `&mut` to every nested decode,
/// so the offset each step leaves behind is where the next step starts.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
	data: &'a [u8],
	offset: usize,
}

impl<'a> ByteCursor<'a> {
	pub fn new(data: &'a [u8]) -> Self {
		Self { data, offset: 0 }
	}

	/// The full underlying buffer, including bytes already read.
	pub fn data(&self) -> &'a [u8] {
		self.data
	}

	pub fn offset(&self) -> usize {
		self.offset
	}

	/// Number of bytes left unread.
	pub fn remaining_length(&self) -> usize {
		self.data.len() - self.offset
	}

	/// The unread tail, without consuming it.
	pub fn remaining(&self) -> &'a [u8] {
		&self.data[self.offset..]
	}

	pub fn is_empty(&self) -> bool {
		self.remaining_length() == 0
	}

	/// Rewind to the start of the buffer.
	pub fn reset(&mut self) {
		self.offset = 0;
	}

	/// The bytes consumed since `start`.
	pub fn span(&self, start: usize) -> &'a [u8] {
		&self.data[start.min(self.offset)..self.offset]
	}

	/// Return the next `n` bytes without advancing.
	pub fn peek(&self, n: usize) -> Result<&'a [u8], Error> {
		let remaining = self.remaining_length();
		if n > remaining {
			return Err(Error::BufferUnderrun { wanted: n, remaining, offset: self.offset });
		}
		Ok(&self.data[self.offset..self.offset + n])
	}

	/// Return the next `n` bytes and advance past them.
	pub fn read(&mut self, n: usize) -> Result<&'a [u8], Error> {
		let bytes = self.peek(n)?;
		self.offset += n;
		Ok(bytes)
	}

	pub fn read_u8(&mut self) -> Result<u8, Error> {
		Ok(self.read(1)?[0])
	}

	pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], Error> {
		let mut out = [0u8; N];
		out.copy_from_slice(self.read(N)?);
		Ok(out)
	}

	/// Any nonzero byte reads as `true`.
	pub fn read_bool(&mut self) -> Result<bool, Error> {
		match self.read_u8()? {
			0x00 => Ok(false),
			0x01 => Ok(true),
			other => {
				log::warn!("Bool byte {:#04x} at offset {} is neither 0x00 nor 0x01, reading as true", other, self.offset - 1);
				Ok(true)
			}
		}
	}

	/// Decode a fixed width value, consuming exactly its encoded length.
	pub fn decode_fixed<T: Decode + MaxEncodedLen>(&mut self) -> Result<T, Error> {
		let mut bytes = self.read(T::max_encoded_len())?;
		Ok(T::decode(&mut bytes)?)
	}
}
