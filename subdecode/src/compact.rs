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

//! SCALE compact integers.
//!
//! The two low bits of the first byte select the width: `00` one byte, `01` two bytes,
//! `10` four bytes (all shifted left by two), and `11` a big integer whose byte length is
//! `(first >> 2) + 4`, stored unshifted after the mode byte.

use crate::{ByteCursor, Error};
use codec::{Compact, Encode};
use num_bigint::BigUint;

/// Widest big-integer payload the mode byte can describe.
pub const MAX_BYTES: usize = 67;

/// Decode one compact integer, advancing the cursor past every byte of it.
pub fn decode(cursor: &mut ByteCursor) -> Result<BigUint, Error> {
	let first = cursor.read_u8()?;
	let value = match first % 4 {
		0b00 => BigUint::from(first >> 2),
		0b01 => {
			let next = cursor.read_u8()?;
			BigUint::from(u16::from_le_bytes([first, next]) >> 2)
		}
		0b10 => {
			let rest = cursor.read(3)?;
			BigUint::from(u32::from_le_bytes([first, rest[0], rest[1], rest[2]]) >> 2)
		}
		_ => {
			let length = 5 + usize::from(first - 3) / 4;
			BigUint::from_bytes_le(cursor.read(length - 1)?)
		}
	};
	log::trace!("Compact value {} ending at offset {}", value, cursor.offset());
	Ok(value)
}

/// Decode a compact integer used as a length or count.
pub fn decode_len(cursor: &mut ByteCursor) -> Result<usize, Error> {
	let value = decode(cursor)?;
	usize::try_from(&value).map_err(|_| Error::ValueOutOfRange(format!("compact length {} does not fit in usize", value)))
}

/// Decode a compact integer that has to fit in 128 bits.
pub fn decode_u128(cursor: &mut ByteCursor) -> Result<u128, Error> {
	let value = decode(cursor)?;
	u128::try_from(&value).map_err(|_| Error::ValueOutOfRange(format!("compact value {} does not fit in u128", value)))
}

/// Encode `value` in its shortest compact form.
pub fn encode(value: &BigUint) -> Result<Vec<u8>, Error> {
	if let Ok(small) = u32::try_from(value) {
		if small <= 0x3F {
			return Ok(vec![(small as u8) << 2]);
		}
		if small <= 0x3FFF {
			return Ok((((small as u16) << 2) | 0b01).to_le_bytes().to_vec());
		}
		if small <= 0x3FFF_FFFF {
			return Ok(((small << 2) | 0b10).to_le_bytes().to_vec());
		}
	}

	let mut bytes = value.to_bytes_le();
	let length = bytes.len().max(4);
	if length > MAX_BYTES {
		return Err(Error::ValueOutOfRange(format!(
			"{} needs {} bytes, a compact integer holds at most {}",
			value,
			length,
			MAX_BYTES
		)));
	}
	bytes.resize(length, 0);

	let mut out = Vec::with_capacity(length + 1);
	out.push((((length - 4) as u8) << 2) | 0b11);
	out.extend_from_slice(&bytes);
	Ok(out)
}

/// Compact encoding of a byte count, as prepended to length-prefixed payloads.
pub fn encode_len(len: usize) -> Vec<u8> {
	Compact(len as u64).encode()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn round_trip(value: &BigUint) -> BigUint {
		let encoded = encode(value).unwrap();
		let mut cursor = ByteCursor::new(&encoded);
		let decoded = decode(&mut cursor).unwrap();
		assert!(cursor.is_empty(), "{} left bytes behind", value);
		decoded
	}

	#[test]
	fn should_round_trip_boundaries() {
		let values = [
			BigUint::from(0u8),
			BigUint::from(63u8),
			BigUint::from(64u8),
			BigUint::from(16383u16),
			BigUint::from(16384u16),
			BigUint::from(1073741823u32),
			BigUint::from(1073741824u32),
			BigUint::from(u64::MAX),
			BigUint::from(1u8) << 300,
		];
		for value in values.iter() {
			assert_eq!(&round_trip(value), value);
		}
	}

	#[test]
	fn should_match_codec_encoding() {
		for value in [0u128, 1, 63, 64, 16383, 16384, 1 << 30, u32::MAX as u128, 1 << 32, u64::MAX as u128, u128::MAX] {
			assert_eq!(encode(&BigUint::from(value)).unwrap(), Compact(value).encode(), "{}", value);
		}
	}

	#[test]
	fn should_pick_byte_widths() {
		assert_eq!(encode(&BigUint::from(63u8)).unwrap(), vec![0xfc]);
		assert_eq!(encode(&BigUint::from(64u8)).unwrap(), vec![0x01, 0x01]);
		assert_eq!(encode(&BigUint::from(16384u16)).unwrap(), vec![0x02, 0x00, 0x01, 0x00]);
		assert_eq!(encode(&BigUint::from(1073741824u32)).unwrap(), vec![0x03, 0x00, 0x00, 0x00, 0x40]);
	}

	#[test]
	fn should_reject_too_wide_values() {
		let max = (BigUint::from(1u8) << (8 * MAX_BYTES)) - 1u8;
		let encoded = encode(&max).unwrap();
		assert_eq!(encoded[0], 0xff);
		assert_eq!(encoded.len(), MAX_BYTES + 1);
		assert_eq!(round_trip(&max), max);

		let too_wide = BigUint::from(1u8) << (8 * MAX_BYTES);
		assert!(matches!(encode(&too_wide), Err(Error::ValueOutOfRange(_))));
	}

	#[test]
	fn should_fail_on_truncated_input() {
		let mut cursor = ByteCursor::new(&[0x03, 0x00, 0x00]);
		assert!(matches!(decode(&mut cursor), Err(Error::BufferUnderrun { wanted: 4, .. })));
	}

	#[test]
	fn should_decode_lengths() {
		let encoded = Compact(300u32).encode();
		assert_eq!(decode_len(&mut ByteCursor::new(&encoded)).unwrap(), 300);
		assert_eq!(encode_len(300), encoded);
		assert_eq!(decode_u128(&mut ByteCursor::new(&Compact(u128::MAX).encode())).unwrap(), u128::MAX);
	}
}
