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

use crate::{value::Decoded, ByteCursor, Error};
use codec::Decode;

/// Transaction validity period.
pub use sp_runtime::generic::Era;

/// Read an era: one byte `0x00` for an immortal era, otherwise two bytes.
///
/// Both bytes of a mortal era are consumed even if their period and phase are not valid;
/// the value is `None` in that case and only the raw bytes are kept.
pub fn decode_era(cursor: &mut ByteCursor) -> Result<Decoded<Option<Era>>, Error> {
	let start = cursor.offset();
	let width = if cursor.peek(1)?[0] == 0 { 1 } else { 2 };
	let mut bytes = cursor.read(width)?;
	let era = match Era::decode(&mut bytes) {
		Ok(era) => Some(era),
		Err(e) => {
			log::warn!("Era {} at offset {} is not valid: {}", crate::util::hex_string(cursor.span(start)), start, e);
			None
		}
	};
	Ok(Decoded::new(era, cursor.span(start)))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn should_decode_immortal_era() {
		let mut cursor = ByteCursor::new(&[0x00, 0x01]);
		let era = decode_era(&mut cursor).unwrap();
		assert_eq!(era.value, Some(Era::Immortal));
		assert_eq!(era.raw, vec![0x00]);
		assert_eq!(cursor.offset(), 1);
	}

	#[test]
	fn should_decode_mortal_era() {
		// period 64, phase 42
		let encoded: u16 = 5 | (42 << 4);
		let bytes = encoded.to_le_bytes();
		let mut cursor = ByteCursor::new(&bytes);
		let era = decode_era(&mut cursor).unwrap();
		assert_eq!(era.value, Some(Era::Mortal(64, 42)));
		assert_eq!(era.raw_hex(), "0xa502");
		assert!(cursor.is_empty());

		let era = era.value.unwrap();
		assert_eq!(era.birth(1000), 938);
		assert_eq!(era.death(1000), 1002);
	}

	#[test]
	fn should_quantize_long_periods() {
		// period 2^16, quantized in steps of 16
		let encoded: u16 = 15 | (100 << 4);
		let bytes = encoded.to_le_bytes();
		let era = decode_era(&mut ByteCursor::new(&bytes)).unwrap();
		assert_eq!(era.value, Some(Era::Mortal(65536, 1600)));
	}

	#[test]
	fn should_keep_bytes_of_invalid_mortal_era() {
		// period 2 is below the minimum of 4
		let mut cursor = ByteCursor::new(&[0x10, 0x00, 0xff]);
		let era = decode_era(&mut cursor).unwrap();
		assert_eq!(era.value, None);
		assert_eq!(era.raw, vec![0x10, 0x00]);
		assert_eq!(cursor.remaining_length(), 1);
	}

	#[test]
	fn should_fail_on_truncated_mortal_era() {
		let mut cursor = ByteCursor::new(&[0x15]);
		assert!(matches!(decode_era(&mut cursor), Err(Error::BufferUnderrun { .. })));
		assert!(matches!(decode_era(&mut ByteCursor::new(&[])), Err(Error::BufferUnderrun { .. })));
	}
}
