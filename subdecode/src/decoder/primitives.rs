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

//! Builtin types: fixed width integers, byte blobs and the handful of types with their own wire layout.

use super::{address::decode_address, era::decode_era, DecodeState};
use crate::{compact, registry::Builtin, ByteCursor, Error, Value};
use chrono::{DateTime, Utc};

/// Moments above this are in milliseconds rather than seconds.
const MOMENT_MILLIS_THRESHOLD: u128 = 10_000_000_000;

impl<'a> DecodeState<'a> {
	pub(super) fn decode_builtin(&mut self, cursor: &mut ByteCursor, builtin: Builtin) -> Result<Value, Error> {
		let value: Value = match builtin {
			Builtin::U8 => cursor.read_u8()?.into(),
			Builtin::U16 => cursor.decode_fixed::<u16>()?.into(),
			Builtin::U32 => cursor.decode_fixed::<u32>()?.into(),
			Builtin::U64 => cursor.decode_fixed::<u64>()?.into(),
			Builtin::U128 => cursor.decode_fixed::<u128>()?.into(),
			Builtin::I8 => cursor.decode_fixed::<i8>()?.into(),
			Builtin::I16 => cursor.decode_fixed::<i16>()?.into(),
			Builtin::I32 => cursor.decode_fixed::<i32>()?.into(),
			Builtin::I64 => cursor.decode_fixed::<i64>()?.into(),
			Builtin::I128 => cursor.decode_fixed::<i128>()?.into(),
			Builtin::Bool => cursor.read_bool()?.into(),
			Builtin::Null => Value::Null,
			Builtin::Fixed(width) => Value::Bytes(cursor.read(width)?.to_vec()),
			Builtin::Bytes => {
				let len = compact::decode_len(cursor)?;
				Value::text_or_bytes(cursor.read(len)?)
			}
			Builtin::HexBytes => {
				let len = compact::decode_len(cursor)?;
				Value::Bytes(cursor.read(len)?.to_vec())
			}
			Builtin::RawCompact => {
				let start = cursor.offset();
				compact::decode(cursor)?;
				Value::Bytes(cursor.span(start).to_vec())
			}
			Builtin::CompactMoment => Value::Text(decode_moment(cursor)?.format("%Y-%m-%dT%H:%M:%S%.f").to_string()),
			Builtin::Era => Value::Bytes(decode_era(cursor)?.raw),
			Builtin::Address => Value::from(&decode_address(cursor)?),
			Builtin::Call => Value::from(self.decode_call(cursor)?),
			Builtin::DigestItem => Value::from(self.decode_log_entry(cursor)?),
		};
		Ok(value)
	}
}

fn decode_moment(cursor: &mut ByteCursor) -> Result<DateTime<Utc>, Error> {
	let moment = compact::decode_u128(cursor)?;
	let time = i64::try_from(moment).ok().and_then(|n| {
		if moment > MOMENT_MILLIS_THRESHOLD {
			DateTime::from_timestamp_millis(n)
		} else {
			DateTime::from_timestamp(n, 0)
		}
	});
	time.ok_or_else(|| Error::ValueOutOfRange(format!("{} is not a representable timestamp", moment)))
}
