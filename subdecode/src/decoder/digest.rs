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

//! Header digest log entries.
//!
//! Most entries are a variant index followed by the variant's payload. A few historical chains
//! wrote `Other` entries whose payload has a fixed inner layout; those are recognised by their
//! leading bytes in [`LEGACY_LOGS`] before the generic variant dispatch runs.

use super::DecodeState;
use crate::{compact, util, value::StructField, ByteCursor, Error, Value};
use serde::Serialize;

/// Log variants in index order, with the type each one carries.
const LOG_VARIANTS: [(&str, &str); 7] = [
	("Other", "Vec<u8>"),
	("AuthoritiesChange", "Vec<AccountId>"),
	("ChangesTrieRoot", "Bytes"),
	("Seal", "Seal"),
	("Consensus", "Consensus"),
	("SealV0", "SealV0"),
	("PreRuntime", "PreRuntime"),
];

/// A fixed decode plan for log entries starting with `prefix`.
struct LegacyLog {
	prefix: &'static [u8],
	/// Offset of the payload from the start of the entry. The payload runs to the entry's end.
	payload_start: usize,
	ty: &'static str,
	label: &'static str,
}

const LEGACY_LOGS: [LegacyLog; 3] = [
	LegacyLog { prefix: &[0x00, 0x18, 0x02, 0x00], payload_start: 4, ty: "ShardInfo", label: "ShardInfo<ShardNum>" },
	LegacyLog { prefix: &[0x00, 0x28, 0x04, 0x00], payload_start: 4, ty: "u64", label: "U64" },
	LegacyLog {
		prefix: &[0x00, 0xed, 0x03, 0x03, 0x00],
		payload_start: 13,
		ty: "Vec<(SessionKey, u64)>",
		label: "Finalitytrack",
	},
];

/// One decoded digest item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
	#[serde(skip)]
	pub index: u8,
	#[serde(skip)]
	pub name: &'static str,
	#[serde(rename = "type")]
	pub ty: String,
	pub value: Value,
	#[serde(rename = "valueRaw", serialize_with = "util::as_hex")]
	pub raw: Vec<u8>,
}

impl From<LogEntry> for Value {
	fn from(log: LogEntry) -> Value {
		Value::Struct(vec![StructField::new("type", Value::Text(log.ty)), StructField::new("value", log.value)])
	}
}

impl<'a> DecodeState<'a> {
	pub(super) fn decode_log_entry(&mut self, cursor: &mut ByteCursor) -> Result<LogEntry, Error> {
		let start = cursor.offset();
		let entry = cursor.remaining();
		let index = cursor.read_u8()?;
		let (name, ty) = LOG_VARIANTS
			.get(index as usize)
			.copied()
			.ok_or(Error::VariantIndexOutOfRange { index, len: LOG_VARIANTS.len() })?;

		if let Some(legacy) = LEGACY_LOGS.iter().find(|legacy| entry.starts_with(legacy.prefix)) {
			log::warn!("Digest log at offset {} uses the legacy `{}` layout", start, legacy.label);
			let end = legacy_entry_end(entry, start)?;
			let payload = entry.get(legacy.payload_start..end).ok_or(Error::BufferUnderrun {
				wanted: legacy.payload_start,
				remaining: end,
				offset: start,
			})?;
			let value = self.decode_value(&mut ByteCursor::new(payload), legacy.ty)?;
			cursor.read(end - 1)?;
			return Ok(LogEntry { index, name, ty: legacy.label.to_string(), value, raw: cursor.span(start).to_vec() });
		}

		log::trace!("Digest log {} ({})", name, ty);
		let value = self.decode_value(cursor, ty)?;
		Ok(LogEntry { index, name, ty: name.to_string(), value, raw: cursor.span(start).to_vec() })
	}
}

// Length of an entry made of an index byte and a compact length prefixed payload.
fn legacy_entry_end(entry: &[u8], offset: usize) -> Result<usize, Error> {
	let mut prefix = ByteCursor::new(entry.get(1..).unwrap_or_default());
	let len = compact::decode_len(&mut prefix)?;
	let end = 1 + prefix.offset() + len;
	if end > entry.len() {
		return Err(Error::BufferUnderrun { wanted: end, remaining: entry.len(), offset });
	}
	Ok(end)
}
