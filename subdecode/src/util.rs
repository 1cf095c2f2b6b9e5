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

use crate::value::StructField;
use num_bigint::BigUint;
use serde::{ser::SerializeMap, Serializer};

/// `0x`-prefixed lowercase hex.
pub fn hex_string(bytes: &[u8]) -> String {
	let mut hex_str = String::from("0x");
	hex_str.push_str(&hex::encode(bytes));
	hex_str
}

// Serialize raw bytes as a `0x` hex string
pub fn as_hex<S: Serializer, B: AsRef<[u8]>>(bytes: &B, serializer: S) -> Result<S::Ok, S::Error> {
	serializer.serialize_str(&hex_string(bytes.as_ref()))
}

// JSON numbers can't hold integers this wide
pub fn as_decimal<S: Serializer>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error> {
	serializer.serialize_str(&value.to_str_radix(10))
}

// Struct fields serialize as a map, in declaration order
pub fn as_fields<S: Serializer>(fields: &[StructField], serializer: S) -> Result<S::Ok, S::Error> {
	let mut map = serializer.serialize_map(Some(fields.len()))?;
	for field in fields {
		map.serialize_entry(&field.name, &field.value)?;
	}
	map.end()
}

/// Strip an optional `0x` and decode hex.
pub fn decode_hex(s: &str) -> Result<Vec<u8>, hex::FromHexError> {
	hex::decode(s.trim().trim_start_matches("0x"))
}
