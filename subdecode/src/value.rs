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

//! The dynamically typed result of a decode.

use crate::util;
use num_bigint::BigUint;
use serde::{ser::SerializeMap, Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
	/// `()`, `Null`, or an absent `Option`.
	Null,
	Bool(bool),
	UInt(u128),
	Int(i128),
	/// Compact integers too wide for `u128`.
	#[serde(serialize_with = "util::as_decimal")]
	BigUInt(BigUint),
	Text(String),
	/// Opaque bytes; serialized as `0x` hex.
	#[serde(serialize_with = "util::as_hex")]
	Bytes(Vec<u8>),
	Sequence(Vec<Value>),
	#[serde(serialize_with = "util::as_fields")]
	Struct(Vec<StructField>),
	Enum(EnumField),
}

impl Value {
	/// UTF-8 text if the bytes are valid UTF-8, otherwise the bytes themselves.
	pub fn text_or_bytes(bytes: &[u8]) -> Value {
		match std::str::from_utf8(bytes) {
			Ok(s) => Value::Text(s.to_string()),
			Err(_) => Value::Bytes(bytes.to_vec()),
		}
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Value::Text(s) => Some(s),
			_ => None,
		}
	}

	pub fn as_sequence(&self) -> Option<&[Value]> {
		match self {
			Value::Sequence(v) => Some(v),
			_ => None,
		}
	}

	/// Look up a struct field by name.
	pub fn field(&self, name: &str) -> Option<&Value> {
		match self {
			Value::Struct(fields) => fields.iter().find(|f| f.name == name).map(|f| &f.value),
			_ => None,
		}
	}
}

impl From<BigUint> for Value {
	fn from(n: BigUint) -> Value {
		match u128::try_from(&n) {
			Ok(n) => Value::UInt(n),
			Err(_) => Value::BigUInt(n),
		}
	}
}

impl From<bool> for Value {
	fn from(b: bool) -> Value {
		Value::Bool(b)
	}
}

macro_rules! from_int {
	($variant:ident, $wide:ty, $($ty:ty),*) => {
		$(
			impl From<$ty> for Value {
				fn from(n: $ty) -> Value {
					Value::$variant(<$wide>::from(n))
				}
			}
		)*
	};
}

from_int!(UInt, u128, u8, u16, u32, u64, u128);
from_int!(Int, i128, i8, i16, i32, i64, i128);

impl fmt::Display for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Value::Null => write!(f, "null"),
			Value::Bool(b) => write!(f, "{}", b),
			Value::UInt(n) => write!(f, "{}", n),
			Value::Int(n) => write!(f, "{}", n),
			Value::BigUInt(n) => write!(f, "{}", n),
			Value::Text(s) => write!(f, "{:?}", s),
			Value::Bytes(b) => write!(f, "{}", util::hex_string(b)),
			Value::Sequence(v) => {
				write!(f, "[")?;
				for (i, item) in v.iter().enumerate() {
					if i > 0 {
						write!(f, ", ")?;
					}
					write!(f, "{}", item)?;
				}
				write!(f, "]")
			}
			Value::Struct(fields) => {
				write!(f, "{{")?;
				for (i, field) in fields.iter().enumerate() {
					if i > 0 {
						write!(f, ", ")?;
					}
					write!(f, "{}: {}", field.name, field.value)?;
				}
				write!(f, "}}")
			}
			Value::Enum(e) => write!(f, "{}", e),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructField {
	pub name: String,
	pub value: Value,
}

impl StructField {
	pub fn new<S: Into<String>>(name: S, value: Value) -> Self {
		Self { name: name.into(), value }
	}
}

/// The selected variant of an enum.
/// Plain label variants have no value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumField {
	pub index: u8,
	pub name: String,
	pub value: Option<Box<Value>>,
}

impl EnumField {
	pub fn label<S: Into<String>>(index: u8, name: S) -> Self {
		Self { index, name: name.into(), value: None }
	}

	pub fn with_value<S: Into<String>>(index: u8, name: S, value: Value) -> Self {
		Self { index, name: name.into(), value: Some(Box::new(value)) }
	}
}

/// A label serializes as the bare variant name; a variant with data as `{name: value}`.
impl Serialize for EnumField {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		match &self.value {
			None => serializer.serialize_str(&self.name),
			Some(value) => {
				let mut map = serializer.serialize_map(Some(1))?;
				map.serialize_entry(&self.name, value)?;
				map.end()
			}
		}
	}
}

impl fmt::Display for EnumField {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &self.value {
			None => write!(f, "{}", self.name),
			Some(v) => write!(f, "{}({})", self.name, v),
		}
	}
}

/// A decoded value together with the exact bytes it was decoded from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decoded<T = Value> {
	pub value: T,
	#[serde(rename = "valueRaw", serialize_with = "util::as_hex")]
	pub raw: Vec<u8>,
}

impl<T> Decoded<T> {
	pub fn new(value: T, raw: &[u8]) -> Self {
		Self { value, raw: raw.to_vec() }
	}

	/// The consumed bytes as `0x` hex.
	pub fn raw_hex(&self) -> String {
		util::hex_string(&self.raw)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn should_serialize_values() {
		let value = Value::Struct(vec![
			StructField::new("who", Value::Bytes(vec![0xab; 2])),
			StructField::new("amount", Value::from(10u128)),
			StructField::new("memo", Value::text_or_bytes(b"hi")),
			StructField::new("kind", Value::Enum(EnumField::label(1, "Staked"))),
			StructField::new("payee", Value::Enum(EnumField::with_value(2, "Account", Value::from(7u8)))),
			StructField::new("none", Value::Null),
			StructField::new("list", Value::Sequence(vec![Value::from(true), Value::from(-1i8)])),
		]);
		assert_eq!(
			serde_json::to_value(&value).unwrap(),
			json!({
				"who": "0xabab",
				"amount": 10,
				"memo": "hi",
				"kind": "Staked",
				"payee": { "Account": 7 },
				"none": null,
				"list": [true, -1],
			})
		);
	}

	#[test]
	fn should_fall_back_to_bytes() {
		assert_eq!(Value::text_or_bytes(&[0xff, 0xfe]), Value::Bytes(vec![0xff, 0xfe]));
		assert_eq!(Value::text_or_bytes(b"Ok"), Value::Text("Ok".into()));
	}

	#[test]
	fn should_narrow_big_integers() {
		assert_eq!(Value::from(BigUint::from(5u8)), Value::UInt(5));
		let wide: BigUint = BigUint::from(1u8) << 200;
		assert_eq!(Value::from(wide.clone()), Value::BigUInt(wide.clone()));
		assert_eq!(serde_json::to_value(Value::BigUInt(wide.clone())).unwrap(), json!(wide.to_string()));
	}

	#[test]
	fn should_serialize_raw_alongside() {
		let decoded = Decoded::new(Value::from(42u8), &[0x2a]);
		assert_eq!(decoded.raw_hex(), "0x2a");
		assert_eq!(serde_json::to_value(&decoded).unwrap(), json!({ "value": 42, "valueRaw": "0x2a" }));
	}
}
