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

//! Structs, enums and the generic constructors.

use super::DecodeState;
use crate::{
	compact,
	definitions::{EnumDefinition, TypeDefinition},
	registry::Constructor,
	type_name::TypeExpression,
	value::{EnumField, StructField, Value},
	ByteCursor, Error,
};

impl<'a> DecodeState<'a> {
	pub(super) fn decode_definition(&mut self, cursor: &mut ByteCursor, def: &TypeDefinition) -> Result<Value, Error> {
		match def {
			TypeDefinition::Alias(ty) => self.decode_value(cursor, ty),
			TypeDefinition::Struct(fields) => self.decode_struct(cursor, fields),
			TypeDefinition::Enum(variants) => self.decode_enum(cursor, variants),
		}
	}

	fn decode_struct(&mut self, cursor: &mut ByteCursor, fields: &[(String, String)]) -> Result<Value, Error> {
		let mut values = Vec::with_capacity(fields.len());
		for (name, ty) in fields {
			let value = self.decode_value(cursor, ty)?;
			values.push(StructField::new(name.as_str(), value));
		}
		Ok(Value::Struct(values))
	}

	fn decode_enum(&mut self, cursor: &mut ByteCursor, variants: &EnumDefinition) -> Result<Value, Error> {
		let index = cursor.read_u8()?;
		let out_of_range = || Error::VariantIndexOutOfRange { index, len: variants.len() };
		match variants {
			EnumDefinition::ValueList(labels) => {
				let label = labels.get(index as usize).ok_or_else(out_of_range)?;
				Ok(Value::Enum(EnumField::label(index, label.as_str())))
			}
			EnumDefinition::TypeMapping(mapping) => {
				let (name, ty) = mapping.get(index as usize).ok_or_else(out_of_range)?;
				let value = self.decode_value(cursor, ty)?;
				Ok(Value::Enum(EnumField::with_value(index, name.as_str(), value)))
			}
		}
	}

	pub(super) fn decode_constructor(
		&mut self,
		cursor: &mut ByteCursor,
		ctor: Constructor,
		params: &[TypeExpression],
	) -> Result<Value, Error> {
		let expected = match ctor {
			Constructor::Result => 2,
			_ => 1,
		};
		if params.len() != expected {
			return Err(Error::UnknownType(format!("{:?} with {} type parameters", ctor, params.len())));
		}

		match ctor {
			Constructor::Vec => self.decode_vec(cursor, &params[0]),
			Constructor::Option => self.decode_option(cursor, &params[0]),
			Constructor::Compact => Ok(Value::from(compact::decode(cursor)?)),
			Constructor::Box => self.decode_expr(cursor, &params[0]),
			Constructor::Result => {
				let index = cursor.read_u8()?;
				let (name, ty) = match index {
					0 => ("Ok", &params[0]),
					1 => ("Err", &params[1]),
					_ => return Err(Error::VariantIndexOutOfRange { index, len: 2 }),
				};
				let value = self.decode_expr(cursor, ty)?;
				Ok(Value::Enum(EnumField::with_value(index, name, value)))
			}
		}
	}

	fn decode_vec(&mut self, cursor: &mut ByteCursor, param: &TypeExpression) -> Result<Value, Error> {
		let len = compact::decode_len(cursor)?;
		log::trace!("Vec<{}> of length {}", param, len);
		if param.is_u8() {
			return Ok(Value::Bytes(cursor.read(len)?.to_vec()));
		}
		let mut items = Vec::with_capacity(len.min(cursor.remaining_length()));
		for _ in 0..len {
			items.push(self.decode_expr(cursor, param)?);
		}
		Ok(Value::Sequence(items))
	}

	fn decode_option(&mut self, cursor: &mut ByteCursor, param: &TypeExpression) -> Result<Value, Error> {
		match cursor.read_u8()? {
			0x00 => Ok(Value::Null),
			present => {
				if present != 0x01 {
					log::warn!("Option presence byte {:#04x} at offset {}, reading as present", present, cursor.offset() - 1);
				}
				self.decode_expr(cursor, param)
			}
		}
	}

	pub(super) fn decode_tuple(&mut self, cursor: &mut ByteCursor, params: &[TypeExpression]) -> Result<Value, Error> {
		if params.is_empty() {
			return Ok(Value::Null);
		}
		let mut fields = Vec::with_capacity(params.len());
		for (i, param) in params.iter().enumerate() {
			let value = self.decode_expr(cursor, param)?;
			fields.push(StructField::new(i.to_string(), value));
		}
		Ok(Value::Struct(fields))
	}

	pub(super) fn decode_array(
		&mut self,
		cursor: &mut ByteCursor,
		param: &TypeExpression,
		length: usize,
	) -> Result<Value, Error> {
		if param.is_u8() {
			let bytes = cursor.read(length)?;
			return Ok(match length {
				2 | 4 | 8 | 16 => Value::text_or_bytes(bytes),
				_ => Value::Bytes(bytes.to_vec()),
			});
		}
		let mut items = Vec::with_capacity(length.min(cursor.remaining_length()));
		for _ in 0..length {
			items.push(self.decode_expr(cursor, param)?);
		}
		Ok(Value::Sequence(items))
	}
}

#[cfg(test)]
mod tests {
	use crate::{definitions::TypeDefinition, value::EnumField, ByteCursor, Decoder, Error, TypeRegistry, Value};
	use codec::{Compact, Encode};

	fn decoder() -> Decoder {
		let registry = TypeRegistry::builder()
			.register("Pair", TypeDefinition::structure([("a", "u8"), ("b", "Compact<u32>")]))
			.unwrap()
			.register("Outcome", TypeDefinition::type_mapping([("Fine", "Null"), ("Broke", "u16")]))
			.unwrap()
			.build();
		Decoder::new(registry)
	}

	fn decode(ty: &str, data: &[u8]) -> Result<Value, Error> {
		let mut cursor = ByteCursor::new(data);
		let value = decoder().decode_type(ty, &mut cursor, None)?.value;
		assert!(cursor.is_empty(), "`{}` left {} bytes", ty, cursor.remaining_length());
		Ok(value)
	}

	#[test]
	fn should_decode_struct_fields_in_order() {
		let value = decode("Pair", &(9u8, Compact(1000u32)).encode()).unwrap();
		assert_eq!(value.field("a"), Some(&Value::UInt(9)));
		assert_eq!(value.field("b"), Some(&Value::UInt(1000)));
	}

	#[test]
	fn should_decode_enums() {
		assert_eq!(decode("RewardDestination", &[1]).unwrap(), Value::Enum(EnumField::label(1, "Stash")));
		assert_eq!(decode("Outcome", &[0]).unwrap(), Value::Enum(EnumField::with_value(0, "Fine", Value::Null)));
		assert_eq!(
			decode("Outcome", &[1, 0x34, 0x12]).unwrap(),
			Value::Enum(EnumField::with_value(1, "Broke", Value::UInt(0x1234)))
		);
		assert!(matches!(
			decode("RewardDestination", &[3]),
			Err(Error::VariantIndexOutOfRange { index: 3, len: 3 })
		));
	}

	#[test]
	fn should_decode_options() {
		assert_eq!(decode("Option<u8>", &[0x00]).unwrap(), Value::Null);
		assert_eq!(decode("Option<u8>", &[0x01, 0x2a]).unwrap(), Value::UInt(42));
		// any nonzero presence byte counts
		assert_eq!(decode("Option<u8>", &[0x07, 0x2a]).unwrap(), Value::UInt(42));
	}

	#[test]
	fn should_decode_vectors() {
		assert_eq!(decode("Vec<u8>", &[0x0c, 1, 2, 3]).unwrap(), Value::Bytes(vec![1, 2, 3]));
		assert_eq!(
			decode("Vec<u32>", &vec![5u32, 6].encode()).unwrap(),
			Value::Sequence(vec![Value::UInt(5), Value::UInt(6)])
		);
		assert_eq!(decode("Vec<u16>", &[0x00]).unwrap(), Value::Sequence(vec![]));
		assert!(matches!(decode("Vec<u32>", &[0x08, 1, 0, 0, 0]), Err(Error::BufferUnderrun { .. })));
	}

	#[test]
	fn should_decode_tuples_as_positional_structs() {
		let value = decode("(u8, Vec<u8>)", &(3u8, vec![9u8]).encode()).unwrap();
		assert_eq!(value.field("0"), Some(&Value::UInt(3)));
		assert_eq!(value.field("1"), Some(&Value::Bytes(vec![9])));
		assert_eq!(decode("()", &[]).unwrap(), Value::Null);
	}

	#[test]
	fn should_decode_arrays() {
		assert_eq!(decode("[u8; 4]", b"aura").unwrap(), Value::Text("aura".into()));
		assert_eq!(decode("[u8; 4]", &[0xff; 4]).unwrap(), Value::Bytes(vec![0xff; 4]));
		assert_eq!(decode("[u8; 3]", b"abc").unwrap(), Value::Bytes(b"abc".to_vec()));
		assert_eq!(
			decode("[u16; 2]", &[1, 0, 2, 0]).unwrap(),
			Value::Sequence(vec![Value::UInt(1), Value::UInt(2)])
		);
	}

	#[test]
	fn should_decode_results_and_boxes() {
		assert_eq!(
			decode("Result<u8, u16>", &[0, 5]).unwrap(),
			Value::Enum(EnumField::with_value(0, "Ok", Value::UInt(5)))
		);
		assert_eq!(
			decode("Result<u8, u16>", &[1, 5, 0]).unwrap(),
			Value::Enum(EnumField::with_value(1, "Err", Value::UInt(5)))
		);
		assert!(matches!(decode("Result<u8, u16>", &[2]), Err(Error::VariantIndexOutOfRange { index: 2, len: 2 })));
		assert_eq!(decode("Box<u32>", &7u32.encode()).unwrap(), Value::UInt(7));
	}

	#[test]
	fn should_decode_compact_wrappers() {
		assert_eq!(decode("Compact<Balance>", &Compact(u128::MAX).encode()).unwrap(), Value::UInt(u128::MAX));
		assert!(matches!(decode("Vec<u8, u8>", &[0]), Err(Error::UnknownType(_))));
	}
}
