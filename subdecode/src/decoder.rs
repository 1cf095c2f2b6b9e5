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

//! Decoding of SCALE encoded bytes driven by type name strings.
//!
//! A [`Decoder`] owns a [`TypeRegistry`] and the hashing collaborator. Each decode creates a
//! [`ByteCursor`] over its input (or borrows the caller's) and a `DecodeState` that walks the
//! type expression, resolving every name through the registry and reading from the one cursor.
//!
//! Extrinsics, events and calls additionally consult [`RuntimeMetadata`] for the argument types
//! behind a two byte call or event index.

mod address;
mod composite;
mod digest;
mod era;
mod events;
mod extrinsics;
mod primitives;

pub use self::address::{decode_address, AccountAddress};
pub use self::digest::LogEntry;
pub use self::era::Era;
pub use self::events::EventRecord;
pub use self::extrinsics::{CallRecord, ExtrinsicLayout, ExtrinsicRecord};

use crate::{
	compact,
	config::DecoderConfig,
	definitions::Definitions,
	registry::{Resolved, TypeRegistry},
	type_name::TypeExpression,
	util,
	value::{Decoded, Value},
	ByteCursor, Error,
};
use serde::Serialize;
use subdecode_common::{Blake2Hasher, Hasher256, RuntimeMetadata};

/// A call or event argument: its declared type and what was decoded for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Param {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	#[serde(rename = "type")]
	pub ty: String,
	pub value: Value,
	#[serde(rename = "valueRaw", serialize_with = "util::as_hex")]
	pub raw: Vec<u8>,
}

impl Param {
	fn new(name: Option<String>, ty: String, decoded: Decoded) -> Self {
		Param { name, ty, value: decoded.value, raw: decoded.raw }
	}
}

impl From<Param> for Value {
	fn from(param: Param) -> Value {
		let mut fields = Vec::with_capacity(4);
		if let Some(name) = param.name {
			fields.push(crate::value::StructField::new("name", Value::Text(name)));
		}
		fields.push(crate::value::StructField::new("type", Value::Text(param.ty)));
		fields.push(crate::value::StructField::new("value", param.value));
		fields.push(crate::value::StructField::new("valueRaw", Value::Bytes(param.raw)));
		Value::Struct(fields)
	}
}

/// Walks one type expression tree over one cursor.
struct DecodeState<'a> {
	registry: &'a TypeRegistry,
	/// Scoped definitions, most specific first.
	overrides: &'a [&'a Definitions],
	metadata: Option<&'a dyn RuntimeMetadata>,
	depth: usize,
}

impl<'a> DecodeState<'a> {
	fn new(
		registry: &'a TypeRegistry,
		overrides: &'a [&'a Definitions],
		metadata: Option<&'a dyn RuntimeMetadata>,
	) -> Self {
		Self { registry, overrides, metadata, depth: 0 }
	}

	fn metadata(&self, what: &str) -> Result<&'a dyn RuntimeMetadata, Error> {
		self.metadata.ok_or_else(|| Error::MissingMetadata(what.to_string()))
	}

	/// Decode `ty`, keeping the bytes it was read from.
	fn decode(&mut self, cursor: &mut ByteCursor, ty: &str) -> Result<Decoded, Error> {
		let start = cursor.offset();
		let value = self.decode_value(cursor, ty)?;
		Ok(Decoded::new(value, cursor.span(start)))
	}

	fn decode_value(&mut self, cursor: &mut ByteCursor, ty: &str) -> Result<Value, Error> {
		let expr = self.registry.parse(ty)?;
		self.decode_expr(cursor, &expr)
	}

	fn decode_expr(&mut self, cursor: &mut ByteCursor, expr: &TypeExpression) -> Result<Value, Error> {
		let max_depth = self.registry.max_depth();
		if self.depth >= max_depth {
			return Err(Error::RecursionLimit(max_depth));
		}
		self.depth += 1;
		let value = self.dispatch(cursor, expr);
		self.depth -= 1;
		value
	}

	fn dispatch(&mut self, cursor: &mut ByteCursor, expr: &TypeExpression) -> Result<Value, Error> {
		log::trace!("Decoding {} at offset {}, depth {}", expr, cursor.offset(), self.depth);
		let registry = self.registry;
		match registry.resolve(expr, self.overrides)? {
			Resolved::Definition(def) => self.decode_definition(cursor, def),
			Resolved::Constructor(ctor, params) => self.decode_constructor(cursor, ctor, params),
			Resolved::Builtin(builtin) => self.decode_builtin(cursor, builtin),
			Resolved::Tuple(params) => self.decode_tuple(cursor, params),
			Resolved::Array(param, length) => self.decode_array(cursor, param, length),
		}
	}
}

/// Decoder for SCALE encoded values, extrinsics, events and digest logs.
pub struct Decoder {
	registry: TypeRegistry,
	overrides: Definitions,
	legacy_u64_nonce: bool,
	hasher: Box<dyn Hasher256>,
}

impl Default for Decoder {
	fn default() -> Self {
		Decoder::new(TypeRegistry::default())
	}
}

impl Decoder {
	pub fn new(registry: TypeRegistry) -> Self {
		Self { registry, overrides: Definitions::new(), legacy_u64_nonce: false, hasher: Box::new(Blake2Hasher) }
	}

	pub fn from_config(config: &DecoderConfig) -> Self {
		Self {
			registry: config.registry(),
			overrides: config.overrides.clone(),
			legacy_u64_nonce: config.legacy_u64_nonce,
			hasher: Box::new(Blake2Hasher),
		}
	}

	/// Replace the hash used to compute extrinsic hashes.
	pub fn with_hasher<H: Hasher256 + 'static>(mut self, hasher: H) -> Self {
		self.hasher = Box::new(hasher);
		self
	}

	pub fn registry(&self) -> &TypeRegistry {
		&self.registry
	}

	/// Decode one value of type `ty` from the cursor.
	pub fn decode_type(
		&self,
		ty: &str,
		cursor: &mut ByteCursor,
		metadata: Option<&dyn RuntimeMetadata>,
	) -> Result<Decoded, Error> {
		self.decode_type_with(ty, cursor, metadata, &Definitions::new())
	}

	/// [`Decoder::decode_type`], with `overrides` shadowing the registry for this decode only.
	pub fn decode_type_with(
		&self,
		ty: &str,
		cursor: &mut ByteCursor,
		metadata: Option<&dyn RuntimeMetadata>,
		overrides: &Definitions,
	) -> Result<Decoded, Error> {
		let layers = [overrides, &self.overrides];
		let mut state = DecodeState::new(&self.registry, &layers, metadata);
		state.decode(cursor, ty)
	}

	/// Decode a single extrinsic. `data` may start with the extrinsic's compact length;
	/// if it does not, it is read as a legacy unprefixed extrinsic.
	pub fn decode_extrinsic(&self, data: &[u8], metadata: &dyn RuntimeMetadata) -> Result<ExtrinsicRecord, Error> {
		let layers = [&self.overrides];
		let mut state = DecodeState::new(&self.registry, &layers, Some(metadata));
		state.decode_extrinsic(&mut ByteCursor::new(data), &*self.hasher, self.legacy_u64_nonce)
	}

	/// Decode a block body: a compact count followed by that many length prefixed extrinsics.
	///
	/// Each extrinsic gets its own cursor. On failure, the extrinsics decoded so far are returned
	/// alongside the error.
	pub fn decode_extrinsics(
		&self,
		data: &[u8],
		metadata: &dyn RuntimeMetadata,
	) -> Result<Vec<ExtrinsicRecord>, (Vec<ExtrinsicRecord>, Error)> {
		let mut cursor = ByteCursor::new(data);
		let count = compact::decode_len(&mut cursor).map_err(|e| (Vec::new(), e))?;
		log::debug!("Decoding {} extrinsics", count);

		let mut extrinsics = Vec::with_capacity(count.min(cursor.remaining_length()));
		for idx in 0..count {
			let next = split_length_prefixed(&mut cursor).and_then(|bytes| self.decode_extrinsic(bytes, metadata));
			match next {
				Ok(extrinsic) => extrinsics.push(extrinsic),
				Err(e) => {
					log::debug!("Extrinsic {} failed to decode: {}", idx, e);
					return Err((extrinsics, e));
				}
			}
		}
		Ok(extrinsics)
	}

	/// Decode a single event record.
	pub fn decode_event(&self, cursor: &mut ByteCursor, metadata: &dyn RuntimeMetadata) -> Result<EventRecord, Error> {
		let layers = [&self.overrides];
		let mut state = DecodeState::new(&self.registry, &layers, Some(metadata));
		state.decode_event(cursor, 0)
	}

	/// Decode a `Vec<EventRecord>`, numbering each record with its position.
	pub fn decode_events(
		&self,
		data: &[u8],
		metadata: &dyn RuntimeMetadata,
	) -> Result<Vec<EventRecord>, (Vec<EventRecord>, Error)> {
		let layers = [&self.overrides];
		let mut state = DecodeState::new(&self.registry, &layers, Some(metadata));
		let mut cursor = ByteCursor::new(data);
		let count = compact::decode_len(&mut cursor).map_err(|e| (Vec::new(), e))?;
		log::debug!("Decoding {} events", count);

		let mut events = Vec::with_capacity(count.min(cursor.remaining_length()));
		for idx in 0..count {
			match state.decode_event(&mut cursor, idx) {
				Ok(event) => events.push(event),
				Err(e) => return Err((events, e)),
			}
		}
		Ok(events)
	}

	/// Decode one digest log entry.
	pub fn decode_log(&self, cursor: &mut ByteCursor) -> Result<LogEntry, Error> {
		let layers = [&self.overrides];
		let mut state = DecodeState::new(&self.registry, &layers, None);
		state.decode_log_entry(cursor)
	}

	/// Decode a header digest: a compact count followed by that many log entries.
	pub fn decode_digest(&self, data: &[u8]) -> Result<Vec<LogEntry>, (Vec<LogEntry>, Error)> {
		let mut cursor = ByteCursor::new(data);
		let count = compact::decode_len(&mut cursor).map_err(|e| (Vec::new(), e))?;
		let mut logs = Vec::with_capacity(count.min(cursor.remaining_length()));
		for _ in 0..count {
			match self.decode_log(&mut cursor) {
				Ok(log) => logs.push(log),
				Err(e) => return Err((logs, e)),
			}
		}
		Ok(logs)
	}
}

// The next `Compact<u32>` length and the bytes it covers, prefix included.
fn split_length_prefixed<'a>(cursor: &mut ByteCursor<'a>) -> Result<&'a [u8], Error> {
	let start = cursor.offset();
	let len = compact::decode_len(cursor)?;
	cursor.read(len)?;
	Ok(cursor.span(start))
}
