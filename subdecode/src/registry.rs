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

//! Resolution of type names to the procedure that decodes them.

use crate::{
	definitions::{Definitions, TypeDefinition},
	regex,
	type_name::{ParseErrorKind, TypeExpression, MAX_NESTING},
	Error,
};
use std::{
	collections::HashMap,
	sync::{Arc, PoisonError, RwLock},
};

/// Default bound on how deeply type resolution may nest.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Parsed names kept before the cache is emptied and starts over.
pub const MAX_CACHED_NAMES: usize = 4096;

/// Types decoded directly rather than through a definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
	U8,
	U16,
	U32,
	U64,
	U128,
	I8,
	I16,
	I32,
	I64,
	I128,
	Bool,
	Null,
	/// Fixed width hashes, keys and signatures, decoded as opaque bytes.
	Fixed(usize),
	/// Compact length prefixed bytes; text when valid UTF-8.
	Bytes,
	/// Compact length prefixed bytes; always opaque.
	HexBytes,
	/// A compact integer with no declared inner type, kept as its raw encoding.
	RawCompact,
	/// `Compact<Moment>`: a unix timestamp in seconds, or milliseconds for large values, shown as UTC.
	CompactMoment,
	Era,
	Address,
	/// A call index followed by that call's arguments.
	Call,
	DigestItem,
}

/// Generic type constructors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constructor {
	Vec,
	Option,
	Compact,
	Result,
	Box,
}

impl Constructor {
	fn from_name(name: &str) -> Option<Self> {
		match name {
			"Vec" => Some(Constructor::Vec),
			"Option" => Some(Constructor::Option),
			"Compact" => Some(Constructor::Compact),
			"Result" => Some(Constructor::Result),
			"Box" => Some(Constructor::Box),
			_ => None,
		}
	}
}

fn builtin_table() -> HashMap<&'static str, Builtin> {
	let entries: &[(&'static str, Builtin)] = &[
		("u8", Builtin::U8),
		("U8", Builtin::U8),
		("u16", Builtin::U16),
		("U16", Builtin::U16),
		("u32", Builtin::U32),
		("U32", Builtin::U32),
		("u64", Builtin::U64),
		("U64", Builtin::U64),
		("u128", Builtin::U128),
		("U128", Builtin::U128),
		("i8", Builtin::I8),
		("i16", Builtin::I16),
		("i32", Builtin::I32),
		("i64", Builtin::I64),
		("i128", Builtin::I128),
		("bool", Builtin::Bool),
		("Bool", Builtin::Bool),
		("Null", Builtin::Null),
		("H160", Builtin::Fixed(20)),
		("H256", Builtin::Fixed(32)),
		("H512", Builtin::Fixed(64)),
		("Signature", Builtin::Fixed(64)),
		("EcdsaSignature", Builtin::Fixed(65)),
		("Bytes", Builtin::Bytes),
		("String", Builtin::Bytes),
		("Text", Builtin::Bytes),
		("HexBytes", Builtin::HexBytes),
		("Compact", Builtin::RawCompact),
		("Compact<Moment>", Builtin::CompactMoment),
		("Era", Builtin::Era),
		("Address", Builtin::Address),
		("RawAddress", Builtin::Address),
		("GenericAddress", Builtin::Address),
		("Call", Builtin::Call),
		("GenericCall", Builtin::Call),
		("Proposal", Builtin::Call),
		("DigestItem", Builtin::DigestItem),
		("LogDigest", Builtin::DigestItem),
	];
	entries.iter().copied().collect()
}

/// What a type expression resolved to.
#[derive(Debug, Clone, Copy)]
pub enum Resolved<'a> {
	Definition(&'a TypeDefinition),
	Constructor(Constructor, &'a [TypeExpression]),
	Builtin(Builtin),
	Tuple(&'a [TypeExpression]),
	Array(&'a TypeExpression, usize),
}

/// Named definitions plus the builtin table, with a cache of parsed type names.
///
/// Safe to share between threads; each decode holds its own cursor and only reads from here.
#[derive(Debug)]
pub struct TypeRegistry {
	definitions: Definitions,
	builtins: HashMap<&'static str, Builtin>,
	parsed: RwLock<HashMap<String, Arc<TypeExpression>>>,
	max_depth: usize,
}

impl Default for TypeRegistry {
	fn default() -> Self {
		RegistryBuilder::default().build()
	}
}

impl TypeRegistry {
	/// A builder starting from the bundled definitions.
	pub fn builder() -> RegistryBuilder {
		RegistryBuilder::default()
	}

	pub fn max_depth(&self) -> usize {
		self.max_depth
	}

	pub fn definitions(&self) -> &Definitions {
		&self.definitions
	}

	/// Add or replace a named definition.
	pub fn register(&mut self, name: &str, def: TypeDefinition) -> Result<(), Error> {
		self.definitions.insert(name, def)?;
		Ok(())
	}

	pub fn builtin(&self, name: &str) -> Option<Builtin> {
		self.builtins.get(name).copied()
	}

	/// Sanitize and parse a type name. Parsed names are cached by their input string, up to
	/// [`MAX_CACHED_NAMES`] of them.
	pub fn parse(&self, ty: &str) -> Result<Arc<TypeExpression>, Error> {
		// the cache only ever holds complete entries, so a poisoned lock is still usable
		if let Some(expr) = self.parsed.read().unwrap_or_else(PoisonError::into_inner).get(ty) {
			return Ok(Arc::clone(expr));
		}

		let sanitized = regex::sanitize_ty(ty);
		let expr = TypeExpression::parse(&sanitized).map(Arc::new).map_err(|source| match source.err {
			ParseErrorKind::TooDeep => Error::RecursionLimit(MAX_NESTING),
			_ => Error::TypeParse { ty: ty.to_string(), source },
		})?;
		log::trace!("Parsed `{}` as {:?}", ty, expr);

		let mut cache = self.parsed.write().unwrap_or_else(PoisonError::into_inner);
		if cache.len() >= MAX_CACHED_NAMES {
			log::debug!("Type name cache is full, clearing {} entries", cache.len());
			cache.clear();
		}
		cache.insert(ty.to_string(), Arc::clone(&expr));
		Ok(expr)
	}

	/// Find what decodes `expr`.
	///
	/// Overrides are consulted first, in order, then builtins spelled with their generic arguments
	/// (`Compact<Moment>`), then generic constructors, then named definitions and finally builtins.
	/// A named type is looked up by its full canonical spelling before its bare name, so
	/// `Linkage<AccountId>` falls back to a definition of `Linkage`.
	pub fn resolve<'a>(
		&'a self,
		expr: &'a TypeExpression,
		overrides: &[&'a Definitions],
	) -> Result<Resolved<'a>, Error> {
		let (name, params) = match expr {
			TypeExpression::Named { name, params } => (name.as_str(), params.as_slice()),
			TypeExpression::Tuple(params) => return Ok(Resolved::Tuple(params)),
			TypeExpression::Array { param, length } => return Ok(Resolved::Array(param, *length)),
		};

		let canonical = if params.is_empty() { None } else { Some(expr.to_string()) };
		let lookup = |defs: &'a Definitions| -> Option<&'a TypeDefinition> {
			canonical.as_deref().and_then(|c| defs.get(c)).or_else(|| defs.get(name))
		};

		for layer in overrides.iter().copied() {
			if let Some(def) = lookup(layer) {
				log::trace!("Resolved `{}` to an override", expr);
				return Ok(Resolved::Definition(def));
			}
		}

		if let Some(builtin) = canonical.as_deref().and_then(|c| self.builtin(c)) {
			return Ok(Resolved::Builtin(builtin));
		}

		if !params.is_empty() {
			if let Some(ctor) = Constructor::from_name(name) {
				return Ok(Resolved::Constructor(ctor, params));
			}
		}

		if let Some(def) = lookup(&self.definitions) {
			return Ok(Resolved::Definition(def));
		}

		if let Some(builtin) = self.builtin(name) {
			return Ok(Resolved::Builtin(builtin));
		}

		Err(Error::UnknownType(expr.to_string()))
	}
}

/// Builds a [`TypeRegistry`].
pub struct RegistryBuilder {
	definitions: Definitions,
	max_depth: usize,
}

impl Default for RegistryBuilder {
	fn default() -> Self {
		Self { definitions: Definitions::bundled(), max_depth: DEFAULT_MAX_DEPTH }
	}
}

impl RegistryBuilder {
	/// Start without the bundled definitions.
	pub fn empty() -> Self {
		Self { definitions: Definitions::new(), max_depth: DEFAULT_MAX_DEPTH }
	}

	/// Merge definitions on top of what the builder already has.
	pub fn definitions(mut self, definitions: Definitions) -> Self {
		self.definitions.extend(definitions);
		self
	}

	pub fn definitions_from_json(self, json: &str) -> Result<Self, Error> {
		let definitions = Definitions::from_json(json)?;
		Ok(self.definitions(definitions))
	}

	pub fn register(mut self, name: &str, def: TypeDefinition) -> Result<Self, Error> {
		self.definitions.insert(name, def)?;
		Ok(self)
	}

	pub fn max_depth(mut self, max_depth: usize) -> Self {
		self.max_depth = max_depth;
		self
	}

	pub fn build(self) -> TypeRegistry {
		TypeRegistry {
			definitions: self.definitions,
			builtins: builtin_table(),
			parsed: RwLock::new(HashMap::new()),
			max_depth: self.max_depth,
		}
	}
}
