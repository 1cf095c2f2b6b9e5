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

//! The view of runtime metadata that decoders need.
//!
//! Parsing the metadata blob itself happens elsewhere; whatever does it only has to expose
//! a call table, an event table and a version number through [`RuntimeMetadata`].
//! [`MetadataTables`] is an in-memory implementation that can be loaded from JSON.

use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt, str::FromStr};

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid module index `{0}`: expected 2 hex encoded bytes")]
	InvalidIndex(String),
	#[error("Duplicate {kind} index {index}")]
	DuplicateIndex { kind: &'static str, index: ModuleIndex },
	#[error(transparent)]
	Json(#[from] serde_json::Error),
}

/// Two byte `(module, item)` selector for calls and events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ModuleIndex(pub [u8; 2]);

impl ModuleIndex {
	pub fn new(module: u8, item: u8) -> Self {
		Self([module, item])
	}

	pub fn module(&self) -> u8 {
		self.0[0]
	}

	pub fn item(&self) -> u8 {
		self.0[1]
	}
}

impl fmt::Display for ModuleIndex {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", hex::encode(self.0))
	}
}

impl FromStr for ModuleIndex {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let digits = s.strip_prefix("0x").unwrap_or(s);
		let mut index = [0u8; 2];
		hex::decode_to_slice(digits, &mut index).map_err(|_| Error::InvalidIndex(s.to_string()))?;
		Ok(Self(index))
	}
}

impl TryFrom<String> for ModuleIndex {
	type Error = Error;
	fn try_from(s: String) -> Result<Self, Self::Error> {
		s.parse()
	}
}

impl From<ModuleIndex> for String {
	fn from(index: ModuleIndex) -> String {
		index.to_string()
	}
}

impl From<[u8; 2]> for ModuleIndex {
	fn from(index: [u8; 2]) -> Self {
		Self(index)
	}
}

/// A named, typed argument of a call or event.
/// Event arguments in older metadata carry no name; those deserialize from a bare type string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ArgumentRepr")]
pub struct ArgumentEntry {
	pub name: Option<String>,
	#[serde(rename = "type")]
	pub ty: String,
}

impl ArgumentEntry {
	pub fn new<N: Into<String>, T: Into<String>>(name: N, ty: T) -> Self {
		Self { name: Some(name.into()), ty: ty.into() }
	}

	pub fn unnamed<T: Into<String>>(ty: T) -> Self {
		Self { name: None, ty: ty.into() }
	}
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ArgumentRepr {
	Type(String),
	Named {
		#[serde(default)]
		name: Option<String>,
		#[serde(rename = "type")]
		ty: String,
	},
}

impl From<ArgumentRepr> for ArgumentEntry {
	fn from(repr: ArgumentRepr) -> Self {
		match repr {
			ArgumentRepr::Type(ty) => ArgumentEntry { name: None, ty },
			ArgumentRepr::Named { name, ty } => ArgumentEntry { name, ty },
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallIndexEntry {
	pub module: String,
	pub name: String,
	#[serde(default)]
	pub args: Vec<ArgumentEntry>,
}

impl CallIndexEntry {
	/// `module.name`, the identifier an extrinsic record reports for its call.
	pub fn identifier(&self) -> String {
		format!("{}.{}", self.module, self.name)
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventIndexEntry {
	pub module: String,
	pub name: String,
	#[serde(default)]
	pub args: Vec<ArgumentEntry>,
}

/// Read-only metadata lookups used while decoding a block.
pub trait RuntimeMetadata {
	/// The call declared at this index.
	fn call(&self, index: ModuleIndex) -> Option<&CallIndexEntry>;
	/// The event declared at this index.
	fn event(&self, index: ModuleIndex) -> Option<&EventIndexEntry>;
	/// Metadata version, if known.
	fn version(&self) -> Option<u32>;
}

#[derive(Deserialize)]
struct IndexedCall {
	index: ModuleIndex,
	#[serde(flatten)]
	entry: CallIndexEntry,
}

#[derive(Deserialize)]
struct IndexedEvent {
	index: ModuleIndex,
	#[serde(flatten)]
	entry: EventIndexEntry,
}

#[derive(Deserialize)]
struct TablesRepr {
	#[serde(default)]
	version: Option<u32>,
	#[serde(default)]
	calls: Vec<IndexedCall>,
	#[serde(default)]
	events: Vec<IndexedEvent>,
}

/// Call and event tables keyed by their two byte index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataTables {
	version: Option<u32>,
	calls: HashMap<ModuleIndex, CallIndexEntry>,
	events: HashMap<ModuleIndex, EventIndexEntry>,
}

impl MetadataTables {
	pub fn new(version: Option<u32>) -> Self {
		Self { version, ..Default::default() }
	}

	/// Load tables from JSON of the shape
	/// `{"version": 9, "calls": [{"index": "0600", "module": .., "name": .., "args": [..]}], "events": [..]}`.
	pub fn from_json(json: &str) -> Result<Self, Error> {
		let repr: TablesRepr = serde_json::from_str(json)?;
		let mut tables = Self::new(repr.version);
		for call in repr.calls {
			if tables.calls.insert(call.index, call.entry).is_some() {
				return Err(Error::DuplicateIndex { kind: "call", index: call.index });
			}
		}
		for event in repr.events {
			if tables.events.insert(event.index, event.entry).is_some() {
				return Err(Error::DuplicateIndex { kind: "event", index: event.index });
			}
		}
		Ok(tables)
	}

	pub fn insert_call<I: Into<ModuleIndex>>(&mut self, index: I, entry: CallIndexEntry) -> &mut Self {
		self.calls.insert(index.into(), entry);
		self
	}

	pub fn insert_event<I: Into<ModuleIndex>>(&mut self, index: I, entry: EventIndexEntry) -> &mut Self {
		self.events.insert(index.into(), entry);
		self
	}

	pub fn set_version(&mut self, version: Option<u32>) {
		self.version = version;
	}

	/// Iterate over all calls, in no particular order.
	pub fn calls(&self) -> impl Iterator<Item = (&ModuleIndex, &CallIndexEntry)> {
		self.calls.iter()
	}

	/// Iterate over all events, in no particular order.
	pub fn events(&self) -> impl Iterator<Item = (&ModuleIndex, &EventIndexEntry)> {
		self.events.iter()
	}
}

impl RuntimeMetadata for MetadataTables {
	fn call(&self, index: ModuleIndex) -> Option<&CallIndexEntry> {
		self.calls.get(&index)
	}

	fn event(&self, index: ModuleIndex) -> Option<&EventIndexEntry> {
		self.events.get(&index)
	}

	fn version(&self) -> Option<u32> {
		self.version
	}
}
