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

//! Decode SCALE encoded Substrate data from type name strings.
//!
//! Types are named the way runtime metadata names them (`Vec<T::AccountId>`,
//! `Compact<Balance>`, `(SessionKey, u64)`) and resolved at decode time through a
//! [`TypeRegistry`] of builtins and JSON definitions. Extrinsics and events additionally
//! take a [`RuntimeMetadata`] implementation for their call and event tables.
//!
//! ```
//! use subdecode::{ByteCursor, Decoder, Value};
//!
//! let decoder = Decoder::default();
//! let mut cursor = ByteCursor::new(&[0x0c, 1, 2, 3]);
//! let decoded = decoder.decode_type("Vec<u8>", &mut cursor, None).unwrap();
//! assert_eq!(decoded.value, Value::Bytes(vec![1, 2, 3]));
//! ```

#![forbid(unsafe_code)]

pub mod compact;
mod config;
mod cursor;
pub mod decoder;
pub mod definitions;
mod error;
mod regex;
pub mod registry;
pub mod type_name;
mod util;
mod value;

pub use self::config::DecoderConfig;
pub use self::cursor::ByteCursor;
pub use self::decoder::{
	AccountAddress, CallRecord, Decoder, Era, EventRecord, ExtrinsicLayout, ExtrinsicRecord, LogEntry, Param,
};
pub use self::definitions::{Definitions, EnumDefinition, TypeDefinition};
pub use self::error::Error;
pub use self::registry::{RegistryBuilder, TypeRegistry};
pub use self::type_name::{ParseError, TypeExpression};
pub use self::util::{decode_hex, hex_string};
pub use self::value::{Decoded, EnumField, StructField, Value};

pub use subdecode_common::{
	ArgumentEntry, Blake2Hasher, CallIndexEntry, EventIndexEntry, Hasher256, MetadataTables, ModuleIndex,
	RuntimeMetadata,
};
