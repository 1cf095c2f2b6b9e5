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

use crate::type_name::ParseError;
use subdecode_common::ModuleIndex;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
	#[error("Buffer underrun at offset {offset}: wanted {wanted} bytes but only {remaining} remain")]
	BufferUnderrun { wanted: usize, remaining: usize, offset: usize },
	#[error("Unknown type `{0}`")]
	UnknownType(String),
	#[error("Variant index {index} out of range for an enum with {len} variants")]
	VariantIndexOutOfRange { index: u8, len: usize },
	#[error("Value out of range: {0}")]
	ValueOutOfRange(String),
	#[error("Unsupported extrinsic version {0:#04x}")]
	UnsupportedExtrinsicVersion(u8),
	#[error("No call found at index {0}")]
	UnknownCall(ModuleIndex),
	#[error("No event found at index {0}")]
	UnknownEvent(ModuleIndex),
	#[error("Could not parse type `{ty}`: {source}")]
	TypeParse { ty: String, source: ParseError },
	#[error("Type nesting exceeded the maximum depth of {0}")]
	RecursionLimit(usize),
	#[error("Codec {0}")]
	Codec(#[from] codec::Error),
	#[error("Invalid type definition: {0}")]
	InvalidDefinition(String),
	#[error("Runtime metadata is required to decode `{0}`")]
	MissingMetadata(String),
	#[error(transparent)]
	Json(#[from] serde_json::Error),
}
