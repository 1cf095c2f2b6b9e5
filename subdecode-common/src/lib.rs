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

//! Interfaces to the collaborators the decoder consumes but does not own:
//! runtime metadata tables (call index -> call arguments, event index -> event arguments)
//! and the 256-bit hash used to reconstruct extrinsic hashes.

#![forbid(unsafe_code)]

mod hasher;
mod metadata;

pub use self::hasher::{Blake2Hasher, Hasher256};
pub use self::metadata::{
	ArgumentEntry, CallIndexEntry, Error as MetadataError, EventIndexEntry, MetadataTables, ModuleIndex,
	RuntimeMetadata,
};

/// Metadata version from which event records carry a trailing `Vec<Hash>` of topics.
pub const TOPICS_SINCE_VERSION: u32 = 5;
