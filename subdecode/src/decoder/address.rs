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

use crate::{util, value::StructField, ByteCursor, Error, Value};
use serde::Serialize;
use sp_core::H256;

const ACCOUNT_ID_MARKER: u8 = 0xff;

/// An account reference as it appears in a signed extrinsic or an `Address` argument.
///
/// The leading marker byte selects the form:
/// - `0xff`: a 32 byte account id follows
/// - `0xfc`, `0xfd`, `0xfe`: a 2, 4 or 8 byte little endian account index follows
/// - anything else is itself a one byte account index
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountAddress {
	Id(H256),
	Index {
		marker: u8,
		/// Index bytes as they were encoded; the marker itself for the one byte form.
		bytes: Vec<u8>,
		index: u64,
	},
}

pub fn decode_address(cursor: &mut ByteCursor) -> Result<AccountAddress, Error> {
	let marker = cursor.read_u8()?;
	let width = match marker {
		ACCOUNT_ID_MARKER => {
			let id: [u8; 32] = cursor.read_array()?;
			log::trace!("Account id {}", util::hex_string(&id));
			return Ok(AccountAddress::Id(H256::from(id)));
		}
		0xfc => 2,
		0xfd => 4,
		0xfe => 8,
		_ => return Ok(AccountAddress::Index { marker, bytes: vec![marker], index: u64::from(marker) }),
	};

	let bytes = cursor.read(width)?;
	let mut le = [0u8; 8];
	le[..width].copy_from_slice(bytes);
	let index = u64::from_le_bytes(le);
	log::trace!("Account index {} from {} bytes", index, width);
	Ok(AccountAddress::Index { marker, bytes: bytes.to_vec(), index })
}

impl AccountAddress {
	pub fn marker(&self) -> u8 {
		match self {
			AccountAddress::Id(_) => ACCOUNT_ID_MARKER,
			AccountAddress::Index { marker, .. } => *marker,
		}
	}

	/// The marker byte as two hex digits, e.g. `ff`.
	pub fn account_length(&self) -> String {
		hex::encode([self.marker()])
	}

	pub fn account_id(&self) -> Option<String> {
		match self {
			AccountAddress::Id(id) => Some(util::hex_string(id.as_bytes())),
			AccountAddress::Index { .. } => None,
		}
	}

	/// The index bytes as `0x` hex.
	pub fn account_index(&self) -> Option<String> {
		match self {
			AccountAddress::Index { bytes, .. } => Some(util::hex_string(bytes)),
			AccountAddress::Id(_) => None,
		}
	}

	pub fn account_idx(&self) -> Option<u64> {
		match self {
			AccountAddress::Index { index, .. } => Some(*index),
			AccountAddress::Id(_) => None,
		}
	}
}

impl From<&AccountAddress> for Value {
	fn from(address: &AccountAddress) -> Value {
		match address {
			AccountAddress::Id(id) => Value::Bytes(id.as_bytes().to_vec()),
			AccountAddress::Index { bytes, index, .. } => Value::Struct(vec![
				StructField::new("account_index", Value::Bytes(bytes.clone())),
				StructField::new("account_idx", Value::from(*index)),
			]),
		}
	}
}

impl Serialize for AccountAddress {
	fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		Value::from(self).serialize(serializer)
	}
}
