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

//! Extrinsics and the calls they carry.

use super::{
	address::decode_address,
	era::{decode_era, Era},
	AccountAddress, DecodeState, Param,
};
use crate::{
	compact, util,
	value::{Decoded, StructField},
	ByteCursor, Error, Value,
};
use serde::{ser::SerializeMap, Serialize, Serializer};
use sp_core::H256;
use subdecode_common::{Hasher256, ModuleIndex};

const SIGNED_BIT: u8 = 0x80;
const VERSION_MASK: u8 = 0x7f;

/// Which fields a signed extrinsic carries, and in which order, before its call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum ExtrinsicLayout {
	#[display(fmt = "v1")]
	V1,
	#[display(fmt = "v2")]
	V2,
	#[display(fmt = "v3")]
	V3,
	/// Version 1 with a fixed width `u64` nonce, used by some early chains.
	#[display(fmt = "v1 (u64 nonce)")]
	Legacy64Nonce,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SignedField {
	Address,
	Signature,
	Nonce(&'static str),
	Era,
	Tip(&'static str),
}

impl ExtrinsicLayout {
	/// Select the layout for a version byte. The signed bit is ignored.
	pub fn from_version(version: u8, legacy_u64_nonce: bool) -> Result<Self, Error> {
		match version & VERSION_MASK {
			1 if legacy_u64_nonce => Ok(ExtrinsicLayout::Legacy64Nonce),
			1 => Ok(ExtrinsicLayout::V1),
			2 => Ok(ExtrinsicLayout::V2),
			3 => Ok(ExtrinsicLayout::V3),
			_ => Err(Error::UnsupportedExtrinsicVersion(version)),
		}
	}

	fn signed_fields(&self) -> &'static [SignedField] {
		match self {
			ExtrinsicLayout::V1 => {
				&[SignedField::Address, SignedField::Signature, SignedField::Nonce("Compact<u32>"), SignedField::Era]
			}
			ExtrinsicLayout::Legacy64Nonce => {
				&[SignedField::Address, SignedField::Signature, SignedField::Nonce("u64"), SignedField::Era]
			}
			ExtrinsicLayout::V2 | ExtrinsicLayout::V3 => &[
				SignedField::Address,
				SignedField::Signature,
				SignedField::Era,
				SignedField::Nonce("Compact<u64>"),
				SignedField::Tip("Compact<Balance>"),
			],
		}
	}
}

/// A call index and its decoded arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallRecord {
	#[serde(rename = "call_index")]
	pub index: ModuleIndex,
	#[serde(rename = "call_module")]
	pub module: String,
	#[serde(rename = "call_function")]
	pub name: String,
	#[serde(rename = "call_args")]
	pub params: Vec<Param>,
}

impl From<CallRecord> for Value {
	fn from(call: CallRecord) -> Value {
		Value::Struct(vec![
			StructField::new("call_index", Value::Bytes(call.index.0.to_vec())),
			StructField::new("call_module", Value::Text(call.module)),
			StructField::new("call_function", Value::Text(call.name)),
			StructField::new("call_args", Value::Sequence(call.params.into_iter().map(Value::from).collect())),
		])
	}
}

/// A decoded extrinsic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtrinsicRecord {
	/// Every byte the decode consumed, length prefix included when there was one.
	pub raw: Vec<u8>,
	/// `None` for legacy extrinsics without a length prefix.
	pub extrinsic_length: Option<usize>,
	pub version: u8,
	pub layout: ExtrinsicLayout,
	pub signed: bool,
	pub address: Option<AccountAddress>,
	pub signature: Option<Vec<u8>>,
	pub nonce: Option<Decoded>,
	/// The era's bytes, and the era itself when they encode a valid one.
	pub era: Option<Decoded<Option<Era>>>,
	pub tip: Option<Decoded>,
	pub extrinsic_hash: Option<H256>,
	pub call: CallRecord,
}

impl ExtrinsicRecord {
	/// The version byte as two hex digits, e.g. `81`.
	pub fn version_info(&self) -> String {
		hex::encode([self.version])
	}

	pub fn call_module(&self) -> &str {
		&self.call.module
	}

	pub fn call_module_function(&self) -> &str {
		&self.call.name
	}

	pub fn params(&self) -> &[Param] {
		&self.call.params
	}
}

impl Serialize for ExtrinsicRecord {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let mut map = serializer.serialize_map(None)?;
		map.serialize_entry("valueRaw", &util::hex_string(&self.raw))?;
		map.serialize_entry("extrinsic_length", &self.extrinsic_length)?;
		map.serialize_entry("version_info", &self.version_info())?;
		if self.signed {
			let address = self.address.as_ref();
			map.serialize_entry("account_length", &address.map(AccountAddress::account_length))?;
			map.serialize_entry("account_id", &address.and_then(AccountAddress::account_id))?;
			map.serialize_entry("account_index", &address.and_then(AccountAddress::account_index))?;
			map.serialize_entry("account_idx", &address.and_then(AccountAddress::account_idx))?;
			map.serialize_entry("signature", &self.signature.as_deref().map(util::hex_string))?;
			map.serialize_entry("extrinsic_hash", &self.extrinsic_hash.map(|h| util::hex_string(h.as_bytes())))?;
		}
		map.serialize_entry("call_code", &self.call.index)?;
		map.serialize_entry("call_module_function", &self.call.name)?;
		map.serialize_entry("call_module", &self.call.module)?;
		if let Some(nonce) = &self.nonce {
			map.serialize_entry("nonce", &nonce.value)?;
		}
		if let Some(era) = &self.era {
			map.serialize_entry("era", &era.raw_hex())?;
		}
		if let Some(tip) = &self.tip {
			map.serialize_entry("tip", &tip.value)?;
		}
		map.serialize_entry("params", &self.call.params)?;
		map.end()
	}
}

impl<'a> DecodeState<'a> {
	pub(super) fn decode_extrinsic(
		&mut self,
		cursor: &mut ByteCursor,
		hasher: &dyn Hasher256,
		legacy_u64_nonce: bool,
	) -> Result<ExtrinsicRecord, Error> {
		self.metadata("extrinsic")?;

		let extrinsic_length = match compact::decode_len(cursor) {
			Ok(len) if len == cursor.remaining_length() => Some(len),
			_ => {
				log::warn!("Extrinsic has no valid length prefix, decoding it as a legacy extrinsic");
				cursor.reset();
				None
			}
		};

		let version = cursor.read_u8()?;
		let layout = ExtrinsicLayout::from_version(version, legacy_u64_nonce)?;
		let signed = version & SIGNED_BIT != 0;
		log::debug!("Extrinsic version {:#04x}, layout {}, signed: {}", version, layout, signed);

		let mut address = None;
		let mut signature = None;
		let mut nonce = None;
		let mut era = None;
		let mut tip = None;
		let mut extrinsic_hash = None;

		if signed {
			for field in layout.signed_fields() {
				match *field {
					SignedField::Address => address = Some(decode_address(cursor)?),
					SignedField::Signature => signature = Some(self.decode(cursor, "Signature")?.raw),
					SignedField::Nonce(ty) => nonce = Some(self.decode(cursor, ty)?),
					SignedField::Era => era = Some(decode_era(cursor)?),
					SignedField::Tip(ty) => tip = Some(self.decode(cursor, ty)?),
				}
			}
			extrinsic_hash = Some(extrinsic_hash_of(cursor.data(), extrinsic_length.is_some(), hasher));
		}

		let call = self.decode_call(cursor)?;
		if !cursor.is_empty() {
			log::warn!("{} bytes left over after decoding call {}", cursor.remaining_length(), call.index);
		}

		Ok(ExtrinsicRecord {
			raw: cursor.span(0).to_vec(),
			extrinsic_length,
			version,
			layout,
			signed,
			address,
			signature,
			nonce,
			era,
			tip,
			extrinsic_hash,
			call,
		})
	}

	/// A two byte call index followed by the arguments metadata declares for it.
	pub(super) fn decode_call(&mut self, cursor: &mut ByteCursor) -> Result<CallRecord, Error> {
		let metadata = self.metadata("Call")?;
		let index = ModuleIndex::from(cursor.read_array::<2>()?);
		let entry = metadata.call(index).ok_or(Error::UnknownCall(index))?;
		log::debug!("Call {} resolved to {}", index, entry.identifier());

		let mut params = Vec::with_capacity(entry.args.len());
		for arg in &entry.args {
			let decoded = self.decode(cursor, &arg.ty)?;
			params.push(Param::new(arg.name.clone(), arg.ty.clone(), decoded));
		}
		Ok(CallRecord { index, module: entry.module.clone(), name: entry.name.clone(), params })
	}
}

/// Legacy extrinsics are hashed as if they had been length prefixed.
fn extrinsic_hash_of(data: &[u8], length_prefixed: bool, hasher: &dyn Hasher256) -> H256 {
	if length_prefixed {
		hasher.hash(data)
	} else {
		let mut prefixed = compact::encode_len(data.len());
		prefixed.extend_from_slice(data);
		hasher.hash(&prefixed)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::Decoder;
	use codec::{Compact, Encode};
	use subdecode_common::{ArgumentEntry, Blake2Hasher, CallIndexEntry, MetadataTables};

	fn metadata() -> MetadataTables {
		let mut tables = MetadataTables::new(Some(9));
		tables
			.insert_call(
				[6, 0],
				CallIndexEntry {
					module: "balances".into(),
					name: "transfer".into(),
					args: vec![ArgumentEntry::new("dest", "Address"), ArgumentEntry::new("value", "Compact<Balance>")],
				},
			)
			.insert_call(
				[0, 0],
				CallIndexEntry {
					module: "timestamp".into(),
					name: "set".into(),
					args: vec![ArgumentEntry::new("now", "Compact<Moment>")],
				},
			);
		tables
	}

	fn transfer_args() -> Vec<u8> {
		[vec![0xff], vec![0x22; 32], Compact(1_000u128).encode()].concat()
	}

	fn signed_v1_body() -> Vec<u8> {
		[vec![0x81, 0xff], vec![0x11; 32], vec![0x33; 64], Compact(5u32).encode(), vec![0x00, 0x06, 0x00], transfer_args()]
			.concat()
	}

	fn length_prefixed(body: Vec<u8>) -> Vec<u8> {
		[Compact(body.len() as u32).encode(), body].concat()
	}

	#[test]
	fn should_decode_signed_v1_extrinsic() {
		let _ = pretty_env_logger::try_init();
		let data = length_prefixed(signed_v1_body());
		let xt = Decoder::default().decode_extrinsic(&data, &metadata()).unwrap();

		assert_eq!(xt.version_info(), "81");
		assert_eq!(xt.layout, ExtrinsicLayout::V1);
		assert!(xt.signed);
		assert_eq!(xt.extrinsic_length, Some(data.len() - 2));
		assert_eq!(xt.address, Some(AccountAddress::Id(H256::repeat_byte(0x11))));
		assert_eq!(xt.signature, Some(vec![0x33; 64]));
		assert_eq!(xt.nonce.as_ref().map(|n| &n.value), Some(&Value::UInt(5)));
		assert_eq!(xt.era.as_ref().and_then(|e| e.value), Some(Era::Immortal));
		assert!(xt.tip.is_none());
		assert_eq!(xt.extrinsic_hash, Some(Blake2Hasher.hash(&data)));
		assert_eq!(xt.call_module_function(), "transfer");
		assert_eq!(xt.call_module(), "balances");
		assert_eq!(xt.params()[0].value, Value::Bytes(vec![0x22; 32]));
		assert_eq!(xt.params()[1].value, Value::UInt(1_000));
		assert_eq!(xt.params()[1].raw, Compact(1_000u128).encode());
		assert_eq!(xt.raw, data);
	}

	#[test]
	fn should_hash_legacy_extrinsic_as_if_prefixed() {
		let _ = pretty_env_logger::try_init();
		let body = signed_v1_body();
		let xt = Decoder::default().decode_extrinsic(&body, &metadata()).unwrap();
		assert_eq!(xt.extrinsic_length, None);
		assert_eq!(xt.extrinsic_hash, Some(Blake2Hasher.hash(&length_prefixed(body))));
	}

	#[test]
	fn should_decode_signed_v2_extrinsic() {
		let _ = pretty_env_logger::try_init();
		let body = [
			vec![0x82, 0xfc, 0x07, 0x00],
			vec![0x44; 64],
			vec![0xa5, 0x02],
			Compact(9u64).encode(),
			Compact(50u128).encode(),
			vec![0x06, 0x00],
			transfer_args(),
		]
		.concat();
		let xt = Decoder::default().decode_extrinsic(&length_prefixed(body), &metadata()).unwrap();
		assert_eq!(xt.layout, ExtrinsicLayout::V2);
		assert_eq!(xt.address.as_ref().and_then(AccountAddress::account_idx), Some(7));
		assert_eq!(xt.era.as_ref().and_then(|e| e.value), Some(Era::Mortal(64, 42)));
		assert_eq!(xt.nonce.as_ref().map(|n| &n.value), Some(&Value::UInt(9)));
		assert_eq!(xt.tip.as_ref().map(|t| &t.value), Some(&Value::UInt(50)));
	}

	#[test]
	fn should_decode_unsigned_extrinsic() {
		let _ = pretty_env_logger::try_init();
		let body = [vec![0x03, 0x00, 0x00], Compact(1_600_000_000u64).encode()].concat();
		let xt = Decoder::default().decode_extrinsic(&length_prefixed(body), &metadata()).unwrap();
		assert!(!xt.signed);
		assert_eq!(xt.layout, ExtrinsicLayout::V3);
		assert!(xt.extrinsic_hash.is_none());
		assert!(xt.address.is_none());
		assert_eq!(xt.call.name, "set");
		assert_eq!(xt.params()[0].value.as_str(), Some("2020-09-13T12:26:40"));
	}

	#[test]
	fn should_read_u64_nonce_when_configured() {
		let _ = pretty_env_logger::try_init();
		let body = [vec![0x81, 0x01], vec![0x33; 64], 5u64.encode(), vec![0x00, 0x00, 0x00], Compact(1u64).encode()]
			.concat();
		let mut decoder = Decoder::default();
		decoder.legacy_u64_nonce = true;
		let xt = decoder.decode_extrinsic(&length_prefixed(body), &metadata()).unwrap();
		assert_eq!(xt.layout, ExtrinsicLayout::Legacy64Nonce);
		assert_eq!(xt.nonce.as_ref().map(|n| n.raw.clone()), Some(5u64.encode()));
	}

	#[test]
	fn should_reject_unknown_versions_and_calls() {
		let _ = pretty_env_logger::try_init();
		let decoder = Decoder::default();
		let err = decoder.decode_extrinsic(&length_prefixed(vec![0x09, 0x00, 0x00]), &metadata()).unwrap_err();
		assert!(matches!(err, Error::UnsupportedExtrinsicVersion(0x09)));
		let err = decoder.decode_extrinsic(&length_prefixed(vec![0x84, 0x00, 0x00]), &metadata()).unwrap_err();
		assert!(matches!(err, Error::UnsupportedExtrinsicVersion(0x84)));

		let err = decoder.decode_extrinsic(&length_prefixed(vec![0x01, 0x09, 0x09]), &metadata()).unwrap_err();
		assert!(matches!(err, Error::UnknownCall(index) if index == ModuleIndex::new(9, 9)));
	}

	#[test]
	fn should_serialize_extrinsic_fields() {
		let _ = pretty_env_logger::try_init();
		let data = length_prefixed(signed_v1_body());
		let xt = Decoder::default().decode_extrinsic(&data, &metadata()).unwrap();
		let json = serde_json::to_value(&xt).unwrap();
		assert_eq!(json["version_info"], "81");
		assert_eq!(json["account_length"], "ff");
		assert_eq!(json["account_id"], format!("0x{}", "11".repeat(32)));
		assert_eq!(json["account_idx"], serde_json::Value::Null);
		assert_eq!(json["call_code"], "0600");
		assert_eq!(json["call_module_function"], "transfer");
		assert_eq!(json["nonce"], 5);
		assert_eq!(json["era"], "0x00");
		assert!(json.get("tip").is_none());
		assert_eq!(json["params"][1]["name"], "value");
		assert_eq!(json["params"][1]["type"], "Compact<Balance>");
		assert_eq!(json["params"][1]["value"], 1000);
		assert_eq!(json["extrinsic_hash"], util::hex_string(Blake2Hasher.hash(&data).as_bytes()));
	}
}
