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

use crate::init;
use codec::{Compact, Encode};
use subdecode::{ByteCursor, Decoder, DecoderConfig, Definitions, EnumField, Error, TypeDefinition, TypeRegistry, Value};

fn decode_with(decoder: &Decoder, ty: &str, data: &[u8]) -> Result<Value, Error> {
	let mut cursor = ByteCursor::new(data);
	let decoded = decoder.decode_type(ty, &mut cursor, None)?;
	assert!(cursor.is_empty(), "`{}` left {} bytes", ty, cursor.remaining_length());
	Ok(decoded.value)
}

#[test]
fn should_decode_staking_ledger() {
	init();
	let data = ([0xaau8; 32], Compact(1_000u128), Compact(600u128), vec![(Compact(400u128), Compact(12u32))]).encode();
	let ledger = decode_with(&Decoder::default(), "StakingLedger<AccountId, BalanceOf<T>>", &data).unwrap();
	assert_eq!(ledger.field("stash"), Some(&Value::Bytes(vec![0xaa; 32])));
	assert_eq!(ledger.field("active"), Some(&Value::UInt(600)));
	let unlocking = ledger.field("unlocking").and_then(Value::as_sequence).unwrap();
	assert_eq!(unlocking[0].field("era"), Some(&Value::UInt(12)));
}

#[test]
fn should_decode_exposure_with_generic_fields() {
	let data = (Compact(30u128), Compact(10u128), vec![([1u8; 32], Compact(20u128))]).encode();
	let exposure = decode_with(&Decoder::default(), "Exposure", &data).unwrap();
	let others = exposure.field("others").and_then(Value::as_sequence).unwrap();
	assert_eq!(others[0].field("who"), Some(&Value::Bytes(vec![1; 32])));
	assert_eq!(others[0].field("value"), Some(&Value::UInt(20)));
}

#[test]
fn should_decode_forum_post() {
	init();
	let history = vec![((10u64, 1_600_000_000u64), b"first draft".to_vec())];
	let data = (7u64, 3u64, 1u32, b"hello".to_vec(), 0u8, history, (11u64, 1_600_000_006u64), [5u8; 32]).encode();
	let post = decode_with(&Decoder::default(), "Post", &data).unwrap();
	assert_eq!(post.field("thread_id"), Some(&Value::UInt(3)));
	assert_eq!(post.field("current_text"), Some(&Value::Bytes(b"hello".to_vec())));
	assert_eq!(post.field("moderation"), Some(&Value::Null));
	let history = post.field("text_change_history").and_then(Value::as_sequence).unwrap();
	assert_eq!(history[0].field("expired_at").and_then(|t| t.field("time")), Some(&Value::UInt(1_600_000_000)));
	assert_eq!(post.field("author_id"), Some(&Value::Bytes(vec![5; 32])));
}

#[test]
fn should_decode_liability_with_generic_order() {
	let data = (b"model".to_vec(), b"objective".to_vec(), 50u128, [1u8; 32], [2u8; 32], Some(b"done".to_vec())).encode();
	let liability = decode_with(&Decoder::default(), "Liability<Balance, AccountId>", &data).unwrap();
	let order = liability.field("order").unwrap();
	assert_eq!(order.field("cost"), Some(&Value::UInt(50)));
	assert_eq!(order.field("custodian"), Some(&Value::Bytes(vec![1; 32])));
	assert_eq!(liability.field("promisee"), Some(&Value::Bytes(vec![2; 32])));
	assert_eq!(liability.field("result"), Some(&Value::Bytes(b"done".to_vec())));
}

#[test]
fn should_register_custom_definitions() {
	let registry = TypeRegistry::builder()
		.definitions_from_json(
			r#"{
				"Ballot": { "type": "struct", "type_mapping": [["voter", "AccountId"], ["choice", "Choice"], ["weight", "Option<Compact<u64>>"]] },
				"Choice": { "type": "enum", "type_mapping": [["Aye", "Null"], ["Nay", "Null"], ["Custom", "Text"]] }
			}"#,
		)
		.unwrap()
		.build();
	let decoder = Decoder::new(registry);

	let data = [vec![3u8; 32], vec![0x02], b"maybe".to_vec().encode(), vec![0x01], Compact(9u64).encode()].concat();
	let ballot = decode_with(&decoder, "Ballot", &data).unwrap();
	assert_eq!(ballot.field("choice"), Some(&Value::Enum(EnumField::with_value(2, "Custom", Value::Text("maybe".into())))));
	assert_eq!(ballot.field("weight"), Some(&Value::UInt(9)));

	let json = serde_json::to_value(&ballot).unwrap();
	assert_eq!(json["choice"], serde_json::json!({ "Custom": "maybe" }));
}

#[test]
fn should_shadow_definitions_for_one_decode() {
	let decoder = Decoder::default();
	let overrides = Definitions::new().with("Balance", TypeDefinition::alias("u32")).unwrap();
	let mut cursor = ByteCursor::new(&[7, 0, 0, 0]);
	let narrow = decoder.decode_type_with("Balance", &mut cursor, None, &overrides).unwrap();
	assert_eq!(narrow.value, Value::UInt(7));
	assert!(cursor.is_empty());

	assert_eq!(decode_with(&decoder, "Balance", &7u128.encode()).unwrap(), Value::UInt(7));
}

#[test]
fn should_bound_nesting_depth() {
	let config = DecoderConfig::from_json(r#"{ "max_depth": 2 }"#).unwrap();
	let decoder = Decoder::from_config(&config);
	// an empty outer vector never reaches the inner types
	assert_eq!(decode_with(&decoder, "Vec<Vec<Vec<u8>>>", &[0x00]).unwrap(), Value::Sequence(vec![]));
	assert!(matches!(decode_with(&decoder, "Vec<Vec<Vec<u8>>>", &[0x04, 0x04, 0x00]), Err(Error::RecursionLimit(2))));
}

#[test]
fn should_report_unknown_and_malformed_types() {
	let decoder = Decoder::default();
	assert!(matches!(decode_with(&decoder, "NoSuchType", &[0]), Err(Error::UnknownType(name)) if name == "NoSuchType"));
	assert!(matches!(decode_with(&decoder, "Vec<(u8, u16>", &[0]), Err(Error::TypeParse { .. })));
	assert!(matches!(decode_with(&decoder, "u64", &[0; 7]), Err(Error::BufferUnderrun { wanted: 8, remaining: 7, .. })));
}
