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

//! Named type definitions, loaded from JSON.
//!
//! A definition is one of
//! - an alias: `"Balance": "u128"`
//! - a struct: `{"type": "struct", "type_mapping": [["stash", "AccountId"], ["total", "Compact<Balance>"]]}`
//! - an enum of labels: `{"type": "enum", "value_list": ["Staked", "Stash", "Controller"]}`
//! - an enum with data: `{"type": "enum", "type_mapping": [["Ok", "Null"], ["Err", "DispatchError"]]}`

use crate::{regex, type_name::TypeExpression, Error};
use serde::{Deserialize, Serialize};
use std::collections::{hash_map, HashMap};

/// Definitions that ship with the crate.
pub const DEFAULT_DEFINITIONS: &str = include_str!("../definitions/default.json");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DefinitionRepr", into = "DefinitionRepr")]
pub enum TypeDefinition {
	Alias(String),
	Struct(Vec<(String, String)>),
	Enum(EnumDefinition),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnumDefinition {
	/// The selector picks a label; nothing follows it.
	ValueList(Vec<String>),
	/// The selector picks a `(variant, type)` pair and a value of that type follows.
	TypeMapping(Vec<(String, String)>),
}

impl EnumDefinition {
	pub fn len(&self) -> usize {
		match self {
			EnumDefinition::ValueList(v) => v.len(),
			EnumDefinition::TypeMapping(v) => v.len(),
		}
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

impl TypeDefinition {
	pub fn alias<S: Into<String>>(ty: S) -> Self {
		TypeDefinition::Alias(ty.into())
	}

	pub fn structure<N: Into<String>, T: Into<String>>(fields: impl IntoIterator<Item = (N, T)>) -> Self {
		TypeDefinition::Struct(fields.into_iter().map(|(n, t)| (n.into(), t.into())).collect())
	}

	pub fn value_list<S: Into<String>>(labels: impl IntoIterator<Item = S>) -> Self {
		TypeDefinition::Enum(EnumDefinition::ValueList(labels.into_iter().map(Into::into).collect()))
	}

	pub fn type_mapping<N: Into<String>, T: Into<String>>(variants: impl IntoIterator<Item = (N, T)>) -> Self {
		TypeDefinition::Enum(EnumDefinition::TypeMapping(
			variants.into_iter().map(|(n, t)| (n.into(), t.into())).collect(),
		))
	}

	// every type string this definition refers to
	fn referenced_types(&self) -> Vec<&str> {
		match self {
			TypeDefinition::Alias(ty) => vec![ty.as_str()],
			TypeDefinition::Struct(fields) | TypeDefinition::Enum(EnumDefinition::TypeMapping(fields)) => {
				fields.iter().map(|(_, ty)| ty.as_str()).collect()
			}
			TypeDefinition::Enum(EnumDefinition::ValueList(_)) => Vec::new(),
		}
	}
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum DefinitionRepr {
	Alias(String),
	Composite {
		#[serde(rename = "type")]
		kind: String,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		type_mapping: Option<Vec<(String, String)>>,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		value_list: Option<Vec<String>>,
	},
}

impl TryFrom<DefinitionRepr> for TypeDefinition {
	type Error = String;

	fn try_from(repr: DefinitionRepr) -> Result<Self, Self::Error> {
		match repr {
			DefinitionRepr::Alias(ty) => Ok(TypeDefinition::Alias(ty)),
			DefinitionRepr::Composite { kind, type_mapping, value_list } => match (kind.as_str(), type_mapping, value_list) {
				("struct", Some(fields), None) => Ok(TypeDefinition::Struct(fields)),
				("enum", Some(variants), None) => Ok(TypeDefinition::Enum(EnumDefinition::TypeMapping(variants))),
				("enum", None, Some(labels)) => Ok(TypeDefinition::Enum(EnumDefinition::ValueList(labels))),
				("struct", _, _) => Err("a struct needs a `type_mapping` and nothing else".into()),
				("enum", _, _) => Err("an enum needs exactly one of `value_list` or `type_mapping`".into()),
				(other, _, _) => Err(format!("unknown definition kind `{}`", other)),
			},
		}
	}
}

impl From<TypeDefinition> for DefinitionRepr {
	fn from(def: TypeDefinition) -> Self {
		match def {
			TypeDefinition::Alias(ty) => DefinitionRepr::Alias(ty),
			TypeDefinition::Struct(fields) => {
				DefinitionRepr::Composite { kind: "struct".into(), type_mapping: Some(fields), value_list: None }
			}
			TypeDefinition::Enum(EnumDefinition::TypeMapping(variants)) => {
				DefinitionRepr::Composite { kind: "enum".into(), type_mapping: Some(variants), value_list: None }
			}
			TypeDefinition::Enum(EnumDefinition::ValueList(labels)) => {
				DefinitionRepr::Composite { kind: "enum".into(), type_mapping: None, value_list: Some(labels) }
			}
		}
	}
}

/// A table of named definitions, keyed by the canonical form of the name.
///
/// Used both for the registry's global table and for the per-decode overrides that shadow it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Definitions {
	types: HashMap<String, TypeDefinition>,
}

impl Definitions {
	pub fn new() -> Self {
		Self::default()
	}

	/// The definitions bundled with this crate.
	pub fn bundled() -> Self {
		Definitions::from_json(DEFAULT_DEFINITIONS).expect("Included definitions should not panic")
	}

	/// Load a JSON object of `name -> definition`.
	pub fn from_json(json: &str) -> Result<Self, Error> {
		let raw: HashMap<String, TypeDefinition> = serde_json::from_str(json)?;
		let mut definitions = Self::new();
		for (name, def) in raw {
			definitions.insert(&name, def)?;
		}
		Ok(definitions)
	}

	/// Add or replace a definition. The name and every type it refers to have to parse.
	pub fn insert(&mut self, name: &str, def: TypeDefinition) -> Result<&mut Self, Error> {
		let key = canonical_name(name)?;
		for ty in def.referenced_types() {
			canonical_name(ty).map_err(|e| Error::InvalidDefinition(format!("`{}`: {}", key, e)))?;
		}
		self.types.insert(key, def);
		Ok(self)
	}

	/// Builder style [`Definitions::insert`].
	pub fn with(mut self, name: &str, def: TypeDefinition) -> Result<Self, Error> {
		self.insert(name, def)?;
		Ok(self)
	}

	/// Merge `other` into this table; `other` wins on conflicts.
	pub fn extend(&mut self, other: Definitions) {
		self.types.extend(other.types);
	}

	/// Look up a canonical name.
	pub fn get(&self, name: &str) -> Option<&TypeDefinition> {
		self.types.get(name)
	}

	pub fn contains(&self, name: &str) -> bool {
		self.types.contains_key(name)
	}

	pub fn len(&self) -> usize {
		self.types.len()
	}

	pub fn is_empty(&self) -> bool {
		self.types.is_empty()
	}

	pub fn iter(&self) -> hash_map::Iter<'_, String, TypeDefinition> {
		self.types.iter()
	}
}

impl<'de> Deserialize<'de> for Definitions {
	fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let raw = HashMap::<String, TypeDefinition>::deserialize(deserializer)?;
		let mut definitions = Definitions::new();
		for (name, def) in raw {
			definitions.insert(&name, def).map_err(serde::de::Error::custom)?;
		}
		Ok(definitions)
	}
}

/// Sanitize and parse a type name, returning its canonical spelling.
pub fn canonical_name(ty: &str) -> Result<String, Error> {
	let sanitized = regex::sanitize_ty(ty);
	TypeExpression::parse(&sanitized)
		.map(|expr| expr.to_string())
		.map_err(|source| Error::TypeParse { ty: ty.to_string(), source })
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn should_load_bundled_definitions() {
		let defs = Definitions::bundled();
		assert_eq!(defs.get("Balance"), Some(&TypeDefinition::alias("u128")));
		assert_eq!(defs.get("Keys"), Some(&TypeDefinition::alias("SessionKeysSubstrate")));
		assert_eq!(
			defs.get("RewardDestination"),
			Some(&TypeDefinition::value_list(["Staked", "Stash", "Controller"]))
		);
		assert!(matches!(defs.get("StakingLedger"), Some(TypeDefinition::Struct(fields)) if fields.len() == 4));
	}

	#[test]
	fn should_parse_all_shapes() {
		let json = r#"{
			"Amount": "Compact<T::Balance>",
			"Pair": { "type": "struct", "type_mapping": [["a", "u8"], ["b", "Option<u16>"]] },
			"Flag": { "type": "enum", "value_list": ["Off", "On"] },
			"Outcome": { "type": "enum", "type_mapping": [["Ok", "Null"], ["Err", "u8"]] }
		}"#;
		let defs = Definitions::from_json(json).unwrap();
		assert_eq!(defs.len(), 4);
		assert_eq!(defs.get("Amount"), Some(&TypeDefinition::alias("Compact<T::Balance>")));
		assert_eq!(defs.get("Pair"), Some(&TypeDefinition::structure([("a", "u8"), ("b", "Option<u16>")])));
		assert_eq!(defs.get("Flag"), Some(&TypeDefinition::value_list(["Off", "On"])));
		assert_eq!(defs.get("Outcome"), Some(&TypeDefinition::type_mapping([("Ok", "Null"), ("Err", "u8")])));
	}

	#[test]
	fn should_canonicalize_keys() {
		let defs = Definitions::new().with("Vec< T::Balance >", TypeDefinition::alias("u8")).unwrap();
		assert!(defs.contains("Vec<Balance>"));
	}

	#[test]
	fn should_reject_invalid_definitions() {
		let bad_kind = r#"{ "A": { "type": "union", "value_list": [] } }"#;
		assert!(matches!(Definitions::from_json(bad_kind), Err(Error::Json(_))));

		let both = r#"{ "A": { "type": "enum", "value_list": ["X"], "type_mapping": [["X", "u8"]] } }"#;
		assert!(matches!(Definitions::from_json(both), Err(Error::Json(_))));

		let bad_type = r#"{ "A": { "type": "struct", "type_mapping": [["x", "Vec<u8"]] } }"#;
		assert!(matches!(Definitions::from_json(bad_type), Err(Error::InvalidDefinition(_))));
	}

	#[test]
	fn should_round_trip_json_shape() {
		let def = TypeDefinition::value_list(["A", "B"]);
		assert_eq!(serde_json::to_string(&def).unwrap(), r#"{"type":"enum","value_list":["A","B"]}"#);
	}
}
