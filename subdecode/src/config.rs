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

use crate::{definitions::Definitions, registry::RegistryBuilder, Error, TypeRegistry};
use serde::Deserialize;

/// Decoder settings, usually read from a JSON file.
///
/// ```json
/// {
///     "max_depth": 32,
///     "legacy_u64_nonce": false,
///     "types": { "BlockNumber": "u32" },
///     "overrides": { "Keys": "SessionKeysPolkadot" }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DecoderConfig {
	/// How deeply type resolution may nest before giving up.
	pub max_depth: usize,
	/// Read version 1 extrinsics with a fixed width `u64` nonce instead of a compact one.
	pub legacy_u64_nonce: bool,
	/// Definitions merged into the registry on top of the bundled ones.
	pub types: Definitions,
	/// Definitions that shadow the registry for every decode, without changing it.
	pub overrides: Definitions,
}

impl Default for DecoderConfig {
	fn default() -> Self {
		Self {
			max_depth: crate::registry::DEFAULT_MAX_DEPTH,
			legacy_u64_nonce: false,
			types: Definitions::default(),
			overrides: Definitions::default(),
		}
	}
}

impl DecoderConfig {
	pub fn from_json(json: &str) -> Result<Self, Error> {
		Ok(serde_json::from_str(json)?)
	}

	/// A registry with the bundled definitions, this config's `types` and depth limit.
	pub fn registry(&self) -> TypeRegistry {
		RegistryBuilder::default().definitions(self.types.clone()).max_depth(self.max_depth).build()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::definitions::TypeDefinition;

	#[test]
	fn should_default_missing_fields() {
		let config = DecoderConfig::from_json("{}").unwrap();
		assert_eq!(config, DecoderConfig::default());
		assert_eq!(config.max_depth, 64);
		assert!(!config.legacy_u64_nonce);
	}

	#[test]
	fn should_load_config() {
		let config = DecoderConfig::from_json(
			r#"{
				"max_depth": 16,
				"legacy_u64_nonce": true,
				"types": { "BlockNumber": "u32" },
				"overrides": { "Keys": "SessionKeysPolkadot" }
			}"#,
		)
		.unwrap();
		assert_eq!(config.max_depth, 16);
		assert!(config.legacy_u64_nonce);
		assert_eq!(config.overrides.get("Keys"), Some(&TypeDefinition::alias("SessionKeysPolkadot")));

		let registry = config.registry();
		assert_eq!(registry.max_depth(), 16);
		assert_eq!(registry.definitions().get("BlockNumber"), Some(&TypeDefinition::alias("u32")));
	}

	#[test]
	fn should_reject_unknown_fields() {
		assert!(matches!(DecoderConfig::from_json(r#"{ "max_dpeth": 3 }"#), Err(Error::Json(_))));
	}
}
