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

use sp_core::H256;

/// A 256-bit digest over an arbitrary byte sequence.
pub trait Hasher256: Send + Sync {
	fn hash(&self, data: &[u8]) -> H256;
}

/// Blake2b with a 32 byte digest, the hash substrate chains use for extrinsics.
#[derive(Debug, Default, Clone, Copy)]
pub struct Blake2Hasher;

impl Hasher256 for Blake2Hasher {
	fn hash(&self, data: &[u8]) -> H256 {
		H256::from(sp_core::blake2_256(data))
	}
}
