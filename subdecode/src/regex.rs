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

//! Normalization of the type names found in runtime metadata, which are frequently written
//! against the runtime's generic parameters (`T::Balance`, `<T as Trait>::Call`).

use onig::{Captures, Regex};

/// `<T::Lookup as StaticLookup>::Source` -> `LookupSource`
fn associated_type() -> Regex {
	Regex::new(r"<\s*T::(\w+)\s+as\s+\w+\s*>::(\w+)").expect("Regex expression should be infallible; qed")
}

/// `<T as Trait>::`, `<T as Trait<I>>::`, `<T as frame_system::Config>::`
fn trait_qualifier() -> Regex {
	Regex::new(r"<\s*T\s+as\s+[\w:]+(?:<\s*\w+\s*>)?\s*>::").expect("Regex expression should be infallible; qed")
}

/// `T::Moment`
fn generic_prefix() -> Regex {
	Regex::new(r"\bT::").expect("Regex expression should be infallible; qed")
}

/// Strip trait and generic qualifiers from a type name anywhere they appear in it.
pub fn sanitize_ty(ty: &str) -> String {
	log::trace!("sanitizing ty {}", ty);
	let ty = associated_type().replace_all(ty.trim(), |caps: &Captures| {
		format!("{}{}", caps.at(1).unwrap_or_default(), caps.at(2).unwrap_or_default())
	});
	let ty = trait_qualifier().replace_all(&ty, "");
	let ty = generic_prefix().replace_all(&ty, "");
	log::trace!("sanitized type: {}", ty);
	ty
}
