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

use super::{DecodeState, Param};
use crate::{ByteCursor, Error, Value};
use serde::Serialize;
use subdecode_common::{ModuleIndex, TOPICS_SINCE_VERSION};

/// Phase byte of an event emitted while applying an extrinsic.
const APPLY_EXTRINSIC: u8 = 0;

/// A decoded event record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventRecord {
	pub phase: u8,
	/// Index of the extrinsic that emitted the event, for the `ApplyExtrinsic` phase.
	pub extrinsic_idx: Option<u32>,
	#[serde(rename = "type")]
	pub event_index: ModuleIndex,
	#[serde(rename = "module_id")]
	pub module: String,
	#[serde(rename = "event_id")]
	pub name: String,
	pub params: Vec<Param>,
	/// Always empty for metadata older than version 5.
	pub topics: Vec<Value>,
	/// Position within the block's event list.
	pub event_idx: usize,
}

impl<'a> DecodeState<'a> {
	pub(super) fn decode_event(&mut self, cursor: &mut ByteCursor, event_idx: usize) -> Result<EventRecord, Error> {
		let metadata = self.metadata("EventRecord")?;

		let phase = cursor.read_u8()?;
		let extrinsic_idx = if phase == APPLY_EXTRINSIC { Some(cursor.decode_fixed::<u32>()?) } else { None };

		let event_index = ModuleIndex::from(cursor.read_array::<2>()?);
		let entry = metadata.event(event_index).ok_or(Error::UnknownEvent(event_index))?;
		log::debug!("Event {} resolved to {}.{}", event_index, entry.module, entry.name);

		let mut params = Vec::with_capacity(entry.args.len());
		for arg in &entry.args {
			let decoded = self.decode(cursor, &arg.ty)?;
			params.push(Param::new(arg.name.clone(), arg.ty.clone(), decoded));
		}

		let topics = match metadata.version() {
			Some(version) if version >= TOPICS_SINCE_VERSION => match self.decode_value(cursor, "Vec<Hash>")? {
				Value::Sequence(topics) => topics,
				other => vec![other],
			},
			_ => Vec::new(),
		};

		Ok(EventRecord {
			phase,
			extrinsic_idx,
			event_index,
			module: entry.module.clone(),
			name: entry.name.clone(),
			params,
			topics,
			event_idx,
		})
	}
}
