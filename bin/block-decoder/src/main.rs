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

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use subdecode::{ByteCursor, Decoder, DecoderConfig};
use subdecode_common::{MetadataTables, RuntimeMetadata};

/// Decode SCALE encoded extrinsics, events, digests and single values and print them as JSON.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Opts {
	/// Runtime metadata call and event tables, as JSON
	#[arg(long, global = true)]
	metadata: Option<PathBuf>,
	/// Decoder configuration, as JSON
	#[arg(long, global = true)]
	config: Option<PathBuf>,
	#[command(subcommand)]
	command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
	/// A single extrinsic
	Extrinsic { payload: String },
	/// A block body: a compact count of length prefixed extrinsics
	Extrinsics { payload: String },
	/// A `Vec<EventRecord>`
	Events { payload: String },
	/// A header digest
	Digest { payload: String },
	/// A single value of the named type
	Type { name: String, payload: String },
}

fn main() -> Result<(), anyhow::Error> {
	let opts = Opts::parse();
	pretty_env_logger::init();

	let decoder = match &opts.config {
		Some(path) => Decoder::from_config(&DecoderConfig::from_json(&read(path)?)?),
		None => Decoder::default(),
	};
	let metadata = opts.metadata.as_deref().map(load_metadata).transpose()?;

	match opts.command {
		Command::Extrinsic { payload } => {
			let bytes = payload_bytes(&payload)?;
			let metadata = require(&metadata)?;
			print(&decoder.decode_extrinsic(&bytes, metadata)?)
		}
		Command::Extrinsics { payload } => {
			let bytes = payload_bytes(&payload)?;
			let metadata = require(&metadata)?;
			print_partial(decoder.decode_extrinsics(&bytes, metadata))
		}
		Command::Events { payload } => {
			let bytes = payload_bytes(&payload)?;
			let metadata = require(&metadata)?;
			print_partial(decoder.decode_events(&bytes, metadata))
		}
		Command::Digest { payload } => print_partial(decoder.decode_digest(&payload_bytes(&payload)?)),
		Command::Type { name, payload } => {
			let bytes = payload_bytes(&payload)?;
			let mut cursor = ByteCursor::new(&bytes);
			let decoded = decoder.decode_type(&name, &mut cursor, metadata.as_ref().map(|m| m as &dyn RuntimeMetadata))?;
			if !cursor.is_empty() {
				log::warn!("{} trailing bytes were not decoded", cursor.remaining_length());
			}
			print(&decoded)
		}
	}
}

fn read(path: &Path) -> Result<String, anyhow::Error> {
	std::fs::read_to_string(path).with_context(|| format!("Cannot read {}", path.display()))
}

fn load_metadata(path: &Path) -> Result<MetadataTables, anyhow::Error> {
	MetadataTables::from_json(&read(path)?).with_context(|| format!("Invalid metadata tables in {}", path.display()))
}

fn require(metadata: &Option<MetadataTables>) -> Result<&MetadataTables, anyhow::Error> {
	metadata.as_ref().context("This command needs runtime metadata; pass it with --metadata")
}

fn payload_bytes(payload: &str) -> Result<Vec<u8>, anyhow::Error> {
	let hex = match payload.strip_prefix("0x") {
		Some(hex) => hex,
		None => anyhow::bail!("Payload should start with 0x"),
	};
	match subdecode::decode_hex(hex) {
		Ok(bytes) => Ok(bytes),
		Err(e) => anyhow::bail!("Cannot decode hex string into bytes: {}", e),
	}
}

fn print<T: Serialize>(value: &T) -> Result<(), anyhow::Error> {
	println!("{}", serde_json::to_string_pretty(value)?);
	Ok(())
}

// Prints whatever decoded before a failure, then reports the failure.
fn print_partial<T: Serialize>(result: Result<Vec<T>, (Vec<T>, subdecode::Error)>) -> Result<(), anyhow::Error> {
	match result {
		Ok(items) => print(&items),
		Err((items, e)) => {
			print(&items)?;
			Err(anyhow::Error::new(e).context(format!("Decoding stopped after {} items", items.len())))
		}
	}
}
