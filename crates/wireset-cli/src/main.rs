// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `wireset`: inspect wire-encoded sets.
//!
//! `encode` turns a JSON array into the hex payload of a set (duplicates
//! collapse); `decode` turns a hex payload back into a sorted JSON array.

mod config;

use std::hash::Hash;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use wireset::{
    decode_from_bytes, encode_to_vec, ProtocolConfig, ProtocolKind, SerializableSet, WireElement,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Encode and decode wire sets")]
struct Args {
    /// JSON config file (defaults to the platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Wire protocol: binary or compact (overrides the config file)
    #[arg(long, global = true)]
    protocol: Option<ProtocolKind>,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Encode a JSON array as a set payload, printed as hex
    Encode {
        /// Element type of the set
        #[arg(long, value_enum)]
        element: ElementKind,
        /// JSON array of elements, e.g. '[3, 1, 2]'
        json: String,
    },
    /// Decode a hex set payload, printed as a sorted JSON array
    Decode {
        /// Element type the payload must declare
        #[arg(long, value_enum)]
        element: ElementKind,
        /// Hex payload (whitespace ignored)
        hex: String,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ElementKind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    String,
}

fn encode_json<E>(kind: ProtocolKind, json: &str) -> Result<String>
where
    E: WireElement + Eq + Hash + DeserializeOwned,
{
    let set: SerializableSet<E> =
        serde_json::from_str(json).context("input must be a JSON array of the element type")?;
    let bytes = encode_to_vec(kind, &set).context("encode set")?;
    info!(%kind, elements = set.len(), bytes = bytes.len(), "encoded set");
    Ok(hex::encode(bytes))
}

fn decode_hex<E>(kind: ProtocolKind, limits: &ProtocolConfig, payload: &str) -> Result<String>
where
    E: WireElement + Eq + Hash + Ord + Serialize,
{
    let clean: String = payload.split_whitespace().collect();
    let bytes = hex::decode(clean).context("payload is not valid hex")?;
    let set: SerializableSet<E> =
        decode_from_bytes(kind, limits, &bytes).context("decode set payload")?;
    info!(%kind, elements = set.len(), "decoded set");
    let mut items: Vec<E> = set.into_iter().collect();
    items.sort();
    Ok(serde_json::to_string(&items)?)
}

fn run(args: Args) -> Result<String> {
    let cfg = config::load(args.config.as_deref()).context("load config")?;
    let kind = args.protocol.unwrap_or(cfg.protocol);
    debug!(%kind, limits = ?cfg.limits, "resolved config");

    match args.cmd {
        Command::Encode { element, json } => match element {
            ElementKind::Bool => encode_json::<bool>(kind, &json),
            ElementKind::I8 => encode_json::<i8>(kind, &json),
            ElementKind::I16 => encode_json::<i16>(kind, &json),
            ElementKind::I32 => encode_json::<i32>(kind, &json),
            ElementKind::I64 => encode_json::<i64>(kind, &json),
            ElementKind::String => encode_json::<String>(kind, &json),
        },
        Command::Decode { element, hex } => match element {
            ElementKind::Bool => decode_hex::<bool>(kind, &cfg.limits, &hex),
            ElementKind::I8 => decode_hex::<i8>(kind, &cfg.limits, &hex),
            ElementKind::I16 => decode_hex::<i16>(kind, &cfg.limits, &hex),
            ElementKind::I32 => decode_hex::<i32>(kind, &cfg.limits, &hex),
            ElementKind::I64 => decode_hex::<i64>(kind, &cfg.limits, &hex),
            ElementKind::String => decode_hex::<String>(kind, &cfg.limits, &hex),
        },
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let line = run(args)?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{line}")?;
    Ok(())
}
