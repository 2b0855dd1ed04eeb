//! # Value Encoding
//!
//! Each stored file holds the complete encoding of one value. The encoding must be
//! deterministic for a given value and lossless: `decode(encode(v)) == v`.
//!
//! Two JSON flavours are provided. Both decode the same way, so a directory
//! written with one can be read back with the other.

use serde::de::DeserializeOwned;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Codec {
    /// Compact single-line JSON.
    #[default]
    Json,
    /// Indented JSON, easier to inspect by hand.
    PrettyJson,
}

impl Codec {
    pub fn from_pretty(pretty: bool) -> Self {
        if pretty {
            Codec::PrettyJson
        } else {
            Codec::Json
        }
    }

    pub fn encode<T: Serialize>(&self, value: &T) -> serde_json::Result<Vec<u8>> {
        match self {
            Codec::Json => serde_json::to_vec(value),
            Codec::PrettyJson => serde_json::to_vec_pretty(value),
        }
    }

    pub fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> serde_json::Result<T> {
        serde_json::from_slice(bytes)
    }
}
