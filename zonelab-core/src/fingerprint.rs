//! Run fingerprinting — deterministic identities for configs, datasets and outputs.
//!
//! All hashes are BLAKE3 over canonical JSON, rendered as lowercase hex.
//! Two runs over the same bars with the same config produce the same digest.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::Bar;

macro_rules! hex_hash {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl $name {
            pub fn from_bytes(bytes: &[u8]) -> Self {
                Self(blake3::hash(bytes).to_hex().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// First `n` hex characters, for display.
            pub fn short(&self, n: usize) -> &str {
                &self.0[..n.min(self.0.len())]
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

hex_hash!(
    /// Exact identity of a resolved engine configuration.
    ConfigHash
);

hex_hash!(
    /// Content hash of an input bar series.
    DatasetHash
);

hex_hash!(
    /// Content hash of a complete run output (ledger, history, events, config).
    RunDigest
);

/// Hash of the bar series as serialized JSON.
pub fn dataset_hash(bars: &[Bar]) -> DatasetHash {
    let json = serde_json::to_vec(bars).unwrap_or_default();
    DatasetHash::from_bytes(&json)
}
