use chrono::Utc;
use serde::{Deserialize, Serialize};
use shared::{Error, Result};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU32, Ordering};

/// Width of a product id: 12 bytes rendered as hex.
pub const PRODUCT_ID_LEN: usize = 24;

static COUNTER: AtomicU32 = AtomicU32::new(0);
static PROCESS_TAG: OnceLock<[u8; 5]> = OnceLock::new();

/// Fixed-width product identifier in the catalog store's object-id format.
/// Always 24 hex characters, stored lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProductId(String);

impl ProductId {
    /// Parse and validate an id.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.len() != PRODUCT_ID_LEN {
            return Err(Error::invalid_argument(format!(
                "product id must be {} characters, got {}",
                PRODUCT_ID_LEN,
                raw.len()
            )));
        }

        if !raw.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::invalid_argument(
                "product id must contain only hexadecimal characters",
            ));
        }

        Ok(Self(raw.to_ascii_lowercase()))
    }

    /// Generate a new id: 4-byte timestamp, 5-byte per-process random tag,
    /// 3-byte counter. Ids from one process sort in creation order.
    pub fn generate() -> Self {
        let seconds = timestamp_seconds(Utc::now().timestamp());
        let random = PROCESS_TAG.get_or_init(rand::random);
        let count = COUNTER.fetch_add(1, Ordering::Relaxed) & 0x00ff_ffff;

        let mut bytes = [0u8; 12];
        bytes[..4].copy_from_slice(&seconds.to_be_bytes());
        bytes[4..9].copy_from_slice(random);
        bytes[9..].copy_from_slice(&count.to_be_bytes()[1..]);

        Self(bytes.iter().map(|b| format!("{:02x}", b)).collect())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Clamp a Unix timestamp into the 4-byte id field instead of wrapping.
fn timestamp_seconds(unix_seconds: i64) -> u32 {
    u32::try_from(unix_seconds.max(0)).unwrap_or(u32::MAX)
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ProductId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ProductId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<ProductId> for String {
    fn from(id: ProductId) -> Self {
        id.0
    }
}
