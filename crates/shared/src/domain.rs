use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

id_newtype!(Principal);
id_newtype!(RealmId);
id_newtype!(AccountId);

pub const E8S_PER_ICP: u64 = 100_000_000;

/// Fixed-point ICP amount. The wire format carries e8s as a decimal string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct E8s(pub u64);

impl E8s {
    /// Parses a decimal ICP amount ("0.0015", "2", "1.5") into e8s.
    /// Returns `None` for malformed input or more than 8 fractional digits.
    pub fn parse_icp(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }
        let (whole, frac) = match input.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (input, ""),
        };
        if whole.is_empty() && frac.is_empty() {
            return None;
        }
        if frac.len() > 8 {
            return None;
        }
        let whole = if whole.is_empty() {
            0
        } else {
            whole.parse::<u64>().ok()?
        };
        let frac = if frac.is_empty() {
            0
        } else {
            if !frac.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            format!("{frac:0<8}").parse::<u64>().ok()?
        };
        Some(Self(whole.checked_mul(E8S_PER_ICP)?.checked_add(frac)?))
    }
}

impl fmt::Display for E8s {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / E8S_PER_ICP;
        let frac = self.0 % E8S_PER_ICP;
        if frac == 0 {
            return write!(f, "{whole}");
        }
        let frac = format!("{frac:08}");
        write!(f, "{whole}.{}", frac.trim_end_matches('0'))
    }
}

impl Serialize for E8s {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for E8s {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Number(u64),
            Text(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Number(value) => Ok(Self(value)),
            Repr::Text(text) => text
                .parse::<u64>()
                .map(Self)
                .map_err(|_| serde::de::Error::custom(format!("invalid e8s amount: {text}"))),
        }
    }
}
