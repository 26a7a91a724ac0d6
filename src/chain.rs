//! Supported chain identifiers

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One supported blockchain namespace.
///
/// The lowercase ticker doubles as the storage namespace segment and the
/// wire identifier, so the serde representation must stay stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    Btc,
    Doge,
    Eth,
    Trx,
    Sol,
    Ton,
    Xrp,
}

impl Chain {
    /// Ordered list of all supported chains
    pub const ALL: [Chain; 7] = [
        Chain::Btc,
        Chain::Doge,
        Chain::Eth,
        Chain::Trx,
        Chain::Sol,
        Chain::Ton,
        Chain::Xrp,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Chain::Btc => "btc",
            Chain::Doge => "doge",
            Chain::Eth => "eth",
            Chain::Trx => "trx",
            Chain::Sol => "sol",
            Chain::Ton => "ton",
            Chain::Xrp => "xrp",
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Chain {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "btc" => Ok(Chain::Btc),
            "doge" => Ok(Chain::Doge),
            "eth" => Ok(Chain::Eth),
            "trx" => Ok(Chain::Trx),
            "sol" => Ok(Chain::Sol),
            "ton" => Ok(Chain::Ton),
            "xrp" => Ok(Chain::Xrp),
            other => Err(Error::Validation(format!("unsupported chain: {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_str() {
        for chain in Chain::ALL {
            assert_eq!(chain.as_str().parse::<Chain>().unwrap(), chain);
        }
        assert!("near".parse::<Chain>().is_err());
    }

    #[test]
    fn serde_uses_lowercase_ticker() {
        assert_eq!(serde_json::to_string(&Chain::Doge).unwrap(), "\"doge\"");
        let chain: Chain = serde_json::from_str("\"xrp\"").unwrap();
        assert_eq!(chain, Chain::Xrp);
    }
}
