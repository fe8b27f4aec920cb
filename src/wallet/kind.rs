//! The closed set of wallet backends.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Wallet connection mechanism chosen at login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WalletKind {
    /// Key held by the application (social-login style embedded wallet).
    Embedded,
    /// Node or extension managing the accounts; approvals happen outside this process.
    Injected,
    /// Smart-account wallet operated by a custodian service.
    Custodial,
}

impl WalletKind {
    pub const ALL: [WalletKind; 3] = [WalletKind::Embedded, WalletKind::Injected, WalletKind::Custodial];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Embedded => "embedded",
            Self::Injected => "injected",
            Self::Custodial => "custodial",
        }
    }
}

impl fmt::Display for WalletKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WalletKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "embedded" | "web3auth" => Ok(Self::Embedded),
            "injected" | "rainbowkit" | "extension" => Ok(Self::Injected),
            "custodial" | "kinto" => Ok(Self::Custodial),
            other => Err(format!("unknown wallet kind '{}'", other)),
        }
    }
}
