use serde::Serialize;
use std::fmt;

pub const HRP_JUNO_UA: &str = "j";
pub const HRP_JUNO_UA_TEST: &str = "jtest";
pub const HRP_JUNO_UA_REGTEST: &str = "jregtest";

pub const HRP_JUNO_UFVK: &str = "jview";
pub const HRP_JUNO_UFVK_TEST: &str = "jviewtest";
pub const HRP_JUNO_UFVK_REGTEST: &str = "jviewregtest";

/// Juno Cash network a viewing key belongs to. Selects the human-readable
/// prefix of every address derived from that key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Main,
    Test,
    Regtest,
}

impl Network {
    pub const ALL: [Network; 3] = [Network::Main, Network::Test, Network::Regtest];

    pub fn ua_hrp(&self) -> &'static str {
        match self {
            Network::Main => HRP_JUNO_UA,
            Network::Test => HRP_JUNO_UA_TEST,
            Network::Regtest => HRP_JUNO_UA_REGTEST,
        }
    }

    pub fn ufvk_hrp(&self) -> &'static str {
        match self {
            Network::Main => HRP_JUNO_UFVK,
            Network::Test => HRP_JUNO_UFVK_TEST,
            Network::Regtest => HRP_JUNO_UFVK_REGTEST,
        }
    }

    pub fn from_ufvk_hrp(hrp: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|n| n.ufvk_hrp() == hrp)
    }

    pub fn from_ua_hrp(hrp: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|n| n.ua_hrp() == hrp)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Main => f.write_str("main"),
            Network::Test => f.write_str("test"),
            Network::Regtest => f.write_str("regtest"),
        }
    }
}
