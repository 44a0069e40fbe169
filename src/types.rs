use serde::{Deserialize, Serialize};
use std::fmt;

/// Which side of a market a bet backs. Exactly two values, stored as TEXT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BetSide {
    #[serde(rename = "YES")]
    Yes,
    #[serde(rename = "NO")]
    No,
}

impl BetSide {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "YES" => Some(BetSide::Yes),
            "NO" => Some(BetSide::No),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BetSide::Yes => "YES",
            BetSide::No => "NO",
        }
    }
}

impl fmt::Display for BetSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bet lifecycle status. Transitions are one-directional:
/// PENDING → CONFIRMED | FAILED; RECEIPT_ONLY is terminal on creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BetStatus {
    #[serde(rename = "PENDING")]
    Pending,
    #[serde(rename = "CONFIRMED")]
    Confirmed,
    #[serde(rename = "FAILED")]
    Failed,
    #[serde(rename = "RECEIPT_ONLY")]
    ReceiptOnly,
}

impl BetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BetStatus::Pending => "PENDING",
            BetStatus::Confirmed => "CONFIRMED",
            BetStatus::Failed => "FAILED",
            BetStatus::ReceiptOnly => "RECEIPT_ONLY",
        }
    }
}

impl fmt::Display for BetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Chain family a bet was recorded against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChainTag {
    #[serde(rename = "solana")]
    Solana,
    #[serde(rename = "evm")]
    Evm,
}

impl ChainTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChainTag::Solana => "solana",
            ChainTag::Evm => "evm",
        }
    }
}

impl fmt::Display for ChainTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
