pub mod evm;
pub mod solana;

use std::fmt;

/// A system-program transfer observed inside a finalized transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferDetails {
    pub source: String,
    pub destination: String,
    pub lamports: u64,
}

/// Outcome of looking a transaction up by signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxLookup {
    /// RPC returned null — signature unknown or not finalized.
    NotFound,
    /// Transaction exists but carries no system transfer instruction.
    NoTransfer,
    Transfer(TransferDetails),
}

/// Why a confirmation was rejected. Serialized as the `reason` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmFailure {
    TxNotFound,
    NoTransferInTx,
    Mismatch(TransferDetails),
}

impl ConfirmFailure {
    pub fn reason(&self) -> String {
        match self {
            ConfirmFailure::TxNotFound => "TX_NOT_FOUND".to_string(),
            ConfirmFailure::NoTransferInTx => "NO_TRANSFER_IN_TX".to_string(),
            ConfirmFailure::Mismatch(t) => format!(
                "MISMATCH source={} destination={} lamports={}",
                t.source, t.destination, t.lamports
            ),
        }
    }
}

impl fmt::Display for ConfirmFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reason())
    }
}

/// Exact-match verification: the observed transfer must move exactly
/// `expected_lamports` from `expected_source` to `expected_destination`.
/// No tolerance, no partial credit.
pub fn verify_transfer(
    lookup: &TxLookup,
    expected_source: &str,
    expected_destination: &str,
    expected_lamports: u64,
) -> Result<TransferDetails, ConfirmFailure> {
    match lookup {
        TxLookup::NotFound => Err(ConfirmFailure::TxNotFound),
        TxLookup::NoTransfer => Err(ConfirmFailure::NoTransferInTx),
        TxLookup::Transfer(t) => {
            if t.source == expected_source
                && t.destination == expected_destination
                && t.lamports == expected_lamports
            {
                Ok(t.clone())
            } else {
                Err(ConfirmFailure::Mismatch(t.clone()))
            }
        }
    }
}
