use crate::config::LAMPORTS_PER_SOL;

/// Base58 alphabet used by Solana addresses (Bitcoin alphabet — no 0, O, I, l).
const BASE58_ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Parse a wager amount: must be finite and strictly positive.
/// Clamped to 9 fractional digits (lamport precision). None otherwise.
pub fn parse_amount_sol(raw: f64) -> Option<f64> {
    if !raw.is_finite() || raw <= 0.0 {
        return None;
    }
    Some((raw * 1e9).round() / 1e9)
}

/// Exact lamport value for a SOL amount.
pub fn sol_to_lamports(amount_sol: f64) -> u64 {
    (amount_sol * LAMPORTS_PER_SOL as f64).round() as u64
}

/// Solana address shape check: 32–44 chars from the base58 alphabet.
/// String-level only; no curve-point validation.
pub fn is_base58_address(s: &str) -> bool {
    (32..=44).contains(&s.len()) && s.chars().all(|c| BASE58_ALPHABET.contains(c))
}
