use secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
use secp256k1::{Message, PublicKey, Secp256k1};
use sha3::{Digest, Keccak256};

use crate::error::{AppError, Result};

/// EIP-191 personal-message digest:
/// keccak256("\x19Ethereum Signed Message:\n" + len(message) + message)
fn personal_message_digest(message: &str) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(format!("\x19Ethereum Signed Message:\n{}", message.len()));
    hasher.update(message.as_bytes());
    hasher.finalize().into()
}

/// Ethereum address: last 20 bytes of keccak256 over the uncompressed
/// public key without its 0x04 tag byte.
fn address_from_pubkey(pubkey: &PublicKey) -> String {
    let uncompressed = pubkey.serialize_uncompressed();
    let mut hasher = Keccak256::new();
    hasher.update(&uncompressed[1..]);
    let hash = hasher.finalize();
    format!("0x{}", hex::encode(&hash[12..]))
}

/// Recover the signer address of an EIP-191 personal-message signature.
/// Accepts the usual 65-byte hex signature with v in {0,1,27,28}.
pub fn recover_signer(message: &str, signature: &str) -> Result<String> {
    let sig_hex = signature.strip_prefix("0x").unwrap_or(signature);
    let bytes = hex::decode(sig_hex)
        .map_err(|_| AppError::Validation("Invalid signature".to_string()))?;
    if bytes.len() != 65 {
        return Err(AppError::Validation("Invalid signature".to_string()));
    }
    let v = bytes[64];
    let rec_id = RecoveryId::from_i32(i32::from(if v >= 27 { v - 27 } else { v }))
        .map_err(|_| AppError::Validation("Invalid signature".to_string()))?;
    let sig = RecoverableSignature::from_compact(&bytes[..64], rec_id)
        .map_err(|_| AppError::Validation("Invalid signature".to_string()))?;
    let msg = Message::from_digest(personal_message_digest(message));
    let secp = Secp256k1::new();
    let pubkey = secp
        .recover_ecdsa(&msg, &sig)
        .map_err(|_| AppError::Validation("Invalid signature".to_string()))?;
    Ok(address_from_pubkey(&pubkey))
}
