use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use super::{TransferDetails, TxLookup};
use crate::error::{AppError, Result};

/// Unsigned transfer intent returned to the caller for signing.
/// Opaque to clients: bincode-serialized, base64-encoded. This service never
/// holds a key and never submits the signed result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsignedTransfer {
    pub source: String,
    pub destination: String,
    pub lamports: u64,
    pub recent_blockhash: String,
}

pub fn build_transfer_tx(
    source: &str,
    destination: &str,
    lamports: u64,
    recent_blockhash: &str,
) -> Result<String> {
    let tx = UnsignedTransfer {
        source: source.to_string(),
        destination: destination.to_string(),
        lamports,
        recent_blockhash: recent_blockhash.to_string(),
    };
    let bytes = bincode::serialize(&tx)?;
    Ok(BASE64.encode(bytes))
}

/// Thin Solana JSON-RPC client. One request per call, no retries —
/// a failure surfaces immediately as an error response.
#[derive(Clone)]
pub struct SolanaRpc {
    client: reqwest::Client,
    url: String,
}

impl SolanaRpc {
    pub fn new(url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
        }
    }

    async fn call(&self, method: &str, params: Value) -> Result<Value> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });
        let resp: Value = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await?
            .json()
            .await?;
        if let Some(err) = resp.get("error") {
            return Err(AppError::Rpc(format!("{method}: {err}")));
        }
        Ok(resp.get("result").cloned().unwrap_or(Value::Null))
    }

    /// Current finality checkpoint, used to anchor unsigned transfers.
    pub async fn latest_blockhash(&self) -> Result<String> {
        let result = self
            .call("getLatestBlockhash", json!([{ "commitment": "finalized" }]))
            .await?;
        result["value"]["blockhash"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| AppError::Rpc("getLatestBlockhash: missing blockhash".to_string()))
    }

    /// Fetch a finalized transaction by signature and locate its system
    /// transfer instruction, if any.
    pub async fn lookup_transfer(&self, signature: &str) -> Result<TxLookup> {
        let result = self
            .call(
                "getTransaction",
                json!([signature, {
                    "encoding": "jsonParsed",
                    "commitment": "finalized",
                    "maxSupportedTransactionVersion": 0,
                }]),
            )
            .await?;
        let lookup = parse_transfer_lookup(&result);
        debug!(signature, ?lookup, "transaction lookup");
        Ok(lookup)
    }
}

/// Walk a jsonParsed getTransaction result for the first system-program
/// transfer instruction.
fn parse_transfer_lookup(result: &Value) -> TxLookup {
    if result.is_null() {
        return TxLookup::NotFound;
    }
    let instructions = result["transaction"]["message"]["instructions"]
        .as_array()
        .cloned()
        .unwrap_or_default();
    for ix in &instructions {
        if ix["program"] != "system" || ix["parsed"]["type"] != "transfer" {
            continue;
        }
        let info = &ix["parsed"]["info"];
        if let (Some(source), Some(destination), Some(lamports)) = (
            info["source"].as_str(),
            info["destination"].as_str(),
            info["lamports"].as_u64(),
        ) {
            return TxLookup::Transfer(TransferDetails {
                source: source.to_string(),
                destination: destination.to_string(),
                lamports,
            });
        }
    }
    TxLookup::NoTransfer
}
