use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{info, warn};

use crate::chain::solana::{build_transfer_tx, SolanaRpc};
use crate::chain::{evm, verify_transfer};
use crate::config::{Config, MIN_BET_SOL};
use crate::db::models::{BetRow, MarketRow};
use crate::db::store::NewBet;
use crate::db::Store;
use crate::error::AppError;
use crate::types::{BetSide, BetStatus, ChainTag};
use crate::validate::{is_base58_address, parse_amount_sol, sol_to_lamports};

/// Everything a handler needs, passed explicitly. No globals.
#[derive(Clone)]
pub struct ApiState {
    pub store: Store,
    pub chain: SolanaRpc,
    pub cfg: Arc<Config>,
}

pub fn router(state: ApiState) -> Router {
    let cors = cors_layer(&state.cfg.cors_allowlist);
    Router::new()
        .route("/health", get(health))
        .route("/admin/seed", post(admin_seed))
        .route("/api/markets", get(get_markets))
        .route("/api/bets/initiate", post(initiate_bet))
        .route("/api/bets/confirm", post(confirm_bet))
        .route("/api/bets/evm-receipt", post(evm_receipt))
        .route("/api/bets/by/:wallet", get(bets_by_wallet))
        .layer(cors)
        .with_state(state)
}

fn cors_layer(allowlist: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if allowlist.is_empty() {
        layer.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = allowlist
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        layer.allow_origin(AllowOrigin::list(origins))
    }
}

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitiateBetRequest {
    #[serde(default)]
    pub market_id: Option<String>,
    #[serde(default)]
    pub side: Option<String>,
    #[serde(default)]
    pub amount_sol: Option<f64>,
    #[serde(default)]
    pub wallet: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmBetRequest {
    #[serde(default)]
    pub bet_id: Option<String>,
    #[serde(default)]
    pub tx_signature: Option<String>,
    #[serde(default)]
    pub wallet: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvmReceiptRequest {
    #[serde(default)]
    pub market_id: Option<String>,
    #[serde(default)]
    pub side: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub signature: Option<String>,
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketView {
    pub id: String,
    pub name: String,
    pub category: String,
    pub yes: i64,
    pub no: i64,
    pub status: String,
    pub created_at: i64,
}

impl From<MarketRow> for MarketView {
    fn from(m: MarketRow) -> Self {
        Self {
            id: m.id,
            name: m.name,
            category: m.category,
            yes: m.yes_pct,
            no: m.no_pct,
            status: m.status,
            created_at: m.created_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BetView {
    pub id: String,
    pub market_id: String,
    pub side: String,
    pub amount: f64,
    pub wallet: String,
    pub chain: String,
    pub status: String,
    pub tx_signature: Option<String>,
    pub proof: Option<String>,
    pub created_at: i64,
}

impl From<BetRow> for BetView {
    fn from(b: BetRow) -> Self {
        Self {
            id: b.id,
            market_id: b.market_id,
            side: b.side,
            amount: b.amount_sol,
            wallet: b.wallet,
            chain: b.chain,
            status: b.status,
            tx_signature: b.tx_signature,
            proof: b.proof,
            created_at: b.created_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitiateResponse {
    pub ok: bool,
    pub bet_id: String,
    pub tx_base64: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmResponse {
    pub ok: bool,
    pub bet_id: String,
    pub tx_signature: String,
    pub proof: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvmReceiptResponse {
    pub ok: bool,
    pub bet_id: String,
    pub recovered: String,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn require<'a>(field: &'a Option<String>, name: &str) -> Result<&'a str, AppError> {
    match field.as_deref() {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AppError::Validation(format!("Missing {name}"))),
    }
}

fn parse_side(field: &Option<String>) -> Result<BetSide, AppError> {
    field
        .as_deref()
        .and_then(BetSide::parse)
        .ok_or_else(|| AppError::Validation("Side must be YES or NO".to_string()))
}

/// Placeholder for a future verifiable-credential scheme. Opaque to clients;
/// nothing may depend on its shape.
fn bet_proof(bet_id: &str, tx_signature: &str) -> String {
    format!("proof:{bet_id}:{tx_signature}")
}

fn rejected(reason: String) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "ok": false, "reason": reason })),
    )
        .into_response()
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "ok": true, "status": "healthy" }))
}

async fn admin_seed(
    State(state): State<ApiState>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    let expected = format!("Bearer {}", state.cfg.admin_token);
    let supplied = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if supplied != expected {
        return Err(AppError::Unauthorized("Unauthorized".to_string()));
    }
    let inserted = state.store.seed_if_empty().await?;
    Ok(Json(json!({ "ok": true, "inserted": inserted })))
}

async fn get_markets(
    State(state): State<ApiState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let markets: Vec<MarketView> = state
        .store
        .list_markets()
        .await?
        .into_iter()
        .map(MarketView::from)
        .collect();
    Ok(Json(json!({ "ok": true, "markets": markets })))
}

/// Validate the wager, insert a PENDING bet, and hand back an unsigned
/// transfer for the caller's wallet to sign and submit externally.
async fn initiate_bet(
    State(state): State<ApiState>,
    Json(req): Json<InitiateBetRequest>,
) -> Result<Json<InitiateResponse>, AppError> {
    let market_id = require(&req.market_id, "marketId")?;
    let side = parse_side(&req.side)?;
    let amount = req
        .amount_sol
        .and_then(parse_amount_sol)
        .ok_or_else(|| AppError::Validation("Invalid amount".to_string()))?;
    if amount < MIN_BET_SOL {
        return Err(AppError::Validation("Minimum amount is 0.01 SOL".to_string()));
    }
    let wallet = require(&req.wallet, "wallet")?;
    if !is_base58_address(wallet) {
        return Err(AppError::Validation("Invalid wallet address".to_string()));
    }
    let market = state
        .store
        .get_market(market_id)
        .await?
        .ok_or_else(|| AppError::Validation("Market not found".to_string()))?;

    let bet_id = state
        .store
        .create_bet(NewBet {
            market_id: &market.id,
            side,
            amount_sol: amount,
            wallet,
            chain: ChainTag::Solana,
            status: BetStatus::Pending,
            proof: None,
        })
        .await?;

    let blockhash = state.chain.latest_blockhash().await?;
    let tx_base64 = build_transfer_tx(
        wallet,
        &state.cfg.treasury_address,
        sol_to_lamports(amount),
        &blockhash,
    )?;

    info!(bet_id, market_id = %market.id, side = %side, amount, "bet initiated");
    Ok(Json(InitiateResponse {
        ok: true,
        bet_id,
        tx_base64,
    }))
}

/// Chain-verified confirmation: PENDING → CONFIRMED on an exact transfer
/// match, PENDING → FAILED otherwise. Re-confirming a CONFIRMED bet returns
/// the stored proof.
async fn confirm_bet(
    State(state): State<ApiState>,
    Json(req): Json<ConfirmBetRequest>,
) -> Result<Response, AppError> {
    let bet_id = require(&req.bet_id, "betId")?;
    let tx_signature = require(&req.tx_signature, "txSignature")?;
    let wallet = require(&req.wallet, "wallet")?;

    let bet = state
        .store
        .get_bet(bet_id)
        .await?
        .ok_or_else(|| AppError::Validation("Bet not found".to_string()))?;
    if bet.wallet != wallet {
        return Err(AppError::Validation("Wallet mismatch".to_string()));
    }
    match bet.status.as_str() {
        "PENDING" => {}
        "CONFIRMED" => return Ok(confirmed_response(&bet)),
        _ => return Ok(rejected("Bet already finalized".to_string())),
    }

    let expected_lamports = sol_to_lamports(bet.amount_sol);
    let lookup = state.chain.lookup_transfer(tx_signature).await?;
    match verify_transfer(&lookup, wallet, &state.cfg.treasury_address, expected_lamports) {
        Ok(_) => {
            let proof = bet_proof(bet_id, tx_signature);
            let updated = state
                .store
                .mark_bet_confirmed(bet_id, tx_signature, &proof)
                .await?;
            if !updated {
                // lost a race to another confirmation; report whatever won
                return report_finalized(&state.store, bet_id).await;
            }
            info!(bet_id, tx_signature, "bet confirmed");
            Ok(Json(ConfirmResponse {
                ok: true,
                bet_id: bet_id.to_string(),
                tx_signature: tx_signature.to_string(),
                proof,
            })
            .into_response())
        }
        Err(failure) => {
            let reason = failure.reason();
            let updated = state
                .store
                .mark_bet_failed(bet_id, tx_signature, &reason)
                .await?;
            if !updated {
                return report_finalized(&state.store, bet_id).await;
            }
            warn!(bet_id, tx_signature, reason, "bet confirmation failed");
            Ok(rejected(reason))
        }
    }
}

/// A conditional update touched zero rows: some other confirmation finalized
/// the bet first. Re-read and report the winner's state.
async fn report_finalized(store: &Store, bet_id: &str) -> Result<Response, AppError> {
    match store.get_bet(bet_id).await? {
        Some(b) if b.status == "CONFIRMED" => Ok(confirmed_response(&b)),
        _ => Ok(rejected("Bet already finalized".to_string())),
    }
}

fn confirmed_response(bet: &BetRow) -> Response {
    Json(ConfirmResponse {
        ok: true,
        bet_id: bet.id.clone(),
        tx_signature: bet.tx_signature.clone().unwrap_or_default(),
        proof: bet.proof.clone().unwrap_or_default(),
    })
    .into_response()
}

/// Signature-receipt path: an EIP-191 attestation records a RECEIPT_ONLY bet.
/// Weaker than CONFIRMED by design — no transfer is verified.
async fn evm_receipt(
    State(state): State<ApiState>,
    Json(req): Json<EvmReceiptRequest>,
) -> Result<Json<EvmReceiptResponse>, AppError> {
    let market_id = require(&req.market_id, "marketId")?;
    let side = parse_side(&req.side)?;
    let amount = req
        .amount
        .and_then(parse_amount_sol)
        .ok_or_else(|| AppError::Validation("Invalid amount".to_string()))?;
    let address = require(&req.address, "address")?;
    let message = require(&req.message, "message")?;
    let signature = require(&req.signature, "signature")?;

    let recovered = evm::recover_signer(message, signature)?;
    if !recovered.eq_ignore_ascii_case(address) {
        return Err(AppError::Validation("Invalid signature".to_string()));
    }
    let market = state
        .store
        .get_market(market_id)
        .await?
        .ok_or_else(|| AppError::Validation("Market not found".to_string()))?;

    let bet_id = state
        .store
        .create_bet(NewBet {
            market_id: &market.id,
            side,
            amount_sol: amount,
            wallet: address,
            chain: ChainTag::Evm,
            status: BetStatus::ReceiptOnly,
            proof: Some(signature),
        })
        .await?;

    info!(bet_id, market_id = %market.id, side = %side, amount, recovered, "receipt bet recorded");
    Ok(Json(EvmReceiptResponse {
        ok: true,
        bet_id,
        recovered,
    }))
}

async fn bets_by_wallet(
    State(state): State<ApiState>,
    Path(wallet): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let bets: Vec<BetView> = state
        .store
        .list_bets_for_wallet(&wallet)
        .await?
        .into_iter()
        .map(BetView::from)
        .collect();
    Ok(Json(json!({ "ok": true, "bets": bets })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use secp256k1::{Message, Secp256k1, SecretKey};
    use serde_json::Value;
    use sha3::{Digest, Keccak256};
    use sqlx::sqlite::SqlitePoolOptions;
    use tower::ServiceExt;

    const TREASURY: &str = "7reAsury11111111111111111111111111111111111";
    const WALLET: &str = "4Nd1mYvH6K9pCtPZrUk1JzqzUduKPvuyXyAkp7tGZvBq";

    async fn test_state() -> ApiState {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();
        let store = Store::new(pool);
        store.seed_if_empty().await.unwrap();
        let cfg = Config {
            port: 0,
            db_path: String::new(),
            log_level: "info".to_string(),
            // never dialed in these tests
            rpc_url: "http://127.0.0.1:1".to_string(),
            treasury_address: TREASURY.to_string(),
            admin_token: "seed-secret".to_string(),
            cors_allowlist: Vec::new(),
        };
        ApiState {
            store,
            chain: SolanaRpc::new(cfg.rpc_url.clone()),
            cfg: Arc::new(cfg),
        }
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap()
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_json(resp: Response) -> Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    /// EIP-191 signature over `message` with a fixed key; returns
    /// (hex signature, signer address).
    fn sign_receipt(message: &str) -> (String, String) {
        let secp = Secp256k1::new();
        let sk = SecretKey::from_slice(&[0x42; 32]).unwrap();
        let mut hasher = Keccak256::new();
        hasher.update(format!("\x19Ethereum Signed Message:\n{}", message.len()));
        hasher.update(message.as_bytes());
        let digest: [u8; 32] = hasher.finalize().into();
        let sig = secp.sign_ecdsa_recoverable(&Message::from_digest(digest), &sk);
        let (rec_id, compact) = sig.serialize_compact();
        let mut bytes = compact.to_vec();
        bytes.push(rec_id.to_i32() as u8 + 27);

        let pubkey = sk.public_key(&secp).serialize_uncompressed();
        let mut hasher = Keccak256::new();
        hasher.update(&pubkey[1..]);
        let hash = hasher.finalize();
        let address = format!("0x{}", hex::encode(&hash[12..]));
        (format!("0x{}", hex::encode(bytes)), address)
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let app = router(test_state().await);
        let resp = app.oneshot(get_req("/health")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["ok"], true);
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn seed_requires_exact_bearer_token() {
        let state = test_state().await;
        let app = router(state);

        let req = Request::builder()
            .method("POST")
            .uri("/admin/seed")
            .header("authorization", "Bearer wrong")
            .body(Body::empty())
            .unwrap();
        let resp = app.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(resp).await["ok"], false);

        let req = Request::builder()
            .method("POST")
            .uri("/admin/seed")
            .header("authorization", "Bearer seed-secret")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["ok"], true);
        // already seeded by test_state, so zero inserts
        assert_eq!(body["inserted"], 0);
    }

    #[tokio::test]
    async fn markets_listing_returns_catalogue() {
        let app = router(test_state().await);
        let resp = app.oneshot(get_req("/api/markets")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["ok"], true);
        let markets = body["markets"].as_array().unwrap();
        assert_eq!(markets.len(), 5);
        assert!(markets.iter().all(|m| m["status"] == "LIVE"));
    }

    #[tokio::test]
    async fn initiate_rejects_below_minimum_amount() {
        let app = router(test_state().await);
        let resp = app
            .oneshot(post_json(
                "/api/bets/initiate",
                json!({ "marketId": "sol-300-q4", "side": "YES", "amountSol": 0.005, "wallet": WALLET }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = body_json(resp).await;
        assert_eq!(body["ok"], false);
        assert_eq!(body["error"], "Minimum amount is 0.01 SOL");
    }

    #[tokio::test]
    async fn initiate_rejects_malformed_wallet() {
        let app = router(test_state().await);
        let resp = app
            .oneshot(post_json(
                "/api/bets/initiate",
                json!({ "marketId": "sol-300-q4", "side": "YES", "amountSol": 0.5, "wallet": "0xdeadbeef" }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["error"], "Invalid wallet address");
    }

    #[tokio::test]
    async fn initiate_rejects_unknown_market() {
        let app = router(test_state().await);
        let resp = app
            .oneshot(post_json(
                "/api/bets/initiate",
                json!({ "marketId": "no-such-market", "side": "NO", "amountSol": 0.5, "wallet": WALLET }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["error"], "Market not found");
    }

    #[tokio::test]
    async fn confirm_rejects_wallet_mismatch_without_state_change() {
        let state = test_state().await;
        let bet_id = state
            .store
            .create_bet(NewBet {
                market_id: "sol-300-q4",
                side: BetSide::Yes,
                amount_sol: 0.5,
                wallet: WALLET,
                chain: ChainTag::Solana,
                status: BetStatus::Pending,
                proof: None,
            })
            .await
            .unwrap();

        let app = router(state.clone());
        let resp = app
            .oneshot(post_json(
                "/api/bets/confirm",
                json!({ "betId": bet_id, "txSignature": "sig", "wallet": "11111111111111111111111111111111" }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["error"], "Wallet mismatch");

        let bet = state.store.get_bet(&bet_id).await.unwrap().unwrap();
        assert_eq!(bet.status, "PENDING");
    }

    #[tokio::test]
    async fn reconfirm_confirmed_bet_returns_stored_proof() {
        let state = test_state().await;
        let bet_id = state
            .store
            .create_bet(NewBet {
                market_id: "sol-300-q4",
                side: BetSide::Yes,
                amount_sol: 0.5,
                wallet: WALLET,
                chain: ChainTag::Solana,
                status: BetStatus::Pending,
                proof: None,
            })
            .await
            .unwrap();
        state
            .store
            .mark_bet_confirmed(&bet_id, "sig1", "proof1")
            .await
            .unwrap();

        // short-circuits on the stored CONFIRMED row; the RPC endpoint is
        // unreachable, so any lookup attempt would error out
        let app = router(state);
        let resp = app
            .oneshot(post_json(
                "/api/bets/confirm",
                json!({ "betId": bet_id, "txSignature": "sig1", "wallet": WALLET }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["ok"], true);
        assert_eq!(body["proof"], "proof1");
        assert_eq!(body["txSignature"], "sig1");
    }

    #[tokio::test]
    async fn race_loser_reports_winning_confirmation() {
        let state = test_state().await;
        let bet_id = state
            .store
            .create_bet(NewBet {
                market_id: "sol-300-q4",
                side: BetSide::Yes,
                amount_sol: 0.5,
                wallet: WALLET,
                chain: ChainTag::Solana,
                status: BetStatus::Pending,
                proof: None,
            })
            .await
            .unwrap();
        state
            .store
            .mark_bet_confirmed(&bet_id, "sig1", "proof1")
            .await
            .unwrap();

        // a concurrent request whose conditional update touched zero rows
        // must report the winner's CONFIRMED state, not a failure
        let resp = report_finalized(&state.store, &bet_id).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["ok"], true);
        assert_eq!(body["proof"], "proof1");

        // and if the winner failed the bet, the loser sees the rejection
        let failed_id = state
            .store
            .create_bet(NewBet {
                market_id: "sol-300-q4",
                side: BetSide::No,
                amount_sol: 0.5,
                wallet: WALLET,
                chain: ChainTag::Solana,
                status: BetStatus::Pending,
                proof: None,
            })
            .await
            .unwrap();
        state
            .store
            .mark_bet_failed(&failed_id, "sig2", "TX_NOT_FOUND")
            .await
            .unwrap();
        let resp = report_finalized(&state.store, &failed_id).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = body_json(resp).await;
        assert_eq!(body["ok"], false);
        assert_eq!(body["reason"], "Bet already finalized");
    }

    #[tokio::test]
    async fn confirm_rejects_unknown_bet() {
        let app = router(test_state().await);
        let resp = app
            .oneshot(post_json(
                "/api/bets/confirm",
                json!({ "betId": "bet_missing", "txSignature": "sig", "wallet": WALLET }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["error"], "Bet not found");
    }

    #[tokio::test]
    async fn evm_receipt_records_receipt_only_bet() {
        let state = test_state().await;
        let message = "I bet 5 on YES for btc-150k-2026";
        let (signature, address) = sign_receipt(message);

        let app = router(state.clone());
        let resp = app
            .oneshot(post_json(
                "/api/bets/evm-receipt",
                json!({
                    "marketId": "btc-150k-2026", "side": "YES", "amount": 5.0,
                    "address": address, "message": message, "signature": signature,
                }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["ok"], true);
        assert_eq!(
            body["recovered"].as_str().unwrap().to_lowercase(),
            address.to_lowercase()
        );

        let bets = state.store.list_bets_for_wallet(&address).await.unwrap();
        assert_eq!(bets.len(), 1);
        assert_eq!(bets[0].status, "RECEIPT_ONLY");
        assert_eq!(bets[0].chain, "evm");
    }

    #[tokio::test]
    async fn evm_receipt_rejects_mismatched_signer() {
        let state = test_state().await;
        let (signature, _) = sign_receipt("some message");
        let stranger = "0x0000000000000000000000000000000000000001";

        let app = router(state.clone());
        let resp = app
            .oneshot(post_json(
                "/api/bets/evm-receipt",
                json!({
                    "marketId": "btc-150k-2026", "side": "NO", "amount": 1.0,
                    "address": stranger, "message": "some message", "signature": signature,
                }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["error"], "Invalid signature");

        // no bet was created for either address
        assert!(state.store.list_bets_for_wallet(stranger).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_wallet_history_is_empty() {
        let app = router(test_state().await);
        let resp = app.oneshot(get_req("/api/bets/by/nobody")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["ok"], true);
        assert_eq!(body["bets"].as_array().unwrap().len(), 0);
    }
}
