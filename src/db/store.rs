use std::time::{SystemTime, UNIX_EPOCH};

use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use crate::db::models::{BetRow, MarketRow};
use crate::error::Result;
use crate::types::{BetSide, BetStatus, ChainTag};

/// Markets inserted by the one-time seed. Odds are illustrative only and are
/// never recomputed from bets.
const SEED_MARKETS: &[(&str, &str, &str, i64, i64)] = &[
    ("btc-150k-2026", "Bitcoin above $150k by end of 2026", "Crypto", 62, 38),
    ("eth-flip-2027", "Ethereum flips Bitcoin market cap by 2027", "Crypto", 12, 88),
    ("sol-300-q4", "Solana above $300 at end of Q4", "Crypto", 45, 55),
    ("fed-cut-december", "Fed cuts rates at the December meeting", "Macro", 71, 29),
    ("mars-sample-2030", "Mars sample return lands on Earth by 2030", "Science", 18, 82),
];

/// Fields for a new bet row. Status is caller-supplied: PENDING for the
/// chain-transfer flow, RECEIPT_ONLY for the signature-receipt flow.
#[derive(Debug)]
pub struct NewBet<'a> {
    pub market_id: &'a str,
    pub side: BetSide,
    pub amount_sol: f64,
    pub wallet: &'a str,
    pub chain: ChainTag,
    pub status: BetStatus,
    pub proof: Option<&'a str>,
}

/// All durable state behind one handle. Every write is a single atomic
/// statement; the only multi-row transaction is the one-time seed.
#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// LIVE markets, oldest first. Unbounded — the catalogue is small.
    pub async fn list_markets(&self) -> Result<Vec<MarketRow>> {
        let rows = sqlx::query_as::<_, MarketRow>(
            "SELECT * FROM markets WHERE status = 'LIVE' ORDER BY created_at ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn get_market(&self, id: &str) -> Result<Option<MarketRow>> {
        let row = sqlx::query_as::<_, MarketRow>("SELECT * FROM markets WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn get_bet(&self, id: &str) -> Result<Option<BetRow>> {
        let row = sqlx::query_as::<_, BetRow>("SELECT * FROM bets WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Insert a bet row and return its generated id.
    pub async fn create_bet(&self, bet: NewBet<'_>) -> Result<String> {
        let id = format!("bet_{}", Uuid::new_v4().simple());
        sqlx::query(
            r#"
            INSERT INTO bets (id, market_id, side, amount_sol, wallet, chain, status, proof, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(bet.market_id)
        .bind(bet.side.as_str())
        .bind(bet.amount_sol)
        .bind(bet.wallet)
        .bind(bet.chain.as_str())
        .bind(bet.status.as_str())
        .bind(bet.proof)
        .bind(now_ns())
        .execute(&self.pool)
        .await?;
        Ok(id)
    }

    /// PENDING → CONFIRMED. Conditional on the current status so two racing
    /// confirmations cannot overwrite a terminal state. Returns false when the
    /// bet was already finalized (or does not exist).
    pub async fn mark_bet_confirmed(&self, id: &str, tx_signature: &str, proof: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE bets SET status = 'CONFIRMED', tx_signature = ?, proof = ?
            WHERE id = ? AND status = 'PENDING'
            "#,
        )
        .bind(tx_signature)
        .bind(proof)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// PENDING → FAILED, persisting the verification failure reason.
    pub async fn mark_bet_failed(&self, id: &str, tx_signature: &str, reason: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE bets SET status = 'FAILED', tx_signature = ?, failure_reason = ?
            WHERE id = ? AND status = 'PENDING'
            "#,
        )
        .bind(tx_signature)
        .bind(reason)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// All bets for a wallet across both chains, most recent first.
    /// An unknown wallet yields an empty vec, not an error.
    pub async fn list_bets_for_wallet(&self, wallet: &str) -> Result<Vec<BetRow>> {
        let rows = sqlx::query_as::<_, BetRow>(
            "SELECT * FROM bets WHERE wallet = ? ORDER BY created_at DESC",
        )
        .bind(wallet)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Idempotent seed: inserts the fixed catalogue inside one transaction if
    /// the markets table is empty. Safe on every startup and on admin request.
    /// Returns how many markets were inserted.
    pub async fn seed_if_empty(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM markets")
            .fetch_one(&self.pool)
            .await?;
        if count > 0 {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await?;
        let created_at = now_ns();
        for (id, name, category, yes_pct, no_pct) in SEED_MARKETS {
            sqlx::query(
                r#"
                INSERT INTO markets (id, name, category, yes_pct, no_pct, status, created_at)
                VALUES (?, ?, ?, ?, ?, 'LIVE', ?)
                "#,
            )
            .bind(id)
            .bind(name)
            .bind(category)
            .bind(yes_pct)
            .bind(no_pct)
            .bind(created_at)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        info!("Seeded {} markets", SEED_MARKETS.len());
        Ok(SEED_MARKETS.len() as u64)
    }
}

pub fn now_ns() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos() as i64
}
