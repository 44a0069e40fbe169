/// Database row types. Used by sqlx for typed queries.

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MarketRow {
    pub id: String,
    pub name: String,
    pub category: String,
    pub yes_pct: i64,
    pub no_pct: i64,
    pub status: String,
    pub created_at: i64,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BetRow {
    pub id: String,
    pub market_id: String,
    pub side: String,
    pub amount_sol: f64,
    pub wallet: String,
    pub chain: String,
    pub status: String,
    pub tx_signature: Option<String>,
    pub proof: Option<String>,
    pub failure_reason: Option<String>,
    pub created_at: i64,
}
