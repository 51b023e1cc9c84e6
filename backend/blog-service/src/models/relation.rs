use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// `from_user_id` follows `to_user_id`.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Relation {
    pub id: Uuid,
    pub from_user_id: Uuid,
    pub to_user_id: Uuid,
    pub created_at: DateTime<Utc>,
}
