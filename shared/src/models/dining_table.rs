//! Dining Table Model

use serde::{Deserialize, Serialize};

/// Dining table entity (mesa)
///
/// Reference data: the ordering service reads tables but never creates or
/// removes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DiningTable {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
}
