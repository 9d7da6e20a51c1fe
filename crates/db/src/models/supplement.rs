//! Supplement entity model and DTOs.

use chrono::NaiveDate;
use dosewise_core::types::{DbId, Timestamp, UserId};
use serde::Serialize;
use sqlx::FromRow;

/// A supplement row from the `supplements` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Supplement {
    pub id: DbId,
    pub user_id: UserId,
    pub name: String,
    pub brand: String,
    pub dosage_form: Option<String>,
    pub dose_quantity: String,
    pub dose_unit: String,
    pub frequency: String,
    /// Schedule map, e.g. `{"Morning": ["08:00"], "Evening": ["20:00"]}`.
    pub times_of_day: serde_json::Value,
    /// Known interaction warnings.
    pub interactions: serde_json::Value,
    pub remind_me: bool,
    pub expiration_date: NaiveDate,
    pub quantity: String,
    pub image_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new supplement.
#[derive(Debug)]
pub struct CreateSupplement {
    pub name: String,
    pub brand: String,
    pub dosage_form: Option<String>,
    pub dose_quantity: String,
    pub dose_unit: String,
    pub frequency: String,
    pub times_of_day: serde_json::Value,
    pub interactions: serde_json::Value,
    pub remind_me: bool,
    pub expiration_date: NaiveDate,
    pub quantity: String,
    pub image_url: Option<String>,
}

/// DTO for updating a supplement. Only non-`None` fields are applied.
#[derive(Debug, Default)]
pub struct UpdateSupplement {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub dosage_form: Option<String>,
    pub dose_quantity: Option<String>,
    pub dose_unit: Option<String>,
    pub frequency: Option<String>,
    pub times_of_day: Option<serde_json::Value>,
    pub interactions: Option<serde_json::Value>,
    pub remind_me: Option<bool>,
    pub expiration_date: Option<NaiveDate>,
    pub quantity: Option<String>,
    pub image_url: Option<String>,
}
