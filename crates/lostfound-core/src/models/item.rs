use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Whether a found item is still waiting for its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum ItemStatus {
    #[default]
    Found,
    Claimed,
}

impl FromStr for ItemStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "FOUND" => Ok(ItemStatus::Found),
            "CLAIMED" => Ok(ItemStatus::Claimed),
            _ => Err(anyhow::anyhow!("Invalid item status: {}", s)),
        }
    }
}

impl Display for ItemStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ItemStatus::Found => write!(f, "FOUND"),
            ItemStatus::Claimed => write!(f, "CLAIMED"),
        }
    }
}

/// A found item recorded in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LostItem {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category_id: Uuid,
    /// Storage path of the accepted photo, if one was uploaded
    pub image_path: Option<String>,
    #[serde(default)]
    pub location_found: String,
    pub date_found: NaiveDate,
    #[serde(default)]
    pub status: ItemStatus,
    pub created_at: DateTime<Utc>,
}

impl LostItem {
    pub fn is_claimed(&self) -> bool {
        self.status == ItemStatus::Claimed
    }
}

/// Request DTO for listing a newly found item
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateItemRequest {
    #[validate(length(
        min = 1,
        max = 200,
        message = "Title must be between 1 and 200 characters"
    ))]
    pub title: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    pub category_id: Uuid,
    #[serde(default)]
    #[validate(length(max = 200, message = "Location must be at most 200 characters"))]
    pub location_found: String,
    /// Defaults to today when omitted
    #[serde(default)]
    pub date_found: Option<NaiveDate>,
    #[serde(default)]
    pub image_path: Option<String>,
}

/// Request DTO for editing an item. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateItemRequest {
    #[serde(default)]
    #[validate(length(
        min = 1,
        max = 200,
        message = "Title must be between 1 and 200 characters"
    ))]
    pub title: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: Option<String>,
    #[serde(default)]
    pub category_id: Option<Uuid>,
    #[serde(default)]
    #[validate(length(max = 200, message = "Location must be at most 200 characters"))]
    pub location_found: Option<String>,
    #[serde(default)]
    pub date_found: Option<NaiveDate>,
    #[serde(default)]
    pub image_path: Option<Option<String>>, // Some(None) removes the photo
}
