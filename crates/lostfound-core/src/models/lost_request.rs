use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Filed by a user who lost something, so staff can match it against found items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LostRequest {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category_id: Uuid,
    pub location_lost: String,
    pub date_lost: NaiveDate,
    pub contact_email: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateLostRequestRequest {
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
    pub location_lost: String,
    #[serde(default)]
    pub date_lost: Option<NaiveDate>,
    #[serde(default)]
    #[validate(email(message = "Contact email is not a valid address"))]
    pub contact_email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_email_must_be_valid_when_present() {
        let mut req = CreateLostRequestRequest {
            title: "Black wallet".to_string(),
            description: "Leather, initials J.D.".to_string(),
            category_id: Uuid::new_v4(),
            location_lost: String::new(),
            date_lost: None,
            contact_email: None,
        };
        assert!(req.validate().is_ok());

        req.contact_email = Some("not-an-email".to_string());
        assert!(req.validate().is_err());

        req.contact_email = Some("owner@example.org".to_string());
        assert!(req.validate().is_ok());
    }
}
