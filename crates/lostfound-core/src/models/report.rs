use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Review state of an item report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    #[default]
    New,
    Reviewed,
    Dismissed,
}

impl FromStr for ReportStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(ReportStatus::New),
            "reviewed" => Ok(ReportStatus::Reviewed),
            "dismissed" => Ok(ReportStatus::Dismissed),
            _ => Err(anyhow::anyhow!("Invalid report status: {}", s)),
        }
    }
}

impl Display for ReportStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ReportStatus::New => write!(f, "new"),
            ReportStatus::Reviewed => write!(f, "reviewed"),
            ReportStatus::Dismissed => write!(f, "dismissed"),
        }
    }
}

/// An issue raised by a user about a catalog listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemReport {
    pub id: Uuid,
    pub item_id: Uuid,
    pub reason: String,
    /// Reporting user; `None` once the account is gone
    pub reported_by: Option<Uuid>,
    pub status: ReportStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateReportRequest {
    #[validate(length(min = 1, message = "Please describe the problem"))]
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_status_is_case_sensitive() {
        assert_eq!("reviewed".parse::<ReportStatus>().unwrap(), ReportStatus::Reviewed);
        assert!("Reviewed".parse::<ReportStatus>().is_err());
        assert!("closed".parse::<ReportStatus>().is_err());
        assert_eq!(ReportStatus::Dismissed.to_string(), "dismissed");
    }
}
