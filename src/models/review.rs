// src/models/review.rs
use chrono::{DateTime, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 5;

/// Moderation state of a review. Only `Approved` reviews are aggregated or shown.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    Pending,
    Approved,
    Rejected,
}

impl ReviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewStatus::Pending => "pending",
            ReviewStatus::Approved => "approved",
            ReviewStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown review status '{}'", self.0)
    }
}

impl std::error::Error for UnknownStatus {}

impl FromStr for ReviewStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ReviewStatus::Pending),
            "approved" => Ok(ReviewStatus::Approved),
            "rejected" => Ok(ReviewStatus::Rejected),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

impl ToSql for ReviewStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for ReviewStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e: UnknownStatus| FromSqlError::Other(Box::new(e)))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ProductReview {
    pub id: i64,
    pub shop_id: i64,
    pub product_id: i64,
    pub reviewer_id: i64,
    pub order_line_id: Option<i64>,
    pub supplier_id: Option<i64>, // derived from the order line
    pub rating: Option<u8>,
    pub comment: Option<String>,
    pub would_recommend: bool,
    pub status: ReviewStatus,
    pub created_on: DateTime<Utc>,
}

/// One storefront submission: a rating (and optional comment) for a product
/// bought from a supplier.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct NewReview {
    pub product_id: i64,
    pub supplier_id: i64,
    pub rating: Option<i64>,
    pub comment: Option<String>,
    pub would_recommend: bool,
}

impl NewReview {
    pub fn rated(product_id: i64, supplier_id: i64, rating: i64) -> Self {
        NewReview {
            product_id,
            supplier_id,
            rating: Some(rating),
            comment: None,
            would_recommend: false,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn recommended(mut self) -> Self {
        self.would_recommend = true;
        self
    }

    /// Comment with surrounding whitespace removed; blank comments count as absent.
    pub fn normalized_comment(&self) -> Option<String> {
        self.comment
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
    }
}

/// Public projection of an approved review shown in comment listings.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ReviewComment {
    pub id: i64,
    pub date: DateTime<Utc>,
    pub rating: Option<u8>,
    pub comment: String,
    pub reviewer: String,
}

/// Row of the moderation listing.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ReviewListEntry {
    pub id: i64,
    pub product: String,
    pub reviewer: String,
    pub rating: Option<u8>,
    pub comment: Option<String>,
    pub status: ReviewStatus,
}

/// A (product, supplier) pair the reviewer bought and has not reviewed yet.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PendingReview {
    pub order_line_id: i64,
    pub product_id: i64,
    pub supplier_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModerationAction {
    Approve,
    Reject,
}

impl ModerationAction {
    pub fn target_status(&self) -> ReviewStatus {
        match self {
            ModerationAction::Approve => ReviewStatus::Approved,
            ModerationAction::Reject => ReviewStatus::Rejected,
        }
    }
}

/// Which reviews a moderator may act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModerationScope {
    /// Shop administrators see every review of the shop.
    Shop(i64),
    /// Vendors only see reviews of lines they supplied.
    Vendor { shop_id: i64, supplier_id: i64 },
}

impl ModerationScope {
    pub fn shop_id(&self) -> i64 {
        match self {
            ModerationScope::Shop(shop_id) => *shop_id,
            ModerationScope::Vendor { shop_id, .. } => *shop_id,
        }
    }

    pub fn supplier_id(&self) -> Option<i64> {
        match self {
            ModerationScope::Shop(_) => None,
            ModerationScope::Vendor { supplier_id, .. } => Some(*supplier_id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewSelection {
    All,
    Ids(Vec<i64>),
}

impl ReviewSelection {
    pub fn contains(&self, id: i64) -> bool {
        match self {
            ReviewSelection::All => true,
            ReviewSelection::Ids(ids) => ids.contains(&id),
        }
    }
}
