//! Direct-payment donations received by farmers

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single donation made to a recipient
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Donation {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub donor_name: String,
    #[serde(default)]
    pub recipient_id: String,
    #[serde(default)]
    pub recipient_name: String,
    pub amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub payment_method: String,
    #[serde(default)]
    pub status: DonationStatus,
    pub created_at: DateTime<Utc>,
}

/// Settlement state of a donation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DonationStatus {
    #[default]
    Pending,
    Completed,
    Failed,
}

/// Aggregates over a recipient's donations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DonationStats {
    #[serde(default)]
    pub total_amount: Decimal,
    #[serde(default)]
    pub total_donations: u64,
    #[serde(default)]
    pub unique_donors: u64,
}

/// Donation history of one recipient
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct DonationHistory {
    #[serde(default)]
    pub donations: Vec<Donation>,
    #[serde(default)]
    pub stats: DonationStats,
}

impl DonationHistory {
    /// Sum of completed donations in this page
    pub fn completed_total(&self) -> Decimal {
        self.donations
            .iter()
            .filter(|d| d.status == DonationStatus::Completed)
            .map(|d| d.amount)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_donation_accepts_numeric_amount() {
        let json = r#"{
            "_id": "d1",
            "donorName": "Meera",
            "recipientId": "f-7",
            "amount": 1500.50,
            "paymentMethod": "upi",
            "status": "completed",
            "createdAt": "2024-03-01T08:30:00Z"
        }"#;
        let donation: Donation = serde_json::from_str(json).unwrap();
        assert_eq!(donation.amount, Decimal::from_str("1500.50").unwrap());
        assert_eq!(donation.status, DonationStatus::Completed);
        assert!(donation.message.is_none());
    }

    #[test]
    fn test_completed_total_skips_pending() {
        let make = |amount: i64, status| Donation {
            id: amount.to_string(),
            donor_name: String::new(),
            recipient_id: "f-1".into(),
            recipient_name: String::new(),
            amount: Decimal::from(amount),
            message: None,
            payment_method: "upi".into(),
            status,
            created_at: Utc::now(),
        };
        let history = DonationHistory {
            donations: vec![
                make(500, DonationStatus::Completed),
                make(250, DonationStatus::Pending),
                make(100, DonationStatus::Completed),
            ],
            stats: DonationStats::default(),
        };
        assert_eq!(history.completed_total(), Decimal::from(600));
    }
}
