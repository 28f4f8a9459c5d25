//! Donation feeds shown on the farmer dashboard and the public landing page

use shared::{Donation, DonationHistory};

use crate::error::ClientResult;
use crate::external::DonationApi;

/// Largest page the backend serves
pub const MAX_LIMIT: u32 = 100;

/// Donation queries with a configured page size
pub struct DonationFeed<'a, A: DonationApi + ?Sized> {
    api: &'a A,
    default_limit: u32,
}

impl<'a, A: DonationApi + ?Sized> DonationFeed<'a, A> {
    pub fn new(api: &'a A, default_limit: u32) -> Self {
        Self {
            api,
            default_limit: default_limit.clamp(1, MAX_LIMIT),
        }
    }

    fn limit(&self, requested: Option<u32>) -> u32 {
        match requested {
            Some(0) | None => self.default_limit,
            Some(limit) => limit.min(MAX_LIMIT),
        }
    }

    /// Latest donations across all recipients
    pub async fn recent(&self, limit: Option<u32>) -> ClientResult<Vec<Donation>> {
        self.api.recent_donations(self.limit(limit)).await
    }

    /// Donations received by one farmer, with totals
    pub async fn history(&self, recipient_id: &str, limit: Option<u32>) -> ClientResult<DonationHistory> {
        self.api.donation_history(recipient_id, self.limit(limit)).await
    }
}
