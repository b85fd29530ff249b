//! Mining-rights domain types.

use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::contract::abi::MiningRightsExchange::getMiningRightsInfoReturn;

/// On-chain rights listing as returned by `getMiningRightsInfo`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MiningRightsRecord {
    pub id: u64,
    pub location: String,
    pub geological_data: String,
    pub area_size: u32,
    pub estimated_value: u32,
    pub current_bid: u32,
    pub bid_count: u32,
    pub is_active: bool,
    pub is_verified: bool,
    pub owner: Address,
    /// Unix seconds.
    pub auction_end_time: u64,
}

impl MiningRightsRecord {
    pub(crate) fn from_return(id: u64, info: getMiningRightsInfoReturn) -> Self {
        Self {
            id,
            location: info.location,
            geological_data: info.geologicalData,
            area_size: info.areaSize,
            estimated_value: info.estimatedValue,
            current_bid: info.currentBid,
            bid_count: info.bidCount,
            is_active: info.isActive,
            is_verified: info.isVerified,
            owner: info.owner,
            auction_end_time: info.auctionEndTime.saturating_to::<u64>(),
        }
    }

    /// Unknown ids come back as a zeroed tuple.
    pub fn exists(&self) -> bool {
        self.owner != Address::ZERO
    }

    pub fn accepts_bids(&self) -> bool {
        self.exists() && self.is_active
    }
}

/// Arguments to `createMiningRights`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRightsRequest {
    pub location: String,
    /// Free-form survey payload, usually JSON.
    pub geological_data: String,
    pub area_size: u32,
    pub estimated_value: u32,
    pub auction_duration_secs: U256,
}

/// One bid against a rights listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BidSubmission {
    pub rights_id: u64,
    /// Bid in wei; also the value attached to the call.
    pub amount: u32,
    pub is_anonymous: bool,
}

impl BidSubmission {
    /// The only value this bid may carry.
    pub fn required_value(&self) -> U256 {
        U256::from(self.amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(owner: Address, is_active: bool) -> getMiningRightsInfoReturn {
        getMiningRightsInfoReturn {
            location: "Site A".to_string(),
            geologicalData: "{}".to_string(),
            areaSize: 1000,
            estimatedValue: 500_000,
            currentBid: 0,
            bidCount: 0,
            isActive: is_active,
            isVerified: false,
            owner,
            auctionEndTime: U256::MAX,
        }
    }

    #[test]
    fn test_from_return_saturates_end_time() {
        let record = MiningRightsRecord::from_return(3, info(Address::repeat_byte(1), true));
        assert_eq!(record.id, 3);
        assert_eq!(record.area_size, 1000);
        assert_eq!(record.auction_end_time, u64::MAX);
        assert!(record.accepts_bids());
    }

    #[test]
    fn test_zero_owner_means_missing() {
        let record = MiningRightsRecord::from_return(9, info(Address::ZERO, false));
        assert!(!record.exists());
        assert!(!record.accepts_bids());
    }

    #[test]
    fn test_inactive_rejects_bids() {
        let record = MiningRightsRecord::from_return(7, info(Address::repeat_byte(2), false));
        assert!(record.exists());
        assert!(!record.accepts_bids());
    }

    #[test]
    fn test_record_json_uses_contract_field_names() {
        let record = MiningRightsRecord::from_return(1, info(Address::repeat_byte(1), true));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["geologicalData"], "{}");
        assert_eq!(json["isActive"], true);
        assert_eq!(json["bidCount"], 0);
    }
}
