//! Mining-rights exchange contract interface.

use alloy::sol;

sol! {
    /// Tokenized mineral-rights auctions.
    interface MiningRightsExchange {
        function createMiningRights(
            string location,
            string geologicalData,
            uint32 areaSize,
            uint32 estimatedValue,
            uint256 auctionDuration
        ) external returns (uint256);

        function placeBid(uint256 rightsId, uint32 amount, bool isAnonymous)
            external
            payable
            returns (uint256);

        function getMiningRightsInfo(uint256 rightsId)
            external
            view
            returns (
                string location,
                string geologicalData,
                uint32 areaSize,
                uint32 estimatedValue,
                uint32 currentBid,
                uint32 bidCount,
                bool isActive,
                bool isVerified,
                address owner,
                uint256 auctionEndTime
            );
    }
}

pub use MiningRightsExchange::{createMiningRightsCall, getMiningRightsInfoCall, placeBidCall};
