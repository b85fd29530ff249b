//! Mining-rights contract access.
//!
//! # Data Flow
//! ```text
//! CLI / caller
//!     → gateway.rs (pre-checks, simulate, submit, notify)
//!     → abi.rs (fixed ABI encoding)
//!     → ChainClient (RPC or in-memory chain)
//!     → TransactionHandle → blockchain::tracker
//! ```

pub mod abi;
pub mod gateway;
pub mod types;

pub use gateway::{ContractGateway, GatewayError, GatewayResult};
pub use types::{BidSubmission, CreateRightsRequest, MiningRightsRecord};
