//! Transaction builders and submission for the Tuna program.
//!
//! Builds on `tuna-client` for layouts and instruction encoding. Adds the
//! parts that talk to a node: an [`RpcClient`](rpc::RpcClient) abstraction,
//! typed account fetching, the associated-token-account and wrapped-SOL
//! policy, per-operation transaction builders, and two-phase submission.

pub mod context;
pub mod error;
pub mod fetch;
pub mod rpc;
pub mod submit;
pub mod token;
pub mod txbuilder;

pub use context::TunaContext;
pub use error::TunaError;
pub use fetch::DecodedAccount;
pub use rpc::{HttpRpcClient, MemoryRpc, RpcClient};
pub use submit::{send_instructions, PriorityFee, SendOptions};
pub use token::{AtaInstructions, MintInfo};
