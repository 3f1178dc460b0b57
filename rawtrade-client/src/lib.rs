//! Typed client for the raw-materials trading contract.
//!
//! The [`adapter::ContractAdapter`] exposes one method per contract function
//! and turns every failure into a [`error::RemoteCallError`]. It talks to the
//! chain through the [`transport::ContractTransport`] seam: production code
//! uses [`rpc::RpcTransport`] (JSON-RPC plus local signing), tests use the
//! in-memory contract from `testing`.

pub mod abi;
pub mod adapter;
pub mod catalog;
pub mod error;
pub mod guard;
pub mod rpc;
pub mod session;
pub mod transport;
pub mod verification;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use adapter::ContractAdapter;
pub use error::{CallFailure, ClientError, RemoteCallError};
pub use session::{AccountOverview, Session};
pub use transport::{ContractTransport, TxLog, TxReceipt};
pub use verification::Verification;
