//! Agent Client Protocol (ACP) stdio client.
//!
//! Speaks line-delimited JSON-RPC over the stdin/stdout of an agent
//! subprocess. One [`conversation::execute`] call drives the full
//! handshake → session → prompt sequence against a fresh process and
//! returns the accumulated visible text.
//!
//! Submodules:
//! - `codec`: [`LinesCodec`](tokio_util::codec::LinesCodec)-based frame
//!   decoding with a max-length guard.
//! - `spawner`: process spawning and guaranteed teardown.
//! - `writer`: outbound JSON-RPC frame encoding and flushing.
//! - `reader`: inbound frame classification.
//! - `filter`: thinking-span removal and output accumulation.
//! - `conversation`: the three-phase protocol driver.

pub mod codec;
pub mod conversation;
pub mod filter;
pub mod reader;
pub mod spawner;
pub mod writer;

pub use conversation::{execute, TaskOutput};
