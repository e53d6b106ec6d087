//! Transport-agnostic host protocol.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                                                              │
//! │  ┌───────────┐   ┌───────────┐   ┌────────────────────────┐  │
//! │  │ Transport │──▶│   Codec   │──▶│ Dispatcher             │  │
//! │  │ / SETUP   │   │ (framing) │   │ → SharedRelayStore     │  │
//! │  └───────────┘   └───────────┘   └────────────────────────┘  │
//! │       ▲                                     │                │
//! │       └──────────── 4-byte response ◀───────┘                │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod codec;
pub mod dispatch;
pub mod protocol;
pub mod transport;
