//! IRC side of the bridge.
//!
//! - [`session`]: connection lifecycle, reconnects and the guarded write path
//! - [`stream`]: plaintext/TLS transport
//! - [`relay`]: IRC events -> Slack text, and the forwarding queue

pub mod relay;
pub mod session;
pub mod stream;

pub use relay::{MessageSink, Relay};
pub use session::{SessionHandle, SessionManager};
