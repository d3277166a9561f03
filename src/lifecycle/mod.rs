//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Build connection manager, metrics,
//!     forwarder, probe → Bind listeners → Serve
//!
//! Shutdown:
//!     SIGTERM/SIGINT (signals.rs) or either server exiting (supervisor.rs)
//!     → Shutdown::trigger (shutdown.rs)
//!     → servers stop accepting and drain → backend channel closed
//! ```

pub mod shutdown;
pub mod signals;
pub mod supervisor;

pub use shutdown::Shutdown;
pub use supervisor::{supervise, ExitCause};
