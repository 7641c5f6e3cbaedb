//! Host environment abstraction for moving value in and out of escrow.

mod mock;
mod traits;

pub use mock::MockEscrowHost;
pub use traits::{EscrowHost, HostError};
