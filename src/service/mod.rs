//! Service layer for relay logic and orchestration.
//!
//! Services sit between the bot adapter and the data (repository) layer:
//!
//! - `directory` - In-memory snapshot of wormhole groups answering membership queries
//! - `identity` - Origin guild labels and emoji badges
//! - `render` - Builds the text posted to destination channels
//! - `correlation` - Origin-to-copy mapping used for edit and delete propagation
//! - `dispatcher` - Network send, edit and delete calls with retry
//! - `relay` - The relay engine tying the above together
//! - `group` - Management operations on wormhole groups

pub mod correlation;
pub mod directory;
pub mod dispatcher;
pub mod group;
pub mod identity;
pub mod relay;
pub mod render;
