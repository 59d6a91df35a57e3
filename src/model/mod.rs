//! Domain models for the wormhole relay.
//!
//! - `group` - Wormhole groups and their member channels
//! - `guild` - Origin guild identity used for labels
//! - `message` - Inbound gateway events and outbound renditions
//! - `relay` - Correlation records and relay outcomes

pub mod group;
pub mod guild;
pub mod message;
pub mod relay;
