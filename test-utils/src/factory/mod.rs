//! Factory methods for creating test data.
//!
//! Each entity has its own factory module with both a `Factory` struct for customization
//! and a `create_*` convenience function for quick default creation.
//!
//! # Basic Usage
//!
//! ```rust,ignore
//! use test_utils::factory;
//!
//! let group = factory::create_group(&db).await?;
//! let channel = factory::create_channel(&db, group.id).await?;
//!
//! let channel = factory::wormhole_channel::WormholeChannelFactory::new(&db, group.id)
//!     .guild_id("111")
//!     .channel_id("222")
//!     .build()
//!     .await?;
//! ```
//!
//! # Available Factories
//!
//! - `wormhole_group` - Create wormhole group entities
//! - `wormhole_channel` - Create wormhole channel entities
//! - `helpers` - Unique ID generation shared by all factories

pub mod helpers;
pub mod wormhole_channel;
pub mod wormhole_group;

pub use wormhole_channel::create_channel;
pub use wormhole_group::create_group;
