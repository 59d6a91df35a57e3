pub use super::wormhole_channel::Entity as WormholeChannel;
pub use super::wormhole_group::Entity as WormholeGroup;
