pub mod prelude;

pub mod wormhole_channel;
pub mod wormhole_group;
