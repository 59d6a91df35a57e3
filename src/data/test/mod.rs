mod wormhole_channel;
mod wormhole_group;
