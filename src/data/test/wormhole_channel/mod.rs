use crate::{
    data::wormhole_channel::WormholeChannelRepository, error::AppError,
    model::group::AddWormholeChannelParam,
};
use serenity::all::{ChannelId, GuildId};
use test_utils::{builder::TestBuilder, factory};

mod add;
mod find_by_channel_id;
mod remove;
