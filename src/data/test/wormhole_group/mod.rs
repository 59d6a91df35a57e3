use crate::{
    data::wormhole_group::WormholeGroupRepository, error::AppError,
    model::group::CreateWormholeGroupParam,
};
use sea_orm::{EntityTrait, PaginatorTrait};
use serenity::all::ChannelId;
use test_utils::{builder::TestBuilder, factory};

mod create;
mod delete;
mod get_all;
mod set_slowmode;
