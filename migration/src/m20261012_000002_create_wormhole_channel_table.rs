use sea_orm_migration::{prelude::*, schema::*};

use super::m20261012_000001_create_wormhole_group_table::WormholeGroup;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(WormholeChannel::Table)
                    .if_not_exists()
                    .col(pk_auto(WormholeChannel::Id))
                    .col(integer(WormholeChannel::GroupId))
                    .col(string(WormholeChannel::GuildId))
                    .col(string(WormholeChannel::ChannelId))
                    .col(timestamp(WormholeChannel::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_wormhole_channel_group_id")
                            .from(WormholeChannel::Table, WormholeChannel::GroupId)
                            .to(WormholeGroup::Table, WormholeGroup::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // A channel may only ever belong to one wormhole group
        manager
            .create_index(
                Index::create()
                    .name("idx_wormhole_channel_channel_id")
                    .table(WormholeChannel::Table)
                    .col(WormholeChannel::ChannelId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_wormhole_channel_channel_id")
                    .table(WormholeChannel::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(WormholeChannel::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum WormholeChannel {
    Table,
    Id,
    GroupId,
    GuildId,
    ChannelId,
    CreatedAt,
}
