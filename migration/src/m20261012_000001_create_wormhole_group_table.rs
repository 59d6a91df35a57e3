use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(WormholeGroup::Table)
                    .if_not_exists()
                    .col(pk_auto(WormholeGroup::Id))
                    .col(string_uniq(WormholeGroup::Name))
                    .col(integer(WormholeGroup::Slowmode).default(0))
                    .col(timestamp(WormholeGroup::CreatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WormholeGroup::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum WormholeGroup {
    Table,
    Id,
    Name,
    Slowmode,
    CreatedAt,
}
