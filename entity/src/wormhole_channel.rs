use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "wormhole_channel")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub group_id: i32,
    pub guild_id: String,
    #[sea_orm(unique)]
    pub channel_id: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::wormhole_group::Entity",
        from = "Column::GroupId",
        to = "super::wormhole_group::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    WormholeGroup,
}

impl Related<super::wormhole_group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WormholeGroup.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
