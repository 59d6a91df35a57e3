use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "wormhole_group")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub slowmode: i32,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::wormhole_channel::Entity")]
    WormholeChannel,
}

impl Related<super::wormhole_channel::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WormholeChannel.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
