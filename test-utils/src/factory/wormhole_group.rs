//! Wormhole group factory for creating test group entities.

use crate::factory::helpers::next_id;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test wormhole groups with customizable fields.
///
/// # Example
///
/// ```rust,ignore
/// use test_utils::factory::wormhole_group::WormholeGroupFactory;
///
/// let group = WormholeGroupFactory::new(&db)
///     .name("universities")
///     .slowmode(5)
///     .build()
///     .await?;
/// ```
pub struct WormholeGroupFactory<'a> {
    db: &'a DatabaseConnection,
    name: String,
    slowmode: i32,
}

impl<'a> WormholeGroupFactory<'a> {
    /// Creates a new WormholeGroupFactory with default values.
    ///
    /// Defaults:
    /// - name: `"wormhole-{id}"` where id is auto-incremented
    /// - slowmode: `0`
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self {
            db,
            name: format!("wormhole-{}", next_id()),
            slowmode: 0,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn slowmode(mut self, slowmode: i32) -> Self {
        self.slowmode = slowmode;
        self
    }

    /// Builds and inserts the group entity into the database.
    ///
    /// # Returns
    /// - `Ok(entity::wormhole_group::Model)` - Created group entity
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::wormhole_group::Model, DbErr> {
        entity::wormhole_group::ActiveModel {
            id: ActiveValue::NotSet,
            name: ActiveValue::Set(self.name),
            slowmode: ActiveValue::Set(self.slowmode),
            created_at: ActiveValue::Set(Utc::now()),
        }
        .insert(self.db)
        .await
    }
}

/// Creates a wormhole group with default values.
///
/// Shorthand for `WormholeGroupFactory::new(db).build().await`.
pub async fn create_group(
    db: &DatabaseConnection,
) -> Result<entity::wormhole_group::Model, DbErr> {
    WormholeGroupFactory::new(db).build().await
}
