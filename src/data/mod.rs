//! Database repository layer for wormhole configuration.
//!
//! Repositories use SeaORM entity models internally and return domain models so the
//! service layer never handles raw entities. Discord IDs are stored as strings and
//! parsed to snowflakes at this boundary.

pub mod wormhole_channel;
pub mod wormhole_group;

#[cfg(test)]
mod test;
