//! Wormhole Test Utils
//!
//! Provides shared testing utilities for the wormhole relay. This crate offers a builder
//! pattern for creating test contexts with in-memory SQLite databases, factories for
//! wormhole groups and channels, and factories for Serenity gateway objects.
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::builder::TestBuilder;
//!
//! #[tokio::test]
//! async fn test_group_operations() -> Result<(), TestError> {
//!     let test = TestBuilder::new()
//!         .with_wormhole_tables()
//!         .build()
//!         .await?;
//!
//!     let db = test.db.unwrap();
//!     // Perform database operations...
//!
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod context;
pub mod error;
pub mod factory;
pub mod serenity;
