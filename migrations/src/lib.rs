//! typeq migrations - schema snapshots and migration planning
//!
//! This crate provides:
//! - [`VirtualSchema`] snapshots, built by hand or from a [`typeq_core::Registry`]
//! - [`plan`], a keyed diff of two snapshots into an ordered [`Plan`]
//! - reversible [`Statement`]s that apply to snapshots and render DDL for
//!   SQLite and PostgreSQL
//! - [`Config`], the planner settings read from TOML
//!
//! ```
//! use typeq_migrations::{plan, Config, VirtualColumn, VirtualSchema, VirtualTable};
//! use typeq_types::ColumnType;
//!
//! let before = VirtualSchema::new("main");
//! let after = VirtualSchema::new("main").with_table(
//!     VirtualTable::new("company")
//!         .with_column(VirtualColumn::new("id", ColumnType::BigInt).auto_increment())
//!         .with_column(VirtualColumn::new("name", ColumnType::Text))
//!         .with_primary_key(["id"]),
//! );
//!
//! let plan = plan(&before, &after).unwrap();
//! plan.validate(&before, &after).unwrap();
//! let sql = plan.render(&Config::default(), &before).unwrap();
//! assert!(sql.starts_with("CREATE TABLE `company`"));
//! ```

mod apply;
pub mod collection;
pub mod config;
mod ddl;
pub mod error;
pub mod plan;
pub mod schema;
pub mod statement;

pub use apply::apply_plan;
pub use collection::{Collection, Named};
pub use config::Config;
pub use error::{MigrationError, Result};
pub use plan::{BREAKPOINT, Plan, plan};
pub use schema::{ColumnReference, VirtualColumn, VirtualIndex, VirtualSchema, VirtualTable};
pub use statement::Statement;
