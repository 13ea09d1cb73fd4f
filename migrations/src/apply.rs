//! Running plans against a live database

use typeq_core::{Database, Executor, SQL};
use typeq_types::Dialect;

use crate::error::Result;
use crate::plan::Plan;
use crate::schema::VirtualSchema;

/// Execute `plan` statement by statement against `db`.
///
/// `from` is the schema the database currently has. Returns the number of
/// SQL statements executed. Statements already executed stay applied when a
/// later one fails.
pub fn apply_plan<E: Executor>(
    db: &Database<E>,
    plan: &Plan,
    from: &VirtualSchema,
    dialect: Dialect,
) -> Result<usize> {
    let statements = plan.to_sql(dialect, from)?;
    for statement in &statements {
        db.execute(&SQL::raw(statement.clone()))?;
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(statements = statements.len(), %dialect, "applied migration plan");

    Ok(statements.len())
}
