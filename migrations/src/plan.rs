//! Schema diffing into an ordered migration plan

use serde::{Deserialize, Serialize};
use typeq_types::Dialect;

use crate::collection::diff;
use crate::config::Config;
use crate::error::{MigrationError, Result};
use crate::schema::{VirtualColumn, VirtualSchema, VirtualTable};
use crate::statement::Statement;

/// SQL statement breakpoint marker
pub const BREAKPOINT: &str = "--> statement-breakpoint";

/// An ordered list of statements taking one schema to another
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct Plan {
    pub statements: Vec<Statement>,
}

impl Plan {
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Statement> {
        self.statements.iter()
    }

    /// Apply every statement in order, stopping at the first failure
    pub fn apply(&self, schema: &mut VirtualSchema) -> Result<()> {
        for statement in &self.statements {
            statement.apply(schema)?;
        }
        Ok(())
    }

    /// The plan that undoes this one: each statement reversed, last first
    #[must_use]
    pub fn reverse(&self) -> Plan {
        Plan {
            statements: self.statements.iter().rev().map(Statement::reverse).collect(),
        }
    }

    /// Check that applying the plan to `from` yields a schema structurally
    /// equal to `to`.
    pub fn validate(&self, from: &VirtualSchema, to: &VirtualSchema) -> Result<()> {
        let mut schema = from.clone();
        self.apply(&mut schema)?;

        let differences = diff(&schema.tables, &to.tables);
        if let Some(table) = differences.dropped.first() {
            return Err(MigrationError::PlanMismatch(format!(
                "unexpected table `{}`",
                table.name
            )));
        }
        if let Some(table) = differences.created.first() {
            return Err(MigrationError::PlanMismatch(format!(
                "missing table `{}`",
                table.name
            )));
        }
        if let Some((table, _)) = differences.matched.iter().find(|(ours, theirs)| ours != theirs) {
            return Err(MigrationError::PlanMismatch(format!(
                "table `{}` differs",
                table.name
            )));
        }
        Ok(())
    }

    /// Render every statement, each against the schema it applies to
    pub fn to_sql(&self, dialect: Dialect, from: &VirtualSchema) -> Result<Vec<String>> {
        let mut schema = from.clone();
        let mut sql = Vec::new();
        for statement in &self.statements {
            sql.extend(statement.to_sql(dialect, &schema)?);
            statement.apply(&mut schema)?;
        }
        Ok(sql)
    }

    /// Render the plan as one migration file body
    pub fn render(&self, config: &Config, from: &VirtualSchema) -> Result<String> {
        let sql = self.to_sql(config.dialect, from)?;
        let separator = if config.breakpoints {
            format!("\n{BREAKPOINT}\n")
        } else {
            "\n".to_string()
        };
        Ok(sql.join(&separator))
    }
}

impl<'a> IntoIterator for &'a Plan {
    type Item = &'a Statement;
    type IntoIter = std::slice::Iter<'a, Statement>;

    fn into_iter(self) -> Self::IntoIter {
        self.statements.iter()
    }
}

/// Diff two schemas into a plan.
///
/// New tables are created first, referenced tables before the tables that
/// reference them. Matched tables then have their indices dropped, columns
/// added, modified and dropped, and indices created. Dropped tables go last,
/// dependents first.
pub fn plan(from: &VirtualSchema, to: &VirtualSchema) -> Result<Plan> {
    let tables = diff(&from.tables, &to.tables);
    let mut statements = Vec::new();

    for table in dependency_order(&tables.created) {
        statements.push(Statement::CreateTable {
            table: table.clone(),
        });
    }

    for (old, new) in &tables.matched {
        diff_table(old, new, &mut statements)?;
    }

    for table in dependency_order(&tables.dropped).into_iter().rev() {
        statements.push(Statement::DropTable {
            table: table.clone(),
        });
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(
        from = %from.name,
        to = %to.name,
        statements = statements.len(),
        "planned migration"
    );

    Ok(Plan { statements })
}

fn diff_table(old: &VirtualTable, new: &VirtualTable, statements: &mut Vec<Statement>) -> Result<()> {
    if old.primary_key != new.primary_key {
        return Err(MigrationError::UnsupportedPrimaryKeyChange(new.name.clone()));
    }
    if old.schema != new.schema {
        return Err(MigrationError::UnsupportedTableChange {
            table: new.name.clone(),
            reason: format!("schema changed from {:?} to {:?}", old.schema, new.schema),
        });
    }

    let columns = diff(&old.columns, &new.columns);
    let indices = diff(&old.indices, &new.indices);
    let changed_indices: Vec<_> = indices
        .matched
        .iter()
        .filter(|(before, after)| before != after)
        .collect();

    let table = || new.name.clone();

    for index in indices.dropped.iter().copied().chain(changed_indices.iter().map(|(before, _)| *before)) {
        statements.push(Statement::DropIndex {
            table: table(),
            index: index.clone(),
        });
    }

    for column in &columns.created {
        statements.push(Statement::AddColumn {
            table: table(),
            column: (*column).clone(),
        });
    }

    for (before, after) in &columns.matched {
        check_column(&new.name, before, after)?;
        if before.nullable != after.nullable
            || before.auto_increment != after.auto_increment
            || before.default != after.default
        {
            statements.push(Statement::ModifyColumn {
                table: table(),
                from: (*before).clone(),
                to: (*after).clone(),
            });
        }
    }

    for column in &columns.dropped {
        statements.push(Statement::DropColumn {
            table: table(),
            column: (*column).clone(),
        });
    }

    for index in indices.created.iter().copied().chain(changed_indices.iter().map(|(_, after)| *after)) {
        statements.push(Statement::CreateIndex {
            table: table(),
            index: index.clone(),
        });
    }

    Ok(())
}

fn check_column(table: &str, before: &VirtualColumn, after: &VirtualColumn) -> Result<()> {
    let reason = if before.column_type != after.column_type {
        format!(
            "type changed from {:?} to {:?}",
            before.column_type, after.column_type
        )
    } else if before.references != after.references {
        "reference changed".to_string()
    } else {
        return Ok(());
    };
    Err(MigrationError::UnsupportedColumnChange {
        table: table.to_string(),
        column: after.name.clone(),
        reason,
    })
}

/// Order tables so that each comes after the tables it references.
///
/// Only references inside `tables` count. Tables caught in a reference cycle
/// keep their given order.
fn dependency_order<'a>(tables: &[&'a VirtualTable]) -> Vec<&'a VirtualTable> {
    let mut ordered: Vec<&'a VirtualTable> = Vec::with_capacity(tables.len());
    let mut pending: Vec<&'a VirtualTable> = tables.to_vec();

    while !pending.is_empty() {
        let ready = pending.iter().position(|table| {
            table.dependencies().all(|dependency| {
                ordered.iter().any(|t| t.name == dependency)
                    || !pending.iter().any(|t| t.name == dependency)
            })
        });
        // A cycle leaves nothing ready, so take the first pending table.
        let next = ready.unwrap_or(0);
        ordered.push(pending.remove(next));
    }
    ordered
}
