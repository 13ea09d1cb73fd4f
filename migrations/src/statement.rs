//! Reversible schema statements

use serde::{Deserialize, Serialize};
use typeq_types::Dialect;

use crate::ddl;
use crate::error::{MigrationError, Result};
use crate::schema::{VirtualColumn, VirtualIndex, VirtualSchema, VirtualTable};

/// One schema change.
///
/// Statements carry the full shape of what they remove so that every one of
/// them can be reversed without looking at the schema.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Statement {
    CreateTable {
        table: VirtualTable,
    },
    DropTable {
        table: VirtualTable,
    },
    AddColumn {
        table: String,
        column: VirtualColumn,
    },
    DropColumn {
        table: String,
        column: VirtualColumn,
    },
    ModifyColumn {
        table: String,
        from: VirtualColumn,
        to: VirtualColumn,
    },
    CreateIndex {
        table: String,
        index: VirtualIndex,
    },
    DropIndex {
        table: String,
        index: VirtualIndex,
    },
}

impl Statement {
    /// Name of the table the statement changes
    pub fn table_name(&self) -> &str {
        match self {
            Statement::CreateTable { table } | Statement::DropTable { table } => &table.name,
            Statement::AddColumn { table, .. }
            | Statement::DropColumn { table, .. }
            | Statement::ModifyColumn { table, .. }
            | Statement::CreateIndex { table, .. }
            | Statement::DropIndex { table, .. } => table,
        }
    }

    /// The statement that undoes this one
    #[must_use]
    pub fn reverse(&self) -> Statement {
        match self.clone() {
            Statement::CreateTable { table } => Statement::DropTable { table },
            Statement::DropTable { table } => Statement::CreateTable { table },
            Statement::AddColumn { table, column } => Statement::DropColumn { table, column },
            Statement::DropColumn { table, column } => Statement::AddColumn { table, column },
            Statement::ModifyColumn { table, from, to } => Statement::ModifyColumn {
                table,
                from: to,
                to: from,
            },
            Statement::CreateIndex { table, index } => Statement::DropIndex { table, index },
            Statement::DropIndex { table, index } => Statement::CreateIndex { table, index },
        }
    }

    /// Apply the change to an in-memory schema
    pub fn apply(&self, schema: &mut VirtualSchema) -> Result<()> {
        match self {
            Statement::CreateTable { table } => {
                if !schema.tables.push(table.clone()) {
                    return Err(MigrationError::DuplicateTable(table.name.clone()));
                }
            }
            Statement::DropTable { table } => {
                schema
                    .tables
                    .delete(&table.name)
                    .ok_or_else(|| MigrationError::MissingTable(table.name.clone()))?;
            }
            Statement::AddColumn { table, column } => {
                if !table_mut(schema, table)?.columns.push(column.clone()) {
                    return Err(MigrationError::DuplicateColumn {
                        table: table.clone(),
                        column: column.name.clone(),
                    });
                }
            }
            Statement::DropColumn { table, column } => {
                table_mut(schema, table)?
                    .columns
                    .delete(&column.name)
                    .ok_or_else(|| MigrationError::MissingColumn {
                        table: table.clone(),
                        column: column.name.clone(),
                    })?;
            }
            Statement::ModifyColumn { table, from, to } => {
                let target = table_mut(schema, table)?;
                if from.name != to.name || !target.columns.contains(&from.name) {
                    return Err(MigrationError::MissingColumn {
                        table: table.clone(),
                        column: from.name.clone(),
                    });
                }
                target.columns.replace(to.clone());
            }
            Statement::CreateIndex { table, index } => {
                if !table_mut(schema, table)?.indices.push(index.clone()) {
                    return Err(MigrationError::DuplicateIndex {
                        table: table.clone(),
                        index: index.name.clone(),
                    });
                }
            }
            Statement::DropIndex { table, index } => {
                table_mut(schema, table)?
                    .indices
                    .delete(&index.name)
                    .ok_or_else(|| MigrationError::MissingIndex {
                        table: table.clone(),
                        index: index.name.clone(),
                    })?;
            }
        }
        Ok(())
    }

    /// Render the statement against `before`, the schema it applies to
    pub fn to_sql(&self, dialect: Dialect, before: &VirtualSchema) -> Result<Vec<String>> {
        let sql = match self {
            Statement::CreateTable { table } => {
                let mut sql = vec![ddl::create_table(dialect, table)];
                sql.extend(
                    table
                        .indices
                        .iter()
                        .map(|index| ddl::create_index(dialect, table, index)),
                );
                sql
            }
            Statement::DropTable { table } => vec![ddl::drop_table(dialect, table)],
            Statement::AddColumn { table, column } => {
                ddl::add_column(dialect, table_ref(before, table)?, column)
            }
            Statement::DropColumn { table, column } => {
                ddl::drop_column(dialect, table_ref(before, table)?, column)
            }
            Statement::ModifyColumn { table, from, to } => {
                ddl::modify_column(dialect, table_ref(before, table)?, from, to)
            }
            Statement::CreateIndex { table, index } => {
                vec![ddl::create_index(dialect, table_ref(before, table)?, index)]
            }
            Statement::DropIndex { table, index } => {
                vec![ddl::drop_index(dialect, table_ref(before, table)?, index)]
            }
        };
        Ok(sql)
    }
}

fn table_ref<'a>(schema: &'a VirtualSchema, name: &str) -> Result<&'a VirtualTable> {
    schema
        .table(name)
        .ok_or_else(|| MigrationError::MissingTable(name.to_string()))
}

fn table_mut<'a>(schema: &'a mut VirtualSchema, name: &str) -> Result<&'a mut VirtualTable> {
    schema
        .tables
        .get_mut(name)
        .ok_or_else(|| MigrationError::MissingTable(name.to_string()))
}
