//! DDL rendering for SQLite and PostgreSQL
//!
//! Every function renders statements against the table as it stands before
//! the change. SQLite cannot alter a column in place, so column changes it
//! cannot express directly rebuild the table under a temporary name.

use typeq_types::Dialect;

use crate::schema::{VirtualColumn, VirtualIndex, VirtualTable};

fn quote(dialect: Dialect, name: &str) -> String {
    match dialect {
        Dialect::SQLite => format!("`{name}`"),
        Dialect::PostgreSQL => format!("\"{name}\""),
    }
}

fn quote_list(dialect: Dialect, names: impl IntoIterator<Item = impl AsRef<str>>) -> String {
    names
        .into_iter()
        .map(|name| quote(dialect, name.as_ref()))
        .collect::<Vec<_>>()
        .join(", ")
}

fn table_ref(dialect: Dialect, schema: Option<&str>, name: &str) -> String {
    match schema {
        Some(schema) if dialect == Dialect::PostgreSQL => {
            format!("{}.{}", quote(dialect, schema), quote(dialect, name))
        }
        _ => quote(dialect, name),
    }
}

fn qualified(dialect: Dialect, table: &VirtualTable) -> String {
    table_ref(dialect, table.schema.as_deref(), &table.name)
}

/// A group of reference columns pointing at one target table
struct ForeignKeyGroup<'a> {
    target: &'a str,
    columns: Vec<&'a str>,
    target_columns: Vec<&'a str>,
}

/// Groups referencing columns into constraints, in declaration order.
///
/// Columns pointing at the same table share a constraint until a target
/// column repeats, which starts the next constraint for that table.
fn foreign_key_groups(table: &VirtualTable) -> Vec<ForeignKeyGroup<'_>> {
    let mut groups: Vec<ForeignKeyGroup<'_>> = Vec::new();
    for column in &table.columns {
        let Some(reference) = &column.references else {
            continue;
        };
        let open = groups.iter_mut().find(|group| {
            group.target == reference.table
                && !group.target_columns.contains(&reference.column.as_str())
        });
        match open {
            Some(group) => {
                group.columns.push(column.name.as_str());
                group.target_columns.push(reference.column.as_str());
            }
            None => groups.push(ForeignKeyGroup {
                target: reference.table.as_str(),
                columns: vec![column.name.as_str()],
                target_columns: vec![reference.column.as_str()],
            }),
        }
    }
    groups
}

fn column_definition(dialect: Dialect, table: &VirtualTable, column: &VirtualColumn) -> String {
    let inline_pk = table.primary_key.len() == 1 && table.primary_key[0] == column.name;
    let mut parts = vec![
        quote(dialect, &column.name),
        column.column_type.sql_type(dialect),
    ];

    match dialect {
        Dialect::SQLite => {
            if inline_pk {
                parts.push("PRIMARY KEY".to_string());
                if column.auto_increment && column.column_type.is_integer() {
                    parts.push("AUTOINCREMENT".to_string());
                }
            }
        }
        Dialect::PostgreSQL => {
            if inline_pk {
                parts.push("PRIMARY KEY".to_string());
            }
            if column.auto_increment {
                parts.push("GENERATED BY DEFAULT AS IDENTITY".to_string());
            }
        }
    }

    if let Some(default) = &column.default {
        parts.push(format!("DEFAULT {default}"));
    }
    // An integer primary key in SQLite is the rowid and never null.
    let implied = inline_pk && (dialect == Dialect::PostgreSQL || column.column_type.is_integer());
    if !column.nullable && !implied {
        parts.push("NOT NULL".to_string());
    }
    parts.join(" ")
}

pub(crate) fn create_table(dialect: Dialect, table: &VirtualTable) -> String {
    let mut lines: Vec<String> = table
        .columns
        .iter()
        .map(|column| format!("\t{}", column_definition(dialect, table, column)))
        .collect();

    if table.primary_key.len() > 1 {
        lines.push(format!(
            "\tPRIMARY KEY({})",
            quote_list(dialect, &table.primary_key)
        ));
    }

    for group in foreign_key_groups(table) {
        let name = format!(
            "{}_{}_{}_fk",
            table.name,
            group.columns.join("_"),
            group.target
        );
        lines.push(format!(
            "\tCONSTRAINT {} FOREIGN KEY ({}) REFERENCES {}({})",
            quote(dialect, &name),
            quote_list(dialect, &group.columns),
            table_ref(dialect, table.schema.as_deref(), group.target),
            quote_list(dialect, &group.target_columns),
        ));
    }

    format!(
        "CREATE TABLE {} (\n{}\n);",
        qualified(dialect, table),
        lines.join(",\n")
    )
}

pub(crate) fn drop_table(dialect: Dialect, table: &VirtualTable) -> String {
    format!("DROP TABLE {};", qualified(dialect, table))
}

/// `table` is the table before the column is added.
pub(crate) fn add_column(dialect: Dialect, table: &VirtualTable, column: &VirtualColumn) -> Vec<String> {
    // SQLite rejects NOT NULL columns without a default on ADD COLUMN.
    if dialect == Dialect::SQLite && !column.nullable && column.default.is_none() {
        let mut after = table.clone();
        after.columns.push(column.clone());
        return recreate_table(table, &after);
    }

    let mut definition = column_definition(dialect, table, column);
    if let Some(reference) = &column.references {
        definition.push_str(&format!(
            " REFERENCES {}({})",
            table_ref(dialect, table.schema.as_deref(), &reference.table),
            quote(dialect, &reference.column)
        ));
    }
    vec![format!(
        "ALTER TABLE {} ADD COLUMN {definition};",
        qualified(dialect, table)
    )]
}

/// `table` is the table before the column is dropped.
pub(crate) fn drop_column(dialect: Dialect, table: &VirtualTable, column: &VirtualColumn) -> Vec<String> {
    // SQLite cannot drop a column that takes part in a constraint.
    let constrained = column.references.is_some()
        || table.primary_key.contains(&column.name)
        || table
            .indices
            .iter()
            .any(|index| index.columns.contains(&column.name));
    if dialect == Dialect::SQLite && constrained {
        let mut after = table.clone();
        after.columns.delete(&column.name);
        return recreate_table(table, &after);
    }

    vec![format!(
        "ALTER TABLE {} DROP COLUMN {};",
        qualified(dialect, table),
        quote(dialect, &column.name)
    )]
}

/// `table` is the table before `from` is replaced by `to`.
pub(crate) fn modify_column(
    dialect: Dialect,
    table: &VirtualTable,
    from: &VirtualColumn,
    to: &VirtualColumn,
) -> Vec<String> {
    if dialect == Dialect::SQLite {
        let mut after = table.clone();
        after.columns.replace(to.clone());
        return recreate_table(table, &after);
    }

    let prefix = format!(
        "ALTER TABLE {} ALTER COLUMN {}",
        qualified(dialect, table),
        quote(dialect, &to.name)
    );
    let mut statements = Vec::new();
    if from.nullable != to.nullable {
        let action = if to.nullable { "DROP" } else { "SET" };
        statements.push(format!("{prefix} {action} NOT NULL;"));
    }
    if from.default != to.default {
        match &to.default {
            Some(default) => statements.push(format!("{prefix} SET DEFAULT {default};")),
            None => statements.push(format!("{prefix} DROP DEFAULT;")),
        }
    }
    if from.auto_increment != to.auto_increment {
        if to.auto_increment {
            statements.push(format!("{prefix} ADD GENERATED BY DEFAULT AS IDENTITY;"));
        } else {
            statements.push(format!("{prefix} DROP IDENTITY;"));
        }
    }
    statements
}

pub(crate) fn create_index(dialect: Dialect, table: &VirtualTable, index: &VirtualIndex) -> String {
    let unique = if index.unique { "UNIQUE " } else { "" };
    format!(
        "CREATE {unique}INDEX {} ON {} ({});",
        quote(dialect, &index.name),
        qualified(dialect, table),
        quote_list(dialect, &index.columns)
    )
}

pub(crate) fn drop_index(dialect: Dialect, table: &VirtualTable, index: &VirtualIndex) -> String {
    format!(
        "DROP INDEX {};",
        table_ref(dialect, table.schema.as_deref(), &index.name)
    )
}

/// SQLite table rebuild: copy shared columns into a fresh table, swap it in,
/// then restore the indices the drop removed.
fn recreate_table(before: &VirtualTable, after: &VirtualTable) -> Vec<String> {
    let dialect = Dialect::SQLite;
    let temporary = format!("__new_{}", after.name);

    let shared: Vec<&str> = after
        .columns
        .iter()
        .filter(|column| before.columns.contains(&column.name))
        .map(|column| column.name.as_str())
        .collect();
    let shared = quote_list(dialect, shared);

    let mut staged = after.clone();
    staged.name = temporary.clone();

    let mut statements = vec![
        "PRAGMA foreign_keys=OFF;".to_string(),
        create_table(dialect, &staged),
        format!(
            "INSERT INTO {}({shared}) SELECT {shared} FROM {};",
            quote(dialect, &temporary),
            quote(dialect, &before.name)
        ),
        format!("DROP TABLE {};", quote(dialect, &before.name)),
        format!(
            "ALTER TABLE {} RENAME TO {};",
            quote(dialect, &temporary),
            quote(dialect, &after.name)
        ),
        "PRAGMA foreign_keys=ON;".to_string(),
    ];
    statements.extend(
        after
            .indices
            .iter()
            .filter(|index| index.columns.iter().all(|c| after.columns.contains(c)))
            .map(|index| create_index(dialect, after, index)),
    );
    statements
}
