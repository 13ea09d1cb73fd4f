//! Database session: a registry bound to an executor.

use std::sync::Arc;

use crate::entity::{Entity, KeyValues};
use crate::error::{Error, Operation, Result};
use crate::query::TypedQuery;
use crate::registry::Registry;
use crate::sql::{SQL, Token};
use crate::value::Value;

/// Runs lowered SQL against a connection.
///
/// Parameters are bound positionally in the order [`SQL::params`] yields them.
pub trait Executor {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Run a query and return every row as values in selection order.
    fn fetch(&self, sql: &SQL) -> std::result::Result<Vec<Vec<Value>>, Self::Error>;

    /// Run a statement and return the number of affected rows.
    fn execute(&self, sql: &SQL) -> std::result::Result<usize, Self::Error>;
}

impl<E: Executor + ?Sized> Executor for &E {
    type Error = E::Error;

    fn fetch(&self, sql: &SQL) -> std::result::Result<Vec<Vec<Value>>, Self::Error> {
        (**self).fetch(sql)
    }

    fn execute(&self, sql: &SQL) -> std::result::Result<usize, Self::Error> {
        (**self).execute(sql)
    }
}

/// Entry point for queries and modifications.
///
/// ```ignore
/// let db = Database::new(registry, Sqlite::new(conn));
/// let names = db.all::<Company>()?.map_single(|c, _| c.name()).to_list(&db)?;
/// ```
#[derive(Debug, Clone)]
pub struct Database<E> {
    registry: Registry,
    executor: E,
}

impl<E: Executor> Database<E> {
    pub fn new(registry: Registry, executor: E) -> Self {
        Self { registry, executor }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn into_inner(self) -> E {
        self.executor
    }

    /// Every row of `E`. See [`Registry::all`].
    pub fn all<T: Entity>(&self) -> Result<TypedQuery<T::Columns, T>> {
        self.registry.all::<T>()
    }

    /// Point lookup by primary key.
    ///
    /// Fails with [`Error::NotFound`] on no match and [`Error::Cardinality`]
    /// when more than one row shares the key.
    pub fn find<T: Entity>(&self, key: &T::Key) -> Result<T> {
        self.registry.table::<T>()?;
        let query = TypedQuery::<T::Columns, T>::from_table().with_key(key);
        let mut rows = query.fetch_bounded(self, Some(2), Operation::LazyResolve)?;
        match rows.len() {
            0 => Err(Error::NotFound),
            1 => rows.pop().ok_or(Error::NotFound),
            _ => Err(Error::Cardinality),
        }
    }

    /// Insert one row. Auto-increment columns are left to the database.
    pub fn insert<T: Entity>(&self, value: &T) -> Result<usize> {
        let sql = self.insert_sql(value)?;
        crate::typeq_trace_modify!("insert", std::any::type_name::<T>());
        self.execute_as(&sql, Operation::Modify)
    }

    pub fn insert_all<'a, T, I>(&self, values: I) -> Result<usize>
    where
        T: Entity + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        let mut inserted = 0;
        for value in values {
            inserted += self.insert(value)?;
        }
        Ok(inserted)
    }

    /// Insert one row and read back its primary key, including generated values.
    pub fn insert_returning_key<T: Entity>(&self, value: &T) -> Result<T::Key> {
        let descriptor = &self.registry.table::<T>()?.descriptor;
        let returning = SQL::join(
            descriptor
                .primary_key
                .iter()
                .map(|name| SQL::ident(name.clone())),
            Token::COMMA,
        );
        let sql = self
            .insert_sql(value)?
            .push(Token::RETURNING)
            .append(returning);

        crate::typeq_trace_modify!("insert", descriptor.name);
        let rows = self.fetch_as(&sql, Operation::Modify)?;
        let row = rows.into_iter().next().ok_or(Error::NotFound)?;
        T::Key::from_values(&row)
    }

    /// Overwrite every non-key column of the row with `value`'s key.
    ///
    /// Returns the number of rows updated, zero when no row has the key.
    pub fn update<T: Entity>(&self, value: &T) -> Result<usize> {
        let descriptor = &self.registry.table::<T>()?.descriptor;
        let values = checked_split(descriptor, value)?;

        let assignments: Vec<SQL> = descriptor
            .columns
            .iter()
            .zip(&values)
            .filter(|(column, _)| !descriptor.is_primary_key(&column.name))
            .map(|(column, value)| {
                SQL::ident(column.name.clone())
                    .push(Token::EQ)
                    .append(SQL::param(value.clone()))
            })
            .collect();
        if assignments.is_empty() {
            return Ok(0);
        }

        let key = SQL::join(
            descriptor
                .primary_key
                .iter()
                .zip(value.key().to_values())
                .map(|(name, value)| {
                    SQL::ident(name.clone())
                        .push(Token::EQ)
                        .append(SQL::param(value))
                }),
            Token::AND,
        );

        let sql = SQL::token(Token::UPDATE)
            .append(table_sql(descriptor))
            .push(Token::SET)
            .append(SQL::join(assignments, Token::COMMA))
            .push(Token::WHERE)
            .append(key);

        crate::typeq_trace_modify!("update", descriptor.name);
        self.execute_as(&sql, Operation::Modify)
    }

    /// Run a raw statement.
    pub fn execute(&self, sql: &SQL) -> Result<usize> {
        self.execute_as(sql, Operation::Execute)
    }

    fn insert_sql<T: Entity>(&self, value: &T) -> Result<SQL> {
        let descriptor = &self.registry.table::<T>()?.descriptor;
        let values = checked_split(descriptor, value)?;

        let (names, params): (Vec<SQL>, Vec<SQL>) = descriptor
            .columns
            .iter()
            .zip(values)
            .filter(|(column, _)| !column.auto_increment)
            .map(|(column, value)| (SQL::ident(column.name.clone()), SQL::param(value)))
            .unzip();

        Ok(SQL::token(Token::INSERT_INTO)
            .append(table_sql(descriptor))
            .append(SQL::join(names, Token::COMMA).parens())
            .push(Token::VALUES)
            .append(SQL::join(params, Token::COMMA).parens()))
    }

    pub(crate) fn fetch_as(&self, sql: &SQL, operation: Operation) -> Result<Vec<Vec<Value>>> {
        crate::typeq_trace_query!(sql.sql(), sql.params().count());
        self.executor
            .fetch(sql)
            .map_err(|e| Error::driver(operation, e))
    }

    fn execute_as(&self, sql: &SQL, operation: Operation) -> Result<usize> {
        crate::typeq_trace_query!(sql.sql(), sql.params().count());
        self.executor
            .execute(sql)
            .map_err(|e| Error::driver(operation, e))
    }
}

fn table_sql(descriptor: &typeq_types::TableDescriptor) -> SQL {
    crate::join::TableName::of(descriptor).to_sql()
}

fn checked_split<T: Entity>(
    descriptor: &typeq_types::TableDescriptor,
    value: &T,
) -> Result<Vec<Value>> {
    let values = value.split();
    if values.len() != descriptor.columns.len() {
        return Err(Error::Mapping(format!(
            "`{}` has {} column(s) but the entity split into {} value(s)",
            descriptor.name,
            descriptor.columns.len(),
            values.len()
        )));
    }
    Ok(values)
}

/// Shared handle, for executors that several sessions use together.
impl<E: Executor + ?Sized> Executor for Arc<E> {
    type Error = E::Error;

    fn fetch(&self, sql: &SQL) -> std::result::Result<Vec<Vec<Value>>, Self::Error> {
        (**self).fetch(sql)
    }

    fn execute(&self, sql: &SQL) -> std::result::Result<usize, Self::Error> {
        (**self).execute(sql)
    }
}
