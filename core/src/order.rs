use crate::sql::SQL;

/// Direction and null placement of one ordering key.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortOrder {
    ASC,
    DESC,
    ASC_NULLS_FIRST,
    DESC_NULLS_FIRST,
    ASC_NULLS_LAST,
    DESC_NULLS_LAST,
}

impl SortOrder {
    /// The ordering that yields rows in the opposite sequence.
    ///
    /// Nulls stay on the same side of the result: nulls-last ascending become
    /// nulls-first descending. `reversed` is an involution.
    ///
    /// ```
    /// use typeq_core::SortOrder;
    ///
    /// assert_eq!(SortOrder::ASC_NULLS_LAST.reversed(), SortOrder::DESC_NULLS_FIRST);
    /// assert_eq!(SortOrder::DESC.reversed().reversed(), SortOrder::DESC);
    /// ```
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            SortOrder::ASC => SortOrder::DESC,
            SortOrder::DESC => SortOrder::ASC,
            SortOrder::ASC_NULLS_FIRST => SortOrder::DESC_NULLS_LAST,
            SortOrder::DESC_NULLS_FIRST => SortOrder::ASC_NULLS_LAST,
            SortOrder::ASC_NULLS_LAST => SortOrder::DESC_NULLS_FIRST,
            SortOrder::DESC_NULLS_LAST => SortOrder::ASC_NULLS_FIRST,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            SortOrder::ASC => "ASC",
            SortOrder::DESC => "DESC",
            SortOrder::ASC_NULLS_FIRST => "ASC NULLS FIRST",
            SortOrder::DESC_NULLS_FIRST => "DESC NULLS FIRST",
            SortOrder::ASC_NULLS_LAST => "ASC NULLS LAST",
            SortOrder::DESC_NULLS_LAST => "DESC NULLS LAST",
        }
    }

    pub(crate) fn apply(self, key: SQL) -> SQL {
        key.append(SQL::raw(self.as_str()))
    }
}
