//! Query, filter and update construction for document stores.
//!
//! Filters are a small expression tree ([`Expr`]) that each backend either evaluates
//! directly (in-memory) or translates into its native syntax (MongoDB) through a
//! [`QueryVisitor`].
//!
//! ```ignore
//! use storekit::query::{Filter, Query, Update};
//!
//! let query = Query::filtered(
//!     Filter::eq("name", "Holberton school").and(Filter::includes("topics", "Python")),
//! );
//!
//! let update = Update::set("topics", vec!["Sys admin", "AI"]);
//! ```

use bson::{Bson, Document as Fields};

use crate::error::StoreError;

/// Field comparison operators for filter expressions.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldOp {
    /// Equal to (exact match). On an array field, matches if any element is equal.
    Eq,
    /// Array field has an element exactly equal to the value.
    Includes,
}

/// A filter expression for querying documents.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Logical AND of multiple expressions (all must match).
    And(Vec<Expr>),
    /// Field comparison expression.
    Field {
        /// The field name to compare.
        field: String,
        /// The comparison operator.
        op: FieldOp,
        /// The value to compare against.
        value: Bson,
    },
}

impl Expr {
    /// Creates a field comparison expression.
    pub fn field(field: String, op: FieldOp, value: Bson) -> Self {
        Expr::Field { field, op, value }
    }

    /// Combines this expression with another using logical AND.
    ///
    /// If this expression is already an AND, the other expression is appended.
    pub fn and(self, other: Expr) -> Self {
        match self {
            Expr::And(mut list) => {
                list.push(other);
                Expr::And(list)
            }
            _ => Expr::And(vec![self, other]),
        }
    }
}

/// A find query. Without a filter it matches every document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filter: Option<Expr>,
}

impl Query {
    /// Creates a query matching every document.
    pub fn new() -> Self {
        Query::default()
    }

    /// Creates a query with a filter.
    pub fn filtered(filter: Expr) -> Self {
        Query { filter: Some(filter) }
    }
}

/// Static constructors for filter expressions.
///
/// ```ignore
/// use storekit::query::Filter;
///
/// let expr = Filter::eq("name", "Holberton school")
///     .and(Filter::includes("topics", "AI"));
/// ```
pub struct Filter;

impl Filter {
    /// Matches documents where the field equals the value.
    pub fn eq(field: impl Into<String>, value: impl Into<Bson>) -> Expr {
        Expr::field(field.into(), FieldOp::Eq, value.into())
    }

    /// Matches documents whose array field has an element exactly equal to the value.
    ///
    /// This is plain membership, not substring or pattern matching.
    pub fn includes(field: impl Into<String>, value: impl Into<Bson>) -> Expr {
        Expr::field(field.into(), FieldOp::Includes, value.into())
    }

    /// Combines expressions so that all must match.
    pub fn and(exprs: impl IntoIterator<Item = Expr>) -> Expr {
        Expr::And(exprs.into_iter().collect())
    }
}

/// A field overwrite applied to every matching document (`$set` semantics).
///
/// Fields are applied in insertion order; fields not named are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Update {
    set: Fields,
}

impl Update {
    /// Creates an update that overwrites a single field.
    pub fn set(field: impl Into<String>, value: impl Into<Bson>) -> Self {
        Update::default().and_set(field, value)
    }

    /// Adds another field overwrite to this update.
    pub fn and_set(mut self, field: impl Into<String>, value: impl Into<Bson>) -> Self {
        self.set.insert(field.into(), value.into());
        self
    }

    /// Returns the fields to overwrite.
    pub fn fields(&self) -> &Fields {
        &self.set
    }

    /// Returns `true` if the update overwrites nothing.
    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }
}

/// Outcome of an update: how many documents matched and how many actually changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub matched: u64,
    pub modified: u64,
}

pub trait QueryVisitor {
    type Output;
    type Error: Into<StoreError>;

    fn visit_and(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error>;
    fn visit_field(
        &mut self,
        field: &str,
        op: &FieldOp,
        value: &Bson,
    ) -> Result<Self::Output, Self::Error>;

    fn visit_expr(&mut self, expr: &Expr) -> Result<Self::Output, Self::Error> {
        match expr {
            Expr::And(exprs) => self.visit_and(exprs),
            Expr::Field { field, op, value } => self.visit_field(field, op, value),
        }
    }
}
