//! Filter expressions for listing documents.
//!
//! Filters are a small expression tree evaluated by each backend through the
//! [`QueryVisitor`] trait: the MongoDB backend translates them into a filter
//! document, the in-memory backend evaluates them against stored documents.
//!
//! ```ignore
//! use gearbase_core::query::Filter;
//!
//! let expr = Filter::eq("userEmail", "a@x.com");
//! ```

use bson::Bson;

use crate::error::StoreError;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// The field must be present and equal to the value.
    Eq { field: String, value: Bson },
}

/// Constructors for filter expressions.
pub struct Filter;

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<Bson>) -> Expr {
        Expr::Eq {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// Visitor over filter expressions, implemented once per backend.
pub trait QueryVisitor {
    type Output;
    type Error: Into<StoreError>;

    fn visit_eq(&mut self, field: &str, value: &Bson) -> Result<Self::Output, Self::Error>;

    fn visit_expr(&mut self, expr: &Expr) -> Result<Self::Output, Self::Error> {
        match expr {
            Expr::Eq { field, value } => self.visit_eq(field, value),
        }
    }
}
