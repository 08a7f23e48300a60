//! Filter evaluation for in-memory document filtering.
//!
//! Evaluates [`Expr`] trees against stored BSON documents the way MongoDB's
//! `$eq` does:
//!
//! - numbers compare by value regardless of their BSON width, integers exactly
//! - embedded documents are equal only with the same keys in the same order
//! - an array field matches when the whole array or any element is equal
//! - a missing field never matches

use bson::{Bson, Document, datetime::DateTime, oid::ObjectId};

use gearbase_core::{
    error::StoreError,
    query::{Expr, QueryVisitor},
};

/// Type-erased, comparable representation of BSON values.
#[derive(Debug)]
pub(crate) enum Comparable<'a> {
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
    DateTime(DateTime),
    ObjectId(ObjectId),
    String(&'a str),
    Array(Vec<Comparable<'a>>),
    /// Embedded document, in stored key order.
    Map(Vec<(&'a str, Comparable<'a>)>),
    /// Types without a defined equality (binary, regex, ...). Never equal.
    Opaque,
}

impl<'a> From<&'a Bson> for Comparable<'a> {
    fn from(bson: &'a Bson) -> Self {
        match bson {
            Bson::Null => Comparable::Null,
            Bson::Boolean(value) => Comparable::Bool(*value),
            Bson::Int32(value) => Comparable::Int(i64::from(*value)),
            Bson::Int64(value) => Comparable::Int(*value),
            Bson::Double(value) => Comparable::Double(*value),
            Bson::DateTime(value) => Comparable::DateTime(*value),
            Bson::ObjectId(value) => Comparable::ObjectId(*value),
            Bson::String(value) => Comparable::String(value),
            Bson::Array(arr) => Comparable::Array(arr.iter().map(Comparable::from).collect()),
            Bson::Document(doc) => Comparable::Map(
                doc.iter()
                    .map(|(k, v)| (k.as_str(), Comparable::from(v)))
                    .collect(),
            ),
            _ => Comparable::Opaque,
        }
    }
}

/// Exact comparison of an integer with a double.
fn int_equals_double(int: i64, double: f64) -> bool {
    // 2^63 is exactly representable; anything at or beyond it cannot be an i64.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;

    double.fract() == 0.0 && (-LIMIT..LIMIT).contains(&double) && double as i64 == int
}

impl<'a> PartialEq for Comparable<'a> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Comparable::Null, Comparable::Null) => true,
            (Comparable::Bool(a), Comparable::Bool(b)) => a == b,
            (Comparable::Int(a), Comparable::Int(b)) => a == b,
            (Comparable::Double(a), Comparable::Double(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Comparable::Int(a), Comparable::Double(b))
            | (Comparable::Double(b), Comparable::Int(a)) => int_equals_double(*a, *b),
            (Comparable::DateTime(a), Comparable::DateTime(b)) => a == b,
            (Comparable::ObjectId(a), Comparable::ObjectId(b)) => a == b,
            (Comparable::String(a), Comparable::String(b)) => a == b,
            (Comparable::Array(a), Comparable::Array(b)) => a == b,
            (Comparable::Map(a), Comparable::Map(b)) => a == b,
            _ => false,
        }
    }
}

/// Evaluates filter expressions against a single document.
pub(crate) struct DocumentEvaluator<'a> {
    document: &'a Document,
}

impl<'a> DocumentEvaluator<'a> {
    pub fn new(document: &'a Document) -> Self {
        Self { document }
    }

    pub fn matches(document: &'a Document, expr: &Expr) -> bool {
        DocumentEvaluator::new(document)
            .visit_expr(expr)
            .unwrap_or(false)
    }
}

impl<'a> QueryVisitor for DocumentEvaluator<'a> {
    type Output = bool;
    type Error = StoreError;

    fn visit_eq(&mut self, field: &str, value: &Bson) -> Result<Self::Output, Self::Error> {
        let Some(field_value) = self.document.get(field) else {
            return Ok(false);
        };

        let expected = Comparable::from(value);
        if Comparable::from(field_value) == expected {
            return Ok(true);
        }

        Ok(match field_value {
            Bson::Array(items) => items.iter().any(|item| Comparable::from(item) == expected),
            _ => false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;
    use gearbase_core::query::Filter;

    #[test]
    fn equality_on_strings() {
        let document = doc! { "userEmail": "a@x.com", "name": "Ball" };

        assert!(DocumentEvaluator::matches(&document, &Filter::eq("userEmail", "a@x.com")));
        assert!(!DocumentEvaluator::matches(&document, &Filter::eq("userEmail", "b@x.com")));
    }

    #[test]
    fn missing_field_never_matches() {
        let document = doc! { "name": "Ball" };

        assert!(!DocumentEvaluator::matches(&document, &Filter::eq("userEmail", "a@x.com")));
        assert!(!DocumentEvaluator::matches(&document, &Filter::eq("userEmail", Bson::Null)));
    }

    #[test]
    fn numbers_compare_across_widths() {
        let document = doc! { "quantity": 3_i64, "price": 2.0 };

        assert!(DocumentEvaluator::matches(&document, &Filter::eq("quantity", 3)));
        assert!(DocumentEvaluator::matches(&document, &Filter::eq("quantity", 3.0)));
        assert!(DocumentEvaluator::matches(&document, &Filter::eq("price", 2)));
        assert!(!DocumentEvaluator::matches(&document, &Filter::eq("price", 2.5)));
    }

    #[test]
    fn large_integers_compare_exactly() {
        let big = 9_007_199_254_740_993_i64; // 2^53 + 1
        let document = doc! { "serial": big };

        assert!(DocumentEvaluator::matches(&document, &Filter::eq("serial", big)));
        assert!(!DocumentEvaluator::matches(&document, &Filter::eq("serial", big - 1)));
        assert!(!DocumentEvaluator::matches(&document, &Filter::eq("serial", big as f64)));
    }

    #[test]
    fn array_field_matches_any_element() {
        let document = doc! { "tags": ["outdoor", "racket"] };

        assert!(DocumentEvaluator::matches(&document, &Filter::eq("tags", "racket")));
        assert!(DocumentEvaluator::matches(
            &document,
            &Filter::eq("tags", vec![Bson::from("outdoor"), Bson::from("racket")])
        ));
        assert!(!DocumentEvaluator::matches(&document, &Filter::eq("tags", "indoor")));
    }

    #[test]
    fn nested_documents_compare_in_key_order() {
        let document = doc! { "specs": { "weight": 300, "strung": true } };
        let same = Bson::Document(doc! { "weight": 300_i64, "strung": true });
        let reordered = Bson::Document(doc! { "strung": true, "weight": 300 });

        assert!(DocumentEvaluator::matches(&document, &Filter::eq("specs", same)));
        assert!(!DocumentEvaluator::matches(&document, &Filter::eq("specs", reordered)));
    }
}
