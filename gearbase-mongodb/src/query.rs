//! Translation from gearbase filter expressions to MongoDB filter documents.

use bson::{Bson, Document, doc};

use gearbase_core::{error::StoreError, query::QueryVisitor};

use crate::sanitizer::KeySanitizer;

/// Translates filter expressions into MongoDB's native BSON query syntax.
///
/// Field names go through the same escaping as stored keys, so a filter on a
/// dotted or `$`-prefixed key addresses the stored field rather than a path
/// or an operator.
pub(crate) struct MongoQueryTranslator;

impl QueryVisitor for MongoQueryTranslator {
    type Output = Document;
    type Error = StoreError;

    fn visit_eq(&mut self, field: &str, value: &Bson) -> Result<Self::Output, Self::Error> {
        let key = KeySanitizer::sanitize_key(field);

        Ok(doc! {
            key: { "$eq": value.clone() },
        })
    }
}
