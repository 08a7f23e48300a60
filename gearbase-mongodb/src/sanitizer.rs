//! Field name escaping for MongoDB compatibility.
//!
//! Caller-supplied documents may use any key. MongoDB reads keys containing
//! dots as paths and keys starting with `$` as operators, and rejects NUL
//! bytes outright. Keys are percent-escaped before they are written and
//! decoded when documents are read back:
//!
//! | character | escaped as |
//! |-----------|------------|
//! | `%`       | `%25`      |
//! | `.`       | `%2E`      |
//! | `$`       | `%24`      |
//! | NUL       | `%00`      |
//!
//! Because `%` itself is escaped, distinct keys never escape to the same
//! name and decoding always yields the key that was written. Values are left
//! untouched, which keeps equality filters on plain values (such as an owner
//! email) working without translation.

use bson::{Bson, Document};

pub(crate) struct KeySanitizer;

impl KeySanitizer {
    const ESCAPES: [(char, &'static str); 4] = [
        ('%', "%25"),
        ('.', "%2E"),
        ('$', "%24"),
        ('\0', "%00"),
    ];

    /// Escapes every key in `document`, recursing into nested documents and arrays.
    pub(crate) fn sanitize_document(document: Document) -> Document {
        document
            .into_iter()
            .map(|(k, v)| (Self::sanitize_key(&k), Self::sanitize_value(v)))
            .collect()
    }

    fn sanitize_value(value: Bson) -> Bson {
        match value {
            Bson::Array(arr) => Bson::Array(arr.into_iter().map(Self::sanitize_value).collect()),
            Bson::Document(doc) => Bson::Document(Self::sanitize_document(doc)),
            other => other,
        }
    }

    pub(crate) fn sanitize_key(input: &str) -> String {
        let mut sanitized = String::with_capacity(input.len());
        for ch in input.chars() {
            match Self::ESCAPES.iter().find(|(target, _)| *target == ch) {
                Some((_, escaped)) => sanitized.push_str(escaped),
                None => sanitized.push(ch),
            }
        }
        sanitized
    }

    /// Reverts [`sanitize_document`](Self::sanitize_document) on a document read from MongoDB.
    pub(crate) fn restore_document(document: Document) -> Document {
        document
            .into_iter()
            .map(|(k, v)| (Self::restore_key(&k), Self::restore_value(v)))
            .collect()
    }

    fn restore_value(value: Bson) -> Bson {
        match value {
            Bson::Array(arr) => Bson::Array(arr.into_iter().map(Self::restore_value).collect()),
            Bson::Document(doc) => Bson::Document(Self::restore_document(doc)),
            other => other,
        }
    }

    /// A `%` not followed by a known escape is kept as is.
    fn restore_key(input: &str) -> String {
        let mut restored = String::with_capacity(input.len());
        let mut rest = input;

        while let Some(pos) = rest.find('%') {
            restored.push_str(&rest[..pos]);
            let tail = &rest[pos..];

            match Self::ESCAPES.iter().find(|(_, escaped)| tail.starts_with(escaped)) {
                Some((target, escaped)) => {
                    restored.push(*target);
                    rest = &tail[escaped.len()..];
                }
                None => {
                    restored.push('%');
                    rest = &tail[1..];
                }
            }
        }

        restored.push_str(rest);
        restored
    }
}
