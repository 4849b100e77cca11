//! Query expression evaluation for in-memory document filtering.
//!
//! Matching follows MongoDB's rules for the operators storekit exposes: `Eq` against an
//! array field matches any element, numbers compare across integer and float types, and
//! `Includes` is exact element membership in an array field.

use bson::{Bson, Document as Fields, datetime::DateTime, oid::ObjectId};
use std::collections::HashMap;

use storekit_core::{
    error::{StoreError, StoreResult},
    query::{Expr, FieldOp, QueryVisitor},
};

/// Comparable view of a BSON value.
#[derive(Debug)]
pub(crate) enum Comparable<'a> {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    DateTime(DateTime),
    ObjectId(ObjectId),
    String(&'a str),
    Array(Vec<Comparable<'a>>),
    Map(HashMap<&'a str, Comparable<'a>>),
    /// Types with no meaningful comparison (binary, regex, ...)
    Opaque,
}

impl<'a> From<&'a Bson> for Comparable<'a> {
    fn from(bson: &'a Bson) -> Self {
        match bson {
            Bson::Null => Comparable::Null,
            Bson::Boolean(value) => Comparable::Bool(*value),
            Bson::Int32(value) => Comparable::Int(i64::from(*value)),
            Bson::Int64(value) => Comparable::Int(*value),
            Bson::Double(value) => Comparable::Float(*value),
            Bson::DateTime(value) => Comparable::DateTime(*value),
            Bson::ObjectId(value) => Comparable::ObjectId(*value),
            Bson::String(value) => Comparable::String(value),
            Bson::Array(arr) => Comparable::Array(arr.iter().map(Comparable::from).collect()),
            Bson::Document(doc) => Comparable::Map(
                doc.iter()
                    .map(|(k, v)| (k.as_str(), Comparable::from(v)))
                    .collect::<HashMap<_, _>>(),
            ),
            _ => Comparable::Opaque,
        }
    }
}

/// Exact comparison of an integer with a float: `3 == 3.0`, but no rounding of either side.
fn int_equals_float(int: i64, float: f64) -> bool {
    // 2^63 is the first float above i64::MAX
    float.fract() == 0.0
        && float >= i64::MIN as f64
        && float < 9_223_372_036_854_775_808.0
        && float as i64 == int
}

impl<'a> PartialEq for Comparable<'a> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Comparable::Null, Comparable::Null) => true,
            (Comparable::Bool(a), Comparable::Bool(b)) => a == b,
            (Comparable::Int(a), Comparable::Int(b)) => a == b,
            (Comparable::Float(a), Comparable::Float(b)) => a == b,
            (Comparable::Int(a), Comparable::Float(b)) | (Comparable::Float(b), Comparable::Int(a)) => {
                int_equals_float(*a, *b)
            }
            (Comparable::DateTime(a), Comparable::DateTime(b)) => a == b,
            (Comparable::ObjectId(a), Comparable::ObjectId(b)) => a == b,
            (Comparable::String(a), Comparable::String(b)) => a == b,
            (Comparable::Array(a), Comparable::Array(b)) => a == b,
            (Comparable::Map(a), Comparable::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl<'a> Comparable<'a> {
    /// Returns `true` if this value equals `other`, or is an array with an element equal to it.
    ///
    /// This is how MongoDB matches a scalar against an array field.
    fn matches(&self, other: &Comparable<'_>) -> bool {
        if self == other {
            return true;
        }
        match self {
            Comparable::Array(items) => items.iter().any(|item| item == other),
            _ => false,
        }
    }
}

pub(crate) struct DocumentEvaluator<'a> {
    document: &'a Fields,
}

impl<'a> DocumentEvaluator<'a> {
    pub fn new(document: &'a Fields) -> Self {
        Self { document }
    }

    pub fn evaluate(&mut self, expr: &Expr) -> StoreResult<bool> {
        self.visit_expr(expr)
    }

    /// Returns `true` if `document` matches the optional filter.
    pub fn matches(document: &Fields, filter: Option<&Expr>) -> StoreResult<bool> {
        match filter {
            Some(expr) => DocumentEvaluator::new(document).evaluate(expr),
            None => Ok(true),
        }
    }
}

impl<'a> QueryVisitor for DocumentEvaluator<'a> {
    type Output = bool;
    type Error = StoreError;

    fn visit_and(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error> {
        for expr in exprs {
            if !self.visit_expr(expr)? {
                return Ok(false);
            }
        }

        Ok(true)
    }

    fn visit_field(&mut self, field: &str, op: &FieldOp, value: &Bson) -> Result<Self::Output, Self::Error> {
        let Some(field_value) = self.document.get(field) else {
            return Ok(false);
        };

        let left = Comparable::from(field_value);
        let right = Comparable::from(value);

        Ok(match op {
            FieldOp::Eq => left.matches(&right),
            FieldOp::Includes => match left {
                Comparable::Array(items) => items.iter().any(|item| item == &right),
                _ => false,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;
    use storekit_core::query::Filter;

    fn eval(document: &Fields, expr: Expr) -> bool {
        DocumentEvaluator::new(document).evaluate(&expr).unwrap()
    }

    #[test]
    fn test_includes_is_exact_membership() {
        let school = doc! { "name": "Holberton", "topics": ["Sys admin", "AI"] };

        assert!(eval(&school, Filter::includes("topics", "AI")));
        assert!(!eval(&school, Filter::includes("topics", "Sys")));
        assert!(!eval(&school, Filter::includes("topics", "ai")));
    }

    #[test]
    fn test_includes_on_scalar_field_is_false() {
        let school = doc! { "topics": "AI" };
        assert!(!eval(&school, Filter::includes("topics", "AI")));
    }

    #[test]
    fn test_eq_matches_array_element_like_mongodb() {
        let school = doc! { "topics": ["Python", "C"] };

        assert!(eval(&school, Filter::eq("topics", "C")));
        assert!(!eval(&school, Filter::eq("topics", "Java")));
    }

    #[test]
    fn test_numbers_compare_across_types() {
        let doc = doc! { "count": 3_i32 };

        assert!(eval(&doc, Filter::eq("count", 3.0)));
        assert!(eval(&doc, Filter::eq("count", 3_i64)));
        assert!(!eval(&doc, Filter::eq("count", 3.5)));
        assert!(!eval(&doc, Filter::eq("count", "3")));
    }

    #[test]
    fn test_large_integers_compare_exactly() {
        let big = 9_007_199_254_740_993_i64; // 2^53 + 1
        let doc = doc! { "id": big, "ids": [big] };

        assert!(eval(&doc, Filter::eq("id", big)));
        assert!(!eval(&doc, Filter::eq("id", big - 1)));
        assert!(!eval(&doc, Filter::includes("ids", big - 1)));
        // the nearest double is 2^53, which is not the stored value
        assert!(!eval(&doc, Filter::eq("id", big as f64)));
    }

    #[test]
    fn test_missing_field_never_matches() {
        let doc = doc! { "name": "x" };

        assert!(!eval(&doc, Filter::eq("topics", "AI")));
        assert!(!eval(&doc, Filter::includes("topics", "AI")));
    }

    #[test]
    fn test_and_requires_every_expression() {
        let doc = doc! { "name": "UCSF", "topics": ["Algorithm"] };

        assert!(eval(&doc, Filter::eq("name", "UCSF").and(Filter::includes("topics", "Algorithm"))));
        assert!(!eval(&doc, Filter::eq("name", "UCSF").and(Filter::includes("topics", "C"))));
        assert!(eval(&doc, Filter::and([])));
    }
}
