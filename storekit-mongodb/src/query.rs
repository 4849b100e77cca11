//! Filter translation from storekit expressions to MongoDB query documents.

use bson::{Bson, Document, doc};

use storekit_core::{
    error::StoreError,
    query::{Expr, FieldOp, QueryVisitor},
};

/// Translates storekit filter expressions into MongoDB filter documents.
pub(crate) struct MongoQueryTranslator;

impl MongoQueryTranslator {
    /// Translates an optional filter; `None` becomes the match-all filter `{}`.
    pub(crate) fn translate(filter: Option<&Expr>) -> Result<Document, StoreError> {
        match filter {
            Some(expr) => MongoQueryTranslator.visit_expr(expr),
            None => Ok(doc! {}),
        }
    }
}

impl QueryVisitor for MongoQueryTranslator {
    type Output = Document;
    type Error = StoreError;

    fn visit_and(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error> {
        Ok(doc! {
            "$and": exprs
                .iter()
                .map(|expr| self.visit_expr(expr))
                .collect::<Result<Vec<_>, _>>()?,
        })
    }

    fn visit_field(&mut self, field: &str, op: &FieldOp, value: &Bson) -> Result<Self::Output, Self::Error> {
        Ok(doc! {
            field: match op {
                FieldOp::Eq => doc! { "$eq": value },
                FieldOp::Includes => doc! { "$elemMatch": { "$eq": value } },
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storekit_core::query::Filter;

    #[test]
    fn test_includes_uses_elem_match() {
        let filter = MongoQueryTranslator::translate(Some(&Filter::includes("topics", "AI"))).unwrap();
        assert_eq!(filter, doc! { "topics": { "$elemMatch": { "$eq": "AI" } } });
    }

    #[test]
    fn test_no_filter_matches_all() {
        assert_eq!(MongoQueryTranslator::translate(None).unwrap(), doc! {});
    }

    #[test]
    fn test_and_of_fields() {
        let expr = Filter::eq("name", "Holberton school").and(Filter::includes("topics", "AI"));
        let filter = MongoQueryTranslator::translate(Some(&expr)).unwrap();

        assert_eq!(
            filter,
            doc! {
                "$and": [
                    { "name": { "$eq": "Holberton school" } },
                    { "topics": { "$elemMatch": { "$eq": "AI" } } },
                ]
            }
        );
    }

    #[test]
    fn test_large_integer_passes_through_unchanged() {
        let filter = MongoQueryTranslator::translate(Some(&Filter::eq("id", 9_007_199_254_740_993_i64))).unwrap();
        assert_eq!(filter, doc! { "id": { "$eq": 9_007_199_254_740_993_i64 } });
    }
}
