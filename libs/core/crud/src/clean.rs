use mongodb::bson::{Bson, Document};

/// Drops top-level keys whose value is null or an empty string.
///
/// Nested documents and arrays are kept as they are.
pub fn clean_update(document: Document) -> Document {
    document
        .into_iter()
        .filter(|(_, value)| match value {
            Bson::Null | Bson::Undefined => false,
            Bson::String(s) => !s.is_empty(),
            _ => true,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    #[test]
    fn test_drops_nulls_and_empty_strings() {
        let cleaned = clean_update(doc! {
            "name": "Acme",
            "description": "",
            "image": Bson::Null,
            "active": false,
            "position": 0,
        });

        assert_eq!(cleaned, doc! { "name": "Acme", "active": false, "position": 0 });
    }

    #[test]
    fn test_keeps_nested_values_untouched() {
        let cleaned = clean_update(doc! {
            "image": { "url": "", "alt": Bson::Null },
            "variants": [],
            "note": " ",
        });

        assert_eq!(
            cleaned,
            doc! { "image": { "url": "", "alt": Bson::Null }, "variants": [], "note": " " }
        );
    }

    #[test]
    fn test_empty_in_empty_out() {
        assert!(clean_update(Document::new()).is_empty());
        assert!(clean_update(doc! { "a": Bson::Null, "b": "" }).is_empty());
    }
}
