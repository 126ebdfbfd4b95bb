//! Core traits for typed records and their BSON representation.
//!
//! Every entity served by a data source implements [`Record`]. Conversion to and
//! from the BSON the backends speak is provided by [`RecordExt`].

use bson::{Bson, Uuid, de::deserialize_from_bson, error::Error as BsonError, ser::serialize_to_bson};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Core trait that every record read or written through a data source must implement.
///
/// A record is an immutable value with a stable identity and structural equality.
///
/// # Example
///
/// ```ignore
/// use docsource::record::Record;
/// use bson::Uuid;
/// use serde::{Serialize, Deserialize};
///
/// #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// pub struct Note {
///     pub id: Uuid,
///     pub body: String,
/// }
///
/// impl Record for Note {
///     fn id(&self) -> &Uuid {
///         &self.id
///     }
///
///     fn entity_name() -> &'static str {
///         "note"
///     }
/// }
/// ```
pub trait Record:
    Serialize + for<'de> Deserialize<'de> + Send + Sync + Clone + PartialEq + Debug + 'static
{
    /// Returns the record's unique identifier.
    fn id(&self) -> &Uuid;

    /// Human readable name of the entity type, used in failure context and logs.
    fn entity_name() -> &'static str;
}

/// Serialization helpers, implemented for every [`Record`].
pub trait RecordExt: Record {
    /// Converts this record to a BSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn to_bson(&self) -> Result<Bson, BsonError>;

    /// Materializes a record from a BSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value does not have the record's shape.
    fn from_bson(bson: Bson) -> Result<Self, BsonError>;
}

impl<R: Record> RecordExt for R {
    fn to_bson(&self) -> Result<Bson, BsonError> {
        serialize_to_bson(self)
    }

    fn from_bson(bson: Bson) -> Result<Self, BsonError> {
        deserialize_from_bson(bson)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        id: Uuid,
        body: String,
    }

    impl Record for Note {
        fn id(&self) -> &Uuid {
            &self.id
        }

        fn entity_name() -> &'static str {
            "note"
        }
    }

    #[test]
    fn bson_shape_matches_fields() {
        let note = Note { id: Uuid::new(), body: "hello".into() };
        let bson = note.to_bson().unwrap();
        let document = bson.as_document().unwrap();

        assert_eq!(document.get_str("body").unwrap(), "hello");
        assert_eq!(Note::from_bson(bson).unwrap(), note);
    }

    #[test]
    fn from_bson_rejects_wrong_shape() {
        let result = Note::from_bson(Bson::Document(doc! { "body": 42 }));

        assert!(result.is_err());
    }
}
