//! Fixed schemas of the viewing dataset and the trend tables, plus header checks.

use std::sync::Arc;

use arrow_schema::{DataType, Field, FieldRef, Schema, SchemaRef};

/// Column names of the viewing dataset, in file order
pub mod columns {
    pub const USER_ID: &str = "UserID";
    pub const MOVIE_ID: &str = "MovieID";
    pub const MOVIE_TITLE: &str = "MovieTitle";
    pub const GENRE: &str = "Genre";
    pub const RATING: &str = "Rating";
    pub const REVIEW_COUNT: &str = "ReviewCount";
    pub const WATCHED_YEAR: &str = "WatchedYear";
    pub const USER_LOCATION: &str = "UserLocation";
    pub const AGE_GROUP: &str = "AgeGroup";
    pub const STREAMING_PLATFORM: &str = "StreamingPlatform";
    pub const WATCH_TIME: &str = "WatchTime";
    pub const IS_BINGE_WATCHED: &str = "IsBingeWatched";
    pub const SUBSCRIPTION_STATUS: &str = "SubscriptionStatus";

    /// Count column of the trend tables
    pub const MOVIES_WATCHED: &str = "MoviesWatched";
}

/// Declared column types of the viewing dataset, in file order
const VIEWING_FIELDS: [(&str, DataType); 13] = [
    (columns::USER_ID, DataType::Int32),
    (columns::MOVIE_ID, DataType::Int32),
    (columns::MOVIE_TITLE, DataType::Utf8),
    (columns::GENRE, DataType::Utf8),
    (columns::RATING, DataType::Float32),
    (columns::REVIEW_COUNT, DataType::Int32),
    (columns::WATCHED_YEAR, DataType::Int32),
    (columns::USER_LOCATION, DataType::Utf8),
    (columns::AGE_GROUP, DataType::Utf8),
    (columns::STREAMING_PLATFORM, DataType::Utf8),
    (columns::WATCH_TIME, DataType::Int32),
    (columns::IS_BINGE_WATCHED, DataType::Boolean),
    (columns::SUBSCRIPTION_STATUS, DataType::Utf8),
];

/// Schema of a loaded viewing dataset
///
/// Every field is nullable: permissive parsing replaces unparseable values
/// with nulls.
#[must_use]
pub fn viewing_schema() -> SchemaRef {
    Arc::new(Schema::new(
        VIEWING_FIELDS
            .iter()
            .map(|(name, data_type)| Field::new(*name, data_type.clone(), true))
            .collect::<Vec<_>>(),
    ))
}

/// The viewing schema with every column read as text
///
/// Files are scanned with this schema first and then cast column by column
/// into [`viewing_schema`], which is where the parse policy applies.
#[must_use]
pub fn raw_text_schema() -> SchemaRef {
    Arc::new(Schema::new(
        VIEWING_FIELDS
            .iter()
            .map(|(name, _)| Field::new(*name, DataType::Utf8, true))
            .collect::<Vec<_>>(),
    ))
}

/// Schema of the trend and peak-year tables
#[must_use]
pub fn trend_schema() -> SchemaRef {
    Arc::new(Schema::new(trend_fields()))
}

/// Fields of [`trend_schema`] as used by `serde_arrow`
#[must_use]
pub fn trend_fields() -> Vec<FieldRef> {
    vec![
        Arc::new(Field::new(columns::WATCHED_YEAR, DataType::Int32, true)),
        Arc::new(Field::new(columns::MOVIES_WATCHED, DataType::Int64, false)),
    ]
}

/// Result of comparing a file header against the expected columns
#[derive(Debug, Default)]
pub struct SchemaCompatibilityReport {
    /// Whether the header matches the expected columns exactly
    pub compatible: bool,
    /// List of incompatibility issues, if any
    pub issues: Vec<SchemaIssue>,
}

impl SchemaCompatibilityReport {
    /// Single-line description of all issues
    #[must_use]
    pub fn describe(&self) -> String {
        self.issues
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// A header incompatibility
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaIssue {
    /// An expected column is absent from the header
    MissingColumn { name: String },
    /// The header names a column the schema does not know
    UnexpectedColumn { name: String, position: usize },
    /// A known column sits at a different position than expected
    OutOfOrder {
        name: String,
        expected: usize,
        found: usize,
    },
}

impl std::fmt::Display for SchemaIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingColumn { name } => write!(f, "missing column '{name}'"),
            Self::UnexpectedColumn { name, position } => {
                write!(f, "unexpected column '{name}' at position {position}")
            }
            Self::OutOfOrder {
                name,
                expected,
                found,
            } => write!(
                f,
                "column '{name}' expected at position {expected} but found at {found}"
            ),
        }
    }
}

/// Compare header names against the columns of `expected`
///
/// Columns are read by position, so a renamed or reordered header still
/// loads; the report tells the caller whether that happened.
#[must_use]
pub fn check_header(header: &[String], expected: &Schema) -> SchemaCompatibilityReport {
    let mut issues = Vec::new();

    for (expected_pos, field) in expected.fields().iter().enumerate() {
        match header.iter().position(|name| name.trim() == field.name()) {
            None => issues.push(SchemaIssue::MissingColumn {
                name: field.name().clone(),
            }),
            Some(found) if found != expected_pos => issues.push(SchemaIssue::OutOfOrder {
                name: field.name().clone(),
                expected: expected_pos,
                found,
            }),
            Some(_) => {}
        }
    }

    for (position, name) in header.iter().enumerate() {
        if expected.index_of(name.trim()).is_err() {
            issues.push(SchemaIssue::UnexpectedColumn {
                name: name.clone(),
                position,
            });
        }
    }

    SchemaCompatibilityReport {
        compatible: issues.is_empty(),
        issues,
    }
}
