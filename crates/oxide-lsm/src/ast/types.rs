//! SQL data type definitions.

use core::fmt;

use serde::Serialize;

/// SQL data types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DataType {
    // Integer types
    /// Small integer (2 bytes).
    Smallint,
    /// Integer (4 bytes).
    Integer,
    /// Big integer (8 bytes).
    Bigint,

    // Floating point
    /// Real (4-byte float).
    Real,
    /// Double precision (8-byte float).
    Double,
    /// Decimal with precision and scale.
    Decimal {
        /// Total number of digits.
        precision: Option<u16>,
        /// Number of digits after decimal point.
        scale: Option<u16>,
    },
    /// Numeric (alias for Decimal).
    Numeric {
        /// Total number of digits.
        precision: Option<u16>,
        /// Number of digits after decimal point.
        scale: Option<u16>,
    },

    // String types
    /// Fixed-length character string.
    Char(Option<u32>),
    /// Variable-length character string.
    Varchar(Option<u32>),
    /// Text (variable length, no limit).
    Text,

    // Binary types
    /// Binary large object.
    Blob,
    /// Binary with specified length.
    Binary(Option<u32>),
    /// Variable-length binary.
    Varbinary(Option<u32>),

    // Date/time types
    /// Date.
    Date,
    /// Time.
    Time,
    /// Timestamp.
    Timestamp,
    /// DateTime (SQLite-style).
    Datetime,

    // Boolean
    /// Boolean.
    Boolean,

    /// Any other type name, as written (with its arguments, if any).
    Custom(String),
}

/// The argument shape a type name accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeArgs {
    /// No arguments.
    None,
    /// A single length, e.g. `VARCHAR(255)`.
    Length,
    /// Precision and optional scale, e.g. `DECIMAL(10, 2)`.
    PrecisionScale,
    /// Free-form arguments kept verbatim.
    Verbatim,
}

impl DataType {
    /// Maps a type name (case-insensitive) to the argument shape it takes.
    ///
    /// `DOUBLE PRECISION` and `CHARACTER VARYING` are handled by the grammar
    /// before the name reaches this function.
    #[must_use]
    pub fn args_for(name: &str) -> TypeArgs {
        match name.to_ascii_uppercase().as_str() {
            "DECIMAL" | "NUMERIC" => TypeArgs::PrecisionScale,
            "CHAR" | "CHARACTER" | "VARCHAR" | "BINARY" | "VARBINARY" => TypeArgs::Length,
            "INT" | "INTEGER" | "SMALLINT" | "BIGINT" | "REAL" | "DOUBLE" | "FLOAT" | "TEXT"
            | "BLOB" | "DATE" | "TIME" | "TIMESTAMP" | "DATETIME" | "BOOLEAN" | "BOOL" => {
                TypeArgs::None
            }
            _ => TypeArgs::Verbatim,
        }
    }

    /// Builds a data type from a name and its parsed arguments.
    #[must_use]
    pub fn from_parts(name: &str, length: Option<u32>, precision: Option<u16>, scale: Option<u16>) -> Self {
        match name.to_ascii_uppercase().as_str() {
            "INT" | "INTEGER" => Self::Integer,
            "SMALLINT" => Self::Smallint,
            "BIGINT" => Self::Bigint,
            "REAL" => Self::Real,
            "DOUBLE" | "FLOAT" => Self::Double,
            "DECIMAL" => Self::Decimal { precision, scale },
            "NUMERIC" => Self::Numeric { precision, scale },
            "CHAR" | "CHARACTER" => Self::Char(length),
            "VARCHAR" => Self::Varchar(length),
            "TEXT" => Self::Text,
            "BLOB" => Self::Blob,
            "BINARY" => Self::Binary(length),
            "VARBINARY" => Self::Varbinary(length),
            "DATE" => Self::Date,
            "TIME" => Self::Time,
            "TIMESTAMP" => Self::Timestamp,
            "DATETIME" => Self::Datetime,
            "BOOLEAN" | "BOOL" => Self::Boolean,
            _ => Self::Custom(String::from(name)),
        }
    }

    /// Returns the SQL representation of the data type.
    #[must_use]
    pub fn to_sql(&self) -> String {
        match self {
            Self::Smallint => String::from("SMALLINT"),
            Self::Integer => String::from("INTEGER"),
            Self::Bigint => String::from("BIGINT"),
            Self::Real => String::from("REAL"),
            Self::Double => String::from("DOUBLE"),
            Self::Decimal { precision, scale } => match (precision, scale) {
                (Some(p), Some(s)) => format!("DECIMAL({p}, {s})"),
                (Some(p), None) => format!("DECIMAL({p})"),
                _ => String::from("DECIMAL"),
            },
            Self::Numeric { precision, scale } => match (precision, scale) {
                (Some(p), Some(s)) => format!("NUMERIC({p}, {s})"),
                (Some(p), None) => format!("NUMERIC({p})"),
                _ => String::from("NUMERIC"),
            },
            Self::Char(len) => match len {
                Some(n) => format!("CHAR({n})"),
                None => String::from("CHAR"),
            },
            Self::Varchar(len) => match len {
                Some(n) => format!("VARCHAR({n})"),
                None => String::from("VARCHAR"),
            },
            Self::Text => String::from("TEXT"),
            Self::Blob => String::from("BLOB"),
            Self::Binary(len) => match len {
                Some(n) => format!("BINARY({n})"),
                None => String::from("BINARY"),
            },
            Self::Varbinary(len) => match len {
                Some(n) => format!("VARBINARY({n})"),
                None => String::from("VARBINARY"),
            },
            Self::Date => String::from("DATE"),
            Self::Time => String::from("TIME"),
            Self::Timestamp => String::from("TIMESTAMP"),
            Self::Datetime => String::from("DATETIME"),
            Self::Boolean => String::from("BOOLEAN"),
            Self::Custom(name) => name.clone(),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_type_to_sql() {
        assert_eq!(DataType::Integer.to_sql(), "INTEGER");
        assert_eq!(DataType::Varchar(Some(255)).to_sql(), "VARCHAR(255)");
        assert_eq!(
            DataType::Decimal {
                precision: Some(10),
                scale: Some(2)
            }
            .to_sql(),
            "DECIMAL(10, 2)"
        );
    }

    #[test]
    fn test_from_parts() {
        assert_eq!(DataType::from_parts("int", None, None, None), DataType::Integer);
        assert_eq!(DataType::from_parts("Varchar", Some(20), None, None), DataType::Varchar(Some(20)));
        assert_eq!(
            DataType::from_parts("numeric", None, Some(8), Some(3)),
            DataType::Numeric {
                precision: Some(8),
                scale: Some(3)
            }
        );
        assert_eq!(
            DataType::from_parts("jsonb", None, None, None),
            DataType::Custom(String::from("jsonb"))
        );
    }

    #[test]
    fn test_args_for() {
        assert_eq!(DataType::args_for("decimal"), TypeArgs::PrecisionScale);
        assert_eq!(DataType::args_for("VARCHAR"), TypeArgs::Length);
        assert_eq!(DataType::args_for("text"), TypeArgs::None);
        assert_eq!(DataType::args_for("geometry"), TypeArgs::Verbatim);
    }
}
