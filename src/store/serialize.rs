//! SQLite serialization for typed enums and ids
//!
//! Implements ToSql and FromSql for the status, document and expense enums
//! and the ULID id newtypes so rows can be stored and read back typed.

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};

use crate::core::identity::{DocumentId, ExpenseId, ShipmentId, UserId};
use crate::core::status::ShipmentStatus;
use crate::entities::document::DocumentType;
use crate::entities::expense::{ExpenseCategory, ExpenseType};

fn parse_error(e: impl std::fmt::Display) -> FromSqlError {
    FromSqlError::Other(Box::new(std::io::Error::new(
        std::io::ErrorKind::InvalidData,
        e.to_string(),
    )))
}

// =========================================================================
// ShipmentStatus - ToSql/FromSql
// =========================================================================

impl ToSql for ShipmentStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for ShipmentStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let s = value.as_str()?;
        s.parse().map_err(parse_error)
    }
}

// =========================================================================
// DocumentType - ToSql/FromSql (parse is total; unknown rows become Other)
// =========================================================================

impl ToSql for DocumentType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for DocumentType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let s = value.as_str()?;
        Ok(s.parse().unwrap_or(DocumentType::Other))
    }
}

// =========================================================================
// ExpenseType / ExpenseCategory - ToSql/FromSql
// =========================================================================

impl ToSql for ExpenseType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.to_string()))
    }
}

impl FromSql for ExpenseType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let s = value.as_str()?;
        s.parse().map_err(parse_error)
    }
}

impl ToSql for ExpenseCategory {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for ExpenseCategory {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let s = value.as_str()?;
        s.parse().map_err(parse_error)
    }
}

// =========================================================================
// Id newtypes - stored as their canonical ULID text
// =========================================================================

macro_rules! id_sql {
    ($name:ident) => {
        impl ToSql for $name {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.to_string()))
            }
        }

        impl FromSql for $name {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                let s = value.as_str()?;
                s.parse().map_err(parse_error)
            }
        }
    };
}

id_sql!(ShipmentId);
id_sql!(DocumentId);
id_sql!(ExpenseId);
id_sql!(UserId);
