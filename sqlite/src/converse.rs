//! Conversation records and their row encoding.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};

/// Format SQLite's `CURRENT_TIMESTAMP` produces.
pub(crate) const SQLITE_TIMESTAMP: &str = "%Y-%m-%d %H:%M:%S";

/// A prompt/answer pair with the embedding of each side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Converse {
    /// User text.
    pub prompt: String,
    /// Model (or user supplied) answer.
    pub answer: String,
    /// Embedding of `prompt`.
    pub veci: Vec<f32>,
    /// Embedding of `answer`.
    pub veco: Vec<f32>,
}

impl Converse {
    /// Creates a record from precomputed embeddings.
    pub fn new(
        prompt: impl Into<String>,
        answer: impl Into<String>,
        veci: Vec<f32>,
        veco: Vec<f32>,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            answer: answer.into(),
            veci,
            veco,
        }
    }
}

/// A conversation as read back from its table.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredConverse {
    /// Row id, increasing in insertion order.
    pub id: i64,
    /// Insertion time (UTC, second precision).
    pub timestamp: NaiveDateTime,
    /// The stored pair.
    pub converse: Converse,
}

impl StoredConverse {
    /// Drops the database metadata.
    pub fn into_converse(self) -> Converse {
        self.converse
    }
}

/// Encodes a vector as space-separated floats.
///
/// # Examples
///
/// ```
/// use labelist_sqlite::{decode_vector, encode_vector};
///
/// let text = encode_vector(&[0.5, -1.0, 3.25]);
/// assert_eq!(text, "0.5 -1 3.25");
/// assert_eq!(decode_vector(&text).unwrap(), vec![0.5, -1.0, 3.25]);
/// ```
pub fn encode_vector(vector: &[f32]) -> String {
    vector
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Decodes [`encode_vector`] output. Blank text is an empty vector.
///
/// # Errors
///
/// Returns [`StoreError::ConversionError`] naming the first bad element.
pub fn decode_vector(text: &str) -> Result<Vec<f32>> {
    text.split_whitespace()
        .map(|part| {
            part.parse::<f32>()
                .map_err(|e| StoreError::ConversionError(format!("bad vector element '{part}': {e}")))
        })
        .collect()
}

pub(crate) fn parse_timestamp(text: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, SQLITE_TIMESTAMP)
        .map_err(|e| StoreError::ConversionError(format!("bad timestamp '{text}': {e}")))
}

/// Raw column values of one fetched row.
pub(crate) struct ConverseRow {
    pub id: i64,
    pub timestamp: String,
    pub prompt: String,
    pub answer: String,
    pub veci: String,
    pub veco: String,
}

impl ConverseRow {
    pub(crate) fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            timestamp: row.get(1)?,
            prompt: row.get(2)?,
            answer: row.get(3)?,
            veci: row.get(4)?,
            veco: row.get(5)?,
        })
    }

    pub(crate) fn decode(self) -> Result<StoredConverse> {
        Ok(StoredConverse {
            id: self.id,
            timestamp: parse_timestamp(&self.timestamp)?,
            converse: Converse {
                prompt: self.prompt,
                answer: self.answer,
                veci: decode_vector(&self.veci)?,
                veco: decode_vector(&self.veco)?,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_vector_tolerates_extra_whitespace() {
        assert_eq!(decode_vector("  1  2\t3 ").unwrap(), vec![1.0, 2.0, 3.0]);
        assert!(decode_vector("").unwrap().is_empty());
    }

    #[test]
    fn test_decode_vector_rejects_garbage() {
        let err = decode_vector("1 two 3").unwrap_err();
        assert!(err.to_string().contains("'two'"));
    }

    #[test]
    fn test_encode_preserves_f32_precision() {
        let v = vec![0.1_f32, 1.0e-7, 123_456.79];
        assert_eq!(decode_vector(&encode_vector(&v)).unwrap(), v);
    }

    #[test]
    fn test_parse_timestamp() {
        let ts = parse_timestamp("2025-03-16 09:30:00").unwrap();
        assert_eq!(ts.format("%H:%M").to_string(), "09:30");
        assert!(parse_timestamp("yesterday").is_err());
    }
}
