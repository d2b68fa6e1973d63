//! Normalization of inference API payloads.
//!
//! The feature-extraction endpoint answers in several shapes depending on the
//! model: a flat vector, a vector wrapped in a batch array, or a per-token
//! matrix `[tokens][dim]`. Everything is reduced to one flat vector here.

use serde_json::Value;

use crate::Embedding;
use crate::error::{EmbeddingError, Result};

/// Reduce a remote payload to a single embedding.
///
/// A leading batch wrapper is unwrapped, and a per-token matrix is averaged
/// element-wise across tokens.
pub fn pool_response(payload: Value) -> Result<Embedding> {
    let Value::Array(outer) = payload else {
        return Err(invalid("expected a JSON array"));
    };

    let values = if matches!(outer.first(), Some(Value::Array(_))) {
        match outer.into_iter().next() {
            Some(Value::Array(inner)) => inner,
            _ => Vec::new(),
        }
    } else {
        outer
    };

    let embedding = if matches!(values.first(), Some(Value::Array(_))) {
        mean_rows(&values)?
    } else {
        to_vector(&values)?
    };

    if embedding.is_empty() {
        return Err(invalid("empty embedding"));
    }

    Ok(embedding)
}

/// Element-wise mean of a matrix of token vectors.
fn mean_rows(rows: &[Value]) -> Result<Embedding> {
    let mut sums: Vec<f64> = Vec::new();

    for (idx, row) in rows.iter().enumerate() {
        let Value::Array(cells) = row else {
            return Err(invalid(format!("row {idx} is not an array")));
        };

        if idx == 0 {
            sums = vec![0.0; cells.len()];
        } else if cells.len() != sums.len() {
            return Err(invalid(format!(
                "row {idx} has {} values, expected {}",
                cells.len(),
                sums.len()
            )));
        }

        for (sum, cell) in sums.iter_mut().zip(cells) {
            *sum += as_number(cell)?;
        }
    }

    let count = rows.len() as f64;
    sums.into_iter().map(|sum| to_f32(sum / count)).collect()
}

fn to_vector(values: &[Value]) -> Result<Embedding> {
    values
        .iter()
        .map(|value| as_number(value).and_then(to_f32))
        .collect()
}

fn as_number(value: &Value) -> Result<f64> {
    value
        .as_f64()
        .ok_or_else(|| invalid(format!("expected a number, got {value}")))
}

/// Narrow to `f32`, refusing values that would not survive as JSON numbers.
fn to_f32(value: f64) -> Result<f32> {
    let narrowed = value as f32;
    if narrowed.is_finite() {
        Ok(narrowed)
    } else {
        Err(invalid(format!("value {value} does not fit in f32")))
    }
}

fn invalid(message: impl Into<String>) -> EmbeddingError {
    EmbeddingError::InvalidResponse(message.into())
}
