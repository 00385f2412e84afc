//! Command codec: typed arguments to wire requests, raw responses back to values.
//!
//! Requests carry one payload string whose layout is fixed per operation
//! (see [`Operation::scheme`]). Responses are a bare scalar, a list of
//! scalars joined with [`LIST_DELIMITER`], or JSON records. The same helpers
//! are used in reverse by the [`Skeleton`](crate::skeleton::Skeleton).

use std::any::type_name;
use std::fmt::Display;
use std::str::FromStr;

use serde::{de::DeserializeOwned, Serialize};

use crate::protocol::{Operation, Request, Scheme};

pub const LIST_DELIMITER: char = ';';
const LIST_SEPARATOR: &str = ";";

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("cannot parse \"{raw}\" as {kind}")]
    Scalar { kind: &'static str, raw: String },
    #[error("malformed record: {0}")]
    Record(#[from] serde_json::Error),
    #[error("expected {expected} fields in \"{raw}\"")]
    Arity { expected: usize, raw: String },
    #[error("{operation} expects a {expected:?} payload")]
    SchemeMismatch { operation: Operation, expected: Scheme },
}

/// Arguments of one call, before they are flattened into a payload string.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Empty,
    Scalar(String),
    Compound(Vec<String>),
    Record(serde_json::Value),
}

impl Payload {
    pub fn scalar(value: impl Display) -> Self {
        Payload::Scalar(value.to_string())
    }

    pub fn compound(parts: &[&dyn Display]) -> Self {
        Payload::Compound(parts.iter().map(|p| p.to_string()).collect())
    }

    pub fn record<T: Serialize>(value: &T) -> Result<Self, CodecError> {
        Ok(Payload::Record(serde_json::to_value(value)?))
    }

    fn fits(&self, scheme: Scheme) -> bool {
        match (self, scheme) {
            (Payload::Empty, Scheme::Empty)
            | (Payload::Scalar(_), Scheme::Scalar)
            | (Payload::Record(_), Scheme::Record) => true,
            (Payload::Compound(parts), Scheme::Compound { arity }) => parts.len() == arity,
            _ => false,
        }
    }
}

/// Build the request for `operation`, rejecting payloads that do not match its scheme.
pub fn encode(operation: Operation, payload: Payload) -> Result<Request, CodecError> {
    let expected = operation.scheme();
    if !payload.fits(expected) {
        return Err(CodecError::SchemeMismatch { operation, expected });
    }
    let data = match payload {
        Payload::Empty => String::new(),
        Payload::Scalar(value) => value,
        Payload::Compound(parts) => parts.join(LIST_SEPARATOR),
        Payload::Record(value) => value.to_string(),
    };
    Ok(Request::new(operation, data))
}

/// Parse a bare scalar (integer, long, boolean, ...). Surrounding whitespace is ignored.
pub fn decode_scalar<T: FromStr>(raw: &str) -> Result<T, CodecError> {
    raw.trim().parse().map_err(|_| CodecError::Scalar {
        kind: type_name::<T>(),
        raw: raw.to_string(),
    })
}

/// Split `raw` on the list delimiter and parse every token in order.
///
/// An empty `raw` is a single empty token, not an empty list. Callers that
/// need "no results" must check for the empty string themselves.
pub fn decode_list<T, F>(raw: &str, parse: F) -> Result<Vec<T>, CodecError>
where
    F: FnMut(&str) -> Result<T, CodecError>,
{
    raw.split(LIST_DELIMITER).map(parse).collect()
}

pub fn decode_record<T: DeserializeOwned>(raw: &str) -> Result<T, CodecError> {
    Ok(serde_json::from_str(raw)?)
}

/// Split a compound key into exactly `arity` parts. The last part keeps any extra delimiters.
pub fn decode_compound(raw: &str, arity: usize) -> Result<Vec<&str>, CodecError> {
    let parts: Vec<&str> = raw.splitn(arity, LIST_DELIMITER).collect();
    if parts.len() != arity {
        return Err(CodecError::Arity {
            expected: arity,
            raw: raw.to_string(),
        });
    }
    Ok(parts)
}

pub fn encode_list<I>(items: I) -> String
where
    I: IntoIterator,
    I::Item: Display,
{
    items
        .into_iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(LIST_SEPARATOR)
}

pub fn encode_record<T: Serialize>(value: &T) -> Result<String, CodecError> {
    Ok(serde_json::to_string(value)?)
}

pub fn encode_record_list<T: Serialize>(values: &[T]) -> Result<String, CodecError> {
    let records = values
        .iter()
        .map(encode_record)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(records.join(LIST_SEPARATOR))
}
