use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_PRECISION, MAX_REPETITIONS, MAX_REPETITION_PRECISION};
use crate::errors::{Result, SlrError};
use crate::models::SparseVector;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncodingKind {
    /// Index tokens repeated in proportion to their weight.
    #[default]
    Repetition,
    /// `index value` pairs for retained dimensions only.
    Pairs,
    /// One value per dimension, zeros included.
    Dense,
}

impl FromStr for EncodingKind {
    type Err = SlrError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "repetition" | "rep" => Ok(EncodingKind::Repetition),
            "pairs" | "sparse" => Ok(EncodingKind::Pairs),
            "dense" => Ok(EncodingKind::Dense),
            _ => Err(SlrError::invalid(
                "encoding",
                format!("unknown encoding `{}` (expected repetition, pairs or dense)", s),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Delimiter {
    #[default]
    Tab,
    Space,
}

impl Delimiter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Delimiter::Tab => "\t",
            Delimiter::Space => " ",
        }
    }
}

impl FromStr for Delimiter {
    type Err = SlrError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "tab" | "\t" => Ok(Delimiter::Tab),
            "space" | " " => Ok(Delimiter::Space),
            _ => Err(SlrError::invalid(
                "delimiter",
                format!("unknown delimiter `{}` (expected tab or space)", s),
            )),
        }
    }
}

fn validate_precision(kind: EncodingKind, precision: u32) -> Result<()> {
    let limit = match kind {
        EncodingKind::Repetition => MAX_REPETITION_PRECISION,
        EncodingKind::Pairs | EncodingKind::Dense => MAX_PRECISION,
    };
    if precision > limit {
        return Err(SlrError::invalid(
            "precision",
            format!("must not exceed {} for {:?} encoding, got {}", limit, kind, precision),
        ));
    }
    Ok(())
}

/// Integer multiplicity of a weight: `floor(weight * 10^precision)`.
pub fn repetition_count(weight: f64, precision: u32) -> u64 {
    let scaled = (weight * 10f64.powi(precision as i32)).floor();
    if scaled <= 0.0 { 0 } else { scaled as u64 }
}

///
/// Encode a vector as repeated index tokens.
///
/// Index `i` appears `floor(w_i * 10^precision)` times, in ascending index
/// order, separated by single spaces. Entries whose count is zero vanish, so a
/// vector of tiny weights encodes to the empty string.
///
/// Fails with [`SlrError::InvalidParameter`] when an entry would expand to
/// more than [`MAX_REPETITIONS`] tokens.
///
pub fn encode_repetition(vec: &SparseVector, precision: u32) -> Result<String> {
    let mut out = String::new();
    for (index, weight) in vec.iter() {
        let count = repetition_count(weight, precision);
        if count == 0 {
            continue;
        }
        let token = index.to_string();
        let bytes = match count <= MAX_REPETITIONS {
            true => usize::try_from(count)
                .ok()
                .and_then(|count| count.checked_mul(token.len() + 1)),
            false => None,
        };
        let Some(bytes) = bytes else {
            return Err(SlrError::invalid(
                "weight",
                format!(
                    "weight {} at index {} expands to {} tokens at precision {} (limit {})",
                    weight, index, count, precision, MAX_REPETITIONS
                ),
            ));
        };
        out.reserve(bytes);

        for _ in 0..count {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(&token);
        }
    }
    Ok(out)
}

fn push_value(out: &mut String, value: f64, precision: u32) {
    // `{:.N}` is always fixed-point
    let _ = write!(out, "{:.*}", precision as usize, value);
}

///
/// Encode a vector as index/value pairs or as a dense row.
///
/// Sparse form emits `"{index} {value}"` for each retained entry, joined by
/// `delimiter`. Dense form emits every dimension's value in order. Values are
/// written in fixed-point notation with exactly `precision` fractional digits.
///
pub fn encode_pairs(vec: &SparseVector, precision: u32, dense: bool, delimiter: Delimiter) -> String {
    let sep = delimiter.as_str();
    let mut out = String::new();

    if dense {
        for (i, value) in vec.to_dense().into_iter().enumerate() {
            if i > 0 {
                out.push_str(sep);
            }
            push_value(&mut out, value, precision);
        }
    } else {
        for (n, (index, value)) in vec.iter().enumerate() {
            if n > 0 {
                out.push_str(sep);
            }
            let _ = write!(out, "{} ", index);
            push_value(&mut out, value, precision);
        }
    }

    out
}

/// Count of each index token in a repetition-encoded string.
pub fn decode_repetition(text: &str) -> Result<BTreeMap<u32, u64>> {
    let mut counts = BTreeMap::new();
    for token in text.split_whitespace() {
        let index = token
            .parse::<u32>()
            .map_err(|_| SlrError::MalformedVector(format!("`{}` is not a dimension index", token)))?;
        *counts.entry(index).or_insert(0) += 1;
    }
    Ok(counts)
}

fn parse_value(token: &str) -> Result<f64> {
    token
        .parse::<f64>()
        .map_err(|_| SlrError::MalformedVector(format!("`{}` is not a number", token)))
}

/// Parse the sparse pair form back into a vector of dimensionality `dim`.
///
/// Entries whose value parses to zero (for example after rounding) are dropped.
pub fn decode_pairs(text: &str, dim: usize) -> Result<SparseVector> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.len() % 2 != 0 {
        return Err(SlrError::MalformedVector(format!(
            "expected index/value pairs, found {} tokens",
            tokens.len()
        )));
    }

    let mut pairs = Vec::with_capacity(tokens.len() / 2);
    for pair in tokens.chunks(2) {
        let index = pair[0]
            .parse::<u32>()
            .map_err(|_| SlrError::MalformedVector(format!("`{}` is not a dimension index", pair[0])))?;
        let value = parse_value(pair[1])?;
        if value != 0.0 {
            pairs.push((index, value));
        }
    }

    SparseVector::from_pairs(dim, pairs).map_err(|e| SlrError::MalformedVector(e.to_string()))
}

/// Parse a dense row; its length is the dimensionality.
pub fn decode_dense(text: &str) -> Result<SparseVector> {
    let dense = text
        .split_whitespace()
        .map(parse_value)
        .collect::<Result<Vec<f64>>>()?;
    SparseVector::from_dense(&dense).map_err(|e| SlrError::MalformedVector(e.to_string()))
}

/// A fully-specified text encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Encoding {
    pub kind: EncodingKind,
    pub precision: u32,
    pub delimiter: Delimiter,
}

impl Encoding {
    pub fn new(kind: EncodingKind, precision: u32, delimiter: Delimiter) -> Result<Self> {
        validate_precision(kind, precision)?;
        Ok(Self {
            kind,
            precision,
            delimiter,
        })
    }

    pub fn repetition(precision: u32) -> Result<Self> {
        Encoding::new(EncodingKind::Repetition, precision, Delimiter::default())
    }

    pub fn pairs(precision: u32, delimiter: Delimiter) -> Result<Self> {
        Encoding::new(EncodingKind::Pairs, precision, delimiter)
    }

    pub fn dense(precision: u32, delimiter: Delimiter) -> Result<Self> {
        Encoding::new(EncodingKind::Dense, precision, delimiter)
    }

    pub fn encode(&self, vec: &SparseVector) -> Result<String> {
        match self.kind {
            EncodingKind::Repetition => encode_repetition(vec, self.precision),
            EncodingKind::Pairs => Ok(encode_pairs(vec, self.precision, false, self.delimiter)),
            EncodingKind::Dense => Ok(encode_pairs(vec, self.precision, true, self.delimiter)),
        }
    }

    /// Dimensions with a nonzero entry in `text`, ascending.
    pub fn support(&self, text: &str) -> Result<Vec<u32>> {
        let support = match self.kind {
            EncodingKind::Repetition => decode_repetition(text)?.into_keys().collect(),
            EncodingKind::Pairs => decode_pairs(text, u32::MAX as usize)?.indices,
            EncodingKind::Dense => decode_dense(text)?.indices,
        };
        Ok(support)
    }
}
