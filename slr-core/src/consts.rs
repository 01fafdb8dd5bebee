pub const DEFAULT_DIM: usize = 1000;
pub const DEFAULT_SPARSITY_THRESHOLD: f64 = 0.9;
pub const DEFAULT_ZIPF_PARAM: f64 = 0.35;
pub const DEFAULT_PRECISION: u32 = 5;
pub const DEFAULT_DOCS_PER_FILE: usize = 10_000;
pub const DEFAULT_NUM_DOCS: usize = 250;
pub const DEFAULT_ID_PREFIX: &str = "doc_";

/// Largest number of fractional digits any encoding accepts.
pub const MAX_PRECISION: u32 = 15;

/// Precision ceiling for repetition encoding, which writes `10^precision`
/// tokens for a unit weight.
pub const MAX_REPETITION_PRECISION: u32 = 6;

/// Most tokens a single entry may expand to under repetition encoding.
pub const MAX_REPETITIONS: u64 = 10_000_000;

/// Marker token that precedes a document identifier in tagged corpora.
pub const DOCNO_MARKER: &str = "DOCNO";
pub const DOCNO_TAG: &str = "<DOCNO>";
