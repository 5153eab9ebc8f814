use thiserror::Error;

#[derive(Debug, Error)]
pub enum CustomError {
    #[error("could not read {path}")]
    ReadWithPath {
        #[source]
        source: std::io::Error,
        path: std::path::PathBuf,
    },

    #[error("could not read input stream")]
    ReadStream {
        #[source]
        source: std::io::Error,
    },

    #[error("could not read input CSV")]
    CsvRead {
        #[source]
        source: csv::Error,
    },

    #[error("could not write output CSV")]
    CsvWrite(#[from] csv::Error),

    #[error("could not write output")]
    Write {
        #[source]
        source: std::io::Error,
    },

    #[error("expected {expected} fields (got {n_fields}) in line {line_num} of the translate table")]
    TranslateTableFields {
        line_num: usize,
        n_fields: usize,
        expected: usize,
    },

    #[error("unrecognized strand code \"{code}\" in line {line_num} of the translate table (expected F or R)")]
    StrandCode { line_num: usize, code: String },

    #[error("could not parse position in line {line_num}")]
    Position {
        line_num: usize,
        #[source]
        source: std::num::ParseIntError,
    },

    #[error("invalid nucleotide letter \"{symbol}\"")]
    Nucleotide { symbol: String },

    #[error("markers {first} and {second} share the coordinate {coordinate}")]
    DuplicateCoordinate {
        coordinate: String,
        first: String,
        second: String,
    },

    #[error("need at least 1 marker (got {n_markers})")]
    MarkerCount { n_markers: usize },

    #[error("expected {expected} fields (got {n_fields}) in line {line_num} of the variant stream")]
    VariantFields {
        line_num: usize,
        n_fields: usize,
        expected: usize,
    },

    #[error("expected sampleid=genotype (got \"{field}\") in line {line_num} of the variant stream")]
    SampleAssignment { line_num: usize, field: String },

    #[error("sample ids in line {line_num} do not match the first variant line")]
    InconsistentSamples { line_num: usize },

    #[error(
        "test allele {test_allele} of marker {marker} matches neither allele (strand {strand}, ref: {reference}, alt: {alternate})"
    )]
    AlleleMismatch {
        marker: String,
        test_allele: char,
        strand: &'static str,
        reference: char,
        alternate: char,
    },

    #[error("invalid phased genotype \"{genotype}\" for marker {marker}")]
    InvalidGenotype { marker: String, genotype: String },

    #[error("expected {expected} fields (got {n_fields}) in line {line_num} of the result file")]
    ResultFields {
        line_num: usize,
        n_fields: usize,
        expected: usize,
    },

    #[error("could not parse probability in field {field_num} of line {line_num}")]
    Probability {
        line_num: usize,
        field_num: usize,
        #[source]
        source: std::num::ParseFloatError,
    },
}

pub type Result<T> = std::result::Result<T, CustomError>;
