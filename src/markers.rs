use std::collections::HashMap;
use std::fmt;
use std::io::BufRead;

use crate::error::{CustomError, Result};

pub(crate) const TRANSLATE_TABLE_FIELDS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nucleotide {
    A,
    C,
    G,
    T,
}

impl Nucleotide {
    /// Case-insensitive parse of a single-letter allele code.
    pub fn parse(symbol: &str) -> Result<Self> {
        match symbol.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(Self::A),
            "C" => Ok(Self::C),
            "G" => Ok(Self::G),
            "T" => Ok(Self::T),
            _ => Err(CustomError::Nucleotide {
                symbol: symbol.to_string(),
            }),
        }
    }

    /// The nucleotide on the complement strand.
    pub fn complement(self) -> Self {
        match self {
            Self::A => Self::T,
            Self::T => Self::A,
            Self::G => Self::C,
            Self::C => Self::G,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Self::A => 'A',
            Self::C => 'C',
            Self::G => 'G',
            Self::T => 'T',
        }
    }
}

/// Whether the model's allele definitions read off the source VCF strand
/// directly or off its complement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strand {
    Forward,
    Reverse,
}

impl Strand {
    fn parse(code: &str, line_num: usize) -> Result<Self> {
        match code {
            "F" => Ok(Self::Forward),
            "R" => Ok(Self::Reverse),
            _ => Err(CustomError::StrandCode {
                line_num,
                code: code.to_string(),
            }),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Forward => "forward",
            Self::Reverse => "reverse",
        }
    }
}

/// Reference-genome key of a marker, `chromosome:position`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Coordinate {
    pub chrom: String,
    pub pos: u64,
}

impl Coordinate {
    pub fn new(chrom: impl Into<String>, pos: u64) -> Self {
        Self {
            chrom: chrom.into(),
            pos,
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.chrom, self.pos)
    }
}

#[derive(Debug, Clone)]
pub struct Marker {
    pub id: String,
    pub strand: Strand,
    /// The allele the prediction model counts dosages against.
    pub test_allele: Nucleotide,
}

/// The HIrisPlex-S marker panel in model input column order, with a
/// coordinate index for resolving variant records. Built once from the
/// translate table and read-only afterwards.
#[derive(Debug)]
pub struct MarkerTable {
    markers: Vec<Marker>,
    index: HashMap<Coordinate, usize>,
}

impl MarkerTable {
    /// Reads the tab-separated translate table:
    /// `markerId <TAB> chromosome <TAB> position <TAB> F|R <TAB> testAllele`.
    pub fn build(reader: impl BufRead) -> Result<Self> {
        let mut markers: Vec<Marker> = Vec::new();
        let mut index: HashMap<Coordinate, usize> = HashMap::new();

        for (line_idx, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| CustomError::ReadStream { source: e })?;
            let line_num = line_idx + 1;
            let fields: Vec<&str> = line.trim_end_matches('\r').split('\t').collect();
            if fields.len() != TRANSLATE_TABLE_FIELDS {
                return Err(CustomError::TranslateTableFields {
                    line_num,
                    n_fields: fields.len(),
                    expected: TRANSLATE_TABLE_FIELDS,
                });
            }

            let pos: u64 = fields[2].parse().map_err(|e| CustomError::Position {
                line_num,
                source: e,
            })?;
            let coordinate = Coordinate::new(fields[1], pos);
            let strand = Strand::parse(fields[3], line_num)?;
            let test_allele = Nucleotide::parse(fields[4])?;

            if let Some(&prev) = index.get(&coordinate) {
                return Err(CustomError::DuplicateCoordinate {
                    coordinate: coordinate.to_string(),
                    first: markers[prev].id.clone(),
                    second: fields[0].to_string(),
                });
            }
            index.insert(coordinate, markers.len());
            markers.push(Marker {
                id: fields[0].to_string(),
                strand,
                test_allele,
            });
        }

        if markers.is_empty() {
            return Err(CustomError::MarkerCount { n_markers: 0 });
        }
        Ok(Self { markers, index })
    }

    pub fn lookup(&self, coordinate: &Coordinate) -> Option<usize> {
        self.index.get(coordinate).copied()
    }

    pub fn marker(&self, idx: usize) -> &Marker {
        &self.markers[idx]
    }

    /// Marker ids in model input column order, for the output header.
    pub fn header_columns(&self) -> impl Iterator<Item = &str> {
        self.markers.iter().map(|m| m.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }
}
