use std::io::{BufRead, Write};

use tracing::{info, warn};

use crate::error::{CustomError, Result};
use crate::markers::{Coordinate, Marker, MarkerTable, Nucleotide, Strand};

pub(crate) const VARIANT_FIELDS: usize = 5;

/// Serialized value of a dosage cell no variant record ever populated.
/// Never "0": zero is a real dosage, NA is what the webtool accepts for
/// missing genotypes.
pub(crate) const NO_CALL: &str = "NA";

/// One of the four biallelic phased genotype codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhasedGenotype {
    HomRef,
    Het,
    HomAlt,
}

impl PhasedGenotype {
    pub fn parse(genotype: &str, marker_id: &str) -> Result<Self> {
        match genotype {
            "0|0" => Ok(Self::HomRef),
            "0|1" | "1|0" => Ok(Self::Het),
            "1|1" => Ok(Self::HomAlt),
            _ => Err(CustomError::InvalidGenotype {
                marker: marker_id.to_string(),
                genotype: genotype.to_string(),
            }),
        }
    }

    /// Count of the test allele in this genotype. For a het the count is 1
    /// whichever allele is the test allele; for a homozygote it depends on
    /// whether the test allele sits on the reference or the alternate side.
    pub fn dosage(self, reference_is_test: bool) -> u8 {
        match (self, reference_is_test) {
            (Self::Het, _) => 1,
            (Self::HomRef, true) | (Self::HomAlt, false) => 2,
            (Self::HomRef, false) | (Self::HomAlt, true) => 0,
        }
    }
}

/// One line of the variant stream: a site plus per-sample assignments.
/// Ref/alt stay raw strings here; they are resolved into nucleotides only
/// after the coordinate matches a marker, so skipped sites may carry
/// alleles the panel cannot represent (indels, multiallelic leftovers).
#[derive(Debug, Clone)]
pub struct VariantRecord {
    pub coordinate: Coordinate,
    pub reference: String,
    pub alternate: String,
    pub assignments: Vec<(String, String)>,
}

impl VariantRecord {
    /// Parses `chrom <TAB> pos <TAB> ref <TAB> alt <TAB> id=gt <TAB> id=gt ...`.
    pub fn parse(line: &str, line_num: usize) -> Result<Self> {
        let line = line.trim_end_matches('\r');
        let fields: Vec<&str> = line.splitn(VARIANT_FIELDS, '\t').collect();
        if fields.len() != VARIANT_FIELDS {
            return Err(CustomError::VariantFields {
                line_num,
                n_fields: fields.len(),
                expected: VARIANT_FIELDS,
            });
        }

        let pos: u64 = fields[1].parse().map_err(|e| CustomError::Position {
            line_num,
            source: e,
        })?;

        let mut assignments = Vec::new();
        for field in fields[4].split('\t') {
            let (sample, genotype) =
                field
                    .split_once('=')
                    .ok_or_else(|| CustomError::SampleAssignment {
                        line_num,
                        field: field.to_string(),
                    })?;
            assignments.push((sample.to_string(), genotype.to_string()));
        }

        Ok(Self {
            coordinate: Coordinate::new(fields[0], pos),
            reference: fields[2].to_string(),
            alternate: fields[3].to_string(),
            assignments,
        })
    }
}

/// Ref/alt as seen by the marker's test-allele definition: reverse-strand
/// markers compare against the complement of the input alleles.
fn resolve_alleles(marker: &Marker, reference: &str, alternate: &str) -> Result<(Nucleotide, Nucleotide)> {
    let reference = Nucleotide::parse(reference)?;
    let alternate = Nucleotide::parse(alternate)?;
    match marker.strand {
        Strand::Forward => Ok((reference, alternate)),
        Strand::Reverse => Ok((reference.complement(), alternate.complement())),
    }
}

fn reference_is_test(marker: &Marker, reference: Nucleotide, alternate: Nucleotide) -> Result<bool> {
    if marker.test_allele == reference {
        Ok(true)
    } else if marker.test_allele == alternate {
        Ok(false)
    } else {
        Err(CustomError::AlleleMismatch {
            marker: marker.id.clone(),
            test_allele: marker.test_allele.symbol(),
            strand: marker.strand.name(),
            reference: reference.symbol(),
            alternate: alternate.symbol(),
        })
    }
}

/// Samples x markers dosage grid. Sample order comes from the first
/// variant line; cells of markers never seen in the stream stay unset.
#[derive(Debug)]
pub struct DosageMatrix {
    samples: Vec<String>,
    n_markers: usize,
    cells: Vec<Option<u8>>, // Flat (samples x markers) row-major
}

impl DosageMatrix {
    fn new(samples: Vec<String>, n_markers: usize) -> Self {
        let n_samples = samples.len();
        Self {
            samples,
            n_markers,
            cells: vec![None; n_samples * n_markers],
        }
    }

    fn set(&mut self, sample_idx: usize, marker_idx: usize, dosage: u8) {
        self.cells[sample_idx * self.n_markers + marker_idx] = Some(dosage);
    }

    fn samples_match(&self, assignments: &[(String, String)]) -> bool {
        self.samples.len() == assignments.len()
            && self
                .samples
                .iter()
                .zip(assignments)
                .all(|(sample, (id, _))| sample == id)
    }

    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    pub fn dosage(&self, sample_idx: usize, marker_idx: usize) -> Option<u8> {
        self.cells[sample_idx * self.n_markers + marker_idx]
    }

    /// Rows in first-line sample order, each a marker-ordered dosage slice.
    pub fn rows(&self) -> impl Iterator<Item = (&str, &[Option<u8>])> {
        self.samples
            .iter()
            .map(|s| s.as_str())
            .zip(self.cells.chunks(self.n_markers))
    }
}

/// Single forward pass over the variant stream. Coordinates the table does
/// not know are warned about and skipped; everything else that deviates
/// from the contract is fatal.
pub fn translate(table: &MarkerTable, input: impl BufRead) -> Result<DosageMatrix> {
    let mut matrix = DosageMatrix::new(Vec::new(), table.len());
    let mut n_translated = 0usize;
    let mut n_unknown = 0usize;

    for (line_idx, line) in input.lines().enumerate() {
        let line = line.map_err(|e| CustomError::ReadStream { source: e })?;
        let line_num = line_idx + 1;
        let record = VariantRecord::parse(&line, line_num)?;

        let Some(marker_idx) = table.lookup(&record.coordinate) else {
            warn!(
                "no HIrisPlex-S marker at {}, skipping line {line_num}",
                record.coordinate
            );
            n_unknown += 1;
            continue;
        };
        let marker = table.marker(marker_idx);

        let (reference, alternate) = resolve_alleles(marker, &record.reference, &record.alternate)?;
        let reference_is_test = reference_is_test(marker, reference, alternate)?;

        // Sample ids and count are only known once the first data line
        // arrives; every later line must repeat them in the same order.
        if matrix.samples().is_empty() {
            let samples = record.assignments.iter().map(|(id, _)| id.clone()).collect();
            matrix = DosageMatrix::new(samples, table.len());
        } else if !matrix.samples_match(&record.assignments) {
            return Err(CustomError::InconsistentSamples { line_num });
        }

        for (sample_idx, (_, genotype)) in record.assignments.iter().enumerate() {
            let genotype = PhasedGenotype::parse(genotype, &marker.id)?;
            matrix.set(sample_idx, marker_idx, genotype.dosage(reference_is_test));
        }
        n_translated += 1;
    }

    info!(
        "translated {n_translated} of {} panel markers for {} samples ({n_unknown} off-panel sites skipped)",
        table.len(),
        matrix.samples().len(),
    );
    Ok(matrix)
}

/// Writes the uploadable CSV: `sampleid,<markerId>...` header in table
/// order, one dosage row per sample.
pub fn write_dosages(table: &MarkerTable, matrix: &DosageMatrix, out: impl Write) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(std::iter::once("sampleid").chain(table.header_columns()))?;

    for (sample, dosages) in matrix.rows() {
        let cells = dosages.iter().map(|d| match d {
            Some(d) => d.to_string(),
            None => NO_CALL.to_string(),
        });
        wtr.write_record(std::iter::once(sample.to_string()).chain(cells))?;
    }

    wtr.flush().map_err(|e| CustomError::Write { source: e })?;
    Ok(())
}
