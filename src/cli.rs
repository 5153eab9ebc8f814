use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::classify;
use crate::error::{CustomError, Result};
use crate::markers::MarkerTable;
use crate::translate;

/// Variant input is either a regular file or `-` for standard input, so
/// the translate pipeline can sit at the end of a bcftools pipe.
fn open_variants(path: &str) -> Result<Box<dyn BufRead>> {
    if path == "-" {
        Ok(Box::new(BufReader::new(io::stdin())))
    } else {
        let f = File::open(path).map_err(|e| CustomError::ReadWithPath {
            source: e,
            path: path.into(),
        })?;
        Ok(Box::new(BufReader::new(f)))
    }
}

pub fn run_translate(table_path: &Path, variants: &str) -> Result<()> {
    let table_file = File::open(table_path).map_err(|e| CustomError::ReadWithPath {
        source: e,
        path: table_path.to_path_buf(),
    })?;
    let table = MarkerTable::build(BufReader::new(table_file))?;

    let input = open_variants(variants)?;
    let matrix = translate::translate(&table, input)?;
    translate::write_dosages(&table, &matrix, io::stdout().lock())
}

pub fn run_classify(results_path: &Path, short: bool) -> Result<()> {
    let results = File::open(results_path).map_err(|e| CustomError::ReadWithPath {
        source: e,
        path: results_path.to_path_buf(),
    })?;
    classify::classify_results(BufReader::new(results), io::stdout().lock(), short)
}
