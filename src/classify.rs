use std::cmp::Ordering;
use std::io::{Read, Write};
use std::ops::Range;

use itertools::Itertools;

use crate::error::{CustomError, Result};

/// The webtool's Result.csv carries exactly 90 comma-separated fields per
/// row. The probability groups below sit at fixed offsets in that row; the
/// offsets are an external contract with the predictor's output format.
pub(crate) const RESULT_FIELDS: usize = 90;
const EYE_FIELDS: Range<usize> = 42..45; // blue, intermediate, brown
const HAIR_FIELDS: Range<usize> = 53..57; // blond, brown, red, black
const SHADE_FIELDS: Range<usize> = 67..69; // light, dark
const SKIN_FIELDS: Range<usize> = 73..78; // very pale .. dark to black

const LABEL_COLUMNS: [&str; 3] = ["EyeColor", "HairColor", "SkinColor"];

/// The five skin categories of the model, declared light to dark so the
/// derived ordering doubles as the lighter/darker comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum SkinTone {
    VeryPale,
    Pale,
    Intermediate,
    Dark,
    DarkToBlack,
}

const SKIN_TONES: [SkinTone; 5] = [
    SkinTone::VeryPale,
    SkinTone::Pale,
    SkinTone::Intermediate,
    SkinTone::Dark,
    SkinTone::DarkToBlack,
];

/// One classifiable row of the predictor output.
#[derive(Debug, Clone)]
pub struct ProbabilityRow {
    pub sample_id: String,
    pub eye: [f64; 3],
    pub hair: [f64; 4],
    pub shade: [f64; 2],
    pub skin: [f64; 5],
}

impl ProbabilityRow {
    pub fn from_record(record: &csv::StringRecord, line_num: usize) -> Result<Self> {
        if record.len() != RESULT_FIELDS {
            return Err(CustomError::ResultFields {
                line_num,
                n_fields: record.len(),
                expected: RESULT_FIELDS,
            });
        }
        Ok(Self {
            sample_id: record[0].to_string(),
            eye: parse_group(record, EYE_FIELDS, line_num)?,
            hair: parse_group(record, HAIR_FIELDS, line_num)?,
            shade: parse_group(record, SHADE_FIELDS, line_num)?,
            skin: parse_group(record, SKIN_FIELDS, line_num)?,
        })
    }
}

fn parse_group<const N: usize>(
    record: &csv::StringRecord,
    fields: Range<usize>,
    line_num: usize,
) -> Result<[f64; N]> {
    let mut out = [0.0; N];
    for (slot, field_idx) in out.iter_mut().zip(fields) {
        *slot = record[field_idx]
            .trim()
            .parse()
            .map_err(|e| CustomError::Probability {
                line_num,
                field_num: field_idx + 1,
                source: e,
            })?;
    }
    Ok(out)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationResult {
    pub sample_id: String,
    pub eye: &'static str,
    pub hair: &'static str,
    pub skin: &'static str,
}

pub fn classify_row(row: &ProbabilityRow) -> ClassificationResult {
    ClassificationResult {
        sample_id: row.sample_id.clone(),
        eye: classify_eye(row.eye),
        hair: classify_hair(row.hair, row.shade),
        skin: classify_skin(row.skin),
    }
}

/// Strict arg-max over the three eye probabilities; any tie falls through
/// to brown.
pub fn classify_eye(probabilities: [f64; 3]) -> &'static str {
    let [blue, intermediate, brown] = probabilities;
    if blue > intermediate && blue > brown {
        "Blue"
    } else if intermediate > blue && intermediate > brown {
        "Intermediate"
    } else {
        "Brown"
    }
}

/// The published hair decision tree. Branch order matters, and the weak
/// ties are asymmetric on purpose: black wins its tie with brown, blond
/// wins its tie with brown.
pub fn classify_hair(base: [f64; 4], shade: [f64; 2]) -> &'static str {
    let [blond, brown, red, black] = base;
    let [light, dark] = shade;

    if black > blond && black >= brown && black > red {
        if black > 0.7 || dark > 0.5 {
            "Black"
        } else {
            "Dark brown/Black"
        }
    } else if blond >= brown && blond > red && blond > black {
        if blond > 0.7 {
            if light > 0.95 { "Blond" } else { "Blond/Dark-Blond" }
        } else if light > 0.9 {
            "Blond/Dark-Blond"
        } else {
            "Dark-Blond/Brown"
        }
    } else if brown >= blond && brown > red && brown > black {
        if brown > 0.7 {
            if light > 0.8 { "Brown" } else { "Brown/Dark-Brown" }
        } else if light > 0.8 {
            "Brown/Dark-Brown"
        } else {
            "Dark-Brown/Black"
        }
    } else if red > blond && red > brown && red > black {
        "Red"
    } else {
        // Reachable only when the probability fields violate the upstream
        // contract (e.g. NaN in every column).
        "Invalid hair color"
    }
}

/// The published skin decision table: rank the five categories by
/// probability, then branch on the magnitude of the top one. The table is
/// a literal transcription of the classification guide, not a general
/// rule; keep it branch for branch when touching it.
pub fn classify_skin(probabilities: [f64; 5]) -> &'static str {
    use SkinTone::*;

    // Stable descending sort: on an exact tie the lighter category ranks
    // first.
    let ranked: Vec<(f64, SkinTone)> = probabilities
        .into_iter()
        .zip(SKIN_TONES)
        .sorted_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal))
        .collect();
    let (top_p, top) = ranked[0];
    let (second_p, second) = ranked[1];

    if top_p > 0.9 {
        match top {
            VeryPale => "Very Pale",
            Pale => "Pale",
            // The guide compares the runner-up to 4 here even though
            // probabilities never exceed 1; almost certainly a unit error
            // in the source, kept verbatim for output parity.
            Intermediate => {
                if second_p == 4.0 {
                    "Dark"
                } else {
                    "Intermediate"
                }
            }
            Dark => "Dark",
            DarkToBlack => "Dark-Black",
        }
    } else if top_p > 0.7 {
        match top {
            VeryPale => {
                if second_p < 0.15 {
                    "Very Pale"
                } else {
                    "Very Pale/Darker"
                }
            }
            Pale => {
                if second_p < 0.15 {
                    "Pale"
                } else if second == VeryPale {
                    "Pale/Lighter"
                } else {
                    "Pale/Darker"
                }
            }
            Intermediate => {
                if second_p < 0.15 {
                    "Intermediate"
                } else if second < Intermediate {
                    "Intermediate/Lighter"
                } else {
                    "Intermediate/Darker"
                }
            }
            Dark => {
                if second == DarkToBlack {
                    "Dark-Black"
                } else {
                    "Dark"
                }
            }
            DarkToBlack => "Dark-Black",
        }
    } else {
        match top {
            VeryPale => match second {
                Pale => "Pale/Lighter",
                Intermediate => "Intermediate/Lighter",
                _ => "Dark/Lighter",
            },
            Pale => match second {
                VeryPale => "Pale",
                Intermediate => "Intermediate/Lighter",
                _ => "Dark/Lighter",
            },
            Intermediate => {
                if second > Intermediate {
                    "Intermediate/Darker"
                } else {
                    "Intermediate"
                }
            }
            Dark => {
                if second == DarkToBlack {
                    "Dark-Black/Dark"
                } else {
                    "Dark"
                }
            }
            DarkToBlack => {
                if second == Dark {
                    "Dark-Black/Dark"
                } else {
                    "Dark-Black"
                }
            }
        }
    }
}

/// Streams the predictor's Result.csv, appending the three phenotype
/// labels to every row (or condensing to ids and labels with `short`).
/// The first row is the header and is echoed, never classified.
pub fn classify_results(input: impl Read, out: impl Write, short: bool) -> Result<()> {
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(input);
    let mut wtr = csv::Writer::from_writer(out);

    let mut records = rdr.into_records();
    let Some(header) = records.next() else {
        return Ok(()); // nothing to classify, nothing to emit
    };
    let header = header.map_err(|source| CustomError::CsvRead { source })?;

    if short {
        wtr.write_record(std::iter::once("sampleid").chain(LABEL_COLUMNS))?;
    } else {
        wtr.write_record(header.iter().chain(LABEL_COLUMNS))?;
    }

    for record in records {
        let record = record.map_err(|source| CustomError::CsvRead { source })?;
        let line_num = record.position().map_or(0, |p| p.line() as usize);
        let row = ProbabilityRow::from_record(&record, line_num)?;
        let labels = classify_row(&row);

        if short {
            wtr.write_record([
                row.sample_id.as_str(),
                labels.eye,
                labels.hair,
                labels.skin,
            ])?;
        } else {
            wtr.write_record(record.iter().chain([labels.eye, labels.hair, labels.skin]))?;
        }
    }

    wtr.flush().map_err(|e| CustomError::Write { source: e })?;
    Ok(())
}
