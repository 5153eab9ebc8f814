use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

pub const RESULT_FIELDS: usize = 90;

static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

pub const TRANSLATE_TABLE: &str = "rs16891982_C\t5\t33951693\tF\tC\n\
                                   rs12913832_C\t15\t28365618\tR\tC\n\
                                   rs1126809_A\t11\t89017961\tF\tA\n";

pub const VARIANTS: &str = "5\t33951693\tC\tG\tNA001=0|1\tNA002=1|1\n\
                            15\t28365618\tA\tG\tNA001=1|1\tNA002=0|0\n\
                            11\t89017961\tG\tA\tNA001=0|0\tNA002=0|1\n";

pub const DOSAGE_CSV: &str = "sampleid,rs16891982_C,rs12913832_C,rs1126809_A\n\
                              NA001,1,2,0\n\
                              NA002,0,0,1\n";

/// Fresh per-test scratch directory under the system temp dir.
pub fn dataset_dir(label: &str) -> io::Result<PathBuf> {
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    let dir = std::env::temp_dir().join("hisplex-tests").join(format!(
        "{}-{}-{}",
        std::process::id(),
        id,
        label
    ));
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

pub fn write_file(dir: &Path, name: &str, contents: &str) -> io::Result<PathBuf> {
    let path = dir.join(name);
    fs::write(&path, contents)?;
    Ok(path)
}

pub fn results_header() -> String {
    (0..RESULT_FIELDS)
        .map(|i| format!("col{i}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// One 90-field predictor output row with the probability groups at their
/// fixed offsets (eye 42..45, hair 53..57, light/dark 67..69, skin 73..78)
/// and every other field zeroed.
pub fn result_row(
    sample_id: &str,
    eye: [&str; 3],
    hair: [&str; 4],
    shade: [&str; 2],
    skin: [&str; 5],
) -> String {
    let mut fields = vec!["0"; RESULT_FIELDS];
    fields[0] = sample_id;
    fields[42..45].copy_from_slice(&eye);
    fields[53..57].copy_from_slice(&hair);
    fields[67..69].copy_from_slice(&shade);
    fields[73..78].copy_from_slice(&skin);
    fields.join(",")
}
