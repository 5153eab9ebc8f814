mod common;

use std::io::Write;
use std::process::{Command, Output, Stdio};

fn hisplex() -> Command {
    Command::new(env!("CARGO_BIN_EXE_hisplex"))
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "hisplex failed: stdout={} stderr={}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}

fn assert_failure(output: &Output) {
    assert!(
        !output.status.success(),
        "hisplex unexpectedly succeeded: stdout={} stderr={}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn translate_cli_generates_dosage_csv() {
    let dir = common::dataset_dir("translate").unwrap();
    let table = common::write_file(&dir, "translate.tsv", common::TRANSLATE_TABLE).unwrap();
    let variants = common::write_file(&dir, "variants.tsv", common::VARIANTS).unwrap();

    let output = hisplex()
        .arg("translate")
        .arg(&table)
        .arg(&variants)
        .output()
        .expect("failed to run hisplex");
    assert_success(&output);
    assert_eq!(String::from_utf8_lossy(&output.stdout), common::DOSAGE_CSV);
}

#[test]
fn translate_cli_reads_stdin() {
    let dir = common::dataset_dir("translate-stdin").unwrap();
    let table = common::write_file(&dir, "translate.tsv", common::TRANSLATE_TABLE).unwrap();

    let mut child = hisplex()
        .arg("translate")
        .arg(&table)
        .arg("-")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn hisplex");
    child
        .stdin
        .take()
        .expect("missing child stdin")
        .write_all(common::VARIANTS.as_bytes())
        .expect("failed to write variants to stdin");
    let output = child.wait_with_output().expect("failed to wait for hisplex");

    assert_success(&output);
    assert_eq!(String::from_utf8_lossy(&output.stdout), common::DOSAGE_CSV);
}

#[test]
fn translate_cli_warns_and_skips_off_panel_sites() {
    let dir = common::dataset_dir("translate-off-panel").unwrap();
    let table = common::write_file(&dir, "translate.tsv", common::TRANSLATE_TABLE).unwrap();
    // Two panel sites, one off-panel site, and no data at all for rs1126809_A.
    let variants = common::write_file(
        &dir,
        "variants.tsv",
        "5\t33951693\tC\tG\tNA001=0|1\n\
         1\t999\tA\tT\tNA001=1|1\n\
         15\t28365618\tA\tG\tNA001=1|1\n",
    )
    .unwrap();

    let output = hisplex()
        .arg("translate")
        .arg(&table)
        .arg(&variants)
        .output()
        .expect("failed to run hisplex");
    assert_success(&output);

    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "sampleid,rs16891982_C,rs12913832_C,rs1126809_A\nNA001,1,2,NA\n"
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("1:999"),
        "stderr did not mention the off-panel coordinate: {stderr}"
    );
}

#[test]
fn translate_cli_rejects_unknown_strand_code() {
    let dir = common::dataset_dir("translate-bad-strand").unwrap();
    let table =
        common::write_file(&dir, "translate.tsv", "rs1126809_A\t11\t89017961\tX\tA\n").unwrap();
    let variants = common::write_file(&dir, "variants.tsv", common::VARIANTS).unwrap();

    let output = hisplex()
        .arg("translate")
        .arg(&table)
        .arg(&variants)
        .output()
        .expect("failed to run hisplex");
    assert_failure(&output);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("strand"),
        "stderr did not mention the strand code: {stderr}"
    );
}

#[test]
fn translate_cli_rejects_mismatched_test_allele() {
    let dir = common::dataset_dir("translate-allele-mismatch").unwrap();
    let table = common::write_file(&dir, "translate.tsv", common::TRANSLATE_TABLE).unwrap();
    // Neither A nor T can be the test allele C of rs16891982_C.
    let variants =
        common::write_file(&dir, "variants.tsv", "5\t33951693\tA\tT\tNA001=0|1\n").unwrap();

    let output = hisplex()
        .arg("translate")
        .arg(&table)
        .arg(&variants)
        .output()
        .expect("failed to run hisplex");
    assert_failure(&output);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("rs16891982_C"),
        "stderr did not mention the mismatched marker: {stderr}"
    );
}

#[test]
fn classify_cli_condensed() {
    let dir = common::dataset_dir("classify-short").unwrap();
    let results = format!(
        "{}\n{}\n{}\n",
        common::results_header(),
        common::result_row(
            "S1",
            ["0.9", "0.05", "0.05"],
            ["0.05", "0.1", "0.05", "0.8"],
            ["0.3", "0.7"],
            ["0.95", "0.02", "0.01", "0.01", "0.01"],
        ),
        common::result_row(
            "S2",
            ["0.2", "0.5", "0.3"],
            ["0.8", "0.1", "0.05", "0.05"],
            ["0.96", "0.04"],
            ["0.1", "0.75", "0.1", "0.05", "0.0"],
        ),
    );
    let results = common::write_file(&dir, "results.csv", &results).unwrap();

    let output = hisplex()
        .arg("classify")
        .arg("--short")
        .arg(&results)
        .output()
        .expect("failed to run hisplex");
    assert_success(&output);
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "sampleid,EyeColor,HairColor,SkinColor\n\
         S1,Blue,Black,Very Pale\n\
         S2,Intermediate,Blond,Pale\n"
    );
}

#[test]
fn classify_cli_verbose_appends_labels() {
    let dir = common::dataset_dir("classify-verbose").unwrap();
    let row = common::result_row(
        "S1",
        ["0.9", "0.05", "0.05"],
        ["0.8", "0.1", "0.05", "0.05"],
        ["0.96", "0.04"],
        ["0.95", "0.02", "0.01", "0.01", "0.01"],
    );
    let results = format!("{}\n{}\n", common::results_header(), row);
    let results = common::write_file(&dir, "results.csv", &results).unwrap();

    let output = hisplex()
        .arg("classify")
        .arg(&results)
        .output()
        .expect("failed to run hisplex");
    assert_success(&output);
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        format!(
            "{},EyeColor,HairColor,SkinColor\n{},Blue,Blond,Very Pale\n",
            common::results_header(),
            row
        )
    );
}

#[test]
fn classify_cli_rejects_wrong_field_count() {
    let dir = common::dataset_dir("classify-bad-row").unwrap();
    let results = format!("{}\nS1,0.1,0.2\n", common::results_header());
    let results = common::write_file(&dir, "results.csv", &results).unwrap();

    let output = hisplex()
        .arg("classify")
        .arg("--short")
        .arg(&results)
        .output()
        .expect("failed to run hisplex");
    assert_failure(&output);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("90"),
        "stderr did not mention the expected field count: {stderr}"
    );
}
