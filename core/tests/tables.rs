//! JSON Lines interchange: write, read back, tolerate absence markers.

use fraudnet_core::{
    dataset::{Dataset, GenerationSummary},
    model::Claim,
    synthesizer::Synthesizer,
    table::{read_rows, Table, SUMMARY_FILE},
};
use std::io::Write;

#[test]
fn tables_read_back_into_the_same_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let data = Synthesizer::build_test(17).unwrap().run().unwrap();
    let summary = data.write_tables(dir.path()).unwrap();

    for table in Table::ALL {
        assert!(table.path_in(dir.path()).exists(), "{} not written", table.file_name());
    }
    let back = Dataset::read_tables(dir.path()).unwrap();
    assert_eq!(back, data);

    let on_disk: GenerationSummary =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join(SUMMARY_FILE)).unwrap())
            .unwrap();
    assert_eq!(on_disk, summary);
    assert_eq!(on_disk, back.summary());
}

#[test]
fn missing_table_reads_as_none() {
    let dir = tempfile::tempdir().unwrap();
    let rows: Option<Vec<Claim>> = read_rows(&Table::Claims.path_in(dir.path())).unwrap();
    assert!(rows.is_none());
    assert!(Dataset::read_tables(dir.path()).is_err());
}

#[test]
fn absent_foreign_keys_accept_every_marker() {
    let dir = tempfile::tempdir().unwrap();
    let data = Synthesizer::build_test(2).unwrap().run().unwrap();
    let template = serde_json::to_value(&data.claims[0]).unwrap();

    let path = Table::Claims.path_in(dir.path());
    let mut file = std::fs::File::create(&path).unwrap();
    for marker in [
        serde_json::json!(null),
        serde_json::json!(""),
        serde_json::json!("NaN"),
        serde_json::json!("nan"),
        serde_json::json!("None"),
    ] {
        let mut row = template.clone();
        row["medical_provider_id"] = marker.clone();
        row["lawyer_id"] = marker;
        writeln!(file, "{row}").unwrap();
    }
    let mut row = template.clone();
    row.as_object_mut().unwrap().remove("lawyer_id");
    writeln!(file, "{row}").unwrap();
    drop(file);

    let claims: Vec<Claim> = read_rows(&path).unwrap().unwrap();
    assert_eq!(claims.len(), 6);
    for c in &claims {
        assert!(c.medical_provider_id.is_none() || c.lawyer_id.is_none());
    }
    assert!(claims[..5]
        .iter()
        .all(|c| c.medical_provider_id.is_none() && c.lawyer_id.is_none()));
}

#[test]
fn malformed_line_reports_its_position() {
    let dir = tempfile::tempdir().unwrap();
    let path = Table::Claims.path_in(dir.path());
    std::fs::write(&path, "{\"claim_id\": \"CLAIM_0\"}\n").unwrap();
    let err = read_rows::<Claim>(&path).unwrap_err();
    assert!(err.to_string().contains("line 1"), "{err}");
}
