use anyhow::Result;
use indeed_etl::core::cleaner::OBSOLETE_FIELDS;
use indeed_etl::{clean, repair, EtlError};
use serde_json::json;

/// 舊版擷取器產生、帶有結尾逗號與註解的匯出檔
const BROKEN_EXPORT: &str = r#"{
  // exported 2025-01-12
  "meta": {
    "export_date": "2025-01-12",
    "source": "Indeed Application History (HTML Extract)",
    "total_entries": 3,
  },
  "applications": [
    {
      "id": 1,
      "title": "Senior Rust Engineer",
      "status": "Interviewing",
      "date_applied": "2024-09-16",
      "original_date_text": "Applied on Sep 16",
      "sub_status": "Phone screen"
    },
    {
      "id": 2,
      "title": "Backend Developer", /* renamed */
      "status": "Applied",
      "date_applied": "2025-01-06",
      "original_date_text": "Applied Mon"
    },
  ]
}"#;

#[test]
fn test_repair_then_clean_legacy_export() -> Result<()> {
    let outcome = repair(BROKEN_EXPORT)?;
    assert!(outcome.repaired);

    let mut document = outcome.value;
    let fields: Vec<String> = OBSOLETE_FIELDS.iter().map(|f| f.to_string()).collect();
    let report = clean(&mut document, &fields)?;

    assert_eq!(report.applications, 2);
    assert_eq!(report.records_touched, 2);
    assert_eq!(report.fields_removed, 3);
    assert_eq!(document["meta"]["total_entries"], 2);
    assert_eq!(
        document["applications"][1],
        json!({
            "id": 2,
            "title": "Backend Developer",
            "status": "Applied",
            "date_applied": "2025-01-06"
        })
    );

    Ok(())
}

#[test]
fn test_repair_specified_cases() -> Result<()> {
    assert_eq!(repair(r#"{"a":1,}"#)?.value, json!({"a": 1}));
    assert_eq!(repair(r#"{"a": /* x */ 1}"#)?.value, json!({"a": 1}));
    assert!(matches!(
        repair("not json"),
        Err(EtlError::JsonRepairError { .. })
    ));
    Ok(())
}

#[test]
fn test_missing_bracket_is_not_repaired() {
    let err = repair("{\"applications\": [\n  {\"id\": 1},\n").unwrap_err();
    match err {
        EtlError::JsonRepairError { line, .. } => assert!(line >= 2),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_custom_field_list() -> Result<()> {
    let mut document = json!({
        "applications": [{"id": 1, "title": "A", "status": "Applied"}]
    });

    let report = clean(&mut document, &["status".to_string()])?;

    assert_eq!(report.fields_removed, 1);
    assert_eq!(document["applications"][0], json!({"id": 1, "title": "A"}));
    Ok(())
}
