use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};
use indeed_etl::core::input::resolve_input;
use indeed_etl::core::ConfigProvider;
use indeed_etl::{EtlEngine, EtlError, ExportDocument, IndeedPipeline, LocalStorage, TomlConfig};
use tempfile::TempDir;

const FIXTURE: &str = include_str!("fixtures/my_jobs.html");

fn clock() -> NaiveDateTime {
    // 星期日
    NaiveDate::from_ymd_opt(2025, 1, 12)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap()
}

fn engine_for(
    temp_dir: &TempDir,
    config: TomlConfig,
    input: &str,
) -> EtlEngine<IndeedPipeline<LocalStorage, TomlConfig>> {
    let storage = LocalStorage::new(temp_dir.path().to_str().unwrap().to_string());
    let settings = config.extraction_settings();
    let pipeline =
        IndeedPipeline::new(storage, config, settings, input.to_string()).with_clock(clock());
    EtlEngine::new(pipeline)
}

#[tokio::test]
async fn test_end_to_end_extraction_writes_document() -> Result<()> {
    let temp_dir = TempDir::new()?;
    std::fs::write(temp_dir.path().join("My jobs _ Indeed.html"), FIXTURE)?;

    let engine = engine_for(&temp_dir, TomlConfig::default(), "My jobs _ Indeed.html");
    let summary = engine.run().await?;

    assert_eq!(summary.output_path, "data/indeed-applications.json");
    assert_eq!(summary.total_entries, 4);
    assert_eq!(summary.stats.total_cards, 4);
    assert_eq!(summary.stats.successful, 4);
    assert_eq!(summary.stats.errors, 0);
    assert_eq!(summary.stats.warnings, 2);
    assert_eq!(summary.applications.responded, 2);
    assert_eq!(summary.applications.response_rate, 50.0);
    assert_eq!(summary.applications.top_statuses[0], ("Applied".to_string(), 2));

    let written = std::fs::read_to_string(temp_dir.path().join(&summary.output_path))?;
    // 縮排輸出
    assert!(written.contains("\n  \"meta\": {"));

    let doc: ExportDocument = serde_json::from_str(&written)?;
    assert_eq!(doc.meta.total_entries, doc.applications.len());
    assert_eq!(doc.meta.export_date.to_string(), "2025-01-12");
    assert_eq!(doc.meta.source, "Indeed Application History (HTML Extract)");

    let ids: Vec<usize> = doc.applications.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4]);

    let first = &doc.applications[0];
    assert_eq!(first.title, "Senior Rust Engineer");
    assert_eq!(first.company, "Ferrous Systems");
    assert_eq!(first.location, "Berlin, Germany");
    assert_eq!(first.status, "Interviewing");
    assert_eq!(first.date_applied.to_string(), "2024-09-16");

    let second = &doc.applications[1];
    assert_eq!(second.title, "Backend Developer (Tokio)");
    assert_eq!(second.status, "Not selected by employer");
    assert_eq!(second.date_applied.to_string(), "2025-01-06");

    let third = &doc.applications[2];
    assert_eq!(third.company, "Unknown Company");
    assert_eq!(third.location, "Unknown Location");
    assert_eq!(third.status, "Applied");
    assert_eq!(third.date_applied.to_string(), "2025-01-11");

    let fourth = &doc.applications[3];
    assert_eq!(fourth.title, "Unknown Title");
    assert_eq!(fourth.company, "Mystery Corp");
    assert_eq!(fourth.date_applied.to_string(), "2025-01-12");

    Ok(())
}

#[tokio::test]
async fn test_second_run_backs_up_previous_output() -> Result<()> {
    let temp_dir = TempDir::new()?;
    std::fs::write(temp_dir.path().join("jobs.html"), FIXTURE)?;
    std::fs::create_dir_all(temp_dir.path().join("data"))?;
    std::fs::write(
        temp_dir.path().join("data/indeed-applications.json"),
        "{\"previous\": true}",
    )?;

    engine_for(&temp_dir, TomlConfig::default(), "jobs.html")
        .run()
        .await?;

    let backup = temp_dir
        .path()
        .join("data/indeed-applications.backup_20250112_093000.json");
    assert_eq!(std::fs::read_to_string(backup)?, "{\"previous\": true}");

    Ok(())
}

#[tokio::test]
async fn test_csv_and_tsv_views_are_written() -> Result<()> {
    let temp_dir = TempDir::new()?;
    std::fs::write(temp_dir.path().join("jobs.html"), FIXTURE)?;

    let toml_content = r#"
[output]
path = "export/apps.json"
formats = ["json", "csv", "tsv"]
backup = false
source = "Indeed export test"
"#;
    let config = TomlConfig::from_toml_str(toml_content)?;

    engine_for(&temp_dir, config, "jobs.html").run().await?;

    let csv = std::fs::read_to_string(temp_dir.path().join("export/apps.csv"))?;
    let tsv = std::fs::read_to_string(temp_dir.path().join("export/apps.tsv"))?;

    assert!(csv.starts_with("id,title,company,location,status,date_applied\n"));
    assert!(csv.contains("2,Backend Developer (Tokio),Async Works,Remote,Not selected by employer,2025-01-06"));
    assert!(csv.contains("1,Senior Rust Engineer,Ferrous Systems,\"Berlin, Germany\",Interviewing,2024-09-16"));
    assert!(tsv.contains("1\tSenior Rust Engineer\tFerrous Systems\tBerlin, Germany\tInterviewing\t2024-09-16"));

    let doc: ExportDocument =
        serde_json::from_str(&std::fs::read_to_string(temp_dir.path().join("export/apps.json"))?)?;
    assert_eq!(doc.meta.source, "Indeed export test");

    Ok(())
}

#[tokio::test]
async fn test_required_fields_skip_bad_cards() -> Result<()> {
    let temp_dir = TempDir::new()?;
    std::fs::write(temp_dir.path().join("jobs.html"), FIXTURE)?;

    let config = TomlConfig::from_toml_str("[validation]\nrequired_fields = [\"title\", \"status\"]\n")?;
    let summary = engine_for(&temp_dir, config, "jobs.html").run().await?;

    assert_eq!(summary.stats.total_cards, 4);
    assert_eq!(summary.stats.successful, 2);
    assert_eq!(summary.stats.errors, 2);
    assert_eq!(summary.total_entries, 2);

    Ok(())
}

#[tokio::test]
async fn test_page_without_cards_fails() -> Result<()> {
    let temp_dir = TempDir::new()?;
    std::fs::write(
        temp_dir.path().join("empty.html"),
        "<html><body><p>You have no applications</p></body></html>",
    )?;

    let err = engine_for(&temp_dir, TomlConfig::default(), "empty.html")
        .run()
        .await
        .unwrap_err();

    assert!(matches!(err, EtlError::NoRecordsExtracted { .. }));
    assert_ne!(err.exit_code(), 0);
    assert!(!temp_dir.path().join("data/indeed-applications.json").exists());

    Ok(())
}

#[tokio::test]
async fn test_input_lookup_uses_default_candidates() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let storage = LocalStorage::new(temp_dir.path().to_str().unwrap().to_string());
    let config = TomlConfig::default();

    let err = resolve_input(&storage, None, config.input_candidates())
        .await
        .unwrap_err();
    assert!(matches!(err, EtlError::InputNotFoundInCandidates { .. }));

    std::fs::create_dir_all(temp_dir.path().join("extract"))?;
    std::fs::write(temp_dir.path().join("extract/My jobs _ Indeed.html"), FIXTURE)?;

    let found = resolve_input(&storage, None, config.input_candidates()).await?;
    assert_eq!(found, "extract/My jobs _ Indeed.html");

    Ok(())
}
