use clap::Parser;
use indeed_etl::core::input::resolve_input;
use indeed_etl::core::ConfigProvider;
use indeed_etl::utils::logger;
use indeed_etl::{CliConfig, EtlEngine, IndeedPipeline, LocalStorage, TomlConfig};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if let Err(e) = logger::init_cli_logger(cli.verbose, cli.log_format, cli.log_file.as_deref()) {
        eprintln!("❌ Could not open log file: {}", e);
        std::process::exit(1);
    }

    tracing::info!("🚀 Starting indeed-etl");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // 載入並驗證配置
    let config = match cli.resolve_config() {
        Ok(config) => config,
        Err(e) => std::process::exit(logger::report_failure("Configuration", &e)),
    };

    let storage = LocalStorage::new(".".to_string());

    // 決定輸入檔
    let input =
        match resolve_input(&storage, cli.input.as_deref(), config.input_candidates()).await {
            Ok(input) => input,
            Err(e) => std::process::exit(logger::report_failure("Input lookup", &e)),
        };

    display_config_summary(&config, &input, cli.dry_run);

    let settings = config.extraction_settings();
    let summary = config.summary.clone();
    let pipeline = IndeedPipeline::new(storage, config, settings, input);
    let engine = EtlEngine::new(pipeline).with_summary(summary);

    if cli.dry_run {
        match engine.dry_run().await {
            Ok(result) => {
                println!("{}", serde_json::to_string_pretty(&result.document)?);
                return Ok(());
            }
            Err(e) => std::process::exit(logger::report_failure("Dry run", &e)),
        }
    }

    match engine.run().await {
        Ok(summary) => {
            println!(
                "✅ Successfully extracted {} applications",
                summary.total_entries
            );
            println!("📁 Output saved to: {}", summary.output_path);
            println!(
                "📈 Response rate: {:.1}% ({} of {})",
                summary.applications.response_rate,
                summary.applications.responded,
                summary.applications.total
            );
            if let Some(rate) = &summary.applications.location_rate {
                println!(
                    "📍 Response rate in '{}': {:.1}% ({} applications)",
                    rate.query, rate.response_rate, rate.matched
                );
            }
            if summary.stats.errors > 0 {
                println!("⚠️ {} cards were skipped (see log)", summary.stats.errors);
            }
        }
        Err(e) => std::process::exit(logger::report_failure("Extraction", &e)),
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, input: &str, dry_run: bool) {
    tracing::info!("📋 Configuration Summary:");
    tracing::info!("  Input: {}", input);
    tracing::info!("  Output: {}", config.output_path());
    tracing::info!("  Formats: {}", config.output_formats().join(", "));
    tracing::info!("  Backup: {}", config.backup_enabled());
    tracing::info!("  Card selector: {}", config.schema.card);
    if let Some(location) = &config.summary.location {
        tracing::info!("  Location focus: {}", location);
    }

    if dry_run {
        tracing::info!("  🔍 DRY RUN MODE ENABLED");
    }
}
