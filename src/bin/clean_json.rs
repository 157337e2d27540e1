use clap::Parser;
use indeed_etl::core::cleaner::OBSOLETE_FIELDS;
use indeed_etl::core::input::read_text;
use indeed_etl::core::Storage;
use indeed_etl::utils::logger::{self, LogFormat};
use indeed_etl::{clean, repair, EtlError, LocalStorage};

#[derive(Parser)]
#[command(name = "clean-json")]
#[command(about = "Strip obsolete per-application fields from a JSON export")]
struct Args {
    /// JSON export to clean
    input: String,

    /// Where to write the cleaned document
    #[arg(short, long, default_value = "indeed-applications.json")]
    output: String,

    /// Field to remove from every application (repeatable; defaults to the obsolete fields)
    #[arg(long = "field")]
    fields: Vec<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

async fn run(args: &Args, storage: &LocalStorage) -> indeed_etl::Result<()> {
    if !storage.exists(&args.input).await {
        return Err(EtlError::InputNotFound {
            path: args.input.clone(),
        });
    }

    tracing::info!("📖 Reading '{}'", args.input);
    let text = read_text(storage, &args.input).await?;
    let mut document = repair(&text)?.value;

    let fields = if args.fields.is_empty() {
        OBSOLETE_FIELDS.iter().map(|f| f.to_string()).collect()
    } else {
        args.fields.clone()
    };

    let report = clean(&mut document, &fields)?;
    tracing::info!(
        "🧹 Processed {} applications, removed {} fields from {} records",
        report.applications,
        report.fields_removed,
        report.records_touched
    );

    let json_data = serde_json::to_string_pretty(&document)?;
    storage.write_file(&args.output, json_data.as_bytes()).await?;
    tracing::info!("💾 Wrote cleaned data to '{}'", args.output);

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // 初始化日誌
    logger::init_cli_logger(args.verbose, LogFormat::Compact, None)?;
    tracing::info!("🚀 Starting clean-json");

    let storage = LocalStorage::new(".".to_string());

    match run(&args, &storage).await {
        Ok(()) => {
            println!("✅ Cleaned data written to {}", args.output);
            Ok(())
        }
        Err(e) => std::process::exit(logger::report_failure("clean-json", &e)),
    }
}
