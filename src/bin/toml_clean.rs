use clap::Parser;
use sheet_clean::adapters::export::archive_name;
use sheet_clean::config::toml_config::TomlConfig;
use sheet_clean::core::ConfigProvider;
use sheet_clean::utils::error::ErrorSeverity;
use sheet_clean::utils::{logger, validation::Validate};
use sheet_clean::{CleanPipeline, LocalStorage, PipelineRunner};

#[derive(Parser)]
#[command(name = "toml-clean")]
#[command(about = "Spreadsheet cleanup driven by a TOML job file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "sheet-clean.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Override the input file from config
    #[arg(long)]
    input: Option<String>,

    /// Show what would be processed without executing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    if config.json_logs() {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting TOML-based cleanup");
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    if let Some(input) = &args.input {
        config.input.path = input.clone();
        tracing::info!("🔧 Input overridden to: {}", input);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");

    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No actual processing will occur");
        perform_dry_run(&config);
        return Ok(());
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.system_stats_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let input = LocalStorage::new(".".to_string());
    let output = LocalStorage::new(config.output_path().to_string());
    let pipeline = CleanPipeline::new(input, output, config);
    let runner = PipelineRunner::new_with_monitoring(pipeline, monitor_enabled);

    match runner.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Cleanup completed successfully!");
            println!("✅ Cleanup completed successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Cleanup failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!("  Job: {}", config.job.name);
    if let Some(description) = &config.job.description {
        println!("  Description: {}", description);
    }
    println!("  Input: {}", config.input_path());
    println!("  Output: {}", config.output_path());
    println!("  Layout: {:?}", config.export_layout());
    println!("  Max Input: {} MB", config.max_input_bytes() / (1024 * 1024));

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn perform_dry_run(config: &TomlConfig) {
    println!("🔍 Dry Run Analysis:");
    println!();

    println!("🗂️ Column Selection:");
    if config.columns.is_empty() {
        println!("  Every column of every sheet");
    } else {
        for (sheet, columns) in &config.columns {
            println!("  {} -> {}", sheet, columns.join(", "));
        }
    }

    let options = config.processing_options();
    println!();
    println!("🛠️ Normalization:");
    for option in options.applied_options() {
        println!("  ✅ {}", option);
    }
    for rule in &options.custom_replacements {
        println!("  🔄 /{}/ -> '{}'", rule.from, rule.to);
    }
    println!("  Invalid patterns: {:?}", options.on_invalid_pattern);

    println!();
    println!("💾 Output Configuration:");
    println!("  Archive: {}/{}", config.output_path(), archive_name(config.input_path()));

    println!();
    println!("✅ Dry run analysis complete. Use --verbose for more details during actual run.");
}
