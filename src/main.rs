use clap::Parser;
use routefinder::core::datastore::load_compiled;
use routefinder::core::report;
use routefinder::core::ConfigProvider;
use routefinder::utils::{logger, validation::Validate};
use routefinder::{LocalStorage, RouteCalculator, RouteCliConfig, RouteRequest, TomlConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = RouteCliConfig::parse();

    logger::init_cli_logger(config.verbose);
    tracing::debug!("CLI config: {:?}", config);

    if let Some(path) = config.config.clone() {
        tracing::info!("📁 Loading configuration from: {}", path);
        match TomlConfig::from_file(&path).and_then(|file| file.validate().map(|_| file)) {
            Ok(file) => config.apply_file_config(&file),
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", path, e);
                std::process::exit(e.exit_code());
            }
        }
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }

    let storage = LocalStorage::new(config.data_dir());
    let calculator = match load_compiled(&storage)
        .await
        .and_then(|(graph, info)| RouteCalculator::new(graph, info))
    {
        Ok(calculator) => calculator,
        Err(e) => {
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("Unable to load data: {}", e);
            std::process::exit(e.exit_code());
        }
    };

    let mut request = RouteRequest::new(config.orig.clone(), config.dest.clone());
    request.sid_exit = config.sid_exit.clone();
    request.star_entry = config.star_entry.clone();

    match calculator
        .calculate_with(&request)
        .and_then(|result| report::render(&result, config.output_format()))
    {
        Ok(output) => {
            println!("{}", output);
        }
        Err(e) => {
            tracing::error!(
                "❌ Route calculation failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(e.exit_code());
        }
    }

    Ok(())
}
