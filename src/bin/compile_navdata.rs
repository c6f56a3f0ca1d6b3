use clap::Parser;
use routefinder::core::ConfigProvider;
use routefinder::utils::{logger, validation::Validate};
use routefinder::{CompileCliConfig, CompileEngine, DataCompiler, LocalStorage, TomlConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = CompileCliConfig::parse();

    if config.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("🚀 Starting navdata compiler");

    if let Some(path) = config.config.clone() {
        tracing::info!("📁 Loading configuration from: {}", path);
        match TomlConfig::from_file(&path).and_then(|file| file.validate().map(|_| file)) {
            Ok(file) => config.apply_file_config(&file),
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", path, e);
                eprintln!("💡 Make sure the file exists and is valid TOML format");
                std::process::exit(e.exit_code());
            }
        }
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("Usage: compile-navdata <Path of Navigraph data for Aerosoft>");
        std::process::exit(e.exit_code());
    }

    let monitor_enabled = config.monitoring_enabled();
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let source = LocalStorage::new(config.navdata_path());
    let output = LocalStorage::new(config.data_dir());
    let compiler =
        DataCompiler::new(source, output).with_source_label(config.navdata_path().to_string());
    let mut engine = CompileEngine::new_with_monitoring(compiler, monitor_enabled);

    match engine.run().await {
        Ok(summary) => {
            tracing::info!(
                "✅ Compiled {} airports, {} airway segments, {} navaids in {:?}",
                summary.airports,
                summary.segments,
                summary.navaids,
                summary.elapsed
            );
            println!(
                "✅ Saved graph.json and info.json to {} ({} vertices, {} edges)",
                config.data_dir(),
                summary.manifest.vertices,
                summary.manifest.edges
            );
        }
        Err(e) => {
            tracing::error!(
                "❌ Compilation failed: {} (Category: {:?}, Severity: {:?})",
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
