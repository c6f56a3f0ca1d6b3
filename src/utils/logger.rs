use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const CRATES: [&str; 2] = ["routefinder", "compile_navdata"];

/// `RUST_LOG` 優先，否則使用本專案 crate 的預設等級
fn env_filter(level: &str, fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let mut directives: Vec<String> =
            CRATES.iter().map(|krate| format!("{}={}", krate, level)).collect();
        directives.push(fallback.to_string());
        EnvFilter::new(directives.join(","))
    })
}

/// 日誌寫到 stderr，stdout 保留給航路輸出
pub fn init_cli_logger(verbose: bool) {
    let filter = if verbose {
        env_filter("debug", "info")
    } else {
        env_filter("info", "warn")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_file(false)
                .with_line_number(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

pub fn init_json_logger() {
    tracing_subscriber::registry()
        .with(env_filter("info", "warn"))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
                .json(),
        )
        .init();
}
