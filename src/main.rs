/// plotmark entry point: replay an editing script against one survey task
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use plotmark::app::{self, Args};
    use plotmark::config::AppConfig;

    let config = AppConfig::load_from_default_path().unwrap_or_default();

    // RUST_LOG still wins over the configured level
    let level = config.preferences.log_level.to_level_filter().to_string();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let result = Args::parse(&args).and_then(|args| app::run(&args, &config));

    if let Err(e) = result {
        eprintln!("plotmark error: {}", e);
        std::process::exit(1);
    }
}

// No filesystem or terminal on WASM
#[cfg(target_arch = "wasm32")]
fn main() {}
