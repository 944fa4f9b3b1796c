/// Headless console entry point for native builds.
///
/// Reads one JSON command per line from stdin, e.g.
/// `{"command": "login", "user_id": "op1"}`, and prints one JSON result line
/// per command with the outcome and any notices it produced.
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::io::{BufRead, Write};

    use skysurvey::map::LogSurface;
    use skysurvey::geocode::OfflineGeocoder;
    use skysurvey::store::{FileStorage, LocalBackend, PersistenceMode};
    use skysurvey::{AppConfig, Command, Console};

    let config = AppConfig::load_from_default_path().unwrap_or_default();
    env_logger::Builder::new()
        .filter_level(config.log_level.to_level_filter())
        .init();

    let Some(storage) = FileStorage::in_default_dir() else {
        eprintln!("Could not determine a data directory");
        std::process::exit(1);
    };
    log::info!("Storing data in {:?}", storage.dir());
    if config.persistence.mode == PersistenceMode::Remote {
        log::warn!("Remote persistence is only available in the browser build; using local files");
    }

    let mut console = Console::new(
        LocalBackend::new(storage.clone()),
        Box::new(storage),
        Box::new(LogSurface),
        OfflineGeocoder,
    )
    .with_map_config(config.map);
    pollster::block_on(console.start());

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout().lock();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                log::error!("Failed to read stdin: {}", e);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let result = match serde_json::from_str::<Command>(&line) {
            Ok(command) => {
                let outcome = pollster::block_on(console.dispatch(command));
                serde_json::json!({
                    "outcome": outcome,
                    "notices": console.take_notices(),
                    "view": console.view(),
                })
            }
            Err(e) => serde_json::json!({ "error": format!("Invalid command: {}", e) }),
        };

        if let Err(e) = writeln!(stdout, "{}", result) {
            log::error!("Failed to write result: {}", e);
            break;
        }
    }
}

// WASM doesn't use main(), it uses wasm_bindgen's start function
#[cfg(target_arch = "wasm32")]
fn main() {}
