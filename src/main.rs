// This file is part of the product Proxima.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_files::Files;
use actix_web::rt::System;
use actix_web::{App, HttpServer, middleware::Logger, web};
use log::{LevelFilter, info};
use std::io::Write;
use std::path::PathBuf;

use proxima::app_state::AppState;
use proxima::config::{self, ValidatedConfig};
use proxima::runtime_paths::RuntimePaths;
use proxima::{content, crud};

fn main() {
    let exit_code = run();
    std::process::exit(exit_code);
}

fn run() -> i32 {
    let parsed_args = match parse_args() {
        Ok(args) => args,
        Err(error) => {
            eprintln!("❌ Invalid command line arguments: {}", error);
            eprintln!("❌ Use -C <root> to set the runtime directory.");
            return 1;
        }
    };

    if parsed_args.help {
        print!("{}", help_text());
        return 0;
    }

    let runtime_paths = match RuntimePaths::from_root(&parsed_args.runtime_root) {
        Ok(paths) => paths,
        Err(error) => {
            eprintln!("❌ Runtime directory error: {}", error);
            return 1;
        }
    };

    let (validated_config, created_config) = match config::load_or_create(&runtime_paths.config_file)
    {
        Ok(result) => result,
        Err(error) => {
            eprintln!("❌ Configuration error: {}", error);
            eprintln!("❌ Application cannot start with invalid configuration.");
            return 1;
        }
    };

    if created_config {
        eprintln!(
            "[bootstrap] created {} with default settings",
            runtime_paths.config_file.display()
        );
    }

    let result = System::new().block_on(run_server(validated_config, runtime_paths));
    match result {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("❌ Server failed to start: {}", error);
            1
        }
    }
}

async fn run_server(
    validated_config: ValidatedConfig,
    runtime_paths: RuntimePaths,
) -> std::io::Result<()> {
    let log_level = match validated_config.logging.level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Info,
    };

    // Configure logging with a stable format
    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] {}: {}",
                chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3f UTC"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .try_init()
        .map_err(|error| std::io::Error::other(error.to_string()))?;

    log_startup_info(&validated_config, &runtime_paths);

    let app_state = web::Data::new(AppState::new(&validated_config, &runtime_paths));
    info!("✅ Document store and file store initialized");

    let uploads_dir = runtime_paths.uploads_dir.clone();
    let workers = validated_config.server.workers;
    let bind_address = (
        validated_config.server.host.clone(),
        validated_config.server.port,
    );

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(Logger::new(
                r#"%a "%r" %s %b "%{Referer}i" "%{User-Agent}i" %T"#,
            ))
            .configure(content::configure)
            .configure(crud::configure)
            .service(Files::new("/uploads", uploads_dir.clone()))
    })
    .workers(workers)
    .bind(bind_address)?
    .run()
    .await
}

fn log_startup_info(config: &ValidatedConfig, runtime_paths: &RuntimePaths) {
    info!("Starting {} - {}", config.app.name, config.app.description);
    info!("Workers: {}", config.server.workers);
    info!(
        "Listening on {}:{}",
        config.server.host, config.server.port
    );
    info!(
        "Upload size cap: {} MB",
        config.upload.max_file_size_mb
    );

    // Log canonical paths being used by the server
    info!("Data directory (canonical): {}", runtime_paths.data_dir.display());
    info!(
        "Uploads directory (canonical): {}",
        runtime_paths.uploads_dir.display()
    );
    info!("Config file: {}", runtime_paths.config_file.display());
    info!("Runtime root: {}", runtime_paths.root.display());
}

struct ParsedArgs {
    runtime_root: PathBuf,
    help: bool,
}

fn parse_args() -> Result<ParsedArgs, String> {
    parse_args_from(std::env::args().skip(1))
}

fn parse_args_from<I>(args: I) -> Result<ParsedArgs, String>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let mut runtime_root = PathBuf::from(".");
    let mut help = false;

    while let Some(arg) = args.next() {
        if arg == "-h" || arg == "--help" {
            help = true;
        } else if arg == "-C" {
            let value = args
                .next()
                .ok_or_else(|| "Missing value for -C".to_string())?;
            runtime_root = PathBuf::from(value);
        } else {
            return Err(format!("Unknown argument '{}'", arg));
        }
    }

    let runtime_root = make_runtime_root_absolute(runtime_root)?;
    Ok(ParsedArgs { runtime_root, help })
}

fn make_runtime_root_absolute(runtime_root: PathBuf) -> Result<PathBuf, String> {
    if runtime_root.is_absolute() {
        return Ok(runtime_root);
    }

    let current_dir = std::env::current_dir()
        .map_err(|error| format!("Failed to resolve current directory: {}", error))?;
    Ok(current_dir.join(runtime_root))
}

fn help_text() -> String {
    "Usage: proxima [-C <root>]\n\
     \n\
     Starts the Proxima backend in the given runtime directory.\n\
     A default config.yaml is created there on first run.\n\
     \n\
     Options:\n\
     \x20 -C <root>   Runtime directory (default: current directory)\n\
     \x20 -h, --help  Show this help\n"
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::parse_args_from;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn parse_args_defaults_to_current_directory() {
        let parsed = parse_args_from(Vec::new()).expect("parse args");
        assert!(!parsed.help);
        assert!(parsed.runtime_root.is_absolute());
    }

    #[test]
    fn parse_args_accepts_runtime_root() {
        let parsed = parse_args_from(args(&["-C", "runtime"])).expect("parse args");
        assert!(parsed.runtime_root.ends_with("runtime"));
    }

    #[test]
    fn parse_args_requires_runtime_root_value() {
        assert!(parse_args_from(args(&["-C"])).is_err());
    }

    #[test]
    fn parse_args_rejects_unknown_flags() {
        assert!(parse_args_from(args(&["--daemon"])).is_err());
    }

    #[test]
    fn parse_args_accepts_help_flag() {
        let parsed = parse_args_from(args(&["--help"])).expect("parse args");
        assert!(parsed.help);
    }
}
