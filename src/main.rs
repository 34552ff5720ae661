// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Knine-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Knine and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Knine CLI entrypoint.
//!
//! Runs the interactive terminal client against a K-9 document-assistant backend.
//! Diagnostics go to a log file so the alternate screen stays clean.

use std::error::Error;
use std::path::{Path, PathBuf};

use knine::api::{ApiClient, HttpTransport};
use knine::config::ClientConfig;
use knine::prefs::{PreferencesStore, Theme};
use knine::runtime::Executor;
use knine::session::Session;
use tracing::info;

const ENV_LOG_FILE: &str = "KNINE_LOG_FILE";
const LOG_FILE_NAME: &str = "knine.log";

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [--api-url <url>] [--log-file <path>] [--theme dark|light]\n  {program} --help\n\n--api-url overrides KNINE_API_URL (default http://localhost:8000).\n--log-file overrides KNINE_LOG_FILE (default $XDG_STATE_HOME/knine/knine.log).\n--theme applies for this run only; Ctrl-T in the UI toggles and saves it."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    help: bool,
    api_url: Option<String>,
    log_file: Option<PathBuf>,
    theme: Option<Theme>,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                if options.help {
                    return Err(());
                }
                options.help = true;
            }
            "--api-url" => {
                if options.api_url.is_some() {
                    return Err(());
                }
                let url = args.next().ok_or(())?;
                options.api_url = Some(url);
            }
            "--log-file" => {
                if options.log_file.is_some() {
                    return Err(());
                }
                let path = args.next().ok_or(())?;
                options.log_file = Some(PathBuf::from(path));
            }
            "--theme" => {
                if options.theme.is_some() {
                    return Err(());
                }
                let raw = args.next().ok_or(())?;
                let theme: Theme = raw.parse().map_err(|_| ())?;
                options.theme = Some(theme);
            }
            _ => return Err(()),
        }
    }

    Ok(options)
}

fn default_log_path(lookup: impl Fn(&str) -> Option<String>) -> PathBuf {
    let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
    if let Some(path) = non_empty(ENV_LOG_FILE) {
        return PathBuf::from(path);
    }
    let state_dir = non_empty("XDG_STATE_HOME")
        .map(PathBuf::from)
        .or_else(|| non_empty("HOME").map(|home| Path::new(&home).join(".local").join("state")));
    match state_dir {
        Some(dir) => dir.join("knine").join(LOG_FILE_NAME),
        None => PathBuf::from(LOG_FILE_NAME),
    }
}

fn init_logging(log_path: &Path) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = log_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|err| {
                format!("failed to create log directory {}: {err}", parent.display())
            })?;
        }
    }

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .map_err(|err| format!("failed to open log file {}: {err}", log_path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_ansi(false)
        .with_writer(std::sync::Mutex::new(log_file))
        .init();

    Ok(())
}

/// Resolves the persisted theme. Problems become a one-off notice instead of a hard failure.
fn load_theme() -> (Option<PreferencesStore>, Theme, Option<String>) {
    let store = match PreferencesStore::from_env() {
        Ok(store) => store,
        Err(err) => return (None, Theme::default(), Some(format!("Preferences disabled: {err}"))),
    };
    match store.load() {
        Ok(prefs) => (Some(store), prefs.theme, None),
        Err(err) => {
            tracing::warn!(error = %err, "falling back to default preferences");
            (Some(store), Theme::default(), Some(format!("Preferences reset to defaults: {err}")))
        }
    }
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "knine".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };
        if options.help {
            print_usage(&program);
            return Ok(());
        }

        let log_path = options
            .log_file
            .clone()
            .unwrap_or_else(|| default_log_path(|key| std::env::var(key).ok()));
        init_logging(&log_path)?;

        let mut config = ClientConfig::from_env()?;
        if let Some(url) = options.api_url {
            config.set_base_url("--api-url", url)?;
        }

        let (store, saved_theme, notice) = load_theme();
        let theme = options.theme.unwrap_or(saved_theme);
        info!(base_url = %config.base_url, theme = %theme, "starting knine");

        let client = ApiClient::new(HttpTransport::new(&config)?);
        let session = Session::new(config, theme);

        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
        let (completions_tx, completions_rx) = tokio::sync::mpsc::unbounded_channel();
        let mut executor = Executor::new(client, completions_tx, runtime.handle().clone());
        if let Some(store) = store {
            executor = executor.with_preferences(store);
        }

        runtime.block_on(async move {
            let tui_join = tokio::task::spawn_blocking(move || {
                knine::tui::run(session, executor, completions_rx, notice)
                    .map_err(|err| err.to_string())
            })
            .await;

            let tui_result = tui_join.map_err(|err| -> Box<dyn Error> { Box::new(err) })?;
            tui_result.map_err(|err| -> Box<dyn Error> { err.into() })?;
            Ok::<(), Box<dyn Error>>(())
        })?;

        info!("knine exited");
        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("knine: {err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{default_log_path, parse_options, CliOptions};
    use knine::prefs::Theme;

    fn args(values: &[&str]) -> impl Iterator<Item = String> {
        values.iter().map(|value| (*value).to_owned()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn parses_empty_args() {
        let options = parse_options(std::iter::empty()).expect("parse options");
        assert_eq!(options, CliOptions::default());
    }

    #[test]
    fn parses_every_flag() {
        let options = parse_options(args(&[
            "--api-url",
            "http://k9.local:9000",
            "--log-file",
            "/tmp/k9.log",
            "--theme",
            "Light",
        ]))
        .expect("parse options");
        assert_eq!(options.api_url.as_deref(), Some("http://k9.local:9000"));
        assert_eq!(options.log_file, Some(PathBuf::from("/tmp/k9.log")));
        assert_eq!(options.theme, Some(Theme::Light));
        assert!(!options.help);
    }

    #[test]
    fn parses_help_flags() {
        assert!(parse_options(args(&["-h"])).expect("parse options").help);
        assert!(parse_options(args(&["--help"])).expect("parse options").help);
    }

    #[test]
    fn rejects_unknown_args() {
        parse_options(args(&["--nope"])).unwrap_err();
        parse_options(args(&["positional"])).unwrap_err();
    }

    #[test]
    fn rejects_duplicate_flags() {
        parse_options(args(&["--api-url", "a", "--api-url", "b"])).unwrap_err();
        parse_options(args(&["--theme", "dark", "--theme", "light"])).unwrap_err();
        parse_options(args(&["--help", "-h"])).unwrap_err();
    }

    #[test]
    fn rejects_missing_values() {
        parse_options(args(&["--api-url"])).unwrap_err();
        parse_options(args(&["--log-file"])).unwrap_err();
    }

    #[test]
    fn rejects_unknown_theme() {
        parse_options(args(&["--theme", "sepia"])).unwrap_err();
    }

    #[test]
    fn log_path_prefers_explicit_env_then_state_dir() {
        let explicit = default_log_path(|key| match key {
            "KNINE_LOG_FILE" => Some("/var/log/k9.log".to_owned()),
            "XDG_STATE_HOME" => Some("/state".to_owned()),
            _ => None,
        });
        assert_eq!(explicit, PathBuf::from("/var/log/k9.log"));

        let state = default_log_path(|key| (key == "XDG_STATE_HOME").then(|| "/state".to_owned()));
        assert_eq!(state, PathBuf::from("/state/knine/knine.log"));

        let home = default_log_path(|key| (key == "HOME").then(|| "/home/k9".to_owned()));
        assert_eq!(home, PathBuf::from("/home/k9/.local/state/knine/knine.log"));

        assert_eq!(default_log_path(|_| None), PathBuf::from("knine.log"));
    }
}
