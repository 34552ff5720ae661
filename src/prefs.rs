// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Knine-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Knine and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Local preferences that survive restarts (currently just the theme).

use std::fs;
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};
use std::{env, fmt};

use serde::{Deserialize, Serialize};

const APP_DIR: &str = "knine";
const PREFERENCES_FILE: &str = "preferences.json";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "dark" => Ok(Self::Dark),
            "light" => Ok(Self::Light),
            other => Err(format!("unknown theme {other:?} (expected dark or light)")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub theme: Theme,
}

#[derive(Debug)]
pub enum PrefsError {
    NoConfigDir,
    Io { path: PathBuf, source: io::Error },
    Json { path: PathBuf, source: serde_json::Error },
}

impl fmt::Display for PrefsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoConfigDir => {
                f.write_str("cannot locate a config directory (set XDG_CONFIG_HOME or HOME)")
            }
            Self::Io { path, source } => write!(f, "io error at {path:?}: {source}"),
            Self::Json { path, source } => write!(f, "json error at {path:?}: {source}"),
        }
    }
}

impl std::error::Error for PrefsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NoConfigDir => None,
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
        }
    }
}

/// Reads and writes `preferences.json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferencesStore {
    path: PathBuf,
}

impl PreferencesStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `$XDG_CONFIG_HOME/knine/preferences.json`, falling back to `$HOME/.config/knine`.
    pub fn from_env() -> Result<Self, PrefsError> {
        let dir = config_dir(|name| env::var_os(name).map(PathBuf::from))
            .ok_or(PrefsError::NoConfigDir)?;
        Ok(Self::new(dir.join(APP_DIR).join(PREFERENCES_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file is not an error; it means nothing has been saved yet.
    pub fn load(&self) -> Result<Preferences, PrefsError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Ok(Preferences::default())
            }
            Err(source) => return Err(PrefsError::Io { path: self.path.clone(), source }),
        };
        serde_json::from_str(&contents)
            .map_err(|source| PrefsError::Json { path: self.path.clone(), source })
    }

    pub fn save(&self, prefs: &Preferences) -> Result<(), PrefsError> {
        let mut json = serde_json::to_vec_pretty(prefs)
            .map_err(|source| PrefsError::Json { path: self.path.clone(), source })?;
        json.push(b'\n');
        write_atomic(&self.path, &json)
    }
}

fn config_dir(lookup: impl Fn(&str) -> Option<PathBuf>) -> Option<PathBuf> {
    let non_empty = |name: &str| lookup(name).filter(|path| !path.as_os_str().is_empty());
    non_empty("XDG_CONFIG_HOME").or_else(|| non_empty("HOME").map(|home| home.join(".config")))
}

fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), PrefsError> {
    let io_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source: io::Error| PrefsError::Io { path, source }
    };

    let parent = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent).map_err(io_err(parent))?;

    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos();
    let file_name = path.file_name().map(|name| name.to_string_lossy()).unwrap_or_default();
    let tmp_path = parent.join(format!(".knine.tmp.{file_name}.{nanos}"));

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&tmp_path)
        .map_err(io_err(&tmp_path))?;
    file.write_all(contents).map_err(io_err(&tmp_path))?;
    drop(file);

    if let Err(source) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(PrefsError::Io { path: path.to_path_buf(), source });
    }
    Ok(())
}
