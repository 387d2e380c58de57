// Copyright (c) 2023 Mike Tsao. All rights reserved.

use app_dirs2::{AppDataType, AppInfo};
use std::{env::current_dir, path::PathBuf};

const APP_INFO: AppInfo = AppInfo {
    name: "Tresillo",
    author: "Mike Tsao <mike@sowbug.com>",
};

/// Where to keep files
pub enum PathType {
    /// The current working directory is root.
    Dev,

    /// A subdirectory in the OS-specific per-user data directory is root.
    User,
}

/// Paths contains path-building utilities.
pub struct Paths {}
impl Paths {
    /// The name of the file holding the player's progress.
    pub const PROGRESS: &str = "progress.json";
    /// The name of the file holding game settings.
    pub const SETTINGS: &str = "settings.json";

    fn cwd() -> PathBuf {
        current_dir().unwrap_or_default()
    }

    /// Returns the directory the app's data files live in. Falls back to the
    /// current directory if the OS won't say where per-user data belongs.
    pub fn data_path(path_type: PathType) -> PathBuf {
        match path_type {
            PathType::Dev => Self::cwd(),
            PathType::User => app_dirs2::get_app_root(AppDataType::UserData, &APP_INFO)
                .unwrap_or_else(|_| Self::cwd()),
        }
    }

    /// Returns the path of the player's progress file.
    pub fn progress(path_type: PathType) -> PathBuf {
        let mut path = Self::data_path(path_type);
        path.push(Self::PROGRESS);
        path
    }

    /// Returns the path of the user's settings file.
    pub fn settings() -> PathBuf {
        // See https://docs.rs/app_dirs2/latest/app_dirs2/ for platform-specific
        // example paths
        let mut path = app_dirs2::get_app_root(AppDataType::UserConfig, &APP_INFO)
            .unwrap_or_else(|_| Self::cwd());

        path.push(Self::SETTINGS);

        path
    }
}
