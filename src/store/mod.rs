// Copyright 2022 wgconf developers

// This file is part of wgconf.

// wgconf is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// wgconf is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.

// You should have received a copy of the GNU General Public License
// along with wgconf.  If not, see <https://www.gnu.org/licenses/>.

//! Abstract hierarchical key-value store that tunnel configurations are
//! persisted to. Paths are slash-delimited, directories are implicit: a
//! directory exists as long as some key lives below it.

mod memory;
mod toml_file;

pub use memory::MemoryStore;
pub use toml_file::TomlStore;

/// Namespace all tunnel configurations live under.
pub const ROOT: &str = "/system/maemo/wireguard";

/// Marker key naming the configuration the connectivity layer should bring
/// up. Lives next to the configuration directories, not inside one.
pub const ACTIVE_CONFIG_KEY: &str = "/system/maemo/wireguard/active_config";

pub trait ConfigStore {
    fn get_string(&self, path: &str) -> anyhow::Result<Option<String>>;
    fn get_bool(&self, path: &str) -> anyhow::Result<Option<bool>>;
    fn set_string(&mut self, path: &str, value: &str) -> anyhow::Result<()>;
    fn set_bool(&mut self, path: &str, value: bool) -> anyhow::Result<()>;
    /// Remove a single key. Removing a directory is not an error, it just
    /// does nothing.
    fn unset(&mut self, path: &str) -> anyhow::Result<()>;
    /// Remove a key or a whole subtree.
    fn recursive_unset(&mut self, path: &str) -> anyhow::Result<()>;
    /// Full paths of the immediate subdirectories of `path`.
    fn list_dirs(&self, path: &str) -> anyhow::Result<Vec<String>>;
    fn dir_exists(&self, path: &str) -> anyhow::Result<bool>;
}

pub fn config_root(name: &str) -> String {
    format!("{}/{}", ROOT, name)
}

pub fn peers_root(name: &str) -> String {
    format!("{}/{}/peers", ROOT, name)
}

pub fn peer_root(name: &str, idx: usize) -> String {
    format!("{}/{}/peers/peer{}", ROOT, name, idx)
}

/// Last path segment, the way config names are recovered from directory
/// listings.
pub fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
