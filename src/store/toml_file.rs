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

use anyhow::{bail, Context};
use std::path::{Path, PathBuf};
use toml::value::Table;
use toml::Value;

use crate::store::ConfigStore;

/// File-backed store. The hierarchy is kept as a tree of TOML tables and
/// written back with `save`; nothing touches the file in between.
#[derive(Debug, Clone)]
pub struct TomlStore {
    path: PathBuf,
    root: Table,
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

impl TomlStore {
    /// Open `path`, or start from an empty tree if the file does not exist
    /// yet.
    pub fn open(path: &Path) -> anyhow::Result<TomlStore> {
        let root = match std::fs::read_to_string(path) {
            Ok(text) => toml::from_str(&text)
                .with_context(|| format!("failed to parse store file {}", path.display()))?,
            Err(ref e) if e.kind() == std::io::ErrorKind::NotFound => Table::new(),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("failed to read store file {}", path.display()))
            }
        };
        Ok(TomlStore {
            path: path.into(),
            root,
        })
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let text = toml::to_string_pretty(&Value::Table(self.root.clone()))
            .context("failed to serialize store")?;
        std::fs::write(&self.path, text)
            .with_context(|| format!("failed to write store file {}", self.path.display()))
    }

    fn node(&self, path: &str) -> Option<&Value> {
        let mut segs = segments(path);
        let mut cur = self.root.get(segs.next()?)?;
        for seg in segs {
            cur = cur.as_table()?.get(seg)?;
        }
        Some(cur)
    }

    /// Table holding the last segment of `path`, created on demand.
    fn parent_mut(&mut self, path: &str) -> anyhow::Result<(&mut Table, String)> {
        let segs: Vec<&str> = segments(path).collect();
        let (leaf, dirs) = match segs.split_last() {
            Some(x) => x,
            None => bail!("empty store path"),
        };
        let mut cur = &mut self.root;
        for seg in dirs {
            let entry = cur
                .entry(seg.to_string())
                .or_insert_with(|| Value::Table(Table::new()));
            cur = match entry.as_table_mut() {
                Some(t) => t,
                None => bail!("{}: {} is not a directory", path, seg),
            };
        }
        Ok((cur, leaf.to_string()))
    }

    /// Like `parent_mut` but never creates anything.
    fn existing_parent_mut(&mut self, path: &str) -> Option<(&mut Table, String)> {
        let segs: Vec<&str> = segments(path).collect();
        let (leaf, dirs) = segs.split_last()?;
        let mut cur = &mut self.root;
        for seg in dirs {
            cur = cur.get_mut(*seg)?.as_table_mut()?;
        }
        Some((cur, leaf.to_string()))
    }
}

impl ConfigStore for TomlStore {
    fn get_string(&self, path: &str) -> anyhow::Result<Option<String>> {
        match self.node(path) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(_) => bail!("{}: not a string", path),
        }
    }

    fn get_bool(&self, path: &str) -> anyhow::Result<Option<bool>> {
        match self.node(path) {
            None => Ok(None),
            Some(Value::Boolean(b)) => Ok(Some(*b)),
            Some(_) => bail!("{}: not a boolean", path),
        }
    }

    fn set_string(&mut self, path: &str, value: &str) -> anyhow::Result<()> {
        let (parent, leaf) = self.parent_mut(path)?;
        parent.insert(leaf, Value::String(value.into()));
        Ok(())
    }

    fn set_bool(&mut self, path: &str, value: bool) -> anyhow::Result<()> {
        let (parent, leaf) = self.parent_mut(path)?;
        parent.insert(leaf, Value::Boolean(value));
        Ok(())
    }

    fn unset(&mut self, path: &str) -> anyhow::Result<()> {
        if let Some((parent, leaf)) = self.existing_parent_mut(path) {
            // unset only removes plain keys, not directories.
            if !matches!(parent.get(&leaf), Some(Value::Table(_))) {
                parent.remove(&leaf);
            }
        }
        Ok(())
    }

    fn recursive_unset(&mut self, path: &str) -> anyhow::Result<()> {
        if let Some((parent, leaf)) = self.existing_parent_mut(path) {
            parent.remove(&leaf);
        }
        Ok(())
    }

    fn list_dirs(&self, path: &str) -> anyhow::Result<Vec<String>> {
        let base = path.trim_end_matches('/');
        let table = match self.node(path).and_then(Value::as_table) {
            None => return Ok(vec![]),
            Some(t) => t,
        };
        let mut dirs: Vec<String> = table
            .iter()
            .filter(|(_, v)| v.is_table())
            .map(|(k, _)| format!("{}/{}", base, k))
            .collect();
        dirs.sort();
        Ok(dirs)
    }

    fn dir_exists(&self, path: &str) -> anyhow::Result<bool> {
        Ok(matches!(self.node(path), Some(Value::Table(_))))
    }
}
