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

use anyhow::bail;
use std::collections::{BTreeMap, BTreeSet};

use crate::store::ConfigStore;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Value {
    Str(String),
    Bool(bool),
}

/// In-memory store. Keys are full slash paths; directories are implied by
/// the keys below them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    entries: BTreeMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn subtree_prefix(path: &str) -> String {
        format!("{}/", path.trim_end_matches('/'))
    }
}

impl ConfigStore for MemoryStore {
    fn get_string(&self, path: &str) -> anyhow::Result<Option<String>> {
        match self.entries.get(path) {
            None => Ok(None),
            Some(Value::Str(s)) => Ok(Some(s.clone())),
            Some(Value::Bool(_)) => bail!("{}: not a string", path),
        }
    }

    fn get_bool(&self, path: &str) -> anyhow::Result<Option<bool>> {
        match self.entries.get(path) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(Value::Str(_)) => bail!("{}: not a boolean", path),
        }
    }

    fn set_string(&mut self, path: &str, value: &str) -> anyhow::Result<()> {
        self.entries.insert(path.into(), Value::Str(value.into()));
        Ok(())
    }

    fn set_bool(&mut self, path: &str, value: bool) -> anyhow::Result<()> {
        self.entries.insert(path.into(), Value::Bool(value));
        Ok(())
    }

    fn unset(&mut self, path: &str) -> anyhow::Result<()> {
        self.entries.remove(path);
        Ok(())
    }

    fn recursive_unset(&mut self, path: &str) -> anyhow::Result<()> {
        self.entries.remove(path);
        let prefix = Self::subtree_prefix(path);
        self.entries.retain(|k, _| !k.starts_with(&prefix));
        Ok(())
    }

    fn list_dirs(&self, path: &str) -> anyhow::Result<Vec<String>> {
        let prefix = Self::subtree_prefix(path);
        let mut dirs = BTreeSet::new();
        for key in self.entries.keys() {
            if let Some(rest) = key.strip_prefix(&prefix) {
                let mut segments = rest.splitn(2, '/');
                let first = segments.next().unwrap_or("");
                // A key directly below `path` is a value, not a directory.
                if segments.next().is_some() {
                    dirs.insert(format!("{}{}", prefix, first));
                }
            }
        }
        Ok(dirs.into_iter().collect())
    }

    fn dir_exists(&self, path: &str) -> anyhow::Result<bool> {
        let prefix = Self::subtree_prefix(path);
        Ok(self.entries.keys().any(|k| k.starts_with(&prefix)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_set_unset() {
        let mut store = MemoryStore::new();
        store.set_string("/a/b", "x").unwrap();
        store.set_bool("/a/c", true).unwrap();

        assert_eq!(store.get_string("/a/b").unwrap(), Some("x".into()));
        assert_eq!(store.get_bool("/a/c").unwrap(), Some(true));
        assert_eq!(store.get_string("/a/missing").unwrap(), None);

        // Type mismatch is an error, not absence.
        assert!(store.get_bool("/a/b").is_err());
        assert!(store.get_string("/a/c").is_err());

        store.unset("/a/b").unwrap();
        assert_eq!(store.get_string("/a/b").unwrap(), None);
    }

    #[test]
    fn dirs() {
        let mut store = MemoryStore::new();
        store.set_string("/r/one/Key", "1").unwrap();
        store.set_string("/r/two/Key", "2").unwrap();
        store.set_string("/r/value", "leaf").unwrap();

        assert!(store.dir_exists("/r/one").unwrap());
        assert!(!store.dir_exists("/r/value").unwrap());
        assert!(!store.dir_exists("/r/three").unwrap());

        // `value` is a plain key, not a directory.
        assert_eq!(store.list_dirs("/r").unwrap(), vec!["/r/one", "/r/two"]);
    }

    #[test]
    fn recursive_unset_removes_subtree_only() {
        let mut store = MemoryStore::new();
        store.set_string("/r/one/peers/peer0/PublicKey", "k").unwrap();
        store.set_string("/r/one/Address", "10.0.0.1/24").unwrap();

        store.recursive_unset("/r/one/peers").unwrap();

        assert!(!store.dir_exists("/r/one/peers").unwrap());
        assert_eq!(
            store.get_string("/r/one/Address").unwrap(),
            Some("10.0.0.1/24".into())
        );
    }
}
