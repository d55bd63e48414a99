// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Grouped key-value configuration store, TOML on disk
//!
//! The store is an explicit object passed into save/load operations;
//! there is no shared global instance. Groups are tables by
//! construction; a non-table entry at the top level of a loaded file is
//! malformed and dropped during parsing.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;
use toml::{Table, Value};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("toml parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("toml serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Named groups of typed entries
#[derive(Debug, Clone, Default)]
pub struct ConfigStore {
    groups: BTreeMap<String, Table>,
}

impl ConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a store from a TOML file; a missing file yields an empty store
    pub fn load_path(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::new());
        }
        Self::from_toml_str(&fs::read_to_string(path)?)
    }

    /// Write the store to a TOML file
    pub fn save_path(&self, path: impl AsRef<Path>) -> Result<(), StoreError> {
        fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    pub fn from_toml_str(input: &str) -> Result<Self, StoreError> {
        let groups = input
            .parse::<Table>()?
            .into_iter()
            .filter_map(|(name, value)| match value {
                Value::Table(entries) => Some((name, entries)),
                _ => None,
            })
            .collect();
        Ok(Self { groups })
    }

    pub fn to_toml_string(&self) -> Result<String, StoreError> {
        Ok(toml::to_string_pretty(&self.groups)?)
    }

    pub fn set_str(&mut self, group: &str, key: &str, value: impl Into<String>) {
        self.group_mut(group)
            .insert(key.to_string(), Value::String(value.into()));
    }

    pub fn set_int(&mut self, group: &str, key: &str, value: i64) {
        self.group_mut(group)
            .insert(key.to_string(), Value::Integer(value));
    }

    pub fn set_bool(&mut self, group: &str, key: &str, value: bool) {
        self.group_mut(group)
            .insert(key.to_string(), Value::Boolean(value));
    }

    /// Remove an entry; absent groups or keys are ignored
    pub fn remove(&mut self, group: &str, key: &str) {
        if let Some(entries) = self.groups.get_mut(group) {
            entries.remove(key);
        }
    }

    pub fn get_str(&self, group: &str, key: &str) -> Option<&str> {
        self.entry(group, key)?.as_str()
    }

    pub fn get_int(&self, group: &str, key: &str) -> Option<i64> {
        self.entry(group, key)?.as_integer()
    }

    pub fn get_bool(&self, group: &str, key: &str) -> Option<bool> {
        self.entry(group, key)?.as_bool()
    }

    pub fn contains(&self, group: &str, key: &str) -> bool {
        self.entry(group, key).is_some()
    }

    fn entry(&self, group: &str, key: &str) -> Option<&Value> {
        self.groups.get(group)?.get(key)
    }

    fn group_mut(&mut self, group: &str) -> &mut Table {
        self.groups.entry(group.to_string()).or_insert_with(Table::new)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
