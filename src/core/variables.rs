//! Persisted variable store.
//!
//! Holds every registered [`ConVar`] in registration order. When attached to a
//! file, saved values are loaded once and applied to variables as they
//! register, and writes to `save_on_change` variables rewrite the file.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use bevy::prelude::*;

use super::{ConVar, ConVarChangedEvent};
use crate::persist::{self, PersistError};

/// Collection of console variables with optional file persistence.
#[derive(Default)]
pub struct VariableStore {
    vars: Vec<ConVar>,
    index: HashMap<String, usize>,
    saved: HashMap<String, String>,
    path: Option<PathBuf>,
    changes: Vec<ConVarChangedEvent>,
}

impl VariableStore {
    /// Create an in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store backed by `path`, loading saved values immediately.
    pub fn with_file(path: impl Into<PathBuf>) -> Self {
        let mut store = Self::new();
        store.attach_file(path);
        store
    }

    /// Back this store with `path`.
    ///
    /// Saved values are read once; attaching the same path again does nothing.
    /// Values are applied to variables already registered and remembered for
    /// variables registered later. A missing file counts as empty.
    pub fn attach_file(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        if self.path.as_ref() == Some(&path) {
            return;
        }

        self.saved = load_saved(&path);
        self.path = Some(path);

        for var in &mut self.vars {
            if let Some(value) = self.saved.get(&var.name().to_lowercase()) {
                var.set_string(value);
            }
        }
    }

    /// The backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Register a variable, applying a saved value if one exists.
    ///
    /// Returns `true` if newly registered, `false` if it replaced a variable
    /// with the same name (ignoring case).
    pub fn register(&mut self, mut var: ConVar) -> bool {
        let key = var.name().to_lowercase();

        if let Some(value) = self.saved.get(&key) {
            debug!("Console: Applying saved value {} = \"{}\"", var.name(), value);
            var.set_string(value);
        }

        match self.index.get(&key) {
            Some(&idx) => {
                warn!("Console: Overwriting existing variable '{}'", var.name());
                self.vars[idx] = var;
                false
            }
            None => {
                self.index.insert(key, self.vars.len());
                self.vars.push(var);
                true
            }
        }
    }

    /// Remove a variable, returning it if it existed.
    pub fn remove(&mut self, name: &str) -> Option<ConVar> {
        let idx = self.index.remove(&name.to_lowercase())?;
        let var = self.vars.remove(idx);
        for slot in self.index.values_mut() {
            if *slot > idx {
                *slot -= 1;
            }
        }
        Some(var)
    }

    /// Get a variable by name (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&ConVar> {
        self.index
            .get(&name.to_lowercase())
            .map(|&idx| &self.vars[idx])
    }

    /// Check if a variable exists.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(&name.to_lowercase())
    }

    /// Set a variable from text. Returns `false` if unknown or the text is empty.
    pub fn set_string(&mut self, name: &str, value: &str) -> bool {
        self.update(name, |var| var.set_string(value))
    }

    /// Set a variable from a float.
    pub fn set_float(&mut self, name: &str, value: f32) -> bool {
        self.update(name, |var| {
            var.set_float(value);
            true
        })
    }

    /// Set a variable from an integer.
    pub fn set_int(&mut self, name: &str, value: i32) -> bool {
        self.update(name, |var| {
            var.set_int(value);
            true
        })
    }

    /// Set a variable from a bool.
    pub fn set_bool(&mut self, name: &str, value: bool) -> bool {
        self.update(name, |var| {
            var.set_bool(value);
            true
        })
    }

    /// Reset a variable to its default value.
    pub fn reset(&mut self, name: &str) -> bool {
        self.update(name, |var| {
            var.reset();
            true
        })
    }

    fn update(&mut self, name: &str, write: impl FnOnce(&mut ConVar) -> bool) -> bool {
        let Some(&idx) = self.index.get(&name.to_lowercase()) else {
            return false;
        };

        let var = &mut self.vars[idx];
        let old_value = var.as_str().to_string();
        if !write(var) {
            return false;
        }

        let persist = var.saves_on_change();
        self.changes.push(ConVarChangedEvent::new(
            var.name(),
            old_value,
            var.as_str(),
        ));

        if persist {
            self.save();
        }
        true
    }

    /// Rewrite the backing file, logging failures.
    ///
    /// Does nothing for an in-memory store.
    pub fn save(&self) {
        let Some(path) = &self.path else {
            return;
        };
        if let Err(e) = self.save_to(path) {
            error!("Console: Failed to save variables: {}", e);
        }
    }

    /// Write every `save_on_change` variable to `path`.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        persist::write_pairs(
            path,
            self.vars
                .iter()
                .filter(|var| var.saves_on_change())
                .map(|var| (var.name(), var.as_str())),
        )
    }

    /// Take the changes recorded since the last call.
    pub fn drain_changes(&mut self) -> Vec<ConVarChangedEvent> {
        std::mem::take(&mut self.changes)
    }

    /// Iterate over variables in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &ConVar> {
        self.vars.iter()
    }

    /// Variables whose name starts with `prefix` (case-insensitive).
    pub fn with_prefix<'a>(&'a self, prefix: &str) -> impl Iterator<Item = &'a ConVar> + 'a {
        let prefix = prefix.to_lowercase();
        self.vars
            .iter()
            .filter(move |var| var.name().to_lowercase().starts_with(&prefix))
    }

    /// Number of variables.
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Check if no variables are registered.
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl std::fmt::Debug for VariableStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VariableStore")
            .field("vars", &self.vars)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

fn load_saved(path: &Path) -> HashMap<String, String> {
    if !path.exists() {
        info!("No variables file found at '{}', using defaults", path.display());
        return HashMap::new();
    }

    match persist::read_pairs(path) {
        Ok(pairs) => {
            info!("Loaded {} saved variables from '{}'", pairs.len(), path.display());
            pairs
                .into_iter()
                .map(|(name, value)| (name.to_lowercase(), value))
                .collect()
        }
        Err(e) => {
            error!("Console: Failed to load variables: {}", e);
            HashMap::new()
        }
    }
}
