//! Persistence for the learner record and app settings
//!
//! The core only needs a keyed blob store; [`ProgressDb`] provides one on
//! SQLite and [`Repository`] layers typed JSON records on top of it.

mod db;
mod repository;

pub use db::ProgressDb;
pub use repository::{APP_SETTINGS_KEY, CURRENT_USER_KEY, Repository};

use anyhow::Result;

/// Keyed string storage. Each call is atomic on its own.
pub trait Storage {
    fn read(&self, key: &str) -> Result<Option<String>>;
    fn write(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

impl<S: Storage + ?Sized> Storage for &S {
    fn read(&self, key: &str) -> Result<Option<String>> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        (**self).write(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}
