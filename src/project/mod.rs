// SPDX-License-Identifier: MIT
//! Per-user projects and their chat histories.

pub mod model;
pub mod store;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("project not found: {0}")]
    ProjectNotFound(String),
    #[error(transparent)]
    Db(#[from] sqlx::Error),
}
