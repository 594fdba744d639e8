// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Failures the CLI reports distinctly. Everything else travels as a plain
/// `anyhow::Error` and is shown as a generic failure.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("failed to get response: {0}")]
    Advisor(String),

    #[error("no valid transactions found in CSV (headers: {headers:?}, first row: {sample:?})")]
    ImportEmpty {
        headers: Vec<String>,
        sample: Option<Vec<String>>,
    },
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }
}

/// Exit code and user-facing message for an error surfaced from a handler.
///
/// Caller mistakes exit with 2 and keep their message. Storage failures are
/// logged with the underlying cause and shown generically.
pub fn describe(err: &anyhow::Error) -> (i32, String) {
    match err.downcast_ref::<AppError>() {
        Some(e @ (AppError::Validation(_) | AppError::ImportEmpty { .. })) => {
            return (2, e.to_string());
        }
        Some(AppError::Advisor(_)) => return (1, format!("{:#}", err)),
        None => {}
    }
    if let Some(db) = err.downcast_ref::<rusqlite::Error>() {
        tracing::error!(error = %db, context = %err, "storage operation failed");
        return (1, format!("storage failure: {}", err));
    }
    (1, format!("{:#}", err))
}
