// Copyright (c) 2026 rezky_nightky

use std::path::PathBuf;

use thiserror::Error;

use atmos::ParamError;

#[derive(Debug, Error)]
pub enum DemoError {
    #[error("failed to apply {name} {value} ({detail})")]
    InvalidArg {
        name: &'static str,
        value: String,
        detail: String,
    },
    #[error(transparent)]
    Param(#[from] ParamError),
    #[error("failed to open log file {}: {source}", path.display())]
    LogFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("terminal error: {0}")]
    Io(#[from] std::io::Error),
}

impl DemoError {
    pub fn invalid(name: &'static str, value: impl ToString, detail: impl Into<String>) -> Self {
        DemoError::InvalidArg {
            name,
            value: value.to_string(),
            detail: detail.into(),
        }
    }
}
