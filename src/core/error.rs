use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FieldbookError {
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Program locked: {0}")]
    ProgramLocked(String),
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
    #[error("Catalog error: {0}")]
    CatalogError(String),
}
