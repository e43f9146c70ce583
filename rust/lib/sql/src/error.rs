use thiserror::Error;

#[derive(Error, Debug)]
pub enum SQLError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("query error: {0}")]
    Query(String),

    #[error("exec error: {0}")]
    Exec(String),
}
