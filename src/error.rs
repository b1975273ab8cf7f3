//! Error types for the proxy and their HTTP mapping.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use actix_web::http::{StatusCode, header};
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

/// The query artifact could not be written.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to write query file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Running the interpreter failed. A nonzero exit is not one of these.
#[derive(Error, Debug)]
pub enum ExecuteError {
    #[error("failed to start {binary}: {source}")]
    Spawn {
        binary: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("interpreter I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("interpreter did not finish within {0:?}")]
    TimedOut(Duration),
}

/// Everything a request to the query endpoint can fail with.
#[derive(Error, Debug)]
pub enum ProxyError {
    #[error("Missing 'db' variable from in URL")]
    MissingDatabase,

    #[error("Allowed method is POST")]
    MethodNotAllowed,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Execute(#[from] ExecuteError),

    #[error("failed to encode response: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ResponseError for ProxyError {
    fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::MissingDatabase => StatusCode::NOT_ACCEPTABLE,
            ProxyError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ProxyError::Execute(ExecuteError::TimedOut(_)) => StatusCode::GATEWAY_TIMEOUT,
            ProxyError::Store(_) | ProxyError::Execute(_) | ProxyError::Serialize(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let ProxyError::MethodNotAllowed = self {
            builder.insert_header((header::ALLOW, "POST"));
        }
        builder
            .content_type("text/plain; charset=utf-8")
            .body(self.to_string())
    }
}
