use rouille::Response;

use crate::{
    catalog::CatalogError, rules::RuleError, service::ServiceError, storage::error::StorageError,
};

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Upstream(String),
    Internal(String),
}

impl From<RuleError> for ApiError {
    fn from(err: RuleError) -> Self {
        match err {
            RuleError::UnknownRule { name } => ApiError::BadRequest(format!("Unsupported rule: {name}")),
        }
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::InvalidLimit { .. } | CatalogError::NonPositiveLimit => {
                ApiError::BadRequest(err.to_string())
            }
            CatalogError::Http(_)
            | CatalogError::Status { .. }
            | CatalogError::Session(_)
            | CatalogError::Malformed(_)
            | CatalogError::NotAMapping { .. } => ApiError::Upstream(err.to_string()),
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        log::error!("storage failure: {err}");
        ApiError::Internal("internal server error".into())
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Rule(e) => e.into(),
            ServiceError::Catalog(e) => e.into(),
            ServiceError::Storage(e) => e.into(),
        }
    }
}

impl ApiError {
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::Upstream(_) => 502,
            ApiError::Internal(_) => 500,
        }
    }

    pub fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            ApiError::BadRequest(msg) | ApiError::Upstream(msg) | ApiError::Internal(msg) => {
                Response::text(msg).with_status_code(status)
            }
        }
    }
}
