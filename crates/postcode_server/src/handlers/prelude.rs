//! Frequently used imports for handlers.

pub use crate::{
    error::{ApiError, ApiResult},
    store::Page,
    PostcodeState,
};
pub use axum::{
    extract::{Path, Query, State},
    Json,
};
pub use postcode_api::{request as req, response as res};
pub use postcode_core::{Field, PostalCode, PrefectureCode, SearchQuery};
pub use tracing::instrument;
