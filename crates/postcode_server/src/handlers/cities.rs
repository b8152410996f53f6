//! /cities

use super::prelude::*;

const DEFAULT_LIMIT: usize = 100;
const MAX_LIMIT: usize = 500;

/// Lists the postal codes of a city, given by its local government code.
#[instrument]
pub async fn postal_codes(
    State(state): State<PostcodeState>,
    Path(code): Path<String>,
    Query(pagination): Query<req::Pagination>,
) -> ApiResult<Json<res::SearchResults<res::PostalCode>>> {
    let page = Page {
        limit: pagination.limit(DEFAULT_LIMIT, MAX_LIMIT),
        offset: pagination.offset(),
    };

    let store = state.store.clone();
    let key = code.clone();
    let paged =
        tokio::task::spawn_blocking(move || store.postal_codes_in_city(&key, page)).await??;

    if paged.items.is_empty() {
        return Err(ApiError::not_found(format!(
            "市区町村コード {code} に該当する郵便番号が見つかりません"
        )));
    }
    let items = paged.items.into_iter().map(Into::into).collect();
    Ok(Json(res::SearchResults::page(paged.total, items)))
}
