//! /offices

use super::prelude::*;

const DEFAULT_LIST_LIMIT: usize = 50;
const MAX_LIST_LIMIT: usize = 200;

#[instrument]
pub async fn get_one(
    State(state): State<PostcodeState>,
    Path(code): Path<String>,
) -> ApiResult<Json<res::Office>> {
    let code = PostalCode::parse(&code).map_err(ApiError::validation)?;

    let store = state.store.clone();
    let key = code.clone();
    let record = tokio::task::spawn_blocking(move || store.office(&key)).await??;

    record.map(|record| Json(record.into())).ok_or_else(|| {
        ApiError::not_found(format!("郵便番号 {code} に該当する事業所が見つかりません"))
    })
}

/// Searches offices by name or kana. Hiragana input matches the katakana office readings.
#[instrument]
pub async fn search(
    State(state): State<PostcodeState>,
    Query(search): Query<req::Search>,
) -> ApiResult<Json<res::SearchResults<res::Office>>> {
    let query = SearchQuery::parse(search.q.as_deref().unwrap_or_default())
        .map_err(ApiError::validation)?;
    let limit = search.limit(state.search_limit_max);
    let predicate = query.predicate(&Field::OFFICE);

    let store = state.store.clone();
    let records = tokio::task::spawn_blocking(move || store.search_offices(&predicate, limit))
        .await??;

    let items = records.into_iter().map(Into::into).collect();
    Ok(Json(res::SearchResults::new(items)))
}

/// Lists the offices of a prefecture, given by name, ordered by office name.
#[instrument]
pub async fn by_prefecture(
    State(state): State<PostcodeState>,
    Path(prefecture): Path<String>,
    Query(pagination): Query<req::Pagination>,
) -> ApiResult<Json<res::SearchResults<res::Office>>> {
    let page = Page {
        limit: pagination.limit(DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT),
        offset: pagination.offset(),
    };

    let store = state.store.clone();
    let paged =
        tokio::task::spawn_blocking(move || store.offices_in_prefecture(&prefecture, page))
            .await??;

    let items = paged.items.into_iter().map(Into::into).collect();
    Ok(Json(res::SearchResults::page(paged.total, items)))
}
