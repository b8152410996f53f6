//! /postal-codes

use super::prelude::*;

#[instrument]
pub async fn get_one(
    State(state): State<PostcodeState>,
    Path(code): Path<String>,
) -> ApiResult<Json<res::PostalCode>> {
    let code = PostalCode::parse(&code).map_err(ApiError::validation)?;

    let store = state.store.clone();
    let key = code.clone();
    let record = tokio::task::spawn_blocking(move || store.postal_code(&key)).await??;

    match record {
        Some(record) => Ok(Json(record.into())),
        None => Err(ApiError::not_found(format!(
            "郵便番号 {code} に該当する住所が見つかりません"
        ))),
    }
}

#[instrument]
pub async fn search(
    State(state): State<PostcodeState>,
    Query(search): Query<req::Search>,
) -> ApiResult<Json<res::SearchResults<res::PostalCode>>> {
    let query = SearchQuery::parse(search.q.as_deref().unwrap_or_default())
        .map_err(ApiError::validation)?;
    let limit = search.limit(state.search_limit_max);
    let predicate = query.predicate(&Field::ADDRESS);

    let store = state.store.clone();
    let records =
        tokio::task::spawn_blocking(move || store.search_postal_codes(&predicate, limit))
            .await??;
    tracing::debug!("Found {} postal codes", records.len());

    let items = records.into_iter().map(Into::into).collect();
    Ok(Json(res::SearchResults::new(items)))
}
