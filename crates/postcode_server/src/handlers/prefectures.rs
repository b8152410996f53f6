//! /prefectures

use super::prelude::*;
use postcode_core::{CityRecord, PrefectureRecord};
use std::sync::Arc;

#[instrument]
pub async fn get_all(State(state): State<PostcodeState>) -> ApiResult<Json<Vec<res::Prefecture>>> {
    let prefectures = cached_prefectures(&state).await?;
    let prefectures = prefectures.iter().cloned().map(Into::into).collect();
    Ok(Json(prefectures))
}

#[instrument]
pub async fn cities(
    State(state): State<PostcodeState>,
    Path(code): Path<String>,
) -> ApiResult<Json<Vec<res::City>>> {
    let code = PrefectureCode::parse(&code).map_err(ApiError::validation)?;

    let prefectures = cached_prefectures(&state).await?;
    if !prefectures.iter().any(|p| p.code == code) {
        return Err(ApiError::not_found("都道府県が見つかりません"));
    }

    let cities = match state.city_cache.get(&code).await {
        Some(cities) => cities,
        None => {
            let store = state.store.clone();
            let key = code.clone();
            let cities: Arc<Vec<CityRecord>> =
                Arc::new(tokio::task::spawn_blocking(move || store.cities(&key)).await??);
            state.city_cache.insert(code, cities.clone()).await;
            cities
        }
    };
    let cities = cities.iter().cloned().map(Into::into).collect();
    Ok(Json(cities))
}

/// The prefectures sorted by code, from the cache if possible.
async fn cached_prefectures(state: &PostcodeState) -> ApiResult<Arc<Vec<PrefectureRecord>>> {
    if let Some(prefectures) = state.prefecture_cache.get(&()).await {
        return Ok(prefectures);
    }

    let store = state.store.clone();
    let mut prefectures = tokio::task::spawn_blocking(move || store.prefectures()).await??;
    prefectures.sort_by(|a, b| a.code.cmp(&b.code));
    let prefectures = Arc::new(prefectures);
    state.prefecture_cache.insert((), prefectures.clone()).await;
    Ok(prefectures)
}
