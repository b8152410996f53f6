//! A store backed by Postgres through diesel.
//!
//! Prefix conditions are translated to `LIKE 'value%'` with the wildcards of the value escaped,
//! so a field matches when it starts with the value, as in the memory store.

use super::{Page, Paged, Store, StoreMetadata};
use crate::{
    schema::{self, cities as ci, counters as co, imports as im, offices as o, postal_codes as pc},
    utils::diesel::query,
};
use chrono::{DateTime, Utc};
use diesel::{
    pg::Pg,
    prelude::*,
    r2d2::{ConnectionManager, Pool},
    sql_types::Bool,
};
use eyre::WrapErr;
use postcode_core::{
    CityRecord, Field, OfficeRecord, PostalCode, PostalCodeRecord, Predicate, PrefectureCode,
    PrefectureRecord,
};
use std::time::Duration;

pub type PgPool = Pool<ConnectionManager<PgConnection>>;

const VISITOR_COUNTER: &str = "visitor";

type Condition<T> = Box<dyn BoxableExpression<T, Pg, SqlType = Bool>>;

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn connect(database_url: &str) -> eyre::Result<Self> {
        // conservative pool config aimed at not using the database too much
        let pool = Pool::builder()
            .min_idle(Some(0))
            .idle_timeout(Some(Duration::from_secs(30)))
            .build(ConnectionManager::new(database_url))
            .wrap_err_with(|| format!("Failed to connect to the database at {database_url}"))?;
        Ok(Self::new(pool))
    }
}

impl Store for PgStore {
    fn kind(&self) -> &'static str {
        "postgres"
    }

    fn postal_code(&self, code: &PostalCode) -> eyre::Result<Option<PostalCodeRecord>> {
        let mut conn = self.pool.get()?;
        let row = pc::table
            .filter(pc::code.eq(code.as_str()))
            .select(PostalCodeRow::as_select())
            .first(&mut conn)
            .optional()?;
        row.map(PostalCodeRow::into_record).transpose()
    }

    fn search_postal_codes(
        &self,
        predicate: &Predicate,
        limit: usize,
    ) -> eyre::Result<Vec<PostalCodeRecord>> {
        tracing::debug!("Searching postal codes with {predicate}");
        let mut conn = self.pool.get()?;
        let rows = pc::table
            .filter(condition(predicate, postal_code_column))
            .order(pc::code)
            .limit(i64::try_from(limit)?)
            .select(PostalCodeRow::as_select())
            .load(&mut conn)?;
        rows.into_iter().map(PostalCodeRow::into_record).collect()
    }

    fn office(&self, code: &PostalCode) -> eyre::Result<Option<OfficeRecord>> {
        let mut conn = self.pool.get()?;
        let row = o::table
            .filter(o::code.eq(code.as_str()))
            .select(OfficeRow::as_select())
            .first(&mut conn)
            .optional()?;
        row.map(OfficeRow::into_record).transpose()
    }

    fn search_offices(
        &self,
        predicate: &Predicate,
        limit: usize,
    ) -> eyre::Result<Vec<OfficeRecord>> {
        tracing::debug!("Searching offices with {predicate}");
        let mut conn = self.pool.get()?;
        let rows = o::table
            .filter(condition(predicate, office_column))
            .order(o::code)
            .limit(i64::try_from(limit)?)
            .select(OfficeRow::as_select())
            .load(&mut conn)?;
        rows.into_iter().map(OfficeRow::into_record).collect()
    }

    fn postal_codes_in_city(
        &self,
        local_gov_code: &str,
        page: Page,
    ) -> eyre::Result<Paged<PostalCodeRecord>> {
        let mut conn = self.pool.get()?;
        let total = pc::table
            .filter(pc::local_gov_code.eq(local_gov_code))
            .count()
            .get_result::<i64>(&mut conn)?;
        let rows = pc::table
            .filter(pc::local_gov_code.eq(local_gov_code))
            .order(pc::code)
            .offset(i64::try_from(page.offset)?)
            .limit(i64::try_from(page.limit)?)
            .select(PostalCodeRow::as_select())
            .load(&mut conn)?;
        Ok(Paged {
            total: usize::try_from(total)?,
            items: rows
                .into_iter()
                .map(PostalCodeRow::into_record)
                .collect::<eyre::Result<_>>()?,
        })
    }

    fn offices_in_prefecture(
        &self,
        prefecture: &str,
        page: Page,
    ) -> eyre::Result<Paged<OfficeRecord>> {
        let mut conn = self.pool.get()?;
        let total = o::table
            .filter(o::prefecture.eq(prefecture))
            .count()
            .get_result::<i64>(&mut conn)?;
        let rows = o::table
            .filter(o::prefecture.eq(prefecture))
            .order((o::office_name, o::code))
            .offset(i64::try_from(page.offset)?)
            .limit(i64::try_from(page.limit)?)
            .select(OfficeRow::as_select())
            .load(&mut conn)?;
        Ok(Paged {
            total: usize::try_from(total)?,
            items: rows
                .into_iter()
                .map(OfficeRow::into_record)
                .collect::<eyre::Result<_>>()?,
        })
    }

    fn prefectures(&self) -> eyre::Result<Vec<PrefectureRecord>> {
        use schema::prefectures as p;

        let mut conn = self.pool.get()?;
        let rows = p::table
            .order(p::code)
            .select(PrefectureRow::as_select())
            .load(&mut conn)?;
        rows.into_iter()
            .map(|row| {
                eyre::Ok(PrefectureRecord {
                    code: PrefectureCode::parse(&row.code)?,
                    name: row.name,
                    name_kana: row.name_kana,
                })
            })
            .collect()
    }

    fn cities(&self, prefecture: &PrefectureCode) -> eyre::Result<Vec<CityRecord>> {
        let mut conn = self.pool.get()?;
        let rows = ci::table
            .filter(ci::prefecture_code.eq(prefecture.as_str()))
            .order(ci::code)
            .select(CityRow::as_select())
            .load(&mut conn)?;
        let cities = rows
            .into_iter()
            .map(|row| CityRecord {
                code: row.code,
                prefecture_code: prefecture.clone(),
                name: row.name,
                name_kana: row.name_kana,
            })
            .collect();
        Ok(cities)
    }

    fn increment_visitor_count(&self) -> eyre::Result<u64> {
        let mut conn = self.pool.get()?;
        let count = diesel::insert_into(co::table)
            .values((co::name.eq(VISITOR_COUNTER), co::value.eq(1i64)))
            .on_conflict(co::name)
            .do_update()
            .set(co::value.eq(co::value + 1i64))
            .returning(co::value)
            .get_result::<i64>(&mut conn)?;
        Ok(u64::try_from(count)?)
    }

    fn metadata(&self) -> eyre::Result<StoreMetadata> {
        let mut conn = self.pool.get()?;
        let visitor_count = co::table
            .filter(co::name.eq(VISITOR_COUNTER))
            .select(co::value)
            .first::<i64>(&mut conn)
            .optional()?
            .unwrap_or(0);
        let last_updated = im::table
            .select(diesel::dsl::max(im::imported_at))
            .first::<Option<DateTime<Utc>>>(&mut conn)?;
        Ok(StoreMetadata {
            visitor_count: Some(u64::try_from(visitor_count)?),
            last_updated,
        })
    }
}

// queries

query! {
    struct PostalCodeRow {
        code: String = postal_codes::code,
        local_gov_code: String = postal_codes::local_gov_code,
        prefecture: String = postal_codes::prefecture,
        prefecture_kana: String = postal_codes::prefecture_kana,
        city: String = postal_codes::city,
        city_kana: String = postal_codes::city_kana,
        town: String = postal_codes::town,
        town_kana: String = postal_codes::town_kana,
    }
}

impl PostalCodeRow {
    fn into_record(self) -> eyre::Result<PostalCodeRecord> {
        Ok(PostalCodeRecord {
            postal_code: PostalCode::parse(&self.code)
                .wrap_err_with(|| format!("Invalid postal code '{}' in database", self.code))?,
            local_gov_code: self.local_gov_code,
            prefecture: self.prefecture,
            prefecture_kana: self.prefecture_kana,
            city: self.city,
            city_kana: self.city_kana,
            town: self.town,
            town_kana: self.town_kana,
        })
    }
}

query! {
    struct OfficeRow {
        code: String = offices::code,
        prefecture: String = offices::prefecture,
        city: String = offices::city,
        office_name: String = offices::office_name,
        office_kana: String = offices::office_kana,
        address_detail: Option<String> = offices::address_detail,
    }
}

impl OfficeRow {
    fn into_record(self) -> eyre::Result<OfficeRecord> {
        Ok(OfficeRecord {
            postal_code: PostalCode::parse(&self.code)
                .wrap_err_with(|| format!("Invalid postal code '{}' in database", self.code))?,
            prefecture: self.prefecture,
            city: self.city,
            office_name: self.office_name,
            office_kana: self.office_kana,
            address_detail: self.address_detail,
        })
    }
}

query! {
    struct PrefectureRow {
        code: String = prefectures::code,
        name: String = prefectures::name,
        name_kana: String = prefectures::name_kana,
    }
}

query! {
    struct CityRow {
        code: String = cities::code,
        name: String = cities::name,
        name_kana: String = cities::name_kana,
    }
}

// conditions

/// Translates the predicate into a boxed SQL condition on a table.
/// `column` builds the `LIKE` condition for a field, or returns `None` if the table lacks it.
fn condition<T>(
    predicate: &Predicate,
    column: fn(Field, String) -> Option<Condition<T>>,
) -> Condition<T>
where
    T: 'static,
{
    match predicate {
        Predicate::Prefix { field, value } => {
            let pattern = format!("{}%", escape_like(value));
            column(*field, pattern).unwrap_or_else(|| Box::new(false.into_sql::<Bool>()))
        }
        Predicate::And(predicates) => predicates
            .iter()
            .map(|p| condition(p, column))
            .reduce(|acc, c| Box::new(acc.and(c)))
            .unwrap_or_else(|| Box::new(true.into_sql::<Bool>())),
        Predicate::Or(predicates) => predicates
            .iter()
            .map(|p| condition(p, column))
            .reduce(|acc, c| Box::new(acc.or(c)))
            .unwrap_or_else(|| Box::new(false.into_sql::<Bool>())),
    }
}

fn postal_code_column(field: Field, pattern: String) -> Option<Condition<pc::table>> {
    let condition: Condition<pc::table> = match field {
        Field::Prefecture => Box::new(pc::prefecture.like(pattern)),
        Field::PrefectureKana => Box::new(pc::prefecture_kana.like(pattern)),
        Field::City => Box::new(pc::city.like(pattern)),
        Field::CityKana => Box::new(pc::city_kana.like(pattern)),
        Field::Town => Box::new(pc::town.like(pattern)),
        Field::TownKana => Box::new(pc::town_kana.like(pattern)),
        Field::OfficeName | Field::OfficeKana => return None,
    };
    Some(condition)
}

fn office_column(field: Field, pattern: String) -> Option<Condition<o::table>> {
    let condition: Condition<o::table> = match field {
        Field::Prefecture => Box::new(o::prefecture.like(pattern)),
        Field::City => Box::new(o::city.like(pattern)),
        Field::OfficeName => Box::new(o::office_name.like(pattern)),
        Field::OfficeKana => Box::new(o::office_kana.like(pattern)),
        _ => return None,
    };
    Some(condition)
}

/// Escapes the `LIKE` wildcards and the escape character itself.
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
