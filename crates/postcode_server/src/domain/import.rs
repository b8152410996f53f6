//! Writes parsed Japan Post data to the database.

use super::japan_post::ImportData;
use crate::{
    schema::{cities as ci, imports as im, offices as o, postal_codes as pc, prefectures as p},
    utils::diesel::PostgresChunks,
};
use diesel::prelude::*;
use eyre::WrapErr;

/// Counts of the rows written by an import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub postal_codes: usize,
    pub offices: usize,
    pub cities: usize,
}

/// Replaces the data tables with `data` in a single transaction and records the import.
///
/// The office table is left untouched if `data` has no offices.
pub fn import(conn: &mut PgConnection, data: &ImportData) -> eyre::Result<ImportSummary> {
    conn.transaction(|conn| {
        tracing::info!("Starting transaction");

        // the data is created fresh each time so we delete it first
        diesel::delete(ci::table)
            .execute(conn)
            .wrap_err("Failed to delete cities")?;
        diesel::delete(p::table)
            .execute(conn)
            .wrap_err("Failed to delete prefectures")?;
        diesel::delete(pc::table)
            .execute(conn)
            .wrap_err("Failed to delete postal codes")?;

        tracing::info!("Inserting {} prefectures", data.prefectures.len());
        let prefectures = data
            .prefectures
            .iter()
            .map(|pr| {
                (
                    p::code.eq(pr.code.as_str()),
                    p::name.eq(&pr.name),
                    p::name_kana.eq(&pr.name_kana),
                )
            })
            .collect::<Vec<_>>();
        diesel::insert_into(p::table)
            .values(&prefectures)
            .execute(conn)
            .wrap_err("Failed to insert prefectures")?;

        tracing::info!("Inserting {} cities", data.cities.len());
        let cities = data
            .cities
            .iter()
            .map(|c| {
                (
                    ci::code.eq(&c.code),
                    ci::prefecture_code.eq(c.prefecture_code.as_str()),
                    ci::name.eq(&c.name),
                    ci::name_kana.eq(&c.name_kana),
                )
            })
            .collect::<Vec<_>>();
        for chunk in cities.pg_chunks(4) {
            diesel::insert_into(ci::table)
                .values(chunk)
                .execute(conn)
                .wrap_err("Failed to insert cities")?;
        }

        tracing::info!("Inserting {} postal codes", data.postal_codes.len());
        let postal_codes = data
            .postal_codes
            .iter()
            .map(|r| {
                (
                    pc::code.eq(r.postal_code.as_str()),
                    pc::local_gov_code.eq(&r.local_gov_code),
                    pc::prefecture.eq(&r.prefecture),
                    pc::prefecture_kana.eq(&r.prefecture_kana),
                    pc::city.eq(&r.city),
                    pc::city_kana.eq(&r.city_kana),
                    pc::town.eq(&r.town),
                    pc::town_kana.eq(&r.town_kana),
                )
            })
            .collect::<Vec<_>>();
        for chunk in postal_codes.pg_chunks(8) {
            diesel::insert_into(pc::table)
                .values(chunk)
                .execute(conn)
                .wrap_err("Failed to insert postal codes")?;
        }

        if data.offices.is_empty() {
            tracing::info!("No offices to import, keeping the existing ones");
        } else {
            diesel::delete(o::table)
                .execute(conn)
                .wrap_err("Failed to delete offices")?;
            tracing::info!("Inserting {} offices", data.offices.len());
            let offices = data
                .offices
                .iter()
                .map(|r| {
                    (
                        o::code.eq(r.postal_code.as_str()),
                        o::prefecture.eq(&r.prefecture),
                        o::city.eq(&r.city),
                        o::office_name.eq(&r.office_name),
                        o::office_kana.eq(&r.office_kana),
                        o::address_detail.eq(r.address_detail.as_deref()),
                    )
                })
                .collect::<Vec<_>>();
            for chunk in offices.pg_chunks(6) {
                diesel::insert_into(o::table)
                    .values(chunk)
                    .execute(conn)
                    .wrap_err("Failed to insert offices")?;
            }
        }

        diesel::insert_into(im::table)
            .values((
                im::postal_code_count.eq(i32::try_from(data.postal_codes.len())?),
                im::office_count.eq(i32::try_from(data.offices.len())?),
            ))
            .execute(conn)
            .wrap_err("Failed to record import")?;

        eyre::Ok(ImportSummary {
            postal_codes: data.postal_codes.len(),
            offices: data.offices.len(),
            cities: data.cities.len(),
        })
    })
}
