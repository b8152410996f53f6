//! Imports the Japan Post postal code files into the database.
//!
//! Usage: import_japan_post <utf_ken_all.csv> [jigyosyo.csv]

use diesel::prelude::*;
use eyre::WrapErr;
use postcode_server::domain::{
    import,
    japan_post::{self, ImportData},
};

fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt::init();
    dotenvy::dotenv().ok();

    let database_url = std::env::var("DATABASE_URL").wrap_err("Missing DATABASE_URL")?;
    let mut conn = PgConnection::establish(&database_url)?;

    let args = std::env::args().collect::<Vec<_>>();
    let Some(addresses_path) = args.get(1) else {
        eyre::bail!("Usage: import_japan_post <utf_ken_all.csv> [jigyosyo.csv]");
    };

    tracing::info!("Opening {addresses_path}");
    let addresses = std::fs::read_to_string(addresses_path).wrap_err("Failed to open file")?;
    tracing::info!("Parsing addresses");
    let addresses = japan_post::parse_addresses(&addresses);

    let offices = match args.get(2) {
        Some(offices_path) => {
            tracing::info!("Opening {offices_path}");
            let offices = std::fs::read(offices_path).wrap_err("Failed to open file")?;
            let offices = japan_post::decode_shift_jis(&offices)
                .wrap_err_with(|| format!("Failed to decode {offices_path}"))?;
            tracing::info!("Parsing offices");
            japan_post::parse_offices(&offices)
        }
        None => Vec::new(),
    };

    let data = ImportData::new(addresses, offices);
    let summary = import::import(&mut conn, &data).wrap_err("Failed to import data")?;
    tracing::info!(
        "Imported {} postal codes, {} offices and {} cities",
        summary.postal_codes,
        summary.offices,
        summary.cities
    );

    Ok(())
}
