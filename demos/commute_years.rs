//! demos/commute_years.rs
//!
//! Compares arrival times at work by means of transportation across three survey
//! years. Arrival codes come back as minutes after midnight; zero means the person
//! did not commute, so those records are dropped before summarizing.
//!
//! To run this example:
//! cargo run --example commute_years

use acs_pums::{Pums, Summarizable};
use polars::prelude::{col, lit};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let pums = Pums::builder().build()?;

    let arrivals = pums
        .fetch_years()
        .years(&[2022, 2021, 2019])
        .numeric("JWAP")
        .categorical("JWTRNS")
        .location_type("DIVISION")
        .location_code("4")
        .call()?
        .filter(col("JWAP").gt(lit(0.0)))?;

    println!("{} commuters", arrivals.height());
    for group in arrivals.summary()? {
        let minutes = group.weighted_mean;
        println!(
            "{} {:<45} {:02}:{:02} ± {:.0} min",
            group.year.unwrap_or_default(),
            group.label.unwrap_or_default(),
            (minutes / 60.0) as u32,
            (minutes % 60.0) as u32,
            group.weighted_sd,
        );
    }
    Ok(())
}
