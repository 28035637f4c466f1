//! demos/fetch_state.rs
//!
//! Fetches 2022 ages by sex for Iowa, prints the first rows and the weighted
//! summary per sex, then writes the table to `iowa_age_by_sex.csv`.
//!
//! To run this example:
//! cargo run --example fetch_state

use acs_pums::{Pums, Summarizable};
use std::env;
use std::error::Error;
use std::fs::File;
use std::time::Duration;

fn main() -> Result<(), Box<dyn Error>> {
    configure_polars_display();
    let pums = Pums::builder().timeout(Duration::from_secs(120)).build()?;

    let mut ages = pums
        .fetch()
        .year(2022)
        .numeric("AGEP")
        .categorical("SEX")
        .location_type("STATE")
        .location_code("19")
        .call()?;

    println!("{}", ages.frame().head(Some(10)));
    println!("{}", ages.summary_frame()?);

    let file = File::create("iowa_age_by_sex.csv")?;
    ages.write_csv(file)?;
    Ok(())
}

fn configure_polars_display() {
    // show every column
    env::set_var("POLARS_FMT_MAX_COLS", "-1");
    // show 20 rows
    env::set_var("POLARS_FMT_MAX_ROWS", "20");
}
