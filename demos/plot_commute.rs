//! demos/plot_commute.rs
//!
//! Draws box plots of travel time to work by means of transportation in the
//! Midwest, one box per survey year.
//!
//! To run this example:
//! cargo run --example plot_commute --features plotting

use acs_pums::{Plottable, Pums, PumsError};

fn main() -> Result<(), PumsError> {
    println!("Fetching travel times from the Census API...");
    let pums = Pums::builder().build()?;

    let travel = pums
        .fetch_years()
        .years(&[2019, 2022])
        .numeric("JWMNP")
        .categorical("JWTRNS")
        .location_type("REGION")
        .location_code("2")
        .call()?;

    println!("Generating box plot...");
    travel.plot();
    println!("Plot shown in browser.");
    Ok(())
}
