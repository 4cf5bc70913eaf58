//! Reads WKT geometries, one per line, and prints validation findings for each of them.
//!
//! ```shell
//! echo "POLYGON ((0 0,0 10,10 10,10 0,0 0))" | cargo run --example validate_wkt
//! ```
//!
//! The optional argument is an SRID used for geometries without an `SRID=<code>;` prefix.

use std::io::BufRead;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use sfgeom::validation::GeometryValidator;
use sfgeom::wkt::WktReader;
use sfgeom::Crs;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut reader = WktReader::new();
    if let Some(srid) = std::env::args().nth(1) {
        let srid: u32 = srid
            .parse()
            .map_err(|_| anyhow!("SRID must be a positive integer, got '{srid}'"))?;
        reader = reader.with_crs(Arc::new(Crs::from_srid(srid)));
    }

    let validator = GeometryValidator::new();
    for (index, line) in std::io::stdin().lock().lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let Some(geometry) = reader.read(&line)? else {
            log::info!("Line {}: empty geometry", index + 1);
            continue;
        };

        let mut defects = 0;
        for event in validator.validate(&geometry).filter(|event| event.is_defect()) {
            defects += 1;
            println!("line {}: {event}", index + 1);
        }

        if defects == 0 {
            println!("line {}: valid", index + 1);
        }
    }

    Ok(())
}
