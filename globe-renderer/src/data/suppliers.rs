use std::{
    fs::File,
    io::{self, BufReader},
    path::Path,
};

use color_eyre::{
    Section,
    eyre::{Context, Result, eyre},
};
use globe_common::Supplier;

/// Reads suppliers from CSV with the header
/// `id,name,country,longitude,latitude,material,transport_mode,distance_km,emissions`.
///
/// Either every row parses or the whole read fails, with each bad row
/// attached to the report.
pub fn read_suppliers<R: io::Read>(reader: R) -> Result<Vec<Supplier>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let (suppliers, errors): (Vec<_>, Vec<_>) = rdr
        .deserialize::<Supplier>()
        .partition(|result| result.is_ok());

    if errors.is_empty() {
        return Ok(suppliers.into_iter().flatten().collect());
    }

    let err = errors
        .into_iter()
        .filter_map(|result| result.err())
        .fold(
            eyre!("encountered malformed rows while reading suppliers csv"),
            |report, e| report.error(e),
        );

    Err(err)
}

pub fn read_suppliers_from_path(path: &Path) -> Result<Vec<Supplier>> {
    let file = File::open(path)
        .wrap_err_with(|| format!("unable to open supplier dataset {}", path.display()))?;
    read_suppliers(BufReader::new(file))
        .wrap_err_with(|| format!("unable to read supplier dataset {}", path.display()))
}
