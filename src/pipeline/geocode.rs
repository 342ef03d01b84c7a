//! Address → coordinate conversion.

use crate::error::{Error, Result};
use crate::points::PointSet;
use ndarray::Array2;
use tracing::warn;

/// Resolves a free-text address to `(longitude, latitude)`.
///
/// `None` means the address could not be resolved. Implementations do their
/// own retrying, if any.
pub trait Geocoder {
    /// Look up one address.
    fn geocode(&self, address: &str) -> Option<(f64, f64)>;
}

impl<F> Geocoder for F
where
    F: Fn(&str) -> Option<(f64, f64)>,
{
    fn geocode(&self, address: &str) -> Option<(f64, f64)> {
        self(address)
    }
}

/// Addresses that resolved, as `[lon, lat]` points.
#[derive(Debug, Clone, PartialEq)]
pub struct Geocoded {
    /// One `[lon, lat]` row per resolved address, in input order.
    pub points: PointSet,
    /// Input row of each point.
    pub rows: Vec<usize>,
    /// Input rows that did not resolve.
    pub missing: Vec<usize>,
}

/// Geocode every address, dropping the ones that fail.
///
/// A non-finite coordinate counts as a failure. Returns
/// [`Error::EmptyInput`] when nothing resolves.
pub fn geocode_addresses<G, S>(geocoder: &G, addresses: &[S]) -> Result<Geocoded>
where
    G: Geocoder + ?Sized,
    S: AsRef<str>,
{
    let mut flat = Vec::with_capacity(addresses.len() * 2);
    let mut rows = Vec::with_capacity(addresses.len());
    let mut missing = Vec::new();

    for (row, address) in addresses.iter().enumerate() {
        match geocoder.geocode(address.as_ref()) {
            Some((lon, lat)) if lon.is_finite() && lat.is_finite() => {
                flat.push(lon);
                flat.push(lat);
                rows.push(row);
            }
            _ => {
                warn!(row, address = address.as_ref(), "address did not geocode; dropped");
                missing.push(row);
            }
        }
    }

    if rows.is_empty() {
        return Err(Error::EmptyInput);
    }

    let data =
        Array2::from_shape_vec((rows.len(), 2), flat).map_err(|e| Error::Other(e.to_string()))?;
    Ok(Geocoded {
        points: PointSet::from_array(data)?,
        rows,
        missing,
    })
}
