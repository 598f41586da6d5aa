mod nominatim;

pub use nominatim::{DEFAULT_ENDPOINT, DEFAULT_USER_AGENT, NominatimResolver};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::exif::GpsCoordinate;

/// Address parts returned by a reverse geocoder.
///
/// Mirrors the OpenStreetMap address keys. Any of them may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub city: Option<String>,
    pub hamlet: Option<String>,
    pub town: Option<String>,
    pub village: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

/// A resolved place name, shown on the location line.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Place {
    pub city: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
}

impl Place {
    /// Build a place from an address, choosing the settlement name via
    /// [`settlement_name`].
    pub fn from_address(address: &Address) -> Self {
        Self {
            city: settlement_name(address).map(str::to_string),
            region: non_empty(address.state.as_deref()).map(str::to_string),
            country: non_empty(address.country.as_deref()).map(str::to_string),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.city.is_none() && self.region.is_none() && self.country.is_none()
    }
}

/// First non-empty of city → hamlet → town → village.
///
/// The order is fixed; reordering changes output for rural coordinates.
pub fn settlement_name(address: &Address) -> Option<&str> {
    [&address.city, &address.hamlet, &address.town, &address.village]
        .into_iter()
        .find_map(|name| non_empty(name.as_deref()))
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

/// Reverse geocoding backend: coordinates in, address out.
///
/// Implementations return `Err` on network or service failure and an empty
/// [`Address`] when nothing is found; [`resolve_place`] degrades both to
/// "no place".
///
/// # Example
///
/// ```rust,no_run
/// use metatagger::geocode::{NominatimResolver, PlaceResolver};
///
/// # async fn example() -> anyhow::Result<()> {
/// let resolver = NominatimResolver::default();
/// let address = resolver.lookup(48.8584, 2.2945).await?;
/// println!("Country: {:?}", address.country);
/// # Ok(())
/// # }
/// ```
#[async_trait::async_trait]
pub trait PlaceResolver: Send + Sync {
    /// The display name of this backend (e.g., "Nominatim").
    fn name(&self) -> &str;
    /// Look up the address at the given signed decimal coordinates.
    async fn lookup(&self, latitude: f64, longitude: f64) -> Result<Address>;
}

/// Resolve coordinates to a [`Place`], never failing.
///
/// Lookup errors and empty results are logged and yield `None`, so the
/// overlay simply leaves out the location line.
pub async fn resolve_place(
    resolver: &dyn PlaceResolver,
    coordinate: GpsCoordinate,
) -> Option<Place> {
    match resolver.lookup(coordinate.latitude, coordinate.longitude).await {
        Ok(address) => {
            let place = Place::from_address(&address);
            if place.is_empty() {
                log::debug!(
                    "{}: no place found at {:.5}, {:.5}",
                    resolver.name(),
                    coordinate.latitude,
                    coordinate.longitude
                );
                None
            } else {
                Some(place)
            }
        }
        Err(e) => {
            log::warn!("{} lookup failed: {e}", resolver.name());
            None
        }
    }
}
