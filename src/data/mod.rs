pub mod codes;

use anyhow::{bail, Context, Result};
use geojson::{Feature, GeoJson, Value};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::data::codes::CountryCode;
use crate::map::MapRenderer;

/// One record of the clustered dataset: a job posting with its location.
#[derive(Clone, Debug, Deserialize)]
pub struct Posting {
    /// [lon, lat]
    pub coord: [f64; 2],
    pub skill: String,
    /// ISO 3166-1 alpha-2, the record set's convention
    pub country: String,
    /// YYYY-MM-DD
    pub date: String,
}

/// Load the Europe feature collection (country polygons keyed by alpha-3
/// code, plus city points) into the renderer. Any failure here aborts map
/// construction; there is no fallback geometry.
pub fn load_europe(renderer: &mut MapRenderer, path: &Path) -> Result<()> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading map data {}", path.display()))?;
    let geojson: GeoJson = content
        .parse()
        .with_context(|| format!("parsing map data {}", path.display()))?;

    let GeoJson::FeatureCollection(fc) = geojson else {
        bail!("{}: expected a GeoJSON FeatureCollection", path.display());
    };

    for feature in fc.features {
        let Some(geometry) = &feature.geometry else {
            continue;
        };
        match &geometry.value {
            Value::Point(coords) => {
                if coords.len() >= 2 {
                    let name = string_property(&feature, "name").unwrap_or("Unknown");
                    renderer.add_city(coords[0], coords[1], name);
                }
            }
            Value::Polygon(rings) => {
                if let Some(code) = country_code(&feature) {
                    renderer.add_country(code, exterior_rings(std::slice::from_ref(rings)));
                }
            }
            Value::MultiPolygon(polygons) => {
                if let Some(code) = country_code(&feature) {
                    renderer.add_country(code, exterior_rings(polygons));
                }
            }
            _ => {}
        }
    }

    if !renderer.has_data() {
        bail!("{}: no country polygons found", path.display());
    }
    Ok(())
}

/// Load the posting records. Parsed with simd-json; a missing file or a
/// malformed record set is fatal at startup.
pub fn load_postings(path: &Path) -> Result<Vec<Posting>> {
    let mut bytes =
        fs::read(path).with_context(|| format!("reading postings {}", path.display()))?;
    let postings: Vec<Posting> = simd_json::serde::from_slice(&mut bytes)
        .with_context(|| format!("parsing postings {}", path.display()))?;
    Ok(postings)
}

/// Country code from the feature id or an `iso_a3` property — Natural
/// Earth style exports use either.
fn country_code(feature: &Feature) -> Option<CountryCode> {
    if let Some(geojson::feature::Id::String(id)) = &feature.id {
        if let Some(code) = CountryCode::parse(id) {
            return Some(code);
        }
    }
    string_property(feature, "iso_a3")
        .or_else(|| string_property(feature, "id"))
        .and_then(CountryCode::parse)
}

fn string_property<'a>(feature: &'a Feature, key: &str) -> Option<&'a str> {
    feature
        .properties
        .as_ref()
        .and_then(|p| p.get(key))
        .and_then(|v| v.as_str())
}

fn exterior_rings(polygons: &[Vec<Vec<Vec<f64>>>]) -> Vec<Vec<(f64, f64)>> {
    polygons
        .iter()
        .filter_map(|rings| rings.first())
        .map(|ring| ring.iter().map(|c| (c[0], c[1])).collect())
        .collect()
}
