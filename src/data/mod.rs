mod dataset;

pub use dataset::{Country, Dataset, Reading};

use crate::config::NO_DATA_SENTINEL;
use crate::error::{DataError, Result};
use crate::map::{Lod, MapRenderer};
use crate::symbols::Schema;
use geojson::{Feature, GeoJson, Geometry, JsonObject, JsonValue, Value};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Read and parse the nuclear share feature collection
pub fn load_dataset(path: &Path) -> Result<Dataset> {
    let content = fs::read_to_string(path)?;
    let dataset = parse_dataset(&content)?;
    info!(
        path = %path.display(),
        countries = dataset.countries.len(),
        years = dataset.schema.len(),
        "loaded dataset"
    );
    Ok(dataset)
}

/// Parse a GeoJSON FeatureCollection into a typed dataset.
///
/// The year schema comes from the first feature; every feature is then read
/// against it, so a property absent on a later feature becomes no-data.
pub fn parse_dataset(content: &str) -> Result<Dataset> {
    let geojson: GeoJson = content.parse()?;
    let GeoJson::FeatureCollection(fc) = geojson else {
        return Err(DataError::NotFeatureCollection);
    };

    let first = fc.features.first().ok_or(DataError::EmptyCollection)?;
    let empty = JsonObject::new();
    let schema = Schema::from_properties(first.properties.as_ref().unwrap_or(&empty))?;

    let countries = fc
        .features
        .iter()
        .map(|feature| read_country(feature, &schema))
        .collect::<Result<Vec<_>>>()?;

    Ok(Dataset::new(schema, countries))
}

fn read_country(feature: &Feature, schema: &Schema) -> Result<Country> {
    let props = feature.properties.as_ref();

    let name = props
        .and_then(|p| p.get("Country").or_else(|| p.get("name")))
        .and_then(|v| v.as_str())
        .unwrap_or("Unknown")
        .to_string();

    let code = props
        .and_then(|p| p.get("Code"))
        .and_then(|v| v.as_str())
        .map(str::to_string);

    let (lon, lat) = feature
        .geometry
        .as_ref()
        .and_then(anchor_point)
        .ok_or_else(|| DataError::MissingGeometry {
            country: name.clone(),
        })?;

    let values = schema
        .attributes()
        .iter()
        .map(|attr| raw_value(props.and_then(|p| p.get(&attr.key))))
        .collect();

    let country = Country::new(name, lon, lat, values);
    Ok(match code {
        Some(code) => country.with_code(code),
        None => country,
    })
}

/// Normalize one property value. Absent, null, negative and unparseable
/// values all become the no-data sentinel.
fn raw_value(value: Option<&JsonValue>) -> f64 {
    let parsed = match value {
        Some(JsonValue::Number(n)) => n.as_f64(),
        Some(JsonValue::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(v) if v.is_finite() && v >= 0.0 => v,
        _ => NO_DATA_SENTINEL,
    }
}

/// Where to place a feature's symbol: the point itself, or the bounding box
/// center of a polygon's exterior rings.
fn anchor_point(geometry: &Geometry) -> Option<(f64, f64)> {
    match &geometry.value {
        Value::Point(coords) if coords.len() >= 2 => Some((coords[0], coords[1])),
        Value::MultiPoint(points) => points.first().filter(|c| c.len() >= 2).map(|c| (c[0], c[1])),
        Value::Polygon(rings) => bbox_center(rings.first().into_iter().flatten()),
        Value::MultiPolygon(polygons) => {
            bbox_center(polygons.iter().filter_map(|rings| rings.first()).flatten())
        }
        _ => None,
    }
}

fn bbox_center<'a>(coords: impl Iterator<Item = &'a Vec<f64>>) -> Option<(f64, f64)> {
    let mut bounds: Option<(f64, f64, f64, f64)> = None;
    for c in coords.filter(|c| c.len() >= 2) {
        bounds = Some(match bounds {
            None => (c[0], c[1], c[0], c[1]),
            Some((x0, y0, x1, y1)) => (x0.min(c[0]), y0.min(c[1]), x1.max(c[0]), y1.max(c[1])),
        });
    }
    bounds.map(|(x0, y0, x1, y1)| ((x0 + x1) / 2.0, (y0 + y1) / 2.0))
}

/// Load whichever Natural Earth basemap files exist in `data_dir`.
/// Returns the number of files loaded.
pub fn load_basemap(renderer: &mut MapRenderer, data_dir: &Path) -> usize {
    let coastline_files = [
        ("ne_110m_coastline.json", Lod::Low),
        ("ne_50m_coastline.json", Lod::Medium),
        ("ne_10m_coastline.json", Lod::High),
    ];
    let border_files = [
        ("ne_50m_borders.json", Lod::Medium),
        ("ne_10m_borders.json", Lod::High),
    ];

    let mut loaded = 0;

    for (filename, lod) in coastline_files {
        let path = data_dir.join(filename);
        if !path.exists() {
            continue;
        }
        match read_lines(&path) {
            Ok(lines) => {
                lines.into_iter().for_each(|line| renderer.add_coastline(line, lod));
                loaded += 1;
            }
            Err(e) => warn!(file = filename, error = %e, "failed to load coastlines"),
        }
    }

    for (filename, lod) in border_files {
        let path = data_dir.join(filename);
        if !path.exists() {
            continue;
        }
        match read_lines(&path) {
            Ok(lines) => {
                lines.into_iter().for_each(|line| renderer.add_border(line, lod));
                loaded += 1;
            }
            Err(e) => warn!(file = filename, error = %e, "failed to load borders"),
        }
    }

    loaded
}

fn read_lines(path: &Path) -> Result<Vec<Vec<(f64, f64)>>> {
    let content = fs::read_to_string(path)?;
    let geojson: GeoJson = content.parse()?;
    let mut lines = Vec::new();
    process_geojson_lines(&geojson, |line| lines.push(line));
    Ok(lines)
}

/// Process GeoJSON and extract line features
fn process_geojson_lines<F>(geojson: &GeoJson, mut add_line: F)
where
    F: FnMut(Vec<(f64, f64)>),
{
    match geojson {
        GeoJson::FeatureCollection(fc) => {
            for feature in &fc.features {
                if let Some(ref geometry) = feature.geometry {
                    process_geometry_lines(geometry, &mut add_line);
                }
            }
        }
        GeoJson::Feature(f) => {
            if let Some(ref geometry) = f.geometry {
                process_geometry_lines(geometry, &mut add_line);
            }
        }
        GeoJson::Geometry(geometry) => process_geometry_lines(geometry, &mut add_line),
    }
}

fn process_geometry_lines<F>(geometry: &Geometry, add_line: &mut F)
where
    F: FnMut(Vec<(f64, f64)>),
{
    let to_line = |coords: &Vec<Vec<f64>>| -> Vec<(f64, f64)> {
        coords.iter().filter(|c| c.len() >= 2).map(|c| (c[0], c[1])).collect()
    };

    match &geometry.value {
        Value::LineString(coords) => add_line(to_line(coords)),
        Value::MultiLineString(lines) => lines.iter().for_each(|l| add_line(to_line(l))),
        Value::Polygon(rings) => {
            if let Some(exterior) = rings.first() {
                add_line(to_line(exterior));
            }
        }
        Value::MultiPolygon(polygons) => {
            for exterior in polygons.iter().filter_map(|rings| rings.first()) {
                add_line(to_line(exterior));
            }
        }
        Value::GeometryCollection(geometries) => {
            for g in geometries {
                process_geometry_lines(g, add_line);
            }
        }
        _ => {}
    }
}

/// Rough outline of Europe and its rim for when no basemap file is available
pub fn generate_simple_europe(renderer: &mut MapRenderer) {
    // Mainland from Gibraltar clockwise around the Baltic to the Black Sea
    renderer.add_coastline(
        vec![
            (-9.5, 37.0), (-6.0, 36.0), (-2.0, 36.7), (0.5, 38.8), (3.2, 42.0),
            (6.0, 43.1), (8.5, 44.3), (10.5, 43.2), (12.5, 41.7), (15.6, 40.0),
            (15.7, 38.0), (16.5, 39.5), (17.2, 40.5), (18.5, 40.1), (16.0, 41.5),
            (13.5, 43.6), (12.3, 45.3), (13.7, 45.6), (15.0, 44.5), (17.5, 43.0),
            (19.4, 41.8), (19.5, 40.5), (21.0, 38.5), (22.5, 36.5), (23.5, 38.0),
            (23.0, 39.5), (24.0, 40.8), (26.0, 40.8), (28.0, 41.2), (29.0, 41.2),
            (28.0, 42.0), (28.6, 43.8), (29.7, 45.2), (30.7, 46.5), (33.5, 46.0),
            (36.5, 45.3), (38.0, 47.0),
        ],
        Lod::Low,
    );
    renderer.add_coastline(
        vec![
            (-9.5, 37.0), (-8.9, 39.5), (-8.8, 42.5), (-9.3, 43.0), (-8.0, 43.7),
            (-4.0, 43.5), (-1.5, 43.4), (-1.2, 46.0), (-2.5, 47.3), (-4.6, 48.3),
            (-1.6, 48.7), (-1.2, 49.7), (0.2, 49.6), (1.6, 50.2), (2.5, 51.1),
            (4.2, 51.9), (5.0, 53.2), (7.0, 53.6), (8.6, 53.9), (8.6, 55.5),
            (8.2, 57.0), (10.5, 57.7), (10.3, 56.0), (10.9, 54.4), (12.5, 54.4),
            (14.2, 53.9), (18.5, 54.8), (19.9, 54.4), (21.1, 55.7), (21.0, 57.0),
            (23.5, 57.0), (24.3, 58.4), (23.4, 59.2), (28.0, 59.5), (30.2, 59.9),
        ],
        Lod::Low,
    );
    // Scandinavia
    renderer.add_coastline(
        vec![
            (30.2, 59.9), (27.0, 60.5), (22.5, 60.0), (21.3, 61.5), (21.5, 63.2),
            (25.0, 65.0), (22.0, 65.8), (21.0, 64.5), (19.0, 63.5), (17.5, 62.0),
            (17.2, 60.7), (18.8, 59.8), (16.5, 57.5), (16.0, 56.2), (14.2, 55.4),
            (12.8, 55.6), (11.8, 58.0), (10.5, 59.0), (8.0, 58.1), (5.6, 58.9),
            (5.0, 61.0), (5.2, 62.5), (8.0, 63.5), (10.5, 64.5), (13.0, 66.0),
            (15.5, 68.5), (18.0, 69.6), (23.0, 70.6), (28.0, 71.0), (31.0, 70.2),
        ],
        Lod::Low,
    );
    // Great Britain
    renderer.add_coastline(
        vec![
            (-5.7, 50.1), (-3.0, 50.7), (1.4, 51.2), (1.7, 52.7), (0.2, 53.5),
            (-1.6, 55.6), (-2.1, 57.1), (-3.1, 58.6), (-5.0, 58.6), (-6.2, 56.7),
            (-4.9, 55.0), (-3.0, 54.2), (-4.5, 53.4), (-4.6, 52.1), (-5.3, 51.7),
            (-3.0, 51.4), (-5.7, 50.1),
        ],
        Lod::Low,
    );
    // Ireland
    renderer.add_coastline(
        vec![
            (-6.0, 52.2), (-6.2, 53.9), (-7.3, 55.3), (-8.5, 54.5), (-10.0, 54.2),
            (-9.7, 53.0), (-10.3, 51.9), (-8.5, 51.6), (-6.0, 52.2),
        ],
        Lod::Low,
    );
    // Iceland
    renderer.add_coastline(
        vec![
            (-22.0, 64.0), (-24.0, 65.5), (-22.0, 66.4), (-16.0, 66.5), (-13.6, 65.1),
            (-15.0, 64.3), (-18.7, 63.4), (-22.0, 64.0),
        ],
        Lod::Low,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [2.3, 46.6] },
                "properties": { "Country": "France", "Code": "FRA", "pct_1990": 75, "pct_1991": 72.7 }
            },
            {
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [-8.0, 39.5] },
                "properties": { "Country": "Portugal", "pct_1990": 0, "pct_1991": null }
            },
            {
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [19.5, 52.0] },
                "properties": { "Country": "Poland", "pct_1990": "-1" }
            }
        ]
    }"#;

    #[test]
    fn test_parse_sample() {
        let ds = parse_dataset(SAMPLE).unwrap();
        assert_eq!(ds.schema.len(), 2);
        assert_eq!(ds.countries.len(), 3);

        let france = &ds.countries[0];
        assert_eq!(france.name, "France");
        assert_eq!(france.code.as_deref(), Some("FRA"));
        assert_eq!(france.reading(0), Reading::Percent(75.0));

        let portugal = &ds.countries[1];
        assert_eq!(portugal.reading(0), Reading::Zero);
        assert_eq!(portugal.reading(1), Reading::NoData);

        // Missing pct_1991 resolves to no data, not a panic
        let poland = &ds.countries[2];
        assert_eq!(poland.reading(0), Reading::NoData);
        assert_eq!(poland.reading(1), Reading::NoData);
    }

    #[test]
    fn test_default_dataset_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join(crate::config::DEFAULT_DATA_PATH);
        let ds = load_dataset(&path).unwrap();
        assert_eq!(ds.schema.first_year(), Some(2020));
        assert_eq!(ds.schema.last_year(), Some(2022));
        let belarus = ds.countries.iter().find(|c| c.name == "Belarus").unwrap();
        assert!((0..3).all(|i| belarus.reading(i) == Reading::NoData));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = load_dataset(Path::new("/nonexistent/eu_country_nuclear_pct.geojson"));
        match result {
            Err(DataError::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_rejects_non_collection() {
        let point = r#"{ "type": "Point", "coordinates": [0.0, 0.0] }"#;
        assert!(matches!(parse_dataset(point), Err(DataError::NotFeatureCollection)));
    }

    #[test]
    fn test_rejects_empty_collection() {
        let empty = r#"{ "type": "FeatureCollection", "features": [] }"#;
        assert!(matches!(parse_dataset(empty), Err(DataError::EmptyCollection)));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(parse_dataset("not json"), Err(DataError::Parse(_))));
    }

    #[test]
    fn test_missing_geometry() {
        let doc = r#"{
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "geometry": null, "properties": { "Country": "Atlantis", "pct_2000": 1 } }
            ]
        }"#;
        match parse_dataset(doc) {
            Err(DataError::MissingGeometry { country }) => assert_eq!(country, "Atlantis"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_polygon_anchor_is_bbox_center() {
        let doc = r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": { "type": "Polygon", "coordinates": [[[0,0],[10,0],[10,20],[0,20],[0,0]]] },
                "properties": { "Country": "Square", "pct_2000": 5 }
            }]
        }"#;
        let ds = parse_dataset(doc).unwrap();
        assert_eq!((ds.countries[0].lon, ds.countries[0].lat), (5.0, 10.0));
    }

    #[test]
    fn test_simple_europe_has_coastlines() {
        let mut renderer = MapRenderer::new();
        assert!(!renderer.has_data());
        generate_simple_europe(&mut renderer);
        assert!(renderer.has_data());
    }

    #[test]
    fn test_missing_basemap_dir_loads_nothing() {
        let mut renderer = MapRenderer::new();
        assert_eq!(load_basemap(&mut renderer, Path::new("/nonexistent/basemap")), 0);
    }
}
