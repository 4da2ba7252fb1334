//! Loading location lists from JSON files

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};

use super::Location;

/// Load a list of locations from a JSON array file
pub fn load_locations(path: impl AsRef<Path>) -> Result<Vec<Location>> {
    let path = path.as_ref();
    log::info!("Loading locations from {:?}", path);

    let file =
        File::open(path).with_context(|| format!("Failed to open locations file: {:?}", path))?;

    let reader = BufReader::new(file);
    let locations: Vec<Location> =
        serde_json::from_reader(reader).with_context(|| "Failed to parse locations JSON")?;

    log::info!("Loaded {} locations", locations.len());
    Ok(locations)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_locations() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("locations.json");
        std::fs::write(
            &path,
            r#"[
                { "lat": 35.6762, "lng": 139.6503, "name": "Tokyo",
                  "image": "tokyo.jpg", "description": "Capital of Japan." }
            ]"#,
        )
        .unwrap();

        let locations = load_locations(&path).unwrap();
        assert_eq!(locations.len(), 1);
        assert_eq!(locations[0].name, "Tokyo");
        assert!((locations[0].lng - 139.6503).abs() < 1e-9);
    }

    #[test]
    fn test_load_rejects_missing_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, r#"[ { "lat": 1.0, "name": "Nowhere" } ]"#).unwrap();
        assert!(load_locations(&path).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        assert!(load_locations("/nonexistent/locations.json").is_err());
    }
}
