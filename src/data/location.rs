//! Points of interest shown on the globe

use serde::{Deserialize, Serialize};

use crate::config::PointStyle;

/// A geographic point of interest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lng: f64,
    pub name: String,
    /// Image key, resolved against the assets directory
    pub image: String,
    pub description: String,
}

/// A location together with its rendering attributes
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub lat: f64,
    pub lng: f64,
    pub name: String,
    pub image: String,
    pub description: String,
    /// Marker radius in angular degrees
    pub size: f32,
    /// Marker colour as a CSS-style string
    pub color: String,
    /// Marker column height in globe radii
    pub altitude: f32,
}

impl Point {
    pub fn from_location(location: &Location, style: &PointStyle) -> Self {
        Self {
            lat: location.lat,
            lng: location.lng,
            name: location.name.clone(),
            image: location.image.clone(),
            description: location.description.clone(),
            size: style.size,
            color: style.color.clone(),
            altitude: style.altitude,
        }
    }
}

/// Derive the point layer from a list of locations
pub fn derive_points(locations: &[Location], style: &PointStyle) -> Vec<Point> {
    locations
        .iter()
        .map(|loc| Point::from_location(loc, style))
        .collect()
}

/// The locations shown when no locations file is given
pub fn default_locations() -> Vec<Location> {
    vec![
        Location {
            lat: 51.5074,
            lng: -0.1278,
            name: "London".to_string(),
            image: "london.jpg".to_string(),
            description: "London is the capital of England and the United Kingdom.".to_string(),
        },
        Location {
            lat: 28.6139,
            lng: 77.209,
            name: "Delhi".to_string(),
            image: "delhi.jpg".to_string(),
            description: "Delhi is the capital territory of India.".to_string(),
        },
        Location {
            lat: 40.7128,
            lng: -74.006,
            name: "New York".to_string(),
            image: "newyork.jpg".to_string(),
            description: "New York City is known for its skyscrapers.".to_string(),
        },
    ]
}
