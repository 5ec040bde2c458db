use serde::{Deserialize, Serialize};

use super::point_of_interest::PointOfInterest;

/// A city and the points of interest it owns.
///
/// `points_of_interest` is only populated when the caller asked for it;
/// a city fetched without children carries an empty list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub points_of_interest: Vec<PointOfInterest>,
}

impl City {
    pub fn new(id: i64, name: impl Into<String>, description: Option<&str>) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.map(str::to_string),
            points_of_interest: Vec::new(),
        }
    }

    pub fn with_points_of_interest(mut self, points: Vec<PointOfInterest>) -> Self {
        self.points_of_interest = points;
        self
    }

    /// Copy of this city without its children.
    pub fn without_points_of_interest(&self) -> Self {
        Self {
            id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
            points_of_interest: Vec::new(),
        }
    }
}
