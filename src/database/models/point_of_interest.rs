use serde::{Deserialize, Serialize};

/// A point of interest. `city_id` is a lookup key into the owning city,
/// not an ownership edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointOfInterest {
    pub id: i64,
    pub city_id: i64,
    pub name: String,
    pub description: Option<String>,
}

/// A point of interest that has not been committed yet and therefore has no identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPointOfInterest {
    pub name: String,
    pub description: Option<String>,
}

impl NewPointOfInterest {
    pub fn new(name: impl Into<String>, description: Option<&str>) -> Self {
        Self {
            name: name.into(),
            description: description.map(str::to_string),
        }
    }

    pub fn into_point_of_interest(self, id: i64, city_id: i64) -> PointOfInterest {
        PointOfInterest {
            id,
            city_id,
            name: self.name,
            description: self.description,
        }
    }
}
