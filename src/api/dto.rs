//! Wire shapes. Entities never leave the crate directly; handlers map them
//! into these types and back.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::database::models::{City, NewPointOfInterest, PointOfInterest};
use crate::patch::Patchable;
use crate::validation::not_blank;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityWithoutPointsOfInterestDto {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

impl From<&City> for CityWithoutPointsOfInterestDto {
    fn from(city: &City) -> Self {
        Self {
            id: city.id,
            name: city.name.clone(),
            description: city.description.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityDto {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub number_of_points_of_interest: usize,
    pub points_of_interest: Vec<PointOfInterestDto>,
}

impl From<&City> for CityDto {
    fn from(city: &City) -> Self {
        Self {
            id: city.id,
            name: city.name.clone(),
            description: city.description.clone(),
            number_of_points_of_interest: city.points_of_interest.len(),
            points_of_interest: city.points_of_interest.iter().map(PointOfInterestDto::from).collect(),
        }
    }
}

/// `GET /api/cities/:id` answers with one of two shapes depending on
/// `includePointsOfInterest`.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CityResponseDto {
    WithPointsOfInterest(CityDto),
    WithoutPointsOfInterest(CityWithoutPointsOfInterestDto),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointOfInterestDto {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

impl From<&PointOfInterest> for PointOfInterestDto {
    fn from(point: &PointOfInterest) -> Self {
        Self {
            id: point.id,
            name: point.name.clone(),
            description: point.description.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PointOfInterestForCreationDto {
    #[validate(
        required(message = "You should provide a name value."),
        length(min = 1, max = 50, message = "The name must be between 1 and 50 characters."),
        custom(function = "not_blank")
    )]
    pub name: Option<String>,
    #[validate(length(max = 200, message = "The description can be at most 200 characters."))]
    pub description: Option<String>,
}

impl PointOfInterestForCreationDto {
    /// Call after validation; a missing name becomes empty.
    pub fn into_new_point(self) -> NewPointOfInterest {
        NewPointOfInterest {
            name: self.name.unwrap_or_default(),
            description: self.description,
        }
    }
}

/// Full-replacement body for PUT, and the projection a PATCH is applied to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PointOfInterestForUpdateDto {
    #[validate(
        required(message = "You should provide a name value."),
        length(min = 1, max = 50, message = "The name must be between 1 and 50 characters."),
        custom(function = "not_blank")
    )]
    pub name: Option<String>,
    #[validate(length(max = 200, message = "The description can be at most 200 characters."))]
    pub description: Option<String>,
}

impl From<&PointOfInterest> for PointOfInterestForUpdateDto {
    fn from(point: &PointOfInterest) -> Self {
        Self {
            name: Some(point.name.clone()),
            description: point.description.clone(),
        }
    }
}

impl PointOfInterestForUpdateDto {
    /// Copy every field onto the entity. Identity and owner are untouched.
    pub fn merge_into(self, point: &mut PointOfInterest) {
        if let Some(name) = self.name {
            point.name = name;
        }
        point.description = self.description;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointOfInterestField {
    Name,
    Description,
}

fn text_value(value: &Option<String>) -> Value {
    value.clone().map(Value::String).unwrap_or(Value::Null)
}

impl Patchable for PointOfInterestForUpdateDto {
    type Field = PointOfInterestField;

    fn field(name: &str) -> Option<Self::Field> {
        if name.eq_ignore_ascii_case("name") {
            Some(PointOfInterestField::Name)
        } else if name.eq_ignore_ascii_case("description") {
            Some(PointOfInterestField::Description)
        } else {
            None
        }
    }

    fn get(&self, field: Self::Field) -> Value {
        match field {
            PointOfInterestField::Name => text_value(&self.name),
            PointOfInterestField::Description => text_value(&self.description),
        }
    }

    fn set(&mut self, field: Self::Field, value: Value) -> Result<(), &'static str> {
        let text = match value {
            Value::String(s) => Some(s),
            Value::Null => None,
            _ => return Err("a string or null"),
        };
        match field {
            PointOfInterestField::Name => self.name = text,
            PointOfInterestField::Description => self.description = text,
        }
        Ok(())
    }

    fn clear(&mut self, field: Self::Field) {
        match field {
            PointOfInterestField::Name => self.name = None,
            PointOfInterestField::Description => self.description = None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate_model;
    use serde_json::json;

    #[test]
    fn city_dto_counts_points() {
        let city = City::new(1, "New York City", Some("The one with that big park.")).with_points_of_interest(vec![
            NewPointOfInterest::new("Central Park", None).into_point_of_interest(1, 1),
            NewPointOfInterest::new("Empire State Building", None).into_point_of_interest(2, 1),
        ]);
        let body = serde_json::to_value(CityDto::from(&city)).unwrap();
        assert_eq!(body["numberOfPointsOfInterest"], 2);
        assert_eq!(body["pointsOfInterest"][1]["name"], "Empire State Building");
    }

    #[test]
    fn creation_requires_name() {
        let dto: PointOfInterestForCreationDto = serde_json::from_value(json!({ "description": "x" })).unwrap();
        let errors = validate_model(&dto).unwrap_err();
        assert!(errors.contains("name"));
    }

    #[test]
    fn blank_names_are_rejected() {
        let dto = PointOfInterestForCreationDto {
            name: Some("   ".to_string()),
            description: None,
        };
        let errors = validate_model(&dto).unwrap_err();
        assert_eq!(errors.get("name"), Some(&["The name can't be blank.".to_string()][..]));

        let dto = PointOfInterestForUpdateDto {
            name: Some("\t".to_string()),
            description: Some("still fine".to_string()),
        };
        let errors = validate_model(&dto).unwrap_err();
        assert!(errors.contains("name"));
        assert!(!errors.contains("description"));
    }

    #[test]
    fn limits_are_in_characters() {
        let dto = PointOfInterestForCreationDto {
            name: Some("é".repeat(50)),
            description: Some("d".repeat(200)),
        };
        assert!(validate_model(&dto).is_ok());

        let dto = PointOfInterestForUpdateDto {
            name: Some("n".repeat(51)),
            description: Some("d".repeat(201)),
        };
        let errors = validate_model(&dto).unwrap_err();
        assert!(errors.contains("name"));
        assert!(errors.contains("description"));
    }

    #[test]
    fn merge_keeps_identity() {
        let mut point = NewPointOfInterest::new("Cathedral", Some("Gothic")).into_point_of_interest(3, 2);
        PointOfInterestForUpdateDto {
            name: Some("Our Lady".to_string()),
            description: None,
        }
        .merge_into(&mut point);
        assert_eq!(point.id, 3);
        assert_eq!(point.city_id, 2);
        assert_eq!(point.name, "Our Lady");
        assert_eq!(point.description, None);
    }
}
