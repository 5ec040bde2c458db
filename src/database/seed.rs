use super::models::{City, PointOfInterest};

/// The fixed demo dataset loaded into an empty store at startup.
pub fn seed_cities() -> Vec<City> {
    vec![
        City::new(1, "New York City", Some("The one with that big park.")).with_points_of_interest(vec![
            point(1, 1, "Central Park", "The most visited urban park in the United States."),
            point(2, 1, "Empire State Building", "A 102-story skyscraper located in Midtown Manhattan."),
        ]),
        City::new(2, "Antwerp", Some("The one with the cathedral that was never really finished."))
            .with_points_of_interest(vec![
                point(3, 2, "Cathedral", "A Gothic style cathedral, conceived by architects Jan and Pietro."),
                point(4, 2, "Antwerp Central Station", "The finest example of railway architecture in Belgium."),
            ]),
        City::new(3, "Paris", Some("The one with the big tower.")).with_points_of_interest(vec![
            point(5, 3, "Eiffel Tower", "A wrought iron lattice tower in the Champ de Mars."),
            point(6, 3, "The Louvre", "The world's largest museum."),
        ]),
    ]
}

fn point(id: i64, city_id: i64, name: &str, description: &str) -> PointOfInterest {
    PointOfInterest {
        id,
        city_id,
        name: name.to_string(),
        description: Some(description.to_string()),
    }
}
