pub mod city;
pub mod point_of_interest;

pub use city::City;
pub use point_of_interest::{NewPointOfInterest, PointOfInterest};
