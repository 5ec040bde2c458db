pub mod dto;

pub use dto::{
    CityDto, CityResponseDto, CityWithoutPointsOfInterestDto, PointOfInterestDto, PointOfInterestField,
    PointOfInterestForCreationDto, PointOfInterestForUpdateDto,
};
