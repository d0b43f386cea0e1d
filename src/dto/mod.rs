pub mod api_response;
pub mod car_dto;
pub mod recommendation_dto;

pub use api_response::ApiResponse;
