pub mod car_controller;
pub mod recommendation_controller;
