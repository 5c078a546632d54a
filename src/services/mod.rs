pub mod media_service;
pub mod plant_api_service;
pub mod prompt_service;
