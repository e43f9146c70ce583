pub mod context;
pub mod dashboard;
pub mod resource;
