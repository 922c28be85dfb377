pub mod conf_repository;
pub mod models;
pub mod repositories;
