//! Domain module containing dock assignment types and reconciliation services

pub mod model;
pub mod repository;
pub mod service;

pub use model::*;
pub use repository::AssignmentRepository;
