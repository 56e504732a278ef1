//! Conversions between domain models and the DTOs of the `shared` crate.

pub mod appointment_mapper;
pub mod carnet_mapper;
pub mod catalog_mapper;
pub mod chat_mapper;
pub mod notification_mapper;
pub mod user_mapper;
