pub mod appointment;
pub mod carnet;
pub mod catalog;
pub mod chat;
pub mod notification;
pub mod user;
