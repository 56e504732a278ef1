//! # IO Module
//!
//! Adapter layer between HTTP clients and the domain services.
//!
//! ## Key Responsibilities
//!
//! - **API Endpoints**: axum routers under `/api`, one module per resource
//! - **Request/Response Handling**: DTOs from the `shared` crate in and out
//! - **Error Translation**: domain error variants to HTTP status codes
//! - **Session Guard**: patient-only resources answer 401 without a session
//! - **Outbound**: the optional remote chat assistant client
//!
//! ## Design Patterns
//!
//! - **Handler Pattern**: one handler function per endpoint
//! - **Dependency Injection**: services reach handlers through `AppState`
//! - **Mappers**: domain models never leak into the wire format

pub mod chat_assist_client;
pub mod rest;

pub use chat_assist_client::HttpChatAssistClient;
