//! Request / response DTO (Data Transfer Object) types.
//!
//! These types are used by Axum handlers for JSON (de)serialisation, are
//! validated with [`validator`] and are annotated with [`utoipa`] attributes
//! to generate the OpenAPI schema.

pub mod agents;
pub mod ai;
pub mod auth;
