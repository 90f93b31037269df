//! Request extractors shared by every handler.
//!
//! - [`auth::AuthUser`] -- caller resolved from a JWT Bearer token.
//! - [`rbac::RequireEditor`] -- requires `admin` or `editor`.
//! - [`rbac::RequireAdmin`] -- requires `admin`.
//! - [`validation::ValidatedJson`] -- sanitized body validated through a schema.
//! - [`params::Path`], [`params::Query`] -- typed parameters, JSON rejections.

pub mod auth;
pub mod params;
pub mod rbac;
pub mod validation;
