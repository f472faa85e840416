//! Axum handlers, split into the public read API and the admin console.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::ApiError;

pub mod admin;
pub mod public;

/// `Json` whose rejection is rendered as an `ApiError` body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct AppJson<T>(pub T);

/// `Query` whose rejection is rendered as an `ApiError` body.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct AppQuery<T>(pub T);

/// `Path` whose rejection is rendered as an `ApiError` body.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct AppPath<T>(pub T);
