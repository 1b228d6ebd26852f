//! Bookshelf
//!
//! A server-rendered book catalogue: list, search, paginate, create, read, update and delete
//! books stored in SQLite.
//!
//! Requests are resolved into a [`BookRoute`], handed to a [`BookController`] and rendered with
//! askama templates. Handler failures are [`AppError`] values, rendered by a single step into
//! the generic error page.

pub mod error;
pub mod store;
pub mod views;

mod controller;
mod route;
mod server;
mod templating;

pub use controller::{BookController, Controller, PAGE_SIZE, page_count};
pub use error::AppError;
pub use route::{BookRoute, Route, RouteError, RouteExt};
pub use server::{
    ControllerRouter, ServeError, Server, ServerBuilder, ServerOptions,
    ServerOptionsFromEnvError, forward_errors,
};
pub use templating::RenderIntoResponse;
