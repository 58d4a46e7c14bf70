mod client;
mod error;
mod models;

pub use client::GithubClient;
pub use error::{GithubHttpError, GithubHttpErrorKind};
