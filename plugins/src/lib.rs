pub mod factory;
pub mod github;
