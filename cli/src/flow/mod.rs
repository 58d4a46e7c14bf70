pub mod local;
pub mod pr;
pub mod progress;
