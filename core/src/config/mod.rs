mod load;
mod types;

pub use load::{get_citriage_data_dir, load_default, load_from_path};
pub use types::{
    AppConfig, CacheConfig, ColorMode, GithubConfig, LoggingConfig, ReportConfig,
};
