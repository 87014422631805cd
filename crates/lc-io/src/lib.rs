pub mod browse;
pub mod config;
pub mod dataset;
pub mod reader;
pub mod tool;

pub use browse::{Entry, list_entries};
pub use config::{BrowseConfig, Config, ConfigError, ToolConfig, ViewConfig};
pub use dataset::load_dataset;
pub use reader::{parse_light_curve, parse_periodogram, read_light_curve, read_periodogram};
pub use tool::{ExternalTool, PeriodogramSource};
