pub mod settings;

pub use settings::{
    ApiSettings, AppSettings, CacheSettings, DatabaseSettings, ExplorerSettings,
    NarrativeSettings, Settings,
};
