pub mod analysis;
pub mod chains;
pub mod config;
pub mod models;
pub mod server;
pub mod storage;

pub use config::Settings;
pub use models::{Persona, PersonaError, Result, WalletAddress, WalletMetrics, WalletReport};

// Re-export commonly used types
pub use rust_decimal::Decimal;
