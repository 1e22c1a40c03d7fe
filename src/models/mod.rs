pub mod address;
pub mod analysis;
pub mod error;
pub mod metrics;
pub mod snapshot;

pub use address::*;
pub use analysis::*;
pub use error::*;
pub use metrics::*;
pub use snapshot::*;
