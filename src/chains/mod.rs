pub mod client;
pub mod etherscan;

pub use client::ChainClient;
pub use etherscan::EtherscanClient;
