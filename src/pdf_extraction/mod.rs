// PDF extraction module
pub mod dual_channel;
pub mod gateway;
pub mod system_gateway;

pub use dual_channel::{Corpora, DualChannelExtractor};
pub use gateway::{ExtractionGateway, GatewayError, GatewayResult};
pub use system_gateway::SystemGateway;
