pub mod agent_interface;
pub mod agent_factory;
pub mod hosted_agent;
pub mod llm_client;

pub use agent_interface::*;
pub use agent_factory::*;
pub use hosted_agent::*;
pub use llm_client::*;
