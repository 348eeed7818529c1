use std::sync::Arc;

use crate::agent::{AgentFactory, HostedAgentFactory};
use crate::agent_service::AgentServiceClient;
use crate::chat::{ChatProxyHandler, CredentialSource, EnvCredentialSource};
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub agent_service: Arc<AgentServiceClient>,
    pub chat: Arc<ChatProxyHandler>,
}

impl AppState {
    /// Production wiring: hosted agents, secrets from the environment
    pub fn new(config: Config) -> Self {
        let agent_service = Arc::new(AgentServiceClient::new(
            config.agent_service_config.base_url.clone(),
        ));
        let factory = Arc::new(HostedAgentFactory::new(agent_service.clone()));
        let credentials = Arc::new(EnvCredentialSource::new(config.credential_env.clone()));
        Self::with_parts(config, agent_service, factory, credentials)
    }

    pub fn with_parts(
        config: Config,
        agent_service: Arc<AgentServiceClient>,
        factory: Arc<dyn AgentFactory>,
        credentials: Arc<dyn CredentialSource>,
    ) -> Self {
        let chat = Arc::new(ChatProxyHandler::new(
            factory,
            credentials,
            config.chat_config.clone().into(),
        ));
        Self {
            config: Arc::new(config),
            agent_service,
            chat,
        }
    }
}
