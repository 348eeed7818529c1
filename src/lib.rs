pub mod agent;
pub mod agent_service;
pub mod chat;
pub mod config;
pub mod error;
pub mod footer;
pub mod routes;
pub mod state;
