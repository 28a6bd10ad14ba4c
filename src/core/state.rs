// src/core/state.rs

//! Defines the central `ServerState` shared by every connection worker.

use crate::config::Config;
use crate::core::blocking::BlockerManager;
use crate::core::storage::db::Db;
use std::sync::Arc;

/// The process-wide server state: configuration, the keyspace, and the
/// registry of blocked clients. Always passed around as an explicit
/// `Arc<ServerState>` handle, never reached through a global.
#[derive(Debug)]
pub struct ServerState {
    pub config: Config,
    pub db: Db,
    pub blocker_manager: Arc<BlockerManager>,
}

impl ServerState {
    pub fn new(config: Config) -> Arc<Self> {
        Arc::new(Self {
            config,
            db: Db::new(),
            blocker_manager: Arc::new(BlockerManager::new()),
        })
    }
}
