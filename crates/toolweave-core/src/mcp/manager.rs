//! Session manager
//!
//! Owns one session per configured provider, builds the merged tool catalog
//! at connect time and routes tool names to their owning session.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::logging::Logger;
use crate::tools::ToolCatalog;
use crate::types::ProviderConfig;
use crate::{log_info, log_warn};
use super::error::{McpError, McpResult};
use super::provider::ProviderConnector;
use super::session::ProviderSession;

/// Outcome of `SessionManager::close`
#[derive(Debug, Default)]
pub struct CloseReport {
    /// Sessions that were closed (including ones whose close reported an error)
    pub closed: usize,
    /// Provider name and error for every close that failed
    pub failures: Vec<(String, McpError)>,
}

impl CloseReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ManagerState {
    Idle,
    Connected,
    Closed,
}

/// Owns the provider sessions and the merged catalog
///
/// `connect` succeeds at most once per manager; a failed connect leaves it
/// idle so the caller may decide to try again. Sessions and catalog are only
/// mutated by `connect` and `close`, both of which take `&mut self`.
pub struct SessionManager {
    connector: Arc<dyn ProviderConnector>,
    /// Sessions in connect order
    sessions: Vec<Arc<ProviderSession>>,
    by_name: HashMap<String, usize>,
    catalog: ToolCatalog,
    state: ManagerState,
    logger: Arc<dyn Logger>,
}

impl SessionManager {
    pub fn new(connector: Arc<dyn ProviderConnector>, logger: Arc<dyn Logger>) -> Self {
        Self {
            connector,
            sessions: Vec::new(),
            by_name: HashMap::new(),
            catalog: ToolCatalog::new(),
            state: ManagerState::Idle,
            logger,
        }
    }

    /// Connect to every provider, in order, and build the catalog
    ///
    /// Any connection, handshake or discovery failure aborts the whole call:
    /// every session opened so far is closed and the error is returned. The
    /// manager is left with no sessions and an empty catalog.
    pub async fn connect(&mut self, providers: &[ProviderConfig]) -> McpResult<()> {
        if self.state != ManagerState::Idle {
            return Err(McpError::AlreadyConnected);
        }

        let mut seen = HashSet::new();
        for config in providers {
            if !seen.insert(config.name.as_str()) {
                return Err(McpError::InvalidConfig(format!(
                    "provider '{}' is listed more than once",
                    config.name
                )));
            }
        }

        let mut opened: Vec<Arc<ProviderSession>> = Vec::with_capacity(providers.len());
        let mut catalog = ToolCatalog::new();

        for config in providers {
            match self.open_session(config).await {
                Ok(session) => {
                    let session = Arc::new(session);
                    for name in catalog.register_session(&session) {
                        log_warn!(
                            self.logger,
                            "[SessionManager] Tool '{}' redefined by provider '{}'; later registration wins",
                            name,
                            session.name()
                        );
                    }
                    opened.push(session);
                }
                Err(e) => {
                    self.logger.error(&format!(
                        "[SessionManager] Provider '{}' failed, rolling back {} open session(s): {}",
                        config.name,
                        opened.len(),
                        e
                    ));
                    // Drop the partial catalog first so it releases its session references
                    drop(catalog);
                    for session in &opened {
                        if let Err(close_err) = session.close().await {
                            log_warn!(
                                self.logger,
                                "[SessionManager] Rollback close of '{}' failed: {}",
                                session.name(),
                                close_err
                            );
                        }
                    }
                    return Err(e);
                }
            }
        }

        self.by_name = opened
            .iter()
            .enumerate()
            .map(|(i, s)| (s.name().to_string(), i))
            .collect();
        self.sessions = opened;
        self.catalog = catalog;
        self.state = ManagerState::Connected;

        log_info!(
            self.logger,
            "[SessionManager] Connected {} provider(s), {} tool(s) in catalog",
            self.sessions.len(),
            self.catalog.len()
        );

        Ok(())
    }

    /// Connect and discover a single provider
    ///
    /// A session whose discovery fails is closed before returning.
    async fn open_session(&self, config: &ProviderConfig) -> McpResult<ProviderSession> {
        let handle = self.connector.connect(config).await?;
        let mut session = ProviderSession::new(config.clone(), handle);

        let discovered = session.discover().await.map(|tools| tools.len());
        match discovered {
            Ok(count) => {
                log_info!(
                    self.logger,
                    "[SessionManager] Provider '{}' offers {} tool(s)",
                    config.name,
                    count
                );
                Ok(session)
            }
            Err(e) => {
                if let Err(close_err) = session.close().await {
                    log_warn!(
                        self.logger,
                        "[SessionManager] Close after failed discovery of '{}' failed: {}",
                        config.name,
                        close_err
                    );
                }
                Err(e)
            }
        }
    }

    /// Close every session
    ///
    /// Never fails: individual close errors are collected in the report so
    /// that every session is released. Calling it again closes nothing.
    pub async fn close(&mut self) -> CloseReport {
        let sessions = std::mem::take(&mut self.sessions);
        self.by_name.clear();
        self.catalog = ToolCatalog::new();
        if self.state == ManagerState::Connected {
            self.state = ManagerState::Closed;
        }

        let mut report = CloseReport::default();
        for session in sessions {
            report.closed += 1;
            if let Err(e) = session.close().await {
                log_warn!(self.logger, "[SessionManager] Closing '{}' failed: {}", session.name(), e);
                report.failures.push((session.name().to_string(), e));
            }
        }

        if report.closed > 0 {
            log_info!(
                self.logger,
                "[SessionManager] Closed {} session(s), {} failure(s)",
                report.closed,
                report.failures.len()
            );
        }
        report
    }

    /// Session owning `tool_name`
    pub fn route(&self, tool_name: &str) -> McpResult<Arc<ProviderSession>> {
        self.catalog
            .route(tool_name)
            .ok_or_else(|| McpError::UnknownTool(tool_name.to_string()))
    }

    pub fn catalog(&self) -> &ToolCatalog {
        &self.catalog
    }

    /// Session for a provider by name
    pub fn session(&self, provider: &str) -> Option<Arc<ProviderSession>> {
        self.by_name.get(provider).map(|&i| Arc::clone(&self.sessions[i]))
    }

    /// Connected provider names in connect order
    pub fn provider_names(&self) -> Vec<&str> {
        self.sessions.iter().map(|s| s.name()).collect()
    }

    /// Whether `connect` has succeeded and `close` has not run since
    pub fn is_connected(&self) -> bool {
        self.state == ManagerState::Connected
    }
}

impl Drop for SessionManager {
    fn drop(&mut self) {
        let open = self.sessions.iter().filter(|s| !s.is_closed()).count();
        if open > 0 {
            log_warn!(
                self.logger,
                "[SessionManager] Dropped with {} open session(s); call close() to release them",
                open
            );
        }
    }
}
