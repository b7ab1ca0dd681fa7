//! Merged tool namespace across all connected providers

use std::collections::HashMap;
use std::sync::Arc;

use crate::mcp::ProviderSession;
use crate::types::ToolDescriptor;

/// A catalog entry: the descriptor and the session that owns it
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub descriptor: ToolDescriptor,
    pub session: Arc<ProviderSession>,
}

/// Tool name → (descriptor, owning session)
///
/// Registering a name that is already present replaces the earlier entry:
/// the provider registered last wins. Declaration order is the order in which
/// names were first registered, so the list handed to the model is stable.
#[derive(Debug, Clone, Default)]
pub struct ToolCatalog {
    entries: HashMap<String, CatalogEntry>,
    order: Vec<String>,
}

impl ToolCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every tool of `session`
    ///
    /// Returns the names that replaced an entry from an earlier session.
    pub fn register_session(&mut self, session: &Arc<ProviderSession>) -> Vec<String> {
        let mut replaced = Vec::new();
        for descriptor in session.tools() {
            let entry = CatalogEntry {
                descriptor: descriptor.clone(),
                session: Arc::clone(session),
            };
            match self.entries.insert(descriptor.name.clone(), entry) {
                Some(previous) => {
                    if previous.session.name() != session.name() {
                        replaced.push(descriptor.name.clone());
                    }
                }
                None => self.order.push(descriptor.name.clone()),
            }
        }
        replaced
    }

    /// Look up the session owning `tool_name`
    pub fn route(&self, tool_name: &str) -> Option<Arc<ProviderSession>> {
        self.entries.get(tool_name).map(|e| Arc::clone(&e.session))
    }

    pub fn get(&self, tool_name: &str) -> Option<&CatalogEntry> {
        self.entries.get(tool_name)
    }

    pub fn contains(&self, tool_name: &str) -> bool {
        self.entries.contains_key(tool_name)
    }

    /// Descriptors in declaration order
    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.order
            .iter()
            .filter_map(|name| self.entries.get(name))
            .map(|e| e.descriptor.clone())
            .collect()
    }

    /// Tool names in declaration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::mock::{MockConnector, MockToolServer};
    use crate::mcp::ProviderConnector;
    use crate::types::ProviderConfig;

    async fn session(server: MockToolServer) -> Arc<ProviderSession> {
        let config = ProviderConfig::new(server.name(), "localhost", 1);
        let connector = MockConnector::new().with_server(server);
        let handle = connector.connect(&config).await.unwrap();
        let mut session = ProviderSession::new(config, handle);
        session.discover().await.unwrap();
        Arc::new(session)
    }

    #[tokio::test]
    async fn test_register_and_route() {
        let pdb = session(
            MockToolServer::new("pdb")
                .with_text_tool("get_structure", "s")
                .with_text_tool("get_assembly", "a"),
        )
        .await;

        let mut catalog = ToolCatalog::new();
        assert!(catalog.register_session(&pdb).is_empty());

        assert_eq!(catalog.len(), 2);
        assert!(catalog.contains("get_assembly"));
        assert_eq!(catalog.route("get_structure").unwrap().name(), "pdb");
        assert!(catalog.route("get_weather").is_none());
    }

    #[tokio::test]
    async fn test_collision_replaces_but_keeps_position() {
        let first = session(
            MockToolServer::new("first")
                .with_text_tool("alpha", "1")
                .with_text_tool("shared", "1"),
        )
        .await;
        let second = session(
            MockToolServer::new("second")
                .with_text_tool("shared", "2")
                .with_text_tool("omega", "2"),
        )
        .await;

        let mut catalog = ToolCatalog::new();
        catalog.register_session(&first);
        let replaced = catalog.register_session(&second);

        assert_eq!(replaced, vec!["shared".to_string()]);
        assert_eq!(catalog.names().collect::<Vec<_>>(), vec!["alpha", "shared", "omega"]);
        assert_eq!(catalog.route("shared").unwrap().name(), "second");

        let descriptors = catalog.descriptors();
        assert_eq!(descriptors[1].description, "shared (served by second)");
    }
}
