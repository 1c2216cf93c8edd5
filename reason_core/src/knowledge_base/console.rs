//! Console service registration - pass-through to an external registry.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;

/// Descriptor of a console service inside a knowledge document.
///
/// Opaque to the core; a descriptor is forwarded to the registry only when
/// it is complete and declares a `json` parser.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConsoleDescriptor {
    pub url: Option<String>,
    pub data: Option<String>,
    pub parser: Option<String>,
}

/// A registered generic console service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleService {
    pub url: String,
    pub data: String,
}

/// Registry of console services declared by knowledge documents.
#[derive(Debug, Default)]
pub struct ConsoleRegistry {
    services: RwLock<HashMap<String, ConsoleService>>,
}

impl ConsoleRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a service if its descriptor is complete and json-parsed.
    ///
    /// Returns whether the descriptor was accepted.
    pub fn register(&self, name: &str, descriptor: &ConsoleDescriptor) -> bool {
        let (Some(url), Some(data), Some(parser)) =
            (&descriptor.url, &descriptor.data, &descriptor.parser)
        else {
            return false;
        };
        if parser != "json" {
            return false;
        }
        self.services.write().expect("console lock").insert(
            name.to_string(),
            ConsoleService {
                url: url.clone(),
                data: data.clone(),
            },
        );
        true
    }

    /// Look up a registered service.
    pub fn service(&self, name: &str) -> Option<ConsoleService> {
        self.services
            .read()
            .expect("console lock")
            .get(name)
            .cloned()
    }

    /// Number of registered services.
    pub fn len(&self) -> usize {
        self.services.read().expect("console lock").len()
    }

    /// Check whether any services are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(url: Option<&str>, data: Option<&str>, parser: Option<&str>) -> ConsoleDescriptor {
        ConsoleDescriptor {
            url: url.map(String::from),
            data: data.map(String::from),
            parser: parser.map(String::from),
        }
    }

    #[test]
    fn test_register_complete_descriptor() {
        let registry = ConsoleRegistry::new();
        let accepted = registry.register(
            "weather",
            &descriptor(Some("http://example.org"), Some("$query$"), Some("json")),
        );

        assert!(accepted);
        assert_eq!(
            registry.service("weather").unwrap().url,
            "http://example.org"
        );
    }

    #[test]
    fn test_incomplete_descriptor_is_ignored() {
        let registry = ConsoleRegistry::new();

        assert!(!registry.register("a", &descriptor(Some("u"), None, Some("json"))));
        assert!(!registry.register("b", &descriptor(None, Some("d"), Some("json"))));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_unknown_parser_is_ignored() {
        let registry = ConsoleRegistry::new();
        assert!(!registry.register("a", &descriptor(Some("u"), Some("d"), Some("xml"))));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_reregistration_replaces() {
        let registry = ConsoleRegistry::new();
        registry.register("a", &descriptor(Some("u1"), Some("d"), Some("json")));
        registry.register("a", &descriptor(Some("u2"), Some("d"), Some("json")));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.service("a").unwrap().url, "u2");
    }
}
