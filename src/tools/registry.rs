use std::collections::BTreeMap;

use super::{
    errors::ToolRegistryError,
    tool::{Tool, ToolDeclaration, NAMESPACE_DELIMITER},
};

/// Name-keyed set of locally executable tools.
///
/// Keys are validated when a tool is registered, so a failed lookup always
/// means the agent asked for something that was never offered.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Tool>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, tool: Tool) -> Result<(), ToolRegistryError> {
        let name = tool.name().to_string();
        if name.trim().is_empty() {
            return Err(ToolRegistryError::EmptyName);
        }
        if name.contains(NAMESPACE_DELIMITER) {
            return Err(ToolRegistryError::InvalidName(name));
        }
        if self.tools.contains_key(&name) {
            return Err(ToolRegistryError::Duplicate(name));
        }
        self.tools.insert(name, tool);
        Ok(())
    }

    pub fn with_tool(mut self, tool: Tool) -> Result<Self, ToolRegistryError> {
        self.register(tool)?;
        Ok(self)
    }

    pub fn get(&self, key: &str) -> Option<&Tool> {
        self.tools.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.tools.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.keys().map(String::as_str)
    }

    /// Tool descriptions advertised to the agent endpoint, ordered by name.
    pub fn declarations(&self) -> Vec<ToolDeclaration> {
        self.tools.values().map(Tool::declaration).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ToolBuilder;

    fn tool(name: &str) -> Tool {
        ToolBuilder::new()
            .function_name(name)
            .function_description("test")
            .executor_fn(|_| async { Ok(String::new()) })
            .build()
            .unwrap()
    }

    #[test]
    fn registered_tool_is_found_by_key() {
        let registry = ToolRegistry::new().with_tool(tool("getAssetValue")).unwrap();
        assert!(registry.contains("getAssetValue"));
        assert_eq!(registry.get("getAssetValue").unwrap().name(), "getAssetValue");
        assert!(registry.get("getMortgageRate").is_none());
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = ToolRegistry::new();
        registry.register(tool("a")).unwrap();
        assert_eq!(
            registry.register(tool("a")),
            Err(ToolRegistryError::Duplicate("a".into()))
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn invalid_names_are_rejected() {
        let mut registry = ToolRegistry::new();
        assert_eq!(registry.register(tool("  ")), Err(ToolRegistryError::EmptyName));
        assert_eq!(
            registry.register(tool("Group::Func")),
            Err(ToolRegistryError::InvalidName("Group::Func".into()))
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn declarations_are_sorted_by_name() {
        let registry = ToolRegistry::new()
            .with_tool(tool("b"))
            .unwrap()
            .with_tool(tool("a"))
            .unwrap();
        let names: Vec<_> = registry
            .declarations()
            .into_iter()
            .map(|d| d.function.name)
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
