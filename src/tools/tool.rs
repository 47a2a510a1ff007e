use std::{collections::HashMap, fmt, future::Future, pin::Pin, sync::Arc};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::errors::ToolExecutionError;

/// Namespace label used when a tool name carries no `<group>::` prefix.
pub const DEFAULT_NAMESPACE: &str = "default";

/// Delimiter between namespace label and registry key in a tool name.
pub const NAMESPACE_DELIMITER: &str = "::";

/// Signature for an asynchronous tool executor function.
///
/// Receives the call's arguments as a JSON object (already checked against
/// the declared parameters) and produces the textual result handed back to
/// the agent.
pub type AsyncToolFn = Arc<
    dyn Fn(Value) -> Pin<Box<dyn Future<Output = Result<String, ToolExecutionError>> + Send>>
        + Send
        + Sync,
>;

/// Wrap an async closure into an [`AsyncToolFn`].
pub fn tool_fn<F, Fut>(f: F) -> AsyncToolFn
where
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<String, ToolExecutionError>> + Send + 'static,
{
    Arc::new(
        move |args: Value| -> Pin<Box<dyn Future<Output = Result<String, ToolExecutionError>> + Send>> {
            Box::pin(f(args))
        },
    )
}

/// A locally executable function the agent may ask for.
#[derive(Clone)]
pub struct Tool {
    /// Group label advertised to the agent (`<group>::<function>`).
    pub group: Option<String>,
    pub function: Function,
    pub executor: AsyncToolFn,
}

impl fmt::Debug for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tool")
            .field("group", &self.group)
            .field("function", &self.function)
            .field("executor", &"<async_fn>")
            .finish()
    }
}

impl Tool {
    /// Execute the tool with named arguments.
    ///
    /// Fails with [`ToolExecutionError::ArgumentMismatch`] when an argument
    /// is not a declared parameter or a required parameter is missing.
    pub async fn execute(&self, args: Map<String, Value>) -> Result<String, ToolExecutionError> {
        self.check_arguments(&args)?;
        (self.executor)(Value::Object(args)).await
    }

    /// Gets the name of the tool from its function definition.
    pub fn name(&self) -> &str {
        &self.function.name
    }

    pub fn check_arguments(&self, args: &Map<String, Value>) -> Result<(), ToolExecutionError> {
        let params = &self.function.parameters;

        let mut unknown: Vec<&str> = args
            .keys()
            .filter(|k| !params.properties.contains_key(k.as_str()))
            .map(String::as_str)
            .collect();
        if !unknown.is_empty() {
            unknown.sort_unstable();
            return Err(ToolExecutionError::ArgumentMismatch(format!(
                "{} got unexpected arguments: {}",
                self.name(),
                unknown.join(", ")
            )));
        }

        let missing: Vec<&str> = params
            .required
            .iter()
            .filter(|r| !args.contains_key(r.as_str()))
            .map(String::as_str)
            .collect();
        if !missing.is_empty() {
            return Err(ToolExecutionError::ArgumentMismatch(format!(
                "{} is missing required arguments: {}",
                self.name(),
                missing.join(", ")
            )));
        }

        Ok(())
    }

    pub fn declaration(&self) -> ToolDeclaration {
        ToolDeclaration {
            action_group: self.group.clone(),
            function: self.function.clone(),
        }
    }
}

/// Defines a function, its description, and its arguments.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Function {
    pub name: String,
    pub description: String,
    pub parameters: FunctionParameters,
}

/// Defines the arguments for a function using a JSON schema-like structure.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FunctionParameters {
    #[serde(rename = "type")]
    pub param_type: String,
    pub properties: HashMap<String, Property>,
    pub required: Vec<String>,
}

/// Defines a single property within function arguments.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Property {
    #[serde(rename = "type")]
    pub property_type: String,
    pub description: String,
}

/// How a tool is described to the agent endpoint.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ToolDeclaration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_group: Option<String>,
    pub function: Function,
}

/// A tool invocation requested by the agent.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ToolCall {
    /// Possibly namespaced name, `<group>::<function>`.
    pub name: String,
    #[serde(default)]
    pub arguments: Map<String, Value>,
}

impl ToolCall {
    pub fn new<T: Into<String>>(name: T, arguments: Map<String, Value>) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }

    /// Split the name into `(namespace, registry_key)`.
    pub fn target(&self) -> (&str, &str) {
        split_tool_name(&self.name)
    }
}

/// Split a tool name on the first `::`.
///
/// `"Group::Func"` yields `("Group", "Func")`; a name without the
/// delimiter falls under [`DEFAULT_NAMESPACE`].
pub fn split_tool_name(name: &str) -> (&str, &str) {
    match name.split_once(NAMESPACE_DELIMITER) {
        Some((namespace, key)) => (namespace, key),
        None => (DEFAULT_NAMESPACE, name),
    }
}

/// A tool's return value, correlated with the request that produced it.
///
/// Carried in `pending_input` until the next conversation turn delivers it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ToolResult {
    pub correlation_id: String,
    pub namespace: String,
    pub function: String,
    pub body: String,
}
