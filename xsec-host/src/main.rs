//! xsec Host
//!
//! Headless component host speaking line-delimited JSON on stdio. Every
//! request line `{"id": .., "method": .., "params": {..}}` gets exactly one
//! response line; requests without an id are notifications.
//!
//! Methods:
//! - functions: List registered Functions, optionally by category
//! - create: Create a component for a Function
//! - connect / disconnect: Set or clear an input slot
//! - solve: Run one compute cycle
//! - select: Change a dropdown selection
//! - save: Serialize a component document
//! - load: Rebuild a component from a saved document
//! - remove: Drop a component
//!
//! Logs go to stderr, filtered by `RUST_LOG` (default `info`). `XSEC_UNITS`
//! names an optional JSON file of default display units.

use std::collections::HashMap;
use std::env;
use std::fs;
use std::io::{self, BufRead, Write};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;
use xsec_adapter::{AdapterError, ComponentDocument, Cycle, HostedComponent};
use xsec_core::Value;
use xsec_function::FunctionRegistry;
use xsec_units::UnitDefaults;

const SERVER_NAME: &str = "xsec";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

// JSON-RPC error codes
const PARSE_ERROR: i32 = -32700;
const METHOD_NOT_FOUND: i32 = -32601;
const INVALID_PARAMS: i32 = -32602;
const COMPONENT_ERROR: i32 = -32000;

#[derive(Debug, Deserialize)]
struct Request {
    id: Option<JsonValue>,
    method: String,
    #[serde(default)]
    params: Option<JsonValue>,
}

#[derive(Debug, Serialize)]
struct Response {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<HostError>,
}

#[derive(Debug, Serialize)]
struct HostError {
    code: i32,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<JsonValue>,
}

impl HostError {
    fn invalid_params(message: impl Into<String>) -> Self {
        Self { code: INVALID_PARAMS, message: message.into(), data: None }
    }
}

impl From<AdapterError> for HostError {
    fn from(err: AdapterError) -> Self {
        match err {
            // Keep code and suggestion for the client
            AdapterError::Xsec(e) => Self {
                code: COMPONENT_ERROR,
                message: e.message.clone(),
                data: serde_json::to_value(&e).ok(),
            },
            other => Self { code: COMPONENT_ERROR, message: other.to_string(), data: None },
        }
    }
}

// Method parameters

#[derive(Debug, Deserialize)]
struct FunctionsParams {
    #[serde(default)]
    category: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CreateParams {
    function: String,
}

/// Input slot by nick name or position
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SlotRef {
    Index(usize),
    Name(String),
}

impl SlotRef {
    fn key(&self) -> String {
        match self {
            SlotRef::Index(i) => i.to_string(),
            SlotRef::Name(s) => s.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ConnectParams {
    component: String,
    slot: SlotRef,
    value: JsonValue,
}

#[derive(Debug, Deserialize)]
struct SlotParams {
    component: String,
    slot: SlotRef,
}

#[derive(Debug, Deserialize)]
struct ComponentParams {
    component: String,
}

#[derive(Debug, Deserialize)]
struct SelectParams {
    component: String,
    list: usize,
    item: String,
}

#[derive(Debug, Deserialize)]
struct LoadParams {
    document: ComponentDocument,
}

/// Components created during one stdio session, by id
struct Session {
    registry: FunctionRegistry,
    defaults: UnitDefaults,
    components: HashMap<String, HostedComponent>,
    next_id: u64,
}

impl Session {
    fn new(registry: FunctionRegistry, defaults: UnitDefaults) -> Self {
        Self { registry, defaults, components: HashMap::new(), next_id: 1 }
    }

    /// Handle one protocol line; `None` when nothing should be written back
    fn handle_line(&mut self, line: &str) -> Option<Response> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let request: Request = match serde_json::from_str(line) {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "unparseable request");
                return Some(Response {
                    id: None,
                    result: None,
                    error: Some(HostError { code: PARSE_ERROR, message: format!("Parse error: {}", e), data: None }),
                });
            }
        };

        debug!(method = %request.method, "processing request");
        let result = self.handle_request(&request);

        // Notifications (no id) get no response
        if request.id.is_none() {
            if let Err(e) = result {
                warn!(method = %request.method, error = %e.message, "notification failed");
            }
            return None;
        }

        Some(match result {
            Ok(r) => Response { id: request.id, result: Some(r), error: None },
            Err(e) => Response { id: request.id, result: None, error: Some(e) },
        })
    }

    fn handle_request(&mut self, request: &Request) -> Result<JsonValue, HostError> {
        let params = &request.params;
        match request.method.as_str() {
            "ping" => Ok(json!({ "name": SERVER_NAME, "version": SERVER_VERSION })),
            "functions" => self.functions(parse_params(params)?),
            "create" => self.create(parse_params(params)?),
            "connect" => self.connect(parse_params(params)?),
            "disconnect" => self.disconnect(parse_params(params)?),
            "solve" => self.solve(parse_params(params)?),
            "select" => self.select(parse_params(params)?),
            "save" => self.save(parse_params(params)?),
            "load" => self.load(parse_params(params)?),
            "remove" => self.remove(parse_params(params)?),
            _ => Err(HostError {
                code: METHOD_NOT_FOUND,
                message: format!("Method not found: {}", request.method),
                data: None,
            }),
        }
    }

    fn functions(&self, params: FunctionsParams) -> Result<JsonValue, HostError> {
        let functions = self.registry.list_functions(params.category.as_deref());
        Ok(json!({
            "functions": functions,
            "categories": self.registry.categories(),
        }))
    }

    fn create(&mut self, params: CreateParams) -> Result<JsonValue, HostError> {
        let component = HostedComponent::create(&self.registry, &params.function, &self.defaults)?;
        let description = describe(&component);
        let id = self.insert(component);
        info!(component = %id, function = %params.function, "created");
        Ok(json!({ "component": id, "description": description }))
    }

    fn connect(&mut self, params: ConnectParams) -> Result<JsonValue, HostError> {
        let value = json_to_value(&params.value)?;
        let component = self.component_mut(&params.component)?;
        component.connect(&params.slot.key(), value)?;
        Ok(json!({ "component": params.component, "inputs": inputs_json(component) }))
    }

    fn disconnect(&mut self, params: SlotParams) -> Result<JsonValue, HostError> {
        let component = self.component_mut(&params.component)?;
        component.disconnect(&params.slot.key())?;
        Ok(json!({ "component": params.component, "inputs": inputs_json(component) }))
    }

    fn solve(&mut self, params: ComponentParams) -> Result<JsonValue, HostError> {
        let component = self.component_mut(&params.component)?;
        let cycle = component.solve()?;
        Ok(report(&params.component, component, cycle))
    }

    fn select(&mut self, params: SelectParams) -> Result<JsonValue, HostError> {
        let component = self.component_mut(&params.component)?;
        let cycle = component.select(params.list, &params.item)?;
        Ok(report(&params.component, component, cycle))
    }

    fn save(&mut self, params: ComponentParams) -> Result<JsonValue, HostError> {
        let component = self.component_mut(&params.component)?;
        serde_json::to_value(component.to_document())
            .map_err(|e| HostError { code: COMPONENT_ERROR, message: e.to_string(), data: None })
    }

    fn load(&mut self, params: LoadParams) -> Result<JsonValue, HostError> {
        let (component, cycle) = HostedComponent::from_document(&self.registry, &params.document, &self.defaults)?;
        let id = self.insert(component);
        info!(component = %id, function = %params.document.function, "loaded");
        let component = self.component_mut(&id)?;
        Ok(json!({ "component": id, "description": describe(component), "report": report(&id, component, cycle) }))
    }

    fn remove(&mut self, params: ComponentParams) -> Result<JsonValue, HostError> {
        self.components
            .remove(&params.component)
            .ok_or_else(|| unknown_component(&params.component))?;
        Ok(json!({ "removed": params.component }))
    }

    fn insert(&mut self, component: HostedComponent) -> String {
        let id = format!("c{}", self.next_id);
        self.next_id += 1;
        self.components.insert(id.clone(), component);
        id
    }

    fn component_mut(&mut self, id: &str) -> Result<&mut HostedComponent, HostError> {
        self.components.get_mut(id).ok_or_else(|| unknown_component(id))
    }
}

fn unknown_component(id: &str) -> HostError {
    HostError::invalid_params(format!("Unknown component: {}", id))
}

fn parse_params<T: DeserializeOwned>(params: &Option<JsonValue>) -> Result<T, HostError> {
    let value = params.clone().unwrap_or_else(|| json!({}));
    serde_json::from_value(value).map_err(|e| HostError::invalid_params(format!("Invalid params: {}", e)))
}

/// Slot names and dropdown state of a component
fn describe(component: &HostedComponent) -> JsonValue {
    let host = component.host();
    json!({
        "function": component.adapter().component().metadata(),
        "inputs": host.input_names(),
        "outputs": host.output_names(),
        "dropdowns": component.adapter().write_state(),
    })
}

fn inputs_json(component: &HostedComponent) -> JsonValue {
    let host = component.host();
    let names = host.input_names();
    let values = host.inputs();
    JsonValue::Array(
        names
            .iter()
            .zip(values.iter())
            .map(|(name, value)| json!({ "name": name, "value": value.as_ref().map(value_to_json) }))
            .collect(),
    )
}

/// Outcome of one cycle: outputs by slot and the component's messages
fn report(id: &str, component: &HostedComponent, cycle: Cycle) -> JsonValue {
    let host = component.host();
    let outputs: Vec<JsonValue> = host
        .output_names()
        .iter()
        .zip(host.outputs())
        .map(|(name, value)| json!({ "name": name, "value": value.map(value_to_json) }))
        .collect();
    let cycle_name = match cycle {
        Cycle::Blocked => "blocked",
        Cycle::Computed(_) => "computed",
        Cycle::Reused(_) => "reused",
    };
    json!({
        "component": id,
        "cycle": cycle_name,
        "outcome": cycle.outcome(),
        "outputs": outputs,
        "messages": host.messages(),
    })
}

/// Plain JSON becomes the obvious `Value`; tagged objects deserialize as-is
fn json_to_value(json: &JsonValue) -> Result<Value, HostError> {
    Ok(match json {
        JsonValue::Null => Value::Null,
        JsonValue::Bool(b) => Value::Bool(*b),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => Value::Integer(i),
            None => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
        },
        JsonValue::String(s) => Value::Text(s.clone()),
        JsonValue::Array(items) => Value::List(items.iter().map(json_to_value).collect::<Result<_, _>>()?),
        JsonValue::Object(_) => serde_json::from_value(json.clone())
            .map_err(|e| HostError::invalid_params(format!("Invalid value: {}", e)))?,
    })
}

fn value_to_json(value: &Value) -> JsonValue {
    serde_json::to_value(value).unwrap_or(JsonValue::Null)
}

/// Default display units from `XSEC_UNITS`, if set and readable
fn unit_defaults() -> UnitDefaults {
    let Ok(path) = env::var("XSEC_UNITS") else {
        return UnitDefaults::default();
    };
    match read_unit_defaults(&path) {
        Ok(defaults) => {
            info!(path = %path, "loaded unit defaults");
            defaults
        }
        Err(e) => {
            warn!(path = %path, error = %e, "could not read unit defaults, using built-in units");
            UnitDefaults::default()
        }
    }
}

fn read_unit_defaults(path: &str) -> Result<UnitDefaults, String> {
    let text = fs::read_to_string(path).map_err(|e| e.to_string())?;
    serde_json::from_str(&text).map_err(|e| e.to_string())
}

fn main() {
    // stdout carries the protocol; logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let mut session = Session::new(xsec_std::standard_registry(), unit_defaults());
    info!(
        version = SERVER_VERSION,
        functions = session.registry.len(),
        "{} host ready, waiting for requests",
        SERVER_NAME
    );

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                error!(error = %e, "error reading input");
                break;
            }
        };
        let Some(response) = session.handle_line(&line) else {
            continue;
        };
        let response_json = match serde_json::to_string(&response) {
            Ok(json) => json,
            Err(e) => {
                error!(error = %e, "could not serialize response");
                continue;
            }
        };
        let mut stdout = io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{}", response_json).and_then(|_| stdout.flush()) {
            error!(error = %e, "error writing response");
            break;
        }
    }

    info!("client disconnected, shutting down");
}
