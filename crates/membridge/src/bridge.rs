//! Command dispatch from CLI invocations to memory operations.

use crate::error::BridgeError;
use log::debug;
use membridge_config::MembridgeConfig;
use membridge_memory::{
    BackendRegistry, Envelope, Memory, MemoryId, MemoryObserver, Metadata, Payload,
};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::str::FromStr;
use std::sync::Arc;

/// Commands understood by the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Add,
    Search,
    Delete,
    GetAll,
    Reset,
}

impl Command {
    /// Name used on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Search => "search",
            Self::Delete => "delete",
            Self::GetAll => "get_all",
            Self::Reset => "reset",
        }
    }
}

impl FromStr for Command {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "add" => Ok(Self::Add),
            "search" => Ok(Self::Search),
            "delete" => Ok(Self::Delete),
            "get_all" => Ok(Self::GetAll),
            "reset" => Ok(Self::Reset),
            other => Err(format!("Unknown command: {other}")),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddArgs {
    content: String,
    user_id: String,
    #[serde(default)]
    metadata: Option<Metadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchArgs {
    query: String,
    user_id: String,
    #[serde(default)]
    limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeleteArgs {
    user_id: String,
    memory_id: MemoryId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetAllArgs {
    user_id: String,
}

/// Parse the raw argument blob into a JSON object.
pub fn parse_args(raw: &str) -> Result<Map<String, Value>, BridgeError> {
    match serde_json::from_str::<Value>(raw).map_err(BridgeError::MalformedJson)? {
        Value::Object(map) => Ok(map),
        _ => Err(BridgeError::NotAnObject),
    }
}

fn decode<T: DeserializeOwned>(
    command: Command,
    args: Map<String, Value>,
) -> Result<T, BridgeError> {
    serde_json::from_value(Value::Object(args)).map_err(|source| BridgeError::InvalidArguments {
        command: command.as_str(),
        source,
    })
}

/// Negative limits select nothing.
fn clamp_limit(limit: i64) -> usize {
    usize::try_from(limit).unwrap_or(0)
}

/// Translates one command invocation into a memory operation.
#[derive(Debug)]
pub struct Bridge {
    memory: Memory,
    default_limit: usize,
}

impl Bridge {
    /// Wrap an existing memory handle.
    pub fn new(memory: Memory, default_limit: usize) -> Self {
        Self {
            memory,
            default_limit,
        }
    }

    /// Build the memory handle from config.
    pub fn from_config(
        config: &MembridgeConfig,
        registry: &BackendRegistry,
        observer: Arc<dyn MemoryObserver>,
    ) -> Self {
        let memory = Memory::from_config(config, registry, observer);
        Self::new(memory, config.search.default_limit)
    }

    /// Underlying memory handle.
    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Run a command.
    ///
    /// Unknown commands and operation failures come back as failure envelopes.
    /// Only argument decoding errors are returned as `Err`.
    pub async fn dispatch(
        &self,
        command: &str,
        args: Map<String, Value>,
    ) -> Result<Envelope, BridgeError> {
        let command = match command.parse::<Command>() {
            Ok(command) => command,
            Err(message) => return Ok(Envelope::failure(message)),
        };
        debug!("dispatching command {}", command.as_str());

        let envelope = match command {
            Command::Add => {
                let args: AddArgs = decode(command, args)?;
                Envelope::from_result(
                    self.memory
                        .add(&args.content, &args.user_id, args.metadata)
                        .await,
                )
            }
            Command::Search => {
                let args: SearchArgs = decode(command, args)?;
                let limit = args.limit.map_or(self.default_limit, clamp_limit);
                Envelope::from_result(self.memory.search(&args.query, &args.user_id, limit).await)
            }
            Command::Delete => {
                let args: DeleteArgs = decode(command, args)?;
                let result = self.memory.delete(args.memory_id, &args.user_id).await;
                Envelope::from_result(result.map(Payload::Deleted))
            }
            Command::GetAll => {
                let args: GetAllArgs = decode(command, args)?;
                Envelope::from_result(self.memory.get_all(&args.user_id).await)
            }
            Command::Reset => Envelope::from_result(self.memory.reset().await),
        };
        Ok(envelope)
    }
}
