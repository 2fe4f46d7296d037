use serde::Serialize;
use serde_json::Value;

use crate::API_VERSION;
use crate::error::{ClientError, ClientResult};

/// Outcome wrapper every command returns. The `command` string routes the
/// CLI's per-command renderers; `data` is the command-specific payload.
#[derive(Debug, Clone, Serialize)]
pub struct SuccessEnvelope {
    pub ok: bool,
    pub command: String,
    pub version: String,
    pub data: Value,
}

impl SuccessEnvelope {
    pub fn for_command<T>(command: &str, data: T) -> ClientResult<Self>
    where
        T: Serialize,
    {
        let data = serde_json::to_value(data)
            .map_err(|err| ClientError::internal_serialization(&err.to_string()))?;
        Ok(Self {
            ok: true,
            command: command.to_string(),
            version: API_VERSION.to_string(),
            data,
        })
    }
}

/// Machine-readable failure shape: `ok` is always false, `data` carries the
/// structured context some errors attach (duplicate match, command hint).
#[derive(Debug, Clone, Serialize)]
pub struct FailureEnvelope {
    pub ok: bool,
    pub error: ErrorBody,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    pub recovery_steps: Vec<String>,
}

impl FailureEnvelope {
    pub fn from_error(error: &ClientError) -> Self {
        Self {
            ok: false,
            error: ErrorBody {
                code: error.code.clone(),
                message: error.message.clone(),
                recovery_steps: error.recovery_steps.clone(),
            },
            data: error.data.clone(),
        }
    }
}
