//! The wire-shaped request/response/metadata types the data plane accepts
//! and returns. Transport servers (REST, gRPC) translate their own framing
//! into these; the core never parses a protocol frame itself.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// One element of `InferenceRequest.inputs`. The core only ever looks at
/// `parameters.extended_parameters["sla"]`; the rest is opaque payload the
/// `Model` implementation interprets.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestInput {
    pub name: String,
    #[serde(default)]
    pub shape: Vec<i64>,
    #[serde(default)]
    pub datatype: String,
    #[serde(default)]
    pub parameters: Option<Parameters>,
    #[serde(default)]
    pub data: Value,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameters {
    #[serde(default)]
    pub extended_parameters: Option<Map<String, Value>>,
}

/// §6 payload contract. `id` is filled in by the data plane (step 5 of
/// `infer`) when the caller leaves it unset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InferenceRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub parameters: Option<Parameters>,
    #[serde(default)]
    pub inputs: Vec<RequestInput>,
    /// Transport headers carried alongside the body, populated by the
    /// server layer before the request enters the middleware chain (§4.4).
    /// Not part of the wire JSON body itself.
    #[serde(skip)]
    pub headers: HashMap<String, String>,
}

impl InferenceRequest {
    /// §4.3 step 4: the SLA value under `inputs[0].parameters.extendedParameters["sla"]`,
    /// defaulting to 0 on absence or type mismatch at any level.
    pub fn sla(&self) -> f64 {
        self.inputs
            .first()
            .and_then(|input| input.parameters.as_ref())
            .and_then(|params| params.extended_parameters.as_ref())
            .and_then(|extended| extended.get("sla"))
            .and_then(Value::as_f64)
            .unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseOutput {
    pub name: String,
    #[serde(default)]
    pub shape: Vec<i64>,
    #[serde(default)]
    pub datatype: String,
    #[serde(default)]
    pub data: Value,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InferenceResponse {
    pub id: String,
    #[serde(default)]
    pub model_name: Option<String>,
    #[serde(default)]
    pub model_version: Option<String>,
    #[serde(default)]
    pub outputs: Vec<ResponseOutput>,
    /// Transport headers the response middleware chain may annotate;
    /// rendered back onto the outgoing HTTP response by the server layer.
    #[serde(skip)]
    pub headers: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelMetadata {
    pub name: String,
    #[serde(default)]
    pub versions: Vec<String>,
    pub platform: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerMetadata {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub extensions: Vec<String>,
}
