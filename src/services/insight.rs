//! Gemini-backed traffic analysis.
//!
//! Builds a prompt describing the current topology, posts it to the
//! generation endpoint through the browser's `fetch`, and extracts the
//! text of the first candidate. The API key is compiled in from the
//! `GEMINI_API_KEY` environment variable at build time; without it every
//! request short-circuits to [`InsightError::MissingApiKey`].

use serde::{Deserialize, Serialize};
use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response};

use crate::components::arch_graph::theme::kind_style;
use crate::components::arch_graph::ArchData;

/// Generation model queried for analyses.
pub const MODEL: &str = "gemini-3-pro-preview";
/// Sampling temperature for every request.
const TEMPERATURE: f64 = 0.7;
/// Token budget the model may spend reasoning before it answers.
const THINKING_BUDGET: u32 = 4000;

/// Message shown in place of an analysis when a request fails outright.
pub const FALLBACK_MESSAGE: &str =
	"Failed to generate explanation. Please check your network or API configuration.";

/// Failure modes of an analysis request.
#[derive(Debug, Error)]
pub enum InsightError {
	/// The binary was built without `GEMINI_API_KEY` in the environment.
	#[error("missing GEMINI_API_KEY at build time")]
	MissingApiKey,
	/// The fetch itself failed, DNS, CORS, or connectivity.
	#[error("network request failed: {0}")]
	Network(String),
	/// The endpoint answered with a non-success status.
	#[error("generation endpoint returned status {0}")]
	Status(u16),
	/// The response body did not parse as a generation result.
	#[error("malformed generation response: {0}")]
	Malformed(String),
	/// The response parsed but carried no usable text.
	#[error("generation response contained no text")]
	Empty,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
	contents: Vec<Content<'a>>,
	#[serde(rename = "generationConfig")]
	generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
	parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
	text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
	temperature: f64,
	thinking_config: ThinkingConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ThinkingConfig {
	thinking_budget: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
	#[serde(default)]
	candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
	#[serde(default)]
	content: CandidateContent,
}

#[derive(Default, Deserialize)]
struct CandidateContent {
	#[serde(default)]
	parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
	#[serde(default)]
	text: String,
}

/// Compose the analysis prompt for the given topology. With a focus node
/// name the model is steered to that node's traffic; without one it covers
/// the end-to-end flow.
pub fn build_prompt(data: &ArchData, focus: Option<&str>) -> String {
	let nodes_context = data
		.nodes
		.iter()
		.map(|n| format!("{} ({}): {}", n.name, kind_style(n.kind).name, n.description))
		.collect::<Vec<_>>()
		.join("\n");
	let links_context = data
		.links
		.iter()
		.map(|l| format!("{} connects to {} via {}", l.source, l.target, l.label))
		.collect::<Vec<_>>()
		.join("\n");
	let focus_line = match focus {
		Some(name) => format!("Focus specifically on the traffic flowing through: {name}."),
		None => "Provide a comprehensive end-to-end traffic flow analysis.".to_string(),
	};

	format!(
		"Analyze the following cloud architecture:\n\n\
		NODES:\n{nodes_context}\n\n\
		CONNECTIONS:\n{links_context}\n\n\
		{focus_line}\n\n\
		Please provide:\n\
		1. A step-by-step technical explanation of how data travels through this system.\n\
		2. Security considerations at each hop (mTLS, IAM roles, firewalls).\n\
		3. Performance/Latency bottlenecks.\n\n\
		Format the response as clear Markdown with headings. Use bullet points for steps."
	)
}

/// Request an analysis of the topology, optionally focused on one node.
pub async fn fetch_insight(data: &ArchData, focus: Option<&str>) -> Result<String, InsightError> {
	let api_key = option_env!("GEMINI_API_KEY").ok_or(InsightError::MissingApiKey)?;

	let prompt = build_prompt(data, focus);
	let body = GenerateRequest {
		contents: vec![Content {
			parts: vec![Part { text: &prompt }],
		}],
		generation_config: GenerationConfig {
			temperature: TEMPERATURE,
			thinking_config: ThinkingConfig {
				thinking_budget: THINKING_BUDGET,
			},
		},
	};
	let body_json =
		serde_json::to_string(&body).map_err(|e| InsightError::Malformed(e.to_string()))?;

	let headers = Headers::new().map_err(js_error)?;
	headers
		.set("Content-Type", "application/json")
		.map_err(js_error)?;
	headers.set("x-goog-api-key", api_key).map_err(js_error)?;

	let init = RequestInit::new();
	init.set_method("POST");
	init.set_headers(&headers);
	init.set_body(&JsValue::from_str(&body_json));

	let url =
		format!("https://generativelanguage.googleapis.com/v1beta/models/{MODEL}:generateContent");
	let request = Request::new_with_str_and_init(&url, &init).map_err(js_error)?;

	let window = web_sys::window().ok_or_else(|| InsightError::Network("no window".into()))?;
	let promise: js_sys::Promise = window.fetch_with_request(&request);
	let response: Response = JsFuture::from(promise)
		.await
		.map_err(js_error)?
		.dyn_into()
		.map_err(|_| InsightError::Network("fetch resolved to a non-response".into()))?;

	if !response.ok() {
		return Err(InsightError::Status(response.status()));
	}

	let text = JsFuture::from(response.text().map_err(js_error)?)
		.await
		.map_err(js_error)?
		.as_string()
		.ok_or_else(|| InsightError::Malformed("response body was not text".into()))?;

	let parsed: GenerateResponse =
		serde_json::from_str(&text).map_err(|e| InsightError::Malformed(e.to_string()))?;

	let combined = parsed
		.candidates
		.first()
		.map(|c| {
			c.content
				.parts
				.iter()
				.map(|p| p.text.as_str())
				.collect::<Vec<_>>()
				.join("")
		})
		.unwrap_or_default();

	if combined.trim().is_empty() {
		return Err(InsightError::Empty);
	}
	Ok(combined)
}

fn js_error(value: JsValue) -> InsightError {
	InsightError::Network(format!("{value:?}"))
}
