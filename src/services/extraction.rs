//! Recovery of a typed analysis result from raw model output.
//!
//! The model is asked for a single JSON object, but replies arrive wrapped
//! in code fences, padded with prose, or structurally broken often enough
//! that parsing is a cascade: a fixed table of pure strategies, attempted
//! strictly in order from cheapest-and-most-faithful to lossy salvage, with
//! the first recovered object winning.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::ServiceError;
use crate::models::analysis::AnalysisResult;
use crate::models::graph::{ChartType, Graph, GraphData};

/// Longest raw-text preview carried in an extraction failure.
const RAW_PREVIEW_LEN: usize = 200;

lazy_static! {
    // Matches the analysis string value, honoring escaped characters.
    static ref ANALYSIS_FIELD_REGEX: Regex =
        Regex::new(r#"(?s)"analysis"\s*:\s*"((?:[^"\\]|\\.)*)""#).unwrap();
    // Matches a fenced block with an optional json language tag.
    static ref FENCED_BLOCK_REGEX: Regex = Regex::new(r"(?s)```(?:json)?\s*(.*?)```").unwrap();
}

type Strategy = fn(&str) -> Option<Map<String, Value>>;

/// Parsing tiers, in the order they are attempted.
const STRATEGIES: [(&str, Strategy); 5] = [
    ("direct", parse_direct),
    ("balanced-braces", parse_balanced_object),
    ("fenced-block", parse_fenced_blocks),
    ("field-salvage", salvage_fields),
    ("fence-strip", parse_stripped_fences),
];

/// Coerce a raw model reply into a typed analysis result.
///
/// The `analysis` field is required on whatever object is recovered; its
/// absence is a schema failure, never silently defaulted. The `chart` field
/// is materialized only when present, non-null, and itself an object. The
/// user query is echoed back verbatim.
pub fn extract_analysis(raw: &str, user_query: &str) -> Result<AnalysisResult, ServiceError> {
    let text = raw.trim();

    let (tier, mut fields) = STRATEGIES
        .iter()
        .find_map(|(name, strategy)| strategy(text).map(|fields| (*name, fields)))
        .ok_or_else(|| ServiceError::Extraction(raw_preview(text)))?;

    tracing::debug!("Recovered analysis object via the {} tier", tier);

    let chart = match fields.remove("chart") {
        Some(Value::Object(chart_fields)) => Some(materialize_chart(chart_fields)?),
        _ => None,
    };

    let analysis = match fields.remove("analysis") {
        Some(Value::String(analysis)) => analysis,
        Some(_) => {
            return Err(ServiceError::Schema(
                "the analysis field must be a string".to_string(),
            ));
        }
        None => {
            return Err(ServiceError::Schema(
                "the analysis field is missing".to_string(),
            ));
        }
    };

    Ok(AnalysisResult {
        chart,
        analysis,
        user_query: user_query.to_string(),
    })
}

/// Validate parsed chart fields and wrap them into an identified graph.
///
/// `type`, `title`, and `data` are required; a violation fails the whole
/// analysis call rather than degrading to a chart-less result.
pub fn materialize_chart(mut fields: Map<String, Value>) -> Result<Graph, ServiceError> {
    let graph_type = match fields.remove("type") {
        Some(value @ Value::String(_)) => {
            serde_json::from_value::<ChartType>(value).map_err(|_| {
                ServiceError::Schema(
                    "chart type must be one of line, bar, pie, area, scatter".to_string(),
                )
            })?
        }
        _ => return Err(ServiceError::Schema("chart is missing a type".to_string())),
    };

    let title = match fields.remove("title") {
        Some(Value::String(title)) => title,
        _ => return Err(ServiceError::Schema("chart is missing a title".to_string())),
    };

    let data = match fields.remove("data") {
        Some(Value::Array(rows)) => {
            if !rows.iter().all(Value::is_object) {
                return Err(ServiceError::Schema(
                    "chart data rows must be objects".to_string(),
                ));
            }
            rows
        }
        _ => {
            return Err(ServiceError::Schema(
                "chart data must be an array".to_string(),
            ));
        }
    };

    Ok(Graph {
        id: Uuid::new_v4().to_string(),
        graph_type,
        title,
        data: GraphData {
            data,
            x_axis_key: take_string(&mut fields, "xAxisKey"),
            y_axis_key: take_string(&mut fields, "yAxisKey"),
        },
        extra: None,
        justification: take_string(&mut fields, "justification"),
    })
}

fn take_string(fields: &mut Map<String, Value>, key: &str) -> Option<String> {
    match fields.remove(key) {
        Some(Value::String(value)) => Some(value),
        _ => None,
    }
}

fn parse_object(candidate: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(candidate.trim()) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// Tier 1: the whole reply is the object.
fn parse_direct(text: &str) -> Option<Map<String, Value>> {
    parse_object(text)
}

/// Tier 2: slice out the first balanced top-level `{...}` and parse it.
fn parse_balanced_object(text: &str) -> Option<Map<String, Value>> {
    parse_object(first_balanced_object(text)?)
}

/// Scan forward from the first `{`, tracking nesting depth, and return the
/// first balanced object slice. Braces inside string literals fool the
/// scan; tier ordering means that only matters once a direct parse has
/// already failed, and a bad slice simply fails to parse.
fn first_balanced_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    for (offset, ch) in text[start..].char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Tier 3: try each triple-backtick block in turn until one parses.
fn parse_fenced_blocks(text: &str) -> Option<Map<String, Value>> {
    FENCED_BLOCK_REGEX
        .captures_iter(text)
        .find_map(|captures| parse_object(&captures[1]))
}

/// Tier 4: structural parsing failed entirely; pull the analysis string out
/// with a regex. A chart is never reconstructed on this tier: whatever the
/// chart field held is discarded, and the captured analysis text keeps its
/// escape sequences as-is.
fn salvage_fields(text: &str) -> Option<Map<String, Value>> {
    let captures = ANALYSIS_FIELD_REGEX.captures(text)?;
    let mut fields = Map::new();
    fields.insert(
        "analysis".to_string(),
        Value::String(captures[1].to_string()),
    );
    fields.insert("chart".to_string(), Value::Null);
    Some(fields)
}

/// Tier 5: strip leading/trailing fence markers (with or without a json
/// tag), retry a direct parse, and fall back to field salvage on the
/// stripped text.
fn parse_stripped_fences(text: &str) -> Option<Map<String, Value>> {
    let stripped = strip_fences(text)?;
    parse_object(stripped).or_else(|| salvage_fields(stripped))
}

fn strip_fences(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))?;
    Some(body.strip_suffix("```").unwrap_or(body).trim())
}

fn raw_preview(text: &str) -> String {
    text.chars().take(RAW_PREVIEW_LEN).collect()
}
