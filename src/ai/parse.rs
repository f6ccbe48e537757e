use lazy_static::lazy_static;
use regex::Regex;
use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use tracing::warn;

use crate::errors::ApiError;

#[derive(Debug, thiserror::Error)]
pub enum PlanParseError {
    #[error("model output contains no JSON object")]
    NoJson,
    #[error("model output does not match the plan schema: {0}")]
    Schema(#[from] serde_json::Error),
    #[error("model output is missing {0}")]
    Incomplete(&'static str),
}

/// Removes a leading ```` ```json ```` (or bare ```` ``` ````) fence and a
/// trailing ```` ``` ```` fence.
pub fn strip_code_fences(raw: &str) -> &str {
    lazy_static! {
        static ref OPEN_RE: Regex = Regex::new(r"^\s*```[A-Za-z0-9_-]*[ \t]*\r?\n?").unwrap();
        static ref CLOSE_RE: Regex = Regex::new(r"\r?\n?[ \t]*```\s*$").unwrap();
    }
    let start = OPEN_RE.find(raw).map(|m| m.end()).unwrap_or(0);
    let body = &raw[start..];
    let end = CLOSE_RE.find(body).map(|m| m.start()).unwrap_or(body.len());
    body[..end].trim()
}

/// Narrows model output to the outermost `{ ... }` span. A closed fenced
/// block wins over any prose around it; otherwise the whole text is scanned.
pub fn extract_json_object(raw: &str) -> Option<&str> {
    lazy_static! {
        static ref FENCED_RE: Regex =
            Regex::new(r"(?s)```[A-Za-z0-9_-]*[ \t]*\r?\n(.*?)```").unwrap();
    }
    let stripped = match FENCED_RE.captures(raw).and_then(|c| c.get(1)) {
        Some(body) => body.as_str(),
        None => strip_code_fences(raw),
    };
    let start = stripped.find('{')?;
    let end = stripped.rfind('}')?;
    (end > start).then(|| &stripped[start..=end])
}

pub fn parse_model_json<T: DeserializeOwned>(raw: &str) -> Result<T, PlanParseError> {
    let json = extract_json_object(raw).ok_or(PlanParseError::NoJson)?;
    Ok(serde_json::from_str(json)?)
}

/// Maps a parse failure to the 502 returned for unusable model output,
/// logging the raw text.
pub fn unparsable(raw: &str) -> impl FnOnce(PlanParseError) -> ApiError + '_ {
    move |e| {
        warn!(error = %e, raw = %raw, "model output rejected");
        ApiError::BadGateway("AI response could not be parsed".into())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumOrString {
    Num(f64),
    Str(String),
}

fn to_f64(v: Option<NumOrString>) -> f64 {
    match v {
        Some(NumOrString::Num(n)) => n,
        Some(NumOrString::Str(s)) => leading_number(&s).unwrap_or(0.0),
        None => 0.0,
    }
}

/// Parses the numeric prefix of strings like `"2.57"`, `"30 mins"` or `"12g"`.
fn leading_number(s: &str) -> Option<f64> {
    lazy_static! {
        static ref NUM_RE: Regex = Regex::new(r"^\s*(-?\d+(?:\.\d+)?)").unwrap();
    }
    NUM_RE
        .captures(s)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Accepts a JSON number, a numeric string or null (as 0).
pub fn lenient_f64<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    Ok(to_f64(Option::<NumOrString>::deserialize(d)?))
}

pub fn lenient_opt_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    let v = Option::<NumOrString>::deserialize(d)?;
    Ok(v.map(|n| to_f64(Some(n))))
}

pub fn lenient_i32<'de, D: Deserializer<'de>>(d: D) -> Result<i32, D::Error> {
    Ok(to_f64(Option::<NumOrString>::deserialize(d)?).round() as i32)
}

pub fn lenient_opt_i32<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i32>, D::Error> {
    let v = Option::<NumOrString>::deserialize(d)?;
    Ok(v.map(|n| to_f64(Some(n)).round() as i32))
}

/// Accepts a string or a number and keeps it as a string (`fibre` is stored
/// that way).
pub fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(match Option::<NumOrString>::deserialize(d)? {
        Some(NumOrString::Str(s)) => s,
        Some(NumOrString::Num(n)) => n.to_string(),
        None => String::new(),
    })
}
