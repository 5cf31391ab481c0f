//! Plain-text rendering of lookup results.

use serde_json::Value;

use crate::{
    controller::LookupState,
    model::{WeatherDetails, WeatherRecord},
};

pub const DETAILS_HEADING: &str = "Weather Details";

/// Lines describing a fetched record.
pub fn render_record(record: &WeatherRecord) -> Vec<String> {
    let mut lines = vec![
        format!("Date: {}", record.date),
        format!("Location: {}", record.location),
    ];

    if let Some(notes) = record.visible_notes() {
        lines.push(format!("Notes: {notes}"));
    }

    lines.push(String::new());
    lines.push(DETAILS_HEADING.to_string());

    match record.details() {
        WeatherDetails::Current(current) => {
            lines.push(format!("Temperature: {}°C", display_value(current.temperature.as_ref())));
            lines.push(format!("Condition: {}", display_value(current.description.as_ref())));
            lines.push(format!("Humidity: {}%", display_value(current.humidity.as_ref())));
            lines.push(format!("UV Index: {}", display_value(current.uv_index.as_ref())));
        }
        WeatherDetails::Raw(payload) => {
            let pretty = serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string());
            lines.extend(pretty.lines().map(|l| format!("    {l}")));
        }
        WeatherDetails::Missing => {}
    }

    lines
}

/// Everything the lookup screen shows below the form.
pub fn render_state(state: &LookupState) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(err) = &state.error {
        lines.push(format!("Error: {err}"));
    }

    if let Some(record) = &state.record {
        lines.extend(render_record(record));
    }

    lines
}

/// Inline text for a single value. Missing, null and boolean values show as
/// nothing; integral floats drop their fraction.
fn display_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(_)) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
            _ => n.to_string(),
        },
        Some(other) => other.to_string(),
    }
}
