use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A stored weather record as returned by `GET /weather/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub date: String,
    pub location: String,
    #[serde(default)]
    pub notes: Option<String>,

    /// Raw upstream payload. Its shape depends on what the backend stored,
    /// so it is kept untyped and inspected through [`WeatherRecord::details`].
    /// `None` when the key is absent, `Some(Value::Null)` for an explicit null.
    #[serde(
        rename = "weatherData",
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub weather_data: Option<Value>,
}

impl WeatherRecord {
    /// Notes worth showing: present and non-empty.
    pub fn visible_notes(&self) -> Option<&str> {
        self.notes.as_deref().filter(|n| !n.is_empty())
    }

    /// Classify the payload into current conditions or an unknown shape.
    pub fn details(&self) -> WeatherDetails<'_> {
        let Some(data) = &self.weather_data else {
            return WeatherDetails::Missing;
        };

        match data.get("current") {
            Some(current) if is_truthy(current) => {
                WeatherDetails::Current(CurrentConditions::from_value(current))
            }
            _ => WeatherDetails::Raw(data),
        }
    }
}

/// View over `weatherData`.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherDetails<'a> {
    Current(CurrentConditions),
    /// Anything without a usable `current` block.
    Raw(&'a Value),
    /// The record carried no `weatherData` key at all.
    Missing,
}

/// Present-moment metrics picked out of `weatherData.current`.
///
/// Each field is optional: the backend forwards whatever the upstream
/// provider answered, so individual metrics may be missing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CurrentConditions {
    pub temperature: Option<Value>,
    pub description: Option<Value>,
    pub humidity: Option<Value>,
    pub uv_index: Option<Value>,
}

impl CurrentConditions {
    fn from_value(current: &Value) -> Self {
        let field = |name: &str| current.get(name).cloned();

        Self {
            temperature: field("temperature"),
            description: current
                .get("weather_descriptions")
                .and_then(|d| d.get(0))
                .cloned(),
            humidity: field("humidity"),
            uv_index: field("uv_index"),
        }
    }
}

/// Body of `POST /weather`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewWeatherRecord {
    pub date: String,
    pub location: String,
    #[serde(default)]
    pub notes: String,
}

/// Answer of `POST /weather`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedRecord {
    pub id: String,
}

/// Keeps an explicit `null` distinct from an absent key.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// JavaScript-style truthiness, which decides whether `current` counts as present.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
