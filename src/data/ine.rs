//! INE (`servicios.ine.es/wstempus`) API integration.
//!
//! Every endpoint we consume returns either a single series object or an array
//! of them. Bodies are validated into [`SeriesPayload`] records up front so a
//! shape change surfaces as one descriptive error instead of a missing field
//! deep inside ingestion.

use chrono::{DateTime, NaiveDate};
use reqwest::blocking::Client;
use rusqlite::ToSql;
use rusqlite::types::{ToSqlOutput, Value as SqlValue};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::domain::Indicator;
use crate::error::AppError;

pub const DEFAULT_BASE_URL: &str = "https://servicios.ine.es/wstempus";

/// Regional IPC table (one series per community and measure).
const REGIONAL_IPC: Endpoint = Endpoint {
    path: "js/ES/DATOS_TABLA/50940",
    nult: Some(1),
};

/// A fixed API path plus the optional "last N periods" parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub path: &'static str,
    pub nult: Option<u32>,
}

pub fn indicator_endpoint(indicator: Indicator) -> Endpoint {
    match indicator {
        Indicator::Ipc => Endpoint {
            path: "js/ES/DATOS_SERIE/IPC251856",
            nult: Some(100),
        },
        Indicator::Ipv => Endpoint {
            path: "jsCache/ES/DATOS_TABLA/25171",
            nult: None,
        },
    }
}

/// JSON scalar that INE emits either as a number or as a string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    pub fn as_f64(&self) -> Option<f64> {
        let v = match self {
            Scalar::Int(v) => *v as f64,
            Scalar::Float(v) => *v,
            Scalar::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        v.is_finite().then_some(v)
    }

    /// Numbers rounded to `places` decimals, the way a `DECIMAL(_, places)`
    /// column stores them; non-numeric text is left alone.
    pub fn rounded(&self, places: i32) -> Scalar {
        let round = |v: f64| {
            let factor = 10f64.powi(places);
            (v * factor).round() / factor
        };
        match self {
            Scalar::Int(v) => Scalar::Int(*v),
            Scalar::Float(v) => Scalar::Float(round(*v)),
            Scalar::Text(s) => match s.trim().parse::<f64>() {
                Ok(v) if v.is_finite() => Scalar::Float(round(v)),
                _ => Scalar::Text(s.clone()),
            },
        }
    }

    /// Interpret the scalar as a Unix timestamp in milliseconds.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Scalar::Int(ms) => DateTime::from_timestamp_millis(*ms).map(|dt| dt.date_naive()),
            _ => None,
        }
    }
}

impl std::fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scalar::Int(v) => write!(f, "{v}"),
            Scalar::Float(v) => write!(f, "{v}"),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

// Values are bound with their native storage class so the store keeps what the
// API sent; decoding happens on the way out.
impl ToSql for Scalar {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Scalar::Int(v) => ToSqlOutput::Owned(SqlValue::Integer(*v)),
            Scalar::Float(v) => ToSqlOutput::Owned(SqlValue::Real(*v)),
            Scalar::Text(s) => ToSqlOutput::from(s.as_str()),
        })
    }
}

/// One series object (`COD`, `Nombre`, `Data`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SeriesPayload {
    #[serde(rename = "COD", default)]
    pub cod: String,
    #[serde(rename = "Nombre")]
    pub nombre: String,
    #[serde(rename = "Data", default, deserialize_with = "null_as_empty")]
    pub data: Vec<DataPoint>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DataPoint {
    #[serde(rename = "Fecha")]
    pub fecha: Scalar,
    #[serde(rename = "FK_Periodo")]
    pub periodo: Scalar,
    #[serde(rename = "Anyo")]
    pub anyo: Scalar,
    #[serde(rename = "Valor")]
    pub valor: Option<Scalar>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<DataPoint>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<DataPoint>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Parse a response body holding one series object or an array of them.
pub fn parse_series_payload(body: &str) -> Result<Vec<SeriesPayload>, AppError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| AppError::remote(format!("INE response is not valid JSON: {e}")))?;

    match value {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(idx, item)| {
                serde_json::from_value(item)
                    .map_err(|e| AppError::remote(format!("Unexpected INE series #{idx}: {e}")))
            })
            .collect(),
        obj @ Value::Object(_) => {
            let series = serde_json::from_value(obj)
                .map_err(|e| AppError::remote(format!("Unexpected INE series object: {e}")))?;
            Ok(vec![series])
        }
        other => Err(AppError::remote(format!(
            "Unexpected INE response: expected a series object or array, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Earliest and latest observation dates across `series`, when INE sent
/// millisecond timestamps.
pub fn observation_span(series: &[SeriesPayload]) -> Option<(NaiveDate, NaiveDate)> {
    let mut dates = series
        .iter()
        .flat_map(|s| s.data.iter())
        .filter_map(|p| p.fecha.as_date());
    let first = dates.next()?;
    Some(dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d))))
}

pub struct IneClient {
    client: Client,
    base_url: String,
}

impl IneClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn fetch_indicator(&self, indicator: Indicator) -> Result<Vec<SeriesPayload>, AppError> {
        self.fetch(indicator_endpoint(indicator))
    }

    /// Latest-period regional IPC series.
    pub fn fetch_regional_ipc(&self) -> Result<Vec<SeriesPayload>, AppError> {
        self.fetch(REGIONAL_IPC)
    }

    fn fetch(&self, endpoint: Endpoint) -> Result<Vec<SeriesPayload>, AppError> {
        let url = format!("{}/{}", self.base_url, endpoint.path);
        let mut req = self.client.get(&url);
        if let Some(n) = endpoint.nult {
            req = req.query(&[("nult", n.to_string())]);
        }

        tracing::debug!(%url, nult = ?endpoint.nult, "requesting INE data");

        let resp = req
            .send()
            .map_err(|e| AppError::remote(format!("INE request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::remote(format!(
                "INE request to {url} failed with status {}.",
                resp.status()
            )));
        }

        let body = resp
            .text()
            .map_err(|e| AppError::remote(format!("Failed to read INE response: {e}")))?;

        parse_series_payload(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_series_object() {
        let body = r#"{
            "COD": "IPC251856",
            "Nombre": "Total Nacional. Índice general. Índice.",
            "Data": [
                {"Fecha": 1704063600000, "FK_Periodo": 1, "Anyo": 2024, "Valor": 112.3},
                {"Fecha": 1706742000000, "FK_Periodo": 2, "Anyo": 2024, "Valor": 112.7}
            ]
        }"#;

        let series = parse_series_payload(body).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].cod, "IPC251856");
        assert_eq!(series[0].data.len(), 2);
        assert_eq!(series[0].data[0].anyo, Scalar::Int(2024));
        assert_eq!(series[0].data[1].valor, Some(Scalar::Float(112.7)));
    }

    #[test]
    fn parses_series_array_with_null_data() {
        let body = r#"[
            {"COD": "IPV1", "Nombre": "Nacional", "Data": [
                {"Fecha": "2023-01-01", "FK_Periodo": "T1", "Anyo": "2023", "Valor": null}
            ]},
            {"COD": "IPV2", "Nombre": "Andalucía", "Data": null}
        ]"#;

        let series = parse_series_payload(body).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].data[0].fecha, Scalar::Text("2023-01-01".to_string()));
        assert_eq!(series[0].data[0].valor, None);
        assert!(series[1].data.is_empty());
    }

    #[test]
    fn rejects_unexpected_shapes() {
        let err = parse_series_payload("42").unwrap_err();
        assert_eq!(err.exit_code(), 4);
        assert!(err.message().contains("a number"));

        let err = parse_series_payload(r#"[{"COD": "X"}]"#).unwrap_err();
        assert!(err.message().contains("series #0"), "{}", err.message());
    }

    #[test]
    fn scalar_conversions() {
        assert_eq!(Scalar::Text(" 1.5 ".to_string()).as_f64(), Some(1.5));
        assert_eq!(Scalar::Text("n/d".to_string()).as_f64(), None);
        assert_eq!(Scalar::Int(3).to_string(), "3");
        assert_eq!(
            Scalar::Int(1_704_067_200_000).as_date(),
            NaiveDate::from_ymd_opt(2024, 1, 1)
        );
    }

    #[test]
    fn observation_span_covers_all_series() {
        let body = r#"[
            {"COD": "A", "Nombre": "a", "Data": [
                {"Fecha": 1704067200000, "FK_Periodo": 1, "Anyo": 2024, "Valor": 1.0}
            ]},
            {"COD": "B", "Nombre": "b", "Data": [
                {"Fecha": 1672531200000, "FK_Periodo": 1, "Anyo": 2023, "Valor": 1.0}
            ]}
        ]"#;
        let series = parse_series_payload(body).unwrap();
        let (lo, hi) = observation_span(&series).unwrap();
        assert_eq!(lo, NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
        assert_eq!(hi, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    }

    #[test]
    fn endpoints_match_indicator_shapes() {
        assert_eq!(indicator_endpoint(Indicator::Ipc).nult, Some(100));
        assert!(indicator_endpoint(Indicator::Ipv).path.starts_with("jsCache/"));
    }

    /// Serve one canned HTTP response on a local port.
    fn serve_once(response: &'static str) -> String {
        use std::io::{Read, Write};
        use std::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 2048];
                let _ = stream.read(&mut buf);
                let _ = stream.write_all(response.as_bytes());
            }
        });
        format!("http://{addr}")
    }

    #[test]
    fn non_success_status_is_a_remote_error() {
        let base = serve_once("HTTP/1.1 503 Service Unavailable\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
        let err = IneClient::new(base).fetch_indicator(Indicator::Ipc).unwrap_err();
        assert_eq!(err.exit_code(), 4);
        assert!(err.message().contains("503"), "{}", err.message());
    }

    #[test]
    fn successful_response_is_parsed() {
        let base = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 41\r\nConnection: close\r\n\r\n[{\"COD\": \"X\", \"Nombre\": \"Y\", \"Data\": []}]",
        );
        let series = IneClient::new(base).fetch_regional_ipc().unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].cod, "X");
    }

    #[test]
    fn unreachable_host_is_a_remote_error() {
        let err = IneClient::new("http://127.0.0.1:9").fetch_regional_ipc().unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn rounding_matches_two_decimal_columns() {
        assert_eq!(Scalar::Float(150.126).rounded(2), Scalar::Float(150.13));
        assert_eq!(Scalar::Int(7).rounded(2), Scalar::Int(7));
        assert_eq!(Scalar::Text(" 3.14159 ".to_string()).rounded(2), Scalar::Float(3.14));
        assert_eq!(Scalar::Text("n/a".to_string()).rounded(2), Scalar::Text("n/a".to_string()));
    }
}
