//! Conversion of raw feed payloads into train events.
//!
//! Upstream field names vary between feed versions, so every event field is
//! read through an ordered list of candidate keys: the first key present with
//! a non-null value wins. A record with odd values is kept with safe defaults
//! rather than dropped.
//!
//! | field          | keys, in order                                               |
//! |----------------|--------------------------------------------------------------|
//! | `numero`       | `numero`, `numTreno`, `idTreno`                              |
//! | `categoria`    | `categoria`, `tipoTreno`                                     |
//! | `orario` (arr) | `arrivo`, `orarioArrivo`, `orario`, `oraArrivo`              |
//! | `orario` (dep) | `partenza`, `orarioPartenza`, `orario`, `oraPartenza`        |
//! | `ritardo`      | `ritardo`, `ritardoMinuti`, `statoRitardo`                   |
//! | `destinazione` | `nomeDestinazione`, `destinazione`                           |
//! | `provenienza`  | `nomeProvenienza`, `provenienza`                             |
//! | `binarioReale` | `binarioReale`                                               |

use serde::Serialize;
use serde_json::{Map, Number, Value};

use crate::domain::{Delay, EventKind, TrainEvent, extract_time};

const NUMBER_KEYS: &[&str] = &["numero", "numTreno", "idTreno"];
const CATEGORY_KEYS: &[&str] = &["categoria", "tipoTreno"];
const ARRIVAL_TIME_KEYS: &[&str] = &["arrivo", "orarioArrivo", "orario", "oraArrivo"];
const DEPARTURE_TIME_KEYS: &[&str] = &["partenza", "orarioPartenza", "orario", "oraPartenza"];
const DELAY_KEYS: &[&str] = &["ritardo", "ritardoMinuti", "statoRitardo"];
const DESTINATION_KEYS: &[&str] = &["nomeDestinazione", "destinazione"];
const ORIGIN_KEYS: &[&str] = &["nomeProvenienza", "provenienza"];
const PLATFORM_KEYS: &[&str] = &["binarioReale"];

/// One station's board after normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SourceSnapshot {
    #[serde(rename = "arrivi")]
    pub arrivals: Vec<TrainEvent>,

    #[serde(rename = "partenze")]
    pub departures: Vec<TrainEvent>,
}

impl SourceSnapshot {
    /// Total number of events on the board.
    pub fn len(&self) -> usize {
        self.arrivals.len() + self.departures.len()
    }

    /// Whether the board has no events at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Normalize a decoded feed payload of the form `{arrivi: [...], partenze: [...]}`.
///
/// A payload that is not an object, or whose lists are missing or not
/// arrays, yields empty lists. Non-object list entries are skipped.
pub fn normalize_payload(payload: &Value) -> SourceSnapshot {
    let Some(board) = payload.as_object() else {
        return SourceSnapshot::default();
    };

    SourceSnapshot {
        arrivals: records(board.get("arrivi"), EventKind::Arrival),
        departures: records(board.get("partenze"), EventKind::Departure),
    }
}

fn records(list: Option<&Value>, kind: EventKind) -> Vec<TrainEvent> {
    list.and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(Value::as_object)
                .map(|raw| to_event(raw, kind))
                .collect()
        })
        .unwrap_or_default()
}

fn to_event(raw: &Map<String, Value>, kind: EventKind) -> TrainEvent {
    let time_keys = match kind {
        EventKind::Arrival => ARRIVAL_TIME_KEYS,
        EventKind::Departure => DEPARTURE_TIME_KEYS,
    };

    TrainEvent {
        numero: text(first_present(raw, NUMBER_KEYS)),
        categoria: text(first_present(raw, CATEGORY_KEYS)),
        orario: extract_time(first_present(raw, time_keys).and_then(Value::as_str)),
        ritardo: delay(first_present(raw, DELAY_KEYS)),
        destinazione: non_blank(first_present(raw, DESTINATION_KEYS)),
        provenienza: non_blank(first_present(raw, ORIGIN_KEYS)),
        binario_reale: non_blank(first_present(raw, PLATFORM_KEYS)),
        kind,
    }
}

/// First value among `keys` that is present and not null.
fn first_present<'a>(raw: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| raw.get(*key))
        .find(|value| !value.is_null())
}

/// Scalar as text; anything else becomes empty.
fn text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => number_text(n),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Whole-valued floats print without a fraction: `12.0` reads as `"12"`.
fn number_text(n: &Number) -> String {
    if n.is_f64()
        && let Some(f) = n.as_f64()
        && f.fract() == 0.0
        && f.abs() < 1e15
    {
        return (f as i64).to_string();
    }
    n.to_string()
}

fn non_blank(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

/// Numbers are kept as whole minutes (fractions floored), strings verbatim.
fn delay(value: Option<&Value>) -> Delay {
    match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.floor() as i64))
            .map_or_else(Delay::default, Delay::Minutes),
        Some(Value::String(s)) => Delay::Text(s.clone()),
        _ => Delay::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UNKNOWN_TIME;
    use serde_json::json;

    #[test]
    fn normalizes_primary_keys() {
        let payload = json!({
            "arrivi": [{
                "numero": "123",
                "categoria": "REG",
                "arrivo": "10:04",
                "ritardo": 3,
                "nomeDestinazione": "Bari",
                "nomeProvenienza": "Barletta",
                "binarioReale": "2"
            }],
            "partenze": [{
                "numero": "124",
                "categoria": "REG",
                "partenza": "10:10:00",
                "ritardo": "5'",
                "nomeDestinazione": "Barletta"
            }]
        });

        let snapshot = normalize_payload(&payload);
        assert_eq!(snapshot.len(), 2);

        let arrival = &snapshot.arrivals[0];
        assert_eq!(arrival.numero, "123");
        assert_eq!(arrival.categoria, "REG");
        assert_eq!(arrival.orario, "10:04");
        assert_eq!(arrival.ritardo, Delay::Minutes(3));
        assert_eq!(arrival.destinazione.as_deref(), Some("Bari"));
        assert_eq!(arrival.provenienza.as_deref(), Some("Barletta"));
        assert_eq!(arrival.binario_reale.as_deref(), Some("2"));
        assert_eq!(arrival.kind, EventKind::Arrival);

        let departure = &snapshot.departures[0];
        assert_eq!(departure.orario, "10:10");
        assert_eq!(departure.ritardo, Delay::Text("5'".into()));
        assert_eq!(departure.provenienza, None);
        assert_eq!(departure.kind, EventKind::Departure);
    }

    #[test]
    fn falls_back_through_alternate_keys() {
        let payload = json!({
            "arrivi": [{
                "numTreno": 456,
                "tipoTreno": "RV",
                "orarioArrivo": "202401151032",
                "ritardoMinuti": 2,
                "destinazione": "Bari",
                "provenienza": "Bitonto"
            }],
            "partenze": [{
                "idTreno": "789",
                "oraPartenza": "7:05",
                "statoRitardo": "In Orario"
            }]
        });

        let snapshot = normalize_payload(&payload);

        let arrival = &snapshot.arrivals[0];
        assert_eq!(arrival.numero, "456");
        assert_eq!(arrival.categoria, "RV");
        assert_eq!(arrival.orario, "10:32");
        assert_eq!(arrival.ritardo, Delay::Minutes(2));
        assert_eq!(arrival.destinazione.as_deref(), Some("Bari"));
        assert_eq!(arrival.provenienza.as_deref(), Some("Bitonto"));

        let departure = &snapshot.departures[0];
        assert_eq!(departure.numero, "789");
        assert_eq!(departure.orario, "07:05");
        assert_eq!(departure.ritardo, Delay::Text("In Orario".into()));
    }

    #[test]
    fn null_values_fall_through() {
        let payload = json!({
            "arrivi": [{ "numero": null, "numTreno": "42", "arrivo": null, "orario": "11:00" }]
        });

        let arrival = &normalize_payload(&payload).arrivals[0];
        assert_eq!(arrival.numero, "42");
        assert_eq!(arrival.orario, "11:00");
    }

    #[test]
    fn present_but_unusable_value_does_not_fall_through() {
        // A blank destination stops the chain and degrades to absent
        let payload = json!({
            "arrivi": [{ "nomeDestinazione": "  ", "destinazione": "Bari", "arrivo": 1032 }]
        });

        let arrival = &normalize_payload(&payload).arrivals[0];
        assert_eq!(arrival.destinazione, None);
        assert_eq!(arrival.orario, UNKNOWN_TIME);
    }

    #[test]
    fn missing_fields_get_safe_defaults() {
        let payload = json!({ "arrivi": [{}], "partenze": [{ "numero": { "nested": true } }] });

        let snapshot = normalize_payload(&payload);
        let arrival = &snapshot.arrivals[0];
        assert_eq!(arrival.numero, "");
        assert_eq!(arrival.categoria, "");
        assert_eq!(arrival.orario, UNKNOWN_TIME);
        assert_eq!(arrival.ritardo, Delay::Minutes(0));
        assert_eq!(arrival.destinazione, None);

        assert_eq!(snapshot.departures[0].numero, "");
    }

    #[test]
    fn numeric_train_numbers_print_like_integers() {
        let payload = json!({
            "arrivi": [
                { "numero": 12.0 },
                { "numero": 12.5 },
                { "numero": 345 },
                { "numero": -0.0 }
            ]
        });

        let numbers: Vec<_> = normalize_payload(&payload)
            .arrivals
            .into_iter()
            .map(|e| e.numero)
            .collect();
        assert_eq!(numbers, vec!["12", "12.5", "345", "0"]);
    }

    #[test]
    fn fractional_delay_is_floored() {
        let payload = json!({ "arrivi": [{ "ritardo": 4.7 }] });
        assert_eq!(normalize_payload(&payload).arrivals[0].ritardo, Delay::Minutes(4));
    }

    #[test]
    fn skips_non_object_entries() {
        let payload = json!({ "arrivi": [1, "x", null, [], { "numero": "1" }], "partenze": [] });

        let snapshot = normalize_payload(&payload);
        assert_eq!(snapshot.arrivals.len(), 1);
        assert_eq!(snapshot.arrivals[0].numero, "1");
    }

    #[test]
    fn malformed_top_level_yields_empty_lists() {
        for payload in [json!(null), json!([]), json!("board"), json!(42)] {
            assert!(normalize_payload(&payload).is_empty());
        }
    }

    #[test]
    fn non_array_lists_yield_empty() {
        let payload = json!({ "arrivi": { "numero": "1" }, "partenze": "none" });
        assert!(normalize_payload(&payload).is_empty());
    }

    #[test]
    fn serializes_with_feed_list_names() {
        let payload = json!({ "arrivi": [{ "numero": "1", "arrivo": "10:00" }] });
        let json = serde_json::to_value(normalize_payload(&payload)).unwrap();

        assert_eq!(json["arrivi"][0]["numero"], "1");
        assert_eq!(json["arrivi"][0]["type"], "arrival");
        assert!(json["partenze"].as_array().unwrap().is_empty());
    }
}
