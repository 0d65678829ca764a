//! Train movement records.
//!
//! Field names follow the realtime feed (`numero`, `orario`, `ritardo`, ...)
//! so that the records serialize to the same shape the front end and the raw
//! debug output expect.

use serde::{Deserialize, Serialize};

/// Sentinel stored in [`TrainEvent::orario`] when the source time could not be
/// read. Kept in raw output, never a classifier candidate.
pub const UNKNOWN_TIME: &str = "ND";

/// Whether a movement is an arrival at or a departure from the station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Arrival,
    Departure,
}

/// Delay as reported by the feed.
///
/// Sources send either a number of minutes or free text such as `"10'"` or
/// `"In Orario"`. The raw form is preserved; interpretation happens in
/// [`parse_delay_minutes`](super::parse_delay_minutes).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Delay {
    Minutes(i64),
    Text(String),
}

impl Default for Delay {
    fn default() -> Self {
        Delay::Minutes(0)
    }
}

/// A single arrival or departure at a station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainEvent {
    /// Train number (may be empty when the source omits it)
    pub numero: String,

    /// Train category, e.g. "REG"
    pub categoria: String,

    /// Scheduled time as `HH:mm`, or [`UNKNOWN_TIME`]
    pub orario: String,

    /// Reported delay
    pub ritardo: Delay,

    /// Destination name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destinazione: Option<String>,

    /// Origin name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provenienza: Option<String>,

    /// Actual platform
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binario_reale: Option<String>,

    #[serde(rename = "type")]
    pub kind: EventKind,
}

impl TrainEvent {
    /// Create an event with the required fields and no optional text.
    pub fn new(kind: EventKind, numero: impl Into<String>, orario: impl Into<String>) -> Self {
        Self {
            numero: numero.into(),
            categoria: String::new(),
            orario: orario.into(),
            ritardo: Delay::default(),
            destinazione: None,
            provenienza: None,
            binario_reale: None,
            kind,
        }
    }

    /// Whether the source time was unreadable.
    pub fn has_unknown_time(&self) -> bool {
        self.orario == UNKNOWN_TIME
    }

    /// Human-facing label: origin if known, otherwise direction.
    pub fn label(&self) -> String {
        match &self.provenienza {
            Some(origin) => format!("Treno da {origin}"),
            None => format!(
                "Direzione {}",
                self.destinazione.as_deref().unwrap_or("sconosciuta")
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_feed_field_names() {
        let mut event = TrainEvent::new(EventKind::Arrival, "123", "10:04");
        event.categoria = "REG".into();
        event.binario_reale = Some("2".into());

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["numero"], "123");
        assert_eq!(json["orario"], "10:04");
        assert_eq!(json["ritardo"], 0);
        assert_eq!(json["binarioReale"], "2");
        assert_eq!(json["type"], "arrival");
        assert!(json.get("destinazione").is_none());
    }

    #[test]
    fn delay_keeps_source_encoding() {
        let text: Delay = serde_json::from_str("\"10'\"").unwrap();
        assert_eq!(text, Delay::Text("10'".into()));

        let minutes: Delay = serde_json::from_str("7").unwrap();
        assert_eq!(minutes, Delay::Minutes(7));
        assert_eq!(serde_json::to_string(&minutes).unwrap(), "7");
    }

    #[test]
    fn label_prefers_origin() {
        let mut event = TrainEvent::new(EventKind::Arrival, "132", "10:04");
        event.destinazione = Some("Bari".into());
        event.provenienza = Some("Bitonto".into());
        assert_eq!(event.label(), "Treno da Bitonto");
    }

    #[test]
    fn label_falls_back_to_direction() {
        let mut event = TrainEvent::new(EventKind::Departure, "131", "10:30");
        event.destinazione = Some("Bari".into());
        assert_eq!(event.label(), "Direzione Bari");

        event.destinazione = None;
        assert_eq!(event.label(), "Direzione sconosciuta");
    }

    #[test]
    fn unknown_time_sentinel() {
        assert!(TrainEvent::new(EventKind::Arrival, "1", UNKNOWN_TIME).has_unknown_time());
        assert!(!TrainEvent::new(EventKind::Arrival, "1", "10:00").has_unknown_time());
    }
}
