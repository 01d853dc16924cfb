//! Execution records and textual rendering of stages.

use crate::core::StageStatus;
use crate::stages::Stage;
use crate::utils::{iso_format, Timestamp};
use serde::Serialize;
use std::fmt::Write as _;

/// What happened to one stage during a run.
#[derive(Debug, Clone, Serialize)]
pub struct StageRecord {
    /// Position in the stage list.
    pub position: usize,
    /// The stage's identifier.
    pub id: String,
    /// The stage's label, e.g. `total = add(a, b)`.
    pub stage: String,
    /// Outcome.
    pub status: StageStatus,
    /// When the stage started.
    #[serde(serialize_with = "serialize_timestamp")]
    pub started_at: Timestamp,
    /// Wall time spent in the stage.
    pub duration_ms: f64,
    /// Error message for a failed stage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StageRecord {
    /// Returns true if the stage succeeded.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == StageStatus::Ok
    }

    /// Converts the record to a JSON value.
    #[must_use]
    pub fn to_dict(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

fn serialize_timestamp<S: serde::Serializer>(
    ts: &Timestamp,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&iso_format(ts))
}

/// Renders one stage as a card:
///
/// ```text
/// Stage #0, id: #1f2e3d4c
/// attribute: total
/// method: add
/// arguments:
/// - a: 2
/// ```
#[must_use]
pub fn render_card(position: usize, id: &str, stage: &Stage) -> String {
    let mut card = format!("Stage #{position}, id: #{id}");
    if let Some(attribute) = stage.attribute_name() {
        let _ = write!(card, "\nattribute: {attribute}");
    }
    if let Some(method) = stage.method_name() {
        let _ = write!(card, "\nmethod: {method}");
    }
    if let Some(type_ref) = stage.type_reference() {
        let _ = write!(card, "\nclass: {}", type_ref.name());
    }
    if !stage.arguments().is_empty() {
        card.push_str("\narguments:");
        for (name, value) in stage.arguments().iter() {
            let _ = write!(card, "\n- {name}: {value}");
        }
    }
    card
}

/// Renders cards for a list of stages, joined by arrows.
#[must_use]
pub fn render_cards<'a>(stages: impl IntoIterator<Item = (&'a str, &'a Stage)>) -> String {
    stages
        .into_iter()
        .enumerate()
        .map(|(position, (id, stage))| render_card(position, id, stage))
        .collect::<Vec<_>>()
        .join("\n->\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Arguments;
    use crate::testing::sample_class;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_card() {
        let stage = Stage::call("add")
            .store_as("total")
            .with_arguments(Arguments::new().with("a", 2).with("b", 3));

        assert_eq!(
            render_card(0, "0000beef", &stage),
            "Stage #0, id: #0000beef\nattribute: total\nmethod: add\narguments:\n- a: 2\n- b: 3"
        );
    }

    #[test]
    fn test_render_cards_joined() {
        let first = Stage::call("greet");
        let second = Stage::construct(sample_class()).store_as("object");

        let rendered = render_cards([("00000001", &first), ("00000002", &second)]);
        assert_eq!(
            rendered,
            "Stage #0, id: #00000001\nmethod: greet\n->\n\
             Stage #1, id: #00000002\nattribute: object\nclass: SampleClass"
        );
    }

    #[test]
    fn test_record_to_dict() {
        let record = StageRecord {
            position: 1,
            id: "abcdef01".to_string(),
            stage: "greet()".to_string(),
            status: StageStatus::Fail,
            started_at: crate::utils::now_utc(),
            duration_ms: 0.5,
            error: Some("boom".to_string()),
        };

        let dict = record.to_dict();
        assert_eq!(dict["status"], "fail");
        assert_eq!(dict["error"], "boom");
        assert!(!record.is_ok());
    }
}
