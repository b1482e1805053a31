use chrono::{DateTime, Local};
use serde_json::Value;

use crate::error::SubmitError;
use crate::models::{Acknowledgment, HealthDataPayload};
use crate::schema::{self, Violation, HEALTH_SUBMISSION};
use crate::sink::LogSink;

const SEPARATOR_WIDTH: usize = 50;

/// Validates one raw submission, records it in `sink` and acknowledges it.
pub fn submit_health_data(sink: &dyn LogSink, raw: &[u8]) -> Result<Acknowledgment, SubmitError> {
    let payload = parse_submission(raw)?;

    match record_receipt(sink, &payload, Local::now()) {
        Ok(()) => {
            tracing::info!(pet = %payload.pet_info.name, "health data received");
            Ok(Acknowledgment::received(payload.pet_info.name))
        }
        Err(message) => {
            tracing::error!(error = %message, "health data processing failed");
            let _ = sink.append(&format!("!! server error: {message}"));
            Err(SubmitError::Internal(message))
        }
    }
}

/// Parses and schema-checks a raw body. All violations are reported together.
pub fn parse_submission(raw: &[u8]) -> Result<HealthDataPayload, SubmitError> {
    if raw.iter().all(u8::is_ascii_whitespace) {
        return Err(SubmitError::Validation(vec![Violation::empty_body()]));
    }

    let mut document: Value = serde_json::from_slice(raw)
        .map_err(|err| SubmitError::Validation(vec![Violation::invalid_json(&err, raw)]))?;

    let violations = schema::validate(&HEALTH_SUBMISSION, &document);
    if !violations.is_empty() {
        let fields: Vec<String> = violations.iter().map(Violation::field_path).collect();
        tracing::warn!(violations = violations.len(), ?fields, "health data rejected");
        return Err(SubmitError::Validation(violations));
    }

    schema::normalize_integers(&HEALTH_SUBMISSION, &mut document);
    serde_json::from_value(document)
        .map_err(|err| SubmitError::Internal(format!("decode accepted submission: {err}")))
}

fn record_receipt(
    sink: &dyn LogSink,
    payload: &HealthDataPayload,
    received_at: DateTime<Local>,
) -> Result<(), String> {
    let receipt = render_receipt(payload, received_at).map_err(|err| err.to_string())?;
    sink.append(&receipt).map_err(|err| err.to_string())
}

/// Human-readable receipt: header, separator, pretty JSON, separator.
pub fn render_receipt(
    payload: &HealthDataPayload,
    received_at: DateTime<Local>,
) -> Result<String, serde_json::Error> {
    let body = serde_json::to_string_pretty(payload)?;
    let separator = "=".repeat(SEPARATOR_WIDTH);
    Ok(format!(
        "[receipt - {}] health data received\n{separator}\n{body}\n{separator}",
        received_at.format("%Y-%m-%d %H:%M:%S%.6f"),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::LocSegment;
    use crate::sink::testing::{FailingSink, MemorySink};
    use serde_json::json;

    const SAMPLE: &str = r#"{"pet_info":{"name":"복실이","type":"DOG","birth":"2025-08-13","breed":"Maltipoo","gender":"MALE"},"analysis":{"result":"WARNING","abnormal_probability":68,"mmvd_stage":"B1"},"vitals":{"bpm":72,"weight":1.0,"bcs":3,"respiration_rate":20}}"#;

    fn with_survey(survey: Value) -> Vec<u8> {
        let mut body: Value = serde_json::from_str(SAMPLE).unwrap();
        body["survey"] = survey;
        serde_json::to_vec(&body).unwrap()
    }

    fn violations(result: Result<Acknowledgment, SubmitError>) -> Vec<Violation> {
        match result {
            Err(SubmitError::Validation(violations)) => violations,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn acknowledges_sample_submission() {
        let sink = MemorySink::default();
        let ack = submit_health_data(&sink, SAMPLE.as_bytes()).unwrap();

        assert_eq!(
            serde_json::to_value(&ack).unwrap(),
            json!({
                "status": "success",
                "message": "Data received successfully",
                "received_pet": "복실이"
            })
        );
        assert_eq!(sink.lines().len(), 1);
    }

    #[test]
    fn survey_is_optional_and_partial() {
        let sink = MemorySink::default();
        let full = with_survey(json!({ "vitality": 3, "appetite": 4, "cough": 1 }));
        let partial = with_survey(json!({ "vitality": 3 }));

        for body in [SAMPLE.as_bytes().to_vec(), full, partial] {
            let ack = submit_health_data(&sink, &body).unwrap();
            assert_eq!(ack.received_pet, "복실이");
        }
        assert_eq!(sink.lines().len(), 3);
    }

    #[test]
    fn rejects_missing_bpm() {
        let mut body: Value = serde_json::from_str(SAMPLE).unwrap();
        body["vitals"].as_object_mut().unwrap().remove("bpm");
        let sink = MemorySink::default();

        let found = violations(submit_health_data(&sink, &serde_json::to_vec(&body).unwrap()));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].field_path(), "vitals.bpm");
        assert_eq!(found[0].kind, "missing");
        assert!(sink.lines().is_empty());
    }

    #[test]
    fn rejects_text_probability() {
        let body = SAMPLE.replace("\"abnormal_probability\":68", "\"abnormal_probability\":\"68%\"");
        let found = violations(submit_health_data(&MemorySink::default(), body.as_bytes()));
        assert_eq!(found[0].field_path(), "analysis.abnormal_probability");
        assert_eq!(found[0].kind, "int_type");
    }

    #[test]
    fn accepts_whole_number_floats_for_integer_fields() {
        let body = SAMPLE.replace("\"bpm\":72", "\"bpm\":72.0");
        let sink = MemorySink::default();

        let ack = submit_health_data(&sink, body.as_bytes()).unwrap();
        assert_eq!(ack.received_pet, "복실이");
        assert!(sink.lines()[0].contains("\"bpm\": 72,"));

        let body = SAMPLE.replace("\"bpm\":72", "\"bpm\":72.5");
        let found = violations(submit_health_data(&sink, body.as_bytes()));
        assert_eq!(found[0].field_path(), "vitals.bpm");
        assert_eq!(found[0].kind, "int_type");
    }

    #[test]
    fn rejects_malformed_and_empty_bodies() {
        let sink = MemorySink::default();

        let found = violations(submit_health_data(&sink, b"{\"pet_info\":"));
        assert_eq!(found[0].kind, "json_invalid");
        assert_eq!(found[0].loc[0], "body");
        assert!(matches!(found[0].loc[1], LocSegment::Offset(_)));
        assert!(found[0].ctx.is_some());

        let found = violations(submit_health_data(&sink, b"  \n"));
        assert_eq!(found[0].kind, "missing");
        assert_eq!(found[0].loc, vec!["body"]);
    }

    #[test]
    fn sequential_submissions_do_not_share_state() {
        let sink = MemorySink::default();
        let second = SAMPLE.replace("복실이", "나비");

        let first = submit_health_data(&sink, SAMPLE.as_bytes()).unwrap();
        let second = submit_health_data(&sink, second.as_bytes()).unwrap();

        assert_eq!(first.received_pet, "복실이");
        assert_eq!(second.received_pet, "나비");
    }

    #[test]
    fn sink_failure_is_internal_error() {
        match submit_health_data(&FailingSink, SAMPLE.as_bytes()) {
            Err(SubmitError::Internal(message)) => {
                assert_eq!(message, "log sink unavailable: disk full");
            }
            other => panic!("expected internal error, got {other:?}"),
        }
    }

    #[test]
    fn receipt_keeps_declared_field_order() {
        let payload = parse_submission(SAMPLE.as_bytes()).unwrap();
        let receipt = render_receipt(&payload, Local::now()).unwrap();
        let lines: Vec<&str> = receipt.lines().collect();

        assert!(lines[0].starts_with("[receipt - "));
        assert_eq!(lines[1], "=".repeat(SEPARATOR_WIDTH));
        assert_eq!(lines.last().copied(), Some(lines[1]));

        let order = ["\"pet_info\"", "\"analysis\"", "\"vitals\"", "\"survey\": null"];
        let positions: Vec<usize> = order
            .iter()
            .map(|key| receipt.find(key).expect("key rendered"))
            .collect();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(receipt.contains("\"weight\": 1.0"));
    }
}
