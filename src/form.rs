//! Form logic for the interactive questionnaire
//!
//! The renderable half of the form lives in the CLI; everything that has
//! behavior worth testing lives here: the user-name gate, the per-feature
//! prompt shape, answer parsing, and the display annotation shown under
//! each answer.

use thiserror::Error;

use crate::binner;
use crate::error::PredictError;
use crate::schema::{Domain, FeatureDescriptor};

/// Choice labels for the sole binary feature, index = stored value
pub const BINARY_CHOICES: [&str; 2] = ["Tidak punya", "Punya"];

/// How a feature is asked
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptKind {
    /// Bounded integer selector
    Slider { min: i64, max: i64 },
    /// Two-way choice; the stored value is the chosen index
    Choice { labels: [&'static str; 2] },
}

/// Prompt shape for a descriptor
pub fn prompt_kind(descriptor: &FeatureDescriptor) -> PromptKind {
    match descriptor.domain {
        Domain::Binary => PromptKind::Choice {
            labels: BINARY_CHOICES,
        },
        Domain::Range { min, max } => PromptKind::Slider { min, max },
    }
}

/// A rejected answer, with enough context to re-prompt
#[derive(Debug, Error)]
pub enum AnswerError {
    #[error("'{0}' is not a number")]
    NotANumber(String),

    #[error("{value} is outside [{min}, {max}]")]
    OutOfRange { value: i64, min: i64, max: i64 },
}

/// Parse one raw answer against the feature's domain
pub fn parse_answer(descriptor: &FeatureDescriptor, input: &str) -> Result<i64, AnswerError> {
    let trimmed = input.trim();
    let value: i64 = trimmed
        .parse()
        .map_err(|_| AnswerError::NotANumber(trimmed.to_string()))?;

    if !descriptor.domain.contains(value) {
        let (min, max) = descriptor.domain.bounds();
        return Err(AnswerError::OutOfRange { value, min, max });
    }
    Ok(value)
}

/// Gate on the user name: trimmed, non-empty. Nothing downstream runs
/// without it.
pub fn validate_user_name(name: &str) -> Result<&str, PredictError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(PredictError::MissingUserName);
    }
    Ok(trimmed)
}

/// Display annotation for an accepted answer: the bin label for ranged
/// features, the chosen label for the binary one. Presentation only.
pub fn annotation(descriptor: &FeatureDescriptor, value: i64) -> Option<String> {
    match (&descriptor.domain, &descriptor.bin_labels) {
        (Domain::Binary, _) => {
            let idx = value.clamp(0, 1) as usize;
            Some(BINARY_CHOICES[idx].to_string())
        }
        (Domain::Range { min, max }, Some(labels)) => {
            Some(binner::bin_label(value, *min, *max, labels).to_string())
        }
        (Domain::Range { .. }, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::{Classifier, ModelArtifact};
    use crate::pipeline::StressPredictor;
    use crate::present::{LevelColor, StressLevel};
    use crate::schema::FeatureSchema;
    use crate::sink::{log_outcome, OutcomeRecord, OutcomeSink};
    use crate::SinkError;
    use std::sync::Mutex;

    #[test]
    fn empty_and_whitespace_names_are_blocked() {
        assert!(matches!(
            validate_user_name(""),
            Err(PredictError::MissingUserName)
        ));
        assert!(matches!(
            validate_user_name("   \t"),
            Err(PredictError::MissingUserName)
        ));
        assert_eq!(validate_user_name("  Jackbar ").unwrap(), "Jackbar");
    }

    #[test]
    fn binary_feature_renders_as_a_choice_not_a_slider() {
        let schema = FeatureSchema::canonical();
        let mhh = schema
            .describe()
            .iter()
            .find(|f| f.name == "mental_health_history")
            .unwrap();

        assert_eq!(
            prompt_kind(mhh),
            PromptKind::Choice {
                labels: ["Tidak punya", "Punya"]
            }
        );
        // submitting 1 reads back as "Punya"
        assert_eq!(annotation(mhh, 1).as_deref(), Some("Punya"));
        assert_eq!(annotation(mhh, 0).as_deref(), Some("Tidak punya"));
    }

    #[test]
    fn ranged_features_render_as_sliders_with_bin_annotations() {
        let schema = FeatureSchema::canonical();
        let self_esteem = &schema.describe()[0];

        assert_eq!(
            prompt_kind(self_esteem),
            PromptKind::Slider { min: 0, max: 30 }
        );
        assert_eq!(
            annotation(self_esteem, 0).as_deref(),
            Some("Nggak percaya diri")
        );
        assert_eq!(
            annotation(self_esteem, 30).as_deref(),
            Some("Sangat percaya diri")
        );
    }

    #[test]
    fn answers_are_parsed_against_the_domain() {
        let schema = FeatureSchema::canonical();
        let blood_pressure = schema
            .describe()
            .iter()
            .find(|f| f.name == "blood_pressure")
            .unwrap();

        assert_eq!(parse_answer(blood_pressure, " 2 ").unwrap(), 2);
        assert!(matches!(
            parse_answer(blood_pressure, "0"),
            Err(AnswerError::OutOfRange { min: 1, max: 3, .. })
        ));
        assert!(matches!(
            parse_answer(blood_pressure, "dua"),
            Err(AnswerError::NotANumber(_))
        ));
    }

    // End-to-end flow doubles

    struct MemorySink {
        rows: Mutex<Vec<[String; 2]>>,
        fail: bool,
    }

    impl MemorySink {
        fn new(fail: bool) -> Self {
            Self {
                rows: Mutex::new(Vec::new()),
                fail,
            }
        }
    }

    impl OutcomeSink for MemorySink {
        fn append(&self, record: &OutcomeRecord) -> Result<(), SinkError> {
            if self.fail {
                return Err(SinkError::Transport("simulated network error".to_string()));
            }
            self.rows.lock().unwrap().push(record.row());
            Ok(())
        }
    }

    struct FixedClass(usize);

    impl Classifier for FixedClass {
        fn scores(&self, _normalized: &[f64]) -> Result<Vec<f64>, PredictError> {
            let mut scores = vec![0.0; 3];
            scores[self.0] = 1.0;
            Ok(scores)
        }

        fn width(&self) -> usize {
            19
        }
    }

    #[test]
    fn full_flow_renders_ringan_and_logs_the_outcome() {
        let schema = FeatureSchema::canonical();
        let width = schema.len();
        let predictor =
            StressPredictor::new(schema, ModelArtifact::identity(width)).unwrap();
        let sink = MemorySink::new(false);

        let name = validate_user_name("Jackbar").unwrap();
        // blood_pressure's domain starts at 1, every other answer at 0
        let answers: Vec<i64> = predictor
            .schema()
            .describe()
            .iter()
            .map(|f| f.domain.bounds().0)
            .collect();

        let level = predictor.predict_with(&FixedClass(0), &answers).unwrap();
        assert_eq!(level, StressLevel::Ringan);
        assert_eq!(level.presentation().color, LevelColor::Green);

        let record = OutcomeRecord::new(name, level);
        assert!(log_outcome(&sink, &record));
        assert_eq!(
            sink.rows.lock().unwrap().as_slice(),
            &[["Jackbar".to_string(), "Ringan".to_string()]]
        );
    }

    #[test]
    fn sink_failure_does_not_disturb_the_rendered_result() {
        let schema = FeatureSchema::canonical();
        let width = schema.len();
        let predictor =
            StressPredictor::new(schema, ModelArtifact::identity(width)).unwrap();
        let sink = MemorySink::new(true);

        let answers: Vec<i64> = predictor
            .schema()
            .describe()
            .iter()
            .map(|f| f.domain.bounds().1)
            .collect();
        let level = predictor.predict_with(&FixedClass(2), &answers).unwrap();

        // presentation is already composed before the sink fires
        let presentation = level.presentation();
        assert_eq!(presentation.label, "Berat");
        assert_eq!(presentation.color, LevelColor::Red);
        assert_eq!(presentation.emoji, "😫");

        let record = OutcomeRecord::new("Jackbar", level);
        assert!(!log_outcome(&sink, &record));
        assert!(sink.rows.lock().unwrap().is_empty());
    }

    #[test]
    fn missing_name_blocks_before_any_sink_call() {
        let sink = MemorySink::new(false);

        let gate = validate_user_name("   ");
        assert!(gate.is_err());
        // the flow never constructs a record, so the sink sees nothing
        assert!(sink.rows.lock().unwrap().is_empty());
    }
}
