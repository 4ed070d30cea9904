//! Prescription service.
//!
//! The one workflow both front-ends share: validate the request, resolve the patient, read the
//! history log as context, render the prompt, call the text generator once, reconcile the
//! caller's override and record the outcome.

use crate::{
    directory::PatientDirectory,
    generator::TextGenerator,
    history::{format_entry, HistoryLog},
    prompt,
    validation::{optional_text, require_prescription_fields},
    PrescriptionError, PrescriptionResult,
};
use api_shared::{GeneratePrescriptionReq, GeneratePrescriptionRes, Patient};
use std::sync::Arc;

/// Patient lookups, history and prescription generation - no API concerns.
#[derive(Clone)]
pub struct PrescriptionService {
    directory: Arc<PatientDirectory>,
    history: HistoryLog,
    generator: Arc<dyn TextGenerator>,
}

impl PrescriptionService {
    pub fn new(
        directory: Arc<PatientDirectory>,
        history: HistoryLog,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        Self {
            directory,
            history,
            generator,
        }
    }

    pub fn list_patients(&self) -> Vec<Patient> {
        self.directory.all().to_vec()
    }

    /// # Errors
    ///
    /// Returns `PrescriptionError::PatientNotFound` if no patient has exactly this id.
    pub fn get_patient(&self, id: &str) -> PrescriptionResult<Patient> {
        self.directory
            .get(id)
            .cloned()
            .ok_or_else(|| PrescriptionError::PatientNotFound(id.to_owned()))
    }

    /// Full history log text, empty when nothing has been recorded.
    pub fn history(&self) -> String {
        self.history.read_all()
    }

    /// Generates a prescription for a patient and records it in the history log.
    ///
    /// The returned `prescription` is the caller's `final_prescription` when one is given,
    /// otherwise the generated text. `generated` always holds the trimmed model output.
    ///
    /// # Errors
    ///
    /// Returns a `PrescriptionError` if:
    /// - `patient_id` or `symptoms` is blank (`InvalidInput`),
    /// - the patient is unknown (`PatientNotFound`),
    /// - the text generator fails (`Generation`),
    /// - the history log cannot be appended to (`HistoryAppend`, carrying the computed result).
    ///
    /// The first two are detected before the generator is called or the log is touched.
    pub async fn generate(
        &self,
        req: GeneratePrescriptionReq,
    ) -> PrescriptionResult<GeneratePrescriptionRes> {
        let (_, symptoms) = require_prescription_fields(&req.patient_id, &req.symptoms)?;
        // Blank ids are rejected above; lookup stays exact on the id as sent.
        let patient = self.get_patient(&req.patient_id)?;

        let past_history = self.history.read_all();
        let prompt = prompt::render(&patient, &symptoms, &past_history);

        tracing::info!("generating prescription for patient {}", patient.id);
        let generated = match self.generator.generate(&prompt).await {
            Ok(text) => text.trim().to_owned(),
            Err(e) => {
                tracing::error!("generation failed for patient {}: {}", patient.id, e);
                return Err(e.into());
            }
        };

        let prescription = optional_text(req.final_prescription.as_deref())
            .map(str::to_owned)
            .unwrap_or_else(|| generated.clone());

        let outcome = GeneratePrescriptionRes {
            generated,
            prescription,
            patient,
        };

        let entry = format_entry(&outcome.patient.id, &symptoms, &outcome.prescription);
        if let Err(source) = self.history.append(&entry) {
            tracing::error!(
                "failed to append to history log {}: {}; unrecorded prescription for {}: {}",
                self.history.path().display(),
                source,
                outcome.patient.id,
                outcome.prescription
            );
            return Err(PrescriptionError::HistoryAppend {
                source,
                outcome: Box::new(outcome),
            });
        }

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::GenerationError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Returns a fixed reply and remembers every prompt it was given.
    #[derive(Default)]
    struct StubGenerator {
        reply: String,
        fail: bool,
        calls: AtomicUsize,
        prompts: Mutex<Vec<String>>,
    }

    impl StubGenerator {
        fn replying(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: reply.into(),
                ..Default::default()
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                fail: true,
                ..Default::default()
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TextGenerator for StubGenerator {
        async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(prompt.to_owned());
            if self.fail {
                Err(GenerationError::EmptyResponse)
            } else {
                Ok(self.reply.clone())
            }
        }
    }

    fn p1() -> Patient {
        Patient {
            id: "p1".into(),
            name: None,
            age: 40,
            diagnosis: "flu".into(),
            history: vec!["penicillin allergy".into()],
        }
    }

    fn service(temp_dir: &TempDir, generator: Arc<StubGenerator>) -> PrescriptionService {
        PrescriptionService::new(
            Arc::new(PatientDirectory::from_patients(vec![p1()])),
            HistoryLog::new(temp_dir.path().join("history.txt")),
            generator,
        )
    }

    fn request(
        patient_id: &str,
        symptoms: &str,
        final_prescription: Option<&str>,
    ) -> GeneratePrescriptionReq {
        GeneratePrescriptionReq {
            patient_id: patient_id.into(),
            symptoms: symptoms.into(),
            final_prescription: final_prescription.map(str::to_owned),
        }
    }

    #[tokio::test]
    async fn test_generate_without_override_records_generated_text() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let generator = StubGenerator::replying("  Take paracetamol.\n");
        let service = service(&temp_dir, generator.clone());

        let res = service
            .generate(request("p1", "fever", None))
            .await
            .expect("generate should succeed");

        assert_eq!(res.generated, "Take paracetamol.");
        assert_eq!(res.prescription, "Take paracetamol.");
        assert_eq!(res.patient, p1());
        assert_eq!(generator.calls(), 1);
        assert_eq!(
            service.history(),
            "Patient: p1 | Symptoms: fever | Prescription: Take paracetamol.\n"
        );
    }

    #[tokio::test]
    async fn test_override_replaces_prescription_but_not_generated() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let service = service(&temp_dir, StubGenerator::replying("Take paracetamol."));

        let res = service
            .generate(request("p1", "fever", Some("Custom plan")))
            .await
            .expect("generate should succeed");

        assert_eq!(res.generated, "Take paracetamol.");
        assert_eq!(res.prescription, "Custom plan");
        assert_eq!(
            service.history(),
            "Patient: p1 | Symptoms: fever | Prescription: Custom plan\n"
        );
    }

    #[tokio::test]
    async fn test_override_is_returned_and_logged_verbatim() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let service = service(&temp_dir, StubGenerator::replying("Take paracetamol."));

        let res = service
            .generate(request("p1", "fever", Some("  Custom plan  ")))
            .await
            .expect("generate should succeed");

        assert_eq!(res.prescription, "  Custom plan  ");
        assert_eq!(res.generated, "Take paracetamol.");
        assert_eq!(
            service.history(),
            "Patient: p1 | Symptoms: fever | Prescription:   Custom plan  \n"
        );
    }

    #[tokio::test]
    async fn test_padded_patient_id_is_not_found() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let generator = StubGenerator::replying("Take paracetamol.");
        let service = service(&temp_dir, generator.clone());

        let err = service
            .generate(request(" p1 ", "fever", None))
            .await
            .unwrap_err();

        assert!(matches!(err, PrescriptionError::PatientNotFound(_)));
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn test_blank_override_falls_back_to_generated() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let service = service(&temp_dir, StubGenerator::replying("Take paracetamol."));

        let res = service
            .generate(request("p1", "fever", Some("   ")))
            .await
            .unwrap();

        assert_eq!(res.prescription, res.generated);
    }

    #[tokio::test]
    async fn test_unknown_patient_skips_generation_and_log() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let generator = StubGenerator::replying("Take paracetamol.");
        let service = service(&temp_dir, generator.clone());

        let err = service
            .generate(request("unknown", "fever", None))
            .await
            .unwrap_err();

        assert!(matches!(err, PrescriptionError::PatientNotFound(ref id) if id == "unknown"));
        assert_eq!(generator.calls(), 0);
        assert!(!temp_dir.path().join("history.txt").exists());
    }

    #[tokio::test]
    async fn test_missing_fields_fail_validation_first() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let generator = StubGenerator::replying("Take paracetamol.");
        let service = service(&temp_dir, generator.clone());

        for req in [
            request("", "fever", None),
            request("p1", "", None),
            request("  ", " ", Some("Custom plan")),
            // Validation runs before lookup, so an unknown id still reports the missing field.
            request("unknown", "", None),
        ] {
            let err = service.generate(req).await.unwrap_err();
            assert!(matches!(err, PrescriptionError::InvalidInput(_)));
        }

        assert_eq!(generator.calls(), 0);
        assert_eq!(service.history(), "");
    }

    #[tokio::test]
    async fn test_generation_failure_leaves_log_untouched() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let service = service(&temp_dir, StubGenerator::failing());

        let err = service
            .generate(request("p1", "fever", None))
            .await
            .unwrap_err();

        assert!(matches!(err, PrescriptionError::Generation(_)));
        assert!(err.to_string().starts_with("text generation service failed"));
        assert_eq!(service.history(), "");
    }

    #[tokio::test]
    async fn test_history_accumulates_in_call_order_and_feeds_prompts() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let generator = StubGenerator::replying("Rest.");
        let service = service(&temp_dir, generator.clone());

        for symptoms in ["fever", "cough", "headache"] {
            service.generate(request("p1", symptoms, None)).await.unwrap();
        }

        let history = service.history();
        let lines: Vec<&str> = history.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Patient: p1 | Symptoms: fever | Prescription: Rest.",
                "Patient: p1 | Symptoms: cough | Prescription: Rest.",
                "Patient: p1 | Symptoms: headache | Prescription: Rest.",
            ]
        );

        let prompts = generator.prompts.lock().unwrap();
        assert!(!prompts[0].contains("Past data"));
        assert!(prompts[1].contains("Past data:\nPatient: p1 | Symptoms: fever"));
        assert!(prompts[2].contains("Symptoms: cough"));
    }

    #[tokio::test]
    async fn test_append_failure_carries_computed_result() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let service = PrescriptionService::new(
            Arc::new(PatientDirectory::from_patients(vec![p1()])),
            HistoryLog::new(temp_dir.path().join("missing-dir").join("history.txt")),
            StubGenerator::replying("Take paracetamol."),
        );

        let err = service
            .generate(request("p1", "fever", Some("Custom plan")))
            .await
            .unwrap_err();

        match err {
            PrescriptionError::HistoryAppend { outcome, .. } => {
                assert_eq!(outcome.generated, "Take paracetamol.");
                assert_eq!(outcome.prescription, "Custom plan");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_get_patient_and_list() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let service = service(&temp_dir, StubGenerator::replying(""));

        assert_eq!(service.list_patients(), vec![p1()]);
        assert_eq!(service.get_patient("p1").unwrap(), p1());
        assert!(matches!(
            service.get_patient("P1"),
            Err(PrescriptionError::PatientNotFound(_))
        ));
    }
}
