use async_trait::async_trait;
use rxpad_core::{
    GenerationError, HistoryLog, Patient, PatientDirectory, PrescriptionService, TextGenerator,
};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub(crate) struct CannedGenerator {
    pub(crate) reply: &'static str,
    pub(crate) calls: AtomicUsize,
}

impl CannedGenerator {
    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for CannedGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.reply.to_owned())
    }
}

pub(crate) fn p1() -> Patient {
    Patient {
        id: "p1".into(),
        name: None,
        age: 40,
        diagnosis: "flu".into(),
        history: vec!["penicillin allergy".into()],
    }
}

pub(crate) fn prescriptions(
    history_path: &Path,
    reply: &'static str,
) -> (PrescriptionService, Arc<CannedGenerator>) {
    let generator = Arc::new(CannedGenerator {
        reply,
        calls: AtomicUsize::new(0),
    });
    let service = PrescriptionService::new(
        Arc::new(PatientDirectory::from_patients(vec![p1()])),
        HistoryLog::new(history_path),
        generator.clone(),
    );
    (service, generator)
}

/// Never finishes generating.
pub(crate) struct StalledGenerator;

#[async_trait]
impl TextGenerator for StalledGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
        std::future::pending().await
    }
}

pub(crate) fn stalled_prescriptions(history_path: &Path) -> PrescriptionService {
    PrescriptionService::new(
        Arc::new(PatientDirectory::from_patients(vec![p1()])),
        HistoryLog::new(history_path),
        Arc::new(StalledGenerator),
    )
}
