//! Prompt rendering for prescription generation.

use api_shared::Patient;

const INSTRUCTIONS: &str = "You are a licensed doctor. Based on the patient details below, \
write a prescription for the current symptoms.\n\
Use generic medicine names only, with dose, frequency and duration.\n\
Do not include any disclaimers or advice to consult another doctor.";

/// Renders the generation prompt for one request.
///
/// Pure and deterministic. The `Past data` section is appended last and only when
/// `past_history` is non-empty, so adding history never changes the rest of the prompt.
pub fn render(patient: &Patient, symptoms: &str, past_history: &str) -> String {
    let history = if patient.history.is_empty() {
        "None".to_owned()
    } else {
        patient.history.join(", ")
    };

    let mut prompt = format!(
        "{INSTRUCTIONS}\n\n\
         Patient age: {age}\n\
         Diagnosis: {diagnosis}\n\
         Medical history: {history}\n\
         Current symptoms: {symptoms}\n",
        age = patient.age,
        diagnosis = patient.diagnosis,
    );

    if !past_history.is_empty() {
        prompt.push_str("\nPast data:\n");
        prompt.push_str(past_history);
    }

    prompt
}
