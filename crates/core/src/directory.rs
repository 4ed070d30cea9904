//! In-memory patient directory.
//!
//! The directory is loaded once at startup from a static data file and is read-only afterwards.
//! It is shared between request handlers behind an `Arc`.

use api_shared::Patient;
use std::fs;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
enum LoadError {
    #[error("failed to read patient data file: {0}")]
    Read(std::io::Error),
    #[error("failed to parse patient JSON: {0}")]
    Json(serde_json::Error),
    #[error("failed to parse patient YAML: {0}")]
    Yaml(serde_yaml::Error),
}

#[derive(Debug, Clone, Default)]
pub struct PatientDirectory {
    patients: Vec<Patient>,
}

impl PatientDirectory {
    /// Builds a directory from already-loaded records, keeping their order.
    pub fn from_patients(patients: Vec<Patient>) -> Self {
        Self { patients }
    }

    /// Loads all patients from `path`.
    ///
    /// Files ending in `.yaml` or `.yml` are parsed as YAML, anything else as JSON. Either way
    /// the file must hold a sequence of patient records.
    ///
    /// A missing or malformed file never fails the caller: the problem is logged and the
    /// directory starts empty, so every lookup reports "not found".
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(patients) => {
                tracing::info!(
                    "loaded {} patient(s) from {}",
                    patients.len(),
                    path.display()
                );
                Self { patients }
            }
            Err(e) => {
                tracing::warn!(
                    "patient directory is empty, could not load {}: {}",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    fn try_load(path: &Path) -> Result<Vec<Patient>, LoadError> {
        let contents = fs::read_to_string(path).map_err(LoadError::Read)?;
        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

        if is_yaml {
            serde_yaml::from_str(&contents).map_err(LoadError::Yaml)
        } else {
            serde_json::from_str(&contents).map_err(LoadError::Json)
        }
    }

    /// All patients in load order.
    pub fn all(&self) -> &[Patient] {
        &self.patients
    }

    /// First patient whose id matches exactly (case-sensitive).
    pub fn get(&self, id: &str) -> Option<&Patient> {
        self.patients.iter().find(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.patients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patients.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn patient(id: &str, diagnosis: &str) -> Patient {
        Patient {
            id: id.into(),
            name: None,
            age: 40,
            diagnosis: diagnosis.into(),
            history: vec!["penicillin allergy".into()],
        }
    }

    #[test]
    fn test_load_json_preserves_order() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("patients.json");
        fs::write(
            &path,
            r#"[
                {"id": "p2", "name": "Bea", "age": 31, "diagnosis": "asthma", "history": []},
                {"id": "p1", "age": 40, "diagnosis": "flu", "history": ["penicillin allergy"]}
            ]"#,
        )
        .unwrap();

        let directory = PatientDirectory::load(&path);
        let ids: Vec<&str> = directory.all().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p2", "p1"]);
        assert_eq!(directory.get("p2").unwrap().name.as_deref(), Some("Bea"));
        assert_eq!(directory.get("p1").unwrap().name, None);
    }

    #[test]
    fn test_load_yaml() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("patients.yaml");
        fs::write(
            &path,
            "- id: p1\n  age: 40\n  diagnosis: flu\n  history:\n    - penicillin allergy\n",
        )
        .unwrap();

        let directory = PatientDirectory::load(&path);
        assert_eq!(directory.len(), 1);
        assert_eq!(directory.get("p1"), Some(&patient("p1", "flu")));
    }

    #[test]
    fn test_missing_file_yields_empty_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let directory = PatientDirectory::load(&temp_dir.path().join("absent.json"));
        assert!(directory.is_empty());
        assert!(directory.get("p1").is_none());
    }

    #[test]
    fn test_malformed_file_yields_empty_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("patients.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(PatientDirectory::load(&path).is_empty());
    }

    #[test]
    fn test_get_is_exact_and_returns_first_match() {
        let directory = PatientDirectory::from_patients(vec![
            patient("p1", "flu"),
            patient("p1", "measles"),
            patient("P2", "asthma"),
        ]);

        assert_eq!(directory.get("p1").unwrap().diagnosis, "flu");
        assert!(directory.get("p2").is_none());
        assert!(directory.get("p1 ").is_none());
    }
}
