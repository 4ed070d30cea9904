use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rxpad_core::{
    GeneratePrescriptionReq, HistoryLog, PatientDirectory, PrescriptionError, StartupValues,
    EMPTY_HISTORY_PLACEHOLDER,
};

#[derive(Parser)]
#[command(name = "rxpad")]
#[command(about = "RxPad prescription assistant CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List all patients
    List,
    /// Show one patient as JSON
    Show {
        /// Patient identifier (exact match)
        patient_id: String,
    },
    /// Print the prescription history log
    History,
    /// Generate a prescription and record it in the history log
    Prescribe {
        /// Patient identifier (exact match)
        patient_id: String,
        /// Current symptoms
        symptoms: String,
        /// Record this prescription instead of the generated one
        #[arg(long)]
        final_prescription: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("rxpad_core=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let values = StartupValues::from_env();

    match cli.command {
        Some(Commands::List) => {
            let directory = PatientDirectory::load(&values.patient_data_path());
            if directory.is_empty() {
                println!("No patients found.");
            }
            for patient in directory.all() {
                println!(
                    "ID: {}, Name: {}, Age: {}, Diagnosis: {}",
                    patient.id,
                    patient.name.as_deref().unwrap_or("-"),
                    patient.age,
                    patient.diagnosis
                );
            }
        }
        Some(Commands::Show { patient_id }) => {
            let directory = PatientDirectory::load(&values.patient_data_path());
            match directory.get(&patient_id) {
                Some(patient) => println!("{}", serde_json::to_string_pretty(patient)?),
                None => anyhow::bail!("Patient not found: {}", patient_id),
            }
        }
        Some(Commands::History) => {
            let log = HistoryLog::new(values.history_log_path());
            let history = log.read_all();
            if history.is_empty() {
                println!("{}", EMPTY_HISTORY_PLACEHOLDER);
            } else {
                print!("{}", history);
            }
        }
        Some(Commands::Prescribe {
            patient_id,
            symptoms,
            final_prescription,
        }) => {
            let cfg = values.into_config()?;
            let service = rxpad_core::build_service(&cfg);
            let req = GeneratePrescriptionReq {
                patient_id,
                symptoms,
                final_prescription,
            };

            match service.generate(req).await {
                Ok(res) => {
                    println!("Generated:    {}", res.generated);
                    println!("Prescription: {}", res.prescription);
                }
                Err(PrescriptionError::HistoryAppend { source, outcome }) => {
                    println!("Prescription: {}", outcome.prescription);
                    anyhow::bail!("prescription was not recorded in the history log: {}", source);
                }
                Err(e) => return Err(e.into()),
            }
        }
        None => {
            println!("Use 'rxpad --help' for commands");
        }
    }

    Ok(())
}
