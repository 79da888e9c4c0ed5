use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use medico_core::{
    load_seed, seed_source_from_env_values, Appointment, BookingForm, ClinicStore, CoreConfig,
    Recommendation, SeedData, Slot, TriageSession,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "medico")]
#[command(about = "Médico clinic scheduling CLI")]
struct Cli {
    /// YAML seed file (overrides MEDICO_SEED_FILE)
    #[arg(long, global = true)]
    seed_file: Option<PathBuf>,
    /// Seed for the built-in appointment generator (overrides MEDICO_RNG_SEED)
    #[arg(long, global = true)]
    rng_seed: Option<u64>,
    /// Date the built-in seed starts from and "today" for agenda views (YYYY-MM-DD)
    #[arg(long, global = true)]
    today: Option<NaiveDate>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the seeded users
    Users,
    /// List patients, optionally filtered by name, CPF or phone
    Patients {
        #[arg(long)]
        search: Option<String>,
    },
    /// Show a professional's free slots on a date
    Slots {
        professional_id: String,
        /// YYYY-MM-DD
        date: NaiveDate,
    },
    /// Log in as a patient and book an appointment
    Book {
        /// Patient user ID, e.g. user2
        #[arg(long)]
        user: String,
        professional_id: String,
        /// YYYY-MM-DD
        date: String,
        /// HH:MM
        time: String,
    },
    /// Book a slot, cancel it and show availability at each step
    CancelDemo {
        #[arg(long, default_value = "prof1")]
        professional_id: String,
        /// YYYY-MM-DD; defaults to the first day with a free 08:00 slot
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Run a triage conversation over the given messages
    Triage {
        #[arg(required = true)]
        messages: Vec<String>,
    },
    /// Show a patient's medical records and agenda
    Records { patient_id: String },
    /// Show a professional's revenue for a month
    Finance {
        professional_id: String,
        year: i32,
        month: u32,
    },
    /// Print the loaded seed as YAML, ready to edit and pass back with --seed-file
    ExportSeed,
}

fn open_seed(cli: &Cli, today: NaiveDate) -> Result<SeedData, Box<dyn std::error::Error>> {
    let seed_file = cli
        .seed_file
        .as_ref()
        .map(|p| p.display().to_string())
        .or_else(|| std::env::var("MEDICO_SEED_FILE").ok());
    let rng_seed = cli
        .rng_seed
        .map(|s| s.to_string())
        .or_else(|| std::env::var("MEDICO_RNG_SEED").ok());
    let seed_source = seed_source_from_env_values(
        seed_file,
        rng_seed,
        std::env::var("MEDICO_SEED_APPOINTMENTS").ok(),
    )?;
    let cfg = CoreConfig::new(seed_source)?;
    Ok(load_seed(&cfg, today)?)
}

fn print_appointment(a: &Appointment) {
    println!(
        "{} {} {} | {} with {} | {}",
        a.id, a.date, a.time, a.patient_name, a.professional_id, a.status
    );
}

fn print_slots(slots: &[Slot]) {
    let labels: Vec<String> = slots.iter().map(Slot::label).collect();
    println!("{} free: {}", labels.len(), labels.join(" "));
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let today = cli.today.unwrap_or_else(|| Utc::now().date_naive());
    let seed = open_seed(&cli, today)?;
    if let Some(Commands::ExportSeed) = cli.command {
        print!("{}", seed.render_yaml()?);
        return Ok(());
    }
    let mut store = ClinicStore::from_seed(seed);

    match cli.command {
        Some(Commands::Users) => {
            for user in store.users() {
                println!(
                    "{}: {} <{}> {} -> {}",
                    user.id, user.name, user.email, user.role, user.profile_id
                );
            }
        }
        Some(Commands::Patients { search }) => {
            let patients = store.search_patients(search.as_deref().unwrap_or(""));
            if patients.is_empty() {
                println!("No patients found.");
            }
            for patient in patients {
                println!(
                    "ID: {}, Name: {}, CPF: {}, Phone: {}, Insurance: {}",
                    patient.id, patient.name, patient.cpf, patient.phone, patient.insurance
                );
            }
        }
        Some(Commands::Slots {
            professional_id,
            date,
        }) => {
            if store.has_availability(date, &professional_id) {
                print_slots(&store.available_slots(date, &professional_id));
            } else {
                println!("{professional_id} is fully booked on {date}");
            }
        }
        Some(Commands::Book {
            user,
            professional_id,
            date,
            time,
        }) => {
            store.login(&user)?;
            let form = BookingForm {
                professional_id,
                date,
                time,
            };
            match store.book_for_current_patient(&form) {
                Ok(appointment) => {
                    print!("Booked: ");
                    print_appointment(&appointment);
                }
                Err(e) => eprintln!("Error booking appointment: {}", e),
            }
        }
        Some(Commands::CancelDemo {
            professional_id,
            date,
        }) => {
            let eight = Slot::parse("08:00")?;
            let date = match date {
                Some(date) => date,
                None => (0..365)
                    .filter_map(|offset| today.checked_add_days(chrono::Days::new(offset)))
                    .find(|d| store.is_slot_available(*d, &professional_id, eight))
                    .ok_or("no free 08:00 slot in the next year")?,
            };

            println!("{professional_id} on {date}");
            print_slots(&store.available_slots(date, &professional_id));

            let patient_user = store
                .users()
                .iter()
                .find(|u| u.role == medico_core::UserRole::Patient)
                .map(|u| u.id.clone())
                .ok_or("no patient user in the seed")?;
            store.login(&patient_user)?;
            let appointment = store.book_for_current_patient(&BookingForm {
                professional_id: professional_id.clone(),
                date: date.to_string(),
                time: eight.label(),
            })?;
            print!("Booked: ");
            print_appointment(&appointment);
            print_slots(&store.available_slots(date, &professional_id));

            store.cancel_appointment(&appointment.id)?;
            println!("Cancelled {}", appointment.id);
            print_slots(&store.available_slots(date, &professional_id));
        }
        Some(Commands::Triage { messages }) => {
            let mut session = TriageSession::new();
            for message in messages {
                let Some(reply) = session.respond(&message) else {
                    continue;
                };
                let names: Vec<&str> = reply.matches.iter().map(|r| r.specialty).collect();
                println!("> {message}");
                println!("  matches: {}", names.join(", "));
                match reply.recommendation {
                    Some(Recommendation::Specialty {
                        specialty,
                        description,
                    }) => println!("  recommended: {specialty} ({description})"),
                    Some(Recommendation::Fallback { specialty }) => {
                        println!("  recommended: {specialty} (no specific match)")
                    }
                    None => {}
                }
            }
        }
        Some(Commands::Records { patient_id }) => {
            let records = store.medical_records(&patient_id)?;
            println!("Consultations:");
            for consultation in &records.consultations {
                print_appointment(consultation);
                if let Some(diagnosis) = &consultation.diagnosis {
                    println!("    diagnosis: {diagnosis}");
                }
            }
            println!("Prescriptions: {}", records.prescriptions.join(", "));
            println!("Exams: {}", records.exams.join(", "));

            let agenda = store.patient_agenda(&patient_id, today)?;
            println!("Upcoming:");
            agenda.upcoming.iter().for_each(print_appointment);
            println!("Past:");
            agenda.past.iter().for_each(print_appointment);
        }
        Some(Commands::Finance {
            professional_id,
            year,
            month,
        }) => {
            let overview = store.financial_overview(&professional_id, year, month);
            println!(
                "{professional_id} {year}-{month:02}: {} completed, revenue R$ {:.2}, average R$ {:.2}",
                overview.completed_appointments, overview.total_revenue, overview.average_ticket
            );
            println!(
                "paid: {}, pending: {}, insurance: {}",
                overview.paid, overview.pending, overview.insurance
            );
        }
        Some(Commands::ExportSeed) => {}
        None => {
            println!("No command given. Use --help for usage.");
        }
    }

    Ok(())
}
