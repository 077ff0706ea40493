use careboard_forms::{
    apply, command_from_json, document_to_json, Command, ElementPatch, FormDocument,
    FormElementKind,
};
use careboard_id::{ElementId, FormId};
use careboard_records::classify_json;
use careboard_report::{
    report_to_json, values_from_json, IncidentReport, ReportStatus, ReportTags,
};
use careboard_store::{data_dir_from_env_value, FormStore, StoreConfig};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "careboard")]
#[command(about = "Careboard form and report CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List all stored forms
    List,
    /// Create a new form
    InitForm {
        /// Form title
        title: String,
        /// Introductory description (optional)
        #[arg(long)]
        description: Option<String>,
    },
    /// Show a stored form as JSON
    ShowForm {
        /// Form id
        form_id: String,
    },
    /// Append a fresh element to a form
    AddElement {
        /// Form id
        form_id: String,
        /// Element type: text, textarea, date, radio or checkbox
        kind: String,
        /// Label for the new element (optional)
        #[arg(long)]
        label: Option<String>,
    },
    /// Remove an element from a form
    RemoveElement {
        /// Form id
        form_id: String,
        /// Element id
        element_id: String,
    },
    /// Retitle a form
    SetTitle {
        /// Form id
        form_id: String,
        /// New title
        title: String,
    },
    /// Apply an editing command from a JSON file
    ApplyCommand {
        /// Form id
        form_id: String,
        /// Path to a JSON command file
        command_file: PathBuf,
    },
    /// Compose an incident report from a captured-values JSON file
    Report {
        /// Form id
        form_id: String,
        /// Path to a JSON object of captured values keyed by element id
        values_file: PathBuf,
        /// Resident the report is primarily about
        #[arg(long)]
        primary_resident: Option<String>,
        /// Publish instead of composing a draft
        #[arg(long)]
        publish: bool,
        /// When the incident happened (RFC 3339; defaults to now)
        #[arg(long)]
        occurred_at: Option<String>,
    },
    /// Classify a legacy medical record file
    Classify {
        /// Path to a JSON file holding one legacy record
        record_file: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("careboard_store=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let data_dir = data_dir_from_env_value(std::env::var("CAREBOARD_DATA_DIR").ok());
    tracing::debug!("using data directory {}", data_dir.display());
    let store = FormStore::new(StoreConfig::new(data_dir)?);

    match cli.command {
        Some(Commands::List) => {
            let forms = store.list();
            if forms.is_empty() {
                println!("No forms found.");
            } else {
                for form in forms {
                    println!(
                        "ID: {}, Title: {}, Elements: {}",
                        form.form_id, form.title, form.element_count
                    );
                }
            }
        }
        Some(Commands::InitForm { title, description }) => {
            let document = FormDocument {
                title,
                description: description.unwrap_or_default(),
                elements: Vec::new(),
            };
            match store.create(&document) {
                Ok(form_id) => println!("Initialised form with ID: {}", form_id),
                Err(e) => eprintln!("Error initialising form: {}", e),
            }
        }
        Some(Commands::ShowForm { form_id }) => match show_form(&store, &form_id) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Error showing form: {}", e),
        },
        Some(Commands::AddElement {
            form_id,
            kind,
            label,
        }) => match add_element(&store, &form_id, &kind, label) {
            Ok(element_id) => println!("Added element with ID: {}", element_id),
            Err(e) => eprintln!("Error adding element: {}", e),
        },
        Some(Commands::RemoveElement {
            form_id,
            element_id,
        }) => match remove_element(&store, &form_id, &element_id) {
            Ok(()) => println!("Removed element with ID: {}", element_id),
            Err(e) => eprintln!("Error removing element: {}", e),
        },
        Some(Commands::SetTitle { form_id, title }) => match set_title(&store, &form_id, title) {
            Ok(()) => println!("Updated title for form ID: {}", form_id),
            Err(e) => eprintln!("Error updating title: {}", e),
        },
        Some(Commands::ApplyCommand {
            form_id,
            command_file,
        }) => match apply_command_file(&store, &form_id, &command_file) {
            Ok(()) => println!("Applied command to form ID: {}", form_id),
            Err(e) => eprintln!("Error applying command: {}", e),
        },
        Some(Commands::Report {
            form_id,
            values_file,
            primary_resident,
            publish,
            occurred_at,
        }) => match compose_report(
            &store,
            &form_id,
            &values_file,
            primary_resident,
            publish,
            occurred_at,
        ) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Error composing report: {}", e),
        },
        Some(Commands::Classify { record_file }) => match classify_record(&record_file) {
            Ok(summary) => println!("{}", summary),
            Err(e) => eprintln!("Error classifying record: {}", e),
        },
        None => {
            println!("Use 'careboard --help' for commands");
        }
    }

    Ok(())
}

fn show_form(store: &FormStore, form_id: &str) -> Result<String, Box<dyn std::error::Error>> {
    let form_id = FormId::parse(form_id)?;
    let document = store.load(&form_id)?;
    Ok(document_to_json(&document)?)
}

fn add_element(
    store: &FormStore,
    form_id: &str,
    kind: &str,
    label: Option<String>,
) -> Result<ElementId, Box<dyn std::error::Error>> {
    let form_id = FormId::parse(form_id)?;
    let kind: FormElementKind = kind.parse()?;

    let document = store.load(&form_id)?;
    let mut next = apply(&document, Command::AddElement(kind));
    if next.elements.len() == document.elements.len() {
        return Err("element was not added".into());
    }

    let added = match next.elements.last() {
        Some(element) => element.element_id.clone(),
        None => return Err("element was not added".into()),
    };

    if let Some(label) = label {
        next = apply(
            &next,
            Command::UpdateElement {
                element_id: added.clone(),
                updated: ElementPatch {
                    label: Some(label),
                    ..ElementPatch::default()
                },
            },
        );
    }

    store.save(&form_id, &next)?;
    Ok(added)
}

fn remove_element(
    store: &FormStore,
    form_id: &str,
    element_id: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let form_id = FormId::parse(form_id)?;
    let element_id = ElementId::parse(element_id)?;

    let document = store.load(&form_id)?;
    if !document.contains_element(&element_id) {
        return Err(format!("no element with id {element_id} in form {form_id}").into());
    }

    let next = apply(&document, Command::RemoveElement { element_id });
    store.save(&form_id, &next)?;
    Ok(())
}

fn set_title(
    store: &FormStore,
    form_id: &str,
    title: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let form_id = FormId::parse(form_id)?;

    let document = store.load(&form_id)?;
    let next = apply(&document, Command::UpdateTitle(title));
    store.save(&form_id, &next)?;
    Ok(())
}

fn apply_command_file(
    store: &FormStore,
    form_id: &str,
    command_file: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let form_id = FormId::parse(form_id)?;
    let text = fs::read_to_string(command_file)?;
    let command = command_from_json(&text)?;

    let document = store.load(&form_id)?;
    let next = apply(&document, command);
    store.save(&form_id, &next)?;
    Ok(())
}

fn compose_report(
    store: &FormStore,
    form_id: &str,
    values_file: &Path,
    primary_resident: Option<String>,
    publish: bool,
    occurred_at: Option<String>,
) -> Result<String, Box<dyn std::error::Error>> {
    let form_id = FormId::parse(form_id)?;
    let document = store.load(&form_id)?;

    let text = fs::read_to_string(values_file)?;
    let values = values_from_json(&text)?;

    let status = if publish {
        ReportStatus::Published
    } else {
        ReportStatus::Draft
    };
    let tags = ReportTags {
        primary_resident: primary_resident.unwrap_or_default(),
        ..ReportTags::default()
    };
    let occurred_at = match occurred_at {
        Some(raw) => raw.parse::<DateTime<Utc>>()?,
        None => Utc::now(),
    };

    let report = IncidentReport::compose(&document, &values, status, tags, occurred_at)?;
    Ok(report_to_json(&report)?)
}

fn classify_record(record_file: &Path) -> Result<String, Box<dyn std::error::Error>> {
    let text = fs::read_to_string(record_file)?;
    let record = classify_json(&text)?;

    let summary = record.summary();
    if summary.detail.is_empty() {
        Ok(summary.title)
    } else {
        Ok(format!("{} ({})", summary.title, summary.detail))
    }
}
