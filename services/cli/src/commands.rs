use std::fs;
use std::path::Path;
use std::sync::Arc;

use chrono::Local;
use showroom_perf::config::AppConfig;
use showroom_perf::error::AppError;
use showroom_perf::scoreboard::{
    JsonSlotStore, MetricKey, RecordField, RecordId, RosterService, RosterServiceError,
    ScoringConfig,
};
use showroom_perf::tenancy::{Store, DIRECTORY};
use tracing::info;

use crate::cli::{AddArgs, CliError, ExportArgs, ExportFormat, SetArgs};

pub(crate) fn open_session(
    config: &AppConfig,
    tenant: &str,
    read_only: bool,
) -> Result<RosterService<JsonSlotStore>, CliError> {
    let repository = Arc::new(JsonSlotStore::new(&config.storage.data_dir));
    let service = RosterService::open(
        repository,
        Store::resolve(tenant),
        read_only,
        ScoringConfig::default(),
        config.storage.debounce,
    )
    .map_err(AppError::from)?;
    Ok(service)
}

pub(crate) fn run_board(service: &RosterService<JsonSlotStore>) -> Result<(), CliError> {
    let today = Local::now().date_naive();
    println!(
        "Scoreboard for {} (slot {}), {}",
        service.tenant().label(),
        service.tenant().slot(),
        today
    );
    if service.read_only() {
        println!("Session is read-only");
    }
    println!();

    for (record, evaluation) in service.evaluate_all() {
        let name = if record.name.is_empty() {
            "(unnamed)"
        } else {
            record.name.as_str()
        };
        let zero_marker = if evaluation.has_zero_metric {
            " [zeroed metric]"
        } else {
            ""
        };
        println!(
            "- {} | {} | score {} (bonus {:.0}pp) | grade {}{}",
            record.id,
            name,
            evaluation.final_percent(),
            evaluation.bonus * 100.0,
            evaluation.grade,
            zero_marker
        );
    }
    Ok(())
}

pub(crate) fn run_score(
    service: &RosterService<JsonSlotStore>,
    id: &str,
) -> Result<(), CliError> {
    let id = RecordId(id.to_string());
    let record = service
        .find(&id)
        .ok_or_else(|| AppError::from(RosterServiceError::UnknownRecord(id.clone())))?;
    let evaluation = service.evaluate(&id).map_err(AppError::from)?;

    let name = if record.name.is_empty() {
        "(unnamed)"
    } else {
        record.name.as_str()
    };
    println!("Evaluation for {} ({}), {}", name, record.id, Local::now().date_naive());
    println!("Store: {}", record.store_label);
    if !record.notes.is_empty() {
        println!("Notes: {}", record.notes);
    }

    println!("\nMetrics");
    for component in &evaluation.components {
        println!(
            "- {}: goal {} | actual {} | attainment {:.1}% | weight {:.1}% | {}",
            component.metric.label(),
            record.goals.get(component.metric),
            record.actuals.get(component.metric),
            component.attainment * 100.0,
            component.weight * 100.0,
            component.notes
        );
    }

    println!("\nBonus signals");
    println!(
        "- Rating score: {}",
        if record.bonus_signals.rating_score.as_str().is_empty() {
            "(unset)"
        } else {
            record.bonus_signals.rating_score.as_str()
        }
    );
    let complaint = record.bonus_signals.complaint_rating.label();
    println!(
        "- Complaint rating: {}",
        if complaint.is_empty() { "(unset)" } else { complaint }
    );

    println!(
        "\nBase {:.1}% + bonus {:.0}pp = final {}",
        evaluation.base_score * 100.0,
        evaluation.bonus * 100.0,
        evaluation.final_percent()
    );
    if evaluation.has_zero_metric {
        println!("Grade: {} (a critical metric with a goal recorded zero results)", evaluation.grade);
    } else {
        println!("Grade: {}", evaluation.grade);
    }
    Ok(())
}

pub(crate) fn run_add(
    service: &mut RosterService<JsonSlotStore>,
    args: AddArgs,
) -> Result<(), CliError> {
    let mut record = service.create().map_err(AppError::from)?;
    if let Some(name) = args.name {
        record = service
            .apply_edit(&record.id, RecordField::Name, &name)
            .map_err(AppError::from)?;
    }
    if let Some(notes) = args.notes {
        record = service
            .apply_edit(&record.id, RecordField::Notes, &notes)
            .map_err(AppError::from)?;
    }
    info!(id = %record.id, "salesperson added");
    println!("Added {} ({})", if record.name.is_empty() { "(unnamed)" } else { &record.name }, record.id);
    Ok(())
}

pub(crate) fn run_set(
    service: &mut RosterService<JsonSlotStore>,
    args: SetArgs,
) -> Result<(), CliError> {
    let id = RecordId(args.id.clone());
    let mut edits: Vec<(RecordField, String)> = Vec::new();

    if let Some(name) = args.name {
        edits.push((RecordField::Name, name));
    }
    if let Some(store) = args.store {
        edits.push((RecordField::StoreLabel, store));
    }
    if let Some(notes) = args.notes {
        edits.push((RecordField::Notes, notes));
    }
    if let Some(rating) = args.rating {
        edits.push((RecordField::RatingScore, rating));
    }
    if let Some(complaint) = args.complaint {
        edits.push((RecordField::ComplaintRating, complaint));
    }
    for assignment in &args.goal {
        let (key, value) = parse_assignment(assignment)?;
        edits.push((RecordField::Goal(key), value));
    }
    for assignment in &args.actual {
        let (key, value) = parse_assignment(assignment)?;
        edits.push((RecordField::Actual(key), value));
    }

    if edits.is_empty() {
        println!("Nothing to change for {id}");
        return Ok(());
    }

    let count = edits.len();
    for (field, value) in edits {
        service
            .apply_edit(&id, field, &value)
            .map_err(AppError::from)?;
    }
    println!("Updated {count} field(s) on {id}");
    Ok(())
}

fn parse_assignment(raw: &str) -> Result<(MetricKey, String), CliError> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| CliError::MalformedAssignment(raw.to_string()))?;
    let key = MetricKey::parse_key(key).ok_or_else(|| CliError::UnknownMetric(key.to_string()))?;
    Ok((key, value.to_string()))
}

pub(crate) fn run_remove(
    service: &mut RosterService<JsonSlotStore>,
    id: &str,
) -> Result<(), CliError> {
    let id = RecordId(id.to_string());
    service.remove(&id).map_err(AppError::from)?;
    println!("Removed {id}");
    Ok(())
}

pub(crate) fn run_export(
    service: &RosterService<JsonSlotStore>,
    args: ExportArgs,
) -> Result<(), CliError> {
    let (contents, default_name) = match args.format {
        ExportFormat::Json => (
            service.export_json().map_err(AppError::from)?,
            service.export_filename(),
        ),
        ExportFormat::Csv => (
            service.export_csv().map_err(AppError::from)?,
            format!("performance_{}.csv", service.tenant().slot()),
        ),
    };
    let output = args
        .output
        .unwrap_or_else(|| default_name.into());
    fs::write(&output, contents).map_err(AppError::from)?;
    println!("Exported {} record(s) to {}", service.records().len(), output.display());
    Ok(())
}

pub(crate) fn run_import(
    service: &mut RosterService<JsonSlotStore>,
    file: &Path,
) -> Result<(), CliError> {
    let raw = fs::read_to_string(file).map_err(AppError::from)?;
    match service.import_json(&raw) {
        Ok(count) => {
            println!("Imported {count} record(s) from {}", file.display());
            Ok(())
        }
        Err(err) => {
            println!("Import failed, roster reset to a single blank record");
            Err(AppError::from(err).into())
        }
    }
}

pub(crate) fn run_tenants() {
    println!("Known stores");
    for (key, label) in DIRECTORY {
        println!("- {key}: {label}");
    }
    println!("\nAny other key gets its own slot under the default label.");
}
