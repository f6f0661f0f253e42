use clap::{Args, ValueEnum};
use madison_intake::config::AppConfig;
use madison_intake::error::AppError;
use madison_intake::inquiries::{validate_submission, Inquiry, InquiryStore, SqliteInquiryStore};
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum ExportFormat {
    #[default]
    Json,
    Csv,
}

#[derive(Args, Debug)]
pub(crate) struct ExportArgs {
    /// Output format
    #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
    pub(crate) format: ExportFormat,
    /// SQLite database to read (defaults to APP_DATABASE_PATH)
    #[arg(long)]
    pub(crate) database: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct CheckArgs {
    /// JSON file containing a case-inquiry payload
    #[arg(long)]
    pub(crate) file: PathBuf,
}

pub(crate) fn run_export(args: ExportArgs) -> Result<(), AppError> {
    let path = match args.database {
        Some(path) => path,
        None => AppConfig::load()?.storage.database_path,
    };
    if !path.exists() {
        return Err(AppError::Command(format!(
            "no inquiry database at {}",
            path.display()
        )));
    }

    let store = SqliteInquiryStore::open_read_only(&path)?;
    let inquiries = store.list()?;

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    write_export(&inquiries, args.format, &mut handle)?;
    handle.flush()?;
    Ok(())
}

pub(crate) fn write_export<W: Write>(
    inquiries: &[Inquiry],
    format: ExportFormat,
    writer: &mut W,
) -> Result<(), AppError> {
    match format {
        ExportFormat::Json => {
            serde_json::to_writer_pretty(&mut *writer, inquiries)
                .map_err(|err| AppError::Command(format!("json export failed: {err}")))?;
            writeln!(writer)?;
        }
        ExportFormat::Csv => {
            let mut csv = csv::Writer::from_writer(writer);
            csv.write_record([
                "id",
                "createdAt",
                "firstName",
                "lastName",
                "email",
                "phone",
                "practiceArea",
                "message",
            ])
            .map_err(csv_error)?;
            for inquiry in inquiries {
                csv.write_record([
                    inquiry.id.to_string(),
                    inquiry.created_at.to_rfc3339(),
                    inquiry.first_name.clone(),
                    inquiry.last_name.clone(),
                    inquiry.email.clone(),
                    inquiry.phone.clone(),
                    inquiry.practice_area.label().to_string(),
                    inquiry.message.clone(),
                ])
                .map_err(csv_error)?;
            }
            csv.flush()?;
        }
    }
    Ok(())
}

fn csv_error(err: csv::Error) -> AppError {
    AppError::Command(format!("csv export failed: {err}"))
}

pub(crate) fn run_check(args: CheckArgs) -> Result<(), AppError> {
    let raw = std::fs::read_to_string(&args.file)?;
    let payload: serde_json::Value = serde_json::from_str(&raw).map_err(|err| {
        AppError::Command(format!("{} is not valid JSON: {err}", args.file.display()))
    })?;

    match validate_submission(&payload) {
        Ok(inquiry) => {
            println!(
                "valid: {} {} ({})",
                inquiry.first_name,
                inquiry.last_name,
                inquiry.practice_area.label()
            );
            Ok(())
        }
        Err(errors) => {
            for error in errors.errors() {
                println!("- {}: {}", error.field, error.message);
            }
            Err(AppError::Command(format!(
                "{} field(s) failed validation",
                errors.len()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use madison_intake::inquiries::{InquiryId, NewInquiry, PracticeArea};

    fn stored() -> Vec<Inquiry> {
        let created_at = Utc
            .with_ymd_and_hms(2025, 3, 14, 15, 9, 26)
            .single()
            .expect("valid timestamp");
        vec![NewInquiry {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: "jane@example.com".to_string(),
            phone: "5551234567".to_string(),
            practice_area: PracticeArea::FamilyLaw,
            message: "Custody dispute, \"urgent\", need a call back.".to_string(),
        }
        .into_inquiry(InquiryId(7), created_at)]
    }

    #[test]
    fn csv_export_quotes_free_text() {
        let mut out = Vec::new();
        write_export(&stored(), ExportFormat::Csv, &mut out).expect("export succeeds");
        let text = String::from_utf8(out).expect("utf8");

        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("id,createdAt,firstName,lastName,email,phone,practiceArea,message")
        );
        assert_eq!(
            lines.next(),
            Some(concat!(
                "7,2025-03-14T15:09:26+00:00,Jane,Doe,jane@example.com,5551234567,Family Law,",
                "\"Custody dispute, \"\"urgent\"\", need a call back.\"",
            ))
        );
    }

    #[test]
    fn json_export_round_trips_records() {
        let mut out = Vec::new();
        write_export(&stored(), ExportFormat::Json, &mut out).expect("export succeeds");
        let parsed: Vec<Inquiry> = serde_json::from_slice(&out).expect("json array");
        assert_eq!(parsed, stored());
    }
}
