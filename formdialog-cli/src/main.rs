use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use color_eyre::eyre::{Report, Result, WrapErr, eyre};
use tracing_subscriber::EnvFilter;

use formdialog::{
    DialogOptions, DocumentFormat, FieldDescriptor, FormDialogController, FormDocument,
    HeadlessHost, TerminalFormDialog, parse_form_document,
};

const LOG_ENV: &str = "FORMDIALOG_LOG";

#[derive(Debug, Parser)]
#[command(
    name = "formdialog",
    version,
    about = "Run a validated form dialog in the terminal"
)]
struct Cli {
    /// Form document: file path, or "-" for stdin
    #[arg(value_name = "FILE", default_value = "-")]
    document: String,

    /// Document format (json, yaml, toml); guessed from the extension when omitted
    #[arg(long = "format", value_name = "FORMAT")]
    format: Option<DocumentFormat>,

    /// Title shown on the dialog border
    #[arg(long = "title", value_name = "TEXT")]
    title: Option<String>,

    /// Label of the confirm button
    #[arg(long = "confirm-label", value_name = "TEXT")]
    confirm_label: Option<String>,

    /// Label of the dismiss button
    #[arg(long = "dismiss-label", value_name = "TEXT")]
    dismiss_label: Option<String>,

    /// Hide the key help line
    #[arg(long = "no-help")]
    no_help: bool,

    /// Print values as single-line JSON
    #[arg(long = "compact")]
    compact: bool,

    /// Validate the document and its initial values without opening the terminal
    #[arg(long = "check")]
    check: bool,
}

impl Cli {
    fn dialog_options(&self, document: &FormDocument) -> DialogOptions {
        let mut options = document.options().with_help(!self.no_help);
        if let Some(title) = &self.title {
            options = options.with_title(title.clone());
        }
        if let Some(label) = &self.confirm_label {
            options = options.with_confirm_label(label.clone());
        }
        if let Some(label) = &self.dismiss_label {
            options = options.with_dismiss_label(label.clone());
        }
        options
    }
}

fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    init_tracing();
    let cli = Cli::parse();

    let document = load_document(&cli.document, cli.format)?;
    let options = cli.dialog_options(&document);
    let fields = document
        .descriptors()
        .wrap_err("form document has an invalid validator")?;

    if cli.check {
        return Ok(check_document(options, fields));
    }

    let outcome = TerminalFormDialog::new(fields)
        .with_options(options)
        .run()
        .map_err(Report::msg)?;
    if !outcome.confirmed() {
        tracing::info!(reason = ?outcome.reason, "dialog closed without confirmation");
        return Ok(ExitCode::FAILURE);
    }

    let rendered = if cli.compact {
        serde_json::to_string(&outcome.values)?
    } else {
        serde_json::to_string_pretty(&outcome.values)?
    };
    println!("{rendered}");
    Ok(ExitCode::SUCCESS)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn load_document(spec: &str, format: Option<DocumentFormat>) -> Result<FormDocument> {
    let (contents, guessed) = if spec == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .wrap_err("failed to read form document from stdin")?;
        (buffer, DocumentFormat::Json)
    } else {
        let path = Path::new(spec);
        let contents = fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read form document {}", path.display()))?;
        (contents, DocumentFormat::from_path(path))
    };

    match format {
        Some(format) => parse_form_document(&contents, format).map_err(Report::new),
        None => parse_any(&contents, guessed),
    }
}

fn parse_any(contents: &str, preferred: DocumentFormat) -> Result<FormDocument> {
    let primary = match parse_form_document(contents, preferred) {
        Ok(document) => return Ok(document),
        Err(err) => err,
    };
    for candidate in DocumentFormat::available_formats() {
        if candidate == preferred {
            continue;
        }
        if let Ok(document) = parse_form_document(contents, candidate) {
            tracing::debug!(format = %candidate, "parsed form document with fallback format");
            return Ok(document);
        }
    }
    Err(eyre!(
        "failed to parse form document: tried {} (first error: {primary})",
        format_list()
    ))
}

fn format_list() -> String {
    DocumentFormat::available_formats()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn check_document(options: DialogOptions, fields: Vec<FieldDescriptor>) -> ExitCode {
    let dialog = FormDialogController::new(
        options,
        fields,
        |_confirmed: bool| {},
        HeadlessHost::default(),
    );
    for field in dialog.fields() {
        match field.reason {
            None => println!("{}: ok", field.label),
            Some(reason) => println!("{}: {reason}", field.label),
        }
    }
    if dialog.confirm_enabled() {
        println!("confirm enabled");
        ExitCode::SUCCESS
    } else {
        println!("confirm disabled");
        ExitCode::FAILURE
    }
}
