use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use profile_intake::api::ApiClient;
use profile_intake::config::Config;
use profile_intake::form::{Field, FormController, FormIntent, FormState, ImageFile};
use profile_intake::listing::ListingView;
use profile_intake::logging::init_tracing;
use profile_intake::notify::Notification;
use profile_intake::preprocess::{CompressionOptions, ImageCompressor};
use profile_intake::record::ProfileView;
use profile_intake::report::{ReportMount, ReportPage};
use profile_intake::server;
use profile_intake::store::{FileStore, RecordStore};
use profile_intake::submission::SubmissionPipeline;

#[derive(Debug, Parser)]
#[command(name = "profile-intake", version, about = "Submit and manage intake profiles")]
struct Cli {
    /// Config file (defaults to the platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override api.base_url from the config
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Validate and submit a profile
    Submit(SubmitArgs),
    /// Show the last submitted profile
    Report,
    /// Mail the last submitted profile
    SendMail,
    /// Export the last submitted profile as PDF
    Export {
        /// Output directory (defaults to downloads.dir)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// List every stored profile
    List,
    /// Mail the profile in listing row ID
    MailRow { id: usize },
    /// Export the profile in listing row ID as PDF
    ExportRow {
        id: usize,
        /// Output directory (defaults to downloads.dir)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Forget the last submitted profile
    Clear,
    /// Run the local stub endpoints until Ctrl-C
    Serve,
}

#[derive(Debug, Args)]
struct SubmitArgs {
    #[arg(long, default_value = "")]
    email: String,
    #[arg(long, default_value = "")]
    name: String,
    #[arg(long, default_value = "")]
    age: String,
    #[arg(long, default_value = "")]
    role: String,
    #[arg(long, default_value = "")]
    company: String,
    /// Image file to upload
    #[arg(long)]
    image: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    match run(Cli::parse()).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(base_url) = cli.base_url {
        config.api.base_url = base_url;
        config.validate()?;
    }
    let records = RecordStore::new(Arc::new(FileStore::new(config.storage_dir())));

    match cli.command {
        Command::Submit(args) => submit(&config, records, args).await,
        Command::Report => Ok(show_report(&records)),
        Command::SendMail => {
            let api = ApiClient::new(&config.api)?;
            let ReportMount::Ready(mut page) = ReportPage::mount(&records) else {
                return Ok(nothing_submitted());
            };
            Ok(finish(&page.send_mail(&api).await))
        }
        Command::Export { out } => {
            let api = ApiClient::new(&config.api)?;
            let ReportMount::Ready(mut page) = ReportPage::mount(&records) else {
                return Ok(nothing_submitted());
            };
            let dir = out.unwrap_or_else(|| config.downloads.dir.clone());
            Ok(finish(&page.export_data(&api, &dir).await))
        }
        Command::List => {
            let api = ApiClient::new(&config.api)?;
            let view = ListingView::mount(&api).await;
            if let Some(notification) = view.notification() {
                return Ok(finish(notification));
            }
            print_listing(&view);
            Ok(ExitCode::SUCCESS)
        }
        Command::MailRow { id } => {
            let api = ApiClient::new(&config.api)?;
            let view = ListingView::mount(&api).await;
            Ok(finish(&view.send_mail(&api, id).await))
        }
        Command::ExportRow { id, out } => {
            let api = ApiClient::new(&config.api)?;
            let view = ListingView::mount(&api).await;
            let dir = out.unwrap_or_else(|| config.downloads.dir.clone());
            Ok(finish(&view.export_pdf(&api, id, &dir).await))
        }
        Command::Clear => {
            records.clear()?;
            println!("Stored profile cleared.");
            Ok(ExitCode::SUCCESS)
        }
        Command::Serve => {
            server::run(&config.server, async {
                let _ = tokio::signal::ctrl_c().await;
            })
            .await
            .with_context(|| format!("stub server on {} failed", config.server.bind_addr))?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn submit(config: &Config, records: RecordStore, args: SubmitArgs) -> anyhow::Result<ExitCode> {
    let api = ApiClient::new(&config.api)?;
    let pipeline = SubmissionPipeline::new(
        api,
        Arc::new(ImageCompressor),
        CompressionOptions::from(&config.image),
    );
    let mut form = FormController::new(pipeline, records.clone());

    form.change(Field::Email, args.email);
    form.change(Field::Name, args.name);
    form.change(Field::Age, args.age);
    form.change(Field::Role, args.role);
    form.change(Field::Company, args.company);
    if let Some(path) = &args.image {
        let file = ImageFile::from_path(path)
            .with_context(|| format!("Failed to read image '{}'", path.display()))?;
        form.change(Field::Image, file);
    }

    let redirect = form.dispatch(FormIntent::SubmitRequested).await;
    print_field_errors(form.state());
    if let Some(notification) = &form.state().notification {
        println!("{}", notification);
    }

    match redirect {
        Some(redirect) if form.state().is_read_only() => {
            tokio::time::sleep(redirect.after).await;
            Ok(show_report(&records))
        }
        _ => Ok(ExitCode::FAILURE),
    }
}

fn show_report(records: &RecordStore) -> ExitCode {
    match ReportPage::mount(records) {
        ReportMount::Ready(page) => {
            print_view(page.view());
            ExitCode::SUCCESS
        }
        ReportMount::Redirect(_) => nothing_submitted(),
    }
}

fn nothing_submitted() -> ExitCode {
    eprintln!("No submitted profile found. Run `profile-intake submit` first.");
    ExitCode::FAILURE
}

fn finish(notification: &Notification) -> ExitCode {
    println!("{}", notification);
    if notification.is_error() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn print_field_errors(state: &FormState) {
    for (field, error) in state.errors.iter() {
        eprintln!("  {:<8} {}", field.label(), error);
    }
}

fn print_view(view: &ProfileView) {
    println!("Your Details");
    println!("  Email         {}", view.email);
    println!("  Name          {}", view.name);
    println!("  Age           {}", view.age);
    println!("  Role          {}", view.role);
    println!("  Company Name  {}", view.companyname);
    if let Some(image) = &view.image {
        println!("  Image         {}", image);
    }
}

fn print_listing(view: &ListingView) {
    println!(
        "{:>3}  {:<1} {:<24} {:<32} {:>4}  {:<12} {}",
        "ID", "", "NAME", "EMAIL", "AGE", "ROLE", "COMPANY"
    );
    for row in view.rows() {
        println!(
            "{:>3}  {:<1} {:<24} {:<32} {:>4}  {:<12} {}",
            row.id,
            if row.is_active() { "●" } else { "○" },
            row.name,
            row.email,
            row.age,
            row.role,
            row.companyname
        );
    }
}
