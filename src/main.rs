use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tdreport::api::{CommentTarget, Id, Task};
use tdreport::cli::{Args, ClientConfig, Commands, ConfigDiscovery, ReportArgs};
use tdreport::env;
use tdreport::task::{FilterCriteria, LabelCatalog, Palette, ProjectCatalog, ReportError, run_report};
use tdreport::{SnapshotSource, TaskSource, TodoistClient, render};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse_args();
    init_logging(args.verbose);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Some(report_err) = err.downcast_ref::<ReportError>()
                && report_err.is_user_error()
            {
                eprintln!("Error: {}", report_err);
                return ExitCode::from(2);
            }
            error!("Command failed: {:#}", err);
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so stdout only carries the report
fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "tdreport=debug"
    } else {
        "tdreport=warn"
    };
    let filter = EnvFilter::try_from_env(env::vars::LOG_FILTER)
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(args: Args) -> Result<()> {
    if let Commands::ShowConfig = args.command {
        ConfigDiscovery::show_discovery_info();
        return Ok(());
    }

    let mut config = ConfigDiscovery::discover_config(args.config.as_deref())
        .context("Failed to load configuration")?;
    if let Some(token_file) = args.token_file {
        config.token_file = token_file;
    }

    match args.command {
        Commands::Report(report) => run_report_command(&config, report).await,
        Commands::Projects { snapshot } => list_projects(&config, snapshot.as_deref()).await,
        Commands::Labels { snapshot } => list_labels(&config, snapshot.as_deref()).await,
        Commands::SharedLabels => {
            let client = connect(&config)?;
            for name in client.get_shared_labels().await? {
                println!("{}", name);
            }
            Ok(())
        }
        Commands::Comments(comments) => {
            let target = comments
                .target()
                .context("Either --task or --project is required")?;
            list_comments(&config, &target).await
        }
        Commands::Project { id } => {
            let project = connect(&config)?.get_project(&Id::from(id.as_str())).await?;
            println!("{}\t{}", project.id, project.name);
            if let Some(parent) = &project.parent_id {
                println!("parent\t{}", parent);
            }
            println!("order\t{}", project.order);
            if let Some(url) = &project.url {
                println!("url\t{}", url);
            }
            Ok(())
        }
        Commands::Label { id } => {
            let label = connect(&config)?.get_label(&Id::from(id.as_str())).await?;
            println!("{}\t{}", label.id, label.name);
            println!("order\t{}", label.order);
            Ok(())
        }
        Commands::Task { id } => {
            let task = connect(&config)?.get_active_task(&Id::from(id.as_str())).await?;
            show_task(&task);
            Ok(())
        }
        Commands::ShowConfig => Ok(()),
    }
}

async fn run_report_command(config: &ClientConfig, args: ReportArgs) -> Result<()> {
    let source = open_source(config, args.snapshot.as_deref())?;

    let query = args.task_query();

    let priorities = if args.priorities.is_empty() {
        config.report.priorities.clone()
    } else {
        args.priorities
    };
    let criteria = FilterCriteria {
        label: args.label,
        project: args.project,
        priorities: priorities.into_iter().collect(),
    };

    let shape = args.shape.unwrap_or(config.report.shape);
    let format = args.format.unwrap_or(config.report.format);
    debug!("Building {} report as {}", shape, format);

    let palette = Palette::standard();
    let report = run_report(source.as_ref(), &query, &criteria, shape, &palette).await?;

    let output = render::render(&report, format).context("Failed to render report")?;
    print!("{}", output);
    if !output.ends_with('\n') {
        println!();
    }
    Ok(())
}

async fn list_projects(config: &ClientConfig, snapshot: Option<&Path>) -> Result<()> {
    let source = open_source(config, snapshot)?;
    let catalog = ProjectCatalog::build(source.fetch_projects().await?);

    for project in catalog.sorted_by_order() {
        match &project.parent_id {
            Some(parent) => println!("{}\t{}\t(parent {})", project.id, project.name, parent),
            None => println!("{}\t{}", project.id, project.name),
        }
    }
    Ok(())
}

async fn list_labels(config: &ClientConfig, snapshot: Option<&Path>) -> Result<()> {
    let source = open_source(config, snapshot)?;
    let catalog = LabelCatalog::build(source.fetch_labels().await?);

    for label in catalog.sorted_by_order() {
        println!("{}\t{}", label.id, label.name);
    }
    Ok(())
}

fn show_task(task: &Task) {
    println!("{}\t{}", task.id, task.content);
    if !task.description.is_empty() {
        println!("description\t{}", task.description);
    }
    println!("project\t{}", task.project_id);
    if let Some(priority) = task.display_priority() {
        println!("priority\tP{}", priority.value());
    }
    if !task.due_text().is_empty() {
        println!("due\t{}", task.due_text());
    }
    if let Some(url) = &task.url {
        println!("url\t{}", url);
    }
}

async fn list_comments(config: &ClientConfig, target: &CommentTarget) -> Result<()> {
    let client = connect(config)?;
    for comment in client.get_comments(target).await? {
        let posted = comment
            .posted_at
            .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        println!("{}\t{}\t{}", comment.id, posted, comment.content);
    }
    Ok(())
}

fn open_source(config: &ClientConfig, snapshot: Option<&Path>) -> Result<Box<dyn TaskSource>> {
    match snapshot {
        Some(path) => {
            let source = SnapshotSource::from_json_file(path)
                .with_context(|| format!("Failed to load snapshot {:?}", path))?;
            Ok(Box::new(source))
        }
        None => Ok(Box::new(connect(config)?)),
    }
}

fn connect(config: &ClientConfig) -> Result<TodoistClient> {
    let base_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let token = config.resolve_token(std::env::var(env::vars::TOKEN).ok(), &base_dir)?;
    TodoistClient::new(&config.api_base_url, &token, config.timeout())
        .context("Failed to create API client")
}
