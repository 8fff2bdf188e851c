mod cli;

use std::fmt::Write as FmtWrite;
use std::io::{self, Cursor, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use cli::{Commands, OutputFormat};
use handoff_lib::config::ENV_PROJECT_ID;
use handoff_lib::logging::init_logging;
use handoff_lib::types::ChangeEntry;
use handoff_lib::{
    build_documentation_object, generate_changelog, load_exportables, resolve_token,
    transform_tokens, zip_assets, ChangelogRecord, Config, DiffOutput, DocumentationObject,
    ErrorOutput, ExportableDefinition, ExtractionCounts, FetchOutput, FigmaClient, HandoffError,
    HandoffOutput, TransformOutput, TransformedTokens, HANDOFF_OUTPUT_VERSION,
};

const TOKENS_FILE: &str = "tokens.json";
const CHANGELOG_FILE: &str = "changelog.json";
const ICONS_ZIP: &str = "icons.zip";
const LOGOS_ZIP: &str = "logos.zip";
const CSS_FILE: &str = "tokens.css";
const SCSS_FILE: &str = "tokens.scss";

#[tokio::main]
async fn main() -> ExitCode {
    run().await
}

async fn run() -> ExitCode {
    let args = cli::parse();
    init_logging(args.verbose);

    match args.command {
        Commands::Fetch {
            project_id,
            token,
            output_dir,
            exportables,
            format,
            output,
        } => {
            let config = match load_config(args.config.as_deref()) {
                Ok(cfg) => cfg,
                Err(err) => return render_error(err, format, output),
            };
            let request = FetchRequest {
                project_id,
                token,
                output_dir,
                exportables,
            };
            match run_fetch(&config, request).await {
                Ok(body) => finish(&HandoffOutput::Fetch(body), format, output),
                Err(err) => render_error(err, format, output),
            }
        }
        Commands::Diff {
            prev,
            new,
            format,
            output,
        } => match run_diff(&prev, &new) {
            Ok(body) => finish(&HandoffOutput::Diff(body), format, output),
            Err(err) => render_error(err, format, output),
        },
        Commands::Transform {
            input,
            output_dir,
            exportables,
            format,
            output,
        } => {
            let config = match load_config(args.config.as_deref()) {
                Ok(cfg) => cfg,
                Err(err) => return render_error(err, format, output),
            };
            match run_transform(&config, &input, output_dir, exportables) {
                Ok(body) => finish(&HandoffOutput::Transform(body), format, output),
                Err(err) => render_error(err, format, output),
            }
        }
    }
}

fn finish(body: &HandoffOutput, format: OutputFormat, output: Option<PathBuf>) -> ExitCode {
    if let Err(err) = write_output(body, format, output.clone()) {
        return render_error(HandoffError::Config(err.to_string()), format, output);
    }
    ExitCode::SUCCESS
}

fn load_config(path: Option<&Path>) -> Result<Config, HandoffError> {
    let mut cfg = if let Some(p) = path {
        Config::from_toml_file(p).map_err(|e| {
            HandoffError::Config(format!("Failed to read config {}: {}", p.display(), e))
        })?
    } else {
        Config::default()
    };
    cfg.apply_env(|key| std::env::var(key).ok());

    cfg.validate()
        .map_err(|e| HandoffError::Config(format!("Invalid config: {}", e)))?;
    tracing::debug!(
        source = %path.map(|p| p.display().to_string()).unwrap_or_else(|| "defaults".into()),
        base_url = %cfg.figma.base_url,
        retries = cfg.figma.retries,
        "effective config"
    );
    Ok(cfg)
}

struct FetchRequest {
    project_id: Option<String>,
    token: Option<String>,
    output_dir: Option<PathBuf>,
    exportables: Option<PathBuf>,
}

fn resolve_project_id(cli: Option<String>, config: &Config) -> Result<String, HandoffError> {
    cli.or_else(|| config.project_id.clone())
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| {
            HandoffError::Config(format!(
                "Missing Figma file id; pass --project-id, set project_id in the config or {ENV_PROJECT_ID}"
            ))
        })
}

async fn run_fetch(config: &Config, request: FetchRequest) -> Result<FetchOutput, HandoffError> {
    let project_id = resolve_project_id(request.project_id, config)?;
    let token = resolve_token(request.token, |key| std::env::var(key).ok())?;
    let output_dir = request
        .output_dir
        .unwrap_or_else(|| config.output_dir.clone());
    let exportables_dir = request
        .exportables
        .unwrap_or_else(|| config.exportables_dir.clone());

    let exportables = load_exportables(&exportables_dir, &config.exportable_defaults())?;
    tracing::info!(
        project = %project_id,
        exportables = exportables.len(),
        "fetching Figma file"
    );

    let client = FigmaClient::new(project_id.clone(), token, &config.figma)?;
    let doc =
        build_documentation_object(&client, &exportables, config.figma.asset_batch_size).await?;
    tracing::debug!(requests = client.request_count(), "figma requests sent");

    // Render everything before touching the output directory.
    let snapshot = serde_json::to_string_pretty(&doc)?;
    let icons_zip = zip_assets(Cursor::new(Vec::new()), &doc.assets.icons)?.into_inner();
    let logos_zip = zip_assets(Cursor::new(Vec::new()), &doc.assets.logos)?.into_inner();
    let stylesheets = transform_tokens(&doc, &exportables, &config.transformer)?;

    std::fs::create_dir_all(&output_dir)?;
    let tokens_path = output_dir.join(TOKENS_FILE);
    let previous = read_previous_snapshot(&tokens_path);
    let changelog = generate_changelog(previous.as_ref(), &doc);

    let mut files = Vec::new();
    for (name, bytes) in [(ICONS_ZIP, &icons_zip), (LOGOS_ZIP, &logos_zip)] {
        let path = output_dir.join(name);
        std::fs::write(&path, bytes)?;
        files.push(path);
    }
    files.extend(write_stylesheets(&stylesheets, &output_dir)?);

    std::fs::write(&tokens_path, snapshot)?;
    files.push(tokens_path);

    if let Some(record) = &changelog {
        let path = output_dir.join(CHANGELOG_FILE);
        append_changelog(&path, record)?;
        files.push(path);
    }

    Ok(FetchOutput {
        version: HANDOFF_OUTPUT_VERSION.to_string(),
        project_id,
        output_dir,
        counts: counts(&doc),
        changelog: changelog.is_some(),
        requests: client.request_count(),
        files,
    })
}

fn run_diff(prev: &Path, new: &Path) -> Result<DiffOutput, HandoffError> {
    let previous = read_documentation(prev)?;
    let current = read_documentation(new)?;
    Ok(DiffOutput {
        version: HANDOFF_OUTPUT_VERSION.to_string(),
        prev: prev.to_path_buf(),
        new: new.to_path_buf(),
        changelog: generate_changelog(Some(&previous), &current),
    })
}

fn run_transform(
    config: &Config,
    input: &Path,
    output_dir: Option<PathBuf>,
    exportables: Option<PathBuf>,
) -> Result<TransformOutput, HandoffError> {
    let doc = read_documentation(input)?;
    let exportables_dir = exportables.unwrap_or_else(|| config.exportables_dir.clone());
    let exportables = load_exportables(&exportables_dir, &config.exportable_defaults())?;
    let output_dir = output_dir.unwrap_or_else(|| {
        input
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    });
    std::fs::create_dir_all(&output_dir)?;
    let tokens = transform_tokens(&doc, &exportables, &config.transformer)?;
    let files = write_stylesheets(&tokens, &output_dir)?;
    Ok(TransformOutput {
        version: HANDOFF_OUTPUT_VERSION.to_string(),
        input: input.to_path_buf(),
        variables: tokens.variable_count(),
        files,
    })
}

fn write_stylesheets(
    tokens: &TransformedTokens,
    output_dir: &Path,
) -> Result<Vec<PathBuf>, HandoffError> {
    let css_path = output_dir.join(CSS_FILE);
    let scss_path = output_dir.join(SCSS_FILE);
    std::fs::write(&css_path, tokens.to_css())?;
    std::fs::write(&scss_path, tokens.to_scss())?;
    Ok(vec![css_path, scss_path])
}

fn read_documentation(path: &Path) -> Result<DocumentationObject, HandoffError> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        HandoffError::Config(format!("Failed to read {}: {}", path.display(), e))
    })?;
    Ok(serde_json::from_str(&raw)?)
}

/// The last written snapshot; unreadable snapshots diff as empty.
fn read_previous_snapshot(path: &Path) -> Option<DocumentationObject> {
    if !path.exists() {
        return None;
    }
    match read_documentation(path) {
        Ok(doc) => Some(doc),
        Err(err) => {
            tracing::warn!("ignoring previous snapshot {}: {}", path.display(), err);
            None
        }
    }
}

/// Prepends `record` to the JSON array at `path`, newest first.
fn append_changelog(path: &Path, record: &ChangelogRecord) -> Result<(), HandoffError> {
    let mut history: Vec<ChangelogRecord> = if path.exists() {
        serde_json::from_str(&std::fs::read_to_string(path)?)?
    } else {
        Vec::new()
    };
    history.insert(0, record.clone());
    std::fs::write(path, serde_json::to_string_pretty(&history)?)?;
    Ok(())
}

fn counts(doc: &DocumentationObject) -> ExtractionCounts {
    ExtractionCounts {
        colors: doc.design.color.len(),
        typography: doc.design.typography.len(),
        effects: doc.design.effect.len(),
        components: doc.components.values().map(Vec::len).sum(),
        icons: doc.assets.icons.len(),
        logos: doc.assets.logos.len(),
    }
}

fn write_output(
    body: &HandoffOutput,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => write_json_output(body, output.as_deref())?,
        OutputFormat::Pretty => write_pretty_output(body, output.as_deref())?,
    };
    Ok(())
}

fn render_error(err: HandoffError, format: OutputFormat, output: Option<PathBuf>) -> ExitCode {
    tracing::debug!("fatal: {err:?}");
    let error_payload = err.to_payload();
    let payload = HandoffOutput::Error(ErrorOutput {
        version: HANDOFF_OUTPUT_VERSION.to_string(),
        message: Some(error_payload.message.clone()),
        error: error_payload,
    });

    match format {
        OutputFormat::Json => {
            let content =
                serde_json::to_string(&payload).unwrap_or_else(|_| "{\"mode\":\"error\"}".into());
            if let Some(path) = output {
                if let Err(write_err) = std::fs::write(&path, &content) {
                    eprintln!("Failed to write error output: {}", write_err);
                    println!("{content}");
                }
            } else {
                println!("{content}");
            }
        }
        OutputFormat::Pretty => {
            if let Err(write_err) = write_pretty_output(&payload, output.as_deref()) {
                eprintln!("Failed to write error output: {}", write_err);
            }
        }
    };

    ExitCode::from(2)
}

fn write_json_output(
    body: &HandoffOutput,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let content = serde_json::to_string(body)?;
    if let Some(path) = output {
        std::fs::write(path, content)?;
    } else {
        println!("{content}");
    }
    Ok(())
}

fn write_pretty_output(body: &HandoffOutput, output: Option<&Path>) -> io::Result<()> {
    let stdout_is_tty = std::io::stdout().is_terminal();
    let use_human = output.is_none() && stdout_is_tty;

    if use_human {
        let content = format_pretty(body, true);
        println!("{content}");
        return Ok(());
    }

    // Non-tty or file output: keep JSON shape for pipelines/files.
    let content =
        serde_json::to_string_pretty(body).unwrap_or_else(|_| "{\"mode\":\"error\"}".to_string());
    if let Some(path) = output {
        std::fs::write(path, &content)?;
    } else {
        println!("{content}");
    }
    Ok(())
}

fn format_pretty(body: &HandoffOutput, colorize: bool) -> String {
    match body {
        HandoffOutput::Fetch(out) => {
            let mut buf = String::new();
            let header = color("[FETCH]", "32", colorize);
            writeln!(
                buf,
                "{} {} -> {}",
                header,
                out.project_id,
                out.output_dir.display()
            )
            .ok();
            let c = &out.counts;
            writeln!(
                buf,
                "Design: {} colors, {} typography, {} effects",
                c.colors, c.typography, c.effects
            )
            .ok();
            writeln!(buf, "Components: {}", c.components).ok();
            writeln!(buf, "Assets: {} icons, {} logos", c.icons, c.logos).ok();
            let changelog = if out.changelog {
                color("recorded", "33", colorize)
            } else {
                "no changes".to_string()
            };
            writeln!(buf, "Changelog: {changelog}").ok();
            writeln!(buf, "Requests: {}", out.requests).ok();
            buf
        }
        HandoffOutput::Diff(out) => {
            let mut buf = String::new();
            let header = color("[DIFF]", "36", colorize);
            writeln!(
                buf,
                "{} {} -> {}",
                header,
                out.prev.display(),
                out.new.display()
            )
            .ok();
            match &out.changelog {
                None => {
                    writeln!(buf, "No changes").ok();
                }
                Some(record) => {
                    if let Some(design) = &record.design {
                        summarize(&mut buf, "colors", design.colors.as_deref());
                        summarize(&mut buf, "typography", design.typography.as_deref());
                    }
                    if let Some(assets) = &record.assets {
                        summarize(&mut buf, "icons", assets.icons.as_deref());
                        summarize(&mut buf, "logos", assets.logos.as_deref());
                    }
                }
            }
            buf
        }
        HandoffOutput::Transform(out) => {
            let mut buf = String::new();
            let header = color("[TRANSFORM]", "34", colorize);
            writeln!(
                buf,
                "{} {} variables from {}",
                header,
                out.variables,
                out.input.display()
            )
            .ok();
            for file in &out.files {
                writeln!(buf, "- {}", file.display()).ok();
            }
            buf
        }
        HandoffOutput::Error(out) => {
            let mut buf = String::new();
            let header = color("[ERROR]", "31", colorize);
            let message = out
                .message
                .as_deref()
                .unwrap_or_else(|| out.error.message.as_str());
            writeln!(buf, "{} {}", header, message).ok();
            if let Some(remediation) = &out.error.remediation {
                writeln!(buf, "Hint: {}", remediation).ok();
            }
            buf
        }
    }
}

fn summarize<T>(buf: &mut String, label: &str, entries: Option<&[ChangeEntry<T>]>) {
    let Some(entries) = entries else {
        return;
    };
    let (mut added, mut changed, mut deleted) = (0, 0, 0);
    for entry in entries {
        match entry {
            ChangeEntry::Add { .. } => added += 1,
            ChangeEntry::Change { .. } => changed += 1,
            ChangeEntry::Delete { .. } => deleted += 1,
        }
    }
    writeln!(
        buf,
        "- {:12} +{} ~{} -{}",
        label, added, changed, deleted
    )
    .ok();
}

fn color(text: &str, code: &str, colorize: bool) -> String {
    if colorize {
        format!("\x1b[{}m{}\x1b[0m", code, text)
    } else {
        text.to_string()
    }
}
