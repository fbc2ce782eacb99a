//! CLI entrypoint for llm-prism
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use prism_application::{
    ContextLoaderPort, ExecutionParams, ModelSelection, NoProgress, ProviderRegistry,
    QueryProgressNotifier, RunQueryInput, RunQueryUseCase, SelectModelsUseCase,
    WriteOutputInput, WriteOutputUseCase, WriteProgressNotifier,
};
use prism_domain::{ClassifyContext, Failure, PrismError, PromptContent, classify};
use prism_infrastructure::{
    ConfigLoader, EnvApiKeyResolver, FileConfig, LocalContextLoader, LocalFileSystem,
    build_registry,
};
use prism_presentation::output::processor::default_run_name;
use prism_presentation::{
    Cli, CompletionSummarizer, OutputConfig, OutputProcessor, Palette, ProgressReporter,
    SimpleProgress, Summary, SummaryInput, render_error,
};
use std::ffi::OsStr;
use std::io::IsTerminal;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let _log_guard = init_logging(&cli);

    info!("Starting llm-prism");

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Initialize logging based on verbosity level, honoring `RUST_LOG`
fn init_logging(cli: &Cli) -> Option<WorkerGuard> {
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let (file_layer, guard) = match &cli.log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            let name = path.file_name().unwrap_or(OsStr::new("prism.log"));
            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));
            (
                Some(fmt::layer().with_ansi(false).with_writer(writer)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    guard
}

async fn run(cli: Cli) -> Result<ExitCode> {
    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(ExitCode::SUCCESS);
    }

    let setup_palette = Palette::new(!cli.no_color);
    let setup_run_name = cli
        .run_name
        .clone()
        .unwrap_or_else(|| default_run_name(Utc::now()));

    let config = match load_config(&cli, setup_palette) {
        Ok(config) => config,
        Err(e) => return Ok(setup_failure(&e, setup_palette, &setup_run_name)),
    };

    let output_config = output_config(&config).apply_cli(&cli);
    let palette = Palette::new(output_config.color);

    // === Dependency Injection ===
    let keys = Arc::new(EnvApiKeyResolver::from_env(&config));
    let registry = Arc::new(build_registry(&config));
    debug!("Registered providers: {:?}", registry.provider_names());

    if let Some(provider) = &cli.list_models {
        return list_models(provider, &registry, &keys, palette).await;
    }

    let prompt = match read_prompt(&cli).await {
        Ok(prompt) => prompt,
        Err(e) => return Ok(setup_failure(&e, palette, &setup_run_name)),
    };

    // Model selection
    let selection = selection_from(&cli);
    let selected = match SelectModelsUseCase::new(keys.clone())
        .execute(&config.to_models_config(), &selection)
    {
        Ok(outcome) => outcome,
        Err(e) => return Ok(setup_failure(&e, palette, &setup_run_name)),
    };
    for warning in &selected.warnings {
        eprintln!("{} {}", palette.warn("warning:"), warning);
    }
    info!(
        "Selected {} model(s): {}",
        selected.models.len(),
        selected
            .models
            .iter()
            .map(|m| m.config_key())
            .collect::<Vec<_>>()
            .join(", ")
    );

    // Run location is fixed before dispatch so errors can point at it
    let generated_at = Utc::now();
    let processor = OutputProcessor::new(output_config.to_process_options(cli.run_name.clone()));
    let (run_name, directory) = processor.run_location(generated_at);
    let classify_context = ClassifyContext::new()
        .with_run_name(&run_name)
        .with_output_dir(&directory);

    let (query_progress, write_progress) = progress_notifiers(&output_config);

    // Query phase
    let mut input = RunQueryInput::new(selected.models, prompt)
        .with_params(execution_params(&cli, &config))
        .with_classify_context(classify_context.clone());
    if let Some(system_prompt) = &cli.system_prompt {
        input = input.with_system_prompt(system_prompt.clone());
    }
    let run = RunQueryUseCase::new(registry, keys)
        .execute_with_progress(input, query_progress.as_ref())
        .await;

    // Output phase
    let processed = processor.process(&run.responses, generated_at);
    println!("{}", processed.console_output);

    let write_input = WriteOutputInput::new(processed.files, &processed.directory_path)
        .throw_on_error(output_config.throw_on_error)
        .with_classify_context(classify_context);
    let written = WriteOutputUseCase::new(Arc::new(LocalFileSystem::new()))
        .execute_with_progress(write_input, write_progress.as_ref())
        .await;

    let summarizer = CompletionSummarizer::new(output_config.color);
    let (writes, write_failed) = match &written {
        Ok(result) => (Some(result), false),
        Err(e) => {
            eprintln!("{}", render_error(e.error(), palette));
            (e.partial_result(), true)
        }
    };
    let summary = summarizer.summarize(&SummaryInput::from_run(&run, writes, &processed.run_name));
    print_summary(&summary);

    let all_failed = run.total() > 0 && run.success_count() == 0;
    if all_failed || write_failed {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn load_config(cli: &Cli, palette: Palette) -> Result<FileConfig, PrismError> {
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref()).map_err(|e| {
            PrismError::config(format!("Failed to load configuration: {}", e))
                .with_suggestion("Check the TOML syntax of your prism.toml")
                .with_suggestion("Run with --show-config to see which files are read")
        })?
    };

    let issues = config.validate();
    let mut errors = Vec::new();
    for issue in &issues {
        if issue.is_error() {
            errors.push(issue.message.clone());
        } else {
            warn!("{}", issue.message);
            eprintln!("{} {}", palette.warn("warning:"), issue.message);
        }
    }
    if !errors.is_empty() {
        return Err(PrismError::config(format!(
            "Invalid configuration: {}",
            errors.join("; ")
        ))
        .with_suggestions(errors.iter().map(|e| format!("Fix: {}", e))));
    }

    Ok(config)
}

fn output_config(config: &FileConfig) -> OutputConfig {
    let file = &config.output;
    OutputConfig {
        directory: file.directory.clone(),
        include_metadata: file.include_metadata,
        group_prefix: file.group_prefix,
        use_table: file.use_table,
        color: file.color,
        throw_on_error: file.throw_on_error,
        show_progress: true,
    }
}

/// CLI limits take precedence over `[execution]`
fn execution_params(cli: &Cli, config: &FileConfig) -> ExecutionParams {
    let mut params = config.execution.to_params();
    if cli.max_concurrency.is_some() {
        params = params.with_max_concurrency(cli.max_concurrency);
    }
    if let Some(seconds) = cli.timeout {
        params = params.with_call_timeout(Some(Duration::from_secs(seconds)));
    }
    params
}

fn selection_from(cli: &Cli) -> ModelSelection {
    if let Some(key) = &cli.model {
        ModelSelection::Specific(key.clone())
    } else if !cli.models.is_empty() {
        ModelSelection::Explicit(cli.models.clone())
    } else if let Some(group) = &cli.group {
        ModelSelection::Group(group.clone())
    } else {
        ModelSelection::AllEnabled
    }
}

/// Prompt from the argument or `--prompt-file`, with context files appended
async fn read_prompt(cli: &Cli) -> Result<PromptContent, PrismError> {
    let context = ClassifyContext::new();

    let text = match (&cli.prompt, &cli.prompt_file) {
        (Some(prompt), _) => prompt.clone(),
        (None, Some(path)) => tokio::fs::read_to_string(path)
            .await
            .map_err(|e| classify(Failure::io_at(e, path), &context))?,
        (None, None) => {
            return Err(PrismError::config("No prompt given")
                .with_suggestion("Pass the prompt as an argument or use --prompt-file")
                .with_example("prism \"Explain ownership in Rust\""));
        }
    };

    let files = LocalContextLoader::new()
        .load(&cli.context)
        .await
        .map_err(|e| e.classify(&context))?;
    if !files.is_empty() {
        info!("Loaded {} context file(s)", files.len());
    }

    PromptContent::try_with_context(text, &files).ok_or_else(|| {
        PrismError::config("The prompt is empty")
            .with_suggestion("Provide a non-empty prompt")
    })
}

async fn list_models(
    provider: &str,
    registry: &ProviderRegistry,
    keys: &EnvApiKeyResolver,
    palette: Palette,
) -> Result<ExitCode> {
    let context = ClassifyContext::new();
    let client = match registry.get(provider) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("{}", render_error(&e.classify(&context), palette));
            return Ok(ExitCode::FAILURE);
        }
    };

    let Some(catalog) = client.catalog() else {
        eprintln!(
            "{} provider '{}' does not support listing models",
            palette.warn("warning:"),
            provider
        );
        return Ok(ExitCode::FAILURE);
    };

    let Some(api_key) = keys.provider_key(provider) else {
        let error = PrismError::api(format!("No API key found for provider '{}'", provider))
            .with_suggestion(format!(
                "Set {} in your environment",
                EnvApiKeyResolver::default_var(provider)
            ));
        eprintln!("{}", render_error(&error, palette));
        return Ok(ExitCode::FAILURE);
    };

    match catalog.list_models(&api_key).await {
        Ok(models) => {
            println!("{}", palette.heading(&format!("Models offered by {}:", provider)));
            for model in models {
                match model.description {
                    Some(description) => {
                        println!("  {}:{}  {}", provider, model.id, palette.dim(&description))
                    }
                    None => println!("  {}:{}", provider, model.id),
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("{}", render_error(&e.classify(&context), palette));
            Ok(ExitCode::FAILURE)
        }
    }
}

fn progress_notifiers(
    config: &OutputConfig,
) -> (Box<dyn QueryProgressNotifier>, Box<dyn WriteProgressNotifier>) {
    if !config.show_progress {
        (Box::new(NoProgress), Box::new(NoProgress))
    } else if std::io::stderr().is_terminal() {
        (
            Box::new(ProgressReporter::new(config.color)),
            Box::new(ProgressReporter::new(config.color)),
        )
    } else {
        (
            Box::new(SimpleProgress::new(false)),
            Box::new(SimpleProgress::new(false)),
        )
    }
}

/// Render a setup failure and the (empty) run summary
fn setup_failure(error: &PrismError, palette: Palette, run_name: &str) -> ExitCode {
    eprintln!("{}", render_error(error, palette));
    let summary = CompletionSummarizer::new(palette.is_enabled()).summarize(&SummaryInput {
        run_name: run_name.to_string(),
        ..Default::default()
    });
    print_summary(&summary);
    ExitCode::FAILURE
}

fn print_summary(summary: &Summary) {
    println!();
    println!("{}", summary.summary_text);
    if let Some(details) = &summary.error_details {
        println!();
        println!("Errors:");
        for line in details {
            println!("  - {}", line);
        }
    }
}
