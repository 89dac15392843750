use kurso::cli::{Cli, Commands, ConfigAction};
use kurso::config::Config;
use kurso::curriculum::{CurriculumGenerator, GroqClient};
use kurso::embedding::FastEmbedProvider;
use kurso::error::{KursoError, Result};
use kurso::export::PdfExporter;
use kurso::ingest::Ingestor;
use kurso::retrieval::Retriever;
use kurso::store::CollectionStore;
use std::path::{Path, PathBuf};
use std::sync::Arc;

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    init_logging(cli.verbose);

    match cli.command {
        Commands::Ingest { pdf, collection } => {
            let config = load_config(cli.config)?;
            cmd_ingest(&config, &pdf, collection)?;
        }
        Commands::Context {
            query,
            collection,
            top_k,
        } => {
            let config = load_config(cli.config)?;
            cmd_context(&config, &query, collection, top_k)?;
        }
        Commands::Outline {
            topic,
            collection,
            top_k,
            output,
        } => {
            let config = load_config(cli.config)?;
            cmd_outline(&config, &topic, collection, top_k, output)?;
        }
        Commands::Lessons { outline, output } => {
            let config = load_config(cli.config)?;
            let generator = make_generator(&config)?;
            let subtopics = read_input(&outline)?;
            write_output(&generator.plan_lessons(&subtopics)?, output)?;
        }
        Commands::Quiz { plan, output } => {
            let config = load_config(cli.config)?;
            let generator = make_generator(&config)?;
            let plan = read_input(&plan)?;
            write_output(&generator.generate_quiz(&plan)?, output)?;
        }
        Commands::Resources { plan, output } => {
            let config = load_config(cli.config)?;
            let generator = make_generator(&config)?;
            let plan = read_input(&plan)?;
            write_output(&generator.recommend_resources(&plan)?, output)?;
        }
        Commands::Assignments { outline, output } => {
            let config = load_config(cli.config)?;
            let generator = make_generator(&config)?;
            let subtopics = read_input(&outline)?;
            write_output(&generator.make_assignments(&subtopics)?, output)?;
        }
        Commands::Export { html } => {
            let config = load_config(cli.config)?;
            cmd_export(&config, &html)?;
        }
        Commands::Config { action } => {
            cmd_config(cli.config, action)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_filter = if verbose { "kurso=debug" } else { "kurso=info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    fmt().with_env_filter(filter).with_target(false).init();
}

fn cmd_ingest(config: &Config, pdf: &Path, collection: Option<String>) -> Result<()> {
    let collection = collection.unwrap_or_else(|| config.storage.default_collection.clone());

    let provider = make_provider(config)?;
    let store = open_store(config)?;
    let ingestor = Ingestor::new(provider, store, config.chunking.clone());

    println!("Ingesting {} into '{}'...", pdf.display(), collection);

    let report = ingestor.ingest_file(pdf, &collection)?;

    println!("✓ Extracted {} characters", report.characters);
    println!(
        "✓ Indexed {} chunks ({}D embeddings)",
        report.chunks, report.dimension
    );

    Ok(())
}

fn cmd_context(
    config: &Config,
    query: &str,
    collection: Option<String>,
    top_k: Option<usize>,
) -> Result<()> {
    let collection = collection.unwrap_or_else(|| config.storage.default_collection.clone());
    let top_k = top_k.unwrap_or(config.retrieval.top_k);

    let provider = make_provider(config)?;
    let store = open_store(config)?;
    let retriever = Retriever::new(provider, store);

    let context = retriever.relevant_context(query, &collection, top_k)?;
    println!("{}", context);

    Ok(())
}

fn cmd_outline(
    config: &Config,
    topic: &str,
    collection: Option<String>,
    top_k: Option<usize>,
    output: Option<PathBuf>,
) -> Result<()> {
    let collection = collection.unwrap_or_else(|| config.storage.default_collection.clone());
    let top_k = top_k.unwrap_or(config.retrieval.top_k);

    let provider = make_provider(config)?;
    let store = open_store(config)?;
    let retriever = Retriever::new(provider, store);

    tracing::info!("Retrieving syllabus context for '{}'", topic);
    let context = retriever.relevant_context(topic, &collection, top_k)?;

    let generator = make_generator(config)?;
    let outline = generator.decompose_topic(topic, &context)?;

    write_output(&outline, output)
}

fn cmd_export(config: &Config, html_path: &Path) -> Result<()> {
    let html = read_input(html_path)?;

    let exporter = PdfExporter::new(&config.export.converter);
    let pdf_path = exporter.export_to_pdf(&html)?;

    println!("✓ PDF written to {}", pdf_path.display());

    Ok(())
}

fn cmd_config(config_path: Option<PathBuf>, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = load_config(config_path)?;
            let json = serde_json::to_string_pretty(&config).map_err(|e| KursoError::Json {
                source: e,
                context: "Failed to serialize config".to_string(),
            })?;
            println!("{}", json);
        }
        ConfigAction::Validate { file } => {
            let path = match file.or(config_path) {
                Some(path) => path,
                None => Config::default_path()?,
            };
            let config = Config::load(&path)?;
            println!("✓ Configuration is valid");
            println!("  Schema version: {}", config.meta.schema_version);
        }
        ConfigAction::Init { force } => {
            let path = match config_path {
                Some(path) => path,
                None => Config::default_path()?,
            };

            if path.exists() && !force {
                println!("Configuration file already exists at: {}", path.display());
                println!("Use --force to overwrite");
                return Ok(());
            }

            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| KursoError::Io {
                    source: e,
                    context: format!("Failed to create config directory: {:?}", parent),
                })?;
            }

            let config = Config::default();
            config.save(&path)?;

            println!("✓ Configuration initialized at: {}", path.display());
        }
    }

    Ok(())
}

fn load_config(config_path: Option<PathBuf>) -> Result<Config> {
    let path = match config_path {
        Some(path) => path,
        None => Config::default_path()?,
    };

    if !path.exists() {
        tracing::warn!(
            "Config file not found, using defaults. Run 'kurso config init' to create one."
        );
        return Ok(Config::default());
    }

    Config::load(&path)
}

fn make_provider(config: &Config) -> Result<Arc<FastEmbedProvider>> {
    let cache_dir = config
        .embedding
        .cache_dir
        .as_deref()
        .map(expand_path)
        .transpose()?;

    let provider = FastEmbedProvider::new(&config.embedding.model, cache_dir.as_deref())?;
    Ok(Arc::new(provider))
}

fn open_store(config: &Config) -> Result<Arc<CollectionStore>> {
    let data_dir = expand_path(&config.storage.data_dir)?;
    let db_path = data_dir.join("collections.db");
    let store = CollectionStore::new(&db_path, config.index.clone())?;
    Ok(Arc::new(store))
}

fn make_generator(config: &Config) -> Result<CurriculumGenerator> {
    let client = GroqClient::new(
        &config.llm.api_base,
        &config.llm.api_key_env,
        config.llm.timeout_secs,
    )?;
    Ok(CurriculumGenerator::new(
        Arc::new(client),
        config.llm.model.clone(),
    ))
}

fn read_input(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| KursoError::Io {
        source: e,
        context: format!("Failed to read input file: {:?}", path),
    })
}

fn write_output(text: &str, output: Option<PathBuf>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(&path, text).map_err(|e| KursoError::Io {
                source: e,
                context: format!("Failed to write output file: {:?}", path),
            })?;
            println!("✓ Written to {}", path.display());
        }
        None => println!("{}", text),
    }

    Ok(())
}

fn expand_path(path: &Path) -> Result<PathBuf> {
    let path_str = path
        .to_str()
        .ok_or_else(|| KursoError::Config("Invalid path encoding".to_string()))?;

    if let Some(stripped) = path_str.strip_prefix("~/") {
        let home = dirs::home_dir()
            .ok_or_else(|| KursoError::Config("Cannot determine home directory".to_string()))?;
        Ok(home.join(stripped))
    } else {
        Ok(path.to_path_buf())
    }
}
