//! LODsyndesisIE command-line client — entry point.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use lodsyndesis_ie::{
    AnnotateQuery, DatasetDiscoveryQuery, EntitiesQuery, ErTools, LodSyndesisClient,
    MeasurementType, Service,
};
use lodsyndesis_ie_cli::{demo, execute, output, repl, resolve_client_config, Request};

#[derive(Parser)]
#[command(
    name = "lodsyndesis-ie",
    about = "LODsyndesisIE client — linked-data entities, RDFa, facts and datasets for any text",
    version
)]
struct Cli {
    /// Service endpoint. Also reads LODSYNDESIS_IE_URL.
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Per-request timeout in milliseconds. Also reads LODSYNDESIS_IE_TIMEOUT_MS.
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output results as JSON (machine-readable)
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recognize the entities of a text.
    Entities {
        text: String,

        /// Entity recognition tools.
        #[arg(short, long, default_value = "WAT")]
        tools: ErTools,

        /// Include the equivalent URIs of each entity.
        #[arg(long)]
        equivalent_uris: bool,

        /// Include the provenance of each entity.
        #[arg(long)]
        provenance: bool,

        /// Print the tab-separated table instead of the entity listing.
        #[arg(long)]
        raw: bool,
    },

    /// Annotate a text in HTML+RDFa.
    Rdfa {
        text: String,

        /// Entity recognition tools.
        #[arg(short, long, default_value = "WAT")]
        tools: ErTools,
    },

    /// Triples (N-Quads) of the entities recognized in a text.
    Triples {
        text: String,

        /// Entity recognition tools.
        #[arg(short, long, default_value = "WAT")]
        tools: ErTools,
    },

    /// Related facts (N-Triples) of a text.
    Facts {
        text: String,

        /// Entity recognition tools.
        #[arg(short, long, default_value = "WAT")]
        tools: ErTools,
    },

    /// Top-K subsets of datasets for the entities of a text.
    Datasets {
        text: String,

        /// Entity recognition tools.
        #[arg(short, long, default_value = "WAT")]
        tools: ErTools,

        /// Datasets per subset: 2 for pairs, 3 for triads, up to 5.
        #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..=5))]
        subset_size: u32,

        /// Number of subsets to return.
        #[arg(long, default_value = "10", value_parser = clap::value_parser!(u32).range(1..))]
        top_k: u32,

        /// Ranking: coverage or commonalities.
        #[arg(long, default_value = "coverage")]
        measurement: MeasurementType,
    },

    /// Run every service over the sample texts.
    Demo,

    /// Launch interactive REPL mode.
    Repl,

    /// Generate shell completion scripts.
    ///
    /// Examples:
    ///   lodsyndesis-ie completions bash > ~/.local/share/bash-completion/completions/lodsyndesis-ie
    ///   lodsyndesis-ie completions zsh > ~/.zfunc/_lodsyndesis-ie
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    output::set_json(cli.json);

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "lodsyndesis-ie", &mut std::io::stdout());
        return Ok(());
    }

    let config = resolve_client_config(cli.endpoint.as_deref(), cli.timeout_ms);
    tracing::debug!(endpoint = %config.base_url, timeout_ms = config.timeout_ms, "client config");
    let client = LodSyndesisClient::with_config(config)?;

    let request = match cli.command {
        Commands::Entities {
            text,
            tools,
            equivalent_uris,
            provenance,
            raw,
        } => Request::Entities {
            query: EntitiesQuery::new(text, tools)
                .with_equivalent_uris(equivalent_uris)
                .with_provenance(provenance),
            raw,
        },
        Commands::Rdfa { text, tools } => Request::Annotate {
            service: Service::ExportAsRdfa,
            query: AnnotateQuery::new(text, tools),
        },
        Commands::Triples { text, tools } => Request::Annotate {
            service: Service::GetTriplesOfEntities,
            query: AnnotateQuery::new(text, tools),
        },
        Commands::Facts { text, tools } => Request::Annotate {
            service: Service::FindRelatedFacts,
            query: AnnotateQuery::new(text, tools),
        },
        Commands::Datasets {
            text,
            tools,
            subset_size,
            top_k,
            measurement,
        } => Request::Datasets {
            query: DatasetDiscoveryQuery::new(text, tools)
                .with_subset_size(subset_size)
                .with_top_k(top_k)
                .with_measurement(measurement),
        },
        Commands::Demo => return demo::run(&client).await,
        Commands::Repl => {
            let handle = tokio::runtime::Handle::current();
            return tokio::task::block_in_place(move || repl::run(client, &handle));
        }
        Commands::Completions { .. } => return Ok(()),
    };

    let outcome = execute(&client, &request).await?;
    output::emit(&outcome);

    Ok(())
}
