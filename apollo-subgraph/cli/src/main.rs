use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use apollo_subgraph::EntitiesRequest;
use apollo_subgraph::SchemaMode;
use apollo_subgraph::SubgraphSchema;
use clap::Parser;
use serde_json_bytes::Value;
use serde_json_bytes::json;
use tracing_subscriber::EnvFilter;

/// CLI arguments. See <https://docs.rs/clap/latest/clap/_derive/index.html>
#[derive(Parser)]
struct Args {
    /// Log filter, overridden by `RUST_LOG`
    #[arg(long, default_value = "warn")]
    log: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Composes a subgraph schema with the federation definitions and prints it
    Compose {
        /// The path to the subgraph schema file, or `-` for stdin
        schema: PathBuf,
        /// `service` or `gateway`
        #[arg(long, default_value_t = SchemaMode::Service)]
        mode: SchemaMode,
    },
    /// Prints the SDL the `_service` field of a subgraph returns
    Sdl {
        /// The path to the subgraph schema file, or `-` for stdin
        schema: PathBuf,
    },
    /// Resolves entity representations through the `_entities` field and prints the response
    Entities {
        /// The path to the subgraph schema file, or `-` for stdin
        schema: PathBuf,
        /// A JSON file with a list of representations, or the `_entities` arguments object
        representations: PathBuf,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let env_filter = std::env::var("RUST_LOG").ok().unwrap_or(args.log);
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&env_filter).context("could not parse log")?)
        .with_writer(io::stderr)
        .init();

    match args.command {
        Command::Compose { schema, mode } => compose(&schema, mode),
        Command::Sdl { schema } => sdl(&schema),
        Command::Entities {
            schema,
            representations,
        } => entities(&schema, &representations),
    }
}

fn read_input(input_path: &Path) -> Result<String> {
    if input_path == Path::new("-") {
        io::read_to_string(io::stdin()).context("could not read stdin")
    } else {
        fs::read_to_string(input_path)
            .with_context(|| format!("could not read {}", input_path.display()))
    }
}

fn build(schema_path: &Path, mode: SchemaMode) -> Result<SubgraphSchema> {
    let source = read_input(schema_path)?;
    let path = if schema_path == Path::new("-") {
        Path::new("stdin.graphql")
    } else {
        schema_path
    };
    Ok(SubgraphSchema::builder()
        .mode(mode)
        .parse(source, path)
        .build()?)
}

fn compose(schema_path: &Path, mode: SchemaMode) -> Result<()> {
    let schema = build(schema_path, mode)?;
    print!("{}", schema.schema());
    Ok(())
}

fn sdl(schema_path: &Path) -> Result<()> {
    let schema = build(schema_path, SchemaMode::Service)?;
    print!("{}", schema.service()?.sdl);
    Ok(())
}

fn entities(schema_path: &Path, representations_path: &Path) -> Result<()> {
    let schema = build(schema_path, SchemaMode::Service)?;
    let input: Value = serde_json::from_str(&read_input(representations_path)?)
        .context("representations are not valid JSON")?;
    let request = match input {
        Value::Array(representations) => EntitiesRequest::new(representations),
        Value::Object(arguments) => EntitiesRequest::from_arguments(arguments)?,
        _ => anyhow::bail!("expected a list of representations or an arguments object"),
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let results = runtime.block_on(schema.resolve_entities(&request))?;

    let mut entities = Vec::with_capacity(results.len());
    let mut errors = Vec::new();
    for (index, result) in results.into_iter().enumerate() {
        match result {
            Ok(entity) => entities.push(entity.value),
            Err(error) => {
                entities.push(Value::Null);
                errors.push(error.to_graphql_error(index));
            }
        }
    }
    let response = if errors.is_empty() {
        json!({ "data": { "_entities": entities } })
    } else {
        json!({ "data": { "_entities": entities }, "errors": errors })
    };
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
