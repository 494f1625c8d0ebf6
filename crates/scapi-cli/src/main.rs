use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use scapi_cli::{generate, init_tracing, load_api, parse_file, Language};
use scapi_codegen::Surface;

#[derive(Parser, Debug)]
#[command(name = "scapi")]
#[command(about = "scapi: API definitions to Go and TypeScript client/server scaffolding")]
struct Cli {
    /// Log every pipeline stage to stderr (overrides SCAPI_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse, translate and validate a definition file
    Validate {
        /// Path to .scapi source file
        file: PathBuf,

        /// Print an indented listing of the endpoints
        #[arg(long)]
        summary: bool,

        /// Print the validated model as JSON
        #[arg(long, conflicts_with = "summary")]
        json: bool,

        /// Base URL for generated clients
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Generate types, optionally followed by a server or client surface
    Generate {
        #[arg(value_enum)]
        lang: Lang,

        #[arg(value_enum)]
        surface: SurfaceArg,

        /// Path to .scapi source file
        file: PathBuf,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Base URL for generated clients
        #[arg(long)]
        base_url: Option<String>,

        /// Go package name
        #[arg(long, default_value = "main")]
        package: String,
    },

    /// Parse a source file and dump the AST
    Parse {
        /// Path to .scapi source file
        file: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Pretty)]
        format: Format,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Lang {
    Go,
    Ts,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SurfaceArg {
    Types,
    Server,
    Client,
}

#[derive(ValueEnum, Clone, Debug)]
enum Format {
    Pretty,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Validate {
            file,
            summary,
            json,
            base_url,
        } => {
            let api = load_api(&file, base_url.as_deref())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&api)?);
            } else {
                println!("Validation successful");
                if summary {
                    print!("{}", api.summary());
                }
            }
        }

        Commands::Generate {
            lang,
            surface,
            file,
            output,
            base_url,
            package,
        } => {
            let api = load_api(&file, base_url.as_deref())?;
            let language = match lang {
                Lang::Go => Language::Go,
                Lang::Ts => Language::TypeScript,
            };
            let surface = match surface {
                SurfaceArg::Types => Surface::Types,
                SurfaceArg::Server => Surface::Server,
                SurfaceArg::Client => Surface::Client,
            };
            let code = generate(&api, language, surface, &package)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, code)
                        .with_context(|| format!("failed to write '{}'", path.display()))?;
                    eprintln!("Wrote {}", path.display());
                }
                None => print!("{code}"),
            }
        }

        Commands::Parse { file, format } => {
            let spec = parse_file(&file)?;
            match format {
                Format::Pretty => println!("{:#?}", spec),
                Format::Json => println!("{}", serde_json::to_string_pretty(&spec)?),
            }
        }
    }

    Ok(())
}
