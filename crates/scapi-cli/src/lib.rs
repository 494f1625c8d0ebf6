//! Command implementations behind the `scapi` binary.

use std::path::Path;

use anyhow::{bail, Context, Result};
use scapi_ast::ast::Spec;
use scapi_codegen::{GoGenerator, Generator, Surface, TsGenerator};
use scapi_parse::parse_str;
use scapi_spec::{ApiSpec, Translator};
use tracing::info;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Maximum source file size in bytes (1MB)
pub const MAX_SOURCE_SIZE: usize = 1_000_000;

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "SCAPI_LOG";

/// Install the stderr subscriber. `verbose` overrides the environment filter.
pub fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(filter);

    if tracing_subscriber::registry().with(fmt_layer).try_init().is_err() {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Go,
    TypeScript,
}

pub fn read_source(path: &Path) -> Result<String> {
    let src = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read '{}'", path.display()))?;
    if src.len() > MAX_SOURCE_SIZE {
        bail!(
            "source file exceeds {}MB limit ({} bytes)",
            MAX_SOURCE_SIZE / 1_000_000,
            src.len()
        );
    }
    Ok(src)
}

/// 1-based line and column of a byte offset.
pub fn line_col(src: &str, offset: usize) -> (usize, usize) {
    let mut end = offset.min(src.len());
    while !src.is_char_boundary(end) {
        end -= 1;
    }
    let before = &src[..end];
    let line = before.matches('\n').count() + 1;
    let col = before.rfind('\n').map_or(before, |nl| &before[nl + 1..]).chars().count() + 1;
    (line, col)
}

pub fn parse_file(path: &Path) -> Result<Spec> {
    let src = read_source(path)?;
    let file = path.display().to_string();
    parse_str(&file, &src).map_err(|err| {
        let (line, col) = line_col(&src, err.offset() as usize);
        anyhow::Error::new(err).context(format!("{file}:{line}:{col}: parse error"))
    })
}

/// Parse, translate and validate a definition file.
pub fn load_api(path: &Path, base_url: Option<&str>) -> Result<ApiSpec> {
    let spec = parse_file(path)?;
    let mut translator = Translator::new();
    if let Some(url) = base_url {
        translator = translator.with_base_url(url);
    }
    let api = translator
        .translate(&spec)
        .with_context(|| format!("{}: translation failed", path.display()))?;
    api.validate()
        .with_context(|| format!("{}: validation failed", path.display()))?;
    info!(api = %api.name, endpoints = api.endpoints.len(), "loaded api definition");
    Ok(api)
}

pub fn generate(
    api: &ApiSpec,
    language: Language,
    surface: Surface,
    go_package: &str,
) -> Result<String> {
    let out = match language {
        Language::Go => GoGenerator::new()
            .with_package(go_package)
            .generate_file(api, surface)?,
        Language::TypeScript => TsGenerator::new().generate_file(api, surface)?,
    };
    Ok(out)
}
