use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use tracing::{info, info_span};

use specload_ingest::{OpenedFile, open_file};
use specload_map::{
    ConfirmError, ImportSession, LoaderRepository, check_config, read_config, suggest_roles,
};
use specload_model::{LoaderConfig, RoleSpec};

use crate::cli::{CheckArgs, ComponentRef, FileArgs, SynthesizeArgs};
use crate::render::{RenderedLoader, TextRenderer};
use crate::settings::Settings;
use crate::summary::{loader_table, print_file, print_mismatches, suggestion_table};

/// Result of a successful `synthesize` run.
#[derive(Debug)]
pub struct SynthesisOutcome {
    pub rendered: RenderedLoader,
    pub saved: Option<PathBuf>,
}

fn open(path: &Path) -> Result<OpenedFile> {
    open_file(path).with_context(|| format!("open {}", path.display()))
}

fn repository(settings: &Settings) -> Result<LoaderRepository> {
    let dir = settings
        .repository_dir()
        .ok_or_else(|| anyhow!("no loader repository directory configured"))?;
    LoaderRepository::new(dir)
}

pub fn run_inspect(args: &FileArgs) -> Result<()> {
    let opened = open(&args.file)?;
    print_file(&args.file, opened.format, &opened.file);
    Ok(())
}

pub fn run_suggest(args: &FileArgs) -> Result<()> {
    let opened = open(&args.file)?;
    let suggestions = suggest_roles(&opened.file);
    if suggestions.is_empty() {
        println!("No role suggestions for {}", args.file.display());
        return Ok(());
    }
    println!("{}", suggestion_table(&suggestions));
    Ok(())
}

/// Role assignments requested on the command line, in role order.
fn explicit_roles(args: &SynthesizeArgs) -> Vec<(RoleSpec, &ComponentRef, &'static str)> {
    let mut roles = Vec::new();
    if let Some(reference) = &args.dispersion {
        roles.push((RoleSpec::Dispersion, reference, "--dispersion"));
    }
    if let Some(reference) = &args.data {
        roles.push((RoleSpec::Data, reference, "--data"));
    }
    if let Some(reference) = &args.uncertainty {
        roles.push((
            RoleSpec::Uncertainty(args.uncertainty_type.into()),
            reference,
            "--uncertainty",
        ));
    }
    if let Some(reference) = &args.mask {
        roles.push((
            RoleSpec::Mask(args.mask_definition.into()),
            reference,
            "--mask",
        ));
    }
    roles
}

pub fn run_synthesize(args: &SynthesizeArgs, settings: &Settings) -> Result<SynthesisOutcome> {
    let span = info_span!("synthesize", path = %args.file.display());
    let _guard = span.enter();

    let opened = open(&args.file)?;
    let mut import = ImportSession::new(opened.file, opened.format);
    if args.suggest {
        let applied = import.apply_suggestions();
        info!(applied, "applied role suggestions");
    }
    for (spec, reference, flag) in explicit_roles(args) {
        import
            .assign(spec, reference.dataset, &reference.name)
            .with_context(|| format!("{flag} {reference}"))?;
    }

    let format = args.format.unwrap_or(settings.output.format);
    let mut renderer = TextRenderer::new(format);
    let rendered = match import.confirm(args.name.as_deref(), &mut renderer) {
        Ok(rendered) => rendered,
        Err(ConfirmError::Incomplete { missing, .. }) => {
            bail!("no component assigned to the {missing} role (use --{missing} or --suggest)")
        }
        Err(ConfirmError::Render(error)) => return Err(error.context("render loader")),
    };

    let saved = if args.save {
        let repo = repository(settings)?;
        Some(repo.save(&rendered.config)?)
    } else {
        None
    };
    Ok(SynthesisOutcome { rendered, saved })
}

pub fn print_synthesis(outcome: &SynthesisOutcome) {
    println!("# template: {}", outcome.rendered.template);
    print!("{}", outcome.rendered.text);
    if let Some(path) = &outcome.saved {
        eprintln!("Saved loader '{}' to {}", outcome.rendered.config.name(), path.display());
    }
}

/// Resolve a configuration argument as a file path, else a repository name.
fn resolve_config(reference: &str, settings: &Settings) -> Result<LoaderConfig> {
    let path = Path::new(reference);
    if path.is_file() {
        return read_config(path);
    }
    let repo = repository(settings)?;
    repo.load(reference)?.ok_or_else(|| {
        anyhow!(
            "no loader configuration '{reference}' (not a file and not in {})",
            repo.base_dir().display()
        )
    })
}

/// Returns whether the configuration applies to the file.
pub fn run_check(args: &CheckArgs, settings: &Settings) -> Result<bool> {
    let config = resolve_config(&args.config, settings)?;
    let opened = open(&args.file)?;
    let mismatches = check_config(&config, &opened.file);
    print_mismatches(config.name(), &args.file, &mismatches);
    Ok(mismatches.is_empty())
}

pub fn run_list(settings: &Settings) -> Result<()> {
    let repo = repository(settings)?;
    let loaders = repo.list()?;
    if loaders.is_empty() {
        println!("No stored loaders in {}", repo.base_dir().display());
        return Ok(());
    }
    println!("{}", loader_table(&loaders));
    Ok(())
}
