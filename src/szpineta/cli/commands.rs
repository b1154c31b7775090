//! # CLI Layer
//!
//! One UI client for the site; the HTTP server is the other. This is the only
//! place that parses arguments, reads stdin, prints to the terminal and sets up
//! logging.
//!
//! - `run()`: parse, configure tracing, load config, dispatch
//! - `handle_*()`: call the API and print its messages
//! - `print_*()` (in `print.rs`): terminal formatting

use super::print::{print_added, print_messages, print_poem};
use super::setup::{Cli, Commands};
use clap::Parser;
use szpineta::api::SiteApi;
use szpineta::card::CardRenderer;
use szpineta::config::SiteConfig;
use szpineta::error::{Result, SiteError};
use szpineta::http::{self, AppState};
use szpineta::model::Submission;
use szpineta::store::fs::FileStore;
use std::io::{IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

struct AppContext {
    api: SiteApi<FileStore>,
    root: PathBuf,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = SiteConfig::for_site(&cli.root)?;

    match cli.command {
        Commands::Serve { port } => handle_serve(&cli.root, config, port),
        Commands::Add { title, text } => handle_add(&init_context(&cli.root, config), title, text),
        Commands::Show { number } => handle_show(&init_context(&cli.root, config), number),
        Commands::Card { number, out, font } => {
            handle_card(init_context(&cli.root, config), number, &out, font)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "szpineta=debug" } else { "szpineta=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn init_context(root: &Path, config: SiteConfig) -> AppContext {
    let store = FileStore::new(root.to_path_buf())
        .with_paths(&config.listing.path, &config.summary.path);
    AppContext {
        api: SiteApi::new(store, config),
        root: root.to_path_buf(),
    }
}

fn handle_serve(root: &Path, config: SiteConfig, port: Option<u16>) -> Result<()> {
    let port = port.unwrap_or(config.port);
    let state = Arc::new(AppState::for_site(root, config));
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(http::serve(state, port))
}

fn read_stdin() -> Result<String> {
    let mut stdin = std::io::stdin();
    if stdin.is_terminal() {
        eprintln!("Enter the poem, then Ctrl-D:");
    }
    let mut text = String::new();
    stdin.read_to_string(&mut text)?;
    Ok(text)
}

fn handle_add(ctx: &AppContext, title: Option<String>, text: Option<String>) -> Result<()> {
    let body = match text {
        Some(text) => text,
        None => read_stdin()?,
    };
    let submission = Submission::new(title.unwrap_or_default(), body);

    let result = ctx.api.add_poem(&submission)?;
    if let Some(added) = &result.added {
        print_added(added);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_show(ctx: &AppContext, number: u64) -> Result<()> {
    let result = ctx.api.show_poem(number)?;
    if let Some(poem) = &result.poem {
        print_poem(poem);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_card(ctx: AppContext, number: u64, out: &Path, font: Option<PathBuf>) -> Result<()> {
    let font = font.or_else(|| ctx.api.config().card_font_path(&ctx.root));
    let api = match font {
        Some(path) => {
            let renderer = CardRenderer::from_file(&path, ctx.api.config().card.clone())?;
            ctx.api.with_renderer(renderer)
        }
        None => ctx.api,
    };

    let result = api.poem_card(number)?;
    let png = result
        .image
        .as_ref()
        .ok_or_else(|| SiteError::Render("Renderer produced no image".to_string()))?;
    std::fs::write(out, png)?;

    print_messages(&result.messages);
    println!("{}", out.display());
    Ok(())
}
