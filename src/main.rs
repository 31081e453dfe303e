mod cli;

use lazyframe::{
    config, placeholder, Document, Element, InitConfig, Lazyframe, MemoryDocument,
    ResolvedSource, Selection,
};

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "lazyframe=debug,lazyframe_dom=debug".to_string()
        } else {
            "lazyframe=warn".to_string()
        }
    });

    // stdout carries command output
    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Resolve { url, no_autoplay } => resolve(&url, !no_autoplay),
        Commands::Render {
            urls,
            title,
            thumbnail,
            offline,
            json,
        } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(render(
                urls,
                RenderOptions {
                    title,
                    thumbnail,
                    offline,
                    json,
                },
                cli.config.as_deref(),
            ))
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("lazyframe {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn resolve(url: &str, autoplay: bool) -> Result<()> {
    let source = ResolvedSource::parse(url);

    println!("Source: {}", source.source);
    println!("Vendor: {}", source.vendor);
    if let Some(ref id) = source.media_id {
        println!("Media ID: {}", id);
    }
    println!("Query: {}", source.query(autoplay));
    println!("Embed URL: {}", source.embed_url(autoplay));

    let doc = MemoryDocument::default();
    let iframe = doc.append_child(doc.body(), placeholder::iframe_fragment(&source, autoplay))?;
    println!("\n{}", doc.outer_html(iframe)?);

    Ok(())
}

struct RenderOptions {
    title: Option<String>,
    thumbnail: Option<String>,
    offline: bool,
    json: bool,
}

#[derive(Serialize)]
struct RenderedPlaceholder {
    source: ResolvedSource,
    embed_url: String,
    title: Option<String>,
    thumbnail: Option<String>,
    html: String,
}

async fn render(urls: Vec<String>, opts: RenderOptions, config_path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let doc = Arc::new(MemoryDocument::default());

    let mut nodes = Vec::with_capacity(urls.len());
    for url in &urls {
        let mut el = Element::new("div")
            .with_class("lazyframe")
            .with_attribute("data-src", url.as_str());
        if let Some(ref title) = opts.title {
            el.set_attribute("data-title", title.as_str());
        }
        if let Some(ref thumbnail) = opts.thumbnail {
            el.set_attribute("data-thumbnail", thumbnail.as_str());
        }
        nodes.push(doc.append_child(doc.body(), el)?);
    }

    let lazyframe = if opts.offline {
        Lazyframe::without_metadata(doc.clone())
    } else {
        Lazyframe::from_config(doc.clone(), &config.metadata)
    };

    let (loaded_tx, mut loaded_rx) = tokio::sync::mpsc::unbounded_channel();
    let mut options = config.options.clone();
    options.lazyload = false;
    let init = InitConfig::new(options).on_load(move |node| {
        let _ = loaded_tx.send(node);
    });

    let registration = lazyframe.init(Selection::Nodes(nodes), init);
    for err in &registration.failures {
        eprintln!("warning: {}", err);
    }

    let mut remaining = registration.elements.len();
    while remaining > 0 && loaded_rx.recv().await.is_some() {
        remaining -= 1;
    }

    let mut rendered = Vec::with_capacity(registration.elements.len());
    for element in &registration.elements {
        doc.click(element.node())?;
        rendered.push(RenderedPlaceholder {
            source: element.settings().source.clone(),
            embed_url: element.settings().embed_url.clone(),
            title: element.title(),
            thumbnail: element.thumbnail(),
            html: doc.outer_html(element.node())?,
        });
    }

    if opts.json {
        println!("{}", serde_json::to_string_pretty(&rendered)?);
    } else {
        for placeholder in &rendered {
            println!("{}", placeholder.html);
        }
    }

    if !registration.failures.is_empty() {
        anyhow::bail!("{} placeholder(s) could not be registered", registration.failures.len());
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            print_config(&config);
        }
        None => {
            println!("No config file specified, using defaults");
            let config = config::Config::default();
            println!("Default config:");
            print_config(&config);
        }
    }

    Ok(())
}

fn print_config(config: &config::Config) {
    let options = &config.options;
    println!("  Lazyload: {}", options.lazyload);
    println!("  Debounce: {} ms", options.debounce_ms);
    println!("  Autoplay: {}", options.autoplay);
    println!(
        "  YouTube thumbnail: {}{}",
        options.youtube_thumbnail_quality, options.youtube_thumbnail_image
    );
    println!("  Metadata enabled: {}", config.metadata.enabled);
    println!("  Metadata endpoint: {}", config.metadata.endpoint);
}
