//! cmslayout - Entry Point

use clap::{Parser, Subcommand};
use cmslayout::bootstrap::{create_layouts_from_app_layouts, FsTemplateDiscovery};
use cmslayout::config::ResolvedConfig;
use cmslayout::merge::{render_page, CssMemo, MarkerRecorder, MergeEngine, RenderContext};
use cmslayout::model::{LayoutId, SiteId};
use cmslayout::select::{options_for_select, SelectRequest};
use cmslayout::source::{load_site_file, LoadedSite};
use cmslayout::store::LayoutStore;
use std::error::Error;
use std::path::PathBuf;
use tracing::info;

/// cmslayout - merge CMS layout chains from a site document
#[derive(Parser, Debug)]
#[command(name = "cmslayout")]
#[command(version)]
#[command(about = "Render merged layout content, head and css from a CMS site document")]
pub struct Args {
    /// Path to the site document (TOML)
    #[arg(short, long)]
    pub site: PathBuf,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Deepest layout chain to walk before failing
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_depth: Option<u32>,

    /// Command to run against the site
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Print a layout's content merged into its ancestors
    Content {
        /// Layout identifier
        layout: String,
    },
    /// Print a layout's head merged with its ancestors' heads
    Head {
        /// Layout identifier
        layout: String,
    },
    /// Print a layout's processed css
    Css {
        /// Layout identifier
        layout: String,
    },
    /// Print a page's rendered content
    Render {
        /// Page slug
        page: String,
    },
    /// Print the layout tree as an indented list
    Tree {
        /// Layout identifier to leave out, with its subtree
        #[arg(long)]
        exclude: Option<String>,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Create layouts for built-in application templates, then print the tree
    Bootstrap {
        /// Directory holding application templates
        #[arg(long)]
        templates_dir: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    // Defaults → Config File → Env Vars → CLI Args
    let config = {
        let config_file = cmslayout::config::load_config_with_precedence(args.config.clone())?;
        let merged = cmslayout::config::merge_config(config_file);
        let with_env = cmslayout::config::apply_env_overrides(merged);

        let templates_override = match &args.command {
            Command::Bootstrap { templates_dir } => templates_dir.clone(),
            _ => None,
        };
        let depth_override = args.max_depth.map(|d| d as usize);
        cmslayout::config::apply_cli_overrides(with_env, templates_override, depth_override)
    };

    cmslayout::logging::init(&config.log_file_path)?;

    info!(config = ?config, "Configuration loaded and resolved");

    let LoadedSite { mut store, site } = load_site_file(&args.site)?;
    let output = run(&args.command, &mut store, site, &config)?;
    println!("{output}");

    Ok(())
}

/// Execute one command against a loaded site and return what to print.
pub fn run(
    command: &Command,
    store: &mut LayoutStore,
    site: SiteId,
    config: &ResolvedConfig,
) -> Result<String, Box<dyn Error>> {
    let processor = MarkerRecorder;

    match command {
        Command::Content { layout } => {
            let id = resolve_layout(store, site, layout)?;
            let engine = MergeEngine::new(store, &processor).with_max_depth(config.max_depth);
            Ok(engine.merged_content(id)?)
        }
        Command::Head { layout } => {
            let id = resolve_layout(store, site, layout)?;
            let engine = MergeEngine::new(store, &processor).with_max_depth(config.max_depth);
            let mut context = RenderContext::for_layout(id);
            Ok(engine.merged_head(id, &mut context)?.into_string())
        }
        Command::Css { layout } => {
            let id = resolve_layout(store, site, layout)?;
            let engine = MergeEngine::new(store, &processor).with_max_depth(config.max_depth);
            let mut memo = CssMemo::new();
            Ok(engine.processed_css(id, config.css_force_reload, &mut memo)?)
        }
        Command::Render { page } => {
            let id = store
                .page_by_slug(site, page)
                .ok_or_else(|| format!("Unknown page '{page}'"))?
                .id;
            Ok(render_page(store, &processor, config.max_depth, id)?)
        }
        Command::Tree { exclude, json } => {
            let exclude = exclude
                .as_deref()
                .map(|identifier| resolve_layout(store, site, identifier))
                .transpose()?;
            format_tree(store, site, exclude, &config.spacer, *json)
        }
        Command::Bootstrap { .. } => {
            let discovery = FsTemplateDiscovery::new(&config.templates_dir);
            let report = create_layouts_from_app_layouts(store, site, &discovery)?;
            let mut out = format!(
                "created {}, updated {}, rejected {}",
                report.created.len(),
                report.updated.len(),
                report.rejected.len()
            );
            for rejected in &report.rejected {
                out.push_str(&format!("\nrejected '{}': {}", rejected.name, rejected.error));
            }
            let tree = format_tree(store, site, None, &config.spacer, false)?;
            if !tree.is_empty() {
                out.push('\n');
                out.push_str(&tree);
            }
            Ok(out)
        }
    }
}

fn resolve_layout(store: &LayoutStore, site: SiteId, identifier: &str) -> Result<LayoutId, String> {
    store
        .layout_by_identifier(site, identifier)
        .map(|layout| layout.id)
        .ok_or_else(|| format!("Unknown layout '{identifier}'"))
}

fn format_tree(
    store: &LayoutStore,
    site: SiteId,
    exclude: Option<LayoutId>,
    spacer: &str,
    json: bool,
) -> Result<String, Box<dyn Error>> {
    let mut request = SelectRequest::new(site).with_spacer(spacer);
    if let Some(exclude) = exclude {
        request = request.excluding(exclude);
    }
    let options = options_for_select(store, request);
    if json {
        return Ok(serde_json::to_string_pretty(&options)?);
    }
    Ok(options
        .iter()
        .map(|option| option.label.as_str())
        .collect::<Vec<_>>()
        .join("\n"))
}
