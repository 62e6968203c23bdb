//! folio - editor HTML to article documents

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use folio::{ComponentRegistry, Content, Exporter, FilenameBundler, Settings, Theme, ThemeLibrary};

#[derive(Parser)]
#[command(name = "folio")]
#[command(version, about = "Compile editor HTML into article documents", long_about = None)]
#[command(after_help = "EXAMPLES:
    folio export post.html                       Print the document for post.html
    folio export post.json --theme dark.toml     Export a content item with a theme
    folio check-theme dark.toml                  Validate a theme file")]
struct Cli {
    /// Log builder and dispatch decisions
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Export an HTML file or a JSON content item
    Export {
        /// Input file (.html body or .json content item)
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output file for the document (default: stdout)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Settings TOML file
        #[arg(short, long, value_name = "FILE")]
        settings: Option<PathBuf>,

        /// Theme TOML file
        #[arg(short, long, value_name = "FILE")]
        theme: Option<PathBuf>,

        /// Title for a plain HTML input
        #[arg(long)]
        title: Option<String>,

        /// Print bundles and diagnostics along with the document
        #[arg(long)]
        report: bool,
    },
    /// Validate a theme file and its spec overrides
    CheckTheme {
        #[arg(value_name = "THEME")]
        path: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Command::Export {
            input,
            output,
            settings,
            theme,
            title,
            report,
        } => export(&input, output.as_deref(), settings.as_deref(), theme.as_deref(), title, report),
        Command::CheckTheme { path } => check_theme(&path),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "folio=debug" } else { "folio=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

fn read_content(path: &Path, title: Option<String>) -> folio::Result<Content> {
    let raw = fs::read_to_string(path)?;
    if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json")) {
        return Ok(serde_json::from_str(&raw)?);
    }
    let id = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut content = Content::new(&id, &raw);
    content.title = title;
    Ok(content)
}

fn export(
    input: &Path,
    output: Option<&Path>,
    settings: Option<&Path>,
    theme: Option<&Path>,
    title: Option<String>,
    report: bool,
) -> folio::Result<()> {
    let settings = match settings {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let registry = ComponentRegistry::new();
    let theme = match theme {
        Some(path) => Theme::load(path, &registry.catalog())?,
        None => Theme::default(),
    };
    let themes = ThemeLibrary::with_theme(theme);
    let exporter = Exporter::new(&settings, &themes, &FilenameBundler).with_components(registry);

    let content = read_content(input, title)?;
    let export = exporter.export(&content)?;

    let json = if report {
        serde_json::to_string_pretty(&export)?
    } else {
        export.document.to_json_string()?
    };
    match output {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    if !report {
        for diagnostic in &export.diagnostics {
            eprintln!("warning [{}]: {}", diagnostic.kind.as_str(), diagnostic.message);
        }
    }
    Ok(())
}

fn check_theme(path: &Path) -> folio::Result<()> {
    let catalog = ComponentRegistry::new().catalog();
    let theme = Theme::load(path, &catalog)?;
    println!("Theme: {}", theme.name);
    println!("Columns: {}", theme.layout_columns());
    println!("Overrides: {}", theme.overrides().count());
    for (component, name, _) in theme.overrides() {
        println!("  {component}/{name}");
    }
    Ok(())
}
