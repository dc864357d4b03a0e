use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use spanweave_config::Config;
use spanweave_engine::model::invariants;
use spanweave_engine::render::DEFAULT_SEPARATOR;
use spanweave_engine::tree::outline;
use spanweave_engine::{Block, as_html, as_text, html_as_rich_text, markdown_as_rich_text};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "spanweave", version, about = "Convert between HTML and span-annotated rich text")]
struct Cli {
    /// Config file to read ingestion profiles from
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert an HTML or Markdown file to rich text JSON
    Import(ImportArgs),

    /// Render a rich text JSON file
    Render(RenderArgs),

    /// Report span offset problems in a rich text JSON file
    Check(CheckArgs),
}

#[derive(clap::Args)]
struct ImportArgs {
    /// HTML or Markdown source file
    file: PathBuf,

    /// Ingestion profile from the config file
    #[arg(short, long)]
    profile: Option<String>,

    /// Treat the input as Markdown (implied by a .md extension)
    #[arg(long)]
    markdown: bool,

    /// Convert only the first element matching this selector
    #[arg(long)]
    container: Option<String>,

    /// Drop elements matching this selector. Repeatable.
    #[arg(long)]
    exclude: Vec<String>,

    /// Keep only elements matching this selector. Repeatable.
    #[arg(long)]
    include: Vec<String>,

    /// Output file (defaults to the configured output directory, else stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write JSON on a single line
    #[arg(long)]
    compact: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Html,
    Text,
    Outline,
}

#[derive(clap::Args)]
struct RenderArgs {
    /// Rich text JSON file
    file: PathBuf,

    #[arg(short, long, value_enum, default_value_t = Format::Html)]
    format: Format,

    /// Separator between blocks for text output
    #[arg(long, default_value = DEFAULT_SEPARATOR)]
    separator: String,
}

#[derive(clap::Args)]
struct CheckArgs {
    /// Rich text JSON file
    file: PathBuf,
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Import(args) => import(args, cli.config.as_deref()),
        Command::Render(args) => render(args),
        Command::Check(args) => check(args),
    }
}

fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let config = match config_path {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };
    Ok(config.unwrap_or_default())
}

fn import(args: ImportArgs, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let mut profile = config.profile(args.profile.as_deref())?;
    if args.container.is_some() {
        profile.container = args.container;
    }
    profile.exclude.extend(args.exclude);
    profile.include.extend(args.include);
    let ingest = profile.to_ingest_config();

    let source = fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let markdown = args.markdown || is_markdown_path(&args.file);
    let output = if markdown {
        markdown_as_rich_text(&source, &ingest)?
    } else {
        html_as_rich_text(&source, &ingest)?
    };
    log::info!(
        "Converted {} into {} blocks ({} warnings)",
        args.file.display(),
        output.result.len(),
        output.warnings.len()
    );

    let json = if args.compact {
        serde_json::to_string(&output.result)?
    } else {
        serde_json::to_string_pretty(&output.result)?
    };
    let target = args.output.or_else(|| {
        config
            .output_dir
            .as_ref()
            .map(|dir| default_output_path(dir, &args.file))
    });
    match target {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("Wrote {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn is_markdown_path(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext == "md" || ext == "markdown")
}

fn default_output_path(dir: &Path, source: &Path) -> PathBuf {
    let stem = source.file_stem().unwrap_or(source.as_os_str());
    dir.join(stem).with_extension("json")
}

fn read_field(path: &Path) -> Result<Vec<Block>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("{} is not a rich text field", path.display()))
}

fn render(args: RenderArgs) -> Result<()> {
    let field = read_field(&args.file)?;
    let out = match args.format {
        Format::Html => as_html(&field),
        Format::Text => as_text(&field, &args.separator),
        Format::Outline => outline::render(&field),
    };
    println!("{out}");
    Ok(())
}

fn check(args: CheckArgs) -> Result<()> {
    let field = read_field(&args.file)?;
    let violations = invariants::check(&field);
    if violations.is_empty() {
        log::info!("No problems in {}", args.file.display());
        return Ok(());
    }
    for violation in &violations {
        println!("{violation}");
    }
    bail!("{} span offset problems found", violations.len());
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn import_flags_parse() {
        let cli = Cli::try_parse_from([
            "spanweave",
            "--config",
            "/tmp/c.toml",
            "import",
            "page.html",
            "--exclude",
            ".ad",
            "--exclude",
            "nav",
            "-p",
            "blog",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.toml")));
        let Command::Import(args) = cli.command else {
            panic!("expected import");
        };
        assert_eq!(args.exclude, vec![".ad", "nav"]);
        assert_eq!(args.profile.as_deref(), Some("blog"));
        assert!(!args.markdown);
    }

    #[test]
    fn render_defaults_to_html() {
        let cli = Cli::try_parse_from(["spanweave", "render", "field.json"]).unwrap();
        let Command::Render(args) = cli.command else {
            panic!("expected render");
        };
        assert_eq!(args.format, Format::Html);
        assert_eq!(args.separator, DEFAULT_SEPARATOR);
    }

    #[test]
    fn markdown_is_detected_by_extension() {
        assert!(is_markdown_path(Path::new("notes/readme.md")));
        assert!(!is_markdown_path(Path::new("page.html")));
    }

    #[test]
    fn output_path_lands_in_output_dir() {
        assert_eq!(
            default_output_path(Path::new("/out"), Path::new("site/about.html")),
            PathBuf::from("/out/about.json")
        );
    }

    #[test]
    fn import_writes_json_to_output_file() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("page.md");
        fs::write(&source, "# Hi\n\nSome *text*.\n").unwrap();
        let output = dir.path().join("out").join("page.json");

        let args = ImportArgs {
            file: source,
            profile: None,
            markdown: false,
            container: None,
            exclude: vec![],
            include: vec![],
            output: Some(output.clone()),
            compact: true,
        };
        import(args, Some(&dir.path().join("missing.toml"))).unwrap();

        let field = read_field(&output).unwrap();
        assert_eq!(as_text(&field, "|"), "Hi|Some text.");
    }

    #[test]
    fn check_reports_bad_offsets() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("field.json");
        fs::write(
            &path,
            r#"[{"type":"paragraph","text":"abc","spans":[{"start":1,"end":9,"type":"strong"}]}]"#,
        )
        .unwrap();

        let err = check(CheckArgs { file: path }).unwrap_err();
        assert_eq!(err.to_string(), "1 span offset problems found");
    }
}
