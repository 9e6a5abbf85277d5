//! Command-line front end for trellis form documents.

use std::{
    fs,
    io::{self, IsTerminal},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::{Map, Value};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use trellis::{
    EngineConfig, Form, Registry, RenderMode, Runtime, Strictness,
    codec,
    encode_node,
    render::{design_form, runtime_form},
};

/// Config file read from the working directory when `--config` is absent.
const DEFAULT_CONFIG: &str = "trellis.toml";
/// Environment variable holding the log filter.
const LOG_ENV: &str = "TRELLIS_LOG";

/// CLI flags.
#[derive(Parser, Debug)]
#[clap(author, version, about = "Inspect and convert trellis form documents", long_about = None)]
struct Args {
    /// Engine settings in TOML. Defaults to ./trellis.toml when present.
    #[clap(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Decode a document and report broken tree invariants.
    Check {
        /// Form document.
        file: PathBuf,
        /// Reject unknown widget types instead of decoding them as text boxes.
        #[clap(long)]
        strict: bool,
    },
    /// Rewrite a document in canonical form, filling in missing codes.
    Normalize {
        /// Form document.
        file: PathBuf,
        /// Write here instead of stdout.
        #[clap(short, long, value_name = "OUT")]
        output: Option<PathBuf>,
    },
    /// Render a document to HTML.
    Render {
        /// Form document.
        file: PathBuf,
        /// Designer canvas or runtime form.
        #[clap(long, value_enum, default_value_t = Mode::Design)]
        mode: Mode,
        /// JSON object holding the record values shown at runtime.
        #[clap(long, value_name = "FILE")]
        values: Option<PathBuf>,
    },
    /// Print a freshly created node of a widget kind.
    Create {
        /// Type tag or alias.
        tag: String,
        /// Label to use instead of the kind's label key.
        #[clap(long)]
        label: Option<String>,
    },
    /// List the registered widget kinds.
    Kinds,
}

/// Render target.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    /// Designer placeholders.
    Design,
    /// Read-only runtime form.
    Browse,
    /// Editable runtime form.
    Edit,
}

impl Mode {
    /// The runtime mode, or `None` for the designer.
    fn runtime(self) -> Option<RenderMode> {
        match self {
            Self::Design => None,
            Self::Browse => Some(RenderMode::Browse),
            Self::Edit => Some(RenderMode::Edit),
        }
    }
}

/// Install the stderr log subscriber, filtered by `TRELLIS_LOG`.
fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_level(true)
        .without_time()
        .compact()
        .init();
}

/// Engine settings from `path`, or from the default file when it exists.
fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => {
            let p = PathBuf::from(DEFAULT_CONFIG);
            if !p.exists() {
                return Ok(EngineConfig::default());
            }
            p
        }
    };
    let text = fs::read_to_string(&path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config = toml::from_str(&text)
        .with_context(|| format!("parsing config {}", path.display()))?;
    debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Read and decode a form document.
fn read_form(registry: &Registry, config: &EngineConfig, file: &Path) -> Result<Form> {
    let text =
        fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;
    config
        .decoder(registry)
        .decode_str(&text)
        .with_context(|| format!("decoding {}", file.display()))
}

/// Read a JSON object of record values.
fn read_values(path: &Path) -> Result<Map<String, Value>> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let value: Value =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    match value {
        Value::Object(m) => Ok(m),
        other => bail!("{}: expected a JSON object, found {other}", path.display()),
    }
}

/// `check`: decode, then report every invariant violation.
fn check(registry: &Registry, mut config: EngineConfig, file: &Path, strict: bool) -> Result<()> {
    if strict {
        config.codec.strictness = Strictness::Strict;
    }
    let form = read_form(registry, &config, file)?;
    let mut fallbacks = 0;
    form.walk(&mut |n| {
        if n.original_type.is_some() {
            fallbacks += 1;
        }
    });
    if fallbacks > 0 {
        println!("{fallbacks} widget(s) of unknown type decoded as text boxes");
    }
    let errors = form.validate();
    for e in &errors {
        eprintln!("error: {e}");
    }
    if !errors.is_empty() {
        bail!("{}: {} problem(s)", file.display(), errors.len());
    }
    println!("{}: {} widget(s), ok", file.display(), form.len());
    Ok(())
}

/// `normalize`: decode, fill in codes and re-encode.
fn normalize(
    registry: &Registry,
    config: &EngineConfig,
    file: &Path,
    output: Option<&Path>,
) -> Result<()> {
    let mut form = read_form(registry, config, file)?;
    let changed = form.ensure_codes();
    info!(changed, "widget codes assigned");
    let json = codec::to_string(&form)?;
    match output {
        Some(out) => {
            fs::write(out, format!("{json}\n"))
                .with_context(|| format!("writing {}", out.display()))?;
        }
        None => println!("{json}"),
    }
    Ok(())
}

/// `render`: print the document as HTML.
fn render(
    registry: &Registry,
    config: &EngineConfig,
    file: &Path,
    mode: Mode,
    values: Option<&Path>,
) -> Result<()> {
    let form = read_form(registry, config, file)?;
    let record = match values {
        Some(p) => read_values(p)?,
        None => Map::new(),
    };
    let markup = match mode.runtime() {
        None => design_form(&form),
        Some(m) => runtime_form(&form, &Runtime::new(m, &record)),
    };
    println!("{}", markup.to_html());
    Ok(())
}

/// `create`: print a new node with its code assigned.
fn create(registry: &Registry, tag: &str, label: Option<&str>) -> Result<()> {
    let mut form = Form::new();
    let id = form.insert(None, 0, registry.create(tag, label)?)?;
    let node = form.find(id.as_str()).context("created node missing")?;
    println!("{}", serde_json::to_string_pretty(&encode_node(node, 0))?);
    Ok(())
}

/// `kinds`: one line per registered kind.
fn kinds(registry: &Registry) {
    for d in registry.definitions() {
        let category = format!("{:?}", d.category);
        let aliases = if d.aliases.is_empty() {
            String::new()
        } else {
            format!("  (aliases: {})", d.aliases.join(", "))
        };
        println!("{:<10} {category:<7} {}{aliases}", d.tag, d.icon);
    }
}

/// Parse flags, load settings and run the subcommand.
fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;
    let registry = Registry::builtin();
    match args.command {
        Command::Check { file, strict } => check(&registry, config, &file, strict),
        Command::Normalize { file, output } => {
            normalize(&registry, &config, &file, output.as_deref())
        }
        Command::Render { file, mode, values } => {
            render(&registry, &config, &file, mode, values.as_deref())
        }
        Command::Create { tag, label } => create(&registry, &tag, label.as_deref()),
        Command::Kinds => {
            kinds(&registry);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn parse_render() {
        let args = Args::parse_from(["trellisctl", "render", "form.json", "--mode", "edit"]);
        match args.command {
            Command::Render { file, mode, values } => {
                assert_eq!(file, PathBuf::from("form.json"));
                assert_eq!(mode.runtime(), Some(RenderMode::Edit));
                assert!(values.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn config_from_toml() {
        let c: EngineConfig = toml::from_str(
            "[resize]\nmin_width = 80\n\n[codec]\nstrictness = \"strict\"\n",
        )
        .unwrap();
        assert_eq!(c.resize.min_width, 80);
        assert_eq!(c.resize.fallback_container_width, 1200);
        assert_eq!(c.codec.strictness, Strictness::Strict);
    }
}
