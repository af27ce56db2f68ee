//! ifacegen — generate a Go interface from the exported methods of a type.
//!
//! Scans every Go file of a package directory, collects the exported methods
//! bound to one type (value or pointer receiver) and writes a file declaring
//! an interface with exactly those signatures.
//!
//! - **explicit**: `ifacegen ./store --struct Store --iface Storer`
//! - **go generate**: `//go:generate ifacegen` directly above the type; the
//!   directory and type are derived from `GOFILE` and `GOLINE`

mod error;
mod model;
mod parser;
mod render;

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "ifacegen",
    about = "Generate a Go interface from the exported methods of a type"
)]
struct Cli {
    /// Package directory. Defaults to the current directory under `go generate`.
    dir: Option<PathBuf>,

    /// Name of the type to generate an interface for
    #[arg(long = "struct")]
    struct_name: Option<String>,

    /// Name of the generated interface
    #[arg(long, default_value = "Interface")]
    iface: String,

    /// Output file, relative to the package directory [default: zz_<struct>.iface.go]
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Print the resolved directory, type and output file before running
    #[arg(long)]
    debug: bool,

    /// File containing the `go:generate` directive
    #[arg(long, env = "GOFILE", hide = true)]
    gofile: Option<PathBuf>,

    /// Line of the `go:generate` directive
    #[arg(long, env = "GOLINE", hide = true)]
    goline: Option<String>,
}

/// Resolved settings for [`run`].
struct Config {
    dir: PathBuf,
    struct_name: String,
    iface: String,
    output: PathBuf,
}

impl Config {
    fn from_cli(cli: Cli) -> Result<Self> {
        let dir = match (cli.dir, &cli.gofile) {
            (Some(dir), _) => dir,
            (None, Some(_)) => {
                std::env::current_dir().context("failed to determine current directory")?
            }
            (None, None) => bail!("must provide package directory"),
        };

        let struct_name = match (cli.struct_name, &cli.gofile) {
            (Some(name), _) => Some(name),
            (None, Some(gofile)) => {
                // Unparsable line numbers count as 0: the first type in the file.
                let line = cli
                    .goline
                    .as_deref()
                    .and_then(|l| l.trim().parse().ok())
                    .unwrap_or(0);
                let source = fs::read_to_string(gofile)
                    .with_context(|| format!("failed to read {}", gofile.display()))?;
                parser::scan::locate_type(&source, line)
            }
            (None, None) => None,
        };
        let Some(struct_name) = struct_name.filter(|s| !s.is_empty()) else {
            bail!("must provide struct name (--struct)");
        };

        let output = cli
            .output
            .unwrap_or_else(|| PathBuf::from(format!("zz_{}.iface.go", struct_name)));

        Ok(Self {
            dir,
            struct_name,
            iface: cli.iface,
            output,
        })
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let debug = cli.debug;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if debug { "debug" } else { "warn" }),
    )
    .format_timestamp(None)
    .init();

    let config = Config::from_cli(cli)?;
    if debug {
        println!("PackageDir: {}", config.dir.display());
        println!("StructName: {}", config.struct_name);
        println!("OutputFile: {}", config.output.display());
    }

    run(&config)
}

/// Scan, render and write. Nothing touches the output path unless every
/// earlier step succeeded.
fn run(config: &Config) -> Result<()> {
    let package = parser::package::load(&config.dir, &config.struct_name)?;
    let data = render::generate(&package, &config.iface)
        .context("failed to render interface")?;

    let out_path = config.dir.join(&config.output);
    write_output(&out_path, &data)?;
    log::info!(
        "wrote {} ({} method(s))",
        out_path.display(),
        package.methods.len()
    );
    Ok(())
}

/// Write through a temporary file in the destination directory, then rename.
fn write_output(path: &Path, data: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(parent)
        .with_context(|| format!("failed to create temporary file in {}", parent.display()))?;
    tmp.write_all(data)
        .with_context(|| format!("failed to write {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(tmp.path(), fs::Permissions::from_mode(0o755))
            .with_context(|| format!("failed to set permissions on {}", path.display()))?;
    }

    tmp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
