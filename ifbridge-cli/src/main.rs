//! `ifbridge` command line interface.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use ifbridge_codegen::{DEFAULT_INTERFACE_PATH, GeneratorConfig};
use ifbridge_schema::InterfaceIr;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ifbridge")]
#[command(about = "Generate typed host bridges from interface schemas", long_about = None)]
#[command(version)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the declarations and definitions files
    Generate(GenerateArgs),

    /// Parse and validate a schema, then print a summary
    Check {
        /// Input schema file
        #[arg(short, long)]
        infile: PathBuf,
    },
}

#[derive(Args)]
struct GenerateArgs {
    /// Input schema file
    #[arg(short, long)]
    infile: PathBuf,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Prefix of each bridge's transport interface name
    #[arg(long, default_value = DEFAULT_INTERFACE_PATH)]
    interface_path: String,

    /// Prefix of the aggregate types
    #[arg(long, default_value = "Api")]
    aggregate: String,

    /// Runtime crate path imported by the generated code
    #[arg(long, default_value = "ifbridge_core")]
    runtime_crate: String,
}

impl GenerateArgs {
    fn config(&self) -> GeneratorConfig {
        GeneratorConfig::new()
            .with_interface_path(&self.interface_path)
            .with_aggregate_name(&self.aggregate)
            .with_runtime_crate(&self.runtime_crate)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Generate(args) => {
            let (declarations, definitions) = generate(args)?;
            println!(
                "Generated {} and {}",
                declarations.display(),
                definitions.display()
            );
        }
        Commands::Check { infile } => {
            let summary = check(infile)?;
            println!("{summary}");
        }
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn generate(args: &GenerateArgs) -> Result<(PathBuf, PathBuf)> {
    let config = args.config();
    let code = ifbridge_codegen::generate_from_file(&args.infile, &config)
        .with_context(|| format!("failed to generate from {}", args.infile.display()))?;
    code.write_to_dir(&args.out_dir, &config)
        .with_context(|| format!("failed to write into {}", args.out_dir.display()))
}

fn check(infile: &Path) -> Result<String> {
    let xml = std::fs::read_to_string(infile)
        .with_context(|| format!("failed to read {}", infile.display()))?;
    let schema = ifbridge_schema::parse_schema(&xml)
        .with_context(|| format!("failed to parse {}", infile.display()))?;
    let ir = InterfaceIr::from_schema(&schema)
        .with_context(|| format!("invalid schema {}", infile.display()))?;

    let methods: usize = ir.interfaces.iter().map(|i| i.methods.len()).sum();
    let notifications: usize = ir.interfaces.iter().map(|i| i.notifications.len()).sum();
    Ok(format!(
        "{}: {} interfaces ({} bridged), {} structs, {} enums, {} methods, {} notifications",
        schema.name.as_deref().unwrap_or("schema"),
        ir.interfaces.len(),
        ir.bridged_interfaces().count(),
        ir.structs.len(),
        ir.enums.len(),
        methods,
        notifications
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &str = r#"<interfaces name="demo">
        <interface name="Common">
            <enum name="Mode"><element name="ON"/></enum>
            <struct name="Coord"><param name="x" type="Integer"/></struct>
        </interface>
        <interface name="UI">
            <function name="Show" messagetype="request"/>
            <function name="Show" messagetype="response"/>
            <function name="OnReady" messagetype="notification"/>
        </interface>
    </interfaces>"#;

    fn write_schema(dir: &Path, xml: &str) -> PathBuf {
        let path = dir.join("api.xml");
        std::fs::write(&path, xml).expect("Failed to write schema");
        path
    }

    #[test]
    fn test_cli_parses_generate() {
        let cli = Cli::try_parse_from([
            "ifbridge",
            "-v",
            "generate",
            "--infile",
            "api.xml",
            "--aggregate",
            "Hmi",
        ])
        .expect("Failed to parse arguments");
        assert!(cli.verbose);
        match cli.command {
            Commands::Generate(args) => {
                assert_eq!(args.out_dir, PathBuf::from("."));
                let config = args.config();
                assert_eq!(config.bridges_type(), "HmiBridges");
                assert_eq!(config.interface_path, DEFAULT_INTERFACE_PATH);
            }
            Commands::Check { .. } => panic!("Expected generate"),
        }
    }

    #[test]
    fn test_generate_writes_files() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let infile = write_schema(dir.path(), SCHEMA);
        let args = GenerateArgs {
            infile,
            out_dir: dir.path().join("out"),
            interface_path: "com.example".to_string(),
            aggregate: "Api".to_string(),
            runtime_crate: "ifbridge_core".to_string(),
        };

        let (declarations, _) = generate(&args).expect("Failed to generate");
        let written = std::fs::read_to_string(declarations).expect("Failed to read output");
        assert!(written.contains("\"com.example.UI\""));
    }

    #[test]
    fn test_check_summary() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let infile = write_schema(dir.path(), SCHEMA);
        let summary = check(&infile).expect("Failed to check schema");
        assert_eq!(
            summary,
            "demo: 2 interfaces (1 bridged), 1 structs, 1 enums, 1 methods, 1 notifications"
        );
    }

    #[test]
    fn test_check_reports_context() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let infile = write_schema(
            dir.path(),
            r#"<interfaces><interface name="UI">
                <function name="Show" messagetype="request"/>
            </interface></interfaces>"#,
        );
        let err = check(&infile).expect_err("Unpaired request must fail");
        assert!(err.to_string().starts_with("invalid schema"));
    }
}
