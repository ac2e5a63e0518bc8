//! Command-line interface for the pedigree utility
//!
//! Provides a CLI to render pedigree datasets, list their legend, check
//! them for dangling references and replay node drags.

use anyhow::{anyhow, bail, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::cell::RefCell;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::rc::Rc;
use tracing::{debug, info};

use pedigree::core::logging::init_logging;
use pedigree::plugins::pedigree::{PedigreeDatabase, PedigreeDocument, PedigreeEngine, PedigreeParser};
use pedigree::{BusExtent, ExportFormat, PedigreeConfig, Person, RecordingSurface, SvgSurface};

/// Pedigree - Render clinical pedigree charts from JSON family records
#[derive(Parser)]
#[command(name = "pedigree")]
#[command(about = "A Rust utility to render clinical pedigree datasets as SVG")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error)
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Log level options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render a pedigree dataset
    Render {
        /// Input JSON dataset (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Configuration JSON replacing the one embedded in the dataset
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Svg)]
        format: OutputFormat,

        /// Skip the sibling-swap layout pass
        #[arg(long)]
        no_optimize: bool,

        /// How far sibship lines extend
        #[arg(long, value_enum)]
        bus_extent: Option<BusExtentChoice>,
    },

    /// Print the legend of a dataset
    Legend {
        /// Input JSON dataset (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Show in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Check a dataset for dangling references and multiple probands
    Validate {
        /// Input JSON dataset (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Drag one node to a pixel position and write the moved dataset
    Drag {
        /// Input JSON dataset (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Id of the person to drag
        #[arg(long)]
        id: String,

        /// Pixel position to release at, as `x,y`
        #[arg(long, value_parser = parse_point)]
        to: (f64, f64),

        /// Output file for the moved dataset (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Render output formats
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Standalone SVG document
    #[default]
    Svg,
    /// Recorded draw commands as JSON
    Commands,
}

/// Sibship bus extent policies
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum BusExtentChoice {
    /// Span the children only
    Children,
    /// Also reach the parents' midpoint
    Parents,
}

impl From<BusExtentChoice> for BusExtent {
    fn from(value: BusExtentChoice) -> Self {
        match value {
            BusExtentChoice::Children => BusExtent::ChildrenOnly,
            BusExtentChoice::Parents => BusExtent::IncludeParentMidpoint,
        }
    }
}

fn parse_point(value: &str) -> Result<(f64, f64), String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected `x,y`, got '{}'", value))?;
    let x = x.trim().parse::<f64>().map_err(|e| format!("bad x '{}': {}", x, e))?;
    let y = y.trim().parse::<f64>().map_err(|e| format!("bad y '{}': {}", y, e))?;
    Ok((x, y))
}

/// Main CLI application
#[derive(Debug, Default)]
pub struct PedigreeApp {
    parser: PedigreeParser,
}

impl PedigreeApp {
    /// Create a new application instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the application with the given CLI arguments
    pub fn run(&mut self, cli: Cli) -> Result<()> {
        // Environment variables take precedence over CLI flags
        let log_level_str = std::env::var("PEDIGREE_LOG_LEVEL")
            .ok()
            .or_else(|| std::env::var("RUST_LOG").ok())
            .or_else(|| Some(cli.log_level.as_str().to_string()));

        let log_format_str = std::env::var("PEDIGREE_LOG_FORMAT")
            .ok()
            .or_else(|| Some(cli.log_format.as_str().to_string()));

        if let Err(e) = init_logging(log_level_str.as_deref(), log_format_str.as_deref()) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }

        if cli.verbose {
            eprintln!("Pedigree v{}", env!("CARGO_PKG_VERSION"));
        }

        match cli.command {
            Commands::Render {
                input,
                output,
                config,
                format,
                no_optimize,
                bus_extent,
            } => self.render_command(
                input,
                output,
                config,
                format,
                no_optimize,
                bus_extent,
                cli.verbose,
            ),
            Commands::Legend { input, json } => self.legend_command(input, json, cli.verbose),
            Commands::Validate { input } => self.validate_command(input, cli.verbose),
            Commands::Drag {
                input,
                id,
                to,
                output,
            } => self.drag_command(input, &id, to, output, cli.verbose),
        }
    }

    /// Handle the render command
    #[allow(clippy::too_many_arguments)]
    fn render_command(
        &self,
        input: Option<PathBuf>,
        output: Option<PathBuf>,
        config: Option<PathBuf>,
        format: OutputFormat,
        no_optimize: bool,
        bus_extent: Option<BusExtentChoice>,
        verbose: bool,
    ) -> Result<()> {
        let mut document = self.load_document(input, verbose)?;
        if let Some(path) = config {
            document.config = self.load_config(path)?;
        }
        if no_optimize {
            document.config.auto_layout_optimize = false;
        }
        if let Some(choice) = bus_extent {
            document.config.bus_extent = choice.into();
        }

        let rendered = match format {
            OutputFormat::Svg => {
                let engine = PedigreeEngine::builder()
                    .persons(document.persons)
                    .config(document.config)
                    .surface(SvgSurface::new())
                    .build()?;
                String::from_utf8(engine.export(ExportFormat::Svg)?)?
            }
            OutputFormat::Commands => {
                let engine = PedigreeEngine::builder()
                    .persons(document.persons)
                    .config(document.config)
                    .surface(RecordingSurface::new())
                    .build()?;
                engine.surface().to_json()?
            }
        };

        if verbose {
            eprintln!("Rendered {} bytes of {:?} output", rendered.len(), format);
        }
        self.write_output(output, &rendered)
    }

    /// Handle the legend command
    fn legend_command(&self, input: Option<PathBuf>, json: bool, verbose: bool) -> Result<()> {
        let document = self.load_document(input, verbose)?;
        let entries = pedigree::plugins::pedigree::legend(&document.persons, &document.config);

        if json {
            println!("{}", serde_json::to_string_pretty(&entries)?);
        } else if entries.is_empty() {
            println!("Legend is empty");
        } else {
            println!("Legend:");
            for entry in &entries {
                println!("  {}", entry);
            }
        }
        Ok(())
    }

    /// Handle the validate command
    fn validate_command(&self, input: Option<PathBuf>, verbose: bool) -> Result<()> {
        let document = self.load_document(input, verbose)?;
        let problems = self.find_problems(&document)?;

        if problems.is_empty() {
            println!("✓ Valid pedigree with {} persons", document.persons.len());
            return Ok(());
        }
        for problem in &problems {
            println!("✗ {}", problem);
        }
        bail!("{} problem(s) found", problems.len())
    }

    /// Describe everything in a dataset the renderer would silently tolerate
    pub fn find_problems(&self, document: &PedigreeDocument) -> Result<Vec<String>> {
        let database = PedigreeDatabase::from_persons(document.persons.iter().cloned())?;
        let mut problems: Vec<String> = database
            .dangling_references()
            .iter()
            .map(ToString::to_string)
            .collect();

        let probands: Vec<&str> = database
            .persons()
            .iter()
            .filter(|p| p.is_proband)
            .map(|p| p.id.as_str())
            .collect();
        if probands.len() > 1 {
            problems.push(format!(
                "{} persons are flagged as proband: {}",
                probands.len(),
                probands.join(", ")
            ));
        }
        debug!(problem_count = problems.len(), "Validated dataset");
        Ok(problems)
    }

    /// Handle the drag command
    fn drag_command(
        &self,
        input: Option<PathBuf>,
        id: &str,
        to: (f64, f64),
        output: Option<PathBuf>,
        verbose: bool,
    ) -> Result<()> {
        let document = self.load_document(input, verbose)?;
        let moved = self.drag(document, id, to)?;
        self.write_output(output, &self.parser.write_persons(&moved)?)
    }

    /// Press on a node, move to `to` and release; returns the committed dataset
    pub fn drag(&self, document: PedigreeDocument, id: &str, to: (f64, f64)) -> Result<Vec<Person>> {
        let committed: Rc<RefCell<Option<Vec<Person>>>> = Rc::default();
        let sink = Rc::clone(&committed);

        let mut engine = PedigreeEngine::builder()
            .persons(document.persons)
            .config(document.config)
            .surface(RecordingSurface::new())
            .on_node_moved(move |persons| *sink.borrow_mut() = Some(persons))
            .build()?;

        let start = engine
            .coordinates()
            .get(id)
            .ok_or_else(|| anyhow!("Unknown person '{}'", id))?;
        info!(id, from_x = start.x, from_y = start.y, to_x = to.0, to_y = to.1, "Replaying drag");

        engine.pointer_down(start.x, start.y);
        if engine.config().interactive {
            match engine.state().dragging() {
                Some(grabbed) if grabbed == id => {}
                Some(grabbed) => bail!(
                    "Person '{}' is covered by '{}' at ({}, {})",
                    id,
                    grabbed,
                    start.x,
                    start.y
                ),
                None => bail!("No node under '{}' at ({}, {})", id, start.x, start.y),
            }
        }
        engine.pointer_move(to.0, to.1);
        engine.pointer_up();

        let moved = committed.borrow_mut().take();
        moved.ok_or_else(|| anyhow!("Drag of '{}' was not committed; is the pedigree interactive?", id))
    }

    fn load_document(&self, input: Option<PathBuf>, verbose: bool) -> Result<PedigreeDocument> {
        let content = self.read_input(input)?;
        if verbose {
            eprintln!("Read {} bytes of input", content.len());
        }
        Ok(self.parser.parse(&content)?)
    }

    fn load_config(&self, path: PathBuf) -> Result<PedigreeConfig> {
        let content = fs::read_to_string(&path)
            .map_err(|e| anyhow!("Failed to read config file '{}': {}", path.display(), e))?;
        Ok(PedigreeConfig::from_json(&content)?)
    }

    /// Read input from file or stdin
    pub fn read_input(&self, input: Option<PathBuf>) -> Result<String> {
        match input {
            Some(path) if path.to_string_lossy() != "-" => fs::read_to_string(&path)
                .map_err(|e| anyhow!("Failed to read input file '{}': {}", path.display(), e)),
            _ => {
                let mut content = String::new();
                io::stdin().read_to_string(&mut content)?;
                Ok(content)
            }
        }
    }

    /// Write output to file or stdout
    pub fn write_output(&self, output: Option<PathBuf>, content: &str) -> Result<()> {
        match output {
            Some(path) if path.to_string_lossy() != "-" => {
                fs::write(&path, content).map_err(|e| {
                    anyhow!("Failed to write output file '{}': {}", path.display(), e)
                })?;
            }
            _ => {
                let mut stdout = io::stdout();
                stdout.write_all(content.as_bytes())?;
                if !content.is_empty() && !content.ends_with('\n') {
                    stdout.write_all(b"\n")?;
                }
                stdout.flush()?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pedigree::GridPos;
    use std::fs;
    use tempfile::tempdir;

    const FAMILY: &str = r#"[
        {"id": "A", "name": "Father", "sex": "M", "pos": {"x": 0, "y": 0}, "mate": "B"},
        {"id": "B", "name": "Mother", "sex": "F", "pos": {"x": 2, "y": 0}},
        {"id": "C", "name": "Child", "sex": "F", "pos": {"x": 1, "y": 1}, "parents": ["A", "B"]}
    ]"#;

    #[test]
    fn test_cli_parsing_render_command() {
        let args = vec![
            "pedigree",
            "render",
            "--input",
            "family.json",
            "--output",
            "family.svg",
            "--format",
            "commands",
            "--no-optimize",
            "--bus-extent",
            "children",
        ];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Render {
                input,
                output,
                config,
                format,
                no_optimize,
                bus_extent,
            } => {
                assert_eq!(input.unwrap().to_string_lossy(), "family.json");
                assert_eq!(output.unwrap().to_string_lossy(), "family.svg");
                assert!(config.is_none());
                assert_eq!(format, OutputFormat::Commands);
                assert!(no_optimize);
                assert_eq!(bus_extent, Some(BusExtentChoice::Children));
            }
            _ => panic!("Expected Render command"),
        }
    }

    #[test]
    fn test_cli_parsing_render_defaults() {
        let cli = Cli::try_parse_from(vec!["pedigree", "render"]).unwrap();
        match cli.command {
            Commands::Render {
                format, bus_extent, ..
            } => {
                assert_eq!(format, OutputFormat::Svg);
                assert!(bus_extent.is_none());
            }
            _ => panic!("Expected Render command"),
        }
        assert_eq!(cli.log_level, LogLevel::Warn);
    }

    #[test]
    fn test_cli_parsing_drag_command() {
        let args = vec!["pedigree", "drag", "--id", "C", "--to", "200, 240"];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Drag { id, to, .. } => {
                assert_eq!(id, "C");
                assert_eq!(to, (200.0, 240.0));
            }
            _ => panic!("Expected Drag command"),
        }
    }

    #[test]
    fn test_cli_rejects_bad_point() {
        let args = vec!["pedigree", "drag", "--id", "C", "--to", "200"];
        assert!(Cli::try_parse_from(args).is_err());
        assert!(parse_point("a,1").is_err());
    }

    #[test]
    fn test_cli_parsing_legend_command() {
        let cli = Cli::try_parse_from(vec!["pedigree", "legend", "--json"]).unwrap();
        match cli.command {
            Commands::Legend { input, json } => {
                assert!(input.is_none());
                assert!(json);
            }
            _ => panic!("Expected Legend command"),
        }
    }

    #[test]
    fn test_verbose_flag() {
        let cli = Cli::try_parse_from(vec!["pedigree", "--verbose", "validate"]).unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn test_bus_extent_choice_conversion() {
        assert_eq!(BusExtent::from(BusExtentChoice::Children), BusExtent::ChildrenOnly);
        assert_eq!(
            BusExtent::from(BusExtentChoice::Parents),
            BusExtent::IncludeParentMidpoint
        );
    }

    #[test]
    fn test_read_and_write_files() {
        let app = PedigreeApp::new();
        let dir = tempdir().unwrap();
        let input_path = dir.path().join("family.json");
        fs::write(&input_path, FAMILY).unwrap();
        assert_eq!(app.read_input(Some(input_path)).unwrap(), FAMILY);

        let output_path = dir.path().join("out.txt");
        app.write_output(Some(output_path.clone()), "content").unwrap();
        assert_eq!(fs::read_to_string(&output_path).unwrap(), "content");
    }

    #[test]
    fn test_render_command_writes_svg() {
        let app = PedigreeApp::new();
        let dir = tempdir().unwrap();
        let input_path = dir.path().join("family.json");
        let output_path = dir.path().join("family.svg");
        fs::write(&input_path, FAMILY).unwrap();

        app.render_command(
            Some(input_path),
            Some(output_path.clone()),
            None,
            OutputFormat::Svg,
            false,
            None,
            false,
        )
        .unwrap();

        let svg = fs::read_to_string(&output_path).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("Child"));
    }

    #[test]
    fn test_render_command_with_config_file() {
        let app = PedigreeApp::new();
        let dir = tempdir().unwrap();
        let input_path = dir.path().join("family.json");
        let config_path = dir.path().join("config.json");
        let output_path = dir.path().join("commands.json");
        fs::write(&input_path, FAMILY).unwrap();
        fs::write(&config_path, r#"{"lineColor": "red"}"#).unwrap();

        app.render_command(
            Some(input_path),
            Some(output_path.clone()),
            Some(config_path),
            OutputFormat::Commands,
            true,
            Some(BusExtentChoice::Children),
            false,
        )
        .unwrap();

        let json = fs::read_to_string(&output_path).unwrap();
        assert!(json.contains(r#""color":"red""#));
    }

    #[test]
    fn test_render_command_rejects_bad_config() {
        let app = PedigreeApp::new();
        let dir = tempdir().unwrap();
        let input_path = dir.path().join("family.json");
        let config_path = dir.path().join("config.json");
        fs::write(&input_path, FAMILY).unwrap();
        fs::write(&config_path, r#"{"hSpacing": 0}"#).unwrap();

        let result = app.render_command(
            Some(input_path),
            None,
            Some(config_path),
            OutputFormat::Svg,
            false,
            None,
            false,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_find_problems() {
        let app = PedigreeApp::new();
        let document = app
            .parser
            .parse(
                r#"[
                {"id": "A", "sex": "M", "pos": {"x": 0, "y": 0}, "mate": "ghost", "isProband": true},
                {"id": "B", "sex": "F", "pos": {"x": 1, "y": 0}, "isProband": true}
            ]"#,
            )
            .unwrap();

        let problems = app.find_problems(&document).unwrap();
        assert_eq!(problems.len(), 2);
        assert!(problems[0].contains("ghost"));
        assert!(problems[1].contains("A, B"));

        let clean = app.parser.parse(FAMILY).unwrap();
        assert!(app.find_problems(&clean).unwrap().is_empty());
    }

    #[test]
    fn test_drag_commits_clamped_position() {
        let app = PedigreeApp::new();
        let document = app.parser.parse(FAMILY).unwrap();

        let moved = app.drag(document, "C", (-100.0, 240.0)).unwrap();
        assert_eq!(moved[2].pos, GridPos::new(0.0, 2.0));
        assert_eq!(moved[0].pos, GridPos::new(0.0, 0.0));
    }

    #[test]
    fn test_drag_unknown_person() {
        let app = PedigreeApp::new();
        let document = app.parser.parse(FAMILY).unwrap();
        let err = app.drag(document, "Z", (0.0, 0.0)).unwrap_err();
        assert!(err.to_string().contains("Unknown person"));
    }

    #[test]
    fn test_drag_refuses_covered_person() {
        let app = PedigreeApp::new();
        let document = app
            .parser
            .parse(
                r#"[
                    {"id": "A", "sex": "M", "pos": {"x": 0, "y": 0}},
                    {"id": "B", "sex": "M", "pos": {"x": 0, "y": 0}}
                ]"#,
            )
            .unwrap();

        let err = app.drag(document.clone(), "A", (360.0, 40.0)).unwrap_err();
        assert!(err.to_string().contains("covered by 'B'"));

        let moved = app.drag(document, "B", (360.0, 40.0)).unwrap();
        assert_eq!(moved[0].pos, GridPos::new(0.0, 0.0));
        assert_eq!(moved[1].pos, GridPos::new(4.0, 0.0));
    }

    #[test]
    fn test_drag_requires_interactive() {
        let app = PedigreeApp::new();
        let mut document = app.parser.parse(FAMILY).unwrap();
        document.config.interactive = false;
        assert!(app.drag(document, "C", (40.0, 240.0)).is_err());
    }
}
