#![forbid(unsafe_code)]

//! Command-line argument parsing for the demo.
//!
//! Parses args manually (no external dependencies) to keep the binary lean.
//! Supports environment variable overrides via `SHELF_DEMO_*` prefix.

use std::env;
use std::path::PathBuf;
use std::process;

use shelf::ViewMode;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP_TEXT: &str = "\
Shelfwise Demo: windowed inventory browsing without a screen

USAGE:
    shelf-demo [OPTIONS]

OPTIONS:
    --items=N            Number of synthetic items (default: 10000)
    --item-height=PX     Row height in pixels (default: 60)
    --viewport=PX        Viewport height in pixels (default: 600)
    --width=PX           Container width in pixels (default: 1024)
    --overscan=N         Rows rendered beyond each edge (default: 5)
    --view=MODE          'list' (default), 'table' or 'grid'
    --frames=N           Animation frames to simulate (default: 30)
    --prefs=PATH         Persist view preferences to a JSON file
    --help, -h           Show this help message
    --version, -V        Show version

ENVIRONMENT VARIABLES:
    SHELF_DEMO_ITEMS         Override --items
    SHELF_DEMO_ITEM_HEIGHT   Override --item-height
    SHELF_DEMO_VIEWPORT      Override --viewport
    SHELF_DEMO_WIDTH         Override --width
    SHELF_DEMO_OVERSCAN      Override --overscan
    SHELF_DEMO_VIEW          Override --view
    SHELF_DEMO_FRAMES        Override --frames
    SHELF_DEMO_PREFS         Override --prefs
    SHELF_LOG                Log filter, e.g. 'debug' or 'shelf_runtime=trace'";

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opts {
    /// Number of synthetic items.
    pub items: usize,
    /// Row height in pixels.
    pub item_height: u32,
    /// Viewport height in pixels.
    pub viewport: u32,
    /// Container width in pixels.
    pub width: u32,
    /// Overscan in rows.
    pub overscan: usize,
    /// Initial view mode (stored preferences win if present).
    pub view: ViewMode,
    /// Frames to simulate.
    pub frames: u32,
    /// Preference file, or in-memory preferences when unset.
    pub prefs: Option<PathBuf>,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            items: 10_000,
            item_height: 60,
            viewport: 600,
            width: 1024,
            overscan: 5,
            view: ViewMode::List,
            frames: 30,
            prefs: None,
        }
    }
}

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run the simulation.
    Run(Opts),
    /// Print help.
    Help,
    /// Print the version.
    Version,
}

impl Opts {
    /// Parse command-line arguments and environment variables, exiting on
    /// `--help`, `--version` or invalid input.
    ///
    /// Environment variables take precedence over defaults but are overridden
    /// by explicit command-line flags.
    pub fn parse() -> Self {
        match Self::parse_from(env::args().skip(1), |key| env::var(key).ok()) {
            Ok(Command::Run(opts)) => opts,
            Ok(Command::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Ok(Command::Version) => {
                println!("shelf-demo {VERSION}");
                process::exit(0);
            }
            Err(msg) => {
                eprintln!("{msg}");
                eprintln!("Run with --help for usage information.");
                process::exit(1);
            }
        }
    }

    /// Parse from explicit arguments and an environment lookup.
    pub fn parse_from<I, S>(
        args: I,
        env_var: impl Fn(&str) -> Option<String>,
    ) -> Result<Command, String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut opts = Self::default();

        // Apply environment variable defaults first
        if let Some(val) = env_var("SHELF_DEMO_ITEMS")
            && let Ok(n) = val.parse()
        {
            opts.items = n;
        }
        if let Some(val) = env_var("SHELF_DEMO_ITEM_HEIGHT")
            && let Ok(n) = val.parse()
        {
            opts.item_height = n;
        }
        if let Some(val) = env_var("SHELF_DEMO_VIEWPORT")
            && let Ok(n) = val.parse()
        {
            opts.viewport = n;
        }
        if let Some(val) = env_var("SHELF_DEMO_WIDTH")
            && let Ok(n) = val.parse()
        {
            opts.width = n;
        }
        if let Some(val) = env_var("SHELF_DEMO_OVERSCAN")
            && let Ok(n) = val.parse()
        {
            opts.overscan = n;
        }
        if let Some(val) = env_var("SHELF_DEMO_VIEW")
            && let Some(mode) = ViewMode::parse(&val)
        {
            opts.view = mode;
        }
        if let Some(val) = env_var("SHELF_DEMO_FRAMES")
            && let Ok(n) = val.parse()
        {
            opts.frames = n;
        }
        if let Some(val) = env_var("SHELF_DEMO_PREFS")
            && !val.is_empty()
        {
            opts.prefs = Some(PathBuf::from(val));
        }

        // Parse command-line args (override env vars)
        for arg in args {
            match arg.as_ref() {
                "--help" | "-h" => return Ok(Command::Help),
                "--version" | "-V" => return Ok(Command::Version),
                other => {
                    if let Some(val) = other.strip_prefix("--items=") {
                        opts.items = number(val, "--items")?;
                    } else if let Some(val) = other.strip_prefix("--item-height=") {
                        opts.item_height = number(val, "--item-height")?;
                    } else if let Some(val) = other.strip_prefix("--viewport=") {
                        opts.viewport = number(val, "--viewport")?;
                    } else if let Some(val) = other.strip_prefix("--width=") {
                        opts.width = number(val, "--width")?;
                    } else if let Some(val) = other.strip_prefix("--overscan=") {
                        opts.overscan = number(val, "--overscan")?;
                    } else if let Some(val) = other.strip_prefix("--frames=") {
                        opts.frames = number(val, "--frames")?;
                    } else if let Some(val) = other.strip_prefix("--view=") {
                        opts.view = ViewMode::parse(val)
                            .ok_or_else(|| format!("Invalid --view value: {val}"))?;
                    } else if let Some(val) = other.strip_prefix("--prefs=") {
                        opts.prefs = Some(PathBuf::from(val));
                    } else {
                        return Err(format!("Unknown argument: {other}"));
                    }
                }
            }
        }

        Ok(Command::Run(opts))
    }
}

fn number<T: std::str::FromStr>(val: &str, flag: &str) -> Result<T, String> {
    val.parse().map_err(|_| format!("Invalid {flag} value: {val}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn parse(args: &[&str], env: &[(&str, &str)]) -> Result<Command, String> {
        let env: HashMap<String, String> = env
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Opts::parse_from(args.iter().copied(), |k| env.get(k).cloned())
    }

    fn run(args: &[&str], env: &[(&str, &str)]) -> Opts {
        match parse(args, env) {
            Ok(Command::Run(opts)) => opts,
            other => panic!("expected run, got {other:?}"),
        }
    }

    #[test]
    fn default_opts() {
        let opts = Opts::default();
        assert_eq!(opts.items, 10_000);
        assert_eq!(opts.item_height, 60);
        assert_eq!(opts.viewport, 600);
        assert_eq!(opts.overscan, 5);
        assert_eq!(opts.view, ViewMode::List);
        assert!(opts.prefs.is_none());
        assert_eq!(run(&[], &[]), opts);
    }

    #[test]
    fn flags_are_parsed() {
        let opts = run(
            &[
                "--items=500",
                "--item-height=40",
                "--view=grid",
                "--width=700",
                "--prefs=/tmp/p.json",
            ],
            &[],
        );
        assert_eq!(opts.items, 500);
        assert_eq!(opts.item_height, 40);
        assert_eq!(opts.view, ViewMode::Grid);
        assert_eq!(opts.width, 700);
        assert_eq!(opts.prefs, Some(PathBuf::from("/tmp/p.json")));
    }

    #[test]
    fn env_is_overridden_by_flags() {
        let env = [
            ("SHELF_DEMO_ITEMS", "42"),
            ("SHELF_DEMO_VIEW", "table"),
            ("SHELF_DEMO_OVERSCAN", "x"),
        ];
        let opts = run(&["--items=7"], &env);
        assert_eq!(opts.items, 7);
        assert_eq!(opts.view, ViewMode::Table);
        // Unparseable env values are ignored.
        assert_eq!(opts.overscan, 5);
    }

    #[test]
    fn help_version_and_errors() {
        assert_eq!(parse(&["--help"], &[]), Ok(Command::Help));
        assert_eq!(parse(&["-V"], &[]), Ok(Command::Version));
        assert_eq!(
            parse(&["--items=many"], &[]),
            Err("Invalid --items value: many".to_string())
        );
        assert_eq!(
            parse(&["--view=carousel"], &[]),
            Err("Invalid --view value: carousel".to_string())
        );
        assert_eq!(parse(&["--bogus"], &[]), Err("Unknown argument: --bogus".to_string()));
    }

    #[test]
    fn version_string_nonempty() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn help_text_lists_env_overrides() {
        assert!(HELP_TEXT.contains("SHELF_DEMO_ITEMS"));
        assert!(HELP_TEXT.contains("SHELF_LOG"));
        assert!(HELP_TEXT.contains("--view=MODE"));
    }
}
