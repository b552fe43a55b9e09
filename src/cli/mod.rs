//! CLI definition for depscan.

use clap::Parser;
use std::path::PathBuf;

use crate::config::ScanConfig;

#[derive(Parser, Debug)]
#[command(name = "depscan")]
#[command(about = "Find lftp transfers and outbound HTTP calls in a git repository")]
#[command(version)]
pub struct Cli {
    /// Repository root (default: current directory)
    #[arg(short, long, default_value = ".")]
    pub root: PathBuf,

    /// Config file (default: <root>/.depscan/config.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// DSL output file
    #[arg(long)]
    pub dsl: Option<PathBuf>,

    /// Also write the JSON summary to this file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Analyze files one at a time
    #[arg(long)]
    pub sequential: bool,

    /// Debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Load the config file and apply command-line overrides.
    pub fn resolve_config(&self) -> ScanConfig {
        let path = self
            .config
            .clone()
            .unwrap_or_else(|| ScanConfig::default_path(&self.root));
        let mut config = ScanConfig::load(&path);

        if let Some(dsl) = &self.dsl {
            config.output.dsl = dsl.clone();
        }
        if let Some(summary) = &self.summary {
            config.output.summary = Some(summary.clone());
        }
        if self.sequential {
            config.scan.parallel = false;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["depscan"]);
        assert_eq!(cli.root, PathBuf::from("."));
        assert!(!cli.sequential);
        let config = cli.resolve_config();
        assert!(config.scan.parallel);
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::parse_from([
            "depscan",
            "--root",
            "/nonexistent/repo",
            "--dsl",
            "out.dsl",
            "--summary",
            "out.json",
            "--sequential",
        ]);
        let config = cli.resolve_config();
        assert_eq!(config.output.dsl, PathBuf::from("out.dsl"));
        assert_eq!(config.output.summary, Some(PathBuf::from("out.json")));
        assert!(!config.scan.parallel);
    }
}
