//! CLI for the areacheck point evaluator.
//!
//! Provides:
//! - SVG rendering of the admissible region for a given R
//! - `submit`, `history` and `clear` against a running evaluator
//! - A reference evaluator server

mod client;
mod render;
mod server;

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand};
use log::info;
use url::Url;

use areacheck_core::evaluator::{format_number, DEFAULT_ENDPOINT};
use areacheck_core::network::{clear_history, load_history, submit};
use areacheck_core::validate::parse_decimal;
use areacheck_core::{ClientConfig, Controller, Field, Phase, Rejection, RegionParameter, ValidationError, Viewport};

use client::{HttpEvaluator, TerminalView};

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("AREACHECK_BUILD_SHA"), ")");

#[derive(Parser)]
#[command(name = "areacheck")]
#[command(version = VERSION, about = "Point-in-region checks: render, query, or serve", long_about = None)]
struct Cli {
    /// Evaluator URL
    #[arg(long, global = true, env = "AREACHECK_ENDPOINT", default_value = "http://127.0.0.1:8080/fcgi-bin/server.jar")]
    endpoint: String,

    /// Session id sent as the SID cookie
    #[arg(long, global = true, env = "AREACHECK_SESSION")]
    session: Option<String>,

    /// JSON client settings (`xValues`, `defaultR`); `--endpoint` takes precedence
    #[arg(long, global = true, env = "AREACHECK_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the region to SVG
    Render {
        /// Region parameter, 2 to 5
        #[arg(short, long, default_value = "2")]
        r: String,

        /// Logical width
        #[arg(long, default_value = "400")]
        width: f64,

        /// Logical height
        #[arg(long, default_value = "400")]
        height: f64,

        /// Device pixels per logical pixel
        #[arg(long, default_value = "1")]
        density: f64,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check one point and print the evaluator's row
    Submit {
        #[arg(short, allow_hyphen_values = true)]
        x: String,

        #[arg(short, allow_hyphen_values = true)]
        y: String,

        #[arg(short, allow_hyphen_values = true, default_value = "2")]
        r: String,
    },

    /// Print this session's results, most recent first
    History,

    /// Forget this session's results
    Clear,

    /// Run the reference evaluator
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,

        /// Path to answer on
        #[arg(long, default_value = DEFAULT_ENDPOINT)]
        path: String,

        /// Rows kept per session
        #[arg(long, default_value = "2000")]
        max_rows: usize,
    },
}

fn client_config(endpoint: &str, json: Option<&str>) -> anyhow::Result<ClientConfig> {
    let url = Url::parse(endpoint).with_context(|| format!("invalid endpoint {:?}", endpoint))?;
    let base = match json {
        Some(json) => ClientConfig::from_json(json)?,
        None => ClientConfig::default(),
    };
    let config = ClientConfig {
        endpoint: url.to_string(),
        ..base
    };
    config.validate()?;
    Ok(config)
}

fn load_client_config(endpoint: &str, file: Option<&Path>) -> anyhow::Result<ClientConfig> {
    let json = file
        .map(|path| std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display())))
        .transpose()?;
    client_config(endpoint, json.as_deref())
}

fn print_results(view: &TerminalView) {
    for line in view.lines() {
        println!("{}", line);
    }
}

async fn run_submit(config: &ClientConfig, evaluator: &HttpEvaluator, x: &str, y: &str, r: &str) -> anyhow::Result<()> {
    let controller = RefCell::new(Controller::new(config, TerminalView::default()));
    {
        let mut c = controller.borrow_mut();
        let x = parse_decimal(x).ok_or_else(|| anyhow!("x must be a number, got {:?}", x))?;
        let index = c.form().x.options().iter().position(|o| o.value == x).ok_or_else(|| {
            let offered: Vec<String> = config.x_values.iter().map(|v| format_number(*v)).collect();
            anyhow!("x must be one of {}", offered.join(", "))
        })?;
        c.select_x(index, true);
        c.edit(Field::Y, y);
        c.edit(Field::R, r);
    }

    submit(&controller, evaluator).await?;

    let c = controller.borrow();
    if let Phase::Rejected(Rejection::Transport(..)) = c.phase() {
        bail!("{}", c.message());
    }
    print_results(c.view());
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            r,
            width,
            height,
            density,
            output,
        } => {
            let r = parse_decimal(&r).and_then(RegionParameter::new).ok_or(ValidationError::R)?;
            let svg = render::render_svg(r, Viewport::new(width, height, density));
            match output {
                Some(path) => {
                    std::fs::write(&path, svg).with_context(|| format!("writing {}", path.display()))?;
                    info!("wrote {}", path.display());
                }
                None => print!("{}", svg),
            }
        }
        Commands::Submit { x, y, r } => {
            let config = load_client_config(&cli.endpoint, cli.config.as_deref())?;
            let evaluator = HttpEvaluator::new(cli.session);
            run_submit(&config, &evaluator, &x, &y, &r).await?;
        }
        Commands::History => {
            let config = load_client_config(&cli.endpoint, cli.config.as_deref())?;
            let evaluator = HttpEvaluator::new(cli.session);
            let controller = RefCell::new(Controller::new(&config, TerminalView::default()));
            load_history(&controller, &evaluator).await;
            print_results(controller.borrow().view());
        }
        Commands::Clear => {
            let config = load_client_config(&cli.endpoint, cli.config.as_deref())?;
            let evaluator = HttpEvaluator::new(cli.session);
            let controller = RefCell::new(Controller::new(&config, TerminalView::default()));
            clear_history(&controller, &evaluator).await;
            let c = controller.borrow();
            if c.message().is_empty() {
                bail!("evaluator unreachable at {}", config.endpoint);
            }
            eprintln!("{}", c.message());
        }
        Commands::Serve { port, path, max_rows } => {
            server::run_server(port, server::ServerConfig { path, max_rows }).await?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config() {
        let config = client_config("http://localhost:8080/fcgi-bin/server.jar", None).unwrap();
        assert_eq!(config.endpoint, "http://localhost:8080/fcgi-bin/server.jar");
        assert_eq!(config.x_values.len(), 9);
        assert!(client_config("not a url", None).is_err());
    }

    #[test]
    fn test_client_config_from_json() {
        let json = r#"{"endpoint": "/ignored", "xValues": [-1, 0.5, 1], "defaultR": 4}"#;
        let config = client_config("http://localhost:8080/eval", Some(json)).unwrap();
        assert_eq!(config.endpoint, "http://localhost:8080/eval");
        assert_eq!(config.x_values, vec![-1., 0.5, 1.]);
        assert_eq!(config.default_r, 4.);
        assert!(client_config("http://localhost:8080/eval", Some(r#"{"defaultR": 9}"#)).is_err());
        assert!(load_client_config("http://localhost:8080/eval", Some(Path::new("/nonexistent/areacheck.json"))).is_err());
    }

    #[test]
    fn test_cli_parses_negative_values() {
        let cli = Cli::try_parse_from(["areacheck", "submit", "-x", "-2", "-y", "-1,5", "-r", "3"]).unwrap();
        match cli.command {
            Commands::Submit { x, y, r } => assert_eq!((x.as_str(), y.as_str(), r.as_str()), ("-2", "-1,5", "3")),
            _ => panic!("expected submit"),
        }
    }
}
