use layout_primitives::{parse_page, render_page, LayoutConfig, LayoutError, Severity};
use std::env;
use std::fs;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut args: Vec<String> = env::args().skip(1).collect();
    let report = take_flag(&mut args, "--report");

    let config = match take_config_arg(&mut args) {
        Ok(Some(path)) => match LayoutConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("✗ {}: {}", path, e);
                process::exit(2);
            }
        },
        Ok(None) => LayoutConfig::default(),
        Err(msg) => {
            eprintln!("{}", msg);
            process::exit(2);
        }
    };

    if args.is_empty() {
        eprintln!("Usage: layout-css [--config <config.yaml>] [--report] <page.yaml>...");
        eprintln!();
        eprintln!("Examples:");
        eprintln!("  layout-css page.yaml");
        eprintln!("  layout-css --config layout.yaml pages/*.yaml");
        eprintln!("  layout-css --report page.yaml    # YAML summary of every instance");
        process::exit(1);
    }

    let mut exit_code = 0;
    for file_path in &args {
        match render_file(file_path, &config, report) {
            Ok(errors) => {
                if errors > 0 {
                    exit_code = 1;
                }
            }
            Err(e) => {
                eprintln!("✗ {} could not be rendered:", file_path);
                eprintln!("  {}", e);
                exit_code = 1;
            }
        }
    }

    process::exit(exit_code);
}

fn take_flag(args: &mut Vec<String>, flag: &str) -> bool {
    let before = args.len();
    args.retain(|a| a != flag);
    args.len() != before
}

/// Pull `--config <path>` out of the argument list
fn take_config_arg(args: &mut Vec<String>) -> Result<Option<String>, String> {
    let Some(pos) = args.iter().position(|a| a == "--config") else {
        return Ok(None);
    };
    if pos + 1 >= args.len() {
        return Err("--config needs a file path".to_string());
    }
    let path = args.remove(pos + 1);
    args.remove(pos);
    Ok(Some(path))
}

/// Print the page's stylesheet, or its report; returns the number of error diagnostics
fn render_file(path: &str, config: &LayoutConfig, report: bool) -> Result<usize, LayoutError> {
    let content = fs::read_to_string(path)?;
    let page = parse_page(&content)?;
    let render = render_page(&page, config)?;
    let errors = render
        .diagnostics()
        .filter(|d| d.severity == Severity::Error)
        .count();

    if report {
        println!("# {}", path);
        print!("{}", render.report_yaml()?);
        return Ok(errors);
    }

    println!("/* {}: {} stylesheet(s) */", path, render.entries);
    if !render.stylesheet.is_empty() {
        println!("{}", render.stylesheet);
    }

    for diagnostic in render.diagnostics() {
        eprintln!("  {}", diagnostic);
    }
    Ok(errors)
}
