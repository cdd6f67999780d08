use clap::{value_parser, Arg, ArgAction, Command};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use saludguard_client::render::{self, LOADING_HINT};
use saludguard_client::{
    AnalysisResponse, ClientError, RequestState, SaludGuardClient, SelectedFile, Session,
    DEFAULT_SERVER_ADDR,
};

fn init_logging(verbose: u8, no_color: bool) {
    let log_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(!no_color)
        .with_writer(io::stderr)
        .init();
}

fn spinner() -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("  {spinner:.cyan} {msg}") {
        bar.set_style(style);
    }
    bar.set_message("Agentes IA Analizando...");
    bar.enable_steady_tick(Duration::from_millis(120));
    bar
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {}", console::style("Error:").red().bold(), e);
        std::process::exit(2);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let matches = Command::new("saludguard")
        .about("Audit a medical-leave certificate with the SaludGuard analysis API")
        .arg(
            Arg::new("server-addr")
                .long("server-addr")
                .global(true)
                .env("SALUDGUARD_SERVER_ADDR")
                .default_value(DEFAULT_SERVER_ADDR)
                .value_parser(value_parser!(url::Url)),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Print the server response as JSON instead of the rendered report"),
        )
        .arg(
            Arg::new("no-color")
                .long("no-color")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::Count),
        )
        .arg_required_else_help(true)
        .subcommand_required(true)
        .subcommand(
            Command::new("analyze")
                .about("Upload a certificate (PDF or image) and show the audit report")
                .arg(
                    Arg::new("file_path")
                        .value_parser(value_parser!(PathBuf))
                        .required(true),
                ),
        )
        .subcommand(Command::new("ping").about("Check that the analysis API is reachable"))
        .get_matches();

    let no_color = matches.get_flag("no-color");
    init_logging(matches.get_count("verbose"), no_color);
    if no_color {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }

    let server_addr = matches
        .get_one::<url::Url>("server-addr")
        .expect("server-addr has a default value");
    let json_output = matches.get_flag("json");

    let client = SaludGuardClient::new_for_server(server_addr.as_str())?;

    if matches.subcommand_matches("ping").is_some() {
        let message = client.health()?;
        if json_output {
            serde_json::to_writer(io::stdout(), &serde_json::json!({ "message": message }))?;
        } else {
            println!("{} {}", console::style("✓").green(), message);
        }
        return Ok(());
    }

    let matches = matches
        .subcommand_matches("analyze")
        .expect("analyze is the only other subcommand");
    let filename = matches
        .get_one::<PathBuf>("file_path")
        .expect("file_path is required");

    let mut session = Session::new();
    session.select_file(SelectedFile::open(filename)?);

    if json_output {
        // print the body exactly as the server sent it
        if let Some(file) = session.begin_submit() {
            let result = client.send_analysis_request_raw(&file).and_then(
                |body| -> Result<AnalysisResponse, ClientError> {
                    let response = serde_json::from_slice(&body)?;
                    let mut stdout = io::stdout().lock();
                    stdout.write_all(&body)?;
                    stdout.flush()?;
                    Ok(response)
                },
            );
            session.settle(result);
        }
    } else {
        eprintln!("{}", render::render_session(&session));
        eprintln!("  {}", console::style(LOADING_HINT).dim());
        let bar = spinner();
        session.submit(&client);
        bar.finish_and_clear();
    }

    match session.state() {
        RequestState::Error(_) => {
            eprintln!("{}", render::render_session(&session));
            std::process::exit(1);
        }
        _ if json_output => {}
        _ => println!("{}", render::render_session(&session)),
    }
    Ok(())
}
