//! A terminal front end for the student e-voting client.
//! Each subcommand drives the same resource clients and view builders a
//! graphical screen would, and prints the result.

use std::fmt::Write as _;
use std::sync::Arc;

use chrono::Utc;
use clap::{Arg, ArgAction, ArgMatches, Command};
use log::{error, info};

use evote_client::{
    api::{auth::Credentials, ApiClient},
    config::Config,
    countdown::{self, display_status, Countdown, ElectionPhase, SystemClock},
    model::{notification::unread_count, Candidate},
    view::{
        coalition_name_table, group_by_coalition, group_by_position, latest_election,
        position_name_table, CandidateFilter, CandidateGroup, CandidateSources,
    },
    Error, Result,
};

const PROGRAM_NAME: &str = "evote-cli";

const ABOUT_TEXT: &str = "Browse elections and candidates from the terminal.

Settings are read from Evote.toml and EVOTE_* environment variables.

EXIT CODES:
     0: Success.
     1: The request failed; the reason is printed.
     2: Bad configuration or usage.";

const ELECTION_ID: &str = "ELECTION_ID";
const REG_NO: &str = "REG_NO";
const PASSWORD: &str = "PASSWORD";
const SEARCH: &str = "search";
const POSITION: &str = "position";
const COALITION: &str = "coalition";
const FOLLOW: &str = "follow";

/// Construct the CLI configuration.
fn cli() -> Command {
    // Make the build dirty when the toml changes.
    include_str!("../Cargo.toml");

    let election_id = Arg::new(ELECTION_ID)
        .help("Identifier of the election")
        .action(ArgAction::Set)
        .required(true);

    clap::command!(PROGRAM_NAME)
        .about(ABOUT_TEXT)
        .subcommand_required(true)
        .subcommand(
            Command::new("login")
                .about("Sign in and remember the session")
                .arg(Arg::new(REG_NO).action(ArgAction::Set).required(true))
                .arg(Arg::new(PASSWORD).action(ArgAction::Set).required(true)),
        )
        .subcommand(Command::new("logout").about("Forget the stored session"))
        .subcommand(Command::new("elections").about("List elections and their status"))
        .subcommand(
            Command::new("candidates")
                .about("List an election's candidates, grouped by position or coalition")
                .arg(election_id.clone())
                .arg(
                    Arg::new(SEARCH)
                        .long(SEARCH)
                        .short('s')
                        .help("Search by name, student ID or school")
                        .action(ArgAction::Set)
                        .conflicts_with(POSITION),
                )
                .arg(
                    Arg::new(POSITION)
                        .long(POSITION)
                        .short('p')
                        .help("Only candidates for this position ID")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new(COALITION)
                        .long(COALITION)
                        .short('c')
                        .help("Only members of this coalition ID, grouped by coalition")
                        .action(ArgAction::Set),
                ),
        )
        .subcommand(
            Command::new("countdown")
                .about("Time until voting opens or closes")
                .arg(election_id)
                .arg(
                    Arg::new(FOLLOW)
                        .long(FOLLOW)
                        .short('f')
                        .help("Keep updating every second until voting closes")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(Command::new("notifications").about("Show your notifications"))
}

/// Run the chosen subcommand and return what should be printed.
async fn run(client: &ApiClient, args: &ArgMatches) -> Result<String> {
    match args.subcommand() {
        Some(("login", sub)) => {
            let credentials = Credentials {
                reg_no: required(sub, REG_NO).to_string(),
                password: required(sub, PASSWORD).to_string(),
            };
            let response = client.auth().login(&credentials).await?;
            Ok(format!("Signed in as {} ({})", response.user.name, response.user.reg_no))
        }
        Some(("logout", _)) => {
            client.auth().logout().await?;
            Ok("Signed out".to_string())
        }
        Some(("elections", _)) => elections(client).await,
        Some(("candidates", sub)) => {
            let mut filter = CandidateFilter::new();
            if let Some(position) = sub.get_one::<String>(POSITION) {
                filter.set_position(Some(position));
            }
            if let Some(term) = sub.get_one::<String>(SEARCH) {
                filter.set_search(term);
            }
            filter.set_coalition(sub.get_one::<String>(COALITION).map(String::as_str));
            candidates(client, required(sub, ELECTION_ID), &filter).await
        }
        Some(("countdown", sub)) => {
            countdown(client, required(sub, ELECTION_ID), sub.get_flag(FOLLOW)).await
        }
        Some(("notifications", _)) => notifications(client).await,
        // `subcommand_required` rules this out.
        _ => Err(Error::InvalidRequest("no subcommand given".to_string())),
    }
}

fn required<'a>(args: &'a ArgMatches, id: &str) -> &'a str {
    // Required arguments are guaranteed to be present.
    args.get_one::<String>(id).map(String::as_str).unwrap_or_default()
}

async fn elections(client: &ApiClient) -> Result<String> {
    let elections = client.elections().all().await?;
    if elections.is_empty() {
        return Ok("No elections yet".to_string());
    }
    let latest = latest_election(&elections).map(|e| e.id.clone());
    let now = Utc::now();
    let mut out = String::new();
    for election in &elections {
        let marker = if latest.as_ref() == Some(&election.id) { "*" } else { " " };
        let _ = writeln!(
            out,
            "{marker} {}  {}  [{}]  {} - {}",
            election.id,
            election.name,
            display_status(election, now),
            election.start_date.format("%Y-%m-%d %H:%M"),
            election.end_date.format("%Y-%m-%d %H:%M"),
        );
    }
    Ok(out)
}

async fn candidates(client: &ApiClient, election_id: &str, filter: &CandidateFilter) -> Result<String> {
    let all = client
        .candidates()
        .by_election(Some(election_id))
        .await?
        .unwrap_or_default();
    let found = match filter.search() {
        Some(term) => client.candidates().search(term).await?,
        None => None,
    };
    let by_position = client.candidates().by_position(filter.position_id()).await?;
    let shown: Vec<Candidate> = filter
        .select(CandidateSources {
            all: &all,
            search: found.as_deref(),
            by_position: by_position.as_deref(),
        })
        .into_iter()
        .cloned()
        .collect();

    let groups = if filter.groups_by_coalition() {
        let coalitions = client
            .coalitions()
            .by_election(Some(election_id))
            .await?
            .unwrap_or_default();
        group_by_coalition(&shown, &coalition_name_table(&coalitions))
    } else {
        let positions = client
            .positions()
            .by_election(Some(election_id))
            .await?
            .unwrap_or_default();
        group_by_position(&shown, &position_name_table(&positions))
    };
    Ok(render_groups(&groups))
}

fn render_groups(groups: &[CandidateGroup<'_>]) -> String {
    if groups.is_empty() {
        return "No candidates found".to_string();
    }
    let mut out = String::new();
    for group in groups {
        let _ = writeln!(out, "{}", group.title);
        for candidate in &group.candidates {
            let school = candidate.school.as_deref().unwrap_or("-");
            let _ = writeln!(out, "  {} ({}, {})", candidate.name, candidate.student_id, school);
        }
    }
    out
}

async fn countdown(client: &ApiClient, election_id: &str, follow: bool) -> Result<String> {
    let election = client
        .elections()
        .by_id(Some(election_id))
        .await?
        .ok_or_else(|| Error::InvalidRequest(format!("no election {election_id}")))?;
    if !follow {
        return Ok(Countdown::for_election(&election, Utc::now()).to_string());
    }

    let mut ticks = countdown::ticker(election.start_date, election.end_date, Arc::new(SystemClock));
    let mut last = *ticks.borrow();
    while last.phase != ElectionPhase::Closed {
        println!("{last}");
        if ticks.changed().await.is_err() {
            break;
        }
        last = *ticks.borrow();
    }
    Ok(last.to_string())
}

async fn notifications(client: &ApiClient) -> Result<String> {
    let notifications = client.notifications().all().await?;
    let mut out = format!("{} unread\n", unread_count(&notifications));
    for notification in &notifications {
        let marker = if notification.is_read { " " } else { "*" };
        let _ = writeln!(out, "{marker} {}: {}", notification.title, notification.message);
    }
    Ok(out)
}

#[tokio::main]
async fn main() {
    let args = cli().get_matches();

    let config = match Config::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Invalid configuration: {err}");
            std::process::exit(2)
        }
    };
    if let Err(err) = evote_client::logging::init(config.log_config()) {
        eprintln!("Failed to initialise logging: {err}");
        std::process::exit(2)
    }

    let client = match evote_client::connect(&config).await {
        Ok(client) => client,
        Err(err) => {
            error!("{err}");
            eprintln!("{}", err.user_message());
            std::process::exit(2)
        }
    };
    info!("Running {:?}", args.subcommand_name());

    match run(&client, &args).await {
        Ok(output) => println!("{}", output.trim_end()),
        Err(err) => {
            error!("{err}");
            eprintln!("{}", err.user_message());
            std::process::exit(1)
        }
    }
}
