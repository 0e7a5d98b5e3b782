//! A command-line shell for the VoteXpert platform.
//! Voters can log in, inspect their election and cast a ballot; admins can
//! manage elections and watch live turnout.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use clap::{Arg, ArgAction, ArgMatches, Command};
use log::{error, info};

use votexpert_client::{
    api::Api,
    clock::SystemClock,
    config::Config,
    error::{DisplayMessage, Error, Result},
    flow::{AdminFlow, Step, VerificationFlow, VotingFlow},
    model::{
        election::{ElectionSpec, ElectionStatus, PositionCandidates},
        results::ElectionResults,
        statistics::Statistics,
    },
    refresh::watch_statistics,
    session::{FileStorage, SessionContext},
    shell::{routes, verification_route, AppShell, Outcome},
    validation::ValidationErrors,
};

const PROGRAM_NAME: &str = "votexpert-cli";

const ABOUT_TEXT: &str = "Take part in or administer a VoteXpert election.

EXIT CODES:
     0: Success.
     1: Error.
     2: Not logged in, or the session has ended. Log in again.";

const EXIT_OK: u8 = 0;
const EXIT_ERROR: u8 = 1;
const EXIT_LOGIN: u8 = 2;

const ELECTION_ID: &str = "ELECTION_ID";
const STATUS: &str = "STATUS";
const VOTER_ID: &str = "voter-id";
const EMAIL: &str = "email";
const FACE: &str = "face";
const CHOICE: &str = "choice";
const USER: &str = "user";
const PASSWORD: &str = "password";
const ONCE: &str = "once";
const NAME: &str = "name";
const DESCRIPTION: &str = "description";
const START: &str = "start";
const END: &str = "end";
const ANNOUNCE: &str = "announce";
const POSITION: &str = "position";

type Shell = AppShell<FileStorage>;

fn election_id_arg() -> Arg {
    Arg::new(ELECTION_ID)
        .help("The election to act on")
        .action(ArgAction::Set)
        .required(true)
}

fn option(id: &'static str, help: &'static str) -> Arg {
    Arg::new(id).long(id).help(help).action(ArgAction::Set)
}

/// Construct the CLI configuration.
fn cli() -> Command {
    // Make the build dirty when the toml changes.
    include_str!("../Cargo.toml");

    clap::command!(PROGRAM_NAME)
        .about(ABOUT_TEXT)
        .subcommand_required(true)
        .subcommand(
            Command::new("login")
                .about("Log in as a voter with an emailed code")
                .arg(option(VOTER_ID, "Your voter ID").required(true))
                .arg(option(EMAIL, "The email address you registered with").required(true))
                .arg(option(FACE, "Path to a photo, if face verification is required")),
        )
        .subcommand(Command::new("elections").about("Show your profile and election"))
        .subcommand(
            Command::new("election")
                .about("Show an election and its candidates")
                .arg(election_id_arg()),
        )
        .subcommand(
            Command::new("vote")
                .about("Cast a ballot, interactively unless choices are given")
                .arg(election_id_arg())
                .arg(
                    option(CHOICE, "A choice as POSITION=CANDIDATE_ID; repeat per position")
                        .action(ArgAction::Append),
                ),
        )
        .subcommand(
            Command::new("results")
                .about("Show published results")
                .arg(election_id_arg()),
        )
        .subcommand(Command::new("logout").about("End the current session"))
        .subcommand(
            Command::new("admin-login")
                .about("Log in as an administrator")
                .arg(option(USER, "Username or email").required(true))
                .arg(option(PASSWORD, "Password; prompted for if omitted")),
        )
        .subcommand(Command::new("admin-elections").about("List all elections"))
        .subcommand(
            Command::new("admin-election")
                .about("Show an election in full")
                .arg(election_id_arg()),
        )
        .subcommand(
            Command::new("admin-create")
                .about("Create an election")
                .arg(option(NAME, "Election name").required(true))
                .arg(option(DESCRIPTION, "Free-text description"))
                .arg(option(START, "When voting opens (RFC 3339)").required(true))
                .arg(option(END, "When voting closes (RFC 3339)").required(true))
                .arg(option(ANNOUNCE, "When results are announced (RFC 3339)"))
                .arg(option(POSITION, "A position on the ballot; repeat as needed").action(ArgAction::Append)),
        )
        .subcommand(
            Command::new("admin-status")
                .about("Move an election to a new status")
                .arg(election_id_arg())
                .arg(
                    Arg::new(STATUS)
                        .help("One of: draft, active, ongoing, concluded, cancelled, results_announced")
                        .action(ArgAction::Set)
                        .required(true),
                ),
        )
        .subcommand(
            Command::new("admin-stats")
                .about("Watch live turnout for an election")
                .arg(election_id_arg())
                .arg(
                    Arg::new(ONCE)
                        .long(ONCE)
                        .help("Print the statistics once and exit")
                        .action(ArgAction::SetTrue),
                ),
        )
}

/// The value of an argument; required arguments are always present.
fn arg<'a>(args: &'a ArgMatches, id: &str) -> &'a str {
    args.get_one::<String>(id)
        .map(String::as_str)
        .unwrap_or_default()
}

fn prompt(message: &str) -> Result<String> {
    print!("{message}");
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Err(Error::InvalidState("Input ended".to_string()));
    }
    Ok(line.trim().to_string())
}

fn require_voter(shell: &Shell) -> Result<()> {
    if shell.session().is_voter() {
        Ok(())
    } else {
        Err(Error::Unauthorized("Please log in as a voter".to_string()))
    }
}

fn require_admin(shell: &Shell) -> Result<()> {
    if shell.session().is_admin() {
        Ok(())
    } else {
        Err(Error::Unauthorized("Please log in as an administrator".to_string()))
    }
}

fn parse_time(args: &ArgMatches, id: &str) -> Result<Option<DateTime<Utc>>> {
    args.get_one::<String>(id)
        .map(|value| {
            DateTime::parse_from_rfc3339(value)
                .map(|time| time.with_timezone(&Utc))
                .map_err(|_| {
                    ValidationErrors::single(
                        id,
                        format!("'{value}' is not a time such as 2026-11-01T09:00:00Z"),
                    )
                })
        })
        .transpose()
}

async fn voter_login(api: &Api, shell: &mut Shell, config: &Config, args: &ArgMatches) -> Result<()> {
    shell.navigate(routes::VOTER_LOGIN);
    let email = arg(args, EMAIL);
    let mut flow = VerificationFlow::from_config(config);
    flow.initiate(api, arg(args, VOTER_ID), email).await?;
    shell.navigate(verification_route(flow.state()));
    println!("A verification code was sent to {email}.");

    while flow.otp_stage().is_some() {
        let remaining = flow.countdown_display().unwrap_or_default();
        let input = prompt(&format!("Code ({remaining} left, or 'resend'): "))?;
        let attempt = if input == "resend" {
            flow.resend(api).await.map(|_| println!("A new code was sent."))
        } else {
            flow.enter_code(&input)?;
            flow.submit_otp(api, shell.session_mut()).await
        };
        match attempt {
            Ok(()) => {}
            // Still on the code screen; let the voter try again.
            Err(e) if flow.otp_stage().is_some() => println!("{}", DisplayMessage(&e)),
            Err(e) => return Err(e),
        }
    }

    if flow.face_stage().is_some() {
        shell.navigate(verification_route(flow.state()));
        let path = args.get_one::<String>(FACE).ok_or_else(|| {
            Error::InvalidState("Face verification is required; pass --face <photo>".to_string())
        })?;
        let image = std::fs::read(path)?;
        flow.submit_face(api, shell.session_mut(), &image).await?;
        if let Some(similarity) = flow.similarity() {
            println!("Face matched with {similarity:.1}% similarity.");
        }
    }

    shell.navigate(verification_route(flow.state()));
    if let Some(user) = shell.session().user() {
        println!("Logged in as {}.", user.display_name());
    }
    Ok(())
}

async fn voter_profile(api: &Api, shell: &mut Shell) -> Result<()> {
    shell.navigate(routes::VOTER_ELECTIONS);
    require_voter(shell)?;
    let profile = api.voter_profile(shell.session()).await?;
    println!("{} ({})", profile.voter.name, profile.voter.voter_id);
    if profile.voter.has_voted {
        println!("You have already voted.");
    }
    let election = profile
        .election
        .or_else(|| shell.session().election().cloned());
    match election {
        Some(election) => {
            println!(
                "{}  {}  [{}]",
                election.election_id,
                election.election_name,
                election.status.label()
            );
            shell.session_mut().set_election(election);
        }
        None => println!("No election is assigned to you."),
    }
    Ok(())
}

fn print_candidates(positions: &[PositionCandidates]) {
    for group in positions {
        println!("{}:", group.position);
        for (index, candidate) in group.candidates.iter().enumerate() {
            println!("  {}. {} ({})", index + 1, candidate.name, candidate.candidate_id);
        }
    }
}

async fn show_election(api: &Api, shell: &mut Shell, election_id: &str) -> Result<()> {
    shell.navigate(routes::for_election(routes::VOTER_VOTE, election_id));
    require_voter(shell)?;
    let election = api.election_info(shell.session(), election_id).await?.election;
    println!("{} [{}]", election.election_name, election.status.label());
    if !election.description.is_empty() {
        println!("{}", election.description);
    }
    if let Some(remaining) = &election.voter_status.time_remaining {
        println!("Time remaining: {remaining}");
    }
    let positions = api
        .election_candidates(shell.session(), election_id, None)
        .await?
        .positions;
    print_candidates(&positions);
    Ok(())
}

/// Walk the voter through each position. A blank answer abstains, `b` goes back.
fn interactive_ballot(flow: &mut VotingFlow) -> Result<()> {
    while let Some(group) = flow.current_position().cloned() {
        println!("{} ({})", group.position, flow.progress());
        for (index, candidate) in group.candidates.iter().enumerate() {
            let chosen = flow.ballot().choice(&group.position) == Some(candidate.candidate_id.as_str());
            let marker = if chosen { "*" } else { " " };
            println!(" {marker}{}. {}", index + 1, candidate.name);
        }
        let input = prompt("Choice (number, blank to skip, 'b' for back): ")?;
        if input == "b" {
            flow.previous()?;
            continue;
        }
        if !input.is_empty() {
            let chosen = input
                .parse::<usize>()
                .ok()
                .and_then(|number| number.checked_sub(1))
                .and_then(|index| group.candidates.get(index));
            match chosen {
                Some(candidate) => {
                    flow.select_current(&candidate.candidate_id)?;
                }
                None => {
                    println!("Please enter a number from the list.");
                    continue;
                }
            }
        }
        flow.next()?;
    }
    Ok(())
}

fn print_review(flow: &VotingFlow) {
    println!("Review your ballot for {}:", flow.election_name());
    for group in flow.positions() {
        let choice = flow
            .ballot()
            .choice(&group.position)
            .and_then(|id| group.candidate(id))
            .map_or("(abstain)", |candidate| candidate.name.as_str());
        println!("  {}: {}", group.position, choice);
    }
    let abstentions = flow.abstentions();
    if !abstentions.is_empty() {
        println!(
            "You have not selected candidates for all positions ({}). You can still submit.",
            flow.progress()
        );
    }
}

async fn vote(api: &Api, shell: &mut Shell, election_id: &str, args: &ArgMatches) -> Result<()> {
    shell.navigate(routes::for_election(routes::VOTER_VOTE, election_id));
    require_voter(shell)?;
    let election = api.election_info(shell.session(), election_id).await?.election;
    let positions = api
        .election_candidates(shell.session(), election_id, None)
        .await?
        .positions;

    let mut flow = VotingFlow::begin(&election, positions);
    if let Some(reason) = flow.ineligible() {
        return Err(Error::InvalidState(reason.to_string()));
    }

    let choices: Vec<&String> = args
        .get_many::<String>(CHOICE)
        .map(|values| values.collect())
        .unwrap_or_default();
    let interactive = choices.is_empty();
    if interactive {
        interactive_ballot(&mut flow)?;
    } else {
        for choice in choices {
            let (position, candidate) = choice.split_once('=').ok_or_else(|| {
                ValidationErrors::single(
                    CHOICE,
                    format!("Expected POSITION=CANDIDATE_ID, got '{choice}'"),
                )
            })?;
            flow.select_candidate(position.trim(), candidate.trim())?;
        }
        while flow.step() != Some(Step::Reviewing) {
            flow.next()?;
        }
    }

    print_review(&flow);
    if interactive && !prompt("Submit this ballot? [y/N] ")?.eq_ignore_ascii_case("y") {
        println!("Ballot not submitted.");
        return Ok(());
    }

    flow.submit(api, shell.session_mut()).await?;
    shell.navigate(routes::for_election(routes::VOTER_SUCCESS, election_id));
    if let Some(receipt) = flow.take_receipt() {
        println!("Your vote was recorded.");
        println!("  Vote ID:   {}", receipt.vote_id);
        println!("  Recorded:  {}", receipt.timestamp);
        println!("  Positions: {}", receipt.positions_voted);
    }
    Ok(())
}

fn print_results(results: &ElectionResults) {
    let election = &results.election;
    println!("{} [{}]", election.election_name, election.status);
    if !results.results_available {
        println!("Results are not yet available.");
        return;
    }
    println!(
        "Turnout: {} of {} ({:.1}%)",
        election.total_votes_cast, election.total_registered_voters, election.voter_turnout_percentage
    );
    for position in &results.results {
        println!("{} ({} votes):", position.position, position.total_votes);
        for candidate in &position.candidates {
            println!(
                "  {}. {}: {} ({:.1}%)",
                candidate.rank, candidate.name, candidate.votes, candidate.percentage
            );
        }
        match &position.winner {
            Some(winner) => println!("  Winner: {}", winner.name),
            None => println!("  No winner"),
        }
    }
}

async fn results(api: &Api, shell: &mut Shell, election_id: &str) -> Result<()> {
    shell.navigate(routes::for_election(routes::VOTER_RESULTS, election_id));
    let results = api.election_results(election_id).await?;
    print_results(&results);
    Ok(())
}

async fn admin_login(api: &Api, shell: &mut Shell, config: &Config, args: &ArgMatches) -> Result<()> {
    shell.navigate(routes::ADMIN_LOGIN);
    let password = match args.get_one::<String>(PASSWORD) {
        Some(password) => password.clone(),
        None => prompt("Password: ")?,
    };
    let mut flow = AdminFlow::from_config(config);
    flow.login(api, arg(args, USER), &password).await?;
    shell.navigate(routes::ADMIN_OTP);
    println!("A verification code was sent to your email.");

    while flow.otp_stage().is_some() {
        let remaining = flow.countdown_display().unwrap_or_default();
        let input = prompt(&format!("Code ({remaining} left, or 'resend'): "))?;
        let attempt = if input == "resend" {
            flow.resend(api).await.map(|_| println!("A new code was sent."))
        } else {
            flow.enter_code(&input)?;
            flow.submit_otp(api, shell.session_mut()).await
        };
        match attempt {
            Ok(()) => {}
            Err(e) if flow.otp_stage().is_some() => println!("{}", DisplayMessage(&e)),
            Err(e) => return Err(e),
        }
    }

    shell.navigate(routes::ADMIN_DASHBOARD);
    if let Some(user) = shell.session().user() {
        println!("Logged in as {}.", user.display_name());
    }
    Ok(())
}

async fn admin_elections(api: &Api, shell: &mut Shell) -> Result<()> {
    shell.navigate(routes::ADMIN_ELECTIONS);
    require_admin(shell)?;
    let elections = api.admin_elections(shell.session()).await?.elections;
    if elections.is_empty() {
        println!("No elections yet.");
    }
    for election in elections {
        println!(
            "{}  {}  [{}]  {}/{} voted",
            election.election_id,
            election.election_name,
            election.status.label(),
            election.votes_cast,
            election.total_voters
        );
    }
    Ok(())
}

async fn admin_election(api: &Api, shell: &mut Shell, election_id: &str) -> Result<()> {
    shell.navigate(routes::for_election(routes::ADMIN_ELECTION_DETAILS, election_id));
    require_admin(shell)?;
    let election = api.election_details(shell.session(), election_id).await?.election;
    println!("{} [{}]", election.election_name, election.status.label());
    println!("  Opens:  {}", election.election_start_time);
    println!("  Closes: {}", election.election_end_time);
    if let Some(announce) = &election.result_announcement_time {
        println!("  Results: {announce}");
    }
    for position in &election.positions {
        println!("  Position: {}", position.position_name);
    }
    let counts = &election.statistics;
    println!(
        "  {} voters, {} candidates, {} votes cast ({:.1}% turnout)",
        counts.total_voters, counts.total_candidates, counts.votes_cast, counts.voter_turnout
    );
    let next: Vec<&str> = election
        .status
        .next_states()
        .iter()
        .map(ElectionStatus::as_str)
        .collect();
    if !next.is_empty() {
        println!("  Can move to: {}", next.join(", "));
    }
    Ok(())
}

async fn admin_create(api: &Api, shell: &mut Shell, args: &ArgMatches) -> Result<()> {
    shell.navigate(routes::ADMIN_CREATE_ELECTION);
    require_admin(shell)?;
    let mut spec = ElectionSpec {
        name: arg(args, NAME).trim().to_string(),
        description: arg(args, DESCRIPTION).trim().to_string(),
        start_time: parse_time(args, START)?,
        end_time: parse_time(args, END)?,
        result_announcement_time: parse_time(args, ANNOUNCE)?,
        positions: Vec::new(),
    };
    for position in args.get_many::<String>(POSITION).into_iter().flatten() {
        if !spec.add_position(position) {
            println!("Ignoring duplicate or blank position '{position}'.");
        }
    }

    let request = spec.into_request()?;
    let response = api.create_election(shell.session(), &request).await?;
    shell.navigate(routes::for_election(
        routes::ADMIN_ELECTION_DETAILS,
        &response.election_id,
    ));
    println!("Created election {}.", response.election_id);
    Ok(())
}

async fn admin_status(api: &Api, shell: &mut Shell, election_id: &str, args: &ArgMatches) -> Result<()> {
    shell.navigate(routes::for_election(routes::ADMIN_ELECTION_DETAILS, election_id));
    require_admin(shell)?;
    let target: ElectionStatus = arg(args, STATUS)
        .parse()
        .map_err(|e| ValidationErrors::single("status", format!("{e}")))?;

    let current = api.election_details(shell.session(), election_id).await?.election.status;
    if !current.can_transition_to(target) {
        return Err(ValidationErrors::single(
            "status",
            format!("An election that is {} cannot become {}", current.label(), target.label()),
        ));
    }

    let response = api
        .update_election_status(shell.session(), election_id, target)
        .await?;
    println!(
        "{} is now {}.",
        response.election_id,
        response.status.label()
    );
    Ok(())
}

fn print_statistics(statistics: &Statistics) {
    println!(
        "{} of {} voted ({:.1}% turnout), {} pending",
        statistics.votes_cast,
        statistics.total_voters,
        statistics.turnout_percentage,
        statistics.pending_votes
    );
    for (position, votes) in &statistics.votes_by_position {
        println!("  {position}: {votes}");
    }
}

async fn admin_stats(
    api: Arc<Api>,
    shell: &mut Shell,
    config: &Config,
    election_id: &str,
    args: &ArgMatches,
) -> Result<()> {
    shell.navigate(routes::for_election(routes::ADMIN_ELECTION_STATISTICS, election_id));
    require_admin(shell)?;
    if args.get_flag(ONCE) {
        let statistics = api.election_statistics(shell.session(), election_id).await?.statistics;
        print_statistics(&statistics);
        return Ok(());
    }

    let task = watch_statistics(
        api,
        shell.session().access_token().map(str::to_string),
        election_id.to_string(),
        config.statistics_refresh(),
    );
    let mut updates = task.subscribe();
    // The sender is dropped only when the task stops.
    while updates.changed().await.is_ok() {
        if let Some(statistics) = updates.borrow_and_update().clone() {
            print_statistics(&statistics);
        }
    }
    task.join().await
}

/// Run one command, report the outcome, and return the exit code.
async fn run(args: &ArgMatches, config: &Config) -> u8 {
    let api = match Api::from_config(config) {
        Ok(api) => Arc::new(api),
        Err(e) => {
            println!("Error: {}", DisplayMessage(&e));
            return EXIT_ERROR;
        }
    };
    let session = SessionContext::init(FileStorage::new(config.storage_dir()), &SystemClock);
    let mut shell = AppShell::new(session);

    let Some((command, sub_args)) = args.subcommand() else {
        return EXIT_ERROR;
    };
    info!("Running {command}");
    let election_id = arg(sub_args, ELECTION_ID);
    let result = match command {
        "login" => voter_login(&api, &mut shell, config, sub_args).await,
        "elections" => voter_profile(&api, &mut shell).await,
        "election" => show_election(&api, &mut shell, election_id).await,
        "vote" => vote(&api, &mut shell, election_id, sub_args).await,
        "results" => results(&api, &mut shell, election_id).await,
        "logout" => {
            shell.session_mut().logout();
            println!("Logged out.");
            Ok(())
        }
        "admin-login" => admin_login(&api, &mut shell, config, sub_args).await,
        "admin-elections" => admin_elections(&api, &mut shell).await,
        "admin-election" => admin_election(&api, &mut shell, election_id).await,
        "admin-create" => admin_create(&api, &mut shell, sub_args).await,
        "admin-status" => admin_status(&api, &mut shell, election_id, sub_args).await,
        "admin-stats" => admin_stats(api.clone(), &mut shell, config, election_id, sub_args).await,
        other => Err(Error::InvalidState(format!("Unknown command '{other}'"))),
    };

    match shell.resolve(result) {
        Outcome::Ok(()) => EXIT_OK,
        Outcome::Failed(e) => {
            println!("Error: {}", DisplayMessage(&e));
            EXIT_ERROR
        }
        Outcome::Redirect(route) => {
            println!("You are not logged in. Please log in again ({route}).");
            EXIT_LOGIN
        }
    }
}

#[tokio::main]
async fn main() {
    // Set up logging.
    if let Err(e) = log4rs::init_file("log4rs.yaml", Default::default()) {
        eprintln!("Logging disabled: {e}");
    }

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            eprintln!("Invalid configuration: {e}");
            std::process::exit(EXIT_ERROR.into())
        }
    };

    let args = cli().get_matches();
    let exit_code = run(&args, &config).await;
    std::process::exit(exit_code.into())
}

#[cfg(test)]
mod tests {
    use votexpert_client::model::auth::{AuthTokens, UserProfile, Voter};
    use votexpert_client::session::USER_KEY;

    use super::*;

    fn offline_config(dir: &tempfile::TempDir) -> Config {
        // Nothing listens here; commands under test must not reach the network.
        Config::default()
            .with_api_base_url("http://127.0.0.1:9")
            .with_storage_dir(dir.path())
    }

    fn matches(command_line: &[&str]) -> ArgMatches {
        cli().try_get_matches_from(command_line).unwrap()
    }

    #[tokio::test]
    async fn logout_clears_the_stored_session() {
        log4rs_test_utils::test_logging::init_logging_once_for(["votexpert_client"], None, None);
        let dir = tempfile::tempdir().unwrap();
        let config = offline_config(&dir);

        let mut session = SessionContext::new(FileStorage::new(config.storage_dir()));
        session.establish(
            AuthTokens::new("access", None),
            UserProfile::Voter(Voter {
                voter_id: "VTR-1".to_string(),
                name: "Ada Obi".to_string(),
                email: "a@b.com".to_string(),
                has_voted: false,
                voted_at: None,
            }),
            None,
        );
        assert!(dir.path().join(format!("{USER_KEY}.json")).exists());

        assert_eq!(run(&matches(&[PROGRAM_NAME, "logout"]), &config).await, EXIT_OK);
        assert!(!dir.path().join(format!("{USER_KEY}.json")).exists());
    }

    #[tokio::test]
    async fn commands_without_a_session_ask_for_login() {
        let dir = tempfile::tempdir().unwrap();
        let config = offline_config(&dir);

        let command_line = [PROGRAM_NAME, "vote", "E1", "--choice", "President=c1"];
        assert_eq!(run(&matches(&command_line), &config).await, EXIT_LOGIN);

        let command_line = [PROGRAM_NAME, "admin-status", "E1", "ongoing"];
        assert_eq!(run(&matches(&command_line), &config).await, EXIT_LOGIN);

        let command_line = [PROGRAM_NAME, "elections"];
        assert_eq!(run(&matches(&command_line), &config).await, EXIT_LOGIN);
    }

    #[tokio::test]
    async fn invalid_login_input_fails_locally() {
        let dir = tempfile::tempdir().unwrap();
        let config = offline_config(&dir);

        let command_line = [PROGRAM_NAME, "login", "--voter-id", "VTR-1", "--email", "not-an-email"];
        assert_eq!(run(&matches(&command_line), &config).await, EXIT_ERROR);

        let command_line = [PROGRAM_NAME, "admin-login", "--user", "ro", "--password", ""];
        assert_eq!(run(&matches(&command_line), &config).await, EXIT_ERROR);
    }

    #[test]
    fn correct_cli_usage() {
        matches(&[PROGRAM_NAME, "results", "E1"]);
        matches(&[PROGRAM_NAME, "admin-stats", "E1", "--once"]);
        let args = matches(&[
            PROGRAM_NAME,
            "vote",
            "E1",
            "--choice",
            "President=c1",
            "--choice",
            "Treasurer=c3",
        ]);
        let (_, vote_args) = args.subcommand().unwrap();
        assert_eq!(vote_args.get_many::<String>(CHOICE).unwrap().count(), 2);
    }

    #[test]
    fn bad_cli_usage() {
        // No command at all.
        cli().try_get_matches_from([PROGRAM_NAME]).unwrap_err();

        // Missing required arguments.
        cli().try_get_matches_from([PROGRAM_NAME, "vote"]).unwrap_err();
        cli()
            .try_get_matches_from([PROGRAM_NAME, "login", "--voter-id", "VTR-1"])
            .unwrap_err();

        // Something very wrong.
        cli()
            .try_get_matches_from([PROGRAM_NAME, "this", "invocation", "is", "incorrect"])
            .unwrap_err();
    }
}
