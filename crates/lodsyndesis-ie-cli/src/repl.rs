//! Interactive REPL for LODsyndesisIE.
//!
//! Launch with `lodsyndesis-ie repl` to enter interactive mode.
//! Type `/help` for available commands, Tab for completion.

use rustyline::completion::{Completer, Pair};
use rustyline::config::CompletionType;
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{
    Cmd, ConditionalEventHandler, Config, Editor, Event, EventContext, EventHandler, Helper,
    KeyEvent, RepeatCount,
};
use tokio::runtime::Handle;

use lodsyndesis_ie::{
    AnnotateQuery, ClientConfig, DatasetDiscoveryQuery, EntitiesQuery, ErTools, LodSyndesisClient,
    MeasurementType, Service,
};

use crate::commands::{execute, Request};
use crate::output;

/// Available REPL commands.
const COMMANDS: &[(&str, &str)] = &[
    ("/entities", "Recognize the entities of a text"),
    ("/rdfa", "Annotate a text as HTML+RDFa"),
    ("/triples", "Triples of the recognized entities"),
    ("/facts", "Related facts of a text"),
    ("/datasets", "Top-K datasets for the entities of a text"),
    ("/tools", "Show or set the ERtools combination"),
    ("/equivalent", "Toggle equivalent URIs (on/off)"),
    ("/provenance", "Toggle provenance (on/off)"),
    ("/subset", "Set the dataset subset size (1-5)"),
    ("/topk", "Set how many dataset subsets to return"),
    ("/measure", "Set coverage or commonalities"),
    ("/settings", "Show the current settings"),
    ("/endpoint", "Show or change the service endpoint"),
    ("/clear", "Clear the screen"),
    ("/help", "Show available commands"),
    ("/exit", "Quit the REPL"),
];

/// REPL helper for tab completion.
#[derive(Default)]
struct LodHelper;

impl Completer for LodHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let input = &line[..pos];

        if !input.contains(' ') {
            let matches: Vec<Pair> = COMMANDS
                .iter()
                .filter(|(cmd, _)| cmd.starts_with(input))
                .map(|(cmd, desc)| Pair {
                    display: format!("{cmd:<16} {desc}"),
                    replacement: format!("{cmd} "),
                })
                .collect();
            return Ok((0, matches));
        }

        let (cmd, args) = input.split_once(' ').unwrap_or((input, ""));
        let prefix_start = input.len() - args.len();
        let candidates: Vec<&str> = match cmd {
            "/tools" => ErTools::ALL.iter().map(ErTools::as_str).collect(),
            "/measure" => vec!["coverage", "commonalities"],
            "/equivalent" | "/provenance" => vec!["on", "off"],
            _ => return Ok((pos, Vec::new())),
        };

        let wanted = args.trim().to_ascii_lowercase();
        let matches: Vec<Pair> = candidates
            .into_iter()
            .filter(|c| c.to_ascii_lowercase().starts_with(&wanted))
            .map(|c| Pair {
                display: c.to_string(),
                replacement: format!("{c} "),
            })
            .collect();
        Ok((prefix_start, matches))
    }
}

impl Hinter for LodHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &rustyline::Context<'_>) -> Option<String> {
        if pos < line.len() || line.is_empty() {
            return None;
        }
        if line.starts_with('/') && !line.contains(' ') {
            for (cmd, _) in COMMANDS {
                if cmd.starts_with(line) && *cmd != line {
                    return Some(cmd[line.len()..].to_string());
                }
            }
        }
        None
    }
}

impl Highlighter for LodHelper {}
impl Validator for LodHelper {}
impl Helper for LodHelper {}

struct TabCompleteOrAcceptHint;

impl ConditionalEventHandler for TabCompleteOrAcceptHint {
    fn handle(
        &self,
        _evt: &Event,
        _n: RepeatCount,
        _positive: bool,
        ctx: &EventContext<'_>,
    ) -> Option<Cmd> {
        if ctx.has_hint() {
            Some(Cmd::CompleteHint)
        } else {
            Some(Cmd::Complete)
        }
    }
}

/// Session settings applied to every request.
#[derive(Debug, Clone)]
struct ReplState {
    er_tools: ErTools,
    equivalent_uris: bool,
    provenance: bool,
    subset_size: u32,
    top_k: u32,
    measurement: MeasurementType,
}

impl Default for ReplState {
    fn default() -> Self {
        Self {
            er_tools: ErTools::Wat,
            equivalent_uris: true,
            provenance: true,
            subset_size: 1,
            top_k: 10,
            measurement: MeasurementType::Coverage,
        }
    }
}

impl ReplState {
    /// Turn a service command and its text into a request.
    fn request(&self, cmd: &str, text: &str) -> Option<Request> {
        let request = match cmd {
            "entities" => Request::Entities {
                query: EntitiesQuery::new(text, self.er_tools)
                    .with_equivalent_uris(self.equivalent_uris)
                    .with_provenance(self.provenance),
                raw: false,
            },
            "rdfa" => self.annotate(Service::ExportAsRdfa, text),
            "triples" => self.annotate(Service::GetTriplesOfEntities, text),
            "facts" => self.annotate(Service::FindRelatedFacts, text),
            "datasets" => Request::Datasets {
                query: DatasetDiscoveryQuery::new(text, self.er_tools)
                    .with_subset_size(self.subset_size)
                    .with_top_k(self.top_k)
                    .with_measurement(self.measurement),
            },
            _ => return None,
        };
        Some(request)
    }

    fn annotate(&self, service: Service, text: &str) -> Request {
        Request::Annotate {
            service,
            query: AnnotateQuery::new(text, self.er_tools),
        }
    }
}

/// Run the interactive REPL. Must be called off the async executor threads.
pub fn run(mut client: LodSyndesisClient, handle: &Handle) -> anyhow::Result<()> {
    eprintln!();
    eprintln!(
        "  \x1b[32m\u{25c9}\x1b[0m \x1b[1mlodsyndesis-ie v{}\x1b[0m \x1b[90m\u{2014} Linked-data entities for any text\x1b[0m",
        env!("CARGO_PKG_VERSION")
    );
    eprintln!("    Endpoint: \x1b[90m{}\x1b[0m", client.base_url());
    eprintln!();
    eprintln!(
        "    Press \x1b[36m/\x1b[0m to browse commands, \x1b[90mTab\x1b[0m to complete, \x1b[90m/exit\x1b[0m to quit."
    );
    eprintln!();

    let config = Config::builder()
        .history_ignore_space(true)
        .auto_add_history(true)
        .completion_type(CompletionType::List)
        .completion_prompt_limit(20)
        .build();

    let mut rl: Editor<LodHelper, rustyline::history::DefaultHistory> =
        Editor::with_config(config)?;
    rl.set_helper(Some(LodHelper));
    rl.bind_sequence(
        KeyEvent::from('\t'),
        EventHandler::Conditional(Box::new(TabCompleteOrAcceptHint)),
    );

    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    let hist_path = std::path::PathBuf::from(&home).join(".lodsyndesis_ie_history");
    if hist_path.exists() {
        let _ = rl.load_history(&hist_path);
    }

    let mut state = ReplState::default();
    let prompt = " \x1b[36mlodsyndesis>\x1b[0m ";

    loop {
        match rl.readline(prompt) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let input = line.strip_prefix('/').unwrap_or(line);
                if input.is_empty() {
                    cmd_help();
                    continue;
                }

                let (cmd, args) = input.split_once(' ').unwrap_or((input, ""));
                let args = args.trim();

                match cmd {
                    "exit" | "quit" => {
                        eprintln!("  \x1b[90m\u{2728}\x1b[0m Goodbye!");
                        break;
                    }
                    "help" | "h" | "?" => cmd_help(),
                    "clear" | "cls" => eprint!("\x1b[2J\x1b[H"),
                    "settings" => cmd_settings(&state),
                    "endpoint" => cmd_endpoint(args, &mut client),
                    "tools" => cmd_tools(args, &mut state),
                    "equivalent" => cmd_toggle("Equivalent URIs", args, &mut state.equivalent_uris),
                    "provenance" => cmd_toggle("Provenance", args, &mut state.provenance),
                    "subset" => cmd_number("Subset size", args, 1..=5, &mut state.subset_size),
                    "topk" => cmd_number("Top-K", args, 1..=u32::MAX, &mut state.top_k),
                    "measure" => cmd_measure(args, &mut state),
                    "entities" | "rdfa" | "triples" | "facts" | "datasets" => {
                        if args.is_empty() {
                            eprintln!("  Usage: /{cmd} <text>");
                            continue;
                        }
                        if let Some(request) = state.request(cmd, args) {
                            match handle.block_on(execute(&client, &request)) {
                                Ok(outcome) => output::emit(&outcome),
                                Err(e) => eprintln!("  Error: {e:#}"),
                            }
                        }
                    }
                    _ => {
                        eprintln!("  Unknown command '/{cmd}'. Type /help for commands.");
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                eprintln!("  \x1b[90m(Ctrl+C)\x1b[0m Type \x1b[1m/exit\x1b[0m to quit.");
            }
            Err(ReadlineError::Eof) => {
                eprintln!("  \x1b[90m\u{2728}\x1b[0m Goodbye!");
                break;
            }
            Err(err) => {
                eprintln!("  Error: {err}");
                break;
            }
        }
    }

    let _ = rl.save_history(&hist_path);

    Ok(())
}

fn cmd_help() {
    eprintln!();
    eprintln!("  Commands:");
    eprintln!();
    for (cmd, desc) in COMMANDS {
        eprintln!("    {cmd:<18} {desc}");
    }
    eprintln!();
    eprintln!("  Tip: Tab completes commands, ERtools names and on/off values.");
    eprintln!();
}

fn cmd_settings(state: &ReplState) {
    let on_off = |b: bool| if b { "on" } else { "off" };
    eprintln!();
    eprintln!("  ERtools:         {}", state.er_tools);
    eprintln!("  Equivalent URIs: {}", on_off(state.equivalent_uris));
    eprintln!("  Provenance:      {}", on_off(state.provenance));
    eprintln!("  Subset size:     {}", state.subset_size);
    eprintln!("  Top-K:           {}", state.top_k);
    eprintln!("  Measurement:     {}", state.measurement);
    eprintln!();
}

/// Show the endpoint, or switch the session to a new one.
fn cmd_endpoint(args: &str, client: &mut LodSyndesisClient) {
    if args.is_empty() {
        eprintln!("  Endpoint: {}", client.base_url());
        return;
    }
    let config = ClientConfig {
        base_url: args.to_string(),
        timeout_ms: client.timeout_ms(),
    };
    match LodSyndesisClient::with_config(config) {
        Ok(switched) => {
            *client = switched;
            eprintln!("  Endpoint set to {}", client.base_url());
        }
        Err(e) => eprintln!("  Invalid endpoint: {e}"),
    }
}

fn cmd_tools(args: &str, state: &mut ReplState) {
    if args.is_empty() {
        eprintln!("  ERtools: {}", state.er_tools);
        let names: Vec<&str> = ErTools::ALL.iter().map(ErTools::as_str).collect();
        eprintln!("  Options: {}", names.join(", "));
        return;
    }
    match args.parse::<ErTools>() {
        Ok(tools) => {
            state.er_tools = tools;
            eprintln!("  ERtools set to {tools}");
        }
        Err(e) => eprintln!("  {e}"),
    }
}

fn cmd_toggle(label: &str, args: &str, flag: &mut bool) {
    match args.to_ascii_lowercase().as_str() {
        "" => *flag = !*flag,
        "on" | "true" | "yes" => *flag = true,
        "off" | "false" | "no" => *flag = false,
        other => {
            eprintln!("  Expected on or off, got '{other}'");
            return;
        }
    }
    eprintln!("  {label}: {}", if *flag { "on" } else { "off" });
}

fn cmd_number(label: &str, args: &str, range: std::ops::RangeInclusive<u32>, value: &mut u32) {
    match args.parse::<u32>() {
        Ok(n) if range.contains(&n) => {
            *value = n;
            eprintln!("  {label} set to {n}");
        }
        _ => eprintln!(
            "  {label} must be a number between {} and {}",
            range.start(),
            range.end()
        ),
    }
}

fn cmd_measure(args: &str, state: &mut ReplState) {
    match args.parse::<MeasurementType>() {
        Ok(m) => {
            state.measurement = m;
            eprintln!("  Measurement set to {m}");
        }
        Err(e) => eprintln!("  {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_builds_requests() {
        let state = ReplState {
            er_tools: ErTools::All,
            subset_size: 2,
            ..Default::default()
        };
        match state.request("datasets", "Crete") {
            Some(Request::Datasets { query }) => {
                assert_eq!(query.subset_size, 2);
                assert_eq!(query.er_tools, ErTools::All);
            }
            other => panic!("unexpected request: {other:?}"),
        }
        assert!(matches!(
            state.request("rdfa", "Crete"),
            Some(Request::Annotate {
                service: Service::ExportAsRdfa,
                ..
            })
        ));
        assert!(state.request("unknown", "Crete").is_none());
    }

    #[test]
    fn test_toggle_and_number() {
        let mut flag = true;
        cmd_toggle("Provenance", "", &mut flag);
        assert!(!flag);
        cmd_toggle("Provenance", "on", &mut flag);
        assert!(flag);
        cmd_toggle("Provenance", "maybe", &mut flag);
        assert!(flag);

        let mut subset = 1;
        cmd_number("Subset size", "4", 1..=5, &mut subset);
        assert_eq!(subset, 4);
        cmd_number("Subset size", "9", 1..=5, &mut subset);
        assert_eq!(subset, 4);
    }

    #[test]
    fn test_endpoint_command() {
        let mut client = LodSyndesisClient::with_config(ClientConfig {
            base_url: "http://localhost:8080/LODsyndesisIE/rest-api".to_string(),
            timeout_ms: 1_500,
        })
        .unwrap();

        cmd_endpoint("", &mut client);
        assert_eq!(client.base_url().as_str(), "http://localhost:8080/LODsyndesisIE/rest-api");

        cmd_endpoint("http://127.0.0.1:9000/api/", &mut client);
        assert_eq!(client.base_url().as_str(), "http://127.0.0.1:9000/api");
        assert_eq!(client.timeout_ms(), 1_500);

        cmd_endpoint("not a url", &mut client);
        assert_eq!(client.base_url().as_str(), "http://127.0.0.1:9000/api");
    }

    #[test]
    fn test_tools_command() {
        let mut state = ReplState::default();
        cmd_tools("stanfordcorenlp", &mut state);
        assert_eq!(state.er_tools, ErTools::StanfordCoreNlp);
        cmd_tools("nope", &mut state);
        assert_eq!(state.er_tools, ErTools::StanfordCoreNlp);
    }
}
