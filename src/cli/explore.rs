//! Explore command handler
//!
//! An interactive location session on stdin/stdout. Plain lines are treated
//! as the search box text; lines starting with `:` are commands. The session
//! runs on a `Controller`; this module only parses input and prints what
//! changed between snapshots.

use crate::article::{filter_languages, get_encyclopedia};
use crate::config::Config;
use crate::coord::Coordinate;
use crate::error::{Error, Result};
use crate::format::text::{address_block, article_block, candidate_lines, language_lines};
use crate::geo::get_geocoder;
use crate::geo::position::ConfiguredPosition;
use crate::search::SearchMode;
use crate::session::{Controller, Intent, LocationSessionState, SessionSnapshot};
use clap::Args;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, watch};
use tracing::info;

const HELP: &str = "\
Type a place name to search. Commands:
  :submit          search now (manual mode)
  :mode [MODE]     toggle or set live/manual search
  :pick N          choose search result N
  :at LAT LON      select a coordinate
  :here            use your current position
  :wiki            open the Wikipedia article for the address
  :lang CODE       switch the article language
  :langs [FILTER]  list article languages
  :close           close the article
  :dismiss         close the address
  :map [PROVIDER]  print a map link
  :help            show this help
  :quit            leave
";

/// Explore command arguments
#[derive(Args)]
pub struct ExploreArgs {
    /// Search only on :submit
    #[arg(long)]
    pub manual: bool,

    /// Article language (default from config)
    #[arg(long, short = 'l')]
    pub lang: Option<String>,
}

/// A parsed input line
#[derive(Debug, PartialEq)]
enum Command {
    Intent(Intent),
    Languages(Option<String>),
    Map(Option<String>),
    Help,
    Quit,
}

/// Run the explore command
pub async fn run(args: ExploreArgs) -> Result<()> {
    let config = Config::load()?;
    let language = args
        .lang
        .unwrap_or_else(|| config.article.language.clone());

    let mut settings = config.search.settings();
    if args.manual {
        settings.mode = SearchMode::Manual;
    }

    let geo = Arc::new(get_geocoder(&config.providers)?);
    let encyclopedia = Arc::new(get_encyclopedia(&config.providers)?);
    let position = Arc::new(ConfiguredPosition::from_config(
        &config.location,
        &config.providers,
    )?);
    let center = config.location.default_center()?;

    let session = LocationSessionState::open(&language, Some(center), settings.mode);
    let controller = Controller::new(session, geo, encyclopedia, position, settings);

    let (intent_tx, intent_rx) = mpsc::channel(32);
    let (snapshot_tx, snapshot_rx) = watch::channel(controller.snapshot());

    println!("placescope explore. Type a place name, :help for commands.");
    let reader = tokio::spawn(read_commands(intent_tx, snapshot_rx, config));

    let mut renderer = Renderer::default();
    let last = controller
        .run(intent_rx, |snapshot| {
            print!("{}", renderer.render(snapshot));
            snapshot_tx.send_replace(snapshot.clone());
        })
        .await;

    reader
        .await
        .map_err(|e| Error::Io(std::io::Error::other(e)))??;

    info!(
        place = last.address.as_ref().map(|a| a.display_name.as_str()),
        "explore session ended"
    );
    Ok(())
}

/// Forward stdin to the controller until EOF or `:quit`
async fn read_commands(
    intents: mpsc::Sender<Intent>,
    snapshots: watch::Receiver<SessionSnapshot>,
    config: Config,
) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        match parse_line(&line) {
            Ok(Command::Intent(intent)) => {
                if intents.send(intent).await.is_err() {
                    break;
                }
            }
            Ok(Command::Languages(filter)) => {
                let text = languages_text(&snapshots.borrow(), filter.as_deref());
                print!("{}", text);
            }
            Ok(Command::Map(provider)) => {
                let link = map_link(&snapshots.borrow(), provider.as_deref(), &config);
                match link {
                    Ok(url) => println!("{}", url),
                    Err(e) => eprintln!("Error: {}", e),
                }
            }
            Ok(Command::Help) => print!("{}", HELP),
            Ok(Command::Quit) => break,
            Err(message) => eprintln!("{}", message),
        }
    }

    Ok(())
}

fn parse_line(line: &str) -> std::result::Result<Command, String> {
    let Some(command) = line.trim_start().strip_prefix(':') else {
        return Ok(Command::Intent(Intent::TextChanged(line.to_string())));
    };

    let mut words = command.split_whitespace();
    let name = words.next().unwrap_or_default();
    let rest: Vec<&str> = words.collect();
    let argument = (!rest.is_empty()).then(|| rest.join(" "));

    let command = match (name, rest.as_slice()) {
        ("submit" | "s", []) => Command::Intent(Intent::Submit),
        ("mode", []) => Command::Intent(Intent::ToggleMode),
        ("mode", [mode]) => Command::Intent(Intent::SetMode(mode.parse()?)),
        ("pick" | "p", [n]) => match n.parse::<usize>() {
            Ok(n) if n > 0 => Command::Intent(Intent::SelectCandidate(n - 1)),
            _ => return Err(format!("Not a result number: {}", n)),
        },
        ("at", [lat, lon]) => {
            let coordinate = Coordinate::parse(lat, lon).map_err(|e| e.to_string())?;
            Command::Intent(Intent::SelectCoordinate(coordinate))
        }
        ("here", []) => Command::Intent(Intent::LocateMe),
        ("wiki" | "w", []) => Command::Intent(Intent::OpenArticle),
        ("lang", [code]) => Command::Intent(Intent::ChangeLanguage(code.to_string())),
        ("langs", _) => Command::Languages(argument),
        ("close", []) => Command::Intent(Intent::CloseArticle),
        ("dismiss", []) => Command::Intent(Intent::CloseAddress),
        ("map", []) => Command::Map(None),
        ("map", [provider]) => Command::Map(Some(provider.to_string())),
        ("help" | "h" | "?", _) => Command::Help,
        ("quit" | "q" | "exit", []) => Command::Quit,
        _ => return Err(format!("Unknown command: :{} (try :help)", command.trim())),
    };
    Ok(command)
}

fn languages_text(snapshot: &SessionSnapshot, filter: Option<&str>) -> String {
    let Some(view) = &snapshot.article else {
        return "No article open. Use :wiki first.\n".to_string();
    };

    let matches = filter_languages(&view.languages, filter.unwrap_or_default());
    if matches.is_empty() {
        return "No matching languages\n".to_string();
    }
    language_lines(matches, &snapshot.language)
}

fn map_link(snapshot: &SessionSnapshot, provider: Option<&str>, config: &Config) -> Result<String> {
    let coordinate = snapshot
        .coordinate
        .ok_or_else(|| Error::InvalidCoordinates("no location selected".to_string()))?;
    config.format_url(provider, coordinate)
}

/// Prints what changed since the previous snapshot
#[derive(Default)]
struct Renderer {
    previous: Option<SessionSnapshot>,
}

impl Renderer {
    fn render(&mut self, snapshot: &SessionSnapshot) -> String {
        let mut out = String::new();
        let Some(prev) = self.previous.replace(snapshot.clone()) else {
            out.push_str(&format!("Search mode: {}\n", snapshot.search_mode));
            return out;
        };

        let now = snapshot.activity;
        let was = prev.activity;

        if snapshot.search_mode != prev.search_mode {
            out.push_str(&format!("Search mode: {}\n", snapshot.search_mode));
        }
        if now.searching && !was.searching {
            out.push_str("Searching...\n");
        }
        if !Arc::ptr_eq(&snapshot.candidates, &prev.candidates)
            && (!snapshot.candidates.is_empty() || was.searching)
        {
            out.push_str(&candidate_lines(&snapshot.candidates));
            if !snapshot.candidates.is_empty() {
                out.push_str("Choose with :pick N\n");
            }
        }
        if now.locating && !was.locating {
            out.push_str("Locating...\n");
        }
        if now.loading_address && !was.loading_address {
            out.push_str("Looking up address...\n");
        }
        if snapshot.address != prev.address {
            match &snapshot.address {
                Some(address) => {
                    out.push('\n');
                    out.push_str(&address_block(address));
                    out.push_str(":wiki for the article, :map for a link\n");
                }
                None => out.push_str("Address closed\n"),
            }
        }
        if now.loading_article && !was.loading_article {
            out.push_str(&format!("Loading {} article...\n", snapshot.language));
        }
        if snapshot.article != prev.article {
            match &snapshot.article {
                Some(view) => {
                    out.push('\n');
                    out.push_str(&article_block(&view.summary));
                    out.push_str(&format!(
                        "{} languages: :langs to list, :lang CODE to switch\n",
                        view.languages.len()
                    ));
                }
                None => out.push_str("Article closed\n"),
            }
        } else if snapshot.language != prev.language && !now.loading_article {
            out.push_str(&format!("Language: {}\n", snapshot.language));
        }
        if snapshot.error != prev.error {
            if let Some(error) = &snapshot.error {
                out.push_str(&format!("Error: {}\n", error));
            }
        }

        out
    }
}
