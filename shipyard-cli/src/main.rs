#![deny(missing_docs)]
//! Shipyard command-line interface.
//!
//! Searches, inspects and edits the ship inventory of a Shipyard server.

mod client;

use clap::{Args, Parser, Subcommand, ValueEnum};
use client::{DEFAULT_SERVER_URL, QueryPairs, ShipsClient};
use shipyard_core::{ProdDate, Ship, ShipDraft, ShipType};
use std::fmt::Write;

pub(crate) type CliResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[derive(Parser)]
#[command(name = "shipyard", version, about = "Shipyard CLI")]
struct Cli {
    /// Base URL of the Shipyard server.
    #[arg(long, global = true, env = "SHIPYARD_API_URL", default_value = DEFAULT_SERVER_URL)]
    server_url: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Copy, Clone, Debug, Eq, PartialEq)]
enum ShipTypeArg {
    Transport,
    Military,
    Merchant,
}

impl From<ShipTypeArg> for ShipType {
    fn from(value: ShipTypeArg) -> Self {
        match value {
            ShipTypeArg::Transport => ShipType::Transport,
            ShipTypeArg::Military => ShipType::Military,
            ShipTypeArg::Merchant => ShipType::Merchant,
        }
    }
}

#[derive(ValueEnum, Copy, Clone, Debug, Eq, PartialEq)]
enum OrderArg {
    Id,
    Speed,
    Date,
    Rating,
}

impl OrderArg {
    fn wire_name(self) -> &'static str {
        match self {
            OrderArg::Id => "ID",
            OrderArg::Speed => "SPEED",
            OrderArg::Date => "DATE",
            OrderArg::Rating => "RATING",
        }
    }
}

#[derive(ValueEnum, Copy, Clone, Debug, Eq, PartialEq)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Args, Clone, Debug, Default)]
struct FilterArgs {
    /// Name substring (case-insensitive).
    #[arg(long)]
    name: Option<String>,
    /// Planet substring (case-insensitive).
    #[arg(long)]
    planet: Option<String>,
    /// Ship type.
    #[arg(long, value_enum)]
    ship_type: Option<ShipTypeArg>,
    /// Produced after this epoch-millisecond timestamp.
    #[arg(long)]
    after: Option<i64>,
    /// Produced before this epoch-millisecond timestamp.
    #[arg(long)]
    before: Option<i64>,
    /// Second-hand flag.
    #[arg(long)]
    used: Option<bool>,
    /// Exclusive lower speed bound.
    #[arg(long)]
    min_speed: Option<f64>,
    /// Exclusive upper speed bound.
    #[arg(long)]
    max_speed: Option<f64>,
    /// Exclusive lower crew bound.
    #[arg(long)]
    min_crew_size: Option<i32>,
    /// Exclusive upper crew bound.
    #[arg(long)]
    max_crew_size: Option<i32>,
    /// Exclusive lower rating bound.
    #[arg(long)]
    min_rating: Option<f64>,
    /// Exclusive upper rating bound.
    #[arg(long)]
    max_rating: Option<f64>,
}

impl FilterArgs {
    fn query(&self) -> QueryPairs {
        let mut pairs = QueryPairs::new();
        push(&mut pairs, "name", self.name.as_ref());
        push(&mut pairs, "planet", self.planet.as_ref());
        push(
            &mut pairs,
            "shipType",
            self.ship_type.map(|kind| ShipType::from(kind).as_str()),
        );
        push(&mut pairs, "after", self.after);
        push(&mut pairs, "before", self.before);
        push(&mut pairs, "isUsed", self.used);
        push(&mut pairs, "minSpeed", self.min_speed);
        push(&mut pairs, "maxSpeed", self.max_speed);
        push(&mut pairs, "minCrewSize", self.min_crew_size);
        push(&mut pairs, "maxCrewSize", self.max_crew_size);
        push(&mut pairs, "minRating", self.min_rating);
        push(&mut pairs, "maxRating", self.max_rating);
        pairs
    }
}

#[derive(Args, Clone, Debug, Default)]
struct PageArgs {
    /// Sort key.
    #[arg(long, value_enum)]
    order: Option<OrderArg>,
    /// Zero-based page number.
    #[arg(long)]
    page_number: Option<i64>,
    /// Ships per page.
    #[arg(long)]
    page_size: Option<i64>,
}

impl PageArgs {
    fn extend_query(&self, pairs: &mut QueryPairs) {
        push(pairs, "order", self.order.map(OrderArg::wire_name));
        push(pairs, "pageNumber", self.page_number);
        push(pairs, "pageSize", self.page_size);
    }
}

#[derive(Args, Clone, Debug, Default)]
struct DraftArgs {
    /// Ship name.
    #[arg(long)]
    name: Option<String>,
    /// Planet.
    #[arg(long)]
    planet: Option<String>,
    /// Ship type.
    #[arg(long, value_enum)]
    ship_type: Option<ShipTypeArg>,
    /// Production year; stored as January 1st, UTC.
    #[arg(long, conflicts_with = "prod_date")]
    prod_year: Option<i32>,
    /// Production timestamp in epoch milliseconds.
    #[arg(long)]
    prod_date: Option<i64>,
    /// Second-hand flag.
    #[arg(long)]
    used: Option<bool>,
    /// Maximum speed.
    #[arg(long)]
    speed: Option<f64>,
    /// Crew size.
    #[arg(long)]
    crew_size: Option<i32>,
}

impl DraftArgs {
    fn draft(&self) -> CliResult<ShipDraft> {
        let prod_date = match (self.prod_year, self.prod_date) {
            (Some(year), _) => Some(
                ProdDate::from_year(year).ok_or_else(|| format!("production year {year} is out of range"))?,
            ),
            (None, millis) => millis.map(ProdDate::from_millis),
        };
        Ok(ShipDraft {
            name: self.name.clone(),
            planet: self.planet.clone(),
            ship_type: self.ship_type.map(ShipType::from),
            prod_date,
            used: self.used,
            speed: self.speed,
            crew_size: self.crew_size,
        })
    }
}

#[derive(Args, Clone, Debug)]
struct OutputArgs {
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// List one page of ships matching the filters.
    List {
        #[command(flatten)]
        filter: FilterArgs,
        #[command(flatten)]
        page: PageArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Count ships matching the filters.
    Count {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Show one ship.
    Get {
        /// Ship identifier.
        id: String,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Create a ship.
    Create {
        #[command(flatten)]
        draft: DraftArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Update the given fields of a ship.
    Update {
        /// Ship identifier.
        id: String,
        #[command(flatten)]
        draft: DraftArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Delete a ship.
    Delete {
        /// Ship identifier.
        id: String,
    },
}

#[cfg(not(test))]
#[tokio::main]
async fn main() -> CliResult<()> {
    let cli = Cli::parse();
    let client = client::ReqwestShipsClient::new(&cli.server_url)?;
    let output = run_command(cli.command, &client).await?;
    println!("{output}");
    Ok(())
}

#[cfg(test)]
fn main() {}

/// Execute one command against `client` and render its output.
async fn run_command<C: ShipsClient>(command: Commands, client: &C) -> CliResult<String> {
    match command {
        Commands::List {
            filter,
            page,
            output,
        } => {
            let mut query = filter.query();
            page.extend_query(&mut query);
            let ships = client.list_ships(&query).await?;
            render_ships(&ships, output.format)
        }
        Commands::Count { filter } => {
            let count = client.count_ships(&filter.query()).await?;
            Ok(count.to_string())
        }
        Commands::Get { id, output } => {
            let ship = client.get_ship(&id).await?;
            render_ship(&ship, output.format)
        }
        Commands::Create { draft, output } => {
            let ship = client.create_ship(&draft.draft()?).await?;
            render_ship(&ship, output.format)
        }
        Commands::Update { id, draft, output } => {
            let ship = client.update_ship(&id, &draft.draft()?).await?;
            render_ship(&ship, output.format)
        }
        Commands::Delete { id } => {
            client.delete_ship(&id).await?;
            Ok(format!("Deleted ship {id}."))
        }
    }
}

fn push<T: ToString>(pairs: &mut QueryPairs, key: &'static str, value: Option<T>) {
    if let Some(value) = value {
        pairs.push((key, value.to_string()));
    }
}

fn render_ships(ships: &[Ship], format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(ships)?),
        OutputFormat::Text if ships.is_empty() => Ok("No ships matched.".to_string()),
        OutputFormat::Text => {
            let mut output = String::new();
            for ship in ships {
                writeln!(output, "{}", ship_line(ship))?;
            }
            Ok(output.trim_end().to_string())
        }
    }
}

fn render_ship(ship: &Ship, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(ship)?),
        OutputFormat::Text => Ok(ship_line(ship)),
    }
}

fn ship_line(ship: &Ship) -> String {
    let id = ship
        .id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "-".to_string());
    let year = ship
        .prod_date
        .year()
        .map(|year| year.to_string())
        .unwrap_or_else(|| "?".to_string());
    format!(
        "#{id} {} ({}) planet={} year={year} used={} speed={} crew={} rating={}",
        ship.name,
        ship.ship_type.as_str(),
        ship.planet,
        ship.used,
        ship.speed,
        ship.crew_size,
        ship.rating
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        List(QueryPairs),
        Count(QueryPairs),
        Get(String),
        Create(ShipDraft),
        Update(String, ShipDraft),
        Delete(String),
    }

    struct RecordingClient {
        ships: Vec<Ship>,
        calls: Mutex<Vec<Call>>,
    }

    impl RecordingClient {
        fn new(ships: Vec<Ship>) -> Self {
            Self {
                ships,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn record(&self, call: Call) {
            self.calls.lock().expect("calls lock").push(call);
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().expect("calls lock").clone()
        }

        fn first(&self) -> CliResult<Ship> {
            self.ships
                .first()
                .cloned()
                .ok_or_else(|| "server responded with status 404: ship 1 not found".into())
        }
    }

    impl ShipsClient for RecordingClient {
        fn list_ships<'a>(
            &'a self,
            query: &'a QueryPairs,
        ) -> Pin<Box<dyn Future<Output = CliResult<Vec<Ship>>> + Send + 'a>> {
            self.record(Call::List(query.clone()));
            Box::pin(async move { Ok(self.ships.clone()) })
        }

        fn count_ships<'a>(
            &'a self,
            query: &'a QueryPairs,
        ) -> Pin<Box<dyn Future<Output = CliResult<u64>> + Send + 'a>> {
            self.record(Call::Count(query.clone()));
            Box::pin(async move { Ok(self.ships.len() as u64) })
        }

        fn get_ship<'a>(
            &'a self,
            id: &'a str,
        ) -> Pin<Box<dyn Future<Output = CliResult<Ship>> + Send + 'a>> {
            self.record(Call::Get(id.to_string()));
            Box::pin(async move { self.first() })
        }

        fn create_ship<'a>(
            &'a self,
            draft: &'a ShipDraft,
        ) -> Pin<Box<dyn Future<Output = CliResult<Ship>> + Send + 'a>> {
            self.record(Call::Create(draft.clone()));
            Box::pin(async move { self.first() })
        }

        fn update_ship<'a>(
            &'a self,
            id: &'a str,
            draft: &'a ShipDraft,
        ) -> Pin<Box<dyn Future<Output = CliResult<Ship>> + Send + 'a>> {
            self.record(Call::Update(id.to_string(), draft.clone()));
            Box::pin(async move { self.first() })
        }

        fn delete_ship<'a>(
            &'a self,
            id: &'a str,
        ) -> Pin<Box<dyn Future<Output = CliResult<()>> + Send + 'a>> {
            self.record(Call::Delete(id.to_string()));
            Box::pin(async move { Ok(()) })
        }
    }

    fn sample_ship() -> Ship {
        Ship {
            id: Some(1),
            name: "Rocinante".to_string(),
            planet: "Mars".to_string(),
            ship_type: ShipType::Military,
            prod_date: ProdDate::from_year(3010).expect("year"),
            used: true,
            speed: 0.85,
            crew_size: 4,
            rating: 3.4,
        }
    }

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("shipyard").chain(args.iter().copied()))
            .expect("parse args")
    }

    #[test]
    fn cli_defaults_server_url() {
        let cli = parse(&["count"]);
        assert!(!cli.server_url.is_empty());
        assert!(matches!(cli.command, Commands::Count { .. }));
    }

    #[test]
    fn prod_year_conflicts_with_prod_date() {
        let result = Cli::try_parse_from([
            "shipyard",
            "create",
            "--prod-year",
            "2900",
            "--prod-date",
            "0",
        ]);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn list_sends_filters_and_paging() {
        let client = RecordingClient::new(vec![sample_ship()]);
        let cli = parse(&[
            "list",
            "--name",
            "roci",
            "--ship-type",
            "military",
            "--used",
            "true",
            "--min-speed",
            "0.5",
            "--order",
            "rating",
            "--page-size",
            "10",
        ]);

        let output = run_command(cli.command, &client).await.expect("list");

        assert!(output.contains("#1 Rocinante (MILITARY)"));
        assert!(output.contains("year=3010"));
        assert_eq!(
            client.calls(),
            vec![Call::List(vec![
                ("name", "roci".to_string()),
                ("shipType", "MILITARY".to_string()),
                ("isUsed", "true".to_string()),
                ("minSpeed", "0.5".to_string()),
                ("order", "RATING".to_string()),
                ("pageSize", "10".to_string()),
            ])]
        );
    }

    #[tokio::test]
    async fn list_renders_empty_and_json_output() {
        let empty = RecordingClient::new(Vec::new());
        let output = run_command(parse(&["list"]).command, &empty)
            .await
            .expect("list");
        assert_eq!(output, "No ships matched.");

        let client = RecordingClient::new(vec![sample_ship()]);
        let output = run_command(parse(&["list", "--format", "json"]).command, &client)
            .await
            .expect("list");
        let value: serde_json::Value = serde_json::from_str(&output).expect("json");
        assert_eq!(value[0]["name"], "Rocinante");
    }

    #[tokio::test]
    async fn count_sends_filters_only() {
        let client = RecordingClient::new(vec![sample_ship(), sample_ship()]);
        let output = run_command(parse(&["count", "--max-crew-size", "10"]).command, &client)
            .await
            .expect("count");

        assert_eq!(output, "2");
        assert_eq!(
            client.calls(),
            vec![Call::Count(vec![("maxCrewSize", "10".to_string())])]
        );
    }

    #[tokio::test]
    async fn create_converts_prod_year_to_january_first() {
        let client = RecordingClient::new(vec![sample_ship()]);
        let cli = parse(&[
            "create",
            "--name",
            "Rocinante",
            "--planet",
            "Mars",
            "--ship-type",
            "military",
            "--prod-year",
            "3010",
            "--speed",
            "0.85",
            "--crew-size",
            "4",
        ]);

        run_command(cli.command, &client).await.expect("create");

        let expected = ShipDraft {
            name: Some("Rocinante".to_string()),
            planet: Some("Mars".to_string()),
            ship_type: Some(ShipType::Military),
            prod_date: ProdDate::from_year(3010),
            used: None,
            speed: Some(0.85),
            crew_size: Some(4),
        };
        assert_eq!(client.calls(), vec![Call::Create(expected)]);
    }

    #[tokio::test]
    async fn update_sends_only_given_fields() {
        let client = RecordingClient::new(vec![sample_ship()]);
        let cli = parse(&["update", "1", "--used", "false", "--prod-date", "0"]);

        run_command(cli.command, &client).await.expect("update");

        let expected = ShipDraft {
            used: Some(false),
            prod_date: Some(ProdDate::from_millis(0)),
            ..ShipDraft::default()
        };
        assert_eq!(client.calls(), vec![Call::Update("1".to_string(), expected)]);
    }

    #[tokio::test]
    async fn get_surfaces_client_errors() {
        let client = RecordingClient::new(Vec::new());
        let err = run_command(parse(&["get", "1"]).command, &client)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[tokio::test]
    async fn delete_reports_removed_id() {
        let client = RecordingClient::new(Vec::new());
        let output = run_command(parse(&["delete", "5"]).command, &client)
            .await
            .expect("delete");

        assert_eq!(output, "Deleted ship 5.");
        assert_eq!(client.calls(), vec![Call::Delete("5".to_string())]);
    }

    #[tokio::test]
    async fn padded_ids_are_sent_as_given() {
        let client = RecordingClient::new(vec![sample_ship()]);
        run_command(parse(&["get", " 7"]).command, &client)
            .await
            .expect("get");

        assert_eq!(client.calls(), vec![Call::Get(" 7".to_string())]);
    }
}
