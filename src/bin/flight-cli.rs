use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde_json::Value;

use flight_proxy::normalize::normalize_offers;
use flight_proxy::view::{ResultsView, SearchForm, Selection};

#[derive(Parser)]
#[command(name = "flight-cli")]
#[command(about = "Search flights through a running flight-proxy", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search offers and print them as cards
    Search {
        #[arg(long, default_value = "PAR")]
        origin: String,

        #[arg(long, default_value = "TYO")]
        destination: String,

        /// Departure date (yyyy-MM-dd)
        #[arg(long, default_value = "2026-03-03")]
        departure: NaiveDate,

        /// Return date (yyyy-MM-dd); makes the search a round trip
        #[arg(long = "return")]
        return_date: Option<NaiveDate>,

        /// Also search three days either side of the departure date
        #[arg(long)]
        flexible: bool,

        /// Pick the Nth result (1-based) after rendering
        #[arg(long)]
        select: Option<usize>,
    },
    /// Check proxy health
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Search {
            origin,
            destination,
            departure,
            return_date,
            flexible,
            select,
        } => {
            let mut form = SearchForm::default();
            form.set_origin(&origin);
            form.set_destination(&destination);
            form.departure_date = departure;
            form.return_date = return_date;
            form.one_way = return_date.is_none();
            form.flexible_dates = flexible;

            let mut view = ResultsView::default();
            view.submit();
            println!("{}", view.render());

            let flights = match fetch_offers(&client, &cli.url, &form).await {
                Ok(payload) => normalize_offers(&payload),
                Err(e) => {
                    eprintln!("Flight fetch error: {}", e);
                    Vec::new()
                }
            };
            view.finish(flights);
            println!("{}", view.render());

            if let Some(n) = select {
                match n.checked_sub(1).and_then(|i| view.select(i)) {
                    Some(Selection::OpenLink(link)) => println!("Open: {}", link),
                    Some(Selection::Confirm(message)) => println!("{}", message),
                    None => eprintln!("No result number {}", n),
                }
            }
        }
        Commands::Health => {
            let res = client.get(format!("{}/health", cli.url)).send().await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn fetch_offers(
    client: &reqwest::Client,
    base: &str,
    form: &SearchForm,
) -> Result<Value, Box<dyn std::error::Error>> {
    let res = client
        .get(format!("{}/api/search?{}", base, form.query_string()))
        .send()
        .await?;

    let status = res.status();
    if !status.is_success() {
        let text = res.text().await.unwrap_or_default();
        return Err(format!("API request failed with status {}: {}", status, text).into());
    }
    Ok(res.json().await?)
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: proxy returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
