//! Command line client for the SkyWatch gateway.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// SkyWatch server URL
    #[arg(long, default_value = "http://localhost:5000")]
    url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List flights inside a bounding box
    Flights {
        #[arg(long, allow_hyphen_values = true)]
        lamin: f64,
        #[arg(long, allow_hyphen_values = true)]
        lamax: f64,
        #[arg(long, allow_hyphen_values = true)]
        lomin: f64,
        #[arg(long, allow_hyphen_values = true)]
        lomax: f64,
    },
    /// List flights around a point with their distance
    Around {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
    },
    /// Closest aircraft to a point
    Overhead {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
    },
    /// Guess the aircraft model from a visual description
    Identify {
        /// e.g. "twin engine t-tail high wing"
        desc: String,
    },
    /// Reference data for an aircraft model
    Info {
        model: String,
    },
    /// Flight metadata by IATA flight number
    Flight {
        flight_number: String,
    },
    /// Airports near a point
    Airports {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
        /// Search radius in km
        #[arg(long)]
        distance: Option<f64>,
    },
}

impl Command {
    fn request(&self) -> (&'static str, Vec<(&'static str, String)>) {
        match self {
            Command::Flights {
                lamin,
                lamax,
                lomin,
                lomax,
            } => (
                "get_flights",
                vec![
                    ("lamin", lamin.to_string()),
                    ("lamax", lamax.to_string()),
                    ("lomin", lomin.to_string()),
                    ("lomax", lomax.to_string()),
                ],
            ),
            Command::Around { lat, lon } => (
                "around",
                vec![("lat", lat.to_string()), ("lon", lon.to_string())],
            ),
            Command::Overhead { lat, lon } => (
                "nextoverhead",
                vec![("lat", lat.to_string()), ("lon", lon.to_string())],
            ),
            Command::Identify { desc } => ("identify", vec![("desc", desc.clone())]),
            Command::Info { model } => ("aircraftinfo", vec![("type", model.clone())]),
            Command::Flight { flight_number } => {
                ("flight", vec![("flight_number", flight_number.clone())])
            }
            Command::Airports { lat, lon, distance } => {
                let mut params = vec![("lat", lat.to_string()), ("lon", lon.to_string())];
                if let Some(distance) = distance {
                    params.push(("distance", distance.to_string()));
                }
                ("nearbyairports", params)
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let (endpoint, params) = args.command.request();
    let url = format!("{}/{}", args.url.trim_end_matches('/'), endpoint);

    let response = reqwest::Client::new()
        .get(&url)
        .query(&params)
        .send()
        .await
        .with_context(|| format!("Failed to reach {}", url))?;

    let status = response.status();
    let body: Value = response
        .json()
        .await
        .context("Failed to parse server response")?;

    println!("{}", serde_json::to_string_pretty(&body)?);
    if !status.is_success() {
        anyhow::bail!("Server returned {}", status);
    }
    Ok(())
}
