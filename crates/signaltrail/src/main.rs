//! `sigtrail` - CLI for signaltrail
//!
//! This binary provides the command-line interface for watching Wi-Fi
//! transitions, logging locations, and inspecting the recorded route.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::sync::Arc;

use clap::Parser;

use signaltrail::cli::{
    Cli, ClearCommand, Command, ConfigCommand, LocateCommand, LogCommand, RouteCommand,
    SignalCommand,
};
use signaltrail::geo::{resolver_from_config, GeoResolver};
use signaltrail::monitor::{
    log_current_location, log_manual_location, ManualLocation, WatchHandle, Watcher,
};
use signaltrail::motivator::{encouragement, SignalBand};
use signaltrail::route::{parse, point_role, PointRole, RouteSummary};
use signaltrail::signal::source_from_config;
use signaltrail::store::RouteStore;
use signaltrail::{init_logging, Config};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    // Execute the command
    match cli.command {
        Command::Watch => handle_watch(&config).await,
        Command::Signal(signal_cmd) => handle_signal(&config, &signal_cmd),
        Command::Locate(locate_cmd) => handle_locate(&config, &locate_cmd).await,
        Command::Log(log_cmd) => handle_log(&config, &log_cmd).await,
        Command::Route(route_cmd) => handle_route(&config, &route_cmd),
        Command::Clear(clear_cmd) => handle_clear(&config, &clear_cmd),
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
    }
}

async fn handle_watch(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let source = source_from_config(config)?;
    let resolver: Arc<dyn GeoResolver> = Arc::from(resolver_from_config(config)?);
    let store = RouteStore::new(config.route_log_path());
    store.ensure_initialized()?;

    println!("Watching Wi-Fi transitions (Ctrl-C to stop)");
    println!("Route log: {}", store.path().display());

    let handle = WatchHandle::new();
    let ctrl_c_handle = handle.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c_handle.stop();
        }
    });

    let mut watcher = Watcher::new(source, resolver, store, config);
    watcher.run(&handle).await;

    println!("Stopped.");
    Ok(())
}

fn handle_signal(config: &Config, cmd: &SignalCommand) -> Result<(), Box<dyn std::error::Error>> {
    let source = source_from_config(config)?;
    let sample = source.sample()?;
    let band = SignalBand::from_quality(sample.quality);

    if cmd.json {
        let status = serde_json::json!({
            "source": source.name(),
            "ssid": sample.ssid,
            "quality": sample.quality,
            "band": band.to_string(),
            "connected": sample.is_connected(),
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        match sample.identity() {
            Some(ssid) => println!("Connected to: {ssid}"),
            None => println!("Not connected"),
        }
        println!("Strength: {}% ({band})", sample.quality);
        println!();
        println!("\"{}\"", encouragement(sample.quality));
    }
    Ok(())
}

async fn handle_locate(
    config: &Config,
    cmd: &LocateCommand,
) -> Result<(), Box<dyn std::error::Error>> {
    let resolver = resolver_from_config(config)?;
    let fix = resolver.resolve().await?;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&fix)?);
    } else {
        println!("Location ({})", fix.accuracy);
        println!("  Coordinates: {}, {}", fix.latitude, fix.longitude);
        println!("  Place:       {}, {}, {}", fix.city, fix.region, fix.country);
    }
    Ok(())
}

async fn handle_log(config: &Config, cmd: &LogCommand) -> Result<(), Box<dyn std::error::Error>> {
    let store = RouteStore::new(config.route_log_path());

    let point = if let (Some(lat), Some(lon)) = (cmd.lat, cmd.lon) {
        log_manual_location(
            &store,
            ManualLocation {
                latitude: lat,
                longitude: lon,
                location_type: cmd.location_type.clone(),
                city: cmd.city.clone(),
                region: cmd.region.clone(),
                country: cmd.country.clone(),
            },
        )?
    } else {
        let resolver = resolver_from_config(config)?;
        log_current_location(resolver.as_ref(), &store).await?
    };

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&point)?);
    } else {
        println!(
            "Logged {}, {} ({}) at {}",
            point.latitude, point.longitude, point.city, point.timestamp
        );
    }
    Ok(())
}

fn handle_route(config: &Config, cmd: &RouteCommand) -> Result<(), Box<dyn std::error::Error>> {
    let store = RouteStore::new(config.route_log_path());
    let contents = store.read_all()?;

    if cmd.raw {
        print!("{contents}");
        return Ok(());
    }

    let points = parse(&contents)?;
    let summary = RouteSummary::from_points(&points);

    if cmd.json {
        let output = serde_json::json!({
            "points": points,
            "point_count": summary.point_count,
            "distance_km": summary.distance_km(),
            "start_timestamp": summary.start_timestamp,
            "end_timestamp": summary.end_timestamp,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if points.is_empty() {
        println!("No route points logged yet.");
        return Ok(());
    }

    for (index, point) in points.iter().enumerate() {
        let marker = match point_role(index, points.len()) {
            PointRole::Start => "start",
            PointRole::End => "end",
            PointRole::Waypoint => "  ...",
        };
        println!(
            "{marker}  {}  {}, {}  {}",
            point.timestamp,
            point.latitude,
            point.longitude,
            [&point.city, &point.region, &point.country]
                .iter()
                .filter(|s| !s.is_empty())
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    println!();
    println!("Points:   {}", summary.point_count);
    println!("Distance: {} km", summary.distance_km());
    if let (Some(start), Some(end)) = (&summary.start_timestamp, &summary.end_timestamp) {
        println!("From:     {start}");
        println!("To:       {end}");
    }
    Ok(())
}

fn handle_clear(config: &Config, cmd: &ClearCommand) -> Result<(), Box<dyn std::error::Error>> {
    if !cmd.yes {
        println!("This will erase all logged route points.");
        println!("Use --yes to confirm.");
        return Ok(());
    }

    let store = RouteStore::new(config.route_log_path());
    store.clear()?;
    println!("Route log cleared.");
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Route log path:   {}", config.route_log_path().display());
                println!();
                println!("[Signal]");
                println!("  Poll interval:    {}ms", config.signal.poll_interval_ms);
                match config.signal.quality_override {
                    Some(quality) => println!("  Quality override: {quality}%"),
                    None => println!("  Quality override: (none)"),
                }
                println!();
                println!("[Geo]");
                println!("  Endpoint:         {}", config.geo.endpoint);
                println!("  Timeout:          {}s", config.geo.timeout_secs);
                println!("  Settle delay:     {}ms", config.geo.settle_delay_ms);
                match &config.geo.fix_override {
                    Some(fix) => println!("  Fix override:     {}, {}", fix.latitude, fix.longitude),
                    None => println!("  Fix override:     (none)"),
                }
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
