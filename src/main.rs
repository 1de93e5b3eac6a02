use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use vehicle_replay::config::Settings;
use vehicle_replay::source::{FileSource, RouteCatalog, RouteSource, Selection};
use vehicle_replay::{Frame, Session};

/// Command-line overrides on top of the saved settings
#[derive(Debug, Default)]
struct CliArgs {
    vehicle: Option<String>,
    date: Option<String>,
    catalog: Option<PathBuf>,
    route: Option<PathBuf>,
    interval_ms: Option<u64>,
    list: bool,
    interactive: bool,
    save: bool,
    help: bool,
}

fn parse_args(args: &[String]) -> Result<CliArgs> {
    let mut cli = CliArgs::default();
    let mut iter = args.iter().skip(1);

    while let Some(arg) = iter.next() {
        let mut value = || {
            iter.next()
                .cloned()
                .with_context(|| format!("{} needs a value", arg))
        };

        match arg.as_str() {
            "--vehicle" => cli.vehicle = Some(value()?),
            "--date" => cli.date = Some(value()?),
            "--catalog" => cli.catalog = Some(PathBuf::from(value()?)),
            "--route" => cli.route = Some(PathBuf::from(value()?)),
            "--interval" => {
                let raw = value()?;
                cli.interval_ms = Some(
                    raw.parse()
                        .with_context(|| format!("Invalid interval: {}", raw))?,
                );
            }
            "--list" => cli.list = true,
            "--interactive" | "-i" => cli.interactive = true,
            "--save" => cli.save = true,
            "--help" | "-h" => cli.help = true,
            other => bail!("Unknown argument: {} (try --help)", other),
        }
    }

    Ok(cli)
}

fn print_help() {
    println!("vehicle-replay - replay a recorded vehicle route");
    println!();
    println!("Usage: vehicle-replay [options]");
    println!();
    println!("  --vehicle <id>     vehicle to show (default from settings, v1)");
    println!("  --date <id>        date to show (default from settings, today)");
    println!("  --catalog <path>   catalog JSON instead of the built-in demo");
    println!("  --route <path>     replay a single route file (JSON or CSV)");
    println!("  --interval <ms>    milliseconds per playback step");
    println!("  --list             list vehicles and dates, then exit");
    println!("  -i, --interactive  read commands from stdin");
    println!("  --save             store the effective options as defaults");
    println!();
    println!(
        "Interactive commands: play, pause, reset, seek <n>, show <vehicle> <date>, status, quit"
    );
}

async fn build_source(cli: &CliArgs, settings: &Settings) -> Result<Box<dyn RouteSource>> {
    if let Some(route) = &cli.route {
        return Ok(Box::new(FileSource::new(route)));
    }

    match &settings.catalog {
        Some(path) => {
            let catalog = RouteCatalog::load(path)
                .await
                .with_context(|| format!("Failed to load catalog {}", path.display()))?;
            Ok(Box::new(catalog))
        }
        None => Ok(Box::new(RouteCatalog::demo().context("Built-in demo route is invalid")?)),
    }
}

fn log_frame(frame: &Frame) {
    let position = frame
        .point
        .as_ref()
        .map(|p| p.coordinates_label())
        .unwrap_or_else(|| "--".to_string());

    info!(
        "[{}/{}] {} | {}{}",
        frame.snapshot.cursor + 1,
        frame.route_len,
        position,
        frame.metrics.display(),
        if frame.snapshot.is_playing { "" } else { " (paused)" }
    );
}

async fn print_report(session: &Session) {
    if let Some(report) = session.report().await {
        println!("{}", report);
    }
}

/// Play the selected route once, logging every step
async fn run_to_end(session: &mut Session, frames: &mut watch::Receiver<Frame>) -> Result<()> {
    log_frame(&frames.borrow_and_update());

    if !session.controller_mut().play().await {
        info!("Nothing to play");
        print_report(session).await;
        return Ok(());
    }

    loop {
        tokio::select! {
            changed = frames.changed() => {
                changed.context("Playback stopped unexpectedly")?;
                let frame = frames.borrow_and_update().clone();
                log_frame(&frame);
                if !frame.snapshot.is_playing && frame.is_at_end {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                session.controller_mut().pause().await;
                info!("Interrupted");
                break;
            }
        }
    }

    print_report(session).await;
    Ok(())
}

/// Outcome of one interactive command
enum Flow {
    Continue,
    Quit,
}

async fn handle_command(session: &mut Session, line: &str) -> Result<Flow> {
    let mut parts = line.split_whitespace();
    let Some(command) = parts.next() else {
        return Ok(Flow::Continue);
    };

    match command {
        "play" => {
            if !session.controller_mut().play().await {
                info!("Already playing or at the end of the route");
            }
        }
        "pause" => session.controller_mut().pause().await,
        "reset" => session.controller_mut().reset().await,
        "seek" => match parts.next().map(str::parse::<i64>) {
            Some(Ok(index)) => session.controller_mut().seek(index).await,
            _ => warn!("Usage: seek <index>"),
        },
        "show" => match (parts.next(), parts.next()) {
            (Some(vehicle), Some(date)) => {
                if let Err(e) = session.show(Selection::new(vehicle, date)).await {
                    warn!("Could not load route: {}", e);
                }
            }
            _ => warn!("Usage: show <vehicle> <date>"),
        },
        "status" => print_report(session).await,
        "list" => print_options(session.source()),
        "help" => print_help(),
        "quit" | "exit" | "q" => return Ok(Flow::Quit),
        other => warn!("Unknown command: {}", other),
    }

    Ok(Flow::Continue)
}

async fn run_interactive(session: &mut Session, frames: &mut watch::Receiver<Frame>) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    log_frame(&frames.borrow_and_update());

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read stdin")? else {
                    break;
                };
                if let Flow::Quit = handle_command(session, &line).await? {
                    break;
                }
            }
            changed = frames.changed() => {
                changed.context("Playback stopped unexpectedly")?;
                log_frame(&frames.borrow_and_update());
            }
        }
    }

    session.controller_mut().pause().await;
    Ok(())
}

fn print_options(source: &dyn RouteSource) {
    println!("Source: {}", source.name());
    println!("Vehicles:");
    for v in source.vehicles() {
        println!("  {:<12} {}", v.id, v.name);
    }
    println!("Dates:");
    for d in source.dates() {
        println!("  {:<12} {}", d.id, d.label);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let cli = parse_args(&args)?;
    if cli.help {
        print_help();
        return Ok(());
    }

    let mut settings = Settings::load();
    if let Some(vehicle) = &cli.vehicle {
        settings.vehicle = vehicle.clone();
    }
    if let Some(date) = &cli.date {
        settings.date = date.clone();
    }
    if let Some(catalog) = &cli.catalog {
        settings.catalog = Some(catalog.clone());
    }
    if let Some(ms) = cli.interval_ms {
        settings.tick_interval_ms = ms;
    }
    if cli.save {
        let path = settings.save()?;
        info!("Saved settings to {}", path.display());
    }

    let source = build_source(&cli, &settings).await?;
    if cli.list {
        print_options(source.as_ref());
        return Ok(());
    }

    let selection = match source.vehicles().first() {
        Some(vehicle) if cli.route.is_some() => Selection::new(vehicle.id.clone(), "file"),
        _ => Selection::new(settings.vehicle.clone(), settings.date.clone()),
    };

    let mut session = Session::new(source, settings.playback_config());
    info!(
        "Playback step every {} ms",
        session.controller().config().tick_interval.as_millis()
    );
    let mut frames = session.controller().subscribe();
    session
        .show(selection)
        .await
        .context("Failed to load route")?;

    if cli.interactive {
        run_interactive(&mut session, &mut frames).await
    } else {
        run_to_end(&mut session, &mut frames).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("vehicle-replay")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_parse_args() {
        let cli = parse_args(&args(&[
            "--vehicle",
            "v2",
            "--date",
            "yesterday",
            "--interval",
            "250",
            "-i",
        ]))
        .unwrap();
        assert_eq!(cli.vehicle.as_deref(), Some("v2"));
        assert_eq!(cli.date.as_deref(), Some("yesterday"));
        assert_eq!(cli.interval_ms, Some(250));
        assert!(cli.interactive);
        assert!(!cli.list);
    }

    #[test]
    fn test_parse_args_errors() {
        assert!(parse_args(&args(&["--vehicle"])).is_err());
        assert!(parse_args(&args(&["--interval", "fast"])).is_err());
        assert!(parse_args(&args(&["--bogus"])).is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_interactive_commands() {
        let mut session = Session::new(
            Box::new(RouteCatalog::demo().unwrap()),
            Settings::default().playback_config(),
        );
        session.show(Selection::new("v1", "today")).await.unwrap();

        handle_command(&mut session, "seek 3").await.unwrap();
        assert_eq!(session.controller().snapshot().await.cursor, 3);

        handle_command(&mut session, "play").await.unwrap();
        assert!(session.controller().snapshot().await.is_playing);

        handle_command(&mut session, "reset").await.unwrap();
        assert_eq!(session.controller().snapshot().await.cursor, 0);

        handle_command(&mut session, "show v2 yesterday").await.unwrap();
        assert_eq!(session.controller().frame().await.route_len, 8);

        handle_command(&mut session, "seek nope").await.unwrap();
        assert!(matches!(handle_command(&mut session, "quit").await.unwrap(), Flow::Quit));
    }
}
