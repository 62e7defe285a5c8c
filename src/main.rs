use std::io::Stdout;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use thermostat_console::api::{ApiError, BackendClient};
use thermostat_console::command::{self, Bound, Command};
use thermostat_console::controls::{next_flags, ControlId};
use thermostat_console::outside::OutsideTempClient;
use thermostat_console::panel::{self, Screen};
use thermostat_console::poller::Poller;
use thermostat_console::snapshot::StateCell;
use thermostat_console::state::ThermostatState;

const STATE_POLL_DELAY: Duration = Duration::from_secs(1);
const OUTSIDE_POLL_DELAY: Duration = Duration::from_secs(60);
const CLOCK_TICK_DELAY: Duration = Duration::from_millis(100);

#[derive(Parser)]
#[command(
    name = "thermostat-console",
    about = "Terminal panel for a home thermostat controller"
)]
struct Args {
    /// Thermostat backend base URL.
    #[arg(long, default_value = "http://localhost:5000")]
    backend: String,

    /// InfluxDB base URL for the outdoor temperature.
    #[arg(long, default_value = "http://localhost:8086")]
    influx: String,

    #[arg(long, default_value = "wunderground")]
    influx_db: String,

    #[arg(long, default_value = "thermostat")]
    influx_user: String,

    #[arg(long, default_value = "thermostat")]
    influx_password: String,
}

struct App {
    client: BackendClient,
    cell: Arc<StateCell>,
    screen: Arc<Mutex<Screen<Stdout>>>,
}

impl App {
    /// Apply a response snapshot and redraw, unless a newer one already landed.
    fn apply(&self, seq: u64, state: ThermostatState) {
        if !self.cell.apply(seq, state) {
            warn!("discarding out-of-order response (seq {seq})");
            return;
        }
        if let Some(state) = self.cell.current() {
            let frame = panel::render(&state, Local::now().timestamp_millis());
            if let Err(err) = self.screen.lock().unwrap().draw(&frame) {
                warn!("panel draw failed: {err}");
            }
        }
    }

    async fn poll_state(&self) -> Result<()> {
        let seq = self.cell.begin();
        match self.client.fetch_state().await {
            Ok(state) => self.apply(seq, state),
            Err(ApiError::Backend(message)) => {
                // Application-level failure: tell the user, keep polling.
                let _ = self.screen.lock().unwrap().show_alert(&message);
            }
            Err(err) => return Err(err.into()),
        }
        Ok(())
    }

    async fn toggle(&self, id: ControlId) {
        let Some(state) = self.cell.current() else {
            warn!("no state yet, ignoring {}", id.wire_name());
            return;
        };
        let next = next_flags(state.controls, id, !state.controls.get(id));
        let seq = self.cell.begin();
        match self.client.set_controls(&next).await {
            Ok(state) => self.apply(seq, state),
            // Leave the panel as-is; the next poll reconciles.
            Err(err) => warn!("control change failed: {err}"),
        }
    }

    async fn resume(&self) {
        let seq = self.cell.begin();
        match self.client.resume_schedule().await {
            Ok(state) => self.apply(seq, state),
            Err(err) => warn!("resume failed: {err}"),
        }
    }

    async fn adjust(&self, bound: Bound, delta: i32, room_index: usize) {
        let Some(state) = self.cell.current() else {
            warn!("no state yet, ignoring adjustment");
            return;
        };
        let Some(room) = state.rooms.get(room_index) else {
            warn!("no room at index {room_index}");
            return;
        };
        let (temp_min, temp_max) = match bound {
            Bound::Min => (state.temp_min + delta as f64, state.temp_max),
            Bound::Max => (state.temp_min, state.temp_max + delta as f64),
        };
        let seq = self.cell.begin();
        match self
            .client
            .set_target_temp(&room.name, temp_min, temp_max)
            .await
        {
            Ok(state) => self.apply(seq, state),
            Err(err) => warn!("target change failed: {err}"),
        }
    }

    async fn run_command(&self, cmd: Command) {
        match cmd {
            Command::Toggle(id) => self.toggle(id).await,
            Command::Resume => self.resume().await,
            Command::Adjust { bound, delta, room } => self.adjust(bound, delta, room).await,
            Command::Help => println!("{}", command::USAGE),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let http = reqwest::Client::new();

    let app = Arc::new(App {
        client: BackendClient::new(http.clone(), args.backend.clone()),
        cell: Arc::new(StateCell::new()),
        screen: Arc::new(Mutex::new(Screen::new(std::io::stdout()))),
    });
    let outside = Arc::new(OutsideTempClient::new(
        http,
        args.influx,
        args.influx_db,
        args.influx_user,
        args.influx_password,
    ));

    info!("polling {}", args.backend);

    let _state_poller = Poller::spawn("state", STATE_POLL_DELAY, {
        let app = app.clone();
        move || {
            let app = app.clone();
            async move { app.poll_state().await }
        }
    });

    let _outside_poller = Poller::spawn("outside-temp", OUTSIDE_POLL_DELAY, {
        let app = app.clone();
        let outside = outside.clone();
        move || {
            let app = app.clone();
            let outside = outside.clone();
            async move {
                let temp = outside.fetch_latest().await?;
                app.screen
                    .lock()
                    .unwrap()
                    .show_outside(temp)
                    .context("outside temp draw failed")?;
                Ok(())
            }
        }
    });

    let _clock = Poller::spawn("clock", CLOCK_TICK_DELAY, {
        let app = app.clone();
        move || {
            let app = app.clone();
            async move {
                app.screen
                    .lock()
                    .unwrap()
                    .tick_clock(Local::now())
                    .context("clock draw failed")?;
                Ok(())
            }
        }
    });

    println!("{}", command::USAGE);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("stdin read failed")? {
        if line.trim().is_empty() {
            continue;
        }
        match command::parse(&line) {
            Some(cmd) => app.run_command(cmd).await,
            None => println!("unrecognized: {line}\n{}", command::USAGE),
        }
    }

    Ok(())
}
