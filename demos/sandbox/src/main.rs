// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Drives a scripted rendering session: probe once, mount a viewer, knock
//! the context over a few times and watch the controller degrade quality.
//!
//! Run with: cargo run -p sandbox -- --losses 3

mod surface;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use surface::{Scripted, SimulatedSurface};
use vigil_core::{ManualClock, SurfaceParams, SurfaceSignal};
use vigil_infra::{WgpuCapabilityProber, WgpuSurfaceHost};
use vigil_sdk::{Session, Viewer, VigilConfig, DEFAULT_CONFIG_FILE};

const FRAME: Duration = Duration::from_millis(16);
const LOGICAL_SIZE: (u32, u32) = (640, 480);

#[derive(Parser)]
#[command(name = "sandbox")]
#[command(about = "Scripted rendering resilience session", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Number of context losses to inject
    #[arg(short = 'n', long, default_value = "3")]
    losses: usize,

    /// Simulated seconds between two losses
    #[arg(long, default_value = "60")]
    interval_secs: u64,

    /// Native device pixel ratio
    #[arg(long, default_value = "2.0")]
    pixel_ratio: f32,

    /// Drive a real wgpu device instead of the simulated surface
    #[arg(long)]
    gpu: bool,

    /// Write the diagnostics log as JSON to this file on exit
    #[arg(long, value_name = "FILE")]
    export: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = VigilConfig::load(&cli.config)?;
    vigil_telemetry::logging::init(&config.log_filter);

    let clock = Arc::new(ManualClock::new());
    let prober = WgpuCapabilityProber::new();
    let session = pollster::block_on(Session::start_with_clock(config, &prober, clock.clone()));
    log::info!("{}", session.capability().summary());

    if cli.gpu {
        run_script(&session, &clock, &cli, |params, signals| {
            WgpuSurfaceHost::new(params, LOGICAL_SIZE, signals)
        })?;
    } else {
        run_script(&session, &clock, &cli, |params, signals| {
            Ok(SimulatedSurface::new(params, signals))
        })?;
    }

    if let Some(path) = &cli.export {
        let json = session.diagnostics().export_json()?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write diagnostics to {}", path.display()))?;
        log::info!("Diagnostics written to {}", path.display());
    }
    Ok(())
}

fn run_script<S, F>(session: &Session, clock: &ManualClock, cli: &Cli, factory: F) -> Result<()>
where
    S: Scripted,
    F: FnOnce(&SurfaceParams, flume::Sender<SurfaceSignal>) -> Result<S>,
{
    let mut viewer = session.mount_viewer(cli.pixel_ratio, factory);
    if viewer.is_fallback() {
        log::warn!("Overlay: {:?}", viewer.overlay());
        return Ok(());
    }

    run_frames(&mut viewer, clock, 30);
    for round in 1..=cli.losses {
        log::info!("Round {round}: dropping the context.");
        if let Some(surface) = viewer.monitor_mut().and_then(|m| m.surface_mut()) {
            surface.lose();
        }
        run_frames(&mut viewer, clock, 1);
        log::info!("Overlay: {:?}", viewer.overlay());

        clock.advance_ms(500);
        if let Some(surface) = viewer.monitor_mut().and_then(|m| m.surface_mut()) {
            surface.restore()?;
        }
        run_frames(&mut viewer, clock, 30);
        log::info!("Overlay: {:?}", viewer.overlay());

        clock.advance(Duration::from_secs(cli.interval_secs));
        run_frames(&mut viewer, clock, 1);
    }

    if let Some(state) = viewer.state() {
        log::info!(
            "Final phase {}, tier {}, {} loss(es) in window.",
            state.phase,
            state.current_quality_tier,
            state.losses_in_window()
        );
    }
    viewer.unmount();
    Ok(())
}

fn run_frames<S: Scripted>(viewer: &mut Viewer<S>, clock: &ManualClock, count: usize) {
    for _ in 0..count {
        clock.advance(FRAME);
        viewer.frame(FRAME);
    }
}
