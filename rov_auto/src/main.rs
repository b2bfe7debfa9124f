//! Autonomy replay executable entry point.
//!
//! # Architecture
//!
//! Drives the autonomy from a run recorded by the simulation host. The run directory contains a
//! `telem.csv` file, with one row of vehicle telemetry per tick, and the camera frames it refers
//! to.
//!
//! The general execution methodology consists of:
//!
//!     - Initialise the session, logger and autonomy
//!     - Main loop, once per telemetry row:
//!         - Load the frame and telemetry into the data store
//!         - Autonomy processing:
//!             - Perception and world map accumulation
//!             - Navigation control
//!         - Archive the demands and status
//!     - Save the final world map
//!
//! # Usage
//!
//! ```text
//! rov_auto <run_dir>
//! ```

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use chrono::Utc;
use color_eyre::{
    eyre::{eyre, WrapErr},
    Report,
};
use log::{debug, info, warn};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

// Internal
use auto_lib::{auto::AutoMgr, data_store::DataStore, params::RovAutoParams};
use comms_if::eqpt::{cam::CamImage, telem::VehicleTelem};
use util::{
    archive::Archived,
    logger::{logger_init, LevelFilter},
    session::Session,
};

// ---------------------------------------------------------------------------
// STRUCTS
// ---------------------------------------------------------------------------

/// A single row of the recorded telemetry.
#[derive(Debug, Deserialize)]
struct TelemRecord {
    /// Frame file, relative to the run directory
    image: String,
    x: f64,
    y: f64,
    yaw_deg: f64,
    speed_ms: f64,
    near_sample: bool,
    picking_up: bool,
    samples_collected: u32,
    samples_to_find: u32,
    percentage_mapped: f64,
    home_x: f64,
    home_y: f64,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    color_eyre::install()?;

    // ---- EARLY INITIALISATION ----

    let params: RovAutoParams =
        util::params::load("rov_auto.toml").wrap_err("Could not load exec params")?;

    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        return Err(eyre!(
            "Expected one argument, the run directory, found {}",
            args.len() - 1
        ));
    }
    let run_dir = PathBuf::from(&args[1]);

    // Initialise session
    let session = Session::new("rov_auto", &params.sessions_dir)
        .wrap_err("Failed to create the session")?;

    // Initialise logger
    let log_level: LevelFilter = params
        .log_level
        .parse()
        .map_err(|_| eyre!("Invalid log level \"{}\"", params.log_level))?;
    logger_init(log_level, &session).wrap_err("Failed to initialise logging")?;

    info!("Rover Autonomy Replay Executable\n");
    info!("Session directory: {:?}", session.session_root);
    info!("Run directory: {:?}\n", run_dir);

    // ---- INITIALISE MODULES ----

    info!("Initialising modules...");

    let mut ds = DataStore::default();

    let mut auto_mgr = AutoMgr::init(&params.per_mgr_params, "nav_ctrl.toml", &session)
        .wrap_err("Failed to initialise the autonomy")?;

    info!("Module initialisation complete\n");

    // ---- MAIN LOOP ----

    let mut reader = csv::Reader::from_path(run_dir.join("telem.csv"))
        .wrap_err("Could not open the run's telemetry")?;

    info!("Beginning main loop\n");

    for record in reader.deserialize::<TelemRecord>() {
        // Get cycle start time
        let cycle_start_instant = Instant::now();

        // Clear items that need wiping at the start of the cycle
        ds.cycle_start();

        // ---- DATA INPUT ----

        let record = record.wrap_err_with(|| {
            format!("Could not read the telemetry for cycle {}", ds.num_cycles)
        })?;

        ds.frame = load_frame(&run_dir, &record.image);
        ds.telem = Some(record.to_telem());

        // ---- AUTONOMY PROCESSING ----

        auto_mgr.step(&mut ds);

        debug!(
            "{:.3} s demands: throttle {:.2}, steer {:.2} deg, brake {:.2}, pickup {}",
            ds.sim_time_s,
            ds.nav_ctrl_output.throttle,
            ds.nav_ctrl_output.steer_deg,
            ds.nav_ctrl_output.brake,
            ds.nav_ctrl_output.pickup
        );

        // ---- WRITE ARCHIVES ----

        if let Err(e) = auto_mgr.nav_ctrl.write() {
            warn!("Could not archive NavCtrl: {}", e);
        }

        if params.vision_save_period > 0
            && ds.num_cycles % params.vision_save_period as u128 == 0
        {
            if let Some(ref per_output) = ds.per_output {
                let path = session
                    .session_root
                    .join(format!("vision_{:06}.png", ds.num_cycles));
                if let Err(e) = per_output.vision_image().save(&path) {
                    warn!("Could not save vision image: {}", e);
                }
            }
        }

        if auto_mgr.is_mission_done() {
            info!("Mission complete after {} cycles", ds.num_cycles + 1);
            ds.cycle_end();
            break;
        }

        // ---- CYCLE MANAGEMENT ----

        let cycle_dur = Instant::now() - cycle_start_instant;

        // Get sleep duration
        let overran = match Duration::from_secs_f64(params.cycle_period_s).checked_sub(cycle_dur) {
            Some(d) => {
                thread::sleep(d);
                false
            }
            None => {
                if params.cycle_period_s > 0.0 {
                    warn!(
                        "Cycle overran by {:.06} s",
                        cycle_dur.as_secs_f64() - params.cycle_period_s
                    );
                }
                // Replaying as fast as possible never counts as an overrun
                params.cycle_period_s > 0.0
            }
        };

        // If number of overruns greater than the limit exit
        if ds.record_overrun(overran, params.max_consec_cycle_overruns) {
            return Err(eyre!(
                "More than {} consecutive cycle overruns",
                params.max_consec_cycle_overruns
            ));
        }

        ds.cycle_end();
    }

    // ---- SHUTDOWN ----

    let map_path = session.session_root.join("world_map.png");
    auto_mgr
        .world_map
        .snapshot()
        .save(&map_path)
        .wrap_err("Could not save the world map")?;
    info!("World map saved to {:?}", map_path);

    info!("End of execution");

    Ok(())
}

/// Load a recorded frame, or `None` if it can't be read.
fn load_frame(run_dir: &Path, image: &str) -> Option<CamImage> {
    match image::open(run_dir.join(image)) {
        Ok(img) => Some(CamImage::from_dynamic(img, Utc::now())),
        Err(e) => {
            warn!("Could not load frame \"{}\": {}", image, e);
            None
        }
    }
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TelemRecord {
    fn to_telem(&self) -> VehicleTelem {
        VehicleTelem {
            position_m: [self.x, self.y],
            yaw_deg: self.yaw_deg,
            speed_ms: self.speed_ms,
            near_sample: self.near_sample,
            picking_up: self.picking_up,
            samples_collected: self.samples_collected,
            samples_to_find: self.samples_to_find,
            percentage_mapped: self.percentage_mapped,
            home_position_m: [self.home_x, self.home_y],
        }
    }
}
