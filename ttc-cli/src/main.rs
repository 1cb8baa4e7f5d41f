mod scene;

use log::*;
use scene::{FrameReport, ObjectReport, Scene};
use std::error::Error;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;
use structopt::StructOpt;
use ttc_fusion::{FusionSettings, TtcPipeline, TtcTracker};
use ttc_projection::LidarCameraProjection;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "ttc",
    about = "Estimates time-to-collision of tracked objects from camera and lidar frames"
)]
struct Opt {
    /// The file where settings are specified.
    ///
    /// This is in the format of `ttc_fusion::FusionSettings`. Defaults are used if it doesn't exist.
    #[structopt(short, long, default_value = "ttc-settings.json")]
    settings: PathBuf,
    /// Overrides the frame rate of the settings.
    #[structopt(long)]
    frame_rate: Option<f64>,
    /// The output path to write JSON lines to.
    ///
    /// If this is not provided, then the output goes to stdout.
    #[structopt(short, long, parse(from_os_str))]
    output: Option<PathBuf>,
    /// The scene file with calibration and frames.
    #[structopt(parse(from_os_str))]
    scene: PathBuf,
}

fn load_settings(opt: &Opt) -> FusionSettings {
    let settings = match File::open(&opt.settings) {
        Ok(file) => match serde_json::from_reader(BufReader::new(file)) {
            Ok(settings) => {
                info!("loaded settings from {}", opt.settings.display());
                settings
            }
            Err(e) => {
                warn!("failed to parse {}: {}", opt.settings.display(), e);
                FusionSettings::default()
            }
        },
        Err(_) => {
            info!("used default settings");
            FusionSettings::default()
        }
    };
    match opt.frame_rate {
        Some(frame_rate) => settings.frame_rate(frame_rate),
        None => settings,
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    pretty_env_logger::init_timed();
    let opt = Opt::from_args();

    let settings = load_settings(&opt);
    let scene: Scene = serde_json::from_reader(BufReader::new(File::open(&opt.scene)?))?;
    info!("loaded {} frames", scene.frames.len());

    let projection = match &scene.calibration {
        Some(calibration) => calibration.projection(),
        None => {
            info!("no calibration in scene, using KITTI 2011_09_26");
            LidarCameraProjection::kitti_2011_09_26()
        }
    };
    let mut tracker = TtcTracker::new(TtcPipeline::new(projection, settings)?);

    let mut out: Box<dyn Write> = match &opt.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(std::io::stdout())),
    };
    for (ix, frame) in scene.frames.into_iter().enumerate() {
        let objects = tracker.push_frame(frame);
        let report = FrameReport {
            frame: ix,
            objects: objects.iter().map(ObjectReport::from).collect(),
        };
        serde_json::to_writer(&mut out, &report)?;
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}
