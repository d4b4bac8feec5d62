//! Rignode console demo.
//!
//! Drives the animation node against a deterministic console engine so the
//! whole surface can be exercised without a renderer:
//!
//! - **bevy_ecs** backs the playback world behind [`AnimationNode`]
//! - **serde_json** loads the clip manifest the console engine plays from
//! - **clap** parses the CLI, **env_logger** controls output verbosity
//!
//! Each "render" is a log line; run with `RUST_LOG=debug` to watch
//! individual ticks, or the default `info` for lifecycle events only.
//!
//! # Running
//!
//! ```sh
//! cargo run -- --template wave --seconds 2
//! RUST_LOG=debug cargo run -- --template orbit --flip-x
//! ```

use std::path::PathBuf;

use clap::Parser;
use log::{debug, info, trace};
use rustc_hash::FxHashMap;
use serde::Deserialize;

use rignode::engine::{EntityInstance, PlaybackEngine};
use rignode::node::AnimationNode;
use rignode::resolver::{self, SpriteResolver};

/// Built-in clips used when no manifest file is given.
const DEFAULT_MANIFEST: &str = r#"{
    "clips": [
        { "name": "wave",  "duration_ms": 800.0,  "sprite": "sprites/fx/wave.png" },
        { "name": "orbit", "duration_ms": 1200.0, "sprite": "sprites/fx/orbit.png" }
    ]
}"#;

/// One clip the console engine can play.
#[derive(Debug, Clone, Deserialize)]
struct ClipSpec {
    name: String,
    duration_ms: f32,
    sprite: String,
}

#[derive(Debug, Deserialize)]
struct Manifest {
    clips: Vec<ClipSpec>,
}

/// A playback instance that renders to the log.
///
/// The elapsed clock wraps at the clip duration, so the reported time-ratio
/// stays in `[0, 1)` and wraps toward zero at the end of every loop, which
/// is the completion signal the node listens for.
struct ConsoleInstance {
    name: String,
    duration_ms: f32,
    elapsed_ms: f32,
    mirror: (f32, f32),
    sprite: Option<String>,
}

impl EntityInstance for ConsoleInstance {
    fn advance(&mut self, elapsed_ms: f32) {
        self.elapsed_ms = (self.elapsed_ms + elapsed_ms) % self.duration_ms;
    }

    fn time_ratio(&self) -> f32 {
        self.elapsed_ms / self.duration_ms
    }

    fn evaluate_triggers(&mut self) {
        trace!("[{}] triggers at {:.3}", self.name, self.time_ratio());
    }

    fn render(&mut self) {
        debug!(
            "[{}] render ratio={:.3} scale=({},{}) sprite={}",
            self.name,
            self.time_ratio(),
            self.mirror.0,
            self.mirror.1,
            self.sprite.as_deref().unwrap_or("<missing>"),
        );
    }

    fn set_mirror_scale(&mut self, sx: f32, sy: f32) {
        self.mirror = (sx, sy);
    }
}

/// Console playback engine backed by a clip manifest.
struct ConsoleEngine {
    clips: FxHashMap<String, ClipSpec>,
    resolve_sprite: SpriteResolver<String>,
}

impl ConsoleEngine {
    fn new(manifest: Manifest, resolve_sprite: SpriteResolver<String>) -> Self {
        let clips = manifest
            .clips
            .into_iter()
            .map(|clip| (clip.name.clone(), clip))
            .collect();
        Self {
            clips,
            resolve_sprite,
        }
    }
}

impl PlaybackEngine for ConsoleEngine {
    fn instantiate(&mut self, template: &str) -> Option<Box<dyn EntityInstance>> {
        let clip = self.clips.get(template)?;
        if clip.duration_ms <= 0.0 {
            return None;
        }
        let sprite = (self.resolve_sprite)(&clip.sprite);
        Some(Box::new(ConsoleInstance {
            name: clip.name.clone(),
            duration_ms: clip.duration_ms,
            elapsed_ms: 0.0,
            mirror: (1.0, 1.0),
            sprite,
        }))
    }
}

/// Rignode console demo
#[derive(Parser)]
#[command(version, about = "Plays animation templates against a console engine")]
struct Cli {
    /// Clip manifest JSON (default: two built-in demo clips).
    #[arg(long, value_name = "PATH")]
    manifest: Option<PathBuf>,

    /// Template to play once, with a completion callback.
    #[arg(long, default_value = "wave")]
    template: String,

    /// Looping template to keep alive alongside the one-shot.
    #[arg(long, value_name = "NAME")]
    repeat: Option<String>,

    /// Simulated tick rate.
    #[arg(long, default_value_t = 60.0)]
    fps: f32,

    /// Seconds of simulated playback.
    #[arg(long, default_value_t = 3.0)]
    seconds: f32,

    /// Mirror horizontally before playing.
    #[arg(long)]
    flip_x: bool,

    /// Mirror vertically before playing.
    #[arg(long)]
    flip_y: bool,
}

fn load_manifest(path: Option<&PathBuf>) -> Result<Manifest, String> {
    let json = match path {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read manifest {}: {}", path.display(), e))?,
        None => DEFAULT_MANIFEST.to_string(),
    };
    serde_json::from_str(&json).map_err(|e| format!("Failed to parse manifest: {}", e))
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let manifest = match load_manifest(cli.manifest.as_ref()) {
        Ok(manifest) => manifest,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    // Register every sprite under its basename, the way hosts preload
    // frames into a cache, then resolve engine paths against it.
    let mut sprite_cache = FxHashMap::default();
    for clip in &manifest.clips {
        let basename = clip.sprite.rsplit('/').next().unwrap_or(&clip.sprite);
        sprite_cache.insert(basename.to_string(), clip.sprite.clone());
    }
    let engine = ConsoleEngine::new(manifest, resolver::by_basename(sprite_cache));

    let mut node = AnimationNode::new(Box::new(engine));
    node.on_activate();
    node.set_flipped_x(cli.flip_x);
    node.set_flipped_y(cli.flip_y);

    let mut looping = match cli.repeat.as_deref() {
        Some(name) => {
            let handle = node.play(name);
            if handle.is_none() {
                eprintln!("Unknown looping template '{name}'");
            }
            handle
        }
        None => None,
    };

    let one_shot = node.play_once_with(
        &cli.template,
        Box::new(|instance| {
            info!("One-shot completed at ratio {:.3}", instance.time_ratio());
        }),
    );
    if one_shot.is_none() {
        eprintln!("Unknown template '{}'", cli.template);
        std::process::exit(1);
    }

    let dt = 1.0 / cli.fps.max(1.0);
    let ticks = (cli.seconds.max(0.0) * cli.fps.max(1.0)) as u64;
    info!(
        "Playing '{}' for {} ticks at {} fps",
        cli.template, ticks, cli.fps
    );

    for tick in 0..ticks {
        node.update(dt);
        if looping.is_none() && node.live_count() == 0 {
            info!("All playbacks finished after {} ticks", tick + 1);
            break;
        }
    }

    node.delete_entity(&mut looping);
    info!("Done; {} playbacks still live", node.live_count());
}
