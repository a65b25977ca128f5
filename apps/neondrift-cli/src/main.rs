use clap::{Parser, Subcommand};
use neondrift_common::Viewport;
use neondrift_render::shading::{grid_color, grid_mask, linear_to_srgb};
use neondrift_render::PassChain;
use neondrift_scene::{Scene, TerrainParams, SCROLL_SPEED, TILE_LENGTH};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "neondrift-cli", about = "CLI for drifting landscape operations")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Step the scroller frame by frame and check it against the closed form
    Drift {
        /// Session length in seconds
        #[arg(short, long, default_value = "10.0")]
        seconds: f64,
        /// Frames advanced per second
        #[arg(short, long, default_value = "60")]
        fps: u32,
    },
    /// Print the pass chain sized for a viewport
    Chain {
        #[arg(long, default_value = "1280")]
        width: u32,
        #[arg(long, default_value = "720")]
        height: u32,
        /// Device pixel ratio before clamping
        #[arg(short, long, default_value = "1.0")]
        density: f32,
    },
    /// Evaluate the anti-aliased grid at one UV sample
    Probe {
        /// U coordinate of the sample
        u: f32,
        /// V coordinate of the sample
        v: f32,
        /// UV footprint of one pixel at the sample
        #[arg(long, default_value = "0.002")]
        footprint: f32,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("neondrift-cli v{}", env!("CARGO_PKG_VERSION"));
            let scene = Scene::new(Viewport::default());
            println!(
                "scene: mount={:?}, scroll={SCROLL_SPEED} units/s, tile length={TILE_LENGTH}",
                scene.mount()
            );
            println!("render: {}", neondrift_render::crate_info());
            println!("assets: {}", neondrift_assets::crate_info());
        }
        Commands::Drift { seconds, fps } => {
            println!("Drift session: {seconds} s at {fps} fps");

            let mut scene = Scene::new(Viewport::default());
            scene.initialize()?;

            let dt = 1.0 / f64::from(fps);
            let frames = (seconds * f64::from(fps)).round() as u64;
            let mut state = scene.advance(0.0)?;
            for _ in 0..frames {
                state = scene.advance(dt)?;
            }

            let [a, b] = state.tiles;
            println!("Elapsed: {:.3} s over {frames} frames", state.elapsed);
            println!("Tile A: z={:+.4}", a.z_offset);
            println!("Tile B: z={:+.4}", b.z_offset);

            let expected = (state.elapsed * SCROLL_SPEED) % TILE_LENGTH;
            let ok =
                b.z_offset == a.z_offset - TILE_LENGTH && (a.z_offset - expected).abs() < 1e-9;
            println!("Match: {}", if ok { "OK" } else { "MISMATCH" });

            scene.dispose();
        }
        Commands::Chain {
            width,
            height,
            density,
        } => {
            let viewport = Viewport::new(width, height, density);
            let chain = PassChain::new(viewport);
            println!(
                "Pass chain for {width}x{height} at density {density} (clamped {})",
                viewport.clamped_density()
            );
            for pass in chain.passes() {
                let uniforms = chain.uniform_block(pass.kind);
                if uniforms.is_empty() {
                    println!(
                        "{:>15}: {}x{}",
                        pass.kind.name(),
                        pass.extent[0],
                        pass.extent[1]
                    );
                } else {
                    let rendered: Vec<String> =
                        uniforms.iter().map(|(k, v)| format!("{k}={v}")).collect();
                    println!(
                        "{:>15}: {}x{}  [{}]",
                        pass.kind.name(),
                        pass.extent[0],
                        pass.extent[1],
                        rendered.join(", ")
                    );
                }
            }
            let bloom = chain.bloom_extent();
            println!("{:>15}: {}x{}", "bloom blur", bloom[0], bloom[1]);
        }
        Commands::Probe { u, v, footprint } => {
            let params = TerrainParams::default();
            let mask = grid_mask(u, v, footprint, footprint, params.grid_frequency);
            let [r, g, b] = grid_color(mask);
            println!("Grid at ({u}, {v}), footprint {footprint}:");
            println!("  mask    = {mask:.4}");
            println!("  linear  = ({r:.4}, {g:.4}, {b:.4})");
            println!(
                "  display = ({:.4}, {:.4}, {:.4})",
                linear_to_srgb(r),
                linear_to_srgb(g),
                linear_to_srgb(b)
            );
        }
    }

    Ok(())
}
