use std::{fs, path::PathBuf};

use anyhow::{bail, Context};
use clap::Parser;
use glam::IVec2;
use rand::Rng;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};
use world::{Align, PixelPos, Position, Realm, RealmSpec, Size};

#[derive(Parser, Debug)]
#[command(about = "Generate a dungeon realm and print its regions")]
struct Args {
    #[arg(long, help = "Realm seed, random if not given")]
    seed: Option<u64>,

    #[arg(long, help = "IDM file with realm settings")]
    settings: Option<PathBuf>,

    #[arg(long, value_name = "WxH", help = "Realm size in regions")]
    realm: Option<Size>,

    #[arg(long, value_name = "WxH", help = "Region size in cells")]
    region: Option<Size>,

    #[arg(
        long,
        value_name = "X,Y",
        help = "Print the map of a region, can be repeated"
    )]
    region_at: Vec<Position>,

    #[arg(long, help = "Spawn entities and the player after generating")]
    spawn: bool,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

fn load_spec(args: &Args) -> anyhow::Result<RealmSpec> {
    let mut spec: RealmSpec = match &args.settings {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            idm::from_str(&text)
                .with_context(|| format!("parsing {}", path.display()))?
        }
        None => Default::default(),
    };

    spec.seed = args.seed.unwrap_or_else(|| rand::thread_rng().gen());
    if let Some(size) = args.realm {
        spec.realm_size = size;
    }
    if let Some(size) = args.region {
        spec.region_size = size;
    }
    Ok(spec)
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let args = Args::parse();

    let spec = load_spec(&args)?;
    log::info!("seed: {}", spec.seed);

    let mut realm = Realm::new(&spec).context("invalid realm settings")?;
    if let Err(e) = realm.generate_map() {
        log::error!("some regions failed to generate: {e}");
    }

    for (coord, region) in realm.regions() {
        println!("{coord}\t{}", region.name);
    }

    if args.spawn {
        let n = realm.build_world();
        println!("{n} entities spawned");

        let start = realm
            .region(Position::default())
            .context("realm has no regions")?;
        let pixel = start.pixel_position(
            Position::from(IVec2::from(start.size()) / 2),
            Align::Center,
        );
        let player = realm
            .spawn_player(pixel)
            .context("no room for the player")?;

        let at = realm
            .ecs
            .get::<&PixelPos>(player)
            .context("player has no position")?
            .0;
        let woken = realm.wake_room_at(at)?;
        if let Some(coord) = realm.owning_region(player) {
            println!("player at {at} in region {coord}, {woken} monsters woke");
        }
    }

    for &coord in &args.region_at {
        let Some(region) = realm.region(coord) else {
            bail!("no region at {coord}, realm is {}", realm.size());
        };
        println!("\n{}", region.name);
        print!("{}", region.to_ascii());
    }

    Ok(())
}
