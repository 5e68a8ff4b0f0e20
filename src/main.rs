#![forbid(unsafe_code)]

mod assets;
mod config;
mod open_air;

use std::error::Error;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use hashbrown::{HashMap, HashSet};
use quarry_chunk::{Chunk, Detached, LIGHT_SUN, LightBank, NodeContainer};
use quarry_content::{ContentClassifier, ContentId, ContentRegistry, TextureCatalog};
use quarry_geom::V3i;
use quarry_io::{SER_VERSION_HIGHEST, deserialize_chunk, serialize_chunk};
use quarry_lighting::{SunlightOptions, propagate_sunlight};
use quarry_mesh_cpu::{MeshSlot, rebuild_chunk_mesh};

use config::QuarryConfig;
use open_air::OpenAir;

#[derive(Parser, Debug)]
#[command(name = "quarry", version, about = "Inspect, relight, mesh and convert stored chunks")]
struct Cli {
    /// Settings file; missing means defaults.
    #[arg(long, default_value = "quarry.toml")]
    config: PathBuf,

    /// Directory holding assets/content.toml and assets/textures.toml.
    #[arg(long)]
    assets: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print flags, a content histogram and day light statistics.
    Inspect {
        #[command(flatten)]
        src: ChunkSource,
    },
    /// Recompute sunlight and write the chunk back out.
    Relight {
        #[command(flatten)]
        src: ChunkSource,
        #[arg(long)]
        out: PathBuf,
        /// Let sunlit soil under air grow.
        #[arg(long)]
        grow_grass: bool,
        /// Treat the chunk as having no neighbours at all.
        #[arg(long)]
        isolated: bool,
    },
    /// Build the chunk mesh and report its batches.
    Mesh {
        #[command(flatten)]
        src: ChunkSource,
        /// Recompute sunlight before meshing.
        #[arg(long)]
        relight: bool,
        /// Treat the chunk as having no neighbours; border faces are skipped.
        #[arg(long)]
        isolated: bool,
        #[arg(long)]
        new_style_water: bool,
        #[arg(long)]
        new_style_leaves: bool,
        /// 0 = night, 1000 = day.
        #[arg(long)]
        daynight_ratio: Option<u32>,
    },
    /// Rewrite a chunk from one format version to another.
    Convert {
        input: PathBuf,
        output: PathBuf,
        #[arg(long)]
        from: u8,
        #[arg(long, default_value_t = SER_VERSION_HIGHEST)]
        to: u8,
    },
}

#[derive(Args, Debug)]
struct ChunkSource {
    file: PathBuf,
    /// Format version the file was written with.
    #[arg(long, default_value_t = SER_VERSION_HIGHEST)]
    version: u8,
    /// Chunk position as x,y,z.
    #[arg(long, value_parser = parse_v3i, default_value = "0,0,0")]
    pos: V3i,
}

fn parse_v3i(s: &str) -> Result<V3i, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(format!("expected x,y,z, got {s:?}"));
    }
    let mut v = [0i32; 3];
    for (dst, part) in v.iter_mut().zip(&parts) {
        *dst = part
            .parse()
            .map_err(|e| format!("bad coordinate {part:?}: {e}"))?;
    }
    Ok(V3i::new(v[0], v[1], v[2]))
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let cfg = QuarryConfig::load(&cli.config)?;
    let assets_root = assets::resolve_assets_root(cli.assets.clone());
    let content_path = cfg
        .assets
        .content
        .as_ref()
        .map(|p| assets_root.join(p))
        .unwrap_or_else(|| assets::content_path(&assets_root));
    log::info!("loading content from {}", content_path.display());
    let registry = ContentRegistry::load_from_path(&content_path)?;

    match cli.command {
        Command::Inspect { src } => {
            let chunk = load_chunk(&src.file, src.version, src.pos, &registry)?;
            inspect(&chunk, &registry);
        }
        Command::Relight {
            src,
            out,
            grow_grass,
            isolated,
        } => {
            let mut chunk = load_chunk(&src.file, src.version, src.pos, &registry)?;
            let opts = SunlightOptions {
                remove_light: true,
                grow_grass,
            };
            relight(&mut chunk, parent_for(isolated), &registry, opts)?;
            save_chunk(&out, &chunk, src.version)?;
            log::info!("wrote relit chunk to {}", out.display());
        }
        Command::Mesh {
            src,
            relight: do_relight,
            isolated,
            new_style_water,
            new_style_leaves,
            daynight_ratio,
        } => {
            let textures_path = cfg
                .assets
                .textures
                .as_ref()
                .map(|p| assets_root.join(p))
                .unwrap_or_else(|| assets::textures_path(&assets_root));
            let textures = TextureCatalog::load_from_path(&textures_path)?;

            let mut options = cfg.mesh_options();
            options.new_style_water |= new_style_water;
            options.new_style_leaves |= new_style_leaves;
            if let Some(r) = daynight_ratio {
                options.daynight_ratio = r.min(1000);
            }

            let mut chunk = load_chunk(&src.file, src.version, src.pos, &registry)?;
            let parent = parent_for(isolated);
            if do_relight {
                relight(&mut chunk, parent, &registry, SunlightOptions::default())?;
            }
            let slot = MeshSlot::new();
            rebuild_chunk_mesh(&chunk, parent, &registry, &textures, &options, &slot);
            match slot.current() {
                Some(mesh) => {
                    println!(
                        "mesh at {:?}: {} batches, {} quads, {} vertices",
                        mesh.pos,
                        mesh.batches.len(),
                        mesh.quad_count(),
                        mesh.vertex_count()
                    );
                    println!("  bounds {:?}", mesh.bbox);
                    for b in &mesh.batches {
                        println!(
                            "  {:?} {:?} culling={} quads={}",
                            b.material.atlas,
                            b.material.kind,
                            b.material.backface_culling,
                            b.build.quad_count()
                        );
                    }
                }
                None => println!("mesh at {:?}: nothing visible", chunk.pos()),
            }
        }
        Command::Convert {
            input,
            output,
            from,
            to,
        } => {
            let chunk = load_chunk(&input, from, V3i::ZERO, &registry)?;
            save_chunk(&output, &chunk, to)?;
            log::info!(
                "converted {} (v{}) to {} (v{})",
                input.display(),
                from,
                output.display(),
                to
            );
        }
    }
    Ok(())
}

fn parent_for(isolated: bool) -> &'static dyn NodeContainer {
    if isolated { &Detached } else { &OpenAir }
}

fn load_chunk(
    path: &Path,
    version: u8,
    pos: V3i,
    classifier: &dyn ContentClassifier,
) -> Result<Chunk, Box<dyn Error>> {
    let mut input = BufReader::new(File::open(path)?);
    let mut chunk = Chunk::dummy(pos);
    deserialize_chunk(&mut chunk, version, &mut input, classifier)?;
    let trailing = input.fill_buf()?.len();
    if trailing > 0 {
        log::warn!(
            "{}: {} bytes left after the chunk data",
            path.display(),
            trailing
        );
    }
    log::debug!("loaded {} as v{}", path.display(), version);
    Ok(chunk)
}

fn save_chunk(path: &Path, chunk: &Chunk, version: u8) -> Result<(), Box<dyn Error>> {
    let mut out = BufWriter::new(File::create(path)?);
    serialize_chunk(chunk, version, &mut out)?;
    out.flush()?;
    Ok(())
}

fn relight(
    chunk: &mut Chunk,
    parent: &dyn NodeContainer,
    registry: &ContentRegistry,
    opts: SunlightOptions,
) -> Result<(), Box<dyn Error>> {
    let mut sources = HashSet::new();
    let report = propagate_sunlight(chunk, parent, registry, opts, &mut sources)?;
    chunk.update_day_night_diff(registry);
    log::info!(
        "relit chunk {:?}: {} light sources, below_valid={}",
        chunk.pos(),
        sources.len(),
        report.chunk_below_valid
    );
    Ok(())
}

fn inspect(chunk: &Chunk, registry: &ContentRegistry) {
    println!("chunk {:?}", chunk.pos());
    println!(
        "  underground={} day_night_differs={} lighting_expired={} changed={}",
        chunk.is_underground, chunk.day_night_differs, chunk.lighting_expired, chunk.changed
    );
    let Some(nodes) = chunk.nodes() else {
        println!("  (no node storage)");
        return;
    };

    let mut counts: HashMap<ContentId, usize> = HashMap::new();
    let (mut sunlit, mut dark) = (0usize, 0usize);
    for n in nodes {
        *counts.entry(n.content).or_default() += 1;
        match n.light(LightBank::Day, registry) {
            LIGHT_SUN => sunlit += 1,
            0 => dark += 1,
            _ => {}
        }
    }
    let mut counts: Vec<(ContentId, usize)> = counts.into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    for (id, count) in counts {
        println!("  {:>5} {} ({})", count, registry.features(id).name, id);
    }
    println!(
        "  day light: {} sunlit, {} dark, {} partial",
        sunlit,
        dark,
        nodes.len() - sunlit - dark
    );
}
