//! geodata CLI - Inspect scene documents and extract mesh snapshots.

use geodata::prelude::*;
use std::env;
use std::process;

use tracing_subscriber::EnvFilter;

/// Environment variable overriding the log filter.
const LOG_ENV: &str = "GEODATA_LOG";

fn main() {
    let args: Vec<String> = env::args().collect();
    let prog = args.first().map(String::as_str).unwrap_or("geodata");

    // Parse global flags
    let mut level = "info";
    let mut filtered_args: Vec<&str> = Vec::new();
    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "-v" | "--verbose" => level = "debug",
            "-vv" | "--trace" => level = "trace",
            "-q" | "--quiet" => level = "error",
            _ => filtered_args.push(arg),
        }
    }
    init_tracing(level);

    if filtered_args.is_empty() {
        print_usage(prog);
        return;
    }

    let config = ReaderConfig::from_env();
    let rest = &filtered_args[1..];
    match filtered_args[0] {
        "tree" | "t" => {
            let [file] = rest else {
                usage_error(&format!("{} tree <scene.json>", prog));
            };
            cmd_tree(file, &config);
        }
        "uvsets" | "u" => {
            let [file, path] = rest else {
                usage_error(&format!("{} uvsets <scene.json> <prim>", prog));
            };
            cmd_uvsets(file, path, &config);
        }
        "extract" | "x" => {
            let [file, path, opts @ ..] = rest else {
                usage_error(&format!("{} extract <scene.json> <prim> [options]", prog));
            };
            let opts = parse_extract_options(opts);
            cmd_extract(file, path, &opts, &config);
        }
        "extract-all" | "xa" => {
            let [file, opts @ ..] = rest else {
                usage_error(&format!("{} extract-all <scene.json> [options]", prog));
            };
            let opts = parse_extract_options(opts);
            cmd_extract_all(file, &opts, &config);
        }
        "version" | "-V" | "--version" => print_version(),
        "help" | "h" | "-h" | "--help" => print_usage(prog),
        other => {
            eprintln!("Unknown command: {}", other);
            print_usage(prog);
            process::exit(1);
        }
    }
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print_version() {
    println!("{}", geodata::version_string());
}

fn print_usage(prog: &str) {
    println!("geodata - Extract flattened meshes from scene documents");
    println!();
    println!("Usage: {} [options] <command> <scene.json> ...", prog);
    println!();
    println!("Commands:");
    println!("  t, tree <scene>                List meshes passing the path filter");
    println!("  u, uvsets <scene> <prim>       List UV sets on a prim");
    println!("  x, extract <scene> <prim>      Extract one mesh");
    println!("  xa, extract-all <scene>        Extract every eligible mesh");
    println!("  version                        Show version");
    println!("  h, help                        Show this help");
    println!();
    println!("Extract options:");
    println!("  --uv NAME       UV set to resolve");
    println!("  --frames LIST   Comma-separated frames (default: 1)");
    println!("  --center REF    Bake relative to prim REF");
    println!("  --json          Print the snapshot as JSON");
    println!();
    println!("Options:");
    println!("  -v, --verbose  Debug output");
    println!("  -vv, --trace   Trace output (very verbose)");
    println!("  -q, --quiet    Errors only");
    println!();
    println!("Environment:");
    println!("  {}  Tracing filter (overrides -v/-q)", LOG_ENV);
    println!("  {}", geodata::filter::REQUIRE_PATH_SUBSTR_ENV);
    println!("  {}", geodata::filter::IGNORE_PATH_SUBSTR_ENV);
    println!("  {}", geodata::config::READ_FLOAT2_AS_UV_ENV);
}

fn usage_error(usage: &str) -> ! {
    eprintln!("Usage: {}", usage);
    process::exit(1);
}

struct ExtractOptions {
    request: ExtractRequest,
    json: bool,
}

fn parse_extract_options(args: &[&str]) -> ExtractOptions {
    let mut request = ExtractRequest::new([1]);
    let mut json = false;
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match *arg {
            "--uv" => request.uv_set = expect_value(arg, iter.next()).to_string(),
            "--frames" => request.frames = parse_frames(expect_value(arg, iter.next())),
            "--center" => request = request.centered_on(expect_value(arg, iter.next())),
            "--json" => json = true,
            other => {
                eprintln!("Unknown option: {}", other);
                process::exit(1);
            }
        }
    }
    ExtractOptions { request, json }
}

fn expect_value<'a>(flag: &str, value: Option<&&'a str>) -> &'a str {
    match value {
        Some(v) => v,
        None => {
            eprintln!("{} needs a value", flag);
            process::exit(1);
        }
    }
}

fn parse_frames(list: &str) -> Vec<i32> {
    list.split(',')
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.trim().parse().unwrap_or_else(|_| {
                eprintln!("Invalid frame: {}", s);
                process::exit(1);
            })
        })
        .collect()
}

fn open_stage(file: &str) -> MemoryStage {
    match MemoryStage::load(file) {
        Ok(stage) => {
            tracing::debug!("opened {} ({} prims)", file, stage.len());
            stage
        }
        Err(e) => {
            eprintln!("Failed to open {}: {}", file, e);
            process::exit(1);
        }
    }
}

fn cmd_tree(file: &str, config: &ReaderConfig) {
    let stage = open_stage(file);
    for path in eligible_meshes(&stage, geodata::stage::ROOT, &config.path_filter) {
        println!("{}", path);
    }
}

fn cmd_uvsets(file: &str, path: &str, config: &ReaderConfig) {
    let stage = open_stage(file);
    if !stage.exists(path) {
        eprintln!("No prim at {}", path);
        process::exit(1);
    }
    let catalog = discover_uv_sets(&stage, path, config);
    for name in catalog.ambiguous() {
        tracing::warn!("uv set {} is defined {} times on {}", name, catalog.count(name), path);
    }
    for (name, count) in catalog.iter() {
        println!("{}\t{}", name, count);
    }
}

fn cmd_extract(file: &str, path: &str, opts: &ExtractOptions, config: &ReaderConfig) {
    let stage = open_stage(file);
    let mut log = Vec::new();
    let extraction = MeshExtractor::new(&stage, config).extract(path, &opts.request, &mut log);
    if opts.json {
        print_json(extraction.snapshot());
    } else {
        print_summary(path, &extraction);
    }
    for line in &log {
        eprintln!("{}", line);
    }
    if !extraction.is_valid() {
        process::exit(2);
    }
}

fn cmd_extract_all(file: &str, opts: &ExtractOptions, config: &ReaderConfig) {
    let stage = open_stage(file);
    let paths = eligible_meshes(&stage, geodata::stage::ROOT, &config.path_filter);
    let results = extract_all(&stage, &paths, &opts.request, config);

    let mut failed = 0;
    for r in &results {
        if opts.json {
            print_json(r.extraction.snapshot());
        } else {
            print_summary(&r.path, &r.extraction);
        }
        for line in &r.log {
            eprintln!("{}", line);
        }
        if !r.extraction.is_valid() {
            failed += 1;
        }
    }
    tracing::info!("{} meshes, {} failed", results.len(), failed);
}

fn print_json(snapshot: &MeshSnapshot) {
    match serde_json::to_string_pretty(snapshot) {
        Ok(s) => println!("{}", s),
        Err(e) => {
            eprintln!("Failed to serialize snapshot: {}", e);
            process::exit(1);
        }
    }
}

fn print_summary(path: &str, extraction: &Extraction) {
    let s = extraction.snapshot();
    let status = match extraction {
        Extraction::Complete(_) => "complete",
        Extraction::Partial { .. } => "partial",
    };
    println!("{} ({})", path, status);
    println!("  Faces:          {}", s.num_faces());
    println!("  Face vertices:  {}", s.vertex_indices().len());
    for frame in s.frames() {
        println!("  Frame {:<6}    {} vertices", frame, s.num_vertices(frame));
    }
    if s.has_uvs() {
        println!("  UVs:            {} ({} indices)", s.uvs().len() / 2, s.uv_indices().len());
    }
    if s.has_normals() {
        println!("  Normals:        {}", s.normals().len() / 3);
    }
    if s.is_subdiv_mesh() {
        println!(
            "  Subdivision:    {} (boundary {}, fvar {}, corner {})",
            s.subdivision_scheme(),
            s.interpolate_boundary(),
            s.face_varying_linear_interpolation(),
            s.propagate_corner()
        );
        println!(
            "  Creases:        {} edges, {} corners, {} holes",
            s.crease_lengths().len(),
            s.corner_indices().len(),
            s.hole_indices().len()
        );
    }
    if let Some(err) = extraction.error() {
        println!("  Stopped:        {}", err);
    }
}
