use std::path::PathBuf;

use clap::{ArgAction, Parser};
use sheet_nester::config::{GangConfig, GangGrouping, GangOrder, JobConfig};
use sheet_nester::render;
use sheet_nester::strategy::{Algorithm, BaseStrategy};
use sheet_nester::types::{AllocationResult, DemandItem, Margins, SheetSpec};
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "sheet_nester",
    about = "Packs rectangular print jobs onto fixed-size sheets"
)]
struct Cli {
    /// JSON job file; replaces the sheet, item and layout flags
    #[arg(long, conflicts_with_all = ["sheet", "items"])]
    job: Option<PathBuf>,

    /// Sheet dimensions (WxH, e.g. 1300x900)
    #[arg(long, required_unless_present = "job")]
    sheet: Option<String>,

    /// Print jobs as [id=]WxH:qty (e.g. flyer=210x297:40 90x50:200)
    #[arg(long = "items", num_args = 1.., required_unless_present = "job")]
    items: Vec<String>,

    /// Bleed added around every job
    #[arg(long, default_value_t = 0)]
    bleed: u32,

    /// Sheet margins as T,B,L,R or a single value for all sides
    #[arg(long, default_value = "0", value_parser = parse_margins)]
    margins: Margins,

    /// Placement heuristic: bottom-left-fill, shelf, max-rects, or gang
    #[arg(long, default_value = "bottom-left-fill")]
    algorithm: Algorithm,

    /// Strategy a gang run delegates to
    #[arg(long, default_value = "bottom-left-fill")]
    gang_base: BaseStrategy,

    /// Gang ordering: area-desc, height-desc, or input
    #[arg(long, default_value = "area-desc")]
    gang_order: GangOrder,

    /// Gang grouping key: id or group
    #[arg(long, default_value = "id")]
    gang_group_by: GangGrouping,

    /// Disable job rotation
    #[arg(long)]
    no_rotate: bool,

    /// Stop after this many sheets
    #[arg(long, default_value_t = sheet_nester::allocator::DEFAULT_MAX_SHEETS)]
    max_sheets: usize,

    /// Abort if packing takes longer than this
    #[arg(long)]
    time_limit_ms: Option<u64>,

    /// Show ASCII layout of each sheet
    #[arg(long)]
    layout: bool,

    /// Print the full result as JSON
    #[arg(long)]
    json: bool,

    /// More logging (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn parse_dimensions(s: &str) -> Result<SheetSpec, String> {
    let (w, h) = s
        .split_once('x')
        .ok_or_else(|| format!("invalid dimensions '{}', expected WxH", s))?;
    let width = w
        .parse::<u32>()
        .map_err(|_| format!("invalid width in '{}'", s))?;
    let height = h
        .parse::<u32>()
        .map_err(|_| format!("invalid height in '{}'", s))?;
    if width == 0 || height == 0 {
        return Err(format!("dimensions must be non-zero in '{}'", s));
    }
    Ok(SheetSpec::new(width, height))
}

fn parse_margins(s: &str) -> Result<Margins, String> {
    let values = s
        .split(',')
        .map(|v| {
            v.trim()
                .parse::<u32>()
                .map_err(|_| format!("invalid margin '{}' in '{}'", v, s))
        })
        .collect::<Result<Vec<_>, _>>()?;
    match values.as_slice() {
        [m] => Ok(Margins::uniform(*m)),
        [top, bottom, left, right] => Ok(Margins {
            top: *top,
            bottom: *bottom,
            left: *left,
            right: *right,
        }),
        _ => Err(format!("invalid margins '{}', expected T,B,L,R or one value", s)),
    }
}

fn parse_item(s: &str, index: usize, can_rotate: bool) -> Result<DemandItem, String> {
    let (id, rest) = match s.split_once('=') {
        Some((id, rest)) => (id.to_string(), rest),
        None => (format!("item-{}", index + 1), s),
    };
    let (dims, qty) = rest
        .split_once(':')
        .ok_or_else(|| format!("invalid item '{}', expected [id=]WxH:qty", s))?;
    let size = parse_dimensions(dims)?;
    let qty = qty
        .parse::<u32>()
        .map_err(|_| format!("invalid quantity in '{}'", s))?;
    if qty == 0 {
        return Err(format!("quantity must be non-zero in '{}'", s));
    }
    Ok(DemandItem::new(id, size.width, size.height, qty).rotatable(can_rotate))
}

fn job_from_flags(cli: &Cli) -> Result<JobConfig, String> {
    let sheet = parse_dimensions(cli.sheet.as_deref().unwrap_or_default())?;
    let items = cli
        .items
        .iter()
        .enumerate()
        .map(|(i, s)| parse_item(s, i, !cli.no_rotate))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(JobConfig {
        sheet,
        items,
        bleed: cli.bleed,
        margins: cli.margins,
        algorithm: cli.algorithm,
        rotate: None,
        gang: GangConfig {
            base: cli.gang_base,
            order: cli.gang_order,
            group_by: cli.gang_group_by,
        },
        max_sheets: cli.max_sheets,
        time_limit_ms: cli.time_limit_ms,
    })
}

fn load_job(cli: &Cli) -> Result<JobConfig, String> {
    let Some(path) = &cli.job else {
        return job_from_flags(cli);
    };
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
    let mut job =
        JobConfig::from_json(&text).map_err(|e| format!("invalid job {}: {}", path.display(), e))?;
    if cli.no_rotate {
        job.rotate = Some(false);
    }
    Ok(job)
}

fn print_report(job: &JobConfig, result: &AllocationResult, layout: bool) {
    for sheet in &result.sheets {
        println!(
            "Sheet {} ({}, {:.1}% used):",
            sheet.index, sheet.sheet, sheet.efficiency_percent
        );
        for p in &sheet.placements {
            let rot = if p.rotation.degrees() == 90 { " [rotated]" } else { "" };
            println!(
                "  {} {}x{} @ ({}, {}){}",
                p.item.id, p.actual_width, p.actual_height, p.x, p.y, rot
            );
        }
        if layout {
            print!("{}", render::render_sheet(job.sheet, &sheet.placements));
        }
        println!();
    }

    for u in &result.unplaced {
        println!(
            "Unplaced: {} {}x{} x{} ({})",
            u.id, u.width, u.height, u.remaining_quantity, u.reason
        );
    }

    println!(
        "Summary: {} sheet{} used, {:.1}% efficiency, {} unused area",
        result.sheet_count,
        if result.sheet_count == 1 { "" } else { "s" },
        result.efficiency_percent,
        result.unused_area,
    );
    if result.iteration_limit_reached {
        println!("Warning: stopped at the {} sheet limit", job.max_sheets);
    }
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(level)
        .init();

    let job = load_job(&cli).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    let result = job.allocator().pack(&job.demand()).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    if cli.json {
        match serde_json::to_string_pretty(&result) {
            Ok(s) => println!("{}", s),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        print_report(&job, &result, cli.layout);
    }
}
