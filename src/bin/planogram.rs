use clap::{Parser, Subcommand};
use log::{error, info};
use planogram_compliance::pipeline::{corner_correspondence, rectify};
use planogram_compliance::tools::{
    format_report, load_detections, load_layout, load_source_image, render_overlay,
    render_projected_layout, save_overlay, write_json_report, write_report,
};
use planogram_compliance::utils::raster::WorkingResolution;
use planogram_compliance::{MeasurementConfig, Result, measure};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "planogram", version, about = "Planogram compliance tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Score detections against a layout
    Measure {
        /// Layout document (JSON)
        layout: PathBuf,
        /// Detection document (JSON)
        detections: PathBuf,
        /// Source photograph, used as the overlay background
        image: Option<PathBuf>,
        /// Text report destination
        #[arg(long, default_value = "compliance.txt")]
        report: PathBuf,
        /// Optional JSON report destination
        #[arg(long)]
        json: Option<PathBuf>,
        /// Optional overlay image destination
        #[arg(long)]
        overlay: Option<PathBuf>,
        /// Optional image of the projected layout alone
        #[arg(long)]
        warped_layout: Option<PathBuf>,
        /// Settings file (JSON)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the estimated homography and its corner round-trip error
    Homography {
        /// Layout document (JSON)
        layout: PathBuf,
        /// Detection document (JSON)
        detections: PathBuf,
        /// Working width override
        #[arg(long)]
        max_width: Option<u32>,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let outcome = match cli.command {
        Command::Measure {
            layout,
            detections,
            image,
            report,
            json,
            overlay,
            warped_layout,
            config,
        } => measure_cmd(MeasureArgs {
            layout: &layout,
            detections: &detections,
            image: image.as_deref(),
            report: &report,
            json: json.as_deref(),
            overlay: overlay.as_deref(),
            warped_layout: warped_layout.as_deref(),
            config: config.as_deref(),
        }),
        Command::Homography {
            layout,
            detections,
            max_width,
        } => homography_cmd(&layout, &detections, max_width),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

struct MeasureArgs<'a> {
    layout: &'a Path,
    detections: &'a Path,
    image: Option<&'a Path>,
    report: &'a Path,
    json: Option<&'a Path>,
    overlay: Option<&'a Path>,
    warped_layout: Option<&'a Path>,
    config: Option<&'a Path>,
}

fn measure_cmd(args: MeasureArgs<'_>) -> Result<()> {
    let mut config = match args.config {
        Some(path) => MeasurementConfig::load(path)?,
        None => MeasurementConfig::default(),
    }
    .with_env_overrides();
    config.capture_masks |= args.overlay.is_some() || args.warped_layout.is_some();

    let layout = load_layout(args.layout)?;
    let detections = load_detections(args.detections)?;
    info!(
        "layout {}: {} shelves, {} items; detections {}: {} items",
        args.layout.display(),
        layout.shelves().len(),
        layout.item_count(),
        args.detections.display(),
        detections.items().len()
    );

    let start = Instant::now();
    let result = measure(&layout, &detections, &config)?;
    info!("measured in {:.1} ms", start.elapsed().as_secs_f64() * 1000.0);

    print!("{}", format_report(&result));
    write_report(args.report, &result)?;
    if let Some(path) = args.json {
        write_json_report(path, &result)?;
    }

    if let Some(path) = args.overlay {
        let source = args.image.map(load_source_image).transpose()?;
        if let Some(preview) = render_overlay(source.as_ref(), &result) {
            save_overlay(path, &preview)?;
            info!("overlay written to {}", path.display());
        }
    }
    if let (Some(path), Some(masks)) = (args.warped_layout, result.masks.as_ref()) {
        let preview = render_projected_layout(
            masks,
            result.resolution.width() as u32,
            result.resolution.height() as u32,
        );
        save_overlay(path, &preview)?;
    }
    Ok(())
}

fn homography_cmd(layout: &Path, detections: &Path, max_width: Option<u32>) -> Result<()> {
    let config = MeasurementConfig::default().with_env_overrides();
    let layout = load_layout(layout)?;
    let detections = load_detections(detections)?;
    let resolution = WorkingResolution::for_image(
        detections.image_width(),
        detections.image_height(),
        max_width.unwrap_or(config.max_working_width),
    )?;
    let correspondence = corner_correspondence(&layout, &detections, &resolution);
    let transform = rectify(&correspondence)?;

    println!(
        "working canvas: {}x{} (ratio {:.6})",
        resolution.width(),
        resolution.height(),
        resolution.ratio()
    );
    for row in transform.matrix() {
        println!("  [{:>14.6} {:>14.6} {:>14.6}]", row[0], row[1], row[2]);
    }
    for (i, (src, dst)) in correspondence
        .layout
        .iter()
        .zip(&correspondence.image)
        .enumerate()
    {
        match transform.transform(src) {
            Some(p) => println!(
                "  corner {}: ({:.1}, {:.1}) -> ({:.3}, {:.3}) error {:.2e}",
                i + 1,
                src.x,
                src.y,
                p.x,
                p.y,
                p.distance(dst)
            ),
            None => println!("  corner {}: maps to infinity", i + 1),
        }
    }
    Ok(())
}
