//! gearcut CLI - cut a spur gear and write its outline to a file.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use gearcut::float_types::{LengthUnit, Real};
use gearcut::io::{dxf::to_dxf, svg::to_svg, text::to_text};
use gearcut::{GearOutline, GearSpec, SamplingDensity, TipShape, generate};
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "gearcut")]
#[command(
    about = "Generate 2D spur gear profiles by simulating a rack cutter, with profile shifting and clearance",
    long_about = None
)]
struct Cli {
    /// Number of teeth
    #[arg(short = 'c', long, default_value_t = 20)]
    teeth_count: usize,
    /// Module (defines the size of the gear)
    #[arg(short, long, default_value_t = 2.0)]
    module: Real,
    /// Pressure angle in degrees
    #[arg(short, long, default_value_t = 20.0)]
    pressure_angle: Real,
    /// Circular backlash on the pitch circle
    #[arg(short, long, default_value_t = 0.1)]
    backlash: Real,
    /// Profile shift coefficient (x)
    #[arg(short = 'x', long, default_value_t = 0.0, allow_negative_numbers = true)]
    profile_shift: Real,
    /// Root clearance coefficient
    #[arg(long, default_value_t = 0.25)]
    clearance: Real,
    /// Addendum coefficient
    #[arg(long, default_value_t = 1.0)]
    addendum: Real,
    /// Dedendum coefficient (default: addendum + clearance)
    #[arg(long)]
    dedendum: Option<Real>,
    /// Rack tip fillet radius as a multiple of the module
    #[arg(long, default_value_t = 0.38)]
    tip_radius: Real,
    /// Tooth tip shape
    #[arg(long, value_enum, default_value_t = Tip::Rounded)]
    tip: Tip,
    /// Rack positions per pressure angle of blank rotation (at least 50)
    #[arg(short = 'n', long, default_value_t = SamplingDensity::MIN_ROLL_STEPS)]
    density: u32,
    /// Minimum envelope rays between a gap centre and the next tooth centre
    #[arg(long, default_value_t = SamplingDensity::default().min_rays_per_half_pitch)]
    rays: u32,
    /// Envelope rays per roll step
    #[arg(long, default_value_t = SamplingDensity::default().rays_per_roll_step)]
    rays_per_step: u32,
    /// Segments per rack tip fillet arc
    #[arg(long, default_value_t = SamplingDensity::default().fillet_segments)]
    fillet_segments: u32,
    /// Output file format
    #[arg(short = 't', long, value_enum, default_value_t = OutputType::Dxf)]
    output_type: OutputType,
    /// Output file name
    #[arg(short, long, default_value = "out")]
    output_path: PathBuf,
    /// Label the output as inches instead of millimetres (DXF only)
    #[arg(long)]
    inch: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Tip {
    Rounded,
    Flat,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputType {
    Dxf,
    Text,
    Svg,
}

impl Cli {
    fn spec(&self) -> GearSpec {
        let mut spec = GearSpec::new(self.module, self.teeth_count)
            .with_pressure_angle(self.pressure_angle)
            .with_backlash(self.backlash)
            .with_profile_shift(self.profile_shift)
            .with_clearance(self.clearance)
            .with_addendum_coefficient(self.addendum)
            .with_tip_radius_coefficient(self.tip_radius)
            .with_tip_shape(match self.tip {
                Tip::Rounded => TipShape::Rounded,
                Tip::Flat => TipShape::Flat,
            })
            .with_sampling(SamplingDensity {
                min_rays_per_half_pitch: self.rays,
                rays_per_roll_step: self.rays_per_step,
                fillet_segments: self.fillet_segments,
                ..SamplingDensity::new(self.density)
            });
        if let Some(dedendum) = self.dedendum {
            spec = spec.with_dedendum_coefficient(dedendum);
        }
        spec
    }

    fn render(&self, outline: &GearOutline) -> Result<Vec<u8>> {
        let unit = if self.inch {
            LengthUnit::Inches
        } else {
            LengthUnit::Millimeters
        };
        Ok(match self.output_type {
            OutputType::Dxf => to_dxf(outline, unit).context("DXF export failed")?,
            OutputType::Text => to_text(outline).into_bytes(),
            OutputType::Svg => to_svg(outline).into_bytes(),
        })
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("gearcut=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let spec = cli.spec();
    let gear = generate(&spec).context("gear generation failed")?;

    for warning in &gear.warnings {
        warn!("{warning}");
    }
    println!(
        "Generated gear with pitch radius = {:.3}",
        gear.geometry.pitch_radius
    );
    println!("{spec}");

    let bytes = cli.render(&gear.outline)?;
    fs::write(&cli.output_path, bytes)
        .with_context(|| format!("writing {}", cli.output_path.display()))?;
    info!(path = %cli.output_path.display(), points = gear.outline.len(), "outline written");

    Ok(())
}
