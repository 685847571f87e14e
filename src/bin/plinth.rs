use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};
use plinth::{
    BorderKeySegmenter, Falloff, KeepAlpha, ReflectionParameters, Rgba8, Segmenter,
    ShadowParameters, StudioRequest, StudioStyle,
};

#[derive(Parser, Debug)]
#[command(name = "plinth", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Place a subject on a studio floor with a shadow or reflection, written as a PNG.
    Compose(ComposeArgs),
    /// Remove a plain backdrop and write the transparent cut-out as a PNG.
    Cutout(CutoutArgs),
}

#[derive(Args, Debug)]
struct KeyArgs {
    /// Color distance (0-1) below which a pixel counts as backdrop.
    #[arg(long, default_value_t = BorderKeySegmenter::default().tolerance)]
    tolerance: f32,

    /// Width (0-1) of the soft edge above the tolerance.
    #[arg(long, default_value_t = BorderKeySegmenter::default().softness)]
    softness: f32,
}

impl KeyArgs {
    fn border_key(&self) -> BorderKeySegmenter {
        BorderKeySegmenter {
            tolerance: self.tolerance,
            softness: self.softness,
        }
    }
}

#[derive(Parser, Debug)]
struct ComposeArgs {
    /// Input photo or cut-out (PNG, JPEG, ...).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Request JSON; flags below override its values.
    #[arg(long)]
    params: Option<PathBuf>,

    /// Floor effect.
    #[arg(long, value_enum)]
    mode: Option<ModeChoice>,

    /// Shadow intensity or reflection opacity, 0-1.
    #[arg(long)]
    intensity: Option<f32>,

    /// Shadow width relative to the subject.
    #[arg(long)]
    spread: Option<f32>,

    /// Gaussian blur sigma in pixels.
    #[arg(long)]
    blur: Option<f32>,

    /// Vertical shift of the shadow contact line in pixels.
    #[arg(long, allow_hyphen_values = true)]
    offset: Option<i32>,

    /// Shadow height relative to the subject.
    #[arg(long)]
    squash: Option<f32>,

    /// Use a single shadow layer instead of occlusion + ambient.
    #[arg(long)]
    single_layer: bool,

    /// Reflection length relative to the subject height.
    #[arg(long)]
    length: Option<f32>,

    /// Reflection fade shape.
    #[arg(long, value_enum)]
    falloff: Option<FalloffChoice>,

    /// Pixels between subject and reflection.
    #[arg(long)]
    gap: Option<u32>,

    /// Minimum canvas size relative to the subject.
    #[arg(long)]
    canvas_scale: Option<f32>,

    /// Keep the full canvas instead of trimming to visible pixels.
    #[arg(long)]
    no_trim: bool,

    /// Backdrop color for the preview (`#RRGGBB` or `#RRGGBBAA`).
    #[arg(long)]
    backdrop: Option<Rgba8>,

    /// Also write a preview flattened over the backdrop (white unless `--backdrop` is set).
    #[arg(long)]
    preview: Option<PathBuf>,

    /// Key out a plain backdrop estimated from the image border.
    #[arg(long)]
    key_background: bool,

    #[command(flatten)]
    key: KeyArgs,
}

#[derive(Parser, Debug)]
struct CutoutArgs {
    /// Input photo.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    key: KeyArgs,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ModeChoice {
    Silhouette,
    Gradient,
    Reflection,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FalloffChoice {
    Linear,
    Quadratic,
}

impl From<FalloffChoice> for Falloff {
    fn from(value: FalloffChoice) -> Self {
        match value {
            FalloffChoice::Linear => Self::Linear,
            FalloffChoice::Quadratic => Self::Quadratic,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Compose(args) => cmd_compose(args),
        Command::Cutout(args) => cmd_cutout(args),
    }
}

fn cmd_compose(args: ComposeArgs) -> anyhow::Result<()> {
    let request = build_request(&args)?;

    let photo = plinth::load_image(&args.in_path)
        .with_context(|| format!("load input '{}'", args.in_path.display()))?;
    let segmenter: Box<dyn Segmenter> = if args.key_background {
        Box::new(args.key.border_key())
    } else {
        Box::new(KeepAlpha)
    };

    let out = plinth::compose_photo(&photo, segmenter.as_ref(), &request)?;
    tracing::info!(
        mode = request.style.name(),
        width = out.image.width(),
        height = out.image.height(),
        "composed"
    );

    plinth::save_png(&out.image, &args.out)
        .with_context(|| format!("write png '{}'", args.out.display()))?;
    eprintln!("wrote {}", args.out.display());

    if let (Some(path), Some(preview)) = (&args.preview, &out.preview) {
        plinth::save_png(preview, path)
            .with_context(|| format!("write preview '{}'", path.display()))?;
        eprintln!("wrote {}", path.display());
    }
    Ok(())
}

fn cmd_cutout(args: CutoutArgs) -> anyhow::Result<()> {
    let photo = plinth::load_image(&args.in_path)
        .with_context(|| format!("load input '{}'", args.in_path.display()))?;
    let cut = args.key.border_key().segment(&photo)?;
    if cut.alpha_bounds().is_none() {
        tracing::warn!("cut-out is fully transparent; try a lower --tolerance");
    }

    plinth::save_png(&cut, &args.out)
        .with_context(|| format!("write png '{}'", args.out.display()))?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn build_request(args: &ComposeArgs) -> anyhow::Result<StudioRequest> {
    let mut request = match &args.params {
        Some(path) => StudioRequest::from_path(path)?,
        None => StudioRequest::default(),
    };

    if let Some(mode) = args.mode {
        request.style = switch_mode(request.style, mode);
    }

    match &mut request.style {
        StudioStyle::Silhouette(p) | StudioStyle::Gradient(p) => apply_shadow_flags(p, args),
        StudioStyle::Reflection(p) => apply_reflection_flags(p, args),
    }

    if let Some(scale) = args.canvas_scale {
        request.canvas_scale = scale;
    }
    if args.no_trim {
        request.trim = false;
    }
    if args.backdrop.is_some() {
        request.backdrop = args.backdrop;
    }
    if args.preview.is_some() && request.backdrop.is_none() {
        request.backdrop = Some(Rgba8::WHITE);
    }
    Ok(request)
}

/// Keeps shadow parameters when moving between the two shadow modes.
fn switch_mode(style: StudioStyle, mode: ModeChoice) -> StudioStyle {
    let shadow = match style {
        StudioStyle::Silhouette(p) | StudioStyle::Gradient(p) => p,
        StudioStyle::Reflection(_) => ShadowParameters::default(),
    };
    match mode {
        ModeChoice::Silhouette => StudioStyle::Silhouette(shadow),
        ModeChoice::Gradient => StudioStyle::Gradient(shadow),
        ModeChoice::Reflection => match style {
            StudioStyle::Reflection(p) => StudioStyle::Reflection(p),
            _ => StudioStyle::Reflection(ReflectionParameters::default()),
        },
    }
}

fn apply_shadow_flags(p: &mut ShadowParameters, args: &ComposeArgs) {
    if let Some(v) = args.intensity {
        p.intensity = v;
    }
    if let Some(v) = args.spread {
        p.spread = v;
    }
    if let Some(v) = args.blur {
        p.blur_radius = v;
    }
    if let Some(v) = args.offset {
        p.vertical_offset = v;
    }
    if args.squash.is_some() {
        p.squash = args.squash;
    }
    if args.single_layer {
        p.dual_layer = false;
    }
    if args.length.is_some() || args.falloff.is_some() || args.gap.is_some() {
        tracing::warn!("--length, --falloff and --gap only apply to reflection mode");
    }
}

fn apply_reflection_flags(p: &mut ReflectionParameters, args: &ComposeArgs) {
    if let Some(v) = args.intensity {
        p.opacity = v;
    }
    if let Some(v) = args.blur {
        p.blur_radius = v;
    }
    if let Some(v) = args.length {
        p.length_fraction = v;
    }
    if let Some(v) = args.falloff {
        p.falloff = v.into();
    }
    if let Some(v) = args.gap {
        p.gap = v;
    }
    if args.spread.is_some() || args.offset.is_some() || args.squash.is_some() {
        tracing::warn!("--spread, --offset and --squash only apply to shadow modes");
    }
}
