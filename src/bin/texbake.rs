use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use texbake::{
    BakePreferences, Baker, BitDepth, CancelToken, CompressionHint, CpuShaderRenderer,
    FsAssetStore, FsByteSink, ImageFormat, Material, OutputKind, read_record_header,
    texture_name_for_source,
};

#[derive(Parser, Debug)]
#[command(name = "texbake", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Bake a material JSON into a texture asset or an image file.
    Bake(BakeArgs),
    /// Print the header of a `.texasset` file.
    Inspect(InspectArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputArg {
    Asset,
    Png,
    Exr,
    Tga,
    Tiff,
}

impl From<OutputArg> for OutputKind {
    fn from(arg: OutputArg) -> Self {
        match arg {
            OutputArg::Asset => Self::Asset,
            OutputArg::Png => Self::EncodedFile(ImageFormat::Png),
            OutputArg::Exr => Self::EncodedFile(ImageFormat::Exr),
            OutputArg::Tga => Self::EncodedFile(ImageFormat::Tga),
            OutputArg::Tiff => Self::EncodedFile(ImageFormat::Tiff),
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DepthArg {
    #[value(name = "8")]
    Eight,
    #[value(name = "16")]
    Sixteen,
}

impl From<DepthArg> for BitDepth {
    fn from(arg: DepthArg) -> Self {
        match arg {
            DepthArg::Eight => Self::Int8,
            DepthArg::Sixteen => Self::Float16,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CompressionArg {
    Default,
    Normalmap,
    Grayscale,
    Hdr,
    Masks,
    Alpha,
}

impl From<CompressionArg> for CompressionHint {
    fn from(arg: CompressionArg) -> Self {
        match arg {
            CompressionArg::Default => Self::Default,
            CompressionArg::Normalmap => Self::Normalmap,
            CompressionArg::Grayscale => Self::Grayscale,
            CompressionArg::Hdr => Self::Hdr,
            CompressionArg::Masks => Self::Masks,
            CompressionArg::Alpha => Self::Alpha,
        }
    }
}

#[derive(Parser, Debug)]
struct BakeArgs {
    /// Material JSON.
    #[arg(long)]
    material: PathBuf,

    /// Output kind. Defaults to the remembered choice.
    #[arg(long, value_enum)]
    output: Option<OutputArg>,

    /// Square edge length in pixels.
    #[arg(long)]
    resolution: Option<u32>,

    /// Bits per channel. File formats pick their required depth when omitted.
    #[arg(long, value_enum)]
    bit_depth: Option<DepthArg>,

    /// Compression hint for asset output.
    #[arg(long, value_enum)]
    compression: Option<CompressionArg>,

    /// Output name. Derived from the material name when omitted (`M_Rock` -> `T_Rock`).
    #[arg(long)]
    name: Option<String>,

    /// Package path for assets, directory for files (files default to the current directory).
    #[arg(long)]
    path: Option<String>,

    /// Directory backing the `/Game` asset root.
    #[arg(long, default_value = "Content")]
    content_dir: PathBuf,

    /// Preferences JSON holding the last-used choices.
    #[arg(long)]
    prefs: Option<PathBuf>,

    /// Store this bake's choices in `--prefs` after a successful bake.
    #[arg(long, default_value_t = false)]
    remember: bool,
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// `.texasset` file.
    file: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Bake(args) => cmd_bake(args),
        Command::Inspect(args) => cmd_inspect(args),
    }
}

fn cmd_bake(args: BakeArgs) -> anyhow::Result<()> {
    let mut prefs = match &args.prefs {
        Some(path) => BakePreferences::load_or_default(path)?,
        None => BakePreferences::default(),
    };
    let material = Material::from_path(&args.material)
        .with_context(|| format!("load material '{}'", args.material.display()))?;

    let name = args
        .name
        .clone()
        .unwrap_or_else(|| texture_name_for_source(&material.name));
    let mut config = prefs.to_config(name).with_source(&material);

    if let Some(output) = args.output {
        config.output = output.into();
    }
    if let Some(resolution) = args.resolution {
        config.resolution = resolution;
    }
    if let Some(compression) = args.compression {
        config.compression = compression.into();
    }
    match (args.bit_depth, config.output) {
        (Some(depth), _) => config.bit_depth = depth.into(),
        (None, OutputKind::EncodedFile(format)) => {
            if let Some(depth) = BitDepth::preferred_for(format) {
                config.bit_depth = depth;
            }
        }
        (None, OutputKind::Asset) => {}
    }
    match (&args.path, config.output) {
        (Some(path), _) => config.destination_path = path.clone(),
        (None, OutputKind::EncodedFile(_)) => config.destination_path = ".".to_string(),
        (None, OutputKind::Asset) => {}
    }

    let mut baker = Baker::new(
        CpuShaderRenderer::new(),
        FsAssetStore::new(&args.content_dir),
        FsByteSink,
    );
    let mut progress = CancelToken::new();
    match baker.execute_bake(&config, &mut progress) {
        Ok(output) => println!("{}", output.message()),
        Err(err) => {
            eprintln!("{}", err.user_message());
            return Err(err.into());
        }
    }

    if args.remember
        && let Some(path) = &args.prefs
    {
        prefs.remember(&config);
        prefs
            .save(path)
            .with_context(|| format!("save preferences '{}'", path.display()))?;
    }
    Ok(())
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let header = read_record_header(&args.file)?;
    println!(
        "{}",
        serde_json::to_string_pretty(&header).context("format texasset header")?
    );
    Ok(())
}
