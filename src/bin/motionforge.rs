use std::{
    fs,
    path::PathBuf,
    str::FromStr as _,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use motionforge::{
    Format, GenerateRequest, ShareableState, SpringConfig, generate, parse_keyframes,
};

#[derive(Parser, Debug)]
#[command(name = "motionforge", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Lower a state document into one output format.
    Export(ExportArgs),
    /// Ingest stylesheet keyframes into an IR document.
    Import(ImportArgs),
    /// Dump solved spring samples as JSON.
    Spring(SpringArgs),
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Input state JSON (as produced by the editor or `import`).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output format: stylesheet-keyframes, motion-descriptor, utility-theme,
    /// component-wrapper, timeline-script or vector-interchange (ecosystem
    /// shorthands like `css` and `lottie` are accepted).
    #[arg(long)]
    format: String,

    /// Output path; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Wrap this named component instead of a generic placeholder
    /// (component-wrapper format only).
    #[arg(long)]
    component: Option<String>,
}

#[derive(Parser, Debug)]
struct ImportArgs {
    /// Input stylesheet text.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output IR JSON path; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct SpringArgs {
    #[arg(long, default_value_t = 1.0)]
    mass: f64,

    #[arg(long, default_value_t = 100.0)]
    stiffness: f64,

    #[arg(long, default_value_t = 10.0)]
    damping: f64,

    #[arg(long, default_value_t = 0.0)]
    velocity: f64,

    /// Sample count (produces steps + 1 points).
    #[arg(long, default_value_t = 60)]
    steps: usize,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Export(args) => export(args),
        Command::Import(args) => import(args),
        Command::Spring(args) => spring_samples(args),
    }
}

fn export(args: ExportArgs) -> anyhow::Result<()> {
    let format = Format::from_str(&args.format)?;
    let text = fs::read_to_string(&args.in_path)
        .with_context(|| format!("reading {}", args.in_path.display()))?;
    let state: ShareableState = serde_json::from_str(&text)
        .with_context(|| format!("parsing state document {}", args.in_path.display()))?;

    let mut request = GenerateRequest::new(&state.config)
        .with_spring(&state.spring)
        .easing_mode(state.easing_mode);
    let mut rng = rand::thread_rng();
    if state.sequencer.enabled {
        request = request.with_sequencer(&state.sequencer, &mut rng);
    }
    if state.path.enabled {
        request = request.with_path(&state.path);
    }
    if let Some(component) = args.component.as_deref() {
        request = request.component_ref(component);
    }

    let output = generate(format, &request)?;
    write_output(args.out.as_deref(), &output)
}

fn import(args: ImportArgs) -> anyhow::Result<()> {
    let text = fs::read_to_string(&args.in_path)
        .with_context(|| format!("reading {}", args.in_path.display()))?;
    let keyframes = parse_keyframes(&text)?;

    let state = ShareableState {
        config: motionforge::AnimationConfig {
            keyframes,
            ..motionforge::AnimationConfig::default()
        },
        ..ShareableState::default()
    };
    let json = serde_json::to_string_pretty(&state)?;
    write_output(args.out.as_deref(), &json)
}

fn spring_samples(args: SpringArgs) -> anyhow::Result<()> {
    let config = SpringConfig {
        mass: args.mass,
        stiffness: args.stiffness,
        damping: args.damping,
        velocity: args.velocity,
    };
    let samples = motionforge::solve(&config, args.steps);
    println!("{}", serde_json::to_string_pretty(&samples)?);
    Ok(())
}

fn write_output(out: Option<&std::path::Path>, text: &str) -> anyhow::Result<()> {
    match out {
        Some(path) => fs::write(path, text).with_context(|| format!("writing {}", path.display())),
        None => {
            println!("{text}");
            Ok(())
        }
    }
}
