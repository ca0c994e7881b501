use fenceplot::render::raster::{RasterOptions, svg_to_png};
use fenceplot::render::{HeadlessRenderer, RenderedBlock, Size, sanitize_svg_id};
use fenceplot::{DiagramPayload, Engine, ParsedBlock, RenderTarget, SiteConfig};
use serde::Serialize;
use std::io::{Read, Write};
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Payload(fenceplot::Error),
    Raster(fenceplot::render::raster::RasterError),
    Json(serde_json::Error),
    NotADiagram(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Payload(err) => write!(f, "{err}"),
            CliError::Raster(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::NotADiagram(kind) => write!(f, "`{kind}` blocks do not produce a drawing"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<fenceplot::Error> for CliError {
    fn from(value: fenceplot::Error) -> Self {
        Self::Payload(value)
    }
}

impl From<fenceplot::render::raster::RasterError> for CliError {
    fn from(value: fenceplot::render::raster::RasterError) -> Self {
        Self::Raster(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
enum Command {
    #[default]
    Markdown,
    Dispatch(String),
    Normalize,
    Render,
}

#[derive(Debug, Clone, Copy, Default)]
enum RenderFormat {
    #[default]
    Svg,
    Png,
}

impl FromStr for RenderFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "png" => Ok(Self::Png),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    config: Option<String>,
    kind: Option<String>,
    pretty: bool,
    render_format: RenderFormat,
    render_scale: f32,
    background: Option<String>,
    width: Option<f64>,
    height: Option<f64>,
    diagram_id: Option<String>,
    out: Option<String>,
}

fn usage() -> &'static str {
    "fenceplot-cli\n\
\n\
USAGE:\n\
  fenceplot-cli dispatch [--config <path>] <tag>\n\
  fenceplot-cli normalize [--kind plot-function|plot-force] [--pretty] [--config <path>] [<path>|-]\n\
  fenceplot-cli render --kind <tag> [--format svg|png] [--scale <n>] [--background <css-color>] [--width <w>] [--height <h>] [--id <diagram-id>] [--out <path>] [--config <path>] [<path>|-]\n\
  fenceplot-cli [markdown] [--out <path>] [--config <path>] [<path>|-]\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', input is read from stdin.\n\
  - --config takes a JSON site config merged over the defaults.\n\
  - render draws a broken block as its notice and still succeeds.\n\
  - PNG output defaults to writing next to the input file (or ./out.png for stdin).\n\
  - Logging is controlled by FENCEPLOT_LOG (or RUST_LOG); the default level is warn.\n\
"
}

fn next_value<'a>(it: &mut impl Iterator<Item = &'a String>) -> Result<&'a String, CliError> {
    it.next().ok_or(CliError::Usage(usage()))
}

fn parse_positive(raw: &str) -> Result<f64, CliError> {
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(v),
        _ => Err(CliError::Usage(usage())),
    }
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args {
        render_scale: 1.0,
        ..Default::default()
    };

    let mut it = argv.iter().skip(1);
    let mut saw_command = false;
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "dispatch" if !saw_command => {
                args.command = Command::Dispatch(next_value(&mut it)?.clone());
            }
            "normalize" if !saw_command => args.command = Command::Normalize,
            "render" if !saw_command => args.command = Command::Render,
            "markdown" if !saw_command => args.command = Command::Markdown,
            "--pretty" => args.pretty = true,
            "--kind" => args.kind = Some(next_value(&mut it)?.clone()),
            "--config" => args.config = Some(next_value(&mut it)?.clone()),
            "--format" => {
                args.render_format = next_value(&mut it)?
                    .parse::<RenderFormat>()
                    .map_err(|_| CliError::Usage(usage()))?;
            }
            "--scale" => {
                args.render_scale = parse_positive(next_value(&mut it)?)? as f32;
            }
            "--background" => {
                let bg = next_value(&mut it)?;
                if !bg.trim().is_empty() {
                    args.background = Some(bg.trim().to_string());
                }
            }
            "--width" => args.width = Some(parse_positive(next_value(&mut it)?)?),
            "--height" => args.height = Some(parse_positive(next_value(&mut it)?)?),
            "--id" => args.diagram_id = Some(next_value(&mut it)?.clone()),
            "--out" => args.out = Some(next_value(&mut it)?.clone()),
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            other if other.starts_with('-') && other != "-" => {
                return Err(CliError::Usage(usage()));
            }
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
        saw_command = true;
    }

    if args.command == Command::Render && args.kind.is_none() {
        return Err(CliError::Usage(usage()));
    }
    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn read_site_config(path: Option<&str>) -> Result<Option<SiteConfig>, CliError> {
    let Some(path) = path else {
        return Ok(None);
    };
    let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(path)?)?;
    Ok(Some(SiteConfig::from_value(value)))
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    let mut out = std::io::stdout().lock();
    if pretty {
        serde_json::to_writer_pretty(&mut out, value)?;
    } else {
        serde_json::to_writer(&mut out, value)?;
    }
    writeln!(out)?;
    Ok(())
}

fn write_text(text: &str, out: Option<&str>) -> Result<(), CliError> {
    match out {
        None => {
            print!("{text}");
            Ok(())
        }
        Some(path) => {
            std::fs::write(path, text)?;
            Ok(())
        }
    }
}

fn default_raster_out_path(input: Option<&str>, ext: &str) -> std::path::PathBuf {
    match input {
        Some(path) if path != "-" => std::path::PathBuf::from(path).with_extension(ext),
        _ => std::path::PathBuf::from(format!("out.{ext}")),
    }
}

fn target_name(target: RenderTarget) -> &'static str {
    match target {
        RenderTarget::FunctionPlot => "function-plot",
        RenderTarget::ForceDiagram => "force-diagram",
        RenderTarget::Board => "board",
        RenderTarget::Code => "code",
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let site_config = read_site_config(args.config.as_deref())?;

    match args.command {
        Command::Dispatch(tag) => {
            let mut engine = Engine::new();
            if let Some(config) = site_config {
                engine = engine.with_site_config(config);
            }
            let target = engine.dispatch(&DiagramPayload::new(tag, ""));
            println!("{}", target_name(target));
            Ok(())
        }
        Command::Normalize => {
            let mut engine = Engine::new();
            if let Some(config) = site_config {
                engine = engine.with_site_config(config);
            }
            let kind = args.kind.unwrap_or_else(|| "plot-function".to_string());
            let text = read_input(args.input.as_deref())?;
            match engine.parse_block_sync(&DiagramPayload::new(kind.as_str(), text))? {
                ParsedBlock::FunctionPlot(config) => write_json(&config, args.pretty),
                ParsedBlock::ForceDiagram(forces) => write_json(&forces, args.pretty),
                ParsedBlock::Board { .. } | ParsedBlock::Code { .. } => {
                    Err(CliError::NotADiagram(kind))
                }
            }
        }
        Command::Render => {
            let mut renderer = HeadlessRenderer::new();
            if let Some(config) = site_config {
                renderer = renderer.with_site_config(config);
            }
            let size = Size::new(
                args.width.unwrap_or(renderer.size.width),
                args.height.unwrap_or(renderer.size.height),
            );
            renderer = renderer.with_size(size);
            if let Some(bg) = &args.background {
                renderer.svg.background = Some(bg.clone());
            }

            let kind = args.kind.unwrap_or_default();
            let text = read_input(args.input.as_deref())?;
            let payload = DiagramPayload::new(kind.as_str(), text);
            let block = match &args.diagram_id {
                Some(id) => renderer.render_block_sync_with_diagram_id(&payload, id),
                None => renderer.render_block_sync_with_diagram_id(&payload, &sanitize_svg_id(&kind)),
            };
            if let RenderedBlock::Notice { notice, .. } = &block {
                eprintln!("{notice}");
            }
            let Some(svg) = block.svg() else {
                return Err(CliError::NotADiagram(kind));
            };

            match args.render_format {
                RenderFormat::Svg => write_text(svg, args.out.as_deref()),
                RenderFormat::Png => {
                    let png = svg_to_png(
                        svg,
                        &RasterOptions {
                            scale: args.render_scale,
                            background: args.background.clone(),
                        },
                    )?;
                    let out = args
                        .out
                        .map(std::path::PathBuf::from)
                        .unwrap_or_else(|| default_raster_out_path(args.input.as_deref(), "png"));
                    std::fs::write(out, png)?;
                    Ok(())
                }
            }
        }
        Command::Markdown => {
            let mut renderer = HeadlessRenderer::new();
            if let Some(config) = site_config {
                renderer = renderer.with_site_config(config);
            }
            let text = read_input(args.input.as_deref())?;
            let doc = renderer.render_markdown(&text);
            for notice in doc.notices().filter_map(RenderedBlock::notice) {
                eprintln!("{notice}");
            }
            write_text(&doc.html, args.out.as_deref())
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("FENCEPLOT_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    init_logging();

    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
