use crate::config::{Config, load_config};
use crate::dataset::{Dataset, Gender};
use crate::layout_dump::{QueryDump, write_query_dump};
use crate::render::{RenderState, render_svg, write_output_png, write_output_svg};
use crate::view::ConnectionView;
use crate::viewport::Viewport;
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "kinpath", version, about = "Find and draw the relationship paths between two people")]
pub struct Args {
    /// Dataset file (.json or .json5) with people and connections
    #[arg(short = 'd', long = "data")]
    pub data: PathBuf,

    /// Name of the person the paths start from
    #[arg(short = 's', long = "source")]
    pub source: Option<String>,

    /// Name of the person the paths lead to
    #[arg(short = 't', long = "target")]
    pub target: Option<String>,

    /// Output file. Defaults to stdout except for PNG.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config file (JSON or JSON5)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Width
    #[arg(short = 'w', long = "width")]
    pub width: Option<f32>,

    /// Height
    #[arg(short = 'H', long = "height")]
    pub height: Option<f32>,

    /// Longest path, in connections
    #[arg(long = "maxDepth")]
    pub max_depth: Option<usize>,

    /// Path id to emphasize and label, e.g. path2
    #[arg(long = "highlight")]
    pub highlight: Option<String>,

    /// Zoom factor, clamped to the configured range
    #[arg(long = "zoom")]
    pub zoom: Option<f32>,

    /// Horizontal pan offset in pixels
    #[arg(long = "panX", allow_negative_numbers = true)]
    pub pan_x: Option<f32>,

    /// Vertical pan offset in pixels
    #[arg(long = "panY", allow_negative_numbers = true)]
    pub pan_y: Option<f32>,

    /// Print everyone in the dataset and exit
    #[arg(long = "listPeople")]
    pub list_people: bool,

    /// Print one person's details and connections and exit
    #[arg(long = "person")]
    pub person: Option<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
    Json,
    Text,
}

pub fn run() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("RUST_LOG", "warn")).init();
    let args = Args::parse();
    execute(&args)
}

pub fn execute(args: &Args) -> Result<()> {
    let config = resolve_config(args)?;
    let dataset = Dataset::load(&args.data)?;
    for label in dataset.unknown_relationships() {
        log::warn!("relationship {label:?} has no reverse; it will read the same both ways");
    }

    if args.list_people {
        return emit(&people_listing(&dataset), args);
    }
    if let Some(name) = &args.person {
        return emit(&person_report(&dataset, name)?, args);
    }

    let (Some(source), Some(target)) = (&args.source, &args.target) else {
        return Err(anyhow::anyhow!(
            "--source and --target are required unless --listPeople or --person is given"
        ));
    };

    let view = ConnectionView::resolve(&dataset, source, target, &config);
    if let Some(reason) = &view.fallback {
        log::warn!("{reason}; showing {} overview path(s)", view.paths.len());
    }

    match args.output_format {
        OutputFormat::Text => emit(&text_report(&view), args),
        OutputFormat::Json => {
            let layout = view.layout(&dataset, &config);
            match &args.output {
                Some(path) => write_query_dump(path, &view, &layout),
                None => {
                    println!("{}", QueryDump::from_view(&view, &layout).to_json()?);
                    Ok(())
                }
            }
        }
        OutputFormat::Svg | OutputFormat::Png => {
            let layout = view.layout(&dataset, &config);
            let state = RenderState {
                highlighted_path: args.highlight.clone(),
                viewport: viewport_for(args, &config),
                ..RenderState::default()
            };
            let svg = render_svg(&layout, &config.theme, &config.layout, &state);
            if args.output_format == OutputFormat::Svg {
                write_output_svg(&svg, args.output.as_deref())
            } else {
                let output = args
                    .output
                    .as_deref()
                    .ok_or_else(|| anyhow::anyhow!("Output path required for png output"))?;
                write_output_png(&svg, output, &config.render, &config.theme)
            }
        }
    }
}

fn resolve_config(args: &Args) -> Result<Config> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(width) = args.width {
        config.render.width = width;
    }
    if let Some(height) = args.height {
        config.render.height = height;
    }
    if let Some(depth) = args.max_depth {
        config.search.max_depth = depth;
    }
    Ok(config)
}

/// A viewport only when the user asked to zoom or pan.
fn viewport_for(args: &Args, config: &Config) -> Option<Viewport> {
    if args.zoom.is_none() && args.pan_x.is_none() && args.pan_y.is_none() {
        return None;
    }
    let mut viewport = Viewport::new(config.render.width, config.render.height, config.viewport.clone());
    if let Some(zoom) = args.zoom {
        viewport.zoom_to(zoom);
    }
    viewport.pan_to(args.pan_x.unwrap_or(0.0), args.pan_y.unwrap_or(0.0));
    Some(viewport)
}

fn emit(text: &str, args: &Args) -> Result<()> {
    match &args.output {
        Some(path) => std::fs::write(path, text)?,
        None => print!("{text}"),
    }
    Ok(())
}

fn text_report(view: &ConnectionView) -> String {
    let mut out = String::new();
    if let Some(reason) = &view.fallback {
        out.push_str(&format!("{reason}\n"));
    }
    for line in view.path_lines() {
        out.push_str(&line);
        out.push('\n');
    }
    out
}

fn people_listing(dataset: &Dataset) -> String {
    let mut out = String::new();
    for person in dataset.people() {
        out.push_str(&format!("{}\t{}\t{}\n", person.id, person.name, gender_label(person.gender)));
    }
    out
}

fn person_report(dataset: &Dataset, name: &str) -> Result<String> {
    let person = dataset
        .person_by_name(name)
        .ok_or_else(|| anyhow::anyhow!("no person named {name:?}"))?;
    let mut out = String::new();
    out.push_str(&format!("{} ({})\n", person.name, gender_label(person.gender)));
    if !person.info.is_empty() {
        out.push_str(&person.info);
        out.push('\n');
    }
    if let Some(details) = &person.details {
        let fields = [
            ("Tug'ilgan sana", &details.birth_date),
            ("Tug'ilgan joy", &details.birth_place),
            ("Kasb", &details.occupation),
            ("Ta'lim", &details.education),
            ("Izoh", &details.description),
        ];
        for (label, value) in fields {
            if let Some(value) = value {
                out.push_str(&format!("{label}: {value}\n"));
            }
        }
        if !details.hobbies.is_empty() {
            out.push_str(&format!("Qiziqishlar: {}\n", details.hobbies.join(", ")));
        }
    }
    let connections = dataset.connections_of(&person.id);
    if !connections.is_empty() {
        out.push_str("Aloqalar:\n");
        for row in connections {
            out.push_str(&format!("  {}: {}\n", row.relationship, row.other.name));
        }
    }
    Ok(out)
}

fn gender_label(gender: Gender) -> &'static str {
    match gender {
        Gender::Male => "erkak",
        Gender::Female => "ayol",
    }
}
