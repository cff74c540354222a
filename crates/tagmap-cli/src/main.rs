use serde::{Deserialize, Serialize};
use std::io::Read;
use std::str::FromStr;
use tagmap::layout::{
    AutoLayoutOptions, DEFAULT_HORIZONTAL_SPACING, DEFAULT_VERTICAL_SPACING, LayoutError,
    RankDir, WorkspaceEdge, WorkspaceNode,
};
use tagmap::{
    Focus, GenerationConfig, MapConfig, Material, MindMap, MindMapEditor, MindMapInfoUpdate,
    NewMindMap, TagCategory,
};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "TAGMAP_LOG";

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    TagMap(tagmap::Error),
    Json(serde_json::Error),
    EmptyMap,
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::TagMap(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::EmptyMap => write!(f, "No tags to build a mind map from"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<tagmap::Error> for CliError {
    fn from(value: tagmap::Error) -> Self {
        match value {
            tagmap::Error::EmptyInput => Self::EmptyMap,
            other => Self::TagMap(other),
        }
    }
}

impl From<LayoutError> for CliError {
    fn from(value: LayoutError) -> Self {
        match value {
            LayoutError::Tree(err) => err.into(),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Generate,
    Outline,
    TaxonomyOutline,
    Layout,
    AutoLayout,
    Subtree,
    New,
    Add,
    Rename,
    Remove,
    Info,
    Validate,
}

impl FromStr for Command {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "generate" => Ok(Self::Generate),
            "outline" => Ok(Self::Outline),
            "taxonomy-outline" => Ok(Self::TaxonomyOutline),
            "layout" => Ok(Self::Layout),
            "auto-layout" => Ok(Self::AutoLayout),
            "subtree" => Ok(Self::Subtree),
            "new" => Ok(Self::New),
            "add" => Ok(Self::Add),
            "rename" => Ok(Self::Rename),
            "remove" => Ok(Self::Remove),
            "info" => Ok(Self::Info),
            "validate" => Ok(Self::Validate),
            _ => Err(()),
        }
    }
}

fn parse_rankdir(s: &str) -> Option<RankDir> {
    match s.trim().to_ascii_uppercase().as_str() {
        "TB" => Some(RankDir::TB),
        "BT" => Some(RankDir::BT),
        "LR" => Some(RankDir::LR),
        "RL" => Some(RankDir::RL),
        _ => None,
    }
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    pretty: bool,
    strict: bool,
    taxonomy: Option<String>,
    configs: Vec<String>,
    overrides: Vec<(String, serde_json::Value)>,
    select: Option<String>,
    query: Option<String>,
    rankdir: Option<RankDir>,
    routed: bool,
    root: Option<String>,
    horizontal_spacing: Option<f64>,
    vertical_spacing: Option<f64>,
    title: Option<String>,
    owner: Option<String>,
    description: Option<String>,
    public: Option<bool>,
    tags: Vec<String>,
    parent: Option<String>,
    node: Option<String>,
    text: Option<String>,
}

/// Workspace graph accepted by `auto-layout` and `subtree`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WorkspaceIn {
    nodes: Vec<WorkspaceNode>,
    #[serde(default)]
    edges: Vec<WorkspaceEdge>,
    #[serde(default)]
    pinned_root_id: Option<String>,
}

#[derive(Serialize)]
struct NodesOut<T: Serialize> {
    nodes: T,
}

fn usage() -> &'static str {
    "tagmap-cli\n\
\n\
USAGE:\n\
  tagmap-cli [generate] [--taxonomy <path>] [--select <label>|--query <text>] [--config <path>]... [--set <key>=<value>]... [--strict] [--pretty] [<materials.json>|-]\n\
  tagmap-cli outline [<mindmap.json>|-]\n\
  tagmap-cli taxonomy-outline [--root <label>] [<taxonomy.json>|-]\n\
  tagmap-cli layout [--rankdir TB|BT|LR|RL] [--pretty] [<mindmap.json>|-]\n\
  tagmap-cli auto-layout [--rankdir TB|BT|LR|RL] [--routed] [--pretty] [<workspace.json>|-]\n\
  tagmap-cli subtree --root <id> [--horizontal <n>] [--vertical <n>] [--pretty] [<workspace.json>|-]\n\
  tagmap-cli new --title <text> --owner <id> [--root-text <text>] [--description <text>] [--public] [--tag <tag>]... [--pretty]\n\
  tagmap-cli add --parent <id> --text <text> [--pretty] [<mindmap.json>|-]\n\
  tagmap-cli rename --node <id> --text <text> [--pretty] [<mindmap.json>|-]\n\
  tagmap-cli remove --node <id> [--pretty] [<mindmap.json>|-]\n\
  tagmap-cli info [--title <text>] [--description <text>] [--public|--private] [--tag <tag>]... [--pretty] [<mindmap.json>|-]\n\
  tagmap-cli validate [<mindmap.json>|-]\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', input is read from stdin.\n\
  - generate prints the positioned tag mind map; --strict fails (exit 3) when there is nothing to expand.\n\
  - --config files are deep-merged in order, then --set assignments apply; later layers win.\n\
    --set values are read as JSON when they parse, otherwise as plain strings.\n\
  - Editing commands print the updated mind map; the input file is never rewritten.\n\
  - Set TAGMAP_LOG (e.g. TAGMAP_LOG=debug) to see diagnostics on stderr.\n\
"
}

fn next_value<'a>(it: &mut impl Iterator<Item = &'a String>) -> Result<String, CliError> {
    it.next().cloned().ok_or_else(|| CliError::Usage(usage()))
}

fn next_f64<'a>(it: &mut impl Iterator<Item = &'a String>) -> Result<f64, CliError> {
    let raw = next_value(it)?;
    let value = raw.parse::<f64>().map_err(|_| CliError::Usage(usage()))?;
    if !value.is_finite() {
        return Err(CliError::Usage(usage()));
    }
    Ok(value)
}

fn parse_assignment(raw: &str) -> Result<(String, serde_json::Value), CliError> {
    let Some((key, value)) = raw.split_once('=') else {
        return Err(CliError::Usage(usage()));
    };
    if key.is_empty() {
        return Err(CliError::Usage(usage()));
    }
    let value = serde_json::from_str(value)
        .unwrap_or_else(|_| serde_json::Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();
    let mut command_seen = false;

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "--pretty" => args.pretty = true,
            "--strict" => args.strict = true,
            "--routed" => args.routed = true,
            "--public" => args.public = Some(true),
            "--private" => args.public = Some(false),
            "--taxonomy" => args.taxonomy = Some(next_value(&mut it)?),
            "--config" => args.configs.push(next_value(&mut it)?),
            "--set" => args.overrides.push(parse_assignment(&next_value(&mut it)?)?),
            "--select" => args.select = Some(next_value(&mut it)?),
            "--query" => args.query = Some(next_value(&mut it)?),
            "--rankdir" => {
                let raw = next_value(&mut it)?;
                let rankdir = parse_rankdir(&raw).ok_or_else(|| CliError::Usage(usage()))?;
                args.rankdir = Some(rankdir);
            }
            "--root" | "--root-text" => args.root = Some(next_value(&mut it)?),
            "--horizontal" => args.horizontal_spacing = Some(next_f64(&mut it)?),
            "--vertical" => args.vertical_spacing = Some(next_f64(&mut it)?),
            "--title" => args.title = Some(next_value(&mut it)?),
            "--owner" => args.owner = Some(next_value(&mut it)?),
            "--description" => args.description = Some(next_value(&mut it)?),
            "--tag" => args.tags.push(next_value(&mut it)?),
            "--parent" => args.parent = Some(next_value(&mut it)?),
            "--node" => args.node = Some(next_value(&mut it)?),
            "--text" => args.text = Some(next_value(&mut it)?),
            other if other.starts_with("--") => return Err(CliError::Usage(usage())),
            other => {
                if !command_seen && args.input.is_none() {
                    if let Ok(command) = other.parse::<Command>() {
                        args.command = command;
                        command_seen = true;
                        continue;
                    }
                }
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(other.to_string());
            }
        }
    }

    if args.select.is_some() && args.query.is_some() {
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

fn read_json<T: serde::de::DeserializeOwned>(input: Option<&str>) -> Result<T, CliError> {
    let text = read_input(input)?;
    Ok(serde_json::from_str(&text)?)
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
    } else {
        serde_json::to_writer(std::io::stdout().lock(), value)?;
    }
    println!();
    Ok(())
}

fn required(value: Option<String>) -> Result<String, CliError> {
    value.ok_or_else(|| CliError::Usage(usage()))
}

fn generation_config(args: &Args) -> Result<GenerationConfig, CliError> {
    let mut config = MapConfig::empty_object();
    for path in &args.configs {
        let layer: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(path)?)?;
        tracing::debug!(path = %path, "merging config file");
        config.deep_merge(&layer);
    }
    for (key, value) in &args.overrides {
        config.set_value(key, value.clone());
    }
    Ok(GenerationConfig::from_config(&config))
}

fn layout_options(args: &Args) -> AutoLayoutOptions {
    let mut options = AutoLayoutOptions::default();
    if let Some(rankdir) = args.rankdir {
        options.rankdir = rankdir;
    }
    options
}

fn run(args: Args) -> Result<(), CliError> {
    tracing::debug!(command = ?args.command, input = ?args.input, "running");
    match args.command {
        Command::Generate => {
            let materials: Vec<Material> = read_json(args.input.as_deref())?;
            let taxonomy: Vec<TagCategory> = match args.taxonomy.as_deref() {
                Some(path) => read_json(Some(path))?,
                None => Vec::new(),
            };
            let config = generation_config(&args)?;
            let focus = match (args.select, args.query) {
                (Some(label), _) => Focus::selected(label),
                (None, Some(query)) => Focus::query(query),
                (None, None) => Focus::None,
            };

            let mut map = tagmap::build_tag_mind_map(&materials, &taxonomy, &focus, &config);
            if args.strict {
                map = map.require_content()?;
            }
            write_json(&map, args.pretty)
        }
        Command::Outline => {
            let map: MindMap = read_json(args.input.as_deref())?;
            print!("{}", tagmap::serialize_outline(&map));
            Ok(())
        }
        Command::TaxonomyOutline => {
            let forest: Vec<TagCategory> = read_json(args.input.as_deref())?;
            let root = args.root.as_deref().unwrap_or("Tags");
            print!("{}", tagmap::serialize_taxonomy_outline(root, &forest));
            Ok(())
        }
        Command::Layout => {
            let map: MindMap = read_json(args.input.as_deref())?;
            let nodes = tagmap::layout::layout_mind_map(&map, &layout_options(&args))?;
            write_json(&NodesOut { nodes }, args.pretty)
        }
        Command::AutoLayout => {
            let workspace: WorkspaceIn = read_json(args.input.as_deref())?;
            let options = layout_options(&args);
            let pinned = workspace.pinned_root_id.as_deref();
            if args.routed {
                let layout = tagmap::layout::auto_layout_routed(
                    &workspace.nodes,
                    &workspace.edges,
                    pinned,
                    &options,
                );
                write_json(&layout, args.pretty)
            } else {
                let nodes = tagmap::layout::auto_layout(
                    &workspace.nodes,
                    &workspace.edges,
                    pinned,
                    &options,
                );
                write_json(&NodesOut { nodes }, args.pretty)
            }
        }
        Command::Subtree => {
            let root = required(args.root)?;
            let workspace: WorkspaceIn = read_json(args.input.as_deref())?;
            let nodes = tagmap::layout::layout_subtree(
                &root,
                &workspace.nodes,
                &workspace.edges,
                args.horizontal_spacing.unwrap_or(DEFAULT_HORIZONTAL_SPACING),
                args.vertical_spacing.unwrap_or(DEFAULT_VERTICAL_SPACING),
            );
            write_json(&NodesOut { nodes }, args.pretty)
        }
        Command::New => {
            let mut new = NewMindMap::new(required(args.title)?, required(args.owner)?)
                .public(args.public.unwrap_or(false))
                .tags(args.tags);
            if let Some(text) = args.root {
                new = new.root_text(text);
            }
            if let Some(description) = args.description {
                new = new.description(description);
            }
            let map = MindMapEditor::new().create_mind_map(new);
            write_json(&map, args.pretty)
        }
        Command::Add => {
            let parent = required(args.parent)?;
            let text = required(args.text)?;
            let map: MindMap = read_json(args.input.as_deref())?;
            let map = MindMapEditor::new().add_node(&map, &parent, &text)?;
            write_json(&map, args.pretty)
        }
        Command::Rename => {
            let node = required(args.node)?;
            let text = required(args.text)?;
            let map: MindMap = read_json(args.input.as_deref())?;
            let map = MindMapEditor::new().update_node(&map, &node, &text)?;
            write_json(&map, args.pretty)
        }
        Command::Remove => {
            let node = required(args.node)?;
            let map: MindMap = read_json(args.input.as_deref())?;
            let map = MindMapEditor::new().remove_node(&map, &node)?;
            write_json(&map, args.pretty)
        }
        Command::Info => {
            let map: MindMap = read_json(args.input.as_deref())?;
            let update = MindMapInfoUpdate {
                title: args.title,
                description: args.description,
                is_public: args.public,
                tags: (!args.tags.is_empty()).then_some(args.tags),
            };
            let map = MindMapEditor::new().update_info(&map, update);
            write_json(&map, args.pretty)
        }
        Command::Validate => {
            let map: MindMap = read_json(args.input.as_deref())?;
            map.validate()?;
            println!("ok");
            Ok(())
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() {
    init_tracing();

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

    match run(args) {
        Ok(()) => {}
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(CliError::EmptyMap) => {
            eprintln!("{}", CliError::EmptyMap);
            std::process::exit(3);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
