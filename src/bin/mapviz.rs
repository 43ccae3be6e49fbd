use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "mapviz", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the GLSL preface and inline expression of a style expression.
    Shader(ShaderArgs),
    /// Print the legend of a ramp expression as JSON.
    Legend(LegendArgs),
    /// Evaluate an expression for one feature and print the value as JSON.
    Eval(EvalArgs),
}

#[derive(Parser, Debug)]
struct ShaderArgs {
    /// Dataset metadata JSON.
    #[arg(long)]
    metadata: PathBuf,

    /// Style expression.
    #[arg(long)]
    expr: String,
}

#[derive(Parser, Debug)]
struct LegendArgs {
    /// Dataset metadata JSON.
    #[arg(long)]
    metadata: PathBuf,

    /// Ramp expression.
    #[arg(long)]
    expr: String,

    /// Samples of a numeric legend.
    #[arg(long, default_value_t = mapviz::DEFAULT_SAMPLES)]
    samples: usize,

    /// Label of the "others" entry of a categorical legend.
    #[arg(long, default_value = mapviz::DEFAULT_OTHERS_LABEL)]
    others: String,
}

#[derive(Parser, Debug)]
struct EvalArgs {
    /// Dataset metadata JSON.
    #[arg(long)]
    metadata: PathBuf,

    /// Style expression.
    #[arg(long)]
    expr: String,

    /// Feature properties as a JSON object.
    #[arg(long, default_value = "{}")]
    feature: String,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(tracing::Level::WARN)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Shader(args) => cmd_shader(args),
        Command::Legend(args) => cmd_legend(args),
        Command::Eval(args) => cmd_eval(args),
    }
}

fn compile(metadata: &Path, expr: &str) -> anyhow::Result<(mapviz::ExprArena, mapviz::NodeId)> {
    let meta = mapviz::Metadata::from_path(metadata)
        .with_context(|| format!("load metadata '{}'", metadata.display()))?;
    let mut arena = mapviz::ExprArena::new();
    let root = arena
        .parse(expr)
        .with_context(|| format!("parse expression '{expr}'"))?;
    arena
        .bind_metadata(root, Arc::new(meta))
        .with_context(|| "bind expression to metadata")?;
    Ok((arena, root))
}

fn cmd_shader(args: ShaderArgs) -> anyhow::Result<()> {
    let (arena, root) = compile(&args.metadata, &args.expr)?;
    let src = arena.to_shader_source(root, &mapviz::attribute_resolver)?;
    println!("{}", src.preface);
    println!("{}", src.inline);
    Ok(())
}

fn cmd_legend(args: LegendArgs) -> anyhow::Result<()> {
    let (arena, root) = compile(&args.metadata, &args.expr)?;
    let options = mapviz::LegendOptions {
        samples: args.samples,
        others_label: args.others,
    };
    let legend = arena.legend(root, &options)?;
    println!(
        "{}",
        serde_json::to_string_pretty(&legend).context("serialize legend")?
    );
    Ok(())
}

fn cmd_eval(args: EvalArgs) -> anyhow::Result<()> {
    let (arena, root) = compile(&args.metadata, &args.expr)?;
    let feature: BTreeMap<String, mapviz::PropertyValue> =
        serde_json::from_str(&args.feature).context("parse feature JSON")?;
    let value = arena.eval(root, &feature)?;
    let out = match value {
        mapviz::Value::Category(id) => arena
            .metadata()
            .and_then(|m| m.categories().name(id).map(str::to_owned))
            .map_or(serde_json::Value::Null, serde_json::Value::String),
        other => serde_json::to_value(&other).context("serialize value")?,
    };
    println!("{out}");
    Ok(())
}
