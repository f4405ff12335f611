use anyhow::{anyhow, bail, Result};
use serde::Serialize;
use std::collections::HashSet;
use std::env;
use traitcast::{
    classifier::Classifier,
    history::{FileStore, PredictionHistory},
    projector::{self, TraitImpact},
    renderer::{self, DEFAULT_CHUNK_SIZE},
    GENES,
};

const DEFAULT_STATE_DIR: &str = ".traitcast_state";

#[derive(Serialize)]
struct GeneSummary {
    id: String,
    name: String,
    trait_label: &'static str,
    color: &'static str,
    length: usize,
    description: String,
}

#[derive(Serialize)]
struct RadarPoint {
    label: String,
    impact: f64,
    x: f64,
    y: f64,
}

fn usage() {
    eprintln!(
        "Usage:\n  \
  traitcast_cli [--state DIR] genes\n  \
  traitcast_cli [--state DIR] show GENE_ID [CHUNK_SIZE] [--highlight POSITION]\n  \
  traitcast_cli [--state DIR] annotate GENE_ID POSITION\n  \
  traitcast_cli [--state DIR] predict GENE_ID POSITION ORIGINAL MUTATED\n  \
  traitcast_cli [--state DIR] history\n  \
  traitcast_cli [--state DIR] clear-history\n  \
  traitcast_cli [--state DIR] remove-history ID [ID...]\n  \
  traitcast_cli radar RADIUS LABEL=IMPACT [LABEL=IMPACT...]\n  \
  traitcast_cli gauge SCALAR"
    );
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn parse_global_state_arg(args: &[String]) -> (String, usize) {
    if args.len() >= 3 && args[1] == "--state" {
        return (args[2].clone(), 3);
    }
    (DEFAULT_STATE_DIR.to_string(), 1)
}

fn open_history(state_dir: &str) -> PredictionHistory {
    PredictionHistory::open(Box::new(FileStore::new(state_dir)))
}

fn parse_residue(arg: &str) -> Result<char> {
    let mut chars = arg.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => bail!("Expected a single residue letter, got '{arg}'"),
    }
}

fn cmd_genes() -> Result<()> {
    let genes: Vec<GeneSummary> = GENES
        .iter()
        .map(|gene| GeneSummary {
            id: gene.id.clone(),
            name: gene.name.clone(),
            trait_label: gene.crop_trait.label(),
            color: gene.crop_trait.color(),
            length: gene.len(),
            description: gene.description.clone(),
        })
        .collect();
    print_json(&genes)
}

fn cmd_show(args: &[String]) -> Result<()> {
    let gene_id = args.first().ok_or_else(|| anyhow!("Missing GENE_ID"))?;
    let gene = GENES.gene(gene_id)?;

    let mut chunk_size = DEFAULT_CHUNK_SIZE;
    let mut highlight: Option<i64> = None;
    let mut rest = args[1..].iter();
    while let Some(arg) = rest.next() {
        if arg == "--highlight" {
            let value = rest
                .next()
                .ok_or_else(|| anyhow!("--highlight needs a position"))?;
            highlight = Some(value.parse()?);
        } else {
            chunk_size = arg.parse()?;
        }
    }

    println!("{} ({}) - {}", gene.id, gene.crop_trait.label(), gene.name);
    for line in renderer::render(gene, chunk_size) {
        println!("{:>6} {}", line.start_position, line.residues);
    }
    if let Some(position) = highlight {
        // The UI addresses highlights by 1-based position; locate works on
        // the 0-based global index.
        match renderer::locate(gene, position - 1, chunk_size) {
            Some((line, offset)) => {
                println!("Highlight {position}: line {line}, column {offset}")
            }
            None => println!("Highlight {position}: not resolved"),
        }
    }
    Ok(())
}

fn cmd_annotate(args: &[String]) -> Result<()> {
    let gene_id = args.first().ok_or_else(|| anyhow!("Missing GENE_ID"))?;
    let position: i64 = args
        .get(1)
        .ok_or_else(|| anyhow!("Missing POSITION"))?
        .parse()?;
    let gene = GENES.gene(gene_id)?;
    GENES.validate_position(gene, position)?;
    let aa = gene
        .residue_at(position as usize)
        .ok_or_else(|| anyhow!("Position {position} unresolved"))?;
    println!("{gene_id} position {position}: {aa} ({})", renderer::annotate(aa));
    Ok(())
}

fn cmd_predict(state_dir: &str, args: &[String]) -> Result<()> {
    if args.len() < 4 {
        usage();
        bail!("predict requires: GENE_ID POSITION ORIGINAL MUTATED");
    }
    let gene = GENES.gene(&args[0])?;
    let position: i64 = args[1].parse()?;
    let original = parse_residue(&args[2])?;
    let mutated = parse_residue(&args[3])?;

    let mut classifier = Classifier::default();
    let prediction = classifier.classify(gene, position, original, mutated)?;

    let mut history = open_history(state_dir);
    history.record(prediction.clone());
    print_json(&prediction)
}

fn cmd_radar(args: &[String]) -> Result<()> {
    if args.len() < 2 {
        usage();
        bail!("radar requires: RADIUS LABEL=IMPACT [LABEL=IMPACT...]");
    }
    let radius: f64 = args[0].parse()?;
    let vector: Vec<TraitImpact> = args[1..]
        .iter()
        .map(|arg| {
            let (label, impact) = arg
                .split_once('=')
                .ok_or_else(|| anyhow!("Expected LABEL=IMPACT, got '{arg}'"))?;
            Ok(TraitImpact::new(label, impact.parse()?))
        })
        .collect::<Result<_>>()?;
    let points = projector::project(&vector, radius);
    let out: Vec<RadarPoint> = vector
        .iter()
        .zip(points)
        .map(|(ti, p)| RadarPoint {
            label: ti.label.clone(),
            impact: ti.impact,
            x: p.x,
            y: p.y,
        })
        .collect();
    print_json(&out)
}

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() <= 1 {
        usage();
        bail!("Missing command");
    }

    let (state_dir, cmd_idx) = parse_global_state_arg(&args);
    if args.len() <= cmd_idx {
        usage();
        bail!("Missing command");
    }
    let command = args[cmd_idx].as_str();
    let rest = &args[cmd_idx + 1..];

    match command {
        "genes" => cmd_genes(),
        "show" => cmd_show(rest),
        "annotate" => cmd_annotate(rest),
        "predict" => cmd_predict(&state_dir, rest),
        "history" => {
            let history = open_history(&state_dir);
            print_json(&history.list().to_vec())
        }
        "clear-history" => {
            let mut history = open_history(&state_dir);
            history.clear();
            println!("Cleared prediction history in '{state_dir}'");
            Ok(())
        }
        "remove-history" => {
            if rest.is_empty() {
                usage();
                bail!("remove-history requires at least one id");
            }
            let ids: HashSet<String> = rest.iter().cloned().collect();
            let mut history = open_history(&state_dir);
            let before = history.len();
            history.remove(&ids);
            println!("Removed {} entries", before - history.len());
            Ok(())
        }
        "radar" => cmd_radar(rest),
        "gauge" => {
            let scalar: f64 = rest
                .first()
                .ok_or_else(|| anyhow!("gauge requires a scalar"))?
                .parse()?;
            print_json(&serde_json::json!({ "arc": projector::gauge_arc(scalar) }))
        }
        _ => {
            usage();
            bail!("Unknown command '{command}'")
        }
    }
}
