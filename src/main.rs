use std::env;
use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

use saga_progression::components::character::soldier_recruit;
use saga_progression::components::Player;
use saga_progression::content::{SqliteTemplateRepository, TemplateRepository};
use saga_progression::core::{create_schedule, create_world};
use saga_progression::data::feats::FeatCatalog;
use saga_progression::data::talents::TalentTreeCatalog;
use saga_progression::data::{load_feat_catalog, load_talent_catalog};
use saga_progression::rules::{
    build_dependency_graph, compute_tiers, DependencyGraph, FeatureNode, TierLayout,
};
use saga_progression::systems::eligibility::{EligibilityBoard, ProgressionLibrary};

fn main() {
    init_tracing();
    println!("saga-progression content lint");

    let paths = parse_paths(env::args().collect());

    let talent_catalog = match load_talent_catalog(&paths.talents) {
        Ok(catalog) => catalog,
        Err(err) => {
            eprintln!("Failed to load {}: {}", paths.talents.display(), err);
            std::process::exit(1);
        }
    };
    let feat_catalog = match load_feat_catalog(&paths.feats) {
        Ok(catalog) => catalog,
        Err(err) => {
            eprintln!("Failed to load {}: {}", paths.feats.display(), err);
            std::process::exit(1);
        }
    };

    let mut errors = 0usize;

    for tree in &talent_catalog.trees {
        println!();
        println!(
            "Talent tree: {} ({} talents)",
            tree.name,
            tree.talents.len()
        );
        errors += lint_collection(&tree.feature_nodes());
    }

    println!();
    println!("Feat list ({} feats)", feat_catalog.feats.len());
    errors += lint_collection(&feat_catalog.feature_nodes());

    if paths.content_db.exists() {
        match SqliteTemplateRepository::open(&paths.content_db) {
            Ok(repo) => errors += lint_templates(&repo),
            Err(err) => {
                eprintln!("Failed to open {}: {}", paths.content_db.display(), err);
                errors += 1;
            }
        }
    } else {
        println!();
        println!(
            "No template db at {} (skipping gear templates)",
            paths.content_db.display()
        );
    }

    demo_eligibility(&talent_catalog, &feat_catalog);

    println!();
    if errors > 0 {
        println!("Lint finished: {} structural error(s)", errors);
        std::process::exit(1);
    }
    println!("Lint finished: content is clean");
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

struct LintPaths {
    talents: PathBuf,
    feats: PathBuf,
    content_db: PathBuf,
}

fn parse_paths(args: Vec<String>) -> LintPaths {
    let mut iter = args.iter();
    let mut paths = LintPaths {
        talents: PathBuf::from("./assets/data/talent_trees.json"),
        feats: PathBuf::from("./assets/data/feats.json"),
        content_db: PathBuf::from("./assets/db/content_v1.db"),
    };
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--talents" => {
                if let Some(value) = iter.next() {
                    paths.talents = PathBuf::from(value);
                }
            }
            "--feats" => {
                if let Some(value) = iter.next() {
                    paths.feats = PathBuf::from(value);
                }
            }
            "--db" => {
                if let Some(value) = iter.next() {
                    paths.content_db = PathBuf::from(value);
                }
            }
            _ => {}
        }
    }
    paths
}

/// Build + tier one collection and print the report. Returns the number of
/// structural errors found.
fn lint_collection(features: &[FeatureNode]) -> usize {
    let graph = match build_dependency_graph(features) {
        Ok(graph) => graph,
        Err(err) => {
            println!("  ERROR: {}", err);
            return 1;
        }
    };
    let layout = compute_tiers(&graph);
    print_layout(&graph, &layout);
    layout.cycles.len()
}

fn print_layout(graph: &DependencyGraph, layout: &TierLayout) {
    for (tier, layer) in layout.tiers.iter().enumerate() {
        let names: Vec<&str> = layer.iter().map(|id| display_name(graph, &id.0)).collect();
        println!("  tier {}: {}", tier, names.join(", "));
    }
    for group in &layout.cycles {
        let names: Vec<&str> = group.iter().map(|id| display_name(graph, &id.0)).collect();
        println!("  CYCLE: {}", names.join(" <-> "));
    }
    if !layout.blocked.is_empty() {
        let names: Vec<&str> = layout
            .blocked
            .iter()
            .map(|id| display_name(graph, &id.0))
            .collect();
        println!("  blocked behind cycles: {}", names.join(", "));
    }
    for reference in &graph.external {
        println!(
            "  external requirement: {} needs {}",
            display_name(graph, &reference.node.0),
            reference.referenced
        );
    }
    for unresolved in &graph.unresolved {
        println!(
            "  unresolved text on {}: \"{}\"",
            display_name(graph, &unresolved.node.0),
            unresolved.text
        );
    }
}

fn display_name<'a>(graph: &'a DependencyGraph, id: &'a str) -> &'a str {
    match graph.index_of(id) {
        Some(idx) => graph.names[idx].as_str(),
        None => id,
    }
}

fn lint_templates(repo: &dyn TemplateRepository) -> usize {
    println!();
    match repo.stats() {
        Ok(stats) => println!(
            "Gear templates ({} templates, {} stack pairs)",
            stats.template_count, stats.stack_pair_count
        ),
        Err(err) => println!("Gear template stats unavailable: {}", err),
    }

    let templates = match repo.templates() {
        Ok(templates) => templates,
        Err(err) => {
            println!("  ERROR: {}", err);
            return 1;
        }
    };
    let nodes: Vec<FeatureNode> = templates
        .iter()
        .map(|template| template.feature_node())
        .collect();
    let mut errors = lint_collection(&nodes);

    // Every allow-list entry must name templates that exist.
    match repo.allowed_pairs() {
        Ok(pairs) => {
            for (first, second) in &pairs {
                for id in [first, second] {
                    if !templates.iter().any(|template| template.id.matches(&id.0)) {
                        println!("  ERROR: stack pair references unknown template {}", id);
                        errors += 1;
                    }
                }
            }
        }
        Err(err) => {
            println!("  ERROR: {}", err);
            errors += 1;
        }
    }

    errors
}

/// Run one tick of the host glue against a sample character and show what
/// a selection UI would see.
fn demo_eligibility(talent_catalog: &TalentTreeCatalog, feat_catalog: &FeatCatalog) {
    let library = ProgressionLibrary {
        trees: talent_catalog.trees.clone(),
        feats: feat_catalog.feats.clone(),
    };
    let mut world = create_world(library);
    world.spawn((soldier_recruit(), Player));

    let mut schedule = create_schedule();
    schedule.run(&mut world);

    let board = world.resource::<EligibilityBoard>();
    println!();
    println!("Sample character eligibility:");
    for feat in &feat_catalog.feats {
        let Some(verdict) = board.feat(&feat.id) else {
            continue;
        };
        if verdict.satisfied {
            println!("  feat {}: eligible", feat.name);
        } else {
            let reasons: Vec<&str> = verdict
                .failed
                .iter()
                .map(|failure| failure.reason.as_str())
                .collect();
            println!("  feat {}: blocked ({})", feat.name, reasons.join("; "));
        }
    }
    for tree in &talent_catalog.trees {
        for talent in &tree.talents {
            let Some(verdict) = board.talent(&talent.id) else {
                continue;
            };
            let state = if verdict.satisfied { "eligible" } else { "blocked" };
            println!("  talent {} [{}]: {}", talent.name, tree.name, state);
        }
    }
}
