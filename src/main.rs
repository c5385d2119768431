use anyhow::Result;
use sideeffectnet::analysis::SafetyAnalyzer;
use sideeffectnet::centrality::CentralityRanker;
use sideeffectnet::config::DashboardConfig;
use sideeffectnet::dataset::load_dataset;
use sideeffectnet::graph::{GraphBuilder, NodeKind};
use sideeffectnet::hypothesis::HypothesisClient;
use sideeffectnet::index::{RiskMap, SideEffectIndex};
use std::path::Path;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    println!("SideEffectNet Analytics Core v{}", sideeffectnet::VERSION);
    println!("==========================================");
    println!();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => DashboardConfig::from_file(Path::new(&path))?,
        None => DashboardConfig::default(),
    };

    let (edges, risks) = load_dataset(&config.edge_csv, &config.risk_csv)?;
    println!("Dataset: {} edge rows, {} risk rows", edges.len(), risks.len());

    let graph = GraphBuilder::with_edge_limit(config.edge_limit).build(&edges)?;
    let risk_map = RiskMap::from_table(&risks);
    let index = SideEffectIndex::from_table(&edges);
    let analyzer = SafetyAnalyzer::new(&graph, &risks, &risk_map, &index);
    println!(
        "Graph: {} nodes, {} edges",
        graph.node_count(),
        graph.edge_count()
    );

    if let Some((min, max)) = analyzer.risk_bounds() {
        let report = analyzer.risk_range(min, max);
        println!("\nRisk scores span [{min:.3}, {max:.3}] across {} drugs", report.count());
        println!("Highest risk:");
        for row in &report.top {
            println!("  {} ({:.3})", row.drug_name, row.risk_score);
        }
    }

    if let Some(drug) = risk_map.drugs().next() {
        if let Some(profile) = analyzer.drug_profile(drug) {
            println!("\nProfile: {}", serde_json::to_string_pretty(&profile)?);
        }
        println!("Reported frequencies for {drug}:");
        for (effect, freq) in analyzer.effect_frequencies(drug) {
            println!("  {effect}: {freq}");
        }
        let alternatives = analyzer.safer_alternatives(drug);
        println!("Safer alternatives for {drug}: {}", alternatives.len());
    }

    let ranker = CentralityRanker::new(config.centrality);
    println!("\nMost central drugs:");
    for ranked in ranker.top_nodes(&graph, NodeKind::Drug, 10) {
        println!("  {} ({:.4})", ranked.name, ranked.score);
    }
    println!("Most central side effects:");
    for ranked in ranker.top_nodes(&graph, NodeKind::SideEffect, 10) {
        println!("  {} ({:.4})", ranked.name, ranked.score);
    }

    // Optional: generate a hypothesis for the two highest-risk drugs when an
    // API key is available. Failure here must not take the dashboard down.
    if config.llm.resolve_api_key().is_some() {
        let top = analyzer
            .risk_bounds()
            .map(|(min, max)| analyzer.risk_range(min, max).top)
            .unwrap_or_default();
        if let [a, b, ..] = top.as_slice() {
            let context = analyzer.pairwise_overlap(&a.drug_name, &b.drug_name);
            let client = HypothesisClient::new(&config.llm)?;
            match client.generate(&context).await {
                Ok(text) => println!("\nGenerated hypotheses:\n{text}"),
                Err(err) => eprintln!("AI generation failed: {err}"),
            }
        }
    }

    Ok(())
}
