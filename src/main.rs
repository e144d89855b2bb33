use anyhow::Context;
use dirgraph::graph::{edge, labels, weighted, AdjacencyForm, DirectedGraph, LabelMap, NodeId};
use dirgraph::{load_graph, SaveOptions};

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    println!("Dirgraph v{}", dirgraph::version());
    println!("==========================================");
    println!();

    let mut graph = demo_build()?;
    demo_adjacency(&graph)?;
    demo_persistence(&mut graph)?;
    demo_shortest_path(&graph);

    Ok(())
}

fn demo_build() -> anyhow::Result<DirectedGraph> {
    println!("=== Demo 1: Building a graph ===");
    let mut graph = DirectedGraph::new("graph_1", 1.0);

    graph.auto_add_nodes(12, &LabelMap::new());
    graph.add_edges(
        &[edge(2, 4), edge(7, 4), edge(11, 4), edge(4, 8), edge(8, 9), edge(9, 11)],
        &LabelMap::new(),
    )?;
    graph.add_edges(&[edge(1, 5), edge(7, 8), edge(8, 9)], &weighted(4.0))?;
    graph.add_edges(&[edge(1, 11), edge(8, 1)], &weighted(0.5))?;
    graph.add_node_labels(NodeId::new(0), &labels([("name", "Giovanni")]))?;
    graph.add_edges(&[edge(11, 1)], &labels([("length", "20"), ("colour", "orange")]))?;

    let (nodes, edges) = graph.size();
    println!("✓ {} nodes, {} edges", nodes, edges);
    for (key, edge_labels) in graph.get_edges_labels(&graph.get_edges()) {
        if let Some(edge_labels) = edge_labels {
            let rendered: Vec<String> =
                edge_labels.iter().map(|(k, v)| format!("{}: {}", k, v)).collect();
            println!("  ({}, {}) {{{}}}", key.0.as_u64(), key.1.as_u64(), rendered.join(", "));
        }
    }

    let mut copy = graph.copy();
    copy.set_name("graph_copy");
    copy.rmv_nodes(&[NodeId::new(4)])?;
    println!(
        "✓ Copy without node 4 has {} edges, original still has {}",
        copy.edge_count(),
        graph.edge_count()
    );
    println!();
    Ok(graph)
}

fn demo_adjacency(graph: &DirectedGraph) -> anyhow::Result<()> {
    println!("=== Demo 2: Adjacency matrix ===");
    let sparse = graph.compute_adjacency(AdjacencyForm::Sparse)?;
    let (rows, cols) = sparse.shape();
    println!("✓ {}x{} matrix, {} non-zero cells", rows, cols, sparse.nonzero().len());
    println!();
    Ok(())
}

fn demo_persistence(graph: &mut DirectedGraph) -> anyhow::Result<()> {
    println!("=== Demo 3: Save and import ===");
    let mut other = DirectedGraph::new("graph_2", 1.0);
    other.auto_add_nodes(4, &LabelMap::new());
    other.add_edges(&[edge(2, 1), edge(1, 3)], &weighted(2.0))?;
    other.add_node_labels(NodeId::new(0), &labels([("name", "Alessia")]))?;
    other.add_edges(&[edge(0, 1)], &labels([("length", "10"), ("colour", "blue")]))?;

    let options = SaveOptions::in_directory(std::env::temp_dir().join("dirgraph-demo"));
    let dir = other.save(&options).context("saving graph_2")?;
    println!("✓ Saved {} to {}", other.name(), dir.display());

    let remap = graph.add_from_files(&dir).context("importing graph_2")?;
    let imported: Vec<String> = remap
        .iter()
        .map(|(stored, new)| format!("{}->{}", stored.as_u64(), new.as_u64()))
        .collect();
    println!("✓ Imported into {} as [{}]", graph.name(), imported.join(", "));
    graph.add_edges(&[edge(15, 7), edge(12, 1)], &weighted(1.5))?;

    let loaded = load_graph(&dir).context("loading graph_2")?;
    println!("✓ Loaded {} with {} nodes", loaded.name(), loaded.node_count());
    println!();
    Ok(())
}

fn demo_shortest_path(graph: &DirectedGraph) {
    println!("=== Demo 4: Shortest path ===");
    match graph.min_path(NodeId::new(14), NodeId::new(5)) {
        Ok(result) => {
            let path: Vec<u64> = result.path.iter().map(|id| id.as_u64()).collect();
            println!("✓ Path {:?} with step weights {:?}", path, result.weights);
        }
        Err(e) => println!("✗ No path: {}", e),
    }
}
