use crate::cli::InspectArgs;
use crate::error::{CliError, Result};
use ssc::core::io::result::{ClusterRecord, ResultDocument};
use std::fmt::Write;
use tracing::info;

pub fn run(args: InspectArgs) -> Result<()> {
    info!("Reading grouping result from {:?}", &args.result);
    let document =
        ResultDocument::read_from_path(&args.result).map_err(|e| CliError::FileParsing {
            path: args.result.clone(),
            source: e.into(),
        })?;
    print!("{}", summarize(&document));
    Ok(())
}

fn describe(cluster: &ClusterRecord) -> String {
    let stds = cluster
        .stds
        .iter()
        .map(|(label, std)| format!("{}={:.4}", label, std))
        .collect::<Vec<_>>()
        .join(" ");
    let name = if cluster.label < 0 {
        "Noise".to_string()
    } else {
        format!("Cluster {}", cluster.label)
    };
    format!("{:<12} {:>4} peak(s)  stds: {}", name, cluster.peaks.len(), stds)
}

/// One line per cluster followed by a totals line.
pub fn summarize(document: &ResultDocument) -> String {
    let mut out = String::new();
    for cluster in &document.clusters {
        let _ = writeln!(out, "{}", describe(cluster));
    }
    let (noise, clustered): (Vec<_>, Vec<_>) =
        document.clusters.iter().partition(|c| c.label < 0);
    let _ = writeln!(
        out,
        "{} spin system(s), {} clustered peak(s), {} unclustered peak(s)",
        clustered.len(),
        clustered.iter().map(|c| c.peaks.len()).sum::<usize>(),
        noise.iter().map(|c| c.peaks.len()).sum::<usize>()
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const DOCUMENT: &str = r#"[
    {"label": 1, "peaks": [
        {"dimensions": [8.1, 120.0], "assignment": ["?", "?"], "index": 0},
        {"dimensions": [8.11, 120.05], "assignment": ["?", "?"], "index": 1}
    ], "stds": {"HN": 0.01, "N": 0.05}},
    {"label": -1, "peaks": [
        {"dimensions": [6.5, 99.0], "assignment": ["?", "?"], "index": 0}
    ], "stds": {"HN": 0.01, "N": 0.05}}
]"#;

    #[test]
    fn summary_lists_clusters_and_totals() {
        let document = ResultDocument::read_from(DOCUMENT.as_bytes()).unwrap();
        let summary = summarize(&document);
        let lines: Vec<&str> = summary.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Cluster 1"));
        assert!(lines[0].contains("HN=0.0100 N=0.0500"));
        assert!(lines[1].starts_with("Noise"));
        assert_eq!(
            lines[2],
            "1 spin system(s), 2 clustered peak(s), 1 unclustered peak(s)"
        );
    }

    #[test]
    fn malformed_document_is_reported_as_parsing_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, r#"{"label": 1}"#).unwrap();

        let result = run(InspectArgs { result: path });
        assert!(matches!(result, Err(CliError::FileParsing { .. })));
    }
}
