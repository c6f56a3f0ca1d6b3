use crate::config::OutputFormat;
use crate::domain::model::RouteResult;
use crate::utils::error::Result;
use std::fmt::Write;

pub fn render(result: &RouteResult, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(result)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
    }
}

/// 人類可讀的航路摘要
pub fn render_text(result: &RouteResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Route:    {}", result.route_string());
    let _ = writeln!(out, "Distance: {:.1} NM", result.distance);
    let _ = writeln!(out, "Nodes:");
    for node in &result.nodes_info {
        let frequency = node
            .frequency
            .map(|f| format!(" {:.2}", f))
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "  {:<8} {:>10.6} {:>11.6}{}",
            node.name, node.position.0, node.position.1, frequency
        );
    }
    let sids: Vec<&str> = result
        .sid
        .values()
        .flatten()
        .map(|p| p.name.as_str())
        .collect();
    let stars: Vec<&str> = result
        .star
        .values()
        .flatten()
        .map(|p| p.name.as_str())
        .collect();
    let _ = writeln!(out, "SIDs:     {}", sids.join(" "));
    let _ = write!(out, "STARs:    {}", stars.join(" "));
    out
}
