//! Built-in tool implementations.
//!
//! These are local, self-contained capabilities: source-code structure
//! analysis, dataset analysis guidance, and chart recommendations. Network
//! tools (search, scraping) are not built in; declare them under their own
//! module and register a factory for it.

use super::{Tool, ToolFactory, ToolRegistry};
use crate::error::Result;
use serde_yaml::Value;
use std::collections::BTreeMap;

/// Module name the built-in factories are registered under.
pub const BUILTIN_MODULE: &str = "builtin";

/// Register every built-in factory on a registry.
pub(super) fn register(registry: &mut ToolRegistry) {
    let factories: [(&str, ToolFactory); 3] = [
        ("CodeAnalysisTool", |name, config| {
            Ok(Box::new(CodeAnalysisTool::new(name, config)))
        }),
        ("DataAnalysisTool", |name, _config| {
            Ok(Box::new(DataAnalysisTool::new(name)))
        }),
        ("ChartGenerationTool", |name, config| {
            Ok(Box::new(ChartGenerationTool::new(name, config)))
        }),
    ];
    for (class_name, factory) in factories {
        registry.register_factory(BUILTIN_MODULE, class_name, factory);
    }
}

fn usize_config(config: &BTreeMap<String, Value>, key: &str, default: usize) -> usize {
    config
        .get(key)
        .and_then(Value::as_u64)
        .map(|v| v as usize)
        .unwrap_or(default)
}

/// Analyzes source text for structure, comment density, and common patterns.
pub struct CodeAnalysisTool {
    name: String,
    max_findings: usize,
}

impl CodeAnalysisTool {
    pub fn new(name: &str, config: &BTreeMap<String, Value>) -> Self {
        Self {
            name: name.to_string(),
            max_findings: usize_config(config, "max_findings", 10),
        }
    }
}

const FUNCTION_KEYWORDS: &[&str] = &["function", "def ", "fn ", "func ", "method", "procedure"];
const TYPE_KEYWORDS: &[&str] = &["class ", "interface ", "struct ", "enum ", "trait "];
const CONTROL_KEYWORDS: &[&str] = &["if ", "else", "while ", "for ", "switch", "match ", "case "];

impl Tool for CodeAnalysisTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "Analyzes code for structure, comment density, and common patterns."
    }

    fn run(&mut self, input: &str) -> Result<String> {
        let lines: Vec<&str> = input.lines().collect();
        let non_empty = lines.iter().filter(|l| !l.trim().is_empty()).count();
        let comments = lines
            .iter()
            .filter(|l| {
                let t = l.trim_start();
                t.starts_with("//") || t.starts_with('#') || t.starts_with("/*") || t.starts_with('*')
            })
            .count();

        let count_keywords = |keywords: &[&str]| {
            lines
                .iter()
                .map(|line| {
                    let lower = line.to_lowercase();
                    keywords.iter().filter(|k| lower.contains(*k)).count()
                })
                .sum::<usize>()
        };

        let mut report = vec![
            "Code Structure Analysis".to_string(),
            format!("  Total lines: {}", lines.len()),
            format!("  Non-empty lines: {}", non_empty),
            format!("  Comment lines: {}", comments),
            format!("  Function definitions (approx.): {}", count_keywords(FUNCTION_KEYWORDS)),
            format!("  Type definitions (approx.): {}", count_keywords(TYPE_KEYWORDS)),
            format!("  Control-flow statements (approx.): {}", count_keywords(CONTROL_KEYWORDS)),
        ];

        let mut findings = Vec::new();
        if non_empty > 0 && comments * 20 < non_empty {
            findings.push("Low comment density; consider documenting the non-obvious parts".to_string());
        }
        for line in &lines {
            if line.len() > 120 {
                // Prefix by characters, not bytes, so multibyte text is safe.
                let prefix: String = line.chars().take(40).collect();
                findings.push(format!("Long line ({} chars): {}...", line.len(), prefix));
            }
        }
        findings.truncate(self.max_findings);

        if !findings.is_empty() {
            report.push("Potential issues:".to_string());
            for finding in findings {
                report.push(format!("  - {}", finding));
            }
        }

        Ok(report.join("\n"))
    }
}

/// Suggests analysis techniques for a described dataset.
///
/// The analysis type is inferred from keywords in the input description:
/// "statistical", "trend", or descriptive by default.
pub struct DataAnalysisTool {
    name: String,
}

impl DataAnalysisTool {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }

    fn recommendations(input: &str) -> (&'static str, &'static [&'static str]) {
        let lower = input.to_lowercase();
        if lower.contains("statistical") {
            (
                "statistical",
                &[
                    "Perform hypothesis testing",
                    "Calculate correlation coefficients",
                    "Conduct regression analysis",
                    "Generate confidence intervals",
                ],
            )
        } else if lower.contains("trend") || lower.contains("forecast") {
            (
                "trend",
                &[
                    "Identify seasonal patterns",
                    "Calculate growth rates and trends",
                    "Use moving averages for smoothing",
                    "Forecast future values with confidence intervals",
                ],
            )
        } else {
            (
                "descriptive",
                &[
                    "Calculate central tendency measures (mean, median, mode)",
                    "Determine variability measures (standard deviation, range)",
                    "Identify outliers and anomalies",
                    "Generate frequency distributions",
                ],
            )
        }
    }
}

impl Tool for DataAnalysisTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "Suggests analysis techniques and insights for a described dataset."
    }

    fn run(&mut self, input: &str) -> Result<String> {
        let (kind, recommendations) = Self::recommendations(input);
        let mut report = vec![
            "Data Analysis Report".to_string(),
            format!("  Data: {}", input),
            format!("  Analysis type: {}", kind),
            "Recommendations:".to_string(),
        ];
        for rec in recommendations {
            report.push(format!("  - {}", rec));
        }
        Ok(report.join("\n"))
    }
}

/// Recommends chart types for a described data shape and analysis goal.
pub struct ChartGenerationTool {
    name: String,
    max_charts: usize,
}

impl ChartGenerationTool {
    pub fn new(name: &str, config: &BTreeMap<String, Value>) -> Self {
        Self {
            name: name.to_string(),
            max_charts: usize_config(config, "max_charts", 6),
        }
    }
}

const CHART_RULES: &[(&str, &[&str])] = &[
    ("time", &["Line chart - trends over time", "Area chart - cumulative change"]),
    ("categor", &["Bar chart - compare categories", "Pie chart - proportions (few categories)"]),
    ("numer", &["Histogram - distribution", "Box plot - quartiles and outliers"]),
    ("comparison", &["Bar chart - direct comparison", "Radar chart - multi-dimensional comparison"]),
    ("correlation", &["Scatter plot - correlation", "Heatmap - correlation matrix"]),
    ("relationship", &["Scatter plot - relationships", "Bubble chart - three dimensions"]),
    ("distribution", &["Histogram - frequency distribution", "Violin plot - distribution shape"]),
];

impl Tool for ChartGenerationTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "Suggests chart types for a described data shape and analysis goal."
    }

    fn run(&mut self, input: &str) -> Result<String> {
        let lower = input.to_lowercase();
        let mut charts: Vec<&str> = Vec::new();
        for (keyword, suggestions) in CHART_RULES {
            if lower.contains(keyword) {
                for s in suggestions.iter().copied() {
                    if !charts.contains(&s) {
                        charts.push(s);
                    }
                }
            }
        }
        if charts.is_empty() {
            charts.push("Bar chart - general-purpose comparison");
            charts.push("Line chart - general-purpose trends");
        }
        charts.truncate(self.max_charts);

        let mut report = vec![
            "Chart Recommendations".to_string(),
            format!("  Request: {}", input),
            "Recommended chart types:".to_string(),
        ];
        for chart in charts {
            report.push(format!("  - {}", chart));
        }
        report.push("Tip: keep titles and labels clear; avoid chart junk.".to_string());
        Ok(report.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_config() -> BTreeMap<String, Value> {
        BTreeMap::new()
    }

    #[test]
    fn code_analysis_counts_structure() {
        let mut tool = CodeAnalysisTool::new("code_analysis", &no_config());
        let source = "// entry point\nfn main() {\n    if true {\n        println!(\"hi\");\n    }\n}\n";
        let report = tool.run(source).unwrap();
        assert!(report.contains("Total lines: 6"));
        assert!(report.contains("Comment lines: 1"));
        assert!(report.contains("Function definitions (approx.): 1"));
    }

    #[test]
    fn code_analysis_truncates_findings() {
        let mut config = BTreeMap::new();
        config.insert("max_findings".to_string(), Value::Number(1.into()));
        let mut tool = CodeAnalysisTool::new("code_analysis", &config);

        // Comment lines, so the comment-density finding does not fire and
        // the cap applies to the long-line findings alone.
        let long_line = format!("// {}", "x".repeat(130));
        let source = format!("{}\n{}\n{}", long_line, long_line, long_line);
        let report = tool.run(&source).unwrap();
        assert_eq!(report.matches("Long line").count(), 1);
    }

    #[test]
    fn code_analysis_handles_long_multibyte_lines() {
        let mut tool = CodeAnalysisTool::new("code_analysis", &no_config());
        let report = tool.run(&"界".repeat(80)).unwrap();
        assert!(report.contains("Long line (240 chars)"));
    }

    #[test]
    fn data_analysis_picks_type_from_keywords() {
        let mut tool = DataAnalysisTool::new("data_analysis");

        let report = tool.run("statistical review of quarterly sales").unwrap();
        assert!(report.contains("Analysis type: statistical"));
        assert!(report.contains("hypothesis testing"));

        let report = tool.run("forecast next month's traffic").unwrap();
        assert!(report.contains("Analysis type: trend"));

        let report = tool.run("summarize the survey responses").unwrap();
        assert!(report.contains("Analysis type: descriptive"));
    }

    #[test]
    fn chart_generation_matches_keywords_and_limits() {
        let mut config = BTreeMap::new();
        config.insert("max_charts".to_string(), Value::Number(2.into()));
        let mut tool = ChartGenerationTool::new("chart_generation", &config);

        let report = tool
            .run("time series with categorical breakdown, correlation goal")
            .unwrap();
        let chart_lines = report.lines().filter(|l| l.trim_start().starts_with("- ")).count();
        assert_eq!(chart_lines, 2);
    }

    #[test]
    fn chart_generation_falls_back_to_general_charts() {
        let mut tool = ChartGenerationTool::new("chart_generation", &no_config());
        let report = tool.run("something unusual").unwrap();
        assert!(report.contains("general-purpose"));
    }
}
