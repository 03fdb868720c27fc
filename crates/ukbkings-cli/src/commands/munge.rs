//! Munge command - build the field-finder table from a basket's HTML.

use std::path::PathBuf;

use colored::Colorize;
use ukbkings::{AnomalyKind, Munger, MungerConfig, SourceEncoding};

pub fn run(
    html: PathBuf,
    basket: String,
    out_dir: PathBuf,
    json: bool,
    utf8: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let encoding = if utf8 {
        SourceEncoding::Utf8
    } else {
        SourceEncoding::Latin1
    };
    let munger = Munger::with_config(MungerConfig::default().with_encoding(encoding));

    let result = munger.munge(&html, &basket, &out_dir)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result.summary)?);
        return Ok(());
    }

    let summary = &result.summary;
    println!(
        "{} {} fields from {}",
        "Munged".cyan().bold(),
        summary.total_fields.to_string().white().bold(),
        result.source.file.white()
    );

    let types: Vec<String> = summary
        .by_semantic_type
        .iter()
        .map(|(t, n)| format!("{} {}", n, t))
        .collect();
    println!("  Types: {}", types.join(", "));
    println!("  Coded fields: {}", summary.coded_fields);

    if summary.unclassified_fields > 0 {
        println!(
            "  {} {} fields with an unknown type",
            "Warning:".yellow().bold(),
            summary.unclassified_fields
        );
        for anomaly in result
            .anomalies
            .iter()
            .filter(|a| a.kind == AnomalyKind::UnclassifiedType)
        {
            println!(
                "    {:12} {}",
                anomaly.field.as_deref().unwrap_or("NA"),
                anomaly.message
            );
        }
    }

    if summary.duplicate_names > 0 {
        println!(
            "  {} {} names prefixed with 'duplicate_'",
            "Warning:".yellow().bold(),
            summary.duplicate_names
        );
    }

    println!();
    println!(
        "{} {}",
        "Field-to-name table written to".green().bold(),
        result.output.display().to_string().white()
    );

    Ok(())
}
