//! Console output for schemas and run summaries

use crate::dispatch::RunStats;
use crate::schema::FormSchema;

/// Options listed before the rest are collapsed into a count
const OPTIONS_SHOWN: usize = 3;

/// Question text is cut to this many characters in the table
const TEXT_WIDTH: usize = 48;

/// Prints the extracted schema as a table
///
/// # Arguments
///
/// * `schema` - The schema to display
pub fn print_schema(schema: &FormSchema) {
    println!("=== Form Schema ===\n");
    println!("Form: {}", schema.url);
    println!("Submits to: {}", schema.submission_url);
    println!(
        "Questions: {}, hidden fields: {}",
        schema.len(),
        schema.hidden_fields.len()
    );
    println!();

    if schema.is_empty() {
        println!("  (no answerable questions found)");
        return;
    }

    println!(
        "  {:>3}  {:<16} {:<14} {:<w$}  Options",
        "#",
        "Id",
        "Type",
        "Question",
        w = TEXT_WIDTH
    );
    for (index, question) in schema.questions.iter().enumerate() {
        let required = if question.required { "" } else { " (optional)" };
        println!(
            "  {:>3}  {:<16} {:<14} {:<w$}  {}{}",
            index + 1,
            question.id,
            question.kind.label(),
            truncate(&question.text, TEXT_WIDTH),
            summarize_options(&question.options),
            required,
            w = TEXT_WIDTH
        );
    }
    println!();
}

/// Prints final or partial run counters
///
/// # Arguments
///
/// * `requested` - Submissions asked for
/// * `stats` - Counters recorded so far
pub fn print_summary(requested: u64, stats: &RunStats) {
    println!("=== Submission Summary ===\n");
    println!("  Requested: {}", requested);
    println!("  Succeeded: {}", stats.success);
    println!("  Failed: {}", stats.failed);
    println!("  Retries: {}", stats.retries);
    println!("  Success rate: {:.1}%", stats.success_rate());

    let unfinished = requested.saturating_sub(stats.completed());
    if unfinished > 0 {
        println!("  Not completed: {}", unfinished);
    }

    if !stats.reasons.is_empty() {
        println!("\nFailure Reasons:");
        let mut reasons: Vec<_> = stats.reasons.iter().collect();
        reasons.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        for (reason, count) in reasons {
            println!("  {}: {}", reason, count);
        }
    }
    println!();
}

/// First few options, then `(+N more)`
fn summarize_options(options: &[String]) -> String {
    if options.is_empty() {
        return "-".to_string();
    }

    let shown = options
        .iter()
        .take(OPTIONS_SHOWN)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    if options.len() > OPTIONS_SHOWN {
        format!("{} (+{} more)", shown, options.len() - OPTIONS_SHOWN)
    } else {
        shown
    }
}

fn truncate(text: &str, width: usize) -> String {
    let single_line = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if single_line.chars().count() <= width {
        single_line
    } else {
        let cut: String = single_line.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}
