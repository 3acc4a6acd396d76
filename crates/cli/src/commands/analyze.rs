//! `careerpath analyze` — Run one quiz analysis from the terminal.

use std::path::PathBuf;

use careerpath_advisor::CareerAdvisor;
use careerpath_core::career::{CareerRecommendation, QUESTION_COUNT};

pub async fn run(
    answers: Vec<String>,
    file: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let answers = match file {
        Some(path) => {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
            parse_answers(&contents)
        }
        None => answers,
    };

    if answers.len() != QUESTION_COUNT {
        return Err(format!(
            "Expected {QUESTION_COUNT} answers, got {}",
            answers.len()
        )
        .into());
    }

    let config = super::load_config()?;
    super::require_api_key(&config)?;

    let provider = careerpath_providers::build_from_config(&config);
    let advisor = CareerAdvisor::from_config(provider, &config);

    let recommendation = advisor.analyze_quiz(answers).await?;
    print_recommendation(&recommendation);

    Ok(())
}

/// Accept either a JSON array of strings or one answer per non-blank line.
fn parse_answers(contents: &str) -> Vec<String> {
    if let Ok(list) = serde_json::from_str::<Vec<String>>(contents) {
        return list;
    }
    contents
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect()
}

fn print_recommendation(rec: &CareerRecommendation) {
    println!("\nRekomendasi: {}", rec.career_path);
    if let Some(score) = rec.confidence_score() {
        println!("Confidence:  {score}%");
    }

    for (title, value) in [
        ("Alasan", rec.reasons.as_ref()),
        ("Learning path", rec.learning_path.as_ref()),
        ("Skills", rec.skills.as_ref()),
        ("Resources", rec.resources.as_ref()),
    ] {
        let items = CareerRecommendation::items(value);
        if items.is_empty() {
            continue;
        }
        println!("\n{title}:");
        for item in items {
            println!("  - {item}");
        }
    }
    println!();
}
