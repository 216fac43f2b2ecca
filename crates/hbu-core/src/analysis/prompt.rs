//! Prompt text for the chat-completions analyzer.

use hbu_common::Plot;
use hbu_report::format::{format_number, format_plain};

pub const SYSTEM_PROMPT: &str = "You are an expert real estate analyst providing HBU studies. \
Respond with detailed, professional analysis in JSON format. \
Each section should be 2-4 paragraphs of substantive content.";

const NOT_AVAILABLE: &str = "Not available";

/// The user prompt describing `plot`.
///
/// With `schema` set, the prompt asks for the enhanced shape and includes the
/// schema; otherwise it asks for the five narrative sections.
pub fn user_prompt(plot: &Plot, schema: Option<&serde_json::Value>) -> String {
    let market_value = plot
        .market_value
        .map(|v| format!("${}", format_number(v)))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());
    let owner = plot
        .owner_name
        .as_deref()
        .filter(|o| !o.is_empty())
        .unwrap_or(NOT_AVAILABLE);

    let mut prompt = format!(
        "You are a real estate analyst specializing in Highest and Best Use (HBU) studies. \
Analyze the following property and provide a comprehensive HBU analysis.\n\
\n\
Property Details:\n\
- Address: {address}\n\
- Parcel Number: {parcel}\n\
- Location: {lat}, {lon}\n\
- Lot Size: {size} acres\n\
- Current Zoning: {zoning}\n\
- Current Use: {current_use}\n\
- Estimated Market Value: {market_value}\n\
- Owner: {owner}\n\n",
        address = plot.address,
        parcel = plot.parcel_number,
        lat = format_plain(plot.latitude),
        lon = format_plain(plot.longitude),
        size = format_plain(plot.size),
        zoning = plot.zoning,
        current_use = plot.current_use,
    );

    match schema {
        Some(schema) => {
            let schema_text =
                serde_json::to_string_pretty(schema).unwrap_or_else(|_| schema.to_string());
            prompt.push_str(
                "Provide a detailed HBU analysis as a single JSON object matching this JSON schema \
(camelCase keys; monetary amounts in SAR; areas in square meters):\n\n",
            );
            prompt.push_str(&schema_text);
            prompt.push_str("\n\n");
        }
        None => prompt.push_str(
            "Provide a detailed HBU analysis in JSON format with the following sections:\n\
1. executiveSummary: A concise 2-3 paragraph summary of the property's highest and best use potential\n\
2. zoningAnalysis: Analysis of current zoning regulations, permitted uses, restrictions, and potential variances\n\
3. marketDemand: Assessment of current market conditions, demand drivers, comparable properties, and absorption rates\n\
4. financialFeasibility: Financial analysis including development costs, potential returns, cap rates, and investment considerations\n\
5. developmentRecommendations: Specific recommendations for optimal development, including phasing, design considerations, and risk factors\n\n",
        ),
    }

    prompt.push_str("Respond with JSON only.");
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use hbu_common::PlotId;

    fn plot() -> Plot {
        Plot {
            id: PlotId::from("plot-001"),
            address: "King Fahd Road, Al Olaya".to_string(),
            parcel_number: "RY-2024-00145".to_string(),
            latitude: 24.7136,
            longitude: 46.6753,
            size: 10117.0,
            zoning: "C-1 Commercial".to_string(),
            current_use: "Vacant Land".to_string(),
            market_value: Some(85_000_000.0),
            owner_name: None,
            boundaries: None,
        }
    }

    #[test]
    fn test_property_block() {
        let prompt = user_prompt(&plot(), None);
        assert!(prompt.contains("- Location: 24.7136, 46.6753\n"));
        assert!(prompt.contains("- Lot Size: 10117 acres\n"));
        assert!(prompt.contains("- Estimated Market Value: $85,000,000\n"));
        assert!(prompt.contains("- Owner: Not available\n"));
        assert!(prompt.contains("5. developmentRecommendations:"));
        assert!(prompt.ends_with("Respond with JSON only."));
    }

    #[test]
    fn test_missing_market_value() {
        let mut plot = plot();
        plot.market_value = None;
        plot.owner_name = Some("Olaya Holdings".to_string());
        let prompt = user_prompt(&plot, None);
        assert!(prompt.contains("- Estimated Market Value: Not available\n"));
        assert!(prompt.contains("- Owner: Olaya Holdings\n"));
    }

    #[test]
    fn test_schema_embedded() {
        let schema = hbu_common::analysis::enhanced_schema();
        let prompt = user_prompt(&plot(), Some(&schema));
        assert!(prompt.contains("\"executiveSummary\""));
        assert!(prompt.contains("\"financialSummary\""));
        assert!(!prompt.contains("5. developmentRecommendations:"));
    }
}
