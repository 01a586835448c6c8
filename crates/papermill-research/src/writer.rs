//! Research paper generation.

use std::sync::Arc;

use papermill_core::Result;
use papermill_core::report::{
    AlgorithmDesign, Evaluation, Paper, Refinement, ResearchDirection,
};
use papermill_core::request::PaperRecord;
use papermill_core::stages::{GenerationOptions, TextGenerator};

use crate::text::excerpt;

/// Reference papers cited in the generated paper.
const REFERENCE_LIMIT: usize = 20;
/// Excerpt length for the direction/design/evaluation sections of the prompt.
const SECTION_EXCERPT_CHARS: usize = 1500;

/// Generates a complete research paper from the pipeline's outputs.
pub struct PaperWriter {
    model: Arc<dyn TextGenerator>,
}

impl PaperWriter {
    pub fn new(model: Arc<dyn TextGenerator>) -> Self {
        Self { model }
    }

    pub async fn generate_paper(
        &self,
        direction: &ResearchDirection,
        design: &AlgorithmDesign,
        implementation: &Refinement,
        evaluation: &Evaluation,
        reference_papers: &[PaperRecord],
    ) -> Result<Paper> {
        let references_text = reference_papers
            .iter()
            .take(REFERENCE_LIMIT)
            .enumerate()
            .map(|(i, paper)| {
                format!(
                    "[{}] {}. \"{}\". {}. {}. {}",
                    i + 1,
                    paper.authors.as_deref().unwrap_or("Unknown"),
                    paper.title,
                    paper.year.map(|y| y.to_string()).unwrap_or_default(),
                    paper.source,
                    paper.url.as_deref().unwrap_or(""),
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        let prompt = format!(
            "Generate a complete academic research paper based on the following components:\n\n\
             1. Research Direction:\n{direction_text}...\n\n\
             2. Algorithm Design:\n{design_text}...\n\n\
             3. Implementation Details:\n```python\n{code}\n```\n\n\
             4. Evaluation Results:\n{evaluation_text}...\n\n\
             The paper should follow standard IEEE academic structure:\n\
             - Title\n\
             - Abstract\n\
             - Introduction\n\
             - Related Work\n\
             - Methodology\n\
             - Implementation\n\
             - Evaluation\n\
             - Results and Discussion\n\
             - Conclusion\n\
             - References\n\n\
             For the references section, use the following format:\n\n\
             ## References\n\n\
             {references_text}\n\n\
             IMPORTANT GUIDELINES:\n\
             1. Format the paper in a clean, professional academic style with proper \
             sections and subsections\n\
             2. Do not invent any references - use only the references provided above\n\
             3. Include the complete algorithm implementation in the Implementation section\n\
             4. Do not leave placeholder text anywhere - write complete content for every \
             section\n\
             5. For the implementation section, include the full algorithm code, not just \
             snippets",
            direction_text = excerpt(&direction.direction, SECTION_EXCERPT_CHARS),
            design_text = excerpt(&design.design_document, SECTION_EXCERPT_CHARS),
            code = implementation.refined_code,
            evaluation_text = excerpt(&evaluation.evaluation_report, SECTION_EXCERPT_CHARS),
        );

        let content = self
            .model
            .generate(
                &prompt,
                &GenerationOptions {
                    system_prompt: None,
                    temperature: 0.4,
                    max_tokens: 9000,
                },
            )
            .await?;

        // a separate, tightly-bounded prompt gives a much better title than
        // asking for one inline
        let title_prompt = format!(
            "Based on this abstract and introduction:\n\n\
             {}\n\n\
             Generate a SINGLE concise, descriptive title for this research paper \
             following IEEE conference paper style.\n\
             DO NOT provide multiple options or alternatives.\n\
             The title should be no more than 15 words and should clearly communicate \
             the main contribution.",
            excerpt(&content, 1000)
        );
        let title = self
            .model
            .generate(
                &title_prompt,
                &GenerationOptions {
                    system_prompt: None,
                    temperature: 0.3,
                    max_tokens: 50,
                },
            )
            .await?;

        Ok(Paper {
            title: clean_title(&title),
            content,
            references: reference_papers.len(),
        })
    }
}

/// First line of the model's title response, with any "Title:"-style prefix
/// stripped.
fn clean_title(raw: &str) -> String {
    let title = raw.trim().lines().next().unwrap_or("").trim();
    match title.split_once(':') {
        Some((_, rest)) if !title.starts_with("http") => rest.trim().to_string(),
        _ => title.to_string(),
    }
}
