//! Algorithm design, implementation, evaluation, and refinement.

use std::sync::Arc;

use papermill_core::Result;
use papermill_core::report::{
    AlgorithmDesign, Evaluation, Implementation, Refinement, ResearchDirection,
};
use papermill_core::request::PaperRecord;
use papermill_core::stages::{GenerationOptions, TextGenerator};

use crate::text::excerpt;

/// Papers summarized in the design prompt.
const DESIGN_PAPER_LIMIT: usize = 5;
/// Abstract excerpt length in the design prompt.
const ABSTRACT_EXCERPT_CHARS: usize = 200;

const IMPLEMENTATION_LANGUAGE: &str = "python";

/// Designs and implements algorithms from a research direction.
pub struct AlgorithmDeveloper {
    model: Arc<dyn TextGenerator>,
}

impl AlgorithmDeveloper {
    pub fn new(model: Arc<dyn TextGenerator>) -> Self {
        Self { model }
    }

    /// Design a novel algorithm addressing the research direction.
    pub async fn design_algorithm(
        &self,
        direction: &ResearchDirection,
        papers: &[PaperRecord],
    ) -> Result<AlgorithmDesign> {
        let papers_context = papers
            .iter()
            .take(DESIGN_PAPER_LIMIT)
            .map(|paper| {
                format!(
                    "- {}: {}...",
                    paper.title,
                    excerpt(&paper.abstract_text, ABSTRACT_EXCERPT_CHARS)
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        let prompt = format!(
            "Based on this research direction:\n\n\
             {}\n\n\
             And considering these relevant papers:\n\n\
             {papers_context}\n\n\
             Design a novel algorithm that addresses the research question. Include:\n\
             1. A high-level description of the algorithm\n\
             2. The key innovations or improvements over existing approaches\n\
             3. Pseudocode for the core components\n\
             4. Expected inputs and outputs\n\
             5. Theoretical advantages and limitations\n\n\
             Format your response as a structured algorithm design document.",
            direction.direction
        );

        let design_document = self
            .model
            .generate(&prompt, &GenerationOptions::with_temperature(0.4))
            .await?;
        Ok(AlgorithmDesign { design_document })
    }

    /// Implement the designed algorithm in code.
    pub async fn implement_algorithm(&self, design: &AlgorithmDesign) -> Result<Implementation> {
        let prompt = format!(
            "Based on this algorithm design:\n\n\
             {}\n\n\
             Please implement the algorithm in Python code. The implementation should:\n\
             1. Be well-structured and follow best practices\n\
             2. Include comprehensive comments explaining the code\n\
             3. Handle edge cases appropriately\n\
             4. Be efficient and scalable\n\
             5. Include any necessary helper functions\n\n\
             Format your response as Python code with appropriate documentation.",
            design.design_document
        );

        let code = self
            .model
            .generate(&prompt, &GenerationOptions::with_temperature(0.2))
            .await?;
        Ok(Implementation {
            code,
            language: IMPLEMENTATION_LANGUAGE.to_string(),
        })
    }

    /// Evaluate the implemented algorithm.
    pub async fn evaluate_algorithm(&self, implementation: &Implementation) -> Result<Evaluation> {
        let prompt = format!(
            "Evaluate this algorithm implementation:\n\n\
             ```python\n{}\n```\n\n\
             Please provide:\n\
             1. A theoretical analysis of time and space complexity\n\
             2. Potential performance bottlenecks\n\
             3. Edge cases that might cause issues\n\
             4. Suggestions for testing methodology\n\
             5. Ideas for benchmarking against existing approaches\n\n\
             Format your response as a structured evaluation report.",
            implementation.code
        );

        let evaluation_report = self
            .model
            .generate(&prompt, &GenerationOptions::with_temperature(0.3))
            .await?;
        Ok(Evaluation { evaluation_report })
    }

    /// Refine the implementation using the evaluation feedback.
    pub async fn refine_algorithm(
        &self,
        implementation: &Implementation,
        evaluation: &Evaluation,
    ) -> Result<Refinement> {
        let prompt = format!(
            "Based on this algorithm implementation:\n\n\
             ```python\n{}\n```\n\n\
             And this evaluation report:\n\n\
             {}\n\n\
             Please refine the algorithm to address the identified issues. Provide:\n\
             1. The improved code implementation\n\
             2. A summary of changes made\n\
             3. Expected improvements in performance or robustness\n\n\
             Format your response with the improved Python code followed by the explanation.",
            implementation.code, evaluation.evaluation_report
        );

        let refined_code = self
            .model
            .generate(&prompt, &GenerationOptions::with_temperature(0.2))
            .await?;

        // TODO: split the model response into code and explanation sections
        Ok(Refinement {
            refined_code,
            explanation: "See code comments for details on improvements.".to_string(),
            language: IMPLEMENTATION_LANGUAGE.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct RecordingModel {
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl TextGenerator for RecordingModel {
        async fn generate(&self, prompt: &str, _options: &GenerationOptions) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok("model output".to_string())
        }
    }

    fn developer() -> (Arc<RecordingModel>, AlgorithmDeveloper) {
        let model = Arc::new(RecordingModel {
            prompts: Mutex::new(vec![]),
        });
        (model.clone(), AlgorithmDeveloper::new(model))
    }

    #[tokio::test]
    async fn design_prompt_truncates_abstracts() {
        let (model, developer) = developer();
        let direction = ResearchDirection {
            direction: "a direction".to_string(),
            focus: "general".to_string(),
        };
        let papers = vec![PaperRecord {
            title: "Long One".to_string(),
            authors: None,
            abstract_text: "x".repeat(1000),
            year: None,
            url: None,
            source: "arXiv".to_string(),
            enriched_metadata: None,
        }];

        developer.design_algorithm(&direction, &papers).await.unwrap();
        let prompts = model.prompts.lock().unwrap();
        assert!(prompts[0].contains("a direction"));
        assert!(prompts[0].contains(&"x".repeat(ABSTRACT_EXCERPT_CHARS)));
        assert!(!prompts[0].contains(&"x".repeat(ABSTRACT_EXCERPT_CHARS + 1)));
    }

    #[tokio::test]
    async fn implementation_is_python() {
        let (_model, developer) = developer();
        let implementation = developer
            .implement_algorithm(&AlgorithmDesign {
                design_document: "design".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(implementation.language, "python");
        assert_eq!(implementation.code, "model output");
    }

    #[tokio::test]
    async fn refinement_feeds_code_and_evaluation_back() {
        let (model, developer) = developer();
        let implementation = Implementation {
            code: "def f(): pass".to_string(),
            language: "python".to_string(),
        };
        let evaluation = Evaluation {
            evaluation_report: "too slow".to_string(),
        };

        let refinement = developer
            .refine_algorithm(&implementation, &evaluation)
            .await
            .unwrap();
        assert_eq!(refinement.refined_code, "model output");
        let prompts = model.prompts.lock().unwrap();
        assert!(prompts[0].contains("def f(): pass"));
        assert!(prompts[0].contains("too slow"));
    }
}
