//! Literature collection.

use std::collections::HashSet;
use std::sync::Arc;

use papermill_core::Result;
use papermill_core::request::{PaperRecord, PaperRef};
use papermill_core::stages::{GenerationOptions, LiteratureSource, TextGenerator};
use tracing::warn;

/// Papers fetched per search query.
const MAX_RESULTS_PER_QUERY: usize = 20;

/// Collects relevant research papers from seed references and the
/// literature source, then enriches them with model-generated metadata.
pub struct LiteratureCollector {
    model: Arc<dyn TextGenerator>,
    source: Arc<dyn LiteratureSource>,
}

impl LiteratureCollector {
    pub fn new(model: Arc<dyn TextGenerator>, source: Arc<dyn LiteratureSource>) -> Self {
        Self { model, source }
    }

    /// Gather relevant papers for a domain, optionally guided by seeds.
    pub async fn gather_papers(
        &self,
        domain: &str,
        seed_papers: &[PaperRef],
    ) -> Result<Vec<PaperRecord>> {
        let mut collected: Vec<PaperRecord> = seed_papers
            .iter()
            .cloned()
            .map(PaperRecord::from)
            .collect();

        let queries = self.search_queries(domain, seed_papers).await?;
        collected.extend(self.source.search(&queries, MAX_RESULTS_PER_QUERY).await?);

        let unique = dedupe_by_title(collected);
        Ok(self.enrich_papers(unique).await)
    }

    /// Search queries for the domain; model-generated when seeds give it
    /// something to work from, a fixed fan-out otherwise.
    async fn search_queries(&self, domain: &str, seed_papers: &[PaperRef]) -> Result<Vec<String>> {
        if seed_papers.is_empty() {
            return Ok(vec![
                domain.to_string(),
                format!("{domain} recent advances"),
                format!("{domain} state of the art"),
            ]);
        }

        let seed_titles = seed_papers
            .iter()
            .take(5)
            .map(|paper| format!("- {}", paper.title))
            .collect::<Vec<_>>()
            .join("\n");

        let prompt = format!(
            "Based on the research domain \"{domain}\" and these seed papers:\n\n\
             {seed_titles}\n\n\
             Generate 5 specific search queries that would help find the most \
             relevant and recent papers in this field.\n\
             Each query should be sophisticated enough for academic search engines.\n\
             Return only the list of search queries, one per line."
        );

        let response = self
            .model
            .generate(&prompt, &GenerationOptions::with_temperature(0.3))
            .await?;

        let mut queries: Vec<String> = response
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect();
        queries.push(domain.to_string());
        Ok(queries)
    }

    /// Attach a short model-generated topical summary to each paper that has
    /// an abstract. Enrichment failures keep the bare record.
    async fn enrich_papers(&self, papers: Vec<PaperRecord>) -> Vec<PaperRecord> {
        let mut enriched = Vec::with_capacity(papers.len());
        for mut paper in papers {
            if paper.title.is_empty() {
                continue;
            }
            if !paper.abstract_text.is_empty() {
                let prompt = format!(
                    "Based on this paper:\n\
                     Title: {}\n\
                     Abstract: {}\n\n\
                     Provide the following in JSON format:\n\
                     1. A list of 3-5 key topics covered\n\
                     2. The main research contribution\n\
                     3. Potential applications\n\
                     Keep each response very brief.",
                    paper.title, paper.abstract_text
                );
                match self
                    .model
                    .generate(&prompt, &GenerationOptions::with_temperature(0.3))
                    .await
                {
                    Ok(metadata) => paper.enriched_metadata = Some(metadata),
                    Err(e) => {
                        warn!(paper = %paper.title, error = %e, "paper enrichment failed")
                    }
                }
            }
            enriched.push(paper);
        }
        enriched
    }
}

/// Drop papers whose (case-insensitive) title was already seen.
fn dedupe_by_title(papers: Vec<PaperRecord>) -> Vec<PaperRecord> {
    let mut seen_titles = HashSet::new();
    papers
        .into_iter()
        .filter(|paper| {
            let title = paper.title.to_lowercase();
            !title.is_empty() && seen_titles.insert(title)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use papermill_core::Error;

    struct ScriptedModel {
        response: String,
        fail: bool,
    }

    #[async_trait]
    impl TextGenerator for ScriptedModel {
        async fn generate(&self, _prompt: &str, _options: &GenerationOptions) -> Result<String> {
            if self.fail {
                return Err(Error::Generation("quota exhausted".to_string()));
            }
            Ok(self.response.clone())
        }
    }

    struct EmptySource;

    #[async_trait]
    impl LiteratureSource for EmptySource {
        async fn search(
            &self,
            _queries: &[String],
            _max_results: usize,
        ) -> Result<Vec<PaperRecord>> {
            Ok(vec![])
        }
    }

    fn record(title: &str) -> PaperRecord {
        PaperRecord {
            title: title.to_string(),
            authors: None,
            abstract_text: "An abstract.".to_string(),
            year: None,
            url: None,
            source: "arXiv".to_string(),
            enriched_metadata: None,
        }
    }

    fn collector(model: ScriptedModel) -> LiteratureCollector {
        LiteratureCollector::new(Arc::new(model), Arc::new(EmptySource))
    }

    #[tokio::test]
    async fn no_seeds_fall_back_to_domain_queries() {
        let c = collector(ScriptedModel {
            response: String::new(),
            fail: false,
        });
        let queries = c.search_queries("graph neural networks", &[]).await.unwrap();
        assert_eq!(queries.len(), 3);
        assert_eq!(queries[0], "graph neural networks");
        assert!(queries[1].contains("recent advances"));
    }

    #[tokio::test]
    async fn seeded_queries_come_from_the_model_plus_domain() {
        let c = collector(ScriptedModel {
            response: "query one\n\nquery two\n".to_string(),
            fail: false,
        });
        let seeds = vec![PaperRef {
            title: "Attention Is All You Need".to_string(),
            url: None,
            authors: None,
            year: None,
        }];
        let queries = c.search_queries("transformers", &seeds).await.unwrap();
        assert_eq!(queries, vec!["query one", "query two", "transformers"]);
    }

    #[tokio::test]
    async fn enrichment_failure_keeps_the_record() {
        let c = collector(ScriptedModel {
            response: String::new(),
            fail: true,
        });
        let enriched = c.enrich_papers(vec![record("A Paper")]).await;
        assert_eq!(enriched.len(), 1);
        assert!(enriched[0].enriched_metadata.is_none());
    }

    #[test]
    fn dedupe_is_case_insensitive_on_title() {
        let deduped = dedupe_by_title(vec![
            record("A Paper"),
            record("a paper"),
            record("Another Paper"),
            record(""),
        ]);
        let titles: Vec<_> = deduped.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["A Paper", "Another Paper"]);
    }
}
