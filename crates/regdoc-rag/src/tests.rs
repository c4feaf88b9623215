//! Pipeline tests: PDF on disk to rendered answer

#[cfg(test)]
mod pipeline_tests {
    use crate::test_support::{ScriptedLlm, write_pdf};
    use crate::{
        HashEmbedder, IndexBuilder, IndexOutcome, RAGEngine, RagConfig, RetrievalQa,
    };
    use insta::assert_snapshot;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_pdf_to_rendered_answer() {
        let dir = tempfile::tempdir().unwrap();
        let config = RagConfig {
            pdf_path: dir.path().join("regulations.pdf"),
            index_dir: dir.path().join("index"),
            top_k: 2,
            ..RagConfig::default()
        };
        write_pdf(
            &config.pdf_path,
            &[
                "Admission requires a secondary school certificate",
                "Tuition fees are paid at the start of every semester",
                "Graduation requires completing all credit hours",
            ],
        );

        let embedder = Arc::new(HashEmbedder::new(256));
        let (index, outcome) = IndexBuilder::new(config.clone(), embedder.clone())
            .build_or_load()
            .await
            .unwrap();
        assert_eq!(outcome, IndexOutcome::Built { entries: 3 });

        let qa = RetrievalQa::new(embedder, Arc::new(index), Arc::new(ScriptedLlm::new()))
            .with_top_k(config.top_k);
        let answer = qa
            .answer("When are tuition fees paid each semester?")
            .await
            .unwrap();

        let rendered = answer
            .render()
            .replace(&config.pdf_path.display().to_string(), "regulations.pdf");

        assert_eq!(answer.citations[0].page, 1);
        assert_snapshot!(rendered.lines().take(4).collect::<Vec<_>>().join("\n"), @r"
        Scripted answer

        📚 Sources:
          • regulations.pdf | page 1
        ");
        assert_eq!(answer.citations.len(), 2);
    }

    #[tokio::test]
    async fn test_rebuilt_index_keeps_serving_after_restart() {
        let dir = tempfile::tempdir().unwrap();
        let config = RagConfig {
            pdf_path: dir.path().join("regulations.pdf"),
            index_dir: dir.path().join("index"),
            ..RagConfig::default()
        };
        write_pdf(&config.pdf_path, &["Exams are held at the end of each semester"]);

        let embedder = Arc::new(HashEmbedder::new(128));
        IndexBuilder::new(config.clone(), embedder.clone())
            .build_or_load()
            .await
            .unwrap();

        // A fresh builder stands in for a process restart
        let (index, outcome) = IndexBuilder::new(config, embedder.clone())
            .build_or_load()
            .await
            .unwrap();
        assert_eq!(outcome, IndexOutcome::Reused { entries: 1 });

        let qa = RetrievalQa::new(embedder, Arc::new(index), Arc::new(ScriptedLlm::new()));
        let answer = qa.answer("When are exams held?").await.unwrap();
        assert_eq!(answer.citations.len(), 1);
    }
}
