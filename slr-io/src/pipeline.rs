use log::info;

use slr_core::config::id_range_end;
use slr_core::encoding::Encoding;
use slr_core::errors::Result;
use slr_core::generator::SparseVectorGenerator;
use slr_core::models::EncodedDocument;
use slr_core::random::RandomSource;

use crate::utils::{document_progress, refresh_due};
use crate::writer::DocumentSink;

/// `"{prefix}{i}"` for `i` in `start..start + count`.
pub fn synthesize_ids(prefix: &str, start: usize, count: usize) -> Result<impl Iterator<Item = String> + '_> {
    let end = id_range_end(start, count)?;
    Ok((start..end).map(move |i| format!("{}{}", prefix, i)))
}

///
/// Generate, encode and write one vector per identifier.
///
/// Returns the number of documents handed to `sink`. The sink is not
/// finished; the caller owns that step.
///
/// # Arguments
///
/// - ids: document identifiers, in output order
/// - generator: validated vector generator
/// - encoding: text projection for each vector
/// - sink: destination for the encoded documents
/// - total: expected number of identifiers, for progress reporting
///
pub fn generate_documents<I, S, W>(
    ids: I,
    generator: &mut SparseVectorGenerator<S>,
    encoding: &Encoding,
    sink: &mut W,
    total: Option<u64>,
) -> Result<usize>
where
    I: IntoIterator<Item = String>,
    S: RandomSource,
    W: DocumentSink + ?Sized,
{
    let progress = document_progress(total);
    let mut count = 0;

    for id in ids {
        let vector = generator.generate();
        let contents = encoding.encode(&vector)?;
        sink.write(EncodedDocument::new(id, contents))?;

        count += 1;
        progress.inc(1);
        if total.is_none() && refresh_due(count) {
            progress.set_message(format!("Generated {} documents", count));
        }
    }

    progress.finish_and_clear();
    info!(
        "Generated {} documents ({}, dim {})",
        count,
        generator.mode(),
        generator.dim()
    );
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::SinkSummary;

    use pretty_assertions::assert_eq;
    use rstest::*;
    use slr_core::errors::SlrError;
    use slr_core::generator::SparsityMode;
    use slr_core::random::ScriptedSource;

    #[derive(Default)]
    struct MemorySink {
        docs: Vec<EncodedDocument>,
    }

    impl DocumentSink for MemorySink {
        fn write(&mut self, doc: EncodedDocument) -> Result<()> {
            self.docs.push(doc);
            Ok(())
        }

        fn finish(&mut self) -> Result<SinkSummary> {
            Ok(SinkSummary {
                documents: self.docs.len(),
                files: vec![],
            })
        }
    }

    #[rstest]
    fn test_synthesize_ids() {
        let ids: Vec<String> = synthesize_ids("doc_", 3, 3).unwrap().collect();
        assert_eq!(ids, vec!["doc_3", "doc_4", "doc_5"]);
    }

    #[rstest]
    fn test_synthesize_ids_rejects_overflowing_start() {
        assert!(matches!(
            synthesize_ids("doc_", usize::MAX - 1, 3),
            Err(SlrError::InvalidParameter { name: "start", .. })
        ));
        assert_eq!(synthesize_ids("doc_", usize::MAX - 3, 3).unwrap().count(), 3);
    }

    #[rstest]
    fn test_generate_documents_with_scripted_weights() {
        let source = ScriptedSource::new(vec![
            0.0, 0.0, 0.25, 0.0, 0.0, // d1
            0.0, 0.4, 0.0, 0.9, 0.0, // d2
            0.0, 0.0, 0.0, 0.0, 0.0, // d3
        ])
        .unwrap();
        let mut generator =
            SparseVectorGenerator::new(5, SparsityMode::Uniform { threshold: 0.0 }, source).unwrap();
        let encoding = Encoding::repetition(1).unwrap();
        let mut sink = MemorySink::default();

        let ids = ["d1", "d2", "d3"].map(String::from);
        let n = generate_documents(ids, &mut generator, &encoding, &mut sink, Some(3)).unwrap();

        assert_eq!(n, 3);
        assert_eq!(sink.docs[0].contents, "2 2");
        assert_eq!(sink.docs[1].id, "d2");
        assert_eq!(sink.docs[1].contents, "1 1 1 1 3 3 3 3 3 3 3 3 3");
        assert_eq!(sink.docs[2].contents, "");
    }
}
