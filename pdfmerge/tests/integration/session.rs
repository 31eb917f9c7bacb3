//! Integration tests for scripted interactive sessions.

use pdfmerge::config::{CompressionLevel, PageSpan};
use pdfmerge::merge::MergeOptions;
use pdfmerge::output::OutputFormatter;
use pdfmerge::session::Session;
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::common::{markers_in_file, scratch_dir, write_pdf};

#[derive(Clone, Default)]
struct Transcript(Arc<Mutex<Vec<u8>>>);

impl Transcript {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for Transcript {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn quoted(path: &Path) -> String {
    shell_words::quote(&path.display().to_string()).into_owned()
}

#[tokio::test]
async fn test_scripted_session_builds_book() {
    let dir = scratch_dir();
    let intro = write_pdf(dir.path(), "intro.pdf", "i", 2);
    let body = write_pdf(dir.path(), "body text.pdf", "b", 6);
    let output = dir.path().join("book");

    let script = format!(
        "open {} {}\n\
         select 2\n\
         up\n\
         range 1 5 6\n\
         list\n\
         merge {}\n\
         quit\n",
        quoted(&intro),
        quoted(&body),
        quoted(&output),
    );

    let transcript = Transcript::default();
    let formatter = OutputFormatter::with_writer(false, false, transcript.clone());
    let mut session = Session::new(script.as_bytes(), &formatter).with_merge_options(
        MergeOptions {
            compression: CompressionLevel::None,
            strict: false,
        },
    );
    session.run().await.unwrap();

    assert_eq!(
        session.plan().entries()[0].page_range,
        Some(PageSpan { start: 5, end: 6 })
    );
    assert_eq!(
        markers_in_file(&dir.path().join("book.pdf")),
        vec!["b-5", "b-6", "i-1", "i-2"]
    );

    let text = transcript.text();
    assert!(text.contains("pdfmerge> "));
    assert!(text.contains("body text.pdf (pages 5-6)"));
    assert!(text.contains("Successfully created"));
}

#[tokio::test]
async fn test_session_survives_bad_commands() {
    let dir = scratch_dir();
    let only = write_pdf(dir.path(), "only.pdf", "o", 1);

    let script = format!(
        "select 1\n\
         frobnicate\n\
         open {}\n\
         select 9\n\
         range 4 1 2\n\
         down\n\
         list\n",
        quoted(&only)
    );

    let transcript = Transcript::default();
    let formatter = OutputFormatter::with_writer(false, false, transcript.clone());
    let mut session = Session::new(script.as_bytes(), &formatter);
    session.run().await.unwrap();

    assert_eq!(session.plan().len(), 1);
    assert_eq!(session.plan().cursor(), Some(0));

    let text = transcript.text();
    assert!(text.contains("Unknown command 'frobnicate'"));
    assert!(text.contains("No entry 9 in the merge plan"));
    assert!(text.contains("No entry 4 in the merge plan"));
    assert!(text.contains("Nothing to move"));
}

#[tokio::test]
async fn test_session_overwrite_confirmation() {
    let dir = scratch_dir();
    let source = write_pdf(dir.path(), "source.pdf", "s", 3);
    let output = dir.path().join("existing.pdf");
    std::fs::write(&output, b"keep me").unwrap();

    let declined = format!(
        "open {}\nmerge {}\nn\n",
        quoted(&source),
        quoted(&output)
    );
    let formatter = OutputFormatter::with_writer(false, false, std::io::sink());
    Session::new(declined.as_bytes(), &formatter)
        .run()
        .await
        .unwrap();
    assert_eq!(std::fs::read(&output).unwrap(), b"keep me");

    let accepted = format!(
        "open {}\nmerge {}\nyes\n",
        quoted(&source),
        quoted(&output)
    );
    Session::new(accepted.as_bytes(), &formatter)
        .run()
        .await
        .unwrap();
    assert_eq!(markers_in_file(&output), vec!["s-1", "s-2", "s-3"]);
}

#[tokio::test]
async fn test_session_refuses_to_overwrite_an_input() {
    let dir = scratch_dir();
    let source = write_pdf(dir.path(), "source.pdf", "s", 1);
    let before = std::fs::read(&source).unwrap();

    let script = format!("open {}\nmerge {}\n", quoted(&source), quoted(&source));
    let transcript = Transcript::default();
    let formatter = OutputFormatter::with_writer(false, false, transcript.clone());
    Session::new(script.as_bytes(), &formatter)
        .run()
        .await
        .unwrap();

    assert_eq!(std::fs::read(&source).unwrap(), before);
    assert!(
        transcript
            .text()
            .contains("Output file cannot be the same as an input file")
    );
}
