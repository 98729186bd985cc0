//! Tracing setup for the binary.
//!
//! Every formatted log line passes through [`RedactingWriter`], which replaces
//! registered secrets with `***` before the bytes reach stdout.

use std::borrow::Cow;
use std::io::{self, Write};
use std::sync::Arc;

use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

const MASK: &str = "***";

/// Initialise the global subscriber. `RUST_LOG` overrides the default `info`.
pub fn init_tracing(secrets: impl IntoIterator<Item = String>) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(RedactingMakeWriter::new(io::stdout, secrets))
        .try_init();
}

/// Replace every non-empty secret in `text` with `***`.
pub fn redact<'a>(text: &'a str, secrets: &[String]) -> Cow<'a, str> {
    let mut out = Cow::Borrowed(text);
    for secret in secrets.iter().filter(|s| !s.is_empty()) {
        if out.contains(secret.as_str()) {
            out = Cow::Owned(out.replace(secret.as_str(), MASK));
        }
    }
    out
}

pub struct RedactingMakeWriter<M> {
    inner: M,
    secrets: Arc<Vec<String>>,
}

impl<M> RedactingMakeWriter<M> {
    pub fn new(inner: M, secrets: impl IntoIterator<Item = String>) -> Self {
        let secrets = secrets.into_iter().filter(|s| !s.is_empty()).collect();
        Self {
            inner,
            secrets: Arc::new(secrets),
        }
    }
}

impl<'a, M> MakeWriter<'a> for RedactingMakeWriter<M>
where
    M: MakeWriter<'a>,
{
    type Writer = RedactingWriter<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        RedactingWriter {
            inner: self.inner.make_writer(),
            secrets: Arc::clone(&self.secrets),
        }
    }
}

pub struct RedactingWriter<W> {
    inner: W,
    secrets: Arc<Vec<String>>,
}

impl<W: Write> Write for RedactingWriter<W> {
    // The fmt layer hands over one complete line per write.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let text = String::from_utf8_lossy(buf);
        self.inner.write_all(redact(&text, &self.secrets).as_bytes())?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn redact_replaces_every_occurrence() {
        let secrets = vec!["abcd-efgh".to_string()];
        assert_eq!(
            redact("pw=abcd-efgh again abcd-efgh", &secrets),
            "pw=*** again ***"
        );
    }

    #[test]
    fn redact_ignores_empty_secrets() {
        let secrets = vec![String::new()];
        assert!(matches!(redact("nothing", &secrets), Cow::Borrowed("nothing")));
    }

    #[test]
    fn writer_masks_secrets() {
        let buffer = SharedBuffer::default();
        let mut writer = RedactingWriter {
            inner: buffer.clone(),
            secrets: Arc::new(vec!["s3cret".to_string()]),
        };
        writer.write_all(b"token s3cret\n").unwrap();
        assert_eq!(buffer.contents(), "token ***\n");
    }

    #[test]
    fn log_lines_are_redacted() {
        let buffer = SharedBuffer::default();
        let sink = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_target(false)
            .without_time()
            .with_ansi(false)
            .with_writer(RedactingMakeWriter::new(
                move || sink.clone(),
                ["xxxx-yyyy-zzzz".to_string()],
            ))
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("logging in with xxxx-yyyy-zzzz");
        });

        let output = buffer.contents();
        assert!(output.contains("logging in with ***"), "{output}");
        assert!(!output.contains("xxxx-yyyy-zzzz"));
    }
}
