#[cfg(test)]
pub mod test {
    use std::fs;
    use std::io;
    use std::path::{Path, PathBuf};
    use std::sync::{Arc, Mutex};

    use tracing::Subscriber;
    use tracing_subscriber::fmt::MakeWriter;

    /// One context `foo` at `http://foo.com/`, set as default.
    pub const FOO_CONFIG: &str = r#"default-context = "foo"

[[contexts]]
name = "foo"

[contexts.context]
root = "http://foo.com/"
"#;

    /// Default context `foo` with root `foo.com` and no scheme.
    pub const BARE_ROOT_CONFIG: &str = r#"default-context = "foo"

[[contexts]]
name = "foo"

[contexts.context]
root = "foo.com"
"#;

    /// Two contexts with credentials, `prod` as default.
    pub const TWO_CONTEXTS: &str = r#"# kouch contexts
default-context = "prod"

[[contexts]]
name = "prod"

[contexts.context]
root = "https://db.example.com/"
user = "admin"
password = "s3cret"

[[contexts]]
name = "local"

[contexts.context]
root = "http://localhost:5984/"
"#;

    /// Write `content` to `dir/rel`, creating parent directories.
    pub fn write_file(dir: &Path, rel: &str, content: &str) -> PathBuf {
        let path = dir.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    /// In-memory sink for log output, shared between clones.
    #[derive(Clone, Default)]
    pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

    impl LogCapture {
        /// A DEBUG-level subscriber writing plain text into this capture.
        pub fn subscriber(&self) -> impl Subscriber + Send + Sync + 'static {
            tracing_subscriber::fmt()
                .with_max_level(tracing::Level::DEBUG)
                .with_ansi(false)
                .with_writer(self.clone())
                .finish()
        }

        pub fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for LogCapture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for LogCapture {
        type Writer = LogCapture;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn fixtures_parse() {
        for content in [FOO_CONFIG, BARE_ROOT_CONFIG, TWO_CONTEXTS] {
            let file: crate::config::ConfigFile = toml::from_str(content).unwrap();
            assert!(file.default_context.is_some());
        }
    }
}
