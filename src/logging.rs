//! Subscriber setup for the binary. Library code only emits `tracing`
//! events; nothing is printed unless a subscriber is installed here.

use std::io;

use indicatif::ProgressBar;
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// How much the binary reports while training.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Warnings and errors only.
    Silent,
    /// Progress lines every `log_interval` generations.
    #[default]
    Normal,
    /// Every move with its network outputs, and the board after each move.
    Verbose,
}

impl Verbosity {
    pub fn from_flags(verbose: bool, silent: bool) -> Self {
        match (verbose, silent) {
            (true, _) => Verbosity::Verbose,
            (false, true) => Verbosity::Silent,
            (false, false) => Verbosity::Normal,
        }
    }

    /// Filter directives used when `RUST_LOG` is not set.
    pub fn default_directives(self) -> &'static str {
        match self {
            Verbosity::Silent => "warn",
            Verbosity::Normal => "info",
            Verbosity::Verbose => "info,ga_connect_four=trace",
        }
    }
}

/// Routes log output around a progress bar: the bar is cleared while a
/// line is written and redrawn afterwards.
#[derive(Debug, Clone)]
pub struct ProgressAware<M> {
    bar: ProgressBar,
    inner: M,
}

impl<M> ProgressAware<M> {
    pub fn new(bar: ProgressBar, inner: M) -> Self {
        ProgressAware { bar, inner }
    }
}

impl<'a, M: MakeWriter<'a>> MakeWriter<'a> for ProgressAware<M> {
    type Writer = SuspendingWriter<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        SuspendingWriter {
            bar: self.bar.clone(),
            inner: self.inner.make_writer(),
        }
    }
}

pub struct SuspendingWriter<W> {
    bar: ProgressBar,
    inner: W,
}

impl<W: io::Write> io::Write for SuspendingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let inner = &mut self.inner;
        self.bar.suspend(|| inner.write(buf))
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        let inner = &mut self.inner;
        self.bar.suspend(|| inner.write_all(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Install the global subscriber, writing to stderr around `progress`.
/// `RUST_LOG` takes precedence over `verbosity`.
pub fn init_logging(
    verbosity: Verbosity,
    progress: &ProgressBar,
) -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.default_directives()));
    let writer = ProgressAware::new(progress.clone(), io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(writer))
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_flags_map_to_verbosity() {
        assert_eq!(Verbosity::from_flags(false, false), Verbosity::Normal);
        assert_eq!(Verbosity::from_flags(true, false), Verbosity::Verbose);
        assert_eq!(Verbosity::from_flags(false, true), Verbosity::Silent);
    }

    #[test]
    fn test_directives_parse() {
        for v in [Verbosity::Silent, Verbosity::Normal, Verbosity::Verbose] {
            assert!(EnvFilter::try_new(v.default_directives()).is_ok());
        }
    }

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl io::Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_progress_aware_writer_passes_lines_through() {
        use std::io::Write;

        let buf = SharedBuf::default();
        let sink = buf.clone();
        let bar = ProgressBar::hidden();
        let make = ProgressAware::new(bar.clone(), move || sink.clone());

        let mut writer = make.make_writer();
        writer.write_all(b"Generation 1/3\n").unwrap();
        writer.flush().unwrap();
        make.make_writer().write_all(b"Generation 2/3\n").unwrap();

        assert_eq!(
            String::from_utf8(buf.0.lock().unwrap().clone()).unwrap(),
            "Generation 1/3\nGeneration 2/3\n"
        );
        assert!(!bar.is_finished());
    }
}
