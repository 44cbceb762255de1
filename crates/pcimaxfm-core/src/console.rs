//! User-facing output gated by verbosity

use core::fmt::Display;
use log::LevelFilter;
use std::io::{self, Write};

/// How much the tool prints
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    /// Nothing at all, not even errors
    Quiet,
    /// Reports and errors
    #[default]
    Normal,
    /// Reports, errors and debug messages
    Verbose,
}

impl Verbosity {
    /// `log` level matching this verbosity
    pub fn log_level(self) -> LevelFilter {
        match self {
            Self::Quiet => LevelFilter::Off,
            Self::Normal => LevelFilter::Warn,
            Self::Verbose => LevelFilter::Debug,
        }
    }
}

/// Output sink for reports, debug lines and errors
pub struct Console {
    verbosity: Verbosity,
    out: Box<dyn Write>,
    err: Box<dyn Write>,
}

impl Console {
    /// Console writing to stdout and stderr
    pub fn stdio() -> Self {
        Self::with_writers(Box::new(io::stdout()), Box::new(io::stderr()))
    }

    /// Console writing to the given sinks
    pub fn with_writers(out: Box<dyn Write>, err: Box<dyn Write>) -> Self {
        Self {
            verbosity: Verbosity::default(),
            out,
            err,
        }
    }

    /// Current verbosity
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Change verbosity for every later message
    ///
    /// Also moves the global `log` level along.
    pub fn set_verbosity(&mut self, verbosity: Verbosity) {
        self.verbosity = verbosity;
        log::set_max_level(verbosity.log_level());
    }

    /// Print a line unless quiet
    pub fn notice(&mut self, msg: &dyn Display) {
        if self.verbosity >= Verbosity::Normal {
            // Output errors are ignored; the device operation already happened.
            let _ = writeln!(self.out, "{}", msg);
        }
    }

    /// Print a line only when verbose
    pub fn debug(&mut self, msg: &dyn Display) {
        if self.verbosity == Verbosity::Verbose {
            let _ = writeln!(self.out, "{}", msg);
        }
    }

    /// Print an error line on stderr unless quiet
    pub fn error(&mut self, msg: &dyn Display) {
        if self.verbosity >= Verbosity::Normal {
            let _ = writeln!(self.err, "Error: {}", msg);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct Buf(Rc<RefCell<Vec<u8>>>);

    impl Write for Buf {
        fn write(&mut self, data: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(data);
            Ok(data.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Buf {
        fn text(&self) -> String {
            String::from_utf8(self.0.borrow().clone()).unwrap()
        }
    }

    #[test]
    fn test_levels() {
        let (out, err) = (Buf::default(), Buf::default());
        let mut console = Console::with_writers(Box::new(out.clone()), Box::new(err.clone()));

        console.notice(&"normal");
        console.debug(&"hidden");
        console.set_verbosity(Verbosity::Verbose);
        console.debug(&"shown");
        console.set_verbosity(Verbosity::Quiet);
        console.notice(&"silent");
        console.error(&"silent");
        console.set_verbosity(Verbosity::Normal);
        console.error(&"boom");

        assert_eq!(out.text(), "normal\nshown\n");
        assert_eq!(err.text(), "Error: boom\n");
    }
}
