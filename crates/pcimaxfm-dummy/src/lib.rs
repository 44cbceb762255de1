//! pcimaxfm-dummy - In-memory transmitter emulator for testing
//!
//! This crate provides a dummy backend that behaves like a pcimaxfm card
//! behind its driver. Every exchange is recorded so tests can check which
//! requests reached the "device" and in what order.

use pcimaxfm_core::control::{
    ControlInterface, ControlRequest, DeviceBackend, RdsAssignment, Reply,
};
use pcimaxfm_core::param::{BOOL_NA, FREQ_NA, POWER_NA};
use pcimaxfm_core::BoxError;

use std::cell::{Ref, RefCell};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Configuration for the dummy transmitter
#[derive(Debug, Clone)]
pub struct DummyConfig {
    /// Initial frequency register (50 kHz steps)
    pub frequency: i32,
    /// Initial power register
    pub power: i32,
    /// Initial stereo register
    pub stereo: i32,
    /// Initial transmitter register
    pub transmit: i32,
    /// Initial RDS signal register
    pub rds_signal: i32,
    /// Silently clamp written power levels to this maximum
    pub power_limit: Option<i32>,
    /// Refuse to open, as if the node were missing
    pub fail_open: bool,
    /// Fail every exchange, as if the driver rejected the ioctl
    pub fail_exchanges: bool,
}

impl Default for DummyConfig {
    fn default() -> Self {
        // Freshly loaded driver: nothing configured yet.
        Self {
            frequency: FREQ_NA,
            power: POWER_NA,
            stereo: 0,
            transmit: BOOL_NA,
            rds_signal: BOOL_NA,
            power_limit: None,
            fail_open: false,
            fail_exchanges: false,
        }
    }
}

/// Emulated device state, shared between backend and open handles
#[derive(Debug)]
pub struct DummyState {
    config: DummyConfig,
    /// Frequency register
    pub frequency: i32,
    /// Power register
    pub power: i32,
    /// Stereo register
    pub stereo: i32,
    /// Transmitter register
    pub transmit: i32,
    /// RDS signal register
    pub rds_signal: i32,
    /// RDS fields written so far, in order
    pub rds: Vec<RdsAssignment>,
    /// Every request received, in order
    pub requests: Vec<ControlRequest>,
    /// Every path opened, in order
    pub opened: Vec<PathBuf>,
    /// Number of handles currently open
    pub open_handles: usize,
}

impl DummyState {
    fn new(config: DummyConfig) -> Self {
        Self {
            frequency: config.frequency,
            power: config.power,
            stereo: config.stereo,
            transmit: config.transmit,
            rds_signal: config.rds_signal,
            rds: Vec::new(),
            requests: Vec::new(),
            opened: Vec::new(),
            open_handles: 0,
            config,
        }
    }

    fn handle(&mut self, request: &ControlRequest) -> Result<Reply, BoxError> {
        self.requests.push(request.clone());
        if self.config.fail_exchanges {
            return Err("Input/output error".into());
        }

        let reply = match request {
            ControlRequest::GetFrequency => Reply::Value(self.frequency),
            ControlRequest::GetPower => Reply::Value(self.power),
            ControlRequest::GetStereo => Reply::Value(self.stereo),
            ControlRequest::GetTransmit => Reply::Value(self.transmit),
            ControlRequest::GetRdsSignal => Reply::Value(self.rds_signal),
            ControlRequest::SetFrequency(v) => {
                self.frequency = *v;
                Reply::Done
            }
            ControlRequest::SetPower(v) => {
                self.power = match self.config.power_limit {
                    Some(limit) => (*v).min(limit),
                    None => *v,
                };
                Reply::Done
            }
            ControlRequest::SetStereo(v) => {
                self.stereo = *v;
                Reply::Done
            }
            ControlRequest::SetTransmit(v) => {
                self.transmit = *v;
                Reply::Done
            }
            ControlRequest::SetRdsSignal(v) => {
                self.rds_signal = *v;
                Reply::Done
            }
            ControlRequest::SetRds(assignment) => {
                self.rds.push(assignment.clone());
                Reply::Done
            }
        };
        Ok(reply)
    }
}

/// Backend handing out handles to one emulated card
///
/// Clones share the same card, so a test can keep one clone to inspect
/// the state after giving the other to a dispatcher.
#[derive(Clone)]
pub struct DummyBackend {
    state: Rc<RefCell<DummyState>>,
}

impl DummyBackend {
    /// Create a backend with the given configuration
    pub fn new(config: DummyConfig) -> Self {
        Self {
            state: Rc::new(RefCell::new(DummyState::new(config))),
        }
    }

    /// Create a backend for a freshly loaded, unconfigured card
    pub fn new_default() -> Self {
        Self::new(DummyConfig::default())
    }

    /// Inspect the emulated card
    pub fn state(&self) -> Ref<'_, DummyState> {
        self.state.borrow()
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<ControlRequest> {
        self.state.borrow().requests.clone()
    }
}

impl DeviceBackend for DummyBackend {
    fn open(&mut self, path: &Path) -> Result<Box<dyn ControlInterface>, BoxError> {
        let mut state = self.state.borrow_mut();
        if state.config.fail_open {
            return Err(format!("{}: No such file or directory", path.display()).into());
        }
        log::debug!("dummy: Opening {}", path.display());
        state.opened.push(path.to_path_buf());
        state.open_handles += 1;
        Ok(Box::new(DummyTransmitter {
            state: Rc::clone(&self.state),
        }))
    }
}

/// Open handle to the emulated card
pub struct DummyTransmitter {
    state: Rc<RefCell<DummyState>>,
}

impl ControlInterface for DummyTransmitter {
    fn exchange(&mut self, request: &ControlRequest) -> Result<Reply, BoxError> {
        self.state.borrow_mut().handle(request)
    }
}

impl Drop for DummyTransmitter {
    fn drop(&mut self) {
        self.state.borrow_mut().open_handles -= 1;
    }
}

/// Cloneable in-memory writer for capturing console output
#[derive(Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    /// Captured text
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pcimaxfm_core::rds::RdsParam;
    use pcimaxfm_core::{
        Action, Capabilities, Config, Console, Dispatcher, Error, Outcome, ParameterKind,
        Verbosity,
    };

    struct Harness {
        backend: DummyBackend,
        out: SharedBuffer,
        err: SharedBuffer,
        dispatcher: Dispatcher<DummyBackend>,
    }

    impl Harness {
        fn new(config: DummyConfig) -> Self {
            Self::with_config(config, Config::default())
        }

        fn with_config(dummy: DummyConfig, config: Config) -> Self {
            let backend = DummyBackend::new(dummy);
            let (out, err) = (SharedBuffer::default(), SharedBuffer::default());
            let console = Console::with_writers(Box::new(out.clone()), Box::new(err.clone()));
            let dispatcher = Dispatcher::new(config, backend.clone(), console);
            Self {
                backend,
                out,
                err,
                dispatcher,
            }
        }

        fn run(&mut self, actions: Vec<Action>) -> Result<Outcome, Error> {
            let result = self.dispatcher.run(actions);
            if let Err(e) = &result {
                self.dispatcher.report_error(e);
            }
            result
        }
    }

    fn freq(arg: Option<&str>) -> Action {
        Action::Parameter(ParameterKind::Frequency, arg.map(String::from))
    }

    fn power(arg: Option<&str>) -> Action {
        Action::Parameter(ParameterKind::Power, arg.map(String::from))
    }

    fn stereo(arg: Option<&str>) -> Action {
        Action::Parameter(ParameterKind::Stereo, arg.map(String::from))
    }

    #[test]
    fn test_set_freq_then_get_power() {
        let mut h = Harness::new(DummyConfig::default());
        let outcome = h.run(vec![freq(Some("100.0")), power(None)]).unwrap();

        assert_eq!(outcome, Outcome::Completed);
        assert_eq!(
            h.backend.requests(),
            vec![ControlRequest::SetFrequency(2000), ControlRequest::GetPower]
        );
        assert_eq!(h.backend.state().opened.len(), 1);
        assert_eq!(h.backend.state().open_handles, 0);
        assert!(!h.dispatcher.session().is_open());
        assert_eq!(
            h.out.text(),
            "Frequency: 100.00 MHz (2000 50 KHz steps)\nPower level not set yet.\n"
        );
    }

    #[test]
    fn test_power_set_then_get() {
        for level in 0..=15 {
            let mut h = Harness::new(DummyConfig::default());
            let text = level.to_string();
            h.run(vec![power(Some(&text)), power(None)]).unwrap();
            let expected = format!("Power level: {}/15\n", level);
            assert_eq!(h.out.text(), expected.repeat(2));
            assert_eq!(h.backend.state().power, level);
        }
    }

    #[test]
    fn test_power_out_of_range_never_reaches_device() {
        for input in ["16", "-1"] {
            let mut h = Harness::new(DummyConfig::default());
            let err = h.run(vec![power(Some(input))]).unwrap_err();
            assert!(matches!(err, Error::OutOfRange { .. }));
            assert!(h.backend.requests().is_empty());
            assert!(h.backend.state().opened.is_empty());
        }
    }

    #[test]
    fn test_invalid_input() {
        for action in [freq(Some("abc")), power(Some("abc")), stereo(Some("abc"))] {
            let mut h = Harness::new(DummyConfig::default());
            let err = h.run(vec![action]).unwrap_err();
            assert!(matches!(err, Error::InvalidInput { .. }));
            assert!(h.err.text().starts_with("Error: Invalid "));
        }
    }

    #[test]
    fn test_unset_frequency_is_not_an_error() {
        let mut h = Harness::new(DummyConfig::default());
        h.run(vec![freq(None)]).unwrap();
        assert_eq!(h.out.text(), "Frequency not set yet.\n");
        assert!(h.err.text().is_empty());
    }

    #[test]
    fn test_stereo_always_defined() {
        let config = DummyConfig {
            stereo: 1,
            ..Default::default()
        };
        let mut h = Harness::new(config);
        h.run(vec![stereo(None), stereo(Some("0")), stereo(None)])
            .unwrap();
        assert_eq!(
            h.out.text(),
            "Stereo encoder: On\nStereo encoder: Off\nStereo encoder: Off\n"
        );
    }

    #[test]
    fn test_device_after_exchange_is_in_use() {
        let config = DummyConfig {
            frequency: 2000,
            ..Default::default()
        };
        let mut h = Harness::new(config);
        let err = h
            .run(vec![
                freq(None),
                Action::Device(Some("/dev/pcimaxfm1".into())),
                power(None),
            ])
            .unwrap_err();
        assert!(matches!(err, Error::DeviceInUse { .. }));
        assert!(h.dispatcher.session().is_open());
        assert_eq!(
            h.dispatcher.session().device_path(),
            std::path::Path::new("/dev/pcimaxfm0")
        );
        // The power query after the failure never ran.
        assert_eq!(h.backend.requests(), vec![ControlRequest::GetFrequency]);
    }

    #[test]
    fn test_device_before_exchange() {
        let mut h = Harness::new(DummyConfig::default());
        h.run(vec![
            Action::Device(Some("/dev/pcimaxfm1".into())),
            Action::Device(None),
            freq(None),
        ])
        .unwrap();
        assert_eq!(
            h.backend.state().opened,
            vec![PathBuf::from("/dev/pcimaxfm1")]
        );
        assert!(h.out.text().starts_with("Using device \"/dev/pcimaxfm1\".\n"));
    }

    #[test]
    fn test_quiet_out_of_range_prints_nothing() {
        let mut h = Harness::new(DummyConfig::default());
        let err = h
            .run(vec![Action::Quiet, freq(Some("200.0"))])
            .unwrap_err();
        assert!(matches!(err, Error::OutOfRange { .. }));
        assert!(h.backend.requests().is_empty());
        assert!(h.out.text().is_empty());
        assert!(h.err.text().is_empty());
    }

    #[test]
    fn test_verbosity_applies_from_flag_onward() {
        let config = DummyConfig {
            power: 3,
            ..Default::default()
        };
        let mut h = Harness::new(config);
        h.run(vec![
            Action::Device(Some("/dev/pcimaxfm0".into())),
            Action::Verbose,
            Action::Device(Some("/dev/pcimaxfm0".into())),
            power(None),
            Action::Quiet,
            power(None),
        ])
        .unwrap();
        assert_eq!(
            h.out.text(),
            "Verbose output.\nUsing device \"/dev/pcimaxfm0\".\nPower level: 3/15\n"
        );
        assert_eq!(h.dispatcher.verbosity(), Verbosity::Quiet);
    }

    #[test]
    fn test_open_failure() {
        let config = DummyConfig {
            fail_open: true,
            ..Default::default()
        };
        let mut h = Harness::new(config);
        let err = h.run(vec![freq(None)]).unwrap_err();
        assert!(matches!(err, Error::DeviceUnavailable { .. }));
        assert!(h.err.text().starts_with("Error: Cannot open device \"/dev/pcimaxfm0\""));
    }

    #[test]
    fn test_exchange_failure() {
        let config = DummyConfig {
            fail_exchanges: true,
            ..Default::default()
        };
        let mut h = Harness::new(config);
        let err = h.run(vec![power(Some("5")), freq(None)]).unwrap_err();
        assert!(matches!(err, Error::ControlExchangeFailed { .. }));
        assert_eq!(h.backend.requests(), vec![ControlRequest::SetPower(5)]);
        assert_eq!(
            h.err.text(),
            "Error: Setting power level failed: Input/output error\n"
        );
    }

    #[test]
    fn test_terminal_actions_stop_processing() {
        let mut h = Harness::new(DummyConfig::default());
        let outcome = h
            .run(vec![freq(Some("90")), Action::Help, power(Some("3"))])
            .unwrap();
        assert_eq!(outcome, Outcome::Help);
        assert_eq!(h.backend.requests(), vec![ControlRequest::SetFrequency(1800)]);
        assert_eq!(h.backend.state().open_handles, 0);

        let mut h = Harness::new(DummyConfig::default());
        let outcome = h.run(vec![Action::Version, freq(None)]).unwrap();
        assert_eq!(outcome, Outcome::Version);
        assert!(h.backend.state().opened.is_empty());
    }

    #[test]
    fn test_set_reports_written_value_without_reread() {
        let config = DummyConfig {
            power_limit: Some(10),
            ..Default::default()
        };
        let mut h = Harness::new(config);
        h.run(vec![power(Some("15")), power(None)]).unwrap();
        // The device clamped silently; only the follow-up get shows it.
        assert_eq!(h.out.text(), "Power level: 15/15\nPower level: 10/15\n");
        assert_eq!(
            h.backend.requests(),
            vec![ControlRequest::SetPower(15), ControlRequest::GetPower]
        );
    }

    #[test]
    fn test_transmit_and_rds_signal() {
        let mut h = Harness::new(DummyConfig::default());
        h.run(vec![
            Action::Parameter(ParameterKind::Transmit, None),
            Action::Parameter(ParameterKind::Transmit, Some("1".into())),
            Action::Parameter(ParameterKind::RdsSignal, Some("0".into())),
        ])
        .unwrap();
        assert_eq!(
            h.out.text(),
            "Transmitter not set yet.\nTransmitter: On\nRDS signal: Off\n"
        );
        assert_eq!(h.backend.state().transmit, 1);
        assert_eq!(h.backend.state().rds_signal, 0);
    }

    #[test]
    fn test_rds_assignment() {
        let mut h = Harness::new(DummyConfig::default());
        h.run(vec![
            Action::Rds(Some("PS=MYRADIO".into())),
            Action::Rds(Some("pi=C0DE".into())),
        ])
        .unwrap();
        let state = h.backend.state();
        assert_eq!(state.rds.len(), 2);
        assert_eq!(state.rds[0].param, RdsParam::Ps);
        assert_eq!(state.rds[1].param, RdsParam::Pi);
        assert_eq!(state.rds[1].value, "C0DE");
        assert_eq!(h.out.text(), "RDS PS: \"MYRADIO\"\nRDS PI: \"C0DE\"\n");
    }

    #[test]
    fn test_rds_rejected_before_exchange() {
        let mut h = Harness::new(DummyConfig::default());
        let err = h
            .run(vec![Action::Rds(Some("PS=TOOLONGNAME".into()))])
            .unwrap_err();
        assert!(matches!(err, Error::OutOfRange { .. }));
        assert!(h.backend.state().opened.is_empty());
    }

    #[test]
    fn test_rds_listing_does_not_open_device() {
        let mut h = Harness::new(DummyConfig::default());
        h.run(vec![Action::Rds(None)]).unwrap();
        assert!(h.out.text().starts_with("RDS parameters:\n  PI   "));
        assert!(h.backend.state().opened.is_empty());
    }

    #[test]
    fn test_disabled_capabilities() {
        let config = Config::default().with_capabilities(Capabilities::empty());
        let mut h = Harness::with_config(DummyConfig::default(), config);
        let err = h
            .run(vec![Action::Parameter(ParameterKind::Transmit, None)])
            .unwrap_err();
        assert!(matches!(err, Error::Unsupported("Transmitter")));

        let config = Config::default().with_capabilities(Capabilities::RDS);
        let mut h = Harness::with_config(DummyConfig::default(), config);
        assert!(h.run(vec![Action::Rds(Some("TA=1".into()))]).is_ok());
        let err = h
            .run(vec![Action::Parameter(ParameterKind::RdsSignal, None)])
            .unwrap_err();
        assert!(matches!(err, Error::Unsupported("RDS signal")));
    }
}
