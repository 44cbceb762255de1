//! Get/set operations shared by every parameter
//!
//! All parameters follow one rule: no argument reads the value, an argument
//! writes it. Input is validated before the device is opened, and a set
//! reports the value that was written rather than reading it back.

use crate::control::{ControlRequest, DeviceBackend, RdsAssignment, Reply};
use crate::error::{BoxError, Direction, Error, Result};
use crate::param::{ParameterKind, Report};
use crate::rds;
use crate::session::DeviceSession;

/// Read `kind` from the device
pub fn get<B: DeviceBackend>(kind: ParameterKind, session: &mut DeviceSession<B>) -> Result<Report> {
    let desc = kind.descriptor();
    session.open()?;

    let raw = match session.exchange(&kind.get_request(), desc.name)? {
        Reply::Value(raw) => raw,
        Reply::Done => {
            return Err(Error::ControlExchangeFailed {
                direction: Direction::Read,
                what: desc.name,
                source: BoxError::from("driver returned no value"),
            })
        }
    };

    if desc.is_sentinel(raw) {
        return Ok(Report::NotConfigured(kind));
    }
    Ok(Report::Value { kind, raw })
}

/// Parse `input` and write it to `kind`
pub fn set<B: DeviceBackend>(
    kind: ParameterKind,
    session: &mut DeviceSession<B>,
    input: &str,
) -> Result<Report> {
    let desc = kind.descriptor();
    let raw = desc.parse(input)?;

    session.open()?;
    session.exchange(&kind.set_request(raw), desc.name)?;
    Ok(Report::Value { kind, raw })
}

/// Get when `arg` is absent, set otherwise
pub fn get_or_set<B: DeviceBackend>(
    kind: ParameterKind,
    session: &mut DeviceSession<B>,
    arg: Option<&str>,
) -> Result<Report> {
    match arg {
        Some(input) => set(kind, session, input),
        None => get(kind, session),
    }
}

/// Parse a `NAME=VALUE` RDS assignment and write it
pub fn set_rds<B: DeviceBackend>(
    session: &mut DeviceSession<B>,
    input: &str,
) -> Result<RdsAssignment> {
    let assignment = rds::parse_assignment(input)?;

    session.open()?;
    session.exchange(&ControlRequest::SetRds(assignment.clone()), "RDS parameter")?;
    Ok(assignment)
}
