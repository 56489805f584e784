use std::fmt;

use super::caps::ShaderStage;
use super::handle::{Handle, HandleError, ResourceKind};

/// Error returned by every [`RenderContext`](super::RenderContext) call.
///
/// Call-site variants carry the name of the interface call that failed so a
/// log line is enough to locate the misuse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GfxError {
    /// The driver could not be brought up. Nothing was created.
    Init { reason: String },

    /// The handle was never issued or has been destroyed.
    UnknownHandle { call: &'static str, handle: Handle },

    /// The handle is live but names a different kind of resource.
    WrongKind {
        call: &'static str,
        handle: Handle,
        expected: ResourceKind,
        actual: ResourceKind,
    },

    /// Shader source was rejected; `log` is the driver's diagnostic verbatim.
    Compilation { stage: ShaderStage, log: String },

    /// Program linking failed; `log` is the driver's diagnostic verbatim.
    Link { program: Handle, log: String },

    /// An argument is outside the set the call accepts.
    InvalidArgument {
        call: &'static str,
        argument: &'static str,
        reason: String,
    },

    /// The call does not fit the current binding or lifecycle state.
    State { call: &'static str, reason: String },

    /// The driver refused to create a native object.
    Driver { call: &'static str, message: String },

    /// No handle values are left.
    HandleSpaceExhausted,
}

impl GfxError {
    pub(crate) fn invalid(call: &'static str, argument: &'static str, reason: impl Into<String>) -> Self {
        GfxError::InvalidArgument {
            call,
            argument,
            reason: reason.into(),
        }
    }

    pub(crate) fn state(call: &'static str, reason: impl Into<String>) -> Self {
        GfxError::State {
            call,
            reason: reason.into(),
        }
    }

    /// Attaches a call name to a handle-table failure.
    pub(crate) fn from_handle(call: &'static str, err: HandleError) -> Self {
        match err {
            HandleError::Unknown(handle) => GfxError::UnknownHandle { call, handle },
            HandleError::WrongKind {
                handle,
                expected,
                actual,
            } => GfxError::WrongKind {
                call,
                handle,
                expected,
                actual,
            },
            HandleError::Exhausted => GfxError::HandleSpaceExhausted,
        }
    }
}

impl fmt::Display for GfxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GfxError::Init { reason } => write!(f, "failed to initialize graphics context: {reason}"),
            GfxError::UnknownHandle { call, handle } => {
                write!(f, "{call}: unknown or destroyed handle {handle}")
            }
            GfxError::WrongKind {
                call,
                handle,
                expected,
                actual,
            } => write!(f, "{call}: handle {handle} is a {actual}, expected a {expected}"),
            GfxError::Compilation { stage, log } => {
                write!(f, "{stage} shader compilation failed:\n{log}")
            }
            GfxError::Link { program, log } => {
                write!(f, "program {program} failed to link:\n{log}")
            }
            GfxError::InvalidArgument {
                call,
                argument,
                reason,
            } => write!(f, "{call}: invalid `{argument}`: {reason}"),
            GfxError::State { call, reason } => write!(f, "{call}: {reason}"),
            GfxError::Driver { call, message } => write!(f, "{call}: driver error: {message}"),
            GfxError::HandleSpaceExhausted => f.write_str("resource handle space exhausted"),
        }
    }
}

impl std::error::Error for GfxError {}

pub type Result<T, E = GfxError> = std::result::Result<T, E>;
