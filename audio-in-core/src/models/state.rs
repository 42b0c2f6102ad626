use serde::Serialize;

/// Capture session state machine.
///
/// State transitions:
/// ```text
/// idle ──enable()──▶ starting ──process()──▶ recording
///   ▲                   │                        │
///   └────disable()──────┴──────disable()─────────┘
/// ```
///
/// The state is derived from the two session flags rather than stored, so
/// each transition has exactly one writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Idle,
    Starting,
    Recording,
}

impl SessionState {
    pub(crate) fn from_flags(start_requested: bool, is_recording: bool) -> Self {
        if is_recording {
            Self::Recording
        } else if start_requested {
            Self::Starting
        } else {
            Self::Idle
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_starting(&self) -> bool {
        matches!(self, Self::Starting)
    }

    pub fn is_recording(&self) -> bool {
        matches!(self, Self::Recording)
    }
}
