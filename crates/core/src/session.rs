use thiserror::Error;

use crate::{style::StyleProfile, types::HistoryItem};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisStatus {
    Idle,
    Analyzing,
    Success,
    Error,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SessionError {
    #[error("Cannot {action} while {from:?}")]
    InvalidTransition {
        from: AnalysisStatus,
        action: &'static str,
    },

    #[error("No video selected")]
    NoVideo,
}

/// State of one interactive analysis session. Only one analysis may be in
/// flight: `begin` is refused unless the session is idle.
#[derive(Debug, Clone)]
pub struct Session {
    status: AnalysisStatus,
    pub style: StyleProfile,
    pub include_audio: bool,
    video_name: Option<String>,
    result: Option<String>,
    error: Option<String>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(StyleProfile::default(), false)
    }
}

impl Session {
    pub fn new(style: StyleProfile, include_audio: bool) -> Self {
        Self {
            status: AnalysisStatus::Idle,
            style,
            include_audio,
            video_name: None,
            result: None,
            error: None,
        }
    }

    pub fn status(&self) -> AnalysisStatus {
        self.status
    }

    pub fn video_name(&self) -> Option<&str> {
        self.video_name.as_deref()
    }

    pub fn result(&self) -> Option<&str> {
        self.result.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn select_video(&mut self, name: impl Into<String>) -> Result<(), SessionError> {
        self.ensure_not_analyzing("select a video")?;
        self.video_name = Some(name.into());
        self.enter_idle();
        Ok(())
    }

    pub fn clear_video(&mut self) -> Result<(), SessionError> {
        self.ensure_not_analyzing("clear the video")?;
        self.video_name = None;
        self.enter_idle();
        Ok(())
    }

    pub fn begin(&mut self) -> Result<(), SessionError> {
        if self.status != AnalysisStatus::Idle {
            return Err(SessionError::InvalidTransition {
                from: self.status,
                action: "start an analysis",
            });
        }
        if self.video_name.is_none() {
            return Err(SessionError::NoVideo);
        }
        self.status = AnalysisStatus::Analyzing;
        self.error = None;
        Ok(())
    }

    pub fn complete(&mut self, raw: impl Into<String>) -> Result<(), SessionError> {
        self.ensure_analyzing("complete")?;
        self.status = AnalysisStatus::Success;
        self.result = Some(raw.into());
        Ok(())
    }

    pub fn fail(&mut self, message: impl Into<String>) -> Result<(), SessionError> {
        self.ensure_analyzing("fail")?;
        self.status = AnalysisStatus::Error;
        self.error = Some(message.into());
        Ok(())
    }

    /// Back to idle after a finished analysis, keeping video and style.
    pub fn reset(&mut self) -> Result<(), SessionError> {
        match self.status {
            AnalysisStatus::Success | AnalysisStatus::Error => {
                self.enter_idle();
                Ok(())
            }
            from => Err(SessionError::InvalidTransition {
                from,
                action: "reset",
            }),
        }
    }

    pub fn restore(&mut self, item: &HistoryItem) -> Result<(), SessionError> {
        self.ensure_not_analyzing("restore history")?;
        self.style = item.style;
        self.result = Some(item.prompt.clone());
        self.error = None;
        self.status = AnalysisStatus::Success;
        Ok(())
    }

    fn enter_idle(&mut self) {
        self.status = AnalysisStatus::Idle;
        self.result = None;
        self.error = None;
    }

    fn ensure_analyzing(&self, action: &'static str) -> Result<(), SessionError> {
        if self.status != AnalysisStatus::Analyzing {
            return Err(SessionError::InvalidTransition {
                from: self.status,
                action,
            });
        }
        Ok(())
    }

    fn ensure_not_analyzing(&self, action: &'static str) -> Result<(), SessionError> {
        if self.status == AnalysisStatus::Analyzing {
            return Err(SessionError::InvalidTransition {
                from: self.status,
                action,
            });
        }
        Ok(())
    }
}
