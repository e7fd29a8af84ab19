//! Scheduling of countdown ticks.
//!
//! At most one tick is pending at a time. Arming a new one aborts the
//! previous task, so a superseded question never receives a late tick from
//! this scheduler. Ticks already queued on the channel are filtered out by
//! [`QuizSession::tick`](crate::session::QuizSession::tick).

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::trace;

use crate::session::TickToken;

/// Interval between two countdown steps.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

pub struct Countdown {
    period: Duration,
    sender: mpsc::UnboundedSender<TickToken>,
    pending: Option<(TickToken, JoinHandle<()>)>,
}

impl Countdown {
    /// Create a scheduler and the receiving end its ticks are delivered to.
    pub fn new(period: Duration) -> (Self, mpsc::UnboundedReceiver<TickToken>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let countdown = Self {
            period,
            sender,
            pending: None,
        };
        (countdown, receiver)
    }

    /// Deliver `token` after one period, replacing whatever was pending.
    pub fn arm(&mut self, token: TickToken) {
        self.cancel();

        let sender = self.sender.clone();
        let period = self.period;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(period).await;
            let _ = sender.send(token);
        });

        trace!(?token, "countdown armed");
        self.pending = Some((token, handle));
    }

    pub fn cancel(&mut self) {
        if let Some((token, handle)) = self.pending.take() {
            handle.abort();
            trace!(?token, "countdown cancelled");
        }
    }

    /// Make the scheduler match the step the session is waiting for: re-arm
    /// when the token changed, cancel when there is none.
    pub fn sync(&mut self, desired: Option<TickToken>) {
        match desired {
            Some(token) if self.armed_token() == Some(token) => {}
            Some(token) => self.arm(token),
            None => self.cancel(),
        }
    }

    pub fn armed_token(&self) -> Option<TickToken> {
        self.pending.as_ref().map(|(token, _)| *token)
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.cancel();
    }
}
