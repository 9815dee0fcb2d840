use serde::Serialize;
use snap_geom::{Rect, Zone};
use snap_world::WindowObservation;
use tokio::sync::mpsc::UnboundedSender;
use tracing::info;

use crate::{AssistStep, Error, FinishReason, Presentation, Result};

/// One candidate as shown in the picker.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CandidateView {
    /// Window identity, as `pid:window_id`.
    pub id: String,
    /// Owning application.
    pub app: String,
    /// Window title.
    pub title: String,
}

impl From<&WindowObservation> for CandidateView {
    fn from(w: &WindowObservation) -> Self {
        Self {
            id: w.id.to_string(),
            app: w.app.clone(),
            title: w.title.clone(),
        }
    }
}

/// Messages for the picker UI.
#[derive(Clone, Debug, PartialEq)]
pub enum AssistEvent {
    /// Show (or refresh) the picker for a zone.
    Present(Presentation),
    /// Hide the picker.
    Finished(FinishReason),
}

impl AssistEvent {
    /// Zone and target of a presentation.
    pub fn zone(&self) -> Option<(Zone, Rect)> {
        match self {
            Self::Present(p) => Some((p.zone, p.target)),
            Self::Finished(_) => None,
        }
    }
}

/// Sends assist updates to the picker UI.
#[derive(Clone)]
pub struct AssistNotifier {
    /// UI channel.
    tx: UnboundedSender<AssistEvent>,
}

impl AssistNotifier {
    /// Create a notifier over a UI channel.
    pub fn new(tx: UnboundedSender<AssistEvent>) -> Self {
        Self { tx }
    }

    /// Forward an orchestrator step; `Ignored` sends nothing.
    pub fn send_step(&self, step: &AssistStep) -> Result<()> {
        let event = match step {
            AssistStep::Ignored => return Ok(()),
            AssistStep::Present(p) => {
                info!(
                    zone = %p.zone,
                    candidates = p.candidates.len(),
                    remaining = p.remaining.len(),
                    "assist_picker_show"
                );
                AssistEvent::Present(p.clone())
            }
            AssistStep::Finished(reason) => {
                info!(?reason, "assist_picker_hide");
                AssistEvent::Finished(*reason)
            }
        };
        self.tx.send(event).map_err(|_| Error::ChannelClosed)
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use super::*;

    #[test]
    fn ignored_steps_are_not_sent() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let n = AssistNotifier::new(tx);
        n.send_step(&AssistStep::Ignored).unwrap();
        n.send_step(&AssistStep::Finished(FinishReason::Dismissed))
            .unwrap();
        assert_eq!(
            rx.try_recv().unwrap(),
            AssistEvent::Finished(FinishReason::Dismissed)
        );
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn closed_channel_is_reported() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let n = AssistNotifier::new(tx);
        assert!(matches!(
            n.send_step(&AssistStep::Finished(FinishReason::Completed)),
            Err(Error::ChannelClosed)
        ));
    }
}
