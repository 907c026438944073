use color_eyre::eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;
use tokio::sync::mpsc::UnboundedSender;

use crate::action::Action;

/// A self-contained piece of the UI: consumes actions, emits actions,
/// draws itself into a rect.
pub trait Component: Send {
    /// Hand the component a sender for actions it raises on its own.
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        let _ = action_tx;
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let _ = key;
        Ok(None)
    }

    /// React to an action, optionally producing a follow-up.
    fn update(&mut self, action: &Action) -> Result<Option<Action>>;

    fn render(&self, frame: &mut Frame, area: Rect);
}
