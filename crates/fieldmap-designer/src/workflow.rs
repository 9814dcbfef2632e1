//! Annotation workflow state machine.
//!
//! ```text
//! Drafting --request_input--> AwaitingInput --submit/dismiss--> Annotated { selected }
//!                                                                   |  click toggles
//! any state --delete--> Deleted
//! ```
//!
//! Transitions that do not appear in the diagram are rejected with
//! [`EditorError::InvalidTransition`] and leave the state untouched.

use fieldmap_core::{EditorError, ShapeId};
use serde::{Deserialize, Serialize};

/// Where a shape is in its annotation lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeState {
    Drafting,
    AwaitingInput,
    Annotated { selected: bool },
    Deleted,
}

impl ShapeState {
    pub fn name(&self) -> &'static str {
        match self {
            ShapeState::Drafting => "Drafting",
            ShapeState::AwaitingInput => "AwaitingInput",
            ShapeState::Annotated { .. } => "Annotated",
            ShapeState::Deleted => "Deleted",
        }
    }

    pub fn is_annotated(&self) -> bool {
        matches!(self, ShapeState::Annotated { .. })
    }

    pub fn is_selected(&self) -> bool {
        matches!(self, ShapeState::Annotated { selected: true })
    }

    fn reject(&self, id: ShapeId, action: &str) -> EditorError {
        EditorError::InvalidTransition {
            id,
            state: self.name().to_string(),
            action: action.to_string(),
        }
    }

    /// `Drafting` to `AwaitingInput`.
    pub fn request_input(&mut self, id: ShapeId) -> Result<(), EditorError> {
        match self {
            ShapeState::Drafting => {
                *self = ShapeState::AwaitingInput;
                tracing::debug!("Shape {} awaiting metadata", id);
                Ok(())
            }
            _ => Err(self.reject(id, "request metadata")),
        }
    }

    /// `AwaitingInput` to `Annotated`; used for both submission and dismissal.
    pub fn annotate(&mut self, id: ShapeId) -> Result<(), EditorError> {
        match self {
            ShapeState::AwaitingInput => {
                *self = ShapeState::Annotated { selected: false };
                tracing::debug!("Shape {} annotated", id);
                Ok(())
            }
            _ => Err(self.reject(id, "submit metadata")),
        }
    }

    /// Flips selection of an annotated shape and returns the new value.
    pub fn toggle_selected(&mut self, id: ShapeId) -> Result<bool, EditorError> {
        match self {
            ShapeState::Annotated { selected } => {
                *selected = !*selected;
                Ok(*selected)
            }
            _ => Err(self.reject(id, "toggle selection")),
        }
    }

    /// Clears selection; returns whether it was set.
    pub fn deselect(&mut self) -> bool {
        match self {
            ShapeState::Annotated { selected } if *selected => {
                *selected = false;
                true
            }
            _ => false,
        }
    }

    /// Any live state to `Deleted`.
    pub fn delete(&mut self, id: ShapeId) -> Result<(), EditorError> {
        match self {
            ShapeState::Deleted => Err(self.reject(id, "delete")),
            _ => {
                *self = ShapeState::Deleted;
                tracing::debug!("Shape {} deleted", id);
                Ok(())
            }
        }
    }
}

impl std::fmt::Display for ShapeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: ShapeId = ShapeId(1);

    #[test]
    fn test_happy_path() {
        let mut state = ShapeState::Drafting;
        state.request_input(ID).unwrap();
        assert_eq!(state, ShapeState::AwaitingInput);
        state.annotate(ID).unwrap();
        assert_eq!(state, ShapeState::Annotated { selected: false });
        assert!(state.toggle_selected(ID).unwrap());
        assert!(state.is_selected());
        assert!(!state.toggle_selected(ID).unwrap());
        state.delete(ID).unwrap();
        assert_eq!(state, ShapeState::Deleted);
    }

    #[test]
    fn test_submit_twice_rejected() {
        let mut state = ShapeState::AwaitingInput;
        state.annotate(ID).unwrap();
        let err = state.annotate(ID).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Shape #1: cannot submit metadata while Annotated"
        );
        assert_eq!(state, ShapeState::Annotated { selected: false });
    }

    #[test]
    fn test_click_while_drafting_rejected() {
        let mut state = ShapeState::Drafting;
        assert!(state.toggle_selected(ID).is_err());
        assert_eq!(state, ShapeState::Drafting);
    }

    #[test]
    fn test_delete_from_any_live_state() {
        for mut state in [
            ShapeState::Drafting,
            ShapeState::AwaitingInput,
            ShapeState::Annotated { selected: true },
        ] {
            state.delete(ID).unwrap();
            assert_eq!(state, ShapeState::Deleted);
        }
        let mut gone = ShapeState::Deleted;
        assert!(gone.delete(ID).is_err());
    }

    #[test]
    fn test_deselect() {
        let mut state = ShapeState::Annotated { selected: true };
        assert!(state.deselect());
        assert!(!state.deselect());
        let mut drafting = ShapeState::Drafting;
        assert!(!drafting.deselect());
    }
}
