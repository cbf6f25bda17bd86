//! Pointer interaction state machine.
//!
//! [`InteractionState::transition`] is pure: it consumes the current state and
//! an event and returns the next state plus the effects to apply. Nothing here
//! touches the store or the surface.

use uuid::Uuid;

use super::popup::Popup;
use crate::model::{Point, Rect};

/// What the pointer interaction is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InteractionState {
    /// Waiting for a pointer press.
    #[default]
    Idle,
    /// A box is being dragged out; both corners in display space.
    Dragging { start: Point, current: Point },
    /// A committed box waits for a category from the menu.
    PendingCategory { annotation_id: Uuid, anchor: Point },
    /// The user chose "Add New" and is typing a category name.
    PendingNewCategoryName { annotation_id: Uuid, anchor: Point },
}

/// Choice reported by the category menu.
#[derive(Debug, Clone, PartialEq)]
pub enum CategoryChoice {
    /// An existing project category, by name.
    Existing(String),
    /// The "Add New" entry.
    CreateNew,
    /// The menu was closed without a choice.
    Dismissed,
}

/// Input to the state machine. Pointer positions are display-space.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionEvent {
    PointerDown(Point),
    PointerMove(Point),
    PointerUp,
    CategorySelected(CategoryChoice),
    /// Text submitted from the name input; `None` when it was dismissed.
    CategoryNameSubmitted(Option<String>),
    /// Abort whatever is in progress.
    Cancel,
}

/// Side effect requested by a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Append a pending box covering `display_rect` under `annotation_id`.
    Commit {
        annotation_id: Uuid,
        display_rect: Rect,
    },
    /// Label the pending box with an existing category.
    AssignExisting { annotation_id: Uuid, name: String },
    /// Label the pending box with a typed name, creating the category if needed.
    AssignNew { annotation_id: Uuid, name: String },
    /// Remove the pending box.
    Discard { annotation_id: Uuid },
    OpenPopup(Popup),
    ClosePopup,
    Redraw,
}

/// Result of a transition.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: InteractionState,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn to(state: InteractionState, effects: Vec<Effect>) -> Self {
        Self { state, effects }
    }

    fn ignored(state: InteractionState) -> Self {
        Self {
            state,
            effects: Vec::new(),
        }
    }

    /// Check if the event was ignored.
    pub fn is_noop(&self) -> bool {
        self.effects.is_empty()
    }
}

impl InteractionState {
    /// Box being dragged, in display space.
    pub fn live_box(&self) -> Option<Rect> {
        match self {
            InteractionState::Dragging { start, current } => Some(Rect::from_corners(*start, *current)),
            _ => None,
        }
    }

    /// ID of the box waiting for a category, if any.
    pub fn pending_annotation(&self) -> Option<Uuid> {
        match self {
            InteractionState::PendingCategory { annotation_id, .. }
            | InteractionState::PendingNewCategoryName { annotation_id, .. } => Some(*annotation_id),
            _ => None,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, InteractionState::Idle)
    }

    /// Compute the next state.
    ///
    /// `min_box` is the smallest display-space extent a committed box may
    /// have on either axis. Events that make no sense in the current state
    /// leave it unchanged and produce no effects.
    pub fn transition(self, event: InteractionEvent, min_box: f32) -> Transition {
        use InteractionEvent as Ev;
        use InteractionState as St;

        match (self, event) {
            (St::Idle, Ev::PointerDown(point)) => Transition::to(
                St::Dragging {
                    start: point,
                    current: point,
                },
                vec![Effect::Redraw],
            ),

            (St::Dragging { start, .. }, Ev::PointerMove(point)) => Transition::to(
                St::Dragging {
                    start,
                    current: point,
                },
                vec![Effect::Redraw],
            ),

            (St::Dragging { start, current }, Ev::PointerUp) => {
                let display_rect = Rect::from_corners(start, current);
                if !display_rect.meets_min_size(min_box) {
                    log::debug!(
                        "Dropping {:.1}x{:.1} box (minimum {})",
                        display_rect.width,
                        display_rect.height,
                        min_box
                    );
                    return Transition::to(St::Idle, vec![Effect::Redraw]);
                }

                let annotation_id = Uuid::new_v4();
                let anchor = display_rect.bottom_right();
                Transition::to(
                    St::PendingCategory {
                        annotation_id,
                        anchor,
                    },
                    vec![
                        Effect::Commit {
                            annotation_id,
                            display_rect,
                        },
                        Effect::OpenPopup(Popup::category_menu(annotation_id, anchor)),
                        Effect::Redraw,
                    ],
                )
            }

            (St::Dragging { .. }, Ev::Cancel) => Transition::to(St::Idle, vec![Effect::Redraw]),

            (
                St::PendingCategory {
                    annotation_id,
                    anchor,
                },
                Ev::CategorySelected(choice),
            ) => match choice {
                CategoryChoice::Existing(name) => Transition::to(
                    St::Idle,
                    vec![
                        Effect::AssignExisting {
                            annotation_id,
                            name,
                        },
                        Effect::ClosePopup,
                        Effect::Redraw,
                    ],
                ),
                CategoryChoice::CreateNew => Transition::to(
                    St::PendingNewCategoryName {
                        annotation_id,
                        anchor,
                    },
                    vec![
                        Effect::OpenPopup(Popup::name_input(annotation_id, anchor)),
                        Effect::Redraw,
                    ],
                ),
                CategoryChoice::Dismissed => St::discard(annotation_id),
            },

            (St::PendingNewCategoryName { annotation_id, .. }, Ev::CategoryNameSubmitted(text)) => {
                match text.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
                    Some(name) => Transition::to(
                        St::Idle,
                        vec![
                            Effect::AssignNew {
                                annotation_id,
                                name: name.to_string(),
                            },
                            Effect::ClosePopup,
                            Effect::Redraw,
                        ],
                    ),
                    None => St::discard(annotation_id),
                }
            }

            (
                St::PendingCategory { annotation_id, .. }
                | St::PendingNewCategoryName { annotation_id, .. },
                Ev::Cancel,
            ) => St::discard(annotation_id),

            (state, event) => {
                log::trace!("Ignoring {:?} in state {:?}", event, state);
                Transition::ignored(state)
            }
        }
    }

    fn discard(annotation_id: Uuid) -> Transition {
        Transition::to(
            InteractionState::Idle,
            vec![
                Effect::Discard { annotation_id },
                Effect::ClosePopup,
                Effect::Redraw,
            ],
        )
    }
}
